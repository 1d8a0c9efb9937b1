use crate::document::Document;
use crate::error::Result;
use crate::objects::{Dictionary, IndirectObject, Object, ObjectId, Stream};
use crate::text::Font;
use crate::writer::WriterConfig;
use std::collections::{BTreeMap, BTreeSet};

/// Every indirect object of one serialization, numbered from 1 in file order.
///
/// Built fresh for each write so numbering never leaks between calls.
#[derive(Debug)]
pub(crate) struct ObjectGraph {
    objects: Vec<IndirectObject>,
    root: ObjectId,
    info: ObjectId,
}

impl ObjectGraph {
    pub(crate) fn build(document: &Document, config: &WriterConfig) -> Result<Self> {
        let mut builder = Builder::default();

        let font_ids = builder.add_fonts(document);
        let image_ids = builder.add_images(document);

        let mut page_ids = Vec::with_capacity(document.page_count());
        for page in document.pages() {
            let mut content = Stream::new(page.content());
            compress(&mut content, config)?;
            let content_id = builder.push(content);

            let mut page_dict = Dictionary::new();
            page_dict.set("Type", Object::name("Page"));
            page_dict.set(
                "MediaBox",
                vec![
                    Object::Integer(0),
                    Object::Integer(0),
                    Object::Real(page.width()),
                    Object::Real(page.height()),
                ],
            );
            page_dict.set("Resources", resources(page.fonts(), page.images(), &font_ids, &image_ids));
            page_dict.set("Contents", content_id);
            page_ids.push(builder.push(page_dict));
        }

        let mut pages_dict = Dictionary::new();
        pages_dict.set("Type", Object::name("Pages"));
        pages_dict.set(
            "Kids",
            page_ids.iter().map(|id| Object::Reference(*id)).collect::<Vec<_>>(),
        );
        pages_dict.set("Count", page_ids.len() as i64);
        let pages_id = builder.push(pages_dict);

        // Second pass: parents exist only now
        for page_id in &page_ids {
            builder.patch(*page_id, |page| page.set("Parent", pages_id));
        }

        let mut catalog = Dictionary::new();
        catalog.set("Type", Object::name("Catalog"));
        catalog.set("Pages", pages_id);
        let root = builder.push(catalog);

        let info = builder.push(info_dictionary(document));

        Ok(Self {
            objects: builder.objects,
            root,
            info,
        })
    }

    pub(crate) fn objects(&self) -> &[IndirectObject] {
        &self.objects
    }

    pub(crate) fn root(&self) -> ObjectId {
        self.root
    }

    pub(crate) fn info(&self) -> ObjectId {
        self.info
    }

    pub(crate) fn len(&self) -> usize {
        self.objects.len()
    }
}

#[derive(Default)]
struct Builder {
    objects: Vec<IndirectObject>,
}

impl Builder {
    fn push(&mut self, object: impl Into<Object>) -> ObjectId {
        let id = ObjectId::new(self.objects.len() as u32 + 1, 0);
        self.objects.push(IndirectObject::new(id, object));
        id
    }

    fn patch(&mut self, id: ObjectId, f: impl FnOnce(&mut Dictionary)) {
        let index = id.number() as usize - 1;
        if let Some(dict) = self
            .objects
            .get_mut(index)
            .and_then(|entry| entry.object.as_dict_mut())
        {
            f(dict);
        }
    }

    /// One font object per font any page uses, in registry order.
    fn add_fonts(&mut self, document: &Document) -> BTreeMap<Font, ObjectId> {
        let used: BTreeSet<Font> = document
            .pages()
            .iter()
            .flat_map(|page| page.fonts().iter().copied())
            .collect();

        used.into_iter()
            .map(|font| {
                let mut dict = Dictionary::new();
                dict.set("Type", Object::name("Font"));
                dict.set("Subtype", Object::name("Type1"));
                dict.set("BaseFont", Object::name(font.base_font()));
                if !font.is_symbolic() {
                    dict.set("Encoding", Object::name("WinAnsiEncoding"));
                }
                (font, self.push(dict))
            })
            .collect()
    }

    /// One XObject per registered image that some page draws.
    fn add_images(&mut self, document: &Document) -> BTreeMap<String, ObjectId> {
        let drawn: BTreeSet<&String> = document
            .pages()
            .iter()
            .flat_map(|page| page.images().iter())
            .collect();

        let mut ids = BTreeMap::new();
        for (name, image) in document.images() {
            if drawn.contains(name) {
                ids.insert(name.clone(), self.push(image.to_stream_object()));
            }
        }
        ids
    }
}

fn resources(
    fonts: &BTreeSet<Font>,
    images: &BTreeSet<String>,
    font_ids: &BTreeMap<Font, ObjectId>,
    image_ids: &BTreeMap<String, ObjectId>,
) -> Dictionary {
    let mut resources = Dictionary::new();

    let font_dict: Dictionary = fonts
        .iter()
        .filter_map(|font| {
            font_ids
                .get(font)
                .map(|id| (font.resource_name(), Object::Reference(*id)))
        })
        .collect();
    if !font_dict.is_empty() {
        resources.set("Font", font_dict);
    }

    let xobject_dict: Dictionary = images
        .iter()
        .filter_map(|name| {
            image_ids
                .get(name)
                .map(|id| (name.clone(), Object::Reference(*id)))
        })
        .collect();
    if !xobject_dict.is_empty() {
        resources.set("XObject", xobject_dict);
    }

    resources.set(
        "ProcSet",
        ["PDF", "Text", "ImageB", "ImageC"]
            .into_iter()
            .map(Object::name)
            .collect::<Vec<_>>(),
    );
    resources
}

fn info_dictionary(document: &Document) -> Dictionary {
    let metadata = &document.metadata;
    let mut info = Dictionary::new();

    let text_entries = [
        ("Title", &metadata.title),
        ("Author", &metadata.author),
        ("Subject", &metadata.subject),
        ("Keywords", &metadata.keywords),
        ("Creator", &metadata.creator),
        ("Producer", &metadata.producer),
    ];
    for (key, value) in text_entries {
        if let Some(value) = value {
            info.set(key, Object::String(value.clone()));
        }
    }

    if let Some(date) = metadata.creation_date {
        info.set("CreationDate", Object::String(super::format_pdf_date(date)));
    }
    if let Some(date) = metadata.modification_date {
        info.set("ModDate", Object::String(super::format_pdf_date(date)));
    }
    info
}

#[cfg(feature = "compression")]
fn compress(stream: &mut Stream, config: &WriterConfig) -> Result<()> {
    if config.compress_streams {
        stream.compress_flate()?;
    }
    Ok(())
}

#[cfg(not(feature = "compression"))]
fn compress(_stream: &mut Stream, config: &WriterConfig) -> Result<()> {
    if config.compress_streams {
        tracing::warn!("stream compression requested but the `compression` feature is disabled");
    }
    Ok(())
}

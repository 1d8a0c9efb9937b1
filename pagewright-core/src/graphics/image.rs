//! Image support for PDF generation
//!
//! Any format the `image` crate can decode (PNG and JPEG are enabled) is
//! accepted and re-encoded as baseline JPEG, so every embedded image is a
//! `DCTDecode` XObject.

use crate::objects::{Dictionary, Object, Stream};
use crate::{PdfError, Result};
use base64::Engine;
use image::codecs::jpeg::JpegEncoder;
use image::{ColorType, DynamicImage};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// JPEG quality used when re-encoding images for embedding.
pub const JPEG_QUALITY: u8 = 90;

/// Represents an image that can be embedded in a PDF
#[derive(Debug, Clone, PartialEq)]
pub struct Image {
    /// JPEG-encoded image data
    data: Vec<u8>,
    /// Width in pixels
    width: u32,
    /// Height in pixels
    height: u32,
    /// Color space
    color_space: ColorSpace,
}

/// Color spaces for images
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorSpace {
    /// Grayscale
    DeviceGray,
    /// RGB color
    DeviceRGB,
}

impl ColorSpace {
    pub fn pdf_name(&self) -> &'static str {
        match self {
            ColorSpace::DeviceGray => "DeviceGray",
            ColorSpace::DeviceRGB => "DeviceRGB",
        }
    }
}

impl Image {
    /// Re-encode an already decoded image. Alpha channels are dropped.
    pub fn from_dynamic(img: &DynamicImage) -> Result<Self> {
        let (width, height) = (img.width(), img.height());
        if width == 0 || height == 0 {
            return Err(PdfError::InvalidImage(format!(
                "Image has zero dimension ({width}x{height})"
            )));
        }

        let (color_space, flattened) = match img.color() {
            ColorType::L8 | ColorType::La8 | ColorType::L16 | ColorType::La16 => (
                ColorSpace::DeviceGray,
                DynamicImage::ImageLuma8(img.to_luma8()),
            ),
            _ => (
                ColorSpace::DeviceRGB,
                DynamicImage::ImageRgb8(img.to_rgb8()),
            ),
        };

        let mut data = Vec::new();
        let encoder = JpegEncoder::new_with_quality(&mut data, JPEG_QUALITY);
        flattened.write_with_encoder(encoder)?;

        Ok(Image {
            data,
            width,
            height,
            color_space,
        })
    }

    /// Decode raw image bytes of any supported format
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.is_empty() {
            return Err(PdfError::InvalidImage("Image data is empty".to_string()));
        }
        let img = image::load_from_memory(bytes)?;
        Self::from_dynamic(&img)
    }

    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Self::from_bytes(&data)
    }

    /// Load an image from a file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    /// Decode base64 image data. A `data:image/...;base64,` prefix is stripped.
    pub fn from_base64(encoded: &str) -> Result<Self> {
        let payload = strip_data_url(encoded);
        let cleaned: String = payload.chars().filter(|c| !c.is_whitespace()).collect();
        let bytes = base64::engine::general_purpose::STANDARD.decode(cleaned)?;
        Self::from_bytes(&bytes)
    }

    /// Get image width in pixels
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Get image height in pixels
    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn color_space(&self) -> ColorSpace {
        self.color_space
    }

    /// Width divided by height
    pub fn aspect_ratio(&self) -> f64 {
        self.width as f64 / self.height as f64
    }

    /// Get image data
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Convert to a PDF image XObject stream
    pub fn to_stream_object(&self) -> Object {
        let mut dict = Dictionary::new();

        dict.set("Type", Object::name("XObject"));
        dict.set("Subtype", Object::name("Image"));
        dict.set("Width", self.width as i64);
        dict.set("Height", self.height as i64);
        dict.set("ColorSpace", Object::name(self.color_space.pdf_name()));
        dict.set("BitsPerComponent", 8);
        dict.set("Filter", Object::name("DCTDecode"));

        Object::Stream(Stream::with_dictionary(dict, self.data.clone()))
    }
}

fn strip_data_url(encoded: &str) -> &str {
    let trimmed = encoded.trim();
    if trimmed.starts_with("data:") {
        match trimmed.find(',') {
            Some(comma) => &trimmed[comma + 1..],
            None => trimmed,
        }
    } else {
        trimmed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, ImageFormat, Luma, Rgb, RgbImage, RgbaImage};
    use std::io::Cursor;

    fn png_bytes(img: DynamicImage) -> Vec<u8> {
        let mut buf = Vec::new();
        img.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
            .unwrap();
        buf
    }

    fn sample_rgb_png() -> Vec<u8> {
        let img = RgbImage::from_fn(8, 4, |x, _| Rgb([(x * 30) as u8, 0, 200]));
        png_bytes(DynamicImage::ImageRgb8(img))
    }

    #[test]
    fn test_png_is_reencoded_as_jpeg() {
        let image = Image::from_bytes(&sample_rgb_png()).unwrap();

        assert_eq!(image.width(), 8);
        assert_eq!(image.height(), 4);
        assert_eq!(image.color_space(), ColorSpace::DeviceRGB);
        assert_eq!(&image.data()[..2], &[0xFF, 0xD8]);
        assert_eq!(image.aspect_ratio(), 2.0);
    }

    #[test]
    fn test_grayscale_stays_gray() {
        let img = GrayImage::from_pixel(3, 3, Luma([128]));
        let image = Image::from_bytes(&png_bytes(DynamicImage::ImageLuma8(img))).unwrap();
        assert_eq!(image.color_space(), ColorSpace::DeviceGray);
    }

    #[test]
    fn test_alpha_is_dropped() {
        let img = RgbaImage::from_pixel(2, 2, image::Rgba([10, 20, 30, 0]));
        let image = Image::from_bytes(&png_bytes(DynamicImage::ImageRgba8(img))).unwrap();
        assert_eq!(image.color_space(), ColorSpace::DeviceRGB);
    }

    #[test]
    fn test_malformed_bytes_fail() {
        assert!(Image::from_bytes(b"definitely not an image").is_err());
        assert!(matches!(
            Image::from_bytes(&[]),
            Err(PdfError::InvalidImage(_))
        ));
    }

    #[test]
    fn test_from_base64_with_and_without_prefix() {
        let encoded = base64::engine::general_purpose::STANDARD.encode(sample_rgb_png());

        let plain = Image::from_base64(&encoded).unwrap();
        let prefixed = Image::from_base64(&format!("data:image/png;base64,{encoded}")).unwrap();

        assert_eq!(plain.width(), 8);
        assert_eq!(plain, prefixed);
    }

    #[test]
    fn test_invalid_base64() {
        assert!(matches!(
            Image::from_base64("!!!not base64!!!"),
            Err(PdfError::Base64(_))
        ));
    }

    #[test]
    fn test_from_reader() {
        let image = Image::from_reader(Cursor::new(sample_rgb_png())).unwrap();
        assert_eq!(image.height(), 4);
    }

    #[test]
    fn test_to_stream_object() {
        let image = Image::from_bytes(&sample_rgb_png()).unwrap();
        let obj = image.to_stream_object();

        let dict = obj.as_dict().unwrap();
        assert_eq!(dict.get("Subtype"), Some(&Object::name("Image")));
        assert_eq!(dict.get("Width"), Some(&Object::Integer(8)));
        assert_eq!(dict.get("Height"), Some(&Object::Integer(4)));
        assert_eq!(dict.get("ColorSpace"), Some(&Object::name("DeviceRGB")));
        assert_eq!(dict.get("BitsPerComponent"), Some(&Object::Integer(8)));
        assert_eq!(dict.get("Filter"), Some(&Object::name("DCTDecode")));
        assert_eq!(
            dict.get("Length"),
            Some(&Object::Integer(image.data().len() as i64))
        );
    }

    #[test]
    fn test_strip_data_url() {
        assert_eq!(strip_data_url("data:image/jpeg;base64,QUJD"), "QUJD");
        assert_eq!(strip_data_url("  QUJD "), "QUJD");
    }
}

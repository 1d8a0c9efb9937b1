//! Low-level PDF object model used by the serializer.

mod dictionary;
mod primitive;
mod stream;

pub use dictionary::Dictionary;
pub use primitive::{IndirectObject, Object, ObjectId};
pub use stream::Stream;

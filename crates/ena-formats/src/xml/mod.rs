//! XML serialization and strict parsing of element trees.

mod reader;
mod writer;

pub use reader::parse_document;
pub use writer::{to_bytes, to_bytes_with_config, SerializerConfig};

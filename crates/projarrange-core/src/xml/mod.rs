pub mod arena;
pub mod builder;
pub mod namespaces;
pub mod node;
pub mod parser;
pub mod xname;

pub use arena::XmlDocument;
pub use builder::{serialize, serialize_pretty, serialize_subtree, serialize_with, WriteOptions};
pub use namespaces::{MSB, XML, XMLNS};
pub use node::XmlNodeData;
pub use parser::{parse, parse_bytes, parse_with_options, ParseOptions};
pub use xname::{XAttribute, XName};

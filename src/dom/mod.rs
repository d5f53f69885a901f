pub mod parser;
pub mod serializer;
pub mod tree;

pub use parser::{parse_document, parse_fragment_into};
pub use tree::{Document, ElementData, NodeId, NodeKind};

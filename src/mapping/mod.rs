mod reader;
mod types;
mod writer;

pub use reader::{load_mappings, parse_mappings};
pub use types::*;
pub use writer::{save_mappings, MappingError};

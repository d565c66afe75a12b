pub mod directory;
mod document;
/// Mapping between subject ids and document paths.
pub mod path_parser;

pub use directory::{Directory, META_DIR, RemovedPattern, StoreError};
pub use path_parser::{ParseError, construct_path_from_id, parse_id_from_path};

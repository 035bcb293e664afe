//! CLI command implementations.

pub mod index;
pub mod list;
pub mod search;
pub mod show;

pub use index::build_index;
pub use list::list_documents;
pub use search::{search_index, SearchOptions};
pub use show::show_document;

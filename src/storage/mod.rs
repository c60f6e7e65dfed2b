mod file;
mod traits;
mod types;

pub use file::{is_valid_list_id, FileListStore};
pub use traits::{ListStore, StorageError, StorageResult};
pub use types::*;

pub mod json;
pub mod storage;

pub use json::{parse_import, to_pretty_json};
pub use storage::{FileStorage, MemoryStorage, Storage};

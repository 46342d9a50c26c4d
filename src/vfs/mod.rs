mod dump;
mod entry;
mod shared;
mod tree_fs;

pub use entry::{EntryType, Metadata, Permissions};
pub use shared::SharedFS;
pub use tree_fs::TreeFS;

//! An in-memory hierarchical namespace for Rust: a tree of named directories and files
//! with path-based creation, lookup, mutation, removal, move and copy.
//!
//! ### Overview
//!
//! `tree-fs` emulates a minimal single-process virtual file system. Nothing touches the
//! disk: directories own their children, files own a byte buffer, and every path is
//! resolved by walking down from the root.
//!
//! **Key ideas**:
//! - **Consistency**: child names are unique, the tree never forms a cycle, moved nodes
//!   keep their identity and copied subtrees share nothing with their source.
//! - **Precise errors**: every failure is a typed [`FsError`] carrying the offending path;
//!   a failed operation leaves the tree untouched.
//! - **Testability**: use it in unit tests to simulate file trees without side effects.
//! - **Sharing**: [`SharedFS`] puts a tree behind one reader-writer lock.
//!
//! ### Example
//!
//! ```
//! use tree_fs::{FsBackend, TreeFS};
//!
//! let mut fs = TreeFS::new();
//! fs.mkdir("/docs").unwrap();
//! fs.write("/docs/first.txt", "Hello").unwrap();
//! fs.append("/docs/first.txt", ", World").unwrap();
//! fs.mv("/docs/first.txt", "/greeting.txt").unwrap();
//!
//! assert_eq!(fs.cat("/greeting.txt").unwrap(), "Hello, World");
//! assert_eq!(fs.ls("/").unwrap(), ["docs", "greeting.txt"]);
//! print!("{fs}");
//! ```

mod config;
mod core;
mod error;
mod vfs;

pub use config::FsConfig;
pub use crate::core::{FsBackend, Result, utils};
pub use error::{ErrorKind, FsError};
pub use vfs::{EntryType, Metadata, Permissions, SharedFS, TreeFS};

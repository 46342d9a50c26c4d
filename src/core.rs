use crate::error::FsError;
use crate::vfs::{Metadata, Permissions};

pub type Result<T> = std::result::Result<T, FsError>;

/// Operation surface of a namespace backend.
///
/// All paths are absolute (`/`-separated, starting with `/`). The root is `/`.
/// There is no current working directory and no special meaning for `.` or `..`.
pub trait FsBackend {
    /// Returns true, if `path` names an existing node.
    fn exists<P: AsRef<str>>(&self, path: P) -> bool;

    fn is_dir<P: AsRef<str>>(&self, path: P) -> Result<bool>;

    fn is_file<P: AsRef<str>>(&self, path: P) -> Result<bool>;

    /// Names under `path`, sorted. A file lists as its own name.
    fn ls<P: AsRef<str>>(&self, path: P) -> Result<Vec<String>>;

    fn stat<P: AsRef<str>>(&self, path: P) -> Result<Metadata>;

    /// Creates a single empty directory. The parent must exist.
    fn mkdir<P: AsRef<str>>(&mut self, path: P) -> Result<()>;

    /// Creates a single empty file. The parent must exist.
    fn mkfile<P: AsRef<str>>(&mut self, path: P) -> Result<()>;

    fn read<P: AsRef<str>>(&self, path: P) -> Result<Vec<u8>>;

    /// Replaces the file contents, creating the file if it is missing.
    fn write<P: AsRef<str>, C: AsRef<[u8]>>(&mut self, path: P, content: C) -> Result<()>;

    /// Appends to the file, creating it empty first if it is missing.
    fn append<P: AsRef<str>, C: AsRef<[u8]>>(&mut self, path: P, content: C) -> Result<()>;

    fn chmod<P: AsRef<str>>(&mut self, path: P, permissions: Permissions) -> Result<()>;

    fn rm<P: AsRef<str>>(&mut self, path: P, recursive: bool) -> Result<()>;

    fn mv<S: AsRef<str>, D: AsRef<str>>(&mut self, src: S, dest: D) -> Result<()>;

    fn cp<S: AsRef<str>, D: AsRef<str>>(&mut self, src: S, dest: D) -> Result<()>;

    /// Removes all artifacts (dirs and files), but preserves the root.
    fn cleanup(&mut self) -> bool;
}

pub mod utils {
    pub const SEPARATOR: char = '/';
    pub const ROOT: &str = "/";

    /// Splits `path` into its non-empty segments.
    /// `"/a//b/"` gives `["a", "b"]`; a missing leading `/` is not checked here.
    pub fn split_path(path: &str) -> Vec<&str> {
        path.split(SEPARATOR).filter(|s| !s.is_empty()).collect()
    }

    /// True for a non-empty path starting with the separator.
    pub fn is_absolute(path: &str) -> bool {
        path.starts_with(SEPARATOR)
    }

    /// True for `/`, `//` and the like: absolute and without segments.
    pub fn is_virtual_root(path: &str) -> bool {
        is_absolute(path) && split_path(path).is_empty()
    }

    /// Last segment of `path`, if any.
    pub fn basename(path: &str) -> Option<&str> {
        split_path(path).pop()
    }

}

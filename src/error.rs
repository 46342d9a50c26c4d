//! Error types for namespace operations.

/// Errors that can occur when working with a [`TreeFS`](crate::TreeFS).
///
/// Every variant carries the path the operation was called with, so the
/// message alone is enough to tell what went wrong and where.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FsError {
    /// Path is empty, relative, or names the parent of the root
    #[error("invalid path: '{0}'")]
    InvalidPath(String),

    /// A required path segment does not exist
    #[error("{0} does not exist")]
    NotFound(String),

    /// A non-final path segment names a file
    #[error("{0} not a directory")]
    NotADirectory(String),

    /// A file operation found a directory
    #[error("{0} is a directory")]
    IsADirectory(String),

    /// Creation or move target collides with an existing child
    #[error("path already exists: {0}")]
    AlreadyExists(String),

    /// Copy target already exists
    #[error("destination already exists: {0}")]
    DestinationExists(String),

    /// Non-recursive removal of a non-empty directory
    #[error("directory not empty: {0}")]
    DirectoryNotEmpty(String),

    #[error("invalid path: the root cannot be removed")]
    CannotRemoveRoot,

    #[error("invalid path: the root cannot be moved")]
    CannotMoveRoot,

    /// Destination directory is the source or lies inside it
    #[error("cannot move '{from}' to '{to}': destination is inside source")]
    MoveIntoSelf { from: String, to: String },
}

/// Discriminant of an [`FsError`], handy for matching without the payload.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidPath,
    NotFound,
    NotADirectory,
    IsADirectory,
    AlreadyExists,
    DestinationExists,
    DirectoryNotEmpty,
    CannotRemoveRoot,
    CannotMoveRoot,
    MoveIntoSelf,
}

impl FsError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            FsError::InvalidPath(_) => ErrorKind::InvalidPath,
            FsError::NotFound(_) => ErrorKind::NotFound,
            FsError::NotADirectory(_) => ErrorKind::NotADirectory,
            FsError::IsADirectory(_) => ErrorKind::IsADirectory,
            FsError::AlreadyExists(_) => ErrorKind::AlreadyExists,
            FsError::DestinationExists(_) => ErrorKind::DestinationExists,
            FsError::DirectoryNotEmpty(_) => ErrorKind::DirectoryNotEmpty,
            FsError::CannotRemoveRoot => ErrorKind::CannotRemoveRoot,
            FsError::CannotMoveRoot => ErrorKind::CannotMoveRoot,
            FsError::MoveIntoSelf { .. } => ErrorKind::MoveIntoSelf,
        }
    }
}

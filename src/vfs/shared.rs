use std::sync::Arc;

use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::vfs::tree_fs::TreeFS;

/// A cloneable, thread-safe handle to one `TreeFS`.
///
/// The whole tree sits behind a single reader-writer lock: any number of readers,
/// or one writer. Move and copy can touch two unrelated places at once, so there
/// is no finer granularity.
///
/// ```
/// use tree_fs::{FsBackend, SharedFS, TreeFS};
///
/// let fs = SharedFS::new(TreeFS::new());
/// fs.write().mkdir("/docs").unwrap();
/// assert!(fs.read().exists("/docs"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct SharedFS {
    inner: Arc<RwLock<TreeFS>>,
}

impl SharedFS {
    pub fn new(fs: TreeFS) -> Self {
        Self {
            inner: Arc::new(RwLock::new(fs)),
        }
    }

    /// Shared access. Blocks while a writer holds the lock.
    pub fn read(&self) -> RwLockReadGuard<'_, TreeFS> {
        self.inner.read()
    }

    /// Exclusive access for the duration of the guard.
    pub fn write(&self) -> RwLockWriteGuard<'_, TreeFS> {
        self.inner.write()
    }
}

impl From<TreeFS> for SharedFS {
    fn from(fs: TreeFS) -> Self {
        Self::new(fs)
    }
}

use crate::vfs::Permissions;

/// Settings applied to nodes created by a `TreeFS`.
///
/// Nodes produced by `cp()` keep the source's permissions; the config only
/// affects `mkdir()`, `mkfile()` and files created implicitly by `write()`/`append()`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FsConfig {
    dir_permissions: Permissions,
    file_permissions: Permissions,
}

impl FsConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_dir_permissions(mut self, permissions: Permissions) -> Self {
        self.dir_permissions = permissions;
        self
    }

    pub fn with_file_permissions(mut self, permissions: Permissions) -> Self {
        self.file_permissions = permissions;
        self
    }

    pub fn dir_permissions(&self) -> Permissions {
        self.dir_permissions
    }

    pub fn file_permissions(&self) -> Permissions {
        self.file_permissions
    }
}

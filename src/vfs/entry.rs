use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};

/// Index of a node in the `TreeFS` arena.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum EntryType {
    File,
    Directory,
}

/// Owner/group/others access bits, each in `0..=7`.
/// Stored and copied along with nodes, never enforced.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Permissions {
    owner: u8,
    group: u8,
    others: u8,
}

impl Permissions {
    /// Values are masked to their low three bits.
    pub fn new(owner: u8, group: u8, others: u8) -> Self {
        Self {
            owner: owner & 0o7,
            group: group & 0o7,
            others: others & 0o7,
        }
    }

    pub fn owner(&self) -> u8 {
        self.owner
    }

    pub fn group(&self) -> u8 {
        self.group
    }

    pub fn others(&self) -> u8 {
        self.others
    }

    /// Octal form, e.g. `644`.
    pub fn octal(&self) -> String {
        format!("{}{}{}", self.owner, self.group, self.others)
    }
}

impl Default for Permissions {
    /// `rw-r--r--`
    fn default() -> Self {
        Self::new(6, 4, 4)
    }
}

impl fmt::Display for Permissions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for bits in [self.owner, self.group, self.others] {
            let r = if bits & 0o4 != 0 { 'r' } else { '-' };
            let w = if bits & 0o2 != 0 { 'w' } else { '-' };
            let x = if bits & 0o1 != 0 { 'x' } else { '-' };
            write!(f, "{r}{w}{x}")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum EntryKind {
    Directory(BTreeMap<String, NodeId>),
    File(Vec<u8>),
}

/// A node of the namespace tree.
///
/// `name` always equals the key under which the parent directory stores the node
/// (`/` for the root).
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Entry {
    pub(crate) name: String,
    pub(crate) permissions: Permissions,
    pub(crate) created: DateTime<Utc>,
    pub(crate) modified: DateTime<Utc>,
    pub(crate) kind: EntryKind,
}

impl Entry {
    pub fn new_dir(name: impl Into<String>, permissions: Permissions) -> Entry {
        Self::with_kind(name, permissions, EntryKind::Directory(BTreeMap::new()))
    }

    pub fn new_file(name: impl Into<String>, permissions: Permissions) -> Entry {
        Self::with_kind(name, permissions, EntryKind::File(Vec::new()))
    }

    fn with_kind(name: impl Into<String>, permissions: Permissions, kind: EntryKind) -> Entry {
        let now = Utc::now();
        Entry {
            name: name.into(),
            permissions,
            created: now,
            modified: now,
            kind,
        }
    }

    pub fn entry_type(&self) -> EntryType {
        match self.kind {
            EntryKind::Directory(_) => EntryType::Directory,
            EntryKind::File(_) => EntryType::File,
        }
    }

    pub fn is_file(&self) -> bool {
        self.entry_type() == EntryType::File
    }

    pub fn is_dir(&self) -> bool {
        self.entry_type() == EntryType::Directory
    }

    pub fn children(&self) -> Option<&BTreeMap<String, NodeId>> {
        match &self.kind {
            EntryKind::Directory(children) => Some(children),
            EntryKind::File(_) => None,
        }
    }

    pub fn children_mut(&mut self) -> Option<&mut BTreeMap<String, NodeId>> {
        match &mut self.kind {
            EntryKind::Directory(children) => Some(children),
            EntryKind::File(_) => None,
        }
    }

    pub fn content(&self) -> Option<&Vec<u8>> {
        match &self.kind {
            EntryKind::File(content) => Some(content),
            EntryKind::Directory(_) => None,
        }
    }

    /// Replaces the file contents. No-op for directories.
    pub fn set_content(&mut self, content: &[u8]) {
        if let EntryKind::File(data) = &mut self.kind {
            data.clear();
            data.extend_from_slice(content);
            self.touch();
        }
    }

    /// Appends to the file contents. No-op for directories.
    pub fn append_content(&mut self, content: &[u8]) {
        if let EntryKind::File(data) = &mut self.kind {
            data.extend_from_slice(content);
            self.touch();
        }
    }

    /// Bytes for a file, number of children for a directory.
    pub fn len(&self) -> usize {
        match &self.kind {
            EntryKind::Directory(children) => children.len(),
            EntryKind::File(data) => data.len(),
        }
    }

    pub fn touch(&mut self) {
        self.modified = Utc::now();
    }

    pub fn metadata(&self) -> Metadata {
        Metadata {
            name: self.name.clone(),
            entry_type: self.entry_type(),
            permissions: self.permissions,
            created: self.created,
            modified: self.modified,
            len: self.len(),
        }
    }
}

/// Snapshot of a node's attributes, as returned by `stat()`.
#[derive(Debug, Clone, PartialEq)]
pub struct Metadata {
    pub name: String,
    pub entry_type: EntryType,
    pub permissions: Permissions,
    pub created: DateTime<Utc>,
    pub modified: DateTime<Utc>,
    /// Size in bytes for files, child count for directories.
    pub len: usize,
}

impl Metadata {
    pub fn is_file(&self) -> bool {
        self.entry_type == EntryType::File
    }

    pub fn is_dir(&self) -> bool {
        self.entry_type == EntryType::Directory
    }
}

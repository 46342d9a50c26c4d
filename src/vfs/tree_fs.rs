//! This module provides an in-memory namespace tree: directories own named children,
//! files own a byte buffer, and every operation resolves absolute paths by walking
//! down from the root.

use tracing::{debug, trace};

use crate::config::FsConfig;
use crate::core::{FsBackend, Result, utils};
use crate::error::FsError;
use crate::vfs::entry::{Entry, EntryKind, EntryType, Metadata, NodeId, Permissions};

/// Outcome of probing a path that may legitimately be absent.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) enum Lookup {
    Found(NodeId),
    Missing,
}

/// An in-memory virtual file system organised as a tree of nodes.
///
/// Nodes are stored in an arena and addressed by [`NodeId`]. A directory keeps a sorted
/// map from child name to child id; nothing points back to a parent, so every lookup
/// starts at the root and descends.
///
/// ### Invariants
///
/// 1. **Root existence**: the root is always live, is a directory and is named `/`.
/// 2. **Exclusive ownership**: every live node except the root is the child of exactly
///    one directory.
/// 3. **Name consistency**: a child's `name` equals its key in the parent's map; keys
///    are non-empty and contain no `/`.
/// 4. **Acyclicity**: no directory is its own descendant.
///
/// ### Paths
///
/// Paths are absolute and `/`-separated. Repeated and trailing separators are ignored,
/// `.` and `..` are plain names. There is no current working directory.
///
/// ### Thread Safety
///
/// `TreeFS` is a plain single-owner value. Wrap it in a [`SharedFS`](crate::SharedFS)
/// to share it between threads.
///
/// ### Example
///
/// ```
/// use tree_fs::{FsBackend, TreeFS};
///
/// let mut fs = TreeFS::new();
/// fs.mkdir("/docs").unwrap();
/// fs.write("/docs/note.txt", b"Hello").unwrap();
/// assert_eq!(fs.read("/docs/note.txt").unwrap(), b"Hello");
///
/// fs.cp("/docs", "/backup").unwrap();
/// fs.rm("/docs", true).unwrap();
/// assert!(fs.exists("/backup/note.txt"));
/// ```
#[derive(Debug, Clone)]
pub struct TreeFS {
    nodes: Vec<Option<Entry>>, // arena, `None` marks a released slot
    free: Vec<NodeId>,         // released slots, reused by `alloc()`
    root: NodeId,
    config: FsConfig,
}

impl Default for TreeFS {
    fn default() -> Self {
        Self::new()
    }
}

impl TreeFS {
    /// Creates new TreeFS instance holding only the root directory.
    pub fn new() -> Self {
        Self::with_config(FsConfig::default())
    }

    pub fn with_config(config: FsConfig) -> Self {
        let root = Entry::new_dir(utils::ROOT, config.dir_permissions());
        Self {
            nodes: vec![Some(root)],
            free: Vec::new(),
            root: NodeId(0),
            config,
        }
    }

    pub fn config(&self) -> &FsConfig {
        &self.config
    }

    /// Changes the config. Existing nodes keep their permissions.
    pub fn set_config(&mut self, config: FsConfig) {
        self.config = config;
    }

    /// Number of live nodes, root included.
    pub fn len(&self) -> usize {
        self.nodes.len() - self.free.len()
    }

    /// True if the tree holds nothing but the root.
    pub fn is_empty(&self) -> bool {
        self.len() == 1
    }

    /// Reads a file as text. Invalid UTF-8 sequences are replaced.
    pub fn cat<P: AsRef<str>>(&self, path: P) -> Result<String> {
        let content = self.read(path)?;
        Ok(String::from_utf8_lossy(&content).into_owned())
    }

    pub(crate) fn root_id(&self) -> NodeId {
        self.root
    }

    /// Panics on a released id. Ids obtained through resolution are always live.
    pub(crate) fn node(&self, id: NodeId) -> &Entry {
        match self.nodes.get(id.0) {
            Some(Some(entry)) => entry,
            _ => panic!("node {} is not live", id.0),
        }
    }

    fn node_mut(&mut self, id: NodeId) -> &mut Entry {
        match self.nodes.get_mut(id.0) {
            Some(Some(entry)) => entry,
            _ => panic!("node {} is not live", id.0),
        }
    }

    fn alloc(&mut self, entry: Entry) -> NodeId {
        match self.free.pop() {
            Some(id) => {
                self.nodes[id.0] = Some(entry);
                id
            }
            None => {
                self.nodes.push(Some(entry));
                NodeId(self.nodes.len() - 1)
            }
        }
    }

    /// Frees `id` and its whole subtree. The node must already be detached.
    fn release(&mut self, id: NodeId) {
        let mut pending = vec![id];
        while let Some(id) = pending.pop() {
            if let Some(entry) = self.nodes[id.0].take() {
                if let EntryKind::Directory(children) = entry.kind {
                    pending.extend(children.into_values());
                }
                self.free.push(id);
            }
        }
    }

    fn child(&self, dir: NodeId, name: &str) -> Option<NodeId> {
        self.node(dir)
            .children()
            .and_then(|children| children.get(name).copied())
    }

    /// Links `id` under `dir` as `name`, renaming the node to match.
    fn attach(&mut self, dir: NodeId, name: String, id: NodeId) {
        self.node_mut(id).name = name.clone();
        let parent = self.node_mut(dir);
        if let Some(children) = parent.children_mut() {
            children.insert(name, id);
            parent.touch();
        }
    }

    fn detach(&mut self, dir: NodeId, name: &str) -> Option<NodeId> {
        let parent = self.node_mut(dir);
        let removed = parent.children_mut().and_then(|children| children.remove(name));
        if removed.is_some() {
            parent.touch();
        }
        removed
    }

    fn prefix(segments: &[&str], count: usize) -> String {
        format!("{}{}", utils::ROOT, segments[..count].join("/"))
    }

    /// Descends from the root through `segments`, returning the last node reached.
    fn walk(&self, segments: &[&str]) -> Result<NodeId> {
        let mut current = self.root;
        for (depth, segment) in segments.iter().enumerate() {
            let Some(children) = self.node(current).children() else {
                return Err(FsError::NotADirectory(Self::prefix(segments, depth)));
            };
            current = match children.get(*segment) {
                Some(&id) => id,
                None => return Err(FsError::NotFound(Self::prefix(segments, depth + 1))),
            };
            trace!(segment, node = current.index(), "descend");
        }
        Ok(current)
    }

    /// Resolves the directory that holds (or would hold) `path`, plus the final name.
    /// The target itself does not have to exist.
    pub(crate) fn resolve_parent(&self, path: &str) -> Result<(NodeId, String)> {
        if !utils::is_absolute(path) {
            return Err(FsError::InvalidPath(path.to_string()));
        }
        let mut segments = utils::split_path(path);
        let Some(name) = segments.pop() else {
            return Err(FsError::InvalidPath(path.to_string()));
        };
        let parent = self.walk(&segments)?;
        if !self.node(parent).is_dir() {
            return Err(FsError::NotADirectory(Self::prefix(
                &segments,
                segments.len(),
            )));
        }
        Ok((parent, name.to_string()))
    }

    /// Resolves `path` to an existing node.
    pub(crate) fn resolve_node(&self, path: &str) -> Result<NodeId> {
        if path == utils::ROOT {
            return Ok(self.root);
        }
        if !utils::is_absolute(path) {
            return Err(FsError::InvalidPath(path.to_string()));
        }
        self.walk(&utils::split_path(path))
    }

    /// Like `resolve_node()`, but a missing node is an outcome rather than an error.
    /// Structural failures (bad path, file used as directory) still propagate.
    pub(crate) fn lookup(&self, path: &str) -> Result<Lookup> {
        match self.resolve_node(path) {
            Ok(id) => Ok(Lookup::Found(id)),
            Err(FsError::NotFound(_)) => Ok(Lookup::Missing),
            Err(e) => Err(e),
        }
    }

    fn create(&mut self, path: &str, entry_type: EntryType) -> Result<NodeId> {
        let (parent, name) = self.resolve_parent(path)?;
        if self.child(parent, &name).is_some() {
            return Err(FsError::AlreadyExists(path.to_string()));
        }
        let entry = match entry_type {
            EntryType::Directory => Entry::new_dir(name.as_str(), self.config.dir_permissions()),
            EntryType::File => Entry::new_file(name.as_str(), self.config.file_permissions()),
        };
        let id = self.alloc(entry);
        self.attach(parent, name, id);
        Ok(id)
    }

    /// Resolves `path` to an existing file, or creates an empty one if nothing is there.
    fn file_for_update(&mut self, path: &str) -> Result<NodeId> {
        let id = match self.lookup(path)? {
            Lookup::Found(id) => id,
            Lookup::Missing => self.create(path, EntryType::File)?,
        };
        if self.node(id).is_dir() {
            return Err(FsError::IsADirectory(path.to_string()));
        }
        Ok(id)
    }

    /// A detached duplicate of one node: same name and metadata, independent buffer,
    /// no children.
    fn shallow_clone(&self, id: NodeId) -> Entry {
        let source = self.node(id);
        let kind = match &source.kind {
            EntryKind::Directory(_) => EntryKind::Directory(Default::default()),
            EntryKind::File(data) => EntryKind::File(data.clone()),
        };
        Entry {
            name: source.name.clone(),
            permissions: source.permissions,
            created: source.created,
            modified: source.modified,
            kind,
        }
    }

    /// Duplicates the subtree under `src` into fresh, detached nodes.
    /// The copy is complete before the caller attaches it anywhere.
    fn deep_copy(&mut self, src: NodeId) -> NodeId {
        let root_copy = self.shallow_clone(src);
        let copy = self.alloc(root_copy);
        let mut pending = vec![(src, copy)];
        while let Some((from, to)) = pending.pop() {
            let children: Vec<(String, NodeId)> = match self.node(from).children() {
                Some(children) => children.iter().map(|(n, &id)| (n.clone(), id)).collect(),
                None => continue,
            };
            for (name, child) in children {
                let child_entry = self.shallow_clone(child);
                let child_copy = self.alloc(child_entry);
                // inserted directly: the copy keeps the source's `modified`
                if let Some(map) = self.node_mut(to).children_mut() {
                    map.insert(name, child_copy);
                }
                pending.push((child, child_copy));
            }
        }
        copy
    }

    /// True if `candidate` lies somewhere below `ancestor`.
    fn is_within(&self, ancestor: NodeId, candidate: NodeId) -> bool {
        let mut pending = vec![ancestor];
        while let Some(id) = pending.pop() {
            if let Some(children) = self.node(id).children() {
                for &child in children.values() {
                    if child == candidate {
                        return true;
                    }
                    pending.push(child);
                }
            }
        }
        false
    }
}

impl FsBackend for TreeFS {
    /// Checks if a `path` exists in the VFS.
    fn exists<P: AsRef<str>>(&self, path: P) -> bool {
        self.resolve_node(path.as_ref()).is_ok()
    }

    /// Checks if `path` is a directory. An error is returned if it does not resolve.
    fn is_dir<P: AsRef<str>>(&self, path: P) -> Result<bool> {
        let id = self.resolve_node(path.as_ref())?;
        Ok(self.node(id).is_dir())
    }

    /// Checks if `path` is a regular file. An error is returned if it does not resolve.
    fn is_file<P: AsRef<str>>(&self, path: P) -> Result<bool> {
        let id = self.resolve_node(path.as_ref())?;
        Ok(self.node(id).is_file())
    }

    /// Lists the immediate children of a directory (shallow listing).
    ///
    /// # Returns
    /// * `Ok(Vec<String>)` - child names in ascending lexicographic order; for a file,
    ///   a single element holding the file's own name.
    /// * `Err(FsError)` - if `path` does not resolve.
    ///
    /// # Example:
    ///```
    /// # use tree_fs::{FsBackend, TreeFS};
    /// let mut fs = TreeFS::new();
    /// fs.mkdir("/d").unwrap();
    /// fs.mkfile("/d/b").unwrap();
    /// fs.mkfile("/d/a").unwrap();
    /// assert_eq!(fs.ls("/d").unwrap(), ["a", "b"]);
    /// assert_eq!(fs.ls("/d/a").unwrap(), ["a"]);
    /// ```
    fn ls<P: AsRef<str>>(&self, path: P) -> Result<Vec<String>> {
        let entry = self.node(self.resolve_node(path.as_ref())?);
        Ok(match entry.children() {
            Some(children) => children.keys().cloned().collect(),
            None => vec![entry.name.clone()],
        })
    }

    fn stat<P: AsRef<str>>(&self, path: P) -> Result<Metadata> {
        let id = self.resolve_node(path.as_ref())?;
        Ok(self.node(id).metadata())
    }

    /// Creates a directory. Parents are not created.
    ///
    /// # Returns
    /// * `Err(FsError)` - if the path is invalid or names the root, if the parent is
    ///   missing or is a file, or if the name is already taken.
    fn mkdir<P: AsRef<str>>(&mut self, path: P) -> Result<()> {
        let path = path.as_ref();
        self.create(path, EntryType::Directory)?;
        debug!(path, "mkdir");
        Ok(())
    }

    /// Creates an empty file. Parents are not created.
    fn mkfile<P: AsRef<str>>(&mut self, path: P) -> Result<()> {
        let path = path.as_ref();
        self.create(path, EntryType::File)?;
        debug!(path, "mkfile");
        Ok(())
    }

    /// Reads the entire contents of a file into a byte vector.
    ///
    /// # Returns
    /// * `Ok(Vec<u8>)` - File content; empty for empty files.
    /// * `Err(FsError)` - If the file does not exist or `path` points to a directory.
    ///
    /// Timestamps are left untouched.
    fn read<P: AsRef<str>>(&self, path: P) -> Result<Vec<u8>> {
        let path = path.as_ref();
        let entry = self.node(self.resolve_node(path)?);
        match entry.content() {
            Some(content) => Ok(content.clone()),
            None => Err(FsError::IsADirectory(path.to_string())),
        }
    }

    /// Writes bytes to a file, replacing its entire contents.
    ///
    /// # Behavior
    /// - **Overwrites completely**: The entire existing content is replaced.
    /// - **Creates missing files**: if nothing exists at `path`, a new file is created in
    ///   the existing parent directory. A missing parent is still an error.
    /// - **Never touches directories**: `path` naming a directory is an error.
    fn write<P: AsRef<str>, C: AsRef<[u8]>>(&mut self, path: P, content: C) -> Result<()> {
        let (path, content) = (path.as_ref(), content.as_ref());
        let id = self.file_for_update(path)?;
        self.node_mut(id).set_content(content);
        debug!(path, bytes = content.len(), "write");
        Ok(())
    }

    /// Appends bytes to the end of a file, preserving its old contents.
    ///
    /// # Behavior
    /// - **Appends only**: Existing content is preserved; new bytes are added at the end.
    /// - **File creation**: a missing file is created empty first, then appended to.
    fn append<P: AsRef<str>, C: AsRef<[u8]>>(&mut self, path: P, content: C) -> Result<()> {
        let (path, content) = (path.as_ref(), content.as_ref());
        let id = self.file_for_update(path)?;
        self.node_mut(id).append_content(content);
        debug!(path, bytes = content.len(), "append");
        Ok(())
    }

    /// Replaces the stored permissions. They are metadata only and never enforced.
    fn chmod<P: AsRef<str>>(&mut self, path: P, permissions: Permissions) -> Result<()> {
        let path = path.as_ref();
        let id = self.resolve_node(path)?;
        self.node_mut(id).permissions = permissions;
        debug!(path, mode = %permissions.octal(), "chmod");
        Ok(())
    }

    /// Removes a file or directory at the specified path.
    ///
    /// A non-empty directory is removed only when `recursive` is set; its whole subtree
    /// goes with it.
    ///
    /// Returns:
    /// - `Ok(())` on successful removal.
    /// - `Err(_)` if `path` is the root, does not exist, or is a non-empty directory
    ///   and `recursive` is false.
    fn rm<P: AsRef<str>>(&mut self, path: P, recursive: bool) -> Result<()> {
        let path = path.as_ref();
        if utils::is_virtual_root(path) {
            return Err(FsError::CannotRemoveRoot);
        }

        let (parent, name) = self.resolve_parent(path)?;
        let Some(id) = self.child(parent, &name) else {
            return Err(FsError::NotFound(path.to_string()));
        };

        let entry = self.node(id);
        if entry.is_dir() && entry.len() > 0 && !recursive {
            return Err(FsError::DirectoryNotEmpty(path.to_string()));
        }

        self.detach(parent, &name);
        self.release(id);
        debug!(path, recursive, "rm");
        Ok(())
    }

    /// Moves (relinks) the node at `src`. Data is never copied.
    ///
    /// # Behavior
    /// - `dest` is a directory: `src` goes inside it under its own basename; a child
    ///   with that name already there is an error.
    /// - `dest` is a file: that file is replaced by `src`, which takes its name.
    /// - `dest` does not exist: `src` is relinked into `dest`'s parent under `dest`'s
    ///   basename.
    ///
    /// The moved node keeps its metadata; only the old and new parent are stamped.
    /// Moving a directory into itself or one of its descendants is an error.
    fn mv<S: AsRef<str>, D: AsRef<str>>(&mut self, src: S, dest: D) -> Result<()> {
        let (src, dest) = (src.as_ref(), dest.as_ref());
        if utils::is_virtual_root(src) {
            return Err(FsError::CannotMoveRoot);
        }

        let (src_parent, src_name) = self.resolve_parent(src)?;
        let Some(src_id) = self.child(src_parent, &src_name) else {
            return Err(FsError::NotFound(src.to_string()));
        };

        let (target_dir, target_name, replaced) = match self.lookup(dest)? {
            Lookup::Found(id) if id == src_id && self.node(id).is_file() => {
                // a file moved onto itself
                return Ok(());
            }
            Lookup::Found(id) if self.node(id).is_dir() => {
                if self.child(id, &src_name).is_some() {
                    return Err(FsError::AlreadyExists(format!(
                        "{}/{}",
                        dest.trim_end_matches(utils::SEPARATOR),
                        src_name
                    )));
                }
                (id, src_name.clone(), None)
            }
            Lookup::Found(id) => {
                let (parent, name) = self.resolve_parent(dest)?;
                (parent, name, Some(id))
            }
            Lookup::Missing => {
                let (parent, name) = self.resolve_parent(dest)?;
                if self.child(parent, &name).is_some() {
                    return Err(FsError::AlreadyExists(dest.to_string()));
                }
                (parent, name, None)
            }
        };

        let into_self = target_dir == src_id || self.is_within(src_id, target_dir);
        if self.node(src_id).is_dir() && into_self {
            return Err(FsError::MoveIntoSelf {
                from: src.to_string(),
                to: dest.to_string(),
            });
        }

        if let Some(old) = replaced {
            self.detach(target_dir, &target_name);
            self.release(old);
        }
        self.detach(src_parent, &src_name);
        self.attach(target_dir, target_name, src_id);
        debug!(src, dest, replaced = replaced.is_some(), "mv");
        Ok(())
    }

    /// Copies the node at `src`, recursively for directories.
    ///
    /// # Behavior
    /// - `dest` is a directory: the copy goes inside it under `src`'s basename; a child
    ///   with that name already there is an error.
    /// - `dest` is a file: error, copy never overwrites.
    /// - `dest` does not exist: the copy is created in `dest`'s parent under `dest`'s
    ///   basename.
    ///
    /// The copy shares nothing with the source; permissions and timestamps are carried
    /// over as they are at the moment of the call.
    fn cp<S: AsRef<str>, D: AsRef<str>>(&mut self, src: S, dest: D) -> Result<()> {
        let (src, dest) = (src.as_ref(), dest.as_ref());
        let src_id = self.resolve_node(src)?;

        let (target_dir, target_name) = match self.lookup(dest)? {
            Lookup::Found(id) if self.node(id).is_dir() => {
                let Some(name) = utils::basename(src) else {
                    // the root has no basename to copy under
                    return Err(FsError::InvalidPath(src.to_string()));
                };
                if self.child(id, name).is_some() {
                    return Err(FsError::AlreadyExists(format!(
                        "{}/{}",
                        dest.trim_end_matches(utils::SEPARATOR),
                        name
                    )));
                }
                (id, name.to_string())
            }
            Lookup::Found(_) => return Err(FsError::DestinationExists(dest.to_string())),
            Lookup::Missing => {
                let (parent, name) = self.resolve_parent(dest)?;
                if self.child(parent, &name).is_some() {
                    return Err(FsError::DestinationExists(dest.to_string()));
                }
                (parent, name)
            }
        };

        let copy = self.deep_copy(src_id);
        self.attach(target_dir, target_name, copy);
        debug!(src, dest, "cp");
        Ok(())
    }

    /// Removes all artifacts (dirs and files) in vfs, but preserve its root.
    /// Returns true if anything was removed.
    fn cleanup(&mut self) -> bool {
        let root = self.root;
        let children: Vec<NodeId> = match self.node_mut(root).children_mut() {
            Some(children) => std::mem::take(children).into_values().collect(),
            None => Vec::new(),
        };
        if children.is_empty() {
            return false;
        }
        for id in children {
            self.release(id);
        }
        self.node_mut(root).touch();
        debug!("cleanup");
        true
    }
}

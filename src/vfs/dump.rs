//! Textual rendering of a `TreeFS`.
//!
//! ```text
//! 📁 /
//!   📁 docs
//!     📄 note.txt (5 bytes)
//! ```

use std::fmt;

use crate::core::Result;
use crate::vfs::entry::{EntryKind, NodeId};
use crate::vfs::tree_fs::TreeFS;

const DIR_GLYPH: &str = "📁";
const FILE_GLYPH: &str = "📄";
const INDENT: &str = "  ";

/// The subtree below one node, rendered through `Display`.
struct Subtree<'a> {
    fs: &'a TreeFS,
    id: NodeId,
}

impl fmt::Display for Subtree<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut pending = vec![(self.id, 0usize)];
        while let Some((id, depth)) = pending.pop() {
            let entry = self.fs.node(id);
            let indent = INDENT.repeat(depth);
            match &entry.kind {
                EntryKind::Directory(children) => {
                    writeln!(f, "{indent}{DIR_GLYPH} {}", entry.name)?;
                    pending.extend(children.values().rev().map(|&child| (child, depth + 1)));
                }
                EntryKind::File(data) => {
                    writeln!(f, "{indent}{FILE_GLYPH} {} ({} bytes)", entry.name, data.len())?;
                }
            }
        }
        Ok(())
    }
}

impl TreeFS {
    /// Renders the subtree at `path`, one line per node, children in sorted order.
    pub fn tree<P: AsRef<str>>(&self, path: P) -> Result<String> {
        let id = self.resolve_node(path.as_ref())?;
        Ok(Subtree { fs: self, id }.to_string())
    }
}

impl fmt::Display for TreeFS {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let root = Subtree {
            fs: self,
            id: self.root_id(),
        };
        fmt::Display::fmt(&root, f)
    }
}

#[cfg(test)]
mod tests {
    use crate::{FsBackend, TreeFS};

    #[test]
    fn test_tree_root() -> anyhow::Result<()> {
        let mut fs = TreeFS::new();
        fs.mkdir("/docs")?;
        fs.write("/docs/note.txt", "Hello")?;
        fs.mkdir("/docs/archive")?;
        fs.mkfile("/a.txt")?;

        let expected = "\
📁 /
  📄 a.txt (0 bytes)
  📁 docs
    📁 archive
    📄 note.txt (5 bytes)
";
        assert_eq!(fs.tree("/")?, expected);
        assert_eq!(fs.to_string(), expected);
        Ok(())
    }

    #[test]
    fn test_tree_subtree_and_file() -> anyhow::Result<()> {
        let mut fs = TreeFS::new();
        fs.mkdir("/docs")?;
        fs.write("/docs/note.txt", "Hello")?;

        assert_eq!(fs.tree("/docs")?, "📁 docs\n  📄 note.txt (5 bytes)\n");
        assert_eq!(fs.tree("/docs/note.txt")?, "📄 note.txt (5 bytes)\n");
        assert!(fs.tree("/missing").is_err());
        Ok(())
    }

    #[test]
    fn test_tree_nested_path_starts_unindented() -> anyhow::Result<()> {
        let mut fs = TreeFS::new();
        fs.mkdir("/a")?;
        fs.mkdir("/a/b")?;
        fs.mkdir("/a/b/c")?;
        fs.write("/a/b/c/deep.bin", [1u8, 2, 3])?;
        fs.mkfile("/a/b/z")?;

        let expected = "\
📁 b
  📁 c
    📄 deep.bin (3 bytes)
  📄 z (0 bytes)
";
        assert_eq!(fs.tree("/a/b/")?, expected);
        assert!(fs.to_string().contains("\n        📄 deep.bin (3 bytes)\n"));
        Ok(())
    }

    #[test]
    fn test_tree_empty() {
        assert_eq!(TreeFS::new().to_string(), "📁 /\n");
    }
}

//! Source tree discovery by filesystem walking.
//!
//! The scanner only identifies files; content is read later by the loader.
//! Entries are sorted by name so every consumer sees a deterministic order.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::SiteError;

/// A directory in the source tree.
#[derive(Debug, Default)]
pub(crate) struct DirNode {
    /// Directory path relative to the source root ("" for the root).
    pub rel: String,
    /// Markdown file names directly in this directory, `index.md` first.
    pub markdown: Vec<String>,
    /// Subdirectories, sorted by name.
    pub dirs: Vec<DirNode>,
}

impl DirNode {
    /// Directory name (last path segment).
    pub fn name(&self) -> &str {
        self.rel.rsplit('/').next().unwrap_or_default()
    }

    /// Relative source path of a file in this directory.
    pub fn child_path(&self, name: &str) -> String {
        join_rel(&self.rel, name)
    }

    /// Whether this directory or any subdirectory holds markdown.
    pub fn has_markdown(&self) -> bool {
        !self.markdown.is_empty() || self.dirs.iter().any(DirNode::has_markdown)
    }

    /// Visit every markdown source path in depth-first order.
    pub fn markdown_sources(&self, out: &mut Vec<String>) {
        out.extend(self.markdown.iter().map(|name| self.child_path(name)));
        for dir in &self.dirs {
            dir.markdown_sources(out);
        }
    }
}

/// Result of scanning the source directory.
#[derive(Debug, Default)]
pub(crate) struct ScanResult {
    /// Directory tree holding markdown files.
    pub root: DirNode,
    /// Non-markdown files (relative paths), sorted.
    pub assets: Vec<String>,
}

/// Walks the source directory.
pub(crate) struct Scanner {
    source_dir: PathBuf,
}

impl Scanner {
    pub fn new(source_dir: PathBuf) -> Self {
        Self { source_dir }
    }

    /// Scan the filesystem.
    ///
    /// Returns an empty result if the source directory doesn't exist.
    pub fn scan(&self) -> Result<ScanResult, SiteError> {
        let mut result = ScanResult::default();
        if self.source_dir.is_dir() {
            result.root = self.scan_directory(&self.source_dir, "", &mut result.assets)?;
        }
        result.assets.sort();
        Ok(result)
    }

    fn scan_directory(
        &self,
        dir_path: &Path,
        rel: &str,
        assets: &mut Vec<String>,
    ) -> Result<DirNode, SiteError> {
        let io_err = |source| SiteError::Io {
            path: dir_path.to_path_buf(),
            source,
        };

        let mut entries = Vec::new();
        for entry in fs::read_dir(dir_path).map_err(io_err)? {
            let entry = entry.map_err(io_err)?;
            let name = entry.file_name().to_string_lossy().into_owned();
            // Skip hidden files/dirs
            if name.starts_with('.') {
                continue;
            }
            let is_dir = entry.file_type().map_err(io_err)?.is_dir();
            entries.push((name, is_dir));
        }
        entries.sort();

        let mut node = DirNode {
            rel: rel.to_owned(),
            ..DirNode::default()
        };

        for (name, is_dir) in entries {
            let child_rel = join_rel(rel, &name);
            if is_dir {
                let child = self.scan_directory(&dir_path.join(&name), &child_rel, assets)?;
                if child.has_markdown() || !child.dirs.is_empty() {
                    node.dirs.push(child);
                }
            } else if is_markdown(&name) {
                node.markdown.push(name);
            } else {
                assets.push(child_rel);
            }
        }

        // index.md leads its directory
        if let Some(pos) = node.markdown.iter().position(|n| n == "index.md") {
            let index = node.markdown.remove(pos);
            node.markdown.insert(0, index);
        }

        Ok(node)
    }
}

fn is_markdown(name: &str) -> bool {
    Path::new(name).extension().is_some_and(|e| e == "md")
}

fn join_rel(base: &str, name: &str) -> String {
    if base.is_empty() {
        name.to_owned()
    } else {
        format!("{base}/{name}")
    }
}

/// Convert a relative markdown source path to its logical path.
///
/// - `index.md` -> `""`
/// - `guide.md` -> `"guide"`
/// - `patterns/index.md` -> `"patterns"`
/// - `patterns/outbox.md` -> `"patterns/outbox"`
pub(crate) fn source_to_logical(source: &str) -> String {
    let without_ext = source.strip_suffix(".md").unwrap_or(source);
    if without_ext == "index" {
        String::new()
    } else if let Some(dir) = without_ext.strip_suffix("/index") {
        dir.to_owned()
    } else {
        without_ext.to_owned()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_source_to_logical() {
        assert_eq!(source_to_logical("index.md"), "");
        assert_eq!(source_to_logical("guide.md"), "guide");
        assert_eq!(source_to_logical("patterns/index.md"), "patterns");
        assert_eq!(source_to_logical("patterns/outbox.md"), "patterns/outbox");
        assert_eq!(source_to_logical("a/b/c.md"), "a/b/c");
    }

    #[test]
    fn test_scan_missing_directory() {
        let scanner = Scanner::new(PathBuf::from("/nonexistent/tome/docs"));
        let result = scanner.scan().unwrap();
        assert!(result.root.markdown.is_empty());
        assert!(result.assets.is_empty());
    }

    #[test]
    fn test_scan_sorted_with_index_first() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "zeta.md", "");
        write(dir.path(), "alpha.md", "");
        write(dir.path(), "index.md", "");
        write(dir.path(), "patterns/saga.md", "");
        write(dir.path(), "patterns/index.md", "");
        write(dir.path(), "patterns/img/flow.png", "png");
        write(dir.path(), ".hidden/secret.md", "");
        write(dir.path(), "styles.css", "");

        let result = Scanner::new(dir.path().to_path_buf()).scan().unwrap();

        assert_eq!(result.root.markdown, vec!["index.md", "alpha.md", "zeta.md"]);
        assert_eq!(result.root.dirs.len(), 1);
        let patterns = &result.root.dirs[0];
        assert_eq!(patterns.name(), "patterns");
        assert_eq!(patterns.markdown, vec!["index.md", "saga.md"]);
        assert_eq!(result.assets, vec!["patterns/img/flow.png", "styles.css"]);

        let mut sources = Vec::new();
        result.root.markdown_sources(&mut sources);
        assert_eq!(
            sources,
            vec![
                "index.md",
                "alpha.md",
                "zeta.md",
                "patterns/index.md",
                "patterns/saga.md"
            ]
        );
    }
}

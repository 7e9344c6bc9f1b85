use std::path::PathBuf;

/// A single staged directory or file, relative to the destination root.
#[derive(Debug, Clone)]
pub struct VirtualEntry {
    /// Path relative to the destination root; empty for the root itself.
    pub path: PathBuf,
    /// Rendered contents when the entry is a file.
    pub content: Option<String>,
    /// Whether the entry is a file (`true`) or a directory (`false`).
    pub is_file: bool,
}

/// The whole rendered tree staged in memory before anything touches disk.
///
/// Directories always precede the files they contain, so applying the
/// entries in order never writes into a directory that does not exist yet.
#[derive(Debug, Clone, Default)]
pub struct VirtualFS {
    pub entries: Vec<VirtualEntry>,
}
impl VirtualFS {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_dir(&mut self, path: PathBuf) {
        self.entries.push(VirtualEntry {
            path,
            content: None,
            is_file: false,
        });
    }

    pub fn push_file(&mut self, path: PathBuf, content: String) {
        self.entries.push(VirtualEntry {
            path,
            content: Some(content),
            is_file: true,
        });
    }

    pub fn files(&self) -> impl Iterator<Item = &VirtualEntry> {
        self.entries.iter().filter(|entry| entry.is_file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directories_precede_their_files() {
        let mut vfs = VirtualFS::new();
        vfs.push_dir("apps".into());
        vfs.push_file("apps/a.yaml".into(), "kind: Service\n".into());

        let dir_index = vfs.entries.iter().position(|e| !e.is_file).unwrap();
        let file_index = vfs.entries.iter().position(|e| e.is_file).unwrap();

        assert!(dir_index < file_index);
    }
}

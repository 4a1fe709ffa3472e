//! Mock Filesystem Implementation for Tests
//!
//! Provides a simple in-memory filesystem so the note store and session
//! flows can be exercised without real hardware.

extern crate alloc;

use alloc::collections::BTreeMap;
use alloc::string::{String, ToString};
use alloc::vec::Vec;

use crate::filesystem::{FileInfo, FileSystem, FileSystemError};

/// In-memory file entry
#[derive(Clone)]
enum MockEntry {
    File { content: String },
    Directory { children: Vec<String> },
}

/// Mock filesystem for tests and simulators
pub struct MockFileSystem {
    files: BTreeMap<String, MockEntry>,
    fail_listing: bool,
    fail_writes: bool,
}

impl MockFileSystem {
    /// Create empty mock filesystem with a root directory
    pub fn new() -> Self {
        let mut fs = Self {
            files: BTreeMap::new(),
            fail_listing: false,
            fail_writes: false,
        };
        fs.add_directory("/");
        fs
    }

    /// Add a file to the mock filesystem
    pub fn add_file(&mut self, path: &str, content: &str) {
        self.files.insert(
            path.to_string(),
            MockEntry::File {
                content: content.to_string(),
            },
        );
        self.link_to_parent(path);
    }

    /// Add a directory to the mock filesystem
    pub fn add_directory(&mut self, path: &str) {
        self.files.insert(
            path.to_string(),
            MockEntry::Directory {
                children: Vec::new(),
            },
        );
        if path != "/" {
            self.link_to_parent(path);
        }
    }

    /// Simulate a transient directory-listing failure
    pub fn set_fail_listing(&mut self, fail: bool) {
        self.fail_listing = fail;
    }

    /// Simulate write/rename/remove failures (unmounted card)
    pub fn set_fail_writes(&mut self, fail: bool) {
        self.fail_writes = fail;
    }

    /// Raw file content, for assertions
    pub fn file_content(&self, path: &str) -> Option<&str> {
        match self.files.get(path) {
            Some(MockEntry::File { content }) => Some(content),
            _ => None,
        }
    }

    fn link_to_parent(&mut self, path: &str) {
        let parent = crate::filesystem::dirname(path).to_string();
        let name = crate::filesystem::basename(path).to_string();
        if let Some(MockEntry::Directory { children }) = self.files.get_mut(parent.as_str()) {
            if !children.contains(&name) {
                children.push(name);
            }
        }
    }

    fn unlink_from_parent(&mut self, path: &str) {
        let parent = crate::filesystem::dirname(path).to_string();
        let name = crate::filesystem::basename(path).to_string();
        if let Some(MockEntry::Directory { children }) = self.files.get_mut(parent.as_str()) {
            children.retain(|child| *child != name);
        }
    }
}

impl Default for MockFileSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl FileSystem for MockFileSystem {
    fn list_files(&mut self, path: &str) -> Result<Vec<FileInfo>, FileSystemError> {
        if self.fail_listing {
            return Err(FileSystemError::IoError("Injected listing failure".to_string()));
        }

        match self.files.get(path) {
            Some(MockEntry::Directory { children }) => {
                let mut files = Vec::new();
                for child_name in children {
                    let child_path = crate::filesystem::join_path(path, child_name);
                    if let Some(entry) = self.files.get(&child_path) {
                        let (size, is_directory) = match entry {
                            MockEntry::File { content } => (content.len() as u64, false),
                            MockEntry::Directory { .. } => (0, true),
                        };
                        files.push(FileInfo {
                            name: child_name.clone(),
                            size,
                            is_directory,
                        });
                    }
                }
                Ok(files)
            }
            Some(MockEntry::File { .. }) => {
                Err(FileSystemError::IoError("Not a directory".to_string()))
            }
            None => Err(FileSystemError::NotFound),
        }
    }

    fn read_file(&mut self, path: &str) -> Result<String, FileSystemError> {
        match self.files.get(path) {
            Some(MockEntry::File { content }) => Ok(content.clone()),
            Some(MockEntry::Directory { .. }) => {
                Err(FileSystemError::IoError("Is a directory".to_string()))
            }
            None => Err(FileSystemError::NotFound),
        }
    }

    fn read_file_prefix(&mut self, path: &str, max_len: usize) -> Result<String, FileSystemError> {
        let content = self.read_file(path)?;
        if content.len() <= max_len {
            return Ok(content);
        }
        Ok(String::from_utf8_lossy(&content.as_bytes()[..max_len]).into_owned())
    }

    fn write_file(&mut self, path: &str, contents: &str) -> Result<(), FileSystemError> {
        if self.fail_writes {
            return Err(FileSystemError::Unavailable);
        }
        self.add_file(path, contents);
        Ok(())
    }

    fn rename(&mut self, from: &str, to: &str) -> Result<(), FileSystemError> {
        if self.fail_writes {
            return Err(FileSystemError::Unavailable);
        }
        // Models the host behavior: rename replaces an existing target.
        let entry = self.files.remove(from).ok_or(FileSystemError::NotFound)?;
        self.unlink_from_parent(from);
        self.files.insert(to.to_string(), entry);
        self.link_to_parent(to);
        Ok(())
    }

    fn remove_file(&mut self, path: &str) -> Result<(), FileSystemError> {
        if self.fail_writes {
            return Err(FileSystemError::Unavailable);
        }
        match self.files.remove(path) {
            Some(_) => {
                self.unlink_from_parent(path);
                Ok(())
            }
            None => Err(FileSystemError::NotFound),
        }
    }

    fn make_dir(&mut self, path: &str) -> Result<(), FileSystemError> {
        if self.fail_writes {
            return Err(FileSystemError::Unavailable);
        }
        if self.files.contains_key(path) {
            return Err(FileSystemError::AlreadyExists);
        }
        self.add_directory(path);
        Ok(())
    }

    fn exists(&mut self, path: &str) -> bool {
        self.files.contains_key(path)
    }

    fn file_info(&mut self, path: &str) -> Result<FileInfo, FileSystemError> {
        let name = crate::filesystem::basename(path).to_string();
        match self.files.get(path) {
            Some(MockEntry::File { content }) => Ok(FileInfo {
                name,
                size: content.len() as u64,
                is_directory: false,
            }),
            Some(MockEntry::Directory { .. }) => Ok(FileInfo {
                name,
                size: 0,
                is_directory: true,
            }),
            None => Err(FileSystemError::NotFound),
        }
    }
}

//! Filesystem abstraction for the note store.
//! Backed by the SD card on hardware and by an in-memory mock in tests.

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

/// A file entry in the filesystem
#[derive(Debug, Clone)]
pub struct FileInfo {
    pub name: String,
    pub size: u64,
    pub is_directory: bool,
}

/// Filesystem error types
#[derive(Debug, Clone)]
pub enum FileSystemError {
    NotFound,
    /// The backing store never mounted or has gone away.
    Unavailable,
    AlreadyExists,
    IoError(String),
    NotSupported,
}

impl core::fmt::Display for FileSystemError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            FileSystemError::NotFound => write!(f, "File not found"),
            FileSystemError::Unavailable => write!(f, "Storage unavailable"),
            FileSystemError::AlreadyExists => write!(f, "File already exists"),
            FileSystemError::IoError(msg) => write!(f, "IO error: {}", msg),
            FileSystemError::NotSupported => write!(f, "Operation not supported"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for FileSystemError {}

/// Trait for filesystem operations
///
/// Implementations:
/// - `SdCardFs` in the firmware crate (real SD card)
/// - `MockFileSystem` for tests and simulators
pub trait FileSystem {
    /// List entries in a directory (non-recursive)
    fn list_files(&mut self, path: &str) -> Result<Vec<FileInfo>, FileSystemError>;

    /// Read entire file as a string
    fn read_file(&mut self, path: &str) -> Result<String, FileSystemError>;

    /// Read at most `max_len` leading bytes of a file as a string.
    ///
    /// A byte cut that lands inside a multi-byte sequence is replaced
    /// lossily; callers use this for head-of-file probes only.
    fn read_file_prefix(&mut self, path: &str, max_len: usize) -> Result<String, FileSystemError>;

    /// Create or truncate a file with the given contents
    fn write_file(&mut self, path: &str, contents: &str) -> Result<(), FileSystemError>;

    /// Rename a file. May fail if the target exists (FAT does not allow
    /// renaming over an existing entry).
    fn rename(&mut self, from: &str, to: &str) -> Result<(), FileSystemError>;

    /// Remove a file
    fn remove_file(&mut self, path: &str) -> Result<(), FileSystemError>;

    /// Create a directory
    fn make_dir(&mut self, path: &str) -> Result<(), FileSystemError>;

    /// Check if a path exists
    fn exists(&mut self, path: &str) -> bool;

    /// Get file info
    fn file_info(&mut self, path: &str) -> Result<FileInfo, FileSystemError>;
}

/// Get filename without path
pub fn basename(path: &str) -> &str {
    path.rfind('/').map(|i| &path[i + 1..]).unwrap_or(path)
}

/// Get parent directory
pub fn dirname(path: &str) -> &str {
    match path.rfind('/') {
        Some(0) => "/",
        Some(i) => &path[..i],
        None => ".",
    }
}

/// Join paths
pub fn join_path(base: &str, name: &str) -> String {
    if base.ends_with('/') {
        format!("{}{}", base, name)
    } else {
        format!("{}/{}", base, name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basename() {
        assert_eq!(basename("/notes/note.txt"), "note.txt");
        assert_eq!(basename("note.txt"), "note.txt");
        assert_eq!(basename("/"), "");
    }

    #[test]
    fn test_dirname() {
        assert_eq!(dirname("/notes/note.txt"), "/notes");
        assert_eq!(dirname("/note.txt"), "/");
        assert_eq!(dirname("note.txt"), ".");
    }

    #[test]
    fn test_join_path() {
        assert_eq!(join_path("/notes", "note.txt"), "/notes/note.txt");
        assert_eq!(join_path("/notes/", "note.txt"), "/notes/note.txt");
    }
}

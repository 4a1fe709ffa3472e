//! Open-note buffer.
//!
//! The cursor and line-wrap model live in the editing subsystem; this is
//! the narrow surface the session coordinator needs: content, the file it
//! belongs to, its title, and a dirty flag.

use alloc::string::String;

use crate::note_store::UNTITLED;

/// Capacity of the note content buffer. Content beyond this is truncated
/// on load; the cut is lossy and intentional.
pub const TEXT_BUFFER_CAP: usize = 8 * 1024;

/// The currently open note.
pub struct EditorBuffer {
    content: String,
    filename: String,
    title: String,
    dirty: bool,
}

impl EditorBuffer {
    pub fn new() -> Self {
        Self {
            content: String::new(),
            filename: String::new(),
            title: String::from(UNTITLED),
            dirty: false,
        }
    }

    /// Reset to an empty, unnamed note.
    pub fn clear(&mut self) {
        self.content.clear();
        self.filename.clear();
        self.title.clear();
        self.title.push_str(UNTITLED);
        self.dirty = false;
    }

    /// Replace the content, truncating at the buffer capacity on a char
    /// boundary.
    pub fn set_content(&mut self, content: &str) {
        self.content.clear();
        if content.len() <= TEXT_BUFFER_CAP {
            self.content.push_str(content);
            return;
        }
        let mut cut = TEXT_BUFFER_CAP;
        while cut > 0 && !content.is_char_boundary(cut) {
            cut -= 1;
        }
        self.content.push_str(&content[..cut]);
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn set_filename(&mut self, filename: &str) {
        self.filename.clear();
        self.filename.push_str(filename);
    }

    /// Whether a note is currently open.
    pub fn is_open(&self) -> bool {
        !self.filename.is_empty()
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn set_title(&mut self, title: &str) {
        self.title.clear();
        self.title.push_str(title);
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn set_dirty(&mut self, dirty: bool) {
        self.dirty = dirty;
    }
}

impl Default for EditorBuffer {
    fn default() -> Self {
        Self::new()
    }
}

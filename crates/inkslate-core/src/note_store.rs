//! Note persistence store.
//!
//! Owns the on-disk `/notes` directory: an index of `(filename, title)`
//! pairs rebuilt by scanning, crash-safe saves through a temp file, a
//! persistent creation counter, and title/filename derivation in both
//! directions. The directory is always the source of truth; the index is
//! a cache refreshed after every mutation.

use alloc::format;
use alloc::string::{String, ToString};
use alloc::vec::Vec;

use crate::editor::{EditorBuffer, TEXT_BUFFER_CAP};
use crate::filesystem::{join_path, FileSystem, FileSystemError};

/// Directory holding all note files
pub const NOTES_DIR: &str = "/notes";
/// Note file extension
pub const NOTE_EXTENSION: &str = ".txt";
/// Hidden file holding the creation counter as ASCII decimal
const COUNTER_FILE: &str = "/notes/.counter";
/// Index capacity; files beyond this are not listed
pub const MAX_NOTES: usize = 100;
/// Title capacity in chars; longer titles are cut with an ellipsis
pub const MAX_TITLE_LEN: usize = 64;
/// Filename capacity in bytes, including the extension
const MAX_FILENAME_LEN: usize = 64;
/// How many leading bytes the title probe may read
const TITLE_PROBE_LEN: usize = 256;
/// Highest numeric suffix tried when a derived filename collides
const MAX_RENAME_SUFFIX: u32 = 99;

/// Title used when a file has no usable first line
pub const UNTITLED: &str = "Untitled";

/// One row of the note index.
#[derive(Debug, Clone)]
pub struct NoteEntry {
    pub filename: String,
    pub title: String,
    /// Modification time is not tracked yet; always zero.
    pub mod_time: u64,
}

/// How a rename landed on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenameOutcome {
    /// Title written and file now carries this name.
    Renamed(String),
    /// Title written but every candidate filename collided; the old
    /// filename stays.
    TitleOnly,
}

/// The note store. All operations take the filesystem explicitly so the
/// same store runs against the SD card or the in-memory mock.
pub struct NoteStore {
    index: Vec<NoteEntry>,
    available: bool,
}

impl NoteStore {
    pub fn new() -> Self {
        Self {
            index: Vec::new(),
            available: false,
        }
    }

    /// Mount-time setup: ensure the notes directory exists and build the
    /// initial index. A failure here leaves the store unavailable for the
    /// whole session; every later operation degrades to a logged no-op.
    pub fn mount<FS: FileSystem>(&mut self, fs: &mut FS) {
        if !fs.exists(NOTES_DIR) {
            if let Err(err) = fs.make_dir(NOTES_DIR) {
                log::warn!("Note directory unavailable: {}", err);
                self.available = false;
                return;
            }
        }
        self.available = true;
        if let Err(err) = self.refresh(fs) {
            log::warn!("Initial note scan failed: {}", err);
        }
    }

    pub fn is_available(&self) -> bool {
        self.available
    }

    pub fn notes(&self) -> &[NoteEntry] {
        &self.index
    }

    pub fn note_count(&self) -> usize {
        self.index.len()
    }

    /// Rebuild the index from a directory scan.
    ///
    /// Builds into a fresh vec and swaps only when the listing itself
    /// succeeded, so a transient failure keeps the previous index instead
    /// of flashing an empty list. Titles come from a bounded prefix read;
    /// a file that fails to open still gets an entry with the sentinel
    /// title.
    pub fn refresh<FS: FileSystem>(&mut self, fs: &mut FS) -> Result<(), FileSystemError> {
        if !self.available {
            return Err(FileSystemError::Unavailable);
        }

        let files = fs.list_files(NOTES_DIR)?;
        let mut fresh = Vec::new();
        for file in files {
            if fresh.len() >= MAX_NOTES {
                break;
            }
            if file.is_directory || file.name.starts_with('.') {
                continue;
            }
            if !file.name.ends_with(NOTE_EXTENSION) {
                continue;
            }
            let path = join_path(NOTES_DIR, &file.name);
            let title = match fs.read_file_prefix(&path, TITLE_PROBE_LEN) {
                Ok(prefix) => extract_title(&prefix),
                Err(_) => UNTITLED.to_string(),
            };
            fresh.push(NoteEntry {
                filename: file.name,
                title,
                mod_time: 0,
            });
        }
        log::info!("Note listing: {} files found", fresh.len());
        self.index = fresh;
        Ok(())
    }

    /// Load a note into the editor buffer.
    ///
    /// Reads at most the editor capacity (longer files are cut, which is
    /// lossy by design). A first line followed by a newline becomes the
    /// title; blank separator lines are skipped; anything without that
    /// structure is a legacy file kept whole as the body.
    pub fn load<FS: FileSystem>(
        &mut self,
        fs: &mut FS,
        filename: &str,
        editor: &mut EditorBuffer,
    ) -> Result<(), FileSystemError> {
        if !self.available {
            return Err(FileSystemError::Unavailable);
        }

        let path = join_path(NOTES_DIR, filename);
        let content = fs.read_file_prefix(&path, TEXT_BUFFER_CAP)?;

        match split_title_body(&content) {
            Some((title, body)) => {
                editor.set_content(body);
                editor.set_title(&title);
            }
            None => {
                editor.set_content(&content);
                editor.set_title(UNTITLED);
            }
        }
        editor.set_filename(filename);
        editor.set_dirty(false);
        log::info!("Loaded: {} ({} bytes)", filename, content.len());
        Ok(())
    }

    /// Persist the open note as `title + "\n\n" + body`.
    ///
    /// Writes a sibling temp file first, then replaces the target. The
    /// direct rename is atomic where the platform renames over existing
    /// files; the remove-then-rename fallback exists for FAT and leaves a
    /// short window where a power cut loses the prior version.
    pub fn save<FS: FileSystem>(
        &mut self,
        fs: &mut FS,
        editor: &mut EditorBuffer,
    ) -> Result<(), FileSystemError> {
        if !editor.is_open() {
            return Ok(());
        }
        if !self.available {
            log::warn!("Save skipped: storage unavailable");
            return Err(FileSystemError::Unavailable);
        }

        let path = join_path(NOTES_DIR, editor.filename());
        let tmp_path = format!("{}.tmp", path);
        let contents = format!("{}\n\n{}", editor.title(), editor.content());

        fs.write_file(&tmp_path, &contents)?;
        replace_file(fs, &tmp_path, &path)?;

        editor.set_dirty(false);
        let filename = editor.filename().to_string();
        if let Err(err) = self.refresh(fs) {
            log::warn!("Index refresh after save failed: {}", err);
        }
        log::info!("Saved: {}", filename);
        Ok(())
    }

    /// Start a new, unsaved note.
    ///
    /// The filename combines a persistent counter with a coarse timestamp
    /// so uniqueness survives counter resets. Counter read failures fall
    /// back to zero; collisions are not guarded further.
    pub fn create<FS: FileSystem>(
        &mut self,
        fs: &mut FS,
        editor: &mut EditorBuffer,
        now_ms: u64,
    ) -> String {
        let mut counter: u32 = 0;
        if self.available {
            if let Ok(raw) = fs.read_file(COUNTER_FILE) {
                counter = raw.trim().parse().unwrap_or(0);
            }
        }
        counter += 1;
        if self.available {
            if let Err(err) = fs.write_file(COUNTER_FILE, &counter.to_string()) {
                log::warn!("Counter write failed: {}", err);
            }
        }

        let filename = format!("note_{}_{}{}", counter, now_ms, NOTE_EXTENSION);
        editor.clear();
        editor.set_filename(&filename);
        editor.set_title(UNTITLED);
        editor.set_dirty(true);
        log::info!("New note: {}", filename);
        filename
    }

    /// Rewrite a note's title in place, then rename the file to match.
    ///
    /// The body is preserved untouched. If the derived slug collides with
    /// other files, suffixes `_2..=_99` are tried; exhausting them keeps
    /// the old filename and reports `TitleOnly` (the title change already
    /// landed).
    pub fn rename<FS: FileSystem>(
        &mut self,
        fs: &mut FS,
        filename: &str,
        new_title: &str,
        editor: &mut EditorBuffer,
    ) -> Result<RenameOutcome, FileSystemError> {
        if !self.available {
            return Err(FileSystemError::Unavailable);
        }

        let path = join_path(NOTES_DIR, filename);
        let content = fs.read_file(&path)?;
        let body = split_title_body(&content)
            .map(|(_, body)| body.to_string())
            .unwrap_or(content);

        let tmp_path = format!("{}.tmp", path);
        fs.write_file(&tmp_path, &format!("{}\n\n{}", new_title, body))?;
        replace_file(fs, &tmp_path, &path)?;

        let outcome = self.rename_to_slug(fs, filename, new_title, editor);
        if let Err(err) = self.refresh(fs) {
            log::warn!("Index refresh after rename failed: {}", err);
        }
        Ok(outcome)
    }

    fn rename_to_slug<FS: FileSystem>(
        &mut self,
        fs: &mut FS,
        filename: &str,
        new_title: &str,
        editor: &mut EditorBuffer,
    ) -> RenameOutcome {
        let slug = title_to_slug(new_title);
        if slug == filename {
            return RenameOutcome::Renamed(slug);
        }

        let base = &slug[..slug.len() - NOTE_EXTENSION.len()];
        let mut candidate = slug.clone();
        let mut suffix = 2;
        while fs.exists(&join_path(NOTES_DIR, &candidate)) && suffix <= MAX_RENAME_SUFFIX {
            candidate = format!("{}_{}{}", base, suffix, NOTE_EXTENSION);
            suffix += 1;
        }
        if fs.exists(&join_path(NOTES_DIR, &candidate)) {
            log::warn!("Rename abandoned, all candidates taken for '{}'", slug);
            return RenameOutcome::TitleOnly;
        }

        let old_path = join_path(NOTES_DIR, filename);
        let new_path = join_path(NOTES_DIR, &candidate);
        if let Err(err) = fs.rename(&old_path, &new_path) {
            log::warn!("File rename failed: {}", err);
            return RenameOutcome::TitleOnly;
        }

        // Keep the editor in sync if this note is currently open.
        if editor.filename() == filename {
            editor.set_filename(&candidate);
        }
        RenameOutcome::Renamed(candidate)
    }

    /// Remove a note. Confirmation is a UI concern, not handled here.
    pub fn delete<FS: FileSystem>(
        &mut self,
        fs: &mut FS,
        filename: &str,
    ) -> Result<(), FileSystemError> {
        if !self.available {
            return Err(FileSystemError::Unavailable);
        }
        let path = join_path(NOTES_DIR, filename);
        fs.remove_file(&path)?;
        if let Err(err) = self.refresh(fs) {
            log::warn!("Index refresh after delete failed: {}", err);
        }
        log::info!("Deleted: {}", filename);
        Ok(())
    }
}

impl Default for NoteStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Replace `target` with `tmp`.
///
/// Tries the direct rename first (atomic over existing files on POSIX and
/// in the mock); FAT rejects that, so fall back to remove-then-rename.
fn replace_file<FS: FileSystem>(
    fs: &mut FS,
    tmp: &str,
    target: &str,
) -> Result<(), FileSystemError> {
    if fs.rename(tmp, target).is_ok() {
        return Ok(());
    }
    let _ = fs.remove_file(target);
    fs.rename(tmp, target)
}

/// First non-empty line of a file prefix, trimmed, cut with an ellipsis
/// when it exceeds the title capacity.
fn extract_title(prefix: &str) -> String {
    let stripped = prefix.trim_start_matches(['\n', '\r']);
    let line = stripped
        .split(['\n', '\r'])
        .next()
        .unwrap_or("")
        .trim_end_matches(' ');
    if line.is_empty() {
        return UNTITLED.to_string();
    }
    if line.chars().count() > MAX_TITLE_LEN {
        let cut: String = line.chars().take(MAX_TITLE_LEN - 3).collect();
        return format!("{}...", cut);
    }
    line.to_string()
}

/// Split full content into `(title, body)`.
///
/// Returns `None` for legacy files without a newline-terminated first
/// line; those are kept whole as the body.
fn split_title_body(content: &str) -> Option<(String, &str)> {
    let newline = content.find('\n')?;
    if newline == 0 {
        return None;
    }
    let title_line = content[..newline].trim_end_matches('\r');
    let title: String = title_line.chars().take(MAX_TITLE_LEN).collect();
    let body = content[newline + 1..].trim_start_matches(['\n', '\r']);
    if title.is_empty() {
        return None;
    }
    Some((title, body))
}

/// Derive a FAT-safe filename from a title: lowercase alphanumerics pass
/// through, separator runs collapse to single underscores, everything
/// else is dropped. An empty result becomes `note`.
pub fn title_to_slug(title: &str) -> String {
    let max_base = MAX_FILENAME_LEN - NOTE_EXTENSION.len() - 1;
    let mut base = String::new();
    for c in title.chars() {
        if base.len() >= max_base {
            break;
        }
        let c = c.to_ascii_lowercase();
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            base.push(c);
        } else if matches!(c, ' ' | '_' | '-') && !base.is_empty() && !base.ends_with('_') {
            base.push('_');
        }
    }
    while base.ends_with('_') {
        base.pop();
    }
    if base.is_empty() {
        base.push_str("note");
    }
    base.push_str(NOTE_EXTENSION);
    base
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock_filesystem::MockFileSystem;

    fn mounted_store(fs: &mut MockFileSystem) -> NoteStore {
        let mut store = NoteStore::new();
        store.mount(fs);
        assert!(store.is_available());
        store
    }

    #[test]
    fn list_reads_title_from_first_line() {
        let mut fs = MockFileSystem::new();
        fs.add_directory("/notes");
        fs.add_file("/notes/note_1_1000.txt", "Groceries\n\nMilk\nEggs");

        let store = mounted_store(&mut fs);
        assert_eq!(store.note_count(), 1);
        assert_eq!(store.notes()[0].filename, "note_1_1000.txt");
        assert_eq!(store.notes()[0].title, "Groceries");
        assert_eq!(store.notes()[0].mod_time, 0);
    }

    #[test]
    fn list_skips_dotfiles_and_foreign_extensions() {
        let mut fs = MockFileSystem::new();
        fs.add_directory("/notes");
        fs.add_file("/notes/.counter", "7");
        fs.add_file("/notes/image.bmp", "not a note");
        fs.add_file("/notes/real.txt", "Real\n\nbody");

        let store = mounted_store(&mut fs);
        assert_eq!(store.note_count(), 1);
        assert_eq!(store.notes()[0].filename, "real.txt");
    }

    #[test]
    fn list_caps_at_index_capacity() {
        let mut fs = MockFileSystem::new();
        fs.add_directory("/notes");
        for i in 0..MAX_NOTES + 20 {
            fs.add_file(&format!("/notes/n{}.txt", i), "T\n\nb");
        }
        let store = mounted_store(&mut fs);
        assert_eq!(store.note_count(), MAX_NOTES);
    }

    #[test]
    fn long_titles_get_ellipsis() {
        let mut fs = MockFileSystem::new();
        fs.add_directory("/notes");
        let title = "t".repeat(MAX_TITLE_LEN + 10);
        fs.add_file("/notes/long.txt", &format!("{}\n\nbody", title));

        let store = mounted_store(&mut fs);
        let listed = &store.notes()[0].title;
        assert!(listed.ends_with("..."));
        assert_eq!(listed.chars().count(), MAX_TITLE_LEN);
    }

    #[test]
    fn blank_prefixed_title_is_found() {
        let mut fs = MockFileSystem::new();
        fs.add_directory("/notes");
        fs.add_file("/notes/padded.txt", "\n\r\nPadded title  \nbody");

        let store = mounted_store(&mut fs);
        assert_eq!(store.notes()[0].title, "Padded title");
    }

    #[test]
    fn failed_rescan_retains_previous_index() {
        let mut fs = MockFileSystem::new();
        fs.add_directory("/notes");
        fs.add_file("/notes/keep.txt", "Keep\n\nbody");

        let mut store = mounted_store(&mut fs);
        assert_eq!(store.note_count(), 1);

        fs.set_fail_listing(true);
        assert!(store.refresh(&mut fs).is_err());
        assert_eq!(store.note_count(), 1);
        assert_eq!(store.notes()[0].title, "Keep");
    }

    #[test]
    fn load_splits_title_and_body() {
        let mut fs = MockFileSystem::new();
        fs.add_directory("/notes");
        fs.add_file("/notes/note_1_1000.txt", "Groceries\n\nMilk\nEggs");

        let mut store = mounted_store(&mut fs);
        let mut editor = EditorBuffer::new();
        store
            .load(&mut fs, "note_1_1000.txt", &mut editor)
            .unwrap();
        assert_eq!(editor.title(), "Groceries");
        assert_eq!(editor.content(), "Milk\nEggs");
        assert!(!editor.is_dirty());
        assert_eq!(editor.filename(), "note_1_1000.txt");
    }

    #[test]
    fn load_trims_carriage_return_from_title() {
        let mut fs = MockFileSystem::new();
        fs.add_directory("/notes");
        fs.add_file("/notes/dos.txt", "Title\r\n\r\nbody");

        let mut store = mounted_store(&mut fs);
        let mut editor = EditorBuffer::new();
        store.load(&mut fs, "dos.txt", &mut editor).unwrap();
        assert_eq!(editor.title(), "Title");
        assert_eq!(editor.content(), "body");
    }

    #[test]
    fn legacy_file_without_newline_is_title_less() {
        let mut fs = MockFileSystem::new();
        fs.add_directory("/notes");
        fs.add_file("/notes/old.txt", "just some text");

        let mut store = mounted_store(&mut fs);
        let mut editor = EditorBuffer::new();
        store.load(&mut fs, "old.txt", &mut editor).unwrap();
        assert_eq!(editor.title(), UNTITLED);
        assert_eq!(editor.content(), "just some text");
    }

    #[test]
    fn save_then_load_round_trips() {
        let mut fs = MockFileSystem::new();
        fs.add_directory("/notes");

        let mut store = mounted_store(&mut fs);
        let mut editor = EditorBuffer::new();
        editor.set_filename("trip.txt");
        editor.set_title("Round trip");
        editor.set_content("line one\nline two");
        editor.set_dirty(true);

        store.save(&mut fs, &mut editor).unwrap();
        assert!(!editor.is_dirty());
        assert_eq!(
            fs.file_content("/notes/trip.txt"),
            Some("Round trip\n\nline one\nline two")
        );
        assert!(!fs.exists("/notes/trip.txt.tmp"));
        assert_eq!(store.note_count(), 1);

        let mut reloaded = EditorBuffer::new();
        store.load(&mut fs, "trip.txt", &mut reloaded).unwrap();
        assert_eq!(reloaded.title(), "Round trip");
        assert_eq!(reloaded.content(), "line one\nline two");
    }

    #[test]
    fn save_replaces_existing_content() {
        let mut fs = MockFileSystem::new();
        fs.add_directory("/notes");
        fs.add_file("/notes/a.txt", "Old\n\nold body");

        let mut store = mounted_store(&mut fs);
        let mut editor = EditorBuffer::new();
        store.load(&mut fs, "a.txt", &mut editor).unwrap();
        editor.set_content("new body");
        editor.set_dirty(true);
        store.save(&mut fs, &mut editor).unwrap();
        assert_eq!(fs.file_content("/notes/a.txt"), Some("Old\n\nnew body"));
    }

    #[test]
    fn save_without_open_note_is_a_no_op() {
        let mut fs = MockFileSystem::new();
        fs.add_directory("/notes");
        let mut store = mounted_store(&mut fs);
        let mut editor = EditorBuffer::new();
        assert!(store.save(&mut fs, &mut editor).is_ok());
        assert!(fs.list_files("/notes").unwrap().is_empty());
    }

    #[test]
    fn unavailable_store_fails_soft() {
        let mut fs = MockFileSystem::new();
        fs.set_fail_writes(true); // make_dir fails -> store unavailable
        let mut store = NoteStore::new();
        store.mount(&mut fs);
        assert!(!store.is_available());

        let mut editor = EditorBuffer::new();
        editor.set_filename("x.txt");
        editor.set_dirty(true);
        assert!(matches!(
            store.save(&mut fs, &mut editor),
            Err(FileSystemError::Unavailable)
        ));
        // Session state is untouched by the failure.
        assert!(editor.is_dirty());
        assert_eq!(store.note_count(), 0);
    }

    #[test]
    fn create_increments_persistent_counter() {
        let mut fs = MockFileSystem::new();
        fs.add_directory("/notes");

        let mut store = mounted_store(&mut fs);
        let mut editor = EditorBuffer::new();
        let first = store.create(&mut fs, &mut editor, 1000);
        assert_eq!(first, "note_1_1000.txt");
        assert!(editor.is_dirty());
        assert_eq!(editor.title(), UNTITLED);
        assert_eq!(fs.file_content("/notes/.counter"), Some("1"));

        let second = store.create(&mut fs, &mut editor, 2000);
        assert_eq!(second, "note_2_2000.txt");
        assert_eq!(fs.file_content("/notes/.counter"), Some("2"));
    }

    #[test]
    fn create_defaults_counter_on_garbage() {
        let mut fs = MockFileSystem::new();
        fs.add_directory("/notes");
        fs.add_file("/notes/.counter", "not a number");

        let mut store = mounted_store(&mut fs);
        let mut editor = EditorBuffer::new();
        let name = store.create(&mut fs, &mut editor, 5);
        assert_eq!(name, "note_1_5.txt");
    }

    #[test]
    fn rename_updates_title_and_filename() {
        let mut fs = MockFileSystem::new();
        fs.add_directory("/notes");
        fs.add_file("/notes/note_1_1000.txt", "Untitled\n\nMilk");

        let mut store = mounted_store(&mut fs);
        let mut editor = EditorBuffer::new();
        let outcome = store
            .rename(&mut fs, "note_1_1000.txt", "Grocery Run", &mut editor)
            .unwrap();
        assert_eq!(outcome, RenameOutcome::Renamed("grocery_run.txt".into()));
        assert_eq!(
            fs.file_content("/notes/grocery_run.txt"),
            Some("Grocery Run\n\nMilk")
        );
        assert!(!fs.exists("/notes/note_1_1000.txt"));
        assert_eq!(store.notes()[0].title, "Grocery Run");
    }

    #[test]
    fn rename_keeps_open_editor_in_sync() {
        let mut fs = MockFileSystem::new();
        fs.add_directory("/notes");
        fs.add_file("/notes/note_1_1.txt", "Untitled\n\nbody");

        let mut store = mounted_store(&mut fs);
        let mut editor = EditorBuffer::new();
        store.load(&mut fs, "note_1_1.txt", &mut editor).unwrap();
        store
            .rename(&mut fs, "note_1_1.txt", "Synced", &mut editor)
            .unwrap();
        assert_eq!(editor.filename(), "synced.txt");
    }

    #[test]
    fn rename_collision_picks_smallest_unused_suffix() {
        let mut fs = MockFileSystem::new();
        fs.add_directory("/notes");
        fs.add_file("/notes/todo.txt", "Todo\n\na");
        fs.add_file("/notes/todo_2.txt", "Todo\n\nb");
        fs.add_file("/notes/note_1_1.txt", "Untitled\n\nc");

        let mut store = mounted_store(&mut fs);
        let mut editor = EditorBuffer::new();
        let outcome = store
            .rename(&mut fs, "note_1_1.txt", "Todo", &mut editor)
            .unwrap();
        assert_eq!(outcome, RenameOutcome::Renamed("todo_3.txt".into()));
        assert!(fs.exists("/notes/todo_3.txt"));
    }

    #[test]
    fn rename_exhausted_suffixes_keeps_filename() {
        let mut fs = MockFileSystem::new();
        fs.add_directory("/notes");
        fs.add_file("/notes/busy.txt", "Busy\n\nx");
        for suffix in 2..=99 {
            fs.add_file(&format!("/notes/busy_{}.txt", suffix), "Busy\n\nx");
        }
        fs.add_file("/notes/note_1_1.txt", "Untitled\n\nmine");

        let mut store = mounted_store(&mut fs);
        let mut editor = EditorBuffer::new();
        let outcome = store
            .rename(&mut fs, "note_1_1.txt", "Busy", &mut editor)
            .unwrap();
        assert_eq!(outcome, RenameOutcome::TitleOnly);
        // Title change still landed in the original file.
        assert_eq!(
            fs.file_content("/notes/note_1_1.txt"),
            Some("Busy\n\nmine")
        );
    }

    #[test]
    fn rename_preserves_body_byte_for_byte() {
        let mut fs = MockFileSystem::new();
        fs.add_directory("/notes");
        fs.add_file("/notes/a.txt", "Old\n\nline 1\n\nline 3\n");

        let mut store = mounted_store(&mut fs);
        let mut editor = EditorBuffer::new();
        store.rename(&mut fs, "a.txt", "New", &mut editor).unwrap();
        assert_eq!(
            fs.file_content("/notes/new.txt"),
            Some("New\n\nline 1\n\nline 3\n")
        );
    }

    #[test]
    fn delete_removes_file_and_refreshes() {
        let mut fs = MockFileSystem::new();
        fs.add_directory("/notes");
        fs.add_file("/notes/gone.txt", "Gone\n\nbody");

        let mut store = mounted_store(&mut fs);
        store.delete(&mut fs, "gone.txt").unwrap();
        assert!(!fs.exists("/notes/gone.txt"));
        assert_eq!(store.note_count(), 0);
    }

    #[test]
    fn slug_is_lowercase_alnum_and_single_underscores() {
        for title in [
            "Hello World",
            "  spaced  out  ",
            "MIXED-case_Title",
            "tabs\tand\tsymbols!?",
            "a--b__c  d",
        ] {
            let slug = title_to_slug(title);
            assert!(slug.ends_with(NOTE_EXTENSION));
            let base = &slug[..slug.len() - NOTE_EXTENSION.len()];
            assert!(!base.is_empty());
            assert!(!base.starts_with('_'));
            assert!(!base.ends_with('_'));
            assert!(!base.contains("__"));
            assert!(base
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_'));
        }
    }

    #[test]
    fn slug_examples() {
        assert_eq!(title_to_slug("Grocery Run"), "grocery_run.txt");
        assert_eq!(title_to_slug("--Weird--"), "weird.txt");
        assert_eq!(title_to_slug("2024 Plans!"), "2024_plans.txt");
        assert_eq!(title_to_slug("!!!"), "note.txt");
        assert_eq!(title_to_slug(""), "note.txt");
    }
}

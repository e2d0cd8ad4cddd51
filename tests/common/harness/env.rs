//! Isolated test environment with temp directory.

use super::VnoteCommand;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use vnote::domain::NoteItem;
use vnote::store::{DbManager, NoteOper};

/// Isolated test environment with a temporary data directory.
///
/// Creates a temp directory that is automatically cleaned up on drop.
/// Provides methods for seeding notes and opening the store directly.
pub struct TestEnv {
    /// The temporary directory (kept for lifetime management)
    _temp_dir: TempDir,
    /// Path to the data directory
    data_dir: PathBuf,
}

impl TestEnv {
    /// Creates a new isolated test environment.
    ///
    /// The environment includes an empty data directory that will
    /// be automatically cleaned up when the TestEnv is dropped.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let data_dir = temp_dir.path().to_path_buf();
        Self {
            _temp_dir: temp_dir,
            data_dir,
        }
    }

    /// Returns the path to the data directory.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Opens the store the CLI would use for this environment.
    pub fn store(&self) -> DbManager {
        DbManager::open_in_dir(&self.data_dir).expect("Failed to open store")
    }

    /// Seeds a note with the given title, returning it.
    pub fn seed_note(&self, title: &str) -> NoteItem {
        let store = self.store();
        NoteOper::create_note(&store, title).expect("Failed to seed note")
    }

    /// Creates a VnoteCommand configured for this test environment.
    pub fn cmd(&self) -> VnoteCommand {
        VnoteCommand::new().data_dir(&self.data_dir)
    }

    /// Writes a file to the test environment and returns its path.
    ///
    /// Useful for creating fake recording files.
    pub fn write_file(&self, name: &str, content: &[u8]) -> PathBuf {
        let path = self.data_dir.join(name);
        std::fs::write(&path, content).expect("Failed to write file");
        path
    }
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_creates_temp_directory() {
        let env = TestEnv::new();
        assert!(env.data_dir().exists(), "data directory should exist");
        assert!(
            env.data_dir().is_dir(),
            "data directory should be a directory"
        );
    }

    #[test]
    fn test_env_cleanup_on_drop() {
        let path = {
            let env = TestEnv::new();
            env.data_dir().to_path_buf()
        };
        // After env is dropped, the temp directory should be cleaned up
        assert!(
            !path.exists(),
            "temp directory should be cleaned up on drop"
        );
    }

    #[test]
    fn test_env_provides_command() {
        let env = TestEnv::new();
        let cmd = env.cmd();
        // The command should have --data-dir set to the data directory
        let args = cmd.get_args();
        assert_eq!(args[0], "--data-dir");
        assert_eq!(args[1], env.data_dir().to_string_lossy());
    }

    #[test]
    fn test_env_seed_note_round_trips() {
        let env = TestEnv::new();
        let note = env.seed_note("Seeded");

        let store = env.store();
        let loaded = NoteOper::load_note(&store, note.id()).expect("Should load seeded note");
        assert_eq!(loaded.title(), "Seeded");
    }

    #[test]
    fn test_env_seed_notes_are_distinct() {
        let env = TestEnv::new();
        let a = env.seed_note("First");
        let b = env.seed_note("Second");
        assert_ne!(a.id(), b.id());

        let store = env.store();
        let summaries = NoteOper::list_notes(&store).expect("Should list notes");
        assert_eq!(summaries.len(), 2);
    }
}

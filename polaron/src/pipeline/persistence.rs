// Sixteen project slots. Saved on request and on quit, loaded on startup.
use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};

use log::{info, warn};
use thiserror::Error;

use super::project::ProjectDocument;
use crate::middle::Sequencer;
use crate::shared::PROJECT_SLOTS;

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("project storage: {0}")]
    Io(#[from] io::Error),
    #[error("malformed project document: {0}")]
    Json(#[from] serde_json::Error),
    #[error("project slot {0} out of range")]
    SlotOutOfRange(usize),
}

/// Where slot documents live. One call, one open/close; nothing is held
/// between calls.
pub trait ProjectStore {
    fn exists(&self, slot: usize) -> bool;
    fn read(&self, slot: usize) -> Result<String, PersistenceError>;
    fn write(&mut self, slot: usize, contents: &str) -> Result<(), PersistenceError>;
    fn remove(&mut self, slot: usize) -> Result<(), PersistenceError>;
}

/// `<dir>/p_<slot>.json`
#[derive(Clone, Debug)]
pub struct DirStore {
    dir: PathBuf,
}

impl DirStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn slot_path(&self, slot: usize) -> PathBuf {
        self.dir.join(format!("p_{slot}.json"))
    }
}

impl ProjectStore for DirStore {
    fn exists(&self, slot: usize) -> bool {
        self.slot_path(slot).is_file()
    }

    fn read(&self, slot: usize) -> Result<String, PersistenceError> {
        Ok(std::fs::read_to_string(self.slot_path(slot))?)
    }

    fn write(&mut self, slot: usize, contents: &str) -> Result<(), PersistenceError> {
        std::fs::create_dir_all(&self.dir)?; // first save into a fresh directory
        std::fs::write(self.slot_path(slot), contents)?;
        Ok(())
    }

    fn remove(&mut self, slot: usize) -> Result<(), PersistenceError> {
        match std::fs::remove_file(self.slot_path(slot)) {
            Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e.into()),
            _ => Ok(()),
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    slots: BTreeMap<usize, String>,
}

impl ProjectStore for MemoryStore {
    fn exists(&self, slot: usize) -> bool {
        self.slots.contains_key(&slot)
    }

    fn read(&self, slot: usize) -> Result<String, PersistenceError> {
        self.slots
            .get(&slot)
            .cloned()
            .ok_or_else(|| io::Error::from(io::ErrorKind::NotFound).into())
    }

    fn write(&mut self, slot: usize, contents: &str) -> Result<(), PersistenceError> {
        self.slots.insert(slot, contents.to_owned());
        Ok(())
    }

    fn remove(&mut self, slot: usize) -> Result<(), PersistenceError> {
        self.slots.remove(&slot);
        Ok(())
    }
}

/// Slot bookkeeping on top of a store: which slots hold a project (`existing`)
/// and which one was loaded last (`active`), both as bitmasks.
#[derive(Debug)]
pub struct ProjectPersistence<S> {
    store: S,
    existing: u16,
    active: u16,
}

impl<S: ProjectStore> ProjectPersistence<S> {
    pub fn new(store: S) -> Self {
        let mut persistence = Self { store, existing: 0, active: 0 };
        persistence.update_project_list();
        persistence
    }

    /// Rescans the store.
    pub fn update_project_list(&mut self) {
        self.existing = (0..PROJECT_SLOTS)
            .filter(|&slot| self.store.exists(slot))
            .fold(0, |acc, slot| acc | (1 << slot));
    }

    pub fn save(&mut self, slot: usize, seq: &Sequencer) -> Result<(), PersistenceError> {
        check_slot(slot)?;
        let json = serde_json::to_string_pretty(&ProjectDocument::capture(seq))?;
        self.store.write(slot, &json)?;
        self.update_project_list();
        info!("project saved to slot {slot}");
        Ok(())
    }

    /// Parses the whole document before touching the sequencer, so a bad slot
    /// leaves the current project as it was.
    pub fn load(&mut self, slot: usize, seq: &mut Sequencer) -> Result<(), PersistenceError> {
        check_slot(slot)?;
        let doc = self
            .store
            .read(slot)
            .and_then(|json| Ok(serde_json::from_str::<ProjectDocument>(&json)?))
            .inspect_err(|e| warn!("slot {slot} not loaded: {e}"))?;
        doc.apply(seq);
        self.active = 1 << slot;
        info!("project loaded from slot {slot}");
        Ok(())
    }

    pub fn delete(&mut self, slot: usize) -> Result<(), PersistenceError> {
        check_slot(slot)?;
        self.store.remove(slot)?;
        self.active &= !(1 << slot);
        self.update_project_list();
        Ok(())
    }

    pub fn exists(&self, slot: usize) -> bool {
        slot < PROJECT_SLOTS && self.existing & (1 << slot) != 0
    }

    pub fn is_active(&self, slot: usize) -> bool {
        slot < PROJECT_SLOTS && self.active & (1 << slot) != 0
    }

    pub fn existing(&self) -> u16 {
        self.existing
    }

    pub fn active(&self) -> u16 {
        self.active
    }
}

fn check_slot(slot: usize) -> Result<(), PersistenceError> {
    if slot < PROJECT_SLOTS {
        Ok(())
    } else {
        Err(PersistenceError::SlotOutOfRange(slot))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixture::recording_sequencer;

    #[test]
    fn test_save_marks_slot_existing() {
        let (seq, _log) = recording_sequencer();
        let mut persistence = ProjectPersistence::new(MemoryStore::default());
        assert_eq!(persistence.existing(), 0);
        persistence.save(3, &seq).unwrap();
        persistence.save(15, &seq).unwrap();
        assert!(persistence.exists(3));
        assert!(!persistence.exists(4));
        assert_eq!(persistence.existing(), (1 << 3) | (1 << 15));
        assert!(!persistence.is_active(3));
    }

    #[test]
    fn test_load_restores_and_activates() {
        let (mut seq, _log) = recording_sequencer();
        seq.track_mut(5).pattern_mut(15).step_mut(15).toggle_trigger_state();
        let mut persistence = ProjectPersistence::new(MemoryStore::default());
        persistence.save(7, &seq).unwrap();

        let (mut fresh, _log) = recording_sequencer();
        persistence.load(7, &mut fresh).unwrap();
        assert!(fresh.track(5).pattern(15).step(15).is_trigger_on());
        assert_eq!(persistence.active(), 1 << 7);
        assert!(persistence.is_active(7));
    }

    #[test]
    fn test_missing_slot_leaves_state_alone() {
        let (mut seq, _log) = recording_sequencer();
        seq.clock_mut().set_step_length(300);
        let mut persistence = ProjectPersistence::new(MemoryStore::default());
        let err = persistence.load(2, &mut seq).unwrap_err();
        assert!(matches!(err, PersistenceError::Io(_)));
        assert_eq!(seq.clock().step_length(), 300);
        assert_eq!(persistence.active(), 0);
    }

    #[test]
    fn test_malformed_document_leaves_state_alone() {
        let mut store = MemoryStore::default();
        store.write(1, r#"{"global":{"stepLength":64},"tracks":[{"patterns":"#).unwrap();
        let mut persistence = ProjectPersistence::new(store);
        assert!(persistence.exists(1));

        let (mut seq, _log) = recording_sequencer();
        let err = persistence.load(1, &mut seq).unwrap_err();
        assert!(matches!(err, PersistenceError::Json(_)));
        assert_eq!(seq.clock().step_length(), crate::middle::DEFAULT_STEP_LENGTH);
    }

    #[test]
    fn test_slot_out_of_range() {
        let (mut seq, _log) = recording_sequencer();
        let mut persistence = ProjectPersistence::new(MemoryStore::default());
        assert!(matches!(
            persistence.save(16, &seq),
            Err(PersistenceError::SlotOutOfRange(16))
        ));
        assert!(persistence.load(99, &mut seq).is_err());
        assert!(!persistence.exists(16));
    }

    #[test]
    fn test_delete_clears_bits() {
        let (mut seq, _log) = recording_sequencer();
        let mut persistence = ProjectPersistence::new(MemoryStore::default());
        persistence.save(0, &seq).unwrap();
        persistence.load(0, &mut seq).unwrap();
        persistence.delete(0).unwrap();
        assert!(!persistence.exists(0));
        assert!(!persistence.is_active(0));
    }

    #[test]
    fn test_dir_store_round_trip() {
        let dir = std::env::temp_dir().join(format!("polaron-test-{}", std::process::id()));
        let mut store = DirStore::new(dir.join("projects"));
        assert!(!store.exists(4));
        store.write(4, "{}").unwrap();
        assert!(store.exists(4));
        assert!(store.dir().join("p_4.json").is_file());
        assert_eq!(store.read(4).unwrap(), "{}");
        store.remove(4).unwrap();
        store.remove(4).unwrap();
        assert!(!store.exists(4));
        let _ = std::fs::remove_dir_all(&dir);
    }
}

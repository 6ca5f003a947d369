// Sequencer data model and the project documents it persists to.
mod pattern;
mod persistence;
mod project;
mod step;
mod track;

pub use pattern::Pattern;
pub use persistence::{DirStore, MemoryStore, PersistenceError, ProjectPersistence, ProjectStore};
pub use project::{GlobalRecord, PatternRecord, ProjectDocument, StepRecord, TrackRecord};
pub use step::{Step, StepState, DEFAULT_TRIGGER_MASK};
pub use track::Track;

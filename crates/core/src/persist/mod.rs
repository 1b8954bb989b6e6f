//! Result persistence: the per-date record sink and the document blob store.
//!
//! Persistence runs only after a date has fully resolved, so an interrupted
//! run never leaves partial-date output behind.

mod csv_sink;
mod error;
mod fs_store;
mod persister;
mod traits;

pub use csv_sink::CsvRecordSink;
pub use error::PersistError;
pub use fs_store::FsBlobStore;
pub use persister::{document_filename, ArtifactPersister};
pub use traits::{BlobStore, RecordSink};

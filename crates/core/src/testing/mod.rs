//! Test doubles and HTML fixtures.
//!
//! Everything here is compiled into the library so integration tests and
//! downstream consumers can drive the orchestrator without a live portal.

pub mod fixtures;
mod mock_ocr;
mod mock_persist;
mod mock_portal;

pub use mock_ocr::MockOcr;
pub use mock_persist::{MemoryBlobStore, MemoryRecordSink, RecordingHandler};
pub use mock_portal::MockPortal;

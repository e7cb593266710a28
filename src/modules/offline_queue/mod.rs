//! Offline report queue
//!
//! Buffers report submissions in a durable local store while the client has
//! no connectivity and forwards them, oldest first, once the network returns.
//! Entries are deleted only after the server accepted them.

mod connectivity;
mod error;
mod local_store;
mod queue;
mod sqlite_store;
mod submitter;

pub use connectivity::{spawn_auto_sync, Connectivity};
pub use error::QueueError;
pub use local_store::{LocalQueueStore, MemoryQueueStore, OfflineReport, QueuedEntry};
pub use queue::{OfflineQueue, SubmitOutcome, SyncSummary};
pub use sqlite_store::SqliteQueueStore;
pub use submitter::{HttpReportSubmitter, ReportSubmitter};

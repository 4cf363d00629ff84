//! Daylist resolution, the sync procedure and the timer that drives them.
//!
//! ```text
//! Scheduler ── every tick ──> TokenManager::refresh
//!                          └─> procedure::sync_with_retry
//!                                 └─> daylist::resolve ─> tracks ─> replace ─> rename
//! ```

pub mod daylist;
pub mod procedure;
pub mod scheduler;

pub use procedure::{SyncReport, sync_once, sync_with_retry};
pub use scheduler::Scheduler;

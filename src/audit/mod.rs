//! Audit logging
//!
//! Every create, update and delete performed through the services is
//! appended to `audit.log` as one JSON line carrying before/after snapshots
//! and, for updates, a summary of the changed fields.

mod diff;
mod entry;
mod logger;

pub use diff::{collect_changes, summarize_changes};
pub use entry::{AuditEntry, EntityType, Operation};
pub use logger::{AuditFilter, AuditLogger};

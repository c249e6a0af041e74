// Interviewer reconciliation: pure diffing, plan execution and save tracking.
// Nothing in here knows about HTTP; the store is reached only through `RemoteStore`.

pub mod execute;
pub mod plan;
pub mod tracker;

pub use execute::{execute, execute_children, ExecutionReport, SyncError};
pub use plan::{reconcile, DesiredSequence, Plan, PriorSnapshot, ReconcileError};
pub use tracker::{SaveInProgress, SaveState, SaveTracker};

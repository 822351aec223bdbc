use sea_orm::DbErr;
use thiserror::Error;

/// Cycle-level failures surfaced by `reconcile`.
///
/// Everything else that can go wrong mid-cycle (an association that cannot
/// be resolved, a failed reverse-DNS lookup, a stage entered out of order)
/// is absorbed where it happens and narrowed to a skipped row or stage.
#[derive(Debug, Error)]
pub enum ReconcileError {
    /// The snapshot is missing required identity fields. Nothing is written;
    /// the next poll cycle produces a fresh snapshot.
    #[error("malformed snapshot: {0}")]
    MalformedSnapshot(String),

    /// The persistence engine rejected a read or write. Fails the cycle for
    /// this device only.
    #[error("store failure: {0}")]
    Store(#[from] DbErr),
}

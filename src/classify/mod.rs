pub mod classify_reads;
pub mod reconcile;

pub use classify_reads::{classify_group, classify_reconciled, pick_representative, verdict};
pub use reconcile::reconcile;

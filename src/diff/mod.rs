//! Diff engine - Size comparison and plan generation

mod compare;
mod engine;
mod plan;

pub use compare::compare_sizes;
pub use engine::{PlanStats, SyncPlan};
pub use plan::generate_sync_plan;

mod plan;
mod types;

pub use plan::{build_plan, build_plan_with, file_timestamp, split_extension, PlanError};
pub use types::{PathMapping, RenameOperation, RenameOptions};

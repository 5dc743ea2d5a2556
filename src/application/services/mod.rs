pub mod task_planner;

pub use task_planner::{TaskPlanError, TaskPlanner};

pub mod export_service;
pub mod summary_service;

pub use export_service::{ExportPaths, ExportService};
pub use summary_service::{BudgetSummary, CategoryTotal, GoalProgress, SummaryService};

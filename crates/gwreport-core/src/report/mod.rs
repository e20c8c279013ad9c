// Report building: per-manager summaries and per-match aggregation.

pub mod aggregate;
pub mod extract;

pub use aggregate::build_reports;
pub use extract::{extract_summary, split_squad, summarize, SquadSplit};

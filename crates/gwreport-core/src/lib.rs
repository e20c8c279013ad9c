// Library root: fetches H2H league data, builds per-match reports for one
// gameweek and assembles the LLM prompt from them.

pub mod api;
pub mod config;
pub mod error;
pub mod model;
pub mod pipeline;
pub mod prompt;
pub mod report;

#[cfg(test)]
mod testing;

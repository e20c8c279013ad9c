pub mod client;
pub mod output;

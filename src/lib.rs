pub mod cli;
pub mod config;
pub mod dashboard;
pub mod lifecycle;
pub mod report;
pub mod sort;
pub mod source;
pub mod submission;
pub mod types;

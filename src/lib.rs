pub mod config;
pub mod data;
pub mod error;
pub mod extractor;
pub mod report;
pub mod summary;

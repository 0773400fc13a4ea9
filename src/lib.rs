//! Scrapes a faculty course catalog for one academic term and produces a
//! normalized dataset of subjects, chairs, sections and weekly meetings,
//! with lookup indexes for schedule-building tools.

pub mod aggregate;
pub mod config;
pub mod error;
pub mod models;
pub mod parsers;
pub mod pipeline;
pub mod scheduler;
pub mod storage;
pub mod utils;

pub use config::Config;
pub use error::CatalogError;
pub use pipeline::scrape_term;

//! Image Search Core Library
//!
//! This library provides the core functionality for the imgsearch tool,
//! which collects paginated Custom Search results into a CSV file and
//! downloads the referenced images.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//! - [`search`] - Page planning, page fetching and aggregation
//! - [`output`] - Flattening results and writing/reading CSV files
//! - [`images`] - Sequential image download from a results file
//! - [`report`] - Injectable progress reporting
//! - [`http`] - Shared HTTP client construction policy

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod http;
pub mod images;
pub mod output;
pub mod report;
pub mod search;
mod user_agent;

// Re-export commonly used types
pub use images::{DEFAULT_URL_COLUMN, ImageDownloader, ImageError};
pub use output::{PersistError, sanitize_query, save_results};
pub use report::{Event, MemoryReporter, Reporter, TallyReporter, TracingReporter};
pub use search::{
    AggregatedResults, OffsetPolicy, PAGE_CAPACITY, PageFetcher, PageOutcome, PagePlan,
    SearchClient, SearchError, SearchOutcome, SearchQuery, StopReason, aggregate, run_search,
};

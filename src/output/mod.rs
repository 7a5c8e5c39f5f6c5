//! Tabular persistence of search results.
//!
//! Items are flattened into a [`Table`] whose header is the ordered union of
//! every item's keys, then written as CSV under a filename that records the
//! query, the start page and the number of results actually retrieved.
//!
//! # Example
//!
//! ```no_run
//! use imgsearch_core::output::{read_column, save_results};
//! use std::path::Path;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let items = vec![serde_json::json!({ "link": "https://example.com/a.jpg" })
//!     .as_object()
//!     .cloned()
//!     .unwrap_or_default()];
//! let path = save_results(&items, "cats", Path::new("./out"), 0, 1).await?;
//! let links = read_column(&path, "link").await?;
//! assert_eq!(links.len(), 1);
//! # Ok(())
//! # }
//! ```

mod error;
mod filename;
mod flatten;
mod table;

pub use error::PersistError;
pub use filename::{results_filename, results_path, sanitize_query};
pub use flatten::{KEY_SEPARATOR, Table, flatten_item};
pub use table::{read_column, save_results, write_table};

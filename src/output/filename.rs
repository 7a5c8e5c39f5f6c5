//! Result filename construction.

use std::path::{Path, PathBuf};

/// Characters replaced by `_` when a query becomes part of a filename.
const UNSAFE_CHARS: [char; 10] = ['\\', '/', '*', '?', ':', '"', '<', '>', '~', ' '];

/// Replaces each filesystem-unsafe character and each space with `_`.
///
/// Replacement is one-for-one; runs are not collapsed.
///
/// ```
/// use imgsearch_core::output::sanitize_query;
///
/// assert_eq!(sanitize_query("a/b:c*d"), "a_b_c_d");
/// assert_eq!(sanitize_query("ryan gosling"), "ryan_gosling");
/// ```
#[must_use]
pub fn sanitize_query(query: &str) -> String {
    query
        .chars()
        .map(|c| if UNSAFE_CHARS.contains(&c) { '_' } else { c })
        .collect()
}

/// Returns `{sanitized_query}_start_{start_page}_results_{count}.csv`.
#[must_use]
pub fn results_filename(query: &str, start_page: usize, result_count: usize) -> String {
    format!(
        "{}_start_{start_page}_results_{result_count}.csv",
        sanitize_query(query)
    )
}

/// Joins [`results_filename`] onto `output_dir`.
#[must_use]
pub fn results_path(
    output_dir: &Path,
    query: &str,
    start_page: usize,
    result_count: usize,
) -> PathBuf {
    output_dir.join(results_filename(query, start_page, result_count))
}

//! Progress reporting passed explicitly into each component.
//!
//! Components never log their progress through process-wide state; they
//! emit [`Event`]s into a [`Reporter`] handed to them by the caller.
//! [`TracingReporter`] forwards events to `tracing`, [`TallyReporter`] counts
//! image outcomes on top of another reporter, and [`MemoryReporter`] keeps
//! every event for later inspection.

use std::path::PathBuf;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use tracing::{debug, info, warn};

/// Something worth reporting during a search run or an image download run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Pagination was planned.
    SearchPlanned {
        query: String,
        requested_total: usize,
        page_count: usize,
        start_page: usize,
    },
    /// A page request is about to be sent. `page` is 0-based.
    PageRequested {
        page: usize,
        start_offset: usize,
        page_size: usize,
    },
    /// A page returned items.
    PageFetched { page: usize, items: usize },
    /// Pagination stopped before the plan was exhausted.
    SearchStopped {
        page: usize,
        reason: String,
        collected: usize,
    },
    /// Results were written.
    ResultsSaved { path: PathBuf, rows: usize },
    /// An image row was downloaded. `row` is the 0-based CSV data row.
    ImageSaved { row: usize, path: PathBuf },
    /// An image row failed; the loop moved on.
    ImageFailed { row: usize, url: String, error: String },
}

/// Sink for [`Event`]s.
pub trait Reporter: Send + Sync {
    /// Records one event.
    fn report(&self, event: &Event);
}

/// Forwards events to `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn report(&self, event: &Event) {
        match event {
            Event::SearchPlanned {
                query,
                requested_total,
                page_count,
                start_page,
            } => info!(
                query = %query,
                requested_total,
                page_count,
                start_page,
                "starting search"
            ),
            Event::PageRequested {
                page,
                start_offset,
                page_size,
            } => debug!(
                page = page + 1,
                start_offset,
                page_size,
                "fetching page"
            ),
            Event::PageFetched { page, items } => {
                info!(page = page + 1, items, "page fetched");
            }
            Event::SearchStopped {
                page,
                reason,
                collected,
            } => warn!(
                page = page + 1,
                reason = %reason,
                collected,
                "no more results available"
            ),
            Event::ResultsSaved { path, rows } => {
                info!(path = %path.display(), rows, "results saved");
            }
            Event::ImageSaved { row, path } => {
                info!(row, path = %path.display(), "success");
            }
            Event::ImageFailed { row, url, error } => {
                warn!(row, url = %url, error = %error, "failed");
            }
        }
    }
}

/// Counts image outcomes and forwards every event to an inner reporter.
#[derive(Debug, Default)]
pub struct TallyReporter<R> {
    inner: R,
    saved: AtomicUsize,
    failed: AtomicUsize,
}

impl<R: Reporter> TallyReporter<R> {
    /// Wraps `inner`.
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            saved: AtomicUsize::new(0),
            failed: AtomicUsize::new(0),
        }
    }

    /// Number of image rows saved.
    #[must_use]
    pub fn saved(&self) -> usize {
        self.saved.load(Ordering::SeqCst)
    }

    /// Number of image rows that failed.
    #[must_use]
    pub fn failed(&self) -> usize {
        self.failed.load(Ordering::SeqCst)
    }

    /// Total image rows processed.
    #[must_use]
    pub fn total(&self) -> usize {
        self.saved() + self.failed()
    }
}

impl<R: Reporter> Reporter for TallyReporter<R> {
    fn report(&self, event: &Event) {
        match event {
            Event::ImageSaved { .. } => {
                self.saved.fetch_add(1, Ordering::SeqCst);
            }
            Event::ImageFailed { .. } => {
                self.failed.fetch_add(1, Ordering::SeqCst);
            }
            _ => {}
        }
        self.inner.report(event);
    }
}

/// Keeps every event in memory.
#[derive(Debug, Default)]
pub struct MemoryReporter {
    events: Mutex<Vec<Event>>,
}

impl MemoryReporter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of the recorded events in arrival order.
    #[must_use]
    pub fn events(&self) -> Vec<Event> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }
}

impl Reporter for MemoryReporter {
    fn report(&self, event: &Event) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event.clone());
        }
    }
}

impl<R: Reporter + ?Sized> Reporter for &R {
    fn report(&self, event: &Event) {
        (**self).report(event);
    }
}

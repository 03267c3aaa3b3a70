//! Keyspace search over candidate seconds.
//!
//! Every second in a [`SearchWindow`] is turned into a key with
//! [`derive_key`](crate::crypto::derive_key) and tried against the container.
//! The first verifying key ends the search.

mod parallel;
pub mod window;

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use log::{debug, info, trace};

use crate::{
    CiphertextContainer,
    crypto::{self, AttemptOutcome},
};

pub use window::SearchWindow;

/// Attempts between two progress observations.
pub const DEFAULT_PROGRESS_INTERVAL: u64 = 10_000;

/// Terminal result of one search run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchResult {
    Found {
        timestamp: i64,
        plaintext: Vec<u8>,
        attempts: u64,
    },
    NotFound {
        attempts: u64,
    },
    /// The stop flag was raised before the window was exhausted.
    Interrupted {
        attempts: u64,
    },
}

impl SearchResult {
    pub fn attempts(&self) -> u64 {
        match self {
            SearchResult::Found { attempts, .. }
            | SearchResult::NotFound { attempts }
            | SearchResult::Interrupted { attempts } => *attempts,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, SearchResult::Found { .. })
    }
}

/// Progress observation handed to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub attempts: u64,
    /// Candidate second most recently tried. In parallel runs this is the
    /// last second of the block that crossed the interval.
    pub timestamp: i64,
}

/// Searches a window for the second whose key decrypts the container.
pub struct KeySpaceSearcher<'a> {
    container: &'a CiphertextContainer,
    progress_interval: u64,
    threads: usize,
    stop: Arc<AtomicBool>,
}

impl<'a> KeySpaceSearcher<'a> {
    pub fn new(container: &'a CiphertextContainer) -> Self {
        Self {
            container,
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
            threads: 1,
            stop: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Attempts between progress observations. `0` disables them.
    pub fn progress_interval(mut self, interval: u64) -> Self {
        self.progress_interval = interval;
        self
    }

    /// Worker threads. `1` runs the sequential search.
    pub fn threads(mut self, threads: usize) -> Self {
        self.threads = threads.max(1);
        self
    }

    /// Flag that ends the search early with [`SearchResult::Interrupted`].
    pub fn stop_flag(mut self, stop: Arc<AtomicBool>) -> Self {
        self.stop = stop;
        self
    }

    /// Derives the key for `timestamp` and tries it.
    pub fn try_timestamp(&self, timestamp: i64) -> AttemptOutcome {
        let key = crypto::derive_key(timestamp);
        let outcome = crypto::attempt(
            &key[..],
            self.container.nonce(),
            self.container.tag(),
            self.container.body(),
        );

        if matches!(outcome, AttemptOutcome::MalformedAttempt) {
            trace!("malformed attempt at {timestamp}, counted as a miss");
        }
        outcome
    }

    /// Runs the search, calling `on_progress` every `progress_interval`
    /// attempts.
    ///
    /// Sequential runs try seconds in ascending order and report the first
    /// match. Parallel runs report whichever worker publishes first.
    pub fn search<F>(&self, window: &SearchWindow, mut on_progress: F) -> SearchResult
    where
        F: FnMut(Progress) + Send,
    {
        info!(
            "searching {} candidate seconds from {} with {} thread(s)",
            window.len(),
            window.start(),
            self.threads
        );

        let result = if self.threads > 1 {
            parallel::search(self, window, on_progress)
        } else {
            self.search_sequential(window, &mut on_progress)
        };

        match &result {
            SearchResult::Found {
                timestamp,
                attempts,
                ..
            } => info!("key found at {timestamp} after {attempts} attempts"),
            SearchResult::NotFound { attempts } => info!("no key after {attempts} attempts"),
            SearchResult::Interrupted { attempts } => {
                info!("search interrupted after {attempts} attempts")
            }
        }
        result
    }

    fn search_sequential<F>(&self, window: &SearchWindow, on_progress: &mut F) -> SearchResult
    where
        F: FnMut(Progress),
    {
        debug!("sequential search over {:?}", window.range());

        let mut attempts = 0u64;
        for timestamp in window.iter() {
            if self.stop.load(Ordering::Relaxed) {
                return SearchResult::Interrupted { attempts };
            }

            attempts += 1;
            if let AttemptOutcome::Verified(plaintext) = self.try_timestamp(timestamp) {
                return SearchResult::Found {
                    timestamp,
                    plaintext,
                    attempts,
                };
            }

            if self.progress_interval > 0 && attempts % self.progress_interval == 0 {
                on_progress(Progress {
                    attempts,
                    timestamp,
                });
            }
        }

        SearchResult::NotFound { attempts }
    }
}

/// Sequential search with a progress callback.
pub fn search<F>(
    container: &CiphertextContainer,
    window: &SearchWindow,
    progress_interval: u64,
    on_progress: F,
) -> SearchResult
where
    F: FnMut(Progress) + Send,
{
    KeySpaceSearcher::new(container)
        .progress_interval(progress_interval)
        .search(window, on_progress)
}

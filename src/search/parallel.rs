//! Sharded search on a rayon pool.
//!
//! The window is cut into contiguous shards. Workers walk their shard in
//! blocks and check the shared `found` and stop flags before each block; the
//! hot loop inside a block takes no locks. The first worker to verify a key
//! publishes the result through a `OnceLock`, later successes are dropped.

use std::{
    ops::Range,
    sync::{
        Mutex, OnceLock,
        atomic::{AtomicBool, AtomicU64, Ordering},
    },
};

use log::{debug, warn};
use rayon::prelude::*;

use super::{KeySpaceSearcher, Progress, SearchResult, SearchWindow};
use crate::crypto::AttemptOutcome;

/// Seconds tried between two flag checks.
const BLOCK_LEN: i64 = 1024;

/// Shards per worker, so idle workers can steal remaining shards.
const SHARDS_PER_THREAD: usize = 4;

pub(super) fn search<F>(
    searcher: &KeySpaceSearcher<'_>,
    window: &SearchWindow,
    on_progress: F,
) -> SearchResult
where
    F: FnMut(Progress) + Send,
{
    let pool = match rayon::ThreadPoolBuilder::new()
        .num_threads(searcher.threads)
        .build()
    {
        Ok(pool) => pool,
        Err(e) => {
            warn!("failed to start {} workers ({e}), searching sequentially", searcher.threads);
            let mut on_progress = on_progress;
            return searcher.search_sequential(window, &mut on_progress);
        }
    };

    let shards = shard(window.range(), searcher.threads * SHARDS_PER_THREAD);
    debug!(
        "parallel search: {} shards on {} threads",
        shards.len(),
        searcher.threads
    );

    let run = Run {
        searcher,
        found: AtomicBool::new(false),
        attempts: AtomicU64::new(0),
        winner: OnceLock::new(),
        observer: Mutex::new(on_progress),
    };

    pool.install(|| {
        shards.par_iter().for_each(|shard| run.sweep(shard.clone()));
    });

    let attempts = run.attempts.into_inner();
    match run.winner.into_inner() {
        Some(found) => found,
        None if searcher.stop.load(Ordering::Relaxed) => SearchResult::Interrupted { attempts },
        None => SearchResult::NotFound { attempts },
    }
}

/// Shared state of one parallel run.
struct Run<'s, 'c, F> {
    searcher: &'s KeySpaceSearcher<'c>,
    found: AtomicBool,
    attempts: AtomicU64,
    winner: OnceLock<SearchResult>,
    observer: Mutex<F>,
}

impl<F> Run<'_, '_, F>
where
    F: FnMut(Progress) + Send,
{
    fn should_stop(&self) -> bool {
        self.found.load(Ordering::Acquire) || self.searcher.stop.load(Ordering::Relaxed)
    }

    fn sweep(&self, shard: Range<i64>) {
        let mut block_start = shard.start;

        while block_start < shard.end {
            if self.should_stop() {
                return;
            }

            let block_end = block_start + BLOCK_LEN.min(shard.end - block_start);
            for timestamp in block_start..block_end {
                if let AttemptOutcome::Verified(plaintext) = self.searcher.try_timestamp(timestamp)
                {
                    let tried = (timestamp - block_start + 1) as u64;
                    let attempts = self.attempts.fetch_add(tried, Ordering::Relaxed) + tried;
                    self.publish(SearchResult::Found {
                        timestamp,
                        plaintext,
                        attempts,
                    });
                    return;
                }
            }

            self.complete_block((block_end - block_start) as u64, block_end - 1);
            block_start = block_end;
        }
    }

    fn publish(&self, result: SearchResult) {
        if self.winner.set(result).is_ok() {
            self.found.store(true, Ordering::Release);
        } else {
            debug!("another worker already published a result, dropping this one");
        }
    }

    /// Counts a finished block and emits one observation per interval
    /// multiple it crosses.
    ///
    /// The observer lock is held across the count, so observations arrive in
    /// ascending order of `attempts`.
    fn complete_block(&self, tried: u64, timestamp: i64) {
        let interval = self.searcher.progress_interval;
        if interval == 0 {
            self.attempts.fetch_add(tried, Ordering::Relaxed);
            return;
        }

        let guard = self.observer.lock();
        let before = self.attempts.fetch_add(tried, Ordering::Relaxed);
        let Ok(mut observer) = guard else {
            return;
        };
        if self.found.load(Ordering::Acquire) {
            return;
        }

        for k in (before / interval + 1)..=((before + tried) / interval) {
            (*observer)(Progress {
                attempts: k * interval,
                timestamp,
            });
        }
    }
}

/// Cuts `range` into at most `count` contiguous, non-empty pieces of
/// near-equal length, in ascending order.
fn shard(range: Range<i64>, count: usize) -> Vec<Range<i64>> {
    let len = (range.end - range.start).max(0) as u64;
    let count = (count.max(1) as u64).min(len.max(1));
    let base = len / count;
    let extra = len % count;

    let mut shards = Vec::with_capacity(count as usize);
    let mut start = range.start;
    for i in 0..count {
        let size = base + u64::from(i < extra);
        let end = start + size as i64;
        if size > 0 {
            shards.push(start..end);
        }
        start = end;
    }
    shards
}

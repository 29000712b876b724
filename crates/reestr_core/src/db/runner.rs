//! Process-lifetime migration runner.
//!
//! # Responsibility
//! - Guarantee the one-time schema setup runs exactly once per process, even
//!   under concurrent first-time callers.
//!
//! # Invariants
//! - The done flag is set only after migrations succeed; failure leaves the
//!   runner retryable by the startup sequence.
//! - There is no path back from done.

use super::{open_db, DbResult};
use log::{error, info};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::Instant;

/// One-time initialization barrier for schema setup.
///
/// Fast path reads an atomic done flag without taking the lock; the slow path
/// takes the lock and re-checks before doing any work (double-checked
/// locking), so exactly one caller executes the migration procedure.
pub struct MigrationRunner {
    done: AtomicBool,
    guard: Mutex<()>,
}

impl MigrationRunner {
    /// Creates a runner in the not-run state.
    ///
    /// `const` so callers can hold a process-wide runner in a `static`.
    pub const fn new() -> Self {
        Self {
            done: AtomicBool::new(false),
            guard: Mutex::new(()),
        }
    }

    /// Returns whether the one-time setup has completed successfully.
    pub fn is_done(&self) -> bool {
        self.done.load(Ordering::Acquire)
    }

    /// Idempotent entry point: brings the database at `path` to the latest
    /// schema version, at most once per runner.
    ///
    /// # Side effects
    /// - Creates the parent directory and database file when missing.
    /// - Emits `migrations_ensure` logging events with duration and status.
    ///
    /// # Errors
    /// - Propagates open/migration failures to the caller, which must treat
    ///   them as fatal for startup. The runner stays retryable, but never
    ///   retries on its own.
    pub fn ensure(&self, path: impl AsRef<Path>) -> DbResult<()> {
        if self.done.load(Ordering::Acquire) {
            return Ok(());
        }

        let _guard = self.guard.lock().unwrap_or_else(PoisonError::into_inner);
        // Another caller may have finished while this one waited for the lock.
        if self.done.load(Ordering::Acquire) {
            return Ok(());
        }

        let started_at = Instant::now();
        info!("event=migrations_ensure module=db status=start");

        match run_setup(path.as_ref()) {
            Ok(()) => {
                self.done.store(true, Ordering::Release);
                info!(
                    "event=migrations_ensure module=db status=ok duration_ms={}",
                    started_at.elapsed().as_millis()
                );
                Ok(())
            }
            Err(err) => {
                error!(
                    "event=migrations_ensure module=db status=error duration_ms={} error={err}",
                    started_at.elapsed().as_millis()
                );
                Err(err)
            }
        }
    }
}

impl Default for MigrationRunner {
    fn default() -> Self {
        Self::new()
    }
}

fn run_setup(path: &Path) -> DbResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    // open_db applies pending migrations as part of connection bootstrap.
    let conn = open_db(path)?;
    drop(conn);
    Ok(())
}

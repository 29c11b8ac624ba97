use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use crate::foundation::error::{SheetError, SheetResult};

/// Calls a closure with the elapsed milliseconds at a fixed interval on a background thread.
///
/// The closure returns `false` to stop on its own. Dropping the ticker stops and joins it.
pub struct Ticker {
    stop: Arc<AtomicBool>,
    join: Option<JoinHandle<()>>,
}

impl Ticker {
    /// Start ticking. The first call happens after one `interval`.
    pub fn spawn<F>(interval: Duration, mut on_tick: F) -> SheetResult<Self>
    where
        F: FnMut(f64) -> bool + Send + 'static,
    {
        if interval.is_zero() {
            return Err(SheetError::validation("tick interval must be > 0"));
        }
        let stop = Arc::new(AtomicBool::new(false));
        let thread_stop = stop.clone();
        let join = std::thread::Builder::new()
            .name("sheetloop-ticker".to_owned())
            .spawn(move || {
                let start = Instant::now();
                let mut next = start + interval;
                loop {
                    let now = Instant::now();
                    if now < next {
                        std::thread::park_timeout(next - now);
                    }
                    if thread_stop.load(Ordering::SeqCst) {
                        break;
                    }
                    if Instant::now() < next {
                        continue;
                    }
                    if !on_tick(start.elapsed().as_secs_f64() * 1000.0) {
                        break;
                    }
                    next += interval;
                }
                tracing::debug!("ticker stopped");
            })
            .map_err(|e| SheetError::Other(anyhow::anyhow!("failed to spawn ticker: {e}")))?;

        Ok(Self {
            stop,
            join: Some(join),
        })
    }

    /// Whether the tick thread has exited.
    pub fn is_finished(&self) -> bool {
        self.join.as_ref().is_none_or(JoinHandle::is_finished)
    }

    /// Stop ticking and wait for the thread.
    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        self.stop.store(true, Ordering::SeqCst);
        if let Some(join) = self.join.take() {
            join.thread().unpark();
            let _ = join.join();
        }
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl std::fmt::Debug for Ticker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ticker")
            .field("finished", &self.is_finished())
            .finish()
    }
}

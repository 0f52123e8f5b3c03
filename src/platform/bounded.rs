//! Time-bounded gesture acquisition
//!
//! Camera reads and model inference block for an unpredictable time. The
//! wrapped source runs on its own reader thread and the frame loop waits at
//! most `budget` for its next sample; a late sample counts as a missing frame.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread::JoinHandle;
use std::time::Duration;

use super::GestureSource;
use crate::gesture::GestureSample;

pub struct BoundedSource {
    samples: Receiver<Option<GestureSample>>,
    budget: Duration,
    shutdown: Arc<AtomicBool>,
    reader_handle: Option<JoinHandle<()>>,
    finished: bool,
}

impl BoundedSource {
    pub fn spawn<S>(source: S, budget: Duration) -> Self
    where
        S: GestureSource + Send + 'static,
    {
        // One slot: the reader never runs more than a frame ahead
        let (tx, rx) = mpsc::sync_channel(1);
        let shutdown = Arc::new(AtomicBool::new(false));
        let shutdown_clone = Arc::clone(&shutdown);

        let reader_handle = std::thread::spawn(move || {
            let mut source = source;
            loop {
                if shutdown_clone.load(Ordering::Relaxed) || source.is_finished() {
                    break;
                }
                let sample = source.next_sample();
                if tx.send(sample).is_err() {
                    break;
                }
            }
            log::debug!("gesture reader thread exiting");
        });

        Self {
            samples: rx,
            budget,
            shutdown,
            reader_handle: Some(reader_handle),
            finished: false,
        }
    }
}

impl GestureSource for BoundedSource {
    fn next_sample(&mut self) -> Option<GestureSample> {
        if self.finished {
            return None;
        }
        match self.samples.recv_timeout(self.budget) {
            Ok(sample) => sample,
            Err(RecvTimeoutError::Timeout) => {
                log::debug!("gesture sample missed the {:?} budget", self.budget);
                None
            }
            Err(RecvTimeoutError::Disconnected) => {
                self.finished = true;
                None
            }
        }
    }

    fn is_finished(&self) -> bool {
        self.finished
    }
}

impl Drop for BoundedSource {
    fn drop(&mut self) {
        self.shutdown.store(true, Ordering::Relaxed);
        if let Some(handle) = self.reader_handle.take() {
            // A reader stuck inside a blocking read is left to exit on its own
            if handle.is_finished() {
                let _ = handle.join();
            }
        }
    }
}

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant};
use tracing::{debug, warn};

use crate::controller::FetchController;

/// Handle feeding search-box text into a debounce worker.
///
/// Every input restarts the quiet window against the newest text. Only a
/// window that elapses without further input emits a query; blank text
/// cancels whatever was pending and never emits.
#[derive(Clone)]
pub struct SearchDebouncer {
    tx: mpsc::UnboundedSender<String>,
}

impl SearchDebouncer {
    /// Spawn the worker and return the handle plus the stream of settled queries.
    pub fn spawn(window: Duration) -> (Self, mpsc::UnboundedReceiver<String>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let (out, settled) = mpsc::unbounded_channel();

        let worker = DebounceWorker { window, rx, out };
        tokio::spawn(worker.run());

        (Self { tx }, settled)
    }

    /// Spawn a debouncer whose settled queries run as searches on `controller`.
    pub fn forward_to(window: Duration, controller: FetchController) -> (Self, JoinHandle<()>) {
        let (debouncer, mut settled) = Self::spawn(window);

        let forwarder = tokio::spawn(async move {
            while let Some(query) = settled.recv().await {
                controller.search(&query);
            }
        });

        (debouncer, forwarder)
    }

    /// Report the current contents of the search box.
    pub fn input(&self, text: impl Into<String>) {
        if self.tx.send(text.into()).is_err() {
            warn!("Search debouncer has stopped; dropping input");
        }
    }
}

struct DebounceWorker {
    window: Duration,
    rx: mpsc::UnboundedReceiver<String>,
    out: mpsc::UnboundedSender<String>,
}

impl DebounceWorker {
    async fn run(mut self) {
        let mut pending: Option<String> = None;
        let timer = time::sleep(self.window);
        tokio::pin!(timer);

        loop {
            tokio::select! {
                input = self.rx.recv() => match input {
                    Some(text) if text.trim().is_empty() => {
                        if pending.take().is_some() {
                            debug!("Blank search input cancelled pending query");
                        }
                    }
                    Some(text) => {
                        timer.as_mut().reset(Instant::now() + self.window);
                        pending = Some(text);
                    }
                    None => {
                        // Input side is gone; let a pending window run out
                        if let Some(query) = pending.take() {
                            timer.as_mut().await;
                            let _ = self.out.send(query);
                        }
                        break;
                    }
                },
                _ = timer.as_mut(), if pending.is_some() => {
                    if let Some(query) = pending.take() {
                        debug!(%query, "Search input settled");
                        if self.out.send(query).is_err() {
                            break;
                        }
                    }
                }
            }
        }

        debug!("Search debouncer stopped");
    }
}

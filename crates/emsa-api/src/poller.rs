//! Generic timed-refresh driver.
//!
//! Decouples "what to fetch" from "when to fetch": a page hands over an
//! async fetch function and a cadence, and reads the latest snapshot from a
//! watch channel. The fetch future is awaited inline in the task loop, so at
//! most one fetch is ever in flight per poller; interval ticks that elapse
//! mid-fetch are skipped, never queued.

use std::fmt::Display;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// The last successfully fetched record sequence, plus error state.
///
/// A failed fetch keeps the previous records and only swaps the error, so a
/// transient outage never blanks the UI.
#[derive(Debug)]
pub struct Instantanea<T> {
    pub registros: Arc<Vec<T>>,
    /// Monotonically increasing fetch sequence, bumped on success only.
    pub secuencia: u64,
    pub ultimo_error: Option<String>,
}

impl<T> Clone for Instantanea<T> {
    fn clone(&self) -> Self {
        Self {
            registros: Arc::clone(&self.registros),
            secuencia: self.secuencia,
            ultimo_error: self.ultimo_error.clone(),
        }
    }
}

impl<T> Default for Instantanea<T> {
    fn default() -> Self {
        Self {
            registros: Arc::new(Vec::new()),
            secuencia: 0,
            ultimo_error: None,
        }
    }
}

/// Handle to a running poller task. Dropping the handle stops the task.
#[derive(Debug)]
pub struct ResourcePoller<T> {
    rx: watch::Receiver<Instantanea<T>>,
    refresh_tx: mpsc::Sender<()>,
    cancel: CancellationToken,
}

impl<T: Send + Sync + 'static> ResourcePoller<T> {
    /// Start polling: one immediate fetch, then one per `periodo` until
    /// [`Self::stop`].
    pub fn spawn<F, Fut, E>(fetch: F, periodo: Duration) -> Self
    where
        F: Fn() -> Fut + Send + 'static,
        Fut: Future<Output = Result<Vec<T>, E>> + Send + 'static,
        E: Display + Send + 'static,
    {
        let (tx, rx) = watch::channel(Instantanea::default());
        let (refresh_tx, mut refresh_rx) = mpsc::channel::<()>(1);
        let cancel = CancellationToken::new();
        let token = cancel.clone();

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(periodo);
            // A tick elapsing while a fetch is in flight is dropped, not
            // replayed, keeping the at-most-one-in-flight rule.
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                tokio::select! {
                    biased;
                    () = token.cancelled() => break,
                    _ = ticker.tick() => {}
                    Some(()) = refresh_rx.recv() => {}
                }
                // Guard the in-flight fetch too: after stop() the result is
                // discarded, never applied to the snapshot.
                let resultado = tokio::select! {
                    biased;
                    () = token.cancelled() => break,
                    r = fetch() => r,
                };
                tx.send_modify(|instantanea| match resultado {
                    Ok(registros) => {
                        instantanea.registros = Arc::new(registros);
                        instantanea.secuencia += 1;
                        instantanea.ultimo_error = None;
                    }
                    Err(e) => {
                        debug!(error = %e, "fetch failed, keeping previous snapshot");
                        instantanea.ultimo_error = Some(e.to_string());
                    }
                });
            }
        });

        Self {
            rx,
            refresh_tx,
            cancel,
        }
    }

    /// Latest snapshot.
    pub fn instantanea(&self) -> Instantanea<T> {
        self.rx.borrow().clone()
    }

    /// A receiver that observes every published snapshot.
    pub fn subscribe(&self) -> watch::Receiver<Instantanea<T>> {
        self.rx.clone()
    }

    /// Request an out-of-band fetch. Collapses with a fetch already in
    /// flight or already requested.
    pub fn refresh_now(&self) {
        let _ = self.refresh_tx.try_send(());
    }

    /// Stop polling. Any in-flight fetch is discarded.
    pub fn stop(&self) {
        self.cancel.cancel();
    }
}

impl<T> Drop for ResourcePoller<T> {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

// ── Scanner lifecycle controller ──
//
// One abstraction over physical QR/barcode scanners. A scan session is
// single-shot: `start()` opens the device, the first decoded value is
// delivered after a short settle window (wedge scanners repeat the same
// code several times per trigger pull), then the session is released.

mod wedge;

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

pub use wedge::LineWedge;

#[derive(Debug, Error)]
pub enum ScanError {
    /// The device could not be opened.
    #[error("scanner unavailable: {message}")]
    Unavailable { message: String },

    /// A session is already running.
    #[error("a scan is already in progress")]
    Busy,

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Observable lifecycle of the scanner.
///
/// Transitions: `Idle → Starting → Active → Stopping → Idle`. A failed
/// open short-circuits `Starting → Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScannerState {
    #[default]
    Idle,
    Starting,
    Active,
    Stopping,
}

/// What a scan session produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanEvent {
    /// Decoded text, delivered at most once per session.
    Decoded(String),
    /// The session ended without a decode (open failure or stream end).
    Failed(String),
}

// ── Backend traits ──────────────────────────────────────────────────

/// A scanner device driver. Opening yields a session that streams
/// decoded values until closed.
pub trait ScanBackend: Send + Sync + 'static {
    type Session: ScanSession;

    fn open(&self) -> impl Future<Output = Result<Self::Session, ScanError>> + Send;
}

/// An open device session.
pub trait ScanSession: Send + 'static {
    /// Next decoded value, or `None` when the device stream ends.
    fn next_decode(&mut self) -> impl Future<Output = Option<String>> + Send;

    /// Release the device. Must be safe to call after `next_decode`
    /// returned `None`.
    fn close(&mut self) -> impl Future<Output = Result<(), ScanError>> + Send;
}

// ── Controller ──────────────────────────────────────────────────────

struct SessionHandle {
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

/// Drives one backend through the session lifecycle.
///
/// `start`/`stop` are synchronous and safe to call from UI event
/// handlers; the session itself runs on a spawned task. Decodes and
/// failures arrive on the event channel returned by [`Scanner::new`].
pub struct Scanner<B: ScanBackend> {
    backend: Arc<B>,
    settle: Duration,
    events_tx: mpsc::UnboundedSender<ScanEvent>,
    state_tx: watch::Sender<ScannerState>,
    session: Option<SessionHandle>,
}

impl<B: ScanBackend> Scanner<B> {
    pub fn new(backend: B, settle: Duration) -> (Self, mpsc::UnboundedReceiver<ScanEvent>) {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let (state_tx, _) = watch::channel(ScannerState::Idle);

        let scanner = Self {
            backend: Arc::new(backend),
            settle,
            events_tx,
            state_tx,
            session: None,
        };
        (scanner, events_rx)
    }

    pub fn state(&self) -> watch::Receiver<ScannerState> {
        self.state_tx.subscribe()
    }

    pub fn current_state(&self) -> ScannerState {
        *self.state_tx.borrow()
    }

    /// Begin a scan session. Only legal from `Idle`.
    pub fn start(&mut self) -> Result<(), ScanError> {
        if self.current_state() != ScannerState::Idle {
            return Err(ScanError::Busy);
        }

        self.state_tx.send_modify(|s| *s = ScannerState::Starting);

        let cancel = CancellationToken::new();
        let task = tokio::spawn(session_task(
            Arc::clone(&self.backend),
            self.settle,
            cancel.clone(),
            self.events_tx.clone(),
            self.state_tx.clone(),
        ));

        self.session = Some(SessionHandle { cancel, task });
        Ok(())
    }

    /// Request the current session to end. Idempotent; a no-op at `Idle`.
    pub fn stop(&self) {
        if let Some(handle) = &self.session {
            handle.cancel.cancel();
        }
    }

    /// Stop and wait for the session task to finish releasing the device.
    pub async fn shutdown(&mut self) {
        if let Some(handle) = self.session.take() {
            handle.cancel.cancel();
            if let Err(e) = handle.task.await {
                warn!("scanner session task panicked: {e}");
            }
        }
    }
}

impl<B: ScanBackend> Drop for Scanner<B> {
    fn drop(&mut self) {
        if let Some(handle) = &self.session {
            handle.cancel.cancel();
        }
    }
}

// ── Session task ────────────────────────────────────────────────────

async fn session_task<B: ScanBackend>(
    backend: Arc<B>,
    settle: Duration,
    cancel: CancellationToken,
    events_tx: mpsc::UnboundedSender<ScanEvent>,
    state_tx: watch::Sender<ScannerState>,
) {
    let mut session = match backend.open().await {
        Ok(session) => session,
        Err(err) => {
            warn!("scanner open failed: {err}");
            let _ = events_tx.send(ScanEvent::Failed(err.to_string()));
            state_tx.send_modify(|s| *s = ScannerState::Idle);
            return;
        }
    };

    // `stop()` may have raced the open.
    if cancel.is_cancelled() {
        release(&mut session, &state_tx).await;
        return;
    }

    state_tx.send_modify(|s| *s = ScannerState::Active);
    debug!("scan session active");

    // Wait for the first decode (or cancellation / stream end).
    let first = tokio::select! {
        biased;
        () = cancel.cancelled() => None,
        decode = session.next_decode() => {
            if decode.is_none() && !cancel.is_cancelled() {
                let _ = events_tx.send(ScanEvent::Failed("scanner stream ended".into()));
            }
            decode
        }
    };

    let Some(value) = first else {
        release(&mut session, &state_tx).await;
        return;
    };

    // Settle window: swallow trigger-repeat duplicates of the decode.
    let deadline = tokio::time::sleep(settle);
    tokio::pin!(deadline);
    let mut cancelled = false;
    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => {
                cancelled = true;
                break;
            }
            () = &mut deadline => break,
            extra = session.next_decode() => {
                match extra {
                    Some(dup) => {
                        if dup != value {
                            debug!("dropping late decode {dup:?} within settle window");
                        }
                    }
                    None => break,
                }
            }
        }
    }

    if !cancelled {
        let _ = events_tx.send(ScanEvent::Decoded(value));
    }

    release(&mut session, &state_tx).await;
}

/// Close the device and walk the state back to `Idle`. Close failures
/// are logged, never surfaced: the session is over either way.
async fn release<S: ScanSession>(session: &mut S, state_tx: &watch::Sender<ScannerState>) {
    state_tx.send_modify(|s| *s = ScannerState::Stopping);
    if let Err(err) = session.close().await {
        warn!("scanner close failed: {err}");
    }
    state_tx.send_modify(|s| *s = ScannerState::Idle);
}

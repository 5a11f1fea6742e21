//! Background reader task.
//!
//! The task owns the transport exclusively and is the only place the
//! operating mode is mutated, so command ordering and mode transitions
//! are serialized by construction. Control operations arrive over an
//! `mpsc` channel and are acknowledged with `oneshot`s; inbound bytes
//! are polled between requests and dispatched according to the current
//! mode:
//!
//! - `STARTUP`: fed to the firmware handshake parser; a compatible
//!   report moves the radio to `RX`.
//! - `RX` / `SCAN`: forwarded as audio payload.
//! - `TX`: dropped (half duplex, the stream carries nothing meaningful).
//!
//! Send failures do not fail the requesting operation; they are emitted
//! as [`RadioEvent::Error`] so the subscriber decides policy.

use std::time::Duration;

use bytes::Bytes;
use tokio::sync::{broadcast, mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use kv4p_core::error::Result;
use kv4p_core::events::RadioEvent;
use kv4p_core::transport::Transport;
use kv4p_core::types::RadioMode;

use crate::commands::{self, FilterConfig, TuneParams};
use crate::handshake::{HandshakeOutcome, HandshakeParser};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// A control request sent from [`Kv4pRadio`](crate::Kv4pRadio) to the
/// reader task.
pub(crate) enum Request {
    /// Reset protocol state and start the firmware handshake.
    Initialize { done: oneshot::Sender<()> },
    /// Send a `TUNE_TO` frame with an already normalized block.
    TuneTo {
        params: TuneParams,
        done: oneshot::Sender<()>,
    },
    /// Send a `FILTERS` frame.
    SetFilters {
        config: FilterConfig,
        done: oneshot::Sender<()>,
    },
    /// Enter RX mode (no frame; mode change only).
    StartRx { done: oneshot::Sender<()> },
    /// Key the transmitter and enter TX mode.
    StartTx { done: oneshot::Sender<()> },
    /// Release the transmitter and return to RX. No-op outside TX.
    EndTx { done: oneshot::Sender<()> },
    /// Send a `STOP` frame and return to RX.
    Stop { done: oneshot::Sender<()> },
    /// Close the transport and exit the task.
    Close { done: oneshot::Sender<Result<()>> },
}

/// Handle to the background reader task.
pub(crate) struct ReaderHandle {
    pub cmd_tx: mpsc::Sender<Request>,
    /// Kept so the task can be aborted when the radio is dropped.
    #[allow(dead_code)]
    pub task_handle: JoinHandle<()>,
}

// ---------------------------------------------------------------------------
// Spawn
// ---------------------------------------------------------------------------

/// Spawn the background reader task.
///
/// The task owns the transport exclusively; `event_tx` receives inbound
/// traffic and error notifications, `mode_tx` tracks the operating mode.
pub(crate) fn spawn_reader_task(
    transport: Box<dyn Transport>,
    event_tx: broadcast::Sender<RadioEvent>,
    mode_tx: watch::Sender<RadioMode>,
    read_timeout: Duration,
) -> ReaderHandle {
    let (cmd_tx, cmd_rx) = mpsc::channel::<Request>(16);

    let task = ReaderTask {
        transport,
        event_tx,
        mode_tx,
        read_timeout,
        handshake: HandshakeParser::new(),
    };

    let task_handle = tokio::spawn(task.run(cmd_rx));

    ReaderHandle {
        cmd_tx,
        task_handle,
    }
}

// ---------------------------------------------------------------------------
// Reader task
// ---------------------------------------------------------------------------

struct ReaderTask {
    transport: Box<dyn Transport>,
    event_tx: broadcast::Sender<RadioEvent>,
    mode_tx: watch::Sender<RadioMode>,
    read_timeout: Duration,
    handshake: HandshakeParser,
}

impl ReaderTask {
    /// The main loop. Uses `tokio::select! { biased; }` to prioritize
    /// control requests over idle stream polling.
    async fn run(mut self, mut cmd_rx: mpsc::Receiver<Request>) {
        loop {
            tokio::select! {
                biased;

                cmd = cmd_rx.recv() => {
                    match cmd {
                        Some(Request::Close { done }) => {
                            let result = self.transport.close().await;
                            let _ = done.send(result);
                            break;
                        }
                        Some(request) => self.handle_request(request).await,
                        None => {
                            // All senders dropped -- Kv4pRadio was dropped.
                            debug!("control channel closed, exiting reader loop");
                            let _ = self.transport.close().await;
                            break;
                        }
                    }
                }

                _ = async {
                    let mut buf = [0u8; 4096];
                    match self.transport.receive(&mut buf, self.read_timeout).await {
                        Ok(n) if n > 0 => {
                            self.handle_inbound(&buf[..n]);
                        }
                        Ok(_) => {
                            // A zero-byte read is end-of-stream: the
                            // device detached without an I/O error.
                            self.emit_error(
                                &kv4p_core::Error::ConnectionLost,
                                "inbound stream ended",
                            );
                            tokio::time::sleep(Duration::from_millis(10)).await;
                        }
                        Err(kv4p_core::Error::Timeout) => {}
                        Err(e) => {
                            self.emit_error(&e, "inbound read failed");
                            tokio::time::sleep(Duration::from_millis(10)).await;
                        }
                    }
                } => {}
            }
        }
    }

    async fn handle_request(&mut self, request: Request) {
        match request {
            Request::Initialize { done } => {
                self.set_mode(RadioMode::Startup);
                self.handshake.reset();
                self.send_frame(commands::cmd_stop()).await;
                self.send_frame(commands::cmd_get_firmware_ver()).await;
                let _ = done.send(());
            }
            Request::TuneTo { params, done } => {
                debug!(
                    tx = %params.tx_frequency,
                    rx = %params.rx_frequency,
                    "tuning"
                );
                self.send_frame(commands::cmd_tune_to(&params)).await;
                let _ = done.send(());
            }
            Request::SetFilters { config, done } => {
                self.send_frame(commands::cmd_set_filters(&config)).await;
                let _ = done.send(());
            }
            Request::StartRx { done } => {
                self.set_mode(RadioMode::Rx);
                let _ = done.send(());
            }
            Request::StartTx { done } => {
                self.send_frame(commands::cmd_ptt_down()).await;
                self.set_mode(RadioMode::Tx);
                let _ = done.send(());
            }
            Request::EndTx { done } => {
                // Only meaningful while transmitting.
                if *self.mode_tx.borrow() == RadioMode::Tx {
                    self.send_frame(commands::cmd_ptt_up()).await;
                    self.set_mode(RadioMode::Rx);
                }
                let _ = done.send(());
            }
            Request::Stop { done } => {
                self.send_frame(commands::cmd_stop()).await;
                self.set_mode(RadioMode::Rx);
                let _ = done.send(());
            }
            Request::Close { .. } => unreachable!("Close handled in run()"),
        }
    }

    /// Dispatch a chunk of inbound bytes according to the current mode.
    fn handle_inbound(&mut self, data: &[u8]) {
        let raw = Bytes::copy_from_slice(data);
        let _ = self.event_tx.send(RadioEvent::RawData(raw.clone()));

        // Copy the mode out: a match scrutinee would hold the watch read
        // guard across the arms, and the handshake arm writes the mode.
        let mode = *self.mode_tx.borrow();
        match mode {
            RadioMode::Startup => match self.handshake.push(data) {
                HandshakeOutcome::Pending => {}
                HandshakeOutcome::Compatible(version) => {
                    debug!(version, "firmware handshake complete");
                    self.set_mode(RadioMode::Rx);
                }
                HandshakeOutcome::Unsupported(version) => {
                    warn!(version, "firmware version unsupported");
                    let _ = self.event_tx.send(RadioEvent::Error {
                        kind: kv4p_core::ErrorKind::Protocol,
                        message: format!(
                            "firmware version {version} is below the supported minimum"
                        ),
                    });
                }
                HandshakeOutcome::Malformed(field) => {
                    warn!(field, "malformed firmware version report");
                    let _ = self.event_tx.send(RadioEvent::Error {
                        kind: kv4p_core::ErrorKind::Protocol,
                        message: format!("malformed firmware version field: {field:?}"),
                    });
                }
            },
            RadioMode::Rx | RadioMode::Scan => {
                let _ = self.event_tx.send(RadioEvent::AudioData(raw));
            }
            RadioMode::Tx => {
                // Half duplex: inbound bytes during TX carry nothing.
            }
        }
    }

    /// Write a command frame, converting a failure into an error event.
    async fn send_frame(&mut self, frame: Vec<u8>) {
        if let Err(e) = self.transport.send(&frame).await {
            self.emit_error(&e, "command send failed");
        }
    }

    fn emit_error(&self, error: &kv4p_core::Error, context: &str) {
        warn!(%error, context);
        let _ = self.event_tx.send(RadioEvent::Error {
            kind: error.kind(),
            message: format!("{context}: {error}"),
        });
    }

    /// Update the mode, emitting [`RadioEvent::ModeChanged`] only on an
    /// actual change.
    fn set_mode(&self, mode: RadioMode) {
        let changed = self.mode_tx.send_if_modified(|current| {
            if *current == mode {
                false
            } else {
                *current = mode;
                true
            }
        });
        if changed {
            debug!(%mode, "mode changed");
            let _ = self.event_tx.send(RadioEvent::ModeChanged { mode });
        }
    }
}

//! [`Kv4pRadio`]: the public control surface.
//!
//! All operations are forwarded to the background reader task, which
//! owns the transport and the operating mode; each call resolves once
//! the task has processed it, so two concurrent callers can never
//! interleave a frame write with a mode transition.

use std::time::Duration;

use tokio::sync::{broadcast, mpsc, oneshot, watch};
use tracing::info;

use kv4p_core::error::{Error, Result};
use kv4p_core::events::RadioEvent;
use kv4p_core::transport::Transport;
use kv4p_core::types::RadioMode;

use crate::commands::{FilterConfig, TuneParams};
use crate::reader::{spawn_reader_task, ReaderHandle, Request};

/// Capacity of the event broadcast channel. A continuous RX audio
/// stream can outrun a slow subscriber; 256 chunks of headroom keeps
/// lag rare without unbounded memory.
const EVENT_CHANNEL_CAPACITY: usize = 256;

/// Handle to a kv4p HT radio.
///
/// Created with [`Kv4pBuilder`](crate::Kv4pBuilder). Cheap to use from
/// multiple tasks through `&self`; operations are serialized internally.
pub struct Kv4pRadio {
    cmd_tx: mpsc::Sender<Request>,
    event_tx: broadcast::Sender<RadioEvent>,
    mode_rx: watch::Receiver<RadioMode>,
    #[allow(dead_code)]
    reader: ReaderHandle,
}

impl Kv4pRadio {
    /// Wire up the protocol engine around an open transport.
    pub(crate) fn spawn(transport: Box<dyn Transport>, read_timeout: Duration) -> Self {
        let (event_tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        let (mode_tx, mode_rx) = watch::channel(RadioMode::Startup);
        let reader = spawn_reader_task(transport, event_tx.clone(), mode_tx, read_timeout);

        Kv4pRadio {
            cmd_tx: reader.cmd_tx.clone(),
            event_tx,
            mode_rx,
            reader,
        }
    }

    /// Subscribe to radio events (raw traffic, audio, mode changes,
    /// errors).
    ///
    /// Delivery is best effort: a subscriber that falls behind by more
    /// than the channel capacity misses the oldest events.
    pub fn subscribe(&self) -> broadcast::Receiver<RadioEvent> {
        self.event_tx.subscribe()
    }

    /// The current operating mode.
    pub fn mode(&self) -> RadioMode {
        *self.mode_rx.borrow()
    }

    /// Reset protocol state and start the firmware handshake.
    ///
    /// Sends `STOP` then `GET_FIRMWARE_VER` and enters `STARTUP` mode;
    /// the radio moves to `RX` on its own once a compatible version
    /// report arrives on the inbound stream.
    pub async fn initialize(&self) -> Result<()> {
        info!("initializing radio");
        self.request(|done| Request::Initialize { done }).await
    }

    /// Tune to a TX/RX frequency pair with CTCSS tone and squelch.
    ///
    /// Frequencies are normalized into the 144-148 MHz band before
    /// anything is sent (see
    /// [`commands::normalize_frequency`](crate::commands::normalize_frequency));
    /// blank frequencies, a tone index above 99, or a squelch level
    /// above 9 fail with [`Error::InvalidParameter`] without touching
    /// the transport.
    pub async fn tune_to_frequency(
        &self,
        tx: &str,
        rx: &str,
        tone: u8,
        squelch: u8,
    ) -> Result<()> {
        let params = TuneParams::new(tx, rx, tone, squelch)?;
        self.request(|done| Request::TuneTo { params, done }).await
    }

    /// Configure the radio's audio filters.
    pub async fn set_filters(&self, config: FilterConfig) -> Result<()> {
        self.request(|done| Request::SetFilters { config, done })
            .await
    }

    /// Enter RX mode explicitly.
    ///
    /// Normally unnecessary -- a successful handshake lands in RX -- but
    /// useful to resume audio dispatch after external state changes.
    pub async fn start_rx_mode(&self) -> Result<()> {
        self.request(|done| Request::StartRx { done }).await
    }

    /// Key the transmitter (`PTT_DOWN`) and enter TX mode.
    ///
    /// While in TX the inbound stream is discarded; call
    /// [`end_tx_mode`](Self::end_tx_mode) to release.
    pub async fn start_tx_mode(&self) -> Result<()> {
        self.request(|done| Request::StartTx { done }).await
    }

    /// Release the transmitter (`PTT_UP`) and return to RX mode.
    ///
    /// A no-op when the radio is not transmitting.
    pub async fn end_tx_mode(&self) -> Result<()> {
        self.request(|done| Request::EndTx { done }).await
    }

    /// Send `STOP` and return to RX mode.
    ///
    /// Safe to call at any time, including repeatedly.
    pub async fn stop(&self) -> Result<()> {
        self.request(|done| Request::Stop { done }).await
    }

    /// Close the underlying transport and shut down the reader task.
    ///
    /// Any operation after `close` fails with [`Error::NotConnected`].
    pub async fn close(&self) -> Result<()> {
        info!("closing radio");
        let (done, ack) = oneshot::channel();
        self.cmd_tx
            .send(Request::Close { done })
            .await
            .map_err(|_| Error::NotConnected)?;
        ack.await.map_err(|_| Error::NotConnected)?
    }

    /// Send a request to the reader task and wait for its ack.
    async fn request(&self, make: impl FnOnce(oneshot::Sender<()>) -> Request) -> Result<()> {
        let (done, ack) = oneshot::channel();
        self.cmd_tx
            .send(make(done))
            .await
            .map_err(|_| Error::NotConnected)?;
        ack.await.map_err(|_| Error::NotConnected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kv4p_core::ErrorKind;
    use kv4p_test_harness::MockTransport;

    const READ_TIMEOUT: Duration = Duration::from_millis(20);
    const EVENT_TIMEOUT: Duration = Duration::from_secs(1);

    fn frame(opcode: u8, params: &[u8]) -> Vec<u8> {
        let mut f = vec![0xFF, 0x00, 0xFF, 0x00, 0xFF, 0x00, 0xFF, 0x00, opcode];
        f.extend_from_slice(params);
        f
    }

    fn radio_with_mock() -> (Kv4pRadio, kv4p_test_harness::MockHandle) {
        let mock = MockTransport::new();
        let handle = mock.handle();
        let radio = Kv4pRadio::spawn(Box::new(mock), READ_TIMEOUT);
        (radio, handle)
    }

    async fn next_event(rx: &mut broadcast::Receiver<RadioEvent>) -> RadioEvent {
        tokio::time::timeout(EVENT_TIMEOUT, rx.recv())
            .await
            .expect("timed out waiting for event")
            .expect("event channel closed")
    }

    /// Wait until the mode watch reports `mode`.
    async fn wait_for_mode(radio: &Kv4pRadio, mode: RadioMode) {
        let mut rx = radio.mode_rx.clone();
        tokio::time::timeout(EVENT_TIMEOUT, rx.wait_for(|m| *m == mode))
            .await
            .expect("timed out waiting for mode")
            .expect("mode channel closed");
    }

    #[tokio::test]
    async fn initialize_sends_stop_then_get_firmware_ver() {
        let (radio, handle) = radio_with_mock();

        radio.initialize().await.unwrap();

        assert_eq!(
            handle.sent_frames(),
            vec![frame(5, b""), frame(6, b"")],
        );
        assert_eq!(radio.mode(), RadioMode::Startup);
    }

    #[tokio::test]
    async fn compatible_handshake_moves_to_rx() {
        let (radio, handle) = radio_with_mock();
        let mut events = radio.subscribe();

        radio.initialize().await.unwrap();
        handle.push_rx(b"garbageVERSION00000001");

        wait_for_mode(&radio, RadioMode::Rx).await;
        assert_eq!(radio.mode(), RadioMode::Rx);

        // RawData for the chunk, then the mode change.
        let mut saw_mode_change = false;
        for _ in 0..4 {
            match next_event(&mut events).await {
                RadioEvent::ModeChanged { mode } => {
                    assert_eq!(mode, RadioMode::Rx);
                    saw_mode_change = true;
                    break;
                }
                RadioEvent::RawData(_) => {}
                other => panic!("unexpected event {other:?}"),
            }
        }
        assert!(saw_mode_change);
    }

    #[tokio::test]
    async fn mode_stays_readable_through_handshake_transition() {
        // The STARTUP -> RX transition happens inside the reader task
        // while it holds no lock a `mode()` reader could contend on;
        // polling `mode()` from outside must observe RX promptly.
        let (radio, handle) = radio_with_mock();

        radio.initialize().await.unwrap();
        handle.push_rx(b"VERSION00000001");

        let deadline = tokio::time::Instant::now() + Duration::from_secs(2);
        while radio.mode() != RadioMode::Rx {
            assert!(
                tokio::time::Instant::now() < deadline,
                "mode never reached RX after a compatible report"
            );
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    }

    #[tokio::test]
    async fn fragmented_handshake_completes() {
        let (radio, handle) = radio_with_mock();

        radio.initialize().await.unwrap();
        handle.push_rx(b"VERSI");
        handle.push_rx(b"ON000");
        handle.push_rx(b"00002");

        wait_for_mode(&radio, RadioMode::Rx).await;
    }

    #[tokio::test]
    async fn unsupported_firmware_stays_in_startup_and_reports() {
        let (radio, handle) = radio_with_mock();
        let mut events = radio.subscribe();

        radio.initialize().await.unwrap();
        handle.push_rx(b"VERSION00000000");

        let mut saw_error = false;
        for _ in 0..4 {
            match next_event(&mut events).await {
                RadioEvent::Error { kind, message } => {
                    assert_eq!(kind, ErrorKind::Protocol);
                    assert!(message.contains('0'), "{message}");
                    saw_error = true;
                    break;
                }
                RadioEvent::RawData(_) => {}
                other => panic!("unexpected event {other:?}"),
            }
        }
        assert!(saw_error);
        assert_eq!(radio.mode(), RadioMode::Startup);
    }

    #[tokio::test]
    async fn malformed_handshake_reports_protocol_error() {
        let (radio, handle) = radio_with_mock();
        let mut events = radio.subscribe();

        radio.initialize().await.unwrap();
        handle.push_rx(b"VERSIONabcdefgh");

        let mut saw_error = false;
        for _ in 0..4 {
            if let RadioEvent::Error { kind, .. } = next_event(&mut events).await {
                assert_eq!(kind, ErrorKind::Protocol);
                saw_error = true;
                break;
            }
        }
        assert!(saw_error);
        assert_eq!(radio.mode(), RadioMode::Startup);
    }

    #[tokio::test]
    async fn tune_sends_normalized_block() {
        let (radio, handle) = radio_with_mock();

        radio
            .tune_to_frequency("146.52", "147.000", 0, 2)
            .await
            .unwrap();

        assert_eq!(
            handle.sent_frames(),
            vec![frame(3, b"146.520147.000002")],
        );
    }

    #[tokio::test]
    async fn tune_validation_fails_without_sending() {
        let (radio, handle) = radio_with_mock();

        let result = radio.tune_to_frequency("", "146.52", 0, 2).await;
        assert!(matches!(result, Err(Error::InvalidParameter(_))));

        let result = radio.tune_to_frequency("146.52", "146.52", 0, 42).await;
        assert!(matches!(result, Err(Error::InvalidParameter(_))));

        assert_eq!(handle.sent_count(), 0);
    }

    #[tokio::test]
    async fn set_filters_sends_flags() {
        let (radio, handle) = radio_with_mock();

        radio
            .set_filters(FilterConfig {
                emphasis: true,
                high_pass: false,
                low_pass: true,
            })
            .await
            .unwrap();

        assert_eq!(handle.sent_frames(), vec![frame(4, b"101")]);
    }

    #[tokio::test]
    async fn tx_cycle_sends_ptt_frames_and_tracks_mode() {
        let (radio, handle) = radio_with_mock();

        radio.start_tx_mode().await.unwrap();
        assert_eq!(radio.mode(), RadioMode::Tx);

        radio.end_tx_mode().await.unwrap();
        assert_eq!(radio.mode(), RadioMode::Rx);

        assert_eq!(
            handle.sent_frames(),
            vec![frame(1, b""), frame(2, b"")],
        );
    }

    #[tokio::test]
    async fn end_tx_outside_tx_is_a_no_op() {
        let (radio, handle) = radio_with_mock();

        radio.end_tx_mode().await.unwrap();

        assert_eq!(handle.sent_count(), 0);
        assert_eq!(radio.mode(), RadioMode::Startup);
    }

    #[tokio::test]
    async fn stop_is_idempotent_on_the_wire() {
        let (radio, handle) = radio_with_mock();

        radio.stop().await.unwrap();
        radio.stop().await.unwrap();

        assert_eq!(handle.sent_frames(), vec![frame(5, b""), frame(5, b"")]);
        assert_eq!(radio.mode(), RadioMode::Rx);
    }

    #[tokio::test]
    async fn rx_mode_dispatches_audio() {
        let (radio, handle) = radio_with_mock();
        let mut events = radio.subscribe();

        radio.start_rx_mode().await.unwrap();
        handle.push_rx(&[0x10, 0x20, 0x30]);

        let mut saw_raw = false;
        let mut saw_audio = false;
        for _ in 0..4 {
            match next_event(&mut events).await {
                RadioEvent::RawData(data) => {
                    assert_eq!(&data[..], &[0x10, 0x20, 0x30]);
                    saw_raw = true;
                }
                RadioEvent::AudioData(data) => {
                    assert_eq!(&data[..], &[0x10, 0x20, 0x30]);
                    saw_audio = true;
                }
                RadioEvent::ModeChanged { .. } => {}
                other => panic!("unexpected event {other:?}"),
            }
            if saw_raw && saw_audio {
                break;
            }
        }
        assert!(saw_raw && saw_audio);
    }

    #[tokio::test]
    async fn tx_mode_drops_inbound_audio() {
        let (radio, handle) = radio_with_mock();
        let mut events = radio.subscribe();

        radio.start_tx_mode().await.unwrap();
        handle.push_rx(&[0xAA, 0xBB]);

        // RawData still fires; AudioData must not.
        let mut saw_raw = false;
        for _ in 0..3 {
            match next_event(&mut events).await {
                RadioEvent::RawData(data) => {
                    assert_eq!(&data[..], &[0xAA, 0xBB]);
                    saw_raw = true;
                    break;
                }
                RadioEvent::ModeChanged { .. } => {}
                RadioEvent::AudioData(_) => panic!("audio dispatched during TX"),
                other => panic!("unexpected event {other:?}"),
            }
        }
        assert!(saw_raw);
        assert!(matches!(
            tokio::time::timeout(Duration::from_millis(100), events.recv()).await,
            Err(_)
        ));
    }

    #[tokio::test]
    async fn send_failure_becomes_error_event_not_result() {
        let (radio, handle) = radio_with_mock();
        let mut events = radio.subscribe();

        handle.set_connected(false);

        // The operation itself still resolves Ok; the failure surfaces
        // as an event.
        radio.stop().await.unwrap();

        let mut saw_error = false;
        for _ in 0..3 {
            if let RadioEvent::Error { kind, .. } = next_event(&mut events).await {
                assert_eq!(kind, ErrorKind::Transport);
                saw_error = true;
                break;
            }
        }
        assert!(saw_error);
    }

    #[tokio::test]
    async fn close_then_operation_fails_not_connected() {
        let (radio, handle) = radio_with_mock();

        radio.close().await.unwrap();
        assert!(!handle.is_connected());

        let result = radio.stop().await;
        assert!(matches!(result, Err(Error::NotConnected)));
    }

    #[tokio::test]
    async fn reinitialize_restarts_handshake() {
        let (radio, handle) = radio_with_mock();

        radio.initialize().await.unwrap();
        handle.push_rx(b"VERSION00000001");
        wait_for_mode(&radio, RadioMode::Rx).await;

        radio.initialize().await.unwrap();
        assert_eq!(radio.mode(), RadioMode::Startup);

        handle.push_rx(b"VERSION00000004");
        wait_for_mode(&radio, RadioMode::Rx).await;
    }
}

//! # kv4p -- Async control library for the kv4p HT
//!
//! The [kv4p HT](https://kv4p.com) is an open-hardware ESP32-based VHF
//! handheld transceiver that attaches to a host over USB serial. This
//! library drives its framed command protocol: tuning, push-to-talk,
//! audio filters, and the firmware version handshake, with inbound
//! audio and diagnostics delivered as an event stream.
//!
//! ## Quick Start
//!
//! ```no_run
//! use kv4p::{Kv4pBuilder, RadioEvent};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let radio = Kv4pBuilder::new()
//!         .serial_port("/dev/ttyUSB0")
//!         .build()
//!         .await?;
//!
//!     let mut events = radio.subscribe();
//!
//!     radio.initialize().await?;
//!     radio.tune_to_frequency("146.520", "146.520", 0, 2).await?;
//!
//!     while let Ok(event) = events.recv().await {
//!         if let RadioEvent::AudioData(chunk) = event {
//!             println!("audio: {} bytes", chunk.len());
//!         }
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! The library is organized as a workspace of focused crates:
//!
//! | Crate               | Purpose                                      |
//! |---------------------|----------------------------------------------|
//! | `kv4p-core`         | [`Transport`] trait, events, errors, types   |
//! | `kv4p-transport`    | USB serial transport (921600 baud)           |
//! | `kv4p-radio`        | Protocol engine: framing, handshake, modes   |
//! | `kv4p-test-harness` | Mock transport for testing without hardware  |
//! | **`kv4p`**          | This facade crate -- re-exports everything   |
//!
//! ## Operating Modes
//!
//! The radio moves through a small state machine tracked on the host:
//! `STARTUP` while waiting for the firmware version report, `RX` while
//! receiving (inbound bytes become [`RadioEvent::AudioData`]), and `TX`
//! while the transmitter is keyed (inbound bytes are discarded). A
//! compatible handshake moves `STARTUP` to `RX` automatically.

pub use kv4p_core::*;

/// Protocol engine: command framing, parameter normalization, the
/// firmware handshake, and the [`Kv4pRadio`](radio::Kv4pRadio) control
/// surface.
pub mod radio {
    pub use kv4p_radio::*;
}

/// USB serial transport for real hardware.
pub mod transport {
    pub use kv4p_transport::*;
}

pub use kv4p_radio::{Command, FilterConfig, Kv4pBuilder, Kv4pRadio, TuneParams, MIN_FIRMWARE_VER};

//! kv4p-radio: Protocol engine for the kv4p HT.
//!
//! The kv4p HT is an ESP32-based VHF transceiver controlled over USB
//! serial with a simple framed command protocol: every command is an
//! 8-byte delimiter, one opcode byte, and an optional ASCII parameter
//! block. Inbound traffic is an unframed byte stream whose meaning
//! depends on the current operating mode -- firmware handshake text
//! during startup, opaque audio payload while receiving.
//!
//! # Modules
//!
//! - [`protocol`] -- command opcodes and frame encoding
//! - [`commands`] -- frequency/squelch/tone normalization and command builders
//! - [`handshake`] -- firmware version handshake parser
//! - [`rig`] -- [`Kv4pRadio`], the public control surface
//! - [`builder`] -- [`Kv4pBuilder`] for constructing a radio
//!
//! # Quick start
//!
//! ```no_run
//! use kv4p_radio::Kv4pBuilder;
//!
//! # async fn example() -> kv4p_core::Result<()> {
//! let radio = Kv4pBuilder::new()
//!     .serial_port("/dev/ttyUSB0")
//!     .build()
//!     .await?;
//!
//! radio.initialize().await?;
//! radio.tune_to_frequency("146.520", "146.520", 0, 2).await?;
//! # Ok(())
//! # }
//! ```

pub mod builder;
pub mod commands;
pub mod handshake;
pub mod protocol;
mod reader;
pub mod rig;

pub use builder::Kv4pBuilder;
pub use commands::{FilterConfig, TuneParams};
pub use handshake::MIN_FIRMWARE_VER;
pub use protocol::Command;
pub use rig::Kv4pRadio;

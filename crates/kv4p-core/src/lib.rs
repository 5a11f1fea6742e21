//! kv4p-core: Core traits, types, and error definitions for the kv4p HT
//! control library.
//!
//! This crate defines the transport abstraction and the types shared
//! between the protocol engine (`kv4p-radio`) and consuming applications.
//! Nothing here performs I/O.
//!
//! # Key types
//!
//! - [`Transport`] -- byte-level channel to the radio
//! - [`RadioMode`] -- the operating mode tracked by the protocol engine
//! - [`RadioEvent`] -- asynchronous notifications (raw data, audio, errors)
//! - [`Error`] / [`Result`] -- error handling

pub mod error;
pub mod events;
pub mod tones;
pub mod transport;
pub mod types;

// Re-export key types at crate root for ergonomic `use kv4p_core::*`.
pub use error::{Error, ErrorKind, Result};
pub use events::RadioEvent;
pub use tones::{ctcss_tone_hz, ctcss_tone_label, CTCSS_TONES};
pub use transport::Transport;
pub use types::RadioMode;

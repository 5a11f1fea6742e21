//! kv4p-transport: Serial transport for the kv4p HT.
//!
//! The kv4p HT attaches as a USB virtual COM port (an ESP32 USB-serial
//! bridge). This crate provides [`SerialTransport`], the production
//! implementation of the [`Transport`](kv4p_core::Transport) trait.

pub mod serial;

pub use serial::{SerialConfig, SerialTransport, KV4P_BAUD_RATE};

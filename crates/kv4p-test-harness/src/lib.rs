//! kv4p-test-harness: Test doubles for the kv4p protocol engine.
//!
//! Provides [`MockTransport`], an in-memory [`Transport`](kv4p_core::Transport)
//! implementation that records every frame the protocol engine sends and
//! lets tests inject inbound bytes at any time -- with arbitrary
//! fragmentation -- through a cloneable [`MockHandle`].

pub mod mock_serial;

pub use mock_serial::{MockHandle, MockTransport};

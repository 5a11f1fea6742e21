//! Serial port transport for the kv4p HT.
//!
//! The kv4p HT's ESP32 firmware talks over its USB-serial bridge at a
//! fixed 921600 baud, 8 data bits, no parity, 1 stop bit. The defaults in
//! [`SerialConfig`] match the firmware; there is normally no reason to
//! change anything but the port path.
//!
//! # Example
//!
//! ```no_run
//! use kv4p_transport::SerialTransport;
//! use kv4p_core::transport::Transport;
//! use std::time::Duration;
//!
//! # async fn example() -> kv4p_core::Result<()> {
//! let mut transport = SerialTransport::open("/dev/ttyUSB0").await?;
//!
//! let mut buf = [0u8; 256];
//! let n = transport.receive(&mut buf, Duration::from_millis(100)).await?;
//! # Ok(())
//! # }
//! ```

use async_trait::async_trait;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio_serial::{SerialPortBuilderExt, SerialStream};

use kv4p_core::error::{Error, Result};
use kv4p_core::transport::Transport;

/// Baud rate used by the kv4p HT firmware.
pub const KV4P_BAUD_RATE: u32 = 921_600;

/// Serial port configuration.
///
/// Defaults match the kv4p HT firmware: 921600 baud, 8N1, one-second
/// write timeout.
#[derive(Debug, Clone)]
pub struct SerialConfig {
    /// Baud rate. The firmware always runs at [`KV4P_BAUD_RATE`].
    pub baud_rate: u32,
    /// Timeout applied to each write.
    pub write_timeout: Duration,
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            baud_rate: KV4P_BAUD_RATE,
            write_timeout: Duration::from_secs(1),
        }
    }
}

/// Serial port transport for the kv4p HT.
///
/// Implements the [`Transport`] trait over a tokio-serial stream.
pub struct SerialTransport {
    /// The underlying serial port stream; `None` after `close()`.
    port: Option<SerialStream>,
    /// Port path for logging.
    port_name: String,
    write_timeout: Duration,
}

impl SerialTransport {
    /// Open the kv4p HT's serial port with default settings.
    ///
    /// # Arguments
    ///
    /// * `port` - Serial port path (e.g. `/dev/ttyUSB0` on Linux,
    ///   `COM3` on Windows).
    pub async fn open(port: &str) -> Result<Self> {
        Self::open_with_config(port, SerialConfig::default()).await
    }

    /// Open a serial port with explicit configuration.
    pub async fn open_with_config(port: &str, config: SerialConfig) -> Result<Self> {
        tracing::debug!(
            port = %port,
            baud_rate = config.baud_rate,
            "opening serial port"
        );

        // 8N1 with no flow control is both the tokio-serial default and
        // what the firmware expects.
        let serial_stream = tokio_serial::new(port, config.baud_rate)
            .open_native_async()
            .map_err(|e| {
                tracing::error!(port = %port, error = %e, "failed to open serial port");
                Error::Transport(format!("failed to open serial port {port}: {e}"))
            })?;

        tracing::info!(port = %port, baud_rate = config.baud_rate, "serial port opened");

        Ok(Self {
            port: Some(serial_stream),
            port_name: port.to_string(),
            write_timeout: config.write_timeout,
        })
    }

    /// The path of the serial port.
    pub fn port_name(&self) -> &str {
        &self.port_name
    }
}

#[async_trait]
impl Transport for SerialTransport {
    async fn send(&mut self, data: &[u8]) -> Result<()> {
        let port = self.port.as_mut().ok_or(Error::NotConnected)?;

        tracing::trace!(
            port = %self.port_name,
            bytes = data.len(),
            "sending data"
        );

        let write = async {
            port.write_all(data).await?;
            port.flush().await
        };

        match tokio::time::timeout(self.write_timeout, write).await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(e)) => {
                tracing::error!(port = %self.port_name, error = %e, "failed to send data");
                if e.kind() == std::io::ErrorKind::BrokenPipe
                    || e.kind() == std::io::ErrorKind::NotConnected
                {
                    Err(Error::ConnectionLost)
                } else {
                    Err(Error::Io(e))
                }
            }
            Err(_) => {
                tracing::warn!(
                    port = %self.port_name,
                    timeout_ms = self.write_timeout.as_millis(),
                    "write timed out"
                );
                Err(Error::Timeout)
            }
        }
    }

    async fn receive(&mut self, buf: &mut [u8], timeout: Duration) -> Result<usize> {
        let port = self.port.as_mut().ok_or(Error::NotConnected)?;

        match tokio::time::timeout(timeout, port.read(buf)).await {
            Ok(Ok(n)) => {
                tracing::trace!(port = %self.port_name, bytes = n, "received data");
                Ok(n)
            }
            Ok(Err(e)) => {
                tracing::error!(port = %self.port_name, error = %e, "failed to receive data");
                if e.kind() == std::io::ErrorKind::BrokenPipe
                    || e.kind() == std::io::ErrorKind::NotConnected
                {
                    Err(Error::ConnectionLost)
                } else {
                    Err(Error::Io(e))
                }
            }
            Err(_) => Err(Error::Timeout),
        }
    }

    async fn close(&mut self) -> Result<()> {
        if let Some(mut port) = self.port.take() {
            tracing::debug!(port = %self.port_name, "closing serial port");

            if let Err(e) = port.flush().await {
                tracing::warn!(
                    port = %self.port_name,
                    error = %e,
                    "failed to flush before closing"
                );
            }

            // Dropping the stream closes the port.
            tracing::info!(port = %self.port_name, "serial port closed");
        }

        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.port.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serial_config_default() {
        let config = SerialConfig::default();
        assert_eq!(config.baud_rate, KV4P_BAUD_RATE);
        assert_eq!(config.write_timeout, Duration::from_secs(1));
    }

    #[tokio::test]
    async fn open_nonexistent_port_fails() {
        let result = SerialTransport::open("/dev/kv4p-no-such-port").await;
        assert!(matches!(result, Err(Error::Transport(_))));
    }
}

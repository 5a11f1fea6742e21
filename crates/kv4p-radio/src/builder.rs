//! Builder for [`Kv4pRadio`].

use std::time::Duration;

use kv4p_core::error::{Error, Result};
use kv4p_core::transport::Transport;
use kv4p_transport::{SerialConfig, SerialTransport, KV4P_BAUD_RATE};

use crate::rig::Kv4pRadio;

/// Default idle poll interval for the inbound stream.
const DEFAULT_READ_TIMEOUT: Duration = Duration::from_millis(100);

/// Builder for connecting to a kv4p HT.
///
/// ```no_run
/// use kv4p_radio::Kv4pBuilder;
///
/// # async fn example() -> kv4p_core::Result<()> {
/// let radio = Kv4pBuilder::new()
///     .serial_port("/dev/ttyUSB0")
///     .build()
///     .await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default, Clone)]
pub struct Kv4pBuilder {
    serial_port: Option<String>,
    baud_rate: Option<u32>,
    read_timeout: Option<Duration>,
}

impl Kv4pBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// The serial port device path (e.g. `/dev/ttyUSB0`, `COM3`).
    pub fn serial_port(mut self, port: impl Into<String>) -> Self {
        self.serial_port = Some(port.into());
        self
    }

    /// Override the baud rate. Defaults to the firmware's fixed
    /// [`KV4P_BAUD_RATE`] (921600); only useful against test fixtures.
    pub fn baud_rate(mut self, baud: u32) -> Self {
        self.baud_rate = Some(baud);
        self
    }

    /// Override the idle poll interval for the inbound stream.
    /// Defaults to 100 ms.
    pub fn read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = Some(timeout);
        self
    }

    /// Open the serial port and start the protocol engine.
    pub async fn build(self) -> Result<Kv4pRadio> {
        let port = self.serial_port.clone().ok_or_else(|| {
            Error::InvalidParameter("serial_port is required".into())
        })?;

        let config = SerialConfig {
            baud_rate: self.baud_rate.unwrap_or(KV4P_BAUD_RATE),
            ..SerialConfig::default()
        };
        let transport = SerialTransport::open_with_config(&port, config).await?;

        self.build_with_transport(Box::new(transport)).await
    }

    /// Start the protocol engine around an already open transport.
    ///
    /// This is the seam for testing against a mock transport.
    pub async fn build_with_transport(self, transport: Box<dyn Transport>) -> Result<Kv4pRadio> {
        let read_timeout = self.read_timeout.unwrap_or(DEFAULT_READ_TIMEOUT);
        Ok(Kv4pRadio::spawn(transport, read_timeout))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kv4p_test_harness::MockTransport;

    #[tokio::test]
    async fn build_without_port_fails() {
        let result = Kv4pBuilder::new().build().await;
        assert!(matches!(result, Err(Error::InvalidParameter(_))));
    }

    #[tokio::test]
    async fn build_with_mock_transport() {
        let mock = MockTransport::new();
        let radio = Kv4pBuilder::new()
            .build_with_transport(Box::new(mock))
            .await
            .unwrap();
        assert_eq!(radio.mode(), kv4p_core::RadioMode::Startup);
    }
}

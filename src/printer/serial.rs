//! Serial port transport for the receipt printer

use super::{PrinterTransport, TransportError, TransportResult};
use serialport::{DataBits, Parity, SerialPort, StopBits};
use std::fmt;
use std::io::Write;
use std::time::Duration;
use tracing::{debug, info};

/// Line speed expected by the printer
pub const BAUD_RATE: u32 = 19_200;

/// Default write timeout
pub const DEFAULT_WRITE_TIMEOUT: Duration = Duration::from_secs(5);

/// Receipt printer on a serial port: 19200 baud, 8 data bits, no parity, 1 stop bit
pub struct SerialPrinter {
    port_name: String,
    timeout: Duration,
    port: Option<Box<dyn SerialPort>>,
}

impl fmt::Debug for SerialPrinter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SerialPrinter")
            .field("port_name", &self.port_name)
            .field("open", &self.port.is_some())
            .finish()
    }
}

impl SerialPrinter {
    /// Printer on `port_name` (e.g. `COM7` or `/dev/ttyUSB0`); nothing is opened yet
    pub fn new(port_name: impl Into<String>) -> Self {
        Self { port_name: port_name.into(), timeout: DEFAULT_WRITE_TIMEOUT, port: None }
    }

    /// Override the write timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Port identifier
    pub fn port_name(&self) -> &str {
        &self.port_name
    }

    fn port(&mut self) -> TransportResult<&mut Box<dyn SerialPort>> {
        self.port.as_mut().ok_or(TransportError::NotOpen)
    }
}

impl PrinterTransport for SerialPrinter {
    fn open(&mut self) -> TransportResult<()> {
        if self.port.is_some() {
            return Ok(());
        }

        let port = serialport::new(&self.port_name, BAUD_RATE)
            .data_bits(DataBits::Eight)
            .parity(Parity::None)
            .stop_bits(StopBits::One)
            .timeout(self.timeout)
            .open()
            .map_err(|e| TransportError::Open {
                port: self.port_name.clone(),
                reason: e.to_string(),
            })?;

        info!(port = %self.port_name, baud = BAUD_RATE, "Opened printer port");
        self.port = Some(port);
        Ok(())
    }

    fn write_line(&mut self, line: &str) -> TransportResult<()> {
        let port = self.port()?;
        port.write_all(line.as_bytes())
            .and_then(|()| port.write_all(b"\n"))
            .map_err(|e| TransportError::Write(e.to_string()))
    }

    fn write_raw(&mut self, bytes: &[u8]) -> TransportResult<()> {
        self.port()?.write_all(bytes).map_err(|e| TransportError::Write(e.to_string()))
    }

    fn close(&mut self) -> TransportResult<()> {
        if let Some(mut port) = self.port.take() {
            port.flush().map_err(|e| TransportError::Close(e.to_string()))?;
            debug!(port = %self.port_name, "Closed printer port");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_before_open_fails() {
        let mut printer = SerialPrinter::new("COM7");
        assert!(matches!(printer.write_line("hello"), Err(TransportError::NotOpen)));
        assert!(matches!(printer.write_raw(&[0x1B]), Err(TransportError::NotOpen)));
    }

    #[test]
    fn test_close_without_open_is_noop() {
        let mut printer = SerialPrinter::new("COM7");
        assert!(printer.close().is_ok());
    }
}

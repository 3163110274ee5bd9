//! Receipt printer collaborator and ticket layout
//!
//! This module contains the [`PrinterTransport`] capability, its serial and
//! preview implementations, the ESC/POS command set and the ticket renderer.

pub mod commands;
pub mod preview;
pub mod serial;
pub mod ticket;

pub use commands::*;
pub use preview::*;
pub use serial::*;
pub use ticket::*;

/// Errors raised by a printer transport
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The port could not be opened
    #[error("Cannot open printer port {port}: {reason}")]
    Open {
        /// Port identifier
        port: String,
        /// Underlying cause
        reason: String,
    },

    /// Bytes could not be written
    #[error("Error writing to printer: {0}")]
    Write(String),

    /// The port did not close cleanly
    #[error("Error closing printer port: {0}")]
    Close(String),

    /// A write was attempted before `open`
    #[error("Printer port is not open")]
    NotOpen,
}

/// Result type for printer operations
pub type TransportResult<T> = Result<T, TransportError>;

/// Byte-stream sink with an open/write/close lifecycle
pub trait PrinterTransport {
    /// Acquire the underlying device
    fn open(&mut self) -> TransportResult<()>;

    /// Write one line of text followed by a newline
    fn write_line(&mut self, line: &str) -> TransportResult<()>;

    /// Write raw control bytes
    fn write_raw(&mut self, bytes: &[u8]) -> TransportResult<()>;

    /// Release the device; calling it again has no effect
    fn close(&mut self) -> TransportResult<()>;

    /// Transmit a rendered ticket
    fn print_ticket(&mut self, ticket: &Ticket) -> TransportResult<()> {
        for line in ticket.lines() {
            match line {
                TicketLine::Command(command) => self.write_raw(&command.bytes())?,
                TicketLine::Text(text) => self.write_line(text)?,
            }
        }
        Ok(())
    }
}

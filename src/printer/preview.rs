//! Text-only transport that writes tickets to any writer

use super::{PrinterCommand, PrinterTransport, TransportError, TransportResult};
use std::io::Write;

/// Transport that renders tickets as plain text
///
/// Control sequences are dropped, except the paper cut which becomes a dashed
/// separator line.
#[derive(Debug)]
pub struct PreviewPrinter<W: Write> {
    writer: W,
    open: bool,
}

impl<W: Write> PreviewPrinter<W> {
    /// Wrap a writer
    pub fn new(writer: W) -> Self {
        Self { writer, open: false }
    }

    /// Recover the writer
    pub fn into_inner(self) -> W {
        self.writer
    }

    fn ensure_open(&self) -> TransportResult<()> {
        if self.open {
            Ok(())
        } else {
            Err(TransportError::NotOpen)
        }
    }
}

impl<W: Write> PrinterTransport for PreviewPrinter<W> {
    fn open(&mut self) -> TransportResult<()> {
        self.open = true;
        Ok(())
    }

    fn write_line(&mut self, line: &str) -> TransportResult<()> {
        self.ensure_open()?;
        writeln!(self.writer, "{}", line).map_err(|e| TransportError::Write(e.to_string()))
    }

    fn write_raw(&mut self, bytes: &[u8]) -> TransportResult<()> {
        self.ensure_open()?;
        if bytes == PrinterCommand::CutPaper.bytes().as_slice() {
            writeln!(self.writer, "{}", "-".repeat(42))
                .map_err(|e| TransportError::Write(e.to_string()))?;
        }
        Ok(())
    }

    fn close(&mut self) -> TransportResult<()> {
        if self.open {
            self.open = false;
            self.writer.flush().map_err(|e| TransportError::Close(e.to_string()))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_drops_control_bytes() {
        let mut printer = PreviewPrinter::new(Vec::new());
        printer.open().unwrap();
        printer.write_raw(&PrinterCommand::AlignCenter.bytes()).unwrap();
        printer.write_line("Username: guest-0001").unwrap();
        printer.write_raw(&PrinterCommand::CutPaper.bytes()).unwrap();
        printer.close().unwrap();

        let output = String::from_utf8(printer.into_inner()).unwrap();
        assert_eq!(output, format!("Username: guest-0001\n{}\n", "-".repeat(42)));
    }
}

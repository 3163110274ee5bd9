//! ESC/POS control sequences used on guest tickets

use std::fmt;

const ESC: u8 = 0x1B;
const FS: u8 = 0x1C;
const GS: u8 = 0x1D;

/// International character set selected with `ESC R`: United Kingdom
pub const CHARSET_UK: u8 = 3;

/// Print mode for the ticket title: font B, emphasized, double height and
/// width, underlined
pub const PRINT_MODE_TITLE: u8 = 0xB9;

/// Default print mode
pub const PRINT_MODE_NORMAL: u8 = 0x00;

/// Printer control commands interleaved with ticket text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrinterCommand {
    /// Centre subsequent lines
    AlignCenter,
    /// Print the stored logo with this key code
    PrintLogo(u8),
    /// Select an international character set
    CharacterSet(u8),
    /// Select a print mode bit field
    PrintMode(u8),
    /// Feed and perform a partial cut
    CutPaper,
}

impl PrinterCommand {
    /// Wire encoding of the command
    pub fn bytes(&self) -> Vec<u8> {
        match *self {
            PrinterCommand::AlignCenter => vec![ESC, b'a', 1],
            PrinterCommand::PrintLogo(key) => vec![FS, b'p', key, 0],
            PrinterCommand::CharacterSet(set) => vec![ESC, b'R', set],
            PrinterCommand::PrintMode(mode) => vec![ESC, b'!', mode],
            PrinterCommand::CutPaper => vec![GS, b'V', b'A', 0],
        }
    }
}

impl fmt::Display for PrinterCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrinterCommand::AlignCenter => write!(f, "align center"),
            PrinterCommand::PrintLogo(key) => write!(f, "print logo {}", key),
            PrinterCommand::CharacterSet(set) => write!(f, "character set {}", set),
            PrinterCommand::PrintMode(mode) => write!(f, "print mode {:#04x}", mode),
            PrinterCommand::CutPaper => write!(f, "cut paper"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_encodings() {
        assert_eq!(PrinterCommand::AlignCenter.bytes(), vec![27, 97, 1]);
        assert_eq!(PrinterCommand::PrintLogo(1).bytes(), vec![28, 112, 1, 0]);
        assert_eq!(PrinterCommand::CharacterSet(CHARSET_UK).bytes(), vec![27, 82, 3]);
        assert_eq!(PrinterCommand::PrintMode(PRINT_MODE_TITLE).bytes(), vec![27, 33, 185]);
        assert_eq!(PrinterCommand::PrintMode(PRINT_MODE_NORMAL).bytes(), vec![27, 33, 0]);
        assert_eq!(PrinterCommand::CutPaper.bytes(), vec![29, 86, 65, 0]);
    }
}

//! Guest ticket layout
//!
//! A ticket is a sequence of text lines for a 42-column receipt printer with
//! control commands interleaved. The renderer decides what is printed; how the
//! commands are encoded belongs to [`PrinterCommand`].

use super::commands::{PrinterCommand, CHARSET_UK, PRINT_MODE_NORMAL, PRINT_MODE_TITLE};
use crate::types::GuestAccount;
use chrono::{DateTime, Duration, Local};

/// Logo slot printed at the top of every ticket
pub const LOGO_KEY: u8 = 1;

/// Default `strftime` pattern for the expiry date
pub const DEFAULT_DATE_FORMAT: &str = "%d/%m/%Y";

/// One element of a rendered ticket
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TicketLine {
    /// Printer control command
    Command(PrinterCommand),
    /// Line of text
    Text(String),
}

/// A rendered ticket
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ticket {
    lines: Vec<TicketLine>,
}

impl Ticket {
    /// All elements in print order
    pub fn lines(&self) -> &[TicketLine] {
        &self.lines
    }

    /// Only the text lines, in print order
    pub fn text_lines(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().filter_map(|line| match line {
            TicketLine::Text(text) => Some(text.as_str()),
            TicketLine::Command(_) => None,
        })
    }

    /// Only the control commands, in print order
    pub fn commands(&self) -> impl Iterator<Item = PrinterCommand> + '_ {
        self.lines.iter().filter_map(|line| match line {
            TicketLine::Command(command) => Some(*command),
            TicketLine::Text(_) => None,
        })
    }

    fn command(&mut self, command: PrinterCommand) {
        self.lines.push(TicketLine::Command(command));
    }

    fn text(&mut self, text: impl Into<String>) {
        self.lines.push(TicketLine::Text(text.into()));
    }

    fn blank(&mut self) {
        self.text(String::new());
    }
}

/// Formats guest credentials and connection instructions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketRenderer {
    ssid: String,
    date_format: String,
}

impl TicketRenderer {
    /// Renderer for the wireless network `ssid`
    pub fn new(ssid: impl Into<String>) -> Self {
        Self { ssid: ssid.into(), date_format: DEFAULT_DATE_FORMAT.to_string() }
    }

    /// Override the date pattern used for the expiry line
    pub fn with_date_format(mut self, date_format: impl Into<String>) -> Self {
        self.date_format = date_format.into();
        self
    }

    /// Render the ticket for a guest account
    pub fn render(&self, account: &GuestAccount) -> Ticket {
        self.render_credentials(&account.username, &account.password, account.expires_at)
    }

    /// Render a ticket from its parts
    ///
    /// The printed expiry is the day before `expires_at`: the pass is good
    /// until the end of that day.
    pub fn render_credentials(
        &self,
        username: &str,
        password: &str,
        expires_at: Option<DateTime<Local>>,
    ) -> Ticket {
        let mut ticket = Ticket::default();

        ticket.command(PrinterCommand::AlignCenter);
        ticket.command(PrinterCommand::PrintLogo(LOGO_KEY));
        ticket.blank();
        ticket.command(PrinterCommand::CharacterSet(CHARSET_UK));
        ticket.command(PrinterCommand::PrintMode(PRINT_MODE_TITLE));
        ticket.text("Guest Wireless Details");
        ticket.blank();

        ticket.command(PrinterCommand::PrintMode(PRINT_MODE_NORMAL));
        ticket.text(format!("Connect your device to the {}", self.ssid));
        ticket.text("network using the following details:");
        ticket.blank();
        ticket.text(format!("Username: {}", username));
        ticket.text(format!("Password: {}", password));
        ticket.blank();
        ticket.text("Apple Devices: Press Trust when prompted");
        ticket.text("for certificate.");
        ticket.blank();
        ticket.text("Other Devices: Select these if prompted:");
        ticket.text("EAP Method: PEAP");
        ticket.text("CA Certificate: Don't Validate");
        ticket.text(format!("Identity: {}", username));
        ticket.text("Anonymous Identity: (leave blank)");
        ticket.blank();

        match expires_at {
            Some(expires_at) => {
                let last_day = expires_at - Duration::days(1);
                ticket.text("This pass is valid until the end of:");
                ticket.text(last_day.format(&self.date_format).to_string());
            }
            None => ticket.text("This pass does not expire."),
        }

        ticket.blank();
        ticket.command(PrinterCommand::CutPaper);
        ticket
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_ticket_is_bracketed_by_commands() {
        let ticket = TicketRenderer::new("Guest").render_credentials("guest-0001", "abcdef", None);
        assert_eq!(ticket.lines().first(), Some(&TicketLine::Command(PrinterCommand::AlignCenter)));
        assert_eq!(ticket.lines().last(), Some(&TicketLine::Command(PrinterCommand::CutPaper)));
    }

    #[test]
    fn test_expiry_line_shows_previous_day() {
        let expires = Local.with_ymd_and_hms(2024, 6, 3, 9, 15, 0).unwrap();
        let ticket = TicketRenderer::new("Guest")
            .with_date_format("%Y-%m-%d")
            .render_credentials("guest-0001", "abcdef", Some(expires));

        let text: Vec<&str> = ticket.text_lines().collect();
        let position = text.iter().position(|line| *line == "This pass is valid until the end of:");
        assert_eq!(text[position.unwrap() + 1], "2024-06-02");
    }
}

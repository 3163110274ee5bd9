//! Guest pass provisioning workflow
//!
//! One call to [`ProvisioningWorkflow::run`] is one batch: open the printer,
//! resolve the guest group, then for each pass find an unused username, create
//! the account, stage its group membership and print its ticket. Membership is
//! committed once after the last pass. Any failure stops the batch where it
//! is; accounts already created stay created and nothing is committed. The
//! printer and the directory are closed whatever the outcome.

use super::error::{GuestPassError, GuestPassResult};
use super::report::BatchReport;
use crate::credentials::AccountGenerator;
use crate::directory::{DirectoryClient, GroupMembership, NewGuestUser};
use crate::printer::{PrinterTransport, TicketRenderer};
use crate::types::{BatchRequest, GuestAccount, ProvisioningConfig};
use chrono::{DateTime, Local};
use tracing::{error, info, instrument, warn};

/// Provisioning workflow over a directory client and a printer transport
#[derive(Debug)]
pub struct ProvisioningWorkflow<D: DirectoryClient, P: PrinterTransport> {
    config: ProvisioningConfig,
    directory: D,
    printer: P,
    generator: AccountGenerator,
    renderer: TicketRenderer,
}

impl<D: DirectoryClient, P: PrinterTransport> ProvisioningWorkflow<D, P> {
    /// Create a workflow; `directory` is expected to be connected already
    pub fn new(config: ProvisioningConfig, directory: D, printer: P) -> Self {
        let renderer =
            TicketRenderer::new(config.ssid.clone()).with_date_format(config.date_format.clone());
        Self { config, directory, printer, generator: AccountGenerator::new(), renderer }
    }

    /// Replace the credential generator
    pub fn with_generator(mut self, generator: AccountGenerator) -> Self {
        self.generator = generator;
        self
    }

    /// Configuration the workflow runs with
    pub fn config(&self) -> &ProvisioningConfig {
        &self.config
    }

    /// Directory client
    pub fn directory(&self) -> &D {
        &self.directory
    }

    /// Printer transport
    pub fn printer(&self) -> &P {
        &self.printer
    }

    /// Recover the collaborators
    pub fn into_parts(self) -> (D, P) {
        (self.directory, self.printer)
    }

    /// Run a batch starting now
    pub fn run(&mut self, request: &BatchRequest) -> GuestPassResult<BatchReport> {
        self.run_at(request, Local::now())
    }

    /// Run a batch as if it started at `now`
    #[instrument(skip_all, fields(count = request.count(), validity = %request.validity()))]
    pub fn run_at(
        &mut self,
        request: &BatchRequest,
        now: DateTime<Local>,
    ) -> GuestPassResult<BatchReport> {
        info!("Starting provisioning batch");

        let outcome = match self.printer.open() {
            Ok(()) => self.provision_batch(request, now),
            Err(e) => Err(e.into()),
        };

        let printer_closed = self.printer.close();
        let directory_closed = self.directory.close();

        match &outcome {
            Ok(report) => info!(issued = report.issued_count(), "Provisioning batch complete"),
            Err(e) => {
                error!(category = e.category(), "Provisioning batch stopped: {}", e);
                if let Err(close_error) = &printer_closed {
                    warn!("{}", close_error);
                }
                if let Err(close_error) = &directory_closed {
                    warn!("{}", close_error);
                }
            }
        }

        let report = outcome?;
        printer_closed?;
        directory_closed?;
        Ok(report)
    }

    fn provision_batch(
        &mut self,
        request: &BatchRequest,
        now: DateTime<Local>,
    ) -> GuestPassResult<BatchReport> {
        let expires_at = request.validity().expires_at(now);
        let mut group = self.directory.find_group(&self.config.group)?;
        let mut report = BatchReport::new(request, now, expires_at);

        for index in 1..=request.count() {
            let account = self.provision_account(&mut group, request, expires_at)?;

            let ticket = self.renderer.render(&account);
            self.printer.print_ticket(&ticket)?;

            report.record(&account, &self.config.upn_suffix);
            info!(index, username = %account.username, "Issued guest pass");
        }

        self.directory.commit_group(&mut group)?;
        Ok(report)
    }

    fn provision_account(
        &mut self,
        group: &mut GroupMembership,
        request: &BatchRequest,
        expires_at: Option<DateTime<Local>>,
    ) -> Result<GuestAccount, GuestPassError> {
        let directory = &mut self.directory;
        let credentials =
            self.generator.generate_unique(|username| directory.user_exists(username))?;

        let account = GuestAccount::new(
            credentials.username,
            credentials.password,
            expires_at,
            request.description().map(str::to_string),
        );

        let user =
            NewGuestUser::for_account(&account, &self.config.upn_suffix, &self.config.server);
        self.directory.create_user(&user)?;
        self.directory.add_member(group, &user.user_principal_name)?;

        Ok(account)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::InMemoryDirectory;
    use crate::printer::PreviewPrinter;
    use crate::types::ValidityPolicy;

    #[test]
    fn test_preview_batch_creates_and_commits() {
        let config = ProvisioningConfig { ssid: "CampusGuest".to_string(), ..Default::default() };
        let directory = InMemoryDirectory::new().with_group(config.group.clone());
        let mut workflow =
            ProvisioningWorkflow::new(config, directory, PreviewPrinter::new(Vec::new()))
                .with_generator(AccountGenerator::with_seed(3));

        let request = BatchRequest::new(3, ValidityPolicy::OneDay, None).unwrap();
        let report = workflow.run(&request).unwrap();
        assert_eq!(report.issued_count(), 3);

        let (directory, printer) = workflow.into_parts();
        assert_eq!(directory.users().len(), 3);
        assert_eq!(directory.members("G GuestWireless").len(), 3);
        assert!(directory.is_closed());

        let output = String::from_utf8(printer.into_inner()).unwrap();
        assert_eq!(output.matches("Connect your device to the CampusGuest").count(), 3);
    }

    #[test]
    fn test_missing_group_creates_nothing() {
        let directory = InMemoryDirectory::new();
        let mut workflow = ProvisioningWorkflow::new(
            ProvisioningConfig::default(),
            directory,
            PreviewPrinter::new(Vec::new()),
        );

        let result = workflow.run(&BatchRequest::default());
        assert!(matches!(result, Err(GuestPassError::Directory(_))));
        assert!(workflow.directory().users().is_empty());
        assert!(workflow.directory().is_closed());
    }
}

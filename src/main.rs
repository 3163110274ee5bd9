// Guest Wireless Pass - Main Entry Point
//
// You can run it via Cargo:
//
// ```console
// $ cargo build --release
// $ ./target/release/guest-pass print --count 3 --validity 5
// ```
//
// Or preview the tickets without a directory or printer:
//
// ```console
// $ ./target/release/guest-pass print --count 2 --preview --verbose
// ```

use anyhow::Context;
use clap::Parser;
use guest_wireless_pass::directory::{DirectoryClient, InMemoryDirectory, LdapDirectory};
use guest_wireless_pass::printer::{PreviewPrinter, PrinterTransport, SerialPrinter};
use guest_wireless_pass::provisioning::{
    BatchReport, GuestPassError, GuestPassResult, LoggingConfig, LoggingError, LoggingGuard,
    ProvisioningWorkflow,
};
use guest_wireless_pass::settings::{SettingsStore, DEFAULT_FILE_NAME};
use guest_wireless_pass::types::{
    BatchRequest, CliArgs, Command, OutputFormat, PrintArgs, ProvisioningConfig, SettingsCommand,
};
use std::io;
use std::path::{Path, PathBuf};
use std::process;
use tracing::{error, info, Level};

fn main() {
    let args = CliArgs::parse();

    // Initialize logging based on CLI flags
    let _logging_guard = match init_logging(&args) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {}", e);
            process::exit(1);
        }
    };

    info!("Starting guest pass provisioner");

    if let Err(e) = run(args) {
        let exit_code = e.downcast_ref::<GuestPassError>().map_or(1, GuestPassError::exit_code);
        error!("{:#}", e);
        eprintln!("Error: {:#}", e);
        process::exit(exit_code);
    }
}

fn init_logging(args: &CliArgs) -> Result<LoggingGuard, LoggingError> {
    let mut config = if args.debug {
        LoggingConfig::new().with_level(Level::DEBUG).with_span_events()
    } else if args.verbose {
        LoggingConfig::new().with_level(Level::INFO)
    } else {
        // Default: minimal logging for operators
        LoggingConfig::new().with_level(Level::WARN)
    };

    if let Some(directory) = &args.log_dir {
        config = config.with_file_logging(directory.clone());
    }

    config.init()
}

fn run(args: CliArgs) -> anyhow::Result<()> {
    let config_path = resolve_config_path(args.config.as_deref())?;
    let mut store = SettingsStore::open(true, &config_path).map_err(GuestPassError::from)?;

    match args.command {
        Command::Print(print_args) => print_passes(&store, &print_args),
        Command::Info => {
            let config = ProvisioningConfig::from_store(&store).map_err(GuestPassError::from)?;
            println!("{}", config.label());
            Ok(())
        }
        Command::PrintConfig => {
            let config = ProvisioningConfig::from_store(&store).map_err(GuestPassError::from)?;
            println!("{}", config.print_json().map_err(GuestPassError::from)?);
            Ok(())
        }
        Command::Settings(command) => run_settings_command(&mut store, command),
    }
}

/// Settings file from the command line, or `config.xml` next to the executable
fn resolve_config_path(explicit: Option<&Path>) -> anyhow::Result<PathBuf> {
    if let Some(path) = explicit {
        return Ok(path.to_path_buf());
    }

    let executable = std::env::current_exe().context("Cannot locate the running executable")?;
    let directory = executable.parent().unwrap_or_else(|| Path::new("."));
    Ok(directory.join(DEFAULT_FILE_NAME))
}

fn print_passes(store: &SettingsStore, args: &PrintArgs) -> anyhow::Result<()> {
    let request = BatchRequest::new(args.count, args.validity, args.description.clone())
        .map_err(GuestPassError::from)?;

    let config = ProvisioningConfig::from_store(store).map_err(GuestPassError::from)?;
    config.validate().map_err(GuestPassError::from)?;
    info!("Configuration loaded and validated successfully");

    let report = if args.preview {
        let directory = InMemoryDirectory::new().with_group(config.group.clone());
        run_batch(config, directory, PreviewPrinter::new(io::stdout()), &request)?
    } else {
        let directory = LdapDirectory::connect(&config.ldap_settings())
            .map_err(GuestPassError::from)
            .with_context(|| format!("Cannot reach the directory at {}", config.ldap_url))?;
        let printer = SerialPrinter::new(config.port.clone());
        run_batch(config, directory, printer, &request)?
    };

    match args.output_format {
        OutputFormat::Text => print!("{}", report),
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&report).map_err(GuestPassError::from)?)
        }
    }

    Ok(())
}

fn run_batch<D: DirectoryClient, P: PrinterTransport>(
    config: ProvisioningConfig,
    directory: D,
    printer: P,
    request: &BatchRequest,
) -> GuestPassResult<BatchReport> {
    ProvisioningWorkflow::new(config, directory, printer).run(request)
}

fn run_settings_command(store: &mut SettingsStore, command: SettingsCommand) -> anyhow::Result<()> {
    match command {
        SettingsCommand::List => {
            if store.entries().is_empty() {
                eprintln!("No settings stored in {}", store.path().display());
            }
            for setting in store.entries() {
                println!("{} = {}", setting.name, setting.value);
            }
        }
        SettingsCommand::Get { key, encrypted } => {
            let value = if encrypted {
                store.get_encrypted(&key, None)
            } else {
                store.get(&key)
            }
            .map_err(GuestPassError::from)?;
            println!("{}", value);
        }
        SettingsCommand::Set { key, value, encrypted } => {
            if encrypted {
                store.set_encrypted(&key, &value).map_err(GuestPassError::from)?;
            } else {
                store.set(&key, &value);
            }
            store.save().map_err(GuestPassError::from)?;
            eprintln!("Saved {} to {}", key, store.path().display());
        }
    }

    Ok(())
}

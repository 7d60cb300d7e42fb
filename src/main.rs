// ABOUTME: CLI entrypoint for trello-full-backup
// ABOUTME: Handles error exit codes and wires the exporter together

use clap::Parser;
use std::time::Duration;
use tracing::info;
use trello_full_backup::{
    api::ApiClient,
    auth::resolve_credentials,
    cli::Cli,
    export::{self, Exporter},
    logging::init_logging,
    storage::{Destination, DryRun, LocalFs},
    Result,
};

fn main() {
    if let Err(e) = run() {
        eprintln!("trello-full-backup: [E{}] {}", e.exit_code(), e);
        std::process::exit(e.exit_code());
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let credentials = resolve_credentials(cli.api_key.clone(), cli.token.clone())?;
    let mut client = ApiClient::new(credentials, Some(cli.api_base.clone()))?
        .with_attachment_timeout(Duration::from_secs(cli.attachment_timeout))?;

    if cli.no_throttle {
        client = client.disable_throttle();
    } else if let Some((min, max)) = cli.throttle_ms {
        client = client.with_throttle(min, max);
    }

    let options = cli.export_options();
    let dest: &dyn Destination = if options.dry_run { &DryRun } else { &LocalFs };
    let destination = cli.destination();

    info!("Backup Started...");
    let exporter = Exporter::new(&client, dest, &options);
    let report = export::run(&exporter, &destination)?;
    info!("Backup Complete!");

    println!("{}: {}", destination.display(), report);
    if report.has_failures() {
        eprintln!("Some items failed; rerun with --incremental to retry them");
    }

    Ok(())
}

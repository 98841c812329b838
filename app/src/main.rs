// ft991util -- backup and restore Yaesu FT-991 memory channels and menu
// settings over CAT, with a raw pass-through console for debugging.
//
// Usage:
//   ft991util --port /dev/ttyUSB0 backup-memory
//   ft991util --port /dev/ttyUSB0 restore-memory --file field-day.csv
//   ft991util backup-menu
//   ft991util --dry-run restore-menu
//   ft991util --verbose passthrough
//
// Exit status is 0 only if every record in the requested operation
// succeeded; any validation or device failure exits non-zero naming the
// offending record.

mod console;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

use ft991util_backup::file;
use ft991util_backup::transfer::{self, TransferOptions, TransferReport};
use ft991util_cat::{Ft991, Ft991Builder};

/// Default memory backup file name.
const DEFAULT_MEMORY_FILE: &str = "ft991mem.csv";
/// Default menu backup file name.
const DEFAULT_MENU_FILE: &str = "ft991menu.cfg";

/// ft991util -- FT-991 memory and menu backup over CAT.
#[derive(Parser)]
#[command(name = "ft991util", version, about)]
struct Cli {
    /// Serial port path (e.g. /dev/ttyUSB0, COM5).
    #[arg(long, default_value = "/dev/ttyUSB0")]
    port: String,

    /// Baud rate; must match the rig's CAT RATE menu setting.
    #[arg(long, default_value_t = 9600)]
    baud: u32,

    /// Echo raw CAT frames as they are sent and received.
    #[arg(short, long)]
    verbose: bool,

    /// Validate and encode everything but never send to the rig.
    #[arg(long)]
    dry_run: bool,

    /// Timeout for one command's reply, in milliseconds.
    #[arg(long, default_value_t = 500)]
    timeout_ms: u64,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Back up all memory channels to a file.
    BackupMemory {
        /// Backup file to write.
        #[arg(long, default_value = DEFAULT_MEMORY_FILE)]
        file: PathBuf,
    },

    /// Restore memory channels from a file.
    RestoreMemory {
        /// Backup file to read.
        #[arg(long, default_value = DEFAULT_MEMORY_FILE)]
        file: PathBuf,
    },

    /// Back up all menu settings to a file.
    BackupMenu {
        /// Backup file to write.
        #[arg(long, default_value = DEFAULT_MENU_FILE)]
        file: PathBuf,
    },

    /// Restore menu settings from a file.
    RestoreMenu {
        /// Backup file to read.
        #[arg(long, default_value = DEFAULT_MENU_FILE)]
        file: PathBuf,
    },

    /// Forward raw CAT lines to the rig and print replies verbatim.
    Passthrough,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "trace" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_target(false)
        .init();

    let mut rig = Ft991Builder::new()
        .serial_port(&cli.port)
        .baud_rate(cli.baud)
        .command_timeout(Duration::from_millis(cli.timeout_ms))
        .build()
        .await
        .with_context(|| format!("cannot open {}", cli.port))?;

    // Ctrl-C stops issuing commands at the next record boundary and
    // leaves the rig connection in a clean state.
    let cancel = CancellationToken::new();
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                eprintln!("interrupt: finishing the record in flight, then stopping");
                cancel.cancel();
            }
        });
    }

    let opts = TransferOptions {
        dry_run: cli.dry_run,
        cancel,
        ..Default::default()
    };

    let outcome = run_command(&mut rig, &cli.command, &opts).await;
    rig.close().await.ok();
    outcome
}

async fn run_command(rig: &mut Ft991, command: &Command, opts: &TransferOptions) -> Result<()> {
    match command {
        Command::BackupMemory { file: path } => {
            println!("Backing up memory settings...");
            let (channels, report) = transfer::scan_memory(rig, opts).await?;
            if finish_backup(path, file::render_memory_file(&channels), &report, opts)? {
                println!(
                    "Memory settings backed up to {:?} ({} channels)",
                    path, report.completed
                );
            }
        }
        Command::RestoreMemory { file: path } => {
            let channels = file::load_memory_file(path)
                .with_context(|| format!("cannot load {path:?}"))?;
            println!("Restoring {} memory channels...", channels.len());
            let report = transfer::restore_memory(rig, &channels, opts).await?;
            check_cancelled(&report)?;
            println!("Memory settings restored from {:?} ({} channels)", path, report.completed);
        }
        Command::BackupMenu { file: path } => {
            println!("Backing up menu settings...");
            let (settings, report) = transfer::scan_menu(rig, opts).await?;
            if finish_backup(path, file::render_menu_file(&settings), &report, opts)? {
                println!(
                    "Menu settings backed up to {:?} ({} items)",
                    path, report.completed
                );
            }
        }
        Command::RestoreMenu { file: path } => {
            let settings = file::load_menu_file(path)
                .with_context(|| format!("cannot load {path:?}"))?;
            println!("Restoring {} menu settings...", settings.len());
            let report = transfer::restore_menu(rig, &settings, opts).await?;
            check_cancelled(&report)?;
            println!(
                "Menu settings restored from {:?} ({} items, {} read-only skipped)",
                path, report.completed, report.skipped
            );
        }
        Command::Passthrough => {
            console::run(rig, opts.dry_run).await?;
        }
    }
    Ok(())
}

/// Write the rendered backup only after a complete, uncancelled scan;
/// the file is never partially written. Returns whether a file was
/// written (a dry run writes nothing).
fn finish_backup(
    path: &PathBuf,
    contents: String,
    report: &TransferReport,
    opts: &TransferOptions,
) -> Result<bool> {
    check_cancelled(report)?;
    if opts.dry_run {
        println!("Dry run: no file written");
        return Ok(false);
    }
    file::write_atomic(path, &contents).with_context(|| format!("cannot write {path:?}"))?;
    Ok(true)
}

fn check_cancelled(report: &TransferReport) -> Result<()> {
    if report.cancelled {
        bail!(
            "cancelled after {} of {} records; no further commands were issued",
            report.completed,
            report.total
        );
    }
    Ok(())
}

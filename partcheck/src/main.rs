// /////////////////////////////////////////////////////////////////////////////
// partcheck
// SPDX-License-Identifier: BSD-3-Clause
// /////////////////////////////////////////////////////////////////////////////

//! Binary entry point: parses CLI arguments, wires the infrastructure
//! adapters together, and runs one [`CheckPartUseCase`] invocation against
//! a SIGINT-driven cancellation token.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use partcheck::application::commands::{CheckPartCommand, ResizeSimCommand};
use partcheck::application::use_cases::{CheckPartUseCase, ResizeSimUseCase};
use partcheck::infrastructure::adapters::resize_script;
use partcheck::infrastructure::config::PartCheckConfig;
use partcheck::infrastructure::metrics::CheckMetrics;
use partcheck::infrastructure::services::FilesystemPartChecker;
use partcheck::presentation::{render_text, render_trace};
use partcheck::MarkFileExtension;
use partcheck_bootstrap::{BootstrapLogger, ConsoleLogger};
use partcheck_domain::value_objects::{IndexGranularity, PrimitiveType};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Validates on-disk data parts, and exercises the Resize dataflow operator
/// against scripted port events.
#[derive(Parser, Debug)]
#[command(name = "partcheck", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Path to an optional TOML config file.
    #[arg(long, global = true)]
    config: Option<String>,

    /// Raise the default log level to debug.
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Validates an on-disk data part's compressed columns, marks, primary
    /// index, and checksums.
    Check {
        /// Directory containing the part's column, mark, and sidecar files.
        part_path: PathBuf,

        /// Path to an alternate `columns.txt`, if not `<part_path>/columns.txt`.
        #[arg(long)]
        columns_path: Option<PathBuf>,

        /// Rows per granule, assuming uniform granularity with no final mark.
        #[arg(long, default_value_t = 8192)]
        rows_per_granule: u64,

        /// Number of granules (marks) the part is expected to contain.
        #[arg(long)]
        granules: u64,

        /// Whether the granularity carries a trailing zero-row final mark.
        #[arg(long)]
        final_mark: bool,

        /// Use extended (`.mrk2`) marks instead of legacy (`.mrk`).
        #[arg(long)]
        extended_marks: bool,

        /// Primary key column types, comma-separated (e.g. `UInt64,UInt32`).
        #[arg(long, value_delimiter = ',')]
        primary_key: Vec<String>,

        /// Treat a missing `checksums.txt` sidecar as acceptable.
        #[arg(long)]
        no_require_checksums: bool,

        /// Render metrics to stdout after the check completes.
        #[arg(long)]
        metrics: bool,
    },
    /// Drives a Resize operator over a scripted sequence of port events and
    /// prints the verdict trace.
    ResizeSim {
        /// Number of input ports.
        #[arg(long)]
        inputs: usize,

        /// Number of output ports.
        #[arg(long)]
        outputs: usize,

        /// Path to a script file (see `infrastructure::adapters::resize_script`).
        #[arg(long = "events")]
        events_path: PathBuf,

        /// Use the event-driven scheduler instead of the stateless scan.
        #[arg(long)]
        event_driven: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    partcheck::infrastructure::logging::init(cli.verbose);

    match cli.command {
        Command::Check {
            part_path,
            columns_path,
            rows_per_granule,
            granules,
            final_mark,
            extended_marks,
            primary_key,
            no_require_checksums,
            metrics,
        } => {
            run_check(
                cli.config.as_deref(),
                part_path,
                columns_path,
                rows_per_granule,
                granules,
                final_mark,
                extended_marks,
                primary_key,
                no_require_checksums,
                metrics,
            )
            .await
        }
        Command::ResizeSim { inputs, outputs, events_path, event_driven } => {
            run_resize_sim(inputs, outputs, &events_path, event_driven)
        }
    }
}

#[allow(clippy::too_many_arguments)]
async fn run_check(
    config_path: Option<&str>,
    part_path: PathBuf,
    columns_path: Option<PathBuf>,
    rows_per_granule: u64,
    granules: u64,
    final_mark: bool,
    extended_marks: bool,
    primary_key: Vec<String>,
    no_require_checksums: bool,
    print_metrics: bool,
) -> Result<()> {
    let logger = ConsoleLogger::new();
    let config = PartCheckConfig::load(config_path).context("loading configuration")?;

    let pk_types = primary_key
        .iter()
        .map(|name| PrimitiveType::parse(name))
        .collect::<Result<Vec<_>, _>>()
        .context("parsing --primary-key")?;

    let mark_extension = if extended_marks {
        MarkFileExtension::Extended
    } else {
        config.default_mark_extension.into()
    };

    let command = CheckPartCommand {
        part_path: part_path.clone(),
        columns_path,
        granularity: IndexGranularity::uniform(granules, rows_per_granule, final_mark),
        mark_extension,
        require_checksums: config.require_checksums && !no_require_checksums,
        pk_types,
        indices: Vec::new(),
    };

    let metrics = Arc::new(CheckMetrics::new().context("initializing metrics")?);
    let checker = Arc::new(FilesystemPartChecker::new(metrics.checks_in_flight.clone()));
    let use_case = CheckPartUseCase::new(checker);

    let cancelled = Arc::new(AtomicBool::new(false));
    {
        let cancelled = cancelled.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                cancelled.store(true, Ordering::SeqCst);
            }
        });
    }

    logger.info(&format!("checking part {}", command.part_path.display()));
    let result = use_case.execute(&command, cancelled.as_ref()).await?;

    metrics
        .checks_completed
        .with_label_values(&[if result.cancelled { "cancelled" } else { "ok" }])
        .inc();

    print!("{}", render_text(&part_path.display().to_string(), &result));
    if print_metrics {
        print!("{}", metrics.render().context("rendering metrics")?);
    }

    if result.cancelled {
        std::process::exit(130);
    }
    Ok(())
}

fn run_resize_sim(num_inputs: usize, num_outputs: usize, events_path: &PathBuf, event_driven: bool) -> Result<()> {
    let text = std::fs::read_to_string(events_path)
        .with_context(|| format!("reading {}", events_path.display()))?;
    let script = resize_script::parse(&text).context("parsing resize-sim script")?;

    let command = ResizeSimCommand { num_inputs, num_outputs, script, event_driven };
    let result = ResizeSimUseCase::new().execute(&command)?;

    print!("{}", render_trace(&result));
    Ok(())
}

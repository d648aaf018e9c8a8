//! # CLI Module
//!
//! Command-line interface for the duplicate image finder.
//!
//! ## Usage
//! ```bash
//! # Scan a directory for duplicates
//! image-dedup scan ~/Pictures
//!
//! # Only look at PNG and WebP files, JSON output
//! image-dedup scan ~/Pictures --ext png --ext webp --output json
//!
//! # Delete every copy but the first of each group, to the trash
//! image-dedup clean ~/Pictures --keep-first --trash
//!
//! # Delete the 2nd and 3rd member of every group without asking
//! image-dedup clean ~/Pictures --position 2 --position 3 --yes
//! ```

use clap::{Args, Parser, Subcommand, ValueEnum};
use console::{style, Term};
use duplicate_image_finder::core::deleter::{apply_deletions, DeleteMode, DeleteReport};
use duplicate_image_finder::core::hasher::{DEFAULT_HASH_SIZE, DEFAULT_MAX_DIMENSION};
use duplicate_image_finder::core::pipeline::{
    CancellationToken, Pipeline, ScanController, ScanRun,
};
use duplicate_image_finder::core::scanner::DEFAULT_EXTENSIONS;
use duplicate_image_finder::core::selection::{
    removes_whole_group, select_all_but_first, select_by_position,
};
use duplicate_image_finder::core::ScanResult;
use duplicate_image_finder::error::{DuplicateFinderError, Result};
use duplicate_image_finder::events::{
    null_sender, Event, EventChannel, HashEvent, PipelineEvent, ScanEvent,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;
use tracing::warn;

/// Duplicate Image Finder - find identical images, keep one copy
#[derive(Parser, Debug)]
#[command(name = "image-dedup")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose logging (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Scan a directory for duplicate images
    Scan {
        #[command(flatten)]
        scan: ScanArgs,

        /// Output format
        #[arg(short, long, default_value = "pretty")]
        output: OutputFormat,
    },

    /// Scan, then delete selected members of every duplicate group
    Clean {
        #[command(flatten)]
        scan: ScanArgs,

        /// Delete the member at this 1-based position in every group (repeatable)
        #[arg(short, long = "position", conflicts_with = "keep_first")]
        positions: Vec<usize>,

        /// Delete every member except the first of each group
        #[arg(long)]
        keep_first: bool,

        /// Move files to the trash instead of deleting them
        #[arg(long)]
        trash: bool,

        /// Do not ask for confirmation
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Args, Debug)]
struct ScanArgs {
    /// Directory to scan
    root: PathBuf,

    /// Image extension to include (repeatable; default png, jpg, jpeg, gif, bmp)
    #[arg(long = "ext")]
    extensions: Vec<String>,

    /// Images are shrunk so neither side exceeds this before hashing
    #[arg(long, default_value_t = DEFAULT_MAX_DIMENSION)]
    max_dimension: u32,

    /// pHash grid size (8 gives a 64-bit fingerprint)
    #[arg(long, default_value_t = DEFAULT_HASH_SIZE)]
    hash_size: u32,

    /// Skip hidden files and directories
    #[arg(long)]
    exclude_hidden: bool,

    /// Follow symbolic links (cycles are not detected)
    #[arg(long)]
    follow_symlinks: bool,
}

impl ScanArgs {
    fn build_pipeline(&self) -> Result<Pipeline> {
        let extensions: Vec<String> = if self.extensions.is_empty() {
            DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect()
        } else {
            self.extensions.clone()
        };

        Pipeline::builder()
            .root(&self.root)
            .extensions(extensions)
            .include_hidden(!self.exclude_hidden)
            .follow_symlinks(self.follow_symlinks)
            .max_dimension(self.max_dimension)
            .hash_size(self.hash_size)
            .build()
    }
}

/// Events buffered between the scan worker and the spinner
const EVENT_BUFFER: usize = 1024;

/// Ctrl+C state shared with the signal handler.
///
/// The handler is installed once for the whole process. It cancels the scan
/// in flight, if any, and records the request so that anything after the
/// scan (the deletion prompt) can refuse to go on.
#[derive(Clone, Default)]
struct Interrupt {
    requested: CancellationToken,
    scan: Arc<Mutex<Option<CancellationToken>>>,
}

impl Interrupt {
    fn install() -> Self {
        let interrupt = Self::default();
        let handler_view = interrupt.clone();
        if let Err(e) = ctrlc::set_handler(move || handler_view.trigger()) {
            warn!(error = %e, "could not install Ctrl+C handler");
        }
        interrupt
    }

    fn trigger(&self) {
        self.requested.cancel();
        if let Ok(scan) = self.scan.lock() {
            if let Some(token) = scan.as_ref() {
                token.cancel();
            }
        }
    }

    /// Route Ctrl+C to `token` from now on
    fn watch(&self, token: CancellationToken) {
        if self.is_requested() {
            token.cancel();
        }
        if let Ok(mut scan) = self.scan.lock() {
            *scan = Some(token);
        }
    }

    fn is_requested(&self) -> bool {
        self.requested.is_cancelled()
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Human-readable output with colors
    Pretty,
    /// JSON output for scripting
    Json,
    /// Redundant paths only (every member but the first)
    Minimal,
}

/// Run the CLI
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    duplicate_image_finder::init_tracing(if cli.verbose { "debug" } else { "warn" });
    let interrupt = Interrupt::install();

    match cli.command {
        Commands::Scan { scan, output } => run_scan(&scan, output, &interrupt),
        Commands::Clean {
            scan,
            positions,
            keep_first,
            trash,
            yes,
        } => {
            let mode = if trash {
                DeleteMode::Trash
            } else {
                DeleteMode::Permanent
            };
            run_clean(&scan, &positions, keep_first, mode, yes, &interrupt)
        }
    }
}

fn run_scan(args: &ScanArgs, output: OutputFormat, interrupt: &Interrupt) -> Result<()> {
    let term = Term::stderr();
    let show_progress = matches!(output, OutputFormat::Pretty);

    if show_progress {
        print_header(&term);
    }

    let run = scan_in_background(args, show_progress, interrupt)?;

    match output {
        OutputFormat::Pretty => print_pretty_results(&term, &run),
        OutputFormat::Json => print_json_results(&run),
        OutputFormat::Minimal => print_minimal_results(&run.result),
    }

    Ok(())
}

fn run_clean(
    args: &ScanArgs,
    positions: &[usize],
    keep_first: bool,
    mode: DeleteMode,
    assume_yes: bool,
    interrupt: &Interrupt,
) -> Result<()> {
    if !keep_first && positions.is_empty() {
        return Err(DuplicateFinderError::Config(
            "choose what to delete with --keep-first or --position".to_string(),
        ));
    }

    let term = Term::stderr();
    print_header(&term);

    let run = scan_in_background(args, true, interrupt)?;
    print_pretty_results(&term, &run);

    if run.cancelled || run.result.is_empty() {
        return Ok(());
    }

    let selection = if keep_first {
        select_all_but_first(&run.result)
    } else {
        select_by_position(&run.result, positions)
    };

    if selection.is_empty() {
        term.write_line("  Nothing selected.").ok();
        return Ok(());
    }

    if removes_whole_group(&run.result, &selection) {
        term.write_line(&format!(
            "  {} the selection removes every copy of at least one image",
            style("Warning:").red().bold()
        ))
        .ok();
    }

    let confirmed = assume_yes || confirm(&term, selection.len(), mode);
    // Ctrl+C at the prompt only lands here once the line is read
    if !confirmed || interrupt.is_requested() {
        term.write_line("").ok();
        term.write_line("  Aborted, nothing was deleted.").ok();
        return Ok(());
    }

    let (report, updated) = apply_deletions(&run.result, &selection, mode, &null_sender());
    print_delete_report(&term, &report);

    term.write_line("").ok();
    term.write_line(&format!("{}", style("Remaining duplicates:").bold().underlined()))
        .ok();
    print_groups(&term, &updated);

    Ok(())
}

/// Run one scan on the background controller, wiring Ctrl+C to
/// cooperative cancellation and events to a spinner.
fn scan_in_background(
    args: &ScanArgs,
    show_progress: bool,
    interrupt: &Interrupt,
) -> Result<ScanRun> {
    let pipeline = args.build_pipeline()?;

    let (sender, receiver) = EventChannel::bounded(EVENT_BUFFER);
    let mut controller = ScanController::new();
    let handle = controller.start_with_events(pipeline, sender)?;
    interrupt.watch(handle.cancellation_token());

    let progress = if show_progress {
        let pb = ProgressBar::new_spinner();
        if let Ok(spinner_style) =
            ProgressStyle::default_spinner().template("{spinner:.green} {pos} files {msg}")
        {
            pb.set_style(spinner_style);
        }
        pb.enable_steady_tick(Duration::from_millis(100));
        Some(pb)
    } else {
        None
    };

    let progress_clone = progress.clone();
    let event_thread = thread::spawn(move || {
        for event in receiver.iter() {
            let Some(ref pb) = progress_clone else {
                continue;
            };
            match event {
                Event::Scan(ScanEvent::Started { root }) => {
                    pb.set_message(format!("scanning {}", root.display()));
                }
                Event::Hash(HashEvent::Progress(p)) => {
                    pb.set_position(p.completed as u64);
                    pb.set_message(
                        p.current_path
                            .file_name()
                            .unwrap_or_default()
                            .to_string_lossy()
                            .into_owned(),
                    );
                }
                Event::Pipeline(PipelineEvent::Completed { .. })
                | Event::Pipeline(PipelineEvent::Cancelled)
                | Event::Pipeline(PipelineEvent::Error { .. }) => {
                    pb.finish_and_clear();
                }
                _ => {}
            }
        }
    });

    let result = handle.wait();
    drop(controller);
    event_thread.join().ok();
    if let Some(pb) = progress {
        pb.finish_and_clear();
    }

    result
}

fn print_header(term: &Term) {
    term.write_line(&format!(
        "{} {}",
        style("Duplicate Image Finder").bold().cyan(),
        style(format!("v{}", env!("CARGO_PKG_VERSION"))).dim()
    ))
    .ok();
    term.write_line("").ok();
}

fn confirm(term: &Term, count: usize, mode: DeleteMode) -> bool {
    let verb = match mode {
        DeleteMode::Permanent => "Permanently delete",
        DeleteMode::Trash => "Move to trash",
    };
    term.write_str(&format!("{} {} file(s)? [y/N] ", verb, count))
        .ok();
    term.read_line().map(|answer| is_yes(&answer)).unwrap_or(false)
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

fn print_pretty_results(term: &Term, run: &ScanRun) {
    if run.cancelled {
        term.write_line(&format!(
            "{} Scan cancelled after {} files, no results kept",
            style("✗").red().bold(),
            run.files_scanned
        ))
        .ok();
        return;
    }

    term.write_line(&format!("{} Scan Complete", style("✓").green().bold()))
        .ok();
    term.write_line("").ok();

    term.write_line(&format!(
        "  {} images scanned in {:.1}s",
        style(run.files_scanned).cyan(),
        run.duration_ms as f64 / 1000.0
    ))
    .ok();

    if run.files_skipped > 0 {
        term.write_line(&format!(
            "  {} files skipped (not decodable or unreadable)",
            style(run.files_skipped).yellow()
        ))
        .ok();
    }

    if run.walk_errors > 0 {
        term.write_line(&format!(
            "  {} directory entries could not be read",
            style(run.walk_errors).yellow()
        ))
        .ok();
    }

    term.write_line(&format!(
        "  {} duplicate groups, {} redundant copies",
        style(run.result.len()).cyan(),
        style(run.result.redundant_count()).cyan()
    ))
    .ok();
    term.write_line("").ok();

    print_groups(term, &run.result);
}

fn print_groups(term: &Term, result: &ScanResult) {
    if result.is_empty() {
        term.write_line("  No duplicate images found.").ok();
        return;
    }

    for (i, group) in result.iter().enumerate() {
        term.write_line(&format!(
            "  {} [{}] ({} files)",
            style(format!("Group {}:", i + 1)).bold(),
            style(group.fingerprint()).yellow(),
            group.len()
        ))
        .ok();

        for (position, path) in group.paths().enumerate() {
            let marker = if position == 0 {
                style("★").green().to_string()
            } else {
                style("○").dim().to_string()
            };
            term.write_line(&format!(
                "    {} {:>2}. {}",
                marker,
                position + 1,
                display_path(path)
            ))
            .ok();
        }

        term.write_line("").ok();
    }
}

fn print_delete_report(term: &Term, report: &DeleteReport) {
    term.write_line("").ok();
    term.write_line(&format!("  {}", report.summary())).ok();
    for (path, error) in &report.failed {
        term.write_line(&format!(
            "    {} {}: {}",
            style("✗").red(),
            display_path(path),
            error
        ))
        .ok();
    }
}

fn display_path(path: &Path) -> String {
    dirs::home_dir()
        .and_then(|home| path.strip_prefix(home).ok().map(|rest| format!("~/{}", rest.display())))
        .unwrap_or_else(|| path.display().to_string())
}

fn print_json_results(run: &ScanRun) {
    let output = serde_json::json!({
        "cancelled": run.cancelled,
        "files_scanned": run.files_scanned,
        "files_hashed": run.files_hashed,
        "files_skipped": run.files_skipped,
        "duration_ms": run.duration_ms,
        "duplicate_groups": run.result.len(),
        "redundant_files": run.result.redundant_count(),
        "groups": run.result.iter().map(|g| {
            serde_json::json!({
                "fingerprint": g.fingerprint(),
                "paths": g.paths().collect::<Vec<_>>(),
            })
        }).collect::<Vec<_>>()
    });

    match serde_json::to_string_pretty(&output) {
        Ok(json) => println!("{}", json),
        Err(e) => warn!(error = %e, "failed to render JSON output"),
    }
}

fn print_minimal_results(result: &ScanResult) {
    for path in select_all_but_first(result) {
        println!("{}", path.display());
    }
}

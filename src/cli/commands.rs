use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};

use crate::loader::{LoadOptions, LoadReport, load_records};
use crate::merge::{MergeOptions, MergeSummary, merge_records};
use crate::models::SourceFormat;
use crate::render::{Palette, RenderOptions, Renderer, export_to_file};
use crate::stats::{Statistics, print_statistics};
use crate::utils::{default_root, format_path_with_tilde, resolve_root_dir, supports_color};

#[derive(Parser)]
#[command(name = "chat-history")]
#[command(version)]
#[command(about = "View and analyze Claude Code and Codex chat transcripts", long_about = None)]
pub struct Cli {
    /// Log loading progress and skipped input to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the merged, deduplicated transcript
    View(ViewArgs),
    /// Show statistics about the transcripts
    Stats(StatsArgs),
}

/// Where to read transcripts from and which to keep
#[derive(Args, Debug, Clone)]
pub struct SourceArgs {
    /// Directory containing transcripts (default: current directory for claude,
    /// $CODEX_HOME/sessions or ~/.codex/sessions for codex)
    pub path: Option<PathBuf>,

    /// Transcript layout
    #[arg(long, value_enum, default_value_t)]
    pub format: SourceFormat,

    /// Only sessions whose project path contains this text
    #[arg(long, value_name = "SUBSTR")]
    pub project: Option<String>,

    /// Include agent-*.jsonl sub-task transcripts; they are left out of messages and
    /// file counts (including `stats` "Agent files") unless this is set
    #[arg(long)]
    pub include_agents: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,
}

impl SourceArgs {
    fn root(&self) -> Result<PathBuf> {
        match &self.path {
            Some(path) => resolve_root_dir(path),
            None => resolve_root_dir(&default_root(self.format)?),
        }
    }

    fn load_options(&self) -> LoadOptions {
        LoadOptions {
            format: self.format,
            include_agents: self.include_agents,
            project_filter: self.project.clone(),
        }
    }

    fn use_color(&self) -> bool {
        !self.no_color && supports_color()
    }
}

#[derive(Args, Debug, Clone)]
pub struct ViewArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Only show the most recent N messages
    #[arg(long, value_name = "N")]
    pub limit: Option<usize>,

    /// Only show sessions whose id contains this text
    #[arg(long, value_name = "ID")]
    pub session: Option<String>,

    /// Hide thinking blocks
    #[arg(long)]
    pub no_thinking: bool,

    /// Hide tool calls and tool output
    #[arg(long)]
    pub no_tools: bool,

    /// Shorten long tool output and thinking
    #[arg(long)]
    pub truncate: bool,

    /// Keep duplicate messages from overlapping session files
    #[arg(long)]
    pub no_deduplicate: bool,

    /// Write a plain-text transcript to FILE instead of the terminal
    #[arg(long, value_name = "FILE")]
    pub export: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct StatsArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Break down messages and sessions per project path
    #[arg(long)]
    pub by_project: bool,
}

pub fn run(cli: Cli) -> Result<()> {
    match &cli.command {
        Some(Commands::View(args)) => view(args),
        Some(Commands::Stats(args)) => stats(args),
        None => {
            println!("Use --help for usage information");
            Ok(())
        }
    }
}

fn view(args: &ViewArgs) -> Result<()> {
    let root = args.source.root()?;
    println!("Loading {} transcripts from {}", args.source.format, format_path_with_tilde(&root));

    let loaded = load_records(&root, &args.source.load_options())?;
    print_load_notes(&loaded.report);
    if loaded.records.is_empty() {
        println!("No messages found");
        return Ok(());
    }

    let merge_options = MergeOptions {
        deduplicate: !args.no_deduplicate,
        session_filter: args.session.clone(),
        limit: args.limit,
    };
    let merged = merge_records(loaded.records, &merge_options);
    print_merge_notes(&merged.summary, &merge_options);

    if merged.records.is_empty() {
        println!("No messages found");
        return Ok(());
    }

    let options = RenderOptions {
        show_thinking: !args.no_thinking,
        show_tools: !args.no_tools,
        truncate: args.truncate,
        use_color: args.source.use_color(),
    };

    match &args.export {
        Some(path) => {
            let written = export_to_file(path, &merged.records, options)?;
            println!("Exported {} messages to {}", written, format_path_with_tilde(path));
        }
        None => {
            let stdout = io::stdout();
            let mut out = stdout.lock();
            Renderer::new(options).render_terminal(&merged.records, &mut out)?;
            out.flush()?;
        }
    }

    Ok(())
}

fn stats(args: &StatsArgs) -> Result<()> {
    let root = args.source.root()?;
    let loaded = load_records(&root, &args.source.load_options())?;
    print_load_notes(&loaded.report);
    if loaded.records.is_empty() {
        println!("No messages found in {}", format_path_with_tilde(&root));
        return Ok(());
    }

    let merged = merge_records(loaded.records, &MergeOptions::default());
    let statistics =
        Statistics::compute(&merged.records, &loaded.report, &merged.summary, args.by_project);

    let palette = Palette::new(args.source.use_color());
    let stdout = io::stdout();
    let mut out = stdout.lock();
    print_statistics(&statistics, &palette, &mut out)?;
    out.flush()?;
    Ok(())
}

fn print_load_notes(report: &LoadReport) {
    let skipped = report.unreadable_files + report.unrecognized_files;
    if skipped > 0 || report.malformed_lines > 0 {
        println!(
            "Skipped {} unreadable and {} unrecognized files, {} malformed lines \
             (warnings on stderr)",
            report.unreadable_files, report.unrecognized_files, report.malformed_lines
        );
    }
    if report.filtered_by_project > 0 {
        println!("Project filter removed {} messages", report.filtered_by_project);
    }
}

fn print_merge_notes(summary: &MergeSummary, options: &MergeOptions) {
    if !options.deduplicate {
        println!(
            "Deduplication off: all {} messages kept (may include duplicates)",
            summary.records_in
        );
    } else if summary.duplicates_removed > 0 {
        println!(
            "Deduplicated: removed {} duplicate messages ({} -> {})",
            summary.duplicates_removed,
            summary.records_in,
            summary.records_in - summary.duplicates_removed
        );
    } else {
        println!("Deduplicated: no duplicate messages found");
    }

    if let Some(session) = &options.session_filter {
        let matching =
            summary.records_in - summary.duplicates_removed - summary.filtered_by_session;
        println!("Found {} messages in sessions matching '{}'", matching, session);
    }
}

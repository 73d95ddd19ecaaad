mod pipeline;
mod registry;
mod shell;
mod workspace;

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;

use clap::{Args, Parser, Subcommand};
use crossterm::tty::IsTty;
use pwsmith_core::Error as CoreError;
use pwsmith_generate::{Estimate, GateOutcome, GenerationError, GenerationReport};
use pwsmith_select::{Category, Probability, SelectError, render_ranking};
use thiserror::Error;

use pipeline::Session;
use registry::{ArtifactStatus, RunContext, RunManifest, init_run_logging, write_manifest};
use shell::{DIAGNOSTIC_ROWS, ShellExit, ShellOptions, run_shell};
use workspace::{
    ConsoleApprover, ThresholdOverrides, Thresholds, WorkspacePaths, WriteIntent,
    load_or_create_settings, load_settings,
};

/// Exit status when the operator declines generation.
const EXIT_CANCELLED: u8 = 3;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("registry error: {0}")]
    Registry(#[from] registry::RegistryError),
    #[error("workspace error: {0}")]
    Workspace(#[from] workspace::WorkspaceError),
    #[error("core error: {0}")]
    Core(#[from] CoreError),
    #[error("selection error: {0}")]
    Select(#[from] SelectError),
    #[error("generation error: {0}")]
    Generation(#[from] GenerationError),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("missing prerequisite: {0}")]
    MissingPrerequisite(String),
}

#[derive(Parser, Debug)]
#[command(
    name = "pwsmith",
    version,
    about = "Analyze a password corpus and synthesize new candidates from its frequent parts"
)]
struct Cli {
    #[command(flatten)]
    common: CommonArgs,
    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Debug)]
struct CommonArgs {
    /// Working directory for streams, selections, logs and the run manifest.
    #[arg(short = 'w', long, global = true, default_value = "pwsmith-work")]
    workdir: PathBuf,
    /// Settings file (defaults to <workdir>/pwsmith.toml, created when absent).
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Threshold for every category without a more specific value.
    #[arg(long, global = true, value_name = "P")]
    pval: Option<Probability>,
    /// Threshold for condensed patterns.
    #[arg(long, global = true, value_name = "P")]
    pval_cpatt: Option<Probability>,
    /// Threshold for letter runs.
    #[arg(long, global = true, value_name = "P")]
    pval_let: Option<Probability>,
    /// Threshold for digit runs.
    #[arg(long, global = true, value_name = "P")]
    pval_num: Option<Probability>,
    /// Threshold for special runs.
    #[arg(long, global = true, value_name = "P")]
    pval_spec: Option<Probability>,
    /// Keep every intermediate result in memory only.
    #[arg(long, global = true, default_value_t = false)]
    no_persist: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Classify, select every category, forecast and generate.
    Run(RunArgs),
    /// Classify a corpus and persist its category streams.
    Analyze {
        input: PathBuf,
    },
    /// Select one category from the persisted streams.
    Select {
        /// condensed|letters|digits|specials (or cpatt|let|num|spec).
        category: Category,
    },
    /// Forecast the size of the corpus the persisted selections would generate.
    Forecast,
    /// Generate a corpus from the persisted selections.
    Generate {
        output: PathBuf,
        /// Confirm generation without prompting.
        #[arg(short, long, default_value_t = false)]
        yes: bool,
    },
}

#[derive(Args, Debug)]
struct RunArgs {
    input: PathBuf,
    output: PathBuf,
    /// Drive the stages from a menu instead of running them in order.
    #[arg(short, long, default_value_t = false)]
    interactive: bool,
    /// Confirm generation without prompting.
    #[arg(short, long, default_value_t = false)]
    yes: bool,
}

impl Command {
    fn name(&self) -> &'static str {
        match self {
            Command::Run(_) => "run",
            Command::Analyze { .. } => "analyze",
            Command::Select { .. } => "select",
            Command::Forecast => "forecast",
            Command::Generate { .. } => "generate",
        }
    }
}

/// What a finished command leaves for the run manifest.
#[derive(Debug, Default)]
struct CommandRecord {
    input: Option<PathBuf>,
    output: Option<PathBuf>,
    estimate: Option<Estimate>,
    report: Option<GenerationReport>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(ArtifactStatus::Cancelled) => ExitCode::from(EXIT_CANCELLED),
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ArtifactStatus, CliError> {
    let Cli { common, command } = cli;

    let paths = WorkspacePaths::new(common.workdir.clone());
    paths.ensure_dirs()?;
    let settings = match &common.config {
        Some(path) => load_settings(path)?,
        None => load_or_create_settings(&paths)?,
    };
    if settings.forecast.bytes_per_record == 0 {
        return Err(CliError::InvalidConfig(
            "forecast.bytes_per_record must be positive".to_string(),
        ));
    }

    let overrides = ThresholdOverrides {
        default: common.pval,
        condensed: common.pval_cpatt,
        letters: common.pval_let,
        digits: common.pval_num,
        specials: common.pval_spec,
    };
    let thresholds = Thresholds::resolve(&settings.thresholds, &overrides);
    let persist = settings.persist_artifacts && !common.no_persist;

    init_run_logging(&paths.logs_path())?;
    let ctx = RunContext::new(command.name(), paths.root.clone());
    tracing::info!(
        event = "run_started",
        run_id = %ctx.run_id,
        command = ctx.command.as_str(),
        workdir = %paths.root.display(),
        persist = persist
    );
    let timer = Instant::now();

    let mut session = Session::new(paths.clone(), settings, thresholds, persist);
    let mut record = CommandRecord::default();
    let result = execute(command, &mut session, &mut record);

    let status = match &result {
        Ok(status) => *status,
        Err(_) => ArtifactStatus::Error,
    };
    let mut manifest = RunManifest::new(&ctx, status, *session.thresholds());
    manifest.input = record.input;
    manifest.output = record.output;
    manifest.scan = session.last_scan();
    manifest.selection_sizes = session.selection_sizes();
    manifest.estimate = record.estimate;
    manifest.report = record.report;
    manifest.error = result.as_ref().err().map(ToString::to_string);
    write_manifest(&paths.manifest_path(), &manifest)?;

    tracing::info!(
        event = "run_finished",
        run_id = %ctx.run_id,
        status = ?status,
        duration_ms = timer.elapsed().as_millis() as u64
    );

    result
}

fn execute(
    command: Command,
    session: &mut Session,
    record: &mut CommandRecord,
) -> Result<ArtifactStatus, CliError> {
    match command {
        Command::Run(args) => {
            record.input = Some(args.input.clone());
            record.output = Some(args.output.clone());
            if args.interactive {
                run_interactive(session, &args, record)
            } else {
                run_pipeline(session, &args, record)
            }
        }
        Command::Analyze { input } => {
            record.input = Some(input.clone());
            classify(session, &input)?;
            Ok(ArtifactStatus::Ok)
        }
        Command::Select { category } => {
            select(session, category)?;
            Ok(ArtifactStatus::Ok)
        }
        Command::Forecast => {
            session.load_selections()?;
            let estimate = session.estimate();
            println!("{estimate}");
            record.estimate = Some(estimate);
            Ok(ArtifactStatus::Ok)
        }
        Command::Generate { output, yes } => {
            record.output = Some(output.clone());
            session.load_selections()?;
            generate(session, &output, yes, record)
        }
    }
}

fn run_pipeline(
    session: &mut Session,
    args: &RunArgs,
    record: &mut CommandRecord,
) -> Result<ArtifactStatus, CliError> {
    classify(session, &args.input)?;
    for category in Category::ALL {
        select(session, category)?;
    }
    generate(session, &args.output, args.yes, record)
}

fn run_interactive(
    session: &mut Session,
    args: &RunArgs,
    record: &mut CommandRecord,
) -> Result<ArtifactStatus, CliError> {
    let options = ShellOptions {
        input: &args.input,
        output: &args.output,
        assume_yes: args.yes,
        clear_screen: io::stdout().is_tty(),
    };
    let summary = run_shell(session, io::stdin().lock(), io::stdout(), &options)?;
    match summary.last_outcome {
        Some(GateOutcome::Generated { estimate, report }) => {
            record.estimate = Some(estimate);
            record.report = Some(report);
        }
        Some(GateOutcome::Declined { estimate }) => record.estimate = Some(estimate),
        None => {}
    }
    Ok(match summary.exit {
        ShellExit::Quit => ArtifactStatus::Ok,
        ShellExit::Declined => ArtifactStatus::Cancelled,
    })
}

fn classify(session: &mut Session, input: &Path) -> Result<(), CliError> {
    println!("Reading {} and classifying its records ...", input.display());
    let summary = session.classify(input)?;
    println!(
        "Classified {} line(s): {} valid, {} skipped, {} empty.",
        summary.lines, summary.valid, summary.skipped, summary.empty
    );
    Ok(())
}

fn select(session: &mut Session, category: Category) -> Result<(), CliError> {
    let selection = session.select(category)?;
    let mut stdout = io::stdout().lock();
    writeln!(stdout)?;
    for line in render_ranking(&selection, DIAGNOSTIC_ROWS) {
        writeln!(stdout, "{line}")?;
    }
    Ok(())
}

fn generate(
    session: &mut Session,
    output: &Path,
    yes: bool,
    record: &mut CommandRecord,
) -> Result<ArtifactStatus, CliError> {
    let intent = WriteIntent::new(
        "the generated corpus will be written to",
        vec![output.to_path_buf()],
    );
    let mut approver = ConsoleApprover::new(io::stdin().lock(), io::stdout(), intent, yes);
    match session.generate(output, &mut approver)? {
        GateOutcome::Generated { estimate, report } => {
            println!(
                "Generated {} record(s) ({} bytes) into {}.",
                report.records_written,
                report.bytes_written,
                output.display()
            );
            record.estimate = Some(estimate);
            record.report = Some(report);
            Ok(ArtifactStatus::Ok)
        }
        GateOutcome::Declined { estimate } => {
            println!("Generation declined; nothing was written.");
            record.estimate = Some(estimate);
            Ok(ArtifactStatus::Cancelled)
        }
    }
}

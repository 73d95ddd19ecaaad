pub mod commands;
pub mod state;

use std::io::{BufRead, Write};
use std::path::Path;

use crossterm::cursor::MoveTo;
use crossterm::execute;
use crossterm::terminal::{Clear, ClearType};
use pwsmith_generate::{GateOutcome, GenerationError};
use pwsmith_select::{Category, Probability, render_ranking};
use tracing::info;

use crate::CliError;
use crate::pipeline::Session;
use crate::workspace::{ConsoleApprover, WriteIntent};
use commands::{MENU, ShellCommand};
use state::{ShellState, Stage};

/// Ranked rows printed after each selection.
pub const DIAGNOSTIC_ROWS: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellExit {
    Quit,
    /// The operator declined a generation; the session ends.
    Declined,
}

#[derive(Debug)]
pub struct ShellSummary {
    pub exit: ShellExit,
    pub last_outcome: Option<GateOutcome>,
}

pub struct ShellOptions<'a> {
    pub input: &'a Path,
    pub output: &'a Path,
    pub assume_yes: bool,
    pub clear_screen: bool,
}

/// Runs the interactive menu until the operator exits or declines a
/// generation. End of input behaves like `exit`.
pub fn run_shell<R: BufRead, W: Write>(
    session: &mut Session,
    mut input: R,
    mut output: W,
    options: &ShellOptions<'_>,
) -> Result<ShellSummary, CliError> {
    let mut state = ShellState::new();
    let mut last_outcome = None;

    loop {
        writeln!(output)?;
        for line in MENU {
            writeln!(output, "{line}")?;
        }
        write!(output, "Your selection: ")?;
        output.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            break;
        }

        let command = match line.parse::<ShellCommand>() {
            Ok(command) => command,
            Err(err) => {
                writeln!(output, "ERROR: {err}")?;
                continue;
            }
        };
        if let Err(reason) = state.check(&command) {
            writeln!(output, "ERROR: {reason}")?;
            continue;
        }
        if options.clear_screen && command != ShellCommand::Exit {
            execute!(output, Clear(ClearType::All), MoveTo(0, 0))?;
        }
        info!(event = "shell_command", command = ?command);

        match command {
            ShellCommand::Exit => break,
            ShellCommand::Help => {}
            ShellCommand::Status => write_status(&mut output, session, &state)?,
            ShellCommand::Classify => {
                writeln!(output, "Classifying {} ...", options.input.display())?;
                let summary = session.classify(options.input)?;
                state.on_classified();
                writeln!(
                    output,
                    "Classified {} record(s): {} valid, {} skipped, {} empty.",
                    summary.lines, summary.valid, summary.skipped, summary.empty
                )?;
            }
            ShellCommand::Load => {
                if let Err(err) = session.load_artifacts() {
                    writeln!(output, "ERROR: {err}")?;
                    continue;
                }
                state.on_loaded(session.selections());
                writeln!(
                    output,
                    "Loaded the artifacts of {}.",
                    session.paths().root.display()
                )?;
                write_status(&mut output, session, &state)?;
            }
            ShellCommand::Select(category) => {
                let current = session.thresholds().get(category);
                let threshold = prompt_threshold(&mut input, &mut output, category, current)?;
                session.thresholds_mut().set(category, threshold);
                let selection = session.select(category)?;
                state.on_selected(category);
                for line in render_ranking(&selection, DIAGNOSTIC_ROWS) {
                    writeln!(output, "{line}")?;
                }
            }
            ShellCommand::Generate => {
                let missing = state.missing_selections();
                if !missing.is_empty() {
                    let names: Vec<&str> = missing.iter().map(|category| category.name()).collect();
                    writeln!(output, "Not selected yet: {}", names.join(", "))?;
                }
                let intent = WriteIntent::new(
                    "the generated corpus will be written to",
                    vec![options.output.to_path_buf()],
                );
                let mut approver =
                    ConsoleApprover::new(&mut input, &mut output, intent, options.assume_yes);
                let outcome = match session.generate(options.output, &mut approver) {
                    Ok(outcome) => outcome,
                    Err(CliError::Generation(GenerationError::MissingPrerequisite(reason))) => {
                        writeln!(output, "ERROR: {reason}")?;
                        continue;
                    }
                    Err(err) => return Err(err),
                };
                match &outcome {
                    GateOutcome::Declined { .. } => {
                        return Ok(ShellSummary {
                            exit: ShellExit::Declined,
                            last_outcome: Some(outcome),
                        });
                    }
                    GateOutcome::Generated { report, .. } => {
                        state.on_generated();
                        writeln!(
                            output,
                            "Generated {} record(s) into {}.",
                            report.records_written,
                            options.output.display()
                        )?;
                    }
                }
                last_outcome = Some(outcome);
            }
        }
    }

    Ok(ShellSummary {
        exit: ShellExit::Quit,
        last_outcome,
    })
}

/// Asks for a new threshold until the answer is empty or valid.
///
/// An empty answer, or end of input, keeps `current`.
fn prompt_threshold<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    category: Category,
    current: Probability,
) -> std::io::Result<Probability> {
    loop {
        writeln!(output, "Press Enter to keep the current value.")?;
        writeln!(output, "The current threshold for {category} is {current}")?;
        write!(output, "New threshold (between 0.00 and 1.00)?: ")?;
        output.flush()?;

        let mut answer = String::new();
        if input.read_line(&mut answer)? == 0 || answer.trim().is_empty() {
            return Ok(current);
        }
        match answer.parse::<Probability>() {
            Ok(threshold) => return Ok(threshold),
            Err(_) => writeln!(output, "ERROR: wrong input")?,
        }
    }
}

fn write_status<W: Write>(
    output: &mut W,
    session: &Session,
    state: &ShellState,
) -> std::io::Result<()> {
    let classified = if state.reached(Stage::Classified) {
        "yes"
    } else {
        "no"
    };
    writeln!(output, "classified: {classified}")?;
    for category in Category::ALL {
        let threshold = session.thresholds().get(category);
        match session.selections().get(category) {
            Some(set) => writeln!(
                output,
                "{category}: {} value(s) selected at p = {}",
                set.len(),
                set.threshold
            )?,
            None => writeln!(output, "{category}: not selected (p = {threshold})")?,
        }
    }
    writeln!(output, "{}", session.estimate())
}

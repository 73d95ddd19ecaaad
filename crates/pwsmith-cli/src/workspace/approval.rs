use std::io::{BufRead, Write};
use std::path::PathBuf;

use pwsmith_generate::{Approver, Estimate};

#[derive(Debug, Clone)]
pub struct WriteIntent {
    pub reason: String,
    pub paths: Vec<PathBuf>,
}

impl WriteIntent {
    pub fn new(reason: impl Into<String>, paths: Vec<PathBuf>) -> Self {
        Self {
            reason: reason.into(),
            paths,
        }
    }
}

/// Prints the forecast and asks the operator to confirm on a line reader.
///
/// Only `y` or `yes` confirms; any other answer, or end of input, declines.
/// `assume_yes` records a confirmation given up front on the command line.
pub struct ConsoleApprover<R, W> {
    input: R,
    output: W,
    intent: WriteIntent,
    assume_yes: bool,
}

impl<R: BufRead, W: Write> ConsoleApprover<R, W> {
    pub fn new(input: R, output: W, intent: WriteIntent, assume_yes: bool) -> Self {
        Self {
            input,
            output,
            intent,
            assume_yes,
        }
    }
}

impl<R: BufRead, W: Write> Approver for ConsoleApprover<R, W> {
    fn approve(&mut self, estimate: &Estimate) -> std::io::Result<bool> {
        writeln!(self.output)?;
        writeln!(self.output, "{estimate}")?;
        writeln!(self.output, "{}:", self.intent.reason)?;
        for path in &self.intent.paths {
            writeln!(self.output, "  {}", path.display())?;
        }

        if self.assume_yes {
            writeln!(self.output, "proceeding (confirmed with --yes)")?;
            return Ok(true);
        }

        write!(self.output, "Do you want to proceed? (y/n): ")?;
        self.output.flush()?;

        let mut answer = String::new();
        if self.input.read_line(&mut answer)? == 0 {
            return Ok(false);
        }
        let answer = answer.trim().to_ascii_lowercase();
        Ok(answer == "y" || answer == "yes")
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    fn unknown() -> Estimate {
        Estimate::Unknown {
            reason: "no selection for letters".to_string(),
        }
    }

    fn ask(answer: &str) -> (bool, String) {
        let mut output = Vec::new();
        let intent = WriteIntent::new("generate corpus", vec![PathBuf::from("out.txt")]);
        let mut approver =
            ConsoleApprover::new(Cursor::new(answer.to_string()), &mut output, intent, false);
        let approved = approver.approve(&unknown()).expect("approve");
        drop(approver);
        (approved, String::from_utf8(output).expect("utf8 output"))
    }

    #[test]
    fn only_affirmative_answers_confirm() {
        assert!(ask("y\n").0);
        assert!(ask("YES\n").0);
        assert!(!ask("n\n").0);
        assert!(!ask("\n").0);
        assert!(!ask("sure\n").0);
        assert!(!ask("").0);
    }

    #[test]
    fn prompt_shows_forecast_and_paths() {
        let (_, text) = ask("n\n");
        assert!(text.contains("cannot be computed"));
        assert!(text.contains("out.txt"));
        assert!(text.contains("Do you want to proceed?"));
    }

    #[test]
    fn assume_yes_skips_the_prompt() {
        let mut output = Vec::new();
        let intent = WriteIntent::new("generate corpus", Vec::new());
        let mut approver = ConsoleApprover::new(Cursor::new(String::new()), &mut output, intent, true);
        assert!(approver.approve(&unknown()).expect("approve"));
    }
}

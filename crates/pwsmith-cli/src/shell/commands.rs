use std::str::FromStr;

use pwsmith_select::Category;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellCommand {
    Classify,
    Select(Category),
    Generate,
    Load,
    Status,
    Help,
    Exit,
}

impl FromStr for ShellCommand {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let value = value.trim().to_ascii_lowercase();
        let command = match value.as_str() {
            "0" | "exit" | "quit" => ShellCommand::Exit,
            "1" | "classify" => ShellCommand::Classify,
            "2a" | "2b" | "2c" | "2d" => ShellCommand::Select(parse_category(&value)?),
            "3" | "generate" => ShellCommand::Generate,
            "load" => ShellCommand::Load,
            "status" => ShellCommand::Status,
            "help" | "?" => ShellCommand::Help,
            other => match other.strip_prefix("select ") {
                Some(category) => ShellCommand::Select(parse_category(category.trim())?),
                None => return Err(format!("unknown command '{other}'")),
            },
        };
        Ok(command)
    }
}

fn parse_category(value: &str) -> Result<Category, String> {
    value.parse::<Category>().map_err(|err| err.to_string())
}

pub const MENU: &[&str] = &[
    "What do you want to do?",
    "[0]  Exit",
    "[1]  Classify the input corpus",
    "[2a] Select condensed patterns by threshold",
    "[2b] Select letter runs by threshold",
    "[2c] Select digit runs by threshold",
    "[2d] Select special runs by threshold",
    "[3]  Generate the new corpus",
    "",
    "Also: status, load (reuse the artifacts of the workdir), help",
    "Selecting requires a classified corpus; generating requires all four selections.",
];

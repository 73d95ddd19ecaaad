use std::collections::BTreeSet;

use pwsmith_generate::SelectionBundle;
use pwsmith_select::Category;

use super::commands::ShellCommand;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Stage {
    Classified,
    CondensedSelected,
    LettersSelected,
    DigitsSelected,
    SpecialsSelected,
    Generated,
}

impl Stage {
    pub const fn selected(category: Category) -> Self {
        match category {
            Category::Condensed => Stage::CondensedSelected,
            Category::Letters => Stage::LettersSelected,
            Category::Digits => Stage::DigitsSelected,
            Category::Specials => Stage::SpecialsSelected,
        }
    }
}

/// Stages reached so far in a shell session.
#[derive(Debug, Clone, Default)]
pub struct ShellState {
    reached: BTreeSet<Stage>,
}

impl ShellState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reached(&self, stage: Stage) -> bool {
        self.reached.contains(&stage)
    }

    /// Rejects a command whose prerequisite stage has not been reached.
    ///
    /// Generation is never rejected here: its forecast reports what is
    /// missing and the generator refuses to run without every selection.
    pub fn check(&self, command: &ShellCommand) -> Result<(), String> {
        match command {
            ShellCommand::Select(category) if !self.reached(Stage::Classified) => Err(format!(
                "cannot select {category} before the corpus is classified (run 1 or load first)"
            )),
            _ => Ok(()),
        }
    }

    pub fn on_classified(&mut self) {
        self.reached.clear();
        self.reached.insert(Stage::Classified);
    }

    pub fn on_selected(&mut self, category: Category) {
        self.reached.insert(Stage::selected(category));
        self.reached.remove(&Stage::Generated);
    }

    pub fn on_generated(&mut self) {
        self.reached.insert(Stage::Generated);
    }

    /// Mirrors selections reloaded from disk.
    pub fn on_loaded(&mut self, bundle: &SelectionBundle) {
        self.on_classified();
        for category in Category::ALL {
            if bundle.get(category).is_some() {
                self.reached.insert(Stage::selected(category));
            }
        }
    }

    pub fn missing_selections(&self) -> Vec<Category> {
        Category::ALL
            .into_iter()
            .filter(|category| !self.reached(Stage::selected(*category)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn select_requires_classification() {
        let mut state = ShellState::new();
        assert!(state.check(&ShellCommand::Select(Category::Letters)).is_err());
        assert!(state.check(&ShellCommand::Generate).is_ok());
        state.on_classified();
        assert!(state.check(&ShellCommand::Select(Category::Letters)).is_ok());
    }

    #[test]
    fn reclassifying_drops_selections() {
        let mut state = ShellState::new();
        state.on_classified();
        for category in Category::ALL {
            state.on_selected(category);
        }
        state.on_generated();
        assert!(state.missing_selections().is_empty());

        state.on_classified();
        assert_eq!(state.missing_selections(), Category::ALL.to_vec());
        assert!(!state.reached(Stage::Generated));
    }

    #[test]
    fn reselecting_invalidates_generation() {
        let mut state = ShellState::new();
        state.on_classified();
        state.on_selected(Category::Digits);
        state.on_generated();
        state.on_selected(Category::Digits);
        assert!(!state.reached(Stage::Generated));
        assert!(state.reached(Stage::DigitsSelected));
    }
}

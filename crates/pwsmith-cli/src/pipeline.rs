use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use pwsmith_core::{ScanSummary, scan_corpus};
use pwsmith_generate::{Approver, Estimate, GateOutcome, GenerateOptions, SelectionBundle, run_gated};
use pwsmith_select::{Category, CorpusIndex, Selection};
use tracing::info;

use crate::CliError;
use crate::workspace::{ArtifactStore, Settings, StreamFiles, Thresholds, WorkspacePaths};

/// State carried between the stages of one run or shell session.
///
/// Classification resets every selection; selecting a category replaces
/// only that category's selection.
pub struct Session {
    store: ArtifactStore,
    settings: Settings,
    thresholds: Thresholds,
    persist: bool,
    index: Option<CorpusIndex>,
    selections: SelectionBundle,
    last_scan: Option<ScanSummary>,
}

impl Session {
    pub fn new(paths: WorkspacePaths, settings: Settings, thresholds: Thresholds, persist: bool) -> Self {
        Self {
            store: ArtifactStore::new(paths),
            settings,
            thresholds,
            persist,
            index: None,
            selections: SelectionBundle::default(),
            last_scan: None,
        }
    }

    pub fn paths(&self) -> &WorkspacePaths {
        self.store.paths()
    }

    pub fn thresholds(&self) -> &Thresholds {
        &self.thresholds
    }

    pub fn thresholds_mut(&mut self) -> &mut Thresholds {
        &mut self.thresholds
    }

    pub fn selections(&self) -> &SelectionBundle {
        &self.selections
    }

    pub fn last_scan(&self) -> Option<ScanSummary> {
        self.last_scan
    }

    pub fn is_classified(&self) -> bool {
        self.index.is_some()
    }

    pub fn options(&self) -> GenerateOptions {
        GenerateOptions {
            bytes_per_record: self.settings.forecast.bytes_per_record,
        }
    }

    /// Classifies the corpus at `input`, persisting the category streams
    /// when artifacts are enabled.
    pub fn classify(&mut self, input: &Path) -> Result<ScanSummary, CliError> {
        let reader = BufReader::new(File::open(input)?);
        let mut index = CorpusIndex::new();

        let summary = if self.persist {
            self.store.paths().ensure_dirs()?;
            let mut files = StreamFiles::create(self.store.paths())?;
            let summary = scan_corpus(reader, &mut (&mut index, &mut files))?;
            self.store.clear_selections()?;
            files.commit()?;
            summary
        } else {
            scan_corpus(reader, &mut index)?
        };

        self.index = Some(index);
        self.selections = SelectionBundle::default();
        self.last_scan = Some(summary);
        Ok(summary)
    }

    /// Reloads the streams and selections persisted by an earlier run.
    pub fn load_artifacts(&mut self) -> Result<(), CliError> {
        self.index = Some(self.store.load_index()?);
        self.selections = self.store.load_bundle()?;
        Ok(())
    }

    /// Reloads only the persisted selections.
    pub fn load_selections(&mut self) -> Result<(), CliError> {
        self.selections = self.store.load_bundle()?;
        Ok(())
    }

    /// Selects `category` at its effective threshold.
    pub fn select(&mut self, category: Category) -> Result<Selection, CliError> {
        let index = match self.index.take() {
            Some(index) => index,
            None if self.store.has_streams() => self.store.load_index()?,
            None => {
                return Err(CliError::MissingPrerequisite(
                    "the corpus has not been classified yet".to_string(),
                ));
            }
        };
        let selection = index.select(category, self.thresholds.get(category));
        self.index = Some(index);
        if self.persist {
            self.store.write_selection(&selection)?;
        }
        self.selections.set(selection.set.clone());
        Ok(selection)
    }

    pub fn estimate(&self) -> Estimate {
        Estimate::of_bundle(&self.selections, self.settings.forecast.bytes_per_record)
    }

    /// Forecasts, asks `approver`, then writes the corpus to `output`.
    pub fn generate<A: Approver + ?Sized>(
        &self,
        output: &Path,
        approver: &mut A,
    ) -> Result<GateOutcome, CliError> {
        let outcome = run_gated(&self.selections, output, approver, &self.options())?;
        if let GateOutcome::Generated { report, .. } = &outcome {
            info!(
                event = "corpus_written",
                path = %output.display(),
                records = report.records_written,
                bytes = report.bytes_written
            );
        }
        Ok(outcome)
    }

    pub fn selection_sizes(&self) -> Vec<(String, usize)> {
        Category::ALL
            .into_iter()
            .filter_map(|category| {
                self.selections
                    .get(category)
                    .map(|set| (category.name().to_string(), set.len()))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use pwsmith_generate::GenerationError;
    use pwsmith_select::Probability;
    use uuid::Uuid;

    use super::*;

    fn temp_session(persist: bool) -> (Session, std::path::PathBuf) {
        let root = std::env::temp_dir().join(format!("pwsmith-pipeline-{}", Uuid::new_v4()));
        std::fs::create_dir_all(&root).expect("create root");
        let input = root.join("corpus.txt");
        std::fs::write(&input, "rose1982!\nlove2021\nLove55\nrose55\n").expect("write corpus");
        let mut thresholds = Thresholds::default();
        thresholds.set(Category::Condensed, Probability::ONE);
        thresholds.set(Category::Letters, Probability::ONE);
        thresholds.set(Category::Digits, Probability::ONE);
        thresholds.set(Category::Specials, Probability::ONE);
        let session = Session::new(
            WorkspacePaths::new(root.join("work")),
            Settings::default(),
            thresholds,
            persist,
        );
        (session, input)
    }

    #[test]
    fn selecting_before_classifying_is_rejected() {
        let (mut session, input) = temp_session(false);
        assert!(matches!(
            session.select(Category::Letters),
            Err(CliError::MissingPrerequisite(_))
        ));
        std::fs::remove_dir_all(input.parent().expect("root")).ok();
    }

    #[test]
    fn full_pipeline_writes_every_combination() {
        let (mut session, input) = temp_session(true);
        let summary = session.classify(&input).expect("classify");
        assert_eq!(summary.valid, 4);
        for category in Category::ALL {
            session.select(category).expect("select");
        }
        assert_eq!(session.estimate().records(), Some(3 * 3 + 3 * 3 * 1));

        let output = input.with_file_name("out.txt");
        let mut approve = |_: &Estimate| -> std::io::Result<bool> { Ok(true) };
        let outcome = session.generate(&output, &mut approve).expect("generate");
        let GateOutcome::Generated { report, .. } = outcome else {
            panic!("generation should run");
        };
        assert_eq!(report.records_written, 18);

        let mut reloaded = Session::new(
            session.paths().clone(),
            Settings::default(),
            *session.thresholds(),
            true,
        );
        reloaded.load_artifacts().expect("reload");
        assert!(reloaded.is_classified());
        assert_eq!(reloaded.estimate(), session.estimate());
        std::fs::remove_dir_all(input.parent().expect("root")).ok();
    }

    #[test]
    fn selections_of_a_replaced_corpus_are_not_reused() {
        let (mut session, input) = temp_session(true);
        session.classify(&input).expect("classify");
        for category in Category::ALL {
            session.select(category).expect("select");
        }

        let other = input.with_file_name("other.txt");
        std::fs::write(&other, "zzzz\n").expect("write other corpus");
        let mut second = Session::new(
            session.paths().clone(),
            Settings::default(),
            *session.thresholds(),
            true,
        );
        second.classify(&other).expect("classify other corpus");

        let mut third = Session::new(
            session.paths().clone(),
            Settings::default(),
            *session.thresholds(),
            true,
        );
        third.load_selections().expect("load selections");
        assert_eq!(third.selections().missing(), Category::ALL.to_vec());
        assert_eq!(third.estimate().records(), None);

        let output = input.with_file_name("out.txt");
        let mut approve = |_: &Estimate| -> std::io::Result<bool> { Ok(true) };
        assert!(matches!(
            third.generate(&output, &mut approve),
            Err(CliError::Generation(GenerationError::MissingPrerequisite(_)))
        ));
        assert!(!output.exists());
        std::fs::remove_dir_all(input.parent().expect("root")).ok();
    }

    #[test]
    fn reclassifying_resets_selections() {
        let (mut session, input) = temp_session(false);
        session.classify(&input).expect("classify");
        session.select(Category::Digits).expect("select");
        assert_eq!(session.selection_sizes().len(), 1);
        session.classify(&input).expect("classify again");
        assert!(session.selection_sizes().is_empty());
        std::fs::remove_dir_all(input.parent().expect("root")).ok();
    }
}

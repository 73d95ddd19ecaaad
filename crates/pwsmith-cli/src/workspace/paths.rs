use std::path::{Path, PathBuf};

use pwsmith_core::Stream;
use pwsmith_select::Category;

use super::{WorkspaceError, WorkspaceResult};

/// File layout of a working directory.
#[derive(Debug, Clone)]
pub struct WorkspacePaths {
    pub root: PathBuf,
}

impl WorkspacePaths {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn settings_path(&self) -> PathBuf {
        self.root.join("pwsmith.toml")
    }

    pub fn logs_path(&self) -> PathBuf {
        self.root.join("logs.ndjson")
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.root.join("run.json")
    }

    pub fn selections_meta_path(&self) -> PathBuf {
        self.root.join("selections.json")
    }

    pub fn stream_path(&self, stream: Stream) -> PathBuf {
        let name = match stream {
            Stream::Pattern => "patt.dic",
            Stream::Condensed => "cpatt.dic",
            Stream::Letters => "let.dic",
            Stream::Digits => "num.dic",
            Stream::Specials => "spec.dic",
        };
        self.root.join(name)
    }

    pub fn selection_path(&self, category: Category) -> PathBuf {
        let name = match category {
            Category::Condensed => "cpattprod.dic",
            Category::Letters => "letprod.dic",
            Category::Digits => "numprod.dic",
            Category::Specials => "specprod.dic",
        };
        self.root.join(name)
    }

    pub fn frequency_csv_path(&self, category: Category) -> PathBuf {
        self.root.join(format!("{}.freq.csv", category.name()))
    }

    pub fn ensure_dirs(&self) -> WorkspaceResult<()> {
        create_if_missing(&self.root)
    }
}

fn create_if_missing(path: &Path) -> WorkspaceResult<()> {
    if path.exists() {
        return Ok(());
    }
    std::fs::create_dir_all(path).map_err(WorkspaceError::from)
}

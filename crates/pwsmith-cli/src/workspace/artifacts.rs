use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use pwsmith_core::{Stream, StreamSink};
use pwsmith_generate::SelectionBundle;
use pwsmith_select::{
    Category, CorpusIndex, DEFAULT_THRESHOLD, Probability, Selection, SelectionSet,
    write_frequency_csv,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::atomic::{commit, create_for_write, temp_path, write_bytes_atomic, write_json_atomic};
use super::paths::WorkspacePaths;
use super::{WorkspaceError, WorkspaceResult};

/// Bookkeeping kept next to a selection file, which itself holds values only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionMeta {
    pub threshold: Probability,
    pub size: usize,
    pub distinct: usize,
    pub created_at: DateTime<Utc>,
}

/// Writes the five classifier streams to temp files, renamed on [`commit`].
///
/// [`commit`]: StreamFiles::commit
pub struct StreamFiles {
    files: Vec<(Stream, PathBuf, PathBuf, BufWriter<File>)>,
}

impl StreamFiles {
    pub fn create(paths: &WorkspacePaths) -> WorkspaceResult<Self> {
        let mut files = Vec::with_capacity(Stream::ALL.len());
        for stream in Stream::ALL {
            let path = paths.stream_path(stream);
            let tmp = temp_path(&path)?;
            let file = create_for_write(&tmp)?;
            files.push((stream, tmp, path, BufWriter::new(file)));
        }
        Ok(Self { files })
    }

    pub fn commit(self) -> WorkspaceResult<()> {
        for (stream, tmp, path, writer) in self.files {
            let file = writer
                .into_inner()
                .map_err(|err| WorkspaceError::Io(err.into_error()))?;
            file.sync_all()?;
            drop(file);
            commit(&tmp, &path)?;
            debug!(event = "stream_persisted", stream = stream.name(), path = %path.display());
        }
        Ok(())
    }
}

impl StreamSink for StreamFiles {
    fn append(&mut self, stream: Stream, value: &str) -> pwsmith_core::Result<()> {
        if let Some((_, _, _, writer)) = self.files.iter_mut().find(|entry| entry.0 == stream) {
            writer.write_all(value.as_bytes())?;
            writer.write_all(b"\n")?;
        }
        Ok(())
    }
}

/// Reads and writes the persisted artifacts of a working directory.
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    paths: WorkspacePaths,
}

impl ArtifactStore {
    pub fn new(paths: WorkspacePaths) -> Self {
        Self { paths }
    }

    pub fn paths(&self) -> &WorkspacePaths {
        &self.paths
    }

    pub fn has_streams(&self) -> bool {
        Stream::ALL
            .into_iter()
            .all(|stream| self.paths.stream_path(stream).is_file())
    }

    /// Rebuilds the frequency tables from previously persisted streams.
    pub fn load_index(&self) -> WorkspaceResult<CorpusIndex> {
        let mut index = CorpusIndex::new();
        for stream in Stream::ALL {
            for value in read_lines(self.paths.stream_path(stream))? {
                index.append(stream, &value)?;
            }
        }
        info!(
            event = "streams_loaded",
            root = %self.paths.root.display(),
            patterns = index.patterns()
        );
        Ok(index)
    }

    /// Persists a selection: the values, the full ranking as CSV, and its
    /// metadata entry.
    pub fn write_selection(&self, selection: &Selection) -> WorkspaceResult<()> {
        let category = selection.set.category;

        let mut data = Vec::new();
        for value in selection.set.values() {
            data.extend_from_slice(value.as_bytes());
            data.push(b'\n');
        }
        write_bytes_atomic(&self.paths.selection_path(category), &data)?;

        let csv_path = self.paths.frequency_csv_path(category);
        let tmp = temp_path(&csv_path)?;
        let file = create_for_write(&tmp)?;
        write_frequency_csv(BufWriter::new(file), selection)?;
        commit(&tmp, &csv_path)?;

        let mut meta = self.load_meta()?;
        meta.insert(
            category,
            SelectionMeta {
                threshold: selection.set.threshold,
                size: selection.size(),
                distinct: selection.ranking.len(),
                created_at: Utc::now(),
            },
        );
        write_json_atomic(&self.paths.selections_meta_path(), &meta)?;
        info!(
            event = "selection_persisted",
            category = %category,
            path = %self.paths.selection_path(category).display()
        );
        Ok(())
    }

    /// Deletes every persisted selection, its CSV and the metadata file.
    ///
    /// Selections are cut from one set of streams; once the streams are
    /// replaced they no longer describe the corpus on disk.
    pub fn clear_selections(&self) -> WorkspaceResult<()> {
        let mut removed = 0_usize;
        for category in Category::ALL {
            removed += remove_if_present(&self.paths.selection_path(category))?;
            removed += remove_if_present(&self.paths.frequency_csv_path(category))?;
        }
        removed += remove_if_present(&self.paths.selections_meta_path())?;
        if removed > 0 {
            info!(event = "selections_cleared", files = removed);
        }
        Ok(())
    }

    /// Loads a persisted selection, or `None` when it was never written.
    pub fn load_selection(&self, category: Category) -> WorkspaceResult<Option<SelectionSet>> {
        let path = self.paths.selection_path(category);
        if !path.is_file() {
            return Ok(None);
        }
        let values = read_lines(path)?;
        let threshold = self
            .load_meta()?
            .get(&category)
            .map(|meta| meta.threshold)
            .unwrap_or(DEFAULT_THRESHOLD);
        Ok(Some(SelectionSet::new(category, threshold, values)))
    }

    pub fn load_bundle(&self) -> WorkspaceResult<SelectionBundle> {
        let mut bundle = SelectionBundle::default();
        for category in Category::ALL {
            if let Some(selection) = self.load_selection(category)? {
                bundle.set(selection);
            }
        }
        Ok(bundle)
    }

    pub fn load_meta(&self) -> WorkspaceResult<BTreeMap<Category, SelectionMeta>> {
        let path = self.paths.selections_meta_path();
        if !path.is_file() {
            return Ok(BTreeMap::new());
        }
        let data = std::fs::read(&path)?;
        Ok(serde_json::from_slice(&data)?)
    }
}

fn remove_if_present(path: &Path) -> WorkspaceResult<usize> {
    match std::fs::remove_file(path) {
        Ok(()) => Ok(1),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(0),
        Err(err) => Err(err.into()),
    }
}

fn read_lines(path: PathBuf) -> WorkspaceResult<Vec<String>> {
    if !path.is_file() {
        return Err(WorkspaceError::MissingArtifact(path));
    }
    let reader = BufReader::new(File::open(&path)?);
    let mut values = Vec::new();
    for line in reader.lines() {
        let line = line?;
        let line = line.strip_suffix('\r').unwrap_or(&line);
        if !line.is_empty() {
            values.push(line.to_string());
        }
    }
    Ok(values)
}

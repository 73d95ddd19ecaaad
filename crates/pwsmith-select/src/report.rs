use std::io::Write;

use crate::errors::SelectError;
use crate::selector::Selection;

/// Render the ranking of a selection as aligned text lines.
pub fn render_ranking(selection: &Selection, max_rows: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let ranking = &selection.ranking;
    let set = &selection.set;

    lines.push(format!(
        "{}: {} distinct value(s), {} occurrence(s)",
        set.category,
        ranking.len(),
        ranking.total()
    ));
    if ranking.is_empty() {
        lines.push("  (category never occurred in the corpus)".to_string());
        return lines;
    }

    let width = ranking
        .entries()
        .iter()
        .take(max_rows)
        .map(|entry| entry.value.len())
        .max()
        .unwrap_or(0)
        .max(5);

    lines.push(format!(
        "  {:>5}  {:<width$}  {:>10}  {:>10}",
        "rank", "value", "count", "cumulative"
    ));
    for (index, entry) in ranking.entries().iter().take(max_rows).enumerate() {
        let marker = if index < set.len() { '*' } else { ' ' };
        lines.push(format!(
            "{marker} {:>5}  {:<width$}  {:>10}  {:>10.4}",
            index + 1,
            entry.value,
            entry.count,
            entry.cumulative
        ));
    }
    if ranking.len() > max_rows {
        lines.push(format!("  ... {} more", ranking.len() - max_rows));
    }
    lines.push(format!(
        "selected {} of {} at p = {}",
        set.len(),
        ranking.len(),
        set.threshold
    ));
    lines
}

/// Write the full ranking as CSV: `rank,value,count,cumulative,selected`.
pub fn write_frequency_csv<W: Write>(writer: W, selection: &Selection) -> Result<(), SelectError> {
    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(writer);
    writer.write_record(["rank", "value", "count", "cumulative", "selected"])?;
    for (index, entry) in selection.ranking.entries().iter().enumerate() {
        writer.write_record([
            (index + 1).to_string(),
            entry.value.clone(),
            entry.count.to_string(),
            format!("{:.6}", entry.cumulative),
            (index < selection.size()).to_string(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

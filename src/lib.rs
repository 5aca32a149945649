// src/lib.rs
pub mod types;
pub mod errors;
pub mod fastq;
pub mod read_name;
pub mod normalize;
pub mod classify;
pub mod manifest;

use std::path::Path;

use log::{debug, info};
use rayon::prelude::*;

use crate::classify::{classify_reconciled, reconcile};
use crate::errors::{Result, ScoreError};
use crate::fastq::read_fastq_records;
use crate::manifest::ManifestEntry;
use crate::read_name::decode_reads;
use crate::types::{ClassifiedRow, LabelStyle, ToolTag};

pub use crate::normalize::ToolKind;

/// Column names of the scoring table.
pub const OUTPUT_HEADER: [&str; 3] = ["NAME", "ALIGNED", "TOOL"];

/// Classified rows accumulated over a whole manifest, one per (read, tool).
#[derive(Debug, Default)]
pub struct ScoringResults {
    pub rows: Vec<ClassifiedRow>,
}

impl ScoringResults {
    /// Generate the tab-separated scoring table on demand
    pub fn get_output_table(&self, style: LabelStyle) -> Result<String> {
        let mut wtr = table_writer(Vec::new());
        self.write_rows(&mut wtr, style)?;
        let bytes = wtr
            .into_inner()
            .map_err(|e| ScoreError::io("<memory>", e.into_error()))?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    /// Write the scoring table to `path`.
    pub fn write_table<P: AsRef<Path>>(&self, path: P, style: LabelStyle) -> Result<()> {
        let path = path.as_ref();
        let file = std::fs::File::create(path).map_err(|e| ScoreError::io(path, e))?;
        let mut wtr = table_writer(file);
        self.write_rows(&mut wtr, style)?;
        wtr.flush().map_err(|e| ScoreError::io(path, e))?;
        Ok(())
    }

    fn write_rows<W: std::io::Write>(&self, wtr: &mut csv::Writer<W>, style: LabelStyle) -> Result<()> {
        wtr.write_record(OUTPUT_HEADER)?;
        for row in &self.rows {
            let tag = row.tag.to_string();
            wtr.write_record([row.read_id.as_str(), row.outcome.render(style), tag.as_str()])?;
        }
        Ok(())
    }
}

fn table_writer<W: std::io::Write>(inner: W) -> csv::Writer<W> {
    csv::WriterBuilder::new()
        .delimiter(b'\t')
        .quote_style(csv::QuoteStyle::Never)
        .from_writer(inner)
}

/// Score every configured tool against one simulated dataset.
///
/// Ground truth is decoded once and shared by all tools. A tool without a
/// result file scores every read as unaligned.
pub fn score_dataset(entry: &ManifestEntry) -> Result<Vec<ClassifiedRow>> {
    let dataset = entry.dataset_id();

    let reads = read_fastq_records(&entry.sim_reads).map_err(|e| e.in_dataset(&dataset, None))?;
    let truths = decode_reads(&reads).map_err(|e| e.in_dataset(&dataset, None))?;
    info!("{}: {} simulated reads", dataset, reads.len());

    let mut rows = Vec::with_capacity(reads.len() * entry.results.len());
    for (tool, path) in &entry.results {
        let results = match path {
            Some(path) => tool
                .normalize(path)
                .map_err(|e| e.in_dataset(&dataset, Some(*tool)))?,
            None => {
                info!("{}: no {} result file listed; scoring as unaligned", dataset, tool);
                Vec::new()
            }
        };

        let tag = ToolTag {
            tool: *tool,
            dataset: dataset.clone(),
        };
        let reconciled = reconcile(&reads, &truths, &results, *tool, &tag)
            .map_err(|e| e.in_dataset(&dataset, Some(*tool)))?;
        let classified = classify_reconciled(&reconciled);
        debug!(
            "{}: {} candidate rows collapsed to {} reads",
            tag,
            reconciled.len(),
            classified.len()
        );
        rows.extend(classified);
    }
    Ok(rows)
}

/// Score every dataset of a manifest.
pub fn score_manifest(entries: &[ManifestEntry]) -> Result<ScoringResults> {
    score_manifest_with(entries, |_| {})
}

/// Like [`score_manifest`], calling `on_dataset` as each dataset finishes.
///
/// Datasets run in parallel; rows keep manifest order regardless. When
/// several datasets fail, the error of the earliest one in the manifest is
/// returned.
pub fn score_manifest_with<F>(entries: &[ManifestEntry], on_dataset: F) -> Result<ScoringResults>
where
    F: Fn(&ManifestEntry) + Sync,
{
    let per_dataset: Vec<Result<Vec<ClassifiedRow>>> = entries
        .par_iter()
        .map(|entry| {
            let rows = score_dataset(entry);
            on_dataset(entry);
            rows
        })
        .collect();

    let results = per_dataset
        .into_iter()
        .try_fold(ScoringResults::default(), |mut acc, rows| {
            acc.rows.extend(rows?);
            Ok::<_, ScoreError>(acc)
        })?;
    info!("Scored {} datasets into {} rows", entries.len(), results.rows.len());
    Ok(results)
}

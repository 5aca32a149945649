//src/manifest.rs

use std::path::{Path, PathBuf};

use ahash::AHashMap;

use crate::errors::{Result, ScoreError};
use crate::normalize::ToolKind;

/// Column naming the simulated reads file.
pub const SIM_READS_COLUMN: &str = "simReads";

/// Per-tool directories that manifest result paths are relative to.
pub type ResultDirs = AHashMap<ToolKind, PathBuf>;

/// One dataset: a simulated reads file plus one result file per configured tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestEntry {
    pub sim_reads: PathBuf,
    /// `None` when the manifest cell is empty (tool produced no output)
    pub results: Vec<(ToolKind, Option<PathBuf>)>,
}

impl ManifestEntry {
    /// Dataset id: the reads file name up to its first `.`.
    pub fn dataset_id(&self) -> String {
        dataset_id(&self.sim_reads)
    }
}

pub fn dataset_id(path: &Path) -> String {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    name.split('.').next().unwrap_or_default().to_string()
}

/// Load a manifest. Tab-delimited for `.tsv`/`.txt`, comma-delimited otherwise.
pub fn load_manifest<P: AsRef<Path>>(path: P, result_dirs: &ResultDirs) -> Result<Vec<ManifestEntry>> {
    let path = path.as_ref();
    let delimiter = match path.extension().and_then(|e| e.to_str()) {
        Some("tsv") | Some("txt") => b'\t',
        _ => b',',
    };
    let file = std::fs::File::open(path).map_err(|e| ScoreError::io(path, e))?;
    let rdr = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .trim(csv::Trim::All)
        .from_reader(file);
    parse_manifest(rdr, path, result_dirs)
}

pub fn parse_manifest<R: std::io::Read>(
    mut rdr: csv::Reader<R>,
    path: &Path,
    result_dirs: &ResultDirs,
) -> Result<Vec<ManifestEntry>> {
    let invalid = |reason: String| ScoreError::Manifest {
        path: path.to_path_buf(),
        reason,
    };

    let headers = rdr.headers()?.clone();
    let sim_idx = headers
        .iter()
        .position(|h| h == SIM_READS_COLUMN)
        .ok_or_else(|| invalid(format!("missing column '{SIM_READS_COLUMN}'")))?;

    let tool_columns: Vec<(ToolKind, usize)> = ToolKind::ALL
        .into_iter()
        .filter_map(|tool| headers.iter().position(|h| h == tool.name()).map(|i| (tool, i)))
        .collect();
    if tool_columns.is_empty() {
        return Err(invalid("no tool result columns".to_string()));
    }

    let mut entries = Vec::new();
    for result in rdr.records() {
        let record = result?;
        let sim_reads = record.get(sim_idx).unwrap_or_default();
        if sim_reads.is_empty() {
            let line = record.position().map(|p| p.line()).unwrap_or(0);
            return Err(invalid(format!("line {line}: empty '{SIM_READS_COLUMN}'")));
        }

        let results = tool_columns
            .iter()
            .map(|&(tool, idx)| {
                let cell = record.get(idx).unwrap_or_default();
                let resolved = (!cell.is_empty()).then(|| match result_dirs.get(&tool) {
                    Some(dir) => dir.join(cell),
                    None => PathBuf::from(cell),
                });
                (tool, resolved)
            })
            .collect();

        entries.push(ManifestEntry {
            sim_reads: PathBuf::from(sim_reads),
            results,
        });
    }
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str, dirs: &ResultDirs) -> Result<Vec<ManifestEntry>> {
        let rdr = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(text.as_bytes());
        parse_manifest(rdr, Path::new("mirna_files.csv"), dirs)
    }

    #[test]
    fn test_dataset_id() {
        assert_eq!(dataset_id(Path::new("sim/data_01.fastq.gz")), "data_01");
        assert_eq!(dataset_id(Path::new("plain")), "plain");
    }

    #[test]
    fn test_resolves_result_dirs() {
        let mut dirs = ResultDirs::new();
        dirs.insert(ToolKind::Star, PathBuf::from("Results/star"));
        let text = "simReads,star,quagmir\nsim/a.fastq,a.sam,\n";
        let entries = parse(text, &dirs).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].dataset_id(), "a");
        assert_eq!(
            entries[0].results,
            vec![
                (ToolKind::Quagmir, None),
                (ToolKind::Star, Some(PathBuf::from("Results/star/a.sam"))),
            ]
        );
    }

    #[test]
    fn test_requires_sim_reads_column() {
        let err = parse("reads,star\nx,y\n", &ResultDirs::new()).unwrap_err();
        assert!(format!("{err}").contains("'simReads'"));
    }

    #[test]
    fn test_requires_a_tool() {
        let err = parse("simReads,bowtie\nx,y\n", &ResultDirs::new()).unwrap_err();
        assert!(format!("{err}").contains("no tool result columns"));
    }

    #[test]
    fn test_tsv_manifest_is_tab_delimited() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mirna_files.tsv");
        std::fs::write(&path, "simReads\tmiraligner\tstar\nsim/b.fastq\tb.mirna\tb, odd.sam\n").unwrap();

        let entries = load_manifest(&path, &ResultDirs::new()).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].sim_reads, PathBuf::from("sim/b.fastq"));
        assert_eq!(
            entries[0].results,
            vec![
                (ToolKind::Star, Some(PathBuf::from("b, odd.sam"))),
                (ToolKind::Miraligner, Some(PathBuf::from("b.mirna"))),
            ]
        );
    }
}

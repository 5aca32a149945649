use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use ahash::AHashMap;
use flate2::read::MultiGzDecoder;
use log::{debug, warn};

use crate::errors::{Result, ScoreError};
use crate::types::SimulatedRead;

/// Open a simulated reads file, transparently decompressing `.gz`.
fn open_reads<P: AsRef<Path>>(path: P) -> Result<Box<dyn BufRead>> {
    let path = path.as_ref();
    let f = File::open(path).map_err(|e| ScoreError::io(path, e))?;

    let is_gz = path
        .extension()
        .map(|ext| ext == "gz")
        .unwrap_or(false);

    Ok(if is_gz {
        Box::new(BufReader::new(MultiGzDecoder::new(f)))
    } else {
        Box::new(BufReader::new(f))
    })
}

/// Read every record of a FASTQ file, then drop duplicates.
pub fn read_fastq_records<P: AsRef<Path>>(path: P) -> Result<Vec<SimulatedRead>> {
    let path = path.as_ref();
    let reader = open_reads(path)?;
    let records = parse_fastq(reader, path)?;
    Ok(dedup_reads(records))
}

/// Parse four-line FASTQ records from any reader. `path` is only used in errors.
pub fn parse_fastq<R: BufRead>(mut reader: R, path: &Path) -> Result<Vec<SimulatedRead>> {
    let mut sequences = Vec::new();
    let mut line = String::new();
    let mut line_no = 0usize;

    let malformed = |reason: String| ScoreError::FastqFormat {
        path: path.to_path_buf(),
        reason,
    };

    loop {
        // 1) header
        line.clear();
        if reader.read_line(&mut line).map_err(|e| ScoreError::io(path, e))? == 0 {
            break;
        }
        line_no += 1;
        let header_line = line.trim_end();
        if header_line.is_empty() {
            // tolerate trailing blank lines
            continue;
        }
        let Some(header_str) = header_line.strip_prefix('@') else {
            return Err(malformed(format!(
                "line {line_no}: expected '@' header, found '{header_line}'"
            )));
        };
        let id = header_str
            .split_whitespace()
            .next()
            .unwrap_or_default()
            .to_string();
        if id.is_empty() {
            return Err(malformed(format!("line {line_no}: empty read identifier")));
        }

        // 2) sequence, 3) plus line, 4) quality
        let mut body = [String::new(), String::new(), String::new()];
        for field in body.iter_mut() {
            line.clear();
            if reader.read_line(&mut line).map_err(|e| ScoreError::io(path, e))? == 0 {
                return Err(malformed(format!("truncated record for read '{id}'")));
            }
            line_no += 1;
            *field = line.trim_end().to_string();
        }
        let [seq, _plus, quals] = body;

        sequences.push(SimulatedRead { id, seq, quals });
    }

    Ok(sequences)
}

/// Drop exact duplicate records. An identifier repeated with different
/// content keeps its first occurrence so identifiers stay unique.
pub fn dedup_reads(records: Vec<SimulatedRead>) -> Vec<SimulatedRead> {
    let mut seen: AHashMap<String, usize> = AHashMap::with_capacity(records.len());
    let mut out: Vec<SimulatedRead> = Vec::with_capacity(records.len());
    let mut exact = 0usize;

    for read in records {
        match seen.get(&read.id) {
            Some(&idx) if out[idx] == read => exact += 1,
            Some(_) => warn!(
                "Read '{}' appears more than once with different content; keeping the first",
                read.id
            ),
            None => {
                seen.insert(read.id.clone(), out.len());
                out.push(read);
            }
        }
    }
    if exact > 0 {
        debug!("Dropped {} duplicate FASTQ records", exact);
    }
    out
}

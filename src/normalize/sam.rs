//! SAM output (STAR, RazerS3). QNAME, RNAME and the 1-based POS are taken from
//! each alignment record; unmapped records are not candidates.

use std::io::{BufReader, Read};

use noodles::sam;

use super::{schema_error, ToolKind};
use crate::errors::Result;
use crate::types::AlignerResultRow;

pub fn normalize<R: Read>(tool: ToolKind, reader: R, source_name: &str) -> Result<Vec<AlignerResultRow>> {
    let mut reader = sam::io::Reader::new(BufReader::new(reader));
    reader
        .read_header()
        .map_err(|e| schema_error(tool, source_name, format!("invalid SAM header: {e}")))?;

    let mut rows = Vec::new();
    for (i, result) in reader.records().enumerate() {
        let n = i + 1;
        let invalid = |what: String| schema_error(tool, source_name, format!("record {n}: {what}"));

        let record = result.map_err(|e| invalid(format!("invalid SAM record: {e}")))?;
        let flags = record.flags().map_err(|e| invalid(format!("invalid FLAG: {e}")))?;
        let Some(rname) = record.reference_sequence_name() else {
            continue;
        };
        if flags.is_unmapped() {
            continue;
        }

        let qname = record
            .name()
            .ok_or_else(|| invalid("no QNAME".to_string()))?;
        let pos = record
            .alignment_start()
            .ok_or_else(|| invalid(format!("mapped to '{rname}' without POS")))?
            .map_err(|e| invalid(format!("invalid POS: {e}")))?;
        let start = i64::try_from(usize::from(pos))
            .map_err(|_| invalid(format!("POS {pos} is out of range")))?;

        rows.push(AlignerResultRow {
            join_key: qname.to_string(),
            predicted_id: rname.to_string(),
            // POS is at least 1
            predicted_start: Some(start - 1),
        });
    }
    Ok(rows)
}

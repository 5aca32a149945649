//! QuagmiR: one row per distinct read sequence, named columns
//! `MIRNA`, `SEQUENCE`, `READS`, `LEN_READ`. No alignment position is reported.

use std::io::Read;

use super::{column_index, field, schema_error, tsv_reader, ToolKind};
use crate::errors::Result;
use crate::types::AlignerResultRow;

const TOOL: ToolKind = ToolKind::Quagmir;

pub fn normalize<R: Read>(reader: R, source_name: &str) -> Result<Vec<AlignerResultRow>> {
    let mut rdr = tsv_reader(reader, true);
    let headers = rdr.headers()?.clone();

    let mirna_idx = column_index(&headers, "MIRNA", TOOL, source_name)?;
    let seq_idx = column_index(&headers, "SEQUENCE", TOOL, source_name)?;
    column_index(&headers, "READS", TOOL, source_name)?;
    column_index(&headers, "LEN_READ", TOOL, source_name)?;

    let mut rows = Vec::new();
    for result in rdr.records() {
        let record = result?;
        // Rows written with a row index carry one field more than the header.
        let offset = match record.len() {
            n if n == headers.len() => 0,
            n if n == headers.len() + 1 => 1,
            n => {
                return Err(schema_error(
                    TOOL,
                    source_name,
                    format!(
                        "line {}: {n} fields for a {}-column header",
                        super::line_of(&record),
                        headers.len()
                    ),
                ))
            }
        };
        let mirna = field(&record, mirna_idx + offset, "MIRNA", TOOL, source_name)?;
        let seq = field(&record, seq_idx + offset, "SEQUENCE", TOOL, source_name)?;

        rows.push(AlignerResultRow {
            join_key: seq.to_string(),
            predicted_id: mirna.to_string(),
            predicted_start: None,
        });
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_on_sequence() {
        let text = "MIRNA\tSEQUENCE\tREADS\tLEN_READ\n\
                    hsa-let-7a-5p\tTGAGGTAGTAG\t3\t11\n\
                    hsa-let-7a-5p\tTGAGGTAGTAG\t3\t11\n\
                    hsa-mir-21-5p\tTAGCTTATCAG\t1\t11\n";
        let rows = ToolKind::Quagmir.normalize_reader(text.as_bytes(), "q.tsv").unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].join_key, "TGAGGTAGTAG");
        assert_eq!(rows[0].predicted_id, "hsa-let-7a-5p");
        assert_eq!(rows[0].predicted_start, None);
    }

    #[test]
    fn test_row_index_column() {
        let text = "MIRNA\tSEQUENCE\tREADS\tLEN_READ\n\
                    0\thsa-mir-1\tACGTACGT\t2\t8\n";
        let rows = normalize(text.as_bytes(), "q.tsv").unwrap();
        assert_eq!(rows[0].join_key, "ACGTACGT");
        assert_eq!(rows[0].predicted_id, "hsa-mir-1");
    }

    #[test]
    fn test_requires_all_columns() {
        let text = "MIRNA\tSEQUENCE\tREADS\nm\tACGT\t1\n";
        let err = normalize(text.as_bytes(), "q.tsv").unwrap_err();
        assert!(format!("{err}").contains("'LEN_READ'"));
    }

    #[test]
    fn test_ragged_row() {
        let text = "MIRNA\tSEQUENCE\tREADS\tLEN_READ\nm\tACGT\n";
        assert!(normalize(text.as_bytes(), "q.tsv").is_err());
    }
}

use crate::error::{ReportError, Result};
use crate::types::RawRow;
use csv::{ByteRecord, ReaderBuilder, Trim};
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadReport {
    pub total_rows: usize,
    pub loaded_rows: usize,
    /// Unreadable records and rows with every cell blank.
    pub skipped_rows: usize,
}

fn decode(field: &[u8]) -> String {
    // Latin-1 cells come through with replacement characters instead of
    // failing the row.
    String::from_utf8_lossy(field).trim().to_string()
}

fn read_csv<R: Read>(reader: R, delimiter: u8) -> csv::Result<(Vec<RawRow>, LoadReport)> {
    // Hand-edited exports have ragged rows, so row length is not enforced.
    let mut rdr = ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);
    let headers: Vec<String> = rdr
        .byte_headers()?
        .iter()
        .enumerate()
        .map(|(i, h)| {
            let h = decode(h);
            // Excel prefixes UTF-8 exports with a BOM that sticks to the first label.
            if i == 0 {
                h.trim_start_matches('\u{feff}').to_string()
            } else {
                h
            }
        })
        .collect();

    let mut report = LoadReport::default();
    let mut rows = Vec::new();
    let mut record = ByteRecord::new();
    loop {
        match rdr.read_byte_record(&mut record) {
            Ok(false) => break,
            Ok(true) => {
                report.total_rows += 1;
                // Trailing spreadsheet lines are all separators.
                if record.iter().all(|f| f.iter().all(u8::is_ascii_whitespace)) {
                    report.skipped_rows += 1;
                    continue;
                }
                // zip drops cells past the header; missing cells simply stay absent.
                rows.push(
                    headers
                        .iter()
                        .zip(record.iter())
                        .map(|(h, v)| (h.clone(), decode(v)))
                        .collect::<RawRow>(),
                );
            }
            Err(e) => {
                // Counted as skipped; reading continues with the next line.
                report.total_rows += 1;
                report.skipped_rows += 1;
                debug!(error = %e, "skipping unreadable record");
            }
        }
    }
    report.loaded_rows = rows.len();
    Ok((rows, report))
}

/// Read delimited rows with a header line from any reader.
pub fn read_rows<R: Read>(reader: R, delimiter: u8) -> Result<(Vec<RawRow>, LoadReport)> {
    Ok(read_csv(reader, delimiter)?)
}

/// Read a delimited file. Cells are trimmed, short rows keep only the
/// columns they have, and invalid UTF-8 is replaced rather than rejected.
pub fn load_rows(path: &Path, delimiter: u8) -> Result<(Vec<RawRow>, LoadReport)> {
    let file = std::fs::File::open(path).map_err(|e| ReportError::Read {
        path: path.to_path_buf(),
        source: e.into(),
    })?;
    let (rows, report) = read_csv(file, delimiter).map_err(|source| ReportError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    info!(
        path = %path.display(),
        total = report.total_rows,
        loaded = report.loaded_rows,
        skipped = report.skipped_rows,
        "source loaded"
    );
    Ok((rows, report))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_semicolon_export_with_bom_and_accents() {
        let data = "\u{feff}OS;Descrição;M²\nOS001; Fundo ;120\nOS002;Acabamento;35,5\n";
        let (rows, report) = read_rows(data.as_bytes(), b';').unwrap();
        assert_eq!(report.total_rows, 2);
        assert_eq!(report.loaded_rows, 2);
        assert_eq!(rows[0].get("OS"), Some("OS001"));
        assert_eq!(rows[0].get("Descrição"), Some("Fundo"));
        assert_eq!(rows[1].get("M²"), Some("35,5"));
    }

    #[test]
    fn short_rows_and_blank_rows() {
        let data = "OS;Horas;Função\nOS1;8\n;;\nOS2;4;Pintor;extra\n";
        let (rows, report) = read_rows(data.as_bytes(), b';').unwrap();
        assert_eq!(report.total_rows, 3);
        assert_eq!(report.skipped_rows, 1);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].len(), 2);
        assert_eq!(rows[0].get("Função"), None);
        assert_eq!(rows[1].len(), 3);
        assert_eq!(rows[1].get("Função"), Some("Pintor"));
    }

    #[test]
    fn invalid_utf8_is_replaced() {
        let data: &[u8] = b"OS,Descri\xe7\xe3o\nOS1,x\n";
        let (rows, _) = read_rows(data, b',').unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get("OS"), Some("OS1"));
        assert_eq!(rows[0].len(), 2);
    }

    #[test]
    fn header_only_file_is_empty() {
        let (rows, report) = read_rows("OS;M²\n".as_bytes(), b';').unwrap();
        assert!(rows.is_empty());
        assert_eq!(report, LoadReport::default());
    }

    #[test]
    fn missing_file_is_an_error() {
        let err = load_rows(Path::new("does/not/exist.csv"), b';').unwrap_err();
        assert!(matches!(err, ReportError::Read { .. }));
    }
}

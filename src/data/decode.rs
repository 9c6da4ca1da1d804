use csv::ReaderBuilder;
use encoding_rs::{UTF_8, WINDOWS_1252};

use super::error::DecodeError;
use super::model::{CellValue, Table};

pub(crate) const UTF8_BOM: &[u8] = b"\xef\xbb\xbf";

// ---------------------------------------------------------------------------
// Candidate configurations
// ---------------------------------------------------------------------------

/// Character encodings tried in order. Public CSV endpoints rarely declare
/// theirs, so the decoder brute-forces the common ones.
#[derive(Debug, Clone, Copy)]
enum Charset {
    /// UTF-8 with a leading byte-order marker stripped.
    Utf8Sig,
    Utf8,
    Latin1,
    Windows1252,
}

const CHARSETS: [Charset; 4] = [
    Charset::Utf8Sig,
    Charset::Utf8,
    Charset::Latin1,
    Charset::Windows1252,
];

/// Comma first, semicolon as the structural-failure retry.
const SEPARATORS: [u8; 2] = [b',', b';'];

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Decode raw CSV bytes by trying each (encoding, separator) candidate in
/// order and returning the first structurally valid table. A parse that
/// yields a single column is taken as a wrong-separator signal and
/// rejected in favour of the next candidate. Header names are trimmed
/// unconditionally on success; if every candidate fails, the last error
/// is surfaced.
pub fn decode(bytes: &[u8]) -> Result<Table, DecodeError> {
    let mut last_error = String::from("empty input");

    for charset in CHARSETS {
        let text = match decode_chars(charset, bytes) {
            Ok(text) => text,
            Err(e) => {
                // Undecodable bytes rule out every separator for this
                // charset; move straight to the next one.
                last_error = e;
                continue;
            }
        };

        for separator in SEPARATORS {
            match parse(&text, separator) {
                Ok(mut table) => {
                    trim_headers(&mut table);
                    log::debug!(
                        "decoded {} rows via {charset:?} with separator {:?}",
                        table.len(),
                        separator as char
                    );
                    return Ok(table);
                }
                Err(e) => last_error = e,
            }
        }
    }

    Err(DecodeError::Exhausted(last_error))
}

// ---------------------------------------------------------------------------
// Character decoding
// ---------------------------------------------------------------------------

fn decode_chars(charset: Charset, bytes: &[u8]) -> Result<String, String> {
    match charset {
        Charset::Utf8Sig => strict_utf8(bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes)),
        Charset::Utf8 => strict_utf8(bytes),
        // ISO-8859-1 maps every byte to the code point of the same value.
        // encoding_rs has no decoder for it (the "latin1" label aliases
        // windows-1252 there), so decode directly.
        Charset::Latin1 => Ok(bytes.iter().map(|&b| char::from(b)).collect()),
        Charset::Windows1252 => {
            let (text, had_errors) = WINDOWS_1252.decode_without_bom_handling(bytes);
            if had_errors {
                Err("input is not valid windows-1252".to_string())
            } else {
                Ok(text.into_owned())
            }
        }
    }
}

fn strict_utf8(bytes: &[u8]) -> Result<String, String> {
    let (text, had_errors) = UTF_8.decode_without_bom_handling(bytes);
    if had_errors {
        Err("input is not valid UTF-8".to_string())
    } else {
        Ok(text.into_owned())
    }
}

// ---------------------------------------------------------------------------
// Structural parse
// ---------------------------------------------------------------------------

fn parse(text: &str, separator: u8) -> Result<Table, String> {
    let mut reader = ReaderBuilder::new()
        .delimiter(separator)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| format!("reading headers: {e}"))?
        .iter()
        .map(str::to_string)
        .collect();

    if headers.len() <= 1 {
        return Err(format!(
            "parsed a single column with separator {:?}",
            separator as char
        ));
    }

    let mut rows = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.map_err(|e| format!("row {row_no}: {e}"))?;
        rows.push(record.iter().map(guess_cell).collect());
    }

    Ok(Table { headers, rows })
}

/// Best-effort cell typing; the filter layer only ever sees string forms.
fn guess_cell(s: &str) -> CellValue {
    if s.is_empty() {
        return CellValue::Missing;
    }
    if let Ok(i) = s.parse::<i64>() {
        return CellValue::Integer(i);
    }
    if let Ok(f) = s.parse::<f64>() {
        return CellValue::Float(f);
    }
    CellValue::Text(s.to_string())
}

fn trim_headers(table: &mut Table) {
    for header in &mut table.headers {
        let trimmed = header.trim().to_string();
        *header = trimmed;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn utf8_comma_with_padded_headers() {
        let bytes = " Región , Comuna\nMetropolitana,Santiago\n".as_bytes();
        let table = decode(bytes).unwrap();
        assert_eq!(table.headers, vec!["Región", "Comuna"]);
        assert_eq!(table.rows.len(), 1);
        assert_eq!(table.rows[0][0], CellValue::Text("Metropolitana".into()));
    }

    #[test]
    fn semicolon_retry_after_single_column_parse() {
        let bytes = "Región;Teléfono\nValparaíso;Mesa central\n".as_bytes();
        let table = decode(bytes).unwrap();
        assert_eq!(table.headers, vec!["Región", "Teléfono"]);
        assert_eq!(table.rows[0][1], CellValue::Text("Mesa central".into()));
    }

    #[test]
    fn latin1_semicolon_payload_is_recovered() {
        // "Región;Teléfono\nValparaíso;32112233" in ISO-8859-1.
        let bytes = b"Regi\xF3n;Tel\xE9fono\nValpara\xEDso;32112233\n";
        let table = decode(bytes).unwrap();
        assert_eq!(table.headers, vec!["Región", "Teléfono"]);
        assert_eq!(table.rows[0][0], CellValue::Text("Valparaíso".into()));
        assert_eq!(table.rows[0][1], CellValue::Integer(32_112_233));
    }

    #[test]
    fn utf8_bom_is_stripped_from_first_header() {
        let mut bytes = UTF8_BOM.to_vec();
        bytes.extend_from_slice("Región,Comuna\nBiobío,Concepción\n".as_bytes());
        let table = decode(&bytes).unwrap();
        assert_eq!(table.headers[0], "Región");
    }

    #[test]
    fn quoted_fields_keep_separators_and_newlines() {
        let bytes =
            "Nombre,Dirección\n\"Sucursal, Centro\",\"Av. Prat\n120\"\n".as_bytes();
        let table = decode(bytes).unwrap();
        assert_eq!(
            table.rows[0][0],
            CellValue::Text("Sucursal, Centro".into())
        );
        assert_eq!(table.rows[0][1], CellValue::Text("Av. Prat\n120".into()));
    }

    #[test]
    fn single_column_under_every_candidate_is_an_error() {
        let bytes = "solo\nuno\ndos\n".as_bytes();
        assert!(decode(bytes).is_err());
    }

    #[test]
    fn ragged_rows_under_every_candidate_surface_last_error() {
        let bytes = "a,b\nc\n".as_bytes();
        let err = decode(bytes).unwrap_err();
        assert!(err.to_string().contains("no encoding/separator combination"));
    }

    #[test]
    fn empty_cells_become_missing() {
        let bytes = "Región,Teléfono\nMetropolitana,\n".as_bytes();
        let table = decode(bytes).unwrap();
        assert_eq!(table.rows[0][1], CellValue::Missing);
    }

    #[test]
    fn cell_typing_is_best_effort() {
        assert_eq!(guess_cell("Santiago"), CellValue::Text("Santiago".into()));
        assert_eq!(guess_cell("22334455"), CellValue::Integer(22_334_455));
        assert_eq!(guess_cell("1.5"), CellValue::Float(1.5));
        assert_eq!(guess_cell(""), CellValue::Missing);
    }

    #[test]
    fn rows_stay_rectangular() {
        let bytes = "Región,Comuna,Teléfono\nA,B,1\nC,D,2\n".as_bytes();
        let table = decode(bytes).unwrap();
        assert!(table.rows.iter().all(|r| r.len() == table.headers.len()));
    }
}

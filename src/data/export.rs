use super::decode::UTF8_BOM;
use super::model::{CellValue, Table};

/// Default filename offered for the filtered download.
pub const DOWNLOAD_FILENAME: &str = "oficinas_filtrado.csv";

/// Serialise a table to comma-separated CSV bytes: UTF-8 with a leading
/// BOM (so spreadsheet imports pick the right encoding), header row first,
/// columns in table order. Missing cells become empty fields. The output
/// encoding is fixed regardless of what the source was decoded from.
pub fn to_csv_bytes(table: &Table) -> csv::Result<Vec<u8>> {
    let mut buffer = UTF8_BOM.to_vec();
    {
        let mut writer = csv::Writer::from_writer(&mut buffer);
        writer.write_record(&table.headers)?;
        for row in &table.rows {
            writer.write_record(row.iter().map(|cell| match cell {
                CellValue::Missing => String::new(),
                cell => cell.to_string(),
            }))?;
        }
        writer.flush()?;
    }
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::decode::decode;

    #[test]
    fn output_is_utf8_with_bom_and_commas() {
        let table = decode("Región;Teléfono\nValparaíso;32112233\n".as_bytes()).unwrap();
        let bytes = to_csv_bytes(&table).unwrap();

        assert!(bytes.starts_with(UTF8_BOM));
        let text = std::str::from_utf8(&bytes[UTF8_BOM.len()..]).unwrap();
        assert_eq!(text, "Región,Teléfono\nValparaíso,32112233\n");
    }

    #[test]
    fn round_trip_preserves_headers_and_cells() {
        let table = decode(
            "Región,Comuna,Teléfono\n\
             Metropolitana,Santiago,22334455\n\
             Valparaíso,\"Viña del Mar\",\n"
                .as_bytes(),
        )
        .unwrap();

        let again = decode(&to_csv_bytes(&table).unwrap()).unwrap();
        assert_eq!(again, table);
    }

    #[test]
    fn round_trip_survives_a_latin1_source() {
        let source = b"Regi\xF3n;Tel\xE9fono\nB\xEDo-B\xEDo;41223344\n";
        let table = decode(source).unwrap();

        let again = decode(&to_csv_bytes(&table).unwrap()).unwrap();
        assert_eq!(again, table);
    }

    #[test]
    fn missing_cells_export_as_empty_fields() {
        let table = decode("A,B\nx,\n".as_bytes()).unwrap();
        let bytes = to_csv_bytes(&table).unwrap();
        let text = String::from_utf8(bytes[UTF8_BOM.len()..].to_vec()).unwrap();
        assert_eq!(text.lines().nth(1), Some("x,"));
    }
}

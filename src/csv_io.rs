use csv::{ReaderBuilder, StringRecord, Terminator, Trim, WriterBuilder};
use std::io::{Read, Write};
use tracing::debug;

use crate::constants::{MISSING_VALUE_MARKERS, UTF8_BOM};
use crate::error::{MapperError, Result};
use crate::table::OutputTable;
use crate::types::InputRow;

/// Read a vendor export into memory.
///
/// Every field is kept as a string, untrimmed. A leading byte-order mark is
/// dropped and invalid UTF-8 is replaced rather than rejected. Rows shorter
/// than the header are accepted; their missing fields are null, as are
/// fields holding one of the [`MISSING_VALUE_MARKERS`].
pub fn read_rows<R: Read>(mut input: R) -> Result<Vec<InputRow>> {
    let mut buffer = Vec::new();
    input.read_to_end(&mut buffer)?;
    let content = String::from_utf8_lossy(&buffer);
    let content = content.trim_start_matches(UTF8_BOM);

    if content.trim().is_empty() {
        return Err(MapperError::EmptyInput);
    }

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::None)
        .flexible(true)
        .from_reader(content.as_bytes());

    let headers = reader.headers()?.clone();
    if headers.is_empty() {
        return Err(MapperError::EmptyInput);
    }

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;
        rows.push(parse_row(&headers, &record));
    }

    debug!(columns = headers.len(), rows = rows.len(), "Read input CSV");
    Ok(rows)
}

fn parse_row(headers: &StringRecord, record: &StringRecord) -> InputRow {
    let mut row = InputRow::new();
    for (idx, header) in headers.iter().enumerate() {
        let value = record
            .get(idx)
            .filter(|v| !MISSING_VALUE_MARKERS.contains(v))
            .map(str::to_string);
        row.insert(header, value);
    }
    row
}

/// Serialize the report: UTF-8 byte-order mark, header row, then data rows,
/// each line ending in `\n`
pub fn write_table<W: Write>(table: &OutputTable, mut output: W) -> Result<()> {
    output.write_all(UTF8_BOM.as_bytes())?;

    let mut writer = WriterBuilder::new()
        .terminator(Terminator::Any(b'\n'))
        .from_writer(output);
    writer.write_record(table.final_headers())?;
    for row in table.rows() {
        writer.write_record(row)?;
    }
    writer.flush()?;
    Ok(())
}

pub fn table_to_bytes(table: &OutputTable) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    write_table(table, &mut bytes)?;
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MappingConfig;
    use crate::types::ColumnSpec;

    #[test]
    fn test_read_rows_strips_bom_and_keeps_whitespace() {
        let input = "\u{feff}Order Number,Client Name\n 123 ,Acme\n";
        let rows = read_rows(input.as_bytes()).unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get("Order Number"), Some(" 123 "));
        assert_eq!(rows[0].get("Client Name"), Some("Acme"));
    }

    #[test]
    fn test_read_rows_short_row_has_null_fields() {
        let input = "a,b,c\n1\n";
        let rows = read_rows(input.as_bytes()).unwrap();

        assert_eq!(rows[0].get("a"), Some("1"));
        assert!(rows[0].contains_column("c"));
        assert_eq!(rows[0].get("c"), None);
    }

    #[test]
    fn test_read_rows_empty_input_is_reported() {
        assert!(matches!(read_rows("".as_bytes()), Err(MapperError::EmptyInput)));
        assert!(matches!(read_rows("\u{feff}\n  \n".as_bytes()), Err(MapperError::EmptyInput)));
    }

    #[test]
    fn test_read_rows_missing_value_markers_are_null() {
        let input = "primary_result,site_code,client_name,notes,answer\nN/A,NA,null,#N/A,Null\n";
        let rows = read_rows(input.as_bytes()).unwrap();

        assert_eq!(rows[0].get("primary_result"), None);
        assert_eq!(rows[0].get("site_code"), None);
        assert_eq!(rows[0].get("client_name"), None);
        assert_eq!(rows[0].get("notes"), None);
        // Only exact markers count
        assert_eq!(rows[0].get("answer"), Some("Null"));
    }

    #[test]
    fn test_read_rows_header_only() {
        let rows = read_rows("Order Number,Client Name\n".as_bytes()).unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn test_read_rows_decodes_invalid_utf8_lossily() {
        let input: &[u8] = b"name\ncaf\xe9\n";
        let rows = read_rows(input).unwrap();
        assert_eq!(rows[0].get("name"), Some("caf\u{fffd}"));
    }

    #[test]
    fn test_write_table_emits_bom_and_empty_placeholder_headers() {
        let config = MappingConfig::new(
            "test",
            vec![
                ColumnSpec::single("Client Name", "client_name"),
                ColumnSpec::absent("blank1"),
                ColumnSpec::single("Abort Reason", "abort"),
            ],
        );
        let rows: Vec<InputRow> = vec![[("client_name", "Acme, Ltd"), ("abort", "Closed")]
            .into_iter()
            .collect()];
        let table = OutputTable::build(&config, &rows).unwrap();

        let bytes = table_to_bytes(&table).unwrap();

        assert!(bytes.starts_with(&[0xEF, 0xBB, 0xBF]));
        let text = String::from_utf8(bytes[3..].to_vec()).unwrap();
        assert!(!text.contains('\r'));
        assert!(text.ends_with("Closed\n"));
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("Client Name,,Abort Reason"));
        assert_eq!(lines.next(), Some("\"Acme, Ltd\",,Closed"));
        assert_eq!(lines.next(), None);
    }
}

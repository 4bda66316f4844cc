//! First-sheet decoding for `.xlsx` / `.xls` workbooks.

use crate::domain::model::{CellValue, SheetData};
use crate::utils::error::{EtlError, Result};
use calamine::{open_workbook_auto_from_rs, Data, DataType, Reader};
use std::io::Cursor;

/// Convert a calamine cell into a [`CellValue`].
fn cell_to_value(cell: &Data) -> CellValue {
    match cell {
        Data::Empty => CellValue::Empty,
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Float(f) => CellValue::Number(*f),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::DateTime(dt) if dt.is_duration() => CellValue::Number(dt.as_f64()),
        Data::DateTime(_) => match cell.as_datetime() {
            Some(dt) => CellValue::Date(dt),
            None => CellValue::Text(cell.to_string()),
        },
        Data::DateTimeIso(s) => match cell.as_datetime() {
            Some(dt) => CellValue::Date(dt),
            None => CellValue::Text(s.clone()),
        },
        Data::DurationIso(s) => CellValue::Text(s.clone()),
        Data::Error(e) => CellValue::Text(e.to_string()),
    }
}

/// Decodes the first worksheet of an in-memory workbook.
///
/// The first row is the header row (cell text, trimmed); every other row is
/// returned as-is, blank rows included.
pub fn decode_workbook(bytes: Vec<u8>) -> Result<SheetData> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))?;

    let sheet_name = workbook.sheet_names().first().cloned();
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| EtlError::ProcessingError {
            message: "workbook has no worksheets".to_string(),
        })??;

    tracing::debug!(
        "Reading sheet {:?} ({} rows x {} columns)",
        sheet_name,
        range.height(),
        range.width()
    );

    let mut rows = range.rows();
    let headers: Vec<String> = rows
        .next()
        .map(|header_row| {
            header_row
                .iter()
                .map(|cell| cell_to_value(cell).to_text().trim().to_string())
                .collect()
        })
        .unwrap_or_default();

    let rows: Vec<Vec<CellValue>> = rows
        .map(|row| row.iter().map(cell_to_value).collect())
        .collect();

    Ok(SheetData { headers, rows })
}

/// Runs [`decode_workbook`] on the blocking pool.
pub async fn decode_workbook_async(bytes: Vec<u8>) -> Result<SheetData> {
    tokio::task::spawn_blocking(move || decode_workbook(bytes)).await?
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_xlsxwriter::{ExcelDateTime, Format, Workbook};

    fn build_workbook() -> Vec<u8> {
        let mut workbook = Workbook::new();
        let date_format = Format::new().set_num_format("yyyy-mm-dd");
        let worksheet = workbook.add_worksheet();

        for (col, label) in [" 사번", "이름", "입사일", "급여"].iter().enumerate() {
            worksheet.write_string(0, col as u16, *label).unwrap();
        }

        worksheet.write_number(1, 0, 1001).unwrap();
        worksheet.write_string(1, 1, "Kim").unwrap();
        let hired = ExcelDateTime::from_ymd(2024, 1, 15).unwrap();
        worksheet
            .write_datetime_with_format(1, 2, &hired, &date_format)
            .unwrap();
        worksheet.write_number(1, 3, 4200.5).unwrap();

        // 第 3 列留空
        worksheet.write_number(3, 0, 1002).unwrap();
        worksheet.write_boolean(3, 1, true).unwrap();

        workbook.save_to_buffer().unwrap()
    }

    #[test]
    fn test_decode_first_sheet() {
        let sheet = decode_workbook(build_workbook()).unwrap();

        assert_eq!(sheet.headers, vec!["사번", "이름", "입사일", "급여"]);
        assert_eq!(sheet.rows.len(), 3);

        let first = &sheet.rows[0];
        assert_eq!(first[0], CellValue::Number(1001.0));
        assert_eq!(first[1], CellValue::Text("Kim".to_string()));
        match &first[2] {
            CellValue::Date(dt) => assert_eq!(dt.format("%Y-%m-%d").to_string(), "2024-01-15"),
            other => panic!("expected a date cell, got {:?}", other),
        }
        assert_eq!(first[3], CellValue::Number(4200.5));

        assert!(sheet.rows[1].iter().all(CellValue::is_blank));
        assert_eq!(sheet.rows[2][1], CellValue::Bool(true));
    }

    #[test]
    fn test_garbage_bytes_are_a_parse_error() {
        let err = decode_workbook(b"definitely not a workbook".to_vec()).unwrap_err();
        assert!(matches!(err, EtlError::SpreadsheetError(_)));
    }

    #[tokio::test]
    async fn test_decode_on_blocking_pool() {
        let sheet = decode_workbook_async(build_workbook()).await.unwrap();
        assert_eq!(sheet.headers.len(), 4);
    }
}

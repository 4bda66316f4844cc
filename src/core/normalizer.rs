use crate::core::header_map::{resolve_header, CanonicalField, FieldKind, HeaderKey};
use crate::domain::model::{
    iso_date, json_number, CellValue, Employee, FieldValue, SheetData, PLACEHOLDER_PREFIX,
};
use crate::utils::error::{EtlError, Result};
use uuid::Uuid;

/// What to do with a record whose `employee_id` is unusable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdPolicy {
    /// Bulk upload: the id must be a non-zero number, otherwise the batch fails.
    Strict,
    /// Local store: a falsy id is replaced by `TEMP_<uuid>`.
    Placeholder,
}

/// A coerced cell ready to be written into a record.
#[derive(Debug, Clone, PartialEq)]
enum Coerced {
    Null,
    Text(String),
    Field(FieldValue),
}

fn coerce_date(cell: &CellValue) -> Coerced {
    match cell {
        CellValue::Date(dt) => Coerced::Text(iso_date(dt)),
        other => Coerced::Text(other.to_text()),
    }
}

/// 數字欄位：空字串 → null，可解析則轉數字，否則保留原值
fn coerce_number(cell: &CellValue) -> Coerced {
    match cell {
        CellValue::Empty => Coerced::Null,
        CellValue::Number(n) => finite_number(*n),
        CellValue::Bool(b) => Coerced::Field(FieldValue::Number(u8::from(*b).into())),
        // 日期以 epoch 毫秒計
        CellValue::Date(dt) => finite_number(dt.and_utc().timestamp_millis() as f64),
        CellValue::Text(s) if s.is_empty() => Coerced::Null,
        CellValue::Text(s) => match parse_number(s) {
            Some(n) => finite_number(n),
            None => Coerced::Field(FieldValue::Text(s.clone())),
        },
    }
}

/// NaN 與無限大在 JSON 中都是 null
fn finite_number(n: f64) -> Coerced {
    match json_number(n) {
        Some(num) => Coerced::Field(FieldValue::Number(num)),
        None => Coerced::Null,
    }
}

/// Numeric text rules: surrounding whitespace is ignored, whitespace-only
/// text is `0`, `0x`/`0o`/`0b` prefixes select a radix and `Infinity` is
/// accepted with an optional sign.
fn parse_number(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Some(0.0);
    }

    let radix = match trimmed.get(..2) {
        Some("0x") | Some("0X") => Some(16),
        Some("0o") | Some("0O") => Some(8),
        Some("0b") | Some("0B") => Some(2),
        _ => None,
    };
    if let Some(radix) = radix {
        let digits = &trimmed[2..];
        if digits.is_empty() {
            return None;
        }
        return digits.chars().try_fold(0.0_f64, |acc, c| {
            c.to_digit(radix).map(|d| acc * f64::from(radix) + f64::from(d))
        });
    }

    match trimmed {
        "Infinity" | "+Infinity" => return Some(f64::INFINITY),
        "-Infinity" => return Some(f64::NEG_INFINITY),
        _ => {}
    }

    // "inf" / "nan" 之類的字串不視為數字
    if trimmed
        .chars()
        .any(|c| c.is_ascii_alphabetic() && c != 'e' && c != 'E')
    {
        return None;
    }
    trimmed.parse::<f64>().ok()
}

fn coerce_text(cell: &CellValue) -> Coerced {
    match cell {
        CellValue::Empty => Coerced::Null,
        other => Coerced::Text(other.to_text()),
    }
}

fn assign(employee: &mut Employee, field: CanonicalField, value: Coerced) {
    let text = match value {
        Coerced::Null => return,
        Coerced::Field(v) => {
            match field {
                CanonicalField::EmployeeId => employee.employee_id = v,
                CanonicalField::Salary => employee.salary = Some(v),
                CanonicalField::ManagerId => employee.manager_id = Some(v),
                _ => assign(employee, field, Coerced::Text(v.to_string())),
            }
            return;
        }
        Coerced::Text(s) => s,
    };

    match field {
        CanonicalField::EmployeeId => employee.employee_id = FieldValue::Text(text),
        CanonicalField::Name => employee.name = text,
        CanonicalField::Department => employee.department = text,
        CanonicalField::Title => employee.title = text,
        CanonicalField::Email => employee.email = text,
        CanonicalField::Phone => employee.phone = text,
        CanonicalField::HireDate => employee.hire_date = text,
        CanonicalField::Salary => employee.salary = Some(FieldValue::Text(text)),
        CanonicalField::Status => employee.status = text,
        CanonicalField::ManagerId => employee.manager_id = Some(FieldValue::Text(text)),
    }
}

/// Resolves every header once; unmapped columns resolve to `None`.
pub fn resolve_headers(headers: &[String]) -> Vec<Option<CanonicalField>> {
    headers
        .iter()
        .map(|h| match resolve_header(h) {
            HeaderKey::Canonical(field) => Some(field),
            HeaderKey::Unmapped(label) => {
                tracing::debug!("Dropping unmapped column '{}'", label);
                None
            }
        })
        .collect()
}

/// A row is blank when every cell is empty or an empty string.
pub fn is_blank_row(row: &[CellValue]) -> bool {
    row.iter().all(CellValue::is_blank)
}

static EMPTY_CELL: CellValue = CellValue::Empty;

fn build_record(columns: &[Option<CanonicalField>], row: &[CellValue]) -> Employee {
    let mut employee = Employee::default();

    for (index, column) in columns.iter().enumerate() {
        let Some(field) = column else { continue };
        let cell = row.get(index).unwrap_or(&EMPTY_CELL);

        let value = match field.kind() {
            FieldKind::Date => coerce_date(cell),
            FieldKind::Numeric => coerce_number(cell),
            FieldKind::Text => coerce_text(cell),
        };
        assign(&mut employee, *field, value);
    }

    employee
}

fn apply_policy(mut employee: Employee, policy: IdPolicy, sheet_row: usize) -> Result<Employee> {
    match policy {
        IdPolicy::Strict => {
            if employee.employee_id.is_falsy() || !employee.employee_id.is_number() {
                return Err(EtlError::ValidationError {
                    row: sheet_row,
                    message: "employee_id missing or not numeric".to_string(),
                    record: serde_json::to_string(&employee)?,
                });
            }
        }
        IdPolicy::Placeholder => {
            if employee.employee_id.is_falsy() {
                let placeholder = format!("{}{}", PLACEHOLDER_PREFIX, Uuid::new_v4());
                tracing::debug!(
                    "Row {} has no employee_id, using placeholder {}",
                    sheet_row,
                    placeholder
                );
                employee.employee_id = FieldValue::Text(placeholder);
            }
        }
    }
    Ok(employee)
}

/// Normalizes one data row. `sheet_row` is the 1-based row number in the sheet
/// and only appears in validation errors.
pub fn normalize_row(
    headers: &[String],
    row: &[CellValue],
    policy: IdPolicy,
    sheet_row: usize,
) -> Result<Employee> {
    let columns = resolve_headers(headers);
    apply_policy(build_record(&columns, row), policy, sheet_row)
}

/// Drops blank rows and normalizes the rest. One invalid row fails the batch.
pub fn normalize_sheet(sheet: &SheetData, policy: IdPolicy) -> Result<Vec<Employee>> {
    let columns = resolve_headers(&sheet.headers);

    sheet
        .rows
        .iter()
        .enumerate()
        .filter(|(_, row)| !is_blank_row(row))
        // 標題列佔第 1 列，資料從第 2 列開始
        .map(|(index, row)| apply_policy(build_record(&columns, row), policy, index + 2))
        .collect()
}

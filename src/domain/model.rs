use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Placeholder ids handed out by the local path start with this prefix.
pub const PLACEHOLDER_PREFIX: &str = "TEMP_";

/// A single decoded spreadsheet cell.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
    Date(NaiveDateTime),
}

impl CellValue {
    /// 空白儲存格：沒有值或空字串
    pub fn is_blank(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.is_empty(),
            _ => false,
        }
    }

    pub fn to_text(&self) -> String {
        match self {
            CellValue::Empty => String::new(),
            CellValue::Text(s) => s.clone(),
            CellValue::Number(n) => match json_number(*n) {
                Some(num) => num.to_string(),
                None => n.to_string(),
            },
            CellValue::Bool(b) => b.to_string(),
            CellValue::Date(dt) => iso_date(dt),
        }
    }
}

/// `YYYY-MM-DD`
pub fn iso_date(dt: &NaiveDateTime) -> String {
    dt.date().format("%Y-%m-%d").to_string()
}

/// Converts a float to a JSON number, keeping integral values integral.
/// Returns `None` for NaN and infinities.
pub fn json_number(n: f64) -> Option<serde_json::Number> {
    const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;
    if n.is_finite() && n.fract() == 0.0 && n.abs() <= MAX_SAFE_INTEGER {
        Some(serde_json::Number::from(n as i64))
    } else {
        serde_json::Number::from_f64(n)
    }
}

/// First sheet of a workbook: the header row and every row below it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SheetData {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

/// Value of `employee_id`, `salary` or `manager_id` after numeric coercion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Number(serde_json::Number),
    Text(String),
}

impl FieldValue {
    pub fn is_number(&self) -> bool {
        matches!(self, FieldValue::Number(_))
    }

    /// `""` and `0` do not count as a usable id.
    pub fn is_falsy(&self) -> bool {
        match self {
            FieldValue::Number(n) => n.as_f64().map(|v| v == 0.0).unwrap_or(false),
            FieldValue::Text(s) => s.is_empty(),
        }
    }

    /// Numbers first in ascending order, then text in lexicographic order.
    pub fn key_order(&self, other: &FieldValue) -> Ordering {
        match (self, other) {
            (FieldValue::Number(a), FieldValue::Number(b)) => {
                let a = a.as_f64().unwrap_or(f64::NAN);
                let b = b.as_f64().unwrap_or(f64::NAN);
                a.partial_cmp(&b).unwrap_or(Ordering::Equal)
            }
            (FieldValue::Number(_), FieldValue::Text(_)) => Ordering::Less,
            (FieldValue::Text(_), FieldValue::Number(_)) => Ordering::Greater,
            (FieldValue::Text(a), FieldValue::Text(b)) => a.cmp(b),
        }
    }
}

impl Default for FieldValue {
    fn default() -> Self {
        FieldValue::Text(String::new())
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Number(n) => write!(f, "{}", n),
            FieldValue::Text(s) => write!(f, "{}", s),
        }
    }
}

/// Canonical employee record. Field order matches the JSON and CSV output.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    pub employee_id: FieldValue,
    pub name: String,
    pub department: String,
    pub title: String,
    pub email: String,
    pub phone: String,
    pub hire_date: String,
    pub salary: Option<FieldValue>,
    pub status: String,
    pub manager_id: Option<FieldValue>,
}

impl Employee {
    /// 儲存用的鍵：employee_id 的 JSON 表示，數字與字串不會互相覆蓋
    pub fn store_key(&self) -> serde_json::Result<String> {
        serde_json::to_string(&self.employee_id)
    }
}

/// Response of the bulk endpoint. Missing or null counters read as 0.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UploadSummary {
    #[serde(default, deserialize_with = "null_as_zero")]
    pub created: u64,
    #[serde(default, deserialize_with = "null_as_zero")]
    pub updated: u64,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub errors: Vec<serde_json::Value>,
}

fn null_as_zero<'de, D>(deserializer: D) -> std::result::Result<u64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<u64>::deserialize(deserializer)?.unwrap_or(0))
}

fn null_as_empty<'de, D>(deserializer: D) -> std::result::Result<Vec<serde_json::Value>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<Vec<serde_json::Value>>::deserialize(deserializer)?.unwrap_or_default())
}

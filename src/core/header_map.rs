//! Bilingual header lookup.
//!
//! Korean labels used by HR spreadsheets map onto the canonical English keys,
//! and every canonical key maps onto itself. Matching is exact after trimming.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CanonicalField {
    EmployeeId,
    Name,
    Department,
    Title,
    Email,
    Phone,
    HireDate,
    Salary,
    Status,
    ManagerId,
}

/// How a column's cells are coerced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Date,
    Numeric,
}

impl CanonicalField {
    pub const ALL: [CanonicalField; 10] = [
        CanonicalField::EmployeeId,
        CanonicalField::Name,
        CanonicalField::Department,
        CanonicalField::Title,
        CanonicalField::Email,
        CanonicalField::Phone,
        CanonicalField::HireDate,
        CanonicalField::Salary,
        CanonicalField::Status,
        CanonicalField::ManagerId,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CanonicalField::EmployeeId => "employee_id",
            CanonicalField::Name => "name",
            CanonicalField::Department => "department",
            CanonicalField::Title => "title",
            CanonicalField::Email => "email",
            CanonicalField::Phone => "phone",
            CanonicalField::HireDate => "hire_date",
            CanonicalField::Salary => "salary",
            CanonicalField::Status => "status",
            CanonicalField::ManagerId => "manager_id",
        }
    }

    pub fn kind(&self) -> FieldKind {
        match self {
            CanonicalField::HireDate => FieldKind::Date,
            CanonicalField::EmployeeId | CanonicalField::Salary | CanonicalField::ManagerId => {
                FieldKind::Numeric
            }
            _ => FieldKind::Text,
        }
    }
}

impl fmt::Display for CanonicalField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 韓文欄位名稱對照表
pub const KOREAN_HEADERS: &[(&str, CanonicalField)] = &[
    ("사번", CanonicalField::EmployeeId),
    ("이름", CanonicalField::Name),
    ("부서", CanonicalField::Department),
    ("직책", CanonicalField::Title),
    ("이메일", CanonicalField::Email),
    ("연락처", CanonicalField::Phone),
    ("입사일", CanonicalField::HireDate),
    ("급여", CanonicalField::Salary),
    ("상태", CanonicalField::Status),
    ("관리자사번", CanonicalField::ManagerId),
];

/// Resolved key of one header cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderKey<'a> {
    Canonical(CanonicalField),
    /// No mapping; the trimmed label is the key.
    Unmapped(&'a str),
}

impl HeaderKey<'_> {
    pub fn canonical(&self) -> Option<CanonicalField> {
        match self {
            HeaderKey::Canonical(field) => Some(*field),
            HeaderKey::Unmapped(_) => None,
        }
    }
}

pub fn resolve_header(label: &str) -> HeaderKey<'_> {
    let label = label.trim();

    KOREAN_HEADERS
        .iter()
        .find(|(korean, _)| *korean == label)
        .map(|(_, field)| *field)
        .or_else(|| {
            CanonicalField::ALL
                .iter()
                .copied()
                .find(|field| field.as_str() == label)
        })
        .map(HeaderKey::Canonical)
        .unwrap_or(HeaderKey::Unmapped(label))
}

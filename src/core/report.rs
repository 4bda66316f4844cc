use crate::domain::model::Employee;
use crate::utils::error::{EtlError, Result};

/// Renders records as CSV with the ten canonical keys as header row.
pub fn employees_to_csv(employees: &[Employee]) -> Result<String> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(true)
        .from_writer(Vec::new());

    if employees.is_empty() {
        writer.write_record(CSV_HEADERS)?;
    }
    for employee in employees {
        writer.serialize(employee)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| EtlError::IoError(e.into_error()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

const CSV_HEADERS: [&str; 10] = [
    "employee_id",
    "name",
    "department",
    "title",
    "email",
    "phone",
    "hire_date",
    "salary",
    "status",
    "manager_id",
];

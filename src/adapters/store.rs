//! redb-backed `employees` collection

use crate::domain::model::Employee;
use crate::domain::ports::EmployeeStore;
use crate::utils::error::{EtlError, Result};
use async_trait::async_trait;
use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition};
use std::path::Path;
use std::sync::Arc;

/// Employees table: key = JSON text of employee_id, value = record JSON
const EMPLOYEES_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("employees");

// redb 每個操作都有自己的錯誤型別，統一收斂到 StoreError
macro_rules! store_error_from {
    ($($err:ty),* $(,)?) => {
        $(
            impl From<$err> for EtlError {
                fn from(e: $err) -> Self {
                    EtlError::StoreError(e.into())
                }
            }
        )*
    };
}

store_error_from!(
    redb::DatabaseError,
    redb::TransactionError,
    redb::TableError,
    redb::StorageError,
    redb::CommitError,
);

#[derive(Clone)]
pub struct RedbEmployeeStore {
    db: Arc<Database>,
}

impl RedbEmployeeStore {
    /// Open or create the database file and make sure the table exists.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let db = Database::create(path)?;
        Self::init(db)
    }

    /// In-memory database (tests, dry runs)
    pub fn open_in_memory() -> Result<Self> {
        let db = Database::builder()
            .create_with_backend(redb::backends::InMemoryBackend::new())?;
        Self::init(db)
    }

    fn init(db: Database) -> Result<Self> {
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(EMPLOYEES_TABLE)?;
        }
        write_txn.commit()?;

        Ok(Self { db: Arc::new(db) })
    }

    fn upsert_blocking(db: &Database, employees: &[Employee]) -> Result<usize> {
        let write_txn = db.begin_write()?;
        {
            let mut table = write_txn.open_table(EMPLOYEES_TABLE)?;
            for employee in employees {
                let key = employee.store_key()?;
                let value = serde_json::to_vec(employee)?;
                table.insert(key.as_str(), value.as_slice())?;
            }
        }
        write_txn.commit()?;
        Ok(employees.len())
    }

    fn read_all_blocking(db: &Database) -> Result<Vec<Employee>> {
        let read_txn = db.begin_read()?;
        let table = read_txn.open_table(EMPLOYEES_TABLE)?;

        let mut employees = Vec::new();
        for entry in table.iter()? {
            let (_, guard) = entry?;
            let employee: Employee = serde_json::from_slice(guard.value())?;
            employees.push(employee);
        }

        employees.sort_by(|a, b| a.employee_id.key_order(&b.employee_id));
        Ok(employees)
    }

    fn clear_blocking(db: &Database) -> Result<()> {
        let write_txn = db.begin_write()?;
        write_txn.delete_table(EMPLOYEES_TABLE)?;
        {
            let _ = write_txn.open_table(EMPLOYEES_TABLE)?;
        }
        write_txn.commit()?;
        Ok(())
    }
}

#[async_trait]
impl EmployeeStore for RedbEmployeeStore {
    async fn upsert_many(&self, employees: &[Employee]) -> Result<usize> {
        let db = Arc::clone(&self.db);
        let employees = employees.to_vec();
        let count =
            tokio::task::spawn_blocking(move || Self::upsert_blocking(&db, &employees)).await??;
        tracing::debug!("Upserted {} employees", count);
        Ok(count)
    }

    async fn read_all(&self) -> Result<Vec<Employee>> {
        let db = Arc::clone(&self.db);
        let employees = tokio::task::spawn_blocking(move || Self::read_all_blocking(&db)).await??;
        Ok(employees)
    }

    async fn clear(&self) -> Result<()> {
        let db = Arc::clone(&self.db);
        tokio::task::spawn_blocking(move || Self::clear_blocking(&db)).await??;
        Ok(())
    }
}

use crate::core::status::Status;
use crate::domain::model::{Employee, SheetData, UploadSummary};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::collections::HashMap;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn input_base_path(&self) -> &str;
    fn store_path(&self) -> &str;
    fn api_base_url(&self) -> &str;
    fn bulk_path(&self) -> &str;
    fn api_headers(&self) -> &HashMap<String, String>;
    fn request_timeout_seconds(&self) -> Option<u64>;
}

/// Keyed `employees` collection.
#[async_trait]
pub trait EmployeeStore: Send + Sync {
    /// Replace-or-insert every record by `employee_id` in one transaction.
    async fn upsert_many(&self, employees: &[Employee]) -> Result<usize>;
    async fn read_all(&self) -> Result<Vec<Employee>>;
    async fn clear(&self) -> Result<()>;
}

#[async_trait]
pub trait BulkUploader: Send + Sync {
    async fn upload(&self, employees: &[Employee]) -> Result<UploadSummary>;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<SheetData>;
    async fn transform(&self, sheet: SheetData) -> Result<Vec<Employee>>;
    async fn load(&self, employees: Vec<Employee>) -> Result<Status>;
}

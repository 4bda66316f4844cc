use crate::adapters::spreadsheet::decode_workbook_async;
use crate::core::normalizer::{normalize_sheet, IdPolicy};
use crate::core::status::Status;
use crate::core::{BulkUploader, EmployeeStore, Employee, Pipeline, SheetData, Storage};
use crate::utils::error::Result;
use crate::utils::validation::{validate_file_extension, SPREADSHEET_EXTENSIONS};

/// Reads and decodes the uploaded workbook.
pub async fn read_sheet<S: Storage>(storage: &S, file: &str) -> Result<SheetData> {
    validate_file_extension("file", file, SPREADSHEET_EXTENSIONS)?;

    tracing::info!("📂 Reading spreadsheet: {}", file);
    let bytes = storage.read_file(file).await?;
    tracing::debug!("Read {} bytes", bytes.len());

    let sheet = decode_workbook_async(bytes).await?;
    tracing::info!(
        "📊 Found {} columns and {} data rows",
        sheet.headers.len(),
        sheet.rows.len()
    );
    Ok(sheet)
}

fn transform_sheet(sheet: &SheetData, policy: IdPolicy) -> Result<Vec<Employee>> {
    tracing::info!("🔧 Normalizing rows ({:?} employee_id policy)", policy);
    let employees = normalize_sheet(sheet, policy)?;
    tracing::info!("✅ Normalized {} employees", employees.len());
    Ok(employees)
}

/// Spreadsheet → local store. Rows without an id get a placeholder.
pub struct LocalPipeline<S: Storage, E: EmployeeStore> {
    storage: S,
    store: E,
    file: String,
}

impl<S: Storage, E: EmployeeStore> LocalPipeline<S, E> {
    pub fn new(storage: S, store: E, file: impl Into<String>) -> Self {
        Self {
            storage,
            store,
            file: file.into(),
        }
    }
}

#[async_trait::async_trait]
impl<S: Storage, E: EmployeeStore> Pipeline for LocalPipeline<S, E> {
    async fn extract(&self) -> Result<SheetData> {
        read_sheet(&self.storage, &self.file).await
    }

    async fn transform(&self, sheet: SheetData) -> Result<Vec<Employee>> {
        transform_sheet(&sheet, IdPolicy::Placeholder)
    }

    async fn load(&self, employees: Vec<Employee>) -> Result<Status> {
        tracing::info!("💾 Saving {} employees to local store", employees.len());
        let count = self.store.upsert_many(&employees).await?;
        Ok(Status::Saved { count })
    }
}

/// Spreadsheet → bulk endpoint. Every row needs a numeric employee_id.
pub struct ApiPipeline<S: Storage, U: BulkUploader> {
    storage: S,
    uploader: U,
    file: String,
}

impl<S: Storage, U: BulkUploader> ApiPipeline<S, U> {
    pub fn new(storage: S, uploader: U, file: impl Into<String>) -> Self {
        Self {
            storage,
            uploader,
            file: file.into(),
        }
    }
}

#[async_trait::async_trait]
impl<S: Storage, U: BulkUploader> Pipeline for ApiPipeline<S, U> {
    async fn extract(&self) -> Result<SheetData> {
        read_sheet(&self.storage, &self.file).await
    }

    async fn transform(&self, sheet: SheetData) -> Result<Vec<Employee>> {
        transform_sheet(&sheet, IdPolicy::Strict)
    }

    async fn load(&self, employees: Vec<Employee>) -> Result<Status> {
        if employees.is_empty() {
            tracing::warn!("⚠️ No employee rows found, skipping upload");
            return Ok(Status::NothingToUpload);
        }

        tracing::info!("🚀 Uploading {} employees", employees.len());
        let summary = self.uploader.upload(&employees).await?;
        tracing::info!(
            "📬 Server reported {} created, {} updated, {} errors",
            summary.created,
            summary.updated,
            summary.errors.len()
        );
        Ok(Status::from(&summary))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::store::RedbEmployeeStore;
    use crate::domain::model::{FieldValue, UploadSummary};
    use crate::utils::error::EtlError;
    use rust_xlsxwriter::Workbook;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    #[derive(Clone)]
    struct MockStorage {
        files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    }

    impl MockStorage {
        fn with_file(path: &str, data: Vec<u8>) -> Self {
            let mut files = HashMap::new();
            files.insert(path.to_string(), data);
            Self {
                files: Arc::new(Mutex::new(files)),
            }
        }
    }

    impl Storage for MockStorage {
        async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned().ok_or_else(|| {
                EtlError::IoError(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("File not found: {}", path),
                ))
            })
        }

        async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
            let mut files = self.files.lock().await;
            files.insert(path.to_string(), data.to_vec());
            Ok(())
        }
    }

    /// Records every batch it receives.
    #[derive(Default)]
    struct RecordingUploader {
        batches: Mutex<Vec<Vec<Employee>>>,
    }

    #[async_trait::async_trait]
    impl BulkUploader for RecordingUploader {
        async fn upload(&self, employees: &[Employee]) -> Result<UploadSummary> {
            self.batches.lock().await.push(employees.to_vec());
            Ok(UploadSummary {
                created: employees.len() as u64,
                ..Default::default()
            })
        }
    }

    fn workbook(rows: &[[&str; 3]]) -> Vec<u8> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        for (r, row) in rows.iter().enumerate() {
            for (c, value) in row.iter().enumerate() {
                if !value.is_empty() {
                    worksheet.write_string(r as u32, c as u16, *value).unwrap();
                }
            }
        }
        workbook.save_to_buffer().unwrap()
    }

    #[tokio::test]
    async fn test_extract_rejects_unsupported_extension() {
        let storage = MockStorage::with_file("staff.csv", vec![]);
        let store = RedbEmployeeStore::open_in_memory().unwrap();
        let pipeline = LocalPipeline::new(storage, store, "staff.csv");

        let err = pipeline.extract().await.unwrap_err();
        assert!(matches!(err, EtlError::InvalidConfigValueError { .. }));
    }

    #[tokio::test]
    async fn test_local_pipeline_assigns_placeholders_and_saves() {
        let bytes = workbook(&[["사번", "이름", "부서"], ["", "Kim", "HR"], ["77", "Lee", ""]]);
        let storage = MockStorage::with_file("staff.xlsx", bytes);
        let store = RedbEmployeeStore::open_in_memory().unwrap();
        let pipeline = LocalPipeline::new(storage, store.clone(), "staff.xlsx");

        let sheet = pipeline.extract().await.unwrap();
        let employees = pipeline.transform(sheet).await.unwrap();
        assert_eq!(employees.len(), 2);

        let status = pipeline.load(employees).await.unwrap();
        assert_eq!(status, Status::Saved { count: 2 });

        let stored = store.read_all().await.unwrap();
        assert_eq!(stored[0].employee_id, FieldValue::Number(77.into()));
        match &stored[1].employee_id {
            FieldValue::Text(id) => assert!(id.starts_with("TEMP_")),
            other => panic!("expected placeholder id, got {:?}", other),
        }
        assert_eq!(stored[1].department, "HR");
    }

    #[tokio::test]
    async fn test_api_pipeline_validates_before_upload() {
        let bytes = workbook(&[["employee_id", "salary", ""], ["", "5000", ""]]);
        let storage = MockStorage::with_file("staff.xlsx", bytes);
        let pipeline = ApiPipeline::new(storage, RecordingUploader::default(), "staff.xlsx");

        let sheet = pipeline.extract().await.unwrap();
        let err = pipeline.transform(sheet).await.unwrap_err();

        assert!(matches!(err, EtlError::ValidationError { row: 2, .. }));
        assert!(pipeline.uploader.batches.lock().await.is_empty());
    }

    #[tokio::test]
    async fn test_api_pipeline_uploads_one_batch() {
        let bytes = workbook(&[["사번", "이름", "급여"], ["1", "Kim", "3000"], ["2", "Lee", ""]]);
        let storage = MockStorage::with_file("staff.xlsx", bytes);
        let pipeline = ApiPipeline::new(storage, RecordingUploader::default(), "staff.xlsx");

        let sheet = pipeline.extract().await.unwrap();
        let employees = pipeline.transform(sheet).await.unwrap();
        let status = pipeline.load(employees).await.unwrap();

        assert_eq!(status.to_string(), "Upload complete: 2 created, 0 updated");
        let batches = pipeline.uploader.batches.lock().await;
        assert_eq!(batches.len(), 1);
        assert_eq!(batches[0][0].salary, Some(FieldValue::Number(3000.into())));
        assert_eq!(batches[0][1].salary, None);
    }

    #[tokio::test]
    async fn test_api_pipeline_skips_header_only_sheet() {
        let bytes = workbook(&[["사번", "이름", "급여"]]);
        let storage = MockStorage::with_file("staff.xlsx", bytes);
        let pipeline = ApiPipeline::new(storage, RecordingUploader::default(), "staff.xlsx");

        let sheet = pipeline.extract().await.unwrap();
        let employees = pipeline.transform(sheet).await.unwrap();
        let status = pipeline.load(employees).await.unwrap();

        assert_eq!(status, Status::NothingToUpload);
        assert!(pipeline.uploader.batches.lock().await.is_empty());
    }
}

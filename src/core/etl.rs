use crate::core::status::Status;
use crate::core::{Employee, Pipeline};
use crate::utils::error::Result;

pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub fn pipeline(&self) -> &P {
        &self.pipeline
    }

    /// Extract and transform only; nothing is written anywhere.
    pub async fn preview(&self) -> Result<Vec<Employee>> {
        tracing::info!("Extracting data...");
        let sheet = self.pipeline.extract().await?;

        tracing::info!("Transforming data...");
        let employees = self.pipeline.transform(sheet).await?;
        tracing::info!("{}", Status::Parsed { count: employees.len() });

        Ok(employees)
    }

    pub async fn run(&self) -> Result<Status> {
        tracing::info!("Starting ETL process...");

        let employees = self.preview().await?;

        tracing::info!("Loading data...");
        let status = self.pipeline.load(employees).await?;
        tracing::info!("{}", status);

        Ok(status)
    }
}

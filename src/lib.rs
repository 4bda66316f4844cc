pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::{CliConfig, Command};

pub use adapters::{http::BulkApiClient, store::RedbEmployeeStore};
pub use config::{cli::LocalStorage, toml_config::TomlConfig};
pub use core::{
    etl::EtlEngine,
    normalizer::IdPolicy,
    pipeline::{ApiPipeline, LocalPipeline},
    status::Status,
};
pub use domain::model::{Employee, FieldValue, UploadSummary};
pub use utils::error::{EtlError, Result};

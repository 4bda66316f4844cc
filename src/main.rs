use clap::Parser;
use roster_etl::core::report::employees_to_csv;
use roster_etl::core::{ConfigProvider, EmployeeStore, Storage};
use roster_etl::utils::error::ErrorSeverity;
use roster_etl::utils::logger;
use roster_etl::{
    ApiPipeline, BulkApiClient, CliConfig, Command, Employee, EtlEngine, EtlError, LocalPipeline,
    LocalStorage, RedbEmployeeStore, Status, TomlConfig,
};

#[tokio::main]
async fn main() {
    let cli = CliConfig::parse();

    // 初始化日誌
    if cli.log_json {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting roster-etl");
    tracing::debug!("CLI config: {:?}", cli);

    let config = match cli.resolve() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("❌ Configuration validation failed: {}", e);
            tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(1);
        }
    };

    match execute(&cli.command, &config).await {
        Ok(status) => {
            tracing::info!("✅ {}", status);
            println!("✅ {}", status);
        }
        Err(e) => {
            tracing::error!(
                "❌ Command failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", Status::from_error(&e));
            eprintln!("💡 建議: {}", e.recovery_suggestion());

            // 根據錯誤嚴重程度決定退出碼
            let exit_code = match e.severity() {
                ErrorSeverity::Medium => 2,
                ErrorSeverity::High => 1,
                ErrorSeverity::Critical => 3,
            };
            std::process::exit(exit_code);
        }
    }
}

async fn execute(command: &Command, config: &TomlConfig) -> Result<Status, EtlError> {
    let storage = LocalStorage::new(config.input_base_path());

    match command {
        Command::Parse {
            file,
            strict,
            output,
        } => {
            // 預覽不會寫入任何地方，用記憶體資料庫即可
            let employees = if *strict {
                let uploader = BulkApiClient::from_config(config)?;
                EtlEngine::new(ApiPipeline::new(storage.clone(), uploader, file.as_str()))
                    .preview()
                    .await?
            } else {
                let store = RedbEmployeeStore::open_in_memory()?;
                EtlEngine::new(LocalPipeline::new(storage.clone(), store, file.as_str()))
                    .preview()
                    .await?
            };
            emit_csv(&storage, &employees, output.as_deref()).await?;
            Ok(Status::Parsed {
                count: employees.len(),
            })
        }
        Command::Save { file } => {
            let store = RedbEmployeeStore::open(config.store_path())?;
            EtlEngine::new(LocalPipeline::new(storage, store, file.as_str()))
                .run()
                .await
        }
        Command::List { output } => {
            let store = RedbEmployeeStore::open(config.store_path())?;
            let employees = store.read_all().await?;
            emit_csv(&storage, &employees, output.as_deref()).await?;
            Ok(Status::Reloaded {
                count: employees.len(),
            })
        }
        Command::Clear => {
            let store = RedbEmployeeStore::open(config.store_path())?;
            store.clear().await?;
            Ok(Status::Cleared)
        }
        Command::Upload { file } => {
            let uploader = BulkApiClient::from_config(config)?;
            tracing::info!("🌐 Bulk endpoint: {}", uploader.endpoint());
            EtlEngine::new(ApiPipeline::new(storage, uploader, file.as_str()))
                .run()
                .await
        }
    }
}

async fn emit_csv(
    storage: &LocalStorage,
    employees: &[Employee],
    output: Option<&str>,
) -> Result<(), EtlError> {
    let csv = employees_to_csv(employees)?;
    match output {
        Some(path) => {
            storage.write_file(path, csv.as_bytes()).await?;
            tracing::info!("📁 Preview written to {}", storage.resolve(path).display());
        }
        None => print!("{}", csv),
    }
    Ok(())
}

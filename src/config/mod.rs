pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use crate::utils::validation::Validate;
#[cfg(feature = "cli")]
use clap::{Parser, Subcommand};
#[cfg(feature = "cli")]
use toml_config::{TomlConfig, DEFAULT_CONFIG_FILE};

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "roster-etl")]
#[command(about = "Import employee spreadsheets into a local store or a bulk API")]
pub struct CliConfig {
    /// Path to TOML configuration file (optional)
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Override store.path
    #[arg(long, global = true)]
    pub store: Option<String>,

    /// Override api.base_url
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Override input.base_path
    #[arg(long, global = true)]
    pub input_dir: Option<String>,

    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Emit logs as JSON")]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Parse a spreadsheet and print the normalized records as CSV
    Parse {
        file: String,
        /// Apply the upload rules (numeric employee_id required)
        #[arg(long)]
        strict: bool,
        /// Write the CSV preview to a file instead of stdout
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Parse a spreadsheet and save the records into the local store
    Save { file: String },
    /// Print every record in the local store as CSV
    List {
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Delete every record in the local store
    Clear,
    /// Parse a spreadsheet and send the records to the bulk endpoint
    Upload { file: String },
}

#[cfg(feature = "cli")]
impl CliConfig {
    /// 載入設定檔並套用命令列覆蓋值
    pub fn resolve(&self) -> Result<TomlConfig> {
        let mut config = match &self.config {
            Some(path) => TomlConfig::from_file(path)?,
            None => TomlConfig::from_file_or_default(DEFAULT_CONFIG_FILE)?,
        };

        if let Some(store) = &self.store {
            config.store.path = store.clone();
        }
        if let Some(api_url) = &self.api_url {
            config.api.base_url = api_url.clone();
        }
        if let Some(input_dir) = &self.input_dir {
            config.input.base_path = input_dir.clone();
        }

        config.validate()?;
        Ok(config)
    }
}

#[cfg(all(test, feature = "cli"))]
mod tests {
    use super::*;
    use crate::core::ConfigProvider;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_upload_command() {
        let cli = CliConfig::parse_from([
            "roster-etl",
            "--api-url",
            "https://hr.example.com",
            "upload",
            "staff.xlsx",
        ]);

        match &cli.command {
            Command::Upload { file } => assert_eq!(file, "staff.xlsx"),
            other => panic!("unexpected command: {:?}", other),
        }
        assert_eq!(cli.api_url.as_deref(), Some("https://hr.example.com"));
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = CliConfig::parse_from(["roster-etl", "list", "-v", "--store", "/tmp/x.redb"]);
        assert!(cli.verbose);
        assert_eq!(cli.store.as_deref(), Some("/tmp/x.redb"));
        assert!(matches!(cli.command, Command::List { output: None }));
    }

    #[test]
    fn test_overrides_win_over_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(
            b"[store]\npath = \"./file.redb\"\n[api]\nbase_url = \"https://file.example.com\"\n",
        )
        .unwrap();

        let cli = CliConfig::parse_from([
            "roster-etl",
            "--config",
            file.path().to_str().unwrap(),
            "--store",
            "./flag.redb",
            "clear",
        ]);
        let config = cli.resolve().unwrap();

        assert_eq!(config.store_path(), "./flag.redb");
        assert_eq!(config.api_base_url(), "https://file.example.com");
    }

    #[test]
    fn test_invalid_override_fails_validation() {
        let cli = CliConfig::parse_from([
            "roster-etl",
            "--config",
            "/definitely/not/here.toml",
            "clear",
        ]);
        assert!(cli.resolve().is_err());

        let cli = CliConfig::parse_from(["roster-etl", "--api-url", "ftp://nope", "clear"]);
        assert!(cli.resolve().is_err());
    }
}

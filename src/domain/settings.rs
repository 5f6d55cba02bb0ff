//! Typed application settings built from a [`ConfigPort`].
//!
//! Everything the commands need is read once into [`AppSettings`] and
//! passed down explicitly; nothing reads configuration lazily.

use std::path::PathBuf;

use crate::domain::error::EtlError;
use crate::domain::export::ExportOrder;
use crate::domain::import::DEFAULT_BATCH_SIZE;
use crate::ports::config_port::ConfigPort;

pub const DEFAULT_IMPORT_PATH: &str = "sp500_data.xlsx";
pub const DEFAULT_SPREADSHEET_PATH: &str = "sp500_data_export.xlsx";
pub const DEFAULT_DOCUMENT_PATH: &str = "sp500_data_export.typ";
pub const DEFAULT_SQLITE_PATH: &str = "indexetl.db";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostgresConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub dbname: String,
    pub sslmode: String,
}

impl Default for PostgresConfig {
    fn default() -> Self {
        Self {
            host: "localhost".into(),
            port: 5433,
            user: "admin".into(),
            password: String::new(),
            dbname: "mydatabase".into(),
            sslmode: "disable".into(),
        }
    }
}

impl PostgresConfig {
    /// libpq-style key/value connection string.
    pub fn connection_string(&self) -> String {
        let mut parts = vec![
            format!("host={}", self.host),
            format!("port={}", self.port),
            format!("user={}", self.user),
        ];
        if !self.password.is_empty() {
            parts.push(format!("password={}", quote_conninfo(&self.password)));
        }
        parts.push(format!("dbname={}", self.dbname));
        parts.push(format!("sslmode={}", self.sslmode));
        parts.join(" ")
    }
}

fn quote_conninfo(value: &str) -> String {
    if value.is_empty() || value.contains([' ', '\'', '\\']) {
        format!("'{}'", value.replace('\\', "\\\\").replace('\'', "\\'"))
    } else {
        value.to_string()
    }
}

/// Which relational backend holds the data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreConfig {
    Sqlite { path: PathBuf },
    Postgres(PostgresConfig),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportSettings {
    pub path: PathBuf,
    pub sheet: Option<String>,
    pub skip_header: bool,
    pub batch_size: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSettings {
    pub spreadsheet_path: PathBuf,
    pub document_path: PathBuf,
    pub order: ExportOrder,
    pub paper: String,
    pub typst_binary: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppSettings {
    pub store: StoreConfig,
    pub import: ImportSettings,
    pub export: ExportSettings,
}

impl AppSettings {
    pub fn from_config(config: &dyn ConfigPort) -> Result<Self, EtlError> {
        Ok(Self {
            store: store_config(config)?,
            import: import_settings(config)?,
            export: export_settings(config)?,
        })
    }
}

fn non_empty(config: &dyn ConfigPort, section: &str, key: &str) -> Option<String> {
    config
        .get_string(section, key)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn invalid(section: &str, key: &str, reason: impl Into<String>) -> EtlError {
    EtlError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: reason.into(),
    }
}

fn store_config(config: &dyn ConfigPort) -> Result<StoreConfig, EtlError> {
    let backend = non_empty(config, "database", "backend").unwrap_or_else(|| "sqlite".into());

    match backend.to_lowercase().as_str() {
        "sqlite" => {
            let path = non_empty(config, "database", "path")
                .unwrap_or_else(|| DEFAULT_SQLITE_PATH.to_string());
            Ok(StoreConfig::Sqlite {
                path: PathBuf::from(path),
            })
        }
        "postgres" | "postgresql" => {
            let defaults = PostgresConfig::default();
            let port = config.get_int("database", "port", i64::from(defaults.port));
            let port = u16::try_from(port)
                .ok()
                .filter(|p| *p > 0)
                .ok_or_else(|| invalid("database", "port", "port must be between 1 and 65535"))?;

            Ok(StoreConfig::Postgres(PostgresConfig {
                host: non_empty(config, "database", "host").unwrap_or(defaults.host),
                port,
                user: non_empty(config, "database", "user").unwrap_or(defaults.user),
                password: config
                    .get_string("database", "password")
                    .unwrap_or(defaults.password),
                dbname: non_empty(config, "database", "dbname").unwrap_or(defaults.dbname),
                sslmode: non_empty(config, "database", "sslmode").unwrap_or(defaults.sslmode),
            }))
        }
        other => Err(invalid(
            "database",
            "backend",
            format!("unknown backend '{other}' (expected sqlite or postgres)"),
        )),
    }
}

fn import_settings(config: &dyn ConfigPort) -> Result<ImportSettings, EtlError> {
    let batch_size = config.get_int("import", "batch_size", DEFAULT_BATCH_SIZE as i64);
    if batch_size <= 0 {
        return Err(invalid("import", "batch_size", "batch_size must be positive"));
    }

    Ok(ImportSettings {
        path: PathBuf::from(
            non_empty(config, "import", "path").unwrap_or_else(|| DEFAULT_IMPORT_PATH.into()),
        ),
        sheet: non_empty(config, "import", "sheet"),
        skip_header: config.get_bool("import", "skip_header", true),
        batch_size: batch_size as usize,
    })
}

fn export_settings(config: &dyn ConfigPort) -> Result<ExportSettings, EtlError> {
    let order = match non_empty(config, "export", "order") {
        Some(value) => value
            .parse::<ExportOrder>()
            .map_err(|reason| invalid("export", "order", reason))?,
        None => ExportOrder::default(),
    };

    Ok(ExportSettings {
        spreadsheet_path: PathBuf::from(
            non_empty(config, "export", "spreadsheet_path")
                .unwrap_or_else(|| DEFAULT_SPREADSHEET_PATH.into()),
        ),
        document_path: PathBuf::from(
            non_empty(config, "export", "document_path")
                .unwrap_or_else(|| DEFAULT_DOCUMENT_PATH.into()),
        ),
        order,
        paper: non_empty(config, "export", "paper").unwrap_or_else(|| "a4".into()),
        typst_binary: non_empty(config, "export", "typst_binary").map(PathBuf::from),
    })
}

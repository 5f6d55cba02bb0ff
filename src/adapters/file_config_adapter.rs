//! INI file configuration adapter.

use crate::ports::config_port::ConfigPort;
use configparser::ini::Ini;
use std::path::Path;

pub struct FileConfigAdapter {
    config: Ini,
}

impl FileConfigAdapter {
    pub fn from_file<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
        let mut config = Ini::new();
        config.load(path).map_err(std::io::Error::other)?;
        Ok(Self { config })
    }

    #[cfg(test)]
    fn from_string(content: &str) -> Result<Self, String> {
        let mut config = Ini::new();
        config.read(content.to_string())?;
        Ok(Self { config })
    }
}

impl ConfigPort for FileConfigAdapter {
    fn get_string(&self, section: &str, key: &str) -> Option<String> {
        self.config.get(section, key)
    }

    fn get_int(&self, section: &str, key: &str, default: i64) -> i64 {
        self.config
            .getint(section, key)
            .ok()
            .flatten()
            .unwrap_or(default)
    }

    /// Accepts the spellings configparser does: true/false, yes/no, on/off,
    /// t/f, y/n and 1/0.
    fn get_bool(&self, section: &str, key: &str, default: bool) -> bool {
        self.config
            .getboolcoerce(section, key)
            .ok()
            .flatten()
            .unwrap_or(default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", content).unwrap();
        file
    }

    #[test]
    fn from_string_parses_config() {
        let content = r#"
[database]
backend = postgres
host = localhost
port = 5433

[import]
path = sp500_data.xlsx
batch_size = 50
"#;
        let adapter = FileConfigAdapter::from_string(content).unwrap();
        assert_eq!(
            adapter.get_string("database", "backend"),
            Some("postgres".to_string())
        );
        assert_eq!(
            adapter.get_string("import", "path"),
            Some("sp500_data.xlsx".to_string())
        );
        assert_eq!(adapter.get_int("database", "port", 0), 5433);
    }

    #[test]
    fn get_string_returns_none_for_missing_key() {
        let adapter = FileConfigAdapter::from_string("[import]\nbatch_size = 100\n").unwrap();
        assert_eq!(adapter.get_string("import", "missing"), None);
        assert_eq!(adapter.get_string("missing_section", "key"), None);
    }

    #[test]
    fn get_int_returns_default_for_missing() {
        let adapter = FileConfigAdapter::from_string("[import]\n").unwrap();
        assert_eq!(adapter.get_int("import", "batch_size", 50), 50);
    }

    #[test]
    fn get_int_returns_default_for_non_numeric() {
        let adapter = FileConfigAdapter::from_string("[import]\nbatch_size = lots\n").unwrap();
        assert_eq!(adapter.get_int("import", "batch_size", 50), 50);
    }

    #[test]
    fn get_bool_parses_true_and_false_spellings() {
        let adapter =
            FileConfigAdapter::from_string("[export]\na = true\nb = yes\nc = 0\nd = no\nunknown = maybe\n")
                .unwrap();
        assert!(adapter.get_bool("export", "a", false));
        assert!(adapter.get_bool("export", "b", false));
        assert!(!adapter.get_bool("export", "c", true));
        assert!(!adapter.get_bool("export", "d", true));
        assert!(adapter.get_bool("export", "missing", true));
        assert!(adapter.get_bool("export", "unknown", true));
    }

    #[test]
    fn from_file_reads_config() {
        let content = "[export]\ndocument_path = /tmp/report.typ\n";
        let file = create_temp_config(content);
        let adapter = FileConfigAdapter::from_file(file.path()).unwrap();
        assert_eq!(
            adapter.get_string("export", "document_path"),
            Some("/tmp/report.typ".to_string())
        );
    }

    #[test]
    fn from_file_returns_error_for_missing_file() {
        let result = FileConfigAdapter::from_file("/nonexistent/path/config.ini");
        assert!(result.is_err());
    }
}

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

    pub fn from_string(content: &str) -> Result<Self, String> {
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

    fn get_double(&self, section: &str, key: &str, default: f64) -> f64 {
        self.config
            .getfloat(section, key)
            .ok()
            .flatten()
            .unwrap_or(default)
    }

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

    const SAMPLE: &str = r#"
[data]
path = ./data
code = 2330

[strategy]
kind = breakout
buy_change_threshold = 0.07
hold_threshold = 20

[sweep]
top = 10
parallel = true
"#;

    #[test]
    fn from_string_parses_sections() {
        let adapter = FileConfigAdapter::from_string(SAMPLE).unwrap();
        assert_eq!(
            adapter.get_string("data", "code"),
            Some("2330".to_string())
        );
        assert_eq!(
            adapter.get_string("strategy", "kind"),
            Some("breakout".to_string())
        );
    }

    #[test]
    fn get_string_missing_key_is_none() {
        let adapter = FileConfigAdapter::from_string(SAMPLE).unwrap();
        assert_eq!(adapter.get_string("data", "missing"), None);
        assert_eq!(adapter.get_string("missing_section", "path"), None);
    }

    #[test]
    fn get_int_value_and_defaults() {
        let adapter = FileConfigAdapter::from_string(SAMPLE).unwrap();
        assert_eq!(adapter.get_int("strategy", "hold_threshold", 0), 20);
        assert_eq!(adapter.get_int("sweep", "missing", 42), 42);
        // Non-numeric values fall back to the default too.
        assert_eq!(adapter.get_int("strategy", "kind", 7), 7);
    }

    #[test]
    fn get_double_value_and_defaults() {
        let adapter = FileConfigAdapter::from_string(SAMPLE).unwrap();
        assert_eq!(
            adapter.get_double("strategy", "buy_change_threshold", 0.0),
            0.07
        );
        assert_eq!(adapter.get_double("sweep", "missing", 9.5), 9.5);
    }

    #[test]
    fn get_bool_recognized_spellings() {
        let adapter =
            FileConfigAdapter::from_string("[sweep]\na = true\nb = yes\nc = 1\nd = no\n").unwrap();
        assert!(adapter.get_bool("sweep", "a", false));
        assert!(adapter.get_bool("sweep", "b", false));
        assert!(adapter.get_bool("sweep", "c", false));
        assert!(!adapter.get_bool("sweep", "d", true));
        assert!(adapter.get_bool("sweep", "missing", true));
    }

    #[test]
    fn from_file_reads_config() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{SAMPLE}").unwrap();
        let adapter = FileConfigAdapter::from_file(file.path()).unwrap();
        assert!(adapter.get_bool("sweep", "parallel", false));
        assert_eq!(adapter.get_int("sweep", "top", 0), 10);
    }

    #[test]
    fn from_file_missing_file_fails() {
        assert!(FileConfigAdapter::from_file("/nonexistent/tradesweep.ini").is_err());
    }
}

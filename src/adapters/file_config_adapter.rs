//! INI file configuration adapter.
//!
//! Keys and section names are case-sensitive so custom indicator sections
//! (`[indicator.MY_TREND]`) keep the indicator's spelling.

use crate::ports::config_port::ConfigPort;
use configparser::ini::Ini;
use std::path::Path;

#[derive(Debug)]
pub struct FileConfigAdapter {
    config: Ini,
}

impl FileConfigAdapter {
    pub fn from_file<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
        let mut config = Ini::new_cs();
        config.load(path).map_err(std::io::Error::other)?;
        Ok(Self { config })
    }

    pub fn from_string(content: &str) -> Result<Self, String> {
        let mut config = Ini::new_cs();
        config.read(content.to_string())?;
        Ok(Self { config })
    }
}

impl ConfigPort for FileConfigAdapter {
    fn get_string(&self, section: &str, key: &str) -> Option<String> {
        self.config.get(section, key)
    }

    fn sections(&self) -> Vec<String> {
        let mut sections = self.config.sections();
        sections.sort();
        sections
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
[dsl]
language_id = sigma-dsl
operands = RSI_14, PNL_PCT

[analysis]
period = week
"#;
        let adapter = FileConfigAdapter::from_string(content).unwrap();
        assert_eq!(
            adapter.get_string("dsl", "language_id"),
            Some("sigma-dsl".to_string())
        );
        assert_eq!(
            adapter.get_string("dsl", "operands"),
            Some("RSI_14, PNL_PCT".to_string())
        );
        assert_eq!(adapter.get_string("analysis", "period"), Some("week".to_string()));
    }

    #[test]
    fn get_string_returns_none_for_missing_key() {
        let adapter = FileConfigAdapter::from_string("[dsl]\noperands = A\n").unwrap();
        assert_eq!(adapter.get_string("dsl", "missing"), None);
        assert_eq!(adapter.get_string("missing_section", "key"), None);
    }

    #[test]
    fn keys_are_case_sensitive() {
        let adapter =
            FileConfigAdapter::from_string("[indicator.MyTrend]\nparams = a\n").unwrap();
        assert_eq!(
            adapter.get_string("indicator.MyTrend", "params"),
            Some("a".to_string())
        );
        assert_eq!(adapter.get_string("indicator.mytrend", "params"), None);
    }

    #[test]
    fn sections_are_sorted() {
        let adapter = FileConfigAdapter::from_string(
            "[indicator.B]\nparams = x\n[dsl]\noperands = A\n[indicator.A]\nparams =\n",
        )
        .unwrap();
        assert_eq!(
            adapter.sections(),
            vec!["dsl".to_string(), "indicator.A".to_string(), "indicator.B".to_string()]
        );
    }

    #[test]
    fn debug_output_names_adapter() {
        let adapter = FileConfigAdapter::from_string("[dsl]\noperands = A\n").unwrap();
        assert!(format!("{:?}", adapter).starts_with("FileConfigAdapter"));
    }

    #[test]
    fn from_file_reads_config() {
        let file = create_temp_config("[data]\ndir = /tmp/runs\n");
        let adapter = FileConfigAdapter::from_file(file.path()).unwrap();
        assert_eq!(adapter.get_string("data", "dir"), Some("/tmp/runs".to_string()));
    }

    #[test]
    fn from_file_returns_error_for_missing_file() {
        let result = FileConfigAdapter::from_file("/nonexistent/path/config.ini");
        assert!(result.is_err());
    }
}

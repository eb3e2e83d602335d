use crate::core::pipeline_sequence::DEFAULT_INPUT_MARKER;
use crate::core::ConfigProvider;
use crate::domain::model::OutputFormat;
use crate::utils::error::{EtlError, Result};
use crate::utils::validation::{
    validate_non_empty_string, validate_output_formats, validate_path, validate_required_field,
    Validate,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub pipeline: PipelineConfig,
    pub source: SourceConfig,
    pub load: LoadConfig,
    pub monitoring: Option<MonitoringConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub name: String,
    pub description: Option<String>,
    pub version: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    pub path: Option<String>,
    pub multiple_inputs: Option<bool>,
    pub input_marker: Option<String>,
    pub skip_blank_lines: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadConfig {
    pub output_path: String,
    pub output_formats: Vec<String>,
    pub compression: Option<CompressionConfig>,
    pub filenames: Option<FilenameConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompressionConfig {
    pub enabled: bool,
    pub filename: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilenameConfig {
    pub txt: Option<String>,
    pub csv: Option<String>,
    pub json: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringConfig {
    pub enabled: bool,
    pub log_level: Option<String>,
    pub log_format: Option<String>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(EtlError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| EtlError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${INPUT_DIR})；未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| EtlError::ConfigValidationError {
            field: "environment".to_string(),
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        let input = validate_required_field("source.path", &self.source.path)?;
        validate_path("source.path", input)?;
        validate_path("load.output_path", &self.load.output_path)?;
        validate_output_formats("load.output_formats", &self.load.output_formats)?;

        if let Some(marker) = &self.source.input_marker {
            validate_non_empty_string("source.input_marker", marker)?;
        }

        if let Some(compression) = self.load.compression.as_ref().filter(|c| c.enabled) {
            validate_non_empty_string("load.compression.filename", &compression.filename)?;
        }

        Ok(())
    }

    pub fn monitoring_enabled(&self) -> bool {
        self.monitoring.as_ref().map(|m| m.enabled).unwrap_or(false)
    }

    pub fn verbose_logging(&self) -> bool {
        self.monitoring
            .as_ref()
            .and_then(|m| m.log_level.as_deref())
            .map(|level| level.eq_ignore_ascii_case("debug") || level.eq_ignore_ascii_case("trace"))
            .unwrap_or(false)
    }

    pub fn json_logging(&self) -> bool {
        self.monitoring
            .as_ref()
            .and_then(|m| m.log_format.as_deref())
            .map(|format| format.eq_ignore_ascii_case("json"))
            .unwrap_or(false)
    }

    fn join_output(&self, filename: &str) -> String {
        Path::new(&self.load.output_path)
            .join(filename)
            .to_string_lossy()
            .into_owned()
    }
}

impl ConfigProvider for TomlConfig {
    fn input_path(&self) -> &str {
        self.source.path.as_deref().unwrap_or_default()
    }

    fn output_formats(&self) -> Vec<OutputFormat> {
        let mut formats = Vec::new();
        for format in self
            .load
            .output_formats
            .iter()
            .filter_map(|name| OutputFormat::from_name(name))
        {
            if !formats.contains(&format) {
                formats.push(format);
            }
        }
        formats
    }

    fn output_file(&self, format: OutputFormat) -> String {
        let configured = self.load.filenames.as_ref().and_then(|names| match format {
            OutputFormat::Txt => names.txt.clone(),
            OutputFormat::Csv => names.csv.clone(),
            OutputFormat::Json => names.json.clone(),
        });
        let filename = configured.unwrap_or_else(|| format!("OUTPUT.{}", format.extension()));
        self.join_output(&filename)
    }

    fn multiple_inputs(&self) -> bool {
        self.source.multiple_inputs.unwrap_or(false)
    }

    fn input_marker(&self) -> &str {
        self.source
            .input_marker
            .as_deref()
            .unwrap_or(DEFAULT_INPUT_MARKER)
    }

    fn skip_blank_lines(&self) -> bool {
        self.source.skip_blank_lines.unwrap_or(false)
    }

    fn archive_file(&self) -> Option<String> {
        self.load
            .compression
            .as_ref()
            .filter(|c| c.enabled)
            .map(|c| self.join_output(&c.filename))
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const BASIC: &str = r#"
[pipeline]
name = "weekly-overlap"
version = "1.0.0"

[source]
path = "INPUT.txt"

[load]
output_path = "./out"
output_formats = ["txt", "json"]
"#;

    #[test]
    fn test_parse_basic_toml_config() {
        let config = TomlConfig::from_toml_str(BASIC).unwrap();

        assert_eq!(config.pipeline.name, "weekly-overlap");
        assert_eq!(config.input_path(), "INPUT.txt");
        assert_eq!(config.output_formats(), vec![OutputFormat::Txt, OutputFormat::Json]);
        assert_eq!(config.output_file(OutputFormat::Json), "./out/OUTPUT.json");
        assert_eq!(config.input_marker(), "INPUT:");
        assert!(!config.multiple_inputs());
        assert!(!config.skip_blank_lines());
        assert!(config.archive_file().is_none());
        assert!(!config.monitoring_enabled());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_full_toml_config() {
        let toml_content = r#"
[pipeline]
name = "multi"
description = "Several weeks in one file"
version = "2.0"

[source]
path = "MULTIPLE_INPUTS.txt"
multiple_inputs = true
input_marker = "WEEK:"
skip_blank_lines = true

[load]
output_path = "results"
output_formats = ["txt", "csv"]

[load.compression]
enabled = true
filename = "weeks.zip"

[load.filenames]
txt = "MULTIPLE_OUTPUTS.txt"

[monitoring]
enabled = true
log_level = "debug"
log_format = "json"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();

        assert!(config.multiple_inputs());
        assert_eq!(config.input_marker(), "WEEK:");
        assert!(config.skip_blank_lines());
        assert_eq!(config.output_file(OutputFormat::Txt), "results/MULTIPLE_OUTPUTS.txt");
        assert_eq!(config.output_file(OutputFormat::Csv), "results/OUTPUT.csv");
        assert_eq!(config.archive_file().as_deref(), Some("results/weeks.zip"));
        assert!(config.monitoring_enabled());
        assert!(config.verbose_logging());
        assert!(config.json_logging());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("SCHEDULE_ETL_TEST_INPUT", "from-env.txt");

        let toml_content = r#"
[pipeline]
name = "test"
version = "1.0"

[source]
path = "${SCHEDULE_ETL_TEST_INPUT}"

[load]
output_path = "./output"
output_formats = ["txt"]
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.input_path(), "from-env.txt");

        std::env::remove_var("SCHEDULE_ETL_TEST_INPUT");
    }

    #[test]
    fn test_unknown_env_var_is_kept() {
        let config = TomlConfig::from_toml_str(
            &BASIC.replace("INPUT.txt", "${SCHEDULE_ETL_SURELY_UNSET}"),
        )
        .unwrap();
        assert_eq!(config.input_path(), "${SCHEDULE_ETL_SURELY_UNSET}");
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let unsupported = TomlConfig::from_toml_str(&BASIC.replace("\"json\"", "\"xml\"")).unwrap();
        assert!(unsupported.validate().is_err());

        let missing_path = TomlConfig::from_toml_str(&BASIC.replace("path = \"INPUT.txt\"", "")).unwrap();
        assert!(matches!(
            missing_path.validate(),
            Err(EtlError::MissingConfigError { .. })
        ));

        let empty_marker = TomlConfig::from_toml_str(
            &BASIC.replace("path = \"INPUT.txt\"", "path = \"INPUT.txt\"\ninput_marker = \"\""),
        )
        .unwrap();
        assert!(empty_marker.validate().is_err());
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let err = TomlConfig::from_toml_str("[pipeline\nname=").unwrap_err();
        assert!(matches!(err, EtlError::ConfigValidationError { .. }));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(BASIC.as_bytes()).unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.pipeline.name, "weekly-overlap");
    }
}

use std::fmt;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::PopularPagesError;

pub const ENV_KEY_FILE_LOCATION: &str = "KEY_FILE_LOCATION";
pub const ENV_VIEW_ID: &str = "VIEW_ID";
pub const ENV_OUTPUT_FILE_LOCATION: &str = "OUTPUT_FILE_LOCATION";
pub const ENV_OUTPUT_FORMAT: &str = "OUTPUT_FORMAT";
pub const ENV_MAX_SIZE: &str = "MAX_SIZE";

const DEFAULT_MAX_SIZE: u32 = 100;

/// 出力形式
///
/// `json` / `yaml` (`yml`) 以外のセレクタはすべて `Stdout` にフォールバックする。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    Json,
    Yaml,
    #[default]
    Stdout,
}

impl OutputFormat {
    /// セレクタは完全一致で判定する
    pub fn from_selector(selector: &str) -> Self {
        match selector {
            "json" => OutputFormat::Json,
            "yaml" | "yml" => OutputFormat::Yaml,
            _ => OutputFormat::Stdout,
        }
    }

    /// ファイルに書き出す形式かどうか
    pub fn writes_file(&self) -> bool {
        matches!(self, OutputFormat::Json | OutputFormat::Yaml)
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Yaml => write!(f, "yaml"),
            OutputFormat::Stdout => write!(f, "stdout"),
        }
    }
}

/// `.env` ファイルを環境変数に読み込む
///
/// ファイルが無いのは正常。既存の環境変数は上書きしない。
pub fn load_env_file(path: impl AsRef<Path>) -> Result<(), PopularPagesError> {
    let path = path.as_ref();
    match dotenvy::from_path(path) {
        Ok(()) => {
            debug!("Loaded environment from {}", path.display());
            Ok(())
        }
        Err(e) if e.not_found() => Ok(()),
        Err(e) => Err(PopularPagesError::Config(format!(
            "{} を読み込めません: {}",
            path.display(),
            e
        ))),
    }
}

#[derive(Debug, Clone)]
pub struct PopularPagesConfig {
    pub key_file_location: PathBuf,
    pub view_id: String,
    pub output_path: Option<PathBuf>,
    pub output_format: OutputFormat,
    pub max_size: u32,
}

impl Default for PopularPagesConfig {
    fn default() -> Self {
        Self {
            key_file_location: PathBuf::new(),
            view_id: String::new(),
            output_path: None,
            output_format: OutputFormat::Stdout,
            max_size: DEFAULT_MAX_SIZE,
        }
    }
}

impl PopularPagesConfig {
    pub fn new(view_id: impl Into<String>, key_file_location: impl Into<PathBuf>) -> Self {
        Self {
            view_id: view_id.into(),
            key_file_location: key_file_location.into(),
            ..Default::default()
        }
    }

    pub fn with_output_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_path = Some(path.into());
        self
    }

    pub fn with_output_format(mut self, format: OutputFormat) -> Self {
        self.output_format = format;
        self
    }

    pub fn with_max_size(mut self, max_size: u32) -> Self {
        self.max_size = max_size;
        self
    }

    /// プロセス環境変数から設定を読み込む（`.env` があれば先に読み込む）
    pub fn from_env() -> Result<Self, PopularPagesError> {
        load_env_file(".env")?;
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 任意のキー検索関数から設定を構築する
    pub fn from_lookup<F>(lookup: F) -> Result<Self, PopularPagesError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key)
                .filter(|v| !v.is_empty())
                .ok_or_else(|| PopularPagesError::Config(format!("{} が設定されていません", key)))
        };

        let key_file_location = PathBuf::from(required(ENV_KEY_FILE_LOCATION)?);
        let view_id = required(ENV_VIEW_ID)?;

        let raw_max_size = required(ENV_MAX_SIZE)?;
        let max_size = raw_max_size
            .trim()
            .parse::<u32>()
            .ok()
            .filter(|n| *n > 0)
            .ok_or_else(|| {
                PopularPagesError::Config(format!(
                    "{} は正の整数である必要があります: {:?}",
                    ENV_MAX_SIZE, raw_max_size
                ))
            })?;

        let output_format = lookup(ENV_OUTPUT_FORMAT)
            .map(|s| OutputFormat::from_selector(&s))
            .unwrap_or_default();

        let output_path = lookup(ENV_OUTPUT_FILE_LOCATION)
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);

        if output_format.writes_file() && output_path.is_none() {
            return Err(PopularPagesError::Config(format!(
                "{} 出力には {} が必要です",
                output_format, ENV_OUTPUT_FILE_LOCATION
            )));
        }

        Ok(Self {
            key_file_location,
            view_id,
            output_path,
            output_format,
            max_size,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_output_format_selector() {
        assert_eq!(OutputFormat::from_selector("json"), OutputFormat::Json);
        assert_eq!(OutputFormat::from_selector("yaml"), OutputFormat::Yaml);
        assert_eq!(OutputFormat::from_selector("yml"), OutputFormat::Yaml);
        assert_eq!(OutputFormat::from_selector("JSON"), OutputFormat::Stdout);
        assert_eq!(OutputFormat::from_selector("Yaml"), OutputFormat::Stdout);
        assert_eq!(OutputFormat::from_selector(" yml "), OutputFormat::Stdout);
        assert_eq!(OutputFormat::from_selector(" YAML "), OutputFormat::Stdout);
        assert_eq!(OutputFormat::from_selector("csv"), OutputFormat::Stdout);
        assert_eq!(OutputFormat::from_selector(""), OutputFormat::Stdout);
    }

    #[test]
    fn test_load_env_file_missing_is_ok() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_env_file(dir.path().join(".env")).is_ok());
    }

    #[test]
    fn test_load_env_file_reads_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".env");
        std::fs::write(&path, "POPULAR_PAGES_TEST_ENV_VALUE=from-dotenv\n").unwrap();

        load_env_file(&path).unwrap();
        assert_eq!(
            std::env::var("POPULAR_PAGES_TEST_ENV_VALUE").as_deref(),
            Ok("from-dotenv")
        );
    }

    #[test]
    fn test_load_env_file_malformed_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".env");
        std::fs::write(&path, "NOT VALID LINE\n").unwrap();

        let err = load_env_file(&path).unwrap_err();
        assert!(matches!(err, PopularPagesError::Config(msg) if msg.contains(".env")));
    }

    #[test]
    fn test_config_builder() {
        let config = PopularPagesConfig::new("12345", "/tmp/key.json")
            .with_output_path("/tmp/popular.json")
            .with_output_format(OutputFormat::Json)
            .with_max_size(25);

        assert_eq!(config.view_id, "12345");
        assert_eq!(config.key_file_location, PathBuf::from("/tmp/key.json"));
        assert_eq!(config.output_path, Some(PathBuf::from("/tmp/popular.json")));
        assert_eq!(config.output_format, OutputFormat::Json);
        assert_eq!(config.max_size, 25);
    }

    #[test]
    fn test_from_lookup_full() {
        let config = PopularPagesConfig::from_lookup(lookup_from(&[
            (ENV_KEY_FILE_LOCATION, "key.json"),
            (ENV_VIEW_ID, "987"),
            (ENV_OUTPUT_FILE_LOCATION, "out.yml"),
            (ENV_OUTPUT_FORMAT, "yml"),
            (ENV_MAX_SIZE, "50"),
        ]))
        .unwrap();

        assert_eq!(config.view_id, "987");
        assert_eq!(config.output_format, OutputFormat::Yaml);
        assert_eq!(config.output_path, Some(PathBuf::from("out.yml")));
        assert_eq!(config.max_size, 50);
    }

    #[test]
    fn test_from_lookup_unknown_format_falls_back_to_stdout() {
        let config = PopularPagesConfig::from_lookup(lookup_from(&[
            (ENV_KEY_FILE_LOCATION, "key.json"),
            (ENV_VIEW_ID, "987"),
            (ENV_OUTPUT_FORMAT, "xml"),
            (ENV_MAX_SIZE, "10"),
        ]))
        .unwrap();

        assert_eq!(config.output_format, OutputFormat::Stdout);
        assert!(config.output_path.is_none());
    }

    #[test]
    fn test_from_lookup_missing_view_id() {
        let err = PopularPagesConfig::from_lookup(lookup_from(&[
            (ENV_KEY_FILE_LOCATION, "key.json"),
            (ENV_MAX_SIZE, "10"),
        ]))
        .unwrap_err();

        assert!(matches!(err, PopularPagesError::Config(msg) if msg.contains(ENV_VIEW_ID)));
    }

    #[test]
    fn test_from_lookup_rejects_bad_max_size() {
        for bad in ["ten", "0", "-5"] {
            let err = PopularPagesConfig::from_lookup(lookup_from(&[
                (ENV_KEY_FILE_LOCATION, "key.json"),
                (ENV_VIEW_ID, "987"),
                (ENV_MAX_SIZE, bad),
            ]))
            .unwrap_err();
            assert!(matches!(err, PopularPagesError::Config(_)), "{}", bad);
        }
    }

    #[test]
    fn test_from_lookup_file_format_requires_path() {
        let err = PopularPagesConfig::from_lookup(lookup_from(&[
            (ENV_KEY_FILE_LOCATION, "key.json"),
            (ENV_VIEW_ID, "987"),
            (ENV_OUTPUT_FORMAT, "json"),
            (ENV_MAX_SIZE, "10"),
        ]))
        .unwrap_err();

        assert!(matches!(err, PopularPagesError::Config(msg) if msg.contains(ENV_OUTPUT_FILE_LOCATION)));
    }
}

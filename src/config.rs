use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::ConfigError;
use crate::models::{ConversionJob, ConversionOptions, OutputKind, TextEncoding};

/// 默认输出目录名（位于用户下载目录下）
pub const OUTPUT_FOLDER_NAME: &str = "WordConverter_Output";

/// 默认配置文件
pub const DEFAULT_SETTINGS_FILE: &str = "converter.toml";

/// 程序配置
#[derive(Clone, Debug)]
pub struct Config {
    /// 源目录
    pub source_folder: Option<PathBuf>,
    /// 目标目录
    pub target_folder: PathBuf,
    /// 输出格式
    pub output_format: OutputKind,
    /// PDF 质量（50-100）
    pub pdf_quality: u8,
    /// TXT 编码
    pub txt_encoding: TextEncoding,
    /// 是否覆盖已存在的文件
    pub overwrite_files: bool,
    /// soffice 可执行文件
    pub soffice_path: PathBuf,
    /// 单次外部命令超时（秒）
    pub command_timeout_secs: u64,
    /// 是否显示详细日志
    pub verbose_logging: bool,
    /// 转换报告文件
    pub output_log_file: String,
}

/// 配置文件内容，所有字段可选
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub source_folder: Option<PathBuf>,
    pub target_folder: Option<PathBuf>,
    pub output_format: Option<OutputKind>,
    pub pdf_quality: Option<u8>,
    pub txt_encoding: Option<TextEncoding>,
    pub overwrite_files: Option<bool>,
    pub soffice_path: Option<PathBuf>,
    pub command_timeout_secs: Option<u64>,
    pub verbose_logging: Option<bool>,
    pub output_log_file: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source_folder: None,
            target_folder: default_target_folder(),
            output_format: OutputKind::Pdf,
            pdf_quality: 90,
            txt_encoding: TextEncoding::Utf8,
            overwrite_files: false,
            soffice_path: PathBuf::from("soffice"),
            command_timeout_secs: 120,
            verbose_logging: false,
            output_log_file: "conversion_report.txt".to_string(),
        }
    }
}

impl Config {
    /// 默认值 + 环境变量
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_env();
        config
    }

    /// 默认值 ← 配置文件（可选） ← 环境变量
    pub fn load() -> Result<Self, ConfigError> {
        let settings_path = std::env::var("CONFIG_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_SETTINGS_FILE));

        if !settings_path.exists() {
            return Ok(Self::from_env());
        }

        let mut config = Self::default();
        config.apply_settings(Settings::from_file(&settings_path)?);
        config.apply_env();
        Ok(config)
    }

    pub fn apply_settings(&mut self, settings: Settings) {
        if let Some(v) = settings.source_folder {
            self.source_folder = Some(v);
        }
        if let Some(v) = settings.target_folder {
            self.target_folder = v;
        }
        if let Some(v) = settings.output_format {
            self.output_format = v;
        }
        if let Some(v) = settings.pdf_quality {
            self.pdf_quality = ConversionOptions::clamp_quality(v);
        }
        if let Some(v) = settings.txt_encoding {
            self.txt_encoding = v;
        }
        if let Some(v) = settings.overwrite_files {
            self.overwrite_files = v;
        }
        if let Some(v) = settings.soffice_path {
            self.soffice_path = v;
        }
        if let Some(v) = settings.command_timeout_secs {
            self.command_timeout_secs = v;
        }
        if let Some(v) = settings.verbose_logging {
            self.verbose_logging = v;
        }
        if let Some(v) = settings.output_log_file {
            self.output_log_file = v;
        }
    }

    /// 环境变量覆盖；无法解析的值保持原样
    pub fn apply_env(&mut self) {
        let var = |name: &str| std::env::var(name).ok();

        if let Some(v) = var("SOURCE_FOLDER") {
            self.source_folder = Some(PathBuf::from(v));
        }
        if let Some(v) = var("TARGET_FOLDER") {
            self.target_folder = PathBuf::from(v);
        }
        if let Some(v) = var("OUTPUT_FORMAT") {
            self.output_format = OutputKind::parse_or_default(&v);
        }
        if let Some(v) = var("PDF_QUALITY").and_then(|v| v.parse().ok()) {
            self.pdf_quality = ConversionOptions::clamp_quality(v);
        }
        if let Some(v) = var("TXT_ENCODING").and_then(|v| TextEncoding::from_str(&v)) {
            self.txt_encoding = v;
        }
        if let Some(v) = var("OVERWRITE_FILES").and_then(|v| v.parse().ok()) {
            self.overwrite_files = v;
        }
        if let Some(v) = var("SOFFICE_PATH") {
            self.soffice_path = PathBuf::from(v);
        }
        if let Some(v) = var("COMMAND_TIMEOUT_SECS").and_then(|v| v.parse().ok()) {
            self.command_timeout_secs = v;
        }
        if let Some(v) = var("VERBOSE_LOGGING").and_then(|v| v.parse().ok()) {
            self.verbose_logging = v;
        }
        if let Some(v) = var("OUTPUT_LOG_FILE") {
            self.output_log_file = v;
        }
    }

    pub fn options(&self) -> ConversionOptions {
        ConversionOptions {
            pdf_quality: ConversionOptions::clamp_quality(self.pdf_quality),
            txt_encoding: self.txt_encoding,
            overwrite_files: self.overwrite_files,
        }
    }

    /// 生成本次运行的转换任务
    pub fn to_job(&self) -> Result<ConversionJob, ConfigError> {
        let source = self
            .source_folder
            .clone()
            .ok_or(ConfigError::MissingSourceFolder)?;
        Ok(
            ConversionJob::new(source, self.target_folder.clone(), self.output_format)
                .with_options(self.options()),
        )
    }
}

impl Settings {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::SettingsReadFailed {
                path: path.to_path_buf(),
                source: e,
            })?;
        Self::from_toml(&content).map_err(|source| ConfigError::SettingsParseFailed {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }
}

/// `~/Downloads/WordConverter_Output`
fn default_target_folder() -> PathBuf {
    std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .map(|home| PathBuf::from(home).join("Downloads").join(OUTPUT_FOLDER_NAME))
        .unwrap_or_else(|| PathBuf::from(OUTPUT_FOLDER_NAME))
}

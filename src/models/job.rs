use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// 输出格式枚举
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum OutputKind {
    /// 便携文档
    Pdf,
    /// Word 97-2003
    Doc,
    /// Word 2007+（默认）
    #[default]
    Docx,
    /// 富文本
    Rtf,
    /// 纯文本（经 RTF 两步转换）
    Txt,
}

impl OutputKind {
    /// 所有支持的输出格式
    pub const ALL: [OutputKind; 5] = [
        OutputKind::Pdf,
        OutputKind::Doc,
        OutputKind::Docx,
        OutputKind::Rtf,
        OutputKind::Txt,
    ];

    /// 获取标准名称
    pub fn name(self) -> &'static str {
        match self {
            OutputKind::Pdf => "PDF",
            OutputKind::Doc => "DOC",
            OutputKind::Docx => "DOCX",
            OutputKind::Rtf => "RTF",
            OutputKind::Txt => "TXT",
        }
    }

    /// 尝试从字符串解析格式（忽略大小写）
    pub fn from_str(s: &str) -> Option<Self> {
        let s = s.trim().trim_start_matches('.');
        Self::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(s))
    }

    /// 解析格式，无法识别时回退为 DOCX
    pub fn parse_or_default(s: &str) -> Self {
        Self::from_str(s).unwrap_or_default()
    }
}

impl std::fmt::Display for OutputKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// 纯文本输出编码
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum TextEncoding {
    #[default]
    #[serde(rename = "UTF-8")]
    Utf8,
    #[serde(rename = "Latin-1")]
    Latin1,
}

impl TextEncoding {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "utf-8" | "utf8" => Some(TextEncoding::Utf8),
            "latin-1" | "latin1" | "iso-8859-1" => Some(TextEncoding::Latin1),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TextEncoding::Utf8 => "UTF-8",
            TextEncoding::Latin1 => "Latin-1",
        }
    }
}

/// 转换选项
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConversionOptions {
    /// PDF 质量（50-100）
    pub pdf_quality: u8,
    /// TXT 编码
    pub txt_encoding: TextEncoding,
    /// 是否覆盖已存在的目标文件
    pub overwrite_files: bool,
}

impl ConversionOptions {
    pub const MIN_PDF_QUALITY: u8 = 50;
    pub const MAX_PDF_QUALITY: u8 = 100;

    /// 将 PDF 质量限制在有效范围内
    pub fn clamp_quality(quality: u8) -> u8 {
        quality.clamp(Self::MIN_PDF_QUALITY, Self::MAX_PDF_QUALITY)
    }
}

impl Default for ConversionOptions {
    fn default() -> Self {
        Self {
            pdf_quality: 90,
            txt_encoding: TextEncoding::Utf8,
            overwrite_files: false,
        }
    }
}

/// 一次批量转换任务，开始运行后不可变
#[derive(Debug, Clone)]
pub struct ConversionJob {
    pub source_root: PathBuf,
    pub target_root: PathBuf,
    pub output_kind: OutputKind,
    pub options: ConversionOptions,
}

impl ConversionJob {
    pub fn new(
        source_root: impl Into<PathBuf>,
        target_root: impl Into<PathBuf>,
        output_kind: OutputKind,
    ) -> Self {
        Self {
            source_root: source_root.into(),
            target_root: target_root.into(),
            output_kind,
            options: ConversionOptions::default(),
        }
    }

    pub fn with_options(mut self, options: ConversionOptions) -> Self {
        self.options = ConversionOptions {
            pdf_quality: ConversionOptions::clamp_quality(options.pdf_quality),
            ..options
        };
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_output_kind_ignoring_case() {
        assert_eq!(OutputKind::from_str("pdf"), Some(OutputKind::Pdf));
        assert_eq!(OutputKind::from_str(".TXT"), Some(OutputKind::Txt));
        assert_eq!(OutputKind::from_str("odt"), None);
        assert_eq!(OutputKind::parse_or_default("odt"), OutputKind::Docx);
    }

    #[test]
    fn parses_encoding_labels() {
        assert_eq!(TextEncoding::from_str("UTF-8"), Some(TextEncoding::Utf8));
        assert_eq!(TextEncoding::from_str("latin1"), Some(TextEncoding::Latin1));
        assert_eq!(TextEncoding::from_str("cp1252"), None);
    }

    #[test]
    fn job_clamps_pdf_quality() {
        let job = ConversionJob::new("in", "out", OutputKind::Pdf).with_options(ConversionOptions {
            pdf_quality: 20,
            ..Default::default()
        });
        assert_eq!(job.options.pdf_quality, 50);
    }
}

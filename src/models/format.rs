//! 格式策略
//!
//! 输出格式 → (扩展名, 自动化格式代码, 是否需要两步转换) 的固定映射表。
//! 新增格式只需在 `FORMAT_TABLE` 中加一行。

use crate::models::job::OutputKind;

/// 格式规格
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatSpec {
    /// 目标扩展名（不含点）
    pub extension: &'static str,
    /// 自动化服务的格式代码
    pub automation_code: i32,
    /// 是否需要经 RTF 中间文件两步转换
    pub two_stage: bool,
}

pub const PDF_SPEC: FormatSpec = FormatSpec {
    extension: "pdf",
    automation_code: 17,
    two_stage: false,
};

pub const DOC_SPEC: FormatSpec = FormatSpec {
    extension: "doc",
    automation_code: 0,
    two_stage: false,
};

pub const DOCX_SPEC: FormatSpec = FormatSpec {
    extension: "docx",
    automation_code: 12,
    two_stage: false,
};

pub const RTF_SPEC: FormatSpec = FormatSpec {
    extension: "rtf",
    automation_code: 6,
    two_stage: false,
};

pub const TXT_SPEC: FormatSpec = FormatSpec {
    extension: "txt",
    automation_code: 2,
    two_stage: true,
};

/// 默认规格（无法识别时使用）
pub const DEFAULT_SPEC: FormatSpec = DOCX_SPEC;

/// 两步转换的中间格式
pub const INTERMEDIATE_SPEC: FormatSpec = RTF_SPEC;

const FORMAT_TABLE: [(OutputKind, FormatSpec); 5] = [
    (OutputKind::Pdf, PDF_SPEC),
    (OutputKind::Doc, DOC_SPEC),
    (OutputKind::Docx, DOCX_SPEC),
    (OutputKind::Rtf, RTF_SPEC),
    (OutputKind::Txt, TXT_SPEC),
];

/// 根据输出格式获取规格
pub fn resolve(kind: OutputKind) -> FormatSpec {
    FORMAT_TABLE
        .iter()
        .find(|(k, _)| *k == kind)
        .map(|(_, spec)| *spec)
        .unwrap_or(DEFAULT_SPEC)
}

/// 根据原始格式代码获取规格，未知代码回退为 DOCX
pub fn resolve_code(code: i32) -> FormatSpec {
    FORMAT_TABLE
        .iter()
        .find(|(_, spec)| spec.automation_code == code)
        .map(|(_, spec)| *spec)
        .unwrap_or(DEFAULT_SPEC)
}

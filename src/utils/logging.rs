//! 日志工具模块
//!
//! 初始化 tracing，并提供运行横幅和统计输出的辅助函数

use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::models::RunSummary;

/// 初始化日志
///
/// 优先使用 `RUST_LOG`，否则按 `verbose` 选择 debug 或 info 级别。
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    // 测试中可能重复初始化，忽略错误
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// 记录程序启动信息
pub fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - Word 批量转换");
    info!("📄 目标格式: {}", config.output_format);
    info!("📂 输出目录: {}", config.target_folder.display());
    info!(
        "⚙️ PDF 质量: {}% | TXT 编码: {} | 覆盖已有文件: {}",
        config.pdf_quality,
        config.txt_encoding.label(),
        config.overwrite_files
    );
    info!("{}", "=".repeat(60));
}

/// 打印最终统计信息
pub fn print_final_stats(summary: &RunSummary, report_path: &str) {
    info!("\n{}", "=".repeat(60));
    info!("📊 全部处理完成统计");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!("📄 已处理: {}/{}", summary.outcomes(), summary.total);
    info!("✅ 成功: {}/{}", summary.converted, summary.total);
    info!("⏭️ 跳过: {}", summary.skipped);
    info!("🔍 未找到: {}", summary.missing);
    info!("❌ 失败: {}", summary.failed);
    if summary.cancelled > 0 {
        info!("⛔ 已取消: {}", summary.cancelled);
    }
    if let Some(fatal) = &summary.fatal {
        info!("💥 运行中止: {}", fatal);
    }
    info!("{}", "=".repeat(60));
    info!("\n报告已保存至: {}", report_path);
}

/// 截断长文本用于日志显示
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}

use anyhow::Result;
use word_batch_convert::utils::logging;
use word_batch_convert::{App, Config};

#[tokio::main]
async fn main() -> Result<()> {
    // 加载配置
    let mut config = Config::load()?;

    // 第一个命令行参数覆盖源目录
    if let Some(source) = std::env::args_os().nth(1) {
        config.source_folder = Some(source.into());
    }

    // 初始化日志
    logging::init(config.verbose_logging);

    // 初始化并运行应用
    let summary = App::initialize(config).await?.run().await?;

    if summary.fatal.is_some() {
        std::process::exit(1);
    }

    Ok(())
}

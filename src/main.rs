use anyhow::Result;
use gamer_survey::utils::logging;
use gamer_survey::{App, Config};

#[tokio::main]
async fn main() -> Result<()> {
    // 加载配置
    let config = Config::from_env()?;

    // 初始化日志
    logging::init(config.verbose_logging);

    // 缺少密钥时拒绝启动
    config.validate()?;

    // 初始化并运行应用
    App::initialize(config).await?.run().await?;

    Ok(())
}

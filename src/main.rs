use anyhow::Result;
use entry_error_reconcile::utils::logging;
use entry_error_reconcile::{App, Config};

#[tokio::main]
async fn main() -> Result<()> {
    // 初始化日志
    logging::init();

    // 加载配置
    let config = Config::from_env()?;
    logging::set_verbose(config.verbose_logging);

    // 初始化并运行应用
    let _state = App::initialize(config).await?.run().await?;

    Ok(())
}

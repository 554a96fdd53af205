use club_server::{Config, Server, ServerState, init_logger, print_banner};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. 设置环境 (.env) 和日志
    dotenv::dotenv().ok();
    init_logger();

    print_banner();
    tracing::info!("Club server starting...");

    // 2. 加载配置
    let config = Config::from_env()?;
    if !config.is_production() {
        tracing::warn!(environment = %config.environment, "Not running in production mode");
    }

    // 3. 初始化状态: 数据库、迁移、JWT、初始管理员
    let state = ServerState::initialize(&config).await?;

    // 4. 启动 HTTP 服务器
    let server = Server::with_state(config, state);
    if let Err(e) = server.run().await {
        tracing::error!("Server error: {}", e);
        return Err(e.into());
    }

    Ok(())
}

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::config::Config;
use crate::services::LlmEngineFactory;
use crate::utils::logging::log_startup;
use crate::{router, AppState};

/// 应用主结构
pub struct App {
    state: AppState,
}

impl App {
    /// 初始化应用
    pub fn initialize(config: Config) -> Result<Self> {
        log_startup(&config);

        let factory = LlmEngineFactory::new(&config).context("初始化模型客户端工厂失败")?;

        Ok(Self {
            state: AppState::new(config, Arc::new(factory)),
        })
    }

    /// 运行 HTTP 服务，直到收到 Ctrl+C
    pub async fn run(self) -> Result<()> {
        let address = self.state.config.address.clone();
        let listener = TcpListener::bind(&address)
            .await
            .with_context(|| format!("无法监听地址 {}", address))?;
        info!("✓ 服务已启动: http://{}", address);

        let registry = self.state.registry().clone();

        axum::serve(listener, router(self.state))
            .with_graceful_shutdown(shutdown_signal())
            .await
            .context("HTTP 服务异常退出")?;

        // 关闭时清空客户端缓存
        registry.shutdown();
        info!("👋 服务已停止");

        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("⚠️ 无法监听 Ctrl+C 信号: {}", e);
        std::future::pending::<()>().await;
    }
    info!("\n收到退出信号，正在关闭...");
}

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use question_studio::{logger, App, Config};

#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// 监听地址（覆盖配置文件和 BIND_ADDRESS）
    #[arg(short, long, env = "QUESTION_STUDIO_ADDRESS")]
    address: Option<String>,

    /// 可选的 TOML 配置文件
    #[arg(short, long, env = "QUESTION_STUDIO_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // 加载配置
    let mut config = Config::load(args.config.as_deref()).context("加载配置失败")?;
    if let Some(address) = args.address {
        config.address = address;
    }

    // 初始化日志
    logger::init_with(config.verbose_logging);

    // 初始化并运行应用
    App::initialize(config)?.run().await
}

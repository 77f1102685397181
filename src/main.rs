//! Guild Log Relay CLI
//!
//! 把消息编辑/删除事件转成频道内的审计日志通知

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tokio::io::BufReader;
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

use guild_log_relay::{health, run_feed, DestinationRegistry, DiscordHttp, RelayHandler};

#[derive(Parser)]
#[command(name = "glr")]
#[command(about = "Guild Log Relay - 审计日志中继")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 启动 relay：健康端点 + 标准输入事件源
    Run {
        /// 健康检查监听端口
        #[arg(long, default_value = "8080")]
        port: u16,
    },
    /// 检查运行环境（令牌是否就绪），不发起连接
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    // 通过 RUST_LOG 环境变量控制日志级别，默认为 info
    // 例如: RUST_LOG=debug glr run
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("guild_log_relay=info,glr=info"));

    fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run { port } => {
            let token = std::env::var("DISCORD_TOKEN")
                .context("DISCORD_TOKEN environment variable is required")?;

            // 健康端点挂掉不影响 relay 本体
            tokio::spawn(async move {
                if let Err(e) = health::serve(port).await {
                    warn!(error = %e, "Health endpoint stopped");
                }
            });

            let api = Arc::new(DiscordHttp::new(token)?);
            let registry = Arc::new(DestinationRegistry::new());
            let handler = Arc::new(RelayHandler::new(api.clone(), registry.clone()));

            info!("Relay started, reading events from stdin");
            let stats = run_feed(api, registry, handler, BufReader::new(tokio::io::stdin()))
                .await?;
            info!(handled = stats.handled, skipped = stats.skipped, "Relay stopped");
        }
        Commands::Check => {
            match std::env::var("DISCORD_TOKEN") {
                Ok(token) if !token.is_empty() => println!("DISCORD_TOKEN: set"),
                _ => println!("DISCORD_TOKEN: missing"),
            }
        }
    }

    Ok(())
}

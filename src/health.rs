//! 存活探针 - 托管平台健康检查用的最小 HTTP 端点
//!
//! 只认一件事：任何请求都回 200 "Bot is alive"。单路由 axum 应用，
//! accept 层面的瞬时错误由 `axum::serve` 自行消化，不会终止探针。

use anyhow::{Context, Result};
use axum::{response::IntoResponse, routing::get, Router};
use tokio::net::TcpListener;
use tracing::info;

/// 回应体
const BODY: &str = "Bot is alive";

async fn alive() -> impl IntoResponse {
    BODY
}

/// 健康检查路由
pub fn router() -> Router {
    Router::new().route("/", get(alive))
}

/// 绑定端口并一直服务健康检查
pub async fn serve(port: u16) -> Result<()> {
    let listener = TcpListener::bind(("0.0.0.0", port))
        .await
        .with_context(|| format!("Failed to bind health port {}", port))?;
    serve_on(listener).await
}

/// 在已绑定的 listener 上服务（测试可传端口 0 的 listener）
pub async fn serve_on(listener: TcpListener) -> Result<()> {
    let addr = listener
        .local_addr()
        .context("Health listener has no local addr")?;
    info!(%addr, "Health endpoint listening");

    axum::serve(listener, router())
        .await
        .context("Health server stopped")?;
    Ok(())
}

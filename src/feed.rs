//! 事件源适配 - 从网关进程读取事件
//!
//! 网关会话管理在 relay 之外；这里只消费它吐出来的逐行 JSON。每行要么
//! 是一条 `RelayEvent`，要么是一条配置命令。坏行记日志后跳过，EOF 结束。
//!
//! 事件逐条 spawn，不同 guild 的慢抓取互不阻塞（注册表互斥锁保证并发
//! 安全）；配置命令原地执行，保证后续事件一定看到新配置。

use anyhow::Result;
use serde::Deserialize;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::task::JoinSet;
use tracing::{info, warn};

use std::sync::Arc;

use crate::commands::{run_command, ConfigCommand};
use crate::event::RelayEvent;
use crate::handler::RelayHandler;
use crate::platform::ChatApi;
use crate::registry::DestinationRegistry;

/// 一行输入：中继事件或配置命令（按内部 tag 区分）
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum FeedItem {
    Event(RelayEvent),
    Command(ConfigCommand),
}

/// 消费统计（供日志与测试断言）
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FeedStats {
    /// 成功解析并处理的行数
    pub handled: u64,
    /// 解析失败被跳过的行数
    pub skipped: u64,
}

/// 从 reader 逐行消费直到 EOF；返回前等所有在途事件处理完
pub async fn run_feed<A, R>(
    api: Arc<A>,
    registry: Arc<DestinationRegistry>,
    handler: Arc<RelayHandler<A>>,
    reader: R,
) -> Result<FeedStats>
where
    A: ChatApi + 'static,
    R: AsyncBufRead + Unpin,
{
    let mut stats = FeedStats::default();
    let mut lines = reader.lines();
    let mut tasks = JoinSet::new();

    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match serde_json::from_str::<FeedItem>(line) {
            Ok(FeedItem::Event(event)) => {
                let handler = handler.clone();
                tasks.spawn(async move {
                    let outcome = handler.handle(&event).await;
                    info!(guild = %event.guild_id(), ?outcome, "Event processed");
                });
                stats.handled += 1;
            }
            Ok(FeedItem::Command(command)) => {
                let reply = run_command(&api, &registry, command).await;
                // 回执由网关转发给调用者；这里只留日志
                info!(reply = %reply, "Config command processed");
                stats.handled += 1;
            }
            Err(e) => {
                warn!(error = %e, "Malformed feed line, skipping");
                stats.skipped += 1;
            }
        }
    }

    while let Some(joined) = tasks.join_next().await {
        if let Err(e) = joined {
            warn!(error = %e, "Event task failed");
        }
    }

    info!(handled = stats.handled, skipped = stats.skipped, "Feed closed");
    Ok(stats)
}

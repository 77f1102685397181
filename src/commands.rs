//! 配置命令 - 设置 guild 的日志频道
//!
//! 斜杠命令和前缀命令是两个很薄的外壳，核心逻辑统一在 [`configure`]：
//! 校验权限 → 探测可发送性 → 尝试创建 webhook → 写入注册表。
//! webhook 创建失败不是错误，降级为直接发送模式并告知调用者。

use std::sync::Arc;

use serde::Deserialize;
use tracing::{info, warn};

use crate::platform::ChatApi;
use crate::registry::{ChannelId, DestinationRegistry, GuildId};

/// 创建出来的 webhook 显示名
pub const WEBHOOK_NAME: &str = "Guild Log Relay";

/// 配置失败的种类（发回给调用者的短消息，绝不致命）
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// 调用者没有管理权限
    PermissionDenied,
    /// relay 自身无法在目标频道发消息
    CannotPost(ChannelId),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::PermissionDenied => {
                write!(f, "You need the Manage Server permission to do that.")
            }
            ConfigError::CannotPost(channel) => {
                write!(f, "I don't have permission to send messages in <#{}>.", channel)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// 配置成功的结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigureReply {
    /// webhook 创建成功，走 webhook 投递
    WebhookMode { channel_id: ChannelId },
    /// webhook 创建失败，降级为直接发送
    FallbackMode { channel_id: ChannelId },
}

/// 来自网关的配置命令（斜杠和前缀两种入口共用同一负载）
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ConfigCommand {
    /// 设置日志频道
    SetLogChannel {
        guild_id: GuildId,
        channel_id: ChannelId,
        /// 网关侧已经算好的调用者权限
        #[serde(default)]
        invoker_can_manage: bool,
        /// true 表示走的是前缀命令入口
        #[serde(default)]
        legacy: bool,
    },
}

/// 统一的配置入口：两种命令外壳最终状态必须一致，靠共用这一个函数保证
pub async fn configure<A: ChatApi>(
    api: &A,
    registry: &DestinationRegistry,
    guild_id: GuildId,
    channel_id: ChannelId,
    invoker_can_manage: bool,
) -> Result<ConfigureReply, ConfigError> {
    if !invoker_can_manage {
        return Err(ConfigError::PermissionDenied);
    }

    // 探测失败按不能发处理
    let can_post = api.can_post(channel_id).await.unwrap_or(false);
    if !can_post {
        return Err(ConfigError::CannotPost(channel_id));
    }

    match api.create_webhook(channel_id, WEBHOOK_NAME).await {
        Ok(url) => {
            registry.set(guild_id, channel_id, Some(url));
            info!(guild = %guild_id, channel = %channel_id, "Log channel set (webhook mode)");
            Ok(ConfigureReply::WebhookMode { channel_id })
        }
        Err(e) => {
            registry.set(guild_id, channel_id, None);
            warn!(guild = %guild_id, channel = %channel_id, error = %e, "Webhook creation failed, using direct-post mode");
            Ok(ConfigureReply::FallbackMode { channel_id })
        }
    }
}

/// 斜杠命令外壳；返回发回给调用者的短消息文本
pub async fn slash_set_log_channel<A: ChatApi>(
    api: &A,
    registry: &DestinationRegistry,
    guild_id: GuildId,
    channel_id: ChannelId,
    invoker_can_manage: bool,
) -> String {
    match configure(api, registry, guild_id, channel_id, invoker_can_manage).await {
        Ok(ConfigureReply::WebhookMode { channel_id }) => format!(
            "Logging channel set to <#{}>.\nUsing webhook delivery.",
            channel_id
        ),
        Ok(ConfigureReply::FallbackMode { channel_id }) => format!(
            "Logging channel set to <#{}>.\n(Webhook creation failed, using normal messages.)",
            channel_id
        ),
        Err(e) => e.to_string(),
    }
}

/// 前缀命令外壳；措辞不同但注册表状态与斜杠命令完全一致
pub async fn prefix_set_log_channel<A: ChatApi>(
    api: &A,
    registry: &DestinationRegistry,
    guild_id: GuildId,
    channel_id: ChannelId,
    invoker_can_manage: bool,
) -> String {
    match configure(api, registry, guild_id, channel_id, invoker_can_manage).await {
        Ok(ConfigureReply::WebhookMode { channel_id }) => {
            format!("→ Log channel: <#{}>\n→ Webhook delivery on", channel_id)
        }
        Ok(ConfigureReply::FallbackMode { channel_id }) => {
            format!("→ Log channel: <#{}>\n→ Webhook failed, fallback mode", channel_id)
        }
        Err(e) => e.to_string(),
    }
}

/// 执行一条来自网关的配置命令
pub async fn run_command<A: ChatApi>(
    api: &Arc<A>,
    registry: &Arc<DestinationRegistry>,
    command: ConfigCommand,
) -> String {
    match command {
        ConfigCommand::SetLogChannel {
            guild_id,
            channel_id,
            invoker_can_manage,
            legacy,
        } => {
            if legacy {
                prefix_set_log_channel(
                    api.as_ref(),
                    registry.as_ref(),
                    guild_id,
                    channel_id,
                    invoker_can_manage,
                )
                .await
            } else {
                slash_set_log_channel(
                    api.as_ref(),
                    registry.as_ref(),
                    guild_id,
                    channel_id,
                    invoker_can_manage,
                )
                .await
            }
        }
    }
}

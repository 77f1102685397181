//! 投递分发器 - 决定 webhook 还是直接发送，失败时降级
//!
//! 投递链（每步最多尝试一次，无重试、无排队）：
//! 1. 注册表里没有目标 → 该 guild 日志关闭，直接成功返回
//! 2. 频道解析不了 → 配置已过期，同样不算错误
//! 3. 配了 webhook 先走 webhook，任何失败都降级到第 4 步
//! 4. 以 relay 自身身份直接发；再失败就丢弃（刻意的 best-effort 策略）
//!
//! 所有失败都被吸收在这里，`deliver` 永远不向调用方抛错。

use std::sync::Arc;

use tracing::{debug, warn};

use super::payload::NotificationPayload;
use crate::platform::ChatApi;
use crate::registry::{DestinationRegistry, GuildId};

/// 一次投递的结果（类型化，取代到处 catch 的写法）
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryOutcome {
    /// 该 guild 未配置或频道已失效，什么都没发
    Disabled,
    /// 通过 webhook 送达
    SentWebhook,
    /// webhook 缺失或失败，直接发送送达
    SentDirect,
    /// 两条路都失败，事件被丢弃
    Dropped,
}

/// 投递分发器
pub struct DeliveryDispatcher<A: ChatApi> {
    api: Arc<A>,
    registry: Arc<DestinationRegistry>,
}

impl<A: ChatApi> DeliveryDispatcher<A> {
    pub fn new(api: Arc<A>, registry: Arc<DestinationRegistry>) -> Self {
        Self { api, registry }
    }

    /// 投递 payload 到 guild 配置的目标；绝不返回错误
    pub async fn deliver(&self, guild_id: GuildId, payload: &NotificationPayload) -> DeliveryOutcome {
        let Some(dest) = self.registry.get(guild_id) else {
            debug!(guild = %guild_id, "No destination configured, skipping");
            return DeliveryOutcome::Disabled;
        };

        // 过期配置（频道被删、bot 被踢）不是错误
        match self.api.channel_exists(dest.channel_id).await {
            Ok(true) => {}
            Ok(false) => {
                debug!(guild = %guild_id, channel = %dest.channel_id, "Channel unresolvable, skipping");
                return DeliveryOutcome::Disabled;
            }
            Err(e) => {
                warn!(guild = %guild_id, channel = %dest.channel_id, error = %e, "Channel lookup failed, skipping");
                return DeliveryOutcome::Disabled;
            }
        }

        if let Some(webhook_url) = &dest.webhook_url {
            match self.api.execute_webhook(webhook_url, payload).await {
                Ok(()) => {
                    debug!(guild = %guild_id, "Delivered via webhook");
                    return DeliveryOutcome::SentWebhook;
                }
                Err(e) => {
                    // 不重试 webhook，立刻降级
                    warn!(guild = %guild_id, error = %e, "Webhook delivery failed, falling back to direct post");
                }
            }
        }

        match self.api.post_message(dest.channel_id, payload).await {
            Ok(()) => {
                debug!(guild = %guild_id, channel = %dest.channel_id, "Delivered via direct post");
                DeliveryOutcome::SentDirect
            }
            Err(e) => {
                warn!(guild = %guild_id, channel = %dest.channel_id, error = %e, "Direct post failed, dropping event");
                DeliveryOutcome::Dropped
            }
        }
    }
}

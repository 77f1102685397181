//! 平台出站接口
//!
//! `ChatApi` 是 relay 与聊天平台之间唯一的出站缝隙：投递、webhook 管理、
//! 附件抓取都经过它。生产实现见 [`http::DiscordHttp`]，测试用 mock 实现。

pub mod http;

use anyhow::Result;
use async_trait::async_trait;

use crate::notification::payload::NotificationPayload;
use crate::registry::ChannelId;

/// 聊天平台出站调用
#[async_trait]
pub trait ChatApi: Send + Sync {
    /// 频道是否可解析（被删除或 bot 被踢出时为 false）
    async fn channel_exists(&self, channel_id: ChannelId) -> Result<bool>;

    /// relay 自身账号能否往该频道发消息（配置命令用的权限探测）
    async fn can_post(&self, channel_id: ChannelId) -> Result<bool>;

    /// 在频道上创建 webhook，返回含凭证的 URL
    async fn create_webhook(&self, channel_id: ChannelId, name: &str) -> Result<String>;

    /// 通过 webhook 投递 payload（带显示名/头像覆盖）；非 2xx 视为失败
    async fn execute_webhook(&self, url: &str, payload: &NotificationPayload) -> Result<()>;

    /// 以 relay 自身身份直接往频道发 payload
    async fn post_message(&self, channel_id: ChannelId, payload: &NotificationPayload)
        -> Result<()>;

    /// 抓取 URL 的原始字节（附件重新托管用）
    async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>>;
}

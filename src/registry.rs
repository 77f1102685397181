//! 目标注册表 - 每个 guild 的日志投递目标（频道 + 可选 webhook）
//!
//! 内存态存储，进程重启后丢失（刻意保持易失）。没有 delete 操作：
//! 未配置即表示该 guild 的日志功能关闭。

use std::collections::HashMap;
use std::sync::Mutex;

use serde::{Deserialize, Serialize};

/// Guild 标识符
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GuildId(pub u64);

/// 频道标识符
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChannelId(pub u64);

impl std::fmt::Display for GuildId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl std::fmt::Display for ChannelId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// 投递目标 - 一个 guild 配置的日志频道和可选的 webhook
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Destination {
    /// 目标频道 ID
    pub channel_id: ChannelId,
    /// Webhook URL（缺失时降级为普通消息发送）
    pub webhook_url: Option<String>,
}

/// 目标注册表 - guild_id → Destination 的并发安全映射
#[derive(Debug, Default)]
pub struct DestinationRegistry {
    inner: Mutex<HashMap<GuildId, Destination>>,
}

impl DestinationRegistry {
    /// 创建空注册表
    pub fn new() -> Self {
        Self::default()
    }

    /// 写入（覆盖）一个 guild 的投递目标
    pub fn set(&self, guild_id: GuildId, channel_id: ChannelId, webhook_url: Option<String>) {
        let mut map = self.inner.lock().expect("registry lock poisoned");
        map.insert(
            guild_id,
            Destination {
                channel_id,
                webhook_url,
            },
        );
    }

    /// 查询一个 guild 的投递目标；未配置返回 None
    pub fn get(&self, guild_id: GuildId) -> Option<Destination> {
        let map = self.inner.lock().expect("registry lock poisoned");
        map.get(&guild_id).cloned()
    }

    /// 已配置的 guild 数量
    pub fn len(&self) -> usize {
        self.inner.lock().expect("registry lock poisoned").len()
    }

    /// 是否没有任何配置
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

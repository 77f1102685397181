//! 入站事件结构
//!
//! 网关进程把平台事件转成这里定义的 `RelayEvent`，通过事件源（见 `feed`）
//! 投喂给 relay。核心只响应，不主动拉取。

use serde::{Deserialize, Serialize};

use crate::registry::{ChannelId, GuildId};

/// 消息作者
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    /// 用户 ID
    pub id: u64,
    /// 显示名（进 embed 的 author 块，也用于日志）
    pub name: String,
    /// 头像 URL（embed author 块的图标）
    #[serde(default)]
    pub avatar_url: Option<String>,
    /// 是否机器人账号（机器人产生的事件一律忽略）
    #[serde(default)]
    pub bot: bool,
}

/// 被删除消息上的附件引用
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttachmentRef {
    /// 原始文件名
    pub filename: String,
    /// 附件 URL
    pub url: String,
    /// 平台 CDN 缓存 URL（优先用它抓取，消息删除后原始 URL 很快失效）
    #[serde(default)]
    pub proxy_url: Option<String>,
}

/// 中继事件 - 目前只有编辑和删除两种
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RelayEvent {
    /// 消息被编辑
    MessageEdited {
        guild_id: GuildId,
        channel_id: ChannelId,
        message_id: u64,
        author: Author,
        before: String,
        after: String,
    },
    /// 消息被删除
    MessageDeleted {
        guild_id: GuildId,
        channel_id: ChannelId,
        message_id: u64,
        author: Author,
        #[serde(default)]
        attachments: Vec<AttachmentRef>,
    },
}

impl RelayEvent {
    /// 事件所属 guild
    pub fn guild_id(&self) -> GuildId {
        match self {
            RelayEvent::MessageEdited { guild_id, .. } => *guild_id,
            RelayEvent::MessageDeleted { guild_id, .. } => *guild_id,
        }
    }

    /// 事件作者
    pub fn author(&self) -> &Author {
        match self {
            RelayEvent::MessageEdited { author, .. } => author,
            RelayEvent::MessageDeleted { author, .. } => author,
        }
    }
}

/// 消息永久链接
pub fn jump_url(guild_id: GuildId, channel_id: ChannelId, message_id: u64) -> String {
    format!(
        "https://discord.com/channels/{}/{}/{}",
        guild_id, channel_id, message_id
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn human(id: u64) -> Author {
        Author {
            id,
            name: format!("user-{}", id),
            avatar_url: None,
            bot: false,
        }
    }

    #[test]
    fn test_jump_url() {
        assert_eq!(
            jump_url(GuildId(1), ChannelId(2), 3),
            "https://discord.com/channels/1/2/3"
        );
    }

    #[test]
    fn test_guild_id_accessor() {
        let event = RelayEvent::MessageDeleted {
            guild_id: GuildId(9),
            channel_id: ChannelId(8),
            message_id: 7,
            author: human(1),
            attachments: vec![],
        };
        assert_eq!(event.guild_id(), GuildId(9));
    }

    #[test]
    fn test_edited_round_trip() {
        let event = RelayEvent::MessageEdited {
            guild_id: GuildId(1),
            channel_id: ChannelId(2),
            message_id: 3,
            author: human(4),
            before: "foo".to_string(),
            after: "bar".to_string(),
        };

        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("message_edited"));

        let back: RelayEvent = serde_json::from_str(&json).unwrap();
        match back {
            RelayEvent::MessageEdited { before, after, .. } => {
                assert_eq!(before, "foo");
                assert_eq!(after, "bar");
            }
            _ => panic!("expected MessageEdited"),
        }
    }

    #[test]
    fn test_deleted_deserializes_without_optional_fields() {
        // attachments 和 bot 标记缺省时取默认值
        let json = r#"{
            "type": "message_deleted",
            "guild_id": 1,
            "channel_id": 2,
            "message_id": 3,
            "author": {"id": 4, "name": "alice"}
        }"#;

        let event: RelayEvent = serde_json::from_str(json).unwrap();
        match event {
            RelayEvent::MessageDeleted {
                author,
                attachments,
                ..
            } => {
                assert!(!author.bot);
                assert!(author.avatar_url.is_none());
                assert!(attachments.is_empty());
            }
            _ => panic!("expected MessageDeleted"),
        }
    }
}

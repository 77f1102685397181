//! 通知格式化模块 - 将中继事件转换为结构化 payload
//!
//! 纯转换，不做任何网络调用：
//! - Edited：前后内容以 diff 代码块呈现，超过 900 字符截断
//! - Deleted：只带恢复出的附件文件，embed 记录出处
//! - 机器人账号产生的事件、内容未变化的编辑一律返回 None

use tracing::debug;

use super::payload::{FileBlob, NotificationPayload, PayloadKind};
use crate::event::{jump_url, RelayEvent};

/// Before/After 字段的最大字符数
pub const FIELD_MAX_CHARS: usize = 900;

/// 内容截断后为空时的占位文本（绝不渲染空字段）
pub const EMPTY_SENTINEL: &str = "*Empty*";

/// 格式化编辑事件；不满足触发条件时返回 None
pub fn format_edited(event: &RelayEvent) -> Option<NotificationPayload> {
    let RelayEvent::MessageEdited {
        guild_id,
        channel_id,
        message_id,
        author,
        before,
        after,
    } = event
    else {
        return None;
    };

    if author.bot {
        debug!(author = %author.name, "Skipping edit by bot account");
        return None;
    }
    if before == after {
        return None;
    }

    let payload = NotificationPayload::new(PayloadKind::Edited)
        .with_author(author.name.clone(), author.avatar_url.clone())
        .with_field("Channel", format!("<#{}>", channel_id), true)
        .with_field("Author", format!("<@{}>", author.id), true)
        .with_field("Before", diff_field('-', before), false)
        .with_field("After", diff_field('+', after), false)
        .with_field("Message ID", message_id.to_string(), true)
        .with_field("Jump", jump_url(*guild_id, *channel_id, *message_id), true);

    Some(payload)
}

/// 格式化删除事件；`files` 是重新托管成功的附件，为空时返回 None
pub fn format_deleted(event: &RelayEvent, files: Vec<FileBlob>) -> Option<NotificationPayload> {
    let RelayEvent::MessageDeleted {
        guild_id,
        channel_id,
        message_id,
        author,
        ..
    } = event
    else {
        return None;
    };

    if author.bot {
        debug!(author = %author.name, "Skipping deletion by bot account");
        return None;
    }
    if files.is_empty() {
        // 一个附件都没恢复出来就没有可记录的内容
        return None;
    }

    let payload = NotificationPayload::new(PayloadKind::Deleted)
        .with_author(author.name.clone(), author.avatar_url.clone())
        .with_field("Channel", format!("<#{}>", channel_id), true)
        .with_field("Author", format!("<@{}>", author.id), true)
        .with_field("Message ID", message_id.to_string(), true)
        .with_field("Jump", jump_url(*guild_id, *channel_id, *message_id), true)
        .with_files(files);

    Some(payload)
}

/// 生成 diff 代码块字段值，截断到 `FIELD_MAX_CHARS` 字符
///
/// 截断按字符而不是字节，避免切在多字节边界上。
fn diff_field(marker: char, content: &str) -> String {
    let truncated: String = content.chars().take(FIELD_MAX_CHARS).collect();
    if truncated.is_empty() {
        EMPTY_SENTINEL.to_string()
    } else {
        format!("```diff\n{} {}```", marker, truncated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::Author;
    use crate::registry::{ChannelId, GuildId};

    fn edited(author_bot: bool, before: &str, after: &str) -> RelayEvent {
        RelayEvent::MessageEdited {
            guild_id: GuildId(1),
            channel_id: ChannelId(42),
            message_id: 100,
            author: Author {
                id: 7,
                name: "alice".to_string(),
                avatar_url: Some("https://cdn.test/alice.png".to_string()),
                bot: author_bot,
            },
            before: before.to_string(),
            after: after.to_string(),
        }
    }

    fn deleted(author_bot: bool) -> RelayEvent {
        RelayEvent::MessageDeleted {
            guild_id: GuildId(1),
            channel_id: ChannelId(42),
            message_id: 100,
            author: Author {
                id: 7,
                name: "alice".to_string(),
                avatar_url: None,
                bot: author_bot,
            },
            attachments: vec![],
        }
    }

    fn blob(name: &str) -> FileBlob {
        FileBlob {
            filename: name.to_string(),
            bytes: vec![1, 2, 3],
        }
    }

    #[test]
    fn test_edited_basic() {
        let payload = format_edited(&edited(false, "foo", "bar")).unwrap();

        assert_eq!(payload.kind, PayloadKind::Edited);
        let field = |name: &str| {
            payload
                .fields
                .iter()
                .find(|f| f.name == name)
                .unwrap_or_else(|| panic!("missing field {}", name))
                .value
                .clone()
        };
        assert_eq!(field("Channel"), "<#42>");
        assert_eq!(field("Author"), "<@7>");
        assert!(field("Before").contains("- foo"));
        assert!(field("After").contains("+ bar"));
        assert_eq!(field("Message ID"), "100");
        assert_eq!(field("Jump"), "https://discord.com/channels/1/42/100");

        let author = payload.author.as_ref().unwrap();
        assert_eq!(author.name, "alice");
        assert_eq!(
            author.icon_url.as_deref(),
            Some("https://cdn.test/alice.png")
        );
    }

    #[test]
    fn test_edited_unchanged_content_filtered() {
        assert!(format_edited(&edited(false, "same", "same")).is_none());
    }

    #[test]
    fn test_edited_bot_author_filtered() {
        assert!(format_edited(&edited(true, "foo", "bar")).is_none());
    }

    #[test]
    fn test_edited_wrong_variant() {
        assert!(format_edited(&deleted(false)).is_none());
    }

    #[test]
    fn test_truncation_to_900_chars() {
        let long = "x".repeat(1500);
        let payload = format_edited(&edited(false, &long, "short")).unwrap();

        let before = &payload
            .fields
            .iter()
            .find(|f| f.name == "Before")
            .unwrap()
            .value;
        let body: String = "x".repeat(900);
        assert!(before.contains(&body));
        assert!(!before.contains(&"x".repeat(901)));
    }

    #[test]
    fn test_short_content_preserved_verbatim() {
        let payload = format_edited(&edited(false, "short before", "short after")).unwrap();
        let before = &payload
            .fields
            .iter()
            .find(|f| f.name == "Before")
            .unwrap()
            .value;
        assert_eq!(before, "```diff\n- short before```");
    }

    #[test]
    fn test_empty_content_renders_sentinel() {
        let payload = format_edited(&edited(false, "", "now has text")).unwrap();
        let before = &payload
            .fields
            .iter()
            .find(|f| f.name == "Before")
            .unwrap()
            .value;
        assert_eq!(before, EMPTY_SENTINEL);
    }

    #[test]
    fn test_truncation_respects_char_boundaries() {
        // 多字节字符不会被切成半个
        let long = "编".repeat(1000);
        let payload = format_edited(&edited(false, &long, "x")).unwrap();
        let before = &payload
            .fields
            .iter()
            .find(|f| f.name == "Before")
            .unwrap()
            .value;
        assert!(before.contains(&"编".repeat(900)));
    }

    #[test]
    fn test_deleted_with_files() {
        let payload = format_deleted(&deleted(false), vec![blob("cat.png")]).unwrap();

        assert_eq!(payload.kind, PayloadKind::Deleted);
        assert_eq!(payload.files.len(), 1);
        assert_eq!(payload.files[0].filename, "cat.png");
        assert!(payload.fields.iter().any(|f| f.name == "Jump"));
        assert_eq!(payload.author.as_ref().unwrap().name, "alice");
    }

    #[test]
    fn test_deleted_without_files_filtered() {
        assert!(format_deleted(&deleted(false), vec![]).is_none());
    }

    #[test]
    fn test_deleted_bot_author_filtered() {
        assert!(format_deleted(&deleted(true), vec![blob("cat.png")]).is_none());
    }
}

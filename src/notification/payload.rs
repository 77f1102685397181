//! 通知 payload 结构 - 投递给频道的结构化内容
//!
//! Embed 部分走 JSON（标题、颜色、字段、时间戳、footer），文件部分走
//! multipart，两者由 `DeliveryDispatcher` 一起交给出站调用。

use chrono::{DateTime, Utc};
use serde_json::{json, Value};

/// Footer 品牌前缀
pub const FOOTER_BRAND: &str = "Guild Log Relay";

/// 通知类别
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadKind {
    /// 消息被编辑
    Edited,
    /// 带附件的消息被删除
    Deleted,
}

impl PayloadKind {
    /// 类别标题
    pub fn title(&self) -> &'static str {
        match self {
            PayloadKind::Edited => "Message Edited",
            PayloadKind::Deleted => "Attachments Deleted",
        }
    }

    /// 类别颜色（仅视觉区分，具体色值非契约）
    pub fn color(&self) -> u32 {
        match self {
            PayloadKind::Edited => 0xFFD700,
            PayloadKind::Deleted => 0xFF4066,
        }
    }
}

/// Embed 字段（有序）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

impl EmbedField {
    pub fn new(name: impl Into<String>, value: impl Into<String>, inline: bool) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            inline,
        }
    }
}

/// Embed 的 author 块 - 原消息作者的名字和头像
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbedAuthor {
    pub name: String,
    pub icon_url: Option<String>,
}

/// 重新托管后的文件内容
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileBlob {
    /// 原始文件名
    pub filename: String,
    /// 文件字节
    pub bytes: Vec<u8>,
}

/// 通知 payload - 每个事件构造一次，投递后即丢弃
#[derive(Debug, Clone)]
pub struct NotificationPayload {
    pub kind: PayloadKind,
    pub title: String,
    pub color: u32,
    pub timestamp: DateTime<Utc>,
    pub footer: String,
    /// 原消息作者（embed 的 author 块）
    pub author: Option<EmbedAuthor>,
    /// 有序字段序列
    pub fields: Vec<EmbedField>,
    /// 重新托管的附件（仅 Deleted 且至少恢复一个文件时非空）
    pub files: Vec<FileBlob>,
}

impl NotificationPayload {
    /// 创建指定类别的空 payload
    pub fn new(kind: PayloadKind) -> Self {
        let now = Utc::now();
        Self {
            kind,
            title: kind.title().to_string(),
            color: kind.color(),
            timestamp: now,
            footer: format!("{} | {}", FOOTER_BRAND, now.format("%Y-%m-%d %H:%M UTC")),
            author: None,
            fields: Vec::new(),
            files: Vec::new(),
        }
    }

    /// 设置 author 块（链式调用）
    pub fn with_author(mut self, name: impl Into<String>, icon_url: Option<String>) -> Self {
        self.author = Some(EmbedAuthor {
            name: name.into(),
            icon_url,
        });
        self
    }

    /// 追加字段（链式调用）
    pub fn with_field(
        mut self,
        name: impl Into<String>,
        value: impl Into<String>,
        inline: bool,
    ) -> Self {
        self.fields.push(EmbedField::new(name, value, inline));
        self
    }

    /// 设置文件列表（链式调用）
    pub fn with_files(mut self, files: Vec<FileBlob>) -> Self {
        self.files = files;
        self
    }

    /// 生成 embed 的 JSON 表示（不含文件）
    pub fn to_embed_json(&self) -> Value {
        let fields: Vec<Value> = self
            .fields
            .iter()
            .map(|f| {
                json!({
                    "name": f.name,
                    "value": f.value,
                    "inline": f.inline,
                })
            })
            .collect();

        let mut embed = json!({
            "title": self.title,
            "color": self.color,
            "timestamp": self.timestamp.to_rfc3339(),
            "footer": { "text": self.footer },
            "fields": fields,
        });
        if let Some(author) = &self.author {
            embed["author"] = json!({ "name": author.name });
            if let Some(icon_url) = &author.icon_url {
                embed["author"]["icon_url"] = json!(icon_url);
            }
        }
        embed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_titles_and_colors_differ() {
        assert_ne!(PayloadKind::Edited.title(), PayloadKind::Deleted.title());
        assert_ne!(PayloadKind::Edited.color(), PayloadKind::Deleted.color());
    }

    #[test]
    fn test_fields_keep_order() {
        let payload = NotificationPayload::new(PayloadKind::Edited)
            .with_field("Channel", "<#42>", true)
            .with_field("Author", "<@7>", true)
            .with_field("Before", "old", false);

        let names: Vec<&str> = payload.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["Channel", "Author", "Before"]);
    }

    #[test]
    fn test_to_embed_json() {
        let payload =
            NotificationPayload::new(PayloadKind::Edited).with_field("Message ID", "123", true);

        let embed = payload.to_embed_json();
        assert_eq!(embed["title"], "Message Edited");
        assert_eq!(embed["color"], 0xFFD700);
        assert_eq!(embed["fields"][0]["name"], "Message ID");
        assert_eq!(embed["fields"][0]["value"], "123");
        assert_eq!(embed["fields"][0]["inline"], true);
        assert!(embed["timestamp"].as_str().is_some());
        assert!(embed["footer"]["text"]
            .as_str()
            .unwrap()
            .starts_with(FOOTER_BRAND));
    }

    #[test]
    fn test_new_payload_has_no_files() {
        let payload = NotificationPayload::new(PayloadKind::Deleted);
        assert!(payload.files.is_empty());
        assert!(payload.author.is_none());
    }

    #[test]
    fn test_author_block_in_embed_json() {
        let payload = NotificationPayload::new(PayloadKind::Edited)
            .with_author("alice", Some("https://cdn.test/alice.png".to_string()));

        let embed = payload.to_embed_json();
        assert_eq!(embed["author"]["name"], "alice");
        assert_eq!(embed["author"]["icon_url"], "https://cdn.test/alice.png");
    }

    #[test]
    fn test_author_block_without_icon() {
        let payload = NotificationPayload::new(PayloadKind::Edited).with_author("bob", None);

        let embed = payload.to_embed_json();
        assert_eq!(embed["author"]["name"], "bob");
        assert!(embed["author"].get("icon_url").is_none());
    }

    #[test]
    fn test_embed_json_omits_author_when_unset() {
        let embed = NotificationPayload::new(PayloadKind::Deleted).to_embed_json();
        assert!(embed.get("author").is_none());
    }
}

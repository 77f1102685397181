//! Guild Log Relay - 把消息编辑/删除事件转成频道内的审计日志通知

pub mod commands;
pub mod event;
pub mod feed;
pub mod handler;
pub mod health;
pub mod notification;
pub mod platform;
pub mod registry;
pub mod rehost;

pub use commands::{configure, ConfigCommand, ConfigError, ConfigureReply};
pub use event::{jump_url, AttachmentRef, Author, RelayEvent};
pub use feed::{run_feed, FeedItem, FeedStats};
pub use handler::RelayHandler;
pub use notification::{
    DeliveryDispatcher, DeliveryOutcome, EmbedAuthor, EmbedField, FileBlob, NotificationPayload,
    PayloadKind,
};
pub use platform::http::DiscordHttp;
pub use platform::ChatApi;
pub use registry::{ChannelId, Destination, DestinationRegistry, GuildId};
pub use rehost::rehost_attachments;

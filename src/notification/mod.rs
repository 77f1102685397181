//! 通知层 - payload 构造、格式化与投递
//!
//! # 数据流
//! 事件 → `formatter`（+ `rehost` 恢复附件）→ `NotificationPayload` →
//! `DeliveryDispatcher` → webhook 或直接发送
//!
//! payload 构造是纯函数，所有副作用集中在 dispatcher。

pub mod dispatcher;
pub mod formatter;
pub mod payload;

pub use dispatcher::{DeliveryDispatcher, DeliveryOutcome};
pub use formatter::{format_deleted, format_edited, EMPTY_SENTINEL, FIELD_MAX_CHARS};
pub use payload::{EmbedAuthor, EmbedField, FileBlob, NotificationPayload, PayloadKind};

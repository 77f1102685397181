//! 事件处理器 - 事件变体到处理管线的分发表
//!
//! 每种事件对应一个纯格式化函数加一次投递调用；新增事件种类时扩展
//! `RelayEvent` 和这里的 match 分支即可。

use std::sync::Arc;

use tracing::debug;

use crate::event::RelayEvent;
use crate::notification::dispatcher::{DeliveryDispatcher, DeliveryOutcome};
use crate::notification::formatter::{format_deleted, format_edited};
use crate::platform::ChatApi;
use crate::registry::DestinationRegistry;
use crate::rehost::rehost_attachments;

/// 事件处理器
pub struct RelayHandler<A: ChatApi> {
    api: Arc<A>,
    dispatcher: DeliveryDispatcher<A>,
}

impl<A: ChatApi> RelayHandler<A> {
    pub fn new(api: Arc<A>, registry: Arc<DestinationRegistry>) -> Self {
        let dispatcher = DeliveryDispatcher::new(api.clone(), registry);
        Self { api, dispatcher }
    }

    /// 处理一条事件；被过滤掉的事件返回 None，绝不返回错误
    pub async fn handle(&self, event: &RelayEvent) -> Option<DeliveryOutcome> {
        // 机器人账号的事件在抓附件之前就拦掉
        if event.author().bot {
            return None;
        }

        let payload = match event {
            RelayEvent::MessageEdited { .. } => format_edited(event)?,
            RelayEvent::MessageDeleted { attachments, .. } => {
                // 纯文本删除刻意不记录
                if attachments.is_empty() {
                    debug!(guild = %event.guild_id(), "Deleted message has no attachments, skipping");
                    return None;
                }
                let files = rehost_attachments(self.api.as_ref(), attachments).await;
                format_deleted(event, files)?
            }
        };

        Some(self.dispatcher.deliver(event.guild_id(), &payload).await)
    }
}

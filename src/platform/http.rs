//! Discord REST 客户端 - `ChatApi` 的生产实现
//!
//! 所有调用共用一个带 10 秒超时的 reqwest Client。embed 走 JSON，
//! 附件走 multipart（`payload_json` + `files[i]` 部件）。

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

use super::ChatApi;
use crate::notification::payload::NotificationPayload;
use crate::registry::ChannelId;

/// Discord REST API 基地址
const API_BASE: &str = "https://discord.com/api/v10";

/// 出站调用超时（无重试，没必要等太久）
const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Webhook 投递时的显示名覆盖
pub const WEBHOOK_USERNAME: &str = "Guild Log Relay";

/// Webhook 投递时的头像覆盖
pub const WEBHOOK_AVATAR_URL: &str = "https://i.imgur.com/glr-avatar.png";

/// Discord REST 客户端
#[derive(Debug, Clone)]
pub struct DiscordHttp {
    client: Client,
    token: String,
    base_url: String,
}

/// 创建 webhook 的响应（只取拼 URL 需要的字段）
#[derive(Debug, Deserialize)]
struct WebhookCreated {
    id: String,
    token: String,
}

impl DiscordHttp {
    /// 创建客户端；`token` 是 bot 认证令牌
    pub fn new(token: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            token: token.into(),
            base_url: API_BASE.to_string(),
        })
    }

    /// 覆盖 API 基地址（测试用）
    #[cfg(test)]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn auth_header(&self) -> String {
        format!("Bot {}", self.token)
    }

    /// 把 payload 变成 multipart 表单：`payload_json` + 附件部件
    fn to_form(body: Value, payload: &NotificationPayload) -> Result<Form> {
        let mut form = Form::new().text(
            "payload_json",
            serde_json::to_string(&body).context("Failed to serialize payload_json")?,
        );
        for (i, file) in payload.files.iter().enumerate() {
            form = form.part(
                format!("files[{}]", i),
                Part::bytes(file.bytes.clone()).file_name(file.filename.clone()),
            );
        }
        Ok(form)
    }
}

/// 直接发消息的请求体
fn message_body(payload: &NotificationPayload) -> Value {
    json!({ "embeds": [payload.to_embed_json()] })
}

/// Webhook 投递的请求体（带显示名/头像覆盖，让日志在视觉上归属 relay）
fn webhook_body(payload: &NotificationPayload) -> Value {
    json!({
        "embeds": [payload.to_embed_json()],
        "username": WEBHOOK_USERNAME,
        "avatar_url": WEBHOOK_AVATAR_URL,
    })
}

#[async_trait]
impl ChatApi for DiscordHttp {
    async fn channel_exists(&self, channel_id: ChannelId) -> Result<bool> {
        let url = format!("{}/channels/{}", self.base_url, channel_id);
        let resp = self
            .client
            .get(&url)
            .header("Authorization", self.auth_header())
            .send()
            .await
            .context("Channel lookup failed")?;
        Ok(resp.status().is_success())
    }

    async fn can_post(&self, channel_id: ChannelId) -> Result<bool> {
        // 完整的权限计算需要成员/角色数据，这里用频道可见性近似：
        // 频道取不到（404/403）就当作不能发
        self.channel_exists(channel_id).await
    }

    async fn create_webhook(&self, channel_id: ChannelId, name: &str) -> Result<String> {
        let url = format!("{}/channels/{}/webhooks", self.base_url, channel_id);
        let created: WebhookCreated = self
            .client
            .post(&url)
            .header("Authorization", self.auth_header())
            .json(&json!({ "name": name }))
            .send()
            .await
            .context("Webhook creation request failed")?
            .error_for_status()
            .context("Webhook creation rejected")?
            .json()
            .await
            .context("Failed to parse webhook creation response")?;

        Ok(format!(
            "https://discord.com/api/webhooks/{}/{}",
            created.id, created.token
        ))
    }

    async fn execute_webhook(&self, url: &str, payload: &NotificationPayload) -> Result<()> {
        let form = Self::to_form(webhook_body(payload), payload)?;
        let resp = self
            .client
            .post(url)
            .multipart(form)
            .send()
            .await
            .context("Webhook request failed")?;

        resp.error_for_status().context("Webhook rejected")?;
        debug!(files = payload.files.len(), "Webhook delivery ok");
        Ok(())
    }

    async fn post_message(
        &self,
        channel_id: ChannelId,
        payload: &NotificationPayload,
    ) -> Result<()> {
        let url = format!("{}/channels/{}/messages", self.base_url, channel_id);
        let request = self
            .client
            .post(&url)
            .header("Authorization", self.auth_header());

        // 没有附件时不必走 multipart
        let resp = if payload.files.is_empty() {
            request.json(&message_body(payload)).send().await
        } else {
            let form = Self::to_form(message_body(payload), payload)?;
            request.multipart(form).send().await
        }
        .context("Message post request failed")?;

        resp.error_for_status().context("Message post rejected")?;
        debug!(channel = %channel_id, "Direct post ok");
        Ok(())
    }

    async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>> {
        let resp = self
            .client
            .get(url)
            .send()
            .await
            .context("Attachment fetch failed")?
            .error_for_status()
            .context("Attachment fetch rejected")?;
        let bytes = resp.bytes().await.context("Attachment body read failed")?;
        Ok(bytes.to_vec())
    }
}

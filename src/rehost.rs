//! 附件重新托管 - 在平台清理前抢救被删消息的附件
//!
//! 优先走 CDN 缓存 URL（原始 URL 在消息删除后很快失效）。单个附件抓取
//! 失败只跳过该附件，绝不让整个操作失败；全部失败时返回空集，由调用方
//! 决定跳过整条通知。

use tracing::{debug, warn};

use crate::event::AttachmentRef;
use crate::notification::payload::FileBlob;
use crate::platform::ChatApi;

/// 逐个抓取附件字节并打上原始文件名；失败的附件被忽略
pub async fn rehost_attachments<A: ChatApi>(
    api: &A,
    attachments: &[AttachmentRef],
) -> Vec<FileBlob> {
    let mut files = Vec::with_capacity(attachments.len());

    for att in attachments {
        match fetch_one(api, att).await {
            Ok(bytes) => {
                debug!(filename = %att.filename, size = bytes.len(), "Attachment recovered");
                files.push(FileBlob {
                    filename: att.filename.clone(),
                    bytes,
                });
            }
            Err(e) => {
                warn!(filename = %att.filename, error = %e, "Attachment fetch failed, skipping");
            }
        }
    }

    files
}

/// 先试缓存 URL，失败再试原始 URL
async fn fetch_one<A: ChatApi>(api: &A, att: &AttachmentRef) -> anyhow::Result<Vec<u8>> {
    if let Some(proxy_url) = &att.proxy_url {
        match api.fetch_bytes(proxy_url).await {
            Ok(bytes) => return Ok(bytes),
            Err(e) => {
                debug!(filename = %att.filename, error = %e, "Cached copy unavailable, trying original URL");
            }
        }
    }
    api.fetch_bytes(&att.url).await
}

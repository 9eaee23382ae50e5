// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::post::PostRecord;
use crate::domain::services::diagnostics::DebugArtifacts;
use crate::engines::traits::{BrowserLauncher, BrowserSession, InterceptedResponse, SessionOptions};
use crate::utils::errors::ScrapeError;
use std::sync::Arc;
use std::time::Duration;

/// 帖子内容根元素选择器，出现即表示客户端渲染完成
pub const POST_CONTENT_SELECTOR: &str = "[data-testid='tweet']";
/// 单条帖子数据请求的操作名
pub const POST_FETCH_MARKER: &str = "TweetResultByRestId";
/// 固定视口，部分站点会按视口调整页面结构和数据请求
pub const EXTRACTOR_VIEWPORT: (u32, u32) = (1920, 1080);

/// 帖子内容提取器
///
/// 在导航前注册响应观察者，等页面渲染完成后从记录的数据请求中
/// 找到帖子数据请求，直接使用其 JSON 响应体而不解析页面 HTML。
pub struct PostContentExtractor {
    launcher: Arc<dyn BrowserLauncher>,
    timeout: Duration,
    artifacts: DebugArtifacts,
}

impl PostContentExtractor {
    pub fn new(launcher: Arc<dyn BrowserLauncher>, timeout: Duration, artifacts: DebugArtifacts) -> Self {
        Self {
            launcher,
            timeout,
            artifacts,
        }
    }

    /// 提取帖子内容
    ///
    /// # 返回值
    ///
    /// * `Ok(PostRecord)` - 响应体中 `data.tweetResult.result` 子树
    /// * `Err(ScrapeError::Timeout)` - 导航或等待超时
    /// * `Err(ScrapeError::NotFound)` - 没有匹配的数据请求
    pub async fn extract(&self, post_url: &str, headless: bool) -> Result<PostRecord, ScrapeError> {
        let options = SessionOptions {
            headless,
            viewport: Some(EXTRACTOR_VIEWPORT),
            navigation_timeout: self.timeout,
        };

        tracing::debug!(launcher = self.launcher.name(), "Opening post {}", post_url);
        let mut session = self.launcher.launch(&options).await?;
        let result = self.intercept(session.as_mut(), post_url).await;

        if let Err(e) = &result {
            tracing::error!("Failed to extract post {}: {}", post_url, e);
            self.artifacts.capture(session.as_mut()).await;
        }
        session.close().await;

        result
    }

    async fn intercept(
        &self,
        session: &mut dyn BrowserSession,
        post_url: &str,
    ) -> Result<PostRecord, ScrapeError> {
        session.observe_responses().await?;
        session.goto(post_url, self.timeout).await?;
        session
            .wait_for_selector(POST_CONTENT_SELECTOR, self.timeout)
            .await?;

        let responses = session.take_responses().await?;
        tracing::debug!("Captured {} data-fetch responses", responses.len());

        let matched = select_post_response(&responses).ok_or_else(|| {
            ScrapeError::NotFound(format!(
                "no {} response observed for {}",
                POST_FETCH_MARKER, post_url
            ))
        })?;
        tracing::debug!("Using data-fetch response {}", matched.url);

        let payload = session.response_json(matched).await?;
        PostRecord::from_response(payload)
    }
}

/// 按到达顺序选出第一个帖子数据请求，之后的重复请求被忽略
pub fn select_post_response(responses: &[InterceptedResponse]) -> Option<&InterceptedResponse> {
    responses
        .iter()
        .filter(|response| response.resource_kind.is_data_fetch())
        .find(|response| response.url.contains(POST_FETCH_MARKER))
}

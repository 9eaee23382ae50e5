// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::post::PostReference;
use crate::domain::services::diagnostics::DebugArtifacts;
use crate::engines::traits::{BrowserLauncher, BrowserSession, SessionOptions};
use crate::utils::errors::ScrapeError;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// 帖子容器选择器
pub const POST_CONTAINER_SELECTOR: &str = "article";
/// 帖子容器内的永久链接选择器
pub const POST_PERMALINK_SELECTOR: &str = "article a[href*=\"/status/\"]";

/// 主页最新帖子定位器
///
/// 渲染主页，取文档顺序中第一个帖子链接作为最新帖子。
/// 该顺序依赖站点按时间倒序渲染信息流，置顶帖子会被误认为最新帖子。
pub struct ProfileLatestPostLocator {
    launcher: Arc<dyn BrowserLauncher>,
    base_url: Url,
    timeout: Duration,
    artifacts: DebugArtifacts,
}

impl ProfileLatestPostLocator {
    pub fn new(
        launcher: Arc<dyn BrowserLauncher>,
        base_url: Url,
        timeout: Duration,
        artifacts: DebugArtifacts,
    ) -> Self {
        Self {
            launcher,
            base_url,
            timeout,
            artifacts,
        }
    }

    /// 定位主页上的最新帖子
    ///
    /// # 参数
    ///
    /// * `profile_url` - 主页URL
    /// * `headless` - 是否无头模式
    ///
    /// # 返回值
    ///
    /// * `Ok(PostReference)` - 最新帖子的绝对URL
    /// * `Err(ScrapeError::Timeout)` - 导航或等待超时
    /// * `Err(ScrapeError::NotFound)` - 页面上没有帖子链接
    pub async fn locate(
        &self,
        profile_url: &str,
        headless: bool,
    ) -> Result<PostReference, ScrapeError> {
        let options = SessionOptions {
            headless,
            viewport: None,
            navigation_timeout: self.timeout,
        };

        tracing::debug!(launcher = self.launcher.name(), "Opening profile {}", profile_url);
        let mut session = self.launcher.launch(&options).await?;
        let result = self.find_latest(session.as_mut(), profile_url).await;

        if let Err(e) = &result {
            tracing::error!("Failed to locate latest post on {}: {}", profile_url, e);
            self.artifacts.capture(session.as_mut()).await;
        }
        session.close().await;

        result
    }

    async fn find_latest(
        &self,
        session: &mut dyn BrowserSession,
        profile_url: &str,
    ) -> Result<PostReference, ScrapeError> {
        session.goto(profile_url, self.timeout).await?;
        session
            .wait_for_selector(POST_CONTAINER_SELECTOR, self.timeout)
            .await?;

        let href = session
            .first_attribute(POST_PERMALINK_SELECTOR, "href")
            .await?
            .ok_or_else(|| {
                ScrapeError::NotFound(format!("no post link found on {}", profile_url))
            })?;

        let url = self.base_url.join(&href)?;
        tracing::debug!("Resolved post link {} to {}", href, url);
        Ok(PostReference::new(url))
    }
}

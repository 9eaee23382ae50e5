// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::engines::traits::BrowserSession;
use crate::infrastructure::storage::write_file;
use std::path::{Path, PathBuf};

/// 失败时写出的调试文件
///
/// 截图与渲染后的 HTML 写到固定文件名，每次失败都会覆盖上一次的结果
#[derive(Debug, Clone)]
pub struct DebugArtifacts {
    dir: PathBuf,
    screenshot_file: &'static str,
    html_file: &'static str,
}

impl DebugArtifacts {
    /// 主页定位失败时使用的文件名
    pub fn for_profile(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            screenshot_file: "debug_profile_screenshot.png",
            html_file: "debug_profile_page.html",
        }
    }

    /// 帖子提取失败时使用的文件名
    pub fn for_post(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            screenshot_file: "debug_tweet_screenshot.png",
            html_file: "debug_tweet_page.html",
        }
    }

    pub fn screenshot_path(&self) -> PathBuf {
        self.dir.join(self.screenshot_file)
    }

    pub fn html_path(&self) -> PathBuf {
        self.dir.join(self.html_file)
    }

    /// 抓取截图和页面源码
    ///
    /// 这里的失败只记录日志，不会覆盖原始错误
    pub async fn capture(&self, session: &mut dyn BrowserSession) {
        match session.screenshot().await {
            Ok(png) => self.write(&self.screenshot_path(), &png).await,
            Err(e) => tracing::warn!("Could not capture debug screenshot: {}", e),
        }

        match session.content().await {
            Ok(html) => self.write(&self.html_path(), html.as_bytes()).await,
            Err(e) => tracing::warn!("Could not capture page content: {}", e),
        }
    }

    async fn write(&self, path: &Path, data: &[u8]) {
        match write_file(path, data).await {
            Ok(()) => tracing::info!("Saved debug artifact to {}", path.display()),
            Err(e) => tracing::warn!("Could not write {}: {}", path.display(), e),
        }
    }
}

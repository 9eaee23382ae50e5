// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use thiserror::Error;

/// 抓取流水线错误类型
#[derive(Error, Debug)]
pub enum ScrapeError {
    /// 导航或等待选择器超时
    #[error("Timeout: {0}")]
    Timeout(String),

    /// 等待成功后仍未找到期望的元素或响应
    #[error("Not found: {0}")]
    NotFound(String),

    /// 文件读写错误
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// 翻译失败（仅在翻译器内部使用，不会向外传播）
    #[error("Translation failed: {0}")]
    Translation(String),

    /// 浏览器驱动错误
    #[error("Browser error: {0}")]
    Browser(String),

    /// JSON 解析或序列化错误
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// URL 无法解析
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl ScrapeError {
    /// 判断错误是否应当终止整个流水线
    ///
    /// 翻译与持久化失败属于软失败，只记录日志
    pub fn is_fatal(&self) -> bool {
        !matches!(self, ScrapeError::Translation(_) | ScrapeError::Io(_))
    }
}

impl From<chromiumoxide::error::CdpError> for ScrapeError {
    fn from(err: chromiumoxide::error::CdpError) -> Self {
        match err {
            chromiumoxide::error::CdpError::Timeout => {
                ScrapeError::Timeout("browser request timed out".to_string())
            }
            other => ScrapeError::Browser(other.to_string()),
        }
    }
}

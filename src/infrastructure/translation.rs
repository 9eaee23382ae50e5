// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use serde_json::Value;

use crate::utils::errors::ScrapeError;

/// 文本翻译特质
///
/// 翻译只是附加信息，实现方不应返回错误，失败时返回空字符串
#[async_trait]
pub trait TextTranslator: Send + Sync {
    /// 将 `text` 翻译为 `dest_language`
    ///
    /// 空文本或只含空白的文本不发起请求，直接返回空字符串，
    /// 调用方因此无法区分"无需翻译"和"翻译失败"，两者都不写入译文。
    async fn translate(&self, text: &str, dest_language: &str) -> String;
}

/// Google 翻译服务
///
/// 调用 `translate_a/single` 接口，源语言由服务自动识别
pub struct GoogleTranslator {
    client: reqwest::Client,
    endpoint: String,
}

impl GoogleTranslator {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
        }
    }

    async fn request(&self, text: &str, dest_language: &str) -> Result<String, ScrapeError> {
        let url = format!("{}/translate_a/single", self.endpoint);
        let response = self
            .client
            .get(url)
            .query(&[
                ("client", "gtx"),
                ("sl", "auto"),
                ("tl", dest_language),
                ("dt", "t"),
                ("q", text),
            ])
            .send()
            .await
            .map_err(|e| ScrapeError::Translation(e.to_string()))?;

        if !response.status().is_success() {
            return Err(ScrapeError::Translation(format!(
                "translation service returned {}",
                response.status()
            )));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| ScrapeError::Translation(format!("malformed response: {}", e)))?;

        parse_translation(&body)
    }
}

#[async_trait]
impl TextTranslator for GoogleTranslator {
    async fn translate(&self, text: &str, dest_language: &str) -> String {
        if text.trim().is_empty() {
            tracing::debug!("Skipping translation of blank text");
            return String::new();
        }

        match self.request(text, dest_language).await {
            Ok(translated) => translated,
            Err(e) => {
                tracing::warn!("Translation to {} failed: {}", dest_language, e);
                String::new()
            }
        }
    }
}

/// 拼接响应中每个分句的译文 (`[0][i][0]`)
fn parse_translation(body: &Value) -> Result<String, ScrapeError> {
    let segments = body
        .get(0)
        .and_then(Value::as_array)
        .ok_or_else(|| ScrapeError::Translation("missing translation segments".to_string()))?;

    Ok(segments
        .iter()
        .filter_map(|segment| segment.get(0).and_then(Value::as_str))
        .collect())
}

// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::path::PathBuf;
use std::sync::Arc;

use url::Url;

use crate::config::settings::Settings;
use crate::domain::models::post::PostRecord;
use crate::domain::services::diagnostics::DebugArtifacts;
use crate::domain::services::extractor::PostContentExtractor;
use crate::domain::services::locator::ProfileLatestPostLocator;
use crate::engines::traits::BrowserLauncher;
use crate::infrastructure::storage::ResultPersister;
use crate::infrastructure::translation::TextTranslator;
use crate::utils::errors::ScrapeError;

// === Section: Use Case Definition ===

/// 流水线执行结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineReport {
    /// 最新帖子URL
    pub post_url: String,
    /// 输出文件路径
    pub output_path: PathBuf,
    /// 是否写入了译文
    pub translated: bool,
    /// 是否成功写入输出文件
    pub persisted: bool,
}

/// 抓取最新帖子用例
///
/// 依次执行 定位 → 提取 → (可选) 翻译 → 持久化。定位和提取失败会终止
/// 流水线，翻译和持久化失败只记录日志。
pub struct ScrapeLatestPostUseCase {
    locator: ProfileLatestPostLocator,
    extractor: PostContentExtractor,
    translator: Arc<dyn TextTranslator>,
    persister: ResultPersister,
    target_language: Option<String>,
    headless: bool,
    output_path: PathBuf,
}

// === Section: Implementation ===

impl ScrapeLatestPostUseCase {
    pub fn new(
        launcher: Arc<dyn BrowserLauncher>,
        translator: Arc<dyn TextTranslator>,
        settings: &Settings,
    ) -> Result<Self, ScrapeError> {
        let base_url = Url::parse(&settings.scrape.base_url)?;
        let timeout = settings.scrape.timeout();
        let debug_dir = PathBuf::from(&settings.scrape.debug_dir);

        Ok(Self {
            locator: ProfileLatestPostLocator::new(
                launcher.clone(),
                base_url,
                timeout,
                DebugArtifacts::for_profile(&debug_dir),
            ),
            extractor: PostContentExtractor::new(
                launcher,
                timeout,
                DebugArtifacts::for_post(&debug_dir),
            ),
            translator,
            persister: ResultPersister::new(),
            target_language: settings
                .translation
                .target_language
                .clone()
                .filter(|lang| !lang.trim().is_empty()),
            headless: settings.scrape.headless,
            output_path: PathBuf::from(&settings.scrape.output_path),
        })
    }

    pub async fn execute(&self, profile_url: &str) -> Result<PipelineReport, ScrapeError> {
        tracing::info!("Locating latest post on {}", profile_url);
        let post = self.locator.locate(profile_url, self.headless).await?;
        tracing::info!("Latest post URL: {}", post.url);

        let mut record = self.extractor.extract(&post.url, self.headless).await?;
        tracing::info!(rest_id = ?record.rest_id(), "Extracted post content");

        let translated = self.translate(&mut record).await;

        let saved = self.persister.persist(&record, &self.output_path).await;
        let persisted = settle("persist", saved)?.is_some();

        Ok(PipelineReport {
            post_url: post.url,
            output_path: self.output_path.clone(),
            translated,
            persisted,
        })
    }

    async fn translate(&self, record: &mut PostRecord) -> bool {
        let Some(lang) = self.target_language.as_deref() else {
            return false;
        };

        let Some(text) = record.text().map(str::to_owned) else {
            tracing::warn!("Post has no text to translate");
            return false;
        };

        let translated = self.translator.translate(&text, lang).await;
        if translated.is_empty() {
            tracing::warn!("No translation available for {}", lang);
            return false;
        }

        tracing::debug!("Translated post text to {}", lang);
        record.set_translation(translated);
        true
    }
}

/// 按错误类别处理步骤结果：致命错误向上传播，非致命错误记录日志后返回 `None`
fn settle<T>(step: &str, result: Result<T, ScrapeError>) -> Result<Option<T>, ScrapeError> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(e) if e.is_fatal() => Err(e),
        Err(e) => {
            tracing::error!("{} step failed, continuing: {}", step, e);
            Ok(None)
        }
    }
}

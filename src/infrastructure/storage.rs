// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use std::path::Path;
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::domain::models::post::PostRecord;
use crate::utils::errors::ScrapeError;

/// 写入文件，自动创建缺失的父目录并覆盖已有内容
pub async fn write_file(path: &Path, data: &[u8]) -> Result<(), ScrapeError> {
    // 确保目录存在
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).await?;
    }

    let mut file = fs::File::create(path).await?;
    file.write_all(data).await?;
    file.flush().await?;

    Ok(())
}

/// 将记录序列化为带 4 空格缩进的 JSON，非 ASCII 字符原样保留
pub fn to_pretty_json<T: Serialize>(value: &T) -> Result<Vec<u8>, ScrapeError> {
    let mut buf = Vec::new();
    let mut serializer = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
    value.serialize(&mut serializer)?;
    buf.push(b'\n');
    Ok(buf)
}

/// 结果持久化
///
/// 每次调用都整体覆盖目标文件，不做合并或版本管理
#[derive(Debug, Clone, Copy, Default)]
pub struct ResultPersister;

impl ResultPersister {
    pub fn new() -> Self {
        Self
    }

    /// 将帖子记录写入 `path`
    ///
    /// # 返回值
    ///
    /// * `Ok(())` - 写入成功
    /// * `Err(ScrapeError::Io)` - 目录创建或文件写入失败
    pub async fn persist(&self, record: &PostRecord, path: &Path) -> Result<(), ScrapeError> {
        let data = to_pretty_json(record)?;
        write_file(path, &data).await?;
        tracing::info!("Results saved to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_persist_creates_missing_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a/b/c/out.json");
        let record = PostRecord::new(json!({
            "rest_id": "1",
            "legacy": { "full_text": "日本語のテキスト ✓", "translated_text": "Japanese text" }
        }));

        ResultPersister::new().persist(&record, &path).await.unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.contains("日本語のテキスト ✓"));
        assert!(!raw.contains("\\u"));
        assert!(raw.contains("\n    \"legacy\": {"));

        let parsed: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(&parsed, record.as_value());
    }

    #[tokio::test]
    async fn test_persist_overwrites_previous_record() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("results.json");
        let persister = ResultPersister::new();

        persister
            .persist(
                &PostRecord::new(json!({ "first": true, "padding": "x".repeat(512) })),
                &path,
            )
            .await
            .unwrap();
        persister
            .persist(&PostRecord::new(json!({ "second": true })), &path)
            .await
            .unwrap();

        let parsed: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(parsed, json!({ "second": true }));
    }

    #[tokio::test]
    async fn test_persist_into_file_parent_fails_with_io() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, b"not a directory").unwrap();

        let err = ResultPersister::new()
            .persist(&PostRecord::new(json!({})), &blocker.join("out.json"))
            .await
            .unwrap_err();

        assert!(matches!(err, ScrapeError::Io(_)));
    }
}

// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::utils::errors::ScrapeError;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// 数据请求响应中帖子内容所在的路径
pub const POST_RESULT_POINTER: &str = "/data/tweetResult/result";

/// 帖子引用
///
/// 由定位器生成，仅包含帖子的绝对URL
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostReference {
    /// 帖子的绝对URL
    pub url: String,
}

impl PostReference {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

/// 帖子记录
///
/// 从拦截到的数据请求中取出的任意 JSON 树。翻译步骤会在原文字段旁
/// 追加译文字段，然后整体交给持久化步骤。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PostRecord(Value);

impl PostRecord {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    /// 从完整的响应体中取出 `data.tweetResult.result` 子树
    pub fn from_response(mut payload: Value) -> Result<Self, ScrapeError> {
        match payload.pointer_mut(POST_RESULT_POINTER).map(Value::take) {
            Some(Value::Null) | None => Err(ScrapeError::NotFound(format!(
                "response has no value at {}",
                POST_RESULT_POINTER
            ))),
            Some(result) => Ok(Self(result)),
        }
    }

    /// 帖子正文 (`legacy.full_text`)
    pub fn text(&self) -> Option<&str> {
        self.0
            .pointer("/legacy/full_text")
            .and_then(Value::as_str)
    }

    /// 帖子ID (`rest_id`)
    pub fn rest_id(&self) -> Option<&str> {
        self.0.get("rest_id").and_then(Value::as_str)
    }

    /// 在原文字段旁写入译文
    ///
    /// 没有 `legacy` 对象时写在根对象上；根不是对象时不做任何修改
    pub fn set_translation(&mut self, translated: String) {
        let target = match self.0.get_mut("legacy") {
            Some(Value::Object(legacy)) => Some(legacy),
            _ => self.0.as_object_mut(),
        };

        if let Some(object) = target {
            object.insert("translated_text".to_string(), Value::String(translated));
        }
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }
}

// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

//! 测试用的脚本化浏览器，按预设页面内容回放

use crate::engines::traits::{
    BrowserLauncher, BrowserSession, InterceptedResponse, ResourceKind, SessionOptions,
};
use crate::utils::errors::ScrapeError;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// 一个预设页面
#[derive(Debug, Clone, Default)]
pub struct ScriptedPage {
    /// 导航时是否超时
    pub navigation_times_out: bool,
    /// 页面上存在的选择器
    pub selectors: Vec<String>,
    /// 选择器 -> 第一个元素的属性
    pub attributes: HashMap<String, HashMap<String, String>>,
    /// 按到达顺序排列的响应及其原始响应体
    pub responses: Vec<(InterceptedResponse, Vec<u8>)>,
    pub html: String,
}

impl ScriptedPage {
    pub fn with_selector(mut self, selector: &str) -> Self {
        self.selectors.push(selector.to_string());
        self
    }

    pub fn with_attribute(mut self, selector: &str, name: &str, value: &str) -> Self {
        self.attributes
            .entry(selector.to_string())
            .or_default()
            .insert(name.to_string(), value.to_string());
        self
    }

    pub fn with_response(self, url: &str, kind: ResourceKind, body: Value) -> Self {
        self.with_raw_response(url, kind, body.to_string().as_bytes())
    }

    pub fn with_raw_response(mut self, url: &str, kind: ResourceKind, body: &[u8]) -> Self {
        let response = InterceptedResponse {
            request_id: format!("req-{}", self.responses.len() + 1),
            url: url.to_string(),
            resource_kind: kind,
        };
        self.responses.push((response, body.to_vec()));
        self
    }
}

/// 会话生命周期记录，用于断言
#[derive(Debug, Default)]
pub struct SessionLog {
    pub launched: Vec<SessionOptions>,
    pub closed: usize,
    pub observed_before_goto: Vec<bool>,
}

/// 按URL返回预设页面的启动器
#[derive(Clone, Default)]
pub struct ScriptedLauncher {
    pages: Arc<HashMap<String, ScriptedPage>>,
    pub log: Arc<Mutex<SessionLog>>,
}

impl ScriptedLauncher {
    pub fn new(pages: Vec<(&str, ScriptedPage)>) -> Self {
        Self {
            pages: Arc::new(
                pages
                    .into_iter()
                    .map(|(url, page)| (url.to_string(), page))
                    .collect(),
            ),
            log: Arc::default(),
        }
    }

    pub fn closed_sessions(&self) -> usize {
        self.log.lock().unwrap().closed
    }
}

#[async_trait]
impl BrowserLauncher for ScriptedLauncher {
    async fn launch(
        &self,
        options: &SessionOptions,
    ) -> Result<Box<dyn BrowserSession>, ScrapeError> {
        self.log.lock().unwrap().launched.push(options.clone());
        Ok(Box::new(ScriptedSession {
            pages: self.pages.clone(),
            log: self.log.clone(),
            current: None,
            observing: false,
            buffer: Vec::new(),
        }))
    }

    fn name(&self) -> &'static str {
        "scripted"
    }
}

struct ScriptedSession {
    pages: Arc<HashMap<String, ScriptedPage>>,
    log: Arc<Mutex<SessionLog>>,
    current: Option<ScriptedPage>,
    observing: bool,
    buffer: Vec<InterceptedResponse>,
}

#[async_trait]
impl BrowserSession for ScriptedSession {
    async fn goto(&mut self, url: &str, timeout: Duration) -> Result<(), ScrapeError> {
        self.log
            .lock()
            .unwrap()
            .observed_before_goto
            .push(self.observing);

        let page = self
            .pages
            .get(url)
            .cloned()
            .ok_or_else(|| ScrapeError::Browser(format!("no scripted page for {}", url)))?;

        if page.navigation_times_out {
            return Err(ScrapeError::Timeout(format!(
                "navigation to {} exceeded {:?}",
                url, timeout
            )));
        }

        if self.observing {
            self.buffer.extend(
                page.responses
                    .iter()
                    .filter(|(response, _)| response.resource_kind.is_data_fetch())
                    .map(|(response, _)| response.clone()),
            );
        }
        self.current = Some(page);
        Ok(())
    }

    async fn wait_for_selector(
        &mut self,
        selector: &str,
        timeout: Duration,
    ) -> Result<(), ScrapeError> {
        let present = self
            .current
            .as_ref()
            .is_some_and(|page| page.selectors.iter().any(|s| s == selector));
        if present {
            Ok(())
        } else {
            Err(ScrapeError::Timeout(format!(
                "selector {} did not appear within {:?}",
                selector, timeout
            )))
        }
    }

    async fn first_attribute(
        &mut self,
        selector: &str,
        attribute: &str,
    ) -> Result<Option<String>, ScrapeError> {
        Ok(self
            .current
            .as_ref()
            .and_then(|page| page.attributes.get(selector))
            .and_then(|attrs| attrs.get(attribute))
            .cloned())
    }

    async fn observe_responses(&mut self) -> Result<(), ScrapeError> {
        self.observing = true;
        Ok(())
    }

    async fn take_responses(&mut self) -> Result<Vec<InterceptedResponse>, ScrapeError> {
        Ok(std::mem::take(&mut self.buffer))
    }

    async fn response_json(
        &mut self,
        response: &InterceptedResponse,
    ) -> Result<Value, ScrapeError> {
        let body = self
            .current
            .as_ref()
            .and_then(|page| {
                page.responses
                    .iter()
                    .find(|(candidate, _)| candidate.request_id == response.request_id)
            })
            .map(|(_, body)| body.as_slice())
            .ok_or_else(|| ScrapeError::Browser("response body unavailable".to_string()))?;
        Ok(serde_json::from_slice(body)?)
    }

    async fn screenshot(&mut self) -> Result<Vec<u8>, ScrapeError> {
        Ok(b"\x89PNG".to_vec())
    }

    async fn content(&mut self) -> Result<String, ScrapeError> {
        Ok(self
            .current
            .as_ref()
            .map(|page| page.html.clone())
            .unwrap_or_default())
    }

    async fn close(&mut self) {
        self.log.lock().unwrap().closed += 1;
    }
}

// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use crate::utils::errors::ScrapeError;
use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;

/// 浏览器会话配置
#[derive(Debug, Clone)]
pub struct SessionOptions {
    /// 是否无头模式
    pub headless: bool,
    /// 固定视口尺寸 (宽, 高)
    pub viewport: Option<(u32, u32)>,
    /// 导航超时时间
    pub navigation_timeout: Duration,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            headless: true,
            viewport: None,
            navigation_timeout: Duration::from_secs(60),
        }
    }
}

/// 响应资源类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Document,
    Xhr,
    Fetch,
    Script,
    Other,
}

impl ResourceKind {
    /// 是否为页面后台数据请求 (XHR/fetch)
    pub fn is_data_fetch(&self) -> bool {
        matches!(self, ResourceKind::Xhr | ResourceKind::Fetch)
    }
}

/// 会话中观察到的一次网络响应
///
/// 响应体不会随事件一起保存，需要通过 [`BrowserSession::response_json`] 读取
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterceptedResponse {
    /// 浏览器内部请求ID
    pub request_id: String,
    /// 请求URL
    pub url: String,
    /// 资源类型
    pub resource_kind: ResourceKind,
}

/// 浏览器会话特质
///
/// 一个会话对应一个隔离的浏览器实例和一个页面
#[async_trait]
pub trait BrowserSession: Send {
    /// 导航到指定URL
    async fn goto(&mut self, url: &str, timeout: Duration) -> Result<(), ScrapeError>;

    /// 等待CSS选择器出现
    async fn wait_for_selector(&mut self, selector: &str, timeout: Duration)
        -> Result<(), ScrapeError>;

    /// 读取第一个匹配元素的属性，元素或属性不存在时返回 `None`
    async fn first_attribute(
        &mut self,
        selector: &str,
        attribute: &str,
    ) -> Result<Option<String>, ScrapeError>;

    /// 注册响应观察者，必须在导航之前调用
    async fn observe_responses(&mut self) -> Result<(), ScrapeError>;

    /// 取出目前为止记录的数据请求响应，按到达顺序排列
    async fn take_responses(&mut self) -> Result<Vec<InterceptedResponse>, ScrapeError>;

    /// 将响应体解析为 JSON
    async fn response_json(&mut self, response: &InterceptedResponse)
        -> Result<Value, ScrapeError>;

    /// 整页截图 (PNG)
    async fn screenshot(&mut self) -> Result<Vec<u8>, ScrapeError>;

    /// 当前渲染后的完整 HTML
    async fn content(&mut self) -> Result<String, ScrapeError>;

    /// 关闭会话，释放浏览器资源
    async fn close(&mut self);
}

/// 浏览器启动器特质
#[async_trait]
pub trait BrowserLauncher: Send + Sync {
    /// 启动一个全新的隔离会话
    async fn launch(&self, options: &SessionOptions)
        -> Result<Box<dyn BrowserSession>, ScrapeError>;

    /// 启动器名称
    fn name(&self) -> &'static str;
}

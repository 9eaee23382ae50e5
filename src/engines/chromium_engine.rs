// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::engines::traits::{
    BrowserLauncher, BrowserSession, InterceptedResponse, ResourceKind, SessionOptions,
};
use crate::utils::errors::ScrapeError;
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use chromiumoxide::cdp::browser_protocol::browser::BrowserContextId;
use chromiumoxide::cdp::browser_protocol::emulation::SetDeviceMetricsOverrideParams;
use chromiumoxide::cdp::browser_protocol::network::{
    EventResponseReceived, GetResponseBodyParams, RequestId, ResourceType,
};
use chromiumoxide::cdp::browser_protocol::page::CaptureScreenshotFormat;
use chromiumoxide::cdp::browser_protocol::target::{
    CreateBrowserContextParams, CreateTargetParams,
};
use chromiumoxide::handler::viewport::Viewport;
use chromiumoxide::handler::Handler;
use chromiumoxide::listeners::EventStream;
use chromiumoxide::page::ScreenshotParams;
use chromiumoxide::error::CdpError;
use chromiumoxide::{Browser, BrowserConfig, Page};
use futures::{FutureExt, StreamExt};
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::task::JoinHandle;
use uuid::Uuid;

const SELECTOR_POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Chromium 启动器
///
/// 基于 chromiumoxide 通过 CDP 驱动 Chrome。每次启动都会创建独立的
/// 用户数据目录，会话之间不共享 cookie 和本地存储。
#[derive(Debug, Clone, Default)]
pub struct ChromiumLauncher {
    remote_debugging_url: Option<String>,
    chrome_executable: Option<PathBuf>,
}

impl ChromiumLauncher {
    pub fn new(remote_debugging_url: Option<String>, chrome_executable: Option<PathBuf>) -> Self {
        let remote_debugging_url = remote_debugging_url
            .or_else(|| std::env::var("CHROMIUM_REMOTE_DEBUGGING_URL").ok());
        Self {
            remote_debugging_url,
            chrome_executable,
        }
    }

    async fn launch_local(
        &self,
        options: &SessionOptions,
    ) -> Result<(Browser, Handler, TempProfile), ScrapeError> {
        let profile = TempProfile::new();

        let mut builder = BrowserConfig::builder()
            .no_sandbox()
            .request_timeout(options.navigation_timeout)
            .user_data_dir(profile.path())
            .arg("--disable-gpu")
            .arg("--disable-dev-shm-usage");

        if !options.headless {
            builder = builder.with_head();
        }

        if let Some((width, height)) = options.viewport {
            builder = builder.window_size(width, height).viewport(Viewport {
                width,
                height,
                ..Viewport::default()
            });
        }

        if let Some(executable) = &self.chrome_executable {
            builder = builder.chrome_executable(executable);
        }

        let config = builder.build().map_err(ScrapeError::Browser)?;
        let (browser, handler) = Browser::launch(config).await?;
        Ok((browser, handler, profile))
    }
}

#[async_trait]
impl BrowserLauncher for ChromiumLauncher {
    async fn launch(
        &self,
        options: &SessionOptions,
    ) -> Result<Box<dyn BrowserSession>, ScrapeError> {
        let (mut browser, handler, profile) = match &self.remote_debugging_url {
            Some(url) => {
                tracing::info!("Connecting to remote Chrome instance at: {}", url);
                let (browser, handler) = Browser::connect(url).await?;
                (browser, handler, None)
            }
            None => {
                let (browser, handler, profile) = self.launch_local(options).await?;
                (browser, handler, Some(profile))
            }
        };

        // Spawn a handler to process browser events. If page setup fails below,
        // dropping the guards aborts the handler and removes the profile directory,
        // and Browser's own Drop kills the child process.
        let handler = HandlerGuard(spawn_handler(handler));

        let (page, context_id) = open_page(&mut browser, profile.is_none(), options).await?;

        tracing::debug!(
            headless = options.headless,
            remote = context_id.is_some(),
            "Browser session started"
        );

        Ok(Box::new(ChromiumSession {
            browser,
            page,
            handler,
            events: None,
            buffer: Vec::new(),
            context_id,
            profile,
            closed: false,
        }))
    }

    fn name(&self) -> &'static str {
        "chromium"
    }
}

/// 打开会话页面并固定视口
///
/// 远程浏览器是共享的，每个会话使用独立的浏览器上下文；
/// 上下文创建后的任何失败都会先销毁该上下文
async fn open_page(
    browser: &mut Browser,
    remote: bool,
    options: &SessionOptions,
) -> Result<(Page, Option<BrowserContextId>), ScrapeError> {
    if !remote {
        let page = browser.new_page("about:blank").await?;
        apply_viewport(&page, options).await?;
        return Ok((page, None));
    }

    let context_id = browser
        .create_browser_context(CreateBrowserContextParams::default())
        .await?;

    let opened: Result<Page, ScrapeError> = async {
        let target = CreateTargetParams::builder()
            .url("about:blank")
            .browser_context_id(context_id.clone())
            .build()
            .map_err(ScrapeError::Browser)?;
        let page = browser.new_page(target).await?;
        apply_viewport(&page, options).await?;
        Ok(page)
    }
    .await;

    match opened {
        Ok(page) => Ok((page, Some(context_id))),
        Err(e) => {
            if let Err(err) = browser.dispose_browser_context(context_id).await {
                tracing::warn!("Failed to dispose browser context: {}", err);
            }
            Err(e)
        }
    }
}

async fn apply_viewport(page: &Page, options: &SessionOptions) -> Result<(), ScrapeError> {
    if let Some((width, height)) = options.viewport {
        page.execute(SetDeviceMetricsOverrideParams::new(
            i64::from(width),
            i64::from(height),
            1.0,
            false,
        ))
        .await?;
    }
    Ok(())
}

fn spawn_handler(mut handler: Handler) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(h) = handler.next().await {
            if h.is_err() {
                break;
            }
        }
    })
}

/// 浏览器事件处理任务，释放时中止
struct HandlerGuard(JoinHandle<()>);

impl Drop for HandlerGuard {
    fn drop(&mut self) {
        self.0.abort();
    }
}

/// 一次性的用户数据目录，释放时删除
#[derive(Debug)]
pub struct TempProfile(PathBuf);

impl TempProfile {
    pub fn new() -> Self {
        Self(std::env::temp_dir().join(format!("postgrab-{}", Uuid::new_v4())))
    }

    pub fn path(&self) -> &Path {
        &self.0
    }
}

impl Default for TempProfile {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for TempProfile {
    fn drop(&mut self) {
        if let Err(e) = std::fs::remove_dir_all(&self.0) {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::debug!("Could not remove {}: {}", self.0.display(), e);
            }
        }
    }
}

/// 判断错误是否来自 CDP 连接本身，而不是元素查询没有结果
pub fn is_transport_error(err: &CdpError) -> bool {
    matches!(
        err,
        CdpError::Ws(_) | CdpError::Io(_) | CdpError::ChannelSendError(_) | CdpError::NoResponse
    )
}

/// 将 CDP 资源类型映射为内部分类
pub fn resource_kind(resource_type: &ResourceType) -> ResourceKind {
    match resource_type {
        ResourceType::Document => ResourceKind::Document,
        ResourceType::Xhr => ResourceKind::Xhr,
        ResourceType::Fetch => ResourceKind::Fetch,
        ResourceType::Script => ResourceKind::Script,
        _ => ResourceKind::Other,
    }
}

/// 基于单个 Chrome 页面的浏览器会话
pub struct ChromiumSession {
    browser: Browser,
    page: Page,
    handler: HandlerGuard,
    events: Option<EventStream<EventResponseReceived>>,
    buffer: Vec<InterceptedResponse>,
    context_id: Option<BrowserContextId>,
    profile: Option<TempProfile>,
    closed: bool,
}

impl ChromiumSession {
    /// Moves every event the handler has already delivered into the buffer.
    fn drain_events(&mut self) {
        let Some(events) = self.events.as_mut() else {
            return;
        };

        while let Some(Some(event)) = events.next().now_or_never() {
            let kind = resource_kind(&event.r#type);
            if !kind.is_data_fetch() {
                continue;
            }
            self.buffer.push(InterceptedResponse {
                request_id: event.request_id.inner().clone(),
                url: event.response.url.clone(),
                resource_kind: kind,
            });
        }
    }
}

#[async_trait]
impl BrowserSession for ChromiumSession {
    async fn goto(&mut self, url: &str, timeout: Duration) -> Result<(), ScrapeError> {
        tracing::debug!("Navigating to {}", url);
        tokio::time::timeout(timeout, self.page.goto(url))
            .await
            .map_err(|_| {
                ScrapeError::Timeout(format!("navigation to {} exceeded {:?}", url, timeout))
            })??;
        self.drain_events();
        Ok(())
    }

    async fn wait_for_selector(
        &mut self,
        selector: &str,
        timeout: Duration,
    ) -> Result<(), ScrapeError> {
        let page = &self.page;
        let poll = async {
            loop {
                match page.find_element(selector).await {
                    Ok(_) => return Ok(()),
                    Err(e) if is_transport_error(&e) => return Err(ScrapeError::from(e)),
                    Err(_) => tokio::time::sleep(SELECTOR_POLL_INTERVAL).await,
                }
            }
        };

        tokio::time::timeout(timeout, poll).await.map_err(|_| {
            ScrapeError::Timeout(format!(
                "selector {} did not appear within {:?}",
                selector, timeout
            ))
        })??;
        self.drain_events();
        Ok(())
    }

    async fn first_attribute(
        &mut self,
        selector: &str,
        attribute: &str,
    ) -> Result<Option<String>, ScrapeError> {
        match self.page.find_element(selector).await {
            Ok(element) => Ok(element.attribute(attribute).await?),
            Err(e) if is_transport_error(&e) => Err(e.into()),
            Err(e) => {
                tracing::debug!("No element matches {}: {}", selector, e);
                Ok(None)
            }
        }
    }

    async fn observe_responses(&mut self) -> Result<(), ScrapeError> {
        let events = self.page.event_listener::<EventResponseReceived>().await?;
        self.events = Some(events);
        Ok(())
    }

    async fn take_responses(&mut self) -> Result<Vec<InterceptedResponse>, ScrapeError> {
        self.drain_events();
        Ok(std::mem::take(&mut self.buffer))
    }

    async fn response_json(
        &mut self,
        response: &InterceptedResponse,
    ) -> Result<Value, ScrapeError> {
        let returns = self
            .page
            .execute(GetResponseBodyParams::new(RequestId::new(
                response.request_id.clone(),
            )))
            .await?;

        let body = if returns.result.base64_encoded {
            BASE64
                .decode(&returns.result.body)
                .map_err(|e| ScrapeError::Browser(format!("Invalid response body: {}", e)))?
        } else {
            returns.result.body.clone().into_bytes()
        };

        Ok(serde_json::from_slice(&body)?)
    }

    async fn screenshot(&mut self) -> Result<Vec<u8>, ScrapeError> {
        let params = ScreenshotParams::builder()
            .format(CaptureScreenshotFormat::Png)
            .full_page(true)
            .build();
        Ok(self.page.screenshot(params).await?)
    }

    async fn content(&mut self) -> Result<String, ScrapeError> {
        Ok(self.page.content().await?)
    }

    async fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        self.events = None;

        if let Some(context_id) = self.context_id.take() {
            if let Err(e) = self.page.clone().close().await {
                tracing::warn!("Failed to close page: {}", e);
            }
            if let Err(e) = self.browser.dispose_browser_context(context_id).await {
                tracing::warn!("Failed to dispose browser context: {}", e);
            }
        } else {
            if let Err(e) = self.browser.close().await {
                tracing::warn!("Failed to close browser: {}", e);
            }
            if let Err(e) = self.browser.wait().await {
                tracing::warn!("Failed to wait for browser exit: {}", e);
            }
        }

        self.handler.0.abort();

        // Chrome has exited, the profile directory can go
        drop(self.profile.take());
        tracing::debug!("Browser session closed");
    }
}

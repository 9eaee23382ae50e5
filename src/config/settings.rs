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

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

/// 应用程序配置设置
///
/// 包含抓取、浏览器、翻译和日志等所有配置项
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// 抓取配置
    pub scrape: ScrapeSettings,
    /// 浏览器配置
    #[serde(default)]
    pub browser: BrowserSettings,
    /// 翻译配置
    pub translation: TranslationSettings,
    /// 日志配置
    pub logging: LoggingSettings,
}

/// 抓取配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct ScrapeSettings {
    /// 目标主页URL
    pub profile_url: String,
    /// 站点源地址，用于补全相对链接
    pub base_url: String,
    /// 是否使用无头模式
    pub headless: bool,
    /// 导航与等待超时时间（秒）
    pub timeout_secs: u64,
    /// 结果输出路径
    pub output_path: String,
    /// 失败时调试文件的输出目录
    pub debug_dir: String,
}

impl ScrapeSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// 浏览器配置设置
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BrowserSettings {
    /// 远程 Chrome 调试地址，设置后不再本地启动浏览器
    pub remote_debugging_url: Option<String>,
    /// Chrome 可执行文件路径
    pub chrome_executable: Option<String>,
}

/// 翻译配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct TranslationSettings {
    /// 目标语言代码，未设置时跳过翻译
    pub target_language: Option<String>,
    /// 翻译服务地址
    pub endpoint: String,
}

/// 日志配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    /// 是否输出 JSON 格式日志
    pub json: bool,
}

impl Settings {
    /// 加载配置，`config_file` 为额外指定的配置文件
    ///
    /// 从默认值、配置文件和环境变量依次叠加
    ///
    /// # Returns
    ///
    /// * `Ok(Settings)` - 成功加载的配置
    /// * `Err(ConfigError)` - 配置加载失败
    pub fn load(config_file: Option<&Path>) -> Result<Self, ConfigError> {
        let env = std::env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "default".to_string());
        let mut builder = Config::builder()
            // Default scrape settings
            .set_default("scrape.profile_url", "https://x.com/facil_pay")?
            .set_default("scrape.base_url", "https://x.com")?
            .set_default("scrape.headless", true)?
            .set_default("scrape.timeout_secs", 60)?
            .set_default("scrape.output_path", "results/results.json")?
            .set_default("scrape.debug_dir", ".")?
            // Default translation settings
            .set_default("translation.endpoint", "https://translate.googleapis.com")?
            // Default logging settings
            .set_default("logging.json", false)?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false));

        if let Some(path) = config_file {
            builder = builder.add_source(File::from(path).required(true));
        }

        builder
            .add_source(Environment::with_prefix("POSTGRAB").separator("__"))
            .build()?
            .try_deserialize()
    }
}

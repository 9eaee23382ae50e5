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

use anyhow::Context;
use clap::Parser;
use postgrab::application::usecases::scrape_latest_post::ScrapeLatestPostUseCase;
use postgrab::config::settings::Settings;
use postgrab::engines::chromium_engine::ChromiumLauncher;
use postgrab::infrastructure::translation::GoogleTranslator;
use postgrab::utils::telemetry;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

#[derive(Parser)]
#[command(name = "postgrab")]
#[command(about = "Fetch the latest post of a profile and save it as JSON")]
struct Cli {
    /// Profile page to read the latest post from
    profile_url: Option<String>,

    /// Where to write the post record
    #[arg(short, long)]
    output: Option<String>,

    /// Translate the post text into this language code (e.g. "en")
    #[arg(long, value_name = "LANG")]
    translate_to: Option<String>,

    /// Run the browser with a visible window
    #[arg(long, conflicts_with = "headless")]
    headed: bool,

    /// Run the browser without a window
    #[arg(long)]
    headless: bool,

    /// Extra configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,
}

impl Cli {
    fn apply(self, settings: &mut Settings) -> String {
        if let Some(output) = self.output {
            settings.scrape.output_path = output;
        }
        if self.translate_to.is_some() {
            settings.translation.target_language = self.translate_to;
        }
        if self.headed {
            settings.scrape.headless = false;
        } else if self.headless {
            settings.scrape.headless = true;
        }
        self.profile_url
            .unwrap_or_else(|| settings.scrape.profile_url.clone())
    }
}

/// 主函数
///
/// 定位或提取失败时返回错误，进程以非零状态退出
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // 1. Load configuration
    let mut settings =
        Settings::load(cli.config.as_deref()).context("Failed to load configuration")?;
    let profile_url = cli.apply(&mut settings);

    // 2. Initialize logging
    telemetry::init_telemetry(settings.logging.json);
    info!("Starting postgrab...");

    // 3. Initialize components
    let launcher = Arc::new(ChromiumLauncher::new(
        settings.browser.remote_debugging_url.clone(),
        settings.browser.chrome_executable.clone().map(PathBuf::from),
    ));
    let translator = Arc::new(GoogleTranslator::new(settings.translation.endpoint.clone()));
    let use_case = ScrapeLatestPostUseCase::new(launcher, translator, &settings)?;

    // 4. Run the pipeline
    let report = use_case
        .execute(&profile_url)
        .await
        .with_context(|| format!("Failed to scrape latest post from {}", profile_url))?;

    println!("Latest post URL: {}", report.post_url);
    if report.persisted {
        println!("Results saved to {}", report.output_path.display());
    } else {
        println!("Results were not saved, see the log for details");
    }

    Ok(())
}

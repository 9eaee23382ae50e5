// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 应用程序模块
///
/// 包含抓取流水线的用例
pub mod application;

/// 配置模块
///
/// 处理应用程序的配置设置和环境变量
pub mod config;

/// 领域模块
///
/// 包含帖子模型以及定位、提取服务
pub mod domain;

/// 引擎模块
///
/// 浏览器自动化能力及其 chromiumoxide 实现
pub mod engines;

/// 基础设施模块
///
/// 提供文件持久化和翻译服务集成
pub mod infrastructure;

/// 工具模块
///
/// 提供错误类型和日志初始化
pub mod utils;

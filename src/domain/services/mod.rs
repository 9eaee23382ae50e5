// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域服务模块
///
/// 包含的服务：
/// - 诊断（diagnostics）：失败时保存截图和页面源码
/// - 提取器（extractor）：拦截数据请求获取帖子内容
/// - 定位器（locator）：从主页找到最新帖子
pub mod diagnostics;
pub mod extractor;
pub mod locator;

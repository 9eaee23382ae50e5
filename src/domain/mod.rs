// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域层模块
///
/// 该模块包含系统的核心业务逻辑，包括：
/// - 领域模型（models）：帖子引用与帖子记录
/// - 服务（services）：最新帖子定位、帖子内容提取与失败诊断
pub mod models;
pub mod services;

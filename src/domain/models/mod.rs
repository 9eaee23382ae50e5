// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域模型模块
///
/// 帖子（post）：定位器产出的帖子引用和提取器产出的帖子记录
pub mod post;

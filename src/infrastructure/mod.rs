// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 基础设施层模块
///
/// 包含的子模块：
/// - 存储（storage）：结果文件和调试文件的写入
/// - 翻译（translation）：调用外部翻译服务
pub mod storage;
pub mod translation;

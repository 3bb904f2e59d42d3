//! 数据加载错误类型定义

use std::path::PathBuf;
use thiserror::Error;

/// 数据加载相关错误
#[derive(Debug, Error)]
pub enum DataError {
    /// 文件未找到
    #[error("文件未找到: {0}")]
    FileNotFound(PathBuf),

    /// IO 错误
    #[error("IO 错误: {0}")]
    IoError(#[from] std::io::Error),

    /// 格式错误（如文件短于头部、标签越界、图像/标签数量不一致）
    #[error("格式错误: {0}")]
    FormatError(String),

    /// 配置错误（如 batch_size 为 0、像素范围无效）
    #[error("配置错误: {0}")]
    ConfigError(String),
}

//! # Error 模块
//!
//! 定义 pgt 中使用的错误类型。
//!
//! 配置类问题（未知的锚点、对齐方式）在本地以默认值替代，不会出现在这里；
//! 这里只包含调用方必须处理的资源与配置文件错误。

use thiserror::Error;

/// 资源加载错误
#[derive(Error, Debug)]
pub enum ResourceError {
    /// 文件不存在
    #[error("文件不存在: {path}")]
    FileMissing {
        /// 文件路径
        path: String,
    },

    /// 资源加载失败
    #[error("加载 {kind} 资源失败: {path} - {message}")]
    LoadFailed {
        /// 资源路径
        path: String,
        /// 资源类型（image, json, font 等）
        kind: String,
        /// 错误消息
        message: String,
    },

    /// 无效的资源格式
    #[error("无效的资源格式: {path} - {message}")]
    InvalidFormat {
        /// 资源路径
        path: String,
        /// 错误消息
        message: String,
    },

    /// 字体未找到
    ///
    /// `system_lookup` 表示在显式文件查找失败后是否已经尝试过按名称查找系统字体。
    #[error("字体未找到: {name}（系统字体查找: {system_lookup}）")]
    FontNotFound {
        /// 字体名称或路径
        name: String,
        /// 是否已尝试系统字体回退
        system_lookup: bool,
    },
}

/// 配置错误
#[derive(Error, Debug)]
pub enum ConfigError {
    /// JSON 解析失败
    #[error("配置解析失败: {0}")]
    Parse(#[from] serde_json::Error),

    /// 配置引用的资源无法加载
    #[error("配置资源错误: {0}")]
    Resource(#[from] ResourceError),
}

/// pgt 统一错误类型
#[derive(Error, Debug)]
pub enum PgtError {
    /// 资源错误
    #[error("资源错误: {0}")]
    Resource(#[from] ResourceError),

    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
}

/// Result 类型别名
pub type PgtResult<T> = Result<T, PgtError>;

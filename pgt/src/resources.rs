//! # Resources 模块
//!
//! 文件系统资源加载：图像与 JSON 描述文件。

use std::path::Path;

use image::RgbaImage;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::ResourceError;

fn path_str(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

/// 读取整个文件
///
/// 文件不存在时返回 `FileMissing`，调用方可以据此决定是否回退。
pub fn read_file(path: &Path, kind: &str) -> Result<Vec<u8>, ResourceError> {
    if !path.is_file() {
        return Err(ResourceError::FileMissing {
            path: path_str(path),
        });
    }
    std::fs::read(path).map_err(|e| ResourceError::LoadFailed {
        path: path_str(path),
        kind: kind.to_string(),
        message: e.to_string(),
    })
}

/// 加载图像并转换为 RGBA8
pub fn load_image(path: &Path) -> Result<RgbaImage, ResourceError> {
    let bytes = read_file(path, "image")?;
    let image = image::load_from_memory(&bytes).map_err(|e| ResourceError::LoadFailed {
        path: path_str(path),
        kind: "image".to_string(),
        message: e.to_string(),
    })?;
    let image = image.to_rgba8();
    debug!(path = %path_str(path), width = image.width(), height = image.height(), "图像已加载");
    Ok(image)
}

/// 读取并解析 JSON 文件
pub fn parse_json_file<T: DeserializeOwned>(path: &Path) -> Result<T, ResourceError> {
    let bytes = read_file(path, "json")?;
    serde_json::from_slice(&bytes).map_err(|e| ResourceError::InvalidFormat {
        path: path_str(path),
        message: e.to_string(),
    })
}

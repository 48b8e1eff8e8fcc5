//! # Transform 模块
//!
//! 图像变换：缩放与任意角度旋转。
//!
//! 元素总是从原始图像重新生成缓存图像，避免多次变换累积失真。

use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};

/// 缩放到指定像素尺寸
///
/// 任一维度为 0 时返回空图像。
pub fn scale(image: &RgbaImage, width: u32, height: u32) -> RgbaImage {
    if width == 0 || height == 0 {
        return RgbaImage::new(0, 0);
    }
    if image.dimensions() == (width, height) {
        return image.clone();
    }
    imageops::resize(image, width, height, FilterType::Triangle)
}

/// 逆时针旋转 `degrees` 度
///
/// 输出图像扩展为旋转后的包围盒，空白部分透明。
/// 90 度的整数倍走无损路径，其余角度使用最近邻采样。
pub fn rotate(image: &RgbaImage, degrees: f32) -> RgbaImage {
    let turns = degrees.rem_euclid(360.0);
    if turns == 0.0 {
        return image.clone();
    }
    if turns == 90.0 {
        return imageops::rotate270(image);
    }
    if turns == 180.0 {
        return imageops::rotate180(image);
    }
    if turns == 270.0 {
        return imageops::rotate90(image);
    }

    let (w, h) = image.dimensions();
    if w == 0 || h == 0 {
        return image.clone();
    }

    let rad = turns.to_radians();
    let (sin, cos) = rad.sin_cos();
    let (wf, hf) = (w as f32, h as f32);
    let out_w = (wf * cos.abs() + hf * sin.abs()).ceil() as u32;
    let out_h = (wf * sin.abs() + hf * cos.abs()).ceil() as u32;

    let mut out = RgbaImage::from_pixel(out_w, out_h, Rgba([0, 0, 0, 0]));
    let (cx_in, cy_in) = (wf / 2.0, hf / 2.0);
    let (cx_out, cy_out) = (out_w as f32 / 2.0, out_h as f32 / 2.0);

    // 屏幕坐标 y 轴向下，逆时针旋转的逆映射
    for (x, y, px) in out.enumerate_pixels_mut() {
        let dx = x as f32 + 0.5 - cx_out;
        let dy = y as f32 + 0.5 - cy_out;
        let sx = cos * dx - sin * dy + cx_in;
        let sy = sin * dx + cos * dy + cy_in;
        if sx >= 0.0 && sy >= 0.0 && sx < wf && sy < hf {
            *px = *image.get_pixel(sx as u32, sy as u32);
        }
    }
    out
}

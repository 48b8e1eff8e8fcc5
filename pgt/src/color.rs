//! # Color 模块
//!
//! RGBA 颜色与颜色运算。运算全部饱和，不会溢出。

use image::Rgba;
use serde::{Deserialize, Serialize};

/// RGBA 颜色（每通道 8 位）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "ColorRepr", into = "[u8; 4]")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

/// 配置中的颜色写法：`[r, g, b]` 或 `[r, g, b, a]`
#[derive(Deserialize)]
#[serde(untagged)]
enum ColorRepr {
    Rgb([u8; 3]),
    Rgba([u8; 4]),
}

impl From<ColorRepr> for Color {
    fn from(repr: ColorRepr) -> Self {
        match repr {
            ColorRepr::Rgb([r, g, b]) => Color::rgb(r, g, b),
            ColorRepr::Rgba([r, g, b, a]) => Color::new(r, g, b, a),
        }
    }
}

impl From<Color> for [u8; 4] {
    fn from(c: Color) -> Self {
        [c.r, c.g, c.b, c.a]
    }
}

impl From<Color> for Rgba<u8> {
    fn from(c: Color) -> Self {
        Rgba([c.r, c.g, c.b, c.a])
    }
}

impl From<Rgba<u8>> for Color {
    fn from(Rgba([r, g, b, a]): Rgba<u8>) -> Self {
        Color::new(r, g, b, a)
    }
}

pub const BLACK: Color = Color::rgb(0, 0, 0);
pub const WHITE: Color = Color::rgb(255, 255, 255);
pub const RED: Color = Color::rgb(255, 0, 0);
pub const GREEN: Color = Color::rgb(0, 255, 0);
pub const BLUE: Color = Color::rgb(0, 0, 255);
pub const YELLOW: Color = Color::rgb(255, 255, 0);
pub const CYAN: Color = Color::rgb(0, 255, 255);
pub const MAGENTA: Color = Color::rgb(255, 0, 255);
pub const TRANSPARENT: Color = Color::new(0, 0, 0, 0);

impl Color {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// 不透明颜色
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// 灰度颜色
    pub const fn gray(v: u8) -> Self {
        Self::rgb(v, v, v)
    }

    /// 替换 alpha
    pub const fn with_alpha(mut self, a: u8) -> Self {
        self.a = a;
        self
    }

    fn zip(self, other: Color, f: impl Fn(u8, u8) -> u8) -> Color {
        Color::new(f(self.r, other.r), f(self.g, other.g), f(self.b, other.b), self.a)
    }

    /// 逐通道相加（alpha 保持不变）
    pub fn add(self, other: Color) -> Color {
        self.zip(other, u8::saturating_add)
    }

    /// 逐通道相减（alpha 保持不变）
    pub fn sub(self, other: Color) -> Color {
        self.zip(other, u8::saturating_sub)
    }

    /// 所有颜色通道乘以系数
    pub fn mul(self, factor: f32) -> Color {
        let scale = |c: u8| (c as f32 * factor).round().clamp(0.0, 255.0) as u8;
        Color::new(scale(self.r), scale(self.g), scale(self.b), self.a)
    }

    /// 逐通道取小
    pub fn min(self, other: Color) -> Color {
        self.zip(other, u8::min)
    }

    /// 逐通道取大
    pub fn max(self, other: Color) -> Color {
        self.zip(other, u8::max)
    }

    /// 把 `self` 以 `alpha`（0 - 255）叠加到 `background` 上
    pub fn calc_alpha(self, background: Color, alpha: u8) -> Color {
        let t = alpha as f32 / 255.0;
        background.lerp(self, t).with_alpha(background.a)
    }

    /// 线性插值（包括 alpha）
    pub fn lerp(self, other: Color, t: f32) -> Color {
        let mix = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t).round().clamp(0.0, 255.0) as u8;
        Color::new(
            mix(self.r, other.r),
            mix(self.g, other.g),
            mix(self.b, other.b),
            mix(self.a, other.a),
        )
    }

    /// 缩放 alpha 通道
    pub fn scale_alpha(self, coverage: f32) -> Color {
        let a = (self.a as f32 * coverage).round().clamp(0.0, 255.0) as u8;
        self.with_alpha(a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_saturating_ops() {
        let c = Color::rgb(200, 100, 10);
        assert_eq!(c.add(Color::rgb(100, 100, 100)), Color::rgb(255, 200, 110));
        assert_eq!(c.sub(Color::rgb(100, 200, 5)), Color::rgb(100, 0, 5));
        assert_eq!(c.mul(2.0), Color::rgb(255, 200, 20));
        assert_eq!(c.min(Color::gray(50)), Color::rgb(50, 50, 10));
        assert_eq!(c.max(Color::gray(50)), Color::rgb(200, 100, 50));
    }

    #[test]
    fn test_calc_alpha() {
        assert_eq!(WHITE.calc_alpha(BLACK, 255), WHITE);
        assert_eq!(WHITE.calc_alpha(BLACK, 0), BLACK);
        assert_eq!(WHITE.calc_alpha(BLACK, 128), Color::gray(128));
    }

    #[test]
    fn test_lerp() {
        assert_eq!(BLACK.lerp(WHITE, 0.5), Color::gray(128));
        assert_eq!(RED.lerp(BLUE, 1.0), BLUE);
    }

    #[test]
    fn test_serde_forms() {
        let rgb: Color = serde_json::from_str("[1, 2, 3]").unwrap();
        assert_eq!(rgb, Color::rgb(1, 2, 3));
        let rgba: Color = serde_json::from_str("[1, 2, 3, 4]").unwrap();
        assert_eq!(rgba, Color::new(1, 2, 3, 4));
    }
}

//! # Geometry 模块
//!
//! 位置、尺寸与矩形。
//!
//! 坐标使用 `f32` 存储，动画可以写入非整数值；真正绘制时才取整。

use std::ops::{Add, AddAssign, Div, Mul, Neg, Sub, SubAssign};

use serde::{Deserialize, Serialize};

/// 二维位置
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "[f32; 2]", into = "[f32; 2]")]
pub struct Pos {
    pub x: f32,
    pub y: f32,
}

impl Pos {
    /// 创建新的位置
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// 原点
    pub const fn zero() -> Self {
        Self { x: 0.0, y: 0.0 }
    }

    /// 两个分量相同的位置
    pub const fn splat(v: f32) -> Self {
        Self { x: v, y: v }
    }

    /// 线性插值
    pub fn lerp(self, other: Self, t: f32) -> Self {
        Self {
            x: self.x + (other.x - self.x) * t,
            y: self.y + (other.y - self.y) * t,
        }
    }

    /// 两个分量向下取整
    pub fn floor(self) -> Self {
        Self::new(self.x.floor(), self.y.floor())
    }

    /// 到另一点的欧氏距离
    pub fn distance(self, other: Self) -> f32 {
        ((other.x - self.x).powi(2) + (other.y - self.y).powi(2)).sqrt()
    }

    /// 取整后的像素坐标（向下取整）
    pub fn to_pixel(self) -> (i64, i64) {
        (self.x.floor() as i64, self.y.floor() as i64)
    }
}

impl From<(f32, f32)> for Pos {
    fn from((x, y): (f32, f32)) -> Self {
        Self { x, y }
    }
}

impl From<[f32; 2]> for Pos {
    fn from([x, y]: [f32; 2]) -> Self {
        Self { x, y }
    }
}

impl From<Pos> for [f32; 2] {
    fn from(p: Pos) -> Self {
        [p.x, p.y]
    }
}

impl From<Size> for Pos {
    fn from(s: Size) -> Self {
        Self { x: s.w, y: s.h }
    }
}

impl Add for Pos {
    type Output = Pos;

    fn add(self, rhs: Pos) -> Pos {
        Pos::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Pos {
    fn add_assign(&mut self, rhs: Pos) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Pos {
    type Output = Pos;

    fn sub(self, rhs: Pos) -> Pos {
        Pos::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl SubAssign for Pos {
    fn sub_assign(&mut self, rhs: Pos) {
        self.x -= rhs.x;
        self.y -= rhs.y;
    }
}

impl Mul<f32> for Pos {
    type Output = Pos;

    fn mul(self, rhs: f32) -> Pos {
        Pos::new(self.x * rhs, self.y * rhs)
    }
}

impl Div<f32> for Pos {
    type Output = Pos;

    fn div(self, rhs: f32) -> Pos {
        Pos::new(self.x / rhs, self.y / rhs)
    }
}

impl Neg for Pos {
    type Output = Pos;

    fn neg(self) -> Pos {
        Pos::new(-self.x, -self.y)
    }
}

/// 二维尺寸
///
/// 允许临时为负（动画外推），绘制时按 0 处理。
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "[f32; 2]", into = "[f32; 2]")]
pub struct Size {
    pub w: f32,
    pub h: f32,
}

impl Size {
    /// 创建新的尺寸
    pub const fn new(w: f32, h: f32) -> Self {
        Self { w, h }
    }

    /// 零尺寸
    pub const fn zero() -> Self {
        Self { w: 0.0, h: 0.0 }
    }

    /// 正方形尺寸
    pub const fn splat(v: f32) -> Self {
        Self { w: v, h: v }
    }

    /// 线性插值
    pub fn lerp(self, other: Self, t: f32) -> Self {
        Self {
            w: self.w + (other.w - self.w) * t,
            h: self.h + (other.h - self.h) * t,
        }
    }

    /// 宽或高为 0（或负数）
    pub fn is_empty(&self) -> bool {
        self.w <= 0.0 || self.h <= 0.0
    }

    /// 像素尺寸（向下取整，负数按 0 处理）
    pub fn to_pixels(self) -> (u32, u32) {
        (self.w.max(0.0).floor() as u32, self.h.max(0.0).floor() as u32)
    }

    /// 从像素尺寸创建
    pub fn from_pixels(w: u32, h: u32) -> Self {
        Self::new(w as f32, h as f32)
    }
}

impl From<(f32, f32)> for Size {
    fn from((w, h): (f32, f32)) -> Self {
        Self { w, h }
    }
}

impl From<[f32; 2]> for Size {
    fn from([w, h]: [f32; 2]) -> Self {
        Self { w, h }
    }
}

impl From<Size> for [f32; 2] {
    fn from(s: Size) -> Self {
        [s.w, s.h]
    }
}

impl Add for Size {
    type Output = Size;

    fn add(self, rhs: Size) -> Size {
        Size::new(self.w + rhs.w, self.h + rhs.h)
    }
}

impl Sub for Size {
    type Output = Size;

    fn sub(self, rhs: Size) -> Size {
        Size::new(self.w - rhs.w, self.h - rhs.h)
    }
}

impl Mul<f32> for Size {
    type Output = Size;

    fn mul(self, rhs: f32) -> Size {
        Size::new(self.w * rhs, self.h * rhs)
    }
}

/// 轴对齐矩形（左上角 + 尺寸）
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// 从左上角和尺寸创建
    pub fn from_pos_size(top_left: Pos, size: Size) -> Self {
        Self::new(top_left.x, top_left.y, size.w, size.h)
    }

    pub fn top_left(&self) -> Pos {
        Pos::new(self.x, self.y)
    }

    pub fn size(&self) -> Size {
        Size::new(self.w, self.h)
    }

    pub fn center(&self) -> Pos {
        Pos::new(self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    /// 检查点是否在矩形内（包含边界）
    pub fn contains(&self, point: Pos) -> bool {
        point.x >= self.x
            && point.x <= self.x + self.w
            && point.y >= self.y
            && point.y <= self.y + self.h
    }
}

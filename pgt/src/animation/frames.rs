//! # Frames 模块
//!
//! 帧源：根据进度产生属性值。
//!
//! 帧源有两种形态：
//! - `Func`：回调函数，按固定分辨率离散化（非平滑模式时）
//! - `Sampled`：预先计算好的有限帧序列

use crate::color::Color;
use crate::geometry::{Pos, Size};

/// 帧回调上下文
///
/// 对应回调可以读取的全部运行信息。
#[derive(Debug)]
pub struct AniContext<'a, V> {
    /// 传入帧源的进度（已应用缓动，非平滑模式下已量化）
    pub progress: f32,
    /// 最近的离散帧索引
    pub frame: usize,
    /// 动画启动时从目标读取的属性值
    pub starting_value: &'a V,
    /// 上一帧写入的值（首帧为 `None`）
    pub previous_value: Option<&'a V>,
}

/// 帧回调函数类型
pub type FrameFn<V> = dyn Fn(f32, &AniContext<'_, V>) -> V;

/// 帧源
pub enum FrameSource<V> {
    /// 回调帧源
    Func {
        /// 回调
        f: Box<FrameFn<V>>,
        /// 离散帧数量
        resolution: usize,
    },
    /// 预计算的帧序列
    Sampled(Vec<V>),
}

impl<V> std::fmt::Debug for FrameSource<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Func { resolution, .. } => f
                .debug_struct("Func")
                .field("resolution", resolution)
                .finish_non_exhaustive(),
            Self::Sampled(frames) => f.debug_tuple("Sampled").field(&frames.len()).finish(),
        }
    }
}

impl<V: Clone + 'static> FrameSource<V> {
    /// 回调帧源
    pub fn func(resolution: usize, f: impl Fn(f32, &AniContext<'_, V>) -> V + 'static) -> Self {
        Self::Func {
            f: Box::new(f),
            resolution,
        }
    }

    /// 预计算帧序列
    pub fn sampled(frames: Vec<V>) -> Self {
        Self::Sampled(frames)
    }

    /// 在 `from` 和 `to` 之间线性插值
    pub fn tween(from: V, to: V, resolution: usize) -> Self
    where
        V: Lerp,
    {
        Self::func(resolution, move |p, _| from.lerp(&to, p))
    }

    /// 从动画启动时的值过渡到 `to`
    ///
    /// 例如按钮悬停时从当前尺寸放大到目标尺寸。
    pub fn tween_to(to: V, resolution: usize) -> Self
    where
        V: Lerp,
    {
        Self::func(resolution, move |p, ctx| ctx.starting_value.lerp(&to, p))
    }

    /// 离散帧数量
    pub fn resolution(&self) -> usize {
        match self {
            Self::Func { resolution, .. } => *resolution,
            Self::Sampled(frames) => frames.len(),
        }
    }

    /// 进度对应的最近帧索引
    pub fn frame_index(&self, progress: f32) -> usize {
        let n = self.resolution();
        if n <= 1 {
            return 0;
        }
        let last = (n - 1) as f32;
        (progress.clamp(0.0, 1.0) * last).round() as usize
    }

    /// 把进度量化到最近的离散帧
    pub fn quantize(&self, progress: f32) -> f32 {
        let n = self.resolution();
        if n <= 1 {
            return progress;
        }
        self.frame_index(progress) as f32 / (n - 1) as f32
    }

    /// 计算进度对应的值
    ///
    /// 空的帧序列返回 `None`。
    pub fn evaluate(&self, progress: f32, ctx: &AniContext<'_, V>) -> Option<V> {
        match self {
            Self::Func { f, .. } => Some(f(progress, ctx)),
            Self::Sampled(frames) => frames.get(self.frame_index(progress)).cloned(),
        }
    }
}

/// 可线性插值的值
pub trait Lerp {
    fn lerp(&self, other: &Self, t: f32) -> Self;
}

impl Lerp for f32 {
    fn lerp(&self, other: &Self, t: f32) -> Self {
        self + (other - self) * t
    }
}

impl Lerp for Pos {
    fn lerp(&self, other: &Self, t: f32) -> Self {
        Pos::lerp(*self, *other, t)
    }
}

impl Lerp for Size {
    fn lerp(&self, other: &Self, t: f32) -> Self {
        Size::lerp(*self, *other, t)
    }
}

impl Lerp for Color {
    fn lerp(&self, other: &Self, t: f32) -> Self {
        Color::lerp(*self, *other, t)
    }
}

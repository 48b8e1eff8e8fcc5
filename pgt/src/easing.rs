//! # Easing 模块
//!
//! 缓动函数库，用于动画的时间插值。
//!
//! 所有函数接收进度 `p`（通常在 0.0 - 1.0 之间）并返回缓动后的进度。
//! 输入 **不做截断**：超出范围的进度按同一公式外推，回弹（back）与
//! 弹性（elastic）族本身也会超出 0.0 - 1.0。
//!
//! 缓入缓出变体统一由 [`in_out`] 组合：前半段重新映射到 0.0 - 1.0 后
//! 使用缓入函数，后半段使用缓出函数，再缩放回各自的半区间。

use std::f32::consts::PI;
use std::str::FromStr;

const BACK_C1: f32 = 1.70158;
const BACK_C3: f32 = BACK_C1 + 1.0;
const ELASTIC_C4: f32 = (2.0 * PI) / 3.0;
const BOUNCE_N1: f32 = 7.5625;
const BOUNCE_D1: f32 = 2.75;

/// 由一对缓入/缓出函数组合出缓入缓出
#[inline]
pub fn in_out(p: f32, ease_in: fn(f32) -> f32, ease_out: fn(f32) -> f32) -> f32 {
    if p < 0.5 {
        ease_in(p * 2.0) / 2.0
    } else {
        0.5 + ease_out(p * 2.0 - 1.0) / 2.0
    }
}

/// 线性（匀速）
pub fn linear(p: f32) -> f32 {
    p
}

// ---------------------------------------------------------------------------
// 正弦
// ---------------------------------------------------------------------------

pub fn in_sine(p: f32) -> f32 {
    1.0 - (p * PI / 2.0).cos()
}

pub fn out_sine(p: f32) -> f32 {
    (p * PI / 2.0).sin()
}

pub fn in_out_sine(p: f32) -> f32 {
    in_out(p, in_sine, out_sine)
}

// ---------------------------------------------------------------------------
// 多项式（二次 ~ 五次）
// ---------------------------------------------------------------------------

pub fn in_quad(p: f32) -> f32 {
    p * p
}

pub fn out_quad(p: f32) -> f32 {
    1.0 - (1.0 - p).powi(2)
}

pub fn in_out_quad(p: f32) -> f32 {
    in_out(p, in_quad, out_quad)
}

pub fn in_cubic(p: f32) -> f32 {
    p * p * p
}

pub fn out_cubic(p: f32) -> f32 {
    1.0 - (1.0 - p).powi(3)
}

pub fn in_out_cubic(p: f32) -> f32 {
    in_out(p, in_cubic, out_cubic)
}

pub fn in_quart(p: f32) -> f32 {
    p.powi(4)
}

pub fn out_quart(p: f32) -> f32 {
    1.0 - (1.0 - p).powi(4)
}

pub fn in_out_quart(p: f32) -> f32 {
    in_out(p, in_quart, out_quart)
}

pub fn in_quint(p: f32) -> f32 {
    p.powi(5)
}

pub fn out_quint(p: f32) -> f32 {
    1.0 - (1.0 - p).powi(5)
}

pub fn in_out_quint(p: f32) -> f32 {
    in_out(p, in_quint, out_quint)
}

// ---------------------------------------------------------------------------
// 指数
// ---------------------------------------------------------------------------

pub fn in_exp(p: f32) -> f32 {
    if p == 0.0 {
        0.0
    } else {
        2.0_f32.powf(10.0 * p - 10.0)
    }
}

pub fn out_exp(p: f32) -> f32 {
    if p == 1.0 {
        1.0
    } else {
        1.0 - 2.0_f32.powf(-10.0 * p)
    }
}

pub fn in_out_exp(p: f32) -> f32 {
    in_out(p, in_exp, out_exp)
}

// ---------------------------------------------------------------------------
// 圆形
// ---------------------------------------------------------------------------

/// 圆形缓入
///
/// 在 0.0 - 1.0 之外没有实数解，返回 NaN。
pub fn in_circ(p: f32) -> f32 {
    1.0 - (1.0 - p * p).sqrt()
}

pub fn out_circ(p: f32) -> f32 {
    (1.0 - (p - 1.0).powi(2)).sqrt()
}

pub fn in_out_circ(p: f32) -> f32 {
    in_out(p, in_circ, out_circ)
}

// ---------------------------------------------------------------------------
// 回弹（超调）
// ---------------------------------------------------------------------------

pub fn in_back(p: f32) -> f32 {
    BACK_C3 * p * p * p - BACK_C1 * p * p
}

pub fn out_back(p: f32) -> f32 {
    let q = p - 1.0;
    1.0 + BACK_C3 * q * q * q + BACK_C1 * q * q
}

pub fn in_out_back(p: f32) -> f32 {
    in_out(p, in_back, out_back)
}

// ---------------------------------------------------------------------------
// 弹性
// ---------------------------------------------------------------------------

pub fn in_elastic(p: f32) -> f32 {
    if p == 0.0 {
        0.0
    } else if p == 1.0 {
        1.0
    } else {
        -(2.0_f32.powf(10.0 * p - 10.0)) * ((p * 10.0 - 10.75) * ELASTIC_C4).sin()
    }
}

pub fn out_elastic(p: f32) -> f32 {
    if p == 0.0 {
        0.0
    } else if p == 1.0 {
        1.0
    } else {
        2.0_f32.powf(-10.0 * p) * ((p * 10.0 - 0.75) * ELASTIC_C4).sin() + 1.0
    }
}

pub fn in_out_elastic(p: f32) -> f32 {
    in_out(p, in_elastic, out_elastic)
}

// ---------------------------------------------------------------------------
// 弹跳
// ---------------------------------------------------------------------------

pub fn in_bounce(p: f32) -> f32 {
    1.0 - out_bounce(1.0 - p)
}

/// 弹跳缓出：四段二次曲线
pub fn out_bounce(p: f32) -> f32 {
    if p < 1.0 / BOUNCE_D1 {
        BOUNCE_N1 * p * p
    } else if p < 2.0 / BOUNCE_D1 {
        let p = p - 1.5 / BOUNCE_D1;
        BOUNCE_N1 * p * p + 0.75
    } else if p < 2.5 / BOUNCE_D1 {
        let p = p - 2.25 / BOUNCE_D1;
        BOUNCE_N1 * p * p + 0.9375
    } else {
        let p = p - 2.625 / BOUNCE_D1;
        BOUNCE_N1 * p * p + 0.984375
    }
}

pub fn in_out_bounce(p: f32) -> f32 {
    in_out(p, in_bounce, out_bounce)
}

/// 缓动函数类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EasingFunction {
    /// 线性（匀速）
    #[default]
    Linear,
    InSine,
    OutSine,
    InOutSine,
    InQuad,
    OutQuad,
    InOutQuad,
    InCubic,
    OutCubic,
    InOutCubic,
    InQuart,
    OutQuart,
    InOutQuart,
    InQuint,
    OutQuint,
    InOutQuint,
    InExp,
    OutExp,
    InOutExp,
    InCirc,
    OutCirc,
    InOutCirc,
    /// 回弹缓入（会短暂低于 0）
    InBack,
    /// 回弹缓出（会短暂超过 1）
    OutBack,
    InOutBack,
    InElastic,
    OutElastic,
    InOutElastic,
    InBounce,
    OutBounce,
    InOutBounce,
}

impl EasingFunction {
    /// 全部缓动函数，按族排列
    pub const ALL: [EasingFunction; 31] = [
        Self::Linear,
        Self::InSine,
        Self::OutSine,
        Self::InOutSine,
        Self::InQuad,
        Self::OutQuad,
        Self::InOutQuad,
        Self::InCubic,
        Self::OutCubic,
        Self::InOutCubic,
        Self::InQuart,
        Self::OutQuart,
        Self::InOutQuart,
        Self::InQuint,
        Self::OutQuint,
        Self::InOutQuint,
        Self::InExp,
        Self::OutExp,
        Self::InOutExp,
        Self::InCirc,
        Self::OutCirc,
        Self::InOutCirc,
        Self::InBack,
        Self::OutBack,
        Self::InOutBack,
        Self::InElastic,
        Self::OutElastic,
        Self::InOutElastic,
        Self::InBounce,
        Self::OutBounce,
        Self::InOutBounce,
    ];

    /// 获取对应的函数指针
    pub fn as_fn(&self) -> fn(f32) -> f32 {
        match self {
            Self::Linear => linear,
            Self::InSine => in_sine,
            Self::OutSine => out_sine,
            Self::InOutSine => in_out_sine,
            Self::InQuad => in_quad,
            Self::OutQuad => out_quad,
            Self::InOutQuad => in_out_quad,
            Self::InCubic => in_cubic,
            Self::OutCubic => out_cubic,
            Self::InOutCubic => in_out_cubic,
            Self::InQuart => in_quart,
            Self::OutQuart => out_quart,
            Self::InOutQuart => in_out_quart,
            Self::InQuint => in_quint,
            Self::OutQuint => out_quint,
            Self::InOutQuint => in_out_quint,
            Self::InExp => in_exp,
            Self::OutExp => out_exp,
            Self::InOutExp => in_out_exp,
            Self::InCirc => in_circ,
            Self::OutCirc => out_circ,
            Self::InOutCirc => in_out_circ,
            Self::InBack => in_back,
            Self::OutBack => out_back,
            Self::InOutBack => in_out_back,
            Self::InElastic => in_elastic,
            Self::OutElastic => out_elastic,
            Self::InOutElastic => in_out_elastic,
            Self::InBounce => in_bounce,
            Self::OutBounce => out_bounce,
            Self::InOutBounce => in_out_bounce,
        }
    }

    /// 计算缓动值
    ///
    /// # 参数
    /// - `t`: 时间进度（通常 0.0 - 1.0，不做截断）
    ///
    /// # 返回
    /// - 缓动后的进度值
    pub fn apply(&self, t: f32) -> f32 {
        (self.as_fn())(t)
    }

    /// 蛇形命名的名称，例如 `"in_out_cubic"`
    pub fn name(&self) -> &'static str {
        match self {
            Self::Linear => "linear",
            Self::InSine => "in_sine",
            Self::OutSine => "out_sine",
            Self::InOutSine => "in_out_sine",
            Self::InQuad => "in_quad",
            Self::OutQuad => "out_quad",
            Self::InOutQuad => "in_out_quad",
            Self::InCubic => "in_cubic",
            Self::OutCubic => "out_cubic",
            Self::InOutCubic => "in_out_cubic",
            Self::InQuart => "in_quart",
            Self::OutQuart => "out_quart",
            Self::InOutQuart => "in_out_quart",
            Self::InQuint => "in_quint",
            Self::OutQuint => "out_quint",
            Self::InOutQuint => "in_out_quint",
            Self::InExp => "in_exp",
            Self::OutExp => "out_exp",
            Self::InOutExp => "in_out_exp",
            Self::InCirc => "in_circ",
            Self::OutCirc => "out_circ",
            Self::InOutCirc => "in_out_circ",
            Self::InBack => "in_back",
            Self::OutBack => "out_back",
            Self::InOutBack => "in_out_back",
            Self::InElastic => "in_elastic",
            Self::OutElastic => "out_elastic",
            Self::InOutElastic => "in_out_elastic",
            Self::InBounce => "in_bounce",
            Self::OutBounce => "out_bounce",
            Self::InOutBounce => "in_out_bounce",
        }
    }
}

impl FromStr for EasingFunction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|e| e.name() == s)
            .ok_or_else(|| format!("未知的缓动函数: {}", s))
    }
}

impl std::fmt::Display for EasingFunction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

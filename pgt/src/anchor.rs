//! # Anchor 模块
//!
//! 锚点：元素存储的位置对应其包围盒中的哪一个参考点。
//!
//! 九种锚点由 {上, 中, 下} × {左, 中, 右} 组合而成。解析不缓存，
//! 每次读取都根据当前的位置、尺寸和锚点重新计算。

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::geometry::{Pos, Size};

/// 水平参考
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HAnchor {
    Left,
    Center,
    Right,
}

impl HAnchor {
    /// 占宽度的比例
    fn factor(self) -> f32 {
        match self {
            Self::Left => 0.0,
            Self::Center => 0.5,
            Self::Right => 1.0,
        }
    }
}

/// 垂直参考
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VAnchor {
    Upper,
    Center,
    Down,
}

impl VAnchor {
    fn factor(self) -> f32 {
        match self {
            Self::Upper => 0.0,
            Self::Center => 0.5,
            Self::Down => 1.0,
        }
    }
}

/// 锚点
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Anchor {
    #[default]
    UpperLeft,
    UpperCenter,
    UpperRight,
    CenterLeft,
    CenterCenter,
    CenterRight,
    DownLeft,
    DownCenter,
    DownRight,
}

impl Anchor {
    /// 全部锚点
    pub const ALL: [Anchor; 9] = [
        Self::UpperLeft,
        Self::UpperCenter,
        Self::UpperRight,
        Self::CenterLeft,
        Self::CenterCenter,
        Self::CenterRight,
        Self::DownLeft,
        Self::DownCenter,
        Self::DownRight,
    ];

    /// 由两个方向组合
    pub fn new(v: VAnchor, h: HAnchor) -> Self {
        match (v, h) {
            (VAnchor::Upper, HAnchor::Left) => Self::UpperLeft,
            (VAnchor::Upper, HAnchor::Center) => Self::UpperCenter,
            (VAnchor::Upper, HAnchor::Right) => Self::UpperRight,
            (VAnchor::Center, HAnchor::Left) => Self::CenterLeft,
            (VAnchor::Center, HAnchor::Center) => Self::CenterCenter,
            (VAnchor::Center, HAnchor::Right) => Self::CenterRight,
            (VAnchor::Down, HAnchor::Left) => Self::DownLeft,
            (VAnchor::Down, HAnchor::Center) => Self::DownCenter,
            (VAnchor::Down, HAnchor::Right) => Self::DownRight,
        }
    }

    pub fn horizontal(&self) -> HAnchor {
        match self {
            Self::UpperLeft | Self::CenterLeft | Self::DownLeft => HAnchor::Left,
            Self::UpperCenter | Self::CenterCenter | Self::DownCenter => HAnchor::Center,
            Self::UpperRight | Self::CenterRight | Self::DownRight => HAnchor::Right,
        }
    }

    pub fn vertical(&self) -> VAnchor {
        match self {
            Self::UpperLeft | Self::UpperCenter | Self::UpperRight => VAnchor::Upper,
            Self::CenterLeft | Self::CenterCenter | Self::CenterRight => VAnchor::Center,
            Self::DownLeft | Self::DownCenter | Self::DownRight => VAnchor::Down,
        }
    }

    /// 锚点相对于左上角的偏移（未取整）
    pub fn offset(&self, size: Size) -> Pos {
        Pos::new(
            size.w * self.horizontal().factor(),
            size.h * self.vertical().factor(),
        )
    }

    /// 把锚点位置解析为左上角绘制坐标
    ///
    /// 结果向下取整，奇数尺寸的居中锚点不会产生半像素抖动。
    pub fn resolve(&self, pos: Pos, size: Size) -> Pos {
        (pos - self.offset(size)).floor()
    }

    /// [`Anchor::resolve`] 的逆运算：由左上角恢复锚点位置
    pub fn anchor_point(&self, top_left: Pos, size: Size) -> Pos {
        top_left + self.offset(size)
    }

    /// 两字母简写，例如 `"CC"`
    pub fn short_name(&self) -> &'static str {
        match self {
            Self::UpperLeft => "UL",
            Self::UpperCenter => "UC",
            Self::UpperRight => "UR",
            Self::CenterLeft => "CL",
            Self::CenterCenter => "CC",
            Self::CenterRight => "CR",
            Self::DownLeft => "DL",
            Self::DownCenter => "DC",
            Self::DownRight => "DR",
        }
    }

    /// 解析锚点名称，未知名称返回 `None`
    ///
    /// 接受两字母简写（`"CC"`）与蛇形全称（`"center_center"`），不区分大小写。
    pub fn parse(name: &str) -> Option<Self> {
        let lower = name.trim().to_ascii_lowercase();
        Self::ALL.iter().copied().find(|a| {
            a.short_name().eq_ignore_ascii_case(&lower) || a.long_name() == lower
        })
    }

    /// 宽容解析：未知名称回退为 [`Anchor::UpperLeft`] 并记录警告
    pub fn parse_lossy(name: &str) -> Self {
        Self::parse(name).unwrap_or_else(|| {
            warn!(anchor = %name, "未知的锚点，使用 UpperLeft");
            Self::default()
        })
    }

    fn long_name(&self) -> &'static str {
        match self {
            Self::UpperLeft => "upper_left",
            Self::UpperCenter => "upper_center",
            Self::UpperRight => "upper_right",
            Self::CenterLeft => "center_left",
            Self::CenterCenter => "center_center",
            Self::CenterRight => "center_right",
            Self::DownLeft => "down_left",
            Self::DownCenter => "down_center",
            Self::DownRight => "down_right",
        }
    }
}

impl From<String> for Anchor {
    fn from(s: String) -> Self {
        Self::parse_lossy(&s)
    }
}

impl From<Anchor> for String {
    fn from(a: Anchor) -> Self {
        a.short_name().to_string()
    }
}

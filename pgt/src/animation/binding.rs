//! # Binding 模块
//!
//! 动画目标属性的绑定：在构造动画时确定的 getter/setter 函数对。
//!
//! 绑定取代按名称字符串查找属性，写入目标时不需要任何运行时分派。

use image::RgbaImage;

use crate::color::Color;
use crate::element::Widget;
use crate::geometry::{Pos, Size};
use crate::gui::Label;

/// 属性绑定
pub struct Binding<E, V> {
    name: &'static str,
    get: fn(&E) -> V,
    set: fn(&mut E, V),
}

impl<E, V> Clone for Binding<E, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<E, V> Copy for Binding<E, V> {}

impl<E, V> std::fmt::Debug for Binding<E, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Binding").field("name", &self.name).finish()
    }
}

impl<E, V> Binding<E, V> {
    /// 自定义绑定
    pub const fn new(name: &'static str, get: fn(&E) -> V, set: fn(&mut E, V)) -> Self {
        Self { name, get, set }
    }

    /// 属性名称（用于日志）
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// 读取目标的当前值
    pub fn get(&self, owner: &E) -> V {
        (self.get)(owner)
    }

    /// 写入目标
    pub fn set(&self, owner: &mut E, value: V) {
        (self.set)(owner, value)
    }
}

/// 元素位置
pub fn position<W: Widget>() -> Binding<W, Pos> {
    Binding::new("pos", |w: &W| w.pos(), |w: &mut W, v| w.move_to(v))
}

/// 元素尺寸（缩放动画）
pub fn size<W: Widget>() -> Binding<W, Size> {
    Binding::new("size", |w: &W| w.size(), |w: &mut W, v| w.resize(v))
}

/// 旋转角度（度，逆时针）
pub fn rotation<W: Widget>() -> Binding<W, f32> {
    Binding::new(
        "rotation",
        |w: &W| w.element().rotation(),
        |w: &mut W, v| w.rotate(v),
    )
}

/// 元素图像（纹理动画）
pub fn image<W: Widget>() -> Binding<W, RgbaImage> {
    Binding::new(
        "image",
        |w: &W| {
            w.element()
                .source_image()
                .cloned()
                .unwrap_or_else(|| RgbaImage::new(0, 0))
        },
        |w: &mut W, v| w.change_image(v),
    )
}

/// 标签文字颜色
pub fn label_color() -> Binding<Label, Color> {
    Binding::new("color", |l: &Label| l.color(), |l: &mut Label, v| l.set_color(v))
}

/// 标签文本（打字机等文本动画）
pub fn label_text() -> Binding<Label, String> {
    Binding::new(
        "text",
        |l: &Label| l.text().to_string(),
        |l: &mut Label, v| l.set_text(v),
    )
}

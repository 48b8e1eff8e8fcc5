//! # Element 模块
//!
//! 带锚点的可绘制元素。
//!
//! ## 坐标约定
//!
//! - `pos` 是锚点所在的位置，不是左上角
//! - 绘制区域始终是 `anchor.resolve(pos, size)` 开始的 `size` 大小的矩形
//! - 缓存图像总是从原始图像重新生成（缩放、旋转），变换不会累积

use image::RgbaImage;
use tracing::trace;

use crate::anchor::Anchor;
use crate::animation::{AnimationSet, Animated};
use crate::geometry::{Pos, Rect, Size};
use crate::transform;

/// 绘制目标
///
/// 窗口、离屏缓冲等任何可以接收图像的表面。
pub trait RenderTarget {
    /// 目标的像素尺寸
    fn size(&self) -> (u32, u32);

    /// 以 alpha 混合方式把 `image` 绘制到 `(x, y)`（可为负数或越界）
    fn blit(&mut self, image: &RgbaImage, x: i64, y: i64);
}

impl RenderTarget for RgbaImage {
    fn size(&self) -> (u32, u32) {
        self.dimensions()
    }

    fn blit(&mut self, image: &RgbaImage, x: i64, y: i64) {
        image::imageops::overlay(self, image, x, y);
    }
}

/// 基础元素
#[derive(Debug, Clone)]
pub struct Element {
    /// 锚点位置
    pos: Pos,
    /// 元素尺寸
    size: Size,
    anchor: Anchor,
    /// 原始图像
    source: Option<RgbaImage>,
    /// 缩放、旋转后的绘制图像
    image: RgbaImage,
    /// 旋转角度（度，逆时针）
    rotation: f32,
    /// 把原始图像缩放到元素尺寸
    stretch: bool,
    /// 尺寸跟随原始图像
    auto_size: bool,
    /// 图像相对于元素左上角的偏移
    img_offset: Pos,
    /// 旋转后图像居中产生的偏移
    rotation_offset: Pos,
    visible: bool,
}

impl Element {
    /// 创建没有图像的元素
    pub fn new(pos: Pos, size: Size) -> Self {
        Self {
            pos,
            size,
            anchor: Anchor::default(),
            source: None,
            image: RgbaImage::new(0, 0),
            rotation: 0.0,
            stretch: true,
            auto_size: false,
            img_offset: Pos::zero(),
            rotation_offset: Pos::zero(),
            visible: true,
        }
    }

    /// 以图像创建元素，尺寸跟随图像
    pub fn with_image(pos: Pos, image: RgbaImage) -> Self {
        let mut element = Self::new(pos, Size::zero());
        element.auto_size = true;
        element.change_image(image);
        element
    }

    pub fn with_anchor(mut self, anchor: Anchor) -> Self {
        self.anchor = anchor;
        self
    }

    /// 设置是否缩放图像到元素尺寸
    pub fn with_stretch(mut self, stretch: bool) -> Self {
        self.stretch = stretch;
        self.rebuild();
        self
    }

    /// 设置尺寸是否跟随图像
    pub fn with_auto_size(mut self, auto_size: bool) -> Self {
        self.auto_size = auto_size;
        self.rebuild();
        self
    }

    pub fn pos(&self) -> Pos {
        self.pos
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn anchor(&self) -> Anchor {
        self.anchor
    }

    /// 修改锚点；`pos` 保持不变，绘制区域随之移动
    pub fn set_anchor(&mut self, anchor: Anchor) {
        self.anchor = anchor;
    }

    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    pub fn is_auto_size(&self) -> bool {
        self.auto_size
    }

    pub fn set_auto_size(&mut self, auto_size: bool) {
        self.auto_size = auto_size;
        self.rebuild();
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn show(&mut self) {
        self.visible = true;
    }

    pub fn hide(&mut self) {
        self.visible = false;
    }

    pub fn move_to(&mut self, pos: Pos) {
        self.pos = pos;
    }

    pub fn move_by(&mut self, delta: Pos) {
        self.pos += delta;
    }

    /// 修改尺寸并重新生成绘制图像
    ///
    /// 显式设置尺寸会关闭 auto-size。
    pub fn resize(&mut self, size: Size) {
        self.size = size;
        self.auto_size = false;
        self.rebuild();
    }

    /// 设置旋转角度（绝对值）
    ///
    /// 元素尺寸不变，旋转后的图像在元素区域内居中。
    pub fn rotate(&mut self, degrees: f32) {
        self.rotation = degrees;
        self.rebuild();
    }

    /// 替换原始图像
    pub fn change_image(&mut self, image: RgbaImage) {
        self.source = Some(image);
        self.rebuild();
    }

    /// 原始图像
    pub fn source_image(&self) -> Option<&RgbaImage> {
        self.source.as_ref()
    }

    /// 实际绘制的图像
    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn img_offset(&self) -> Pos {
        self.img_offset
    }

    pub fn set_img_offset(&mut self, offset: Pos) {
        self.img_offset = offset;
    }

    /// 绘制区域左上角
    pub fn top_left(&self) -> Pos {
        self.anchor.resolve(self.pos, self.size)
    }

    /// 绘制区域
    pub fn rect(&self) -> Rect {
        Rect::from_pos_size(self.top_left(), self.size)
    }

    /// 绘制到目标
    pub fn draw(&self, target: &mut dyn RenderTarget) {
        self.draw_offset(target, Pos::zero());
    }

    /// 附加偏移后绘制到目标
    pub fn draw_offset(&self, target: &mut dyn RenderTarget, offset: Pos) {
        if !self.visible || self.image.width() == 0 || self.image.height() == 0 {
            return;
        }
        let at = self.top_left() + self.img_offset + self.rotation_offset + offset;
        let (x, y) = at.floor().to_pixel();
        target.blit(&self.image, x, y);
    }

    fn rebuild(&mut self) {
        let Some(source) = &self.source else {
            self.image = RgbaImage::new(0, 0);
            self.rotation_offset = Pos::zero();
            return;
        };

        if self.auto_size {
            let (w, h) = source.dimensions();
            self.size = Size::from_pixels(w, h);
        }

        let (w, h) = self.size.to_pixels();
        let base = if self.stretch && !self.auto_size {
            transform::scale(source, w, h)
        } else {
            source.clone()
        };

        if self.rotation.rem_euclid(360.0) == 0.0 {
            self.image = base;
            self.rotation_offset = Pos::zero();
        } else {
            let rotated = transform::rotate(&base, self.rotation);
            let (bw, bh) = base.dimensions();
            let (rw, rh) = rotated.dimensions();
            self.rotation_offset =
                Pos::new((bw as f32 - rw as f32) / 2.0, (bh as f32 - rh as f32) / 2.0).floor();
            self.image = rotated;
        }
        trace!(size = ?self.size, rotation = self.rotation, "元素图像已重建");
    }
}

/// 元素行为
///
/// 所有 GUI 元素都包装一个 `Element`；默认实现直接转发，
/// 需要在几何变化时重新排版的元素（如 `Label`）覆盖相应方法。
pub trait Widget {
    fn element(&self) -> &Element;
    fn element_mut(&mut self) -> &mut Element;

    fn pos(&self) -> Pos {
        self.element().pos()
    }

    fn size(&self) -> Size {
        self.element().size()
    }

    fn anchor(&self) -> Anchor {
        self.element().anchor()
    }

    fn rect(&self) -> Rect {
        self.element().rect()
    }

    fn move_to(&mut self, pos: Pos) {
        self.element_mut().move_to(pos);
    }

    fn move_by(&mut self, delta: Pos) {
        self.element_mut().move_by(delta);
    }

    fn resize(&mut self, size: Size) {
        self.element_mut().resize(size);
    }

    fn rotate(&mut self, degrees: f32) {
        self.element_mut().rotate(degrees);
    }

    fn change_image(&mut self, image: RgbaImage) {
        self.element_mut().change_image(image);
    }

    fn draw(&self, target: &mut dyn RenderTarget) {
        self.element().draw(target);
    }
}

impl Widget for Element {
    fn element(&self) -> &Element {
        self
    }

    fn element_mut(&mut self) -> &mut Element {
        self
    }
}

/// 可动画元素
#[derive(Debug)]
pub struct AniElement {
    element: Element,
    animations: AnimationSet<AniElement>,
}

impl AniElement {
    pub fn new(pos: Pos, size: Size) -> Self {
        Self::from_element(Element::new(pos, size))
    }

    pub fn with_image(pos: Pos, image: RgbaImage) -> Self {
        Self::from_element(Element::with_image(pos, image))
    }

    pub fn from_element(element: Element) -> Self {
        Self {
            element,
            animations: AnimationSet::new(),
        }
    }

    pub fn with_anchor(mut self, anchor: Anchor) -> Self {
        self.element.set_anchor(anchor);
        self
    }
}

impl Widget for AniElement {
    fn element(&self) -> &Element {
        &self.element
    }

    fn element_mut(&mut self) -> &mut Element {
        &mut self.element
    }
}

impl Animated for AniElement {
    fn animations(&self) -> &AnimationSet<Self> {
        &self.animations
    }

    fn animations_mut(&mut self) -> &mut AnimationSet<Self> {
        &mut self.animations
    }
}

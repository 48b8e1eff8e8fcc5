//! # Label 模块
//!
//! 文本标签：折行、对齐、合成图像。
//!
//! 任何影响排版的属性（文本、字体、尺寸、颜色、样式、行高、对齐）
//! 被修改后都会立即重新排版并重新生成图像。

use std::rc::Rc;

use image::RgbaImage;
use image::imageops;
use tracing::trace;

use super::font::{Font, FontStyle};
use super::layout::{Alignment, wrap_text};
use crate::anchor::Anchor;
use crate::animation::{AnimationSet, Animated};
use crate::color::{self, Color};
use crate::element::{Element, Widget};
use crate::geometry::{Pos, Size};

/// 文本标签
#[derive(Debug)]
pub struct Label {
    element: Element,
    text: String,
    font: Rc<dyn Font>,
    color: Color,
    bg_color: Option<Color>,
    style: FontStyle,
    alignment: Alignment,
    /// 显式行高；`None` 使用字体行高
    line_height: Option<u32>,
    /// 按元素宽度折行
    adapt_width: bool,
    /// 图像大小跟随内容，可以超出元素区域
    exceed_size: bool,
    /// 元素尺寸跟随图像
    auto_size: bool,
    lines: Vec<String>,
    animations: AnimationSet<Label>,
}

impl Label {
    /// 创建标签
    ///
    /// 默认左对齐、不折行，尺寸跟随内容，直到显式设置尺寸。
    pub fn new(text: impl Into<String>, font: Rc<dyn Font>) -> Self {
        let mut label = Self {
            element: Element::new(Pos::zero(), Size::zero()).with_stretch(false),
            text: text.into(),
            font,
            color: color::BLACK,
            bg_color: None,
            style: FontStyle::default(),
            alignment: Alignment::Left,
            line_height: None,
            adapt_width: false,
            exceed_size: true,
            auto_size: true,
            lines: Vec::new(),
            animations: AnimationSet::new(),
        };
        label.relayout();
        label
    }

    pub fn at(mut self, pos: Pos) -> Self {
        self.element.move_to(pos);
        self
    }

    pub fn sized(mut self, size: Size) -> Self {
        self.resize(size);
        self
    }

    pub fn with_anchor(mut self, anchor: Anchor) -> Self {
        self.element.set_anchor(anchor);
        self
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.set_color(color);
        self
    }

    pub fn with_background(mut self, bg_color: Option<Color>) -> Self {
        self.set_bg_color(bg_color);
        self
    }

    pub fn with_style(mut self, style: FontStyle) -> Self {
        self.set_style(style);
        self
    }

    pub fn with_alignment(mut self, alignment: Alignment) -> Self {
        self.set_alignment(alignment);
        self
    }

    pub fn with_line_height(mut self, line_height: Option<u32>) -> Self {
        self.set_line_height(line_height);
        self
    }

    pub fn with_adapt_width(mut self, adapt_width: bool) -> Self {
        self.set_adapt_width(adapt_width);
        self
    }

    pub fn with_exceed_size(mut self, exceed_size: bool) -> Self {
        self.set_exceed_size(exceed_size);
        self
    }

    pub fn with_auto_size(mut self, auto_size: bool) -> Self {
        self.set_auto_size(auto_size);
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// 修改文本并立即重新排版
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.relayout();
    }

    pub fn font(&self) -> &Rc<dyn Font> {
        &self.font
    }

    pub fn set_font(&mut self, font: Rc<dyn Font>) {
        self.font = font;
        self.relayout();
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn set_color(&mut self, color: Color) {
        self.color = color;
        self.relayout();
    }

    pub fn bg_color(&self) -> Option<Color> {
        self.bg_color
    }

    pub fn set_bg_color(&mut self, bg_color: Option<Color>) {
        self.bg_color = bg_color;
        self.relayout();
    }

    pub fn style(&self) -> FontStyle {
        self.style
    }

    pub fn set_style(&mut self, style: FontStyle) {
        self.style = style;
        self.relayout();
    }

    pub fn alignment(&self) -> Alignment {
        self.alignment
    }

    pub fn set_alignment(&mut self, alignment: Alignment) {
        self.alignment = alignment;
        self.relayout();
    }

    /// 实际使用的行高
    pub fn line_height(&self) -> u32 {
        self.line_height.unwrap_or_else(|| self.font.line_height())
    }

    pub fn set_line_height(&mut self, line_height: Option<u32>) {
        self.line_height = line_height;
        self.relayout();
    }

    pub fn adapt_width(&self) -> bool {
        self.adapt_width
    }

    pub fn set_adapt_width(&mut self, adapt_width: bool) {
        self.adapt_width = adapt_width;
        self.relayout();
    }

    pub fn exceed_size(&self) -> bool {
        self.exceed_size
    }

    pub fn set_exceed_size(&mut self, exceed_size: bool) {
        self.exceed_size = exceed_size;
        self.relayout();
    }

    pub fn auto_size(&self) -> bool {
        self.auto_size
    }

    pub fn set_auto_size(&mut self, auto_size: bool) {
        self.auto_size = auto_size;
        self.relayout();
    }

    /// 折行后的各行
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// 重新折行并生成合成图像
    fn relayout(&mut self) {
        let size = self.element.size();
        let budget =
            (self.adapt_width && !self.auto_size).then(|| size.w.max(0.0).floor() as u32);
        let font = self.font.clone();
        self.lines = wrap_text(&self.text, budget, |s| font.text_width(s));

        let line_h = self.line_height();
        let widths: Vec<u32> = self.lines.iter().map(|l| font.text_width(l)).collect();
        let (img_w, img_h) = if self.exceed_size {
            let w = widths.iter().copied().max().unwrap_or(0);
            (w, line_h * self.lines.len() as u32)
        } else {
            size.to_pixels()
        };

        let mut image = RgbaImage::new(img_w, img_h);
        for (i, (line, &width)) in self.lines.iter().zip(&widths).enumerate() {
            let rendered = font.render(line, self.color, self.bg_color, self.style);
            let x = self.alignment.line_offset(img_w, width);
            let y = (line_h as i64) * i as i64;
            imageops::overlay(&mut image, &rendered, x, y);
        }

        let offset = if self.alignment == Alignment::Left || self.auto_size {
            Pos::zero()
        } else if self.alignment == Alignment::Right {
            Pos::new(size.w - img_w as f32, 0.0)
        } else {
            Pos::new((size.w - img_w as f32) / 2.0, 0.0)
        };

        trace!(lines = self.lines.len(), width = img_w, height = img_h, "标签已重新排版");
        self.element.set_img_offset(offset);
        self.element.set_auto_size(self.auto_size);
        self.element.change_image(image);
    }
}

impl Widget for Label {
    fn element(&self) -> &Element {
        &self.element
    }

    fn element_mut(&mut self) -> &mut Element {
        &mut self.element
    }

    /// 显式设置尺寸会关闭 auto-size，并按新宽度重新排版
    fn resize(&mut self, size: Size) {
        self.auto_size = false;
        self.element.resize(size);
        self.relayout();
    }
}

impl Animated for Label {
    fn animations(&self) -> &AnimationSet<Self> {
        &self.animations
    }

    fn animations_mut(&mut self) -> &mut AnimationSet<Self> {
        &mut self.animations
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::{binding, Animation, FrameSource};
    use crate::gui::font::tests::block_font;
    use image::Rgba;

    /// 4x8 方块字体
    fn font() -> Rc<dyn Font> {
        Rc::new(block_font(8))
    }

    #[test]
    fn test_wrap_hello_world() {
        let label = Label::new("hello world", font())
            .sized(Size::new(24.0, 40.0))
            .with_adapt_width(true);
        assert_eq!(label.lines(), ["hello", "world"]);
        assert_eq!(label.element().image().dimensions(), (20, 16));
    }

    #[test]
    fn test_no_wrap_without_adapt_width() {
        let label = Label::new("hello world", font()).sized(Size::new(24.0, 40.0));
        assert_eq!(label.lines(), ["hello world"]);
        assert_eq!(label.element().image().dimensions(), (44, 8));
    }

    #[test]
    fn test_alignment_offsets() {
        let label = Label::new("hello", font())
            .sized(Size::new(100.0, 20.0))
            .with_alignment(Alignment::Center);
        assert_eq!(label.element().img_offset(), Pos::new(40.0, 0.0));

        let label = Label::new("hello", font())
            .sized(Size::new(100.0, 20.0))
            .with_alignment(Alignment::Right);
        assert_eq!(label.element().img_offset(), Pos::new(80.0, 0.0));
    }

    #[test]
    fn test_center_line_offsets() {
        let label = Label::new("ab\nabcd", font()).with_alignment(Alignment::Center);
        let image = label.element().image();
        assert_eq!(image.dimensions(), (16, 16));
        // 第一行宽 8，居中后从 x = 4 开始
        assert_eq!(image.get_pixel(3, 2)[3], 0);
        assert_eq!(image.get_pixel(4, 2)[3], 255);
        assert_eq!(image.get_pixel(12, 2)[3], 0);
    }

    #[test]
    fn test_clip_to_element_size() {
        let label = Label::new("hello world", font())
            .sized(Size::new(12.0, 4.0))
            .with_exceed_size(false);
        assert_eq!(label.element().image().dimensions(), (12, 4));
    }

    #[test]
    fn test_auto_size() {
        let mut label = Label::new("hi", font()).with_auto_size(true);
        assert_eq!(label.size(), Size::new(8.0, 8.0));

        label.set_text("hello\nworld!");
        assert_eq!(label.size(), Size::new(24.0, 16.0));
        assert_eq!(label.element().img_offset(), Pos::zero());
    }

    #[test]
    fn test_line_height_override() {
        let label = Label::new("a\nb\nc", font()).with_line_height(Some(10));
        assert_eq!(label.line_height(), 10);
        assert_eq!(label.element().image().dimensions(), (4, 30));
    }

    #[test]
    fn test_empty_text() {
        let label = Label::new("", font());
        assert_eq!(label.lines(), [""]);
        assert_eq!(label.element().image().dimensions(), (0, 8));
    }

    #[test]
    fn test_color_rerenders() {
        let mut label = Label::new("a", font()).with_color(color::RED);
        assert_eq!(*label.element().image().get_pixel(1, 1), Rgba([255, 0, 0, 255]));
        label.set_color(color::BLUE);
        assert_eq!(*label.element().image().get_pixel(1, 1), Rgba([0, 0, 255, 255]));
    }

    #[test]
    fn test_resize_relayouts() {
        let mut label = Label::new("hello world", font()).with_adapt_width(true);
        label.resize(Size::new(100.0, 8.0));
        assert_eq!(label.lines(), ["hello world"]);
        label.resize(Size::new(24.0, 8.0));
        assert_eq!(label.lines(), ["hello", "world"]);
    }

    #[test]
    fn test_typewriter_animation() {
        let mut label = Label::new("", font());
        let full = "typing";
        let frames = (0..=full.len()).map(|n| full[..n].to_string()).collect();
        label.add_animation(Animation::new(
            "type",
            binding::label_text(),
            FrameSource::sampled(frames),
            1.0,
        ));
        label.start_animation("type");
        label.run_animations(0.5);
        assert_eq!(label.text(), "typ");
        label.run_animations(0.5);
        assert_eq!(label.text(), "typing");
        assert_eq!(label.element().image().width(), 24);
    }
}

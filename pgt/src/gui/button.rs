//! # Button 模块
//!
//! 按钮：根据指针状态切换 Normal / Hovered / Pressed，并播放对应的状态动画。
//!
//! 状态动画按名称关联：`"normal"`、`"hover"`、`"click"`。
//! 状态改变时启动新状态的动画，并停止其他状态动画。

use image::RgbaImage;
use tracing::debug;

use super::label::Label;
use crate::anchor::Anchor;
use crate::animation::{Animated, Animation, AnimationSet};
use crate::element::{Element, RenderTarget, Widget};
use crate::geometry::{Pos, Size};

/// 指针状态快照
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PointerState {
    /// 指针位置
    pub pos: Pos,
    /// 按键是否按住
    pub pressed: bool,
    /// 本帧刚按下
    pub just_pressed: bool,
    /// 本帧刚松开
    pub just_released: bool,
}

impl PointerState {
    /// 悬停在 `pos`，未按下
    pub fn at(pos: Pos) -> Self {
        Self {
            pos,
            ..Default::default()
        }
    }

    /// 在 `pos` 按下（本帧刚按下）
    pub fn press(pos: Pos) -> Self {
        Self {
            pos,
            pressed: true,
            just_pressed: true,
            just_released: false,
        }
    }

    /// 在 `pos` 按住
    pub fn hold(pos: Pos) -> Self {
        Self {
            pos,
            pressed: true,
            ..Default::default()
        }
    }

    /// 在 `pos` 松开（本帧刚松开）
    pub fn release(pos: Pos) -> Self {
        Self {
            pos,
            pressed: false,
            just_pressed: false,
            just_released: true,
        }
    }
}

/// 按钮状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ButtonState {
    #[default]
    Normal,
    Hovered,
    Pressed,
}

impl ButtonState {
    pub const ALL: [ButtonState; 3] = [Self::Normal, Self::Hovered, Self::Pressed];

    /// 该状态对应的动画名称
    pub fn animation_name(&self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Hovered => "hover",
            Self::Pressed => "click",
        }
    }
}

/// 点击回调
pub type ClickCallback = Box<dyn FnMut()>;

/// 按钮
pub struct Button {
    element: Element,
    label: Option<Label>,
    state: ButtonState,
    animations: AnimationSet<Button>,
    on_click: Option<ClickCallback>,
    /// 最近一次启动的状态动画
    current_animation: Option<&'static str>,
}

impl std::fmt::Debug for Button {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Button")
            .field("element", &self.element)
            .field("label", &self.label)
            .field("state", &self.state)
            .field("animations", &self.animations)
            .field("has_callback", &self.on_click.is_some())
            .finish()
    }
}

impl Button {
    pub fn new(pos: Pos, size: Size) -> Self {
        Self {
            element: Element::new(pos, size),
            label: None,
            state: ButtonState::Normal,
            animations: AnimationSet::new(),
            on_click: None,
            current_animation: None,
        }
    }

    /// 设置背景图像（缩放到按钮尺寸）
    pub fn with_image(mut self, image: RgbaImage) -> Self {
        self.element.change_image(image);
        self
    }

    pub fn with_anchor(mut self, anchor: Anchor) -> Self {
        self.element.set_anchor(anchor);
        self
    }

    /// 内部标签；标签位置相对于按钮中心
    pub fn with_label(mut self, label: Label) -> Self {
        self.label = Some(label);
        self
    }

    pub fn with_on_click(mut self, callback: impl FnMut() + 'static) -> Self {
        self.on_click = Some(Box::new(callback));
        self
    }

    /// 添加动画（状态动画按名称关联）
    pub fn with_animation<V: Clone + 'static>(mut self, animation: Animation<Button, V>) -> Self {
        self.add_animation(animation);
        self
    }

    pub fn state(&self) -> ButtonState {
        self.state
    }

    pub fn label(&self) -> Option<&Label> {
        self.label.as_ref()
    }

    pub fn label_mut(&mut self) -> Option<&mut Label> {
        self.label.as_mut()
    }

    /// 最近一次启动的状态动画名称
    pub fn current_animation(&self) -> Option<&'static str> {
        self.current_animation
    }

    /// 根据指针状态更新按钮，返回本帧是否发生点击
    ///
    /// 在按钮上松开且松开前处于 Pressed 状态才算一次点击。
    pub fn update(&mut self, pointer: &PointerState) -> bool {
        let hovered = self.rect().contains(pointer.pos);
        let clicked = hovered && pointer.just_released && self.state == ButtonState::Pressed;

        let next = match (hovered, pointer.pressed) {
            (true, true) => ButtonState::Pressed,
            (true, false) => ButtonState::Hovered,
            (false, _) => ButtonState::Normal,
        };
        if next != self.state {
            debug!(from = ?self.state, to = ?next, "按钮状态改变");
            self.state = next;
            self.play_state_animation(next);
        }

        if clicked {
            if let Some(callback) = self.on_click.as_mut() {
                callback();
            }
        }
        clicked
    }

    /// 更新状态并推进动画，返回本帧是否发生点击
    pub fn auto_run(&mut self, pointer: &PointerState, dt: f32) -> bool {
        let clicked = self.update(pointer);
        self.run_animations(dt);
        if let Some(label) = self.label.as_mut() {
            label.run_animations(dt);
        }
        clicked
    }

    fn play_state_animation(&mut self, state: ButtonState) {
        for other in ButtonState::ALL {
            if other != state {
                self.stop_animation(other.animation_name());
            }
        }
        let name = state.animation_name();
        if self.start_animation(name) {
            self.current_animation = Some(name);
        }
    }
}

impl Widget for Button {
    fn element(&self) -> &Element {
        &self.element
    }

    fn element_mut(&mut self) -> &mut Element {
        &mut self.element
    }

    fn draw(&self, target: &mut dyn RenderTarget) {
        self.element.draw(target);
        if let Some(label) = &self.label {
            label.element().draw_offset(target, self.rect().center());
        }
    }
}

impl Animated for Button {
    fn animations(&self) -> &AnimationSet<Self> {
        &self.animations
    }

    fn animations_mut(&mut self) -> &mut AnimationSet<Self> {
        &mut self.animations
    }

    /// 状态动画只由状态切换启动，其余动画照常自动开始
    fn add_animation<V: Clone + 'static>(&mut self, animation: Animation<Self, V>) {
        let is_state = ButtonState::ALL
            .iter()
            .any(|state| state.animation_name() == animation.name());
        self.animations.add(animation.with_autostart(!is_state));
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::*;
    use crate::animation::{binding, FrameSource};

    fn button() -> Button {
        Button::new(Pos::new(400.0, 300.0), Size::new(100.0, 100.0))
            .with_anchor(Anchor::CenterCenter)
            .with_animation(Animation::new(
                "hover",
                binding::size(),
                FrameSource::tween_to(Size::splat(115.0), 1000),
                0.3,
            ))
            .with_animation(Animation::new(
                "click",
                binding::size(),
                FrameSource::tween_to(Size::splat(80.0), 1000),
                0.1,
            ))
    }

    #[test]
    fn test_state_transitions() {
        let mut b = button();
        assert_eq!(b.state(), ButtonState::Normal);

        b.update(&PointerState::at(Pos::new(400.0, 300.0)));
        assert_eq!(b.state(), ButtonState::Hovered);
        assert_eq!(b.current_animation(), Some("hover"));

        b.update(&PointerState::press(Pos::new(400.0, 300.0)));
        assert_eq!(b.state(), ButtonState::Pressed);
        assert_eq!(b.current_animation(), Some("click"));

        b.update(&PointerState::at(Pos::new(0.0, 0.0)));
        assert_eq!(b.state(), ButtonState::Normal);
        // 没有 normal 动画，保持上一次的名称
        assert_eq!(b.current_animation(), Some("click"));
    }

    #[test]
    fn test_state_animations_wait_for_state_change() {
        let mut b = button().with_animation(Animation::new(
            "pulse",
            binding::rotation(),
            FrameSource::tween(0.0, 10.0, 100),
            1.0,
        ));
        b.auto_run(&PointerState::at(Pos::new(0.0, 0.0)), 0.1);
        assert_eq!(b.state(), ButtonState::Normal);
        assert_eq!(b.size(), Size::splat(100.0));
        assert!(!b.animations().is_running("hover"));
        assert!(b.animations().is_running("pulse"));
    }

    #[test]
    fn test_click_fires_callback() {
        let clicks = Rc::new(Cell::new(0));
        let counter = clicks.clone();
        let mut b = button().with_on_click(move || counter.set(counter.get() + 1));

        let center = Pos::new(400.0, 300.0);
        assert!(!b.update(&PointerState::press(center)));
        assert!(b.update(&PointerState::release(center)));
        assert_eq!(clicks.get(), 1);
        assert_eq!(b.state(), ButtonState::Hovered);

        // 在按钮外松开不算点击
        b.update(&PointerState::press(center));
        assert!(!b.update(&PointerState::release(Pos::new(0.0, 0.0))));
        assert_eq!(clicks.get(), 1);
    }

    #[test]
    fn test_hover_animation_scales() {
        let mut b = button();
        let center = Pos::new(400.0, 300.0);
        b.auto_run(&PointerState::at(center), 0.3);
        assert_eq!(b.size(), Size::splat(115.0));
        // 锚点居中，放大后中心不变（左上角向下取整）
        assert!(b.rect().center().distance(center) <= 1.0);

        b.auto_run(&PointerState::hold(center), 0.05);
        let size = b.size();
        assert!(size.w < 115.0 && size.w > 80.0);
        assert!(!b.animations().is_running("hover"));
        assert!(b.animations().is_running("click"));
    }

    #[test]
    fn test_label_drawn_at_center() {
        use crate::gui::font::tests::block_font;

        let label = Label::new("ab", Rc::new(block_font(8)))
            .with_anchor(Anchor::CenterCenter)
            .with_color(crate::color::RED);
        let b = Button::new(Pos::new(50.0, 50.0), Size::new(40.0, 40.0))
            .with_anchor(Anchor::CenterCenter)
            .with_label(label);

        let mut target = RgbaImage::new(100, 100);
        b.draw(&mut target);
        // 标签 8x8，中心在 (50, 50)
        assert_eq!(target.get_pixel(46, 46)[0], 255);
        assert_eq!(target.get_pixel(53, 53)[0], 255);
        assert_eq!(target.get_pixel(45, 45)[3], 0);
        assert_eq!(target.get_pixel(54, 54)[3], 0);
    }
}

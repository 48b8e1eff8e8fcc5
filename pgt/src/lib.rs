//! # pgt
//!
//! 定位 GUI 元素、缓动函数与关键帧动画工具集。
//!
//! ## 架构概述
//!
//! `pgt` 不拥有窗口或事件循环。调用方每帧推进动画、传入指针状态，
//! 然后把元素绘制到任意 [`RenderTarget`]：
//!
//! ```text
//! 调用方主循环                        pgt
//!   │                                 │
//!   │──── run_animations(dt) ───────►│ 帧源计算值，经 Binding 写入元素
//!   │──── Button::update(pointer) ──►│ 状态切换，启动状态动画
//!   │──── draw(target) ─────────────►│ 按锚点解析位置并 blit
//!   │                                 │
//! ```
//!
//! ## 核心类型
//!
//! - [`Element`] / [`Widget`]：带锚点的可绘制元素
//! - [`Animation`]：绑定到元素属性的关键帧动画
//! - [`Label`]、[`Button`]：GUI 元素
//! - [`EasingFunction`]：缓动函数
//!
//! ## 使用示例
//!
//! ```ignore
//! use pgt::{Anchor, AniElement, Animated, Animation, EasingFunction, FrameSource, Pos, Size, Widget, binding};
//!
//! let mut ball = AniElement::with_image(Pos::new(400.0, 300.0), image).with_anchor(Anchor::CenterCenter);
//! ball.add_animation(
//!     Animation::new("grow", binding::size(), FrameSource::tween_to(Size::splat(120.0), 60), 0.5)
//!         .with_easing(EasingFunction::OutBack),
//! );
//! ball.start_animation("grow");
//!
//! loop {
//!     ball.run_animations(dt);
//!     ball.draw(&mut frame);
//! }
//! ```
//!
//! ## 模块结构
//!
//! - [`easing`]：缓动函数
//! - [`anchor`]、[`geometry`]：锚点与位置模型
//! - [`color`]：颜色运算
//! - [`transform`]：图像缩放与旋转
//! - [`element`]：元素与绘制目标
//! - [`animation`]：动画引擎
//! - [`gui`]：标签、按钮、字体与排版
//! - [`draw`]：抗锯齿基本图形缓存
//! - [`config`]：JSON 配置记录
//! - [`resources`]：资源加载
//! - [`error`]：错误类型定义

pub mod anchor;
pub mod animation;
pub mod color;
pub mod config;
pub mod draw;
pub mod easing;
pub mod element;
pub mod error;
pub mod geometry;
pub mod gui;
pub mod resources;
pub mod transform;

// 重导出核心类型
pub use anchor::{Anchor, HAnchor, VAnchor};
pub use animation::{
    AniContext, Animate, Animated, Animation, AnimationEvent, AnimationSet, AnimationState,
    Binding, FrameSource, Lerp, binding,
};
pub use color::Color;
pub use config::{ButtonConfig, ElementConfig, LabelConfig, Scene, SceneConfig};
pub use draw::{CacheStats, DrawCache, ShapeKey};
pub use easing::EasingFunction;
pub use element::{AniElement, Element, RenderTarget, Widget};
pub use error::{ConfigError, PgtError, PgtResult, ResourceError};
pub use geometry::{Pos, Rect, Size};
pub use gui::{
    Alignment, BitmapFont, BitmapFontInfo, BitmapFontLoader, Button, ButtonState, ClickCallback,
    Font, FontLoader, FontStyle, Label, PointerState, resolve_font,
};

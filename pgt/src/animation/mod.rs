//! # Animation 模块
//!
//! 关键帧动画系统，把时间变化写入元素的属性。
//!
//! ## 核心设计理念
//!
//! 动画只负责 **时间轴管理**：
//! - 帧源根据进度算出属性值
//! - 绑定在构造时确定写入哪个属性
//! - 元素持有自己的动画集合，每帧由调用者推进
//!
//! ## 核心概念
//!
//! - `FrameSource`: 帧源（回调或预计算帧序列）
//! - `Binding`: 目标属性的 getter/setter
//! - `Animation`: 单个动画实例
//! - `AnimationSet`: 元素上的命名动画集合
//!
//! ## 使用示例
//!
//! ```rust,ignore
//! let mut element = AniElement::new(Pos::new(0.0, 0.0), Size::new(50.0, 50.0));
//! element.add_animation(
//!     Animation::new("slide", binding::position(), FrameSource::tween_to(Pos::new(100.0, 0.0), 60), 1.0)
//!         .with_easing(EasingFunction::OutQuad),
//! );
//! element.start_animation("slide");
//!
//! // 每帧
//! element.run_animations(dt);
//! ```

mod animation;
pub mod binding;
mod frames;
mod set;

pub use animation::{Animation, AnimationState};
pub use binding::Binding;
pub use frames::{AniContext, FrameFn, FrameSource, Lerp};
pub use set::{Animate, Animated, AnimationSet};

/// 动画事件
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnimationEvent {
    /// 动画开始
    Started { name: String },
    /// 动画到达总时长
    Completed { name: String },
    /// 动画结束后重置到起始值
    Reset { name: String },
}

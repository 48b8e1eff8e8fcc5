//! # Animation 模块
//!
//! 单个动画实例：持有帧源、时长与运行状态，每帧把计算出的值写入目标。
//!
//! 核心设计：值始终由 **绝对进度** 计算并直接写入（不是累加），
//! 长时间运行也不会漂移。

use tracing::debug;

use super::binding::Binding;
use super::frames::{AniContext, FrameSource};
use crate::easing::EasingFunction;

/// 动画状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AnimationState {
    /// 未开始（或已重置）
    #[default]
    Idle,
    /// 正在播放
    Running,
    /// 已到达总时长
    Completed,
}

impl AnimationState {
    /// 是否正在播放
    pub fn is_running(&self) -> bool {
        matches!(self, Self::Running)
    }

    /// 是否已结束
    pub fn is_finished(&self) -> bool {
        matches!(self, Self::Completed)
    }
}

/// 动画实例
///
/// 类型参数 `E` 是拥有该动画的对象类型，`V` 是被驱动属性的值类型。
pub struct Animation<E, V> {
    /// 动画名称
    name: String,
    /// 帧源
    frames: FrameSource<V>,
    /// 目标属性
    binding: Binding<E, V>,
    /// 动画时长（秒）
    duration: f32,
    /// 平滑模式：进度连续；否则量化到离散帧
    smooth: bool,
    /// 结束后的下一帧重置到起始值
    reset_on_end: bool,
    /// 重置后自动开始下一轮
    looping: bool,
    /// 进度缓动
    easing: EasingFunction,
    /// 当前状态
    state: AnimationState,
    /// 已经过的时间
    elapsed: f32,
    /// Idle 状态下 advance 是否会启动；`stop` 与非循环重置后关闭
    armed: bool,
    /// 已完成且等待下一帧重置
    pending_reset: bool,
    /// 启动时读取的目标值
    starting_value: Option<V>,
    /// 最近一次写入的值
    current: Option<V>,
}

impl<E, V> std::fmt::Debug for Animation<E, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Animation")
            .field("name", &self.name)
            .field("binding", &self.binding)
            .field("frames", &self.frames)
            .field("duration", &self.duration)
            .field("state", &self.state)
            .field("elapsed", &self.elapsed)
            .finish()
    }
}

impl<E, V: Clone + 'static> Animation<E, V> {
    /// 创建新的动画
    ///
    /// 默认平滑、线性、结束后停留在最终值，第一次 advance 时自动开始。
    pub fn new(
        name: impl Into<String>,
        binding: Binding<E, V>,
        frames: FrameSource<V>,
        duration: f32,
    ) -> Self {
        Self {
            name: name.into(),
            frames,
            binding,
            duration: if duration.is_finite() { duration.max(0.0) } else { 0.0 },
            smooth: true,
            reset_on_end: false,
            looping: false,
            easing: EasingFunction::Linear,
            state: AnimationState::Idle,
            elapsed: 0.0,
            armed: true,
            pending_reset: false,
            starting_value: None,
            current: None,
        }
    }

    /// 设置平滑模式
    pub fn with_smooth(mut self, smooth: bool) -> Self {
        self.smooth = smooth;
        self
    }

    /// 设置结束后是否重置
    pub fn with_reset_on_end(mut self, reset_on_end: bool) -> Self {
        self.reset_on_end = reset_on_end;
        self
    }

    /// 设置循环（隐含结束后重置）
    pub fn with_looping(mut self, looping: bool) -> Self {
        self.looping = looping;
        self
    }

    /// 设置缓动函数
    pub fn with_easing(mut self, easing: EasingFunction) -> Self {
        self.easing = easing;
        self
    }

    /// 设置第一次 advance 时是否自动开始
    ///
    /// 关闭后动画停在 Idle，直到显式 `start`。
    pub fn with_autostart(mut self, autostart: bool) -> Self {
        self.armed = autostart;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn state(&self) -> AnimationState {
        self.state
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn duration(&self) -> f32 {
        self.duration
    }

    pub fn is_smooth(&self) -> bool {
        self.smooth
    }

    pub fn resets_on_end(&self) -> bool {
        self.reset_on_end
    }

    /// 最近一次写入目标的值
    pub fn value(&self) -> Option<&V> {
        self.current.as_ref()
    }

    /// 启动时读取的目标值
    pub fn starting_value(&self) -> Option<&V> {
        self.starting_value.as_ref()
    }

    /// 原始时间进度（0.0 - 1.0）
    ///
    /// 时长为 0 时视为 1.0。
    pub fn progress(&self) -> f32 {
        if self.duration <= 0.0 {
            1.0
        } else {
            self.elapsed / self.duration
        }
    }

    /// 开始（或重新开始）动画
    ///
    /// 播放中再次调用会从 0 重新开始，配置保持不变。
    pub fn start(&mut self, owner: &E) {
        self.starting_value = Some(self.binding.get(owner));
        self.current = None;
        self.elapsed = 0.0;
        self.state = AnimationState::Running;
        self.armed = true;
        self.pending_reset = false;
        debug!(animation = %self.name, property = self.binding.name(), "动画开始");
    }

    /// 停止动画，不写入任何值
    pub fn stop(&mut self) {
        self.state = AnimationState::Idle;
        self.elapsed = 0.0;
        self.armed = false;
        self.pending_reset = false;
    }

    /// 推进动画
    ///
    /// `dt <= 0`（或 NaN）时什么也不做。
    pub fn advance(&mut self, dt: f32, owner: &mut E) -> AnimationState {
        if !(dt > 0.0) {
            return self.state;
        }

        match self.state {
            AnimationState::Idle => {
                if !self.armed {
                    return self.state;
                }
                self.start(owner);
            }
            AnimationState::Completed => {
                if self.pending_reset {
                    self.reset(owner);
                } else if let Some(value) = &self.current {
                    // 停留状态：重复写入最终值（幂等）
                    self.binding.set(owner, value.clone());
                }
                return self.state;
            }
            AnimationState::Running => {}
        }

        self.elapsed = (self.elapsed + dt).min(self.duration);
        self.apply(owner);

        if self.elapsed >= self.duration {
            self.state = AnimationState::Completed;
            self.pending_reset = self.reset_on_end || self.looping;
            debug!(animation = %self.name, "动画完成");
        }
        self.state
    }

    /// 计算当前进度对应的值并写入目标
    fn apply(&mut self, owner: &mut E) {
        let eased = self.easing.apply(self.progress());
        let progress = if self.smooth {
            eased
        } else {
            self.frames.quantize(eased)
        };

        let value = {
            let Some(starting_value) = self.starting_value.as_ref() else {
                return;
            };
            let ctx = AniContext {
                progress,
                frame: self.frames.frame_index(eased),
                starting_value,
                previous_value: self.current.as_ref(),
            };
            self.frames.evaluate(progress, &ctx)
        };

        if let Some(value) = value {
            self.binding.set(owner, value.clone());
            self.current = Some(value);
        }
    }

    /// 回到 Idle 并恢复起始值
    fn reset(&mut self, owner: &mut E) {
        if let Some(start) = self.starting_value.clone() {
            self.binding.set(owner, start);
        }
        self.elapsed = 0.0;
        self.current = None;
        self.state = AnimationState::Idle;
        self.pending_reset = false;
        self.armed = self.looping;
        debug!(animation = %self.name, looping = self.looping, "动画重置");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default)]
    struct Meter {
        value: f32,
    }

    fn value_binding() -> Binding<Meter, f32> {
        Binding::new("value", |m: &Meter| m.value, |m: &mut Meter, v| m.value = v)
    }

    fn linear(duration: f32) -> Animation<Meter, f32> {
        Animation::new(
            "linear",
            value_binding(),
            FrameSource::tween(0.0, 100.0, 1000),
            duration,
        )
    }

    #[test]
    fn test_animation_creation() {
        let anim = linear(1.0);
        assert_eq!(anim.state(), AnimationState::Idle);
        assert_eq!(anim.elapsed(), 0.0);
        assert!(anim.value().is_none());
    }

    #[test]
    fn test_linear_scenario() {
        let mut meter = Meter::default();
        let mut anim = linear(1.0);
        anim.start(&meter);

        assert_eq!(anim.advance(0.5, &mut meter), AnimationState::Running);
        assert_eq!(meter.value, 50.0);
        assert_eq!(anim.value(), Some(&50.0));

        // 时间被截断到总时长
        assert_eq!(anim.advance(0.6, &mut meter), AnimationState::Completed);
        assert_eq!(anim.elapsed(), 1.0);
        assert_eq!(meter.value, 100.0);
    }

    #[test]
    fn test_fresh_linear_scenario() {
        let mut meter = Meter::default();
        let mut anim = linear(1.0);

        assert_eq!(anim.advance(0.5, &mut meter), AnimationState::Running);
        assert_eq!(meter.value, 50.0);
        assert_eq!(anim.advance(0.5, &mut meter), AnimationState::Completed);
        assert_eq!(meter.value, 100.0);
    }

    #[test]
    fn test_fresh_zero_duration_completes_in_one_advance() {
        let mut meter = Meter::default();
        let mut anim = linear(0.0);
        assert_eq!(anim.advance(0.016, &mut meter), AnimationState::Completed);
        assert_eq!(meter.value, 100.0);
        assert_eq!(anim.progress(), 1.0);
    }

    #[test]
    fn test_fresh_start_captures_owner_value() {
        let mut meter = Meter { value: 40.0 };
        let mut anim = Animation::new(
            "grow",
            value_binding(),
            FrameSource::tween_to(80.0, 1000),
            1.0,
        );
        anim.advance(0.5, &mut meter);
        assert_eq!(anim.starting_value(), Some(&40.0));
        assert_eq!(meter.value, 60.0);
    }

    #[test]
    fn test_autostart_disabled_waits_for_start() {
        let mut meter = Meter { value: 7.0 };
        let mut anim = linear(1.0).with_autostart(false);
        assert_eq!(anim.advance(0.5, &mut meter), AnimationState::Idle);
        assert_eq!(meter.value, 7.0);

        anim.start(&meter);
        anim.advance(0.25, &mut meter);
        assert_eq!(anim.state(), AnimationState::Running);
        assert_eq!(meter.value, 25.0);
    }

    #[test]
    fn test_non_positive_dt_is_noop() {
        let mut meter = Meter::default();
        let mut anim = linear(1.0);
        anim.start(&meter);
        anim.advance(0.0, &mut meter);
        anim.advance(-1.0, &mut meter);
        anim.advance(f32::NAN, &mut meter);
        assert_eq!(anim.elapsed(), 0.0);
        assert!(anim.value().is_none());
    }

    #[test]
    fn test_zero_duration() {
        let mut meter = Meter::default();
        let mut anim = linear(0.0);
        anim.start(&meter);
        assert_eq!(anim.advance(0.016, &mut meter), AnimationState::Completed);
        assert_eq!(meter.value, 100.0);
    }

    #[test]
    fn test_settle_reapplies_final_value() {
        let mut meter = Meter::default();
        let mut anim = linear(1.0);
        anim.start(&meter);
        anim.advance(2.0, &mut meter);

        meter.value = -1.0;
        assert_eq!(anim.advance(0.1, &mut meter), AnimationState::Completed);
        assert_eq!(meter.value, 100.0);
    }

    #[test]
    fn test_reset_on_end_one_tick_later() {
        let mut meter = Meter { value: 5.0 };
        let mut anim = linear(1.0).with_reset_on_end(true);
        anim.start(&meter);

        anim.advance(0.5, &mut meter);
        assert_eq!(anim.advance(0.5, &mut meter), AnimationState::Completed);
        assert_eq!(anim.elapsed(), 1.0);
        assert_eq!(meter.value, 100.0);

        assert_eq!(anim.advance(0.1, &mut meter), AnimationState::Idle);
        assert_eq!(anim.elapsed(), 0.0);
        // 恢复起始值
        assert_eq!(meter.value, 5.0);

        // 非循环：不会自行重新开始
        assert_eq!(anim.advance(0.1, &mut meter), AnimationState::Idle);
    }

    #[test]
    fn test_looping_restarts() {
        let mut meter = Meter::default();
        let mut anim = linear(1.0).with_looping(true);
        anim.start(&meter);
        anim.advance(1.0, &mut meter);
        assert_eq!(anim.advance(0.1, &mut meter), AnimationState::Idle);
        assert_eq!(anim.advance(0.25, &mut meter), AnimationState::Running);
        assert_eq!(meter.value, 25.0);
    }

    #[test]
    fn test_restart_while_running_keeps_config() {
        let mut meter = Meter::default();
        let mut anim = linear(1.0).with_smooth(false).with_reset_on_end(true);
        anim.start(&meter);
        anim.advance(0.7, &mut meter);
        let midway = meter.value;
        assert!(midway > 60.0 && midway < 80.0);

        anim.start(&meter);
        assert_eq!(anim.elapsed(), 0.0);
        assert_eq!(anim.state(), AnimationState::Running);
        assert!(!anim.is_smooth());
        assert!(anim.resets_on_end());
        // 重新读取起始值
        assert_eq!(anim.starting_value(), Some(&midway));
    }

    #[test]
    fn test_stepped_playback() {
        let mut meter = Meter::default();
        let mut anim = Animation::new(
            "steps",
            value_binding(),
            FrameSource::tween(0.0, 100.0, 5),
            1.0,
        )
        .with_smooth(false);
        anim.start(&meter);

        anim.advance(0.3, &mut meter);
        assert_eq!(meter.value, 25.0);
        anim.advance(0.05, &mut meter);
        assert_eq!(meter.value, 25.0);
        anim.advance(0.3, &mut meter);
        assert_eq!(meter.value, 75.0);
    }

    #[test]
    fn test_easing_applied() {
        let mut meter = Meter::default();
        let mut anim = linear(1.0).with_easing(EasingFunction::InQuad);
        anim.start(&meter);
        anim.advance(0.5, &mut meter);
        assert_eq!(meter.value, 25.0);
    }

    #[test]
    fn test_context_previous_value() {
        let mut meter = Meter::default();
        let frames = FrameSource::func(100, |p, ctx: &AniContext<'_, f32>| {
            ctx.previous_value.copied().unwrap_or(-1.0) + p
        });
        let mut anim = Animation::new("prev", value_binding(), frames, 1.0);
        anim.start(&meter);
        anim.advance(0.5, &mut meter);
        assert_eq!(meter.value, -0.5);
        anim.advance(0.5, &mut meter);
        assert_eq!(meter.value, 0.5);
    }

    #[test]
    fn test_stop() {
        let mut meter = Meter::default();
        let mut anim = linear(1.0);
        anim.start(&meter);
        anim.advance(0.2, &mut meter);
        anim.stop();
        assert_eq!(anim.state(), AnimationState::Idle);
        anim.advance(0.2, &mut meter);
        assert_eq!(meter.value, 20.0);
    }
}

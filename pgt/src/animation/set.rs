//! # AnimationSet 模块
//!
//! 元素持有的命名动画集合，以及驱动集合的 `Animated` trait。

use super::animation::{Animation, AnimationState};
use super::AnimationEvent;

/// 类型擦除后的动画
///
/// 集合中的动画值类型各不相同，统一通过该 trait 驱动。
pub trait Animate<E> {
    fn name(&self) -> &str;
    fn state(&self) -> AnimationState;
    fn elapsed(&self) -> f32;
    fn progress(&self) -> f32;
    fn start(&mut self, owner: &E);
    fn stop(&mut self);
    fn advance(&mut self, dt: f32, owner: &mut E) -> AnimationState;
}

impl<E, V: Clone + 'static> Animate<E> for Animation<E, V> {
    fn name(&self) -> &str {
        Animation::name(self)
    }

    fn state(&self) -> AnimationState {
        Animation::state(self)
    }

    fn elapsed(&self) -> f32 {
        Animation::elapsed(self)
    }

    fn progress(&self) -> f32 {
        Animation::progress(self)
    }

    fn start(&mut self, owner: &E) {
        Animation::start(self, owner)
    }

    fn stop(&mut self) {
        Animation::stop(self)
    }

    fn advance(&mut self, dt: f32, owner: &mut E) -> AnimationState {
        Animation::advance(self, dt, owner)
    }
}

/// 命名动画集合
///
/// 名称唯一；按添加顺序推进。
pub struct AnimationSet<E> {
    animations: Vec<Box<dyn Animate<E>>>,
    /// 显式启动产生、等待下一次 advance 报告的事件
    pending: Vec<AnimationEvent>,
}

impl<E> Default for AnimationSet<E> {
    fn default() -> Self {
        Self {
            animations: Vec::new(),
            pending: Vec::new(),
        }
    }
}

impl<E> std::fmt::Debug for AnimationSet<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.animations.iter().map(|a| a.name())).finish()
    }
}

impl<E: 'static> AnimationSet<E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// 添加动画；同名动画会被替换
    pub fn add<V: Clone + 'static>(&mut self, animation: Animation<E, V>) {
        self.insert(Box::new(animation));
    }

    fn insert(&mut self, animation: Box<dyn Animate<E>>) {
        match self
            .animations
            .iter_mut()
            .find(|a| a.name() == animation.name())
        {
            Some(slot) => *slot = animation,
            None => self.animations.push(animation),
        }
    }

    pub fn get(&self, name: &str) -> Option<&dyn Animate<E>> {
        self.animations
            .iter()
            .find(|a| a.name() == name)
            .map(|a| a.as_ref())
    }

    /// 开始指定动画，返回是否找到
    ///
    /// `Started` 事件在下一次 `advance` 时报告。
    pub fn start(&mut self, name: &str, owner: &E) -> bool {
        match self.animations.iter_mut().find(|a| a.name() == name) {
            Some(animation) => {
                animation.start(owner);
                self.pending.push(AnimationEvent::Started {
                    name: name.to_string(),
                });
                true
            }
            None => false,
        }
    }

    /// 停止指定动画，返回是否找到
    pub fn stop(&mut self, name: &str) -> bool {
        match self.animations.iter_mut().find(|a| a.name() == name) {
            Some(animation) => {
                animation.stop();
                true
            }
            None => false,
        }
    }

    pub fn stop_all(&mut self) {
        for animation in &mut self.animations {
            animation.stop();
        }
    }

    pub fn remove(&mut self, name: &str) -> bool {
        let before = self.animations.len();
        self.animations.retain(|a| a.name() != name);
        self.animations.len() != before
    }

    /// 推进全部动画，返回本帧产生的状态事件
    pub fn advance(&mut self, dt: f32, owner: &mut E) -> Vec<AnimationEvent> {
        let mut events = std::mem::take(&mut self.pending);
        for animation in &mut self.animations {
            let before = animation.state();
            let after = animation.advance(dt, owner);
            if before == after {
                continue;
            }
            let name = animation.name().to_string();
            match after {
                AnimationState::Running => events.push(AnimationEvent::Started { name }),
                AnimationState::Completed => events.push(AnimationEvent::Completed { name }),
                AnimationState::Idle => events.push(AnimationEvent::Reset { name }),
            }
        }
        events
    }

    /// 指定动画是否正在播放
    pub fn is_running(&self, name: &str) -> bool {
        self.get(name).is_some_and(|a| a.state().is_running())
    }

    /// 是否有动画正在播放
    pub fn any_running(&self) -> bool {
        self.animations.iter().any(|a| a.state().is_running())
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.animations.iter().map(|a| a.name())
    }

    pub fn len(&self) -> usize {
        self.animations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.animations.is_empty()
    }

    /// 合并另一个集合（同名替换）
    fn merge(&mut self, other: AnimationSet<E>) {
        for animation in other.animations {
            self.insert(animation);
        }
        self.pending.extend(other.pending);
    }
}

/// 拥有动画集合的对象
///
/// 推进时先把集合从对象中取出，动画才能可变借用对象本身。
pub trait Animated: Sized + 'static {
    fn animations(&self) -> &AnimationSet<Self>;
    fn animations_mut(&mut self) -> &mut AnimationSet<Self>;

    fn add_animation<V: Clone + 'static>(&mut self, animation: Animation<Self, V>) {
        self.animations_mut().add(animation);
    }

    fn start_animation(&mut self, name: &str) -> bool {
        let mut set = std::mem::take(self.animations_mut());
        let found = set.start(name, self);
        restore(self, set);
        found
    }

    fn stop_animation(&mut self, name: &str) -> bool {
        self.animations_mut().stop(name)
    }

    /// 推进全部动画
    fn run_animations(&mut self, dt: f32) -> Vec<AnimationEvent> {
        let mut set = std::mem::take(self.animations_mut());
        let events = set.advance(dt, self);
        restore(self, set);
        events
    }
}

fn restore<T: Animated>(owner: &mut T, set: AnimationSet<T>) {
    let added = std::mem::replace(owner.animations_mut(), set);
    if !added.is_empty() || !added.pending.is_empty() {
        owner.animations_mut().merge(added);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::{Binding, FrameSource};

    #[derive(Default)]
    struct Dial {
        angle: f32,
        level: f32,
        animations: AnimationSet<Dial>,
    }

    impl Animated for Dial {
        fn animations(&self) -> &AnimationSet<Self> {
            &self.animations
        }

        fn animations_mut(&mut self) -> &mut AnimationSet<Self> {
            &mut self.animations
        }
    }

    fn angle() -> Binding<Dial, f32> {
        Binding::new("angle", |d: &Dial| d.angle, |d: &mut Dial, v| d.angle = v)
    }

    fn level() -> Binding<Dial, f32> {
        Binding::new("level", |d: &Dial| d.level, |d: &mut Dial, v| d.level = v)
    }

    #[test]
    fn test_add_replaces_by_name() {
        let mut set: AnimationSet<Dial> = AnimationSet::new();
        set.add(Animation::new("spin", angle(), FrameSource::tween(0.0, 1.0, 10), 1.0));
        set.add(Animation::new("spin", angle(), FrameSource::tween(0.0, 1.0, 10), 2.0));
        assert_eq!(set.len(), 1);
        assert_eq!(set.names().collect::<Vec<_>>(), vec!["spin"]);
        assert!(set.remove("spin"));
        assert!(set.is_empty());
    }

    #[test]
    fn test_run_animations_events() {
        let mut dial = Dial::default();
        dial.add_animation(
            Animation::new("spin", angle(), FrameSource::tween(0.0, 90.0, 100), 1.0)
                .with_reset_on_end(true),
        );
        dial.add_animation(Animation::new(
            "fill",
            level(),
            FrameSource::tween(0.0, 1.0, 100),
            0.5,
        ));

        assert!(dial.start_animation("spin"));
        assert!(dial.start_animation("fill"));
        assert!(!dial.start_animation("missing"));
        assert!(dial.animations().any_running());
        assert!(dial.animations().is_running("spin"));

        // 显式启动的动画在下一次推进时报告 Started
        let events = dial.run_animations(0.5);
        assert_eq!(
            events,
            vec![
                AnimationEvent::Started {
                    name: "spin".to_string()
                },
                AnimationEvent::Started {
                    name: "fill".to_string()
                },
                AnimationEvent::Completed {
                    name: "fill".to_string()
                },
            ]
        );
        assert_eq!(dial.angle, 45.0);
        assert_eq!(dial.level, 1.0);

        let events = dial.run_animations(0.5);
        assert_eq!(
            events,
            vec![AnimationEvent::Completed {
                name: "spin".to_string()
            }]
        );

        let events = dial.run_animations(0.1);
        assert_eq!(
            events,
            vec![AnimationEvent::Reset {
                name: "spin".to_string()
            }]
        );
        assert_eq!(dial.angle, 0.0);
        assert!(!dial.animations().any_running());
    }

    #[test]
    fn test_fresh_animation_emits_started_once() {
        let mut dial = Dial::default();
        dial.add_animation(Animation::new(
            "spin",
            angle(),
            FrameSource::tween(0.0, 90.0, 100),
            1.0,
        ));
        let events = dial.run_animations(0.1);
        assert_eq!(
            events,
            vec![AnimationEvent::Started {
                name: "spin".to_string()
            }]
        );
        assert!(dial.run_animations(0.1).is_empty());
        assert!(dial.stop_animation("spin"));
        assert!(!dial.animations().any_running());
    }

    #[test]
    fn test_restart_reports_started_again() {
        let mut dial = Dial::default();
        dial.add_animation(
            Animation::new("spin", angle(), FrameSource::tween(0.0, 90.0, 100), 1.0)
                .with_autostart(false),
        );
        assert!(dial.run_animations(0.1).is_empty());

        dial.start_animation("spin");
        dial.run_animations(0.2);
        dial.start_animation("spin");
        let events = dial.run_animations(0.2);
        assert_eq!(
            events,
            vec![AnimationEvent::Started {
                name: "spin".to_string()
            }]
        );
    }
}

//! # Draw 模块
//!
//! 抗锯齿基本图形（圆、圆角矩形）与带 LRU 驱逐的图形缓存。
//!
//! 图形用 4x4 超采样生成，按（形状、尺寸、颜色）缓存。
//! 缓存是显式对象，由调用者持有并以 `&mut` 传递。

use std::collections::{HashMap, VecDeque};
use std::rc::Rc;

use image::RgbaImage;
use tracing::{debug, warn};

use crate::color::Color;
use crate::element::RenderTarget;
use crate::geometry::Pos;

/// 默认缓存预算：16 MB
pub const DEFAULT_BUDGET_MB: usize = 16;

/// 每个像素每个方向的采样数
const SUPERSAMPLE: u32 = 4;

/// 缓存键
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeKey {
    /// 圆（直径）
    Circle { diameter: u32, color: Color },
    /// 圆角矩形
    RoundedRect {
        width: u32,
        height: u32,
        radius: u32,
        color: Color,
    },
}

impl ShapeKey {
    /// 图形的像素尺寸
    pub fn dimensions(&self) -> (u32, u32) {
        match *self {
            Self::Circle { diameter, .. } => (diameter, diameter),
            Self::RoundedRect { width, height, .. } => (width, height),
        }
    }

    fn color(&self) -> Color {
        match *self {
            Self::Circle { color, .. } | Self::RoundedRect { color, .. } => color,
        }
    }

    /// 点 `(x, y)` 是否在图形内
    fn contains(&self, x: f32, y: f32) -> bool {
        match *self {
            Self::Circle { diameter, .. } => {
                let r = diameter as f32 / 2.0;
                let (dx, dy) = (x - r, y - r);
                dx * dx + dy * dy <= r * r
            }
            Self::RoundedRect {
                width,
                height,
                radius,
                ..
            } => {
                let (w, h) = (width as f32, height as f32);
                let r = (radius as f32).min(w / 2.0).min(h / 2.0);
                let cx = x.clamp(r, w - r);
                let cy = y.clamp(r, h - r);
                let (dx, dy) = (x - cx, y - cy);
                dx * dx + dy * dy <= r * r
            }
        }
    }

    /// 以超采样渲染图形
    pub fn render(&self) -> RgbaImage {
        let (w, h) = self.dimensions();
        let color = self.color();
        let step = 1.0 / SUPERSAMPLE as f32;
        let total = (SUPERSAMPLE * SUPERSAMPLE) as f32;

        RgbaImage::from_fn(w, h, |px, py| {
            let mut hits = 0u32;
            for sy in 0..SUPERSAMPLE {
                for sx in 0..SUPERSAMPLE {
                    let x = px as f32 + (sx as f32 + 0.5) * step;
                    let y = py as f32 + (sy as f32 + 0.5) * step;
                    if self.contains(x, y) {
                        hits += 1;
                    }
                }
            }
            color.scale_alpha(hits as f32 / total).into()
        })
    }
}

/// 缓存条目
#[derive(Debug)]
struct CacheEntry {
    image: Rc<RgbaImage>,
    /// 内存占用（字节）
    size_bytes: usize,
}

impl CacheEntry {
    fn new(image: Rc<RgbaImage>) -> Self {
        let size_bytes = (image.width() as usize) * (image.height() as usize) * 4;
        Self { image, size_bytes }
    }
}

/// 图形缓存
///
/// 特性：
/// - LRU 驱逐策略
/// - 内存预算限制
pub struct DrawCache {
    entries: HashMap<ShapeKey, CacheEntry>,
    /// LRU 顺序（最近使用的在后面）
    lru_order: VecDeque<ShapeKey>,
    budget_bytes: usize,
    used_bytes: usize,
    hits: u64,
    misses: u64,
    evictions: u64,
}

impl Default for DrawCache {
    fn default() -> Self {
        Self::new(DEFAULT_BUDGET_MB)
    }
}

impl DrawCache {
    /// 创建缓存
    ///
    /// # 参数
    /// - `budget_mb`: 内存预算（MB）
    pub fn new(budget_mb: usize) -> Self {
        Self::with_budget_bytes(budget_mb * 1024 * 1024)
    }

    pub fn with_budget_bytes(budget_bytes: usize) -> Self {
        Self {
            entries: HashMap::new(),
            lru_order: VecDeque::new(),
            budget_bytes,
            used_bytes: 0,
            hits: 0,
            misses: 0,
            evictions: 0,
        }
    }

    /// 获取图形，未命中时渲染并缓存
    pub fn shape(&mut self, key: ShapeKey) -> Rc<RgbaImage> {
        if let Some(entry) = self.entries.get(&key) {
            let image = entry.image.clone();
            self.hits += 1;
            self.touch(&key);
            return image;
        }

        self.misses += 1;
        let image = Rc::new(key.render());
        self.insert(key, image.clone());
        image
    }

    /// 偶数直径的圆（直径 `2 * radius`）
    pub fn even_circle(&mut self, radius: u32, color: Color) -> Rc<RgbaImage> {
        self.circle(radius * 2, color)
    }

    /// 奇数直径的圆（直径 `2 * radius + 1`，中心落在像素中心）
    pub fn odd_circle(&mut self, radius: u32, color: Color) -> Rc<RgbaImage> {
        self.circle(radius * 2 + 1, color)
    }

    /// 任意直径的圆
    pub fn circle(&mut self, diameter: u32, color: Color) -> Rc<RgbaImage> {
        self.shape(ShapeKey::Circle { diameter, color })
    }

    /// 抗锯齿圆角矩形
    pub fn aa_rect(&mut self, width: u32, height: u32, radius: u32, color: Color) -> Rc<RgbaImage> {
        self.shape(ShapeKey::RoundedRect {
            width,
            height,
            radius,
            color,
        })
    }

    /// 把图形绘制到目标，`top_left` 为图形左上角
    pub fn draw(&mut self, target: &mut dyn RenderTarget, key: ShapeKey, top_left: Pos) {
        let image = self.shape(key);
        let (x, y) = top_left.floor().to_pixel();
        target.blit(&image, x, y);
    }

    pub fn contains(&self, key: &ShapeKey) -> bool {
        self.entries.contains_key(key)
    }

    /// 清空缓存（统计保留）
    pub fn clear(&mut self) {
        self.entries.clear();
        self.lru_order.clear();
        self.used_bytes = 0;
    }

    pub fn used_bytes(&self) -> usize {
        self.used_bytes
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 获取统计信息
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.entries.len(),
            used_bytes: self.used_bytes,
            budget_bytes: self.budget_bytes,
            hits: self.hits,
            misses: self.misses,
            evictions: self.evictions,
            hit_rate: if self.hits + self.misses > 0 {
                self.hits as f64 / (self.hits + self.misses) as f64
            } else {
                0.0
            },
        }
    }

    pub fn reset_stats(&mut self) {
        self.hits = 0;
        self.misses = 0;
        self.evictions = 0;
    }

    fn insert(&mut self, key: ShapeKey, image: Rc<RgbaImage>) {
        let entry = CacheEntry::new(image);
        let new_size = entry.size_bytes;

        if new_size > self.budget_bytes {
            warn!(shape = ?key, size_bytes = new_size, budget_bytes = self.budget_bytes, "图形超出缓存预算，强制插入");
        }

        while self.used_bytes + new_size > self.budget_bytes && self.evict_one() {}

        self.used_bytes += new_size;
        self.entries.insert(key, entry);
        self.lru_order.push_back(key);
    }

    fn touch(&mut self, key: &ShapeKey) {
        self.lru_order.retain(|k| k != key);
        self.lru_order.push_back(*key);
    }

    /// 驱逐最久未使用的条目，返回是否成功
    fn evict_one(&mut self) -> bool {
        let Some(key) = self.lru_order.pop_front() else {
            return false;
        };
        if let Some(entry) = self.entries.remove(&key) {
            self.used_bytes = self.used_bytes.saturating_sub(entry.size_bytes);
            self.evictions += 1;
            debug!(shape = ?key, "图形缓存驱逐");
        }
        true
    }
}

/// 缓存统计信息
#[derive(Debug, Clone)]
pub struct CacheStats {
    pub entries: usize,
    pub used_bytes: usize,
    pub budget_bytes: usize,
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    /// 命中率
    pub hit_rate: f64,
}

impl CacheStats {
    /// 格式化为可读字符串
    pub fn format(&self) -> String {
        format!(
            "DrawCache: {} entries, {:.1}KB / {:.1}KB, hit rate: {:.1}%, evictions: {}",
            self.entries,
            self.used_bytes as f64 / 1024.0,
            self.budget_bytes as f64 / 1024.0,
            self.hit_rate * 100.0,
            self.evictions,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color;

    #[test]
    fn test_circle_coverage() {
        let mut cache = DrawCache::default();
        let img = cache.odd_circle(5, color::RED);
        assert_eq!(img.dimensions(), (11, 11));
        // 中心完全覆盖，角落完全透明
        assert_eq!(img.get_pixel(5, 5)[3], 255);
        assert_eq!(img.get_pixel(0, 0)[3], 0);
        // 对角边缘部分覆盖
        let edge = img.get_pixel(1, 1)[3];
        assert!(edge > 0 && edge < 255);

        let img = cache.even_circle(5, color::RED);
        assert_eq!(img.dimensions(), (10, 10));
        // 偶数直径左右对称
        assert_eq!(img.get_pixel(0, 4)[3], img.get_pixel(9, 4)[3]);
    }

    #[test]
    fn test_rounded_rect() {
        let mut cache = DrawCache::default();
        let img = cache.aa_rect(20, 10, 4, color::BLUE);
        assert_eq!(img.dimensions(), (20, 10));
        assert_eq!(img.get_pixel(0, 0)[3], 0);
        assert_eq!(img.get_pixel(10, 0)[3], 255);
        assert_eq!(img.get_pixel(10, 5)[3], 255);

        // 半径超过短边一半时被截断
        let pill = cache.aa_rect(20, 10, 50, color::BLUE);
        assert_eq!(pill.get_pixel(10, 5)[3], 255);
    }

    #[test]
    fn test_hits_and_clear() {
        let mut cache = DrawCache::default();
        cache.circle(8, color::RED);
        cache.circle(8, color::RED);
        cache.circle(8, color::BLUE);

        let stats = cache.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 2);
        assert_eq!(stats.entries, 2);

        cache.clear();
        assert!(cache.is_empty());
        assert_eq!(cache.used_bytes(), 0);
        assert_eq!(cache.stats().hits, 1);
    }

    #[test]
    fn test_lru_eviction() {
        // 预算只能容纳两个 10x10 图形
        let mut cache = DrawCache::with_budget_bytes(10 * 10 * 4 * 2);
        cache.circle(10, color::RED);
        cache.circle(10, color::GREEN);
        cache.circle(10, color::RED);
        cache.circle(10, color::BLUE);

        assert_eq!(cache.len(), 2);
        assert_eq!(cache.stats().evictions, 1);
        assert!(cache.contains(&ShapeKey::Circle {
            diameter: 10,
            color: color::RED
        }));
        assert!(!cache.contains(&ShapeKey::Circle {
            diameter: 10,
            color: color::GREEN
        }));
    }

    #[test]
    fn test_stats_format() {
        let stats = CacheStats {
            entries: 3,
            used_bytes: 2048,
            budget_bytes: 4096,
            hits: 3,
            misses: 1,
            evictions: 0,
            hit_rate: 0.75,
        };
        assert_eq!(
            stats.format(),
            "DrawCache: 3 entries, 2.0KB / 4.0KB, hit rate: 75.0%, evictions: 0"
        );
    }
}

//! # Font 模块
//!
//! 字体抽象与位图字体实现。
//!
//! ## 字体查找顺序
//!
//! 1. 未指定名称：使用加载器的默认字体
//! 2. 把名称当作文件路径加载
//! 3. 文件不存在时按名称查找系统字体
//! 4. 都失败时返回 `ResourceError::FontNotFound`

use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use image::imageops::{self, FilterType};
use image::{GrayImage, Luma, Rgba, RgbaImage};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::color::Color;
use crate::error::ResourceError;
use crate::resources;

/// 字体样式
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct FontStyle {
    /// 粗体（横向 1 像素重复绘制）
    pub bold: bool,
    /// 斜体（按行错切）
    pub italic: bool,
    /// 下划线
    pub underline: bool,
    /// 关闭抗锯齿（覆盖率二值化）
    pub no_aa: bool,
}

impl FontStyle {
    pub const NONE: FontStyle = FontStyle {
        bold: false,
        italic: false,
        underline: false,
        no_aa: false,
    };
}

/// 字体
pub trait Font {
    /// 字体名称（用于日志）
    fn name(&self) -> &str;

    /// 单行文本的像素宽度
    fn text_width(&self, text: &str) -> u32;

    /// 行高
    fn line_height(&self) -> u32;

    /// 渲染单行文本
    ///
    /// 返回的图像宽为 `text_width(text)`，高为 `line_height()`。
    fn render(
        &self,
        text: &str,
        color: Color,
        background: Option<Color>,
        style: FontStyle,
    ) -> RgbaImage;
}

impl std::fmt::Debug for dyn Font {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Font").field("name", &self.name()).finish()
    }
}

/// 位图字体描述文件
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BitmapFontInfo {
    /// 图集中按顺序排列的字符
    pub chars: String,
    /// 字形格宽
    pub glyph_width: u32,
    /// 字形格高
    pub glyph_height: u32,
    /// 图集列数
    pub columns: u32,
    /// 图集文件（相对于描述文件所在目录）
    #[serde(default = "default_atlas")]
    pub image: String,
    /// 单个字符的实际宽度（缺省为格宽）
    #[serde(default)]
    pub widths: HashMap<char, u32>,
    /// 字符间距（原始像素）
    #[serde(default)]
    pub spacing: u32,
    /// 图集中没有的字符用它替代
    #[serde(default)]
    pub fallback: Option<char>,
}

fn default_atlas() -> String {
    "atlas.png".to_string()
}

/// 位图字体
///
/// 图集的 alpha 通道作为覆盖率，按请求的像素高度缩放。
pub struct BitmapFont {
    name: String,
    info: BitmapFontInfo,
    atlas: RgbaImage,
    /// 目标行高
    size: u32,
    scale: f32,
    index: HashMap<char, u32>,
    /// 已缩放的字形覆盖率
    glyphs: RefCell<HashMap<char, Rc<GrayImage>>>,
}

impl BitmapFont {
    /// 由描述与图集创建
    pub fn new(
        name: impl Into<String>,
        info: BitmapFontInfo,
        atlas: RgbaImage,
        size: u32,
    ) -> Result<Self, ResourceError> {
        let name = name.into();
        if info.glyph_width == 0 || info.glyph_height == 0 || info.columns == 0 {
            return Err(ResourceError::InvalidFormat {
                path: name,
                message: "字形尺寸与列数必须大于 0".to_string(),
            });
        }
        let size = size.max(1);
        let index = info
            .chars
            .chars()
            .enumerate()
            .map(|(i, c)| (c, i as u32))
            .collect();
        Ok(Self {
            scale: size as f32 / info.glyph_height as f32,
            name,
            info,
            atlas,
            size,
            index,
            glyphs: RefCell::new(HashMap::new()),
        })
    }

    /// 从描述文件加载
    pub fn load(path: &Path, size: u32) -> Result<Self, ResourceError> {
        let info: BitmapFontInfo = resources::parse_json_file(path)?;
        let atlas_path = path
            .parent()
            .map(|dir| dir.join(&info.image))
            .unwrap_or_else(|| PathBuf::from(&info.image));
        let atlas = resources::load_image(&atlas_path)?;
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();
        debug!(font = %name, size, "位图字体已加载");
        Self::new(name, info, atlas, size)
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    /// 已缓存的字形数量
    pub fn cached_glyphs(&self) -> usize {
        self.glyphs.borrow().len()
    }

    fn lookup(&self, c: char) -> Option<(char, u32)> {
        self.index
            .get(&c)
            .map(|&i| (c, i))
            .or_else(|| {
                self.info
                    .fallback
                    .and_then(|f| self.index.get(&f).map(|&i| (f, i)))
            })
    }

    fn source_width(&self, c: char) -> u32 {
        self.info
            .widths
            .get(&c)
            .copied()
            .unwrap_or(self.info.glyph_width)
            .clamp(1, self.info.glyph_width)
    }

    fn scaled(&self, v: u32) -> u32 {
        (v as f32 * self.scale).round() as u32
    }

    /// 字符的前进宽度
    fn advance(&self, c: char) -> u32 {
        let source = match self.lookup(c) {
            Some((found, _)) => self.source_width(found),
            None => self.info.glyph_width,
        };
        self.scaled(source).max(1)
    }

    fn spacing(&self) -> u32 {
        self.scaled(self.info.spacing)
    }

    /// 缩放后的字形覆盖率；图集中没有的字符返回 `None`（绘制为空白）
    fn glyph(&self, c: char) -> Option<Rc<GrayImage>> {
        let (found, i) = self.lookup(c)?;
        if let Some(glyph) = self.glyphs.borrow().get(&found) {
            return Some(glyph.clone());
        }

        let gw = self.source_width(found);
        let gh = self.info.glyph_height;
        let x = (i % self.info.columns) * self.info.glyph_width;
        let y = (i / self.info.columns) * gh;
        let cell = imageops::crop_imm(&self.atlas, x, y, gw, gh).to_image();
        let coverage = GrayImage::from_fn(cell.width(), cell.height(), |px, py| {
            Luma([cell.get_pixel(px, py)[3]])
        });
        let (w, h) = (self.advance(found), self.size);
        let glyph = if coverage.dimensions() == (w, h) {
            Rc::new(coverage)
        } else {
            Rc::new(imageops::resize(&coverage, w, h, FilterType::Triangle))
        };
        self.glyphs.borrow_mut().insert(found, glyph.clone());
        Some(glyph)
    }
}

impl Font for BitmapFont {
    fn name(&self) -> &str {
        &self.name
    }

    fn text_width(&self, text: &str) -> u32 {
        let count = text.chars().count() as u32;
        let glyphs: u32 = text.chars().map(|c| self.advance(c)).sum();
        glyphs + self.spacing() * count.saturating_sub(1)
    }

    fn line_height(&self) -> u32 {
        self.size
    }

    fn render(
        &self,
        text: &str,
        color: Color,
        background: Option<Color>,
        style: FontStyle,
    ) -> RgbaImage {
        let width = self.text_width(text);
        let height = self.size;
        let fill = background.unwrap_or(crate::color::TRANSPARENT);
        let mut out = RgbaImage::from_pixel(width, height, fill.into());

        let mut pen = 0i64;
        for c in text.chars() {
            if let Some(glyph) = self.glyph(c) {
                let strikes: &[i64] = if style.bold { &[0, 1] } else { &[0] };
                for &dx in strikes {
                    stamp(&mut out, &glyph, pen + dx, color, style);
                }
            }
            pen += (self.advance(c) + self.spacing()) as i64;
        }

        if style.underline && height > 0 {
            let y = height - 1;
            for x in 0..width {
                blend(out.get_pixel_mut(x, y), color);
            }
        }
        out
    }
}

/// 以覆盖率把颜色叠加到目标上
fn stamp(out: &mut RgbaImage, glyph: &GrayImage, pen: i64, color: Color, style: FontStyle) {
    let h = glyph.height() as i64;
    for (gx, gy, coverage) in glyph.enumerate_pixels() {
        let coverage = if style.no_aa {
            if coverage[0] >= 128 { 255 } else { 0 }
        } else {
            coverage[0]
        };
        if coverage == 0 {
            continue;
        }
        // 底部不动，越往上越向右
        let shear = if style.italic {
            ((h - 1 - gy as i64) as f32 * 0.2) as i64
        } else {
            0
        };
        let x = pen + gx as i64 + shear;
        if x < 0 || x >= out.width() as i64 || gy >= out.height() {
            continue;
        }
        let src = color.scale_alpha(coverage as f32 / 255.0);
        blend(out.get_pixel_mut(x as u32, gy), src);
    }
}

/// source-over 混合
fn blend(dst: &mut Rgba<u8>, src: Color) {
    let sa = src.a as f32 / 255.0;
    if sa <= 0.0 {
        return;
    }
    let da = dst[3] as f32 / 255.0;
    let out_a = sa + da * (1.0 - sa);
    let mix = |s: u8, d: u8| {
        ((s as f32 * sa + d as f32 * da * (1.0 - sa)) / out_a)
            .round()
            .clamp(0.0, 255.0) as u8
    };
    *dst = Rgba([
        mix(src.r, dst[0]),
        mix(src.g, dst[1]),
        mix(src.b, dst[2]),
        (out_a * 255.0).round() as u8,
    ]);
}

/// 字体加载器
pub trait FontLoader {
    /// 按文件路径加载；文件不存在时必须返回 `FileMissing`
    fn load_file(&self, path: &Path, size: u32) -> Result<Rc<dyn Font>, ResourceError>;

    /// 按名称查找系统字体
    fn load_system(&self, name: &str, size: u32) -> Option<Rc<dyn Font>>;

    /// 默认字体
    fn default_font(&self, size: u32) -> Result<Rc<dyn Font>, ResourceError>;
}

/// 解析字体引用
pub fn resolve_font(
    loader: &dyn FontLoader,
    name: Option<&str>,
    size: u32,
) -> Result<Rc<dyn Font>, ResourceError> {
    let Some(name) = name else {
        return loader.default_font(size);
    };

    match loader.load_file(Path::new(name), size) {
        Ok(font) => return Ok(font),
        Err(ResourceError::FileMissing { .. }) => {
            debug!(font = name, "字体文件不存在，尝试系统字体");
        }
        Err(e) => return Err(e),
    }

    loader
        .load_system(name, size)
        .ok_or_else(|| ResourceError::FontNotFound {
            name: name.to_string(),
            system_lookup: true,
        })
}

/// 位图字体加载器
///
/// "系统字体" 是在搜索目录中以 `<name>.json` 命名的描述文件。
#[derive(Debug, Clone, Default)]
pub struct BitmapFontLoader {
    search_dirs: Vec<PathBuf>,
    default: Option<PathBuf>,
}

impl BitmapFontLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_search_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.search_dirs.push(dir.into());
        self
    }

    pub fn with_default(mut self, path: impl Into<PathBuf>) -> Self {
        self.default = Some(path.into());
        self
    }
}

impl FontLoader for BitmapFontLoader {
    fn load_file(&self, path: &Path, size: u32) -> Result<Rc<dyn Font>, ResourceError> {
        Ok(Rc::new(BitmapFont::load(path, size)?))
    }

    fn load_system(&self, name: &str, size: u32) -> Option<Rc<dyn Font>> {
        self.search_dirs
            .iter()
            .map(|dir| dir.join(format!("{name}.json")))
            .filter(|path| path.is_file())
            .find_map(|path| match BitmapFont::load(&path, size) {
                Ok(font) => Some(Rc::new(font) as Rc<dyn Font>),
                Err(e) => {
                    debug!(error = %e, "系统字体加载失败");
                    None
                }
            })
    }

    fn default_font(&self, size: u32) -> Result<Rc<dyn Font>, ResourceError> {
        match &self.default {
            Some(path) => self.load_file(path, size),
            None => Err(ResourceError::FontNotFound {
                name: "<default>".to_string(),
                system_lookup: false,
            }),
        }
    }
}

//! # Config 模块
//!
//! 元素的 JSON 配置记录。
//!
//! 未出现的字段使用默认值；未知的锚点、对齐方式回退到默认值并打印警告。
//! 图像路径相对于调用方传入的资源根目录，字体引用交给 `FontLoader` 解析。

use std::path::Path;

use image::RgbaImage;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::anchor::Anchor;
use crate::color::{self, Color};
use crate::element::{Element, RenderTarget, Widget};
use crate::error::{ConfigError, PgtResult, ResourceError};
use crate::geometry::{Pos, Size};
use crate::gui::{Alignment, Button, FontLoader, FontStyle, Label, resolve_font};
use crate::resources;

/// 解析 JSON 配置字符串
pub fn from_json_str<T: DeserializeOwned>(json: &str) -> Result<T, ConfigError> {
    Ok(serde_json::from_str(json)?)
}

/// 读取 JSON 配置文件
pub fn load_config<T: DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let bytes = resources::read_file(path, "config")?;
    Ok(serde_json::from_slice(&bytes)?)
}

/// 元素配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ElementConfig {
    /// 锚点位置
    #[serde(default)]
    pub pos: Pos,

    /// 元素尺寸；缺省时跟随图像
    #[serde(default)]
    pub size: Option<Size>,

    #[serde(default)]
    pub anchor: Anchor,

    /// 图像文件（相对于资源根目录）
    #[serde(default)]
    pub image: Option<String>,

    /// 旋转角度（度，逆时针）
    #[serde(default)]
    pub rotation: f32,

    #[serde(default = "default_visible")]
    pub visible: bool,
}

impl ElementConfig {
    /// 构建元素
    pub fn build(&self, assets: &Path) -> Result<Element, ResourceError> {
        let mut element = match &self.image {
            Some(image) => {
                let image = resources::load_image(&assets.join(image))?;
                let mut element = Element::with_image(self.pos, image);
                if let Some(size) = self.size {
                    element.resize(size);
                }
                element
            }
            None => Element::new(self.pos, self.size.unwrap_or_default()),
        };
        element.set_anchor(self.anchor);
        if self.rotation != 0.0 {
            element.rotate(self.rotation);
        }
        if !self.visible {
            element.hide();
        }
        Ok(element)
    }
}

/// 标签配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabelConfig {
    #[serde(default)]
    pub pos: Pos,

    /// 元素尺寸（adapt-width 时作为折行宽度）
    #[serde(default)]
    pub size: Option<Size>,

    #[serde(default)]
    pub anchor: Anchor,

    #[serde(default)]
    pub text: String,

    /// 字体文件或名称；缺省使用加载器的默认字体
    #[serde(default)]
    pub font: Option<String>,

    /// 字号（行高像素）
    #[serde(default = "default_text_size")]
    pub text_size: u32,

    #[serde(default = "default_text_color")]
    pub color: Color,

    #[serde(default)]
    pub bg_color: Option<Color>,

    #[serde(default)]
    pub style: FontStyle,

    #[serde(default)]
    pub alignment: Alignment,

    /// 行高；缺省使用字体行高
    #[serde(default)]
    pub line_height: Option<u32>,

    #[serde(default)]
    pub adapt_to_width: bool,

    #[serde(default = "default_exceed_size")]
    pub exceed_size: bool,

    /// 缺省尺寸时总是跟随内容
    #[serde(default)]
    pub auto_size: bool,
}

impl Default for LabelConfig {
    fn default() -> Self {
        Self {
            pos: Pos::zero(),
            size: None,
            anchor: Anchor::default(),
            text: String::new(),
            font: None,
            text_size: default_text_size(),
            color: default_text_color(),
            bg_color: None,
            style: FontStyle::default(),
            alignment: Alignment::default(),
            line_height: None,
            adapt_to_width: false,
            exceed_size: default_exceed_size(),
            auto_size: false,
        }
    }
}

impl LabelConfig {
    /// 构建标签
    pub fn build(&self, fonts: &dyn FontLoader) -> Result<Label, ResourceError> {
        let font = resolve_font(fonts, self.font.as_deref(), self.text_size)?;
        let mut label = Label::new(self.text.clone(), font)
            .at(self.pos)
            .with_anchor(self.anchor);
        if let Some(size) = self.size {
            label.resize(size);
        }
        Ok(label
            .with_color(self.color)
            .with_background(self.bg_color)
            .with_style(self.style)
            .with_alignment(self.alignment)
            .with_line_height(self.line_height)
            .with_adapt_width(self.adapt_to_width)
            .with_exceed_size(self.exceed_size)
            .with_auto_size(self.auto_size || self.size.is_none()))
    }
}

/// 按钮配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ButtonConfig {
    #[serde(default)]
    pub pos: Pos,

    #[serde(default)]
    pub size: Size,

    #[serde(default)]
    pub anchor: Anchor,

    /// 背景图像（缩放到按钮尺寸）
    #[serde(default)]
    pub image: Option<String>,

    /// 内部标签（位置相对于按钮中心）
    #[serde(default)]
    pub label: Option<LabelConfig>,
}

impl ButtonConfig {
    /// 构建按钮
    pub fn build(&self, assets: &Path, fonts: &dyn FontLoader) -> Result<Button, ResourceError> {
        let mut button = Button::new(self.pos, self.size).with_anchor(self.anchor);
        if let Some(image) = &self.image {
            button = button.with_image(resources::load_image(&assets.join(image))?);
        }
        if let Some(label) = &self.label {
            button = button.with_label(label.build(fonts)?);
        }
        Ok(button)
    }
}

/// 场景配置：一块画布与其上的元素
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneConfig {
    #[serde(default = "default_scene_width")]
    pub width: u32,

    #[serde(default = "default_scene_height")]
    pub height: u32,

    #[serde(default = "default_background")]
    pub background: Color,

    #[serde(default)]
    pub elements: Vec<ElementConfig>,

    #[serde(default)]
    pub labels: Vec<LabelConfig>,

    #[serde(default)]
    pub buttons: Vec<ButtonConfig>,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            width: default_scene_width(),
            height: default_scene_height(),
            background: default_background(),
            elements: Vec::new(),
            labels: Vec::new(),
            buttons: Vec::new(),
        }
    }
}

/// 由场景配置构建出的画布与元素
#[derive(Debug, Default)]
pub struct Scene {
    pub width: u32,
    pub height: u32,
    pub background: Color,
    pub elements: Vec<Element>,
    pub labels: Vec<Label>,
    pub buttons: Vec<Button>,
}

impl Scene {
    /// 读取场景配置文件并构建场景
    ///
    /// 配置解析失败与资源加载失败都会返回。
    pub fn load(path: &Path, assets: &Path, fonts: &dyn FontLoader) -> PgtResult<Scene> {
        let config: SceneConfig = load_config(path)?;
        Ok(config.build(assets, fonts)?)
    }

    /// 按元素、标签、按钮的顺序绘制
    pub fn draw(&self, target: &mut dyn RenderTarget) {
        for element in &self.elements {
            element.draw(target);
        }
        for label in &self.labels {
            label.draw(target);
        }
        for button in &self.buttons {
            button.draw(target);
        }
    }

    /// 在背景色画布上渲染整个场景
    pub fn render(&self) -> RgbaImage {
        let mut frame = RgbaImage::from_pixel(self.width, self.height, self.background.into());
        self.draw(&mut frame);
        frame
    }
}

impl SceneConfig {
    pub fn build(&self, assets: &Path, fonts: &dyn FontLoader) -> Result<Scene, ResourceError> {
        Ok(Scene {
            width: self.width,
            height: self.height,
            background: self.background,
            elements: self
                .elements
                .iter()
                .map(|e| e.build(assets))
                .collect::<Result<_, _>>()?,
            labels: self
                .labels
                .iter()
                .map(|l| l.build(fonts))
                .collect::<Result<_, _>>()?,
            buttons: self
                .buttons
                .iter()
                .map(|b| b.build(assets, fonts))
                .collect::<Result<_, _>>()?,
        })
    }
}

// 默认值函数
fn default_visible() -> bool {
    true
}

fn default_text_size() -> u32 {
    20
}

fn default_text_color() -> Color {
    color::BLACK
}

fn default_exceed_size() -> bool {
    true
}

fn default_scene_width() -> u32 {
    800
}

fn default_scene_height() -> u32 {
    600
}

fn default_background() -> Color {
    Color::gray(50)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PgtError;
    use crate::gui::BitmapFontLoader;
    use image::Rgba;

    #[test]
    fn test_label_defaults() {
        let config: LabelConfig = from_json_str(r#"{"text": "hi"}"#).unwrap();
        assert_eq!(config.text, "hi");
        assert_eq!(config.text_size, 20);
        assert_eq!(config.color, color::BLACK);
        assert!(config.exceed_size);
        assert!(!config.adapt_to_width);
        assert_eq!(config.alignment, Alignment::Left);
        assert_eq!(config.anchor, Anchor::UpperLeft);
    }

    #[test]
    fn test_label_options() {
        let config: LabelConfig = from_json_str(
            r#"{
                "pos": [10, 20],
                "size": [100, 50],
                "anchor": "CC",
                "color": [255, 0, 0],
                "style": {"bold": true, "underline": true},
                "alignment": "center",
                "line_height": 24,
                "adapt_to_width": true,
                "exceed_size": false,
                "auto_size": true
            }"#,
        )
        .unwrap();
        assert_eq!(config.pos, Pos::new(10.0, 20.0));
        assert_eq!(config.size, Some(Size::new(100.0, 50.0)));
        assert_eq!(config.anchor, Anchor::CenterCenter);
        assert_eq!(config.color, color::RED);
        assert!(config.style.bold && config.style.underline && !config.style.italic);
        assert_eq!(config.alignment, Alignment::Center);
        assert_eq!(config.line_height, Some(24));
        assert!(config.adapt_to_width && !config.exceed_size && config.auto_size);
    }

    #[test]
    fn test_invalid_names_fall_back() {
        let config: LabelConfig =
            from_json_str(r#"{"alignment": "justify", "anchor": "middle"}"#).unwrap();
        assert_eq!(config.alignment, Alignment::Left);
        assert_eq!(config.anchor, Anchor::UpperLeft);
    }

    #[test]
    fn test_malformed_json() {
        let err = from_json_str::<LabelConfig>("{").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_element_build() {
        let dir = tempfile::tempdir().unwrap();
        RgbaImage::from_pixel(4, 4, Rgba([1, 2, 3, 255]))
            .save(dir.path().join("box.png"))
            .unwrap();

        let config: ElementConfig =
            from_json_str(r#"{"pos": [50, 50], "size": [20, 10], "anchor": "DR", "image": "box.png"}"#)
                .unwrap();
        let element = config.build(dir.path()).unwrap();
        assert_eq!(element.size(), Size::new(20.0, 10.0));
        assert_eq!(element.image().dimensions(), (20, 10));
        assert_eq!(element.top_left(), Pos::new(30.0, 40.0));

        let missing: ElementConfig = from_json_str(r#"{"image": "nope.png"}"#).unwrap();
        assert!(matches!(
            missing.build(dir.path()),
            Err(ResourceError::FileMissing { .. })
        ));
    }

    #[test]
    fn test_missing_font() {
        let config: LabelConfig = from_json_str(r#"{"font": "nope"}"#).unwrap();
        let err = config.build(&BitmapFontLoader::new()).unwrap_err();
        assert!(matches!(err, ResourceError::FontNotFound { .. }));
    }

    #[test]
    fn test_load_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scene.json");
        std::fs::write(&path, r#"{"width": 320, "buttons": [{"size": [10, 10]}]}"#).unwrap();
        let scene: SceneConfig = load_config(&path).unwrap();
        assert_eq!(scene.width, 320);
        assert_eq!(scene.height, 600);
        assert_eq!(scene.buttons.len(), 1);

        let built = scene.build(dir.path(), &BitmapFontLoader::new()).unwrap();
        assert_eq!(built.buttons[0].size(), Size::new(10.0, 10.0));
    }

    #[test]
    fn test_scene_load_and_render() {
        let dir = tempfile::tempdir().unwrap();
        RgbaImage::from_pixel(2, 2, Rgba([0, 0, 255, 255]))
            .save(dir.path().join("dot.png"))
            .unwrap();
        let path = dir.path().join("scene.json");
        std::fs::write(
            &path,
            r#"{
                "width": 10,
                "height": 8,
                "background": [10, 20, 30],
                "elements": [{"pos": [4, 4], "image": "dot.png"}]
            }"#,
        )
        .unwrap();

        let scene = Scene::load(&path, dir.path(), &BitmapFontLoader::new()).unwrap();
        let frame = scene.render();
        assert_eq!(frame.dimensions(), (10, 8));
        assert_eq!(*frame.get_pixel(0, 0), Rgba([10, 20, 30, 255]));
        assert_eq!(*frame.get_pixel(5, 5), Rgba([0, 0, 255, 255]));
    }

    #[test]
    fn test_scene_load_errors() {
        let dir = tempfile::tempdir().unwrap();
        let fonts = BitmapFontLoader::new();

        let missing = Scene::load(&dir.path().join("none.json"), dir.path(), &fonts).unwrap_err();
        assert!(matches!(
            missing,
            PgtError::Config(ConfigError::Resource(ResourceError::FileMissing { .. }))
        ));

        let path = dir.path().join("scene.json");
        std::fs::write(&path, r#"{"labels": [{"text": "hi", "font": "nope"}]}"#).unwrap();
        let no_font = Scene::load(&path, dir.path(), &fonts).unwrap_err();
        assert!(matches!(
            no_font,
            PgtError::Resource(ResourceError::FontNotFound { .. })
        ));
    }
}

//! # GUI 模块
//!
//! 文本标签、按钮，以及它们依赖的字体与排版。

pub mod button;
pub mod font;
pub mod label;
pub mod layout;

pub use button::{Button, ButtonState, ClickCallback, PointerState};
pub use font::{BitmapFont, BitmapFontInfo, BitmapFontLoader, Font, FontLoader, FontStyle, resolve_font};
pub use label::Label;
pub use layout::{Alignment, wrap_text};

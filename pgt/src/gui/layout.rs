//! # Layout 模块
//!
//! 标签的文本排版：按宽度贪心折行与行对齐。
//!
//! 折行规则：
//! - `\n` 分段，末尾的空行被丢弃，空文本得到一个空行
//! - 段内按空格分词，贪心填充到宽度上限
//! - 单个词超过上限时逐字符切分（每行至少一个字符）
//! - 不会截断或丢弃任何字符

use serde::{Deserialize, Serialize};
use tracing::warn;

/// 行对齐方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
}

impl Alignment {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Center => "center",
            Self::Right => "right",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "left" => Some(Self::Left),
            "center" | "centre" => Some(Self::Center),
            "right" => Some(Self::Right),
            _ => None,
        }
    }

    /// 解析对齐方式，未知名称回退到 `Left`
    pub fn parse_lossy(name: &str) -> Self {
        Self::parse(name).unwrap_or_else(|| {
            warn!(alignment = name, "未知的对齐方式，使用 left");
            Self::Left
        })
    }

    /// 行在容器中的水平偏移
    pub fn line_offset(&self, container_width: u32, line_width: u32) -> i64 {
        let free = container_width as i64 - line_width as i64;
        match self {
            Self::Left => 0,
            Self::Center => free.div_euclid(2),
            Self::Right => free,
        }
    }
}

impl From<String> for Alignment {
    fn from(name: String) -> Self {
        Self::parse_lossy(&name)
    }
}

impl From<Alignment> for String {
    fn from(alignment: Alignment) -> Self {
        alignment.name().to_string()
    }
}

/// 把文本折成若干行
///
/// `budget` 为 `None` 时只按 `\n` 分段。
pub fn wrap_text(text: &str, budget: Option<u32>, measure: impl Fn(&str) -> u32) -> Vec<String> {
    let mut paragraphs: Vec<&str> = text.split('\n').collect();
    if paragraphs.last() == Some(&"") {
        paragraphs.pop();
    }

    let mut lines = Vec::new();
    for paragraph in paragraphs {
        match budget {
            Some(budget) => wrap_paragraph(paragraph, budget, &measure, &mut lines),
            None => lines.push(paragraph.to_string()),
        }
    }

    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

fn wrap_paragraph(
    paragraph: &str,
    budget: u32,
    measure: &impl Fn(&str) -> u32,
    lines: &mut Vec<String>,
) {
    let mut current = String::new();
    let mut started = false;

    for word in paragraph.split(' ') {
        if started {
            let candidate = format!("{current} {word}");
            if measure(&candidate) <= budget {
                current = candidate;
                continue;
            }
            // 行首空格折行后不单独成行
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
        }
        started = true;

        let mut rest = word;
        while measure(rest) > budget && rest.chars().count() > 1 {
            let cut = longest_fitting_prefix(rest, budget, measure);
            lines.push(rest[..cut].to_string());
            rest = &rest[cut..];
        }
        current = rest.to_string();
    }

    lines.push(current);
}

/// 能放进宽度上限的最长前缀（字节长度），至少包含一个字符
fn longest_fitting_prefix(word: &str, budget: u32, measure: &impl Fn(&str) -> u32) -> usize {
    let mut chars = word.char_indices().map(|(i, c)| i + c.len_utf8());
    let first = chars.next().unwrap_or(word.len());
    let mut best = first;
    for end in chars {
        if measure(&word[..end]) > budget {
            break;
        }
        best = end;
    }
    best
}

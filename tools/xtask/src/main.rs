//! # xtask - 开发辅助工具
//!
//! 提供本地质量门禁与开发辅助命令。
//!
//! ## 命令
//!
//! - `check-all`: 运行 fmt、clippy、test
//! - `cov-pgt`: 运行 pgt 覆盖率
//! - `easing-table`: 输出缓动函数采样表（JSON）
//! - `preview`: 离屏渲染场景到 PNG

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitCode};
use std::rc::Rc;

use clap::{Parser, Subcommand};
use image::{Rgba, RgbaImage};
use pgt::{
    AniElement, Anchor, Animated, Animation, BitmapFont, BitmapFontInfo, BitmapFontLoader, Button,
    Color, DrawCache, EasingFunction, Font, FrameSource, Label, PointerState, Pos, RenderTarget,
    Scene, Size, Widget, binding, color,
};
use serde::Serialize;
use tracing::{debug, info};

#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "pgt 开发辅助工具")]
struct Cli {
    /// 输出调试日志
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 运行 fmt、clippy、test 门禁检查
    CheckAll,

    /// 运行 pgt 覆盖率报告
    CovPgt,

    /// 输出缓动函数采样表（JSON）
    EasingTable {
        /// 每个函数的采样点数（包含 0 和 1）
        #[arg(short, long, default_value = "11")]
        samples: usize,

        /// 输出文件（默认写到 stdout）
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// 离屏渲染场景到 PNG
    ///
    /// 不带场景文件时渲染内置演示：悬停中的按钮与滑动的圆。
    Preview {
        /// 场景配置（JSON）
        scene: Option<PathBuf>,

        /// 输出图像
        #[arg(short, long, default_value = "preview.png")]
        output: PathBuf,

        /// 资源根目录（场景中的图像路径相对于它）
        #[arg(long, default_value = ".")]
        assets: PathBuf,

        /// 位图字体搜索目录（默认同资源根目录）
        #[arg(long)]
        fonts: Option<PathBuf>,

        /// 演示场景模拟的秒数
        #[arg(long, default_value = "0.5")]
        seconds: f32,
    },
}

fn run(step: &str, cmd: &mut Command) -> anyhow::Result<()> {
    eprintln!("\n==> {step}");
    let status = cmd.status()?;
    if !status.success() {
        anyhow::bail!("{step} failed with {status}");
    }
    Ok(())
}

fn ensure_cargo_llvm_cov_available() -> anyhow::Result<()> {
    let mut cmd = Command::new("cargo");
    cmd.args(["llvm-cov", "--version"]);
    let status = cmd.status();
    match status {
        Ok(s) if s.success() => Ok(()),
        _ => anyhow::bail!(
            "cargo llvm-cov 不可用。\n\
请先安装：\n\
  - cargo install cargo-llvm-cov\n\
  - rustup component add llvm-tools-preview\n\
然后重试。"
        ),
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = real_main(cli.command) {
        eprintln!("xtask error: {e:#}");
        return ExitCode::from(1);
    }
    ExitCode::from(0)
}

fn real_main(command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::CheckAll => {
            let mut fmt = Command::new("cargo");
            fmt.args(["fmt", "--all", "--", "--check"]);
            run("cargo fmt --all -- --check", &mut fmt)?;

            let mut clippy = Command::new("cargo");
            clippy.args(["clippy", "--workspace", "--all-targets"]);
            run("cargo clippy --workspace --all-targets", &mut clippy)?;

            let mut test = Command::new("cargo");
            test.args(["test", "--workspace"]);
            run("cargo test --workspace", &mut test)?;
        }
        Commands::CovPgt => {
            ensure_cargo_llvm_cov_available()?;

            let mut cov = Command::new("cargo");
            cov.args(["llvm-cov", "-p", "pgt", "--all-features", "--html"]);
            run("cargo llvm-cov -p pgt --all-features --html", &mut cov)?;

            eprintln!("\nCoverage HTML: target/llvm-cov/html/index.html");
        }
        Commands::EasingTable { samples, output } => {
            let json = serde_json::to_string_pretty(&easing_table(samples)?)?;
            match output {
                Some(path) => {
                    std::fs::write(&path, json)?;
                    info!(path = %path.display(), "缓动表已写入");
                }
                None => println!("{json}"),
            }
        }
        Commands::Preview {
            scene,
            output,
            assets,
            fonts,
            seconds,
        } => {
            let fonts = fonts.unwrap_or_else(|| assets.clone());
            let frame = match scene {
                Some(scene) => render_scene(&scene, &assets, &fonts)?,
                None => render_demo(seconds),
            };
            frame.save(&output)?;
            info!(
                path = %output.display(),
                width = frame.width(),
                height = frame.height(),
                "预览已保存"
            );
        }
    }

    Ok(())
}

//=============================================================================
// easing-table 命令实现
//=============================================================================

/// 单个缓动函数的采样
#[derive(Serialize)]
struct EasingRow {
    name: &'static str,
    samples: Vec<f32>,
}

fn easing_table(samples: usize) -> anyhow::Result<Vec<EasingRow>> {
    if samples < 2 {
        anyhow::bail!("采样点数至少为 2（当前 {samples}）");
    }
    let last = (samples - 1) as f32;
    Ok(EasingFunction::ALL
        .iter()
        .map(|easing| EasingRow {
            name: easing.name(),
            samples: (0..samples)
                .map(|i| easing.apply(i as f32 / last))
                .collect(),
        })
        .collect())
}

//=============================================================================
// preview 命令实现
//=============================================================================

const TICK: f32 = 1.0 / 60.0;

/// 渲染场景配置
fn render_scene(path: &Path, assets: &Path, fonts: &Path) -> anyhow::Result<RgbaImage> {
    let loader = BitmapFontLoader::new().with_search_dir(fonts);
    let scene = Scene::load(path, assets, &loader)?;
    debug!(
        elements = scene.elements.len(),
        labels = scene.labels.len(),
        buttons = scene.buttons.len(),
        "场景已构建"
    );
    Ok(scene.render())
}

/// 内置演示使用的方块字体
fn demo_font(size: u32) -> Rc<dyn Font> {
    let chars: String = (' '..='~').collect();
    let (gw, gh, columns) = (6, 10, 16);
    let rows = (chars.chars().count() as u32).div_ceil(columns);
    let mut atlas = RgbaImage::new(columns * gw, rows * gh);
    for (i, c) in chars.chars().enumerate().filter(|(_, c)| *c != ' ') {
        let (cx, cy) = ((i as u32 % columns) * gw, (i as u32 / columns) * gh);
        // 字形之间留出 1 像素空隙
        for y in 1..gh - 1 {
            for x in 0..gw - 1 {
                let shade = if (x + y + c as u32) % 3 == 0 { 160 } else { 255 };
                atlas.put_pixel(cx + x, cy + y, Rgba([255, 255, 255, shade]));
            }
        }
    }
    let info = BitmapFontInfo {
        chars,
        glyph_width: gw,
        glyph_height: gh,
        columns,
        image: String::new(),
        widths: HashMap::new(),
        spacing: 0,
        fallback: Some('?'),
    };
    match BitmapFont::new("demo", info, atlas, size) {
        Ok(font) => Rc::new(font),
        Err(e) => unreachable!("演示字体参数固定: {e}"),
    }
}

/// 渲染内置演示
fn render_demo(seconds: f32) -> RgbaImage {
    let mut shapes = DrawCache::default();
    let (width, height) = (480, 320);
    let center = Pos::new(width as f32 / 2.0, height as f32 / 2.0);

    let face = shapes.aa_rect(160, 60, 14, Color::rgb(70, 110, 200));
    let mut button = Button::new(center, Size::new(160.0, 60.0))
        .with_anchor(Anchor::CenterCenter)
        .with_image((*face).clone())
        .with_label(
            Label::new("pgt preview", demo_font(20))
                .with_anchor(Anchor::CenterCenter)
                .with_color(color::WHITE),
        )
        .with_animation(
            Animation::new(
                "hover",
                binding::size(),
                FrameSource::tween_to(Size::new(184.0, 69.0), 120),
                0.3,
            )
            .with_easing(EasingFunction::OutBack),
        );

    let dot = shapes.odd_circle(12, color::YELLOW);
    let mut ball = AniElement::with_image(Pos::new(40.0, 270.0), (*dot).clone())
        .with_anchor(Anchor::CenterCenter);
    ball.add_animation(
        Animation::new(
            "slide",
            binding::position(),
            FrameSource::tween_to(Pos::new(440.0, 270.0), 240),
            1.0,
        )
        .with_easing(EasingFunction::InOutCubic)
        .with_looping(true),
    );
    ball.start_animation("slide");

    let pointer = PointerState::at(center);
    let ticks = (seconds.max(0.0) / TICK).round() as usize;
    for _ in 0..ticks {
        button.auto_run(&pointer, TICK);
        for event in ball.run_animations(TICK) {
            debug!(?event, "动画事件");
        }
    }

    let mut frame = RgbaImage::from_pixel(width, height, Color::gray(50).into());
    let ring = shapes.even_circle(40, Color::rgb(90, 90, 90));
    frame.blit(&ring, 20, 20);
    button.draw(&mut frame);
    ball.draw(&mut frame);

    info!(state = ?button.state(), size = ?button.size(), "{}", shapes.stats().format());
    frame
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_easing_table_shape() {
        let table = easing_table(5).unwrap();
        assert_eq!(table.len(), EasingFunction::ALL.len());
        let linear = table.iter().find(|row| row.name == "linear").unwrap();
        assert_eq!(linear.samples, vec![0.0, 0.25, 0.5, 0.75, 1.0]);
        assert!(easing_table(1).is_err());
    }

    #[test]
    fn test_demo_renders() {
        let frame = render_demo(0.5);
        assert_eq!(frame.dimensions(), (480, 320));
        // 背景
        assert_eq!(*frame.get_pixel(479, 0), Rgba([50, 50, 50, 255]));
    }
}

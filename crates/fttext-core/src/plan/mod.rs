//! Turns raw option values into a validated [`RenderPlan`].
//!
//! Everything that can be rejected is rejected here, before a connection to
//! the display is opened and long before a frame is sent.

mod geometry;

use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::debug;

use crate::color::Color;
use crate::config::{AppConfig, DEFAULT_LAYER, DEFAULT_SCROLL_DELAY_MS, DEFAULT_WIDTH};
use crate::display::Offset;
use crate::font::Font;
use crate::{Error, Result};

pub use geometry::{parse_geometry, GeometrySpec};

/// Scroll delays below this are raised to it so we do not flood the display.
pub const MIN_SCROLL_DELAY_MS: u64 = 10;

/// A geometry or layer option, kept in the order it was given.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayoutArg {
    Geometry(String),
    Layer(i32),
}

/// Unvalidated inputs, as collected from the config file and command line.
#[derive(Debug, Clone)]
pub struct ResolverInput {
    /// Geometry and layer options in the order given; later entries win
    pub layout: Vec<LayoutArg>,
    pub host: Option<String>,
    pub font: Option<PathBuf>,
    pub scroll_delay_ms: u64,
    pub run_once: bool,
    /// Foreground color as `RRGGBB`
    pub foreground: String,
    /// Background color as `RRGGBB`
    pub background: String,
    /// Positional text tokens
    pub text: Vec<String>,
}

impl Default for ResolverInput {
    fn default() -> Self {
        Self {
            layout: Vec::new(),
            host: None,
            font: None,
            scroll_delay_ms: DEFAULT_SCROLL_DELAY_MS,
            run_once: false,
            foreground: "FFFFFF".to_string(),
            background: "000000".to_string(),
            text: Vec::new(),
        }
    }
}

impl ResolverInput {
    /// Start from the config file's defaults. Its geometry and layer come
    /// first in `layout`, so anything added later overrides them.
    pub fn from_config(config: &AppConfig) -> Self {
        let defaults = &config.defaults;
        let mut layout = Vec::new();
        if let Some(geometry) = &defaults.geometry {
            layout.push(LayoutArg::Geometry(geometry.clone()));
        }
        if let Some(layer) = defaults.layer {
            layout.push(LayoutArg::Layer(layer));
        }
        Self {
            layout,
            host: defaults.host.clone(),
            font: config.font_path(),
            scroll_delay_ms: defaults.scroll_delay_ms,
            run_once: defaults.run_once,
            foreground: defaults.foreground.clone(),
            background: defaults.background.clone(),
            text: Vec::new(),
        }
    }

    /// Validate the inputs, loading the font from disk.
    pub fn resolve(self) -> Result<RenderPlan> {
        self.resolve_with(Font::load)
    }

    /// Validate the inputs with a custom font loader.
    pub fn resolve_with<F>(self, load_font: F) -> Result<RenderPlan>
    where
        F: FnOnce(&Path) -> Result<Font>,
    {
        let mut width = DEFAULT_WIDTH;
        let mut height = None;
        let mut offset = Offset {
            x: 0,
            y: 0,
            z: DEFAULT_LAYER,
        };
        for arg in &self.layout {
            match arg {
                LayoutArg::Geometry(spec) => {
                    let geo = parse_geometry(spec)?;
                    width = geo.width;
                    height = Some(geo.height);
                    offset.x = geo.off_x.unwrap_or(offset.x);
                    offset.y = geo.off_y.unwrap_or(offset.y);
                    offset.z = geo.off_z.unwrap_or(offset.z);
                }
                LayoutArg::Layer(layer) => offset.z = *layer,
            }
        }

        let foreground = parse_color("Foreground", &self.foreground)?;
        let background = parse_color("Background", &self.background)?;
        let scroll_delay_ms = clamp_scroll_delay(self.scroll_delay_ms);

        let font_path = self.font.as_deref().ok_or(Error::MissingFont)?;
        let font = load_font(font_path)?;
        if font.height() < 0 {
            return Err(Error::MissingFont);
        }

        let height = height.unwrap_or_else(|| font.height());
        if width < 1 || height < 1 {
            return Err(Error::InvalidSize { width, height });
        }

        let text = assemble_text(&self.text).ok_or(Error::EmptyText)?;

        debug!(
            width,
            height,
            ?offset,
            scroll_delay_ms,
            run_forever = !self.run_once,
            "Resolved render plan"
        );

        Ok(RenderPlan {
            width,
            height,
            offset,
            scroll_delay_ms,
            run_forever: !self.run_once,
            foreground,
            background,
            text,
            font,
            host: self.host,
        })
    }
}

fn parse_color(which: &'static str, value: &str) -> Result<Color> {
    Color::from_hex(value).ok_or_else(|| Error::InvalidColor {
        which,
        value: value.to_string(),
    })
}

/// Raise positive delays below the floor; 0 (static) is left alone.
pub fn clamp_scroll_delay(ms: u64) -> u64 {
    if ms > 0 && ms < MIN_SCROLL_DELAY_MS {
        MIN_SCROLL_DELAY_MS
    } else {
        ms
    }
}

/// Join tokens with single spaces and drop leading whitespace.
/// Returns `None` when nothing is left.
pub fn assemble_text(tokens: &[String]) -> Option<String> {
    let joined = tokens.join(" ");
    let text = joined.trim_start();
    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}

/// Everything the renderer needs, validated. Read-only once built.
#[derive(Debug, Clone)]
pub struct RenderPlan {
    width: i32,
    height: i32,
    offset: Offset,
    scroll_delay_ms: u64,
    run_forever: bool,
    foreground: Color,
    background: Color,
    text: String,
    font: Font,
    host: Option<String>,
}

impl RenderPlan {
    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn offset(&self) -> Offset {
        self.offset
    }

    pub fn scroll_delay_ms(&self) -> u64 {
        self.scroll_delay_ms
    }

    pub fn scroll_delay(&self) -> Duration {
        Duration::from_millis(self.scroll_delay_ms)
    }

    /// Whether the text scrolls; a zero delay shows one static frame.
    pub fn is_scrolling(&self) -> bool {
        self.scroll_delay_ms > 0
    }

    pub fn run_forever(&self) -> bool {
        self.run_forever
    }

    pub fn foreground(&self) -> Color {
        self.foreground
    }

    pub fn background(&self) -> Color {
        self.background
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn font(&self) -> &Font {
        &self.font
    }

    pub fn host(&self) -> Option<&str> {
        self.host.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::tests::test_font;

    fn input(text: &[&str]) -> ResolverInput {
        ResolverInput {
            font: Some(PathBuf::from("test.bdf")),
            text: text.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        }
    }

    fn resolve(input: ResolverInput) -> Result<RenderPlan> {
        input.resolve_with(|_| Ok(test_font()))
    }

    #[test]
    fn test_defaults() {
        let plan = resolve(input(&["hello"])).unwrap();
        assert_eq!(plan.width(), 45);
        // Height comes from the font when no geometry is given
        assert_eq!(plan.height(), 8);
        assert_eq!(plan.offset(), Offset { x: 0, y: 0, z: 1 });
        assert_eq!(plan.scroll_delay_ms(), 50);
        assert!(plan.run_forever());
        assert_eq!(plan.foreground(), Color::WHITE);
        assert_eq!(plan.background(), Color::BLACK);
        assert_eq!(plan.text(), "hello");
        assert!(plan.host().is_none());
    }

    #[test]
    fn test_geometry_keeps_default_offsets() {
        let mut inp = input(&["hi"]);
        inp.layout = vec![LayoutArg::Geometry("32x16".into())];
        let plan = resolve(inp).unwrap();
        assert_eq!((plan.width(), plan.height()), (32, 16));
        assert_eq!(plan.offset(), Offset { x: 0, y: 0, z: 1 });
    }

    #[test]
    fn test_last_layer_value_wins() {
        let mut inp = input(&["hi"]);
        inp.layout = vec![
            LayoutArg::Layer(5),
            LayoutArg::Geometry("32x16+1+2+3".into()),
        ];
        assert_eq!(resolve(inp.clone()).unwrap().offset().z, 3);

        inp.layout.push(LayoutArg::Layer(7));
        assert_eq!(resolve(inp).unwrap().offset(), Offset { x: 1, y: 2, z: 7 });
    }

    #[test]
    fn test_short_geometry_retains_prior_offsets() {
        let mut inp = input(&["hi"]);
        inp.layout = vec![
            LayoutArg::Layer(4),
            LayoutArg::Geometry("20x10+6".into()),
        ];
        let plan = resolve(inp).unwrap();
        assert_eq!(plan.offset(), Offset { x: 6, y: 0, z: 4 });
    }

    #[test]
    fn test_scroll_delay_clamp() {
        assert_eq!(clamp_scroll_delay(0), 0);
        for d in 1..10 {
            assert_eq!(clamp_scroll_delay(d), 10);
        }
        assert_eq!(clamp_scroll_delay(10), 10);
        assert_eq!(clamp_scroll_delay(60), 60);

        let mut inp = input(&["hi"]);
        inp.scroll_delay_ms = 3;
        let plan = resolve(inp).unwrap();
        assert_eq!(plan.scroll_delay_ms(), 10);
        assert!(plan.is_scrolling());
    }

    #[test]
    fn test_zero_delay_is_static() {
        let mut inp = input(&["hi"]);
        inp.scroll_delay_ms = 0;
        assert!(!resolve(inp).unwrap().is_scrolling());
    }

    #[test]
    fn test_invalid_colors() {
        let mut inp = input(&["hi"]);
        inp.foreground = "red".into();
        let err = resolve(inp).unwrap_err();
        assert!(matches!(err, Error::InvalidColor { which: "Foreground", .. }));
        assert_eq!(err.kind(), crate::ErrorKind::Usage);

        let mut inp = input(&["hi"]);
        inp.background = "00000".into();
        assert!(matches!(
            resolve(inp).unwrap_err(),
            Error::InvalidColor { which: "Background", .. }
        ));
    }

    #[test]
    fn test_invalid_geometry() {
        let mut inp = input(&["hi"]);
        inp.layout = vec![LayoutArg::Geometry("45".into())];
        let err = resolve(inp).unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::Usage);
    }

    #[test]
    fn test_missing_font() {
        let mut inp = input(&["hi"]);
        inp.font = None;
        assert!(matches!(resolve(inp).unwrap_err(), Error::MissingFont));
    }

    #[test]
    fn test_font_load_failure_propagates() {
        let err = input(&["hi"])
            .resolve_with(|path| {
                Err(Error::FontLoad {
                    path: path.display().to_string(),
                    reason: "not a BDF file".into(),
                })
            })
            .unwrap_err();
        assert!(err.to_string().contains("test.bdf"));
    }

    #[test]
    fn test_non_positive_size() {
        let mut inp = input(&["hi"]);
        inp.layout = vec![LayoutArg::Geometry("0x8".into())];
        assert!(matches!(
            resolve(inp).unwrap_err(),
            Error::InvalidSize { width: 0, height: 8 }
        ));
    }

    #[test]
    fn test_text_assembly() {
        let tokens = |t: &[&str]| t.iter().map(|s| s.to_string()).collect::<Vec<_>>();
        assert_eq!(assemble_text(&tokens(&["hello", "world"])).as_deref(), Some("hello world"));
        assert_eq!(assemble_text(&tokens(&["  ", "x"])).as_deref(), Some("x"));
        assert_eq!(assemble_text(&tokens(&["a ", " b"])).as_deref(), Some("a   b"));
        assert_eq!(assemble_text(&tokens(&["", "  "])), None);
        assert_eq!(assemble_text(&[]), None);
    }

    #[test]
    fn test_empty_text() {
        let err = resolve(input(&["   "])).unwrap_err();
        assert!(matches!(err, Error::EmptyText));
        assert_eq!(err.kind(), crate::ErrorKind::Content);
    }

    #[test]
    fn test_from_config() {
        let config = AppConfig::parse(
            r#"
[defaults]
host = "ft.local"
font = "/fonts/6x9.bdf"
geometry = "64x9+0+0+2"
scroll_delay_ms = 0
run_once = true
background = "102030"
"#,
        )
        .unwrap();
        let mut inp = ResolverInput::from_config(&config);
        inp.layout.push(LayoutArg::Layer(9));
        inp.text = vec!["hi".into()];

        let plan = inp.resolve_with(|_| Ok(test_font())).unwrap();
        assert_eq!(plan.host(), Some("ft.local"));
        assert_eq!((plan.width(), plan.height()), (64, 9));
        assert_eq!(plan.offset().z, 9);
        assert!(!plan.is_scrolling());
        assert!(!plan.run_forever());
        assert_eq!(plan.background(), Color::new(0x10, 0x20, 0x30));
    }
}

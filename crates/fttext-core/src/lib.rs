pub mod color;
pub mod config;
pub mod display;
pub mod error;
pub mod font;
pub mod plan;
pub mod render;

pub use color::Color;
pub use config::AppConfig;
pub use display::{open_connection, Canvas, Display, FrameBuffer, Offset, UdpDisplay};
pub use error::{Error, ErrorKind, Result};
pub use font::{draw_text, Font};
pub use plan::{LayoutArg, RenderPlan, ResolverInput};
pub use render::{RenderOutcome, RenderReport, ScrollRenderer, ScrollState};

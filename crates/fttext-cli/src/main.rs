use std::path::PathBuf;

use anyhow::Result;
use clap::{ArgAction, ArgMatches, CommandFactory, FromArgMatches, Parser};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use fttext_core::{AppConfig, ErrorKind, LayoutArg, ResolverInput};

mod commands;

#[derive(Parser)]
#[command(name = "fttext")]
#[command(author, version, about = "Send a line of text to a Flaschen-Taschen display")]
#[command(disable_help_flag = true)]
struct Cli {
    /// Output geometry <width>x<height>[+<off_x>+<off_y>[+<layer>]] (default 45x<font-height>+0+0+1)
    #[arg(short = 'g', long = "geometry", value_name = "GEOMETRY", action = ArgAction::Append)]
    geometry: Vec<String>,

    /// Layer 0..15 (if also given in -g, the last one counts)
    #[arg(short = 'l', long = "layer", action = ArgAction::Append)]
    layer: Vec<i32>,

    /// Flaschen-Taschen display hostname (default: $FT_DISPLAY or localhost)
    #[arg(short = 'h', long = "host")]
    host: Option<String>,

    /// Path to a *.bdf font file
    #[arg(short = 'f', long = "font", value_name = "FONTFILE")]
    font: Option<PathBuf>,

    /// Scroll milliseconds per pixel (default 50), 0 for no scrolling
    #[arg(short = 's', long = "scroll-delay", value_name = "MS")]
    scroll_delay_ms: Option<u64>,

    /// Only run once, don't scroll forever
    #[arg(short = 'o', long = "once")]
    once: bool,

    /// Text color as hex (default: FFFFFF)
    #[arg(short = 'c', long = "color", value_name = "RRGGBB")]
    foreground: Option<String>,

    /// Background color as hex (default: 000000)
    #[arg(short = 'b', long = "background", value_name = "RRGGBB")]
    background: Option<String>,

    /// Config file (default: ~/.config/fttext/config.toml)
    #[arg(long = "config", value_name = "PATH")]
    config: Option<PathBuf>,

    /// Print help
    #[arg(long, action = ArgAction::Help)]
    help: Option<bool>,

    /// Text to show; all words are joined with single spaces
    #[arg(value_name = "TEXT")]
    text: Vec<String>,
}

impl Cli {
    /// Layer the command line over the config file defaults
    fn into_input(self, matches: &ArgMatches, config: &AppConfig) -> ResolverInput {
        let mut input = ResolverInput::from_config(config);
        input.layout.extend(layout_args(matches));
        if let Some(host) = self.host {
            input.host = Some(host);
        }
        if let Some(font) = self.font {
            input.font = Some(font);
        }
        if let Some(delay) = self.scroll_delay_ms {
            input.scroll_delay_ms = delay;
        }
        if self.once {
            input.run_once = true;
        }
        if let Some(fg) = self.foreground {
            input.foreground = fg;
        }
        if let Some(bg) = self.background {
            input.background = bg;
        }
        input.text = self.text;
        input
    }
}

/// Geometry and layer options in the order they appeared on the command line
fn layout_args(matches: &ArgMatches) -> Vec<LayoutArg> {
    let mut args: Vec<(usize, LayoutArg)> = Vec::new();

    if let (Some(indices), Some(values)) = (
        matches.indices_of("geometry"),
        matches.get_many::<String>("geometry"),
    ) {
        args.extend(indices.zip(values).map(|(i, v)| (i, LayoutArg::Geometry(v.clone()))));
    }
    if let (Some(indices), Some(values)) =
        (matches.indices_of("layer"), matches.get_many::<i32>("layer"))
    {
        args.extend(indices.zip(values).map(|(i, v)| (i, LayoutArg::Layer(*v))));
    }

    args.sort_by_key(|(index, _)| *index);
    args.into_iter().map(|(_, arg)| arg).collect()
}

/// Exit status for a command line clap rejected: help and version are not
/// failures, every malformed option is a usage error like any other.
fn usage_exit_code(err: &clap::Error) -> i32 {
    match err.kind() {
        clap::error::ErrorKind::DisplayHelp | clap::error::ErrorKind::DisplayVersion => 0,
        _ => 1,
    }
}

fn exit_with_usage(err: clap::Error) -> ! {
    let code = usage_exit_code(&err);
    // clap's rendering already carries the usage line for real errors
    let _ = err.print();
    std::process::exit(code)
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Initialize logging; stdout is left alone, diagnostics go to stderr
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "warn".into()),
        ))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    let matches = Cli::command()
        .try_get_matches()
        .unwrap_or_else(|e| exit_with_usage(e));
    let cli = Cli::from_arg_matches(&matches).unwrap_or_else(|e| exit_with_usage(e));

    // Load configuration
    let config = match &cli.config {
        Some(path) => AppConfig::load_from(path)?,
        None => AppConfig::load()?,
    };

    let plan = cli.into_input(&matches, &config).resolve().map_err(|e| {
        if e.kind() == ErrorKind::Usage {
            eprintln!("{}", Cli::command().render_usage());
        }
        e
    })?;

    commands::send::run(plan).await
}

// ============================================================================
// seamweave CLI: replay an editing session and export the collage
// ============================================================================
//
// Usage examples:
//   seamweave --ratio 3:2 --count 6 --script session.json
//   seamweave -r 1:1 -n 4 --script edits.json --output collage.png --density 2
//   seamweave --list-ratios
//
// A script is a JSON array of editor messages, the same messages the
// interactive controls dispatch. Everything runs on the current thread.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;

use crate::config::EditorConfig;
use crate::render::export::save_rgba;
use crate::render::image::pixmap_to_rgba;
use crate::domain::{AspectRatio, MAX_PHOTOS, MIN_PHOTOS};
use crate::session::handlers::{Outcome, handle_msg};
use crate::session::messages::{EditorMsg, parse_script};
use crate::session::state::EditorState;

// ============================================================================
// CLI argument definition (clap Derive)
// ============================================================================

/// Seamless photo collage composer.
#[derive(Parser, Debug)]
#[command(
    name = "seamweave",
    about = "Seamless shared-vertex photo collage composer",
    long_about = "Generate a grid of pieces for a photo count and aspect ratio, replay\n\
                  an editing session (assign photos, drag vertices, zoom, rotate) and\n\
                  export the composed canvas as PNG.\n\n\
                  Example:\n  \
                  seamweave --ratio 3:2 --count 6 --script session.json --output out.png"
)]
pub struct CliArgs {
    /// Canvas aspect ratio (1:1, 16:9, 5:4, 7:5, 4:3, 5:3, 3:2, 2:3, 3:5, 3:4, 4:5, 9:16)
    #[arg(short, long, default_value = "3:2", value_parser = parse_ratio)]
    pub ratio: AspectRatio,

    /// Number of photos (2-15)
    #[arg(short = 'n', long, default_value_t = 6, value_parser = clap::value_parser!(u32).range(MIN_PHOTOS as i64..=MAX_PHOTOS as i64))]
    pub count: u32,

    /// JSON session script to replay
    #[arg(short, long, value_name = "SCRIPT.json")]
    pub script: Option<PathBuf>,

    /// Write the final collage here. Without it, the configured save
    /// location is used unless the script already exported.
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Also write the interactive view (selection outline and handles)
    /// as it stands after the script, before the final export
    #[arg(long, value_name = "FILE")]
    pub preview: Option<PathBuf>,

    /// Export pixel density (defaults to the configured value)
    #[arg(short, long)]
    pub density: Option<f32>,

    /// Config file to use instead of the user config
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Print the supported aspect ratios and exit
    #[arg(long)]
    pub list_ratios: bool,

    /// Log progress at info level
    #[arg(short, long)]
    pub verbose: bool,
}

fn parse_ratio(s: &str) -> Result<AspectRatio, String> {
    s.parse::<AspectRatio>().map_err(|e| e.to_string())
}

// ============================================================================
// Public entry point
// ============================================================================

/// Run the CLI and return an OS exit code
pub fn run(args: CliArgs) -> ExitCode {
    if args.list_ratios {
        for ratio in AspectRatio::ALL {
            println!("{}\t{:.4}", ratio, ratio.value());
        }
        return ExitCode::SUCCESS;
    }

    match run_session(&args) {
        Ok(exported) => {
            for path in exported {
                println!("{}", path.display());
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<EditorConfig> {
    match path {
        Some(path) => EditorConfig::load_from(path),
        None => Ok(EditorConfig::load()),
    }
}

/// Build the session, replay the script and export. Returns every path
/// written, in order.
pub fn run_session(args: &CliArgs) -> anyhow::Result<Vec<PathBuf>> {
    let config = load_config(args.config.as_deref())?;
    let mut state = EditorState::new(config, args.count, args.ratio)
        .context("creating initial layout")?;

    let messages = match &args.script {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            parse_script(&text).with_context(|| format!("parsing {}", path.display()))?
        }
        None => Vec::new(),
    };
    let (width, height) = state.canvas_size();
    log::info!(
        "Layout: {} photos at {} on {}x{}, replaying {} messages",
        state.photo_count(),
        state.ratio(),
        width,
        height,
        messages.len()
    );

    let mut exported = Vec::new();
    let mut ignored = 0usize;
    for msg in messages {
        match handle_msg(&mut state, msg)? {
            Outcome::Applied => {}
            Outcome::Ignored => ignored += 1,
            Outcome::Exported(path) => exported.push(path),
        }
    }
    if ignored > 0 {
        log::warn!("{} messages were ignored", ignored);
    }

    if let Some(path) = &args.preview {
        let pixmap = state.render(1.0)?;
        save_rgba(&pixmap_to_rgba(&pixmap), path)?;
        log::info!(
            "Wrote preview to {} (selection {:?}, rotation {}, {} images)",
            path.display(),
            state.selection(),
            state.rotation(),
            state.library().len()
        );
    }

    if args.output.is_some() || exported.is_empty() {
        let export = EditorMsg::Export {
            path: args.output.clone(),
            density: args.density,
        };
        match handle_msg(&mut state, export)? {
            Outcome::Exported(path) => exported.push(path),
            _ => anyhow::bail!("final export rejected, density {:?}", args.density),
        }
    }
    Ok(exported)
}

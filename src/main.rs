use anyhow::{Context, Result};
use clap::Parser;
use std::fs;
use std::path::PathBuf;
use stitch_render::{render, Background, Pattern, RenderConfig};

#[derive(Parser)]
#[command(
    name = "stitch-render",
    about = "Render a parsed embroidery pattern (JSON) to a PNG preview"
)]
struct Cli {
    /// Pattern JSON produced by the format parser
    pattern: PathBuf,

    /// Output PNG path (defaults to the pattern path with a .png extension)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Render config JSON; flags below override its fields
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Canvas background: transparent, white or #RRGGBB
    #[arg(short, long)]
    background: Option<String>,

    /// Margin in pixels added around the design
    #[arg(short, long)]
    padding: Option<u32>,

    /// Stroke width in pixels
    #[arg(short = 'w', long)]
    stroke_width: Option<u32>,

    /// Refuse canvases with more pixels than this
    #[arg(long)]
    max_pixels: Option<u64>,

    /// Print render statistics as JSON on stdout
    #[arg(long)]
    stats: bool,
}

impl Cli {
    fn render_config(&self) -> Result<RenderConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let bytes = fs::read(path)
                    .with_context(|| format!("failed to read config {}", path.display()))?;
                RenderConfig::from_json(&bytes)
                    .with_context(|| format!("invalid config {}", path.display()))?
            }
            // Same look as the local preview tool: white, padded, hairline.
            None => RenderConfig::preview(),
        };

        if let Some(background) = &self.background {
            config.background = Background::parse(background)?;
        }
        if let Some(padding) = self.padding {
            config.padding = padding;
        }
        if let Some(stroke_width) = self.stroke_width {
            config.stroke_width = stroke_width;
        }
        if let Some(max_pixels) = self.max_pixels {
            config.max_canvas_pixels = max_pixels;
        }
        config.validate()?;
        Ok(config)
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();
    let config = cli.render_config()?;

    let bytes = fs::read(&cli.pattern)
        .with_context(|| format!("failed to read pattern {}", cli.pattern.display()))?;
    let pattern = Pattern::from_json(&bytes)
        .with_context(|| format!("failed to parse pattern {}", cli.pattern.display()))?;

    let rendering = match render(&pattern, &config) {
        Ok(rendering) => rendering,
        Err(err) => {
            log::error!("Render failed ({:?} error): {}", err.class(), err);
            return Err(err.into());
        }
    };

    let output = cli
        .output
        .clone()
        .unwrap_or_else(|| cli.pattern.with_extension("png"));
    fs::write(&output, rendering.to_png()?)
        .with_context(|| format!("failed to write {}", output.display()))?;
    log::info!("Preview written to {}", output.display());

    if cli.stats {
        println!("{}", serde_json::to_string_pretty(&rendering.stats)?);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use stitch_render::ThreadColor;

    fn cli(args: &[&str]) -> Cli {
        Cli::try_parse_from(["stitch-render", "design.json"].iter().chain(args).copied())
            .expect("arguments should parse")
    }

    #[test]
    fn flags_override_config_file_fields() {
        let path = std::env::temp_dir().join(format!(
            "stitch-render-config-{}.json",
            std::process::id()
        ));
        fs::write(
            &path,
            br#"{"background": "transparent", "padding": 12, "stroke_width": 3}"#,
        )
        .expect("temp config should be writable");

        let config = cli(&[
            "--config",
            path.to_str().expect("temp path is utf-8"),
            "--background",
            "#112233",
            "--stroke-width",
            "5",
        ])
        .render_config();
        fs::remove_file(&path).ok();
        let config = config.expect("config should load");

        assert_eq!(config.padding, 12);
        assert_eq!(config.stroke_width, 5);
        assert_eq!(
            config.background,
            Background::Color(ThreadColor::rgb(0x11, 0x22, 0x33))
        );
    }

    #[test]
    fn preview_preset_is_used_without_config_file() {
        let config = cli(&["--padding", "0", "--max-pixels", "500"])
            .render_config()
            .expect("preset config should be valid");
        assert_eq!(config.padding, 0);
        assert_eq!(config.max_canvas_pixels, 500);
        assert_eq!(config.stroke_width, 1);
        assert_eq!(config.background, Background::white());
    }

    #[test]
    fn invalid_overrides_are_rejected() {
        assert!(cli(&["--stroke-width", "0"]).render_config().is_err());
        assert!(cli(&["--background", "plaid"]).render_config().is_err());
    }
}

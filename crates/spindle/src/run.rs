use anyhow::{bail, Context, Result};
use frameclock::SystemFrameClock;
use renderer::gl::headless::HeadlessContext;
use renderer::{RenderParameters, RenderSession, RotationDriver, Scene};
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;

pub fn initialise_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

pub fn run(cli: Cli) -> Result<()> {
    let (width, height) = parse_size(&cli.size)?;
    let aspect_ratio = width as f32 / height as f32;

    let mut params = RenderParameters {
        wireframe: cli.wireframe,
        ..RenderParameters::default()
    };
    if let Some(color) = &cli.color {
        params.color = parse_color(color)?;
    }
    if let Some(degrees) = cli.rotate {
        params.rotation_degrees = degrees;
        params.rotation_driver = RotationDriver::Parameter;
    }

    let scene = Scene::from(cli.scene);
    let gl = HeadlessContext::new();
    let mut session = match RenderSession::initialize(&gl, scene, aspect_ratio) {
        Ok(session) => session,
        Err(err) => {
            // A failed build aborts startup; the frame loop is never
            // scheduled.
            tracing::error!(error = %err, "shader program build failed");
            std::process::exit(1);
        }
    };

    let mut clock = SystemFrameClock::new().with_target_fps(cli.fps);
    if cli.frames > 0 {
        clock = clock.with_frame_limit(cli.frames);
    }

    tracing::info!(
        ?scene,
        frames = cli.frames,
        fps = cli.fps,
        width,
        height,
        "starting frame loop"
    );
    let rendered = renderer::run(&gl, &mut session, &mut clock, || params);
    tracing::info!(
        frames = rendered,
        draw_calls = gl.draws().len(),
        "frame loop finished"
    );

    session.finish(&gl);
    Ok(())
}

fn parse_size(raw: &str) -> Result<(u32, u32)> {
    let lowered = raw.to_ascii_lowercase();
    let Some((width, height)) = lowered.split_once('x') else {
        bail!("size '{raw}' is not in WIDTHxHEIGHT form");
    };
    let width: u32 = width
        .trim()
        .parse()
        .with_context(|| format!("invalid width in '{raw}'"))?;
    let height: u32 = height
        .trim()
        .parse()
        .with_context(|| format!("invalid height in '{raw}'"))?;
    if width == 0 || height == 0 {
        bail!("size '{raw}' must have non-zero dimensions");
    }
    Ok((width, height))
}

fn parse_color(raw: &str) -> Result<[f32; 3]> {
    let parts: Vec<&str> = raw.split(',').map(str::trim).collect();
    if parts.len() != 3 {
        bail!("color '{raw}' is not in R,G,B form");
    }
    let mut rgb = [0.0f32; 3];
    for (slot, part) in rgb.iter_mut().zip(&parts) {
        let value: f32 = part
            .parse()
            .with_context(|| format!("invalid component '{part}' in color '{raw}'"))?;
        if !(0.0..=1.0).contains(&value) {
            bail!("color component '{part}' is outside 0..=1");
        }
        *slot = value;
    }
    Ok(rgb)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_well_formed_sizes() {
        assert_eq!(parse_size("1280x720").unwrap(), (1280, 720));
        assert_eq!(parse_size("1920X1080").unwrap(), (1920, 1080));
    }

    #[test]
    fn rejects_malformed_sizes() {
        assert!(parse_size("1280").is_err());
        assert!(parse_size("0x720").is_err());
        assert!(parse_size("widexhigh").is_err());
    }

    #[test]
    fn parses_well_formed_colors() {
        assert_eq!(parse_color("0.2, 0.4, 0.9").unwrap(), [0.2, 0.4, 0.9]);
        assert_eq!(parse_color("1,0,0").unwrap(), [1.0, 0.0, 0.0]);
    }

    #[test]
    fn rejects_malformed_colors() {
        assert!(parse_color("0.2,0.4").is_err());
        assert!(parse_color("0.2,0.4,red").is_err());
        assert!(parse_color("0.2,0.4,1.5").is_err());
    }
}

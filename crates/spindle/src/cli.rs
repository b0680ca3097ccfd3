use clap::{Parser, ValueEnum};
use renderer::Scene;

#[derive(Parser, Debug)]
#[command(
    name = "spindle",
    author,
    version,
    about = "Headless driver for the spindle shader demo scenes"
)]
pub struct Cli {
    /// Scene to render.
    #[arg(value_enum, default_value_t = SceneArg::Quad)]
    pub scene: SceneArg,

    /// Number of frames to render before exiting (0 = run until
    /// interrupted).
    #[arg(long, value_name = "COUNT", default_value_t = 120)]
    pub frames: u64,

    /// Target frames per second for the frame clock (0 = uncapped).
    #[arg(long, value_name = "FPS", default_value_t = 60.0)]
    pub fps: f32,

    /// Viewport size used for the projection aspect ratio (e.g. `1280x720`).
    #[arg(long, value_name = "WIDTHxHEIGHT", default_value = "1280x720")]
    pub size: String,

    /// Hold the rotation at a fixed angle instead of spinning with time.
    #[arg(long, value_name = "DEGREES")]
    pub rotate: Option<f32>,

    /// Cube tint as comma-separated RGB floats in 0..=1 (e.g. `0.2,0.4,0.9`).
    #[arg(long, value_name = "R,G,B")]
    pub color: Option<String>,

    /// Draw the cube as a wireframe outline instead of solid fill.
    #[arg(long)]
    pub wireframe: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneArg {
    /// Flat quad whose red channel pulses with elapsed time.
    Quad,
    /// Rotating cube tinted by `--color`.
    Cube,
}

impl From<SceneArg> for Scene {
    fn from(scene: SceneArg) -> Self {
        match scene {
            SceneArg::Quad => Scene::PulsingQuad,
            SceneArg::Cube => Scene::SpinningCube,
        }
    }
}

pub fn parse() -> Cli {
    Cli::parse()
}

//! Renderer crate for spindle.
//!
//! The crate turns a shader source pair and a static geometry set into a
//! running per-frame animation over an abstract graphics context. The
//! overall flow is:
//!
//! ```text
//!   CLI / embedding host
//!          │ Scene + RenderParameters
//!          ▼
//!   RenderSession::initialize ──▶ LinkedProgram::link ──▶ locations
//!          │                            (compile, checked link)
//!          ▼
//!   session::run ──▶ FrameClock ──▶ on_frame() ──▶ uniforms + one draw
//! ```
//!
//! [`gl::GlApi`] is the seam to the driver: the session renders identically
//! against the recording [`gl::headless::HeadlessContext`] (tests, the demo
//! binary) and a real OpenGL context through `glow` (hosts that own a
//! window; enabled by the default `glow` feature). The frame loop *pulls*
//! timestamps from a `frameclock::FrameClock`, so a test harness can drive
//! it with synthetic milliseconds and assert on every recorded draw.

mod error;
pub mod gl;
mod params;
mod program;
mod scene;
mod session;
mod timeline;

pub use error::{RenderError, ShaderStage};
pub use params::{RenderParameters, RotationDriver};
pub use program::{AnimatedLocation, LinkedProgram, ProgramLocations};
pub use scene::{AnimatedUniform, Geometry, Scene};
pub use session::{run, RenderSession};
pub use timeline::{FrameSample, FrameTimeline};

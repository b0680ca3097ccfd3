//! Render session: one-time GPU setup and the repeating per-frame step.

use frameclock::FrameClock;
use glam::{Mat4, Vec3};

use crate::error::RenderError;
use crate::gl::{BufferTarget, GlApi, Topology};
use crate::params::RenderParameters;
use crate::program::{AnimatedLocation, LinkedProgram};
use crate::scene::Scene;
use crate::timeline::FrameTimeline;

const FIELD_OF_VIEW_DEG: f32 = 45.0;
const NEAR_PLANE: f32 = 0.1;
const FAR_PLANE: f32 = 100.0;
/// Z offset pushing the model in front of the camera.
const MODEL_OFFSET_Z: f32 = -6.0;

/// A live render session: the linked program, the uploaded geometry, and
/// the frame time state, all exclusively owned.
///
/// Lifecycle: [`RenderSession::initialize`] once, [`RenderSession::on_frame`]
/// once per clock tick forever, [`RenderSession::finish`] when the host
/// tears down.
pub struct RenderSession<G: GlApi> {
    scene: Scene,
    program: LinkedProgram<G>,
    vertex_array: G::VertexArray,
    vertex_buffer: G::Buffer,
    index_buffer: Option<G::Buffer>,
    draw_count: i32,
    timeline: FrameTimeline,
    projection: Mat4,
}

impl<G: GlApi> RenderSession<G> {
    /// One-time setup: clear state, program build, geometry upload, and the
    /// single projection upload.
    ///
    /// A build failure aborts startup — no partial session exists afterwards
    /// and the frame loop must not be scheduled.
    pub fn initialize(gl: &G, scene: Scene, aspect_ratio: f32) -> Result<Self, RenderError> {
        gl.clear_color(0.0, 0.0, 0.0, 1.0);
        gl.clear_depth(1.0);
        gl.enable_depth_test();

        let program = LinkedProgram::link(gl, scene)?;
        let geometry = scene.geometry();

        let vertex_array = gl
            .create_vertex_array()
            .map_err(|detail| RenderError::CreateResource {
                kind: "vertex array",
                detail,
            })?;
        gl.bind_vertex_array(Some(vertex_array));

        let vertex_buffer = gl
            .create_buffer()
            .map_err(|detail| RenderError::CreateResource {
                kind: "vertex buffer",
                detail,
            })?;
        gl.bind_buffer(BufferTarget::Array, Some(vertex_buffer));
        gl.buffer_data_static(BufferTarget::Array, bytemuck::cast_slice(geometry.positions));

        // Pointer and enable both use the location resolved at link time;
        // no attribute is addressed by name past this point.
        let position = program.locations().position;
        gl.vertex_attrib_pointer_f32(position, geometry.components);
        gl.enable_vertex_attrib_array(position);

        let index_buffer = match geometry.indices {
            Some(indices) => {
                let buffer = gl
                    .create_buffer()
                    .map_err(|detail| RenderError::CreateResource {
                        kind: "index buffer",
                        detail,
                    })?;
                gl.bind_buffer(BufferTarget::ElementArray, Some(buffer));
                gl.buffer_data_static(BufferTarget::ElementArray, bytemuck::cast_slice(indices));
                Some(buffer)
            }
            None => None,
        };

        let projection = Mat4::perspective_rh_gl(
            FIELD_OF_VIEW_DEG.to_radians(),
            aspect_ratio,
            NEAR_PLANE,
            FAR_PLANE,
        );
        gl.use_program(Some(program.handle()));
        gl.uniform_matrix_4_f32(&program.locations().projection, &projection.to_cols_array());

        tracing::debug!(?scene, aspect_ratio, "render session initialized");

        Ok(Self {
            scene,
            program,
            vertex_array,
            vertex_buffer,
            index_buffer,
            draw_count: geometry.draw_count(),
            timeline: FrameTimeline::new(),
            projection,
        })
    }

    /// Per-frame step: derive the frame's time sample, rebuild the
    /// model-view transform, upload the animated uniform, clear, and issue
    /// exactly one draw call.
    pub fn on_frame(&mut self, gl: &G, timestamp_ms: f64, params: &RenderParameters) {
        let sample = self.timeline.advance(timestamp_ms);
        let angle = params.rotation_angle(sample.seconds);
        let model_view = Mat4::from_translation(Vec3::new(0.0, 0.0, MODEL_OFFSET_Z))
            * Mat4::from_rotation_y(angle);

        gl.use_program(Some(self.program.handle()));
        let locations = self.program.locations();
        gl.uniform_matrix_4_f32(&locations.model_view, &model_view.to_cols_array());
        match &locations.animated {
            AnimatedLocation::ElapsedSeconds(location) => {
                gl.uniform_1_f32(location, sample.elapsed as f32);
            }
            AnimatedLocation::Rgb(location) => {
                gl.uniform_3_f32(location, params.color[0], params.color[1], params.color[2]);
            }
        }

        gl.clear(true, true);
        gl.bind_vertex_array(Some(self.vertex_array));
        let topology = self.topology(params);
        match self.index_buffer {
            Some(_) => gl.draw_elements_u32(topology, self.draw_count),
            None => gl.draw_arrays(topology, 0, self.draw_count),
        }

        tracing::trace!(
            seconds = sample.seconds,
            elapsed = sample.elapsed,
            angle,
            ?topology,
            "frame drawn"
        );
    }

    /// Releases every GPU resource the session owns.
    ///
    /// Hosts whose context dies with the process can get away without this;
    /// every other embedding should call it once the loop ends.
    pub fn finish(self, gl: &G) {
        gl.bind_vertex_array(None);
        gl.use_program(None);
        if let Some(buffer) = self.index_buffer {
            gl.delete_buffer(buffer);
        }
        gl.delete_buffer(self.vertex_buffer);
        gl.delete_vertex_array(self.vertex_array);
        gl.delete_program(self.program.handle());
    }

    pub fn scene(&self) -> Scene {
        self.scene
    }

    /// Projection matrix computed at setup; constant for the session's
    /// lifetime even as the model-view changes every frame.
    pub fn projection(&self) -> Mat4 {
        self.projection
    }

    /// Wireframe only applies to indexed scenes; the quad always draws as a
    /// solid strip.
    fn topology(&self, params: &RenderParameters) -> Topology {
        if self.index_buffer.is_some() && params.wireframe {
            Topology::LineStrip
        } else {
            Topology::TriangleStrip
        }
    }
}

/// Drives `session` with timestamps pulled from `clock` until the clock
/// ends, re-reading the caller's parameters before every frame. Returns the
/// number of frames rendered.
pub fn run<G, C, P>(gl: &G, session: &mut RenderSession<G>, clock: &mut C, mut params: P) -> u64
where
    G: GlApi,
    C: FrameClock,
    P: FnMut() -> RenderParameters,
{
    let mut frames = 0;
    while let Some(timestamp_ms) = clock.next_frame() {
        session.on_frame(gl, timestamp_ms, &params());
        frames += 1;
    }
    frames
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gl::headless::HeadlessContext;

    #[test]
    fn wireframe_toggle_only_affects_indexed_scenes() {
        let gl = HeadlessContext::new();
        let quad = RenderSession::initialize(&gl, Scene::PulsingQuad, 1.0).unwrap();
        let cube = RenderSession::initialize(&gl, Scene::SpinningCube, 1.0).unwrap();
        let wireframe = RenderParameters {
            wireframe: true,
            ..RenderParameters::default()
        };
        assert_eq!(quad.topology(&wireframe), Topology::TriangleStrip);
        assert_eq!(cube.topology(&wireframe), Topology::LineStrip);
        assert_eq!(
            cube.topology(&RenderParameters::default()),
            Topology::TriangleStrip
        );
    }

    #[test]
    fn setup_configures_clear_and_depth_state() {
        let gl = HeadlessContext::new();
        let _session = RenderSession::initialize(&gl, Scene::PulsingQuad, 1.0).unwrap();
        assert_eq!(gl.clear_rgba(), [0.0, 0.0, 0.0, 1.0]);
        assert_eq!(gl.clear_depth_setting(), 1.0);
        assert!(gl.depth_test_enabled());
    }

    #[test]
    fn finish_releases_every_owned_resource() {
        let gl = HeadlessContext::new();
        let session = RenderSession::initialize(&gl, Scene::SpinningCube, 1.0).unwrap();
        assert_eq!(gl.live_programs(), 1);
        assert_eq!(gl.live_buffers(), 2);
        assert_eq!(gl.live_vertex_arrays(), 1);
        session.finish(&gl);
        assert_eq!(gl.live_programs(), 0);
        assert_eq!(gl.live_buffers(), 0);
        assert_eq!(gl.live_vertex_arrays(), 0);
    }
}

//! Built-in demo scenes: shader sources, geometry, and the per-scene
//! animated uniform.
//!
//! Both scenes share one vertex shader; they differ in the fragment stage
//! and in what the renderer feeds it every frame — the pulsing quad receives
//! elapsed seconds and computes its own red channel, the cube receives an
//! RGB color owned by the caller.

/// Vertex shader shared by both scenes.
const SHARED_VERTEX: &str = r"attribute vec4 aPos;

uniform mat4 modelView;
uniform mat4 projection;

void main()
{
    gl_Position = projection * modelView * aPos;
}";

/// Fragment shader for the quad: red channel pulses with elapsed time.
const PULSE_FRAGMENT: &str = r"precision mediump float;
uniform float time;
void main()
{
    gl_FragColor = vec4((sin(time) + 1.0) / 2.0, 0.0, 0.0, 1.0);
}";

/// Fragment shader for the cube: flat caller-supplied color.
const COLOR_FRAGMENT: &str = r"precision mediump float;
uniform vec3 color;
void main()
{
    gl_FragColor = vec4(color, 1.0);
}";

/// Two triangles covering a 2x2 quad, drawn as a 6-vertex strip.
const QUAD_POSITIONS: [f32; 12] = [
    -1.0, -1.0, //
    1.0, -1.0, //
    1.0, 1.0, //
    1.0, 1.0, //
    -1.0, 1.0, //
    -1.0, -1.0, //
];

/// Cube corners; faces are assembled by the index buffer.
const CUBE_POSITIONS: [f32; 24] = [
    -1.0, -1.0, 1.0, //
    1.0, -1.0, 1.0, //
    1.0, 1.0, 1.0, //
    -1.0, 1.0, 1.0, //
    -1.0, -1.0, -1.0, //
    1.0, -1.0, -1.0, //
    1.0, 1.0, -1.0, //
    -1.0, 1.0, -1.0, //
];

/// Six faces, two triangles each, 36 indices.
const CUBE_INDICES: [u32; 36] = [
    0, 1, 2, 0, 2, 3, // front
    1, 5, 6, 1, 6, 2, // right
    5, 4, 7, 5, 7, 6, // back
    4, 0, 3, 4, 3, 7, // left
    3, 2, 6, 3, 6, 7, // top
    4, 5, 1, 4, 1, 0, // bottom
];

/// Static vertex data for one scene: positions plus optional indices.
///
/// Uploaded once at session setup with static-draw usage and immutable
/// thereafter.
#[derive(Debug, Clone, Copy)]
pub struct Geometry {
    /// Flat position coordinates, `components` floats per vertex.
    pub positions: &'static [f32],
    /// Components per vertex position: 2 for the quad, 3 for the cube.
    pub components: i32,
    /// Index sequence for indexed scenes, unsigned 32-bit elements.
    pub indices: Option<&'static [u32]>,
}

impl Geometry {
    /// Number of elements a draw call covers: indices when present,
    /// vertices otherwise.
    pub fn draw_count(&self) -> i32 {
        match self.indices {
            Some(indices) => indices.len() as i32,
            None => self.positions.len() as i32 / self.components,
        }
    }
}

/// What the scene's animated uniform carries each frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimatedUniform {
    /// Seconds since the first frame, as a single float.
    ElapsedSeconds,
    /// Caller-supplied RGB color.
    Rgb,
}

/// Built-in demo scenes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scene {
    /// Flat quad whose red channel pulses with elapsed time.
    PulsingQuad,
    /// Indexed cube tinted by a caller-supplied color, solid or wireframe.
    SpinningCube,
}

impl Scene {
    pub fn vertex_shader(&self) -> &'static str {
        SHARED_VERTEX
    }

    pub fn fragment_shader(&self) -> &'static str {
        match self {
            Scene::PulsingQuad => PULSE_FRAGMENT,
            Scene::SpinningCube => COLOR_FRAGMENT,
        }
    }

    pub fn geometry(&self) -> Geometry {
        match self {
            Scene::PulsingQuad => Geometry {
                positions: &QUAD_POSITIONS,
                components: 2,
                indices: None,
            },
            Scene::SpinningCube => Geometry {
                positions: &CUBE_POSITIONS,
                components: 3,
                indices: Some(&CUBE_INDICES),
            },
        }
    }

    pub fn animated_uniform(&self) -> AnimatedUniform {
        match self {
            Scene::PulsingQuad => AnimatedUniform::ElapsedSeconds,
            Scene::SpinningCube => AnimatedUniform::Rgb,
        }
    }

    /// Name of the animated uniform in the fragment source.
    pub fn animated_uniform_name(&self) -> &'static str {
        match self.animated_uniform() {
            AnimatedUniform::ElapsedSeconds => "time",
            AnimatedUniform::Rgb => "color",
        }
    }
}

/// Name of the position attribute in the shared vertex shader.
pub const POSITION_ATTRIBUTE: &str = "aPos";
/// Name of the projection matrix uniform.
pub const PROJECTION_UNIFORM: &str = "projection";
/// Name of the model-view matrix uniform.
pub const MODEL_VIEW_UNIFORM: &str = "modelView";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quad_is_six_unindexed_2d_vertices() {
        let geometry = Scene::PulsingQuad.geometry();
        assert_eq!(geometry.components, 2);
        assert!(geometry.indices.is_none());
        assert_eq!(geometry.draw_count(), 6);
    }

    #[test]
    fn cube_is_eight_vertices_and_36_indices() {
        let geometry = Scene::SpinningCube.geometry();
        assert_eq!(geometry.components, 3);
        assert_eq!(geometry.positions.len(), 24);
        assert_eq!(geometry.draw_count(), 36);
        let indices = geometry.indices.unwrap();
        assert!(indices.iter().all(|index| *index < 8));
    }

    #[test]
    fn fragment_sources_declare_their_animated_uniform() {
        for scene in [Scene::PulsingQuad, Scene::SpinningCube] {
            let source = scene.fragment_shader();
            let name = scene.animated_uniform_name();
            assert!(
                source.contains(&format!("uniform float {name}"))
                    || source.contains(&format!("uniform vec3 {name}")),
                "scene {scene:?} does not declare '{name}'"
            );
        }
    }
}

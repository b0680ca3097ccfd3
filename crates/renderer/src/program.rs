//! Shader program build: stage compilation, checked linking, one-time
//! location resolution.

use crate::error::{RenderError, ShaderStage};
use crate::gl::GlApi;
use crate::scene::{
    AnimatedUniform, Scene, MODEL_VIEW_UNIFORM, POSITION_ATTRIBUTE, PROJECTION_UNIFORM,
};

/// Location of the scene's animated uniform, tagged with what it carries.
pub enum AnimatedLocation<G: GlApi> {
    ElapsedSeconds(G::UniformLocation),
    Rgb(G::UniformLocation),
}

impl<G: GlApi> std::fmt::Debug for AnimatedLocation<G> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AnimatedLocation::ElapsedSeconds(location) => f
                .debug_tuple("ElapsedSeconds")
                .field(location)
                .finish(),
            AnimatedLocation::Rgb(location) => {
                f.debug_tuple("Rgb").field(location).finish()
            }
        }
    }
}

/// Attribute and uniform locations, resolved once after linking and cached
/// for the program's lifetime. No string lookups happen on the frame path.
pub struct ProgramLocations<G: GlApi> {
    pub position: u32,
    pub projection: G::UniformLocation,
    pub model_view: G::UniformLocation,
    pub animated: AnimatedLocation<G>,
}

impl<G: GlApi> std::fmt::Debug for ProgramLocations<G> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProgramLocations")
            .field("position", &self.position)
            .field("projection", &self.projection)
            .field("model_view", &self.model_view)
            .field("animated", &self.animated)
            .finish()
    }
}

/// A linked shader program plus its cached locations.
pub struct LinkedProgram<G: GlApi> {
    handle: G::Program,
    locations: ProgramLocations<G>,
}

impl<G: GlApi> LinkedProgram<G> {
    /// Builds the program for `scene`: compiles both stages, links with a
    /// status check, and resolves every location the renderer needs,
    /// failing fast when a name is absent.
    pub fn link(gl: &G, scene: Scene) -> Result<Self, RenderError> {
        let handle = link_program(gl, scene.vertex_shader(), scene.fragment_shader())?;
        let locations = match resolve_locations(gl, handle, scene) {
            Ok(locations) => locations,
            Err(err) => {
                gl.delete_program(handle);
                return Err(err);
            }
        };
        Ok(Self { handle, locations })
    }

    pub fn handle(&self) -> G::Program {
        self.handle
    }

    pub fn locations(&self) -> &ProgramLocations<G> {
        &self.locations
    }
}

/// Compiles both stages and links them, checking compile and link status.
///
/// The fragment stage is never compiled when the vertex stage fails, and
/// stage objects are deleted as soon as linking has happened, success or
/// not — the program holds everything it needs from them.
pub fn link_program<G: GlApi>(
    gl: &G,
    vertex_source: &str,
    fragment_source: &str,
) -> Result<G::Program, RenderError> {
    let vertex = compile_stage(gl, ShaderStage::Vertex, vertex_source)?;
    let fragment = match compile_stage(gl, ShaderStage::Fragment, fragment_source) {
        Ok(fragment) => fragment,
        Err(err) => {
            gl.delete_shader(vertex);
            return Err(err);
        }
    };

    let program = match gl.create_program() {
        Ok(program) => program,
        Err(detail) => {
            gl.delete_shader(vertex);
            gl.delete_shader(fragment);
            return Err(RenderError::CreateResource {
                kind: "shader program",
                detail,
            });
        }
    };
    gl.attach_shader(program, vertex);
    gl.attach_shader(program, fragment);
    gl.link_program(program);
    gl.delete_shader(vertex);
    gl.delete_shader(fragment);

    if !gl.program_link_status(program) {
        let log = gl.program_info_log(program);
        gl.delete_program(program);
        return Err(RenderError::LinkProgram { log });
    }

    tracing::debug!("shader program linked");
    Ok(program)
}

fn compile_stage<G: GlApi>(
    gl: &G,
    stage: ShaderStage,
    source: &str,
) -> Result<G::Shader, RenderError> {
    let shader = gl
        .create_shader(stage)
        .map_err(|detail| RenderError::CreateResource {
            kind: "shader object",
            detail,
        })?;
    gl.shader_source(shader, source);
    gl.compile_shader(shader);
    if !gl.shader_compile_status(shader) {
        let log = gl.shader_info_log(shader);
        gl.delete_shader(shader);
        return Err(RenderError::CompileShader { stage, log });
    }
    Ok(shader)
}

fn resolve_locations<G: GlApi>(
    gl: &G,
    program: G::Program,
    scene: Scene,
) -> Result<ProgramLocations<G>, RenderError> {
    let position = gl
        .attrib_location(program, POSITION_ATTRIBUTE)
        .ok_or(RenderError::MissingAttribute {
            name: POSITION_ATTRIBUTE,
        })?;
    let projection = require_uniform(gl, program, PROJECTION_UNIFORM)?;
    let model_view = require_uniform(gl, program, MODEL_VIEW_UNIFORM)?;
    let animated_location = require_uniform(gl, program, scene.animated_uniform_name())?;
    let animated = match scene.animated_uniform() {
        AnimatedUniform::ElapsedSeconds => AnimatedLocation::ElapsedSeconds(animated_location),
        AnimatedUniform::Rgb => AnimatedLocation::Rgb(animated_location),
    };
    Ok(ProgramLocations {
        position,
        projection,
        model_view,
        animated,
    })
}

fn require_uniform<G: GlApi>(
    gl: &G,
    program: G::Program,
    name: &'static str,
) -> Result<G::UniformLocation, RenderError> {
    gl.uniform_location(program, name)
        .ok_or(RenderError::MissingUniform { name })
}

//! Capability interface onto the graphics driver.
//!
//! The demo core never calls a concrete GL binding directly; everything it
//! needs from the driver — shader objects, program linking, static buffers,
//! uniform uploads, clears, draws — is a method on [`GlApi`]. Two backends
//! implement it: [`headless::HeadlessContext`] records every operation so the
//! render loop can run and be inspected without a display surface, and (with
//! the default `glow` feature) a real OpenGL/WebGL context via
//! [`glow::Context`], for hosts that own a window and a loaded function
//! table.

use std::fmt;

use crate::error::ShaderStage;

pub mod headless;

#[cfg(feature = "glow")]
mod glow_context;

/// Buffer binding points used by the demo scenes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BufferTarget {
    /// Vertex attribute data (`ARRAY_BUFFER`).
    Array,
    /// Index data (`ELEMENT_ARRAY_BUFFER`).
    ElementArray,
}

/// Primitive interpretation for a draw call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Topology {
    TriangleStrip,
    LineStrip,
}

/// Operations the render session requires from a graphics context.
///
/// The surface is deliberately narrow: exactly what a one-program,
/// one-geometry, one-draw-per-frame demo touches. Creation methods return
/// `Err` with the driver's reason when the context refuses to allocate;
/// everything else mirrors the fire-and-forget style of the underlying API.
pub trait GlApi {
    type Shader: Copy + Eq + fmt::Debug;
    type Program: Copy + Eq + fmt::Debug;
    type Buffer: Copy + Eq + fmt::Debug;
    type VertexArray: Copy + Eq + fmt::Debug;
    type UniformLocation: Clone + fmt::Debug;

    fn create_shader(&self, stage: ShaderStage) -> Result<Self::Shader, String>;
    fn shader_source(&self, shader: Self::Shader, source: &str);
    fn compile_shader(&self, shader: Self::Shader);
    fn shader_compile_status(&self, shader: Self::Shader) -> bool;
    fn shader_info_log(&self, shader: Self::Shader) -> String;
    fn delete_shader(&self, shader: Self::Shader);

    fn create_program(&self) -> Result<Self::Program, String>;
    fn attach_shader(&self, program: Self::Program, shader: Self::Shader);
    fn link_program(&self, program: Self::Program);
    fn program_link_status(&self, program: Self::Program) -> bool;
    fn program_info_log(&self, program: Self::Program) -> String;
    fn use_program(&self, program: Option<Self::Program>);
    fn delete_program(&self, program: Self::Program);

    /// Location of a named vertex attribute, `None` when the linked program
    /// does not declare it.
    fn attrib_location(&self, program: Self::Program, name: &str) -> Option<u32>;
    /// Location of a named uniform, `None` when the linked program does not
    /// declare it.
    fn uniform_location(&self, program: Self::Program, name: &str)
        -> Option<Self::UniformLocation>;

    fn create_buffer(&self) -> Result<Self::Buffer, String>;
    fn bind_buffer(&self, target: BufferTarget, buffer: Option<Self::Buffer>);
    /// Uploads `data` to the buffer bound at `target` with static-draw
    /// usage. Scene geometry is written once and never rewritten.
    fn buffer_data_static(&self, target: BufferTarget, data: &[u8]);
    fn delete_buffer(&self, buffer: Self::Buffer);

    fn create_vertex_array(&self) -> Result<Self::VertexArray, String>;
    fn bind_vertex_array(&self, array: Option<Self::VertexArray>);
    fn delete_vertex_array(&self, array: Self::VertexArray);

    fn enable_vertex_attrib_array(&self, location: u32);
    /// Declares tightly packed float data for the attribute at `location`,
    /// `size` components per vertex, read from the bound array buffer.
    fn vertex_attrib_pointer_f32(&self, location: u32, size: i32);

    fn uniform_1_f32(&self, location: &Self::UniformLocation, value: f32);
    fn uniform_3_f32(&self, location: &Self::UniformLocation, x: f32, y: f32, z: f32);
    /// Uploads a column-major 4x4 matrix.
    fn uniform_matrix_4_f32(&self, location: &Self::UniformLocation, matrix: &[f32; 16]);

    fn clear_color(&self, red: f32, green: f32, blue: f32, alpha: f32);
    fn clear_depth(&self, depth: f64);
    /// Enables depth testing with a less-or-equal compare.
    fn enable_depth_test(&self);
    fn clear(&self, color: bool, depth: bool);

    fn draw_arrays(&self, topology: Topology, first: i32, count: i32);
    /// Indexed draw over `count` unsigned 32-bit indices from the bound
    /// element buffer.
    fn draw_elements_u32(&self, topology: Topology, count: i32);
}

//! Recording [`GlApi`] backend with no display surface behind it.
//!
//! Every resource, upload, and draw call is captured so the demo binary and
//! the test suite can observe exactly what the render loop asked of the
//! driver. Compilation is approximated: a shader compiles when its source
//! carries a `void main` entry point, and linking captures the attribute and
//! uniform declarations of the attached sources so location queries answer
//! for precisely the names present in the source text.

use std::cell::RefCell;
use std::collections::HashMap;

use crate::error::ShaderStage;

use super::{BufferTarget, GlApi, Topology};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShaderId(u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProgramId(u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BufferId(u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VertexArrayId(u32);

/// Uniform location handle: the declared name, resolved at link time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UniformSlot(String);

/// Uniform value captured by the recorder.
#[derive(Debug, Clone, PartialEq)]
pub enum UniformValue {
    Float(f32),
    Vec3([f32; 3]),
    Mat4([f32; 16]),
}

/// One recorded draw call.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawCall {
    pub topology: Topology,
    pub count: i32,
    pub indexed: bool,
}

/// One recorded static buffer upload.
#[derive(Debug, Clone, PartialEq)]
pub struct BufferUpload {
    pub target: BufferTarget,
    pub data: Vec<u8>,
}

struct ShaderRecord {
    stage: ShaderStage,
    source: String,
    compiled: bool,
}

struct ProgramRecord {
    attached: Vec<ShaderId>,
    linked: bool,
    attributes: Vec<String>,
    uniforms: Vec<String>,
}

#[derive(Default)]
struct State {
    next_id: u32,
    shaders: HashMap<ShaderId, ShaderRecord>,
    programs: HashMap<ProgramId, ProgramRecord>,
    buffers: HashMap<BufferId, Vec<u8>>,
    vertex_arrays: Vec<VertexArrayId>,
    bound_array: Option<BufferId>,
    bound_element: Option<BufferId>,
    enabled_attribs: Vec<u32>,
    attrib_pointers: Vec<(u32, i32)>,
    uniform_uploads: Vec<(String, UniformValue)>,
    buffer_uploads: Vec<BufferUpload>,
    draws: Vec<DrawCall>,
    clear_count: u32,
    clear_rgba: [f32; 4],
    clear_depth: f64,
    depth_test: bool,
}

/// Headless recording context.
///
/// Interior mutability keeps the [`GlApi`] methods `&self`, matching the
/// shape of a real shared GL context.
#[derive(Default)]
pub struct HeadlessContext {
    state: RefCell<State>,
}

impl HeadlessContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn draws(&self) -> Vec<DrawCall> {
        self.state.borrow().draws.clone()
    }

    pub fn buffer_uploads(&self) -> Vec<BufferUpload> {
        self.state.borrow().buffer_uploads.clone()
    }

    /// Values uploaded to the named uniform, oldest first.
    pub fn uniform_uploads(&self, name: &str) -> Vec<UniformValue> {
        self.state
            .borrow()
            .uniform_uploads
            .iter()
            .filter(|(slot, _)| slot == name)
            .map(|(_, value)| value.clone())
            .collect()
    }

    /// Attribute indices enabled via `enable_vertex_attrib_array`.
    pub fn enabled_attribs(&self) -> Vec<u32> {
        self.state.borrow().enabled_attribs.clone()
    }

    /// `(location, components)` pairs declared via `vertex_attrib_pointer`.
    pub fn attrib_pointers(&self) -> Vec<(u32, i32)> {
        self.state.borrow().attrib_pointers.clone()
    }

    pub fn live_shaders(&self) -> usize {
        self.state.borrow().shaders.len()
    }

    pub fn live_programs(&self) -> usize {
        self.state.borrow().programs.len()
    }

    pub fn live_buffers(&self) -> usize {
        self.state.borrow().buffers.len()
    }

    pub fn live_vertex_arrays(&self) -> usize {
        self.state.borrow().vertex_arrays.len()
    }

    pub fn clear_count(&self) -> u32 {
        self.state.borrow().clear_count
    }

    pub fn clear_rgba(&self) -> [f32; 4] {
        self.state.borrow().clear_rgba
    }

    pub fn clear_depth_setting(&self) -> f64 {
        self.state.borrow().clear_depth
    }

    pub fn depth_test_enabled(&self) -> bool {
        self.state.borrow().depth_test
    }
}

impl State {
    fn allocate(&mut self) -> u32 {
        self.next_id += 1;
        self.next_id
    }
}

/// Collects the names declared after `keyword` ("attribute"/"uniform"/"in"),
/// in source order. Good enough for the embedded demo shaders; a real driver
/// does this for us.
fn scan_declarations(source: &str, keyword: &str) -> Vec<String> {
    let mut names = Vec::new();
    for line in source.lines() {
        let trimmed = line.trim();
        let Some(rest) = trimmed.strip_prefix(keyword) else {
            continue;
        };
        if !rest.starts_with(char::is_whitespace) {
            continue;
        }
        // "vec4 aPos;" — the identifier follows the type token.
        if let Some(name) = rest.split_whitespace().nth(1) {
            let name = name.trim_end_matches(';');
            if !name.is_empty() {
                names.push(name.to_string());
            }
        }
    }
    names
}

impl GlApi for HeadlessContext {
    type Shader = ShaderId;
    type Program = ProgramId;
    type Buffer = BufferId;
    type VertexArray = VertexArrayId;
    type UniformLocation = UniformSlot;

    fn create_shader(&self, stage: ShaderStage) -> Result<Self::Shader, String> {
        let mut state = self.state.borrow_mut();
        let id = ShaderId(state.allocate());
        state.shaders.insert(
            id,
            ShaderRecord {
                stage,
                source: String::new(),
                compiled: false,
            },
        );
        Ok(id)
    }

    fn shader_source(&self, shader: Self::Shader, source: &str) {
        if let Some(record) = self.state.borrow_mut().shaders.get_mut(&shader) {
            record.source = source.to_string();
        }
    }

    fn compile_shader(&self, shader: Self::Shader) {
        if let Some(record) = self.state.borrow_mut().shaders.get_mut(&shader) {
            record.compiled = record.source.contains("void main");
        }
    }

    fn shader_compile_status(&self, shader: Self::Shader) -> bool {
        self.state
            .borrow()
            .shaders
            .get(&shader)
            .is_some_and(|record| record.compiled)
    }

    fn shader_info_log(&self, shader: Self::Shader) -> String {
        match self.state.borrow().shaders.get(&shader) {
            Some(record) if !record.compiled => {
                "no 'void main' entry point found".to_string()
            }
            _ => String::new(),
        }
    }

    fn delete_shader(&self, shader: Self::Shader) {
        self.state.borrow_mut().shaders.remove(&shader);
    }

    fn create_program(&self) -> Result<Self::Program, String> {
        let mut state = self.state.borrow_mut();
        let id = ProgramId(state.allocate());
        state.programs.insert(
            id,
            ProgramRecord {
                attached: Vec::new(),
                linked: false,
                attributes: Vec::new(),
                uniforms: Vec::new(),
            },
        );
        Ok(id)
    }

    fn attach_shader(&self, program: Self::Program, shader: Self::Shader) {
        if let Some(record) = self.state.borrow_mut().programs.get_mut(&program) {
            record.attached.push(shader);
        }
    }

    fn link_program(&self, program: Self::Program) {
        let mut state = self.state.borrow_mut();
        let Some(record) = state.programs.get(&program) else {
            return;
        };

        let mut vertex_source = None;
        let mut fragment_source = None;
        for id in &record.attached {
            match state.shaders.get(id) {
                Some(shader) if shader.compiled => match shader.stage {
                    ShaderStage::Vertex => vertex_source = Some(shader.source.clone()),
                    ShaderStage::Fragment => fragment_source = Some(shader.source.clone()),
                },
                _ => {}
            }
        }

        let (linked, attributes, uniforms) = match (vertex_source, fragment_source) {
            (Some(vertex), Some(fragment)) => {
                let mut attributes = scan_declarations(&vertex, "attribute");
                attributes.extend(scan_declarations(&vertex, "in"));
                let mut uniforms = scan_declarations(&vertex, "uniform");
                uniforms.extend(scan_declarations(&fragment, "uniform"));
                (true, attributes, uniforms)
            }
            _ => (false, Vec::new(), Vec::new()),
        };

        let record = state.programs.get_mut(&program).unwrap();
        record.linked = linked;
        record.attributes = attributes;
        record.uniforms = uniforms;
    }

    fn program_link_status(&self, program: Self::Program) -> bool {
        self.state
            .borrow()
            .programs
            .get(&program)
            .is_some_and(|record| record.linked)
    }

    fn program_info_log(&self, program: Self::Program) -> String {
        match self.state.borrow().programs.get(&program) {
            Some(record) if !record.linked => {
                "program needs one compiled vertex and one compiled fragment shader".to_string()
            }
            _ => String::new(),
        }
    }

    fn use_program(&self, _program: Option<Self::Program>) {}

    fn delete_program(&self, program: Self::Program) {
        self.state.borrow_mut().programs.remove(&program);
    }

    fn attrib_location(&self, program: Self::Program, name: &str) -> Option<u32> {
        self.state
            .borrow()
            .programs
            .get(&program)
            .filter(|record| record.linked)
            .and_then(|record| record.attributes.iter().position(|attr| attr == name))
            .map(|index| index as u32)
    }

    fn uniform_location(
        &self,
        program: Self::Program,
        name: &str,
    ) -> Option<Self::UniformLocation> {
        self.state
            .borrow()
            .programs
            .get(&program)
            .filter(|record| record.linked)
            .and_then(|record| record.uniforms.iter().find(|uniform| *uniform == name))
            .map(|uniform| UniformSlot(uniform.clone()))
    }

    fn create_buffer(&self) -> Result<Self::Buffer, String> {
        let mut state = self.state.borrow_mut();
        let id = BufferId(state.allocate());
        state.buffers.insert(id, Vec::new());
        Ok(id)
    }

    fn bind_buffer(&self, target: BufferTarget, buffer: Option<Self::Buffer>) {
        let mut state = self.state.borrow_mut();
        match target {
            BufferTarget::Array => state.bound_array = buffer,
            BufferTarget::ElementArray => state.bound_element = buffer,
        }
    }

    fn buffer_data_static(&self, target: BufferTarget, data: &[u8]) {
        let mut state = self.state.borrow_mut();
        let bound = match target {
            BufferTarget::Array => state.bound_array,
            BufferTarget::ElementArray => state.bound_element,
        };
        if let Some(id) = bound {
            if let Some(contents) = state.buffers.get_mut(&id) {
                *contents = data.to_vec();
            }
        }
        state.buffer_uploads.push(BufferUpload {
            target,
            data: data.to_vec(),
        });
    }

    fn delete_buffer(&self, buffer: Self::Buffer) {
        self.state.borrow_mut().buffers.remove(&buffer);
    }

    fn create_vertex_array(&self) -> Result<Self::VertexArray, String> {
        let mut state = self.state.borrow_mut();
        let id = VertexArrayId(state.allocate());
        state.vertex_arrays.push(id);
        Ok(id)
    }

    fn bind_vertex_array(&self, _array: Option<Self::VertexArray>) {}

    fn delete_vertex_array(&self, array: Self::VertexArray) {
        self.state
            .borrow_mut()
            .vertex_arrays
            .retain(|live| *live != array);
    }

    fn enable_vertex_attrib_array(&self, location: u32) {
        self.state.borrow_mut().enabled_attribs.push(location);
    }

    fn vertex_attrib_pointer_f32(&self, location: u32, size: i32) {
        self.state.borrow_mut().attrib_pointers.push((location, size));
    }

    fn uniform_1_f32(&self, location: &Self::UniformLocation, value: f32) {
        self.state
            .borrow_mut()
            .uniform_uploads
            .push((location.0.clone(), UniformValue::Float(value)));
    }

    fn uniform_3_f32(&self, location: &Self::UniformLocation, x: f32, y: f32, z: f32) {
        self.state
            .borrow_mut()
            .uniform_uploads
            .push((location.0.clone(), UniformValue::Vec3([x, y, z])));
    }

    fn uniform_matrix_4_f32(&self, location: &Self::UniformLocation, matrix: &[f32; 16]) {
        self.state
            .borrow_mut()
            .uniform_uploads
            .push((location.0.clone(), UniformValue::Mat4(*matrix)));
    }

    fn clear_color(&self, red: f32, green: f32, blue: f32, alpha: f32) {
        self.state.borrow_mut().clear_rgba = [red, green, blue, alpha];
    }

    fn clear_depth(&self, depth: f64) {
        self.state.borrow_mut().clear_depth = depth;
    }

    fn enable_depth_test(&self) {
        self.state.borrow_mut().depth_test = true;
    }

    fn clear(&self, _color: bool, _depth: bool) {
        self.state.borrow_mut().clear_count += 1;
    }

    fn draw_arrays(&self, topology: Topology, _first: i32, count: i32) {
        self.state.borrow_mut().draws.push(DrawCall {
            topology,
            count,
            indexed: false,
        });
    }

    fn draw_elements_u32(&self, topology: Topology, count: i32) {
        self.state.borrow_mut().draws.push(DrawCall {
            topology,
            count,
            indexed: true,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VERTEX: &str = "attribute vec4 aPos;\nuniform mat4 modelView;\nuniform mat4 projection;\nvoid main() { gl_Position = projection * modelView * aPos; }";
    const FRAGMENT: &str = "precision mediump float;\nuniform float time;\nvoid main() { gl_FragColor = vec4(1.0); }";

    fn linked_program(gl: &HeadlessContext) -> ProgramId {
        let vs = gl.create_shader(ShaderStage::Vertex).unwrap();
        gl.shader_source(vs, VERTEX);
        gl.compile_shader(vs);
        let fs = gl.create_shader(ShaderStage::Fragment).unwrap();
        gl.shader_source(fs, FRAGMENT);
        gl.compile_shader(fs);
        let program = gl.create_program().unwrap();
        gl.attach_shader(program, vs);
        gl.attach_shader(program, fs);
        gl.link_program(program);
        program
    }

    #[test]
    fn source_without_entry_point_fails_to_compile() {
        let gl = HeadlessContext::new();
        let shader = gl.create_shader(ShaderStage::Fragment).unwrap();
        gl.shader_source(shader, "this is not glsl");
        gl.compile_shader(shader);
        assert!(!gl.shader_compile_status(shader));
        assert!(!gl.shader_info_log(shader).is_empty());
    }

    #[test]
    fn linking_requires_both_compiled_stages() {
        let gl = HeadlessContext::new();
        let vs = gl.create_shader(ShaderStage::Vertex).unwrap();
        gl.shader_source(vs, VERTEX);
        gl.compile_shader(vs);
        let program = gl.create_program().unwrap();
        gl.attach_shader(program, vs);
        gl.link_program(program);
        assert!(!gl.program_link_status(program));
        assert!(!gl.program_info_log(program).is_empty());
    }

    #[test]
    fn locations_resolve_for_declared_names_only() {
        let gl = HeadlessContext::new();
        let program = linked_program(&gl);
        assert_eq!(gl.attrib_location(program, "aPos"), Some(0));
        assert_eq!(gl.attrib_location(program, "vertexPosition"), None);
        assert!(gl.uniform_location(program, "projection").is_some());
        assert!(gl.uniform_location(program, "modelView").is_some());
        assert!(gl.uniform_location(program, "time").is_some());
        assert!(gl.uniform_location(program, "color").is_none());
    }

    #[test]
    fn locations_stay_unresolved_before_linking() {
        let gl = HeadlessContext::new();
        let program = gl.create_program().unwrap();
        assert_eq!(gl.attrib_location(program, "aPos"), None);
        assert!(gl.uniform_location(program, "projection").is_none());
    }

    #[test]
    fn buffer_upload_targets_the_bound_buffer() {
        let gl = HeadlessContext::new();
        let buffer = gl.create_buffer().unwrap();
        gl.bind_buffer(BufferTarget::Array, Some(buffer));
        gl.buffer_data_static(BufferTarget::Array, &[1, 2, 3, 4]);
        let uploads = gl.buffer_uploads();
        assert_eq!(uploads.len(), 1);
        assert_eq!(uploads[0].target, BufferTarget::Array);
        assert_eq!(uploads[0].data, vec![1, 2, 3, 4]);
    }

    #[test]
    fn uniform_uploads_are_recorded_per_name() {
        let gl = HeadlessContext::new();
        let program = linked_program(&gl);
        let time = gl.uniform_location(program, "time").unwrap();
        gl.uniform_1_f32(&time, 0.5);
        gl.uniform_1_f32(&time, 1.5);
        assert_eq!(
            gl.uniform_uploads("time"),
            vec![UniformValue::Float(0.5), UniformValue::Float(1.5)]
        );
        assert!(gl.uniform_uploads("projection").is_empty());
    }
}

use frameclock::ScriptedFrameClock;
use renderer::gl::headless::{HeadlessContext, UniformValue};
use renderer::gl::{BufferTarget, Topology};
use renderer::{run, RenderParameters, RenderSession, RotationDriver, Scene};

fn mat4(upload: &UniformValue) -> [f32; 16] {
    match upload {
        UniformValue::Mat4(matrix) => *matrix,
        other => panic!("expected a matrix upload, got {other:?}"),
    }
}

#[test]
fn quad_demo_draws_six_vertex_strips_with_elapsed_uniform() {
    let gl = HeadlessContext::new();
    let mut session = RenderSession::initialize(&gl, Scene::PulsingQuad, 16.0 / 9.0).unwrap();
    let params = RenderParameters::default();

    session.on_frame(&gl, 1000.0, &params);
    session.on_frame(&gl, 2000.0, &params);

    let draws = gl.draws();
    assert_eq!(draws.len(), 2);
    for draw in &draws {
        assert_eq!(draw.topology, Topology::TriangleStrip);
        assert_eq!(draw.count, 6);
        assert!(!draw.indexed);
    }

    // The time uniform carries seconds since the first frame: 0 on the
    // first callback, 1 one second later.
    assert_eq!(
        gl.uniform_uploads("time"),
        vec![UniformValue::Float(0.0), UniformValue::Float(1.0)]
    );
}

#[test]
fn time_driven_rotation_uses_raw_timestamp_seconds() {
    let gl = HeadlessContext::new();
    let mut session = RenderSession::initialize(&gl, Scene::PulsingQuad, 1.0).unwrap();
    let params = RenderParameters::default();

    session.on_frame(&gl, 1000.0, &params);
    session.on_frame(&gl, 2000.0, &params);

    let uploads = gl.uniform_uploads("modelView");
    assert_eq!(uploads.len(), 2);
    let first = mat4(&uploads[0]);
    let second = mat4(&uploads[1]);
    // Column-major rotation-about-Y: element 0 is cos(angle); the rotation
    // angle is the raw timestamp in seconds, not the elapsed time.
    assert!((first[0] - 1.0f32.cos()).abs() < 1e-6);
    assert!((second[0] - 2.0f32.cos()).abs() < 1e-6);
    // Translation column holds the fixed -6 Z offset.
    assert!((first[14] + 6.0).abs() < 1e-6);
    assert!((second[14] + 6.0).abs() < 1e-6);
}

#[test]
fn projection_uploads_once_and_stays_invariant() {
    let gl = HeadlessContext::new();
    let mut session = RenderSession::initialize(&gl, Scene::PulsingQuad, 1.5).unwrap();
    let params = RenderParameters::default();

    for timestamp in [0.0, 16.0, 33.0, 50.0] {
        session.on_frame(&gl, timestamp, &params);
    }

    let projections = gl.uniform_uploads("projection");
    assert_eq!(projections.len(), 1, "projection must upload exactly once");
    assert_eq!(mat4(&projections[0]), session.projection().to_cols_array());
    assert_eq!(gl.uniform_uploads("modelView").len(), 4);
}

#[test]
fn cube_demo_draws_36_u32_indices_with_topology_from_toggle() {
    let gl = HeadlessContext::new();
    let mut session = RenderSession::initialize(&gl, Scene::SpinningCube, 4.0 / 3.0).unwrap();

    let solid = RenderParameters {
        color: [0.2, 0.4, 0.9],
        ..RenderParameters::default()
    };
    session.on_frame(&gl, 0.0, &solid);
    let wireframe = RenderParameters {
        wireframe: true,
        ..solid
    };
    session.on_frame(&gl, 16.0, &wireframe);

    let draws = gl.draws();
    assert_eq!(draws.len(), 2);
    assert_eq!(draws[0].topology, Topology::TriangleStrip);
    assert_eq!(draws[1].topology, Topology::LineStrip);
    for draw in &draws {
        assert_eq!(draw.count, 36);
        assert!(draw.indexed);
    }

    assert_eq!(
        gl.uniform_uploads("color"),
        vec![
            UniformValue::Vec3([0.2, 0.4, 0.9]),
            UniformValue::Vec3([0.2, 0.4, 0.9]),
        ]
    );
}

#[test]
fn parameter_driven_rotation_ignores_the_clock() {
    let gl = HeadlessContext::new();
    let mut session = RenderSession::initialize(&gl, Scene::SpinningCube, 1.0).unwrap();
    let params = RenderParameters {
        rotation_degrees: 90.0,
        rotation_driver: RotationDriver::Parameter,
        ..RenderParameters::default()
    };

    session.on_frame(&gl, 0.0, &params);
    session.on_frame(&gl, 5000.0, &params);

    let uploads = gl.uniform_uploads("modelView");
    assert_eq!(mat4(&uploads[0]), mat4(&uploads[1]));
    assert!(mat4(&uploads[0])[0].abs() < 1e-6, "cos(90 deg) is 0");
}

#[test]
fn geometry_uploads_once_and_byte_identically() {
    let gl = HeadlessContext::new();
    let mut session = RenderSession::initialize(&gl, Scene::SpinningCube, 1.0).unwrap();
    let params = RenderParameters::default();
    session.on_frame(&gl, 0.0, &params);
    session.on_frame(&gl, 16.0, &params);

    let uploads = gl.buffer_uploads();
    assert_eq!(uploads.len(), 2, "setup uploads only, none on the frame path");

    let geometry = Scene::SpinningCube.geometry();
    assert_eq!(uploads[0].target, BufferTarget::Array);
    assert_eq!(
        uploads[0].data,
        bytemuck::cast_slice::<f32, u8>(geometry.positions)
    );
    assert_eq!(uploads[1].target, BufferTarget::ElementArray);
    assert_eq!(
        uploads[1].data,
        bytemuck::cast_slice::<u32, u8>(geometry.indices.unwrap())
    );
}

#[test]
fn run_drives_one_frame_per_clock_tick() {
    let gl = HeadlessContext::new();
    let mut session = RenderSession::initialize(&gl, Scene::PulsingQuad, 1.0).unwrap();
    let mut clock = ScriptedFrameClock::new(vec![0.0, 16.6, 33.3]).unwrap();

    let frames = run(&gl, &mut session, &mut clock, RenderParameters::default);

    assert_eq!(frames, 3);
    assert_eq!(gl.draws().len(), 3);
    assert_eq!(gl.clear_count(), 3);
}

#[test]
fn attribute_layout_uses_the_resolved_position_location() {
    let gl = HeadlessContext::new();
    let _session = RenderSession::initialize(&gl, Scene::PulsingQuad, 1.0).unwrap();
    // Pointer and enable agree on the location resolved for `aPos`.
    assert_eq!(gl.attrib_pointers(), vec![(0, 2)]);
    assert_eq!(gl.enabled_attribs(), vec![0]);
}

/// WGSL shader for flat-colored 2D lines and triangles.
pub const SHAPE_SHADER: &str = r#"
struct Uniforms {
    view_proj: mat4x4<f32>,
};

@group(0) @binding(0)
var<uniform> uniforms: Uniforms;

struct ShapeVertex {
    @location(0) position: vec2<f32>,
    @location(1) color: vec4<f32>,
};

struct ShapeOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) color: vec4<f32>,
};

@vertex
fn vs_shape(vertex: ShapeVertex) -> ShapeOutput {
    var out: ShapeOutput;
    out.clip_position = uniforms.view_proj * vec4<f32>(vertex.position, 0.0, 1.0);
    out.color = vertex.color;
    return out;
}

@fragment
fn fs_shape(in: ShapeOutput) -> @location(0) vec4<f32> {
    return in.color;
}
"#;

//! Graphics device abstraction
//!
//! The renderer talks to the GPU only through [`GraphicsDevice`]. A device
//! owns a single shader program, one buffer per [`BufferTarget`] and a
//! fixed set of named [`Uniform`] slots. Buffers are overwritten on every
//! upload; nothing is cached between draws.

use std::any::Any;
use std::path::Path;

use crate::foundation::math::{Mat4, Vec3};

use super::RenderError;

/// Result type for device operations
pub type DeviceResult<T> = Result<T, RenderError>;

/// Handle to a linked shader program
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProgramHandle(pub u32);

/// Shader pipeline stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    /// Vertex shader
    Vertex,
    /// Fragment shader
    Fragment,
}

/// Device buffer an upload replaces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BufferTarget {
    /// Vertex positions, three floats each
    Positions,
    /// Vertex normals, three floats each
    Normals,
    /// Texture coordinates, two floats each
    TexCoords,
    /// 16-bit triangle indices
    Indices,
}

/// Named uniform slots of the program
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Uniform {
    /// Object-to-clip transform
    ClipMatrix,
    /// Matrix applied to normals
    NormalMatrix,
    /// Flat material tint
    MaterialColor,
    /// Directional light direction
    LightDirection,
    /// Directional light colour
    LightColor,
    /// Position of point light `n`
    PointLightPosition(usize),
    /// Whether point light `n` is enabled (0 or 1)
    PointLightEnabled(usize),
}

/// GPU abstraction the renderer draws through
pub trait GraphicsDevice {
    /// Compile both stages and link them into a program
    fn create_program(&mut self, sources: &ShaderSources) -> DeviceResult<ProgramHandle>;

    /// Make `program` current
    fn use_program(&mut self, program: ProgramHandle) -> DeviceResult<()>;

    /// Turn on depth testing
    fn enable_depth_test(&mut self);

    /// Size the presentation surface is displayed at
    fn display_size(&self) -> (u32, u32);

    /// Current backing size of the drawing surface
    fn surface_size(&self) -> (u32, u32);

    /// Resize the drawing surface
    fn resize_surface(&mut self, width: u32, height: u32);

    /// Map clip space to the given pixel rectangle
    fn set_viewport(&mut self, x: i32, y: i32, width: u32, height: u32);

    /// Clear colour and depth
    fn clear(&mut self, color: [f32; 4]);

    /// Replace the contents of one buffer
    fn upload_buffer(&mut self, target: BufferTarget, data: &[u8]) -> DeviceResult<()>;

    /// Bind a 4x4 matrix uniform (column-major)
    fn set_uniform_mat4(&mut self, uniform: Uniform, value: &Mat4) -> DeviceResult<()>;

    /// Bind a vector uniform
    fn set_uniform_vec3(&mut self, uniform: Uniform, value: &Vec3) -> DeviceResult<()>;

    /// Bind an integer uniform
    fn set_uniform_i32(&mut self, uniform: Uniform, value: i32) -> DeviceResult<()>;

    /// Draw `index_count` indices from the index buffer as triangles
    fn draw_indexed(&mut self, index_count: u32) -> DeviceResult<()>;

    /// Number of point-light slots the program declares
    fn max_point_lights(&self) -> usize;

    /// Downcast to the concrete device type
    fn as_any(&self) -> &dyn Any;

    /// Downcast to the concrete device type, mutably
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

const DEFAULT_VERTEX_SHADER: &str = r"#version 300 es
in vec3 inPosition;
in vec3 inNormal;
out vec3 fsNormal;
out vec3 fsPosition;

uniform mat4 matrix;
uniform mat4 nMatrix;

void main() {
    fsNormal = mat3(nMatrix) * inNormal;
    fsPosition = (nMatrix * vec4(inPosition, 1.0)).xyz;
    gl_Position = matrix * vec4(inPosition, 1.0);
}
";

const DEFAULT_FRAGMENT_SHADER: &str = r"#version 300 es
precision mediump float;
#define MAX_POINT_LIGHTS 11

in vec3 fsNormal;
in vec3 fsPosition;
out vec4 outColor;

uniform vec3 mDiffColor;
uniform vec3 lightDirection;
uniform vec3 lightColor;
uniform vec3 pointLightPosition[MAX_POINT_LIGHTS];
uniform int pointLightEnabled[MAX_POINT_LIGHTS];

void main() {
    vec3 normal = normalize(fsNormal);
    vec3 color = lightColor * clamp(dot(-lightDirection, normal), 0.0, 1.0);
    for (int i = 0; i < MAX_POINT_LIGHTS; i++) {
        if (pointLightEnabled[i] == 1) {
            vec3 toLight = pointLightPosition[i] - fsPosition;
            float falloff = 1.0 / (1.0 + dot(toLight, toLight) * 0.01);
            color += vec3(1.0, 0.6, 0.2) * falloff * clamp(dot(normalize(toLight), normal), 0.0, 1.0);
        }
    }
    outColor = vec4(clamp(mDiffColor * color, 0.0, 1.0), 1.0);
}
";

/// Vertex and fragment shader source text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderSources {
    /// Vertex stage source
    pub vertex: String,
    /// Fragment stage source
    pub fragment: String,
}

impl Default for ShaderSources {
    fn default() -> Self {
        Self {
            vertex: DEFAULT_VERTEX_SHADER.to_string(),
            fragment: DEFAULT_FRAGMENT_SHADER.to_string(),
        }
    }
}

impl ShaderSources {
    /// Create sources from in-memory text
    pub fn new(vertex: impl Into<String>, fragment: impl Into<String>) -> Self {
        Self {
            vertex: vertex.into(),
            fragment: fragment.into(),
        }
    }

    /// Read both stages from disk
    pub fn from_files(vertex: impl AsRef<Path>, fragment: impl AsRef<Path>) -> DeviceResult<Self> {
        let read = |path: &Path| {
            std::fs::read_to_string(path)
                .map_err(|e| RenderError::ShaderLoad(format!("{}: {}", path.display(), e)))
        };
        Ok(Self {
            vertex: read(vertex.as_ref())?,
            fragment: read(fragment.as_ref())?,
        })
    }

    /// Source text of one stage
    pub fn stage(&self, stage: ShaderStage) -> &str {
        match stage {
            ShaderStage::Vertex => &self.vertex,
            ShaderStage::Fragment => &self.fragment,
        }
    }
}

//! In-memory graphics device
//!
//! Implements [`GraphicsDevice`] without a GPU. It validates call order the
//! way a real context would (no draws without a program), keeps the last
//! value bound to every uniform and counts uploads and draws. The full call
//! log is optional since a long run produces millions of calls.

use std::any::Any;
use std::collections::HashMap;

use crate::foundation::math::{Mat4, Vec3};

use super::device::{BufferTarget, DeviceResult, GraphicsDevice, ProgramHandle, ShaderSources, ShaderStage, Uniform};
use super::RenderError;

/// One recorded device call
#[derive(Debug, Clone, PartialEq)]
pub enum DeviceCall {
    /// Program compiled and linked
    CreateProgram(ProgramHandle),
    /// Program made current
    UseProgram(ProgramHandle),
    /// Depth test enabled
    EnableDepthTest,
    /// Surface resized
    Resize(u32, u32),
    /// Viewport set
    Viewport(i32, i32, u32, u32),
    /// Frame cleared
    Clear,
    /// Buffer replaced with this many bytes
    Upload(BufferTarget, usize),
    /// Matrix uniform bound
    UniformMat4(Uniform, Mat4),
    /// Vector uniform bound
    UniformVec3(Uniform, Vec3),
    /// Integer uniform bound
    UniformI32(Uniform, i32),
    /// Indexed draw of this many indices
    Draw(u32),
}

/// Running totals kept by the headless device
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeviceStats {
    /// Frames cleared
    pub frames: u64,
    /// Indexed draws issued
    pub draw_calls: u64,
    /// Bytes uploaded across all buffers
    pub bytes_uploaded: u64,
    /// Surface resizes
    pub resizes: u64,
}

/// Graphics device that renders nothing
#[derive(Debug)]
pub struct HeadlessDevice {
    display_size: (u32, u32),
    surface_size: (u32, u32),
    max_point_lights: usize,
    next_program: u32,
    current_program: Option<ProgramHandle>,
    depth_test: bool,
    buffers: HashMap<BufferTarget, usize>,
    mat4_uniforms: HashMap<Uniform, Mat4>,
    vec3_uniforms: HashMap<Uniform, Vec3>,
    i32_uniforms: HashMap<Uniform, i32>,
    stats: DeviceStats,
    calls: Option<Vec<DeviceCall>>,
}

impl HeadlessDevice {
    /// Point-light slots declared by the default program
    pub const DEFAULT_MAX_POINT_LIGHTS: usize = 11;

    /// Create a device whose display is `width` x `height`
    ///
    /// The surface starts at 300x150, the usual default canvas size, so the
    /// first frame always resizes it.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            display_size: (width, height),
            surface_size: (300, 150),
            max_point_lights: Self::DEFAULT_MAX_POINT_LIGHTS,
            next_program: 1,
            current_program: None,
            depth_test: false,
            buffers: HashMap::new(),
            mat4_uniforms: HashMap::new(),
            vec3_uniforms: HashMap::new(),
            i32_uniforms: HashMap::new(),
            stats: DeviceStats::default(),
            calls: None,
        }
    }

    /// Keep a log of every call (builder pattern)
    pub fn with_call_log(mut self) -> Self {
        self.calls = Some(Vec::new());
        self
    }

    /// Override the number of point-light slots (builder pattern)
    pub fn with_max_point_lights(mut self, count: usize) -> Self {
        self.max_point_lights = count;
        self
    }

    /// Simulate the display changing size
    pub fn set_display_size(&mut self, width: u32, height: u32) {
        self.display_size = (width, height);
    }

    /// Running totals
    pub fn stats(&self) -> DeviceStats {
        self.stats
    }

    /// Recorded calls; empty unless the call log is enabled
    pub fn calls(&self) -> &[DeviceCall] {
        self.calls.as_deref().unwrap_or(&[])
    }

    /// Forget recorded calls
    pub fn clear_calls(&mut self) {
        if let Some(calls) = self.calls.as_mut() {
            calls.clear();
        }
    }

    /// Whether depth testing was enabled
    pub fn depth_test_enabled(&self) -> bool {
        self.depth_test
    }

    /// Size of the last upload to `target`
    pub fn buffer_len(&self, target: BufferTarget) -> Option<usize> {
        self.buffers.get(&target).copied()
    }

    /// Last matrix bound to `uniform`
    pub fn mat4_uniform(&self, uniform: Uniform) -> Option<&Mat4> {
        self.mat4_uniforms.get(&uniform)
    }

    /// Last vector bound to `uniform`
    pub fn vec3_uniform(&self, uniform: Uniform) -> Option<&Vec3> {
        self.vec3_uniforms.get(&uniform)
    }

    /// Last integer bound to `uniform`
    pub fn i32_uniform(&self, uniform: Uniform) -> Option<i32> {
        self.i32_uniforms.get(&uniform).copied()
    }

    fn record(&mut self, call: DeviceCall) {
        if let Some(calls) = self.calls.as_mut() {
            calls.push(call);
        }
    }

    fn require_program(&self) -> DeviceResult<ProgramHandle> {
        self.current_program.ok_or(RenderError::NotInitialized)
    }

    fn check_slot(&self, uniform: Uniform) -> DeviceResult<()> {
        match uniform {
            Uniform::PointLightPosition(slot) | Uniform::PointLightEnabled(slot) if slot >= self.max_point_lights => {
                Err(RenderError::Device(format!("no uniform for point light {slot}")))
            }
            _ => Ok(()),
        }
    }
}

fn compile(stage: ShaderStage, source: &str) -> DeviceResult<()> {
    if source.contains("void main") {
        Ok(())
    } else {
        Err(RenderError::ShaderCompilation {
            stage,
            log: "missing entry point 'main'".to_string(),
        })
    }
}

impl GraphicsDevice for HeadlessDevice {
    fn create_program(&mut self, sources: &ShaderSources) -> DeviceResult<ProgramHandle> {
        compile(ShaderStage::Vertex, &sources.vertex)?;
        compile(ShaderStage::Fragment, &sources.fragment)?;
        if !sources.vertex.contains("gl_Position") {
            return Err(RenderError::ProgramLink("vertex stage never writes gl_Position".to_string()));
        }

        let handle = ProgramHandle(self.next_program);
        self.next_program += 1;
        self.record(DeviceCall::CreateProgram(handle));
        Ok(handle)
    }

    fn use_program(&mut self, program: ProgramHandle) -> DeviceResult<()> {
        if program.0 == 0 || program.0 >= self.next_program {
            return Err(RenderError::Device(format!("unknown program {}", program.0)));
        }
        self.current_program = Some(program);
        self.record(DeviceCall::UseProgram(program));
        Ok(())
    }

    fn enable_depth_test(&mut self) {
        self.depth_test = true;
        self.record(DeviceCall::EnableDepthTest);
    }

    fn display_size(&self) -> (u32, u32) {
        self.display_size
    }

    fn surface_size(&self) -> (u32, u32) {
        self.surface_size
    }

    fn resize_surface(&mut self, width: u32, height: u32) {
        self.surface_size = (width, height);
        self.stats.resizes += 1;
        self.record(DeviceCall::Resize(width, height));
    }

    fn set_viewport(&mut self, x: i32, y: i32, width: u32, height: u32) {
        self.record(DeviceCall::Viewport(x, y, width, height));
    }

    fn clear(&mut self, _color: [f32; 4]) {
        self.stats.frames += 1;
        self.record(DeviceCall::Clear);
    }

    fn upload_buffer(&mut self, target: BufferTarget, data: &[u8]) -> DeviceResult<()> {
        self.buffers.insert(target, data.len());
        self.stats.bytes_uploaded += data.len() as u64;
        self.record(DeviceCall::Upload(target, data.len()));
        Ok(())
    }

    fn set_uniform_mat4(&mut self, uniform: Uniform, value: &Mat4) -> DeviceResult<()> {
        self.require_program()?;
        self.mat4_uniforms.insert(uniform, *value);
        self.record(DeviceCall::UniformMat4(uniform, *value));
        Ok(())
    }

    fn set_uniform_vec3(&mut self, uniform: Uniform, value: &Vec3) -> DeviceResult<()> {
        self.require_program()?;
        self.check_slot(uniform)?;
        self.vec3_uniforms.insert(uniform, *value);
        self.record(DeviceCall::UniformVec3(uniform, *value));
        Ok(())
    }

    fn set_uniform_i32(&mut self, uniform: Uniform, value: i32) -> DeviceResult<()> {
        self.require_program()?;
        self.check_slot(uniform)?;
        self.i32_uniforms.insert(uniform, value);
        self.record(DeviceCall::UniformI32(uniform, value));
        Ok(())
    }

    fn draw_indexed(&mut self, index_count: u32) -> DeviceResult<()> {
        self.require_program()?;
        let available = self.buffers.get(&BufferTarget::Indices).copied().unwrap_or(0) / std::mem::size_of::<u16>();
        if index_count as usize > available {
            return Err(RenderError::Device(format!(
                "draw of {index_count} indices with {available} uploaded"
            )));
        }
        self.stats.draw_calls += 1;
        self.record(DeviceCall::Draw(index_count));
        Ok(())
    }

    fn max_point_lights(&self) -> usize {
        self.max_point_lights
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compile_failure_names_stage() {
        let mut device = HeadlessDevice::new(640, 480);
        let broken = ShaderSources::new("void main() { gl_Position = vec4(0.0); }", "precision mediump float;");
        let err = device.create_program(&broken).unwrap_err();
        assert!(matches!(err, RenderError::ShaderCompilation { stage: ShaderStage::Fragment, .. }));
    }

    #[test]
    fn test_default_shaders_link() {
        let mut device = HeadlessDevice::new(640, 480);
        let program = device.create_program(&ShaderSources::default()).unwrap();
        device.use_program(program).unwrap();
        assert!(device.use_program(ProgramHandle(42)).is_err());
    }

    #[test]
    fn test_draw_requires_program_and_indices() {
        let mut device = HeadlessDevice::new(640, 480).with_call_log();
        assert!(matches!(device.draw_indexed(3), Err(RenderError::NotInitialized)));

        let program = device.create_program(&ShaderSources::default()).unwrap();
        device.use_program(program).unwrap();
        device.upload_buffer(BufferTarget::Indices, bytemuck::cast_slice(&[0_u16, 1, 2])).unwrap();
        assert!(device.draw_indexed(6).is_err());
        device.draw_indexed(3).unwrap();

        assert_eq!(device.stats().draw_calls, 1);
        assert_eq!(device.stats().bytes_uploaded, 6);
        assert_eq!(device.calls().last(), Some(&DeviceCall::Draw(3)));
    }

    #[test]
    fn test_point_light_slots_are_bounded() {
        let mut device = HeadlessDevice::new(640, 480).with_max_point_lights(2);
        let program = device.create_program(&ShaderSources::default()).unwrap();
        device.use_program(program).unwrap();
        assert!(device.set_uniform_i32(Uniform::PointLightEnabled(1), 1).is_ok());
        assert!(device.set_uniform_i32(Uniform::PointLightEnabled(2), 1).is_err());
    }
}

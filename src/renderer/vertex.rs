//! GPU data layouts for point-sprite rendering

use bytemuck::{Pod, Zeroable};

/// One camera-facing point sprite
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct StarInstance {
    pub position: [f32; 3],
    /// World size with attenuation, pixels without
    pub size: f32,
    /// Straight (non-premultiplied) RGBA
    pub color: [f32; 4],
    /// 1.0 = shrink with depth, 0.0 = fixed pixel size
    pub attenuation: f32,
    pub _pad: [f32; 3],
}

impl StarInstance {
    pub const fn new(position: [f32; 3], size: f32, color: [f32; 4], attenuate: bool) -> Self {
        Self {
            position,
            size,
            color,
            attenuation: if attenuate { 1.0 } else { 0.0 },
            _pad: [0.0; 3],
        }
    }

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        const ATTRIBUTES: [wgpu::VertexAttribute; 4] = wgpu::vertex_attr_array![
            0 => Float32x3,
            1 => Float32,
            2 => Float32x4,
            3 => Float32,
        ];
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<StarInstance>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &ATTRIBUTES,
        }
    }
}

/// Camera uniform (must match shader)
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct CameraUniform {
    pub view_proj: [[f32; 4]; 4], // offset 0
    pub view: [[f32; 4]; 4],      // offset 64
    pub viewport: [f32; 2],       // offset 128
    /// Half the framebuffer height, the attenuation scale
    pub point_scale: f32, // offset 136
    pub _pad: f32,                // pad to 144 bytes
}

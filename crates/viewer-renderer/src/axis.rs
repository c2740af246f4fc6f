//! Origin axis helper renderer
//!
//! Draws the world coordinate frame at the scene origin (X=red, Y=green,
//! Z=blue). A visual aid only, never pickable.

use wgpu::util::DeviceExt;

/// Axis renderer
pub struct AxisRenderer {
    pipeline: wgpu::RenderPipeline,
    vertex_buffer: wgpu::Buffer,
    vertex_count: u32,
    bind_group: wgpu::BindGroup,
}

impl AxisRenderer {
    pub fn new(
        device: &wgpu::Device,
        format: wgpu::TextureFormat,
        depth_format: wgpu::TextureFormat,
        camera_bind_group_layout: &wgpu::BindGroupLayout,
        camera_buffer: &wgpu::Buffer,
        length: f32,
    ) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Axis Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/axis.wgsl").into()),
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Axis Bind Group"),
            layout: camera_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: camera_buffer.as_entire_binding(),
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Axis Pipeline Layout"),
            bind_group_layouts: &[camera_bind_group_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Axis Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[wgpu::VertexBufferLayout {
                    array_stride: 24,
                    step_mode: wgpu::VertexStepMode::Vertex,
                    attributes: &[
                        wgpu::VertexAttribute {
                            offset: 0,
                            shader_location: 0,
                            format: wgpu::VertexFormat::Float32x3,
                        },
                        wgpu::VertexAttribute {
                            offset: 12,
                            shader_location: 1,
                            format: wgpu::VertexFormat::Float32x3,
                        },
                    ],
                }],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::LineList,
                ..Default::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: depth_format,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        let vertices = generate_axis_vertices(length);
        let vertex_count = vertices.len() as u32 / 6;

        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Axis Vertex Buffer"),
            contents: bytemuck::cast_slice(&vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });

        Self {
            pipeline,
            vertex_buffer,
            vertex_count,
            bind_group,
        }
    }

    pub fn render<'a>(&'a self, render_pass: &mut wgpu::RenderPass<'a>) {
        render_pass.set_pipeline(&self.pipeline);
        render_pass.set_bind_group(0, &self.bind_group, &[]);
        render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        render_pass.draw(0..self.vertex_count, 0..1);
    }
}

fn generate_axis_vertices(length: f32) -> Vec<f32> {
    let mut vertices = Vec::new();

    // X axis (red)
    vertices.extend_from_slice(&[0.0, 0.0, 0.0]);
    vertices.extend_from_slice(&[1.0, 0.0, 0.0]);
    vertices.extend_from_slice(&[length, 0.0, 0.0]);
    vertices.extend_from_slice(&[1.0, 0.0, 0.0]);

    // Y axis (green)
    vertices.extend_from_slice(&[0.0, 0.0, 0.0]);
    vertices.extend_from_slice(&[0.0, 1.0, 0.0]);
    vertices.extend_from_slice(&[0.0, length, 0.0]);
    vertices.extend_from_slice(&[0.0, 1.0, 0.0]);

    // Z axis (blue)
    vertices.extend_from_slice(&[0.0, 0.0, 0.0]);
    vertices.extend_from_slice(&[0.0, 0.0, 1.0]);
    vertices.extend_from_slice(&[0.0, 0.0, length]);
    vertices.extend_from_slice(&[0.0, 0.0, 1.0]);

    vertices
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_three_axis_lines() {
        let vertices = generate_axis_vertices(4.0);
        // 3 lines, 2 vertices each, 6 floats per vertex
        assert_eq!(vertices.len(), 3 * 2 * 6);
    }

    #[test]
    fn test_axis_tips_at_length() {
        let vertices = generate_axis_vertices(4.0);
        assert_eq!(vertices[6], 4.0); // X tip
        assert_eq!(vertices[19], 4.0); // Y tip
        assert_eq!(vertices[32], 4.0); // Z tip
    }
}

use crate::config::SphereConfig;
use anyhow::Result;
use bytemuck::Zeroable;
use glam::{Mat4, Vec3A};
use std::sync::Arc;
use wgpu::util::DeviceExt;

const SHADERS_WGSL: &str = include_str!("point_sphere.wgsl");

// Each point is drawn as an instanced quad made of two triangles
const VERTICES_PER_POINT: u32 = 6;

const POINT_COLOR: [f32; 4] = [0.8, 0.8, 0.8, 1.0]; // Opaque light gray points

// Mirrors `SphereUniforms` in point_sphere.wgsl, 16-byte aligned
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SphereUniforms {
    pub view_proj: [[f32; 4]; 4],
    pub model: [[f32; 4]; 4],
    pub color: [f32; 4],
    pub point_size: f32,
    pub depth_falloff: f32,
    pub scale: f32,
    pub _padding: f32,
}

// Pipeline state survives regeneration, only the vertex buffer is replaced
pub struct SpherePipeline {
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    render_pipeline: wgpu::RenderPipeline,
}

pub struct SphereGpuPrimitive {
    pipeline: Arc<SpherePipeline>,
    vertex_buffer: wgpu::Buffer,
    num_points: u32,
}

pub struct PointCloudRenderer {
    pipeline: Option<Arc<SpherePipeline>>,
    primitive: Option<Arc<SphereGpuPrimitive>>,
    points: Vec<[f32; 3]>,
    camera_position: Vec3A,
    scale: f32,
    point_size: f32,
    depth_falloff: f32,
    rotation_speed: f32,
    pub time: f32,
}

impl PointCloudRenderer {
    pub fn new(points_data: Vec<[f32; 3]>, config: &SphereConfig) -> Self {
        Self {
            pipeline: None,
            primitive: None,
            points: points_data,
            camera_position: Vec3A::new(0.0, 0.0, 3.0),
            scale: config.scale,
            point_size: config.point_size,
            depth_falloff: config.depth_falloff,
            rotation_speed: config.rotation_speed,
            time: 0.0,
        }
    }

    pub fn points(&self) -> &[[f32; 3]] {
        &self.points
    }

    pub fn apply_config(&mut self, config: &SphereConfig) {
        self.scale = config.scale;
        self.point_size = config.point_size;
        self.depth_falloff = config.depth_falloff;
        self.rotation_speed = config.rotation_speed;
    }

    // Swap in a freshly generated point set; the vertex buffer is rebuilt on
    // the next `prepare`.
    pub fn set_points(&mut self, points_data: Vec<[f32; 3]>) {
        self.points = points_data;
        self.primitive = None;
    }

    pub fn prepare(
        &mut self,
        device: &Arc<wgpu::Device>,
        target_format: wgpu::TextureFormat,
    ) -> Result<()> {
        if self.primitive.is_some() {
            return Ok(());
        }
        if self.points.is_empty() {
            anyhow::bail!("No sphere points to upload");
        }

        let pipeline = match &self.pipeline {
            Some(pipeline) => pipeline.clone(),
            None => {
                let pipeline = Arc::new(Self::create_pipeline(device, target_format));
                self.pipeline = Some(pipeline.clone());
                pipeline
            }
        };

        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Sphere Vertex Buffer"),
            contents: bytemuck::cast_slice(&self.points),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let num_points = u32::try_from(self.points.len())?;

        self.primitive = Some(Arc::new(SphereGpuPrimitive {
            pipeline,
            vertex_buffer,
            num_points,
        }));

        tracing::info!("Uploaded {} sphere points to the GPU", num_points);

        Ok(())
    }

    fn create_pipeline(
        device: &wgpu::Device,
        target_format: wgpu::TextureFormat,
    ) -> SpherePipeline {
        tracing::info!("Preparing PointCloudRenderer pipeline...");

        let shader_module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Sphere Shader"),
            source: wgpu::ShaderSource::Wgsl(SHADERS_WGSL.into()),
        });

        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Sphere Uniform Buffer"),
            contents: bytemuck::cast_slice(&[SphereUniforms::zeroed()]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Sphere Uniform Bind Group Layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Sphere Uniform Bind Group"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Sphere Render Pipeline Layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });
        let render_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Sphere Render Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader_module,
                entry_point: "vs_main",
                buffers: &[wgpu::VertexBufferLayout {
                    array_stride: std::mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                    // One position per quad, not per corner
                    step_mode: wgpu::VertexStepMode::Instance,
                    attributes: &wgpu::vertex_attr_array![0 => Float32x3],
                }],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader_module,
                entry_point: "fs_main",
                targets: &[Some(wgpu::ColorTargetState {
                    format: target_format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState {
                count: 1,
                mask: !0,
                alpha_to_coverage_enabled: false,
            },
            multiview: None,
        });

        tracing::info!("PointCloudRenderer pipeline prepared successfully.");

        SpherePipeline {
            uniform_buffer,
            bind_group,
            render_pipeline,
        }
    }

    pub fn model_matrix(&self) -> Mat4 {
        let angle = self.time * self.rotation_speed;
        Mat4::from_rotation_y(angle) * Mat4::from_rotation_x(angle * 0.625)
    }

    pub fn view_projection(&self, aspect_ratio: f32) -> Mat4 {
        let view = Mat4::look_at_rh(
            self.camera_position.into(),
            Vec3A::ZERO.into(),
            Vec3A::Y.into(),
        );
        let proj = Mat4::perspective_rh(std::f32::consts::FRAC_PI_4, aspect_ratio, 0.1, 100.0);

        proj * view
    }

    pub fn calculate_mvp(&self, aspect_ratio: f32) -> Mat4 {
        self.view_projection(aspect_ratio) * self.model_matrix()
    }

    pub fn calculate_uniforms(&self, aspect_ratio: f32) -> SphereUniforms {
        SphereUniforms {
            view_proj: self.view_projection(aspect_ratio).to_cols_array_2d(),
            model: self.model_matrix().to_cols_array_2d(),
            color: POINT_COLOR,
            point_size: self.point_size,
            depth_falloff: self.depth_falloff,
            scale: self.scale,
            _padding: 0.0,
        }
    }

    pub fn get_primitive_arc(&self) -> Option<Arc<SphereGpuPrimitive>> {
        self.primitive.clone()
    }

    pub fn paint_primitive<'rp_lifetime>(
        primitive: &'rp_lifetime SphereGpuPrimitive, // Tie primitive's borrow to rp_lifetime
        uniforms: &SphereUniforms,
        rpass: &mut wgpu::RenderPass<'rp_lifetime>, // RenderPass needs to use rp_lifetime
        queue: &Arc<wgpu::Queue>,
    ) {
        let pipeline = &primitive.pipeline;
        queue.write_buffer(
            &pipeline.uniform_buffer,
            0,
            bytemuck::cast_slice(&[*uniforms]),
        );

        rpass.set_pipeline(&pipeline.render_pipeline);
        rpass.set_bind_group(0, &pipeline.bind_group, &[]);
        rpass.set_vertex_buffer(0, primitive.vertex_buffer.slice(..));
        rpass.draw(0..VERTICES_PER_POINT, 0..primitive.num_points);
    }
}

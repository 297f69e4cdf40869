//! wgpu pipelines shared by the web and native front-ends.
//!
//! Front-ends own the surface, device and queue. `SceneRenderer` owns the
//! buffers and pipelines: instanced point sprites for the ring (plus feather
//! copy) and the swarm, and the shader-animated voice halo.

use glam::Mat4;
use wgpu::util::DeviceExt;

use crate::config::HaloConfig;
use crate::constants::{CLEAR_RGB, HALO_POINT_SIZE, INNER_OPACITY, RING_OPACITY};
use crate::geometry::{HaloGeometry, HaloVertex};
use crate::scene::HaloScene;
use crate::sink::{InstanceBuffer, InstanceRaw};
use crate::{HALO_WGSL, POINTS_WGSL};

#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SceneUniforms {
    pub view_proj: [[f32; 4]; 4],
    pub time: f32,
    pub halo_amplitude: f32,
    pub halo_thickness: f32,
    pub halo_mic_amp: f32,
    pub halo_point_size: f32,
    pub _pad: [f32; 3],
}

#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LayerUniforms {
    pub color: [f32; 4],
    pub glow: [f32; 4],
    pub size: f32,
    pub opacity: f32,
    pub _pad: [f32; 2],
}

impl LayerUniforms {
    fn new(rgb: [f32; 3], glow: [f32; 3], size: f32, opacity: f32) -> Self {
        Self {
            color: [rgb[0], rgb[1], rgb[2], 1.0],
            glow: [glow[0], glow[1], glow[2], 1.0],
            size,
            opacity,
            _pad: [0.0; 2],
        }
    }

    fn with_intensity(mut self, intensity: f32) -> Self {
        self.glow[3] = intensity;
        self
    }
}

/// Per-frame values the front-end hands to the renderer.
#[derive(Clone, Copy, Debug)]
pub struct FrameUniforms {
    pub view_proj: Mat4,
    pub time: f32,
    pub halo_mic_amp: f32,
    pub ring_emissive: f32,
    pub swarm_emissive: f32,
}

struct LayerBinding {
    uniforms: LayerUniforms,
    buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

pub struct SceneRenderer {
    points_pipeline: wgpu::RenderPipeline,
    halo_pipeline: wgpu::RenderPipeline,
    scene_buffer: wgpu::Buffer,
    scene_bind_group: wgpu::BindGroup,
    ring_layer: LayerBinding,
    feather_layer: Option<LayerBinding>,
    swarm_layer: LayerBinding,
    quad_vb: wgpu::Buffer,
    ring_vb: wgpu::Buffer,
    swarm_vb: wgpu::Buffer,
    halo_vb: wgpu::Buffer,
    ring_count: u32,
    swarm_count: u32,
    halo_count: u32,
    halo_amplitude: f32,
    halo_thickness: f32,
}

// Two triangles, corners in [-0.5, 0.5].
const QUAD: [f32; 12] = [
    -0.5, -0.5, 0.5, -0.5, 0.5, 0.5, -0.5, -0.5, 0.5, 0.5, -0.5, 0.5,
];

impl SceneRenderer {
    pub fn new(device: &wgpu::Device, format: wgpu::TextureFormat, scene: &HaloScene) -> Self {
        let cfg = scene.config();

        let scene_bgl = uniform_layout(device, "scene_bgl");
        let layer_bgl = uniform_layout(device, "layer_bgl");

        let scene_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("scene_uniforms"),
            size: std::mem::size_of::<SceneUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let scene_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("scene_bg"),
            layout: &scene_bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: scene_buffer.as_entire_binding(),
            }],
        });

        let (ring_u, feather_u, swarm_u) = layer_palette(cfg);
        let ring_layer = create_layer(device, &layer_bgl, "ring_layer", ring_u);
        let feather_layer = if scene.ring().feather_enabled() {
            Some(create_layer(device, &layer_bgl, "feather_layer", feather_u))
        } else {
            None
        };
        let swarm_layer = create_layer(device, &layer_bgl, "swarm_layer", swarm_u);

        let quad_vb = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("quad_vb"),
            contents: bytemuck::cast_slice(&QUAD),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let ring_vb = instance_buffer(device, "ring_vb", scene.ring_instance_count());
        let swarm_vb = instance_buffer(device, "swarm_vb", scene.swarm_instance_count());
        let (halo_vb, halo_count) = halo_buffer(device, scene.halo_geometry());

        let points_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("points_shader"),
            source: wgpu::ShaderSource::Wgsl(POINTS_WGSL.into()),
        });
        let halo_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("halo_shader"),
            source: wgpu::ShaderSource::Wgsl(HALO_WGSL.into()),
        });

        let points_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("points_pl"),
            bind_group_layouts: &[&scene_bgl, &layer_bgl],
            push_constant_ranges: &[],
        });
        let halo_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("halo_pl"),
            bind_group_layouts: &[&scene_bgl],
            push_constant_ranges: &[],
        });

        let quad_layout = wgpu::VertexBufferLayout {
            array_stride: (std::mem::size_of::<f32>() * 2) as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[wgpu::VertexAttribute {
                format: wgpu::VertexFormat::Float32x2,
                offset: 0,
                shader_location: 0,
            }],
        };
        let point_instances = wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<InstanceRaw>() as u64,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &[
                wgpu::VertexAttribute {
                    format: wgpu::VertexFormat::Float32x3,
                    offset: 0,
                    shader_location: 1,
                },
                wgpu::VertexAttribute {
                    format: wgpu::VertexFormat::Float32,
                    offset: 12,
                    shader_location: 2,
                },
            ],
        };
        let halo_instances = wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<HaloVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &[
                wgpu::VertexAttribute {
                    format: wgpu::VertexFormat::Float32x3,
                    offset: 0,
                    shader_location: 1,
                },
                wgpu::VertexAttribute {
                    format: wgpu::VertexFormat::Float32,
                    offset: 12,
                    shader_location: 2,
                },
                wgpu::VertexAttribute {
                    format: wgpu::VertexFormat::Float32,
                    offset: 16,
                    shader_location: 3,
                },
            ],
        };

        let points_pipeline = sprite_pipeline(
            device,
            "points_pipeline",
            &points_layout,
            &points_shader,
            &[quad_layout.clone(), point_instances],
            format,
            wgpu::BlendState::ALPHA_BLENDING,
        );
        let halo_pipeline = sprite_pipeline(
            device,
            "halo_pipeline",
            &halo_layout,
            &halo_shader,
            &[quad_layout, halo_instances],
            format,
            additive_blend(),
        );

        log::info!(
            "[gpu] pipelines ready (ring={}, swarm={}, halo={})",
            scene.ring_instance_count(),
            scene.swarm_instance_count(),
            halo_count
        );

        Self {
            points_pipeline,
            halo_pipeline,
            scene_buffer,
            scene_bind_group,
            ring_layer,
            feather_layer,
            swarm_layer,
            quad_vb,
            ring_vb,
            swarm_vb,
            halo_vb,
            ring_count: scene.ring().angles().len() as u32,
            swarm_count: scene.swarm_instance_count() as u32,
            halo_count,
            halo_amplitude: cfg.halo_amplitude,
            halo_thickness: cfg.halo_thickness,
        }
    }

    /// Upload this frame's uniforms and instance transforms.
    pub fn prepare(
        &self,
        queue: &wgpu::Queue,
        frame: &FrameUniforms,
        ring: &InstanceBuffer,
        swarm: &InstanceBuffer,
    ) {
        let scene = SceneUniforms {
            view_proj: frame.view_proj.to_cols_array_2d(),
            time: frame.time,
            halo_amplitude: self.halo_amplitude,
            halo_thickness: self.halo_thickness,
            halo_mic_amp: frame.halo_mic_amp,
            halo_point_size: HALO_POINT_SIZE,
            _pad: [0.0; 3],
        };
        queue.write_buffer(&self.scene_buffer, 0, bytemuck::bytes_of(&scene));

        write_layer(queue, &self.ring_layer, frame.ring_emissive);
        if let Some(f) = &self.feather_layer {
            write_layer(queue, f, frame.ring_emissive);
        }
        write_layer(queue, &self.swarm_layer, frame.swarm_emissive);

        if !ring.is_empty() {
            queue.write_buffer(&self.ring_vb, 0, ring.as_bytes());
        }
        if !swarm.is_empty() {
            queue.write_buffer(&self.swarm_vb, 0, swarm.as_bytes());
        }
    }

    /// Clear `view` and draw halo, swarm, ring and feather in that order.
    pub fn encode(&self, encoder: &mut wgpu::CommandEncoder, view: &wgpu::TextureView) {
        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("halo_pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color {
                        r: CLEAR_RGB[0],
                        g: CLEAR_RGB[1],
                        b: CLEAR_RGB[2],
                        a: 1.0,
                    }),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        pass.set_bind_group(0, &self.scene_bind_group, &[]);
        pass.set_vertex_buffer(0, self.quad_vb.slice(..));

        pass.set_pipeline(&self.halo_pipeline);
        pass.set_vertex_buffer(1, self.halo_vb.slice(..));
        pass.draw(0..6, 0..self.halo_count);

        pass.set_pipeline(&self.points_pipeline);
        pass.set_bind_group(1, &self.swarm_layer.bind_group, &[]);
        pass.set_vertex_buffer(1, self.swarm_vb.slice(..));
        pass.draw(0..6, 0..self.swarm_count);

        pass.set_bind_group(1, &self.ring_layer.bind_group, &[]);
        pass.set_vertex_buffer(1, self.ring_vb.slice(..));
        pass.draw(0..6, 0..self.ring_count);
        if let Some(f) = &self.feather_layer {
            pass.set_bind_group(1, &f.bind_group, &[]);
            pass.draw(0..6, self.ring_count..self.ring_count * 2);
        }
    }
}

fn layer_palette(cfg: &HaloConfig) -> (LayerUniforms, LayerUniforms, LayerUniforms) {
    let ring = LayerUniforms::new(cfg.ring_rgb(), cfg.ring_glow_rgb(), cfg.ring_size, RING_OPACITY);
    let feather = LayerUniforms::new(
        cfg.ring_rgb(),
        cfg.ring_glow_rgb(),
        cfg.ring_size * cfg.feather_size_mult,
        RING_OPACITY * 0.5,
    );
    let swarm = LayerUniforms::new(
        cfg.inner_rgb(),
        cfg.inner_glow_rgb(),
        cfg.inner_size,
        INNER_OPACITY,
    );
    (ring, feather, swarm)
}

fn write_layer(queue: &wgpu::Queue, layer: &LayerBinding, intensity: f32) {
    let u = layer.uniforms.with_intensity(intensity);
    queue.write_buffer(&layer.buffer, 0, bytemuck::bytes_of(&u));
}

fn uniform_layout(device: &wgpu::Device, label: &str) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some(label),
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
    })
}

fn create_layer(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    label: &str,
    uniforms: LayerUniforms,
) -> LayerBinding {
    let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some(label),
        contents: bytemuck::bytes_of(&uniforms),
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
    });
    let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some(label),
        layout,
        entries: &[wgpu::BindGroupEntry {
            binding: 0,
            resource: buffer.as_entire_binding(),
        }],
    });
    LayerBinding {
        uniforms,
        buffer,
        bind_group,
    }
}

fn instance_buffer(device: &wgpu::Device, label: &str, count: usize) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some(label),
        size: (std::mem::size_of::<InstanceRaw>() * count.max(1)) as u64,
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

fn halo_buffer(device: &wgpu::Device, geo: &HaloGeometry) -> (wgpu::Buffer, u32) {
    let verts = geo.interleaved();
    let vb = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some("halo_vb"),
        contents: bytemuck::cast_slice(&verts),
        usage: wgpu::BufferUsages::VERTEX,
    });
    (vb, verts.len() as u32)
}

fn additive_blend() -> wgpu::BlendState {
    wgpu::BlendState {
        color: wgpu::BlendComponent {
            src_factor: wgpu::BlendFactor::SrcAlpha,
            dst_factor: wgpu::BlendFactor::One,
            operation: wgpu::BlendOperation::Add,
        },
        alpha: wgpu::BlendComponent {
            src_factor: wgpu::BlendFactor::One,
            dst_factor: wgpu::BlendFactor::One,
            operation: wgpu::BlendOperation::Add,
        },
    }
}

fn sprite_pipeline(
    device: &wgpu::Device,
    label: &str,
    layout: &wgpu::PipelineLayout,
    shader: &wgpu::ShaderModule,
    buffers: &[wgpu::VertexBufferLayout<'_>],
    format: wgpu::TextureFormat,
    blend: wgpu::BlendState,
) -> wgpu::RenderPipeline {
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(label),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: shader,
            entry_point: Some("vs_main"),
            buffers,
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        },
        primitive: wgpu::PrimitiveState::default(),
        depth_stencil: None,
        multisample: wgpu::MultisampleState::default(),
        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend: Some(blend),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        }),
        cache: None,
        multiview: None,
    })
}

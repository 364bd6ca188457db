//! wgpu adapter: uploads each batch once per frame and draws the scene.
//!
//! The renderer never owns a surface. Front ends acquire a texture view,
//! hand it to [`SceneRenderer::render`] and present it themselves.

mod helpers;

pub use helpers::{InstanceBuffer, DEPTH_FORMAT};

use bytemuck::Zeroable;
use crate::constants::BACKGROUND_RGB;
use crate::foliage::{AuraPoint, FieldUniforms, FoliagePoint};
use crate::geometry::{MeshData, MeshKind, Vertex};
use crate::instance::InstanceRaw;
use crate::scene::{FrameView, TreeScene};
use fnv::FnvHashMap;
use glam::Vec3;
use helpers::{PipelineSpec, ADDITIVE_BLENDING};
use wgpu::util::DeviceExt;

#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
struct Globals {
    view_proj: [[f32; 4]; 4],
    group: [[f32; 4]; 4],
    eye: [f32; 4],
    light_dir: [f32; 4],
    viewport: [f32; 4],
}

const QUAD_CORNERS: [f32; 12] = [
    -0.5, -0.5, 0.5, -0.5, 0.5, 0.5, -0.5, -0.5, 0.5, 0.5, -0.5, 0.5,
];

const CORNER_LAYOUT: wgpu::VertexBufferLayout<'static> = wgpu::VertexBufferLayout {
    array_stride: (std::mem::size_of::<f32>() * 2) as u64,
    step_mode: wgpu::VertexStepMode::Vertex,
    attributes: &[wgpu::VertexAttribute {
        format: wgpu::VertexFormat::Float32x2,
        offset: 0,
        shader_location: 0,
    }],
};

const FOLIAGE_LAYOUT: wgpu::VertexBufferLayout<'static> = wgpu::VertexBufferLayout {
    array_stride: std::mem::size_of::<FoliagePoint>() as u64,
    step_mode: wgpu::VertexStepMode::Instance,
    attributes: &[
        wgpu::VertexAttribute {
            format: wgpu::VertexFormat::Float32x3,
            offset: 0,
            shader_location: 1,
        },
        wgpu::VertexAttribute {
            format: wgpu::VertexFormat::Float32x3,
            offset: 12,
            shader_location: 2,
        },
        wgpu::VertexAttribute {
            format: wgpu::VertexFormat::Float32,
            offset: 24,
            shader_location: 3,
        },
    ],
};

const AURA_LAYOUT: wgpu::VertexBufferLayout<'static> = wgpu::VertexBufferLayout {
    array_stride: std::mem::size_of::<AuraPoint>() as u64,
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

const VERTEX_ATTRS: [wgpu::VertexAttribute; 2] =
    wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3];

const INSTANCE_ATTRS: [wgpu::VertexAttribute; 7] = wgpu::vertex_attr_array![
    2 => Float32x4, 3 => Float32x4, 4 => Float32x4, 5 => Float32x4,
    6 => Float32x4, 7 => Float32x4, 8 => Float32x4
];

struct GpuMesh {
    vertices: wgpu::Buffer,
    indices: wgpu::Buffer,
    index_count: u32,
}

impl GpuMesh {
    fn upload(device: &wgpu::Device, kind: MeshKind, mesh: &MeshData) -> Self {
        let label = format!("{kind:?}");
        Self {
            vertices: device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(&format!("{label}_vb")),
                contents: bytemuck::cast_slice(&mesh.vertices),
                usage: wgpu::BufferUsages::VERTEX,
            }),
            indices: device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(&format!("{label}_ib")),
                contents: bytemuck::cast_slice(&mesh.indices),
                usage: wgpu::BufferUsages::INDEX,
            }),
            index_count: mesh.indices.len() as u32,
        }
    }
}

/// Static point attributes plus the per-frame uniform block of one field.
struct PointField {
    points: Option<wgpu::Buffer>,
    count: u32,
    uniforms: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

impl PointField {
    fn new(device: &wgpu::Device, layout: &wgpu::BindGroupLayout, label: &str) -> Self {
        let (uniforms, bind_group) =
            helpers::uniform_binding(device, layout, label, &FieldUniforms::default());
        Self {
            points: None,
            count: 0,
            uniforms,
            bind_group,
        }
    }

    fn upload<T: bytemuck::Pod>(&mut self, device: &wgpu::Device, label: &str, points: &[T]) {
        self.count = points.len() as u32;
        self.points = (!points.is_empty()).then(|| {
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(label),
                contents: bytemuck::cast_slice(points),
                usage: wgpu::BufferUsages::VERTEX,
            })
        });
    }
}

pub struct SceneRenderer {
    width: u32,
    height: u32,
    _depth_tex: wgpu::Texture,
    depth_view: wgpu::TextureView,
    globals: wgpu::Buffer,
    globals_bind_group: wgpu::BindGroup,
    corners: wgpu::Buffer,
    foliage: PointField,
    aura: PointField,
    foliage_pipeline: wgpu::RenderPipeline,
    aura_pipeline: wgpu::RenderPipeline,
    mesh_pipeline: wgpu::RenderPipeline,
    meshes: FnvHashMap<MeshKind, GpuMesh>,
    ornaments: Vec<(MeshKind, InstanceBuffer)>,
    card_frames: InstanceBuffer,
    card_panels: InstanceBuffer,
}

impl SceneRenderer {
    pub fn new(
        device: &wgpu::Device,
        color_format: wgpu::TextureFormat,
        width: u32,
        height: u32,
        scene: &TreeScene,
    ) -> Self {
        let globals_layout = helpers::uniform_bind_group_layout(device, "globals_bgl");
        let field_layout = helpers::uniform_bind_group_layout(device, "field_bgl");
        let (globals, globals_bind_group) = helpers::uniform_binding(
            device,
            &globals_layout,
            "globals",
            &Globals::zeroed_with_viewport(width, height),
        );

        let foliage_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("foliage_shader"),
            source: wgpu::ShaderSource::Wgsl(crate::FOLIAGE_WGSL.into()),
        });
        let aura_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("aura_shader"),
            source: wgpu::ShaderSource::Wgsl(crate::AURA_WGSL.into()),
        });
        let mesh_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("mesh_shader"),
            source: wgpu::ShaderSource::Wgsl(crate::MESH_WGSL.into()),
        });

        let field_pl = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("field_pl"),
            bind_group_layouts: &[&globals_layout, &field_layout],
            push_constant_ranges: &[],
        });
        let mesh_pl = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("mesh_pl"),
            bind_group_layouts: &[&globals_layout],
            push_constant_ranges: &[],
        });

        let foliage_pipeline = helpers::make_pipeline(
            device,
            &PipelineSpec {
                label: "foliage_pipeline",
                layout: &field_pl,
                shader: &foliage_shader,
                buffers: &[CORNER_LAYOUT, FOLIAGE_LAYOUT],
                color_format,
                blend: wgpu::BlendState::ALPHA_BLENDING,
                depth_write: false,
            },
        );
        let aura_pipeline = helpers::make_pipeline(
            device,
            &PipelineSpec {
                label: "aura_pipeline",
                layout: &field_pl,
                shader: &aura_shader,
                buffers: &[CORNER_LAYOUT, AURA_LAYOUT],
                color_format,
                blend: ADDITIVE_BLENDING,
                depth_write: false,
            },
        );
        let mesh_buffers = [
            wgpu::VertexBufferLayout {
                array_stride: std::mem::size_of::<Vertex>() as u64,
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes: &VERTEX_ATTRS,
            },
            wgpu::VertexBufferLayout {
                array_stride: std::mem::size_of::<InstanceRaw>() as u64,
                step_mode: wgpu::VertexStepMode::Instance,
                attributes: &INSTANCE_ATTRS,
            },
        ];
        let mesh_pipeline = helpers::make_pipeline(
            device,
            &PipelineSpec {
                label: "mesh_pipeline",
                layout: &mesh_pl,
                shader: &mesh_shader,
                buffers: &mesh_buffers,
                color_format,
                blend: wgpu::BlendState::ALPHA_BLENDING,
                depth_write: true,
            },
        );

        let meshes = MeshKind::ALL
            .iter()
            .map(|&kind| (kind, GpuMesh::upload(device, kind, &kind.build())))
            .collect();
        let corners = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("corners_vb"),
            contents: bytemuck::cast_slice(&QUAD_CORNERS),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let (depth_tex, depth_view) = helpers::create_depth_texture(device, width, height);
        let card_count = scene.cards().cards().len();

        let mut renderer = Self {
            width,
            height,
            _depth_tex: depth_tex,
            depth_view,
            globals,
            globals_bind_group,
            corners,
            foliage: PointField::new(device, &field_layout, "foliage_uniforms"),
            aura: PointField::new(device, &field_layout, "aura_uniforms"),
            foliage_pipeline,
            aura_pipeline,
            mesh_pipeline,
            meshes,
            ornaments: Vec::new(),
            card_frames: InstanceBuffer::new::<InstanceRaw>(device, "card_frames", card_count),
            card_panels: InstanceBuffer::new::<InstanceRaw>(device, "card_panels", card_count),
        };
        renderer.sync_points(device, scene);
        log::info!(
            "[gpu] renderer ready: {}x{} {:?}, {} foliage / {} aura points",
            width,
            height,
            color_format,
            renderer.foliage.count,
            renderer.aura.count
        );
        renderer
    }

    /// Re-upload static point attributes when a field was regenerated.
    pub fn sync_points(&mut self, device: &wgpu::Device, scene: &TreeScene) {
        let foliage = scene.foliage().points();
        if foliage.len() as u32 != self.foliage.count || self.foliage.points.is_none() {
            self.foliage.upload(device, "foliage_points", foliage);
        }
        let aura = scene.aura().points();
        if aura.len() as u32 != self.aura.count || self.aura.points.is_none() {
            self.aura.upload(device, "aura_points", aura);
        }
    }

    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.width = width;
        self.height = height;
        (self._depth_tex, self.depth_view) = helpers::create_depth_texture(device, width, height);
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Upload this frame's buffers and draw into `target`.
    pub fn render(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        target: &wgpu::TextureView,
        frame: &FrameView<'_>,
    ) {
        self.upload(device, queue, frame);

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("scene_encoder"),
        });
        {
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("scene_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: target,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: BACKGROUND_RGB[0] as f64,
                            g: BACKGROUND_RGB[1] as f64,
                            b: BACKGROUND_RGB[2] as f64,
                            a: 1.0,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            rpass.set_bind_group(0, &self.globals_bind_group, &[]);

            // Opaque-ish meshes first so the point fields blend over them.
            rpass.set_pipeline(&self.mesh_pipeline);
            for (kind, instances) in &self.ornaments {
                draw_mesh(&mut rpass, &self.meshes, *kind, instances);
            }
            draw_mesh(&mut rpass, &self.meshes, MeshKind::Quad, &self.card_frames);
            draw_mesh(&mut rpass, &self.meshes, MeshKind::Quad, &self.card_panels);

            for (pipeline, field) in [
                (&self.aura_pipeline, &self.aura),
                (&self.foliage_pipeline, &self.foliage),
            ] {
                let Some(points) = field.points.as_ref() else {
                    continue;
                };
                rpass.set_pipeline(pipeline);
                rpass.set_bind_group(1, &field.bind_group, &[]);
                rpass.set_vertex_buffer(0, self.corners.slice(..));
                rpass.set_vertex_buffer(1, points.slice(..));
                rpass.draw(0..6, 0..field.count);
            }
        }
        queue.submit(Some(encoder.finish()));
    }

    fn upload(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, frame: &FrameView<'_>) {
        let globals = Globals {
            view_proj: frame.view_proj.to_cols_array_2d(),
            group: frame.group.to_cols_array_2d(),
            eye: frame.eye.extend(1.0).to_array(),
            light_dir: Vec3::new(-0.5, -1.0, -0.7).normalize().extend(0.0).to_array(),
            viewport: [self.width as f32, self.height as f32, 0.0, 0.0],
        };
        queue.write_buffer(&self.globals, 0, bytemuck::bytes_of(&globals));
        queue.write_buffer(&self.foliage.uniforms, 0, bytemuck::bytes_of(&frame.foliage));
        queue.write_buffer(&self.aura.uniforms, 0, bytemuck::bytes_of(&frame.aura));

        self.ornaments.truncate(frame.ornaments.len());
        for (i, view) in frame.ornaments.iter().enumerate() {
            let mesh = MeshKind::for_ornament(view.kind);
            if i == self.ornaments.len() {
                let buffer = InstanceBuffer::new::<InstanceRaw>(
                    device,
                    view.kind.label(),
                    view.instances.len(),
                );
                self.ornaments.push((mesh, buffer));
            }
            let (slot_mesh, buffer) = &mut self.ornaments[i];
            *slot_mesh = mesh;
            buffer.write(device, queue, view.instances);
        }
        self.card_frames.write(device, queue, frame.card_frames);
        self.card_panels.write(device, queue, frame.card_panels);
    }
}

fn draw_mesh(
    rpass: &mut wgpu::RenderPass<'_>,
    meshes: &FnvHashMap<MeshKind, GpuMesh>,
    kind: MeshKind,
    instances: &InstanceBuffer,
) {
    let Some(mesh) = meshes.get(&kind) else {
        return;
    };
    if instances.is_empty() {
        return;
    }
    rpass.set_vertex_buffer(0, mesh.vertices.slice(..));
    rpass.set_vertex_buffer(1, instances.buffer().slice(..));
    rpass.set_index_buffer(mesh.indices.slice(..), wgpu::IndexFormat::Uint16);
    rpass.draw_indexed(0..mesh.index_count, 0, 0..instances.len());
}

impl Globals {
    fn zeroed_with_viewport(width: u32, height: u32) -> Self {
        Self {
            viewport: [width as f32, height as f32, 0.0, 0.0],
            ..Self::zeroed()
        }
    }
}

//! wgpu implementation of [`RenderBackend`], shared by the web and native front-ends.

use crate::constants::MSAA_SAMPLES;
use crate::error::GpuError;
use crate::geometry::MeshData;
use crate::scene::{MaterialKind, MaterialUniforms, SceneLayer, SceneSet};
use crate::sketch::{Frame, RenderBackend, RenderCommand};
use glam::{Mat4, Vec3};
use wgpu::util::DeviceExt;

mod helpers;
mod targets;
use helpers::MeshPipelineDesc;
use targets::RenderTargets;

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct CameraUniforms {
    view_proj: [[f32; 4]; 4],
    eye: [f32; 4],
}

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct MaterialBlock {
    u_light: [f32; 3],
    u_time: f32,
}

impl From<MaterialUniforms> for MaterialBlock {
    fn from(u: MaterialUniforms) -> Self {
        Self {
            u_light: u.light.to_array(),
            u_time: u.time,
        }
    }
}

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct ModelUniforms {
    model: [[f32; 4]; 4],
    color: [f32; 4],
}

impl ModelUniforms {
    fn at(position: Vec3, color: [f32; 4]) -> Self {
        Self {
            model: Mat4::from_translation(position).to_cols_array_2d(),
            color,
        }
    }
}

struct Binding {
    buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

/// One indexed draw. Tubes are merged into a single batch; other meshes keep
/// `mesh_index` so their transform can follow the scene every frame.
struct DrawItem {
    material: MaterialKind,
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
    model: Binding,
    mesh_index: Option<usize>,
}

pub struct GpuRenderer<'w> {
    surface: wgpu::Surface<'w>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    targets: RenderTargets,
    clear_color: wgpu::Color,

    model_layout: wgpu::BindGroupLayout,
    camera: Binding,
    main_material: Binding,
    tubes_material: Binding,

    main_pipeline: wgpu::RenderPipeline,
    tubes_pipeline: wgpu::RenderPipeline,
    basic_pipeline: wgpu::RenderPipeline,

    raycast_draws: Vec<DrawItem>,
    main_draws: Vec<DrawItem>,
}

impl<'w> GpuRenderer<'w> {
    pub async fn new(
        instance: &wgpu::Instance,
        surface: wgpu::Surface<'w>,
        width: u32,
        height: u32,
        clear_color: [f64; 4],
    ) -> Result<Self, GpuError> {
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or(GpuError::NoAdapter)?;
        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    required_features: wgpu::Features::empty(),
                    // Default limits keep older WebGPU implementations happy
                    required_limits: wgpu::Limits::default(),
                    memory_hints: wgpu::MemoryHints::Performance,
                    label: None,
                },
                None,
            )
            .await?;

        let caps = surface.get_capabilities(&adapter);
        let format = caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .unwrap_or(caps.formats[0]);
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: width.max(1),
            height: height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);
        log::info!(
            "[gpu] adapter={} format={:?} size={}x{}",
            adapter.get_info().name,
            format,
            config.width,
            config.height
        );

        let targets = RenderTargets::new(&device, format, config.width, config.height, MSAA_SAMPLES);

        let camera_layout = helpers::uniform_layout(&device, "camera_bgl");
        let material_layout = helpers::uniform_layout(&device, "material_bgl");
        let model_layout = helpers::uniform_layout(&device, "model_bgl");
        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("mesh_pl"),
            bind_group_layouts: &[&camera_layout, &material_layout, &model_layout],
            push_constant_ranges: &[],
        });

        let camera = uniform(
            &device,
            &camera_layout,
            "camera_uniforms",
            &CameraUniforms {
                view_proj: Mat4::IDENTITY.to_cols_array_2d(),
                eye: [0.0; 4],
            },
        );
        let blank = MaterialBlock::from(MaterialUniforms::default());
        let main_material = uniform(&device, &material_layout, "main_uniforms", &blank);
        let tubes_material = uniform(&device, &material_layout, "tubes_uniforms", &blank);

        let pipeline = |label: &str, source: &str, double_sided: bool| {
            let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
                label: Some(label),
                source: wgpu::ShaderSource::Wgsl(source.into()),
            });
            helpers::make_mesh_pipeline(
                &device,
                MeshPipelineDesc {
                    label,
                    layout: &layout,
                    shader: &shader,
                    color_format: format,
                    double_sided,
                    sample_count: MSAA_SAMPLES,
                },
            )
        };
        let main_pipeline = pipeline("main_pipeline", crate::MAIN_WGSL, true);
        let tubes_pipeline = pipeline("tubes_pipeline", crate::TUBES_WGSL, true);
        let basic_pipeline = pipeline("basic_pipeline", crate::BASIC_WGSL, false);

        Ok(Self {
            surface,
            device,
            queue,
            config,
            targets,
            clear_color: wgpu::Color {
                r: clear_color[0],
                g: clear_color[1],
                b: clear_color[2],
                a: clear_color[3],
            },
            model_layout,
            camera,
            main_material,
            tubes_material,
            main_pipeline,
            tubes_pipeline,
            basic_pipeline,
            raycast_draws: Vec::new(),
            main_draws: Vec::new(),
        })
    }

    pub fn size(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }

    fn reconfigure(&mut self) {
        self.surface.configure(&self.device, &self.config);
        self.targets
            .recreate(&self.device, self.config.format, self.config.width, self.config.height);
    }

    fn build_draws(&self, scenes: &SceneSet, layer: SceneLayer) -> Vec<DrawItem> {
        let scene = scenes.scene(layer);
        let mut draws = Vec::new();
        let mut batch = MeshData::default();
        for (i, mesh) in scene.meshes.iter().enumerate() {
            if mesh.material == MaterialKind::Tubes {
                batch.extend_from(&mesh.geometry);
                continue;
            }
            draws.push(self.draw_item(
                &mesh.geometry,
                mesh.material,
                ModelUniforms::at(mesh.position, scenes.materials.marker_color),
                Some(i),
            ));
        }
        if !batch.indices.is_empty() {
            draws.push(self.draw_item(
                &batch,
                MaterialKind::Tubes,
                ModelUniforms::at(Vec3::ZERO, [1.0; 4]),
                None,
            ));
        }
        draws
    }

    fn draw_item(
        &self,
        mesh: &MeshData,
        material: MaterialKind,
        model: ModelUniforms,
        mesh_index: Option<usize>,
    ) -> DrawItem {
        let vertex_buffer = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("mesh_vb"),
                contents: bytemuck::cast_slice(&mesh.vertices),
                usage: wgpu::BufferUsages::VERTEX,
            });
        let index_buffer = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("mesh_ib"),
                contents: bytemuck::cast_slice(&mesh.indices),
                usage: wgpu::BufferUsages::INDEX,
            });
        DrawItem {
            material,
            vertex_buffer,
            index_buffer,
            index_count: mesh.indices.len() as u32,
            model: uniform(&self.device, &self.model_layout, "model_uniforms", &model),
            mesh_index,
        }
    }

    fn write_uniforms(&self, frame: &Frame<'_>) {
        let cam = frame.camera;
        self.queue.write_buffer(
            &self.camera.buffer,
            0,
            bytemuck::bytes_of(&CameraUniforms {
                view_proj: cam.view_projection().to_cols_array_2d(),
                eye: cam.eye.extend(1.0).to_array(),
            }),
        );
        let materials = &frame.scenes.materials;
        self.queue.write_buffer(
            &self.main_material.buffer,
            0,
            bytemuck::bytes_of(&MaterialBlock::from(materials.main.uniforms)),
        );
        self.queue.write_buffer(
            &self.tubes_material.buffer,
            0,
            bytemuck::bytes_of(&MaterialBlock::from(materials.tubes.uniforms)),
        );

        for (layer, draws) in [
            (SceneLayer::Raycast, &self.raycast_draws),
            (SceneLayer::Main, &self.main_draws),
        ] {
            let scene = frame.scenes.scene(layer);
            for draw in draws {
                if let Some(mesh) = draw.mesh_index.and_then(|i| scene.meshes.get(i)) {
                    let model = ModelUniforms::at(mesh.position, materials.marker_color);
                    self.queue
                        .write_buffer(&draw.model.buffer, 0, bytemuck::bytes_of(&model));
                }
            }
        }
    }

    fn encode_pass(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        target: &wgpu::TextureView,
        layer: Option<SceneLayer>,
        clear_color: bool,
        clear_depth: bool,
    ) {
        let (view, resolve_target) = match &self.targets.color_view {
            Some(msaa) => (msaa, Some(target)),
            None => (target, None),
        };
        let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some(match layer {
                Some(SceneLayer::Raycast) => "raycast_pass",
                Some(SceneLayer::Main) => "main_pass",
                None => "clear_pass",
            }),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view,
                resolve_target,
                ops: wgpu::Operations {
                    load: if clear_color {
                        wgpu::LoadOp::Clear(self.clear_color)
                    } else {
                        wgpu::LoadOp::Load
                    },
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: &self.targets.depth_view,
                depth_ops: Some(wgpu::Operations {
                    load: if clear_depth {
                        wgpu::LoadOp::Clear(1.0)
                    } else {
                        wgpu::LoadOp::Load
                    },
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        let draws = match layer {
            Some(SceneLayer::Raycast) => &self.raycast_draws,
            Some(SceneLayer::Main) => &self.main_draws,
            None => return,
        };
        rpass.set_bind_group(0, &self.camera.bind_group, &[]);
        for draw in draws {
            let (pipeline, material) = match draw.material {
                MaterialKind::Main => (&self.main_pipeline, &self.main_material),
                MaterialKind::Tubes => (&self.tubes_pipeline, &self.tubes_material),
                // the basic shader ignores group 1; any material satisfies the layout
                MaterialKind::Marker => (&self.basic_pipeline, &self.main_material),
            };
            rpass.set_pipeline(pipeline);
            rpass.set_bind_group(1, &material.bind_group, &[]);
            rpass.set_bind_group(2, &draw.model.bind_group, &[]);
            rpass.set_vertex_buffer(0, draw.vertex_buffer.slice(..));
            rpass.set_index_buffer(draw.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
            rpass.draw_indexed(0..draw.index_count, 0, 0..1);
        }
    }
}

impl<'w> RenderBackend for GpuRenderer<'w> {
    type Error = GpuError;

    fn upload(&mut self, scenes: &SceneSet) {
        self.raycast_draws = self.build_draws(scenes, SceneLayer::Raycast);
        self.main_draws = self.build_draws(scenes, SceneLayer::Main);
        log::info!(
            "[gpu] uploaded {} raycast draws, {} main draws",
            self.raycast_draws.len(),
            self.main_draws.len()
        );
    }

    fn set_size(&mut self, width: u32, height: u32) {
        let (width, height) = (width.max(1), height.max(1));
        if width == self.config.width && height == self.config.height {
            return;
        }
        self.config.width = width;
        self.config.height = height;
        self.reconfigure();
    }

    fn draw(&mut self, frame: &Frame<'_>) -> Result<(), GpuError> {
        let output = match self.surface.get_current_texture() {
            Ok(t) => t,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::warn!("[gpu] surface lost; reconfiguring");
                self.reconfigure();
                return Ok(());
            }
            Err(e) => return Err(e.into()),
        };
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        self.write_uniforms(frame);

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("frame_encoder"),
            });
        let mut clear_color = false;
        let mut clear_depth = false;
        for command in frame.commands {
            match *command {
                RenderCommand::Clear => {
                    clear_color = true;
                    clear_depth = true;
                }
                RenderCommand::ClearDepth => clear_depth = true,
                RenderCommand::Render(layer) => {
                    self.encode_pass(&mut encoder, &view, Some(layer), clear_color, clear_depth);
                    clear_color = false;
                    clear_depth = false;
                }
            }
        }
        if clear_color || clear_depth {
            self.encode_pass(&mut encoder, &view, None, clear_color, clear_depth);
        }

        self.queue.submit(Some(encoder.finish()));
        output.present();
        Ok(())
    }
}

fn uniform<T: bytemuck::Pod>(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    label: &str,
    contents: &T,
) -> Binding {
    let (buffer, bind_group) = helpers::uniform_binding(device, layout, label, contents);
    Binding { buffer, bind_group }
}

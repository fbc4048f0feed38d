//! wgpu backend implementation
//!
//! Buffers are real `wgpu::Buffer`s written through the queue. Vertex arrays
//! only exist as bookkeeping: wgpu binds vertex buffers per render pass, so
//! draw calls are buffered and replayed by [`WgpuBackend::encode_draws`]
//! inside a render pass the caller owns.
//!
//! Every declared attribute becomes its own vertex buffer slot whose slice
//! starts at the attribute's byte offset. This covers planar and interleaved
//! packing with one code path.

use std::collections::HashMap;

use crate::backend::traits::*;
use crate::backend::types::*;
use crate::mesh::IndexFormat;

/// Buffered draw command
#[derive(Debug, Clone, Copy)]
enum DrawCommand {
    Triangles { vertex_array: VertexArrayHandle, count: u32 },
    Points { vertex_array: VertexArrayHandle, count: u32 },
}

#[derive(Default)]
struct VertexArray {
    attributes: Vec<(BufferHandle, AttributeBinding)>,
    element_buffer: Option<(BufferHandle, IndexFormat)>,
}

struct TrackedBuffer {
    buffer: wgpu::Buffer,
    size: u64,
}

/// Vertex input of one attribute, for building render pipelines.
#[derive(Debug, Clone)]
pub struct PipelineVertexInput {
    pub array_stride: u64,
    pub attribute: wgpu::VertexAttribute,
}

impl PipelineVertexInput {
    /// Borrow as a `wgpu::VertexBufferLayout`.
    pub fn layout(&self) -> wgpu::VertexBufferLayout<'_> {
        wgpu::VertexBufferLayout {
            array_stride: self.array_stride,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: std::slice::from_ref(&self.attribute),
        }
    }
}

/// wgpu backend implementation
pub struct WgpuBackend {
    device: wgpu::Device,
    queue: wgpu::Queue,

    // Resource storage
    buffers: HashMap<u64, TrackedBuffer>,
    vertex_arrays: HashMap<u64, VertexArray>,

    // Handle counters
    next_buffer_id: u64,
    next_vertex_array_id: u64,

    draws: Vec<DrawCommand>,
}

impl WgpuBackend {
    /// Wrap an existing device and queue.
    pub fn new(device: wgpu::Device, queue: wgpu::Queue) -> Self {
        Self {
            device,
            queue,
            buffers: HashMap::new(),
            vertex_arrays: HashMap::new(),
            next_buffer_id: 1,
            next_vertex_array_id: 1,
            draws: Vec::new(),
        }
    }

    /// Create a backend on the default adapter without a surface.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn new_headless() -> BackendResult<Self> {
        pollster::block_on(Self::new_headless_async())
    }

    /// Create a backend on the default adapter without a surface.
    pub async fn new_headless_async() -> BackendResult<Self> {
        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor::default());

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: None,
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| BackendError::InitializationFailed("no suitable adapter".into()))?;

        log::info!("wgpu adapter: {:?}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("static-meshes device"),
                    ..Default::default()
                },
                None,
            )
            .await
            .map_err(|e| BackendError::DeviceCreationFailed(e.to_string()))?;

        Ok(Self::new(device, queue))
    }

    /// Get reference to the wgpu device
    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    /// Get reference to the wgpu queue
    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    /// Vertex inputs of a vertex array, in declaration order.
    ///
    /// Slot `i` of the returned list matches vertex buffer slot `i` set by
    /// [`encode_draws`](Self::encode_draws).
    pub fn vertex_inputs(&self, vertex_array: VertexArrayHandle) -> Vec<PipelineVertexInput> {
        let Some(state) = self.vertex_arrays.get(&vertex_array.0) else {
            return Vec::new();
        };
        state
            .attributes
            .iter()
            .map(|(_, binding)| PipelineVertexInput {
                array_stride: binding.stride as u64,
                attribute: wgpu::VertexAttribute {
                    format: convert_vertex_format(binding.component_count),
                    offset: 0,
                    shader_location: binding.slot,
                },
            })
            .collect()
    }

    /// Number of buffered draws.
    pub fn pending_draw_count(&self) -> usize {
        self.draws.len()
    }

    /// Replay buffered draws into a render pass.
    ///
    /// `triangles` and `points` are the caller's pipelines for the two
    /// topologies; both must have been built from [`vertex_inputs`](Self::vertex_inputs).
    /// One pipeline pair only serves meshes packed with the same attribute
    /// set and packing, so meshes with different layouts need separate
    /// passes (or `clear_draws` between them).
    pub fn encode_draws<'a>(
        &'a self,
        pass: &mut wgpu::RenderPass<'a>,
        triangles: &'a wgpu::RenderPipeline,
        points: &'a wgpu::RenderPipeline,
    ) {
        for command in &self.draws {
            let (vertex_array, count, is_points) = match *command {
                DrawCommand::Triangles { vertex_array, count } => (vertex_array, count, false),
                DrawCommand::Points { vertex_array, count } => (vertex_array, count, true),
            };
            let Some(state) = self.vertex_arrays.get(&vertex_array.0) else {
                continue;
            };

            pass.set_pipeline(if is_points { points } else { triangles });
            for (slot, (buffer, binding)) in state.attributes.iter().enumerate() {
                if let Some(tracked) = self.buffers.get(&buffer.0) {
                    pass.set_vertex_buffer(slot as u32, tracked.buffer.slice(binding.byte_offset..));
                }
            }

            let element = state
                .element_buffer
                .and_then(|(buffer, format)| self.buffers.get(&buffer.0).map(|b| (b, format)));
            match element {
                Some((tracked, format)) if !is_points => {
                    pass.set_index_buffer(tracked.buffer.slice(..), convert_index_format(format));
                    pass.draw_indexed(0..count, 0, 0..1);
                }
                _ => pass.draw(0..count, 0..1),
            }
        }
    }

    /// Drop buffered draws after they were encoded.
    pub fn clear_draws(&mut self) {
        self.draws.clear();
    }

    fn convert_buffer_usage(usage: BufferUsage) -> wgpu::BufferUsages {
        let mut result = wgpu::BufferUsages::empty();
        if usage.contains(BufferUsage::COPY_DST) {
            result |= wgpu::BufferUsages::COPY_DST;
        }
        if usage.contains(BufferUsage::INDEX) {
            result |= wgpu::BufferUsages::INDEX;
        }
        if usage.contains(BufferUsage::VERTEX) {
            result |= wgpu::BufferUsages::VERTEX;
        }
        result
    }
}

fn convert_vertex_format(component_count: u32) -> wgpu::VertexFormat {
    match component_count {
        1 => wgpu::VertexFormat::Float32,
        2 => wgpu::VertexFormat::Float32x2,
        3 => wgpu::VertexFormat::Float32x3,
        _ => wgpu::VertexFormat::Float32x4,
    }
}

fn convert_index_format(format: IndexFormat) -> wgpu::IndexFormat {
    match format {
        IndexFormat::Uint16 => wgpu::IndexFormat::Uint16,
        IndexFormat::Uint32 => wgpu::IndexFormat::Uint32,
    }
}

impl GraphicsBackend for WgpuBackend {
    fn name(&self) -> &'static str {
        "wgpu"
    }

    fn create_buffer(&mut self, desc: &BufferDescriptor) -> BackendResult<BufferHandle> {
        // Queue writes must be a multiple of COPY_BUFFER_ALIGNMENT.
        let padded_size = wgpu::util::align_to(desc.size, wgpu::COPY_BUFFER_ALIGNMENT);

        self.device.push_error_scope(wgpu::ErrorFilter::OutOfMemory);
        let buffer = self.device.create_buffer(&wgpu::BufferDescriptor {
            label: desc.label.as_deref(),
            size: padded_size,
            usage: Self::convert_buffer_usage(desc.usage),
            mapped_at_creation: false,
        });
        if let Some(error) = pollster::block_on(self.device.pop_error_scope()) {
            log::error!("wgpu: buffer {:?} allocation failed: {}", desc.label, error);
            return Err(BackendError::OutOfMemory);
        }

        let id = self.next_buffer_id;
        self.next_buffer_id += 1;
        self.buffers.insert(
            id,
            TrackedBuffer {
                buffer,
                size: desc.size,
            },
        );

        Ok(BufferHandle(id))
    }

    fn upload_sub_region(
        &mut self,
        buffer: BufferHandle,
        offset: u64,
        data: &[u8],
    ) -> BackendResult<()> {
        let tracked = self
            .buffers
            .get(&buffer.0)
            .ok_or(BackendError::UnknownBuffer(buffer))?;
        let len = data.len() as u64;
        if offset + len > tracked.size {
            return Err(BackendError::UploadOutOfBounds {
                offset,
                len,
                size: tracked.size,
            });
        }

        if len % wgpu::COPY_BUFFER_ALIGNMENT == 0 {
            self.queue.write_buffer(&tracked.buffer, offset, data);
        } else {
            let mut padded = data.to_vec();
            padded.resize(
                wgpu::util::align_to(len, wgpu::COPY_BUFFER_ALIGNMENT) as usize,
                0,
            );
            self.queue.write_buffer(&tracked.buffer, offset, &padded);
        }
        Ok(())
    }

    fn finalize_upload(&mut self, buffer: BufferHandle, hint: UsageHint) -> BackendResult<()> {
        if !self.buffers.contains_key(&buffer.0) {
            return Err(BackendError::UnknownBuffer(buffer));
        }
        // wgpu has no usage hints; flushing the queued writes is all that is left.
        log::trace!("wgpu: finalize_upload {:?} ({:?})", buffer, hint);
        self.queue.submit(std::iter::empty());
        Ok(())
    }

    fn create_vertex_array(&mut self) -> BackendResult<VertexArrayHandle> {
        let id = self.next_vertex_array_id;
        self.next_vertex_array_id += 1;
        self.vertex_arrays.insert(id, VertexArray::default());
        Ok(VertexArrayHandle(id))
    }

    fn declare_attribute(
        &mut self,
        vertex_array: VertexArrayHandle,
        buffer: BufferHandle,
        binding: &AttributeBinding,
    ) -> BackendResult<()> {
        if !self.buffers.contains_key(&buffer.0) {
            return Err(BackendError::UnknownBuffer(buffer));
        }
        let state = self
            .vertex_arrays
            .get_mut(&vertex_array.0)
            .ok_or(BackendError::UnknownVertexArray(vertex_array))?;
        state.attributes.retain(|(_, b)| b.slot != binding.slot);
        state.attributes.push((buffer, *binding));
        Ok(())
    }

    fn bind_element_buffer(
        &mut self,
        vertex_array: VertexArrayHandle,
        buffer: BufferHandle,
        format: IndexFormat,
    ) -> BackendResult<()> {
        if !self.buffers.contains_key(&buffer.0) {
            return Err(BackendError::UnknownBuffer(buffer));
        }
        let state = self
            .vertex_arrays
            .get_mut(&vertex_array.0)
            .ok_or(BackendError::UnknownVertexArray(vertex_array))?;
        state.element_buffer = Some((buffer, format));
        Ok(())
    }

    fn draw_triangles(&mut self, vertex_array: VertexArrayHandle, count: u32) {
        self.draws.push(DrawCommand::Triangles {
            vertex_array,
            count,
        });
    }

    fn draw_points(&mut self, vertex_array: VertexArrayHandle, count: u32) {
        self.draws.push(DrawCommand::Points {
            vertex_array,
            count,
        });
    }

    fn destroy_buffer(&mut self, buffer: BufferHandle) {
        if let Some(tracked) = self.buffers.remove(&buffer.0) {
            tracked.buffer.destroy();
        }
    }

    fn destroy_vertex_array(&mut self, vertex_array: VertexArrayHandle) {
        self.vertex_arrays.remove(&vertex_array.0);
        self.draws.retain(|command| match command {
            DrawCommand::Triangles { vertex_array: v, .. }
            | DrawCommand::Points { vertex_array: v, .. } => *v != vertex_array,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::MeshConfig;
    use crate::resources::Mesh;
    use crate::shapes::Cylinder;

    const SHADER: &str = r#"
@vertex
fn vs_main(@location(0) position: vec3<f32>) -> @builtin(position) vec4<f32> {
    return vec4<f32>(position * 0.5, 1.0);
}

@fragment
fn fs_main() -> @location(0) vec4<f32> {
    return vec4<f32>(1.0, 1.0, 1.0, 1.0);
}
"#;

    const TARGET_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;

    fn pipeline(
        device: &wgpu::Device,
        module: &wgpu::ShaderModule,
        inputs: &[PipelineVertexInput],
        topology: wgpu::PrimitiveTopology,
    ) -> wgpu::RenderPipeline {
        let buffers: Vec<wgpu::VertexBufferLayout> = inputs.iter().map(|i| i.layout()).collect();
        device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("mesh test pipeline"),
            layout: None,
            vertex: wgpu::VertexState {
                module,
                entry_point: "vs_main",
                compilation_options: Default::default(),
                buffers: &buffers,
            },
            primitive: wgpu::PrimitiveState {
                topology,
                ..Default::default()
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            fragment: Some(wgpu::FragmentState {
                module,
                entry_point: "fs_main",
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: TARGET_FORMAT,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            multiview: None,
        })
    }

    #[test]
    fn test_encode_draws_replays_into_render_pass() {
        let mut backend = match WgpuBackend::new_headless() {
            Ok(backend) => backend,
            Err(err) => {
                eprintln!("wgpu backend unavailable, skipping: {err}");
                return;
            }
        };

        let cylinder = Cylinder::new(12, 1.0).unwrap().generate();
        let mut mesh = Mesh::from_shape(&cylinder, &MeshConfig::positions_only()).unwrap();
        mesh.initialize(&mut backend).unwrap();
        mesh.render(&mut backend);
        mesh.render_points(&mut backend);
        assert_eq!(backend.pending_draw_count(), 2);

        let inputs = backend.vertex_inputs(mesh.vertex_array().unwrap());
        assert_eq!(inputs.len(), 1);
        assert_eq!(inputs[0].array_stride, 12);
        assert_eq!(inputs[0].attribute.shader_location, 0);
        assert_eq!(inputs[0].attribute.format, wgpu::VertexFormat::Float32x3);

        let device = backend.device();
        device.push_error_scope(wgpu::ErrorFilter::Validation);

        let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("mesh test shader"),
            source: wgpu::ShaderSource::Wgsl(SHADER.into()),
        });
        let triangles = pipeline(device, &module, &inputs, wgpu::PrimitiveTopology::TriangleList);
        let points = pipeline(device, &module, &inputs, wgpu::PrimitiveTopology::PointList);

        let target = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("mesh test target"),
            size: wgpu::Extent3d {
                width: 64,
                height: 64,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: TARGET_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        let view = target.create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("mesh test encoder"),
        });
        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("mesh test pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            backend.encode_draws(&mut pass, &triangles, &points);
        }
        backend.queue().submit(Some(encoder.finish()));
        let _ = device.poll(wgpu::Maintain::Wait);

        let error = pollster::block_on(device.pop_error_scope());
        assert!(error.is_none(), "replay raised a validation error: {error:?}");

        backend.clear_draws();
        assert_eq!(backend.pending_draw_count(), 0);
        mesh.release(&mut backend);
    }
}

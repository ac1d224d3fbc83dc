//! Vertex layout and uploaded mesh buffers.

use asset::{MeshData, MeshVertex};
use bytemuck::{Pod, Zeroable};
use corelib::scene::MeshKind;
use wgpu::{Buffer, BufferUsages, Device, VertexBufferLayout, VertexStepMode, util::DeviceExt};

/// Vertex: position + normal + uv.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct GpuVertex {
    pub pos: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

impl GpuVertex {
    pub const LAYOUT: VertexBufferLayout<'static> = VertexBufferLayout {
        array_stride: std::mem::size_of::<GpuVertex>() as u64,
        step_mode: VertexStepMode::Vertex,
        attributes: &wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3, 2 => Float32x2],
    };
}

impl From<&MeshVertex> for GpuVertex {
    fn from(v: &MeshVertex) -> Self {
        Self {
            pos: v.position,
            normal: v.normal,
            uv: v.uv,
        }
    }
}

pub struct GpuMesh {
    pub vertex_buf: Buffer,
    pub index_buf: Buffer,
    pub index_count: u32,
}

impl GpuMesh {
    pub fn upload(device: &Device, data: &MeshData) -> Self {
        let vertices: Vec<GpuVertex> = data.vertices.iter().map(GpuVertex::from).collect();
        let vertex_buf = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Mesh VB"),
            contents: bytemuck::cast_slice(&vertices),
            usage: BufferUsages::VERTEX,
        });
        let index_buf = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Mesh IB"),
            contents: bytemuck::cast_slice(&data.indices),
            usage: BufferUsages::INDEX,
        });
        Self {
            vertex_buf,
            index_buf,
            index_count: data.indices.len() as u32,
        }
    }
}

/// Meshes built on demand from their [`MeshKind`]. Only a handful of shapes
/// ever exist, so lookup is linear.
#[derive(Default)]
pub struct MeshCache {
    meshes: Vec<(MeshKind, GpuMesh)>,
}

impl MeshCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, kind: &MeshKind) -> Option<&GpuMesh> {
        self.meshes.iter().find(|(k, _)| k == kind).map(|(_, m)| m)
    }

    pub fn get_or_upload(&mut self, device: &Device, kind: &MeshKind) -> &GpuMesh {
        let idx = match self.meshes.iter().position(|(k, _)| k == kind) {
            Some(idx) => idx,
            None => {
                let data = MeshData::from_kind(kind);
                log::debug!(
                    "Uploading mesh {:?}: {} vertices, {} indices",
                    kind,
                    data.vertices.len(),
                    data.indices.len()
                );
                self.meshes.push((*kind, GpuMesh::upload(device, &data)));
                self.meshes.len() - 1
            }
        };
        &self.meshes[idx].1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vertex_stride_matches_attributes() {
        assert_eq!(std::mem::size_of::<GpuVertex>(), 32);
        assert_eq!(GpuVertex::LAYOUT.array_stride, 32);
        assert_eq!(GpuVertex::LAYOUT.attributes[2].offset, 24);
    }

    #[test]
    fn converts_from_mesh_vertex() {
        let v = MeshVertex::new([1.0, 2.0, 3.0], [0.0, 1.0, 0.0], [0.25, 0.75]);
        let g = GpuVertex::from(&v);
        assert_eq!(g.pos, [1.0, 2.0, 3.0]);
        assert_eq!(g.uv, [0.25, 0.75]);
    }
}

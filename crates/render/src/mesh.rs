use bytemuck::{Pod, Zeroable};
use tessera_ecs::ComponentKind;

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub color: [f32; 3],
}

/// Built-in vertex data for a component kind, as non-indexed triangles.
pub fn mesh_vertices(kind: ComponentKind) -> Vec<Vertex> {
    match kind {
        ComponentKind::Triangle => triangle(),
        ComponentKind::Quad => quad(),
    }
}

fn triangle() -> Vec<Vertex> {
    #[rustfmt::skip]
    let vertices = vec![
        Vertex { position: [-1.0, -1.0, 0.0], color: [1.0, 0.0, 0.0] },
        Vertex { position: [ 1.0, -1.0, 0.0], color: [0.0, 1.0, 0.0] },
        Vertex { position: [ 0.0,  1.0, 0.0], color: [0.0, 0.0, 1.0] },
    ];
    vertices
}

fn quad() -> Vec<Vertex> {
    let c = [0.0, 0.0, 1.0];
    #[rustfmt::skip]
    let vertices = vec![
        Vertex { position: [-0.5, -0.5, 0.0], color: c },
        Vertex { position: [ 0.5, -0.5, 0.0], color: c },
        Vertex { position: [ 0.5,  0.5, 0.0], color: c },
        Vertex { position: [-0.5, -0.5, 0.0], color: c },
        Vertex { position: [ 0.5,  0.5, 0.0], color: c },
        Vertex { position: [-0.5,  0.5, 0.0], color: c },
    ];
    vertices
}

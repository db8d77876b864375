use bytemuck::{Pod, Zeroable};
use glam::Mat4;

/// Per-frame camera uniform block.
///
/// Matrices are column-major `[[f32; 4]; 4]`, matching GLSL `mat4` in a
/// std140 block.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct ViewUniform {
    pub view: [[f32; 4]; 4],
    pub view_inverse: [[f32; 4]; 4],
    pub view_proj: [[f32; 4]; 4],
}

impl ViewUniform {
    pub fn new(view: Mat4, view_inverse: Mat4, projection: Mat4) -> Self {
        Self {
            view: view.to_cols_array_2d(),
            view_inverse: view_inverse.to_cols_array_2d(),
            view_proj: (projection * view).to_cols_array_2d(),
        }
    }

    pub fn view_proj(&self) -> Mat4 {
        Mat4::from_cols_array_2d(&self.view_proj)
    }

    /// Raw bytes for upload.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::bytes_of(self)
    }
}

impl Default for ViewUniform {
    fn default() -> Self {
        Self::new(Mat4::IDENTITY, Mat4::IDENTITY, Mat4::IDENTITY)
    }
}

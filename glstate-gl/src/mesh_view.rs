use crate::error::{GlStateError, Result};
use crate::mesh::{DrawParams, IndexBinding, Mesh};
use crate::shader::Program;
use crate::state::MultiDraw;

/// A range of vertices or indices of a [`Mesh`], drawn with the mesh's
/// vertex array and buffers.
///
/// A view of an indexed mesh draws `count` indices, otherwise `count`
/// vertices starting at the base vertex. A view with zero count is empty
/// and draws nothing.
#[derive(Clone, Debug)]
pub struct MeshView<'a> {
    mesh: &'a Mesh,
    count: i32,
    base_vertex: i32,
    index_offset: usize,
    index_start: u32,
    index_end: u32,
    instance_count: i32,
    base_instance: u32,
}

impl<'a> MeshView<'a> {
    pub fn new(mesh: &'a Mesh) -> Self {
        MeshView {
            mesh,
            count: 0,
            base_vertex: 0,
            index_offset: 0,
            index_start: 0,
            index_end: 0,
            instance_count: 1,
            base_instance: 0,
        }
    }

    pub fn mesh(&self) -> &'a Mesh {
        self.mesh
    }

    pub fn count(&self) -> i32 {
        self.count
    }

    pub fn set_count(&mut self, count: i32) -> &mut Self {
        self.count = count;
        self
    }

    pub fn base_vertex(&self) -> i32 {
        self.base_vertex
    }

    pub fn set_base_vertex(&mut self, base_vertex: i32) -> &mut Self {
        self.base_vertex = base_vertex;
        self
    }

    /// Start drawing at the `first` index of the mesh's index buffer.
    pub fn set_index_range(&mut self, first: i32) -> &mut Self {
        if let Some(index) = self.mesh.index_binding() {
            self.index_offset = index.offset + first as usize * index.ty.size();
        }
        self
    }

    /// Start drawing at the `first` index, with index values in
    /// `start..=end`.
    pub fn set_index_range_bounded(&mut self, first: i32, start: u32, end: u32) -> &mut Self {
        self.set_index_range(first);
        self.index_start = start;
        self.index_end = end;
        self
    }

    /// Byte offset of the first index in the index buffer.
    pub fn index_offset(&self) -> usize {
        self.index_offset
    }

    pub fn instance_count(&self) -> i32 {
        self.instance_count
    }

    pub fn set_instance_count(&mut self, count: i32) -> &mut Self {
        self.instance_count = count;
        self
    }

    pub fn base_instance(&self) -> u32 {
        self.base_instance
    }

    pub fn set_base_instance(&mut self, base_instance: u32) -> &mut Self {
        self.base_instance = base_instance;
        self
    }

    fn params(&self) -> DrawParams {
        DrawParams {
            count: self.count,
            base_vertex: self.base_vertex,
            instance_count: self.instance_count,
            base_instance: self.base_instance,
            index: self.mesh.index_binding().map(|index| IndexBinding {
                offset: self.index_offset,
                ty: index.ty,
                start: self.index_start,
                end: self.index_end,
            }),
        }
    }

    /// Draw the view with the program. Does nothing if the view is empty.
    pub fn draw(&self, program: &Program) -> Result<()> {
        self.mesh.draw_internal(program, self.params())
    }

    /// Draw several views of the same mesh at once.
    ///
    /// All views must share one mesh and must not be instanced. Empty views
    /// are skipped.
    pub fn draw_many(program: &Program, views: &[MeshView<'_>]) -> Result<()> {
        let Some(first) = views.first() else {
            return Ok(());
        };
        let mesh = first.mesh;
        if views
            .iter()
            .any(|view| !std::ptr::eq(view.mesh, mesh) || view.instance_count != 1)
        {
            return Err(GlStateError::MultiDrawMismatch);
        }

        let multi_draw = mesh.state().borrow().mesh.multi_draw;
        let views = views.iter().filter(|view| view.count != 0);
        match multi_draw {
            MultiDraw::Fallback => {
                for view in views {
                    view.draw(program)?;
                }
            }
            MultiDraw::Default => {
                let ranges: Vec<(i32, i32, usize)> = views
                    .map(|view| (view.count, view.base_vertex, view.index_offset))
                    .collect();
                if !ranges.is_empty() {
                    mesh.multi_draw(program, &ranges);
                }
            }
        }
        Ok(())
    }
}

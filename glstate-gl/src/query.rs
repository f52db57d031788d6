//! Asynchronous queries.
use crate::context::Context;
use crate::object::ObjectFlags;
use crate::state::{Create, StateHandle};
use glstate_common::gl;
use glstate_common::gl::types::{GLenum, GLint, GLint64, GLuint, GLuint64};

/// A value a query result can be read as.
pub trait QueryResult: Sized {
    /// Read the result of the query. Without 64-bit query support, `long`
    /// is `false` and 64-bit results are widened from 32 bits.
    ///
    /// # Safety
    /// `id` must be a query with an available result.
    unsafe fn get(id: GLuint, long: bool) -> Self;
}

impl QueryResult for u32 {
    unsafe fn get(id: GLuint, _long: bool) -> Self {
        let mut value: GLuint = 0;
        gl::GetQueryObjectuiv(id, gl::QUERY_RESULT, &mut value);
        value
    }
}

impl QueryResult for i32 {
    unsafe fn get(id: GLuint, _long: bool) -> Self {
        let mut value: GLint = 0;
        gl::GetQueryObjectiv(id, gl::QUERY_RESULT, &mut value);
        value
    }
}

impl QueryResult for u64 {
    unsafe fn get(id: GLuint, long: bool) -> Self {
        if !long {
            return u64::from(u32::get(id, false));
        }
        let mut value: GLuint64 = 0;
        gl::GetQueryObjectui64v(id, gl::QUERY_RESULT, &mut value);
        value
    }
}

impl QueryResult for i64 {
    unsafe fn get(id: GLuint, long: bool) -> Self {
        if !long {
            return i64::from(u32::get(id, false));
        }
        let mut value: GLint64 = 0;
        gl::GetQueryObjecti64v(id, gl::QUERY_RESULT, &mut value);
        value
    }
}

impl QueryResult for bool {
    unsafe fn get(id: GLuint, _long: bool) -> Self {
        u32::get(id, false) != 0
    }
}

/// Base of all query types.
#[derive(Debug)]
pub struct Query {
    id: GLuint,
    target: GLenum,
    flags: ObjectFlags,
    long_results: bool,
}

impl Query {
    pub(crate) fn new(state: &StateHandle, target: GLenum) -> Query {
        let (create, long_results) = {
            let state = state.borrow();
            (state.query.create, state.query.long_results_supported)
        };
        let mut id = 0;
        let flags = match create {
            Create::Gen => {
                unsafe { gl::GenQueries(1, &mut id) };
                ObjectFlags::DELETE_ON_DESTRUCTION
            }
            Create::DirectStateAccess => {
                unsafe { gl::CreateQueries(target, 1, &mut id) };
                ObjectFlags::DELETE_ON_DESTRUCTION | ObjectFlags::CREATED
            }
        };
        Query {
            id,
            target,
            flags,
            long_results,
        }
    }

    pub(crate) fn wrap(state: &StateHandle, id: GLuint, target: GLenum, flags: ObjectFlags) -> Query {
        Query {
            id,
            target,
            flags,
            long_results: state.borrow().query.long_results_supported,
        }
    }

    pub fn id(&self) -> GLuint {
        self.id
    }

    pub fn target(&self) -> GLenum {
        self.target
    }

    pub fn flags(&self) -> ObjectFlags {
        self.flags
    }

    /// Release the object so it isn't deleted on drop, returning its id.
    pub fn release(mut self) -> GLuint {
        std::mem::replace(&mut self.id, 0)
    }

    /// Start the query. A query reserved with `glGenQueries` is created
    /// here.
    pub fn begin(&mut self) {
        unsafe { gl::BeginQuery(self.target, self.id) }
        self.flags |= ObjectFlags::CREATED;
    }

    pub fn end(&mut self) {
        unsafe { gl::EndQuery(self.target) }
    }

    /// Whether the result is ready, without waiting for it.
    pub fn result_available(&self) -> bool {
        if !self.flags.contains(ObjectFlags::CREATED) {
            return false;
        }
        let mut available: GLuint = 0;
        unsafe { gl::GetQueryObjectuiv(self.id, gl::QUERY_RESULT_AVAILABLE, &mut available) };
        available != 0
    }

    /// Read the result, waiting for it if needed. Returns `None` if the
    /// query never ran.
    pub fn result<T: QueryResult>(&self) -> Option<T> {
        if !self.flags.contains(ObjectFlags::CREATED) {
            return None;
        }
        Some(unsafe { T::get(self.id, self.long_results) })
    }
}

impl Drop for Query {
    fn drop(&mut self) {
        if self.id != 0 && self.flags.contains(ObjectFlags::DELETE_ON_DESTRUCTION) {
            unsafe { gl::DeleteQueries(1, &self.id) }
        }
    }
}

#[repr(u32)]
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum PrimitiveQueryTarget {
    PrimitivesGenerated = gl::PRIMITIVES_GENERATED,
    TransformFeedbackPrimitivesWritten = gl::TRANSFORM_FEEDBACK_PRIMITIVES_WRITTEN,
}

/// Counts primitives generated or written to transform feedback.
#[derive(Debug)]
pub struct PrimitiveQuery {
    query: Query,
}

impl PrimitiveQuery {
    pub fn new(ctx: &Context, target: PrimitiveQueryTarget) -> Self {
        PrimitiveQuery {
            query: Query::new(&ctx.state(), target as GLenum),
        }
    }

    /// Wrap an existing query object.
    pub fn wrap(ctx: &Context, id: GLuint, target: PrimitiveQueryTarget, flags: ObjectFlags) -> Self {
        PrimitiveQuery {
            query: Query::wrap(&ctx.state(), id, target as GLenum, flags),
        }
    }

    pub fn id(&self) -> GLuint {
        self.query.id()
    }

    pub fn release(self) -> GLuint {
        self.query.release()
    }

    pub fn begin(&mut self) {
        self.query.begin()
    }

    pub fn end(&mut self) {
        self.query.end()
    }

    pub fn result_available(&self) -> bool {
        self.query.result_available()
    }

    pub fn result<T: QueryResult>(&self) -> Option<T> {
        self.query.result()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::recording::{self, take_calls, Call};

    #[test]
    fn no_result_before_begin() {
        let ctx = recording::context(3, 0, &[]);
        let query = PrimitiveQuery::new(&ctx, PrimitiveQueryTarget::PrimitivesGenerated);
        assert!(!query.result_available());
        assert_eq!(query.result::<u32>(), None);
        assert!(take_calls().is_empty());
    }

    #[test]
    fn long_results_are_widened_without_timer_query() {
        let ctx = recording::context(3, 0, &[]);
        let mut query = PrimitiveQuery::new(&ctx, PrimitiveQueryTarget::PrimitivesGenerated);
        query.begin();
        assert_eq!(query.result::<u64>(), Some(u64::from(recording::QUERY_RESULT)));
        assert_eq!(query.result::<i64>(), Some(i64::from(recording::QUERY_RESULT)));
        assert_eq!(
            take_calls(),
            vec![
                Call::BeginQuery(gl::PRIMITIVES_GENERATED, 1),
                Call::GetQueryObjectuiv(1, gl::QUERY_RESULT),
                Call::GetQueryObjectuiv(1, gl::QUERY_RESULT),
            ]
        );
    }

    #[test]
    fn long_results_with_timer_query() {
        let ctx = recording::context(3, 3, &[]);
        let mut query = PrimitiveQuery::wrap(
            &ctx,
            4,
            PrimitiveQueryTarget::PrimitivesGenerated,
            ObjectFlags::empty(),
        );
        query.begin();
        assert_eq!(query.result::<u64>(), Some(recording::QUERY_RESULT_64));
        assert_eq!(query.result::<bool>(), Some(true));
        assert_eq!(
            take_calls(),
            vec![
                Call::BeginQuery(gl::PRIMITIVES_GENERATED, 4),
                Call::GetQueryObjectui64v(4, gl::QUERY_RESULT),
                Call::GetQueryObjectuiv(4, gl::QUERY_RESULT),
            ]
        );
    }
}

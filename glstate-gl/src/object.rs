use bitflags::bitflags;

bitflags! {
    /// Ownership and creation state of a wrapped OpenGL object.
    #[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
    pub struct ObjectFlags: u8 {
        /// The object exists in the driver, not just its name.
        const CREATED = 1 << 0;
        /// The object is deleted when the wrapper is dropped.
        const DELETE_ON_DESTRUCTION = 1 << 1;
    }
}

//! Records that the server identifies.

/// A record with a server-assigned identifier.
pub trait Entity {
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    /// The identifier, once the server has assigned one.
    ///
    /// Drafts built client-side for a create request carry none until the API
    /// echoes them back.
    fn id(&self) -> Option<&Self::Id>;

    /// Whether the server already knows this record.
    fn is_persisted(&self) -> bool {
        self.id().is_some()
    }
}

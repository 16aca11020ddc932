//! Core traits shared by the project aggregate and its owned entities

/// Entity identifier. Ids are opaque strings (reference data uses codes such
/// as `T004`, owned entities use generated ids).
pub type Id = String;

/// Trait for entities that have an identifier
pub trait Identifiable {
    fn id(&self) -> &str;
}

/// Base trait for entities stored in a project collection
pub trait Entity: Identifiable {
    /// Human-readable type name for error messages
    const TYPE_NAME: &'static str;
}

/// Partial update applied to an entity in place
pub trait Patch<T> {
    fn apply_to(&self, entity: &mut T);

    /// True when the patch carries no changes
    fn is_empty(&self) -> bool;
}

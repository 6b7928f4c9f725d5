//! Entity trait: identity + continuity across state changes.

/// Entity marker + minimal interface.
///
/// Settlement records (certificates, liquidations, payment requests) are
/// plain current-state entities; their status fields evolve through the
/// record store's conditioned writes, not through event replay.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier.
    fn id(&self) -> &Self::Id;
}

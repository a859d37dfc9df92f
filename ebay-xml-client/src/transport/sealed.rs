//! Sealed trait marker for Transport implementations.
//!
//! Keeps `Transport` closed to this crate so every implementation applies the
//! same header validation before anything reaches the network.

pub(crate) mod private {
    /// Sealed trait marker.
    pub trait Sealed {}
}

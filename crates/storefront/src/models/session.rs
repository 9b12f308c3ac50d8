//! Session-related types.

/// Session keys.
pub mod keys {
    /// Key for the visitor id that owns the cart and chat state.
    pub const VISITOR_ID: &str = "visitor_id";
}

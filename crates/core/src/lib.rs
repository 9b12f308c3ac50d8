//! New Jyoti Sweets core - catalog, cart and chat state.
//!
//! This crate holds the storefront's domain logic, free of HTTP and
//! templating:
//! - [`catalog`] - the fixed product list and the menu filter
//! - [`cart`] - an in-memory cart keyed by product id
//! - [`chat`] - the recommendation chat transcript and the [`Recommender`] seam
//! - [`reservation`] - table booking form validation
//!
//! The only I/O boundary is [`Recommender`], which the storefront implements
//! with an HTTP client.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod chat;
pub mod reservation;
pub mod types;

pub use cart::{Cart, CartLine};
pub use catalog::{MenuQuery, SHOP, ShopInfo};
pub use chat::{ChatSession, Offline, PendingTurn, Recommendation, RecommendError, Recommender};
pub use reservation::{Reservation, ReservationError, ReservationRequest, TimeSlot};
pub use types::*;

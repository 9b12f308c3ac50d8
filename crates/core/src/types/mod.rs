//! Core types for the storefront.
//!
//! This module provides type-safe wrappers for the shop's domain concepts.

pub mod category;
pub mod chat;
pub mod id;
pub mod price;
pub mod product;

pub use category::{Category, CategoryFilter, UnknownCategory};
pub use chat::{ChatMessage, ChatRole, GroundingLink};
pub use id::ProductId;
pub use price::{Price, PriceError};
pub use product::Product;

//! Catalog product references.
//!
//! The catalog itself (listings, search, vendor management) lives with an
//! external collaborator; this crate types the product reference it hands to
//! the cart so descriptive fields and prices are validated once, at the
//! boundary, instead of on every read.

pub mod product;

pub use product::{ProductId, ProductRef};

//! Shopping cart domain module.
//!
//! The cart is a single in-memory aggregate with reducer semantics: every
//! mutation is decided by `handle` (pure) and committed by `apply`. The
//! [`store::CartStore`] wraps the aggregate with an observable session-scoped
//! instance that UI surfaces subscribe to.

pub mod cart;
pub mod store;

pub use cart::{
    AddItem, Cart, CartCleared, CartCommand, CartEvent, CartId, CartLine, ClearCart, LineAdded,
    LineRemoved, QuantityUpdated, RemoveItem, UpdateQuantity,
};
pub use store::{CartNotification, CartReceipt, CartStore};

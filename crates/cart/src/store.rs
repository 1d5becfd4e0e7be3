//! Observable, session-scoped cart store.
//!
//! One `CartStore` instance is created when a session starts and handed (by
//! reference) to every surface that reads or mutates the cart. There is no
//! process-wide singleton and nothing is persisted; dropping the store drops
//! the cart.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use sookari_catalog::{ProductId, ProductRef};
use sookari_core::{Aggregate, AggregateId, AggregateRoot, Currency, DomainError, DomainResult, Money};
use sookari_events::{Event, EventBus, InMemoryEventBus, Subscription};

use crate::cart::{
    AddItem, Cart, CartCommand, CartId, CartLine, ClearCart, RemoveItem, UpdateQuantity,
};

/// Snapshot published to subscribers after every committed mutation.
///
/// Carries the derived totals so surfaces like the tab badge can re-render
/// without re-reading the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartNotification {
    pub total_items: u64,
    pub total_price_minor: u64,
    pub currency: Option<Currency>,
    pub occurred_at: DateTime<Utc>,
}

/// Result of a successful checkout: the totals that were charged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartReceipt {
    pub total_items: u64,
    pub total_price: Money,
}

/// Single source of truth for the shopping cart.
///
/// Mutations run the aggregate's handle→apply cycle and then notify all
/// subscribers. Defined no-ops (removing an absent line, clearing an empty
/// cart) commit nothing and notify nobody.
#[derive(Debug)]
pub struct CartStore {
    cart: Cart,
    bus: InMemoryEventBus<CartNotification>,
}

impl CartStore {
    /// Create an empty store for a new session.
    pub fn new() -> Self {
        Self {
            cart: Cart::empty(CartId::new(AggregateId::new())),
            bus: InMemoryEventBus::new(),
        }
    }

    /// Subscribe to cart change notifications.
    ///
    /// Every committed mutation publishes exactly one notification to each
    /// subscriber; no-op mutations publish nothing.
    pub fn subscribe(&self) -> Subscription<CartNotification> {
        self.bus.subscribe()
    }

    /// Add one unit of `product`; a product already in the cart gets its
    /// quantity incremented instead of a duplicate line.
    pub fn add_item(&mut self, product: ProductRef) -> DomainResult<()> {
        self.dispatch(CartCommand::AddItem(AddItem {
            product,
            occurred_at: Utc::now(),
        }))
    }

    /// Remove the line for `product_id`; absent lines are a silent no-op.
    pub fn remove_item(&mut self, product_id: ProductId) -> DomainResult<()> {
        self.dispatch(CartCommand::RemoveItem(RemoveItem {
            product_id,
            occurred_at: Utc::now(),
        }))
    }

    /// Set the quantity for `product_id`.
    ///
    /// Quantities below 1 are rejected; a surface that wants "decrement to
    /// zero removes the line" asks the user and calls [`Self::remove_item`].
    pub fn update_quantity(&mut self, product_id: ProductId, quantity: u32) -> DomainResult<()> {
        self.dispatch(CartCommand::UpdateQuantity(UpdateQuantity {
            product_id,
            quantity,
            occurred_at: Utc::now(),
        }))
    }

    /// Empty the cart and reset both totals to zero.
    pub fn clear(&mut self) -> DomainResult<()> {
        self.dispatch(CartCommand::ClearCart(ClearCart {
            occurred_at: Utc::now(),
        }))
    }

    /// Conclude the session's purchase: returns the charged totals and empties
    /// the cart. Checking out an empty cart is a validation error.
    pub fn checkout(&mut self) -> DomainResult<CartReceipt> {
        let total_price = self
            .cart
            .total_price()
            .ok_or_else(|| DomainError::validation("cannot check out an empty cart"))?;
        let receipt = CartReceipt {
            total_items: self.cart.total_items(),
            total_price,
        };

        self.clear()?;
        Ok(receipt)
    }

    pub fn lines(&self) -> &[CartLine] {
        self.cart.lines()
    }

    pub fn is_empty(&self) -> bool {
        self.cart.is_empty()
    }

    pub fn total_items(&self) -> u64 {
        self.cart.total_items()
    }

    pub fn total_price_minor(&self) -> u64 {
        self.cart.total_price_minor()
    }

    pub fn total_price(&self) -> Option<Money> {
        self.cart.total_price()
    }

    /// Current quantity for a product, or 0 if it is not in the cart.
    pub fn item_quantity(&self, product_id: ProductId) -> u32 {
        self.cart.item_quantity(product_id)
    }

    fn dispatch(&mut self, command: CartCommand) -> DomainResult<()> {
        let events = self.cart.handle(&command)?;
        let Some(last) = events.last() else {
            return Ok(());
        };
        let occurred_at = last.occurred_at();

        for event in &events {
            self.cart.apply(event);
        }

        debug!(
            cart_id = %self.cart.id_typed(),
            version = self.cart.version(),
            total_items = self.cart.total_items(),
            total_price_minor = self.cart.total_price_minor(),
            "cart mutation committed"
        );

        let notification = CartNotification {
            total_items: self.cart.total_items(),
            total_price_minor: self.cart.total_price_minor(),
            currency: self.cart.currency().cloned(),
            occurred_at,
        };

        // The mutation is already committed; a broken bus only costs the
        // notification, subscribers can still re-read the store.
        if let Err(err) = self.bus.publish(notification) {
            warn!(error = ?err, "failed to publish cart notification");
        }

        Ok(())
    }
}

impl Default for CartStore {
    fn default() -> Self {
        Self::new()
    }
}

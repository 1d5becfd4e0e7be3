use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use sookari_catalog::{ProductId, ProductRef};
use sookari_core::{Aggregate, AggregateId, AggregateRoot, Currency, DomainError, Money};
use sookari_events::Event;

/// Cart identifier (one cart per app session).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CartId(pub AggregateId);

impl CartId {
    pub fn new(id: AggregateId) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for CartId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// Cart line: one per distinct product, quantity >= 1.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    product: ProductRef,
    quantity: u32,
}

impl CartLine {
    pub fn product(&self) -> &ProductRef {
        &self.product
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Line subtotal (price × quantity).
    pub fn subtotal(&self) -> Money {
        // Overflow is ruled out when the command is handled.
        Money::new(
            self.product
                .price()
                .amount_minor()
                .saturating_mul(u64::from(self.quantity)),
            self.product.price().currency().clone(),
        )
    }
}

/// Aggregate root: the shopping cart.
///
/// Lines keep insertion order (order first added). `total_items` and
/// `total_price_minor` are derived and recomputed on every applied event.
/// All lines share one currency; the first added line fixes it until the cart
/// empties again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cart {
    id: CartId,
    lines: Vec<CartLine>,
    total_items: u64,
    total_price_minor: u64,
    currency: Option<Currency>,
    version: u64,
}

impl Cart {
    /// Create an empty cart for a new session.
    pub fn empty(id: CartId) -> Self {
        Self {
            id,
            lines: Vec::new(),
            total_items: 0,
            total_price_minor: 0,
            currency: None,
            version: 0,
        }
    }

    pub fn id_typed(&self) -> CartId {
        self.id
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Sum of quantities across all lines.
    pub fn total_items(&self) -> u64 {
        self.total_items
    }

    /// Sum of line subtotals, in the cart currency's minor unit.
    pub fn total_price_minor(&self) -> u64 {
        self.total_price_minor
    }

    /// Cart total as money; `None` while the cart is empty.
    pub fn total_price(&self) -> Option<Money> {
        self.currency
            .clone()
            .map(|currency| Money::new(self.total_price_minor, currency))
    }

    pub fn currency(&self) -> Option<&Currency> {
        self.currency.as_ref()
    }

    /// Current quantity for a product, or 0 if it is not in the cart.
    ///
    /// Product listings use this to reflect "already in cart" state without
    /// duplicating store logic.
    pub fn item_quantity(&self, product_id: ProductId) -> u32 {
        self.find_line(product_id).map_or(0, CartLine::quantity)
    }

    fn find_line(&self, product_id: ProductId) -> Option<&CartLine> {
        self.lines.iter().find(|l| l.product.id() == product_id)
    }

    fn recompute_totals(&mut self) {
        self.total_items = self.lines.iter().map(|l| u64::from(l.quantity)).sum();
        self.total_price_minor = self
            .lines
            .iter()
            .fold(0u64, |acc, l| acc.saturating_add(l.subtotal().amount_minor()));
        self.currency = self
            .lines
            .first()
            .map(|l| l.product.price().currency().clone());
    }
}

impl AggregateRoot for Cart {
    type Id = CartId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }
}

/// Command: AddItem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddItem {
    pub product: ProductRef,
    pub occurred_at: DateTime<Utc>,
}

/// Command: RemoveItem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoveItem {
    pub product_id: ProductId,
    pub occurred_at: DateTime<Utc>,
}

/// Command: UpdateQuantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateQuantity {
    pub product_id: ProductId,
    pub quantity: u32,
    pub occurred_at: DateTime<Utc>,
}

/// Command: ClearCart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClearCart {
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CartCommand {
    AddItem(AddItem),
    RemoveItem(RemoveItem),
    UpdateQuantity(UpdateQuantity),
    ClearCart(ClearCart),
}

/// Event: LineAdded (first add of a product).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineAdded {
    pub product: ProductRef,
    pub occurred_at: DateTime<Utc>,
}

/// Event: QuantityUpdated (re-add of an existing product, or explicit update).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuantityUpdated {
    pub product_id: ProductId,
    pub quantity: u32,
    pub occurred_at: DateTime<Utc>,
}

/// Event: LineRemoved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineRemoved {
    pub product_id: ProductId,
    pub occurred_at: DateTime<Utc>,
}

/// Event: CartCleared.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartCleared {
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CartEvent {
    LineAdded(LineAdded),
    QuantityUpdated(QuantityUpdated),
    LineRemoved(LineRemoved),
    CartCleared(CartCleared),
}

impl Event for CartEvent {
    fn event_type(&self) -> &'static str {
        match self {
            CartEvent::LineAdded(_) => "cart.line_added",
            CartEvent::QuantityUpdated(_) => "cart.quantity_updated",
            CartEvent::LineRemoved(_) => "cart.line_removed",
            CartEvent::CartCleared(_) => "cart.cleared",
        }
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            CartEvent::LineAdded(e) => e.occurred_at,
            CartEvent::QuantityUpdated(e) => e.occurred_at,
            CartEvent::LineRemoved(e) => e.occurred_at,
            CartEvent::CartCleared(e) => e.occurred_at,
        }
    }
}

impl Aggregate for Cart {
    type Command = CartCommand;
    type Event = CartEvent;
    type Error = DomainError;

    fn apply(&mut self, event: &Self::Event) {
        match event {
            CartEvent::LineAdded(e) => {
                self.lines.push(CartLine {
                    product: e.product.clone(),
                    quantity: 1,
                });
            }
            CartEvent::QuantityUpdated(e) => {
                if let Some(line) = self
                    .lines
                    .iter_mut()
                    .find(|l| l.product.id() == e.product_id)
                {
                    line.quantity = e.quantity;
                }
            }
            CartEvent::LineRemoved(e) => {
                self.lines.retain(|l| l.product.id() != e.product_id);
            }
            CartEvent::CartCleared(_) => {
                self.lines.clear();
            }
        }

        self.recompute_totals();

        // Deterministic version tracking: +1 per applied event.
        self.version += 1;
    }

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        match command {
            CartCommand::AddItem(cmd) => self.handle_add_item(cmd),
            CartCommand::RemoveItem(cmd) => self.handle_remove_item(cmd),
            CartCommand::UpdateQuantity(cmd) => self.handle_update_quantity(cmd),
            CartCommand::ClearCart(cmd) => self.handle_clear(cmd),
        }
    }
}

impl Cart {
    fn ensure_currency(&self, price: &Money) -> Result<(), DomainError> {
        match &self.currency {
            Some(currency) if currency != price.currency() => Err(DomainError::validation(format!(
                "cart holds {currency} prices, cannot add a {} price",
                price.currency()
            ))),
            _ => Ok(()),
        }
    }

    /// Reject commands whose committed totals could not be represented.
    fn ensure_total_fits(&self, line_delta_minor: u64) -> Result<(), DomainError> {
        self.total_price_minor
            .checked_add(line_delta_minor)
            .ok_or_else(|| DomainError::validation("cart total overflow"))?;
        Ok(())
    }

    fn handle_add_item(&self, cmd: &AddItem) -> Result<Vec<CartEvent>, DomainError> {
        self.ensure_currency(cmd.product.price())?;

        match self.find_line(cmd.product.id()) {
            Some(line) => {
                let quantity = line
                    .quantity
                    .checked_add(1)
                    .ok_or_else(|| DomainError::validation("line quantity overflow"))?;
                self.ensure_total_fits(cmd.product.price().amount_minor())?;

                Ok(vec![CartEvent::QuantityUpdated(QuantityUpdated {
                    product_id: cmd.product.id(),
                    quantity,
                    occurred_at: cmd.occurred_at,
                })])
            }
            None => {
                self.ensure_total_fits(cmd.product.price().amount_minor())?;

                Ok(vec![CartEvent::LineAdded(LineAdded {
                    product: cmd.product.clone(),
                    occurred_at: cmd.occurred_at,
                })])
            }
        }
    }

    fn handle_remove_item(&self, cmd: &RemoveItem) -> Result<Vec<CartEvent>, DomainError> {
        // Removing an absent line is a defined no-op (stale UI references).
        if self.find_line(cmd.product_id).is_none() {
            return Ok(Vec::new());
        }

        Ok(vec![CartEvent::LineRemoved(LineRemoved {
            product_id: cmd.product_id,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_update_quantity(&self, cmd: &UpdateQuantity) -> Result<Vec<CartEvent>, DomainError> {
        if cmd.quantity < 1 {
            return Err(DomainError::validation(
                "quantity must be at least 1; remove the line instead",
            ));
        }

        let Some(line) = self.find_line(cmd.product_id) else {
            // Updating an absent line is a defined no-op.
            return Ok(Vec::new());
        };

        if line.quantity == cmd.quantity {
            return Ok(Vec::new());
        }

        let new_subtotal = line.product.price().checked_mul(u64::from(cmd.quantity))?;
        let remainder = self
            .total_price_minor
            .saturating_sub(line.subtotal().amount_minor());
        remainder
            .checked_add(new_subtotal.amount_minor())
            .ok_or_else(|| DomainError::validation("cart total overflow"))?;

        Ok(vec![CartEvent::QuantityUpdated(QuantityUpdated {
            product_id: cmd.product_id,
            quantity: cmd.quantity,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_clear(&self, cmd: &ClearCart) -> Result<Vec<CartEvent>, DomainError> {
        if self.lines.is_empty() {
            return Ok(Vec::new());
        }

        Ok(vec![CartEvent::CartCleared(CartCleared {
            occurred_at: cmd.occurred_at,
        })])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sookari_core::Currency;

    fn test_cart_id() -> CartId {
        CartId::new(AggregateId::new())
    }

    fn test_product(price_minor: u64) -> ProductRef {
        ProductRef::new(
            ProductId::new(AggregateId::new()),
            "Panier de légumes frais",
            "Marché Central",
            "https://example.test/legumes.jpg",
            Some("Alimentation".to_string()),
            Money::new(price_minor, Currency::new("FC").unwrap()),
            None,
        )
        .unwrap()
    }

    fn test_time() -> DateTime<Utc> {
        Utc::now()
    }

    fn add(cart: &mut Cart, product: &ProductRef) {
        let events = cart
            .handle(&CartCommand::AddItem(AddItem {
                product: product.clone(),
                occurred_at: test_time(),
            }))
            .unwrap();
        for event in &events {
            cart.apply(event);
        }
    }

    #[test]
    fn first_add_emits_line_added_with_quantity_one() {
        let cart = Cart::empty(test_cart_id());
        let product = test_product(2500);

        let events = cart
            .handle(&CartCommand::AddItem(AddItem {
                product: product.clone(),
                occurred_at: test_time(),
            }))
            .unwrap();
        assert_eq!(events.len(), 1);

        match &events[0] {
            CartEvent::LineAdded(e) => assert_eq!(e.product.id(), product.id()),
            _ => panic!("Expected LineAdded event"),
        }
    }

    #[test]
    fn re_adding_a_product_increments_its_quantity() {
        let mut cart = Cart::empty(test_cart_id());
        let product = test_product(2500);

        for _ in 0..3 {
            add(&mut cart, &product);
        }

        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.item_quantity(product.id()), 3);
        assert_eq!(cart.total_items(), 3);
        assert_eq!(cart.total_price_minor(), 7500);
    }

    #[test]
    fn lines_keep_insertion_order() {
        let mut cart = Cart::empty(test_cart_id());
        let first = test_product(100);
        let second = test_product(200);

        add(&mut cart, &first);
        add(&mut cart, &second);
        add(&mut cart, &first);

        let ids: Vec<ProductId> = cart.lines().iter().map(|l| l.product().id()).collect();
        assert_eq!(ids, vec![first.id(), second.id()]);
    }

    #[test]
    fn removing_an_absent_line_is_a_no_op() {
        let cart = Cart::empty(test_cart_id());
        let events = cart
            .handle(&CartCommand::RemoveItem(RemoveItem {
                product_id: ProductId::new(AggregateId::new()),
                occurred_at: test_time(),
            }))
            .unwrap();
        assert!(events.is_empty());
    }

    #[test]
    fn remove_then_query_yields_zero() {
        let mut cart = Cart::empty(test_cart_id());
        let product = test_product(2500);
        add(&mut cart, &product);
        add(&mut cart, &product);

        let events = cart
            .handle(&CartCommand::RemoveItem(RemoveItem {
                product_id: product.id(),
                occurred_at: test_time(),
            }))
            .unwrap();
        for event in &events {
            cart.apply(event);
        }

        assert_eq!(cart.item_quantity(product.id()), 0);
        assert_eq!(cart.total_items(), 0);
        assert_eq!(cart.total_price_minor(), 0);
    }

    #[test]
    fn update_quantity_sets_exactly_that_quantity() {
        let mut cart = Cart::empty(test_cart_id());
        let kept = test_product(2500);
        let updated = test_product(1800);
        add(&mut cart, &kept);
        add(&mut cart, &updated);

        let events = cart
            .handle(&CartCommand::UpdateQuantity(UpdateQuantity {
                product_id: updated.id(),
                quantity: 5,
                occurred_at: test_time(),
            }))
            .unwrap();
        for event in &events {
            cart.apply(event);
        }

        assert_eq!(cart.item_quantity(updated.id()), 5);
        assert_eq!(cart.item_quantity(kept.id()), 1);
        assert_eq!(cart.total_items(), 6);
    }

    #[test]
    fn update_quantity_below_one_is_rejected() {
        let mut cart = Cart::empty(test_cart_id());
        let product = test_product(2500);
        add(&mut cart, &product);

        let err = cart
            .handle(&CartCommand::UpdateQuantity(UpdateQuantity {
                product_id: product.id(),
                quantity: 0,
                occurred_at: test_time(),
            }))
            .unwrap_err();
        match err {
            DomainError::Validation(msg) if msg.contains("at least 1") => {}
            _ => panic!("Expected Validation for zero quantity"),
        }
    }

    #[test]
    fn update_quantity_for_an_absent_line_is_a_no_op() {
        let cart = Cart::empty(test_cart_id());
        let events = cart
            .handle(&CartCommand::UpdateQuantity(UpdateQuantity {
                product_id: ProductId::new(AggregateId::new()),
                quantity: 2,
                occurred_at: test_time(),
            }))
            .unwrap();
        assert!(events.is_empty());
    }

    #[test]
    fn clear_resets_lines_and_totals() {
        let mut cart = Cart::empty(test_cart_id());
        add(&mut cart, &test_product(2500));
        add(&mut cart, &test_product(1800));

        let events = cart
            .handle(&CartCommand::ClearCart(ClearCart {
                occurred_at: test_time(),
            }))
            .unwrap();
        for event in &events {
            cart.apply(event);
        }

        assert!(cart.is_empty());
        assert_eq!(cart.total_items(), 0);
        assert_eq!(cart.total_price_minor(), 0);
        assert!(cart.total_price().is_none());
    }

    #[test]
    fn clearing_an_empty_cart_emits_nothing() {
        let cart = Cart::empty(test_cart_id());
        let events = cart
            .handle(&CartCommand::ClearCart(ClearCart {
                occurred_at: test_time(),
            }))
            .unwrap();
        assert!(events.is_empty());
    }

    #[test]
    fn add_remove_add_matches_a_single_add() {
        let mut round_trip = Cart::empty(test_cart_id());
        let product = test_product(2500);

        add(&mut round_trip, &product);
        let events = round_trip
            .handle(&CartCommand::RemoveItem(RemoveItem {
                product_id: product.id(),
                occurred_at: test_time(),
            }))
            .unwrap();
        for event in &events {
            round_trip.apply(event);
        }
        add(&mut round_trip, &product);

        assert_eq!(round_trip.lines().len(), 1);
        assert_eq!(round_trip.item_quantity(product.id()), 1);
        assert_eq!(round_trip.total_items(), 1);
        assert_eq!(round_trip.total_price_minor(), 2500);
    }

    #[test]
    fn mixed_currency_add_is_rejected() {
        let mut cart = Cart::empty(test_cart_id());
        add(&mut cart, &test_product(2500));

        let foreign = ProductRef::new(
            ProductId::new(AggregateId::new()),
            "Imported",
            "Elsewhere",
            "",
            None,
            Money::new(10, Currency::new("USD").unwrap()),
            None,
        )
        .unwrap();

        let err = cart
            .handle(&CartCommand::AddItem(AddItem {
                product: foreign,
                occurred_at: test_time(),
            }))
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn scenario_two_lines_totals() {
        // [{price 2500 FC, qty 2}, {price 1800 FC, qty 1}] → 3 items, 6800 FC.
        let mut cart = Cart::empty(test_cart_id());
        let first = test_product(2500);
        let second = test_product(1800);

        add(&mut cart, &first);
        add(&mut cart, &first);
        add(&mut cart, &second);

        assert_eq!(cart.total_items(), 3);
        assert_eq!(cart.total_price_minor(), 6800);
        assert_eq!(cart.total_price().unwrap().to_string(), "6800 FC");
    }

    #[cfg(test)]
    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        fn apply_all(cart: &mut Cart, events: &[CartEvent]) {
            for event in events {
                cart.apply(event);
            }
        }

        proptest! {
            #![proptest_config(ProptestConfig {
                cases: 1000,
                ..ProptestConfig::default()
            })]

            /// Property: n adds of the same product leave one line with quantity n.
            #[test]
            fn repeated_adds_collapse_into_one_line(n in 1u32..50, price in 1u64..100_000) {
                let mut cart = Cart::empty(test_cart_id());
                let product = test_product(price);

                for _ in 0..n {
                    let events = cart
                        .handle(&CartCommand::AddItem(AddItem {
                            product: product.clone(),
                            occurred_at: test_time(),
                        }))
                        .unwrap();
                    apply_all(&mut cart, &events);
                }

                prop_assert_eq!(cart.lines().len(), 1);
                prop_assert_eq!(cart.item_quantity(product.id()), n);
                prop_assert_eq!(cart.total_items(), u64::from(n));
                prop_assert_eq!(cart.total_price_minor(), price * u64::from(n));
            }

            /// Property: handle never mutates state and is deterministic.
            #[test]
            fn handle_is_pure(price in 1u64..100_000, quantity in 1u32..100) {
                let mut cart = Cart::empty(test_cart_id());
                let product = test_product(price);
                let events = cart
                    .handle(&CartCommand::AddItem(AddItem {
                        product: product.clone(),
                        occurred_at: test_time(),
                    }))
                    .unwrap();
                apply_all(&mut cart, &events);

                let state_before = cart.clone();
                let cmd = CartCommand::UpdateQuantity(UpdateQuantity {
                    product_id: product.id(),
                    quantity,
                    occurred_at: test_time(),
                });

                let events1 = cart.handle(&cmd);
                prop_assert_eq!(&cart, &state_before);
                let events2 = cart.handle(&cmd);
                prop_assert_eq!(&cart, &state_before);
                prop_assert_eq!(events1.unwrap(), events2.unwrap());
            }

            /// Property: totals always equal the fold over the lines.
            #[test]
            fn totals_are_a_fold_of_the_lines(
                prices in proptest::collection::vec(1u64..10_000, 1..8),
                quantities in proptest::collection::vec(1u32..20, 1..8),
            ) {
                let mut cart = Cart::empty(test_cart_id());
                let products: Vec<ProductRef> =
                    prices.iter().map(|p| test_product(*p)).collect();

                for (product, &quantity) in products.iter().zip(quantities.iter()) {
                    let events = cart
                        .handle(&CartCommand::AddItem(AddItem {
                            product: product.clone(),
                            occurred_at: test_time(),
                        }))
                        .unwrap();
                    apply_all(&mut cart, &events);

                    let events = cart
                        .handle(&CartCommand::UpdateQuantity(UpdateQuantity {
                            product_id: product.id(),
                            quantity,
                            occurred_at: test_time(),
                        }))
                        .unwrap();
                    apply_all(&mut cart, &events);
                }

                let expected_items: u64 = cart
                    .lines()
                    .iter()
                    .map(|l| u64::from(l.quantity()))
                    .sum();
                let expected_price: u64 = cart
                    .lines()
                    .iter()
                    .map(|l| l.subtotal().amount_minor())
                    .sum();

                prop_assert_eq!(cart.total_items(), expected_items);
                prop_assert_eq!(cart.total_price_minor(), expected_price);
            }
        }
    }
}

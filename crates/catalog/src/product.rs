use serde::{Deserialize, Serialize};

use sookari_core::{AggregateId, DomainError, DomainResult, Money};

/// Product identifier, assigned by the catalog collaborator.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(pub AggregateId);

impl ProductId {
    pub fn new(id: AggregateId) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for ProductId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// A product reference as handed over by the catalog collaborator.
///
/// Descriptive fields are immutable once constructed; quantity and other cart
/// concerns live on the cart line, not here. `original_price` is the
/// pre-discount price shown struck through next to `price`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRef {
    id: ProductId,
    name: String,
    vendor: String,
    image: String,
    category: Option<String>,
    price: Money,
    original_price: Option<Money>,
}

impl ProductRef {
    /// Validate and construct a product reference.
    ///
    /// Name and vendor must be non-empty, and a discount's `original_price`
    /// must share the currency of `price`.
    pub fn new(
        id: ProductId,
        name: impl Into<String>,
        vendor: impl Into<String>,
        image: impl Into<String>,
        category: Option<String>,
        price: Money,
        original_price: Option<Money>,
    ) -> DomainResult<Self> {
        let name = name.into();
        let vendor = vendor.into();

        if name.trim().is_empty() {
            return Err(DomainError::validation("product name must not be empty"));
        }
        if vendor.trim().is_empty() {
            return Err(DomainError::validation("product vendor must not be empty"));
        }
        if let Some(original) = &original_price {
            if original.currency() != price.currency() {
                return Err(DomainError::validation(format!(
                    "original_price currency {} does not match price currency {}",
                    original.currency(),
                    price.currency()
                )));
            }
        }

        Ok(Self {
            id,
            name,
            vendor,
            image: image.into(),
            category,
            price,
            original_price,
        })
    }

    pub fn id(&self) -> ProductId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn vendor(&self) -> &str {
        &self.vendor
    }

    pub fn image(&self) -> &str {
        &self.image
    }

    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    pub fn price(&self) -> &Money {
        &self.price
    }

    pub fn original_price(&self) -> Option<&Money> {
        self.original_price.as_ref()
    }
}

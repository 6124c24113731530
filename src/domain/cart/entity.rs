//! Cart entities: the stored record and the assembled view

use serde::{Deserialize, Serialize};

use crate::domain::product::{Product, ProductId};
use crate::domain::user::UserId;
use crate::domain::DomainError;

/// Store-assigned cart identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CartId(i64);

impl CartId {
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for CartId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Largest quantity a single line may carry; it must fit a 32-bit signed column
pub const MAX_LINE_QUANTITY: u32 = i32::MAX as u32;

/// One line of a cart.
///
/// `product_id` is a lookup-only reference into the catalog, which lives in a
/// different store; nothing guarantees it still resolves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    product_id: ProductId,
    quantity: u32,
}

impl CartLine {
    pub fn new(product_id: ProductId, quantity: u32) -> Result<Self, DomainError> {
        if quantity == 0 {
            return Err(DomainError::validation("Quantity must be greater than zero"));
        }

        if quantity > MAX_LINE_QUANTITY {
            return Err(DomainError::validation(format!(
                "Quantity cannot exceed {}",
                MAX_LINE_QUANTITY
            )));
        }

        Ok(Self {
            product_id,
            quantity,
        })
    }

    pub fn product_id(&self) -> ProductId {
        self.product_id
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }
}

/// A cart exactly as the cart store holds it, lines in insertion order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredCart {
    pub id: CartId,
    pub user_id: UserId,
    pub lines: Vec<CartLine>,
}

/// A cart line joined with the catalog product it references
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    pub product_id: ProductId,
    pub quantity: u32,
    pub name: String,
    pub price: f64,
}

impl CartItem {
    pub fn resolved(line: CartLine, product: &Product) -> Self {
        Self {
            product_id: line.product_id(),
            quantity: line.quantity(),
            name: product.name().to_string(),
            price: product.price(),
        }
    }

    pub fn subtotal(&self) -> f64 {
        self.price * f64::from(self.quantity)
    }
}

/// Composite cart view returned to callers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cart {
    pub user_id: UserId,
    pub items: Vec<CartItem>,
}

impl Cart {
    pub fn total(&self) -> f64 {
        self.items.iter().map(CartItem::subtotal).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

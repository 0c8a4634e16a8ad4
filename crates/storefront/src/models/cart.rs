//! Session-scoped shopping cart.
//!
//! The cart is a plain value stored in the visitor's session: every
//! mutation loads it, applies one of the laws below, and writes it back.
//! Lines are keyed by `{product_id}-{size}-{color}`, while the stock
//! ceiling counts across a product variant (`product_id` + `variant_key`),
//! which is the same pair under a different name.
//!
//! `max_stock` is the stock snapshot taken when the line was added. It is
//! deliberately not re-checked against the store at checkout.

use amara_core::{Money, ProductId, VariantKey};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One line of the cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    /// Line identity: `{product_id}-{size}-{color}`.
    pub id: String,
    pub product_id: ProductId,
    pub variant_key: VariantKey,
    pub name: String,
    /// Unit price at the time the line was added.
    pub price: Decimal,
    pub image: Option<String>,
    pub size: String,
    pub color: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color_hex: Option<String>,
    pub quantity: u32,
    /// Stock on hand when the line was added; quantity ceiling for this
    /// variant.
    pub max_stock: u32,
}

impl CartLine {
    /// Derive the line identity for a product/size/color combination.
    #[must_use]
    pub fn line_id(product_id: &ProductId, size: &str, color: &str) -> String {
        format!("{product_id}-{size}-{color}")
    }

    /// Price of the whole line.
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }
}

/// Everything needed to add a line except the quantity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineInput {
    pub product_id: ProductId,
    pub variant_key: VariantKey,
    pub name: String,
    pub price: Decimal,
    pub image: Option<String>,
    pub size: String,
    pub color: String,
    #[serde(default)]
    pub color_hex: Option<String>,
    pub max_stock: u32,
}

impl CartLineInput {
    fn into_line(self, quantity: u32) -> CartLine {
        let id = CartLine::line_id(&self.product_id, &self.size, &self.color);
        CartLine {
            id,
            product_id: self.product_id,
            variant_key: self.variant_key,
            name: self.name,
            price: self.price,
            image: self.image,
            size: self.size,
            color: self.color,
            color_hex: self.color_hex,
            quantity,
            max_stock: self.max_stock,
        }
    }
}

/// The cart itself: an ordered list of lines.
///
/// Serializes transparently as a JSON array, which is also the session
/// storage format.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Quantity already in the cart for a product variant, across however
    /// many lines share it.
    #[must_use]
    pub fn item_quantity(&self, product_id: &ProductId, variant_key: &VariantKey) -> u32 {
        self.lines
            .iter()
            .filter(|line| &line.product_id == product_id && &line.variant_key == variant_key)
            .map(|line| line.quantity)
            .sum()
    }

    /// Add `quantity` units of a line.
    ///
    /// Fails without mutating anything if the variant's total would exceed
    /// the `max_stock` ceiling carried by the input. An existing line with
    /// the same identity has its quantity incremented; otherwise the line
    /// is appended.
    pub fn add_line(&mut self, input: CartLineInput, quantity: u32) -> bool {
        let current = self.item_quantity(&input.product_id, &input.variant_key);
        match current.checked_add(quantity) {
            Some(total) if total <= input.max_stock => {}
            _ => return false,
        }

        let id = CartLine::line_id(&input.product_id, &input.size, &input.color);
        if let Some(existing) = self.lines.iter_mut().find(|line| line.id == id) {
            existing.quantity += quantity;
        } else {
            self.lines.push(input.into_line(quantity));
        }
        true
    }

    /// Remove a line by identity. Removing an absent line is a no-op.
    pub fn remove_line(&mut self, id: &str) {
        self.lines.retain(|line| line.id != id);
    }

    /// Set a line's quantity.
    ///
    /// Zero removes the line and succeeds. A missing line or a quantity
    /// above the line's `max_stock` fails and leaves the quantity as it
    /// was.
    pub fn update_quantity(&mut self, id: &str, quantity: u32) -> bool {
        if quantity < 1 {
            self.remove_line(id);
            return true;
        }

        let Some(line) = self.lines.iter_mut().find(|line| line.id == id) else {
            return false;
        };
        if quantity > line.max_stock {
            return false;
        }

        line.quantity = quantity;
        true
    }

    /// Empty the cart.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Total units across all lines.
    #[must_use]
    pub fn total_items(&self) -> u32 {
        self.lines.iter().map(|line| line.quantity).sum()
    }

    /// Sum of quantity times unit price over all lines.
    #[must_use]
    pub fn total_price(&self) -> Decimal {
        self.lines.iter().map(CartLine::subtotal).sum()
    }

    /// Cart total as display money.
    #[must_use]
    pub fn total(&self) -> Money {
        Money::shillings(self.total_price())
    }
}

//! Domain models for the storefront.

pub mod cart;
pub mod session;

pub use cart::{Cart, CartLine, CartLineInput};

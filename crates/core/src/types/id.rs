//! Newtype IDs for type-safe entity references.
//!
//! Use the `define_id!` macro to create type-safe ID wrappers that prevent
//! accidentally mixing IDs from different entity types.

/// Macro to define a type-safe ID wrapper.
///
/// Content-store documents are keyed by opaque string IDs, so every ID is a
/// newtype around `String` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`, `PartialOrd`, `Ord`
/// - Conversion methods: `new()`, `as_str()`, `into_inner()`
/// - `From<String>`, `From<&str>`, and `AsRef<str>` implementations
///
/// # Example
///
/// ```rust
/// # use amara_core::define_id;
/// define_id!(DocumentId);
/// define_id!(AssetId);
///
/// let doc_id = DocumentId::new("product-girls-denim-jacket");
/// let asset_id = AssetId::new("image-4f2a");
///
/// // These are different types, so this won't compile:
/// // let _: DocumentId = asset_id;
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new ID from a string value.
            #[must_use]
            pub fn new(id: impl ::core::convert::Into<String>) -> Self {
                Self(id.into())
            }

            /// Get the underlying string value.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the ID and return its inner string.
            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl ::core::convert::From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl ::core::convert::From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }

        impl ::core::convert::From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl ::core::convert::AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

// Define standard entity IDs
define_id!(ProductId);
define_id!(CategoryId);
define_id!(PromotionId);
define_id!(NewsletterId);

// A variant has no document of its own; it is keyed within its product.
define_id!(VariantKey);

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_new_and_as_str() {
        let id = ProductId::new("prod-123");
        assert_eq!(id.as_str(), "prod-123");
    }

    #[test]
    fn test_display() {
        let id = NewsletterId::new("nl-2024-06");
        assert_eq!(format!("{id}"), "nl-2024-06");
    }

    #[test]
    fn test_from_conversions() {
        let id: ProductId = "prod-123".into();
        let back: String = id.clone().into();
        assert_eq!(back, "prod-123");
        assert_eq!(id, ProductId::from("prod-123".to_owned()));
    }

    #[test]
    fn test_serde_transparent() {
        let id = VariantKey::new("a1b2c3");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"a1b2c3\"");

        let parsed: VariantKey = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, id);
    }
}

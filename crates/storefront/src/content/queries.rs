//! Stored GROQ projections.
//!
//! Each query pins the exact attribute set the storefront depends on, with
//! references dereferenced server-side (`category->name`) so responses are
//! flat. Parameterized queries use `$name` placeholders that the client
//! passes as JSON-encoded URL parameters.

pub const PRODUCTS: &str = r#"*[_type == "product"] | order(name asc) {
  _id,
  name,
  "slug": slug.current,
  price,
  "category": category->name,
  "categorySlug": category->slug.current,
  image,
  description,
  featured,
  variants[]{
    _key,
    size,
    color,
    colorHex,
    stock
  }
}"#;

pub const PRODUCT_BY_SLUG: &str = r#"*[_type == "product" && slug.current == $slug][0] {
  _id,
  name,
  "slug": slug.current,
  price,
  "category": category->name,
  "categorySlug": category->slug.current,
  image,
  description,
  featured,
  variants[]{
    _key,
    size,
    color,
    colorHex,
    stock
  }
}"#;

/// Variants array of a single product, fetched immediately before a stock
/// write so the read-modify-write window stays as small as it can be.
pub const PRODUCT_VARIANTS: &str =
    r#"*[_type == "product" && _id == $productId][0] { variants }"#;

pub const CATEGORIES: &str = r#"*[_type == "category"] | order(order asc) {
  _id,
  name,
  "slug": slug.current,
  order
}"#;

pub const HERO_IMAGES: &str = r#"*[_type == "heroImage"] | order(order asc) {
  _id,
  image,
  alt,
  order
}"#;

pub const SERVICES: &str = r#"*[_type == "service"] | order(order asc) {
  _id,
  title,
  description,
  icon,
  features,
  order
}"#;

pub const MOCKUPS: &str = r#"*[_type == "mockup"] | order(order asc) {
  _id,
  image,
  alt,
  startingPrice,
  priceNote,
  order
}"#;

pub const CORE_VALUES: &str = r#"*[_type == "coreValue"] | order(order asc) {
  _id,
  title,
  description,
  icon,
  order
}"#;

pub const SITE_SETTINGS: &str = r#"*[_type == "siteSettings"][0] {
  companyName,
  tagline,
  logo,
  mission,
  vision,
  contactEmail,
  secondaryEmail,
  contactPhone,
  address,
  socialLinks
}"#;

/// Promotions already narrowed to the current date window and sorted so the
/// soonest-ending one comes first; recurrence is evaluated by the caller.
pub const PROMOTIONS: &str = r#"*[_type == "promotion" && isActive == true && startDate <= now() && endDate >= now()] | order(endDate asc) {
  _id,
  title,
  code,
  description,
  displayMessage,
  discountType,
  discountValue,
  minimumSpend,
  giftDescription,
  periodType,
  recurrencePattern,
  recurrenceDays,
  startDate,
  endDate,
  bannerColor,
  textColor,
  "applicableProducts": applicableProducts[]->_id,
  "applicableCategories": applicableCategories[]->name
}"#;

pub const CORPORATE_DISCOUNTS: &str = r#"*[_type == "corporateDiscount" && isActive == true] | order(displayOrder asc, minQuantity asc) {
  _id,
  title,
  displayMessage,
  description,
  minQuantity,
  maxQuantity,
  discountPercentage,
  highlightColor,
  "applicableCategories": applicableCategories[]->name
}"#;

pub const CORPORATE_PRICING: &str = r#"*[_type == "corporatePricing"] | order(displayOrder asc) {
  _id,
  productName,
  startingPrice,
  priceNote,
  description,
  image,
  isPopular
}"#;

pub const NEWSLETTER_BY_ID: &str = r#"*[_type == "newsletter" && _id == $id][0] {
  _id,
  subject,
  preheaderText,
  body,
  status
}"#;

pub const ACTIVE_SUBSCRIBERS: &str =
    r#"*[_type == "subscriber" && isActive == true] { email, name }"#;

/// Cheap indexed lookup used by the readiness probe.
pub const PING: &str = r#"*[_id == "ping"][0]"#;

//! Skawsh Coupons
//!
//! Coupon administration for the Skawsh laundry marketplace: authoring and
//! validating coupons, deciding whether a coupon applies to a cart, and
//! splitting the collection into live coupons and the archive.

pub mod banners;
pub mod checkout;
pub mod clock;
pub mod coupons;
pub mod eligibility;
pub mod fixtures;
pub mod guard;
pub mod partition;
pub mod prelude;
pub mod service;
pub mod store;
pub mod uuids;

//! Coupon Store
//!
//! The console's single source of truth: an ordered collection of coupons,
//! newest first. Nothing is ever removed; deletion only retires a coupon.

use thiserror::Error;
use tracing::info;

use crate::{
    coupons::{Coupon, CouponId, CouponStatus},
    partition::is_historical,
};

/// Store errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum StoreError {
    /// No coupon has this identifier
    #[error("coupon {0} not found")]
    NotFound(CouponId),
}

/// What an upsert did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upserted {
    /// Inserted at the front
    Created,

    /// Replaced in place
    Updated,
}

impl Upserted {
    /// Past-tense verb for operator output.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Updated => "updated",
        }
    }
}

/// Ordered in-memory coupon collection.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CouponStore {
    coupons: Vec<Coupon>,
}

impl CouponStore {
    /// Create an empty store.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            coupons: Vec::new(),
        }
    }

    /// Create a store holding `coupons` in the given order.
    #[must_use]
    pub const fn with_coupons(coupons: Vec<Coupon>) -> Self {
        Self { coupons }
    }

    /// Snapshot of every coupon, newest first.
    #[must_use]
    pub fn list(&self) -> Vec<Coupon> {
        self.coupons.clone()
    }

    /// Borrow the collection.
    #[must_use]
    pub fn as_slice(&self) -> &[Coupon] {
        &self.coupons
    }

    /// Number of coupons, retired ones included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.coupons.len()
    }

    /// Whether the store holds no coupons.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.coupons.is_empty()
    }

    /// Look a coupon up by identifier.
    #[must_use]
    pub fn get(&self, id: CouponId) -> Option<&Coupon> {
        self.coupons.iter().find(|coupon| coupon.id == id)
    }

    /// Look a coupon up by code, ignoring case.
    ///
    /// Retired coupons may share a code with a live one; the live one wins.
    #[must_use]
    pub fn find_by_code(&self, code: &str) -> Option<&Coupon> {
        let code = code.trim();
        let mut matching = self
            .coupons
            .iter()
            .filter(|coupon| coupon.code.eq_ignore_ascii_case(code));

        let first = matching.next()?;

        if !is_historical(first) {
            return Some(first);
        }

        matching.find(|coupon| !is_historical(coupon)).or(Some(first))
    }

    /// Replace the coupon with the same identifier, or insert at the front.
    pub fn upsert(&mut self, coupon: Coupon) -> Upserted {
        if let Some(slot) = self.coupons.iter_mut().find(|c| c.id == coupon.id) {
            info!(coupon_id = %coupon.id, code = %coupon.code, "updated coupon");

            *slot = coupon;

            return Upserted::Updated;
        }

        info!(coupon_id = %coupon.id, code = %coupon.code, "created coupon");

        self.coupons.insert(0, coupon);

        Upserted::Created
    }

    /// Retire a coupon by marking it inactive. Its record stays in place.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if no coupon has `id`.
    pub fn soft_delete(&mut self, id: CouponId) -> Result<&Coupon, StoreError> {
        let coupon = self.get_mut(id)?;

        coupon.status = CouponStatus::Inactive;

        info!(coupon_id = %id, code = %coupon.code, "deactivated coupon");

        Ok(coupon)
    }

    /// Set a coupon's banner, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if no coupon has `id`.
    pub fn attach_banner(&mut self, id: CouponId, banner_url: String) -> Result<&Coupon, StoreError> {
        let coupon = self.get_mut(id)?;

        coupon.banner_url = Some(banner_url);

        info!(coupon_id = %id, code = %coupon.code, "attached banner");

        Ok(coupon)
    }

    fn get_mut(&mut self, id: CouponId) -> Result<&mut Coupon, StoreError> {
        self.coupons
            .iter_mut()
            .find(|coupon| coupon.id == id)
            .ok_or(StoreError::NotFound(id))
    }
}

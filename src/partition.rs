//! Partitioning
//!
//! Splits the coupon collection into the coupons still under management and
//! the historical archive. The list view and the history view both read
//! through [`is_historical`], so a coupon can never show up in both or in
//! neither.

use std::fmt;

use crate::coupons::{Coupon, CouponCategory, CouponStatus};

/// Whether a coupon belongs in the archive.
///
/// A coupon is historical if its status is expired or inactive, or if it has
/// a positive usage limit and has reached it, whatever its status says.
#[must_use]
pub const fn is_historical(coupon: &Coupon) -> bool {
    coupon.status.is_retired() || coupon.is_exhausted()
}

/// The two buckets, each in collection order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Partition<'a> {
    /// Coupons still under management
    pub active: Vec<&'a Coupon>,

    /// Archived coupons
    pub historical: Vec<&'a Coupon>,
}

/// Split `coupons` into active and historical buckets.
///
/// Stable and total: every coupon lands in exactly one bucket and relative
/// order is kept. Nothing is cached, so call it again after any change.
pub fn partition(coupons: &[Coupon]) -> Partition<'_> {
    let (historical, active) = coupons.iter().partition(|coupon| is_historical(coupon));

    Partition { active, historical }
}

/// Filters the list view applies within the active bucket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListFilter {
    /// Only coupons with this status
    pub status: Option<CouponStatus>,

    /// Only coupons in this category
    pub category: Option<CouponCategory>,
}

impl ListFilter {
    /// Whether `coupon` passes the filter.
    #[must_use]
    pub fn matches(&self, coupon: &Coupon) -> bool {
        self.status.is_none_or(|status| coupon.status == status)
            && self.category.is_none_or(|category| coupon.category == category)
    }
}

/// The list view: active coupons passing `filter`.
pub fn active_view<'a>(coupons: &'a [Coupon], filter: &ListFilter) -> Vec<&'a Coupon> {
    partition(coupons)
        .active
        .into_iter()
        .filter(|coupon| filter.matches(coupon))
        .collect()
}

/// Why a coupon is in the archive, for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HistoryReason {
    /// Status is expired
    Expired,

    /// Status is inactive
    Inactive,

    /// Usage limit reached
    LimitReached,

    /// None of the above
    Unknown,
}

impl HistoryReason {
    /// Label shown in the history table.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Expired => "Expired",
            Self::Inactive => "Deactivated",
            Self::LimitReached => "Limit Reached",
            Self::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for HistoryReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The first matching reason, checked as expired, inactive, limit reached.
#[must_use]
pub const fn history_reason(coupon: &Coupon) -> HistoryReason {
    match coupon.status {
        CouponStatus::Expired => HistoryReason::Expired,
        CouponStatus::Inactive => HistoryReason::Inactive,
        CouponStatus::Draft | CouponStatus::Active if coupon.is_exhausted() => {
            HistoryReason::LimitReached
        }
        CouponStatus::Draft | CouponStatus::Active => HistoryReason::Unknown,
    }
}

/// An archived coupon with the reason it was archived.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    /// The archived coupon
    pub coupon: Coupon,

    /// Why it is archived
    pub reason: HistoryReason,
}

/// The history view: every historical coupon with its reason, unfiltered.
pub fn history_view(coupons: &[Coupon]) -> Vec<HistoryEntry> {
    partition(coupons)
        .historical
        .into_iter()
        .map(|coupon| HistoryEntry {
            coupon: coupon.clone(),
            reason: history_reason(coupon),
        })
        .collect()
}

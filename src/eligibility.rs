//! Eligibility
//!
//! Decides whether a coupon can be applied to a cart and, if so, how much it
//! takes off. Checks run in a fixed order and stop at the first failure:
//!
//! 1. minimum cart value
//! 2. end date
//! 3. status
//!
//! Usage limits are not consulted here; exhausted coupons are
//! kept out of circulation by [`partition`](crate::partition) instead.

use std::fmt;

use jiff::civil::DateTime;
use rust_decimal::Decimal;
use thiserror::Error;
use tracing::debug;

use crate::coupons::{Coupon, CouponCategory, CouponStatus, DiscountType};

/// Whether a minimum applies to the service or to the whole order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MinimumScope {
    /// Service-based coupons set a minimum service value
    Service,

    /// Every other category sets a minimum order value
    Order,
}

impl MinimumScope {
    /// Scope of a category's minimum.
    #[must_use]
    pub const fn for_category(category: CouponCategory) -> Self {
        match category {
            CouponCategory::ServiceBased => Self::Service,
            CouponCategory::FirstLogin | CouponCategory::OrderBased | CouponCategory::StudioBased => {
                Self::Order
            }
        }
    }
}

impl fmt::Display for MinimumScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Service => "Service",
            Self::Order => "Order",
        })
    }
}

/// Reasons a coupon cannot be applied.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EligibilityError {
    /// The cart is below the coupon's minimum value
    #[error("Min {scope} value of {required} required")]
    BelowMinimum {
        /// The coupon's minimum
        required: Decimal,

        /// Whether the minimum is on the service or the order
        scope: MinimumScope,
    },

    /// The coupon's end date has passed
    #[error("This coupon has expired")]
    Expired {
        /// When the coupon ended
        ended: DateTime,
    },

    /// The coupon has been retired by status
    #[error("This coupon is currently inactive")]
    Inactive {
        /// The retiring status
        status: CouponStatus,
    },

    /// The discount could not be represented
    #[error("discount calculation overflowed")]
    Arithmetic,
}

/// What the calculation needs to know about the cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CartContext {
    /// Cart value before any discount
    pub cart_total: Decimal,

    /// Wall-clock time in the marketplace's zone
    pub now: DateTime,
}

impl CartContext {
    /// Create a new cart context.
    #[must_use]
    pub const fn new(cart_total: Decimal, now: DateTime) -> Self {
        Self { cart_total, now }
    }
}

/// A successfully applied coupon.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedCoupon {
    /// Code shown on the receipt
    pub code: String,

    /// Whole-currency-unit discount
    pub discount: Decimal,
}

/// Decide whether `coupon` applies to the cart and compute the discount.
///
/// A flat discount is not capped at the cart total, so the result may exceed
/// it. The discount is floored to whole currency units.
///
/// # Errors
///
/// - [`EligibilityError::BelowMinimum`]: the cart is under a positive minimum.
/// - [`EligibilityError::Expired`]: the end date is before `cart.now`.
/// - [`EligibilityError::Inactive`]: the status is expired or inactive.
/// - [`EligibilityError::Arithmetic`]: the percentage overflowed.
pub fn evaluate(coupon: &Coupon, cart: &CartContext) -> Result<AppliedCoupon, EligibilityError> {
    let result = check(coupon, cart).and_then(|()| discount_for(coupon, cart.cart_total));

    match &result {
        Ok(discount) => debug!(code = %coupon.code, %discount, "coupon applies"),
        Err(reason) => debug!(code = %coupon.code, %reason, "coupon rejected"),
    }

    Ok(AppliedCoupon {
        code: coupon.code.clone(),
        discount: result?,
    })
}

fn check(coupon: &Coupon, cart: &CartContext) -> Result<(), EligibilityError> {
    if coupon.min_order_value > Decimal::ZERO && cart.cart_total < coupon.min_order_value {
        return Err(EligibilityError::BelowMinimum {
            required: coupon.min_order_value,
            scope: MinimumScope::for_category(coupon.category),
        });
    }

    if let Some(ended) = coupon.end_date.filter(|end| *end < cart.now) {
        return Err(EligibilityError::Expired { ended });
    }

    if coupon.status.is_retired() {
        return Err(EligibilityError::Inactive {
            status: coupon.status,
        });
    }

    Ok(())
}

/// The floored discount `coupon` gives on `cart_total`, ignoring eligibility.
///
/// # Errors
///
/// Returns [`EligibilityError::Arithmetic`] if the percentage overflows.
pub fn discount_for(coupon: &Coupon, cart_total: Decimal) -> Result<Decimal, EligibilityError> {
    let raw = match coupon.discount_type {
        DiscountType::Percentage => {
            let raw = cart_total
                .checked_mul(coupon.discount_value)
                .and_then(|product| product.checked_div(Decimal::ONE_HUNDRED))
                .ok_or(EligibilityError::Arithmetic)?;

            coupon.discount_cap().map_or(raw, |cap| raw.min(cap))
        }
        DiscountType::Flat => coupon.discount_value,
    };

    Ok(raw.floor())
}

#[cfg(test)]
mod tests {
    use jiff::civil::date;
    use testresult::TestResult;

    use crate::coupons::{AudienceType, CouponId};

    use super::*;

    fn now() -> DateTime {
        date(2024, 6, 15).at(12, 0, 0, 0)
    }

    fn coupon(discount_type: DiscountType, value: i64) -> Coupon {
        Coupon {
            id: CouponId::new(),
            code: "TEST-1".to_string(),
            title: "Test".to_string(),
            description: String::new(),
            category: CouponCategory::OrderBased,
            discount_type,
            discount_value: Decimal::from(value),
            max_discount: None,
            start_date: None,
            end_date: Some(date(2024, 12, 31).at(0, 0, 0, 0)),
            usage_count: 0,
            usage_limit: 100,
            status: CouponStatus::Active,
            audience: AudienceType::All,
            studio_name: None,
            service_name: None,
            min_order_value: Decimal::ZERO,
            terms: String::new(),
            max_uses_per_user: 1,
            is_first_login: false,
            allow_stacking: false,
            banner_url: None,
        }
    }

    fn cart(total: i64) -> CartContext {
        CartContext::new(Decimal::from(total), now())
    }

    #[test]
    fn percentage_is_capped_by_max_discount() -> TestResult {
        let mut c = coupon(DiscountType::Percentage, 20);
        c.max_discount = Some(Decimal::from(200));

        let applied = evaluate(&c, &cart(2000))?;

        assert_eq!(applied.discount, Decimal::from(200));
        assert_eq!(applied.code, "TEST-1");

        Ok(())
    }

    #[test]
    fn zero_cap_means_uncapped() -> TestResult {
        let mut c = coupon(DiscountType::Percentage, 20);
        c.max_discount = Some(Decimal::ZERO);

        assert_eq!(evaluate(&c, &cart(2000))?.discount, Decimal::from(400));

        Ok(())
    }

    #[test]
    fn percentage_is_floored() -> TestResult {
        let c = coupon(DiscountType::Percentage, 10);

        assert_eq!(evaluate(&c, &cart(377))?.discount, Decimal::from(37));

        Ok(())
    }

    #[test]
    fn flat_discount_may_exceed_cart_total() -> TestResult {
        let c = coupon(DiscountType::Flat, 500);

        assert_eq!(evaluate(&c, &cart(100))?.discount, Decimal::from(500));

        Ok(())
    }

    #[test]
    fn flat_discount_is_floored() -> TestResult {
        let mut c = coupon(DiscountType::Flat, 0);
        c.discount_value = Decimal::new(4999, 2);

        assert_eq!(evaluate(&c, &cart(377))?.discount, Decimal::from(49));

        Ok(())
    }

    #[test]
    fn minimum_scope_follows_category() {
        let mut c = coupon(DiscountType::Flat, 50);
        c.min_order_value = Decimal::from(300);
        c.category = CouponCategory::ServiceBased;

        assert_eq!(
            evaluate(&c, &cart(250)),
            Err(EligibilityError::BelowMinimum {
                required: Decimal::from(300),
                scope: MinimumScope::Service,
            })
        );

        c.category = CouponCategory::StudioBased;

        assert!(matches!(
            evaluate(&c, &cart(250)),
            Err(EligibilityError::BelowMinimum {
                scope: MinimumScope::Order,
                ..
            })
        ));
    }

    #[test]
    fn meeting_the_minimum_exactly_is_enough() -> TestResult {
        let mut c = coupon(DiscountType::Flat, 75);
        c.min_order_value = Decimal::from(399);

        assert_eq!(evaluate(&c, &cart(399))?.discount, Decimal::from(75));

        Ok(())
    }

    #[test]
    fn minimum_is_checked_before_expiry_and_status() {
        let mut c = coupon(DiscountType::Flat, 50);
        c.min_order_value = Decimal::from(300);
        c.end_date = Some(date(2020, 1, 1).at(0, 0, 0, 0));
        c.status = CouponStatus::Inactive;

        assert!(matches!(
            evaluate(&c, &cart(250)),
            Err(EligibilityError::BelowMinimum { .. })
        ));
    }

    #[test]
    fn expiry_is_checked_before_status() {
        let mut c = coupon(DiscountType::Flat, 50);
        c.end_date = Some(date(2024, 6, 15).at(11, 59, 0, 0));
        c.status = CouponStatus::Expired;

        assert!(matches!(
            evaluate(&c, &cart(1000)),
            Err(EligibilityError::Expired { .. })
        ));
    }

    #[test]
    fn retired_statuses_are_inactive() {
        for status in [CouponStatus::Expired, CouponStatus::Inactive] {
            let mut c = coupon(DiscountType::Flat, 50);
            c.status = status;

            assert_eq!(
                evaluate(&c, &cart(1000)),
                Err(EligibilityError::Inactive { status })
            );
        }
    }

    #[test]
    fn drafts_and_open_ended_coupons_apply() -> TestResult {
        let mut c = coupon(DiscountType::Flat, 50);
        c.status = CouponStatus::Draft;
        c.end_date = None;

        assert_eq!(evaluate(&c, &cart(10))?.discount, Decimal::from(50));

        Ok(())
    }

    #[test]
    fn exhausted_coupons_still_evaluate() -> TestResult {
        let mut c = coupon(DiscountType::Flat, 50);
        c.usage_count = 100;

        assert_eq!(evaluate(&c, &cart(377))?.discount, Decimal::from(50));

        Ok(())
    }

    #[test]
    fn overflow_is_reported() {
        let mut c = coupon(DiscountType::Percentage, 0);
        c.discount_value = Decimal::MAX;

        assert_eq!(
            discount_for(&c, Decimal::MAX),
            Err(EligibilityError::Arithmetic)
        );
    }

    #[test]
    fn error_messages_match_console_notices() {
        let below = EligibilityError::BelowMinimum {
            required: Decimal::from(300),
            scope: MinimumScope::Service,
        };

        assert_eq!(below.to_string(), "Min Service value of 300 required");
    }
}

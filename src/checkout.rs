//! Checkout Preview
//!
//! The cart shown in the wizard's mobile preview. It holds at most one
//! coupon: applying another one replaces it.

use std::fmt;

use jiff::civil::DateTime;
use rust_decimal::{Decimal, prelude::ToPrimitive};
use rusty_money::{Money, iso};

use crate::{
    coupons::{Coupon, DiscountType, form::CouponFormData},
    eligibility::{AppliedCoupon, CartContext, EligibilityError, evaluate},
};

/// Cart total used by the console's preview.
pub const PREVIEW_CART_TOTAL: Decimal = Decimal::from_parts(377, 0, 0, false, 0);

/// Format an amount in rupees.
///
/// Amounts too large for minor units fall back to a plain decimal.
#[must_use]
pub fn format_inr(amount: Decimal) -> String {
    amount
        .checked_mul(Decimal::ONE_HUNDRED)
        .and_then(|minor| minor.round().to_i64())
        .map_or_else(
            || format!("{amount} INR"),
            |minor| Money::from_minor(minor, iso::INR).to_string(),
        )
}

/// A cart with an optional applied coupon.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartPreview {
    total: Decimal,
    applied: Option<AppliedCoupon>,
}

impl Default for CartPreview {
    fn default() -> Self {
        Self::new(PREVIEW_CART_TOTAL)
    }
}

impl CartPreview {
    /// Create a cart with nothing applied.
    #[must_use]
    pub const fn new(total: Decimal) -> Self {
        Self {
            total,
            applied: None,
        }
    }

    /// Create a cart holding a coupon that was already evaluated against
    /// `total`.
    #[must_use]
    pub const fn with_applied(total: Decimal, applied: AppliedCoupon) -> Self {
        Self {
            total,
            applied: Some(applied),
        }
    }

    /// Cart value before discount.
    #[must_use]
    pub const fn total(&self) -> Decimal {
        self.total
    }

    /// The coupon currently applied.
    #[must_use]
    pub const fn applied(&self) -> Option<&AppliedCoupon> {
        self.applied.as_ref()
    }

    /// Apply `coupon`, replacing any coupon already applied.
    ///
    /// Returns the coupon that was replaced. A rejected coupon leaves the cart
    /// exactly as it was.
    ///
    /// # Errors
    ///
    /// Returns the [`EligibilityError`] from [`evaluate`].
    pub fn apply(
        &mut self,
        coupon: &Coupon,
        now: DateTime,
    ) -> Result<Option<AppliedCoupon>, EligibilityError> {
        let applied = evaluate(coupon, &CartContext::new(self.total, now))?;

        Ok(self.applied.replace(applied))
    }

    /// Take the applied coupon off the cart.
    pub fn remove(&mut self) -> Option<AppliedCoupon> {
        self.applied.take()
    }

    /// Discount from the applied coupon, zero if none.
    #[must_use]
    pub fn discount(&self) -> Decimal {
        self.applied
            .as_ref()
            .map_or(Decimal::ZERO, |applied| applied.discount)
    }

    /// What the customer pays. Not clamped: a flat coupon larger than the
    /// cart produces a negative amount.
    #[must_use]
    pub fn payable(&self) -> Decimal {
        self.total.saturating_sub(self.discount())
    }

    /// Whether the discount exceeds the cart total.
    #[must_use]
    pub fn is_overdrawn(&self) -> bool {
        self.payable() < Decimal::ZERO
    }

    /// Bill summary for display.
    #[must_use]
    pub fn receipt(&self) -> Receipt {
        Receipt {
            item_total: format_inr(self.total),
            coupon: self
                .applied
                .as_ref()
                .map(|applied| (applied.code.clone(), format_inr(applied.discount))),
            to_pay: format_inr(self.payable()),
        }
    }
}

/// Formatted bill summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Receipt {
    /// Cart total
    pub item_total: String,

    /// Applied code and its discount
    pub coupon: Option<(String, String)>,

    /// Amount payable
    pub to_pay: String,
}

impl fmt::Display for Receipt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Item Total: {}", self.item_total)?;

        if let Some((code, discount)) = &self.coupon {
            writeln!(f, "Coupon ({code}): -{discount}")?;
        }

        write!(f, "To Pay: {}", self.to_pay)
    }
}

/// The extra offers listed under the draft in the preview.
#[must_use]
pub fn sample_offers() -> [Coupon; 2] {
    let flat = CouponFormData {
        code: "FLAT75".to_string(),
        title: "Get Flat Rs. 75 off".to_string(),
        min_order_value: Decimal::from(399),
        discount_type: DiscountType::Flat,
        discount_value: Decimal::from(75),
        ..CouponFormData::default()
    };

    let special = CouponFormData {
        code: "SPECIAL30".to_string(),
        title: "Monsoon Special Offer".to_string(),
        discount_type: DiscountType::Percentage,
        discount_value: Decimal::from(30),
        max_discount: Decimal::from(150),
        ..CouponFormData::default()
    };

    [flat.preview_coupon(), special.preview_coupon()]
}

#[cfg(test)]
mod tests {
    use jiff::civil::date;
    use testresult::TestResult;

    use super::*;

    fn now() -> DateTime {
        date(2024, 6, 15).at(9, 0, 0, 0)
    }

    fn flat(code: &str, value: i64) -> Coupon {
        CouponFormData {
            code: code.to_string(),
            title: code.to_string(),
            discount_value: Decimal::from(value),
            ..CouponFormData::default()
        }
        .preview_coupon()
    }

    #[test]
    fn format_inr_falls_back_for_huge_amounts() {
        assert!(format_inr(Decimal::MAX).ends_with(" INR"));
        assert!(format_inr(Decimal::from(50)).contains("50"));
    }

    #[test]
    fn default_cart_uses_preview_total() {
        assert_eq!(CartPreview::default().total(), Decimal::from(377));
    }

    #[test]
    fn flat_fifty_leaves_three_twenty_seven() -> TestResult {
        let mut cart = CartPreview::default();

        let replaced = cart.apply(&flat("FLAT50", 50), now())?;

        assert_eq!(replaced, None);
        assert_eq!(cart.discount(), Decimal::from(50));
        assert_eq!(cart.payable(), Decimal::from(327));

        Ok(())
    }

    #[test]
    fn applying_again_supersedes() -> TestResult {
        let mut cart = CartPreview::default();

        cart.apply(&flat("FIRST", 10), now())?;
        let replaced = cart.apply(&flat("SECOND", 20), now())?;

        assert_eq!(replaced.map(|r| r.code), Some("FIRST".to_string()));
        assert_eq!(cart.applied().map(|a| a.code.as_str()), Some("SECOND"));
        assert_eq!(cart.payable(), Decimal::from(357));

        Ok(())
    }

    #[test]
    fn rejected_coupon_keeps_previous_one() -> TestResult {
        let mut cart = CartPreview::default();
        cart.apply(&flat("KEEP", 10), now())?;

        let [flat75, _] = sample_offers();

        assert!(cart.apply(&flat75, now()).is_err());
        assert_eq!(cart.applied().map(|a| a.code.as_str()), Some("KEEP"));

        Ok(())
    }

    #[test]
    fn remove_clears_discount() -> TestResult {
        let mut cart = CartPreview::default();
        cart.apply(&flat("GONE", 10), now())?;

        assert!(cart.remove().is_some());
        assert_eq!(cart.payable(), cart.total());
        assert!(cart.remove().is_none());

        Ok(())
    }

    #[test]
    fn oversized_flat_discount_overdraws() -> TestResult {
        let mut cart = CartPreview::new(Decimal::from(40));
        cart.apply(&flat("BIG", 50), now())?;

        assert_eq!(cart.payable(), Decimal::from(-10));
        assert!(cart.is_overdrawn());

        Ok(())
    }

    #[test]
    fn special_thirty_is_capped() -> TestResult {
        let mut cart = CartPreview::new(Decimal::from(1000));
        let [_, special] = sample_offers();

        cart.apply(&special, now())?;

        assert_eq!(cart.discount(), Decimal::from(150));

        Ok(())
    }

    #[test]
    fn receipt_lists_code_and_amounts() -> TestResult {
        let mut cart = CartPreview::default();
        cart.apply(&flat("FLAT50", 50), now())?;

        let receipt = cart.receipt();

        assert!(receipt.item_total.contains("377"));
        assert!(receipt.to_pay.contains("327"));
        assert_eq!(receipt.coupon.as_ref().map(|c| c.0.as_str()), Some("FLAT50"));
        assert!(receipt.to_string().contains("Coupon (FLAT50)"));

        Ok(())
    }
}

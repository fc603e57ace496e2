//! Skawsh Coupons prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    banners::{BannerError, BannerUpload},
    checkout::{CartPreview, Receipt, format_inr, sample_offers},
    clock::{Clock, ManualClock, SystemClock},
    coupons::{
        AudienceType, Coupon, CouponCategory, CouponId, CouponStatus, DiscountType,
        form::{ApplyOn, CouponFormData},
        validation::{FieldError, ValidatedForm, ValidationError, validate},
    },
    eligibility::{AppliedCoupon, CartContext, EligibilityError, MinimumScope, evaluate},
    fixtures::FixtureError,
    partition::{
        HistoryEntry, HistoryReason, ListFilter, Partition, history_reason, is_historical,
        partition,
    },
    service::{
        CouponsService, CouponsServiceError, InMemoryCouponsService, Latency, Submitted,
    },
    store::{CouponStore, StoreError, Upserted},
};

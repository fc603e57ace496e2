//! Coupons service errors.

use std::fmt;

use thiserror::Error;

use crate::{
    banners::BannerError,
    coupons::{CouponId, validation::ValidationError},
    eligibility::EligibilityError,
    store::StoreError,
};

/// Operations the service refuses to overlap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flight {
    /// Saving a coupon
    Submit,

    /// Saving a banner
    BannerUpload,
}

impl fmt::Display for Flight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Submit => "submit",
            Self::BannerUpload => "banner upload",
        })
    }
}

/// Coupons service errors
#[derive(Debug, Error)]
pub enum CouponsServiceError {
    /// The draft was rejected
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The coupon does not apply to the cart
    #[error(transparent)]
    Eligibility(#[from] EligibilityError),

    /// The banner file was rejected
    #[error(transparent)]
    Banner(#[from] BannerError),

    /// No coupon has this identifier
    #[error("coupon {0} not found")]
    NotFound(CouponId),

    /// No coupon has this code
    #[error("no coupon has the code `{0}`")]
    UnknownCode(String),

    /// The same kind of operation is still running
    #[error("a {0} is already in progress")]
    Busy(Flight),
}

impl From<StoreError> for CouponsServiceError {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::NotFound(id) => Self::NotFound(id),
        }
    }
}

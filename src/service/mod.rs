//! Coupons Service
//!
//! The boundary the console talks to. Writes wait out a simulated network
//! delay on the injected [`Clock`] before they land in the store, and each
//! kind of write refuses to overlap with itself.

use std::{
    sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard},
    time::Duration,
};

use async_trait::async_trait;
use mockall::automock;
use rust_decimal::Decimal;
use tracing::{Span, info, warn};

use crate::{
    banners::BannerUpload,
    clock::Clock,
    coupons::{Coupon, CouponId, form::CouponFormData, validation::validate},
    eligibility::{AppliedCoupon, CartContext, evaluate},
    guard::SingleFlight,
    partition::{HistoryEntry, ListFilter, active_view, history_view},
    store::{CouponStore, Upserted},
};

pub mod errors;

pub use errors::{CouponsServiceError, Flight};

/// Simulated round-trip times.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Latency {
    /// Delay before a submitted coupon is saved
    pub submit: Duration,

    /// Delay before an uploaded banner is saved
    pub banner: Duration,
}

impl Default for Latency {
    fn default() -> Self {
        Self {
            submit: Duration::from_millis(1000),
            banner: Duration::from_millis(800),
        }
    }
}

/// A saved coupon and whether the save created or replaced it.
#[derive(Debug, Clone, PartialEq)]
pub struct Submitted {
    /// The coupon as stored
    pub coupon: Coupon,

    /// What the store did with it
    pub outcome: Upserted,
}

impl Latency {
    /// No delay at all.
    pub const ZERO: Self = Self {
        submit: Duration::ZERO,
        banner: Duration::ZERO,
    };
}

/// Coupons service backed by an in-memory [`CouponStore`].
#[derive(Debug)]
pub struct InMemoryCouponsService {
    store: RwLock<CouponStore>,
    clock: Arc<dyn Clock>,
    latency: Latency,
    submissions: SingleFlight,
    uploads: SingleFlight,
}

impl InMemoryCouponsService {
    /// Serve `store`, reading time from `clock`.
    #[must_use]
    pub fn new(store: CouponStore, clock: Arc<dyn Clock>) -> Self {
        Self {
            store: RwLock::new(store),
            clock,
            latency: Latency::default(),
            submissions: SingleFlight::new(),
            uploads: SingleFlight::new(),
        }
    }

    /// Replace the simulated latency.
    #[must_use]
    pub const fn with_latency(mut self, latency: Latency) -> Self {
        self.latency = latency;
        self
    }

    /// Whether a submit is outstanding.
    #[must_use]
    pub fn is_submitting(&self) -> bool {
        self.submissions.is_in_flight()
    }

    /// Whether a banner upload is outstanding.
    #[must_use]
    pub fn is_uploading(&self) -> bool {
        self.uploads.is_in_flight()
    }

    fn read(&self) -> RwLockReadGuard<'_, CouponStore> {
        self.store.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, CouponStore> {
        self.store.write().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl CouponsService for InMemoryCouponsService {
    async fn list_coupons(&self) -> Vec<Coupon> {
        self.read().list()
    }

    async fn active_coupons(&self, filter: ListFilter) -> Vec<Coupon> {
        let store = self.read();

        active_view(store.as_slice(), &filter)
            .into_iter()
            .cloned()
            .collect()
    }

    async fn history(&self) -> Vec<HistoryEntry> {
        history_view(self.read().as_slice())
    }

    #[tracing::instrument(
        name = "coupons.service.submit",
        skip(self, form, editing),
        fields(
            editing = ?editing,
            code = tracing::field::Empty,
            coupon_id = tracing::field::Empty,
            outcome = tracing::field::Empty
        ),
        err
    )]
    async fn submit(
        &self,
        form: CouponFormData,
        editing: Option<CouponId>,
    ) -> Result<Submitted, CouponsServiceError> {
        let _permit = self
            .submissions
            .try_begin()
            .ok_or(CouponsServiceError::Busy(Flight::Submit))?;

        let validated = {
            let store = self.read();

            if let Some(id) = editing
                && store.get(id).is_none()
            {
                return Err(CouponsServiceError::NotFound(id));
            }

            validate(form, store.as_slice(), editing)?
        };

        let span = Span::current();

        span.record("code", tracing::field::display(&validated.form().code));

        for advisory in validated.advisories() {
            warn!(?advisory, "accepted coupon with advisory");
        }

        self.clock.sleep(self.latency.submit).await;

        let mut store = self.write();

        let coupon = match editing {
            Some(id) => {
                let existing = store.get(id).ok_or(CouponsServiceError::NotFound(id))?;

                validated.into_updated_coupon(existing)
            }
            None => validated.into_new_coupon(),
        };

        span.record("coupon_id", tracing::field::display(coupon.id));

        let outcome = store.upsert(coupon.clone());

        span.record("outcome", outcome.as_str());

        Ok(Submitted { coupon, outcome })
    }

    #[tracing::instrument(
        name = "coupons.service.soft_delete",
        skip(self, id),
        fields(coupon_id = %id),
        err
    )]
    async fn soft_delete(&self, id: CouponId) -> Result<Coupon, CouponsServiceError> {
        let mut store = self.write();

        Ok(store.soft_delete(id)?.clone())
    }

    #[tracing::instrument(
        name = "coupons.service.attach_banner",
        skip(self, id, upload),
        fields(
            coupon_id = %id,
            file_name = %upload.file_name,
            bytes = upload.bytes.len()
        ),
        err
    )]
    async fn attach_banner(
        &self,
        id: CouponId,
        upload: BannerUpload,
    ) -> Result<Coupon, CouponsServiceError> {
        let _permit = self
            .uploads
            .try_begin()
            .ok_or(CouponsServiceError::Busy(Flight::BannerUpload))?;

        if self.read().get(id).is_none() {
            return Err(CouponsServiceError::NotFound(id));
        }

        let banner_url = upload.into_data_uri()?;

        self.clock.sleep(self.latency.banner).await;

        let mut store = self.write();

        Ok(store.attach_banner(id, banner_url)?.clone())
    }

    #[tracing::instrument(
        name = "coupons.service.apply",
        skip(self, code, cart_total),
        fields(code = %code, cart_total = %cart_total),
        err
    )]
    async fn apply(
        &self,
        code: String,
        cart_total: Decimal,
    ) -> Result<AppliedCoupon, CouponsServiceError> {
        let coupon = self
            .read()
            .find_by_code(&code)
            .cloned()
            .ok_or_else(|| CouponsServiceError::UnknownCode(code.clone()))?;

        let applied = evaluate(&coupon, &CartContext::new(cart_total, self.clock.now()))?;

        info!(code = %applied.code, discount = %applied.discount, "applied coupon");

        Ok(applied)
    }
}

/// Coupon administration operations.
#[automock]
#[async_trait]
pub trait CouponsService: Send + Sync {
    /// Every coupon, newest first.
    async fn list_coupons(&self) -> Vec<Coupon>;

    /// Coupons still under management that pass `filter`.
    async fn active_coupons(&self, filter: ListFilter) -> Vec<Coupon>;

    /// The archive, each entry with the reason it is there.
    async fn history(&self) -> Vec<HistoryEntry>;

    /// Validate and save a draft, either as a new coupon or over `editing`.
    async fn submit(
        &self,
        form: CouponFormData,
        editing: Option<CouponId>,
    ) -> Result<Submitted, CouponsServiceError>;

    /// Retire a coupon. Its record is kept.
    async fn soft_delete(&self, id: CouponId) -> Result<Coupon, CouponsServiceError>;

    /// Attach an image banner to a coupon.
    async fn attach_banner(
        &self,
        id: CouponId,
        upload: BannerUpload,
    ) -> Result<Coupon, CouponsServiceError>;

    /// Apply the coupon with `code` to a cart worth `cart_total`.
    async fn apply(
        &self,
        code: String,
        cart_total: Decimal,
    ) -> Result<AppliedCoupon, CouponsServiceError>;
}

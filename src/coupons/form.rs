//! Coupon Form Data
//!
//! The wizard's working draft. A draft only becomes a [`Coupon`] once it has
//! been through [`validate`](crate::coupons::validation::validate).

use jiff::civil::DateTime;
use rand::{Rng, distributions::Alphanumeric};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use uuid::Uuid;

use crate::coupons::{
    AudienceType, Coupon, CouponCategory, CouponId, CouponStatus, DiscountType,
    parse_schedule_date,
};

/// Services that can be targeted by a service-based coupon.
pub const ACTIVE_SERVICES: &[&str] = &[
    "Dry Cleaning",
    "Premium Laundry",
    "Shoe Cleaning",
    "Steam Ironing",
    "Carpet Cleaning",
    "Sofa Cleaning",
    "Leather Care",
];

/// Separator used when service selections are flattened into a display string.
pub const SERVICE_SEPARATOR: &str = ", ";

/// Redemption ceiling offered by a fresh draft.
pub const DEFAULT_REDEMPTION_LIMIT: u32 = 1000;

/// Whether a discount applies to the whole order or to selected services.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApplyOn {
    /// Whole order
    #[default]
    Order,

    /// Selected services only
    Service,
}

/// Wizard draft
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CouponFormData {
    /// Headline
    pub title: String,

    /// Description
    pub description: String,

    /// Offer category
    pub category: CouponCategory,

    /// Target audience
    pub audience: AudienceType,

    /// Redemption code as typed
    pub code: String,

    /// Flat or percentage
    pub discount_type: DiscountType,

    /// Amount or percentage points
    pub discount_value: Decimal,

    /// Percentage cap, zero for none
    pub max_discount: Decimal,

    /// Minimum cart value, zero for none
    pub min_order_value: Decimal,

    /// Order or service scope
    pub apply_on: ApplyOn,

    /// Targeted services
    pub selected_services: SmallVec<[String; 2]>,

    /// Targeted studio, blank for none
    pub selected_studio: String,

    /// First-login restriction
    pub is_first_login: bool,

    /// Terms and conditions
    pub terms: String,

    /// Redemptions allowed per customer
    pub max_uses_per_user: u32,

    /// Becomes the coupon's usage limit
    pub global_redemption_limit: u32,

    /// Stacking permission
    pub allow_stacking: bool,

    /// Raw start date input
    pub start_date: String,

    /// Raw end date input
    pub end_date: String,

    /// Status the coupon is saved with
    pub status: CouponStatus,
}

impl Default for CouponFormData {
    fn default() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            category: CouponCategory::OrderBased,
            audience: AudienceType::All,
            code: String::new(),
            discount_type: DiscountType::Flat,
            discount_value: Decimal::ZERO,
            max_discount: Decimal::ZERO,
            min_order_value: Decimal::ZERO,
            apply_on: ApplyOn::Order,
            selected_services: SmallVec::new(),
            selected_studio: String::new(),
            is_first_login: false,
            terms: String::new(),
            max_uses_per_user: 1,
            global_redemption_limit: DEFAULT_REDEMPTION_LIMIT,
            allow_stacking: false,
            start_date: String::new(),
            end_date: String::new(),
            status: CouponStatus::Draft,
        }
    }
}

impl CouponFormData {
    /// Load an existing coupon into a draft for editing.
    #[must_use]
    pub fn from_coupon(coupon: &Coupon) -> Self {
        Self {
            title: coupon.title.clone(),
            description: coupon.description.clone(),
            category: coupon.category,
            audience: coupon.audience,
            code: coupon.code.clone(),
            discount_type: coupon.discount_type,
            discount_value: coupon.discount_value,
            max_discount: coupon.max_discount.unwrap_or_default(),
            min_order_value: coupon.min_order_value,
            apply_on: if coupon.category == CouponCategory::ServiceBased {
                ApplyOn::Service
            } else {
                ApplyOn::Order
            },
            selected_services: coupon
                .service_name
                .as_deref()
                .filter(|name| !name.is_empty())
                .map(|name| name.split(SERVICE_SEPARATOR).map(str::to_string).collect())
                .unwrap_or_default(),
            selected_studio: coupon.studio_name.clone().unwrap_or_default(),
            is_first_login: coupon.is_first_login,
            terms: coupon.terms.clone(),
            max_uses_per_user: coupon.max_uses_per_user,
            global_redemption_limit: coupon.usage_limit,
            allow_stacking: coupon.allow_stacking,
            start_date: coupon.start_date.map(|d| d.to_string()).unwrap_or_default(),
            end_date: coupon.end_date.map(|d| d.to_string()).unwrap_or_default(),
            status: coupon.status,
        }
    }

    /// Set the code, upper-casing it the way the code field does on input.
    pub fn set_code(&mut self, code: &str) {
        self.code = code.trim().to_uppercase();
    }

    /// Fill the code with a random one, prefixed by category.
    pub fn generate_code<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.code = generate_code(self.category, rng);
    }

    /// Project the draft into a transient coupon for the live preview.
    ///
    /// Unlike submission this never fails: schedule input that does not parse
    /// is treated as unset, so a half-typed end date cannot expire the preview.
    #[must_use]
    pub fn preview_coupon(&self) -> Coupon {
        let start_date = parse_schedule_date(&self.start_date).ok().flatten();
        let end_date = parse_schedule_date(&self.end_date).ok().flatten();

        self.clone()
            .project(CouponId::from_uuid(Uuid::nil()), start_date, end_date)
    }

    /// Build the stored shape of the draft.
    ///
    /// Usage count starts at zero and no banner is attached; callers editing an
    /// existing coupon carry those across themselves.
    pub(crate) fn project(
        self,
        id: CouponId,
        start_date: Option<DateTime>,
        end_date: Option<DateTime>,
    ) -> Coupon {
        let service_name = (!self.selected_services.is_empty())
            .then(|| self.selected_services.join(SERVICE_SEPARATOR));

        let studio_name = Some(self.selected_studio)
            .map(|studio| studio.trim().to_string())
            .filter(|studio| !studio.is_empty());

        Coupon {
            id,
            code: self.code.trim().to_uppercase(),
            title: self.title.trim().to_string(),
            description: self.description,
            category: self.category,
            discount_type: self.discount_type,
            discount_value: self.discount_value,
            max_discount: Some(self.max_discount).filter(|cap| *cap > Decimal::ZERO),
            start_date,
            end_date,
            usage_count: 0,
            usage_limit: self.global_redemption_limit,
            status: self.status,
            audience: self.audience,
            studio_name,
            service_name,
            min_order_value: self.min_order_value,
            terms: self.terms,
            max_uses_per_user: self.max_uses_per_user,
            is_first_login: self.is_first_login,
            allow_stacking: self.allow_stacking,
            banner_url: None,
        }
    }
}

/// Generate a `PREFIX-XXXXX` code for a category.
pub fn generate_code<R: Rng + ?Sized>(category: CouponCategory, rng: &mut R) -> String {
    let prefix = match category {
        CouponCategory::StudioBased => "STU",
        CouponCategory::ServiceBased => "SRV",
        CouponCategory::FirstLogin | CouponCategory::OrderBased => "SKA",
    };

    let suffix: String = (0..5)
        .map(|_| char::from(rng.sample(Alphanumeric)).to_ascii_uppercase())
        .collect();

    format!("{prefix}-{suffix}")
}

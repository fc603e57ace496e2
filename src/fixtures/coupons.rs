//! Coupon Fixtures

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::{
    coupons::{
        AudienceType, Coupon, CouponCategory, CouponId, CouponStatus, DiscountType,
        parse_schedule_date,
    },
    fixtures::FixtureError,
};

/// Coupon fixture from YAML
///
/// Dates are written the way an operator types them, so they are kept as
/// strings until conversion.
#[derive(Debug, Deserialize)]
pub struct CouponFixture {
    /// Fixed identifier, generated when absent
    #[serde(default)]
    pub id: Option<CouponId>,

    /// Redemption code
    pub code: String,

    /// Headline
    pub title: String,

    /// Description
    #[serde(default)]
    pub description: String,

    /// Offer category
    pub category: CouponCategory,

    /// Flat or percentage
    pub discount_type: DiscountType,

    /// Amount or percentage points
    pub discount_value: Decimal,

    /// Percentage cap
    #[serde(default)]
    pub max_discount: Option<Decimal>,

    /// Campaign start
    #[serde(default)]
    pub start_date: String,

    /// Campaign end
    #[serde(default)]
    pub end_date: String,

    /// Redemptions so far
    #[serde(default)]
    pub usage_count: u32,

    /// Redemption ceiling, zero for none
    #[serde(default)]
    pub usage_limit: u32,

    /// Lifecycle status
    #[serde(default = "default_status")]
    pub status: CouponStatus,

    /// Target audience
    #[serde(default = "default_audience")]
    pub audience: AudienceType,

    /// Studio qualifier
    #[serde(default)]
    pub studio_name: Option<String>,

    /// Service qualifier
    #[serde(default)]
    pub service_name: Option<String>,

    /// Minimum cart value
    #[serde(default)]
    pub min_order_value: Decimal,

    /// Terms and conditions
    #[serde(default)]
    pub terms: String,

    /// Redemptions allowed per customer
    #[serde(default = "default_max_uses_per_user")]
    pub max_uses_per_user: u32,

    /// First-login restriction
    #[serde(default)]
    pub is_first_login: bool,

    /// Stacking permission
    #[serde(default)]
    pub allow_stacking: bool,

    /// Banner image
    #[serde(default)]
    pub banner_url: Option<String>,
}

const fn default_status() -> CouponStatus {
    CouponStatus::Draft
}

const fn default_audience() -> AudienceType {
    AudienceType::All
}

const fn default_max_uses_per_user() -> u32 {
    1
}

impl TryFrom<CouponFixture> for Coupon {
    type Error = FixtureError;

    fn try_from(fixture: CouponFixture) -> Result<Self, Self::Error> {
        let parse = |field: &'static str, value: &str| {
            parse_schedule_date(value).map_err(|source| FixtureError::InvalidDate {
                code: fixture.code.clone(),
                field,
                value: value.to_string(),
                source,
            })
        };

        let start_date = parse("start_date", &fixture.start_date)?;
        let end_date = parse("end_date", &fixture.end_date)?;

        Ok(Coupon {
            id: fixture.id.unwrap_or_default(),
            code: fixture.code.trim().to_uppercase(),
            title: fixture.title,
            description: fixture.description,
            category: fixture.category,
            discount_type: fixture.discount_type,
            discount_value: fixture.discount_value,
            max_discount: fixture.max_discount,
            start_date,
            end_date,
            usage_count: fixture.usage_count,
            usage_limit: fixture.usage_limit,
            status: fixture.status,
            audience: fixture.audience,
            studio_name: fixture.studio_name,
            service_name: fixture.service_name,
            min_order_value: fixture.min_order_value,
            terms: fixture.terms,
            max_uses_per_user: fixture.max_uses_per_user,
            is_first_login: fixture.is_first_login,
            allow_stacking: fixture.allow_stacking,
            banner_url: fixture.banner_url,
        })
    }
}

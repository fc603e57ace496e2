//! Coupons
//!
//! The coupon record and the closed sets of values its fields draw from.

use std::{fmt, str::FromStr};

use jiff::civil::{Date, DateTime, Time};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::uuids::TypedUuid;

pub mod form;
pub mod validation;

/// Coupon identifier
pub type CouponId = TypedUuid<Coupon>;

/// Raised when a label does not name any variant of a coupon enum.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} `{value}`")]
pub struct UnknownVariant {
    /// Which enum was being parsed
    pub kind: &'static str,

    /// The rejected input
    pub value: String,
}

/// Lower-case the input and drop everything that is not alphanumeric, so
/// `Service Based`, `service-based` and `ServiceBased` all compare equal.
fn fold_label(value: &str) -> String {
    value
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

macro_rules! labelled_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $kind:literal {
            $( $(#[$vmeta:meta])* $variant:ident => $label:literal $(| $alias:literal)* ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                $(#[$vmeta])*
                #[serde(rename = $label)]
                $variant,
            )+
        }

        impl $name {
            /// Every variant, in declaration order.
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            /// Label shown in the console.
            #[must_use]
            pub const fn label(self) -> &'static str {
                match self {
                    $(Self::$variant => $label,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }

        impl FromStr for $name {
            type Err = UnknownVariant;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let folded = fold_label(s);

                $(
                    if folded == fold_label($label)
                        || folded == fold_label(stringify!($variant))
                        $(|| folded == fold_label($alias))*
                    {
                        return Ok(Self::$variant);
                    }
                )+

                Err(UnknownVariant {
                    kind: $kind,
                    value: s.to_string(),
                })
            }
        }
    };
}

labelled_enum! {
    /// Coupon lifecycle status
    CouponStatus, "status" {
        /// Authored but not yet live
        Draft => "Draft",
        /// Live and redeemable
        Active => "Active",
        /// Withdrawn by an operator
        Inactive => "Inactive",
        /// Past its campaign
        Expired => "Expired",
    }
}

labelled_enum! {
    /// What kind of offer the coupon is
    CouponCategory, "category" {
        /// Welcome offer for a customer's first login
        FirstLogin => "First Login",
        /// Applies to the whole order
        OrderBased => "Order Based" | "order",
        /// Applies to a named service
        ServiceBased => "Service Based" | "service",
        /// Applies at a named studio
        StudioBased => "Studio Based" | "studio",
    }
}

labelled_enum! {
    /// How the discount value is interpreted
    DiscountType, "discount type" {
        /// A fixed amount off
        Flat => "Flat",
        /// A percentage of the cart total
        Percentage => "Percentage" | "percent",
    }
}

labelled_enum! {
    /// Who the coupon is offered to
    AudienceType, "audience" {
        /// Everyone
        All => "All Users",
        /// Customers who have never ordered
        New => "New Users Only",
        /// Customers of a specific studio
        SpecificStudio => "Specific Studio Users" | "studio",
        /// Customers of a specific service
        SpecificService => "Specific Service Users" | "service",
    }
}

impl CouponStatus {
    /// Statuses offered by the list view's status filter.
    pub const LISTABLE: &'static [Self] = &[Self::Draft, Self::Active];

    /// Whether the status alone retires a coupon from management.
    #[must_use]
    pub const fn is_retired(self) -> bool {
        matches!(self, Self::Expired | Self::Inactive)
    }
}

/// A promotional offer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Coupon {
    /// Stable identifier; never changes across edits
    pub id: CouponId,

    /// Redemption code, upper case
    pub code: String,

    /// Short headline
    pub title: String,

    /// Longer description
    pub description: String,

    /// Offer category
    pub category: CouponCategory,

    /// Flat or percentage
    pub discount_type: DiscountType,

    /// Amount off, or percentage points when `discount_type` is percentage
    pub discount_value: Decimal,

    /// Cap on a percentage discount
    pub max_discount: Option<Decimal>,

    /// When the campaign opens
    pub start_date: Option<DateTime>,

    /// When the campaign closes
    pub end_date: Option<DateTime>,

    /// Redemptions so far
    pub usage_count: u32,

    /// Redemption ceiling across all customers
    pub usage_limit: u32,

    /// Lifecycle status
    pub status: CouponStatus,

    /// Target audience
    pub audience: AudienceType,

    /// Studio qualifier for studio-based coupons
    pub studio_name: Option<String>,

    /// Service qualifier for service-based coupons
    pub service_name: Option<String>,

    /// Minimum cart value, zero for none
    pub min_order_value: Decimal,

    /// Terms and conditions shown to customers
    pub terms: String,

    /// Redemptions allowed per customer
    pub max_uses_per_user: u32,

    /// Restricted to a customer's first login
    pub is_first_login: bool,

    /// Whether the coupon may combine with other offers
    pub allow_stacking: bool,

    /// Banner image, either a data URI or an external URL
    pub banner_url: Option<String>,
}

impl Coupon {
    /// Whether redemptions have reached a positive usage limit.
    #[must_use]
    pub const fn is_exhausted(&self) -> bool {
        self.usage_limit > 0 && self.usage_count >= self.usage_limit
    }

    /// The percentage cap, when one is set and positive.
    #[must_use]
    pub fn discount_cap(&self) -> Option<Decimal> {
        self.max_discount.filter(|cap| *cap > Decimal::ZERO)
    }
}

/// Parse a schedule value typed into the console.
///
/// Accepts a civil date-time (`2024-12-31T23:59`) or a bare date, which means
/// midnight at the start of that day. Blank input means "not set".
///
/// # Errors
///
/// Returns the parse error for the date-time form when neither form parses.
pub fn parse_schedule_date(value: &str) -> Result<Option<DateTime>, jiff::Error> {
    let value = value.trim();

    if value.is_empty() {
        return Ok(None);
    }

    match value.parse::<DateTime>() {
        Ok(datetime) => Ok(Some(datetime)),
        Err(error) => value
            .parse::<Date>()
            .map(|date| Some(date.to_datetime(Time::midnight())))
            .map_err(|_date_error| error),
    }
}

#[cfg(test)]
mod tests {
    use jiff::civil::date;
    use testresult::TestResult;

    use super::*;

    #[test]
    fn labels_round_trip_through_from_str() -> TestResult {
        for category in CouponCategory::ALL {
            assert_eq!(category.label().parse::<CouponCategory>()?, *category);
        }

        for audience in AudienceType::ALL {
            assert_eq!(audience.label().parse::<AudienceType>()?, *audience);
        }

        Ok(())
    }

    #[test]
    fn from_str_accepts_variant_names_and_aliases() -> TestResult {
        assert_eq!(
            "service-based".parse::<CouponCategory>()?,
            CouponCategory::ServiceBased
        );
        assert_eq!("ServiceBased".parse::<CouponCategory>()?, CouponCategory::ServiceBased);
        assert_eq!("studio".parse::<CouponCategory>()?, CouponCategory::StudioBased);
        assert_eq!("percent".parse::<DiscountType>()?, DiscountType::Percentage);
        assert_eq!("active".parse::<CouponStatus>()?, CouponStatus::Active);

        Ok(())
    }

    #[test]
    fn from_str_names_the_rejected_input() {
        let error = "bogus".parse::<CouponStatus>().err();

        assert_eq!(
            error,
            Some(UnknownVariant {
                kind: "status",
                value: "bogus".to_string(),
            })
        );
    }

    #[test]
    fn serde_uses_console_labels() -> TestResult {
        let yaml = serde_norway::to_string(&CouponCategory::FirstLogin)?;

        assert_eq!(yaml.trim(), "First Login");

        let parsed: AudienceType = serde_norway::from_str("New Users Only")?;

        assert_eq!(parsed, AudienceType::New);

        Ok(())
    }

    #[test]
    fn only_expired_and_inactive_are_retired() {
        assert!(CouponStatus::Expired.is_retired());
        assert!(CouponStatus::Inactive.is_retired());
        assert!(!CouponStatus::Active.is_retired());
        assert!(!CouponStatus::Draft.is_retired());
    }

    #[test]
    fn parse_schedule_date_handles_both_forms() -> TestResult {
        assert_eq!(
            parse_schedule_date("2024-12-31")?,
            Some(date(2024, 12, 31).at(0, 0, 0, 0))
        );
        assert_eq!(
            parse_schedule_date("2024-12-31T18:30")?,
            Some(date(2024, 12, 31).at(18, 30, 0, 0))
        );
        assert_eq!(parse_schedule_date("  ")?, None);
        assert!(parse_schedule_date("31/12/2024").is_err());

        Ok(())
    }
}

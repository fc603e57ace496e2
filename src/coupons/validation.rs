//! Coupon Validation
//!
//! Checks a wizard draft before it is accepted. Every offending field is
//! reported at once; nothing is stored unless the whole draft passes.

use jiff::civil::DateTime;
use rust_decimal::Decimal;
use rustc_hash::FxHashSet;
use smallvec::{SmallVec, smallvec};
use thiserror::Error;

use crate::{
    coupons::{Coupon, CouponId, DiscountType, form::CouponFormData, parse_schedule_date},
    partition::is_historical,
};

/// Longest accepted coupon code.
pub const MAX_CODE_LEN: usize = 15;

/// A single rejected field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    /// Title is blank
    #[error("title is required")]
    MissingTitle,

    /// Code is blank
    #[error("code is required")]
    MissingCode,

    /// Code is longer than [`MAX_CODE_LEN`]
    #[error("code must be at most {MAX_CODE_LEN} characters, got {length}")]
    CodeTooLong {
        /// Length of the submitted code
        length: usize,
    },

    /// Code contains something other than `A-Z`, `0-9` or `-`
    #[error("code `{code}` may only contain A-Z, 0-9 and `-`")]
    CodeCharset {
        /// The upper-cased code
        code: String,
    },

    /// Another active coupon already uses the code
    #[error("code `{code}` is already used by an active coupon")]
    DuplicateCode {
        /// The upper-cased code
        code: String,
    },

    /// A schedule value did not parse
    #[error("{field} `{value}` is not a valid date")]
    InvalidDate {
        /// `start_date` or `end_date`
        field: &'static str,

        /// The rejected input
        value: String,
    },

    /// The campaign would close before it opens
    #[error("end date is before start date")]
    EndBeforeStart,

    /// An amount is below zero
    #[error("{field} must not be negative")]
    NegativeAmount {
        /// Name of the amount field
        field: &'static str,
    },
}

impl FieldError {
    /// Name of the draft field the error is about.
    #[must_use]
    pub const fn field(&self) -> &'static str {
        match self {
            Self::MissingTitle => "title",
            Self::MissingCode
            | Self::CodeTooLong { .. }
            | Self::CodeCharset { .. }
            | Self::DuplicateCode { .. } => "code",
            Self::InvalidDate { field, .. } | Self::NegativeAmount { field } => *field,
            Self::EndBeforeStart => "end_date",
        }
    }
}

/// A draft was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid coupon: {}", describe(.errors))]
pub struct ValidationError {
    errors: SmallVec<[FieldError; 2]>,
}

impl ValidationError {
    /// Every field error, in the order the wizard steps present the fields.
    #[must_use]
    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    /// Names of the offending fields, without duplicates.
    #[must_use]
    pub fn fields(&self) -> SmallVec<[&'static str; 2]> {
        let mut fields: SmallVec<[&'static str; 2]> = SmallVec::new();

        for error in &self.errors {
            if !fields.contains(&error.field()) {
                fields.push(error.field());
            }
        }

        fields
    }

    /// Whether the named field was rejected.
    #[must_use]
    pub fn has_field(&self, field: &str) -> bool {
        self.errors.iter().any(|error| error.field() == field)
    }
}

fn describe(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Non-blocking observations about an accepted draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advisory {
    /// Terms are marked required in the wizard but were left blank
    MissingTerms,

    /// A percentage above 100 will discount more than the cart total
    PercentageAboveHundred,
}

/// A draft that passed validation, with its schedule parsed.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedForm {
    form: CouponFormData,
    start_date: Option<DateTime>,
    end_date: Option<DateTime>,
}

impl ValidatedForm {
    /// The accepted draft, with its code upper-cased.
    #[must_use]
    pub fn form(&self) -> &CouponFormData {
        &self.form
    }

    /// Warnings worth surfacing but not worth rejecting the draft over.
    #[must_use]
    pub fn advisories(&self) -> SmallVec<[Advisory; 2]> {
        let mut advisories = SmallVec::new();

        if self.form.terms.trim().is_empty() {
            advisories.push(Advisory::MissingTerms);
        }

        if self.form.discount_type == DiscountType::Percentage
            && self.form.discount_value > Decimal::ONE_HUNDRED
        {
            advisories.push(Advisory::PercentageAboveHundred);
        }

        advisories
    }

    /// Turn the draft into a brand new coupon with a fresh identifier.
    #[must_use]
    pub fn into_new_coupon(self) -> Coupon {
        self.form.project(CouponId::new(), self.start_date, self.end_date)
    }

    /// Overwrite `existing` with the draft.
    ///
    /// The identifier, redemption count and banner survive the edit.
    #[must_use]
    pub fn into_updated_coupon(self, existing: &Coupon) -> Coupon {
        let mut coupon = self
            .form
            .project(existing.id, self.start_date, self.end_date);

        coupon.usage_count = existing.usage_count;
        coupon.banner_url.clone_from(&existing.banner_url);

        coupon
    }
}

/// Validate a draft against the current collection.
///
/// `editing` names the coupon being edited, whose own code does not count as
/// a clash. Only active coupons reserve their codes.
///
/// # Errors
///
/// Returns a [`ValidationError`] listing every offending field.
pub fn validate(
    mut form: CouponFormData,
    existing: &[Coupon],
    editing: Option<CouponId>,
) -> Result<ValidatedForm, ValidationError> {
    let mut errors: SmallVec<[FieldError; 2]> = smallvec![];

    if form.title.trim().is_empty() {
        errors.push(FieldError::MissingTitle);
    }

    form.code = form.code.trim().to_uppercase();

    errors.extend(check_code(&form.code, existing, editing));

    for (field, amount) in [
        ("discount_value", form.discount_value),
        ("max_discount", form.max_discount),
        ("min_order_value", form.min_order_value),
    ] {
        if amount < Decimal::ZERO {
            errors.push(FieldError::NegativeAmount { field });
        }
    }

    let start_date = parse_date_field("start_date", &form.start_date, &mut errors);
    let end_date = parse_date_field("end_date", &form.end_date, &mut errors);

    if matches!((start_date, end_date), (Some(start), Some(end)) if end < start) {
        errors.push(FieldError::EndBeforeStart);
    }

    if errors.is_empty() {
        Ok(ValidatedForm {
            form,
            start_date,
            end_date,
        })
    } else {
        Err(ValidationError { errors })
    }
}

fn check_code(
    code: &str,
    existing: &[Coupon],
    editing: Option<CouponId>,
) -> SmallVec<[FieldError; 2]> {
    let mut errors = SmallVec::new();

    if code.is_empty() {
        errors.push(FieldError::MissingCode);

        return errors;
    }

    let length = code.chars().count();

    if length > MAX_CODE_LEN {
        errors.push(FieldError::CodeTooLong { length });
    }

    if !code
        .chars()
        .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '-')
    {
        errors.push(FieldError::CodeCharset {
            code: code.to_string(),
        });
    }

    let taken: FxHashSet<&str> = existing
        .iter()
        .filter(|coupon| Some(coupon.id) != editing && !is_historical(coupon))
        .map(|coupon| coupon.code.as_str())
        .collect();

    if taken.contains(code) {
        errors.push(FieldError::DuplicateCode {
            code: code.to_string(),
        });
    }

    errors
}

fn parse_date_field(
    field: &'static str,
    value: &str,
    errors: &mut SmallVec<[FieldError; 2]>,
) -> Option<DateTime> {
    match parse_schedule_date(value) {
        Ok(parsed) => parsed,
        Err(_) => {
            errors.push(FieldError::InvalidDate {
                field,
                value: value.to_string(),
            });

            None
        }
    }
}

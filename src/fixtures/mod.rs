//! Fixtures

use std::{fs, path::Path};

use serde::Deserialize;
use thiserror::Error;

use crate::coupons::Coupon;

pub mod coupons;

use coupons::CouponFixture;

/// The coupons the console starts with.
const SEED: &str = include_str!("../../fixtures/coupons.yml");

/// Fixture Parsing Errors
#[derive(Debug, Error)]
pub enum FixtureError {
    /// IO error reading fixture files
    #[error("Failed to read fixture file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Unparsable schedule date
    #[error("Invalid {field} `{value}` for coupon {code}: {source}")]
    InvalidDate {
        /// Code of the offending coupon
        code: String,

        /// Which date field
        field: &'static str,

        /// The rejected input
        value: String,

        /// Underlying parse error
        source: jiff::Error,
    },
}

/// Wrapper for coupons in YAML
#[derive(Debug, Deserialize)]
pub struct CouponsFixture {
    /// Coupons, newest first
    pub coupons: Vec<CouponFixture>,
}

impl CouponsFixture {
    /// Convert every fixture into a coupon, keeping file order.
    ///
    /// # Errors
    ///
    /// Returns an error if any coupon has an unparsable date.
    pub fn into_coupons(self) -> Result<Vec<Coupon>, FixtureError> {
        self.coupons.into_iter().map(Coupon::try_from).collect()
    }
}

/// Parse coupons from a YAML document.
///
/// # Errors
///
/// Returns an error if the YAML is malformed or a date does not parse.
pub fn from_yaml_str(yaml: &str) -> Result<Vec<Coupon>, FixtureError> {
    serde_norway::from_str::<CouponsFixture>(yaml)?.into_coupons()
}

/// Load coupons from a YAML file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub fn load(path: impl AsRef<Path>) -> Result<Vec<Coupon>, FixtureError> {
    let contents = fs::read_to_string(path)?;

    from_yaml_str(&contents)
}

/// The built-in seed set.
///
/// # Errors
///
/// Returns an error if the embedded seed file is invalid.
pub fn seed() -> Result<Vec<Coupon>, FixtureError> {
    from_yaml_str(SEED)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use testresult::TestResult;

    use crate::{
        coupons::{CouponCategory, CouponStatus},
        partition::partition,
    };

    use super::*;

    #[test]
    fn seed_has_the_three_examples_in_order() -> TestResult {
        let coupons = seed()?;

        let codes: Vec<_> = coupons.iter().map(|c| c.code.as_str()).collect();

        assert_eq!(codes, ["WELCOME-SKAWSH", "LAUNDRY-50", "STUDIO-X-10"]);

        Ok(())
    }

    #[test]
    fn seed_partitions_into_two_active_and_one_historical() -> TestResult {
        let coupons = seed()?;
        let split = partition(&coupons);

        assert_eq!(split.active.len(), 2);
        assert_eq!(split.historical.len(), 1);
        assert_eq!(
            split.historical.first().map(|c| c.status),
            Some(CouponStatus::Expired)
        );

        Ok(())
    }

    #[test]
    fn load_reads_from_disk() -> TestResult {
        let mut file = tempfile::NamedTempFile::new()?;

        write!(
            file,
            r"
coupons:
  - code: DISK-1
    title: From disk
    category: Order Based
    discount_type: Flat
    discount_value: 25
"
        )?;

        let coupons = load(file.path())?;

        assert_eq!(coupons.len(), 1);
        assert_eq!(
            coupons.first().map(|c| c.category),
            Some(CouponCategory::OrderBased)
        );

        Ok(())
    }

    #[test]
    fn missing_files_are_io_errors() {
        assert!(matches!(
            load("/definitely/not/here.yml"),
            Err(FixtureError::Io(_))
        ));
    }

    #[test]
    fn malformed_yaml_is_rejected() {
        assert!(matches!(
            from_yaml_str("coupons: [this is: not: valid"),
            Err(FixtureError::Yaml(_))
        ));
    }
}

use std::io;

use clap::Args;
use skawsh_coupons::{
    coupons::{CouponCategory, CouponStatus},
    partition::ListFilter,
    service::CouponsService,
};

use crate::cli::{tables::coupons_table, write_failed};

#[derive(Debug, Args)]
pub(crate) struct ListArgs {
    /// Only coupons with this status (Draft or Active)
    #[arg(long)]
    status: Option<CouponStatus>,

    /// Only coupons in this category
    #[arg(long)]
    category: Option<CouponCategory>,
}

pub(crate) async fn run(
    args: ListArgs,
    service: &dyn CouponsService,
    out: &mut impl io::Write,
) -> Result<(), String> {
    if let Some(status) = args.status
        && !CouponStatus::LISTABLE.contains(&status)
    {
        return Err(format!(
            "{status} coupons are archived; use `history` to see them"
        ));
    }

    let filter = ListFilter {
        status: args.status,
        category: args.category,
    };

    let coupons = service.active_coupons(filter).await;

    if coupons.is_empty() {
        return writeln!(out, "no coupons found").map_err(write_failed);
    }

    writeln!(out, "{}", coupons_table(&coupons)).map_err(write_failed)
}

#[cfg(test)]
mod tests {
    use skawsh_coupons::{coupons::form::CouponFormData, service::MockCouponsService};
    use testresult::TestResult;

    use super::*;

    #[tokio::test]
    async fn passes_the_filter_through() -> TestResult {
        let mut service = MockCouponsService::new();

        service
            .expect_active_coupons()
            .withf(|filter| {
                filter.status == Some(CouponStatus::Draft)
                    && filter.category == Some(CouponCategory::StudioBased)
            })
            .times(1)
            .returning(|_| {
                let mut coupon = CouponFormData::default().preview_coupon();
                coupon.code = "STU-AAAAA".to_string();

                vec![coupon]
            });

        let mut out = Vec::new();

        run(
            ListArgs {
                status: Some(CouponStatus::Draft),
                category: Some(CouponCategory::StudioBased),
            },
            &service,
            &mut out,
        )
        .await?;

        assert!(String::from_utf8(out)?.contains("STU-AAAAA"));

        Ok(())
    }

    #[tokio::test]
    async fn archived_statuses_are_refused() {
        let service = MockCouponsService::new();
        let mut out = Vec::new();

        let result = run(
            ListArgs {
                status: Some(CouponStatus::Expired),
                category: None,
            },
            &service,
            &mut out,
        )
        .await;

        assert!(result.is_err_and(|error| error.contains("history")));
    }

    #[tokio::test]
    async fn empty_lists_say_so() -> TestResult {
        let mut service = MockCouponsService::new();
        service.expect_active_coupons().returning(|_| Vec::new());

        let mut out = Vec::new();

        run(
            ListArgs {
                status: None,
                category: None,
            },
            &service,
            &mut out,
        )
        .await?;

        assert_eq!(String::from_utf8(out)?, "no coupons found\n");

        Ok(())
    }
}

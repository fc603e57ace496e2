use std::{fs, io, path::PathBuf};

use clap::Args;
use skawsh_coupons::{
    coupons::{CouponId, form::CouponFormData},
    service::{CouponsService, Submitted},
};

use crate::cli::write_failed;

#[derive(Debug, Args)]
pub(crate) struct CreateArgs {
    /// YAML file holding the draft
    #[arg(long)]
    form: PathBuf,

    /// Save over this coupon instead of creating a new one
    #[arg(long)]
    edit: Option<CouponId>,

    /// Generate a code when the draft leaves it blank
    #[arg(long)]
    generate_code: bool,
}

pub(crate) async fn run(
    args: CreateArgs,
    service: &dyn CouponsService,
    out: &mut impl io::Write,
) -> Result<(), String> {
    let mut form = read_form(&args)?;

    if args.generate_code && form.code.trim().is_empty() {
        form.generate_code(&mut rand::thread_rng());
    }

    let Submitted { coupon, outcome } = service
        .submit(form, args.edit)
        .await
        .map_err(|error| format!("failed to save coupon: {error}"))?;

    writeln!(out, "{} {} ({})", outcome.as_str(), coupon.code, coupon.id).map_err(write_failed)
}

fn read_form(args: &CreateArgs) -> Result<CouponFormData, String> {
    let contents = fs::read_to_string(&args.form)
        .map_err(|error| format!("failed to read {}: {error}", args.form.display()))?;

    serde_norway::from_str(&contents)
        .map_err(|error| format!("failed to parse {}: {error}", args.form.display()))
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use rust_decimal::Decimal;
    use skawsh_coupons::{
        coupons::{CouponCategory, DiscountType},
        service::MockCouponsService,
        store::Upserted,
    };
    use tempfile::NamedTempFile;
    use testresult::TestResult;

    use super::*;

    fn draft_file(yaml: &str) -> Result<NamedTempFile, io::Error> {
        let mut file = NamedTempFile::new()?;

        file.write_all(yaml.as_bytes())?;

        Ok(file)
    }

    #[tokio::test]
    async fn submits_the_parsed_draft() -> TestResult {
        let file = draft_file(
            r"
title: Weekend Steam
code: steam-20
category: Service Based
discount_type: Percentage
discount_value: 20
max_discount: 100
apply_on: SERVICE
selected_services: [Steam Ironing]
end_date: 2025-01-31
",
        )?;

        let mut service = MockCouponsService::new();

        service
            .expect_submit()
            .withf(|form, editing| {
                form.code == "steam-20"
                    && form.category == CouponCategory::ServiceBased
                    && form.discount_type == DiscountType::Percentage
                    && form.max_discount == Decimal::from(100)
                    && form.selected_services.as_slice() == ["Steam Ironing".to_string()]
                    && editing.is_none()
            })
            .times(1)
            .returning(|form, _| {
                let mut coupon = form.preview_coupon();
                coupon.id = CouponId::new();

                Ok(Submitted {
                    coupon,
                    outcome: Upserted::Created,
                })
            });

        let mut out = Vec::new();

        run(
            CreateArgs {
                form: file.path().to_path_buf(),
                edit: None,
                generate_code: false,
            },
            &service,
            &mut out,
        )
        .await?;

        assert!(String::from_utf8(out)?.starts_with("created STEAM-20 ("));

        Ok(())
    }

    #[tokio::test]
    async fn blank_codes_can_be_generated() -> TestResult {
        let file = draft_file("title: Studio treat\ncategory: Studio Based\n")?;

        let mut service = MockCouponsService::new();

        service
            .expect_submit()
            .withf(|form, _| form.code.starts_with("STU-") && form.code.len() == 9)
            .returning(|form, _| {
                Ok(Submitted {
                    coupon: form.preview_coupon(),
                    outcome: Upserted::Created,
                })
            });

        run(
            CreateArgs {
                form: file.path().to_path_buf(),
                edit: None,
                generate_code: true,
            },
            &service,
            &mut Vec::new(),
        )
        .await?;

        Ok(())
    }

    #[tokio::test]
    async fn reports_the_outcome_the_store_gives() -> TestResult {
        let file = draft_file("title: Renamed\ncode: LAUNDRY-50\n")?;
        let id = CouponId::new();

        let mut service = MockCouponsService::new();

        service
            .expect_submit()
            .withf(move |_, editing| *editing == Some(id))
            .times(1)
            .returning(move |form, _| {
                let mut coupon = form.preview_coupon();
                coupon.id = id;

                Ok(Submitted {
                    coupon,
                    outcome: Upserted::Updated,
                })
            });

        let mut out = Vec::new();

        run(
            CreateArgs {
                form: file.path().to_path_buf(),
                edit: Some(id),
                generate_code: false,
            },
            &service,
            &mut out,
        )
        .await?;

        assert_eq!(String::from_utf8(out)?, format!("updated LAUNDRY-50 ({id})\n"));

        Ok(())
    }

    #[tokio::test]
    async fn unreadable_drafts_fail_before_submitting() {
        let service = MockCouponsService::new();

        let result = run(
            CreateArgs {
                form: PathBuf::from("/no/such/draft.yml"),
                edit: None,
                generate_code: false,
            },
            &service,
            &mut Vec::new(),
        )
        .await;

        assert!(result.is_err_and(|error| error.starts_with("failed to read")));
    }
}

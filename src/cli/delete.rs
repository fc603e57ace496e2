use std::io;

use clap::Args;
use skawsh_coupons::{coupons::CouponId, service::CouponsService};

use crate::cli::write_failed;

#[derive(Debug, Args)]
pub(crate) struct DeleteArgs {
    /// Coupon to deactivate
    #[arg(long)]
    id: CouponId,
}

pub(crate) async fn run(
    args: DeleteArgs,
    service: &dyn CouponsService,
    out: &mut impl io::Write,
) -> Result<(), String> {
    let coupon = service
        .soft_delete(args.id)
        .await
        .map_err(|error| format!("failed to deactivate coupon: {error}"))?;

    writeln!(out, "deactivated {} ({})", coupon.code, coupon.id).map_err(write_failed)
}

use std::io;

use clap::Args;
use rust_decimal::Decimal;
use skawsh_coupons::{
    checkout::{CartPreview, PREVIEW_CART_TOTAL},
    service::CouponsService,
};

use crate::cli::write_failed;

#[derive(Debug, Args)]
pub(crate) struct ApplyArgs {
    /// Coupon code, any case
    #[arg(long)]
    code: String,

    /// Cart value before discount, in rupees
    #[arg(long, default_value_t = PREVIEW_CART_TOTAL)]
    cart_total: Decimal,
}

pub(crate) async fn run(
    args: ApplyArgs,
    service: &dyn CouponsService,
    out: &mut impl io::Write,
) -> Result<(), String> {
    let applied = service
        .apply(args.code, args.cart_total)
        .await
        .map_err(|error| error.to_string())?;

    let cart = CartPreview::with_applied(args.cart_total, applied);

    writeln!(out, "{}", cart.receipt()).map_err(write_failed)?;

    if cart.is_overdrawn() {
        writeln!(out, "warning: the discount is larger than the cart total")
            .map_err(write_failed)?;
    }

    Ok(())
}

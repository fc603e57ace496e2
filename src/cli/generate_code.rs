use std::io;

use clap::Args;
use rand::Rng;
use skawsh_coupons::coupons::{CouponCategory, form::generate_code};

use crate::cli::write_failed;

#[derive(Debug, Args)]
pub(crate) struct GenerateCodeArgs {
    /// Category deciding the code prefix
    #[arg(long, default_value = "Order Based")]
    category: CouponCategory,
}

pub(crate) fn run<R: Rng + ?Sized>(
    args: &GenerateCodeArgs,
    rng: &mut R,
    out: &mut impl io::Write,
) -> Result<(), String> {
    writeln!(out, "{}", generate_code(args.category, rng)).map_err(write_failed)
}

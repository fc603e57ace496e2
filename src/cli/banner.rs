use std::{fs, io, path::PathBuf};

use clap::Args;
use skawsh_coupons::{
    banners::{BannerUpload, bannerable},
    coupons::CouponId,
    service::CouponsService,
};

use crate::cli::write_failed;

#[derive(Debug, Args)]
pub(crate) struct BannerArgs {
    /// Coupon to attach the banner to
    #[arg(long)]
    id: CouponId,

    /// Image file
    #[arg(long)]
    file: PathBuf,

    /// Media type, guessed from the extension when omitted
    #[arg(long)]
    media_type: Option<String>,
}

pub(crate) async fn run(
    args: BannerArgs,
    service: &dyn CouponsService,
    out: &mut impl io::Write,
) -> Result<(), String> {
    let coupons = service.list_coupons().await;

    let Some(coupon) = coupons.iter().find(|coupon| coupon.id == args.id) else {
        return Err(format!("coupon {} not found", args.id));
    };

    if !bannerable(&coupons).iter().any(|c| c.id == args.id) {
        return Err(format!(
            "{} is {} and cannot take a banner",
            coupon.code, coupon.status
        ));
    }

    let bytes = fs::read(&args.file)
        .map_err(|error| format!("failed to read {}: {error}", args.file.display()))?;

    let file_name = args
        .file
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();

    let mut upload = BannerUpload::from_file_name(file_name, bytes);

    if let Some(media_type) = args.media_type {
        upload.media_type = media_type;
    }

    if upload.exceeds_advisory_size() {
        writeln!(out, "note: banners under 2MB load faster").map_err(write_failed)?;
    }

    let coupon = service
        .attach_banner(args.id, upload)
        .await
        .map_err(|error| format!("failed to attach banner: {error}"))?;

    writeln!(out, "attached banner to {}", coupon.code).map_err(write_failed)
}

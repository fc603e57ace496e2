use std::io;

use skawsh_coupons::service::CouponsService;

use crate::cli::{tables::history_table, write_failed};

pub(crate) async fn run(service: &dyn CouponsService, out: &mut impl io::Write) -> Result<(), String> {
    let entries = service.history().await;

    if entries.is_empty() {
        return writeln!(out, "the archive is empty").map_err(write_failed);
    }

    writeln!(out, "{}", history_table(&entries)).map_err(write_failed)
}

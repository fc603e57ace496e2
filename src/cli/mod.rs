use std::{io, path::PathBuf, sync::Arc, time::Duration};

use clap::{Parser, Subcommand};
use skawsh_coupons::{
    clock::{MARKETPLACE_TIME_ZONE, SystemClock},
    fixtures,
    service::{CouponsService, InMemoryCouponsService, Latency},
    store::CouponStore,
};

mod apply;
mod banner;
mod create;
mod delete;
mod generate_code;
mod history;
mod list;
mod tables;

/// Skawsh coupon administration
#[derive(Debug, Parser)]
#[command(name = "skawsh-coupons", about = "Skawsh coupon console", long_about = None)]
pub(crate) struct Cli {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, global = true, env = "RUST_LOG", default_value = "info")]
    pub(crate) log_level: String,

    /// YAML file to seed the store from instead of the built-in examples
    #[arg(long, global = true, env = "COUPONS_SEED")]
    seed: Option<PathBuf>,

    /// Simulated delay before a submitted coupon is saved
    #[arg(long, global = true, env = "COUPONS_LATENCY_MS", default_value = "1000")]
    latency_ms: u64,

    /// Simulated delay before an uploaded banner is saved
    #[arg(
        long,
        global = true,
        env = "COUPONS_BANNER_LATENCY_MS",
        default_value = "800"
    )]
    banner_latency_ms: u64,

    /// IANA time zone coupon schedules are read in
    #[arg(
        long,
        global = true,
        env = "COUPONS_TIME_ZONE",
        default_value = MARKETPLACE_TIME_ZONE
    )]
    time_zone: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List coupons still under management
    List(list::ListArgs),

    /// List archived coupons with the reason they were archived
    History,

    /// Apply a coupon to a cart and print the bill
    Apply(apply::ApplyArgs),

    /// Create or edit a coupon from a YAML draft
    Create(create::CreateArgs),

    /// Deactivate a coupon
    Delete(delete::DeleteArgs),

    /// Attach an image banner to a coupon
    Banner(banner::BannerArgs),

    /// Suggest a coupon code
    GenerateCode(generate_code::GenerateCodeArgs),
}

impl Cli {
    /// Load configuration from environment and CLI arguments
    pub(crate) fn load() -> Result<Self, clap::Error> {
        _ = dotenvy::dotenv();

        Self::try_parse()
    }

    pub(crate) async fn run(self, out: &mut impl io::Write) -> Result<(), String> {
        let service = self.service()?;

        dispatch(self.command, &service, out).await
    }

    fn service(&self) -> Result<InMemoryCouponsService, String> {
        let coupons = match &self.seed {
            Some(path) => fixtures::load(path),
            None => fixtures::seed(),
        }
        .map_err(|error| format!("failed to load seed coupons: {error}"))?;

        let latency = Latency {
            submit: Duration::from_millis(self.latency_ms),
            banner: Duration::from_millis(self.banner_latency_ms),
        };

        let clock = SystemClock::in_zone(&self.time_zone)
            .map_err(|error| format!("unknown time zone `{}`: {error}", self.time_zone))?;

        Ok(InMemoryCouponsService::new(
            CouponStore::with_coupons(coupons),
            Arc::new(clock),
        )
        .with_latency(latency))
    }
}

async fn dispatch(
    command: Commands,
    service: &dyn CouponsService,
    out: &mut impl io::Write,
) -> Result<(), String> {
    match command {
        Commands::List(args) => list::run(args, service, out).await,
        Commands::History => history::run(service, out).await,
        Commands::Apply(args) => apply::run(args, service, out).await,
        Commands::Create(args) => create::run(args, service, out).await,
        Commands::Delete(args) => delete::run(args, service, out).await,
        Commands::Banner(args) => banner::run(args, service, out).await,
        Commands::GenerateCode(args) => generate_code::run(&args, &mut rand::thread_rng(), out),
    }
}

fn write_failed(error: io::Error) -> String {
    format!("failed to write output: {error}")
}

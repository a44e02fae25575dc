use std::sync::atomic::{AtomicU64, Ordering};

use anyhow::Result;
use clap::Parser;
use sheetsrv::server::{ServiceConfig, SheetsrvServer};
use tokio::net::TcpListener;
use tokio::runtime::{Builder, Runtime};
use tracing::info;

#[derive(Parser)]
#[clap(name = "sheetsrv")]
#[clap(version)]
#[clap(about = "HTTP service exposing a Drive spreadsheet as JSON", long_about = None)]
struct Cli {
    /// Log verbosity.
    #[clap(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Output logs in json format.
    #[clap(long)]
    log_json: bool,

    /// TCP address to bind to.
    #[clap(short, long, value_parser, default_value = "0.0.0.0:8080")]
    bind: String,

    /// Service account key used to authenticate with the Drive API.
    ///
    /// Expects the full JSON document, not a path to it.
    #[clap(
        long,
        value_parser,
        env = "SERVICE_ACCOUNT_JSON",
        hide_env_values = true
    )]
    service_account_json: String,

    /// Identifier of the spreadsheet file to serve.
    #[clap(long, value_parser, env = "DRIVE_FILE_ID")]
    file_id: String,

    /// Base URL of the Drive API.
    ///
    /// (Internal)
    ///
    /// Only used to point the service at a stand-in API during testing.
    #[clap(
        long,
        value_parser,
        hide = true,
        default_value = "https://www.googleapis.com"
    )]
    drive_api_url: String,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logutil::init(cli.verbose, cli.log_json);

    info!(version = env!("CARGO_PKG_VERSION"), "starting...");

    let bind = cli.bind;
    let conf = ServiceConfig {
        service_account_json: cli.service_account_json,
        file_id: cli.file_id,
        drive_api_url: cli.drive_api_url,
    };

    let runtime = build_runtime("sheetsrv")?;
    runtime.block_on(async move {
        let listener = TcpListener::bind(&bind).await?;
        let server = SheetsrvServer::new(conf);
        server.serve(listener).await
    })
}

fn build_runtime(thread_label: &'static str) -> Result<Runtime> {
    let runtime = Builder::new_multi_thread()
        .thread_name_fn(move || {
            static THREAD_ID: AtomicU64 = AtomicU64::new(0);
            let id = THREAD_ID.fetch_add(1, Ordering::Relaxed);
            format!("{}-thread-{}", thread_label, id)
        })
        .enable_all()
        .build()?;

    Ok(runtime)
}

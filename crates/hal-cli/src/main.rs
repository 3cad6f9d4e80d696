//! hal-example: a meeting-room API answered as HAL documents
//!
//! Commands: list, get, search

mod rooms;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use hal_core::Formatting;
use hal_host::{HalConfig, HalPresenter, HalResponse, PagedResult, Payload, RequestContext, RequestUrl};

#[derive(Parser)]
#[command(name = "hal-example")]
#[command(version)]
#[command(about = "Meeting-room API answered as HAL documents")]
struct Cli {
    /// Base URL the API is served from; a path is treated as the mount point
    #[arg(long, global = true, default_value = "http://localhost:5000")]
    base_url: String,

    /// HAL config file (.toml, .yaml or .yml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Single-line output
    #[arg(long, global = true)]
    compact: bool,

    /// Answer with plain JSON instead of HAL
    #[arg(long, global = true)]
    disabled: bool,

    /// Run as a production host (links default to https)
    #[arg(long, global = true)]
    production: bool,

    /// Log presenter decisions to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// One page of meeting rooms
    #[command(alias = "ls")]
    List {
        #[arg(long, default_value_t = 1)]
        page: u64,
        #[arg(long, default_value_t = 5)]
        size: u64,
    },
    /// A single meeting room by id
    Get { id: u32 },
    /// Meeting rooms whose name contains a fragment
    #[command(alias = "s")]
    Search { name: String },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(&cli) {
        Ok(response) => {
            println!("{}", response.text());
            if (200..=299).contains(&response.status) {
                ExitCode::SUCCESS
            } else {
                eprintln!("status {}", response.status);
                ExitCode::FAILURE
            }
        }
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::from(2)
        }
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: &Cli) -> Result<HalResponse> {
    let config = load_config(cli)?;
    let presenter = HalPresenter::new(config).with_item_path(rooms::item_path);

    let base = RequestUrl::parse(&cli.base_url)
        .with_context(|| format!("invalid --base-url '{}'", cli.base_url))?;
    let mount = base.path().trim_end_matches('/').to_string();
    let root = base.with_path(base.scheme(), &format!("{mount}{}", rooms::ROUTE));

    let (target, status, payload) = match &cli.command {
        Commands::List { page, size } => {
            let paged = PagedResult::paginate(rooms::all(), *page, *size);
            (
                format!("{root}?size={size}&page={page}"),
                200,
                Payload::paged(paged)?,
            )
        }
        Commands::Get { id } => match rooms::find(*id) {
            Some(room) => (format!("{root}/{id}"), 200, Payload::object(room)?),
            None => (
                format!("{root}/{id}"),
                404,
                Payload::object(format!("Meeting Room Id {id} doesn't exist."))?,
            ),
        },
        Commands::Search { name } => (
            format!("{root}/get-by-name/{}", urlencoding::encode(name)),
            200,
            Payload::collection(rooms::search(name))?,
        ),
    };

    let url = RequestUrl::parse(&target)
        .with_context(|| format!("invalid request url '{target}'"))?
        .with_path_base(&mount);
    let request = RequestContext::new(url)
        .with_collection(rooms::CONTROLLER)
        .in_production(cli.production);
    tracing::debug!(url = %request.url, status, "presenting");

    let presented = presenter
        .present(status, payload, &request)
        .context("failed to present response")?;
    Ok(presented.into_response()?)
}

fn load_config(cli: &Cli) -> Result<HalConfig> {
    let mut config = match &cli.config {
        Some(path) => HalConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => {
            let mut config = HalConfig::default();
            config.serializer.formatting = Formatting::Indented;
            config
        }
    };
    if cli.compact {
        config.serializer.formatting = Formatting::Compact;
    }
    if cli.disabled {
        config.hal.enabled = false;
    }
    Ok(config)
}

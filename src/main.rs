use clap::Parser;
use fsel::commands::{execute_command, Command};
use fsel::display;
use fsel_core::config::Config;
use fsel_core::{FilterModel, FilterSelector, QueryError, ResourceKind, SearchOutcome};
use fsel_remote::HttpQueryService;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};

#[derive(Parser)]
#[command(name = "fsel", about = "Searchable multi-value filter selector")]
struct Cli {
    /// Write debug logs to /tmp/fsel-debug.log (tail -f to inspect).
    #[arg(long)]
    debug: bool,

    /// Config file to layer over the built-in defaults
    /// (default: ~/.config/fsel/config.toml).
    #[arg(long)]
    config: Option<PathBuf>,

    /// API root, e.g. http://localhost:3000.
    #[arg(long)]
    base_url: Option<String>,

    /// Collection to search: users or work_packages.
    #[arg(long)]
    resource: Option<ResourceKind>,

    /// Field used for free-text search. Pass an empty string to disable.
    #[arg(long)]
    search_field: Option<String>,

    /// Quiet period before a typed term is queried.
    #[arg(long)]
    debounce_ms: Option<u64>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if cli.debug {
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open("/tmp/fsel-debug.log")?;
        tracing_subscriber::fmt()
            .with_writer(std::sync::Mutex::new(file))
            .with_ansi(false)
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_env("RUST_LOG")
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug")),
            )
            .init();
        tracing::info!("fsel debug log started; tail -f /tmp/fsel-debug.log");
    }

    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load().unwrap_or_else(|err| {
            tracing::warn!(%err, "falling back to default config");
            Config::defaults()
        }),
    };
    apply_overrides(&mut config, &cli);

    // Everything runs on one thread; the selector never needs more.
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?
        .block_on(run(config))
}

fn apply_overrides(config: &mut Config, cli: &Cli) {
    if let Some(url) = &cli.base_url {
        config.api.base_url = url.clone();
    }
    if let Some(resource) = cli.resource {
        config.selector.resource = resource;
    }
    if let Some(field) = &cli.search_field {
        config.selector.search_field = Some(field.clone());
    }
    if let Some(ms) = cli.debounce_ms {
        config.selector.debounce_ms = ms;
    }
}

async fn run(config: Config) -> anyhow::Result<()> {
    let service = HttpQueryService::new(&config.api.base_url)?.with_page_size(config.api.page_size);

    let notifier = |err: &QueryError| eprintln!("! could not load options: {err}");
    let listener = |filter: &FilterModel| {
        tracing::info!(filter = %filter.name, count = filter.values.len(), "filter changed");
    };

    let mut filter = FilterModel::new(config.selector.filter_name.clone(), config.selector.value_kind);
    let mut selector = FilterSelector::new(
        config.selector.query_settings(),
        Arc::new(service),
        Arc::new(notifier),
        listener,
    );

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = std::io::stdout();

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                match Command::parse(&line) {
                    Ok(Command::Quit) => break,
                    Ok(cmd) => execute_command(&mut selector, &mut filter, cmd, &mut stdout)?,
                    Err(msg) if msg.is_empty() => {}
                    Err(msg) => eprintln!("{msg}"),
                }
            }
            update = selector.next_update() => match update {
                Some(SearchOutcome::Loaded { .. }) => {
                    display::write_view(&mut stdout, &selector.view(&filter))?;
                }
                Some(SearchOutcome::Failed { .. }) => {}
                None => break,
            },
        }
        stdout.flush()?;
    }

    selector.dispose();
    Ok(())
}

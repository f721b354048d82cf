//! MrProg trade worker tooling.
//!
//! Plans the controller inputs for a trade and inspects serialized trade
//! responses:
//!   mrprog-worker --config worker.toml plan --game 6 --chip "Cannon A"
//!   mrprog-worker plan --catalog games.json --game 6 --part "SuprArmr White"
//!   mrprog-worker decode-response response.json --image-out room.png

mod config;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use config::{WorkerConfig, load_catalogs};
use mrprog_autotrade::{Catalog, Input, InputPlanner, Pattern, ScreenLayout, TextMatch, Timings};
use mrprog_core::{Chip, Part, Platform, TradeItem, TradeResponse, Wire};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "mrprog-worker", version, about = "MrProg trade worker tooling")]
struct Cli {
    /// Worker config file.
    #[arg(long, env = "MRPROG_CONFIG", global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the inputs that move the trade screen cursor onto an item.
    Plan(PlanArgs),
    /// Show a serialized trade response and optionally extract its image.
    DecodeResponse {
        file: PathBuf,
        #[arg(long = "image-out")]
        image_out: Option<PathBuf>,
    },
}

#[derive(Args)]
struct PlanArgs {
    #[arg(long)]
    game: u8,
    /// Game data file; defaults to the one named in the worker config.
    #[arg(long)]
    catalog: Option<PathBuf>,
    /// Refuse games the platform does not carry.
    #[arg(long)]
    system: Option<Platform>,
    #[command(flatten)]
    item: ItemArgs,
}

#[derive(Args)]
#[group(required = true, multiple = false)]
struct ItemArgs {
    /// Chip as `Name Code`, e.g. "Cannon A".
    #[arg(long)]
    chip: Option<Chip>,
    /// Part as `Name Color`, e.g. "SuprArmr White".
    #[arg(long)]
    part: Option<Part>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::from_default_env().add_directive("mrprog=info".parse()?))
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Plan(args) => plan(cli.config.as_deref(), args).await,
        Commands::DecodeResponse { file, image_out } => {
            decode_response(cli.config.as_deref(), &file, image_out.as_deref()).await
        }
    }
}

async fn plan(config: Option<&Path>, args: PlanArgs) -> Result<()> {
    let config = match config {
        Some(path) => Some(WorkerConfig::load(path).await?),
        None => None,
    };
    let catalog_path = match (args.catalog, &config) {
        (Some(path), _) => path,
        (None, Some(config)) => config.catalog.clone(),
        (None, None) => anyhow::bail!("no game data: pass --catalog or --config"),
    };

    if let Some(system) = args.system {
        anyhow::ensure!(
            system.supports(args.game),
            "{system} does not carry game {}",
            args.game
        );
    }

    let catalogs = load_catalogs(&catalog_path).await?;
    let catalog = catalogs.for_game(args.game)?;
    let item = resolve_item(catalog, args.item)?;
    let planner = InputPlanner::new(catalog)?;
    let inputs = planner.inputs_for(&item)?;

    let (layout, timings) = match config {
        Some(config) => (config.layout, config.timings),
        None => (ScreenLayout::default(), Timings::default()),
    };
    let label = selection_label(&layout, &planner, &item);

    tracing::info!(game = args.game, item = %item, inputs = inputs.len(), "Planned trade");
    println!("{item}: {}", format_inputs(&inputs));
    println!(
        "opens on {} at {:?}, waiting up to {:?}",
        describe(&label.pattern),
        label.region,
        timings.navigate_timeout
    );
    Ok(())
}

/// The label that shows the selection screen for `item` has opened.
fn selection_label(layout: &ScreenLayout, planner: &InputPlanner, item: &TradeItem) -> TextMatch {
    match item {
        TradeItem::Chip(_) => layout.chip_select.clone(),
        TradeItem::Part(_) => layout.part_select(planner.starting_part()),
    }
}

fn describe(pattern: &Pattern) -> String {
    match pattern {
        Pattern::Exact(text) => format!("{text:?}"),
        Pattern::Prefix(text) => format!("{text:?}..."),
    }
}

/// Match the typed item against the catalog, returning the catalog's spelling.
fn resolve_item(catalog: &Catalog, item: ItemArgs) -> Result<TradeItem> {
    let game = catalog.game;
    match (item.chip, item.part) {
        (Some(chip), _) => {
            let found = catalog
                .find_chip(&chip.name, chip.code)
                .with_context(|| format!("{chip} is not tradable in game {game}"))?;
            if catalog.illegal_chips.contains(found) {
                tracing::warn!(chip = %found, "Chip is not legal for trade");
            }
            Ok(found.clone().into())
        }
        (None, Some(part)) => {
            let found = catalog
                .find_part(&part.name, &part.color)
                .with_context(|| format!("{part} is not tradable in game {game}"))?;
            if catalog.illegal_parts.contains(found) {
                tracing::warn!(part = %found, "Part is not legal for trade");
            }
            Ok(found.clone().into())
        }
        (None, None) => anyhow::bail!("pass --chip or --part"),
    }
}

fn format_inputs(inputs: &[Input]) -> String {
    if inputs.is_empty() {
        return "(already selected)".to_string();
    }
    inputs
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

async fn decode_response(
    config: Option<&Path>,
    file: &Path,
    image_out: Option<&Path>,
) -> Result<()> {
    let data = tokio::fs::read(file)
        .await
        .with_context(|| format!("reading {}", file.display()))?;
    let response = TradeResponse::from_bytes(&data)?;

    if let Some(path) = config {
        let config = WorkerConfig::load(path).await?;
        if let Some(other) = foreign_worker(&config, &response) {
            tracing::warn!(
                expected = %config.worker_id,
                worker = %other,
                "Response is from another worker"
            );
        }
    }

    println!(
        "trade {} for {} ({}) by {}",
        response.request.trade_id,
        response.request.user_name,
        response.request.trade_item,
        response.worker_id
    );
    match &response.message {
        Some(message) => println!("{}: {message}", response.status),
        None => println!("{}", response.status),
    }

    let image = response.image()?;
    match (image, image_out) {
        (Some(image), Some(out)) => {
            tokio::fs::write(out, &image)
                .await
                .with_context(|| format!("writing {}", out.display()))?;
            tracing::info!(path = %out.display(), bytes = image.len(), "Wrote image");
        }
        (Some(image), None) => println!("image: {} bytes", image.len()),
        (None, Some(_)) => anyhow::bail!("response carries no image"),
        (None, None) => {}
    }
    Ok(())
}

/// The responding worker, when it is not the configured one.
fn foreign_worker<'a>(config: &WorkerConfig, response: &'a TradeResponse) -> Option<&'a str> {
    (response.worker_id != config.worker_id).then_some(response.worker_id.as_str())
}

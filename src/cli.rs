// src/cli.rs
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use color_eyre::eyre::{eyre, Result, WrapErr};

use crate::config::consts::STORE_DIR;
use crate::config::ShopOptions;
use crate::core::net::GitHubSource;
use crate::data::Inventory;
use crate::image::ImageMeta;
use crate::present;
use crate::progress::Progress;
use crate::query::{query, QueryParams, SortMode};
use crate::reserve::{Contact, Reservation, ReservationSink};
use crate::store::{FileKv, SnapshotStore};
use crate::sync::{SyncOptions, SyncStatus, Syncer};

#[derive(Debug, Parser)]
#[command(name = "fragshop", version, about = "Browse and reserve inventory listed as GitHub issues")]
pub struct Cli {
    /// JSON config file (camelCase keys, all optional)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Directory for the local snapshot
    #[arg(long, global = true, default_value = STORE_DIR)]
    pub store: PathBuf,

    /// Use the saved snapshot only; no network
    #[arg(long, global = true)]
    pub offline: bool,

    /// Debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Sync and print a one-line status
    Refresh,
    /// Grouped product listing
    List(ListArgs),
    /// Houses matching the search, with counts and totals
    Houses(FilterArgs),
    /// One product in full
    Show { number: u64 },
    /// Reserve a product by issue number
    Reserve(ReserveArgs),
}

#[derive(Debug, Args)]
pub struct FilterArgs {
    /// Case-insensitive search over house, name, type, size and labels
    #[arg(short, long, default_value = "")]
    pub search: String,

    /// Exact house name
    #[arg(long, default_value = "")]
    pub house: String,
}

#[derive(Debug, Args)]
pub struct ListArgs {
    #[command(flatten)]
    pub filter: FilterArgs,

    /// updated_desc | price_asc | price_desc | house_asc | name_asc | none
    #[arg(long, default_value = "updated_desc", value_parser = parse_sort)]
    pub sort: SortMode,

    /// Show every item of these houses instead of the preview
    #[arg(long = "expand")]
    pub expand: Vec<String>,

    /// Show every item of every house
    #[arg(long)]
    pub expand_all: bool,
}

#[derive(Debug, Args)]
pub struct ReserveArgs {
    pub number: u64,
    #[arg(long, default_value = "")]
    pub name: String,
    #[arg(long, default_value = "")]
    pub contact: String,
    #[arg(long, default_value = "")]
    pub payment: String,
    #[arg(long, default_value = "")]
    pub delivery: String,
    #[arg(long, default_value = "")]
    pub notes: String,
}

fn parse_sort(s: &str) -> Result<SortMode, String> {
    s.parse()
}

/// Status lines on stderr so stdout stays clean for the listing.
struct CliProgress;

impl Progress for CliProgress {
    fn log(&mut self, msg: &str) {
        eprintln!("{msg}");
    }
    fn preview(&mut self, count: usize) {
        eprintln!("Showing {count} saved items while checking for updates…");
    }
    fn page_done(&mut self, page: u32, count: usize) {
        eprintln!("Fetched page {page} ({count} entries)");
    }
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    crate::log::init(cli.verbose, &cli.store);

    let opts = match &cli.config {
        Some(path) => ShopOptions::from_json_file(path)?,
        None => ShopOptions::default(),
    };

    let (inventory, status) = load_inventory(&opts, &cli.store, cli.offline)?;
    if let Some(banner) = status.banner() {
        eprintln!("{banner}");
    }

    match cli.command {
        Command::Refresh => {
            println!("{}", status.summary());
            println!("Source: {}", opts.inventory_repo_url());
        }
        Command::List(args) => {
            let params = QueryParams {
                search: args.filter.search,
                house: args.filter.house,
                sort: args.sort,
            };
            let result = query(inventory.products(), &params);

            let expanded: HashSet<String> = if args.expand_all {
                result.rollup.keys().cloned().collect()
            } else {
                args.expand.into_iter().collect()
            };
            let root = Path::new(".");
            let text = present::listing(&result, opts.house_preview_count, &expanded, |p| {
                ImageMeta::for_product(p, &opts).first_existing(root).map(String::from)
            });
            print!("{text}");
        }
        Command::Houses(filter) => {
            let params = QueryParams { search: filter.search, house: filter.house, sort: SortMode::Unsorted };
            let result = query(inventory.products(), &params);
            for line in present::house_rows(&result, &params.house) {
                println!("{line}");
            }
        }
        Command::Show { number } => {
            let item = inventory
                .find_by_number(number)
                .ok_or_else(|| eyre!("No listing #{number} in the current inventory"))?;
            let image = ImageMeta::for_product(item, &opts);
            println!("{}", present::card(item, image.first_existing(Path::new("."))));
            if !item.labels().is_empty() {
                println!("    Labels  {}", item.labels().join(", "));
            }
        }
        Command::Reserve(args) => {
            let item = inventory
                .find_by_number(args.number)
                .ok_or_else(|| eyre!("No listing #{} in the current inventory", args.number))?;
            let contact = Contact {
                name: args.name,
                contact: args.contact,
                payment: args.payment,
                delivery: args.delivery,
                notes: args.notes,
            };
            let sink = ReservationSink::from_options(&opts)?;
            match sink.submit(item, &contact).wrap_err("Reservation failed")? {
                Reservation::Link(url) => {
                    println!("Open this link to finish your reservation:");
                    println!("{url}");
                }
                Reservation::Submitted { message } => println!("{message}"),
            }
        }
    }

    // Blocking failures still print what we have (nothing) before exiting non-zero.
    if status.is_blocking() {
        return Err(eyre!(status.summary()));
    }
    Ok(())
}

fn load_inventory(opts: &ShopOptions, store_dir: &Path, offline: bool) -> Result<(Inventory, SyncStatus)> {
    let store = SnapshotStore::new(FileKv::new(store_dir));
    let source = GitHubSource::new(opts).wrap_err("Could not set up the HTTP client")?;
    let mut syncer = Syncer::new(source, store, SyncOptions::from(opts));

    let mut inventory = Inventory::new();
    let status = if offline {
        syncer.load_cached(&mut inventory)
    } else {
        let mut progress = CliProgress;
        syncer.refresh(&mut inventory, Some(&mut progress))
    };
    Ok((inventory, status))
}

//! Pollyanna - Secret Santa draw CLI
//!
//! The `pollyanna` command runs the yearly draw and keeps its history.
//!
//! ## Commands
//!
//! - `draw`: draw this year's pairs, save them and notify everyone
//! - `history`: list the recorded years
//! - `show`: print one recorded year

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Datelike;
use clap::{Parser, Subcommand};
use pollyanna_core::{
    generate, Category, DrawConfig, PairingResult, Year, DEFAULT_MAX_ATTEMPTS,
    DEFAULT_MEMORY_LENGTH,
};
use pollyanna_notify::{
    notify_all, DeliveryReport, LogNotifier, Notifier, NotifyRequest, OutboxNotifier,
    WebhookConfig, WebhookNotifier,
};
use pollyanna_store::{load_participants, HistoryStore, JsonHistoryStore};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{info, warn, Level};

const DEFAULT_PARTICIPANTS_PATH: &str = "resources/participants.json";
const DEFAULT_HISTORY_PATH: &str = "resources/prior_year_santa_results.json";

#[derive(Parser)]
#[command(name = "pollyanna")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Pollyanna (Secret Santa) draw with a genuine and a gag gift", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long, global = true)]
    json: bool,

    /// History file (year -> regular/gag assignments)
    #[arg(long, global = true, env = "POLLYANNA_HISTORY", default_value = DEFAULT_HISTORY_PATH)]
    history: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Draw this year's pairs, record them and notify every participant
    Draw {
        /// Participants file (name -> contact)
        #[arg(
            short,
            long,
            env = "POLLYANNA_PARTICIPANTS",
            default_value = DEFAULT_PARTICIPANTS_PATH
        )]
        participants: PathBuf,

        /// Prior years that block repeat recipients
        #[arg(short, long, env = "POLLYANNA_MEMORY_LENGTH", default_value_t = DEFAULT_MEMORY_LENGTH)]
        memory_length: usize,

        /// Full redraws before giving up
        #[arg(long, env = "POLLYANNA_MAX_ATTEMPTS", default_value_t = DEFAULT_MAX_ATTEMPTS)]
        max_attempts: usize,

        /// Year being drawn (default: current year)
        #[arg(short, long)]
        year: Option<Year>,

        /// Seed for a reproducible draw
        #[arg(long)]
        seed: Option<u64>,

        /// Image embedded in the HTML message
        #[arg(long, env = "POLLYANNA_GIF_URL")]
        gif_url: Option<String>,

        /// Write messages as JSON files into this directory
        #[arg(long)]
        outbox: Option<PathBuf>,

        /// POST messages to this endpoint
        #[arg(long, env = "POLLYANNA_WEBHOOK_URL")]
        webhook_url: Option<String>,

        /// Bearer token for the webhook
        #[arg(long, env = "POLLYANNA_WEBHOOK_TOKEN", hide_env_values = true)]
        webhook_token: Option<String>,

        /// Draw and log only: nothing is saved or sent
        #[arg(long)]
        dry_run: bool,
    },

    /// List recorded years
    History,

    /// Print the pairs recorded for one year
    Show {
        /// Year to print
        #[arg(short, long)]
        year: Year,
    },
}

/// Everything `draw` needs, resolved from flags and environment.
struct DrawOptions {
    participants: PathBuf,
    config: DrawConfig,
    year: Year,
    seed: Option<u64>,
    gif_url: Option<String>,
    outbox: Option<PathBuf>,
    webhook: Option<WebhookConfig>,
    dry_run: bool,
}

/// What a completed draw did.
#[derive(Debug)]
struct DrawOutcome {
    pairing: PairingResult,
    saved: bool,
    report: DeliveryReport,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    pollyanna_core::init_tracing(cli.json, level);

    let store = JsonHistoryStore::new(&cli.history);

    match cli.command {
        Commands::Draw {
            participants,
            memory_length,
            max_attempts,
            year,
            seed,
            gif_url,
            outbox,
            webhook_url,
            webhook_token,
            dry_run,
        } => {
            let webhook = webhook_url.map(|url| {
                let config = WebhookConfig::new(&url);
                match webhook_token.as_deref() {
                    Some(token) => config.with_token(token),
                    None => config,
                }
            });
            let options = DrawOptions {
                participants,
                config: DrawConfig::new(memory_length, max_attempts),
                year: year.unwrap_or_else(current_year),
                seed,
                gif_url,
                outbox,
                webhook,
                dry_run,
            };
            let outcome = cmd_draw(&store, &options).await?;
            print_draw_summary(&options, &outcome, store.path());
            Ok(())
        }
        Commands::History => cmd_history(&store),
        Commands::Show { year } => cmd_show(&store, year),
    }
}

fn current_year() -> Year {
    chrono::Local::now().year()
}

/// Run the yearly draw.
///
/// The participant list is loaded first and any problem with it aborts the
/// run. The new year is saved before anyone is notified, so nobody hears
/// about a draw that was not recorded.
async fn cmd_draw(store: &dyn HistoryStore, options: &DrawOptions) -> Result<DrawOutcome> {
    let participants = load_participants(&options.participants).with_context(|| {
        format!(
            "Failed to load participants from {:?}; expected a JSON object of name: contact pairs",
            options.participants
        )
    })?;

    let history = store.load().context("Failed to load prior year results")?;
    if history.year(options.year).is_some() {
        warn!(
            year = options.year,
            "A draw is already recorded for this year and will be overwritten"
        );
    }

    let mut rng = match options.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    let names = participants.names();
    let pairing = generate(&names, &history, &options.config, options.year, &mut rng)
        .context("Draw failed")?;

    if options.dry_run {
        info!(year = options.year, "Dry run: results not saved");
        let report =
            notify_all(&LogNotifier, &pairing, &participants, &notify_request(options)).await;
        return Ok(DrawOutcome {
            pairing,
            saved: false,
            report,
        });
    }

    store
        .record_year(options.year, &pairing.to_year_record())
        .context("Failed to save this year's results")?;
    info!(year = options.year, "Results saved");

    let notifier = build_notifier(options)?;
    let report = notify_all(
        notifier.as_ref(),
        &pairing,
        &participants,
        &notify_request(options),
    )
    .await;
    if !report.all_delivered() {
        warn!(
            failed = report.failed.len(),
            "Some participants were not notified; see log for details"
        );
    }

    Ok(DrawOutcome {
        pairing,
        saved: true,
        report,
    })
}

fn notify_request(options: &DrawOptions) -> NotifyRequest {
    let request = NotifyRequest::new(options.year);
    match &options.gif_url {
        Some(url) => request.with_gif_url(url.as_str()),
        None => request,
    }
}

/// Webhook wins over outbox; with neither, messages are only logged.
fn build_notifier(options: &DrawOptions) -> Result<Box<dyn Notifier>> {
    if let Some(config) = &options.webhook {
        let notifier =
            WebhookNotifier::new(config.clone()).context("Failed to set up webhook notifier")?;
        return Ok(Box::new(notifier));
    }
    if let Some(dir) = &options.outbox {
        let notifier = OutboxNotifier::new(dir, options.year)
            .with_context(|| format!("Failed to create outbox at {:?}", dir))?;
        return Ok(Box::new(notifier));
    }
    Ok(Box::new(LogNotifier))
}

fn print_draw_summary(options: &DrawOptions, outcome: &DrawOutcome, history_path: &Path) {
    println!(
        "Drew {} participants for {}",
        outcome.pairing.len(),
        options.year
    );
    if outcome.saved {
        println!("Results saved to {:?}", history_path);
    } else {
        println!("Dry run: nothing saved or sent");
    }
    println!(
        "Notified {}/{}",
        outcome.report.delivered.len(),
        outcome.report.total()
    );
    for (name, error) in &outcome.report.failed {
        println!("  not notified: {name} ({error})");
    }
}

/// List recorded years
fn cmd_history(store: &dyn HistoryStore) -> Result<()> {
    let history = store.load().context("Failed to load prior year results")?;
    if history.is_empty() {
        println!("No draws recorded");
        return Ok(());
    }

    println!("{:<6}  {:>7}  {:>4}", "YEAR", "REGULAR", "GAG");
    for (year, record) in history.years() {
        println!(
            "{:<6}  {:>7}  {:>4}",
            year,
            record.regular.len(),
            record.gag.len()
        );
    }
    Ok(())
}

/// Print the pairs recorded for one year
fn cmd_show(store: &dyn HistoryStore, year: Year) -> Result<()> {
    let history = store.load().context("Failed to load prior year results")?;
    let record = history
        .year(year)
        .with_context(|| format!("No draw recorded for {year}"))?;

    match PairingResult::combine(&record.regular, &record.gag) {
        Some(pairing) => {
            println!("{:<20}  {:<20}  {:<20}", "GIVER", "GENUINE GIFT", "GAG GIFT");
            for (giver, pair) in pairing.iter() {
                println!("{:<20}  {:<20}  {:<20}", giver, pair.regular, pair.gag);
            }
        }
        None => {
            // Partial or older records: print each category on its own.
            for category in Category::ALL {
                println!("[{category}]");
                for (giver, recipient) in record.assignment(category).iter() {
                    println!("  {giver} -> {recipient}");
                }
            }
        }
    }
    Ok(())
}

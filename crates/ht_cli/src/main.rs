use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use ht_core::{AppConfig, Error, ReadFilter, Result};
use ht_scrapers::{AgileBlogSource, HeadlineSource};
use ht_storage::LedgerStore;
use tracing::{error, info, warn, Level};
use url::Url;

/// Management of tracked articles. Without arguments the tool downloads the
/// current headlines from the tracked page and merges them into the local
/// ledger.
#[derive(Parser, Debug)]
#[command(name = "ht", author, disable_version_flag = true)]
struct Cli {
    /// Show version and configuration
    #[arg(short = 'v', long = "version")]
    version: bool,

    /// Show information about stored articles
    #[arg(short, long)]
    info: bool,

    /// Set the article with this id as read
    #[arg(short = 'r', long = "set-read", value_name = "ID")]
    set_read: Option<u32>,

    /// Set the article with this id as unread
    #[arg(short = 'u', long = "set-unread", value_name = "ID")]
    set_unread: Option<u32>,

    /// Show articles: all, read or unread
    #[arg(short, long, value_enum, value_name = "FILTER")]
    show: Option<ReadFilter>,

    /// Print shown articles as JSON lines instead of text
    #[arg(long, requires = "show")]
    json: bool,

    /// Ledger file location
    #[arg(long, value_name = "PATH")]
    data_file: Option<PathBuf>,

    /// Page to read headlines from
    #[arg(long, value_name = "URL")]
    page_url: Option<Url>,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    info!("---------- headline tracker started ----------");
    let outcome = run(cli).await;
    info!("---------- headline tracker finished ----------");

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            // Full detail goes to the log only; the operator gets one line.
            error!("run failed: {e:?}");
            eprintln!("The run ended abnormally. See the log for details.");
            ExitCode::FAILURE
        }
    }
}

/// Execute every requested operation. Multiple flags in one invocation all
/// run, in a fixed order; any of them suppresses the default ingestion run.
async fn run(cli: Cli) -> Result<()> {
    let config = AppConfig::new(cli.data_file, cli.page_url)?;
    let store = LedgerStore::open(&config.data_file);

    let mut ingest = true;

    if cli.version {
        print_banner("ABOUT");
        show_version(&config);
        ingest = false;
    }
    if cli.info {
        print_banner("ARTICLES INFORMATION");
        show_info(&store)?;
        ingest = false;
    }
    if let Some(id) = cli.set_read {
        print_banner("SET READ");
        set_read_state(&store, id, true)?;
        ingest = false;
    }
    if let Some(id) = cli.set_unread {
        print_banner("SET UNREAD");
        set_read_state(&store, id, false)?;
        ingest = false;
    }
    if let Some(filter) = cli.show {
        print_banner("SHOW ARTICLES");
        show_articles(&store, filter, cli.json)?;
        ingest = false;
    }

    if ingest {
        print_banner("READ ARTICLES FROM THE WEB");
        run_ingest(&config, &store).await?;
    }

    Ok(())
}

fn print_banner(title: &str) {
    println!("{:-<20} {title} {:-<20}", "", "");
}

fn show_version(config: &AppConfig) {
    println!("Version: {}", env!("CARGO_PKG_VERSION"));
    println!("Data file: {}", config.data_file.display());
    println!("Page URL: {}", config.page_url);
    println!("Link origin: {}", config.link_origin);
}

fn show_info(store: &LedgerStore) -> Result<()> {
    let ledger = store.load()?;
    println!("All articles: {}", ledger.count_all());
    println!("Read articles: {}", ledger.count_read());
    Ok(())
}

/// Read-state mutation. A missing id is operator feedback, not a failure;
/// duplicate ids mean the backing file broke its uniqueness invariant, which
/// is logged loudly but must not mask the other requested operations.
fn set_read_state(store: &LedgerStore, id: u32, read: bool) -> Result<()> {
    match store.set_read_state(id, read) {
        Ok(()) => {
            println!(
                "Article {id} was set as {}",
                if read { "read" } else { "unread" }
            );
            Ok(())
        }
        Err(Error::ArticleNotFound(_)) => {
            warn!("no article with id {id}");
            println!("Article {id} was not found");
            Ok(())
        }
        Err(e @ Error::DuplicateId { .. }) => {
            error!("ledger integrity violation: {e}");
            println!("Ledger integrity problem: {e}");
            Ok(())
        }
        Err(e) => Err(e),
    }
}

fn show_articles(store: &LedgerStore, filter: ReadFilter, json: bool) -> Result<()> {
    let ledger = store.load()?;
    for article in ledger.iter_filtered(filter) {
        if json {
            let line =
                serde_json::to_string(article).map_err(|e| Error::Storage(e.to_string()))?;
            println!("{line}");
        } else {
            println!(
                "Article {} [{}]",
                article.id,
                if article.read { "read" } else { "unread" }
            );
            println!("  {}", article.title);
            println!("  {}", article.link);
        }
    }
    Ok(())
}

/// The default full run: fetch, extract, merge, save, notify.
async fn run_ingest(config: &AppConfig, store: &LedgerStore) -> Result<()> {
    let source = AgileBlogSource::new(config.page_url.clone());
    let client = reqwest::Client::new();

    info!("📰 Reading headlines from {}", source.page_url());
    let headlines = match source.scrape(&client).await {
        Ok(headlines) => headlines,
        Err(Error::Http(e)) => {
            // A dead page means there is nothing to merge this run.
            error!("failed to fetch the page: {e}");
            println!("Could not load the page. Nothing to do this run; see the log for details.");
            return Ok(());
        }
        Err(e) => return Err(e),
    };
    info!("🔍 Extracted {} headline(s)", headlines.len());

    let mut ledger = store.load()?;
    let added = ledger.merge(&headlines, &config.link_origin)?;
    store.save(&ledger)?;
    info!("💾 Ledger saved with {added} new article(s)");

    if added > 0 {
        if let Err(e) = ht_notify::send_new_headlines(added).await {
            warn!("notification failed: {e}");
        }
    }

    println!("Added {added} new article(s).");
    println!("Run finished.");
    Ok(())
}

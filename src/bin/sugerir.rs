//! sugerir: interactive recommendations over a ratings dataset.
//!
//! Loads a dataset (snapshot-cached), then loops: ask for a user id, offer
//! recommendations or a prediction-accuracy report for that user.

use clap::{Parser, ValueEnum};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use sugerir::error::{Result, SugerirError};
use sugerir::metrics::evaluate;
use sugerir::ratings::{load_snapshot_or_build, DatasetConfig, RatingMatrix};
use sugerir::recommend::{Collaborative, ContentBased, Popularity, Recommender};
use sugerir::session::{Action, ItemCatalog, ItemKind};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "sugerir")]
#[command(about = "Interactive recommendations over a ratings dataset")]
#[command(version)]
struct Cli {
    /// Dataset family to load
    #[arg(value_enum)]
    dataset: Dataset,

    /// Recommendation strategy
    #[arg(value_enum, short, long, default_value = "popularity")]
    strategy: Strategy,

    /// Directory holding the dataset files
    #[arg(short, long, default_value = "data")]
    data_dir: PathBuf,

    /// Neighborhood size for collaborative filtering
    #[arg(short, long, default_value = "5")]
    k: usize,

    /// Minimum-vote threshold for the popularity strategy
    /// (prompted for interactively when omitted)
    #[arg(short, long)]
    min_votes: Option<usize>,

    /// Directory for cached snapshots
    #[arg(long, default_value = ".sugerir-cache")]
    cache_dir: PathBuf,

    /// Always rebuild from the raw files, ignoring any snapshot
    #[arg(long)]
    no_cache: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Dataset {
    Movielens,
    Books,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Strategy {
    Popularity,
    Collaborative,
    Content,
}

fn main() {
    if let Err(e) = run() {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let (config, kind) = match cli.dataset {
        Dataset::Movielens => (DatasetConfig::movielens(&cli.data_dir), ItemKind::Movie),
        Dataset::Books => (DatasetConfig::books(&cli.data_dir), ItemKind::Book),
    };

    let store = if cli.no_cache {
        config.load()?
    } else {
        std::fs::create_dir_all(&cli.cache_dir)?;
        load_snapshot_or_build(&config, &cli.cache_dir)?
    };
    info!(
        users = store.n_users(),
        items = store.n_items(),
        "dataset ready"
    );

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    let strategy = build_strategy(&cli, &mut lines)?;
    let catalog = ItemCatalog::new(&config.items_path, kind);

    loop {
        let Some(user) = prompt(&mut lines, "user id (blank to quit)> ")? else {
            break;
        };
        if user.is_empty() {
            break;
        }
        if !store.contains_user(&user) {
            println!("unknown user {user:?}; try another id");
            continue;
        }

        let action = loop {
            let Some(choice) =
                prompt(&mut lines, "1) recommend  2) evaluate  3) quit\n> ")?
            else {
                return Ok(());
            };
            match Action::parse(&choice) {
                Some(action) => break action,
                None => println!("please answer 1, 2 or 3"),
            }
        };

        match action {
            Action::Recommend => show_recommendations(strategy.as_ref(), &store, &catalog, &user),
            Action::Evaluate => show_evaluation(strategy.as_ref(), &store, &user),
            Action::Quit => break,
        }
    }
    Ok(())
}

fn build_strategy(
    cli: &Cli,
    lines: &mut impl Iterator<Item = io::Result<String>>,
) -> Result<Box<dyn Recommender>> {
    Ok(match cli.strategy {
        Strategy::Popularity => {
            let min_votes = match cli.min_votes {
                Some(m) => m,
                None => prompt_min_votes(lines)?,
            };
            Box::new(Popularity::new(min_votes))
        }
        Strategy::Collaborative => Box::new(Collaborative::new(cli.k)),
        Strategy::Content => Box::new(ContentBased::new()),
    })
}

/// Ask for the popularity vote threshold until a number arrives.
fn prompt_min_votes(
    lines: &mut impl Iterator<Item = io::Result<String>>,
) -> Result<usize> {
    loop {
        let Some(answer) = prompt(lines, "minimum votes per item> ")? else {
            return Err(SugerirError::Other(
                "input closed before a vote threshold was given".to_string(),
            ));
        };
        match answer.parse::<usize>() {
            Ok(m) => return Ok(m),
            Err(_) => println!("please enter a non-negative whole number"),
        }
    }
}

fn show_recommendations(
    strategy: &dyn Recommender,
    store: &RatingMatrix,
    catalog: &ItemCatalog,
    user: &str,
) {
    let rec = match strategy.recommend(store, user) {
        Ok(rec) => rec,
        Err(e) => {
            println!("no recommendation possible: {e}");
            return;
        }
    };
    if rec.items.is_empty() {
        println!("nothing left to recommend to {user}");
        return;
    }
    for (rank, item_id) in rec.items.iter().enumerate() {
        println!("#{}", rank + 1);
        match catalog.hydrate(item_id) {
            Ok(Some(details)) => println!("{details}"),
            Ok(None) => println!("TITLE: <{item_id}: not in catalog>"),
            Err(e) => println!("TITLE: <{item_id}: catalog unavailable: {e}>"),
        }
        println!();
    }
}

fn show_evaluation(strategy: &dyn Recommender, store: &RatingMatrix, user: &str) {
    let rec = match strategy.recommend(store, user) {
        Ok(rec) => rec,
        Err(e) => {
            println!("no prediction possible: {e}");
            return;
        }
    };
    let actual = store.ratings_vector(user);
    match evaluate(&rec.scores, &actual) {
        Ok(report) => {
            println!(
                "MAE {:.4}  RMSE {:.4}  over {} rated items",
                report.mae, report.rmse, report.n_rated
            );
        }
        Err(e) => println!("cannot evaluate for {user}: {e}"),
    }
}

/// Print a prompt and read one trimmed line; `None` when stdin is closed.
fn prompt(
    lines: &mut impl Iterator<Item = io::Result<String>>,
    label: &str,
) -> Result<Option<String>> {
    print!("{label}");
    io::stdout().flush()?;
    match lines.next() {
        Some(line) => Ok(Some(line?.trim().to_string())),
        None => Ok(None),
    }
}

//! Delimited-text ingestion for rating datasets.
//!
//! Two dataset families are supported through one [`DatasetConfig`]:
//! ratings-driven families (MovieLens-style: ids are discovered from the
//! ratings stream itself) and catalog-driven families (Books-style: ids are
//! pre-registered from item/user catalog files before any rating is seen,
//! and ratings referencing unknown ids are skipped).
//!
//! Loading is bounded: at most `max_items` distinct items (and optionally
//! `max_rating_rows` rating rows) are admitted, first-N-seen. This caps
//! memory for very large raw files and is a deliberate sampling policy.

use crate::error::{Result, SugerirError};
use crate::ratings::RatingMatrix;
use std::collections::HashSet;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Policy for rating records that fail to parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BadLine {
    /// Skip the record and keep loading (tolerant dataset families).
    Skip,
    /// Abort the whole load with a parse error.
    Fail,
}

/// Describes one dataset family: file locations, column layout, and
/// admission caps.
///
/// # Examples
///
/// ```
/// use sugerir::ratings::DatasetConfig;
///
/// let config = DatasetConfig::movielens("data/MovieLens100k").with_max_items(1000);
/// assert_eq!(config.max_items, 1000);
/// ```
#[derive(Debug, Clone)]
pub struct DatasetConfig {
    /// Dataset name, used to key the snapshot cache.
    pub name: String,
    /// Delimited ratings file: one header line, then one record per rating.
    pub ratings_path: PathBuf,
    /// Item metadata catalog (id, title, feature text).
    pub items_path: PathBuf,
    /// Optional user catalog; when present together with `preregister`,
    /// user ids come from here instead of the ratings stream.
    pub users_path: Option<PathBuf>,
    /// Zero-based column positions in the ratings file.
    pub user_col: usize,
    pub item_col: usize,
    pub rating_col: usize,
    /// Zero-based column of the free-text feature field in the item catalog.
    pub feature_col: usize,
    /// Field delimiter in the ratings file.
    pub delimiter: char,
    /// At most this many distinct items are admitted (first seen wins).
    pub max_items: usize,
    /// Optional cap on the number of rating records read.
    pub max_rating_rows: Option<usize>,
    /// Pre-register ids from the catalogs instead of the ratings stream.
    pub preregister: bool,
    /// What to do with a rating record that fails to parse.
    pub bad_line: BadLine,
}

impl DatasetConfig {
    /// MovieLens-style preset: ids discovered from the ratings stream,
    /// `userId,movieId,rating,timestamp` layout, tolerant of bad rows.
    #[must_use]
    pub fn movielens<P: AsRef<Path>>(dir: P) -> Self {
        let dir = dir.as_ref();
        Self {
            name: "movielens100k".to_string(),
            ratings_path: dir.join("ratings.csv"),
            items_path: dir.join("movies.csv"),
            users_path: None,
            user_col: 0,
            item_col: 1,
            rating_col: 2,
            feature_col: 2,
            delimiter: ',',
            max_items: 50_000,
            max_rating_rows: None,
            preregister: false,
            bad_line: BadLine::Skip,
        }
    }

    /// Books-style preset: ids pre-registered from `Books.csv`/`Users.csv`
    /// catalogs, rating rows capped, parse errors fatal.
    #[must_use]
    pub fn books<P: AsRef<Path>>(dir: P) -> Self {
        let dir = dir.as_ref();
        Self {
            name: "books".to_string(),
            ratings_path: dir.join("Ratings.csv"),
            items_path: dir.join("Books.csv"),
            users_path: Some(dir.join("Users.csv")),
            user_col: 0,
            item_col: 1,
            rating_col: 2,
            feature_col: 2,
            delimiter: ',',
            max_items: 50_000,
            max_rating_rows: Some(50_000),
            preregister: true,
            bad_line: BadLine::Fail,
        }
    }

    /// Override the distinct-item admission cap.
    #[must_use]
    pub fn with_max_items(mut self, max_items: usize) -> Self {
        self.max_items = max_items;
        self
    }

    /// Override the rating-row cap.
    #[must_use]
    pub fn with_max_rating_rows(mut self, max_rows: usize) -> Self {
        self.max_rating_rows = Some(max_rows);
        self
    }

    /// Override the malformed-record policy.
    #[must_use]
    pub fn with_bad_line(mut self, policy: BadLine) -> Self {
        self.bad_line = policy;
        self
    }

    /// Source files that should invalidate a cached snapshot when touched.
    #[must_use]
    pub fn source_paths(&self) -> Vec<&Path> {
        let mut paths = vec![self.ratings_path.as_path(), self.items_path.as_path()];
        if let Some(users) = &self.users_path {
            paths.push(users.as_path());
        }
        paths
    }

    /// Builds the rating matrix from the configured files.
    ///
    /// # Errors
    ///
    /// Returns an error on I/O failure, or on a malformed rating record when
    /// the policy is [`BadLine::Fail`].
    pub fn load(&self) -> Result<RatingMatrix> {
        let mut store = RatingMatrix::new();
        if self.preregister {
            self.register_from_catalogs(&mut store)?;
        } else {
            self.register_from_ratings(&mut store)?;
        }
        info!(
            dataset = %self.name,
            users = store.n_users(),
            items = store.n_items(),
            "registered ids"
        );

        self.fill_ratings(&mut store)?;
        self.hydrate_features(&mut store)?;
        Ok(store)
    }

    /// One pass over the ratings stream collecting ids, stopping once the
    /// item cap is reached (first-N-seen, matching the source sampling).
    fn register_from_ratings(&self, store: &mut RatingMatrix) -> Result<()> {
        let reader = open_records(&self.ratings_path)?;
        let mut seen_items: HashSet<String> = HashSet::new();
        for line in reader {
            let line = line?;
            if seen_items.len() >= self.max_items {
                break;
            }
            let fields: Vec<&str> = line.split(self.delimiter).collect();
            let (Some(user), Some(item)) =
                (fields.get(self.user_col), fields.get(self.item_col))
            else {
                continue;
            };
            seen_items.insert((*item).to_string());
            store.register(user, item);
        }
        Ok(())
    }

    /// Pre-register item ids (capped) and user ids from the catalogs.
    fn register_from_catalogs(&self, store: &mut RatingMatrix) -> Result<()> {
        let mut items = csv_reader(&self.items_path)?;
        for record in items.records() {
            if store.n_items() >= self.max_items {
                break;
            }
            let record = record.map_err(|e| SugerirError::Other(format!("bad catalog record: {e}")))?;
            if let Some(id) = record.get(0) {
                store.register_item(id);
            }
        }

        let Some(users_path) = &self.users_path else {
            return Ok(());
        };
        let mut users = csv_reader(users_path)?;
        for record in users.records() {
            let record = record.map_err(|e| SugerirError::Other(format!("bad catalog record: {e}")))?;
            if let Some(id) = record.get(0) {
                store.register_user(id);
            }
        }
        Ok(())
    }

    /// Second pass: parse rating values and fill the matrix. Unknown ids are
    /// skipped by `set_rating` itself.
    fn fill_ratings(&self, store: &mut RatingMatrix) -> Result<()> {
        let reader = open_records(&self.ratings_path)?;
        let mut stored = 0usize;
        let mut skipped = 0usize;
        for (record_no, line) in reader.enumerate() {
            if let Some(cap) = self.max_rating_rows {
                if record_no >= cap {
                    break;
                }
            }
            let line = line?;
            let fields: Vec<&str> = line.split(self.delimiter).collect();
            let parsed = self.parse_rating_fields(&fields);
            match parsed {
                Some((user, item, value)) => {
                    store.set_rating(user, item, value);
                    stored += 1;
                }
                None => match self.bad_line {
                    BadLine::Skip => {
                        skipped += 1;
                        debug!(record = record_no + 1, "skipping malformed rating record");
                    }
                    BadLine::Fail => {
                        return Err(SugerirError::Parse {
                            path: self.ratings_path.display().to_string(),
                            line: record_no + 1,
                            message: format!("expected a numeric rating in column {}", self.rating_col),
                        });
                    }
                },
            }
        }
        if skipped > 0 {
            warn!(skipped, "malformed rating records skipped");
        }
        info!(stored, "ratings loaded");
        Ok(())
    }

    fn parse_rating_fields<'a>(&self, fields: &[&'a str]) -> Option<(&'a str, &'a str, f32)> {
        let user = fields.get(self.user_col)?;
        let item = fields.get(self.item_col)?;
        let value: f32 = fields.get(self.rating_col)?.trim().parse().ok()?;
        Some((user, item, value))
    }

    /// Attach the free-text feature field (genres, author) to known items.
    /// The catalog may quote fields, so this goes through a real CSV parser.
    fn hydrate_features(&self, store: &mut RatingMatrix) -> Result<()> {
        let mut reader = match csv_reader(&self.items_path) {
            Ok(r) => r,
            Err(e) => {
                // The content-based strategy degrades to empty features; the
                // other strategies never need the catalog.
                warn!(path = %self.items_path.display(), error = %e, "item catalog unavailable");
                return Ok(());
            }
        };
        for record in reader.records() {
            let Ok(record) = record else { continue };
            let (Some(id), Some(text)) = (record.get(0), record.get(self.feature_col)) else {
                continue;
            };
            store.set_feature(id, text);
        }
        Ok(())
    }
}

/// Line iterator over a delimited ratings file with the header skipped.
fn open_records(path: &Path) -> Result<impl Iterator<Item = std::io::Result<String>>> {
    let file = File::open(path)?;
    Ok(BufReader::new(file).lines().skip(1))
}

fn csv_reader(path: &Path) -> Result<csv::Reader<File>> {
    csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .map_err(|e| SugerirError::Other(format!("failed to open {}: {e}", path.display())))
}

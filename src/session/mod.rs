//! Session glue: item-detail hydration and the interactive action surface.
//!
//! The engine itself only ever sees item ids. Turning an id into something a
//! person can read (title, genres, author) is a display concern, served from
//! the item metadata catalog on demand.

use crate::error::{Result, SugerirError};
use std::fmt;
use std::path::{Path, PathBuf};

/// Which dataset family the catalog describes; controls display formatting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemKind {
    /// Title plus pipe-delimited genre list.
    Movie,
    /// Title plus author.
    Book,
}

/// Human-readable details for one recommended item.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemDetails {
    pub id: String,
    pub title: String,
    /// Genre list for movies, author for books.
    pub extra: String,
    kind: ItemKind,
}

impl fmt::Display for ItemDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "TITLE: {}", self.title)?;
        match self.kind {
            ItemKind::Movie => {
                let genres: Vec<&str> = self.extra.split('|').collect();
                write!(f, "GENRES: {genres:?}")
            }
            ItemKind::Book => write!(f, "AUTHOR: {}", self.extra),
        }
    }
}

/// Lazy reader over the item metadata catalog.
///
/// Hydration scans the catalog for the requested id; recommendation lists are
/// five items long, so the linear scan stays cheap compared to caching the
/// whole catalog.
#[derive(Debug, Clone)]
pub struct ItemCatalog {
    path: PathBuf,
    kind: ItemKind,
}

impl ItemCatalog {
    /// Create a catalog reader over a metadata CSV (id, title, extra).
    pub fn new<P: AsRef<Path>>(path: P, kind: ItemKind) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            kind,
        }
    }

    /// Look up display details for an item. `Ok(None)` when the id is not in
    /// the catalog; recommendation output should note the gap and move on.
    ///
    /// # Errors
    ///
    /// Returns an error when the catalog file cannot be opened.
    pub fn hydrate(&self, item_id: &str) -> Result<Option<ItemDetails>> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_path(&self.path)
            .map_err(|e| {
                SugerirError::Other(format!("failed to open {}: {e}", self.path.display()))
            })?;
        for record in reader.records() {
            let Ok(record) = record else { continue };
            if record.get(0) == Some(item_id) {
                return Ok(Some(ItemDetails {
                    id: item_id.to_string(),
                    title: record.get(1).unwrap_or_default().to_string(),
                    extra: record.get(2).unwrap_or_default().to_string(),
                    kind: self.kind,
                }));
            }
        }
        Ok(None)
    }
}

/// The closed set of actions in the interactive loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Recommend,
    Evaluate,
    Quit,
}

impl Action {
    /// Parse a menu choice. `None` means re-prompt, never abort.
    #[must_use]
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim() {
            "1" => Some(Action::Recommend),
            "2" => Some(Action::Evaluate),
            "3" => Some(Action::Quit),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn movie_catalog(dir: &TempDir) -> ItemCatalog {
        let path = dir.path().join("movies.csv");
        fs::write(
            &path,
            "movieId,title,genres\n\
             10,\"Heat (1995)\",Action|Crime|Thriller\n\
             20,Sabrina (1995),Comedy|Romance\n",
        )
        .expect("write catalog");
        ItemCatalog::new(&path, ItemKind::Movie)
    }

    #[test]
    fn test_hydrate_known_movie() {
        let dir = TempDir::new().expect("temp dir");
        let catalog = movie_catalog(&dir);
        let details = catalog.hydrate("10").expect("read").expect("found");
        assert_eq!(details.title, "Heat (1995)");
        let text = details.to_string();
        assert!(text.contains("TITLE: Heat (1995)"));
        assert!(text.contains("GENRES:"));
        assert!(text.contains("Action"));
    }

    #[test]
    fn test_hydrate_unknown_id_is_none() {
        let dir = TempDir::new().expect("temp dir");
        let catalog = movie_catalog(&dir);
        assert!(catalog.hydrate("99").expect("read").is_none());
    }

    #[test]
    fn test_hydrate_missing_catalog_errors() {
        let catalog = ItemCatalog::new("/nonexistent/movies.csv", ItemKind::Movie);
        assert!(catalog.hydrate("10").is_err());
    }

    #[test]
    fn test_book_display() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("Books.csv");
        fs::write(&path, "ISBN,Title,Author\nb1,Dune,Frank Herbert\n").expect("write");
        let catalog = ItemCatalog::new(&path, ItemKind::Book);
        let details = catalog.hydrate("b1").expect("read").expect("found");
        let text = details.to_string();
        assert!(text.contains("TITLE: Dune"));
        assert!(text.contains("AUTHOR: Frank Herbert"));
    }

    #[test]
    fn test_action_parse() {
        assert_eq!(Action::parse("1"), Some(Action::Recommend));
        assert_eq!(Action::parse(" 2 "), Some(Action::Evaluate));
        assert_eq!(Action::parse("3"), Some(Action::Quit));
        assert_eq!(Action::parse("7"), None);
        assert_eq!(Action::parse("quit"), None);
    }
}

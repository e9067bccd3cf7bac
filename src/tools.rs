//! Agent-facing wrappers around the catalog operations. Each tool takes only
//! primitive parameters and returns either a typed list or a pre-formatted
//! string, so an orchestration layer can expose them to a model directly.

use futures::TryStreamExt;
use std::sync::Arc;

use crate::client::{
    CatalogApi, DEFAULT_GENRE_LIMIT, DEFAULT_RECENT_LIMIT, DEFAULT_SEARCH_PAGE_SIZE,
    DEFAULT_SWEEP_PAGE_SIZE,
};
use crate::error::Result;
use crate::format;

/// Tool name / natural-language description pairs, in registration order.
pub const TOOL_DESCRIPTIONS: &[(&str, &str)] = &[
    (
        "all_movies",
        "Get a complete list of all movies available on the media server.",
    ),
    (
        "search_library",
        "Search for movies, TV shows, or other media by name. Optionally filter by media type (Movie, Series, Episode) and genre.",
    ),
    (
        "all_genres",
        "Get all available genres in the library. Optionally filter by media type (Movie, Series, etc.).",
    ),
    (
        "movies_by_genre",
        "Get movies filtered by a specific genre, sorted by rating.",
    ),
    ("recently_added", "Get recently added movies or TV shows."),
    (
        "item_details",
        "Get detailed information about a specific movie or show by searching for it.",
    ),
    ("favorites", "Get the user's favorite movies and shows."),
    ("items_by_year", "Get movies or shows from a specific year."),
];

pub struct CatalogTools {
    api: Arc<dyn CatalogApi>,
}

impl CatalogTools {
    pub fn new(api: Arc<dyn CatalogApi>) -> Self {
        Self { api }
    }

    /// Every movie name on the server, in server order. Streams page by
    /// page underneath; nothing beyond one page is held at a time until the
    /// names are collected here.
    pub async fn all_movies(&self) -> Result<Vec<String>> {
        self.api
            .all_movies(DEFAULT_SWEEP_PAGE_SIZE)
            .map_ok(|item| item.name)
            .try_collect()
            .await
    }

    pub async fn search_library(
        &self,
        query: &str,
        media_type: Option<&str>,
        genre: Option<&str>,
    ) -> Result<String> {
        let results = self
            .api
            .search(query, media_type, genre, DEFAULT_SEARCH_PAGE_SIZE)
            .await?;
        Ok(format::search_results(&results))
    }

    /// Genre names, already sorted alphabetically by the catalog layer.
    pub async fn all_genres(&self, media_type: Option<&str>) -> Result<Vec<String>> {
        let genres = self.api.genres(media_type).await?;
        Ok(genres.into_iter().map(|g| g.name).collect())
    }

    pub async fn movies_by_genre(&self, genre: &str, limit: Option<usize>) -> Result<String> {
        let limit = limit.unwrap_or(DEFAULT_GENRE_LIMIT);
        let movies = self.api.movies_by_genre(genre, limit).await?;
        Ok(format::movies_by_genre(genre, &movies))
    }

    pub async fn recently_added(
        &self,
        media_type: Option<&str>,
        limit: Option<usize>,
    ) -> Result<String> {
        let limit = limit.unwrap_or(DEFAULT_RECENT_LIMIT);
        let items = self.api.recently_added(media_type, limit).await?;
        Ok(format::recently_added(&items))
    }

    /// Resolves an item by name with a page-size-1 search, then renders the
    /// full detail view.
    pub async fn item_details(&self, name: &str) -> Result<String> {
        let mut results = self.api.search(name, None, None, 1).await?;
        match results.pop() {
            Some(item) => Ok(format::item_details(&item)),
            None => Ok(format!("Could not find item: {name}")),
        }
    }

    pub async fn favorites(&self, media_type: Option<&str>) -> Result<String> {
        let items = self.api.favorites(media_type).await?;
        Ok(format::favorites(&items))
    }

    pub async fn items_by_year(&self, year: i32, media_type: Option<&str>) -> Result<String> {
        let items = self.api.items_by_year(year, media_type).await?;
        Ok(format::items_by_year(year, &items))
    }
}

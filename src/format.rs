//! Rendering of typed catalog results into the summaries handed to the
//! conversational layer. Everything here is pure; wording is fixed so the
//! output is testable.

use crate::models::MediaItem;

const SEARCH_OVERVIEW_LIMIT: usize = 150;
const GENRE_OVERVIEW_LIMIT: usize = 120;
const YEAR_DISPLAY_CAP: usize = 20;

const TICKS_PER_SECOND: i64 = 10_000_000;

pub fn search_results(items: &[MediaItem]) -> String {
    if items.is_empty() {
        return "No results found.".to_string();
    }
    let mut out = format!("Found {} result(s):\n\n", items.len());
    for item in items {
        out.push_str(&format!("📺 {}\n", item.name));
        if let Some(year) = item.production_year {
            out.push_str(&format!("   Year: {year}\n"));
        }
        if let Some(genres) = item.genres.as_deref().filter(|g| !g.is_empty()) {
            out.push_str(&format!("   Genres: {}\n", genres.join(", ")));
        }
        if let Some(r) = item.community_rating {
            out.push_str(&format!("   Rating: {}/10\n", rating(r)));
        }
        if let Some(overview) = non_empty(item.overview.as_deref()) {
            out.push_str(&format!(
                "   Overview: {}\n",
                truncate(overview, SEARCH_OVERVIEW_LIMIT)
            ));
        }
        out.push('\n');
    }
    out
}

pub fn movies_by_genre(genre: &str, items: &[MediaItem]) -> String {
    if items.is_empty() {
        return format!("No movies found in genre: {genre}");
    }
    let mut out = format!("🎬 Top {} {} movies:\n\n", items.len(), genre);
    for movie in items {
        out.push_str(&format!("• {}", movie.name));
        if let Some(year) = movie.production_year {
            out.push_str(&format!(" ({year})"));
        }
        if let Some(r) = movie.community_rating {
            out.push_str(&format!(" - {}", rating(r)));
        }
        out.push('\n');
        if let Some(overview) = non_empty(movie.overview.as_deref()) {
            out.push_str(&format!(
                "  {}\n\n",
                truncate(overview, GENRE_OVERVIEW_LIMIT)
            ));
        }
    }
    out
}

pub fn recently_added(items: &[MediaItem]) -> String {
    if items.is_empty() {
        return "No recently added items found.".to_string();
    }
    let mut out = format!("Recently added ({}):\n\n", items.len());
    for item in items {
        out.push_str(&format!("• {}", item.name));
        if let Some(year) = item.production_year {
            out.push_str(&format!(" ({year})"));
        }
        if let Some(genres) = item.genres.as_deref().filter(|g| !g.is_empty()) {
            let shown: Vec<&str> = genres.iter().take(3).map(String::as_str).collect();
            out.push_str(&format!(" - {}", shown.join(", ")));
        }
        out.push('\n');
    }
    out
}

/// Single-item detail view. The overview is shown in full here, never
/// truncated.
pub fn item_details(item: &MediaItem) -> String {
    let mut out = format!("{}\n\n", item.name);
    if let Some(year) = item.production_year {
        out.push_str(&format!("Year: {year}\n"));
    }
    if let Some(genres) = item.genres.as_deref().filter(|g| !g.is_empty()) {
        out.push_str(&format!("Genres: {}\n", genres.join(", ")));
    }
    if let Some(r) = item.community_rating {
        out.push_str(&format!("Community Rating: {}/10\n", rating(r)));
    }
    if let Some(official) = non_empty(item.official_rating.as_deref()) {
        out.push_str(&format!("Rating: {official}\n"));
    }
    if let Some(ticks) = item.run_time_ticks {
        out.push_str(&format!("Runtime: {}\n", runtime(ticks)));
    }
    if let Some(overview) = non_empty(item.overview.as_deref()) {
        out.push_str(&format!("\nOverview:\n{overview}\n"));
    }
    out
}

pub fn favorites(items: &[MediaItem]) -> String {
    if items.is_empty() {
        return "No favorites found.".to_string();
    }
    let mut out = format!("Favorites ({}):\n\n", items.len());
    for item in items {
        out.push_str(&format!("• {}", item.name));
        if let Some(year) = item.production_year {
            out.push_str(&format!(" ({year})"));
        }
        if let Some(r) = item.community_rating {
            out.push_str(&format!(" - {}", rating(r)));
        }
        out.push('\n');
    }
    out
}

pub fn items_by_year(year: i32, items: &[MediaItem]) -> String {
    if items.is_empty() {
        return format!("No items found from {year}.");
    }
    let mut out = format!("Items from {} ({}):\n\n", year, items.len());
    for item in items.iter().take(YEAR_DISPLAY_CAP) {
        out.push_str(&format!("• {}", item.name));
        if let Some(genres) = item.genres.as_deref().filter(|g| !g.is_empty()) {
            let shown: Vec<&str> = genres.iter().take(3).map(String::as_str).collect();
            out.push_str(&format!("  {}", shown.join(", ")));
        }
        if let Some(r) = item.community_rating {
            out.push_str(&format!(" - {}", rating(r)));
        }
        out.push('\n');
    }
    if items.len() > YEAR_DISPLAY_CAP {
        out.push_str(&format!("\n... and {} more", items.len() - YEAR_DISPLAY_CAP));
    }
    out
}

/// One decimal place, always.
pub fn rating(value: f32) -> String {
    format!("{value:.1}")
}

/// Ticks are 100 ns units; whole hours and minutes only.
pub fn runtime(ticks: i64) -> String {
    let total_seconds = ticks / TICKS_PER_SECOND;
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    format!("{hours}h {minutes}m")
}

fn truncate(text: &str, max_chars: usize) -> String {
    let mut chars = text.char_indices();
    match chars.nth(max_chars) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}

fn non_empty(text: Option<&str>) -> Option<&str> {
    text.filter(|t| !t.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(name: &str) -> MediaItem {
        MediaItem {
            id: "1".to_string(),
            name: name.to_string(),
            overview: None,
            genres: None,
            community_rating: None,
            official_rating: None,
            production_year: None,
            run_time_ticks: None,
            media_type: None,
        }
    }

    #[test]
    fn runtime_renders_hours_and_minutes() {
        // 154 minutes worth of 100ns ticks
        assert_eq!(runtime(92_400_000_000), "2h 34m");
        assert_eq!(runtime(0), "0h 0m");
        assert_eq!(runtime(36_000_000_000), "1h 0m");
    }

    #[test]
    fn rating_is_one_decimal_place() {
        assert_eq!(rating(8.8), "8.8");
        assert_eq!(rating(7.0), "7.0");
        assert_eq!(rating(8.75), "8.8");
    }

    #[test]
    fn overview_is_truncated_with_ellipsis_only_when_long() {
        let short = "Short overview.";
        assert_eq!(truncate(short, 150), short);

        let long = "x".repeat(200);
        let cut = truncate(&long, 150);
        assert_eq!(cut.chars().count(), 153);
        assert!(cut.ends_with("..."));
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        let text = "é".repeat(10);
        let cut = truncate(&text, 4);
        assert_eq!(cut, format!("{}...", "é".repeat(4)));
    }

    #[test]
    fn empty_lists_have_fixed_sentences() {
        assert_eq!(search_results(&[]), "No results found.");
        assert_eq!(
            movies_by_genre("Documentary", &[]),
            "No movies found in genre: Documentary"
        );
        assert_eq!(recently_added(&[]), "No recently added items found.");
        assert_eq!(favorites(&[]), "No favorites found.");
        assert_eq!(items_by_year(1920, &[]), "No items found from 1920.");
    }

    #[test]
    fn search_results_include_metadata_lines() {
        let mut inception = item("Inception");
        inception.overview =
            Some("A thief who steals corporate secrets through dream-sharing technology".into());
        inception.genres = Some(vec!["Action".into(), "Sci-Fi".into()]);
        inception.community_rating = Some(8.8);
        inception.production_year = Some(2010);

        let out = search_results(&[inception]);
        assert!(out.contains("Found 1 result(s)"));
        assert!(out.contains("Inception"));
        assert!(out.contains("Year: 2010"));
        assert!(out.contains("Genres: Action, Sci-Fi"));
        assert!(out.contains("Rating: 8.8/10"));
        assert!(out.contains("dream-sharing technology"));
    }

    #[test]
    fn detail_view_shows_full_overview_and_runtime() {
        let mut pulp = item("Pulp Fiction");
        pulp.overview = Some("The lives of two mob hitmen intertwine. ".repeat(10));
        pulp.genres = Some(vec!["Crime".into(), "Drama".into()]);
        pulp.community_rating = Some(8.9);
        pulp.official_rating = Some("R".into());
        pulp.production_year = Some(1994);
        pulp.run_time_ticks = Some(92_400_000_000);

        let out = item_details(&pulp);
        assert!(out.contains("Pulp Fiction"));
        assert!(out.contains("Year: 1994"));
        assert!(out.contains("Genres: Crime, Drama"));
        assert!(out.contains("Community Rating: 8.9/10"));
        assert!(out.contains("Rating: R"));
        assert!(out.contains("Runtime: 2h 34m"));
        // Full text, no ellipsis.
        assert!(out.contains(&"The lives of two mob hitmen intertwine. ".repeat(10)));
        assert!(!out.contains("..."));
    }

    #[test]
    fn year_listing_caps_at_twenty_with_overflow_notice() {
        let items: Vec<MediaItem> = (0..25).map(|i| item(&format!("Movie {i}"))).collect();
        let out = items_by_year(1994, &items);
        assert!(out.contains("Items from 1994 (25)"));
        assert!(out.contains("Movie 19"));
        assert!(!out.contains("• Movie 20\n"));
        assert!(out.contains("... and 5 more"));
    }

    #[test]
    fn genre_listing_truncates_overview_at_shorter_limit() {
        let mut shining = item("The Shining");
        shining.overview = Some("y".repeat(130));
        shining.production_year = Some(1980);
        shining.community_rating = Some(8.4);

        let out = movies_by_genre("Horror", &[shining]);
        assert!(out.contains("🎬 Top 1 Horror movies"));
        assert!(out.contains("• The Shining (1980) - 8.4"));
        assert!(out.contains(&format!("{}...", "y".repeat(120))));
        assert!(!out.contains(&"y".repeat(121)));
    }
}

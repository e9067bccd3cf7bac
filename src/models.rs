use serde::Deserialize;

/// One catalog entry as the server reports it. Everything past `id` and
/// `name` is optional because the backend omits absent attributes instead of
/// sending nulls; `None` means unknown, never zero.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MediaItem {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub genres: Option<Vec<String>>,
    #[serde(default)]
    pub community_rating: Option<f32>,
    #[serde(default)]
    pub official_rating: Option<String>,
    #[serde(default)]
    pub production_year: Option<i32>,
    #[serde(default)]
    pub run_time_ticks: Option<i64>,
    #[serde(default, rename = "Type")]
    pub media_type: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Genre {
    pub id: String,
    pub name: String,
}

/// One bounded slice of a listing result. Some endpoints omit `Items`
/// entirely for an empty slice, and some omit the total count; both stay
/// representable here.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Page<T> {
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
    #[serde(default)]
    pub total_record_count: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn absent_fields_deserialize_as_none() {
        let value = json!({ "Id": "abc", "Name": "Heat" });
        let item: MediaItem = serde_json::from_value(value).expect("item deserialize");
        assert_eq!(item.name, "Heat");
        assert!(item.overview.is_none());
        assert!(item.community_rating.is_none());
        assert!(item.run_time_ticks.is_none());
        assert!(item.media_type.is_none());
    }

    #[test]
    fn wire_names_are_pascal_case() {
        let value = json!({
            "Id": "1",
            "Name": "Inception",
            "CommunityRating": 8.8,
            "RunTimeTicks": 88_800_000_000i64,
            "ProductionYear": 2010,
            "Type": "Movie"
        });
        let item: MediaItem = serde_json::from_value(value).expect("item deserialize");
        assert_eq!(item.community_rating, Some(8.8));
        assert_eq!(item.run_time_ticks, Some(88_800_000_000));
        assert_eq!(item.production_year, Some(2010));
        assert_eq!(item.media_type.as_deref(), Some("Movie"));
    }

    #[test]
    fn page_without_items_is_empty() {
        let value = json!({ "TotalRecordCount": 0 });
        let page: Page<MediaItem> = serde_json::from_value(value).expect("page deserialize");
        assert!(page.items.is_empty());
        assert_eq!(page.total_record_count, Some(0));
    }

    #[test]
    fn page_without_total_count_stays_unknown() {
        let value = json!({ "Items": [{ "Id": "1", "Name": "Heat" }] });
        let page: Page<MediaItem> = serde_json::from_value(value).expect("page deserialize");
        assert_eq!(page.items.len(), 1);
        assert!(page.total_record_count.is_none());
    }
}

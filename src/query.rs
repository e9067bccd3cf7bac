/// The `fields` value requested whenever item detail is wanted. Lightweight
/// listing calls (pagination sweeps) skip it and get id/name only.
pub const DETAIL_FIELDS: &str =
    "Overview,Genres,CommunityRating,OfficialRating,ProductionYear,RunTimeTicks";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Ascending => "Ascending",
            SortOrder::Descending => "Descending",
        }
    }
}

/// An immutable set of query parameters with deterministic order and no
/// duplicate keys.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    params: Vec<(String, String)>,
}

impl Query {
    pub fn builder() -> QueryBuilder {
        QueryBuilder::default()
    }

    pub fn params(&self) -> &[(String, String)] {
        &self.params
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Builds a [`Query`] incrementally. Setting a key twice replaces the earlier
/// value in place, so output order stays insertion order and no key is ever
/// emitted twice.
#[derive(Debug, Clone, Default)]
pub struct QueryBuilder {
    params: Vec<(String, String)>,
}

impl QueryBuilder {
    pub fn param(mut self, key: &str, value: impl Into<String>) -> Self {
        let value = value.into();
        if let Some(slot) = self.params.iter_mut().find(|(k, _)| k == key) {
            slot.1 = value;
        } else {
            self.params.push((key.to_string(), value));
        }
        self
    }

    /// Emits the parameter only when a non-empty value is present. Absent
    /// filters are omitted rather than sent as empty strings.
    pub fn opt_param(self, key: &str, value: Option<&str>) -> Self {
        match value {
            Some(v) if !v.is_empty() => self.param(key, v),
            _ => self,
        }
    }

    /// The catalog is hierarchical; flat listings must recurse into every
    /// container.
    pub fn recursive(self) -> Self {
        self.param("recursive", "true")
    }

    pub fn detail_fields(self) -> Self {
        self.param("fields", DETAIL_FIELDS)
    }

    pub fn sort(self, by: &str, order: SortOrder) -> Self {
        self.param("sortBy", by).param("sortOrder", order.as_str())
    }

    pub fn build(self) -> Query {
        Query {
            params: self.params,
        }
    }
}

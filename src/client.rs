use async_stream::try_stream;
use async_trait::async_trait;
use futures::stream::BoxStream;
use reqwest::{header, Client};
use serde::de::DeserializeOwned;
use serde_json::json;
use std::env;
use std::sync::RwLock;
use std::time::Duration;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{ClientError, Result};
use crate::models::{Genre, MediaItem, Page};
use crate::query::{Query, SortOrder};

pub const DEFAULT_SEARCH_PAGE_SIZE: usize = 100;
pub const DEFAULT_GENRE_LIMIT: usize = 50;
pub const DEFAULT_RECENT_LIMIT: usize = 20;
pub const DEFAULT_SWEEP_PAGE_SIZE: usize = 200;

/// The authenticated context required by every listing/detail call. Both
/// fields stay empty until `login` succeeds, and a re-login replaces them
/// together.
#[derive(Debug, Clone, Default)]
pub struct Session {
    token: String,
    user_id: String,
}

impl Session {
    pub fn is_authenticated(&self) -> bool {
        !self.token.is_empty() && !self.user_id.is_empty()
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }
}

/// Client identification sent during login. Device name falls back to the
/// local host name and device id to a fresh UUID when not supplied.
#[derive(Debug, Clone)]
pub struct ClientInfo {
    pub app_name: String,
    pub device_name: Option<String>,
    pub device_id: Option<String>,
    pub app_version: String,
}

impl Default for ClientInfo {
    fn default() -> Self {
        Self {
            app_name: "jellylink".to_string(),
            device_name: None,
            device_id: None,
            app_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Catalog operations consumed by the agent-facing tool layer. Kept as a
/// trait so tests and callers can substitute a fake backend.
#[async_trait]
pub trait CatalogApi: Send + Sync {
    async fn search(
        &self,
        term: &str,
        media_type: Option<&str>,
        genre: Option<&str>,
        page_size: usize,
    ) -> Result<Vec<MediaItem>>;
    async fn genres(&self, media_type: Option<&str>) -> Result<Vec<Genre>>;
    async fn movies_by_genre(&self, genre: &str, limit: usize) -> Result<Vec<MediaItem>>;
    async fn recently_added(&self, media_type: Option<&str>, limit: usize)
        -> Result<Vec<MediaItem>>;
    async fn item_details(&self, item_id: &str) -> Result<Option<MediaItem>>;
    async fn favorites(&self, media_type: Option<&str>) -> Result<Vec<MediaItem>>;
    async fn items_by_year(&self, year: i32, media_type: Option<&str>) -> Result<Vec<MediaItem>>;

    /// Lazy sweep over the whole movie catalog in server order. Pages are
    /// fetched only as the stream is polled; dropping it stops the sweep.
    fn all_movies(&self, page_size: usize) -> BoxStream<'_, Result<MediaItem>>;
}

#[derive(Debug)]
pub struct JellyfinClient {
    http: Client,
    base_url: String,
    session: RwLock<Session>,
}

impl JellyfinClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let base_url = base_url.trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(ClientError::Config("base URL must not be empty".into()));
        }
        let user_agent = format!("jellylink/{}", env!("CARGO_PKG_VERSION"));
        let http = Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .timeout(Duration::from_secs(30))
            .user_agent(user_agent)
            .build()?;
        Ok(Self {
            http,
            base_url,
            session: RwLock::new(Session::default()),
        })
    }

    pub fn from_env() -> Result<Self> {
        let base_url = env::var("JELLYFIN_URL")
            .map_err(|_| ClientError::Config("JELLYFIN_URL not set".into()))?;
        Self::new(&base_url)
    }

    pub fn session(&self) -> Session {
        self.session
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Exchanges credentials for an access token, then resolves the user
    /// identity behind that token. On success both are stored in a single
    /// write; on any failure the previous session is left untouched.
    /// Calling this again re-authenticates and replaces the session.
    pub async fn login(&self, username: &str, password: &str, info: &ClientInfo) -> Result<()> {
        #[derive(serde::Deserialize)]
        struct AuthResponse {
            #[serde(rename = "AccessToken", default)]
            access_token: Option<String>,
        }

        #[derive(serde::Deserialize)]
        struct Me {
            #[serde(rename = "Id", default)]
            id: Option<String>,
        }

        let device_name = match &info.device_name {
            Some(name) => name.clone(),
            None => gethostname::gethostname().to_string_lossy().into_owned(),
        };
        let device_id = match &info.device_id {
            Some(id) => id.clone(),
            None => Uuid::new_v4().simple().to_string(),
        };
        let client_header = format!(
            "MediaBrowser Client=\"{}\", Device=\"{}\", DeviceId=\"{}\", Version=\"{}\"",
            info.app_name, device_name, device_id, info.app_version
        );

        let url = format!("{}/Users/AuthenticateByName", self.base_url);
        let res = self
            .http
            .post(&url)
            // Some servers read the client identification from one header,
            // some from the other; sending both is accepted everywhere.
            .header("X-Emby-Authorization", client_header.as_str())
            .header(header::AUTHORIZATION, client_header.as_str())
            .json(&json!({ "Username": username, "Pw": password }))
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(ClientError::Authentication(format!(
                "server rejected credentials (status {status})"
            )));
        }
        if !status.is_success() {
            return Err(ClientError::Server {
                status,
                path: "/Users/AuthenticateByName".to_string(),
                detail: body,
            });
        }
        let auth: AuthResponse = serde_json::from_str(&body).map_err(|source| {
            ClientError::EmptyResponse {
                path: "/Users/AuthenticateByName".to_string(),
                source,
            }
        })?;
        let token = auth
            .access_token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| ClientError::Authentication("no token returned".into()))?;

        let me_url = format!("{}/Users/Me", self.base_url);
        let res = self
            .http
            .get(&me_url)
            .header(header::AUTHORIZATION, token_header(&token))
            .send()
            .await?;
        let status = res.status();
        let body = res.text().await?;
        if !status.is_success() {
            return Err(ClientError::SessionResolution(format!(
                "identity lookup failed (status {status})"
            )));
        }
        let me: Me = serde_json::from_str(&body)
            .map_err(|e| ClientError::SessionResolution(format!("undecodable identity: {e}")))?;
        let user_id = me
            .id
            .filter(|id| !id.is_empty())
            .ok_or_else(|| ClientError::SessionResolution("no user id returned".into()))?;

        info!(user_id = %user_id, "authenticated against {}", self.base_url);
        *self.session.write().unwrap_or_else(|e| e.into_inner()) = Session { token, user_id };
        Ok(())
    }

    /// One lightweight listing page at `(start_index, page_size)`. Requests
    /// only id/name-level detail.
    pub async fn items_page(
        &self,
        item_type: &str,
        start_index: usize,
        page_size: usize,
    ) -> Result<Page<MediaItem>> {
        let session = self.current_session()?;
        let query = Query::builder()
            .param("userId", session.user_id())
            .param("includeItemTypes", item_type)
            .recursive()
            .param("startIndex", start_index.to_string())
            .param("limit", page_size.to_string())
            .build();
        self.get_json("/Items", &query).await
    }

    fn current_session(&self) -> Result<Session> {
        let session = self.session();
        if !session.is_authenticated() {
            return Err(ClientError::Authentication(
                "no session established; call login first".into(),
            ));
        }
        Ok(session)
    }

    /// Issues one authenticated GET. The token is re-read from the session
    /// here, at call time, so a re-login is observed by every call issued
    /// after it.
    async fn get_json<T: DeserializeOwned>(&self, path: &str, query: &Query) -> Result<T> {
        let token = self.current_session()?.token;
        let url = format!("{}{}", self.base_url, path);
        debug!(%url, "catalog request");
        let res = self
            .http
            .get(&url)
            .header(header::AUTHORIZATION, token_header(&token))
            .query(query.params())
            .send()
            .await?;
        let status = res.status();
        let body = res.text().await?;
        if !status.is_success() {
            return Err(ClientError::Server {
                status,
                path: path.to_string(),
                detail: body,
            });
        }
        serde_json::from_str(&body).map_err(|source| ClientError::EmptyResponse {
            path: path.to_string(),
            source,
        })
    }
}

fn token_header(token: &str) -> String {
    format!("MediaBrowser Token=\"{token}\"")
}

#[async_trait]
impl CatalogApi for JellyfinClient {
    async fn search(
        &self,
        term: &str,
        media_type: Option<&str>,
        genre: Option<&str>,
        page_size: usize,
    ) -> Result<Vec<MediaItem>> {
        let session = self.current_session()?;
        let query = Query::builder()
            .param("userId", session.user_id())
            .param("searchTerm", term)
            .recursive()
            .param("limit", page_size.to_string())
            .detail_fields()
            .opt_param("includeItemTypes", media_type)
            .opt_param("genres", genre)
            .build();
        let page: Page<MediaItem> = self.get_json("/Items", &query).await?;
        Ok(page.items)
    }

    async fn genres(&self, media_type: Option<&str>) -> Result<Vec<Genre>> {
        let session = self.current_session()?;
        let query = Query::builder()
            .param("userId", session.user_id())
            .param("enableTotalRecordCount", "false")
            .opt_param("includeItemTypes", media_type)
            .build();
        let page: Page<Genre> = self.get_json("/Genres", &query).await?;
        let mut genres = page.items;
        // The backend does not guarantee alphabetical order here.
        genres.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(genres)
    }

    async fn movies_by_genre(&self, genre: &str, limit: usize) -> Result<Vec<MediaItem>> {
        let session = self.current_session()?;
        let query = Query::builder()
            .param("userId", session.user_id())
            .param("includeItemTypes", "Movie")
            .param("genres", genre)
            .recursive()
            .param("limit", limit.to_string())
            .detail_fields()
            .sort("CommunityRating,SortName", SortOrder::Descending)
            .build();
        let page: Page<MediaItem> = self.get_json("/Items", &query).await?;
        Ok(page.items)
    }

    async fn recently_added(
        &self,
        media_type: Option<&str>,
        limit: usize,
    ) -> Result<Vec<MediaItem>> {
        let session = self.current_session()?;
        let query = Query::builder()
            .param("userId", session.user_id())
            .recursive()
            .param("limit", limit.to_string())
            .detail_fields()
            .sort("DateCreated", SortOrder::Descending)
            .opt_param("includeItemTypes", media_type)
            .build();
        let page: Page<MediaItem> = self.get_json("/Items", &query).await?;
        Ok(page.items)
    }

    async fn item_details(&self, item_id: &str) -> Result<Option<MediaItem>> {
        let session = self.current_session()?;
        let path = format!(
            "/Users/{}/Items/{}",
            urlencoding::encode(session.user_id()),
            urlencoding::encode(item_id)
        );
        match self.get_json(&path, &Query::default()).await {
            Ok(item) => Ok(Some(item)),
            Err(ClientError::Server { status, .. }) if status == reqwest::StatusCode::NOT_FOUND => {
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    async fn favorites(&self, media_type: Option<&str>) -> Result<Vec<MediaItem>> {
        let session = self.current_session()?;
        let query = Query::builder()
            .param("userId", session.user_id())
            .recursive()
            .param("isFavorite", "true")
            .detail_fields()
            .opt_param("includeItemTypes", media_type)
            .build();
        let page: Page<MediaItem> = self.get_json("/Items", &query).await?;
        Ok(page.items)
    }

    async fn items_by_year(&self, year: i32, media_type: Option<&str>) -> Result<Vec<MediaItem>> {
        let session = self.current_session()?;
        let query = Query::builder()
            .param("userId", session.user_id())
            .recursive()
            .param("years", year.to_string())
            .detail_fields()
            .opt_param("includeItemTypes", media_type)
            .build();
        let page: Page<MediaItem> = self.get_json("/Items", &query).await?;
        Ok(page.items)
    }

    fn all_movies(&self, page_size: usize) -> BoxStream<'_, Result<MediaItem>> {
        Box::pin(try_stream! {
            let mut start = 0usize;
            loop {
                let page = self.items_page("Movie", start, page_size).await?;
                if page.items.is_empty() {
                    break;
                }
                let received = page.items.len();
                for item in page.items {
                    yield item;
                }
                // Advance by what was actually received so a short final
                // page keeps the cursor correct.
                start += received;
                match page.total_record_count {
                    Some(total) if start as i64 >= total => break,
                    // Total unknown on this endpoint: keep going until an
                    // empty page shows up.
                    _ => {}
                }
            }
        })
    }
}

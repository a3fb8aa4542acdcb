//! HTTP client for the GreatReading backend
//!
//! Every request carries the bearer token when one is held. A 401 response
//! clears the token and surfaces as [`ClientError::SessionExpired`].

mod credentials;
mod remote_dictionary;

pub use credentials::Credentials;
pub use remote_dictionary::RemoteDictionary;

use async_trait::async_trait;
use reqwest::{multipart, RequestBuilder, Response, StatusCode};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;

use crate::db::{Book, DictionarySort, NewWord, SettingsUpdate};
use crate::definitions::{DefinitionLookup, LookupError, Pronunciation, Voice, WordDefinition};
use crate::reader::DictionaryEntry;
use crate::routes::books::{BookListResponse, ProgressUpdate};
use crate::routes::dictionary::{DictionaryListResponse, WordExistsResponse};
use crate::routes::settings::SettingsResponse;

/// Client errors
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Session expired. Please sign in again.")]
    SessionExpired,

    #[error("{message}")]
    Api { status: u16, message: String },

    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),
}

impl ClientError {
    /// HTTP status of an API error response
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            ClientError::SessionExpired => Some(StatusCode::UNAUTHORIZED.as_u16()),
            ClientError::Http(e) => e.status().map(|s| s.as_u16()),
        }
    }
}

pub type ClientResult<T> = std::result::Result<T, ClientError>;

/// Dictionary listing parameters; unset fields use the server defaults
#[derive(Debug, Clone, Default, Serialize)]
pub struct DictionaryQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<DictionarySort>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<i64>,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    credentials: Credentials,
}

impl ApiClient {
    /// Create a client for an API root such as `http://localhost:3000/api/v1`
    pub fn new(base_url: impl Into<String>, credentials: Credentials) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            credentials,
        }
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    // Books

    pub async fn list_books(&self) -> ClientResult<Vec<Book>> {
        let response: BookListResponse = self.json(self.http.get(self.url("/books"))).await?;
        Ok(response.books)
    }

    pub async fn upload_book(&self, file_name: &str, data: Vec<u8>) -> ClientResult<Book> {
        let part = multipart::Part::bytes(data)
            .file_name(file_name.to_string())
            .mime_str("application/pdf")?;
        let form = multipart::Form::new().part("file", part);

        self.json(self.http.post(self.url("/books")).multipart(form))
            .await
    }

    pub async fn get_book(&self, id: &str) -> ClientResult<Book> {
        self.json(self.http.get(self.book_url(id))).await
    }

    pub async fn update_progress(&self, id: &str, current_page: i64) -> ClientResult<Book> {
        self.json(
            self.http
                .patch(self.book_url(id))
                .json(&ProgressUpdate { current_page }),
        )
        .await
    }

    pub async fn delete_book(&self, id: &str) -> ClientResult<()> {
        self.empty(self.http.delete(self.book_url(id))).await
    }

    // Dictionary

    pub async fn list_dictionary(&self, query: &DictionaryQuery) -> ClientResult<DictionaryListResponse> {
        self.json(self.http.get(self.url("/dictionary")).query(query))
            .await
    }

    pub async fn add_entry(&self, word: &NewWord) -> ClientResult<DictionaryEntry> {
        self.json(self.http.post(self.url("/dictionary")).json(word))
            .await
    }

    pub async fn remove_entry(&self, id: &str) -> ClientResult<()> {
        let url = self.url(&format!("/dictionary/{}", urlencoding::encode(id)));
        self.empty(self.http.delete(url)).await
    }

    pub async fn check_exists(&self, word: &str) -> ClientResult<bool> {
        let url = self.url(&format!("/dictionary/check/{}", urlencoding::encode(word)));
        let response: WordExistsResponse = self.json(self.http.get(url)).await?;
        Ok(response.exists)
    }

    // Settings

    pub async fn get_settings(&self) -> ClientResult<SettingsResponse> {
        self.json(self.http.get(self.url("/settings"))).await
    }

    pub async fn update_settings(&self, update: &SettingsUpdate) -> ClientResult<SettingsResponse> {
        self.json(self.http.patch(self.url("/settings")).json(update))
            .await
    }

    // Definitions

    pub async fn get_definition(&self, word: &str) -> ClientResult<WordDefinition> {
        let url = self.url(&format!("/definitions/{}", urlencoding::encode(word)));
        self.json(self.http.get(url)).await
    }

    pub async fn get_pronunciation(&self, word: &str, voice: Voice) -> ClientResult<Pronunciation> {
        let url = self.url(&format!("/definitions/{}/pronounce", urlencoding::encode(word)));
        self.json(self.http.get(url).query(&[("voice", voice)]))
            .await
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn book_url(&self, id: &str) -> String {
        self.url(&format!("/books/{}", urlencoding::encode(id)))
    }

    async fn json<T: DeserializeOwned>(&self, request: RequestBuilder) -> ClientResult<T> {
        let response = self.send(request).await?;
        Ok(response.json().await?)
    }

    async fn empty(&self, request: RequestBuilder) -> ClientResult<()> {
        self.send(request).await?;
        Ok(())
    }

    async fn send(&self, request: RequestBuilder) -> ClientResult<Response> {
        let request = match self.credentials.token() {
            Some(token) => request.bearer_auth(token),
            None => request,
        };

        let response = request.send().await?;
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED {
            tracing::warn!("Credential rejected, signing out");
            self.credentials.clear();
            return Err(ClientError::SessionExpired);
        }

        if !status.is_success() {
            let message = response
                .json::<ErrorBody>()
                .await
                .ok()
                .and_then(|body| body.message)
                .unwrap_or_else(|| format!("HTTP error {}", status.as_u16()));
            return Err(ClientError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response)
    }
}

/// Definitions served through the backend
#[async_trait]
impl DefinitionLookup for ApiClient {
    async fn lookup(&self, word: &str) -> Result<WordDefinition, LookupError> {
        self.get_definition(word).await.map_err(|e| lookup_error(word, e))
    }

    async fn pronunciation(&self, word: &str, voice: Voice) -> Result<Pronunciation, LookupError> {
        self.get_pronunciation(word, voice)
            .await
            .map_err(|e| lookup_error(word, e))
    }
}

fn lookup_error(word: &str, error: ClientError) -> LookupError {
    match error {
        ClientError::Http(e) => LookupError::Http(e),
        ClientError::Api { status: 404, .. } => LookupError::NotFound(word.to_string()),
        other => LookupError::InvalidResponse(other.to_string()),
    }
}

//! Firestore REST v1 backend.
//!
//! One `reqwest::Client` is built per store and shared by every call. The
//! project's web API key is sent as the `key` query parameter, so access is
//! governed by the database's security rules exactly as for a browser client.

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;
use serde_json::{json, Map, Value as Json};
use tracing::{debug, info, warn};
use url::Url;

use super::{validate_document_id, Document, DocumentStore, Fields};
use crate::config::FirebaseConfig;
use crate::errors::StoreError;

pub mod codec;

/// Documents requested per page when scanning a collection
pub const LIST_PAGE_SIZE: u32 = 300;

#[derive(Debug, Deserialize)]
struct WireDocument {
    name: String,
    #[serde(default)]
    fields: Map<String, Json>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListDocumentsResponse {
    #[serde(default)]
    documents: Vec<WireDocument>,
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
    #[serde(default)]
    status: String,
}

#[derive(Debug, Clone)]
pub struct FirestoreStore {
    client: Client,
    config: FirebaseConfig,
    documents_root: String,
    documents_url: String,
}

impl FirestoreStore {
    pub fn new(config: FirebaseConfig) -> Result<Self, StoreError> {
        config
            .validate()
            .map_err(|e| StoreError::Config(e.to_string()))?;

        let documents_url = config.documents_url();
        Url::parse(&documents_url)
            .map_err(|e| StoreError::Config(format!("invalid Firestore URL '{}': {}", documents_url, e)))?;

        let client = Client::builder().timeout(config.timeout()).build()?;

        info!(
            "Firestore store ready for project '{}' (database '{}')",
            config.project_id, config.database_id
        );

        Ok(Self {
            client,
            documents_root: config.documents_root(),
            config,
            documents_url,
        })
    }

    fn collection_url(&self, collection: &str) -> String {
        format!("{}/{}", self.documents_url, urlencoding::encode(collection))
    }

    fn document_url(&self, collection: &str, id: &str) -> String {
        format!(
            "{}/{}/{}",
            self.documents_url,
            urlencoding::encode(collection),
            urlencoding::encode(id)
        )
    }

    fn key_param(&self) -> (&'static str, &str) {
        ("key", self.config.api_key.as_str())
    }

    /// Document key from a full resource name (`projects/.../documents/users/abc`)
    fn id_from_name(name: &str) -> &str {
        name.rsplit('/').next().unwrap_or(name)
    }

    fn decode_document(&self, collection: &str, wire: WireDocument) -> Result<Document, StoreError> {
        let id = Self::id_from_name(&wire.name).to_string();
        let fields = codec::decode_fields(&wire.fields)
            .map_err(|e| StoreError::decode(format!("{}/{}", collection, id), e))?;
        Ok(Document::new(id, fields))
    }

    /// PATCH with an update mask naming every written field; with
    /// `must_exist` the write carries an existence precondition.
    async fn patch(
        &self,
        collection: &str,
        id: &str,
        fields: Fields,
        must_exist: bool,
    ) -> Result<(), StoreError> {
        validate_document_id(id)?;
        let url = self.document_url(collection, id);

        let mut query: Vec<(&str, String)> = vec![("key", self.config.api_key.clone())];
        for name in fields.keys() {
            query.push(("updateMask.fieldPaths", codec::quote_field_path(name)));
        }
        if must_exist {
            query.push(("currentDocument.exists", "true".to_string()));
        }

        debug!("PATCH {}/{} ({} fields)", collection, id, fields.len());
        let response = self
            .client
            .patch(&url)
            .query(&query)
            .json(&json!({ "fields": codec::encode_fields(&fields) }))
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND && must_exist {
            let body = response.text().await.unwrap_or_default();
            if self.names_document(&body, collection, id) {
                return Err(StoreError::not_found(format!("{}/{}", collection, id)));
            }
            return Err(Self::remote_error(StatusCode::NOT_FOUND, body));
        }
        Self::check(response).await?;
        Ok(())
    }

    /// Passes successful responses through and turns everything else into
    /// [`StoreError::Remote`] using Google's error envelope when present.
    async fn check(response: Response) -> Result<Response, StoreError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(Self::remote_error(status, body))
    }

    fn remote_error(status: StatusCode, body: String) -> StoreError {
        let (code, message) = match serde_json::from_str::<ErrorEnvelope>(&body) {
            Ok(envelope) => (envelope.error.status, envelope.error.message),
            Err(_) => (
                status.canonical_reason().unwrap_or("UNKNOWN").to_string(),
                body,
            ),
        };
        warn!("Firestore request failed with {}: {} {}", status, code, message);

        StoreError::Remote {
            status: status.as_u16(),
            code,
            message,
        }
    }

    /// A 404 on a document read means the document is missing only when the
    /// error names that document; a missing database or project also
    /// answers 404 and must surface as a failure.
    fn names_document(&self, body: &str, collection: &str, id: &str) -> bool {
        match serde_json::from_str::<ErrorEnvelope>(body) {
            Ok(envelope) => {
                let name = format!("{}/{}/{}", self.documents_root, collection, id);
                envelope.error.message.contains(&name)
            }
            Err(_) => body.trim().is_empty(),
        }
    }
}

#[async_trait]
impl DocumentStore for FirestoreStore {
    fn name(&self) -> &'static str {
        "firestore"
    }

    async fn set_merge(&self, collection: &str, id: &str, fields: Fields) -> Result<(), StoreError> {
        self.patch(collection, id, fields, false).await
    }

    async fn update(&self, collection: &str, id: &str, fields: Fields) -> Result<(), StoreError> {
        self.patch(collection, id, fields, true).await
    }

    async fn add(&self, collection: &str, fields: Fields) -> Result<String, StoreError> {
        debug!("POST {} ({} fields)", collection, fields.len());
        let response = self
            .client
            .post(self.collection_url(collection))
            .query(&[self.key_param()])
            .json(&json!({ "fields": codec::encode_fields(&fields) }))
            .send()
            .await?;
        let response = Self::check(response).await?;

        let created: WireDocument = response
            .json()
            .await
            .map_err(|e| StoreError::decode(collection, e))?;
        Ok(Self::id_from_name(&created.name).to_string())
    }

    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError> {
        validate_document_id(id)?;
        debug!("GET {}/{}", collection, id);
        let response = self
            .client
            .get(self.document_url(collection, id))
            .query(&[self.key_param()])
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            let body = response.text().await.unwrap_or_default();
            if self.names_document(&body, collection, id) {
                return Ok(None);
            }
            return Err(Self::remote_error(StatusCode::NOT_FOUND, body));
        }
        let response = Self::check(response).await?;

        let wire: WireDocument = response
            .json()
            .await
            .map_err(|e| StoreError::decode(format!("{}/{}", collection, id), e))?;
        self.decode_document(collection, wire).map(Some)
    }

    async fn list(&self, collection: &str) -> Result<Vec<Document>, StoreError> {
        let url = self.collection_url(collection);
        let page_size = LIST_PAGE_SIZE.to_string();
        let mut documents = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut query: Vec<(&str, &str)> = vec![self.key_param(), ("pageSize", page_size.as_str())];
            if let Some(token) = page_token.as_deref() {
                query.push(("pageToken", token));
            }

            debug!("LIST {} (page token: {:?})", collection, page_token);
            let response = self.client.get(&url).query(&query).send().await?;
            let response = Self::check(response).await?;
            let page: ListDocumentsResponse = response
                .json()
                .await
                .map_err(|e| StoreError::decode(collection, e))?;

            for wire in page.documents {
                documents.push(self.decode_document(collection, wire)?);
            }

            match page.next_page_token {
                Some(token) if !token.is_empty() => page_token = Some(token),
                _ => break,
            }
        }

        debug!("LIST {} returned {} documents", collection, documents.len());
        Ok(documents)
    }
}

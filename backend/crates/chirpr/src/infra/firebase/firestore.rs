//! Firestore REST adapter
//!
//! Reads are plain `GET`s of the document resource. Every write goes through
//! `documents:commit` so that field updates can carry an update mask, an
//! existence precondition and server-timestamp transforms in one request.

use std::sync::Arc;

use platform::http::body_preview;
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::{Value, json};

use super::session::FirebaseSession;
use super::value::{decode_fields, encode_fields};
use super::FirebaseConfig;
use crate::domain::document::{DocumentPath, Fields};
use crate::domain::service::{DocumentStore, StoreError};

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
    #[serde(default)]
    status: String,
}

/// Map a Firestore error status to a [`StoreError`]
pub fn store_error(status: &str, message: String) -> StoreError {
    match status {
        "PERMISSION_DENIED" | "UNAUTHENTICATED" => StoreError::PermissionDenied(message),
        "NOT_FOUND" => StoreError::NotFound(message),
        "UNAVAILABLE" | "DEADLINE_EXCEEDED" => StoreError::Unavailable(message),
        _ => StoreError::Rejected {
            status: status.to_string(),
            message,
        },
    }
}

/// Interpret a Firestore answer; `Ok(None)` on 404 when `missing_ok`
pub fn response_outcome(
    status: StatusCode,
    body: &[u8],
    missing_ok: bool,
) -> Result<Option<Value>, StoreError> {
    if status == StatusCode::NOT_FOUND && missing_ok {
        return Ok(None);
    }
    if !status.is_success() {
        return Err(match serde_json::from_slice::<ErrorEnvelope>(body) {
            Ok(envelope) => store_error(&envelope.error.status, envelope.error.message),
            Err(_) => StoreError::Rejected {
                status: status.as_u16().to_string(),
                message: body_preview(body),
            },
        });
    }

    serde_json::from_slice(body)
        .map(Some)
        .map_err(|e| StoreError::Decode(format!("{e}: {}", body_preview(body))))
}

/// Quote a field name for use in an update mask
fn field_path(name: &str) -> String {
    let mut chars = name.chars();
    let simple = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_');
    if simple {
        name.to_string()
    } else {
        format!("`{}`", name.replace('\\', "\\\\").replace('`', "\\`"))
    }
}

/// One `Write` of a commit request.
///
/// `mask` turns the write into a partial update of an existing document;
/// without it the document is created or replaced.
pub fn commit_write(document_name: &str, fields: &Fields, mask: bool) -> Value {
    let encoded = encode_fields(fields);
    let mask_paths: Vec<String> = encoded.fields.keys().map(|name| field_path(name)).collect();

    let mut write = json!({
        "update": { "name": document_name, "fields": encoded.fields },
    });
    if mask {
        write["updateMask"] = json!({ "fieldPaths": mask_paths });
        write["currentDocument"] = json!({ "exists": true });
    }
    if !encoded.server_timestamps.is_empty() {
        let transforms: Vec<Value> = encoded
            .server_timestamps
            .iter()
            .map(|name| json!({ "fieldPath": field_path(name), "setToServerValue": "REQUEST_TIME" }))
            .collect();
        write["updateTransforms"] = Value::Array(transforms);
    }
    write
}

/// Cloud Firestore over its REST API
pub struct FirestoreDocumentStore {
    client: reqwest::Client,
    config: Arc<FirebaseConfig>,
    session: FirebaseSession,
}

impl FirestoreDocumentStore {
    pub fn new(
        client: reqwest::Client,
        config: Arc<FirebaseConfig>,
        session: FirebaseSession,
    ) -> Self {
        Self {
            client,
            config,
            session,
        }
    }

    fn document_name(&self, path: &DocumentPath) -> String {
        format!("{}/{}/{}", self.config.documents_name(), path.collection, path.id)
    }

    async fn authorize(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<reqwest::RequestBuilder, StoreError> {
        let request = request.query(&[("key", self.config.api_key.as_str())]);
        Ok(match self.session.bearer(&self.client, &self.config).await? {
            Some(token) => request.bearer_auth(token),
            None => request,
        })
    }

    /// Send a request; `Ok(None)` on 404 when `missing_ok`
    async fn send(
        &self,
        request: reqwest::RequestBuilder,
        missing_ok: bool,
    ) -> Result<Option<Value>, StoreError> {
        let response = self
            .authorize(request)
            .await?
            .send()
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;
        response_outcome(status, &body, missing_ok)
    }

    async fn commit(&self, write: Value) -> Result<(), StoreError> {
        let url = format!("{}:commit", self.config.documents_url());
        let request = self.client.post(url).json(&json!({ "writes": [write] }));
        self.send(request, false).await?;
        Ok(())
    }
}

impl DocumentStore for FirestoreDocumentStore {
    async fn get_document(&self, path: &DocumentPath) -> Result<Option<Fields>, StoreError> {
        let url = format!("{}/{}/{}", self.config.documents_url(), path.collection, path.id);
        match self.send(self.client.get(url), true).await? {
            Some(document) => decode_fields(document.get("fields")).map(Some),
            None => Ok(None),
        }
    }

    async fn set_document(&self, path: &DocumentPath, fields: Fields) -> Result<(), StoreError> {
        let write = commit_write(&self.document_name(path), &fields, false);
        self.commit(write).await.inspect_err(|e| {
            tracing::debug!(document = %path, error = %e, "Firestore set failed");
        })
    }

    async fn update_fields(&self, path: &DocumentPath, fields: Fields) -> Result<(), StoreError> {
        let write = commit_write(&self.document_name(path), &fields, true);
        self.commit(write).await.inspect_err(|e| {
            tracing::debug!(document = %path, error = %e, "Firestore update failed");
        })
    }
}

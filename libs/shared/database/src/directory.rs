use reqwest::{
    header::{HeaderMap, HeaderValue, CONTENT_TYPE},
    Client, Method, StatusCode,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};
use thiserror::Error;
use tracing::{debug, error};

use shared_config::AppConfig;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("record already exists: {0}")]
    Conflict(String),

    #[error("collection or record not found: {0}")]
    NotFound(String),

    #[error("store error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("store transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("record decode error: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Key schema for a collection, declared once at startup.
#[derive(Debug, Clone, Serialize)]
pub struct CollectionSpec {
    pub name: &'static str,
    pub hash_key: &'static str,
    pub range_key: Option<&'static str>,
}

pub const USERS: CollectionSpec = CollectionSpec {
    name: "users",
    hash_key: "username",
    range_key: None,
};

pub const DOCTORS: CollectionSpec = CollectionSpec {
    name: "doctors",
    hash_key: "doctor_id",
    range_key: None,
};

pub const APPOINTMENTS: CollectionSpec = CollectionSpec {
    name: "appointments",
    hash_key: "appointment_id",
    range_key: Some("doctor_id"),
};

/// REST client for the directory store holding user, doctor and appointment
/// records. Speaks PostgREST conventions: equality filters as query params,
/// `Prefer` headers to control write semantics.
pub struct DirectoryClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl DirectoryClient {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.directory_store_url.clone(),
            api_key: config.directory_store_api_key.clone(),
        }
    }

    fn get_headers(&self, prefer: Option<&str>) -> HeaderMap {
        let mut headers = HeaderMap::new();

        if let Ok(key) = HeaderValue::from_str(&self.api_key) {
            headers.insert("apikey", key);
        }
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        if let Some(prefer) = prefer.and_then(|p| HeaderValue::from_str(p).ok()) {
            headers.insert("Prefer", prefer);
        }

        headers
    }

    async fn request<T>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<Value>,
        prefer: Option<&str>,
    ) -> Result<T, StoreError>
    where
        T: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);
        debug!("Directory store request to {}", url);

        let mut req = self
            .client
            .request(method, &url)
            .headers(self.get_headers(prefer));

        // Filter values go through the URL encoder so that keys containing
        // `&` or `=` stay a single filter instead of splitting into several.
        if !query.is_empty() {
            req = req.query(query);
        }

        if let Some(body_data) = body {
            req = req.json(&body_data);
        }

        let response = req.send().await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            error!("Directory store error ({}): {}", status, error_text);

            return Err(match status {
                StatusCode::CONFLICT => StoreError::Conflict(error_text),
                StatusCode::NOT_FOUND => StoreError::NotFound(error_text),
                _ => StoreError::Api {
                    status: status.as_u16(),
                    message: error_text,
                },
            });
        }

        let data = response.json::<T>().await?;
        Ok(data)
    }

    /// Like `request` but discards the response body; for calls where the
    /// store legitimately answers 201/204 with no content.
    async fn request_no_content(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
        prefer: Option<&str>,
    ) -> Result<(), StoreError> {
        let url = format!("{}{}", self.base_url, path);
        debug!("Directory store request to {}", url);

        let mut req = self
            .client
            .request(method, &url)
            .headers(self.get_headers(prefer));

        if let Some(body_data) = body {
            req = req.json(&body_data);
        }

        let response = req.send().await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            error!("Directory store error ({}): {}", status, error_text);

            return Err(match status {
                StatusCode::CONFLICT => StoreError::Conflict(error_text),
                StatusCode::NOT_FOUND => StoreError::NotFound(error_text),
                _ => StoreError::Api {
                    status: status.as_u16(),
                    message: error_text,
                },
            });
        }

        Ok(())
    }

    /// Point lookup by primary key. Returns `None` when no record matches.
    pub async fn get_by_key<T>(
        &self,
        collection: &str,
        key_field: &str,
        key: &str,
    ) -> Result<Option<T>, StoreError>
    where
        T: DeserializeOwned,
    {
        let path = format!("/rest/v1/{}", collection);
        let filter = [(key_field, format!("eq.{}", key))];
        let mut rows: Vec<T> = self.request(Method::GET, &path, &filter, None, None).await?;

        if rows.is_empty() {
            return Ok(None);
        }
        Ok(Some(rows.remove(0)))
    }

    /// Conditional create: fails with `StoreError::Conflict` when a record
    /// with the same key already exists. This is the write behind
    /// registration, closing the check-then-put race.
    pub async fn insert<T>(&self, collection: &str, record: &T) -> Result<T, StoreError>
    where
        T: Serialize + DeserializeOwned,
    {
        let path = format!("/rest/v1/{}", collection);
        let mut rows: Vec<T> = self
            .request(
                Method::POST,
                &path,
                &[],
                Some(serde_json::to_value(record)?),
                Some("return=representation"),
            )
            .await?;

        if rows.is_empty() {
            return Err(StoreError::Api {
                status: 500,
                message: format!("store returned no representation for {}", collection),
            });
        }
        Ok(rows.remove(0))
    }

    /// Unconditional put: overwrites any record with the same key.
    pub async fn upsert<T>(&self, collection: &str, record: &T) -> Result<(), StoreError>
    where
        T: Serialize,
    {
        let path = format!("/rest/v1/{}", collection);
        self.request_no_content(
            Method::POST,
            &path,
            Some(serde_json::to_value(record)?),
            Some("resolution=merge-duplicates"),
        )
        .await
    }

    /// Unbounded full read of a collection. O(collection size), acceptable
    /// only for small rosters such as the doctor list.
    pub async fn scan<T>(&self, collection: &str) -> Result<Vec<T>, StoreError>
    where
        T: DeserializeOwned,
    {
        let path = format!("/rest/v1/{}", collection);
        let select = [("select", "*".to_string())];
        self.request(Method::GET, &path, &select, None, None).await
    }

    /// Full read with a client-side predicate applied after the fetch.
    pub async fn scan_where<T, P>(
        &self,
        collection: &str,
        predicate: P,
    ) -> Result<Vec<T>, StoreError>
    where
        T: DeserializeOwned,
        P: Fn(&T) -> bool,
    {
        let rows = self.scan(collection).await?;
        Ok(rows.into_iter().filter(|row| predicate(row)).collect())
    }

    /// Server-side equality query against an indexed field. Appointment
    /// lookups by doctor or patient go through here rather than a scan.
    pub async fn query_eq<T>(
        &self,
        collection: &str,
        field: &str,
        value: &str,
    ) -> Result<Vec<T>, StoreError>
    where
        T: DeserializeOwned,
    {
        let path = format!("/rest/v1/{}", collection);
        let filter = [(field, format!("eq.{}", value))];
        self.request(Method::GET, &path, &filter, None, None).await
    }

    /// Idempotent collection provisioning; the store creates the collection
    /// with the declared key schema when it does not exist yet. Startup-only.
    pub async fn provision(&self, spec: &CollectionSpec) -> Result<(), StoreError> {
        let body = json!({
            "name": spec.name,
            "hash_key": spec.hash_key,
            "range_key": spec.range_key,
        });

        self.request_no_content(
            Method::POST,
            "/rest/v1/rpc/provision_collection",
            Some(body),
            None,
        )
        .await?;

        debug!("Collection {} provisioned", spec.name);
        Ok(())
    }

    pub fn get_base_url(&self) -> &str {
        &self.base_url
    }
}

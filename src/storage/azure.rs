//! Azure Blob Storage over its REST API, authorised with shared access signatures

use async_trait::async_trait;
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use hmac::{Hmac, Mac};
use reqwest::{Client, StatusCode};
use sha2::Sha256;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

use crate::config::AzureStorageConfig;
use crate::error::{AppError, Result};
use crate::media::base64;
use crate::storage::{ObjectStore, StorageKind};

type HmacSha256 = Hmac<Sha256>;

/// REST and SAS version every request is signed for
pub const SERVICE_VERSION: &str = "2021-08-06";

/// Lifetime of the signatures used for writes, deletes and lookups
const OPERATION_SAS_MINUTES: i64 = 15;

/// Account name, decoded key and blob endpoint
#[derive(Clone)]
pub struct AzureCredentials {
    pub account_name: String,
    account_key: Vec<u8>,
    pub blob_endpoint: String,
}

impl std::fmt::Debug for AzureCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AzureCredentials")
            .field("account_name", &self.account_name)
            .field("blob_endpoint", &self.blob_endpoint)
            .finish_non_exhaustive()
    }
}

impl AzureCredentials {
    /// Parse a `Key=Value;...` storage connection string
    pub fn from_connection_string(connection_string: &str) -> Result<Self> {
        let mut protocol = "https";
        let mut account_name = None;
        let mut account_key = None;
        let mut endpoint_suffix = "core.windows.net";
        let mut blob_endpoint = None;

        for pair in connection_string.split(';').map(str::trim).filter(|p| !p.is_empty()) {
            let (key, value) = pair.split_once('=').ok_or_else(|| {
                AppError::Storage(format!("Malformed connection string segment: {}", key_of(pair)))
            })?;
            match key {
                "DefaultEndpointsProtocol" => protocol = value,
                "AccountName" => account_name = Some(value),
                "AccountKey" => account_key = Some(value),
                "EndpointSuffix" => endpoint_suffix = value,
                "BlobEndpoint" => blob_endpoint = Some(value),
                _ => {}
            }
        }

        let account_name = account_name
            .ok_or_else(|| AppError::Storage("Connection string has no AccountName".to_string()))?;
        let account_key = account_key
            .ok_or_else(|| AppError::Storage("Connection string has no AccountKey".to_string()))?;

        let blob_endpoint = match blob_endpoint {
            Some(endpoint) => endpoint.to_string(),
            None => format!("{}://{}.blob.{}", protocol, account_name, endpoint_suffix),
        };

        Self::new(account_name, account_key, &blob_endpoint)
    }

    pub fn new(account_name: &str, account_key_b64: &str, blob_endpoint: &str) -> Result<Self> {
        let account_key = base64::decode(account_key_b64)
            .map_err(|_| AppError::Storage("AccountKey is not valid base64".to_string()))?;

        Ok(Self {
            account_name: account_name.to_string(),
            account_key,
            blob_endpoint: blob_endpoint.trim_end_matches('/').to_string(),
        })
    }

    /// Credentials from config, or `None` when remote storage is not configured
    pub fn from_config(config: &AzureStorageConfig) -> Result<Option<Self>> {
        if let Some(connection_string) = config.connection_string.as_deref().filter(|s| !s.trim().is_empty()) {
            return Self::from_connection_string(connection_string).map(Some);
        }

        match (config.account_name.as_deref(), config.account_key.as_deref()) {
            (Some(name), Some(key)) if !name.is_empty() && !key.is_empty() => {
                let endpoint = format!("https://{}.blob.core.windows.net", name);
                Self::new(name, key, &endpoint).map(Some)
            }
            _ => Ok(None),
        }
    }

    /// Base64 HMAC-SHA256 of a string-to-sign
    pub fn sign(&self, string_to_sign: &str) -> Result<String> {
        let mut mac = HmacSha256::new_from_slice(&self.account_key)
            .map_err(|e| AppError::Internal(format!("Invalid signing key: {}", e)))?;
        mac.update(string_to_sign.as_bytes());
        Ok(base64::encode(&mac.finalize().into_bytes()))
    }
}

fn key_of(pair: &str) -> &str {
    pair.split('=').next().unwrap_or(pair)
}

fn sas_time(time: DateTime<Utc>) -> String {
    time.format("%Y-%m-%dT%H:%M:%SZ").to_string()
}

/// Service SAS string-to-sign for a single blob
pub fn blob_string_to_sign(
    account: &str,
    container: &str,
    blob: &str,
    permissions: &str,
    expiry: &str,
) -> String {
    let resource = format!("/blob/{}/{}/{}", account, container, blob);
    [
        permissions,
        "", // start
        expiry,
        resource.as_str(),
        "", // identifier
        "", // ip
        "", // protocol
        SERVICE_VERSION,
        "b",
        "", // snapshot time
        "", // encryption scope
        "", // cache-control
        "", // content-disposition
        "", // content-encoding
        "", // content-language
        "", // content-type
    ]
    .join("\n")
}

/// Account SAS string-to-sign scoped to the blob service
pub fn account_string_to_sign(
    account: &str,
    permissions: &str,
    resource_types: &str,
    expiry: &str,
) -> String {
    format!(
        "{}\n{}\nb\n{}\n\n{}\n\n\n{}\n\n",
        account, permissions, resource_types, expiry, SERVICE_VERSION
    )
}

/// Private blob container accessed through SAS-signed requests
pub struct AzureBlobStore {
    credentials: AzureCredentials,
    container: String,
    read_expiry: ChronoDuration,
    client: Client,
    available: AtomicBool,
}

impl AzureBlobStore {
    pub fn new(credentials: AzureCredentials, config: &AzureStorageConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            credentials,
            container: config.container.clone(),
            read_expiry: ChronoDuration::days(365 * i64::from(config.sas_expiry_years)),
            client,
            available: AtomicBool::new(false),
        })
    }

    fn blob_url(&self, name: &str) -> Result<Url> {
        let mut url = Url::parse(&self.credentials.blob_endpoint)
            .map_err(|e| AppError::Storage(format!("Invalid blob endpoint: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| AppError::Storage("Blob endpoint cannot be a base URL".to_string()))?
            .pop_if_empty()
            .push(&self.container)
            .push(name);
        Ok(url)
    }

    /// Blob URL carrying a service SAS with the given permissions
    pub fn signed_blob_url(&self, name: &str, permissions: &str, expiry: DateTime<Utc>) -> Result<Url> {
        let expiry = sas_time(expiry);
        let signature = self.credentials.sign(&blob_string_to_sign(
            &self.credentials.account_name,
            &self.container,
            name,
            permissions,
            &expiry,
        ))?;

        let mut url = self.blob_url(name)?;
        url.query_pairs_mut()
            .append_pair("sv", SERVICE_VERSION)
            .append_pair("se", &expiry)
            .append_pair("sr", "b")
            .append_pair("sp", permissions)
            .append_pair("sig", &signature);
        Ok(url)
    }

    /// Long-lived read-only URL handed to clients
    pub fn read_url(&self, name: &str) -> Result<String> {
        Ok(self
            .signed_blob_url(name, "r", Utc::now() + self.read_expiry)?
            .to_string())
    }

    fn operation_url(&self, name: &str, permissions: &str) -> Result<Url> {
        self.signed_blob_url(
            name,
            permissions,
            Utc::now() + ChronoDuration::minutes(OPERATION_SAS_MINUTES),
        )
    }

    fn container_url(&self) -> Result<Url> {
        let expiry = sas_time(Utc::now() + ChronoDuration::minutes(OPERATION_SAS_MINUTES));
        let signature = self.credentials.sign(&account_string_to_sign(
            &self.credentials.account_name,
            "rc",
            "c",
            &expiry,
        ))?;

        let mut url = Url::parse(&self.credentials.blob_endpoint)
            .map_err(|e| AppError::Storage(format!("Invalid blob endpoint: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| AppError::Storage("Blob endpoint cannot be a base URL".to_string()))?
            .pop_if_empty()
            .push(&self.container);
        url.query_pairs_mut()
            .append_pair("restype", "container")
            .append_pair("sv", SERVICE_VERSION)
            .append_pair("ss", "b")
            .append_pair("srt", "c")
            .append_pair("sp", "rc")
            .append_pair("se", &expiry)
            .append_pair("sig", &signature);
        Ok(url)
    }

    /// Create the private container if needed and mark the store usable
    pub async fn connect(&self) -> Result<()> {
        let response = self
            .client
            .put(self.container_url()?)
            .header("x-ms-version", SERVICE_VERSION)
            .header(reqwest::header::CONTENT_LENGTH, 0)
            .send()
            .await?;

        match response.status() {
            StatusCode::CREATED => info!(container = %self.container, "Created blob container (private)"),
            StatusCode::CONFLICT => info!(container = %self.container, "Connected to blob container"),
            status => {
                let body = response.text().await.unwrap_or_default();
                return Err(AppError::Storage(format!(
                    "Container setup failed with {}: {}",
                    status, body
                )));
            }
        }

        self.available.store(true, Ordering::Release);
        Ok(())
    }
}

#[async_trait]
impl ObjectStore for AzureBlobStore {
    fn kind(&self) -> StorageKind {
        StorageKind::Azure
    }

    fn is_available(&self) -> bool {
        self.available.load(Ordering::Acquire)
    }

    async fn put(&self, name: &str, data: &[u8]) -> Result<String> {
        let response = self
            .client
            .put(self.operation_url(name, "cw")?)
            .header("x-ms-version", SERVICE_VERSION)
            .header("x-ms-blob-type", "BlockBlob")
            .header(reqwest::header::CONTENT_TYPE, "image/png")
            .body(data.to_vec())
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Storage(format!("Blob upload failed with {}: {}", status, body)));
        }

        debug!(blob = %name, size = data.len(), "Uploaded blob");
        self.read_url(name)
    }

    async fn delete(&self, name: &str) -> Result<bool> {
        let response = self
            .client
            .delete(self.operation_url(name, "d")?)
            .header("x-ms-version", SERVICE_VERSION)
            .send()
            .await?;

        match response.status() {
            status if status.is_success() => {
                debug!(blob = %name, "Deleted blob");
                Ok(true)
            }
            StatusCode::NOT_FOUND => Ok(false),
            status => {
                warn!(blob = %name, %status, "Blob delete failed");
                Err(AppError::Storage(format!("Blob delete failed with {}", status)))
            }
        }
    }

    async fn exists(&self, name: &str) -> Result<bool> {
        let response = self
            .client
            .head(self.operation_url(name, "r")?)
            .header("x-ms-version", SERVICE_VERSION)
            .send()
            .await?;

        match response.status() {
            status if status.is_success() => Ok(true),
            StatusCode::NOT_FOUND => Ok(false),
            status => Err(AppError::Storage(format!("Blob lookup failed with {}", status))),
        }
    }
}

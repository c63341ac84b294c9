use reqwest::multipart::{Form, Part};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;

use super::Ack;
use crate::http::{ApiError, ServiceClient};
use crate::runtime::Runtime;

/// Largest image the admin screen accepts.
pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: f64,
    #[serde(default)]
    pub published: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductCreate {
    pub name: String,
    pub description: String,
    pub price: f64,
    pub published: bool,
}

impl ProductCreate {
    /// Trims the name; rejects a blank name or a non-positive price.
    pub fn new(
        name: &str,
        description: &str,
        price: f64,
        published: bool,
    ) -> Result<Self, ApiError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ApiError::Invalid("Product name is required".to_string()));
        }
        if !price.is_finite() || price <= 0.0 {
            return Err(ApiError::Invalid("Price must be greater than zero".to_string()));
        }
        Ok(Self {
            name: name.to_string(),
            description: description.to_string(),
            price,
            published,
        })
    }
}

/// Absolute image URLs pass through; relative ones are joined to the
/// product service's current base URL.
pub fn resolve_image_url(image_url: Option<&str>, base_url: Option<&str>) -> Option<String> {
    let image_url = image_url.filter(|u| !u.is_empty())?;
    if image_url.starts_with("http://") || image_url.starts_with("https://") {
        return Some(image_url.to_string());
    }

    let base = base_url.unwrap_or("");
    let sep = if image_url.starts_with('/') { "" } else { "/" };
    Some(format!("{}{}{}", base, sep, image_url))
}

/// Partial update; unset fields are left out of the body.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProductUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published: Option<bool>,
}

impl ProductUpdate {
    pub fn published(published: bool) -> Self {
        Self {
            published: Some(published),
            ..Self::default()
        }
    }
}

/// An image file staged for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUpload {
    pub file_name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    pub fn from_path<R: Runtime>(runtime: &R, path: &Path) -> anyhow::Result<Self> {
        let bytes = runtime.read(path)?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());
        let mime = guess_mime(path).to_string();
        Ok(Self {
            file_name,
            mime,
            bytes,
        })
    }

    pub fn validate(&self) -> Result<(), ApiError> {
        if !self.mime.starts_with("image/") {
            return Err(ApiError::Invalid("Please choose an image file".to_string()));
        }
        if self.bytes.len() > MAX_IMAGE_BYTES {
            return Err(ApiError::Invalid("Image is too large (max 5MB)".to_string()));
        }
        Ok(())
    }

    fn into_form(self) -> Result<Form, ApiError> {
        let part = Part::bytes(self.bytes)
            .file_name(self.file_name)
            .mime_str(&self.mime)
            .map_err(|e| ApiError::Prepare(e.to_string()))?;
        Ok(Form::new().part("file", part))
    }
}

fn guess_mime(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        "bmp" => "image/bmp",
        _ => "application/octet-stream",
    }
}

pub struct ProductApi<'a> {
    client: &'a ServiceClient,
}

impl<'a> ProductApi<'a> {
    pub fn new(client: &'a ServiceClient) -> Self {
        Self { client }
    }

    /// Published products, newest first.
    pub async fn list(&self) -> Result<Vec<Product>, ApiError> {
        self.client.get_json("/products").await
    }

    pub async fn get(&self, id: i64) -> Result<Product, ApiError> {
        self.client.get_json(&format!("/products/{}", id)).await
    }

    /// Every product, published or not. Requires an admin token.
    pub async fn admin_list(&self) -> Result<Vec<Product>, ApiError> {
        self.client.get_json("/admin/products").await
    }

    pub async fn create(&self, product: &ProductCreate) -> Result<Product, ApiError> {
        self.client.post_json("/admin/products", product).await
    }

    pub async fn update(&self, id: i64, update: &ProductUpdate) -> Result<Product, ApiError> {
        self.client
            .patch_json(&format!("/admin/products/{}", id), update)
            .await
    }

    pub async fn delete(&self, id: i64) -> Result<Ack, ApiError> {
        self.client
            .delete_json(&format!("/admin/products/{}", id))
            .await
    }

    /// Validates locally, then uploads as multipart field `file`.
    pub async fn upload_image(&self, id: i64, image: ImageUpload) -> Result<Value, ApiError> {
        image.validate()?;
        let form = image.into_form()?;
        self.client
            .post_multipart(&format!("/admin/products/{}/image", id), form)
            .await
    }
}

use gallery_atoms::records::{ImageRecord, ImageTable};
use gallery_atoms::{GalleryError, Result};
use lambda_http::{
    http::{Method, StatusCode},
    Body, Response,
};
use serde::Serialize;

use crate::types::{ErrorBody, ImageList};

/// Bring a search term to the capitalization labels are stored with:
/// first letter of every alphabetic run upper case, the rest lower case.
/// `"hot DOG"` becomes `"Hot Dog"`.
pub fn normalize_tag(term: &str) -> String {
    let mut normalized = String::with_capacity(term.len());
    let mut in_word = false;
    for c in term.chars() {
        if c.is_alphabetic() {
            if in_word {
                normalized.extend(c.to_lowercase());
            } else {
                normalized.extend(c.to_uppercase());
            }
            in_word = true;
        } else {
            normalized.push(c);
            in_word = false;
        }
    }
    normalized
}

/// Keep records tagged with the normalized term (whole-tag match), newest first.
/// No term, or an empty one, keeps everything.
pub fn select_images(mut records: Vec<ImageRecord>, search: Option<&str>) -> Vec<ImageRecord> {
    if let Some(term) = search.filter(|t| !t.is_empty()) {
        let tag = normalize_tag(term);
        records.retain(|record| record.has_tag(&tag));
    }

    // Fixed-width timestamps, so string order is time order
    records.sort_by(|a, b| b.upload_date.cmp(&a.upload_date));
    records
}

/// List every record, or only those matching `search`
pub async fn list_images(table: &impl ImageTable, search: Option<&str>) -> Result<ImageList> {
    let records = table.scan_records().await?;
    let images = select_images(records, search);
    tracing::info!(search = ?search, count = images.len(), "listed images");
    Ok(ImageList::new(images))
}

pub fn json_response(status: StatusCode, body: &impl Serialize) -> Result<Response<Body>> {
    Response::builder()
        .status(status)
        .header("Content-Type", "application/json")
        .body(serde_json::to_string(body)?.into())
        .map_err(|e| GalleryError::Http(e.to_string()))
}

pub fn error_response(status: StatusCode, message: &str) -> Result<Response<Body>> {
    json_response(status, &ErrorBody::new(message))
}

fn preflight() -> Result<Response<Body>> {
    Response::builder()
        .status(StatusCode::OK)
        .body(Body::Empty)
        .map_err(|e| GalleryError::Http(e.to_string()))
}

/// HTTP Handler: GET /images[?search=tag]
pub async fn list_images_handler(
    table: &impl ImageTable,
    search: Option<&str>,
) -> Result<Response<Body>> {
    let list = list_images(table, search).await?;
    json_response(StatusCode::OK, &list)
}

/// HTTP Handler: GET /images/{id}
pub async fn get_image_handler(table: &impl ImageTable, image_id: &str) -> Result<Response<Body>> {
    match table.get_record(image_id).await? {
        Some(record) => json_response(StatusCode::OK, &record),
        None => {
            tracing::info!(image_id, "image not found");
            error_response(StatusCode::NOT_FOUND, "Image not found")
        }
    }
}

/// Dispatch a request on method and path segments. CORS headers are the caller's job.
pub async fn route(
    table: &impl ImageTable,
    method: &Method,
    path: &str,
    search: Option<&str>,
) -> Result<Response<Body>> {
    let parts: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

    match (method, parts.as_slice()) {
        // CORS preflight, any path
        (&Method::OPTIONS, _) => preflight(),
        // GET /images - list all or search by tag
        (&Method::GET, ["images"]) => list_images_handler(table, search).await,
        // GET /images/{id} - the trailing segment is the id
        (&Method::GET, ["images", .., image_id]) => get_image_handler(table, image_id).await,
        _ => {
            tracing::warn!("⚠️ No route matched - Method: {} Path: {}", method, path);
            error_response(StatusCode::NOT_FOUND, "Endpoint not found")
        }
    }
}

//! HTTP handlers.

use super::{ApiError, AppState};
use axum::extract::multipart::MultipartRejection;
use axum::extract::{Multipart, State};
use axum::Json;
use serde_json::{json, Value};
use tracing::{info, info_span, warn, Instrument};
use uuid::Uuid;
use washquote_types::{Error, EstimateRequest, EstimateResponse, ImagePayload, ServiceType};

/// Estimate a quote from uploaded photos.
///
/// # Multipart Fields
/// - `service`: service tag (optional, defaults to "house")
/// - `images`: one or more image files (required)
///
/// # Returns
/// - 200 OK with the quote breakdown
/// - 400 Bad Request if no images were uploaded
/// - 500 if no inference credential is configured or the body is unreadable
pub async fn estimate_handler(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<EstimateResponse>, ApiError> {
    let request_id = Uuid::new_v4();
    let span = info_span!("estimate", %request_id);

    async move {
        let multipart = multipart.map_err(|e| Error::Unexpected(e.body_text()))?;
        let request = read_estimate_form(multipart).await?;
        info!(
            service = %request.service,
            images = request.images.len(),
            "estimate request received"
        );
        if !request.service.is_known() {
            warn!(service = %request.service, "unrecognized service tag, using default rate");
        }

        let response = state.service.estimate(request).await?;
        Ok::<_, ApiError>(Json(response))
    }
    .instrument(span)
    .await
}

/// Collect the `service` and `images` parts of an estimate form.
///
/// Unknown parts are ignored. Empty `images` parts (a file input left blank)
/// are skipped.
pub async fn read_estimate_form(mut multipart: Multipart) -> Result<EstimateRequest, Error> {
    let mut service: Option<String> = None;
    let mut images: Vec<ImagePayload> = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| Error::Unexpected(e.body_text()))?
    {
        let field_name = field.name().map(|n| n.to_string());
        match field_name.as_deref() {
            Some("images") => {
                let media_type = field.content_type().map(|c| c.to_string());
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| Error::Unexpected(e.body_text()))?;
                if !bytes.is_empty() {
                    images.push(ImagePayload::new(bytes.to_vec(), media_type));
                }
            }
            Some("service") => {
                service = Some(
                    field
                        .text()
                        .await
                        .map_err(|e| Error::Unexpected(e.body_text()))?,
                );
            }
            _ => {}
        }
    }

    let service = service
        .as_deref()
        .map(ServiceType::parse)
        .unwrap_or_default();

    Ok(EstimateRequest::new(service, images))
}

pub async fn healthz_handler() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

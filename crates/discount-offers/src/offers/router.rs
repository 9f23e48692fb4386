use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Form, Json, Router,
};
use serde_json::json;
use tracing::error;

use super::domain::{AccountNumber, OfferSubmission};
use super::export::{self, OfferRow};
use super::service::{OfferService, OfferServiceError};
use super::store::OfferStore;
use super::validation::RejectionReason;

/// Router builder exposing intake, listing and export endpoints.
pub fn offer_router<S>(service: Arc<OfferService<S>>) -> Router
where
    S: OfferStore + 'static,
{
    Router::new()
        .route(
            "/api/v1/offers",
            post(submit_handler::<S>).get(listing_handler::<S>),
        )
        .route("/offers/apply", post(form_submit_handler::<S>))
        .route(
            "/api/v1/offers/accounts/:account_number",
            get(account_listing_handler::<S>),
        )
        .route("/api/v1/offers/export.xlsx", get(export_xlsx_handler::<S>))
        .route("/api/v1/offers/export.csv", get(export_csv_handler::<S>))
        .with_state(service)
}

pub(crate) async fn submit_handler<S>(
    State(service): State<Arc<OfferService<S>>>,
    Json(submission): Json<OfferSubmission>,
) -> Response
where
    S: OfferStore + 'static,
{
    submission_response(&service, submission)
}

pub(crate) async fn form_submit_handler<S>(
    State(service): State<Arc<OfferService<S>>>,
    Form(submission): Form<OfferSubmission>,
) -> Response
where
    S: OfferStore + 'static,
{
    submission_response(&service, submission)
}

fn submission_response<S>(service: &OfferService<S>, submission: OfferSubmission) -> Response
where
    S: OfferStore + 'static,
{
    match service.submit(submission) {
        Ok(offer) => {
            let payload = json!({
                "offer": OfferRow::from(&offer),
                "message": offer.confirmation(),
            });
            (StatusCode::CREATED, Json(payload)).into_response()
        }
        Err(err) => error_response(err),
    }
}

pub(crate) async fn listing_handler<S>(State(service): State<Arc<OfferService<S>>>) -> Response
where
    S: OfferStore + 'static,
{
    match service.listing() {
        Ok(listing) => (StatusCode::OK, Json(listing)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn account_listing_handler<S>(
    State(service): State<Arc<OfferService<S>>>,
    Path(account_number): Path<String>,
) -> Response
where
    S: OfferStore + 'static,
{
    let account = match AccountNumber::parse(&account_number) {
        Ok(account) => account,
        Err(reason) => return error_response(OfferServiceError::Rejected(reason)),
    };

    match service.account_listing(&account) {
        Ok(listing) => (StatusCode::OK, Json(listing)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn export_xlsx_handler<S>(State(service): State<Arc<OfferService<S>>>) -> Response
where
    S: OfferStore + 'static,
{
    match service.export_xlsx() {
        Ok(bytes) => attachment(export::XLSX_CONTENT_TYPE, export::XLSX_FILENAME, bytes),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn export_csv_handler<S>(State(service): State<Arc<OfferService<S>>>) -> Response
where
    S: OfferStore + 'static,
{
    match service.export_csv() {
        Ok(bytes) => attachment(mime::TEXT_CSV.as_ref(), export::CSV_FILENAME, bytes),
        Err(err) => error_response(err),
    }
}

fn attachment(content_type: &str, filename: &str, bytes: Vec<u8>) -> Response {
    let disposition = format!("attachment; filename=\"{filename}\"");
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, content_type.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        bytes,
    )
        .into_response()
}

fn error_response(err: OfferServiceError) -> Response {
    match err {
        OfferServiceError::Rejected(RejectionReason::UniquenessViolation) => {
            let reason = RejectionReason::UniquenessViolation;
            let payload = json!({
                "error": reason.to_string(),
                "code": reason.code(),
            });
            (StatusCode::CONFLICT, Json(payload)).into_response()
        }
        OfferServiceError::Rejected(reason) => {
            let payload = json!({
                "error": reason.to_string(),
                "code": reason.code(),
            });
            (StatusCode::UNPROCESSABLE_ENTITY, Json(payload)).into_response()
        }
        OfferServiceError::Contention { .. } => {
            let payload = json!({
                "error": err.to_string(),
                "code": "contention",
            });
            (StatusCode::CONFLICT, Json(payload)).into_response()
        }
        other => {
            error!(error = %other, "offer request failed");
            let payload = json!({
                "error": other.to_string(),
            });
            (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response()
        }
    }
}

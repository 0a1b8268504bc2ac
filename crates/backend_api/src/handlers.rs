use axum::{
    extract::{Multipart, Path, State},
    http::{header, HeaderValue},
    response::{IntoResponse, Response},
    Json,
};
use models::RunParameters;
use serde::Serialize;

use crate::{error::ApiError, reports::upload_file_name, state::SharedState, Result};

const XLSX_CONTENT_TYPE: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

#[derive(Debug, Serialize)]
pub struct CalculateResponse {
    pub success: bool,
    pub message: String,
    pub download_url: String,
    pub asset_count: usize,
    pub revaluation_voucher_count: usize,
    pub depreciation_voucher_count: usize,
}

/// Raw multipart form, before validation.
#[derive(Default)]
struct CalculateForm {
    file_name: Option<String>,
    file: Option<Vec<u8>>,
    transaction_year: String,
    period: String,
    revaluation_rate: String,
}

async fn read_form(mut multipart: Multipart) -> Result<CalculateForm> {
    let mut form = CalculateForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Failed to read multipart field: {}", e)))?
    {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "excel_file" => {
                form.file_name = field.file_name().map(str::to_string);
                form.file = Some(
                    field
                        .bytes()
                        .await
                        .map_err(|e| ApiError::BadRequest(format!("Failed to read file content: {}", e)))?
                        .to_vec(),
                );
            }
            "transaction_year" | "period" | "revaluation_rate" => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| ApiError::BadRequest(format!("Failed to read {}: {}", name, e)))?;
                match name.as_str() {
                    "transaction_year" => form.transaction_year = value,
                    "period" => form.period = value,
                    _ => form.revaluation_rate = value,
                }
            }
            _ => {}
        }
    }

    Ok(form)
}

/// POST /api/calculate
/// Runs the revaluation on an uploaded register and returns where to fetch the report
pub async fn calculate(State(state): State<SharedState>, multipart: Multipart) -> Result<Json<CalculateResponse>> {
    let form = read_form(multipart).await?;

    let content = form
        .file
        .ok_or_else(|| ApiError::BadRequest("No Excel file uploaded".to_string()))?;
    let file_name = form.file_name.unwrap_or_default();
    if file_name.trim().is_empty() {
        return Err(ApiError::BadRequest("No file selected".to_string()));
    }

    let params = RunParameters::parse(&form.transaction_year, &form.period, &form.revaluation_rate)?;
    tracing::info!(
        file = %file_name,
        bytes = content.len(),
        year = params.transaction_year,
        period = params.period.code(),
        rate = params.global_rate,
        "calculation requested"
    );

    // The upload lives only as long as this directory; it is removed on every exit path.
    let upload_dir = tempfile::tempdir()?;
    let input_path = upload_dir.path().join(upload_file_name(&file_name));
    tokio::fs::write(&input_path, &content).await?;

    let pipeline = state.pipeline.clone();
    let summary = tokio::task::spawn_blocking(move || pipeline.process_file(&input_path, &params))
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))??;

    if let Err(e) = upload_dir.close() {
        tracing::warn!(error = %e, "failed to remove upload directory");
    }

    Ok(Json(CalculateResponse {
        success: true,
        message: "Calculation completed successfully".to_string(),
        download_url: format!("/api/download/{}", summary.output_file),
        asset_count: summary.asset_count,
        revaluation_voucher_count: summary.revaluation_voucher_count,
        depreciation_voucher_count: summary.depreciation_voucher_count,
    }))
}

/// GET /api/download/:file
/// Serves a report produced by an earlier calculation
pub async fn download_report(
    State(state): State<SharedState>,
    Path(file_name): Path<String>,
) -> Result<Response> {
    let bytes = state.reports.fetch_report(&file_name).await?;
    attachment(&file_name, bytes)
}

/// GET /api/template
/// Returns the blank input template with example rows
pub async fn download_template() -> Result<Response> {
    let bytes = report_writer::render_template()?;
    attachment(report_writer::TEMPLATE_FILE_NAME, bytes)
}

fn attachment(file_name: &str, bytes: Vec<u8>) -> Result<Response> {
    let disposition = HeaderValue::from_str(&format!("attachment; filename=\"{}\"", file_name))
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    Ok((
        [
            (header::CONTENT_TYPE, HeaderValue::from_static(XLSX_CONTENT_TYPE)),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        bytes,
    )
        .into_response())
}

/// GET /health
/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "fixed-asset-revaluation"
    }))
}

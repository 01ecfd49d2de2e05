use std::collections::HashMap;
use std::io::{Cursor, Write};

use axum::{
    extract::{DefaultBodyLimit, Json, Multipart},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use pagedeck::operations::{
    add_page_numbers, add_watermark, compress_pdf, delete_pages, extract_pages, images_to_pdf,
    merge_files, package, pdf_to_images, reorder_pages, rotate_pages, split_pdf,
    CompressionLevel, NumberFormat, NumberPosition, Output, PageNumberOptions, RotateOptions,
    RotationAngle, SplitMode, SplitOptions, WatermarkOptions, WatermarkPosition,
};
use pagedeck::{OperationError, PageRange, PageSpec, PdfFile};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Per-request upload cap, matching the original service limit.
const MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;

/// Standard error response structure
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Human-readable error message describing what went wrong
    pub error: String,
}

/// Application-specific error types for the API
#[derive(Debug)]
pub enum AppError {
    /// Operation errors from pagedeck operations
    Operation(OperationError),
    /// Malformed request (bad multipart, missing fields)
    BadRequest(String),
    /// Everything that should never leak request details
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::Operation(e) => {
                let status = match &e {
                    OperationError::EmptySelection(_)
                    | OperationError::NotEnoughInputs
                    | OperationError::InvalidOptions(_)
                    | OperationError::InvalidRotation(_)
                    | OperationError::Parse(_) => StatusCode::BAD_REQUEST,
                    OperationError::Unsupported(_) => StatusCode::SERVICE_UNAVAILABLE,
                    _ => StatusCode::INTERNAL_SERVER_ERROR,
                };
                (status, e.to_string())
            }
            AppError::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
            AppError::Internal(message) => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

impl From<OperationError> for AppError {
    fn from(err: OperationError) -> Self {
        AppError::Operation(err)
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Operation(OperationError::Io(err))
    }
}

/// Build the application router with all routes configured
pub fn app() -> Router {
    Router::new()
        .route("/api/health", get(health_check))
        // page operations
        .route("/api/merge", post(merge_handler))
        .route("/api/split", post(split_handler))
        .route("/api/delete-pages", post(delete_handler))
        .route("/api/extract-pages", post(extract_handler))
        .route("/api/organize", post(organize_handler))
        .route("/api/rotate", post(rotate_handler))
        // page decorations
        .route("/api/watermark", post(watermark_handler))
        .route("/api/page-numbers", post(page_numbers_handler))
        // whole-document tools
        .route("/api/compress", post(compress_handler))
        .route("/api/images-to-pdf", post(images_handler))
        .route("/api/scan-to-pdf", post(images_handler))
        .route("/api/pdf-to-images", post(pdf_to_images_handler))
        .route("/api/protect", post(protect_handler))
        .route("/api/unlock", post(unlock_handler))
        // tools the original exposes but this build does not implement
        .route("/api/ocr", post(|| unsupported("ocr")))
        .route("/api/repair", post(|| unsupported("repair")))
        .route("/api/edit-text", post(|| unsupported("edit-text")))
        .route("/api/word-to-pdf", post(|| unsupported("word-to-pdf")))
        .route("/api/ppt-to-pdf", post(|| unsupported("ppt-to-pdf")))
        .route("/api/excel-to-pdf", post(|| unsupported("excel-to-pdf")))
        .route("/api/html-to-pdf", post(|| unsupported("html-to-pdf")))
        .route("/api/pdf-to-word", post(|| unsupported("pdf-to-word")))
        .route("/api/pdf-to-ppt", post(|| unsupported("pdf-to-ppt")))
        .route("/api/pdf-to-excel", post(|| unsupported("pdf-to-excel")))
        .route("/api/pdf-to-pdfa", post(|| unsupported("pdf-to-pdfa")))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// Health check endpoint for monitoring and load balancing
pub async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "pagedeck API",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

async fn unsupported(tool: &'static str) -> AppError {
    AppError::Operation(OperationError::Unsupported(tool))
}

/// Everything a handler needs from a multipart request: uploaded files in
/// arrival order plus the plain text fields.
struct Upload {
    files: Vec<(String, Vec<u8>)>,
    fields: HashMap<String, String>,
}

impl Upload {
    async fn read(mut multipart: Multipart) -> Result<Self, AppError> {
        let mut files = Vec::new();
        let mut fields = HashMap::new();

        while let Some(field) = multipart.next_field().await.map_err(|e| {
            AppError::BadRequest(format!("failed to read multipart field: {e}"))
        })? {
            let name = field.name().unwrap_or("").to_string();
            if let Some(filename) = field.file_name() {
                let filename = filename.to_string();
                let bytes = field.bytes().await.map_err(|e| {
                    AppError::BadRequest(format!("failed to read file data: {e}"))
                })?;
                files.push((filename, bytes.to_vec()));
            } else {
                let value = field.text().await.map_err(|e| {
                    AppError::BadRequest(format!("failed to read field {name}: {e}"))
                })?;
                fields.insert(name, value);
            }
        }

        Ok(Self { files, fields })
    }

    /// First uploaded file parsed as a PDF. Output filenames are fixed per
    /// operation, so the upload's own name is irrelevant here.
    fn single_pdf(&self) -> Result<PdfFile, AppError> {
        let (_, bytes) = self
            .files
            .first()
            .ok_or_else(|| AppError::BadRequest("no file provided in upload".to_string()))?;
        Ok(PdfFile::from_bytes(bytes)?)
    }

    fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    fn flag(&self, name: &str) -> bool {
        matches!(self.field(name), Some("true" | "1" | "on"))
    }
}

fn pdf_response(filename: &str, bytes: Vec<u8>) -> Response {
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        bytes,
    )
        .into_response()
}

fn zip_response(filename: &str, entries: Vec<(String, Vec<u8>)>) -> Result<Response, AppError> {
    let mut cursor = Cursor::new(Vec::new());
    let mut writer = zip::ZipWriter::new(&mut cursor);
    let options = zip::write::SimpleFileOptions::default()
        .compression_method(zip::CompressionMethod::Deflated);

    for (name, bytes) in &entries {
        writer
            .start_file(name.as_str(), options)
            .map_err(|e| AppError::Internal(format!("failed to write archive: {e}")))?;
        writer.write_all(bytes)?;
    }
    writer
        .finish()
        .map_err(|e| AppError::Internal(format!("failed to finish archive: {e}")))?;

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "application/zip".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        cursor.into_inner(),
    )
        .into_response())
}

fn output_response(output: Output) -> Result<Response, AppError> {
    match output {
        Output::Single { filename, bytes } => Ok(pdf_response(&filename, bytes)),
        Output::Archive { filename, entries } => zip_response(&filename, entries),
    }
}

/// Merge two or more uploaded PDFs, pages in upload order.
async fn merge_handler(multipart: Multipart) -> Result<Response, AppError> {
    let upload = Upload::read(multipart).await?;

    let mut files = Vec::with_capacity(upload.files.len());
    for (_, bytes) in &upload.files {
        files.push(PdfFile::from_bytes(bytes)?);
    }
    let count = files.len();

    let mut merged = merge_files(files)?;
    let bytes = merged.to_bytes()?;
    info!(inputs = count, size = bytes.len(), "merged upload");
    Ok(pdf_response("merged.pdf", bytes))
}

/// Split one PDF by a flat page spec or a JSON range list. The response is
/// a single PDF when exactly one part comes out, a ZIP otherwise.
async fn split_handler(multipart: Multipart) -> Result<Response, AppError> {
    let upload = Upload::read(multipart).await?;
    let file = upload.single_pdf()?;

    let mode = if let Some(raw) = upload.field("ranges") {
        let ranges: Vec<PageRange> = serde_json::from_str(raw).map_err(|e| {
            AppError::Operation(OperationError::InvalidOptions(format!(
                "malformed ranges: {e}"
            )))
        })?;
        SplitMode::Ranges(ranges)
    } else {
        SplitMode::Pages(PageSpec::parse(upload.field("pages").unwrap_or("all")))
    };
    let options = SplitOptions {
        mode,
        merge: upload.flag("merge"),
    };

    let parts = split_pdf(&file, &options)?;
    output_response(package("split", parts)?)
}

/// Delete the named pages; everything else survives in order.
async fn delete_handler(multipart: Multipart) -> Result<Response, AppError> {
    let upload = Upload::read(multipart).await?;
    let file = upload.single_pdf()?;
    let spec = PageSpec::parse(
        upload
            .field("pagesToDelete")
            .or_else(|| upload.field("pages"))
            .unwrap_or(""),
    );

    let mut out = delete_pages(&file, &spec)?;
    Ok(pdf_response("deleted.pdf", out.to_bytes()?))
}

/// Extract the named pages into a fresh document.
async fn extract_handler(multipart: Multipart) -> Result<Response, AppError> {
    let upload = Upload::read(multipart).await?;
    let file = upload.single_pdf()?;
    let spec = PageSpec::parse(
        upload
            .field("pagesToExtract")
            .or_else(|| upload.field("pages"))
            .unwrap_or(""),
    );

    let mut out = extract_pages(&file, &spec)?;
    Ok(pdf_response("extracted.pdf", out.to_bytes()?))
}

/// One route, three actions: reorder, delete or rotate, selected by the
/// `action` field.
async fn organize_handler(multipart: Multipart) -> Result<Response, AppError> {
    let upload = Upload::read(multipart).await?;
    let file = upload.single_pdf()?;

    let mut out = match upload.field("action").unwrap_or("reorder") {
        "reorder" => {
            let spec = PageSpec::parse(upload.field("pageOrder").unwrap_or(""));
            reorder_pages(&file, &spec)?
        }
        "delete" => {
            let spec = PageSpec::parse(upload.field("pagesToDelete").unwrap_or(""));
            delete_pages(&file, &spec)?
        }
        "rotate" => {
            let degrees = parse_number::<i32>(&upload, "angle", 90)?;
            let options = RotateOptions {
                pages: PageSpec::parse(upload.field("pagesToRotate").unwrap_or("all")),
                angle: RotationAngle::from_degrees(degrees)?,
            };
            rotate_pages(&file, &options)?
        }
        other => {
            return Err(AppError::Operation(OperationError::InvalidOptions(
                format!("unknown organize action: {other}"),
            )))
        }
    };

    Ok(pdf_response("organized.pdf", out.to_bytes()?))
}

/// Rotate a page selection by a multiple of 90 degrees.
async fn rotate_handler(multipart: Multipart) -> Result<Response, AppError> {
    let upload = Upload::read(multipart).await?;
    let file = upload.single_pdf()?;

    let options = RotateOptions {
        pages: PageSpec::parse(upload.field("pages").unwrap_or("all")),
        angle: RotationAngle::from_degrees(parse_number::<i32>(&upload, "angle", 90)?)?,
    };

    let mut out = rotate_pages(&file, &options)?;
    Ok(pdf_response("rotated.pdf", out.to_bytes()?))
}

/// Stamp a text watermark over every page.
async fn watermark_handler(multipart: Multipart) -> Result<Response, AppError> {
    let upload = Upload::read(multipart).await?;
    let mut file = upload.single_pdf()?;

    let options = WatermarkOptions {
        text: upload.field("text").unwrap_or("").to_string(),
        position: WatermarkPosition::parse(upload.field("position").unwrap_or("")),
        opacity: parse_number::<u8>(&upload, "opacity", 30)?,
        ..WatermarkOptions::default()
    };

    add_watermark(&mut file, &options)?;
    Ok(pdf_response("watermarked.pdf", file.to_bytes()?))
}

/// Stamp page numbers onto every page.
async fn page_numbers_handler(multipart: Multipart) -> Result<Response, AppError> {
    let upload = Upload::read(multipart).await?;
    let mut file = upload.single_pdf()?;

    let options = PageNumberOptions {
        position: NumberPosition::parse(upload.field("position").unwrap_or("")),
        format: NumberFormat::parse(upload.field("format").unwrap_or("")),
        start_at: parse_number::<u32>(&upload, "startPage", 1)?,
        ..PageNumberOptions::default()
    };

    add_page_numbers(&mut file, &options)?;
    Ok(pdf_response("numbered.pdf", file.to_bytes()?))
}

/// Re-save the document at the requested compression level and report the
/// size change in response headers.
async fn compress_handler(multipart: Multipart) -> Result<Response, AppError> {
    let upload = Upload::read(multipart).await?;
    let (_, bytes) = upload
        .files
        .first()
        .ok_or_else(|| AppError::BadRequest("no file provided in upload".to_string()))?;

    let level = CompressionLevel::parse(upload.field("level").unwrap_or(""));
    let (out, summary) = compress_pdf(bytes, level)?;

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"compressed.pdf\"".to_string(),
            ),
            (
                header::HeaderName::from_static("x-original-size"),
                summary.original_size.to_string(),
            ),
            (
                header::HeaderName::from_static("x-compressed-size"),
                summary.compressed_size.to_string(),
            ),
            (
                header::HeaderName::from_static("x-compression-ratio"),
                format!("{}%", summary.ratio_percent()),
            ),
        ],
        out,
    )
        .into_response())
}

/// Turn uploaded raster images into a one-page-per-image PDF.
async fn images_handler(multipart: Multipart) -> Result<Response, AppError> {
    let upload = Upload::read(multipart).await?;
    if upload.files.is_empty() {
        return Err(AppError::BadRequest("no file provided in upload".to_string()));
    }

    let inputs: Vec<Vec<u8>> = upload.files.into_iter().map(|(_, bytes)| bytes).collect();
    let mut file = images_to_pdf(&inputs)?;
    Ok(pdf_response("converted.pdf", file.to_bytes()?))
}

/// Page rasterization needs a renderer this build does not carry; the
/// route exists so clients get a clean 503 instead of a 404.
async fn pdf_to_images_handler(multipart: Multipart) -> Result<Response, AppError> {
    let upload = Upload::read(multipart).await?;
    let file = upload.single_pdf()?;
    match pdf_to_images(&file) {
        Err(e) => Err(e.into()),
        Ok(_) => Err(AppError::Internal(
            "unexpected rasterizer output".to_string(),
        )),
    }
}

/// Best-effort protect: validates the password pair and re-saves. The
/// output is NOT encrypted; real encryption is out of scope.
async fn protect_handler(multipart: Multipart) -> Result<Response, AppError> {
    let upload = Upload::read(multipart).await?;
    let mut file = upload.single_pdf()?;

    let password = upload.field("password").unwrap_or("");
    if password.len() < 3 {
        return Err(AppError::Operation(OperationError::InvalidOptions(
            "password must be at least 3 characters".to_string(),
        )));
    }
    if let Some(confirm) = upload.field("confirmPassword") {
        if confirm != password {
            return Err(AppError::Operation(OperationError::InvalidOptions(
                "passwords do not match".to_string(),
            )));
        }
    }

    Ok(pdf_response("protected.pdf", file.to_bytes()?))
}

/// Best-effort unlock: a document that loads is re-saved as-is.
async fn unlock_handler(multipart: Multipart) -> Result<Response, AppError> {
    let upload = Upload::read(multipart).await?;
    let mut file = upload.single_pdf()?;
    Ok(pdf_response("unlocked.pdf", file.to_bytes()?))
}

fn parse_number<T: std::str::FromStr>(
    upload: &Upload,
    name: &str,
    default: T,
) -> Result<T, AppError> {
    match upload.field(name) {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|_| {
            AppError::Operation(OperationError::InvalidOptions(format!(
                "field {name} is not a valid number: {raw}"
            )))
        }),
    }
}

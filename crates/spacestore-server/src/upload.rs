//! `POST /upload` handler.

use std::path::Path;

use axum::extract::Multipart;
use axum::extract::State;
use axum::extract::multipart::Field;
use spacestore_core::TenantRoot;
use spacestore_core::detect_format;
use spacestore_core::extract_archive;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::debug;
use tracing::error;
use tracing::info;
use tracing::warn;

use crate::AppState;
use crate::SECURITY_TARGET;
use crate::auth::Tenant;
use crate::error::UploadError;

/// Multipart field holding the uploaded file.
pub const FILE_FIELD: &str = "file";

/// Body returned for a stored upload.
pub const UPLOADED: &str = "file uploaded";

/// Body returned for a stored and extracted archive.
pub const UPLOADED_AND_EXTRACTED: &str = "file uploaded and extracted";

/// Stores the `file` field under the tenant's directory and extracts it if
/// it is a ZIP or TAR archive.
///
/// Only the first `file` field is used; other fields are ignored.
pub async fn upload(
    State(state): State<AppState>,
    Tenant(tenant): Tenant,
    mut multipart: Multipart,
) -> Result<&'static str, UploadError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() == Some(FILE_FIELD) {
            return store(&state, &tenant, field).await;
        }
    }

    Err(UploadError::MissingFile)
}

async fn store(
    state: &AppState,
    tenant: &TenantRoot,
    field: Field<'_>,
) -> Result<&'static str, UploadError> {
    let raw_name = field.file_name().ok_or(UploadError::MissingFile)?;
    let file_name = sanitize_file_name(raw_name)?.to_owned();

    let tenant_dir = tenant.dir_in(&state.uploads_root);
    fs::create_dir_all(&tenant_dir)
        .await
        .map_err(UploadError::Storage)?;

    let staged = tenant_dir.join(&file_name);
    let size = write_field(field, &staged).await?;
    debug!(tenant = %tenant, file = %file_name, bytes = size, "upload staged");

    let Some(archive_type) = detect_format(&file_name) else {
        info!(tenant = %tenant, file = %file_name, bytes = size, "file uploaded");
        return Ok(UPLOADED);
    };

    let result =
        tokio::task::spawn_blocking(move || extract_archive(&staged, archive_type, &tenant_dir))
            .await?;

    match result {
        Ok(report) => {
            for warning in &report.warnings {
                warn!(tenant = %tenant, file = %file_name, "{warning}");
            }
            info!(
                tenant = %tenant,
                file = %file_name,
                files = report.files_extracted,
                bytes = report.bytes_written,
                "archive extracted"
            );
            Ok(UPLOADED_AND_EXTRACTED)
        }
        Err(err) if err.is_security_violation() => {
            warn!(
                target: SECURITY_TARGET,
                tenant = %tenant,
                file = %file_name,
                error = %err,
                "rejected hostile archive"
            );
            Err(err.into())
        }
        Err(err) => {
            error!(tenant = %tenant, file = %file_name, error = %err, "archive extraction failed");
            Err(err.into())
        }
    }
}

/// Reduces a client-supplied file name to its final path component.
///
/// # Errors
///
/// Returns `UploadError::InvalidFileName` if nothing usable remains.
pub fn sanitize_file_name(raw: &str) -> Result<&str, UploadError> {
    let name = raw.rsplit(['/', '\\']).next().unwrap_or_default();

    if name.is_empty() || name == "." || name == ".." || name.contains('\0') {
        return Err(UploadError::InvalidFileName(raw.to_owned()));
    }

    Ok(name)
}

/// Streams a multipart field to `path`, returning the number of bytes.
///
/// A partially written file is removed when the body fails mid-stream.
async fn write_field(mut field: Field<'_>, path: &Path) -> Result<u64, UploadError> {
    let mut file = fs::File::create(path)
        .await
        .map_err(UploadError::Storage)?;
    let mut written: u64 = 0;

    loop {
        let chunk = match field.chunk().await {
            Ok(Some(chunk)) => chunk,
            Ok(None) => break,
            Err(err) => {
                drop(file);
                discard(path).await;
                return Err(err.into());
            }
        };
        file.write_all(&chunk).await.map_err(UploadError::Storage)?;
        written += chunk.len() as u64;
    }

    file.flush().await.map_err(UploadError::Storage)?;
    Ok(written)
}

async fn discard(path: &Path) {
    if let Err(err) = fs::remove_file(path).await {
        warn!(file = %path.display(), error = %err, "failed to remove partial upload");
    }
}

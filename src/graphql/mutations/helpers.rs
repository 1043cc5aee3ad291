use std::io::Read;

use async_graphql::{Context, Result, Upload};

use crate::graphql::errors::StructuredError;
use crate::services::UploadedFile;

/// Reads a multipart upload fully into memory.
pub fn read_upload(ctx: &Context<'_>, upload: Option<Upload>) -> Result<Option<UploadedFile>> {
    let Some(upload) = upload else {
        return Ok(None);
    };

    let value = upload
        .value(ctx)
        .map_err(|e| StructuredError::bad_request(format!("Failed to read upload: {}", e)))?;
    let filename = value.filename.clone();

    let mut bytes = Vec::new();
    value
        .into_read()
        .read_to_end(&mut bytes)
        .map_err(|e| StructuredError::bad_request(format!("Failed to read upload {}: {}", filename, e)))?;

    Ok(Some(UploadedFile { filename, bytes }))
}

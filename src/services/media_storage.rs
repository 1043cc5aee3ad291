use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use uuid::Uuid;

use crate::errors::{CoreError, CoreResult};

/// An uploaded file as received from a multipart request.
#[derive(Clone, Debug)]
pub struct UploadedFile {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// Writes uploaded files below the media root.
#[derive(Clone, Debug)]
pub struct MediaStorage {
    root: PathBuf,
}

impl MediaStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// `avatars/{user_id}{profile_name}.{ext}`
    pub fn avatar_path(user_id: i32, profile_name: &str, filename: &str) -> String {
        upload_path("avatars", user_id, profile_name, filename)
    }

    /// `todos/{user_id}{title}.{ext}`
    pub fn plan_image_path(user_id: i32, title: &str, filename: &str) -> String {
        upload_path("todos", user_id, title, filename)
    }

    /// Writes `file` beside `relative` without touching whatever is stored there.
    ///
    /// The upload only replaces the stored file once [`settle`] sees the
    /// row write succeed.
    pub async fn stage(&self, relative: String, file: Option<UploadedFile>) -> CoreResult<Option<StagedUpload>> {
        let Some(file) = file else {
            return Ok(None);
        };

        let target = self.root.join(&relative);
        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                CoreError::unavailable(format!("Failed to create media directory: {}", e))
                    .with_source(e)
            })?;
        }

        let mut staging = target.clone().into_os_string();
        staging.push(format!(".{}.part", Uuid::new_v4().simple()));
        let staging = PathBuf::from(staging);
        tokio::fs::write(&staging, &file.bytes).await.map_err(|e| {
            CoreError::unavailable(format!("Failed to store upload {}: {}", relative, e))
                .with_source(e)
        })?;

        debug!("Staged upload {} at {}", file.filename, staging.display());
        Ok(Some(StagedUpload {
            relative,
            staging,
            target,
        }))
    }
}

/// An upload written to a scratch file next to its final location.
#[derive(Debug)]
pub struct StagedUpload {
    relative: String,
    staging: PathBuf,
    target: PathBuf,
}

impl StagedUpload {
    /// Relative path the row should store.
    pub fn path(&self) -> &str {
        &self.relative
    }

    async fn persist(self) -> CoreResult<()> {
        tokio::fs::rename(&self.staging, &self.target).await.map_err(|e| {
            CoreError::unavailable(format!("Failed to store upload {}: {}", self.relative, e))
                .with_source(e)
        })?;
        debug!("Stored upload at {}", self.target.display());
        Ok(())
    }

    async fn discard(self) {
        if let Err(e) = tokio::fs::remove_file(&self.staging).await {
            warn!("Failed to remove staged upload {}: {}", self.staging.display(), e);
        }
    }
}

/// Moves a staged upload into place when `result` succeeded, drops it otherwise.
pub async fn settle<T>(staged: Option<StagedUpload>, result: CoreResult<T>) -> CoreResult<T> {
    match (staged, result) {
        (Some(upload), Ok(value)) => {
            upload.persist().await?;
            Ok(value)
        }
        (Some(upload), Err(e)) => {
            upload.discard().await;
            Err(e)
        }
        (None, result) => result,
    }
}

fn upload_path(dir: &str, user_id: i32, stem: &str, filename: &str) -> String {
    let stem = sanitize(stem);
    match Path::new(filename).extension().and_then(|ext| ext.to_str()) {
        Some(ext) => format!("{}/{}{}.{}", dir, user_id, stem, ext.to_ascii_lowercase()),
        None => format!("{}/{}{}", dir, user_id, stem),
    }
}

fn sanitize(stem: &str) -> String {
    stem.chars()
        .filter(|c| !matches!(c, '/' | '\\' | '\0'))
        .collect::<String>()
        .trim_start_matches('.')
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upload_paths_follow_layout() {
        assert_eq!(
            MediaStorage::avatar_path(3, "hanako", "me.PNG"),
            "avatars/3hanako.png"
        );
        assert_eq!(
            MediaStorage::plan_image_path(5, "数学の相談", "cover.jpg"),
            "todos/5数学の相談.jpg"
        );
        assert_eq!(MediaStorage::avatar_path(1, "x", "noext"), "avatars/1x");
    }

    #[test]
    fn path_separators_are_stripped() {
        assert_eq!(
            MediaStorage::avatar_path(2, "../../etc/passwd", "a.png"),
            "avatars/2etcpasswd.png"
        );
    }

    fn upload(bytes: &[u8]) -> Option<UploadedFile> {
        Some(UploadedFile {
            filename: "me.png".to_string(),
            bytes: bytes.to_vec(),
        })
    }

    #[tokio::test]
    async fn settled_upload_replaces_stored_file() {
        let dir = tempfile::tempdir().unwrap();
        let storage = MediaStorage::new(dir.path());

        let staged = storage
            .stage("avatars/1test.png".to_string(), upload(b"png"))
            .await
            .unwrap();
        let path = staged.as_ref().map(|s| s.path().to_string());
        assert_eq!(path.as_deref(), Some("avatars/1test.png"));
        assert!(!dir.path().join("avatars/1test.png").exists());

        settle(staged, Ok(())).await.unwrap();
        let bytes = std::fs::read(dir.path().join("avatars/1test.png")).unwrap();
        assert_eq!(bytes, b"png");
        assert_eq!(std::fs::read_dir(dir.path().join("avatars")).unwrap().count(), 1);
    }

    #[tokio::test]
    async fn failed_write_keeps_stored_file() {
        let dir = tempfile::tempdir().unwrap();
        let storage = MediaStorage::new(dir.path());
        std::fs::create_dir_all(dir.path().join("avatars")).unwrap();
        std::fs::write(dir.path().join("avatars/1test.png"), b"old").unwrap();

        let staged = storage
            .stage("avatars/1test.png".to_string(), upload(b"new"))
            .await
            .unwrap();
        let result: CoreResult<()> = Err(CoreError::not_found("Gender", "9"));
        assert!(settle(staged, result).await.is_err());

        let bytes = std::fs::read(dir.path().join("avatars/1test.png")).unwrap();
        assert_eq!(bytes, b"old");
        assert_eq!(std::fs::read_dir(dir.path().join("avatars")).unwrap().count(), 1);
    }

    #[tokio::test]
    async fn nothing_is_staged_without_upload() {
        let dir = tempfile::tempdir().unwrap();
        let storage = MediaStorage::new(dir.path());

        let staged = storage.stage("avatars/1x.png".to_string(), None).await.unwrap();
        assert!(staged.is_none());
        assert_eq!(settle(staged, Ok(7)).await.unwrap(), 7);
    }
}

use std::path::{Path, PathBuf};

use crate::{errors::GraphError, id::is_well_formed};

/// Profile picture storage collaborator.
#[allow(async_fn_in_trait)]
pub trait ImageStore {
    /// Stores `bytes` as the owner's picture and returns its public URL.
    async fn upload_image(&self, bytes: &[u8], owner_id: &str, extension: &str) -> Result<String, GraphError>;

    /// Removes the owner's picture; missing pictures are not an error.
    async fn delete_image(&self, owner_id: &str) -> Result<(), GraphError>;
}

/// Writes one file per owner under a directory, named `{owner_id}.{ext}`.
#[derive(Debug, Clone)]
pub struct DirectoryImageStore {
    directory: PathBuf,
    public_base: String,
}

const ALLOWED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "webp"];

impl DirectoryImageStore {
    pub fn new(directory: impl Into<PathBuf>, public_base: impl Into<String>) -> Self {
        Self {
            directory: directory.into(),
            public_base: public_base.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    fn file_name(owner_id: &str, extension: &str) -> String {
        format!("{owner_id}.{extension}")
    }
}

fn normalize_extension(extension: &str) -> Result<String, GraphError> {
    let extension = extension.trim_start_matches('.').to_ascii_lowercase();
    if ALLOWED_EXTENSIONS.contains(&extension.as_str()) {
        Ok(extension)
    } else {
        Err(crate::errors::ValidationError::single(
            "picture",
            "validation.extension",
            format!("unsupported image type '{extension}'"),
        )
        .into())
    }
}

impl ImageStore for DirectoryImageStore {
    async fn upload_image(&self, bytes: &[u8], owner_id: &str, extension: &str) -> Result<String, GraphError> {
        if !is_well_formed(owner_id) {
            return Err(GraphError::not_found("user", owner_id));
        }
        let extension = normalize_extension(extension)?;
        if bytes.is_empty() {
            return Err(crate::errors::ValidationError::single("picture", "validation.empty", "image is empty").into());
        }

        tokio::fs::create_dir_all(&self.directory).await?;
        // one picture per owner, whatever its previous extension
        self.delete_image(owner_id).await?;

        let name = Self::file_name(owner_id, &extension);
        tokio::fs::write(self.directory.join(&name), bytes).await?;
        log::info!("stored picture for {owner_id} as {name}");
        Ok(format!("{}/{}", self.public_base, name))
    }

    async fn delete_image(&self, owner_id: &str) -> Result<(), GraphError> {
        for extension in ALLOWED_EXTENSIONS {
            let path = self.directory.join(Self::file_name(owner_id, extension));
            match tokio::fs::remove_file(&path).await {
                Ok(()) => log::debug!("removed {}", path.display()),
                Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
                Err(err) => return Err(err.into()),
            }
        }
        Ok(())
    }
}

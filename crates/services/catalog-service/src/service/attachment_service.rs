//! Attachment service - stores uploaded files and their metadata rows.
//!
//! Each call runs in its own unit of work, independent of whatever the
//! calling service has open.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};
use uuid::Uuid;
use validator::Validate;

use common::{AppResult, OptionExt};
use domain::{Attachment, AttachmentCreationDto, DomainError};

use crate::infra::UnitOfWorkFactory;
use crate::repository::Query;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Upload/remove collaborator used by services that own attachments.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait AttachmentService: Send + Sync {
    /// Store the bytes and persist a new attachment row
    async fn upload(&self, dto: AttachmentCreationDto) -> AppResult<Attachment>;

    /// Delete the attachment row and its stored file
    async fn remove(&self, attachment: &Attachment) -> AppResult<()>;
}

/// File system backed implementation of AttachmentService.
pub struct AttachmentManager {
    uow: Arc<dyn UnitOfWorkFactory>,
    root: PathBuf,
}

impl AttachmentManager {
    pub fn new(uow: Arc<dyn UnitOfWorkFactory>, root: impl Into<PathBuf>) -> Self {
        Self {
            uow,
            root: root.into(),
        }
    }

    /// Random stored name keeping the uploaded extension
    fn stored_path(&self, dto: &AttachmentCreationDto) -> PathBuf {
        let stem = Uuid::new_v4();
        let name = match dto.extension() {
            Some(ext) => format!("{}.{}", stem, ext),
            None => stem.to_string(),
        };
        self.root.join(name)
    }

    async fn persist(&self, file_name: String, path: &Path) -> AppResult<Attachment> {
        let uow = self.uow.begin().await?;
        let attachment = uow
            .attachments()
            .create(Attachment::new(file_name, path.to_string_lossy()))
            .await?;
        uow.save().await?;
        Ok(attachment)
    }
}

#[async_trait]
impl AttachmentService for AttachmentManager {
    async fn upload(&self, dto: AttachmentCreationDto) -> AppResult<Attachment> {
        dto.validate().map_err(DomainError::from)?;

        let path = self.stored_path(&dto);
        tokio::fs::create_dir_all(&self.root).await?;
        tokio::fs::write(&path, &dto.content).await?;

        let attachment = match self.persist(dto.file_name, &path).await {
            Ok(attachment) => attachment,
            Err(e) => {
                // No row points at the file, so it would never be cleaned up
                if let Err(io) = tokio::fs::remove_file(&path).await {
                    warn!(path = %path.display(), error = %io, "Failed to discard orphaned upload");
                }
                return Err(e);
            }
        };

        info!(
            attachment_id = attachment.id,
            file_name = %attachment.file_name,
            "Attachment uploaded"
        );
        Ok(attachment)
    }

    async fn remove(&self, attachment: &Attachment) -> AppResult<()> {
        let uow = self.uow.begin().await?;
        let stored = uow
            .attachments()
            .select(Query::by_id(attachment.id))
            .await?
            .ok_or_not_found("Attachment")?;
        uow.attachments().delete(&stored).await?;
        uow.save().await?;

        match tokio::fs::remove_file(&stored.file_path).await {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {
                warn!(attachment_id = stored.id, "Stored file already missing");
            }
            Err(e) => return Err(e.into()),
        }

        info!(attachment_id = stored.id, "Attachment removed");
        Ok(())
    }
}

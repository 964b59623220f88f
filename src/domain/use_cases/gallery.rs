use tracing::{error, info, warn};

use crate::entities::image::{GalleryEntry, NewImageRecord, UploadedBlob};
use crate::errors::GalleryError;
use crate::repositories::blob::BlobRepository;
use crate::repositories::proxy::BlobDeletionApi;
use crate::repositories::record::RecordRepository;

/// Terminal states of the create flow. An insert failure after a
/// successful upload is a warning, not an error: the blob is live and
/// addressable, it just never made the list.
#[derive(Debug, Clone, PartialEq)]
pub enum CreateOutcome {
    Created {
        record_id: String,
        blob: UploadedBlob,
    },
    /// Orphan blob left behind; cleaned up out of band, never retried here.
    /// Retrying the insert could duplicate the record if the store actually
    /// committed before reporting failure.
    UploadedNotListed {
        blob: UploadedBlob,
        detail: String,
    },
}

/// Terminal states of the delete flow. Once the record is gone there is no
/// compensating transaction; blob-side trouble downgrades to a warning.
#[derive(Debug, Clone, PartialEq)]
pub enum DeleteOutcome {
    Deleted,
    /// Record removed, blob deletion unconfirmed (orphan blob possible).
    BlobCleanupUncertain { detail: String },
    /// Record removal failed; nothing was deleted anywhere.
    RecordStillListed { detail: String },
}

/// Outcome plus the post-flow store snapshot. The snapshot is best-effort:
/// `None` means the refresh itself failed, not that the gallery is empty.
#[derive(Debug, Clone, PartialEq)]
pub struct DeleteReport {
    pub outcome: DeleteOutcome,
    pub gallery: Option<Vec<GalleryEntry>>,
}

/// Ties the blob store, the record store and the deletion proxy into the
/// two consistency-preserving flows. Every step awaits the previous one;
/// nothing fans out.
pub struct GalleryHandler<B, R, P>
where
    B: BlobRepository,
    R: RecordRepository,
    P: BlobDeletionApi,
{
    pub blob_repo: B,
    pub record_repo: R,
    pub delete_api: P,
}

impl<B, R, P> GalleryHandler<B, R, P>
where
    B: BlobRepository,
    R: RecordRepository,
    P: BlobDeletionApi,
{
    pub fn new(blob_repo: B, record_repo: R, delete_api: P) -> Self {
        GalleryHandler {
            blob_repo,
            record_repo,
            delete_api,
        }
    }

    /// Create flow: upload first, record second. An upload failure aborts
    /// before any record exists, so a listed record always pointed at a
    /// live blob at the moment it was written.
    pub async fn upload_image(&self, payload: &[u8]) -> Result<CreateOutcome, GalleryError> {
        let blob = self.blob_repo.upload(payload).await?;

        match self.record_repo.insert(&NewImageRecord::from(&blob)).await {
            Ok(record_id) => {
                info!(%record_id, public_id = %blob.public_id, "image recorded");
                Ok(CreateOutcome::Created { record_id, blob })
            }
            Err(e) => {
                warn!(
                    public_id = %blob.public_id,
                    error = %e,
                    "uploaded blob has no record (orphan blob)"
                );
                Ok(CreateOutcome::UploadedNotListed {
                    blob,
                    detail: e.to_string(),
                })
            }
        }
    }

    pub async fn load_gallery(&self) -> Result<Vec<GalleryEntry>, GalleryError> {
        self.record_repo.list().await
    }

    /// Delete flow: record first, blob second. Failing the record removal
    /// leaves both sides untouched; failing the blob side after the record
    /// is gone is reported, logged and otherwise accepted. Either way the
    /// visible list is re-read from the store, never patched locally.
    pub async fn delete_image(&self, record_id: &str, public_id: &str) -> DeleteReport {
        let outcome = match self.record_repo.remove(record_id).await {
            Err(e) => {
                error!(%record_id, error = %e, "record removal failed; image may still be listed");
                DeleteOutcome::RecordStillListed {
                    detail: e.to_string(),
                }
            }
            Ok(()) => match self.delete_api.delete_blob(public_id).await {
                Ok(result) if result.is_ok() => {
                    info!(%record_id, %public_id, "image deleted from record store and blob store");
                    DeleteOutcome::Deleted
                }
                Ok(result) => {
                    warn!(
                        %public_id,
                        result = %result.result,
                        "record removed but blob host did not confirm deletion (orphan blob possible)"
                    );
                    DeleteOutcome::BlobCleanupUncertain {
                        detail: format!("blob host answered \"{}\"", result.result),
                    }
                }
                Err(e) => {
                    warn!(
                        %public_id,
                        error = %e,
                        "record removed but deletion proxy failed (orphan blob possible)"
                    );
                    DeleteOutcome::BlobCleanupUncertain {
                        detail: e.to_string(),
                    }
                }
            },
        };

        let gallery = match self.record_repo.list().await {
            Ok(entries) => Some(entries),
            Err(e) => {
                warn!(error = %e, "gallery refresh failed after delete flow");
                None
            }
        };

        DeleteReport { outcome, gallery }
    }
}

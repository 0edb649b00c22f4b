//! Async driver that connects an [`EditSession`] to a content backend.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::draft::{Draft, EditSession, EditState};
use crate::error::CoreError;
use crate::media::{MediaRef, SelectedFile, UploadResolution, UploadTicket};

/// Default bound on one upload.
pub const DEFAULT_UPLOAD_TIMEOUT: Duration = Duration::from_secs(300);

/// Read and write access to one content section.
#[async_trait]
pub trait ContentGateway<D: Draft>: Send + Sync {
    /// The current authoritative record, `None` if never saved.
    async fn fetch(&self) -> Result<Option<D::Record>, CoreError>;

    /// Persist the payload and return the stored record.
    async fn save(&self, payload: &D) -> Result<D::Record, CoreError>;
}

/// Sends local files to object storage.
#[async_trait]
pub trait MediaUploader: Send + Sync {
    async fn upload(&self, file: &SelectedFile, context: &str) -> Result<MediaRef, CoreError>;
}

/// An upload that has been started but not run.
///
/// Running it does not borrow the editor, so the session stays free to
/// cancel while bytes are in flight.
pub struct PendingUpload<U: MediaUploader> {
    ticket: UploadTicket,
    uploader: Arc<U>,
    context: String,
    timeout: Duration,
}

/// Result of [`PendingUpload::run`], to be applied with [`Editor::apply_upload`].
pub struct CompletedUpload {
    ticket: UploadTicket,
    outcome: Result<MediaRef, CoreError>,
}

impl<U: MediaUploader> PendingUpload<U> {
    pub fn slot(&self) -> &'static str {
        self.ticket.slot
    }

    pub async fn run(self) -> CompletedUpload {
        let outcome = match tokio::time::timeout(
            self.timeout,
            self.uploader.upload(&self.ticket.file, &self.context),
        )
        .await
        {
            Ok(result) => result,
            Err(_) => Err(CoreError::Internal(format!(
                "upload timed out after {}s",
                self.timeout.as_secs()
            ))),
        };
        CompletedUpload {
            ticket: self.ticket,
            outcome,
        }
    }
}

/// Editing of one content section against a gateway.
pub struct Editor<D: Draft, G> {
    gateway: Arc<G>,
    session: EditSession<D>,
    context: String,
    upload_timeout: Duration,
}

impl<D, G> Editor<D, G>
where
    D: Draft,
    G: ContentGateway<D> + MediaUploader,
{
    /// Fetch the section and open a locked session on it.
    pub async fn open(gateway: Arc<G>, context: impl Into<String>) -> Result<Self, CoreError> {
        let record = gateway.fetch().await?;
        Ok(Self {
            gateway,
            session: EditSession::new(record),
            context: context.into(),
            upload_timeout: DEFAULT_UPLOAD_TIMEOUT,
        })
    }

    pub fn with_upload_timeout(mut self, timeout: Duration) -> Self {
        self.upload_timeout = timeout;
        self
    }

    pub fn session(&self) -> &EditSession<D> {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut EditSession<D> {
        &mut self.session
    }

    pub fn state(&self) -> EditState {
        self.session.state()
    }

    /// Discard the draft and reload the authoritative record.
    ///
    /// If the re-fetch fails the session stays locked on the last known record.
    pub async fn cancel(&mut self) -> Result<(), CoreError> {
        self.session.cancel()?;
        let record = self.gateway.fetch().await?;
        self.session.reload(record)
    }

    /// Submit the draft, save it and re-fetch.
    pub async fn save(&mut self) -> Result<(), CoreError> {
        let payload = self.session.submit()?;
        match self.gateway.save(&payload).await {
            Ok(saved) => {
                let fresh = match self.gateway.fetch().await {
                    Ok(Some(record)) => record,
                    Ok(None) => {
                        tracing::warn!(context = %self.context, "Re-fetch after save found no record, keeping the saved one");
                        saved
                    }
                    Err(e) => {
                        tracing::warn!(context = %self.context, error = %e, "Re-fetch after save failed, keeping the saved one");
                        saved
                    }
                };
                self.session.save_succeeded(fresh)
            }
            Err(e) => {
                self.session.save_failed()?;
                Err(e)
            }
        }
    }

    /// Start uploading the file selected in `slot`.
    pub fn start_upload(&mut self, slot: &str) -> Result<PendingUpload<G>, CoreError> {
        let ticket = self.session.begin_upload(slot)?;
        Ok(PendingUpload {
            ticket,
            uploader: Arc::clone(&self.gateway),
            context: self.context.clone(),
            timeout: self.upload_timeout,
        })
    }

    pub fn apply_upload(&mut self, done: CompletedUpload) -> Result<UploadResolution, CoreError> {
        self.session.finish_upload(&done.ticket, done.outcome)
    }

    /// Upload the file selected in `slot` and bind the result.
    pub async fn upload(&mut self, slot: &str) -> Result<UploadResolution, CoreError> {
        let pending = self.start_upload(slot)?;
        let done = pending.run().await;
        self.apply_upload(done)
    }
}

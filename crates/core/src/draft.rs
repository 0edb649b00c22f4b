//! Draft / edit-lock lifecycle of one content section.
//!
//! ```text
//!   Locked --begin_edit--> Editing --submit--> Saving --save_succeeded--> Locked
//!      ^                      |                   |
//!      +------cancel----------+                   +--save_failed--> Editing
//! ```
//!
//! The session holds the authoritative record, a draft copy of it and the
//! media bindings of the draft. Nothing here talks to the network; see
//! [`crate::editor`] for the driver that does.

use crate::error::CoreError;
use crate::media::{
    LocalPreview, MediaBindings, MediaRef, SelectedFile, SlotSpec, UploadResolution, UploadTicket,
};
use crate::types::DbId;

/// A save payload that can be edited in a session.
pub trait Draft: Clone + Send + Sync {
    /// The record returned by `fetch` / `save`.
    type Record: Clone + Send + Sync;

    /// Media slots of this content type.
    const SLOTS: &'static [SlotSpec];

    /// Draft pre-filled from the authoritative record, or defaults when the
    /// section has never been saved.
    fn from_record(record: Option<&Self::Record>) -> Self;

    /// Committed media of each slot in `record`.
    fn committed_media(record: Option<&Self::Record>) -> Vec<(&'static str, Option<MediaRef>)>;

    /// Write a slot's media id into the payload.
    fn bind_media(&mut self, slot: &str, media_id: Option<DbId>);

    /// Record the slots that still hold a local, un-uploaded file.
    fn set_pending_uploads(&mut self, pending: Vec<String>);

    /// Full validation, including the upload gate.
    fn check(&self) -> Result<(), CoreError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditState {
    Locked,
    Editing,
    Saving,
}

impl EditState {
    fn as_str(self) -> &'static str {
        match self {
            EditState::Locked => "locked",
            EditState::Editing => "editing",
            EditState::Saving => "saving",
        }
    }
}

pub struct EditSession<D: Draft> {
    state: EditState,
    record: Option<D::Record>,
    draft: D,
    media: MediaBindings,
}

impl<D: Draft> EditSession<D> {
    /// Start a locked session showing `record`.
    pub fn new(record: Option<D::Record>) -> Self {
        let draft = D::from_record(record.as_ref());
        let media = MediaBindings::new(D::SLOTS, &D::committed_media(record.as_ref()));
        Self {
            state: EditState::Locked,
            record,
            draft,
            media,
        }
    }

    pub fn state(&self) -> EditState {
        self.state
    }

    pub fn record(&self) -> Option<&D::Record> {
        self.record.as_ref()
    }

    pub fn draft(&self) -> &D {
        &self.draft
    }

    pub fn media(&self) -> &MediaBindings {
        &self.media
    }

    pub fn begin_edit(&mut self) -> Result<(), CoreError> {
        self.expect_state(EditState::Locked, "start editing")?;
        self.state = EditState::Editing;
        Ok(())
    }

    /// Mutate the draft. Only allowed while editing.
    pub fn edit(&mut self, f: impl FnOnce(&mut D)) -> Result<(), CoreError> {
        self.expect_state(EditState::Editing, "edit")?;
        f(&mut self.draft);
        Ok(())
    }

    pub fn select_file(&mut self, slot: &str, file: SelectedFile) -> Result<&LocalPreview, CoreError> {
        self.expect_state(EditState::Editing, "select a file")?;
        self.media.select(slot, file)
    }

    pub fn remove_file(&mut self, slot: &str) -> Result<(), CoreError> {
        self.expect_state(EditState::Editing, "remove a file")?;
        self.media.remove(slot)
    }

    pub fn begin_upload(&mut self, slot: &str) -> Result<UploadTicket, CoreError> {
        self.expect_state(EditState::Editing, "upload")?;
        self.media.begin_upload(slot)
    }

    /// Apply an upload result. Accepted in any state; a result for a slot
    /// that was reset in the meantime is dropped.
    pub fn finish_upload(
        &mut self,
        ticket: &UploadTicket,
        outcome: Result<MediaRef, CoreError>,
    ) -> Result<UploadResolution, CoreError> {
        self.media.finish_upload(ticket, outcome)
    }

    /// Build the payload and move to `Saving`.
    ///
    /// A payload that fails validation leaves the session in `Editing`.
    pub fn submit(&mut self) -> Result<D, CoreError> {
        self.expect_state(EditState::Editing, "save")?;

        let mut payload = self.draft.clone();
        let slots: Vec<&'static str> = self.media.slot_names().collect();
        for slot in slots {
            payload.bind_media(slot, self.media.media_id(slot));
        }
        payload.set_pending_uploads(self.media.pending());
        payload.check()?;

        self.state = EditState::Saving;
        Ok(payload)
    }

    /// The save went through; `record` is the re-fetched authoritative row.
    pub fn save_succeeded(&mut self, record: D::Record) -> Result<(), CoreError> {
        self.expect_state(EditState::Saving, "complete a save")?;
        self.replace_record(Some(record));
        self.state = EditState::Locked;
        Ok(())
    }

    /// The save failed; the draft is kept for another attempt.
    pub fn save_failed(&mut self) -> Result<(), CoreError> {
        self.expect_state(EditState::Saving, "fail a save")?;
        self.state = EditState::Editing;
        Ok(())
    }

    /// Discard the draft and lock. Local previews are released and in-flight
    /// uploads become stale.
    pub fn cancel(&mut self) -> Result<(), CoreError> {
        match self.state {
            EditState::Locked => Ok(()),
            EditState::Saving => Err(CoreError::Conflict(
                "cannot cancel while a save is in progress".to_string(),
            )),
            EditState::Editing => {
                let record = self.record.take();
                self.replace_record(record);
                self.state = EditState::Locked;
                Ok(())
            }
        }
    }

    /// Replace the authoritative record with a fresh read.
    pub fn reload(&mut self, record: Option<D::Record>) -> Result<(), CoreError> {
        self.expect_state(EditState::Locked, "reload")?;
        self.replace_record(record);
        Ok(())
    }

    fn replace_record(&mut self, record: Option<D::Record>) {
        self.draft = D::from_record(record.as_ref());
        self.media.reset(&D::committed_media(record.as_ref()));
        self.record = record;
    }

    fn expect_state(&self, expected: EditState, action: &str) -> Result<(), CoreError> {
        if self.state == expected {
            Ok(())
        } else {
            Err(CoreError::Conflict(format!(
                "cannot {action} while {}",
                self.state.as_str()
            )))
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use assert_matches::assert_matches;

    use super::*;
    use crate::validation::FieldErrors;

    /// Minimal content type with one required pair and one video slot.
    #[derive(Debug, Clone, PartialEq)]
    pub struct Banner {
        pub id: DbId,
        pub title_en: String,
        pub title_tr: String,
        pub video: Option<MediaRef>,
    }

    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct BannerDraft {
        pub title_en: String,
        pub title_tr: String,
        pub video_media_id: Option<DbId>,
        pub pending_uploads: Vec<String>,
    }

    impl Draft for BannerDraft {
        type Record = Banner;
        const SLOTS: &'static [SlotSpec] = &[SlotSpec::video("video_media_id")];

        fn from_record(record: Option<&Banner>) -> Self {
            record
                .map(|r| BannerDraft {
                    title_en: r.title_en.clone(),
                    title_tr: r.title_tr.clone(),
                    video_media_id: r.video.as_ref().map(|m| m.media_id),
                    pending_uploads: Vec::new(),
                })
                .unwrap_or_default()
        }

        fn committed_media(record: Option<&Banner>) -> Vec<(&'static str, Option<MediaRef>)> {
            vec![("video_media_id", record.and_then(|r| r.video.clone()))]
        }

        fn bind_media(&mut self, slot: &str, media_id: Option<DbId>) {
            if slot == "video_media_id" {
                self.video_media_id = media_id;
            }
        }

        fn set_pending_uploads(&mut self, pending: Vec<String>) {
            self.pending_uploads = pending;
        }

        fn check(&self) -> Result<(), CoreError> {
            let mut errors = FieldErrors::new();
            errors.require_pair("title", Some(self.title_en.as_str()), Some(self.title_tr.as_str()));
            errors.reject_pending_uploads(&self.pending_uploads);
            errors.into_result()
        }
    }

    pub fn banner() -> Banner {
        Banner {
            id: 1,
            title_en: "Hello".into(),
            title_tr: "Merhaba".into(),
            video: Some(MediaRef {
                media_id: 3,
                url: "https://cdn.example.com/videos/banner/1_a.mp4".into(),
            }),
        }
    }

    fn mp4() -> SelectedFile {
        SelectedFile::new("b.mp4", "video/mp4", vec![0_u8; 16])
    }

    #[test]
    fn starts_locked_and_refuses_edits() {
        let mut session = EditSession::<BannerDraft>::new(Some(banner()));
        assert_eq!(session.state(), EditState::Locked);
        assert_matches!(session.edit(|d| d.title_en.clear()), Err(CoreError::Conflict(_)));
        assert_eq!(session.draft().title_en, "Hello");
    }

    #[test]
    fn cancel_discards_changes() {
        let mut session = EditSession::<BannerDraft>::new(Some(banner()));
        session.begin_edit().unwrap();
        session.edit(|d| d.title_en = "Changed".into()).unwrap();
        session.select_file("video_media_id", mp4()).unwrap();

        session.cancel().unwrap();
        assert_eq!(session.state(), EditState::Locked);
        assert_eq!(session.draft().title_en, "Hello");
        assert_eq!(session.media().media_id("video_media_id"), Some(3));
        assert_eq!(session.media().live_previews(), 0);
    }

    #[test]
    fn invalid_submit_stays_editing() {
        let mut session = EditSession::<BannerDraft>::new(None);
        session.begin_edit().unwrap();
        session.edit(|d| d.title_en = "Only English".into()).unwrap();

        let err = session.submit().unwrap_err();
        assert_eq!(err.fields()[0].field, "title_tr");
        assert_eq!(session.state(), EditState::Editing);
    }

    #[test]
    fn pending_upload_blocks_submit() {
        let mut session = EditSession::<BannerDraft>::new(Some(banner()));
        session.begin_edit().unwrap();
        session.select_file("video_media_id", mp4()).unwrap();

        let err = session.submit().unwrap_err();
        assert_eq!(err.fields()[0].field, "video_media_id");
        assert_eq!(session.state(), EditState::Editing);
    }

    #[test]
    fn uploaded_media_is_bound_into_payload() {
        let mut session = EditSession::<BannerDraft>::new(Some(banner()));
        session.begin_edit().unwrap();
        session.select_file("video_media_id", mp4()).unwrap();
        let ticket = session.begin_upload("video_media_id").unwrap();
        session
            .finish_upload(
                &ticket,
                Ok(MediaRef {
                    media_id: 8,
                    url: "u".into(),
                }),
            )
            .unwrap();

        let payload = session.submit().unwrap();
        assert_eq!(payload.video_media_id, Some(8));
        assert!(payload.pending_uploads.is_empty());
        assert_eq!(session.state(), EditState::Saving);
    }

    #[test]
    fn removed_media_is_unbound() {
        let mut session = EditSession::<BannerDraft>::new(Some(banner()));
        session.begin_edit().unwrap();
        session.remove_file("video_media_id").unwrap();
        let payload = session.submit().unwrap();
        assert_eq!(payload.video_media_id, None);
    }

    #[test]
    fn failed_save_keeps_draft() {
        let mut session = EditSession::<BannerDraft>::new(Some(banner()));
        session.begin_edit().unwrap();
        session.edit(|d| d.title_en = "New".into()).unwrap();
        session.submit().unwrap();

        assert_matches!(session.cancel(), Err(CoreError::Conflict(_)));
        session.save_failed().unwrap();
        assert_eq!(session.state(), EditState::Editing);
        assert_eq!(session.draft().title_en, "New");
    }

    #[test]
    fn successful_save_locks_with_new_record() {
        let mut session = EditSession::<BannerDraft>::new(None);
        session.begin_edit().unwrap();
        session
            .edit(|d| {
                d.title_en = "Hi".into();
                d.title_tr = "Selam".into();
            })
            .unwrap();
        session.submit().unwrap();

        let mut saved = banner();
        saved.title_en = "Hi".into();
        saved.title_tr = "Selam".into();
        session.save_succeeded(saved.clone()).unwrap();

        assert_eq!(session.state(), EditState::Locked);
        assert_eq!(session.record(), Some(&saved));
        assert_eq!(session.draft().title_tr, "Selam");
    }
}

//! Media rules and the per-editor media slot bindings.
//!
//! The server side uses the rules (`validate_upload`, `storage_path`) when it
//! stores a file. The editing side uses [`MediaBindings`] to track what each
//! media slot of a draft currently holds: nothing, a committed media row, or
//! a local file that has been selected but not uploaded yet.

use std::sync::{Arc, LazyLock};

use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{CoreError, FieldError};
use crate::types::DbId;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

pub const MAX_IMAGE_BYTES: u64 = 100 * 1024 * 1024;
pub const MAX_VIDEO_BYTES: u64 = 500 * 1024 * 1024;

pub const ALLOWED_IMAGE_TYPES: &[&str] = &["image/jpeg", "image/png", "image/webp", "image/gif"];
pub const ALLOWED_VIDEO_TYPES: &[&str] = &[
    "video/mp4",
    "video/webm",
    "video/quicktime",
    "video/x-msvideo",
];

/// Maximum length of an upload context tag.
pub const MAX_CONTEXT_LEN: usize = 64;

static UNSAFE_FILENAME_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-zA-Z0-9._-]").expect("valid regex"));

static CONTEXT_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9_-]+$").expect("valid regex"));

// ---------------------------------------------------------------------------
// Media kind
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Video,
}

impl MediaKind {
    /// Classify by MIME prefix.
    pub fn from_mime(mime: &str) -> Option<MediaKind> {
        if mime.starts_with("image/") {
            Some(MediaKind::Image)
        } else if mime.starts_with("video/") {
            Some(MediaKind::Video)
        } else {
            None
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            MediaKind::Image => "image",
            MediaKind::Video => "video",
        }
    }

    pub fn max_bytes(self) -> u64 {
        match self {
            MediaKind::Image => MAX_IMAGE_BYTES,
            MediaKind::Video => MAX_VIDEO_BYTES,
        }
    }

    pub fn allowed_types(self) -> &'static [&'static str] {
        match self {
            MediaKind::Image => ALLOWED_IMAGE_TYPES,
            MediaKind::Video => ALLOWED_VIDEO_TYPES,
        }
    }
}

/// Value stored in `media.file_type`.
pub fn file_type_label(mime: &str) -> &'static str {
    MediaKind::from_mime(mime).map_or("other", MediaKind::as_str)
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Check a file against the rules of a slot that expects `kind`.
pub fn validate_file(kind: MediaKind, mime: &str, size: u64) -> Result<(), CoreError> {
    if MediaKind::from_mime(mime) != Some(kind) {
        return Err(CoreError::Validation(format!(
            "Invalid file type '{mime}'. Expected a {} file",
            kind.as_str()
        )));
    }
    if !kind.allowed_types().contains(&mime) {
        return Err(CoreError::Validation(format!(
            "Invalid file type '{mime}'. Allowed: {}",
            kind.allowed_types().join(", ")
        )));
    }
    if size == 0 {
        return Err(CoreError::Validation("File is empty".to_string()));
    }
    if size > kind.max_bytes() {
        return Err(CoreError::Validation(format!(
            "File too large. Maximum size for {}s is {}MB",
            kind.as_str(),
            kind.max_bytes() / (1024 * 1024)
        )));
    }
    Ok(())
}

/// Check an uploaded file whose kind is inferred from its MIME type.
pub fn validate_upload(mime: &str, size: u64) -> Result<MediaKind, CoreError> {
    let kind = MediaKind::from_mime(mime).ok_or_else(|| {
        CoreError::Validation(format!(
            "Invalid file type '{mime}'. Only images and videos are allowed"
        ))
    })?;
    validate_file(kind, mime, size)?;
    Ok(kind)
}

/// Validate an upload context tag (`hero`, `why-we-exist`, ...).
pub fn validate_context(context: &str) -> Result<(), CoreError> {
    if context.is_empty() || context.len() > MAX_CONTEXT_LEN || !CONTEXT_PATTERN.is_match(context) {
        return Err(CoreError::Validation(format!(
            "Invalid upload context '{context}'. Use lowercase letters, digits, '-' or '_'"
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Storage paths
// ---------------------------------------------------------------------------

/// Replace every character outside `[A-Za-z0-9._-]` with `_`.
pub fn sanitize_filename(name: &str) -> String {
    let cleaned = UNSAFE_FILENAME_CHARS.replace_all(name, "_").into_owned();
    if cleaned.is_empty() {
        "file".to_string()
    } else {
        cleaned
    }
}

/// Object key for an upload: `{kind}s/{context}/{millis}_{sanitized_name}`.
pub fn storage_path(kind: MediaKind, context: &str, filename: &str, unix_millis: i64) -> String {
    format!(
        "{}s/{}/{}_{}",
        kind.as_str(),
        context,
        unix_millis,
        sanitize_filename(filename)
    )
}

// ---------------------------------------------------------------------------
// Editing-side bindings
// ---------------------------------------------------------------------------

/// A committed media row as the editor sees it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaRef {
    pub media_id: DbId,
    pub url: String,
}

/// A file picked by the user and held in memory until uploaded.
#[derive(Debug, Clone)]
pub struct SelectedFile {
    pub name: String,
    pub mime_type: String,
    pub data: Arc<[u8]>,
}

impl SelectedFile {
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, data: impl Into<Arc<[u8]>>) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            data: data.into(),
        }
    }

    pub fn size(&self) -> u64 {
        self.data.len() as u64
    }
}

/// Ephemeral preview of a selected file. Never sent to the server.
#[derive(Debug, Clone)]
pub struct LocalPreview {
    pub handle: Uuid,
    pub file: SelectedFile,
}

/// A media slot of a content draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotSpec {
    /// Column name of the foreign key, also used as the field name in errors.
    pub name: &'static str,
    pub kind: MediaKind,
}

impl SlotSpec {
    pub const fn image(name: &'static str) -> Self {
        Self {
            name,
            kind: MediaKind::Image,
        }
    }

    pub const fn video(name: &'static str) -> Self {
        Self {
            name,
            kind: MediaKind::Video,
        }
    }
}

#[derive(Debug, Clone)]
pub enum SlotState {
    Empty,
    Committed(MediaRef),
    Selected(LocalPreview),
    Uploading(LocalPreview),
}

#[derive(Debug)]
struct Slot {
    spec: SlotSpec,
    state: SlotState,
    generation: u64,
}

/// Handed out when an upload starts; presented back when it finishes.
#[derive(Debug, Clone)]
pub struct UploadTicket {
    pub slot: &'static str,
    pub file: SelectedFile,
    generation: u64,
}

/// What [`MediaBindings::finish_upload`] did with a result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadResolution {
    Committed(MediaRef),
    /// The slot changed (new selection, removal, cancel) while the upload
    /// was in flight; the result was dropped.
    Stale,
}

/// Media slots of one draft.
#[derive(Debug)]
pub struct MediaBindings {
    slots: Vec<Slot>,
    next_generation: u64,
}

impl MediaBindings {
    /// Bind `specs` to the committed values of the authoritative record.
    pub fn new(specs: &[SlotSpec], committed: &[(&'static str, Option<MediaRef>)]) -> Self {
        let mut bindings = Self {
            slots: specs
                .iter()
                .map(|spec| Slot {
                    spec: *spec,
                    state: SlotState::Empty,
                    generation: 0,
                })
                .collect(),
            next_generation: 1,
        };
        bindings.reset(committed);
        bindings
    }

    /// Drop every local selection and restore the committed values.
    ///
    /// In-flight uploads become stale.
    pub fn reset(&mut self, committed: &[(&'static str, Option<MediaRef>)]) {
        for i in 0..self.slots.len() {
            let generation = self.bump();
            let slot = &mut self.slots[i];
            slot.generation = generation;
            slot.state = committed
                .iter()
                .find(|(name, _)| *name == slot.spec.name)
                .and_then(|(_, media)| media.clone())
                .map_or(SlotState::Empty, SlotState::Committed);
        }
    }

    /// Select a local file. An invalid file leaves the slot untouched.
    pub fn select(&mut self, slot: &str, file: SelectedFile) -> Result<&LocalPreview, CoreError> {
        let idx = self.index(slot)?;
        let spec = self.slots[idx].spec;
        validate_file(spec.kind, &file.mime_type, file.size())
            .map_err(|e| field_error(spec.name, e))?;

        let generation = self.bump();
        let entry = &mut self.slots[idx];
        entry.generation = generation;
        entry.state = SlotState::Selected(LocalPreview {
            handle: Uuid::new_v4(),
            file,
        });
        match &entry.state {
            SlotState::Selected(preview) => Ok(preview),
            _ => Err(CoreError::Internal("slot state changed during select".into())),
        }
    }

    /// Clear a slot. The durable object, if any, is left alone.
    pub fn remove(&mut self, slot: &str) -> Result<(), CoreError> {
        let idx = self.index(slot)?;
        let generation = self.bump();
        let entry = &mut self.slots[idx];
        entry.generation = generation;
        entry.state = SlotState::Empty;
        Ok(())
    }

    /// Start uploading the file selected in `slot`.
    pub fn begin_upload(&mut self, slot: &str) -> Result<UploadTicket, CoreError> {
        let idx = self.index(slot)?;
        let entry = &mut self.slots[idx];
        let preview = match &entry.state {
            SlotState::Selected(preview) => preview.clone(),
            SlotState::Uploading(_) => {
                return Err(field_error(
                    entry.spec.name,
                    CoreError::Validation("upload already in progress".into()),
                ))
            }
            _ => {
                return Err(field_error(
                    entry.spec.name,
                    CoreError::Validation("no file selected".into()),
                ))
            }
        };
        let ticket = UploadTicket {
            slot: entry.spec.name,
            file: preview.file.clone(),
            generation: entry.generation,
        };
        entry.state = SlotState::Uploading(preview);
        Ok(ticket)
    }

    /// Apply the result of an upload.
    ///
    /// A failed upload returns the slot to `Selected` so the user can retry.
    pub fn finish_upload(
        &mut self,
        ticket: &UploadTicket,
        outcome: Result<MediaRef, CoreError>,
    ) -> Result<UploadResolution, CoreError> {
        let idx = self.index(ticket.slot)?;
        let entry = &mut self.slots[idx];
        if entry.generation != ticket.generation {
            return Ok(UploadResolution::Stale);
        }
        let preview = match &entry.state {
            SlotState::Uploading(preview) => preview.clone(),
            _ => return Ok(UploadResolution::Stale),
        };
        match outcome {
            Ok(media) => {
                entry.state = SlotState::Committed(media.clone());
                Ok(UploadResolution::Committed(media))
            }
            Err(e) => {
                entry.state = SlotState::Selected(preview);
                Err(e)
            }
        }
    }

    pub fn state(&self, slot: &str) -> Option<&SlotState> {
        self.slots.iter().find(|s| s.spec.name == slot).map(|s| &s.state)
    }

    /// Committed media id of a slot, `None` when empty or not yet uploaded.
    pub fn media_id(&self, slot: &str) -> Option<DbId> {
        match self.state(slot) {
            Some(SlotState::Committed(media)) => Some(media.media_id),
            _ => None,
        }
    }

    /// Slots holding a local file without a completed upload.
    pub fn pending(&self) -> Vec<String> {
        self.slots
            .iter()
            .filter(|s| matches!(s.state, SlotState::Selected(_) | SlotState::Uploading(_)))
            .map(|s| s.spec.name.to_string())
            .collect()
    }

    /// Number of previews currently held.
    pub fn live_previews(&self) -> usize {
        self.slots.iter().filter(|s| s.preview().is_some()).count()
    }

    pub fn slot_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.slots.iter().map(|s| s.spec.name)
    }

    fn index(&self, slot: &str) -> Result<usize, CoreError> {
        self.slots
            .iter()
            .position(|s| s.spec.name == slot)
            .ok_or_else(|| CoreError::Validation(format!("Unknown media slot '{slot}'")))
    }

    fn bump(&mut self) -> u64 {
        let generation = self.next_generation;
        self.next_generation += 1;
        generation
    }
}

impl Slot {
    fn preview(&self) -> Option<&LocalPreview> {
        match &self.state {
            SlotState::Selected(p) | SlotState::Uploading(p) => Some(p),
            _ => None,
        }
    }
}

fn field_error(field: &str, err: CoreError) -> CoreError {
    let message = match err {
        CoreError::Validation(msg) => msg,
        other => other.to_string(),
    };
    CoreError::InvalidFields(vec![FieldError::new(field, message)])
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    const SLOTS: &[SlotSpec] = &[SlotSpec::video("media_id"), SlotSpec::video("mobile_media_id")];

    fn video(name: &str) -> SelectedFile {
        SelectedFile::new(name, "video/mp4", vec![1_u8, 2, 3])
    }

    fn committed(id: DbId) -> MediaRef {
        MediaRef {
            media_id: id,
            url: format!("https://cdn.example.com/videos/hero/{id}.mp4"),
        }
    }

    // -- rules --

    #[test]
    fn size_ceilings() {
        assert!(validate_file(MediaKind::Image, "image/png", MAX_IMAGE_BYTES).is_ok());
        assert!(validate_file(MediaKind::Image, "image/png", MAX_IMAGE_BYTES + 1).is_err());
        assert!(validate_file(MediaKind::Video, "video/mp4", MAX_VIDEO_BYTES).is_ok());
        assert!(validate_file(MediaKind::Video, "video/mp4", MAX_VIDEO_BYTES + 1).is_err());
    }

    #[test]
    fn mime_must_match_slot_kind() {
        assert!(validate_file(MediaKind::Video, "image/png", 10).is_err());
        assert!(validate_file(MediaKind::Image, "image/svg+xml", 10).is_err());
    }

    #[test]
    fn upload_kind_is_inferred() {
        assert_eq!(validate_upload("video/webm", 10).unwrap(), MediaKind::Video);
        assert!(validate_upload("application/pdf", 10).is_err());
    }

    #[test]
    fn filenames_are_sanitized() {
        assert_eq!(sanitize_filename("my video (1).mp4"), "my_video__1_.mp4");
        assert_eq!(sanitize_filename("çiçek.png"), "_i_ek.png");
        assert_eq!(sanitize_filename(""), "file");
    }

    #[test]
    fn storage_path_layout() {
        assert_eq!(
            storage_path(MediaKind::Image, "cta-section", "bg image.jpg", 1700000000000),
            "images/cta-section/1700000000000_bg_image.jpg"
        );
    }

    #[test]
    fn context_tags() {
        assert!(validate_context("why-we-exist").is_ok());
        assert!(validate_context("../etc").is_err());
        assert!(validate_context("").is_err());
    }

    #[test]
    fn file_type_labels() {
        assert_eq!(file_type_label("image/gif"), "image");
        assert_eq!(file_type_label("video/quicktime"), "video");
        assert_eq!(file_type_label("text/plain"), "other");
    }

    // -- bindings --

    #[test]
    fn starts_from_committed_values() {
        let bindings = MediaBindings::new(SLOTS, &[("media_id", Some(committed(4)))]);
        assert_eq!(bindings.media_id("media_id"), Some(4));
        assert_eq!(bindings.media_id("mobile_media_id"), None);
        assert!(bindings.pending().is_empty());
    }

    #[test]
    fn invalid_selection_keeps_committed_state() {
        let mut bindings = MediaBindings::new(SLOTS, &[("media_id", Some(committed(4)))]);
        let err = bindings
            .select("media_id", SelectedFile::new("a.png", "image/png", vec![1_u8]))
            .unwrap_err();
        assert_eq!(err.fields()[0].field, "media_id");
        assert_eq!(bindings.media_id("media_id"), Some(4));
        assert_eq!(bindings.live_previews(), 0);
    }

    #[test]
    fn selection_is_pending_until_uploaded() {
        let mut bindings = MediaBindings::new(SLOTS, &[]);
        bindings.select("media_id", video("a.mp4")).unwrap();
        assert_eq!(bindings.pending(), vec!["media_id".to_string()]);
        assert_eq!(bindings.media_id("media_id"), None);

        let ticket = bindings.begin_upload("media_id").unwrap();
        assert_eq!(bindings.pending(), vec!["media_id".to_string()]);

        let resolution = bindings.finish_upload(&ticket, Ok(committed(9))).unwrap();
        assert_eq!(resolution, UploadResolution::Committed(committed(9)));
        assert!(bindings.pending().is_empty());
        assert_eq!(bindings.media_id("media_id"), Some(9));
        assert_eq!(bindings.live_previews(), 0);
    }

    #[test]
    fn superseded_preview_is_released() {
        let mut bindings = MediaBindings::new(SLOTS, &[]);
        let first = bindings.select("media_id", video("a.mp4")).unwrap().handle;
        let second = bindings.select("media_id", video("b.mp4")).unwrap().handle;
        assert_ne!(first, second);
        assert_eq!(bindings.live_previews(), 1);
    }

    #[test]
    fn failed_upload_returns_to_selected() {
        let mut bindings = MediaBindings::new(SLOTS, &[]);
        bindings.select("media_id", video("a.mp4")).unwrap();
        let ticket = bindings.begin_upload("media_id").unwrap();
        let result = bindings.finish_upload(&ticket, Err(CoreError::Internal("timeout".into())));
        assert!(result.is_err());
        assert_matches!(bindings.state("media_id"), Some(SlotState::Selected(_)));
        assert!(bindings.begin_upload("media_id").is_ok());
    }

    #[test]
    fn result_after_reset_is_dropped() {
        let mut bindings = MediaBindings::new(SLOTS, &[("media_id", Some(committed(4)))]);
        bindings.select("media_id", video("a.mp4")).unwrap();
        let ticket = bindings.begin_upload("media_id").unwrap();

        bindings.reset(&[("media_id", Some(committed(4)))]);
        let resolution = bindings.finish_upload(&ticket, Ok(committed(9))).unwrap();
        assert_eq!(resolution, UploadResolution::Stale);
        assert_eq!(bindings.media_id("media_id"), Some(4));
    }

    #[test]
    fn remove_clears_the_slot() {
        let mut bindings = MediaBindings::new(SLOTS, &[("media_id", Some(committed(4)))]);
        bindings.remove("media_id").unwrap();
        assert_eq!(bindings.media_id("media_id"), None);
        assert!(bindings.remove("nope").is_err());
    }

    #[test]
    fn upload_requires_a_selection() {
        let mut bindings = MediaBindings::new(SLOTS, &[]);
        let err = bindings.begin_upload("media_id").unwrap_err();
        assert_eq!(err.fields()[0].message, "no file selected");
    }
}

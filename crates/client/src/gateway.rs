//! Typed section gateways over [`AdminClient`].

use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use vitrin_core::draft::Draft;
use vitrin_core::editor::{ContentGateway, Editor, MediaUploader};
use vitrin_core::error::CoreError;
use vitrin_core::media::{MediaRef, SelectedFile};
use vitrin_db::models::contact_info::SaveContactInfo;
use vitrin_db::models::cta_section::SaveCtaSection;
use vitrin_db::models::hero::SaveHeroVideo;
use vitrin_db::models::service::SaveServiceCollection;
use vitrin_db::models::why_we_exist::SaveWhyWeExist;

use crate::client::AdminClient;

/// A save payload with an admin endpoint.
pub trait AdminSection: Draft + Serialize {
    /// Path under `/api/v1`.
    const PATH: &'static str;
    /// Upload context tag for files bound to this section.
    const UPLOAD_CONTEXT: &'static str;
}

impl AdminSection for SaveHeroVideo {
    const PATH: &'static str = "/admin/hero";
    const UPLOAD_CONTEXT: &'static str = "hero";
}

impl AdminSection for SaveWhyWeExist {
    const PATH: &'static str = "/admin/why-we-exist";
    const UPLOAD_CONTEXT: &'static str = "why-we-exist";
}

impl AdminSection for SaveCtaSection {
    const PATH: &'static str = "/admin/cta-section";
    const UPLOAD_CONTEXT: &'static str = "cta-section";
}

impl AdminSection for SaveContactInfo {
    const PATH: &'static str = "/admin/contact-info";
    const UPLOAD_CONTEXT: &'static str = "contact-info";
}

impl AdminSection for SaveServiceCollection {
    const PATH: &'static str = "/admin/services/settings";
    const UPLOAD_CONTEXT: &'static str = "services";
}

/// [`ContentGateway`] and [`MediaUploader`] for one section.
pub struct SectionGateway<D> {
    client: Arc<AdminClient>,
    _draft: PhantomData<fn() -> D>,
}

impl<D> SectionGateway<D>
where
    D: AdminSection,
    D::Record: DeserializeOwned,
{
    pub fn new(client: Arc<AdminClient>) -> Self {
        Self {
            client,
            _draft: PhantomData,
        }
    }

    /// Fetch the section and open an editor on it.
    pub async fn open_editor(client: Arc<AdminClient>) -> Result<Editor<D, Self>, CoreError> {
        Editor::open(Arc::new(Self::new(client)), D::UPLOAD_CONTEXT).await
    }
}

#[async_trait]
impl<D> ContentGateway<D> for SectionGateway<D>
where
    D: AdminSection,
    D::Record: DeserializeOwned,
{
    async fn fetch(&self) -> Result<Option<D::Record>, CoreError> {
        Ok(self.client.get_section(D::PATH).await?)
    }

    async fn save(&self, payload: &D) -> Result<D::Record, CoreError> {
        Ok(self.client.put_section(D::PATH, payload).await?)
    }
}

#[async_trait]
impl<D> MediaUploader for SectionGateway<D> {
    async fn upload(&self, file: &SelectedFile, context: &str) -> Result<MediaRef, CoreError> {
        Ok(self.client.upload(file, context).await?)
    }
}

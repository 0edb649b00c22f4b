//! `GET /content/homepage`: every section resolved to one language.
//!
//! Each text pair goes through [`bilingual::display`], so a missing
//! translation shows the other language and never `null`. A section that
//! is unsaved or fails to load is `null` on its own without failing the page.

use axum::extract::{Query, State};
use axum::http::HeaderMap;
use axum::Json;
use serde::{Deserialize, Serialize};
use vitrin_core::bilingual::display;
use vitrin_core::locale::Locale;
use vitrin_core::types::DbId;
use vitrin_db::models::contact_info::ContactInfo;
use vitrin_db::models::cta_section::CtaSection;
use vitrin_db::models::hero::HeroVideo;
use vitrin_db::models::service::ServiceList;
use vitrin_db::models::why_we_exist::WhyWeExist;
use vitrin_db::repositories::{ContactInfoRepo, CtaSectionRepo, HeroVideoRepo, WhyWeExistRepo};
use vitrin_db::singleton;

use super::content::service_list;
use super::header_locale;
use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct HomepageQuery {
    pub locale: Option<String>,
}

// ---------------------------------------------------------------------------
// Localized views
// ---------------------------------------------------------------------------

fn text(en: Option<&str>, tr: Option<&str>, locale: Locale) -> String {
    display(en, tr, locale).to_string()
}

#[derive(Debug, Serialize)]
pub struct HeroView {
    pub title: String,
    pub description: String,
    pub video_url: Option<String>,
    pub video_mime_type: Option<String>,
    pub mobile_video_url: Option<String>,
    pub mobile_video_mime_type: Option<String>,
}

impl HeroView {
    fn new(h: HeroVideo, locale: Locale) -> Self {
        Self {
            title: text(h.title_en.as_deref(), h.title_tr.as_deref(), locale),
            description: text(h.description_en.as_deref(), h.description_tr.as_deref(), locale),
            video_url: h.video_url,
            video_mime_type: h.video_mime_type,
            mobile_video_url: h.mobile_video_url,
            mobile_video_mime_type: h.mobile_video_mime_type,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct VideoView {
    pub position: i16,
    pub url: String,
}

#[derive(Debug, Serialize)]
pub struct WhyWeExistView {
    pub main_title: String,
    pub left_title: String,
    pub right_paragraph_1: String,
    pub right_paragraph_2: String,
    pub bottom_text: String,
    /// Filled slots only, by position.
    pub videos: Vec<VideoView>,
}

impl WhyWeExistView {
    fn new(w: WhyWeExist, locale: Locale) -> Self {
        let s = &w.section;
        Self {
            main_title: text(Some(&s.main_title_en), Some(&s.main_title_tr), locale),
            left_title: text(s.left_title_en.as_deref(), s.left_title_tr.as_deref(), locale),
            right_paragraph_1: text(
                s.right_paragraph_1_en.as_deref(),
                s.right_paragraph_1_tr.as_deref(),
                locale,
            ),
            right_paragraph_2: text(
                s.right_paragraph_2_en.as_deref(),
                s.right_paragraph_2_tr.as_deref(),
                locale,
            ),
            bottom_text: text(s.bottom_text_en.as_deref(), s.bottom_text_tr.as_deref(), locale),
            videos: w
                .videos
                .into_iter()
                .filter_map(|v| {
                    v.url.map(|url| VideoView {
                        position: v.video_position,
                        url,
                    })
                })
                .collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CtaView {
    pub main_title: String,
    pub description: String,
    pub button_text: String,
    pub button_link: String,
    pub background_image_url: Option<String>,
    pub marquee_items: Vec<String>,
}

impl CtaView {
    fn new(c: CtaSection, locale: Locale) -> Self {
        Self {
            main_title: text(Some(&c.main_title_en), Some(&c.main_title_tr), locale),
            description: text(Some(&c.description_en), Some(&c.description_tr), locale),
            button_text: text(c.button_text_en.as_deref(), c.button_text_tr.as_deref(), locale),
            marquee_items: c
                .marquee_items
                .iter()
                .map(|item| item.display(locale).to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            button_link: c.button_link,
            background_image_url: c.background_image_url,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ServiceSummaryView {
    pub id: DbId,
    pub slug: String,
    pub title: String,
    pub image_url: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ServicesView {
    pub main_title: String,
    pub main_image_url: Option<String>,
    pub services: Vec<ServiceSummaryView>,
}

impl ServicesView {
    fn new(list: ServiceList, locale: Locale) -> Self {
        let (main_title, main_image_url) = match list.collection {
            Some(c) => (
                text(Some(&c.main_title_en), Some(&c.main_title_tr), locale),
                c.main_image_url,
            ),
            None => (String::new(), None),
        };
        Self {
            main_title,
            main_image_url,
            services: list
                .services
                .into_iter()
                .map(|s| ServiceSummaryView {
                    title: text(Some(&s.title_en), Some(&s.title_tr), locale),
                    id: s.id,
                    slug: s.slug,
                    image_url: s.image_url,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ContactInfoView {
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: String,
    pub linkedin_url: Option<String>,
    pub instagram_url: Option<String>,
}

impl ContactInfoView {
    fn new(c: ContactInfo, locale: Locale) -> Self {
        Self {
            address: text(c.address_en.as_deref(), c.address_tr.as_deref(), locale),
            email: c.email,
            phone: c.phone,
            linkedin_url: c.linkedin_url,
            instagram_url: c.instagram_url,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HomepageView {
    pub locale: Locale,
    pub hero: Option<HeroView>,
    pub why_we_exist: Option<WhyWeExistView>,
    pub cta_section: Option<CtaView>,
    pub services: Option<ServicesView>,
    pub contact_info: Option<ContactInfoView>,
}

// ---------------------------------------------------------------------------
// Handler
// ---------------------------------------------------------------------------

/// Log a failed section and render it as absent.
fn degrade<T, E: std::fmt::Display>(section: &'static str, result: Result<Option<T>, E>) -> Option<T> {
    result.unwrap_or_else(|e| {
        tracing::warn!(section, error = %e, "Homepage section unavailable");
        None
    })
}

/// GET /api/v1/content/homepage?locale=
///
/// `locale` wins over the request headers; an unsupported value is a 400.
pub async fn show(
    State(state): State<AppState>,
    Query(query): Query<HomepageQuery>,
    headers: HeaderMap,
) -> AppResult<Json<DataResponse<HomepageView>>> {
    let locale = match query.locale.as_deref() {
        Some(code) => code.parse()?,
        None => header_locale(&headers),
    };
    let pool = &state.pool;

    let (hero, why, cta, services, contact) = tokio::join!(
        singleton::fetch::<HeroVideoRepo>(pool),
        singleton::fetch::<WhyWeExistRepo>(pool),
        singleton::fetch::<CtaSectionRepo>(pool),
        service_list(pool),
        singleton::fetch::<ContactInfoRepo>(pool),
    );

    Ok(Json(DataResponse::new(HomepageView {
        locale,
        hero: degrade("hero", hero).map(|h| HeroView::new(h, locale)),
        why_we_exist: degrade("why_we_exist", why).map(|w| WhyWeExistView::new(w, locale)),
        cta_section: degrade("cta_section", cta).map(|c| CtaView::new(c, locale)),
        services: degrade("services", services.map(Some)).map(|s| ServicesView::new(s, locale)),
        contact_info: degrade("contact_info", contact).map(|c| ContactInfoView::new(c, locale)),
    })))
}

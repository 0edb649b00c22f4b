//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async data access.
//! Single-row content sections implement [`crate::singleton::SingletonContent`]
//! and are read and written through [`crate::singleton`]; the others take
//! `&PgPool` as their first argument.

pub mod contact_info_repo;
pub mod contact_message_repo;
pub mod cta_section_repo;
pub mod hero_video_repo;
pub mod media_repo;
pub mod service_collection_repo;
pub mod service_repo;
pub mod user_repo;
pub mod why_we_exist_repo;

pub use contact_info_repo::ContactInfoRepo;
pub use contact_message_repo::ContactMessageRepo;
pub use cta_section_repo::CtaSectionRepo;
pub use hero_video_repo::HeroVideoRepo;
pub use media_repo::MediaRepo;
pub use service_collection_repo::ServiceCollectionRepo;
pub use service_repo::ServiceRepo;
pub use user_repo::UserRepo;
pub use why_we_exist_repo::WhyWeExistRepo;

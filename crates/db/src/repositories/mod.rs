//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod abstract_repo;
pub mod archive_repo;
pub mod chapter_repo;
pub mod communication_video_repo;
pub mod contenu_repo;
pub mod document_repo;
pub mod eposter_repo;
pub mod newsletter_repo;
pub mod room_repo;
pub mod slug_repo;
pub mod speaker_repo;
pub mod sponsor_repo;
pub mod user_repo;
pub mod video_repo;

pub use abstract_repo::AbstractRepo;
pub use archive_repo::ArchiveRepo;
pub use chapter_repo::ChapterRepo;
pub use communication_video_repo::CommunicationVideoRepo;
pub use contenu_repo::ContenuRepo;
pub use document_repo::DocumentRepo;
pub use eposter_repo::EposterRepo;
pub use newsletter_repo::NewsletterRepo;
pub use room_repo::RoomRepo;
pub use slug_repo::{SlugRepo, SlugTable};
pub use speaker_repo::SpeakerRepo;
pub use sponsor_repo::SponsorRepo;
pub use user_repo::UserRepo;
pub use video_repo::VideoRepo;

pub mod account_service;
pub mod auth_service;
pub mod listing;
pub mod lookup_service;
pub mod mailer;
pub mod media_storage;
pub mod notification_service;
pub mod plan_service;
pub mod profile_service;
pub mod review_service;
pub mod talk_room_service;
pub mod validation;

pub use account_service::*;
pub use auth_service::*;
pub use listing::{Page, PageWindow};
pub use lookup_service::*;
pub use mailer::*;
pub use media_storage::*;
pub use notification_service::*;
pub use plan_service::*;
pub use profile_service::*;
pub use review_service::*;
pub use talk_room_service::*;

pub mod addresses;
pub mod genders;
pub mod messages;
pub mod notifications;
pub mod plans;
pub mod profile_following_users;
pub mod profile_tags;
pub mod profiles;
pub mod refresh_tokens;
pub mod reviews;
pub mod tags;
pub mod talk_rooms;
pub mod users;

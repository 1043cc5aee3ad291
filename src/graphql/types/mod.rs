pub mod auth;
pub mod lookup;
pub mod node;
pub mod notification;
pub mod plan;
pub mod profile;
pub mod review;
pub mod talk_room;
pub mod user;

pub use auth::*;
pub use lookup::*;
pub use node::*;
pub use notification::*;
pub use plan::*;
pub use profile::*;
pub use review::*;
pub use talk_room::*;
pub use user::*;

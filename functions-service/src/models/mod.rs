//! Domain models for functions-service.

mod account;
mod engagement;
mod location;
mod scheduled_post;
mod social_user;

pub use account::SocialAccount;
pub use engagement::{ActionStatus, CreateEngagementAction, EngagementAction};
pub use location::Location;
pub use scheduled_post::{CreateScheduledPost, PostStatus, ScheduledPost};
pub use social_user::{NewSocialUser, UserLink};

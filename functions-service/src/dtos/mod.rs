pub mod content;
pub mod geocode;
pub mod health;
pub mod images;
pub mod records;
pub mod users;

pub use content::{
    CommentSuggestions, GenerateContentRequest, GeneratedContent, SearchQueries,
    SearchQueriesRequest, Slide, SlideOutline, SlideOutlineRequest, SuggestCommentRequest,
};
pub use geocode::{GeocodeRequest, GeocodeResult, LocationUpdateResult};
pub use health::{HealthChecks, HealthResponse};
pub use images::{EditImageRequest, EditImageResponse, GenerateImageRequest, GenerateImageResponse};
pub use records::{
    LogEngagementRequest, LogEngagementResponse, PostResponse, PublishPostRequest,
    SchedulePostRequest, SyncAccountRequest, SyncAccountResponse,
};
pub use users::{UpsertSocialUserRequest, UpsertSocialUserResponse};

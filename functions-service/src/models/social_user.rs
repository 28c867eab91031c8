//! Social-media user model. Rows are only ever created through the
//! `upsert_social_user` stored routine.

use uuid::Uuid;

/// Optional link from a discovered user to a CRM record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserLink {
    Company(Uuid),
    Person(Uuid),
}

impl UserLink {
    pub fn company_id(&self) -> Option<Uuid> {
        match self {
            UserLink::Company(id) => Some(*id),
            UserLink::Person(_) => None,
        }
    }

    pub fn person_id(&self) -> Option<Uuid> {
        match self {
            UserLink::Person(id) => Some(*id),
            UserLink::Company(_) => None,
        }
    }
}

/// Input for the upsert routine. `username` may be raw; it is normalized
/// before it reaches the datastore.
#[derive(Debug, Clone)]
pub struct NewSocialUser {
    pub username: String,
    pub display_name: Option<String>,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub source: String,
    pub link: Option<UserLink>,
}

impl NewSocialUser {
    pub const DEFAULT_SOURCE: &'static str = "manual";

    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            display_name: None,
            bio: None,
            location: None,
            source: Self::DEFAULT_SOURCE.to_string(),
            link: None,
        }
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }
}

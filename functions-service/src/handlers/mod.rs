pub mod content;
pub mod geocode;
pub mod health;
pub mod images;
pub mod records;
pub mod users;

pub mod media;
pub mod naming;
pub mod structured;

pub use naming::unique_object_name;
pub use structured::{decode, Decoded};

#![deny(unsafe_code)]

pub mod identity;
pub mod pipeline;
pub mod token;

pub use identity::{EMAIL_FIELD, PHONE_FIELDS, PHONE_IDENTITY_PREFIX, derive_identity};
pub use pipeline::LeadPipeline;
pub use token::resume_token;

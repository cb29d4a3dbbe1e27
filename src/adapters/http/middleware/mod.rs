//! Request extractors shared by the HTTP modules.

mod auth;

pub use auth::{AdminUser, AuthRejection, AuthenticatedUser, ROLE_HEADER, USER_ID_HEADER};

pub mod access_token;
pub mod ownership;

pub use access_token::{AccessClaims, AccessTokenCodec};
pub use ownership::check_ownership;

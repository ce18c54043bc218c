//! Application Layer
//!
//! Use cases and application services.

pub(crate) mod blocking;
pub mod config;
pub mod create_chirp;
pub mod delete_chirp;
pub mod ledger;
pub mod register_user;
pub mod session;
pub(crate) mod store;
pub mod update_user;
pub mod upgrade_user;

// Re-exports
pub use config::AuthConfig;
pub use create_chirp::CreateChirpUseCase;
pub use delete_chirp::DeleteChirpUseCase;
pub use ledger::RefreshTokenLedger;
pub use register_user::{RegisterUserInput, RegisterUserUseCase};
pub use session::{LoginInput, LoginOutput, LoginStage, SessionService};
pub use update_user::{UpdateUserInput, UpdateUserUseCase};
pub use upgrade_user::{UpgradeUserUseCase, WebhookInput, WebhookOutcome};

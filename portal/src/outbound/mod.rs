//! Outbound adapters implementing domain ports for external services.
//!
//! - **dce**: reqwest client for the `dce-server` REST API (registrations,
//!   profiles, research profiles, content collections).
//! - **identity**: reqwest client for the identity provider's account API.
//!
//! Adapters are thin translators between wire formats and domain types.
//! They contain no business logic.

pub mod dce;
pub mod identity;

//! Client core for the DCE alumni portal.
//!
//! The `domain` module holds status resolution, the status monitor, session
//! handling and the research/profile/content services. `outbound` talks to
//! `dce-server` and the identity provider over HTTP. `inbound` is the
//! command-line surface.

pub mod config;
pub mod domain;
pub mod inbound;
pub mod outbound;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

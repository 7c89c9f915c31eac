//! Identity provider outbound adapters.

mod toolkit;

pub use toolkit::IdentityToolkitProvider;

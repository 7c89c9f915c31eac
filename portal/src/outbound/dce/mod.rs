//! `dce-server` outbound adapters.
//!
//! One reqwest client implements every backend-facing port; each port's
//! endpoints live in their own file.

mod client;
mod content;
mod dto;
mod profiles;
mod registrations;

pub use client::DceHttpBackend;

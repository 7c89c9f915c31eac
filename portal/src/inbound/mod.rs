//! Inbound adapters translating user input into domain service calls.
//!
//! The command-line surface lives under [`cli`]. It depends on ports only;
//! the binary decides which adapters back them.

pub mod cli;

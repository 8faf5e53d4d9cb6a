//! File-manager HTTP API client and wire types.

pub mod client;
pub mod error;
pub mod wire;

pub use client::{ApiClient, RemoteApi};
pub use error::HttpStatusKind;
pub use wire::{Ack, Action, ActionRequest};

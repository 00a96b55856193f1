//! Rowt Link Client
//!
//! This crate creates shortlinks on a Rowt server: one `POST <server>/link`
//! per [`LinkClient::create_link`] call, with failures normalized into
//! `Failed to create link: ...` errors.

pub mod client;
pub mod options;

pub use client::{normalize_server_url, shortcode_from_shortlink, LinkClient, CREATE_LINK_ERROR_PREFIX};
pub use options::{LinkConfig, LinkOptions};

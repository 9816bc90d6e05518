//! Outgoing HTTP for page fetches.
//!
//! The scraper only ever talks to [`HttpClient`], so tests can swap in
//! [`MockClient`] and never touch the network.

pub(crate) mod charset;
mod client;

pub use client::{
    HttpClient, MockClient, MockResponse, WebClient, WebClientBuilder, DEFAULT_TIMEOUT,
    DEFAULT_USER_AGENT,
};

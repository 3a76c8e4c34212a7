//! HTTP networking

mod client;

pub use client::HttpClient;

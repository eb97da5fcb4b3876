//! HTTP layer - the transport seam between pipelines and the network
//!
//! This module provides:
//! - HttpClient trait and request/response types
//! - ReqwestHttpClient for real traffic
//! - MockHttpClient for tests

pub mod client;
pub mod mock;
pub mod reqwest_client;

pub use client::{HttpClient, HttpResponse, PostRequest, TransportError};
pub use mock::{MockHttpClient, MockReply};
pub use reqwest_client::{HttpConfig, ReqwestHttpClient};

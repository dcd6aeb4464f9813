//! Low-level GitHub API client for hubwire.
//!
//! This crate is a thin request/response pipeline: build a request from a
//! relative URI and parameters, attach auth headers, send it, parse the JSON
//! body into a navigable [`Element`] tree, decode pagination links, and
//! surface typed errors on non-success status codes.

pub mod config;
pub mod connection;
pub mod element;
pub mod error;
pub mod link;
pub mod pager;
pub mod response;

pub use reqwest::Method;

pub use config::Config;
pub use connection::{Connection, DEFAULT_ENDPOINT};
pub use element::{parse_element, Element};
pub use error::{Error, Result};
pub use link::{parse_link, LinkEntry, Params};
pub use pager::Pager;
pub use response::{parse_response, ParsedResponse};

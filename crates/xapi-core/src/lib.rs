//! # xapi-core
//!
//! Foundation types for the XenServer/XAPI JSON-RPC bindings.
//!
//! This crate provides the shared vocabulary the client crate builds on:
//!
//! - **Errors**: [`error::XapiError`] hierarchy via `thiserror`
//! - **Versions**: [`version::ApiVersion`] ordered enum with the
//!   major/minor pairs XAPI servers report
//! - **References**: [`reference::OpaqueRef`] newtype for server-issued
//!   opaque handles
//!
//! ## Crate Position
//!
//! Foundation crate. Depended on by `xapi-client`.

#![deny(unsafe_code)]

pub mod error;
pub mod reference;
pub mod version;

pub use error::{Result, XapiError};
pub use reference::OpaqueRef;
pub use version::ApiVersion;

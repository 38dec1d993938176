//! # xapi-client
//!
//! JSON-RPC connection and object bindings for the XenServer/XAPI
//! management API.
//!
//! The central type is [`Connection`]: it owns the transport, tracks the
//! authenticated session reference and negotiated [`ApiVersion`], and
//! every binding call funnels through [`Connection::dispatch`].
//!
//! - **Transport**: [`rpc::JsonRpcClient`] — reqwest-backed JSON-RPC 2.0
//!   over `http(s)://host/jsonrpc`
//! - **Bindings**: [`api::session::Session`], [`api::pool::Pool`],
//!   [`api::host::Host`], [`api::vm::Vm`]
//! - **Config**: [`config::ConnectionConfig`] for settings-file wiring
//!
//! ## Usage
//!
//! ```no_run
//! use xapi_client::{Connection, api::session::Session, api::vm::Vm};
//!
//! # async fn run() -> xapi_core::Result<()> {
//! let conn = Connection::new("https://xen.example.com".parse().unwrap())?;
//! let _session = Session::login_with_password(&conn, "root", "secret").await?;
//! println!("API version: {}", conn.api_version());
//! for (_, vm) in Vm::get_all_records(&conn).await? {
//!     println!("{} ({})", vm.name_label, vm.power_state);
//! }
//! Session::logout(&conn).await?;
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]

pub mod api;
pub mod config;
pub mod connection;
pub mod rpc;

pub use config::{ConfigError, ConnectionConfig};
pub use connection::Connection;
pub use rpc::JsonRpcClient;
pub use xapi_core::{ApiVersion, OpaqueRef, Result, XapiError};

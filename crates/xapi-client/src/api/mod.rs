//! Object bindings.
//!
//! Hand-written instances of the generated-wrapper pattern: each function
//! composes its own parameter list (session reference first, per the wire
//! convention) and funnels through [`Connection::dispatch`].
//!
//! Only the objects the connection itself needs are bound — session, pool,
//! and host — plus VM as the representative guest-facing binding.
//!
//! [`Connection::dispatch`]: crate::Connection::dispatch

pub mod host;
pub mod pool;
pub mod session;
pub mod vm;

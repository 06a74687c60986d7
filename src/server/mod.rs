// src/server/mod.rs

//! JSON-RPC 2.0 server speaking the MCP tool protocol over stdio.
//!
//! The request handling lives in [`protocol`] and is independent of any IO;
//! [`stdio`] is the async shell that reads newline-delimited messages,
//! serves each request in its own task and funnels responses through a
//! single writer.

pub mod protocol;
pub mod stdio;

pub use protocol::{Request, Response, RpcError, handle_request, parse_message};
pub use stdio::serve;

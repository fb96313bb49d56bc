//! Connection server.
//!
//! Accepts connections on the local Unix socket and wires each one to its
//! own session, build orchestration and cleanup. A termination signal
//! stops the accept loop; in-flight sessions are not drained.

pub mod connection_server;

pub use connection_server::ConnectionServer;

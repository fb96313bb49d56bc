//! Build-trigger client.
//!
//! Connects to the coordinator socket, triggers a build, logs every
//! streamed line and returns the image list once all summaries arrived.

pub mod build_client;

pub use build_client::{run_session, BuildReport};

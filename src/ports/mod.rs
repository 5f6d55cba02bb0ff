//! Port traits at the I/O boundaries.

pub mod config_port;
pub mod report_port;
pub mod source_port;
pub mod store_port;

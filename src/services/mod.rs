pub mod aci;
pub mod github;
pub mod log_stream;
pub mod monitor;
pub mod report;
pub mod status;

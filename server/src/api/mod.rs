pub mod email;
pub mod errors;
pub mod passthrough;
pub mod server;
pub mod state;
pub mod worksheets;

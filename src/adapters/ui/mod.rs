//! Console output for the operator who starts the server.

pub mod banner;

/// Prints the startup banner.
pub fn init_ui(listen_on: &str) {
    banner::print_welcome(listen_on);
}

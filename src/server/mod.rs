// Server module entry
// Listener setup, connection serving and signal-driven shutdown

pub mod connection;
pub mod listener;
pub mod signal;

// `loop` is a keyword, so the file is mounted as server_loop
#[path = "loop.rs"]
pub mod server_loop;

// Re-export commonly used types
pub use listener::create_reusable_listener;
pub use server_loop::start_server_loop;
pub use signal::{start_signal_handler, SignalHandler};

mod client;
#[cfg(any(target_os = "macos", test))]
mod server;

pub use client::IpcClient;
#[cfg(any(target_os = "macos", test))]
pub use server::IpcServer;

pub const SOCKET_PATH: &str = "/tmp/mouseset.sock";

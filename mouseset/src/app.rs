mod command;
mod dispatch;
mod effects;

#[cfg(target_os = "macos")]
mod channels;
#[cfg(target_os = "macos")]
mod run_loop;

#[cfg(target_os = "macos")]
pub use run_loop::App;

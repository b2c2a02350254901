pub mod command;

pub use command::{Command, ConfigInfo, Point, Response};

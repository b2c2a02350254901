use std::cell::RefCell;

use crate::core::State;
use crate::platform::CursorManipulator;
use mouseset_ipc::{Command, Response};

use super::command::process_command;
use super::effects::execute_effects;

/// Unified command dispatcher for IPC and hotkey commands:
/// process command -> execute effects -> respond.
pub fn dispatch_command<M: CursorManipulator>(
    cmd: &Command,
    state: &RefCell<State>,
    manipulator: &M,
) -> Response {
    let result = process_command(&mut state.borrow_mut(), cmd);
    execute_effects(result.effects, manipulator);
    result.response
}

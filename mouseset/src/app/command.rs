use crate::core::State;
use crate::effect::CommandResult;
use mouseset_ipc::{Command, Response};

/// Pure function: processes a command and returns a response with effects.
/// This function does not perform any side effects - it only mutates state and computes effects.
pub fn process_command(state: &mut State, cmd: &Command) -> CommandResult {
    match cmd {
        Command::Restore => state.restore(),
        Command::Save => state.save_now(),
        Command::Forget => state.forget(),
        Command::GetPosition => CommandResult::with_response(Response::Position {
            position: state.saved_position(),
        }),
        Command::GetConfig => CommandResult::with_response(Response::Config {
            config: state.config.to_info(),
        }),
        Command::SetDebounceDelay { ms } => state.set_debounce_delay_ms(*ms),
        Command::Quit => {
            tracing::info!("Quit command received");
            CommandResult::ok()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Config, Point};
    use crate::effect::Effect;
    use std::time::{Duration, Instant};

    fn state_with_saved(point: Point) -> State {
        let mut state = State::new(Config::default());
        let deadline = state.mouse_moved(point, Instant::now());
        state.debounce_elapsed(deadline);
        state
    }

    #[test]
    fn test_restore_produces_warp() {
        let mut state = state_with_saved(Point::new(300.0, 150.0));
        let result = process_command(&mut state, &Command::Restore);
        assert_eq!(result.response, Response::Ok);
        assert_eq!(
            result.effects,
            vec![Effect::WarpCursor {
                point: Point::new(300.0, 150.0)
            }]
        );
    }

    #[test]
    fn test_restore_without_position() {
        let mut state = State::default();
        let result = process_command(&mut state, &Command::Restore);
        assert!(result.effects.is_empty());
        assert!(matches!(result.response, Response::Error { .. }));
    }

    #[test]
    fn test_get_position() {
        let mut state = State::default();
        let result = process_command(&mut state, &Command::GetPosition);
        assert_eq!(result.response, Response::Position { position: None });

        let mut state = state_with_saved(Point::new(5.0, 5.0));
        let result = process_command(&mut state, &Command::GetPosition);
        assert_eq!(
            result.response,
            Response::Position {
                position: Some(Point::new(5.0, 5.0))
            }
        );
        assert!(result.effects.is_empty());
    }

    #[test]
    fn test_forget_then_get_position() {
        let mut state = state_with_saved(Point::new(5.0, 5.0));
        process_command(&mut state, &Command::Forget);
        let result = process_command(&mut state, &Command::GetPosition);
        assert_eq!(result.response, Response::Position { position: None });
    }

    #[test]
    fn test_set_delay_then_get_config() {
        let mut state = State::default();
        let result = process_command(&mut state, &Command::SetDebounceDelay { ms: 400 });
        assert_eq!(result.response, Response::Ok);
        assert_eq!(state.config.debounce_delay, Duration::from_millis(400));

        match process_command(&mut state, &Command::GetConfig).response {
            Response::Config { config } => {
                assert_eq!(config.debounce_delay_ms, 400);
                assert_eq!(config.restore_hotkey, "cmd-shift-e");
            }
            other => panic!("Unexpected response: {:?}", other),
        }
    }

    #[test]
    fn test_save_command() {
        let mut state = State::default();
        state.mouse_moved(Point::new(8.0, 9.0), Instant::now());
        let result = process_command(&mut state, &Command::Save);
        assert!(result.effects.is_empty());
        assert_eq!(state.saved_position(), Some(Point::new(8.0, 9.0)));
    }

    #[test]
    fn test_quit_is_ok() {
        let mut state = State::default();
        let result = process_command(&mut state, &Command::Quit);
        assert_eq!(result.response, Response::Ok);
        assert!(result.effects.is_empty());
    }
}

#[cfg(any(target_os = "macos", test))]
mod app;
mod core;
#[cfg(any(target_os = "macos", test))]
mod effect;
mod ipc;
#[cfg(target_os = "macos")]
mod macos;
#[cfg(any(target_os = "macos", test))]
mod pid;
#[cfg(any(target_os = "macos", test))]
mod platform;

use anyhow::{anyhow, Result};
use argh::FromArgs;
use ipc::IpcClient;
use mouseset_ipc::{Command, Response};
use tracing_subscriber::EnvFilter;

use crate::core::{format_hotkey, parse_hotkey, Config};

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// mouseset - remember where the cursor rests and jump back to it with a hotkey
#[derive(FromArgs)]
struct Cli {
    #[argh(subcommand)]
    command: Option<SubCommand>,
}

#[derive(FromArgs)]
#[argh(subcommand)]
enum SubCommand {
    Start(StartCmd),
    Version(VersionCmd),
    Restore(RestoreCmd),
    Save(SaveCmd),
    Forget(ForgetCmd),
    GetPosition(GetPositionCmd),
    GetConfig(GetConfigCmd),
    SetDelay(SetDelayCmd),
    Quit(QuitCmd),
}

/// Start the mouseset daemon
#[derive(FromArgs)]
#[argh(subcommand, name = "start")]
struct StartCmd {
    /// idle time in milliseconds before the cursor position is saved (default 1000)
    #[argh(option)]
    delay_ms: Option<u64>,
    /// hotkey that restores the saved position (default cmd-shift-e)
    #[argh(option)]
    hotkey: Option<String>,
    /// optional hotkey that saves the current position immediately
    #[argh(option)]
    save_hotkey: Option<String>,
}

/// Show version information
#[derive(FromArgs)]
#[argh(subcommand, name = "version")]
struct VersionCmd {}

/// Move the cursor to the saved position
#[derive(FromArgs)]
#[argh(subcommand, name = "restore")]
struct RestoreCmd {}

/// Save the current cursor position without waiting for it to rest
#[derive(FromArgs)]
#[argh(subcommand, name = "save")]
struct SaveCmd {}

/// Clear the saved position
#[derive(FromArgs)]
#[argh(subcommand, name = "forget")]
struct ForgetCmd {}

/// Print the saved position
#[derive(FromArgs)]
#[argh(subcommand, name = "get-position")]
struct GetPositionCmd {}

/// Print the daemon configuration
#[derive(FromArgs)]
#[argh(subcommand, name = "get-config")]
struct GetConfigCmd {}

/// Change the idle time before the cursor position is saved
#[derive(FromArgs)]
#[argh(subcommand, name = "set-delay")]
struct SetDelayCmd {
    /// delay in milliseconds
    #[argh(positional)]
    ms: u64,
}

/// Quit the mouseset daemon
#[derive(FromArgs)]
#[argh(subcommand, name = "quit")]
struct QuitCmd {}

fn main() -> Result<()> {
    let cli: Cli = argh::from_env();

    match cli.command {
        None => {
            // No subcommand - show help (simulate --help)
            let args: Vec<&str> = vec!["mouseset", "--help"];
            if let Err(e) = Cli::from_args(&args[..1], &args[1..]) {
                println!("{}", e.output);
            }
            Ok(())
        }
        Some(SubCommand::Start(cmd)) => {
            tracing_subscriber::fmt()
                .with_env_filter(
                    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
                )
                .init();

            let config = build_config(&cmd)?;
            tracing::info!("mouseset {} starting", VERSION);
            run_daemon(config)
        }
        Some(SubCommand::Version(_)) => {
            println!("mouseset {}", VERSION);
            Ok(())
        }
        Some(subcmd) => run_cli(subcmd),
    }
}

#[cfg(target_os = "macos")]
fn run_daemon(config: Config) -> Result<()> {
    app::App::new(config).run()
}

#[cfg(not(target_os = "macos"))]
fn run_daemon(_config: Config) -> Result<()> {
    anyhow::bail!("The mouseset daemon requires macOS")
}

fn build_config(cmd: &StartCmd) -> Result<Config> {
    let mut config = Config::new();
    if let Some(ms) = cmd.delay_ms {
        config.set_debounce_delay_ms(ms).map_err(|e| anyhow!(e))?;
    }
    if let Some(key) = &cmd.hotkey {
        config.restore_hotkey = normalize_hotkey(key)?;
    }
    if let Some(key) = &cmd.save_hotkey {
        config.save_hotkey = Some(normalize_hotkey(key)?);
    }
    if config.save_hotkey.as_deref() == Some(config.restore_hotkey.as_str()) {
        anyhow::bail!("--save-hotkey must differ from the restore hotkey");
    }
    Ok(config)
}

fn normalize_hotkey(key: &str) -> Result<String> {
    let hotkey = parse_hotkey(key).map_err(|e| anyhow!("Invalid hotkey {:?}: {}", key, e))?;
    Ok(format_hotkey(&hotkey))
}

fn run_cli(subcmd: SubCommand) -> Result<()> {
    let cmd = to_command(subcmd);
    let mut client = IpcClient::connect()?;
    let response = client.send(&cmd)?;

    match response {
        Response::Ok => {}
        Response::Error { message } => {
            eprintln!("Error: {}", message);
            std::process::exit(1);
        }
        Response::Position { position } => match position {
            Some(p) => println!("{} {}", p.x, p.y),
            None => {
                eprintln!("No saved position");
                std::process::exit(1);
            }
        },
        Response::Config { config } => {
            println!("Debounce delay: {}ms", config.debounce_delay_ms);
            println!("Restore hotkey: {}", config.restore_hotkey);
            if let Some(key) = config.save_hotkey {
                println!("Save hotkey: {}", key);
            }
        }
    }

    Ok(())
}

fn to_command(subcmd: SubCommand) -> Command {
    match subcmd {
        SubCommand::Start(_) | SubCommand::Version(_) => {
            unreachable!("handled in main")
        }
        SubCommand::Restore(_) => Command::Restore,
        SubCommand::Save(_) => Command::Save,
        SubCommand::Forget(_) => Command::Forget,
        SubCommand::GetPosition(_) => Command::GetPosition,
        SubCommand::GetConfig(_) => Command::GetConfig,
        SubCommand::SetDelay(cmd) => Command::SetDebounceDelay { ms: cmd.ms },
        SubCommand::Quit(_) => Command::Quit,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn start_cmd(args: &[&str]) -> StartCmd {
        StartCmd::from_args(&["start"], args).unwrap()
    }

    #[test]
    fn test_build_config_defaults() {
        let config = build_config(&start_cmd(&[])).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_build_config_overrides() {
        let config = build_config(&start_cmd(&[
            "--delay-ms",
            "500",
            "--hotkey",
            "Command-Option-R",
            "--save-hotkey",
            "cmd-shift-s",
        ]))
        .unwrap();
        assert_eq!(config.debounce_delay, Duration::from_millis(500));
        assert_eq!(config.restore_hotkey, "cmd-alt-r");
        assert_eq!(config.save_hotkey.as_deref(), Some("cmd-shift-s"));
    }

    #[test]
    fn test_build_config_rejects_zero_delay() {
        assert!(build_config(&start_cmd(&["--delay-ms", "0"])).is_err());
    }

    #[test]
    fn test_build_config_rejects_bad_hotkey() {
        assert!(build_config(&start_cmd(&["--hotkey", "hyper-e"])).is_err());
    }

    #[test]
    fn test_build_config_rejects_duplicate_hotkeys() {
        assert!(build_config(&start_cmd(&["--save-hotkey", "shift-cmd-e"])).is_err());
    }

    #[test]
    fn test_to_command() {
        let cli = Cli::from_args(&["mouseset"], &["set-delay", "750"]).unwrap();
        let cmd = to_command(cli.command.unwrap());
        assert_eq!(cmd, Command::SetDebounceDelay { ms: 750 });

        let cli = Cli::from_args(&["mouseset"], &["get-position"]).unwrap();
        assert_eq!(to_command(cli.command.unwrap()), Command::GetPosition);
    }
}

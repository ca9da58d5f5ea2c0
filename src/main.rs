use anyhow::Context;
use clap::Parser;
use keycalc::calculator::copy_to_clipboard;
use keycalc::{Button, Config, Keypad, Mode};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Drive the calculator keypad from the terminal.
///
/// Each argument (or whitespace-separated word on stdin) is one button
/// press: an id such as `sin`, `inv`, `pi`, `square-root`, `equals`,
/// `clear`, `backspace`, or a literal label such as `7`, `+`, `(`, `XOR`.
#[derive(Parser, Debug)]
#[command(name = "keycalc", version, about)]
struct Args {
    /// Path to a config file (default: $XDG_CONFIG_HOME/keycalc/config.toml).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Copy each successful result to the clipboard.
    #[arg(long)]
    copy: bool,

    /// Group integer digits with commas on the display.
    #[arg(long)]
    thousands: bool,

    /// Button presses. Read from stdin when empty.
    buttons: Vec<String>,
}

fn main() -> anyhow::Result<()> {
    install_tracing();

    let args = Args::parse();

    let mut config = Config::load(args.config.as_deref())?;
    config.copy_results |= args.copy;
    config.thousands_separators |= args.thousands;

    let mut keypad = Keypad::new(&config);
    let stdout = io::stdout();
    let mut out = stdout.lock();

    if !args.buttons.is_empty() {
        for token in &args.buttons {
            press(&mut keypad, &config, token);
        }
        writeln!(out, "{}", keypad.display())?;
        return Ok(());
    }

    for line in io::stdin().lock().lines() {
        let line = line.context("reading button presses from stdin")?;
        for token in line.split_whitespace() {
            press(&mut keypad, &config, token);
        }
        writeln!(out, "{}", keypad.display())?;
    }

    Ok(())
}

fn press(keypad: &mut Keypad, config: &Config, token: &str) {
    let button = Button::from_token(token);
    let is_equals = button == Button::Equals;
    keypad.press(button);

    if is_equals
        && config.copy_results
        && keypad.mode() == Mode::Normal
        && let Some(result) = keypad.last_result()
        && let Err(e) = copy_to_clipboard(result)
    {
        tracing::warn!("{:#}", e);
    }
}

fn install_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

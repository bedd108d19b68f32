//! `wmctrl` lets you query and control an [Extended Window Manager Hints (EWMH)](https://specifications.freedesktop.org/wm-spec/latest/)
//! compatible window manager from the command line. It lists windows and desktops, switches
//! desktops and activates, closes or moves windows, which makes it easy to drive the window manager
//! from scripts and hot keys.
//!
//! ## Command line examples
//!
//! ### List windows
//! List the managed windows including the PID of the owning process.
//! ```bash
//! wmctrl -l -p
//! ```
//!
//! ### Activate a window
//! Switch to the desktop of the first window with `firefox` in its title and raise it.
//! ```bash
//! wmctrl -a firefox
//! ```
//!
//! ### Move a window
//! Move the window with the given id to the third desktop.
//! ```bash
//! wmctrl -i -r 0x01c00003 -t 2
//! ```
use std::{
    env,
    ffi::OsString,
    io::{self, Write},
    process::ExitCode,
};

use clap::crate_version;
use libewmh::{window, Action, Charset, Config, WindowManager, WindowManagerResult};
use tracing::debug;
use tracing_subscriber::EnvFilter;

mod cli;

fn main() -> ExitCode {
    let args: Vec<OsString> = env::args_os().collect();

    // `--help` on its own is answered before any other parsing
    if args.len() == 2 && args[1] == "--help" {
        print!("{}", cli::cli().render_help());
        return ExitCode::SUCCESS;
    }

    let invocation = match cli::parse(args) {
        Ok(invocation) => invocation,
        Err(_) => {
            eprint!("{}", cli::cli().render_help());
            return ExitCode::FAILURE;
        },
    };

    init_logging(invocation.options.verbose);
    match run(invocation) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{}", err);
            ExitCode::FAILURE
        },
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_ansi(false)
        .with_target(false)
        .without_time()
        .init();
}

fn run(invocation: cli::Invocation) -> WindowManagerResult<()> {
    match invocation.action {
        Some(Action::Help) => {
            print!("{}", cli::cli().render_help());
            return Ok(());
        },
        Some(Action::Version) => {
            println!("{}", crate_version!());
            return Ok(());
        },
        _ => (),
    }

    let charset = Charset::detect(invocation.options.force_utf8);
    let cfg = Config::new(invocation.options, charset);

    // The connection is closed when `wm` goes out of scope on every path below
    let wm = WindowManager::connect()?;
    let mut out = io::stdout().lock();
    match invocation.action {
        Some(action) => window::dispatch(&wm, &cfg, action, &mut out)?,
        None => debug!("no action was given"),
    }
    out.flush()?;
    Ok(())
}

//! Command line flags. Flags are single characters in the getopt tradition; whichever action flag
//! comes last wins when several are given.
use std::ffi::OsString;

use clap::{
    crate_description, crate_version, error::ErrorKind, parser::ValueSource, value_parser, Arg, ArgAction,
    ArgMatches, Command,
};
use libewmh::{Action, Options};

// Flags selecting the action, in no particular order
const ACTIONS: [(&str, Action); 9] = [
    ("version", Action::Version),
    ("help", Action::Help),
    ("list", Action::ListWindows),
    ("desktops", Action::ListDesktops),
    ("info", Action::WmInfo),
    ("switch", Action::SwitchDesktop),
    ("activate", Action::Activate),
    ("close", Action::Close),
    ("move", Action::MoveAndActivate),
];

// Flags that carry the <WIN> and <DESK> arguments
const WINDOW_ARGS: [&str; 3] = ["activate", "close", "move"];
const DESKTOP_ARGS: [&str; 2] = ["switch", "to-desktop"];

// Flags that only modify options
const OPTION_ARGS: [&str; 5] = ["to-desktop", "by-id", "pid", "utf8", "verbose"];

const AFTER_HELP: &str = "\
Arguments:
  <WIN>   A window. By default it's matched against window titles and the
          first window whose title contains it is used. The match ignores case.
          With -i it is a numeric window ID, decimal or hexadecimal when it
          starts with \"0x\".
  <DESK>  A desktop number. Desktops are counted from zero.

Format of the window list:
  <window ID> <desktop ID> [<PID>] <client machine> <window title>

Format of the desktop list:
  <desktop ID> [-*] <desktop title>";

/// Invocation is the outcome of parsing the command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub options: Options,
    pub action: Option<Action>,
}

pub fn cli() -> Command {
    Command::new("wmctrl")
        .about(crate_description!())
        .version(crate_version!())
        .disable_help_flag(true)
        .disable_version_flag(true)
        .args_override_self(true)
        .after_help(AFTER_HELP)
        .arg(flag("info", 'm', "Show information about the window manager"))
        .arg(flag("list", 'l', "List windows managed by the window manager"))
        .arg(flag("desktops", 'd', "List desktops, the current desktop is marked with an asterisk"))
        .arg(value("switch", 's', "DESK", "Switch to the specified desktop"))
        .arg(value("activate", 'a', "WIN", "Activate window by switching to its desktop and raising it"))
        .arg(value("close", 'c', "WIN", "Close window gracefully"))
        .arg(value("move", 'r', "WIN", "Move window to the current desktop and activate it"))
        .arg(value("to-desktop", 't', "DESK", "Move the -r window to the specified desktop instead"))
        .arg(flag("help", 'h', "Print help"))
        .arg(flag("version", 'V', "Print version"))
        .arg(flag("by-id", 'i', "Interpret <WIN> as a numerical window ID"))
        .arg(flag("pid", 'p', "Include PIDs in the window list"))
        .arg(flag("utf8", 'u', "Override auto-detection and force UTF-8 mode"))
        .arg(flag("verbose", 'v', "Be verbose, useful for debugging"))
        .arg(Arg::new("ignored").num_args(0..).action(ArgAction::Append).hide(true))
}

fn flag(id: &'static str, short: char, help: &'static str) -> Arg {
    Arg::new(id).short(short).action(ArgAction::SetTrue).help(help)
}

fn value(id: &'static str, short: char, name: &'static str, help: &'static str) -> Arg {
    Arg::new(id)
        .short(short)
        .value_name(name)
        .value_parser(value_parser!(OsString))
        .allow_hyphen_values(true)
        .action(ArgAction::Set)
        .help(help)
}

/// Parse the command line, the first item being the program name
pub fn parse<I, T>(args: I) -> Result<Invocation, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let mut cmd = cli();
    let matches = cmd.try_get_matches_from_mut(args)?;

    let given = ACTIONS.iter().map(|(id, _)| *id).chain(OPTION_ARGS).any(|id| last_index(&matches, id).is_some());
    if !given {
        return Err(cmd.error(ErrorKind::MissingRequiredArgument, "no option was given"));
    }
    Ok(invocation(&matches))
}

fn invocation(matches: &ArgMatches) -> Invocation {
    let mut action = ACTIONS
        .iter()
        .filter_map(|(id, action)| last_index(matches, id).map(|i| (i, *action)))
        .max_by_key(|(i, _)| *i)
        .map(|(_, action)| action);

    let options = Options {
        verbose: matches.get_flag("verbose"),
        force_utf8: matches.get_flag("utf8"),
        show_pid: matches.get_flag("pid"),
        match_by_id: matches.get_flag("by-id"),
        window: last_value(matches, &WINDOW_ARGS).map(|x| x.as_encoded_bytes().to_vec()),
        desktop: last_value(matches, &DESKTOP_ARGS).map(|x| x.to_string_lossy().into_owned()),
    };

    // -r with a desktop argument only moves the window
    if action == Some(Action::MoveAndActivate) && options.desktop.is_some() {
        action = Some(Action::MoveToDesktop);
    }
    Invocation { options, action }
}

// Position of the last occurrence of an argument given on the command line
fn last_index(matches: &ArgMatches, id: &str) -> Option<usize> {
    if matches.value_source(id) != Some(ValueSource::CommandLine) {
        return None;
    }
    matches.indices_of(id).and_then(|x| x.max())
}

// Value of whichever of the given arguments came last
fn last_value<'a>(matches: &'a ArgMatches, ids: &[&str]) -> Option<&'a OsString> {
    ids.iter()
        .filter_map(|id| last_index(matches, id).map(|i| (i, *id)))
        .max_by_key(|(i, _)| *i)
        .and_then(|(_, id)| matches.get_many::<OsString>(id))
        .and_then(|x| x.last())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_ok(args: &[&str]) -> Invocation {
        parse(std::iter::once("wmctrl").chain(args.iter().copied())).unwrap()
    }

    fn parse_err(args: &[&str]) -> clap::Error {
        parse(std::iter::once("wmctrl").chain(args.iter().copied())).unwrap_err()
    }

    #[test]
    fn test_cli_is_valid() {
        cli().debug_assert();
    }

    #[test]
    fn test_actions() {
        assert_eq!(parse_ok(&["-l"]).action, Some(Action::ListWindows));
        assert_eq!(parse_ok(&["-d"]).action, Some(Action::ListDesktops));
        assert_eq!(parse_ok(&["-m"]).action, Some(Action::WmInfo));
        assert_eq!(parse_ok(&["-h"]).action, Some(Action::Help));
        assert_eq!(parse_ok(&["-V"]).action, Some(Action::Version));

        let inv = parse_ok(&["-s", "2"]);
        assert_eq!(inv.action, Some(Action::SwitchDesktop));
        assert_eq!(inv.options.desktop.as_deref(), Some("2"));

        let inv = parse_ok(&["-c", "Firefox"]);
        assert_eq!(inv.action, Some(Action::Close));
        assert_eq!(inv.options.window.as_deref(), Some(&b"Firefox"[..]));
    }

    #[test]
    fn test_last_action_wins() {
        assert_eq!(parse_ok(&["-l", "-d"]).action, Some(Action::ListDesktops));
        assert_eq!(parse_ok(&["-d", "-l"]).action, Some(Action::ListWindows));
        assert_eq!(parse_ok(&["-l", "-d", "-l"]).action, Some(Action::ListWindows));
        assert_eq!(parse_ok(&["-a", "term", "-m"]).action, Some(Action::WmInfo));
        assert_eq!(parse_ok(&["-m", "-a", "term"]).action, Some(Action::Activate));
        assert_eq!(parse_ok(&["-ld"]).action, Some(Action::ListDesktops));
    }

    #[test]
    fn test_last_window_argument_wins() {
        let inv = parse_ok(&["-a", "one", "-c", "two"]);
        assert_eq!(inv.action, Some(Action::Close));
        assert_eq!(inv.options.window.as_deref(), Some(&b"two"[..]));

        let inv = parse_ok(&["-a", "one", "-a", "three"]);
        assert_eq!(inv.options.window.as_deref(), Some(&b"three"[..]));
    }

    #[test]
    fn test_move() {
        let inv = parse_ok(&["-r", "editor"]);
        assert_eq!(inv.action, Some(Action::MoveAndActivate));
        assert_eq!(inv.options.desktop, None);

        let inv = parse_ok(&["-r", "editor", "-t", "3"]);
        assert_eq!(inv.action, Some(Action::MoveToDesktop));
        assert_eq!(inv.options.desktop.as_deref(), Some("3"));

        let inv = parse_ok(&["-t", "1", "-r", "editor"]);
        assert_eq!(inv.action, Some(Action::MoveToDesktop));
    }

    #[test]
    fn test_options() {
        let inv = parse_ok(&["-lpuv"]);
        assert_eq!(inv.action, Some(Action::ListWindows));
        assert!(inv.options.show_pid);
        assert!(inv.options.force_utf8);
        assert!(inv.options.verbose);
        assert!(!inv.options.match_by_id);

        let inv = parse_ok(&["-i", "-a0x1c00003"]);
        assert!(inv.options.match_by_id);
        assert_eq!(inv.options.window.as_deref(), Some(&b"0x1c00003"[..]));
    }

    #[test]
    fn test_hyphen_values() {
        let inv = parse_ok(&["-s", "-1"]);
        assert_eq!(inv.action, Some(Action::SwitchDesktop));
        assert_eq!(inv.options.desktop.as_deref(), Some("-1"));
    }

    #[test]
    fn test_options_without_action() {
        let inv = parse_ok(&["-v"]);
        assert_eq!(inv.action, None);
        assert!(inv.options.verbose);
    }

    #[test]
    fn test_errors() {
        assert_eq!(parse_err(&[]).kind(), ErrorKind::MissingRequiredArgument);
        assert_eq!(parse_err(&["firefox"]).kind(), ErrorKind::MissingRequiredArgument);
        assert_eq!(parse_err(&["-x"]).kind(), ErrorKind::UnknownArgument);
        assert!(parse(["wmctrl", "-a"]).is_err());
    }
}

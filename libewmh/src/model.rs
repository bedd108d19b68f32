use std::{fmt, iter};

use tracing::debug;
use x11rb::protocol::xproto;

use crate::{Charset, WindowManagerError, WindowManagerResult};

/// Action selects the single command a run performs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Activate,
    Close,
    Help,
    ListDesktops,
    ListWindows,
    MoveAndActivate,
    MoveToDesktop,
    SwitchDesktop,
    Version,
    WmInfo,
}

// Implement format! support
impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Action::Activate => write!(f, "activate"),
            Action::Close => write!(f, "close"),
            Action::Help => write!(f, "help"),
            Action::ListDesktops => write!(f, "list-desktops"),
            Action::ListWindows => write!(f, "list-windows"),
            Action::MoveAndActivate => write!(f, "move-and-activate"),
            Action::MoveToDesktop => write!(f, "move-to-desktop"),
            Action::SwitchDesktop => write!(f, "switch-desktop"),
            Action::Version => write!(f, "version"),
            Action::WmInfo => write!(f, "wm-info"),
        }
    }
}

/// Options collected from the command line for the lifetime of a single run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Options {
    pub verbose: bool,
    pub force_utf8: bool,
    pub show_pid: bool,
    pub match_by_id: bool,
    pub window: Option<Vec<u8>>,
    pub desktop: Option<String>,
}

/// Config bundles the options with the charset detected at startup. Handlers only ever see it
/// by shared reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub options: Options,
    pub charset: Charset,
}

impl Config {
    pub fn new(options: Options, charset: Charset) -> Self {
        Self { options, charset }
    }
}

/// Desktop as listed by the window manager
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Desktop {
    pub index: u32,
    pub current: bool,
    pub name: Option<Vec<u8>>,
}

/// Parse a numeric window id given either as `0x` prefixed hexadecimal or as decimal
///
/// ### Examples
/// ```
/// assert_eq!(libewmh::parse_window_id("0x1c00003").unwrap(), 0x1c00003);
/// assert_eq!(libewmh::parse_window_id("29360131").unwrap(), 29360131);
/// ```
pub fn parse_window_id(val: &str) -> WindowManagerResult<xproto::Window> {
    let hex = val.strip_prefix("0x").or_else(|| val.strip_prefix("0X"));
    let id = match hex {
        Some(digits) if digits.bytes().all(|x| x.is_ascii_hexdigit()) => u32::from_str_radix(digits, 16).ok(),
        _ if val.bytes().all(|x| x.is_ascii_digit()) => val.parse::<u32>().ok(),
        _ => None,
    };
    id.ok_or_else(|| WindowManagerError::InvalidWindowId(val.to_owned()).into())
}

/// Parse a zero based desktop index. Negative numbers, `-1` included, are rejected along with
/// anything that isn't a number.
pub fn parse_desktop(val: &str) -> WindowManagerResult<u32> {
    match val.trim().parse::<i64>() {
        Ok(x) if x >= 0 => Ok(u32::try_from(x).map_err(|_| WindowManagerError::InvalidDesktop(val.to_owned()))?),
        _ => Err(WindowManagerError::InvalidDesktop(val.to_owned()).into()),
    }
}

/// Split a null separated desktop names list into exactly `count` entries. Missing names are
/// `None` and names beyond `count` are dropped. The padding is produced lazily so `count` is
/// not trusted for allocation.
pub fn split_desktop_names(list: &[u8], count: usize) -> impl Iterator<Item = Option<&[u8]>> {
    let mut starts = Vec::new();
    if count > 0 {
        starts.push(0);
    }
    for (i, _) in list.iter().enumerate().filter(|(_, x)| **x == 0) {
        if i + 1 >= list.len() {
            break;
        }
        if starts.len() >= count {
            debug!("More desktop names than desktops, ignoring the rest.");
            break;
        }
        starts.push(i + 1);
    }

    let names: Vec<&[u8]> = starts
        .into_iter()
        .map(|start| {
            let rest = &list[start..];
            match rest.iter().position(|x| *x == 0) {
                Some(end) => &rest[..end],
                None => rest,
            }
        })
        .collect();
    names.into_iter().map(Some).chain(iter::repeat(None)).take(count)
}

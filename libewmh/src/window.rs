//! Command handlers. Each one is composed of [`Backend`] property reads and at most a couple of
//! client messages, and writes its report to the given output.
use std::io::Write;

use tracing::debug;
use x11rb::protocol::xproto;

use crate::{
    parse_desktop, parse_window_id, split_desktop_names, Action, Backend, Charset, Config, Desktop,
    WindowManagerError, WindowManagerResult,
};

/// Run the given action against the window manager
///
/// ### Arguments
/// * `wm` - connection to the display server
/// * `cfg` - options and charset for this run
/// * `action` - the action to perform
/// * `out` - where listings are written
///
/// ### Examples
/// ```ignore
/// use libewmh::prelude::*;
/// let wm = WindowManager::connect().unwrap();
/// let cfg = Config::new(Options::default(), Charset::detect(false));
/// libewmh::window::dispatch(&wm, &cfg, Action::ListDesktops, &mut std::io::stdout()).unwrap();
/// ```
pub fn dispatch<B, W>(wm: &B, cfg: &Config, action: Action, out: &mut W) -> WindowManagerResult<()>
where
    B: Backend + ?Sized,
    W: Write,
{
    debug!("dispatch: {}", action);
    match action {
        Action::ListWindows => list_windows(wm, cfg, out),
        Action::ListDesktops => list_desktops(wm, cfg, out),
        Action::SwitchDesktop => switch_desktop(wm, cfg),
        Action::WmInfo => wm_info(wm, cfg, out),
        Action::Activate => activate(wm, resolve_target(wm, cfg)?),
        Action::Close => close(wm, resolve_target(wm, cfg)?),
        Action::MoveAndActivate => {
            let win = resolve_target(wm, cfg)?;
            window_to_desktop(wm, win, None)?;
            activate(wm, win)
        },
        Action::MoveToDesktop => {
            let desktop = parse_desktop(cfg.options.desktop.as_deref().unwrap_or_default())?;
            let win = resolve_target(wm, cfg)?;
            window_to_desktop(wm, win, Some(desktop))
        },

        // Answered by the caller without a display connection
        Action::Help | Action::Version => Ok(()),
    }
}

/// Print the window manager's name and pid
pub fn wm_info<B: Backend + ?Sized, W: Write>(wm: &B, cfg: &Config, out: &mut W) -> WindowManagerResult<()> {
    let win = wm.supporting_wm()?;

    let (name, utf8) = match wm.win_net_name(win) {
        Some(name) => (Some(name), true),
        None => (wm.win_icccm_name(win), false),
    };
    if name.is_none() {
        debug!("Cannot get name of the window manager (_NET_WM_NAME or WM_NAME).");
    }
    let pid = wm.win_pid(win);
    if pid.is_none() {
        debug!("Cannot get pid of the window manager (_NET_WM_PID).");
    }

    let name = cfg.charset.to_display(name.as_ref().map(|x| x.text()), utf8);
    out.write_all(b"Name: ")?;
    out.write_all(name.as_deref().unwrap_or(&b"N/A"[..]))?;
    out.write_all(b"\n")?;
    match pid {
        Some(pid) => writeln!(out, "PID: {}", pid)?,
        None => writeln!(out, "PID: N/A")?,
    }
    Ok(())
}

/// List out the windows the window manager is managing
pub fn list_windows<B: Backend + ?Sized, W: Write>(wm: &B, cfg: &Config, out: &mut W) -> WindowManagerResult<()> {
    let clients = wm.client_list()?;

    // Widest client machine name decides the column width
    let width =
        clients.iter().filter_map(|win| wm.win_client_machine(*win)).map(|x| x.text().len()).max().unwrap_or(0);

    for win in clients {
        let title = window_title(wm, &cfg.charset, win);
        let desktop = wm.win_desktop(win).unwrap_or(0);
        let machine = wm.win_client_machine(win);
        let machine = machine.as_ref().map(|x| x.text()).unwrap_or(&b"N/A"[..]);

        let mut line = format!("{:#010x} {:<2} ", win, desktop).into_bytes();
        if cfg.options.show_pid {
            line.extend_from_slice(format!("{:<6} ", wm.win_pid(win).unwrap_or(0)).as_bytes());
        }
        line.resize(line.len() + width.saturating_sub(machine.len()), b' ');
        line.extend_from_slice(machine);
        line.push(b' ');
        let title = cfg.charset.to_display(title.as_deref().map(str::as_bytes), true);
        line.extend_from_slice(title.as_deref().unwrap_or(&b"N/A"[..]));
        line.push(b'\n');
        out.write_all(&line)?;
    }
    Ok(())
}

/// Get the desktops with their names, marking the current one. Desktops are produced lazily
/// as the count comes straight from the window manager.
pub fn desktops<B: Backend + ?Sized>(wm: &B) -> WindowManagerResult<(impl Iterator<Item = Desktop>, bool)> {
    let count = wm.desktops()?;
    let current = wm.current_desktop()?;
    let names = wm.desktop_names();
    debug!("Total number of desktops: {}", count);
    debug!("Current desktop ID (counted from zero): {}", current);

    let utf8 = names.as_ref().map(|(_, utf8)| *utf8).unwrap_or(true);
    let list: Vec<Vec<u8>> = match names {
        Some((ref names, _)) => {
            split_desktop_names(names.bytes(), count as usize).map_while(|x| x.map(<[u8]>::to_vec)).collect()
        },
        None => Vec::new(),
    };
    let desktops = (0..count).map(move |index| Desktop {
        index,
        current: index == current,
        name: list.get(index as usize).cloned(),
    });
    Ok((desktops, utf8))
}

/// List out the desktops marking the current one with an asterisk
pub fn list_desktops<B: Backend + ?Sized, W: Write>(wm: &B, cfg: &Config, out: &mut W) -> WindowManagerResult<()> {
    let (desktops, utf8) = desktops(wm)?;
    for desktop in desktops {
        let name = cfg.charset.to_display(desktop.name.as_deref(), utf8);
        write!(out, "{:<2} {} ", desktop.index, if desktop.current { '*' } else { '-' })?;
        out.write_all(name.as_deref().unwrap_or(&b"N/A"[..]))?;
        out.write_all(b"\n")?;
    }
    Ok(())
}

/// Switch to the desktop given in the options
pub fn switch_desktop<B: Backend + ?Sized>(wm: &B, cfg: &Config) -> WindowManagerResult<()> {
    let desktop = parse_desktop(cfg.options.desktop.as_deref().unwrap_or_default())?;
    wm.switch_desktop(desktop)
}

/// Switch to the window's desktop when it is known, then activate the window
pub fn activate<B: Backend + ?Sized>(wm: &B, win: xproto::Window) -> WindowManagerResult<()> {
    match wm.win_desktop(win) {
        Some(desktop) => {
            if let Err(err) = wm.switch_desktop(desktop) {
                debug!("Cannot switch desktop: {}", err);
            }
        },
        None => debug!("Cannot find desktop ID of the window."),
    }
    wm.activate_win(win)
}

/// Ask the window to close gracefully
pub fn close<B: Backend + ?Sized>(wm: &B, win: xproto::Window) -> WindowManagerResult<()> {
    wm.close_win(win)
}

/// Move the window to the given desktop or to the current desktop when none is given
pub fn window_to_desktop<B: Backend + ?Sized>(
    wm: &B, win: xproto::Window, desktop: Option<u32>,
) -> WindowManagerResult<()> {
    let desktop = match desktop {
        Some(desktop) => desktop,
        None => wm.current_desktop()?,
    };
    wm.move_win_to_desktop(win, desktop)
}

/// Resolve the window argument to a window id either numerically or by title
pub fn resolve_target<B: Backend + ?Sized>(wm: &B, cfg: &Config) -> WindowManagerResult<xproto::Window> {
    let arg = cfg.options.window.as_deref().unwrap_or_default();
    let win = if cfg.options.match_by_id {
        parse_window_id(&String::from_utf8_lossy(arg))?
    } else {
        find_by_title(wm, &cfg.charset, arg)?
    };
    debug!("Using window: {:#010x}", win);
    Ok(win)
}

/// Find the first window in client list order whose title contains `search` ignoring case
///
/// ### Arguments
/// * `wm` - connection to the display server
/// * `charset` - charset `search` is encoded in
/// * `search` - text to look for in the window titles
pub fn find_by_title<B: Backend + ?Sized>(
    wm: &B, charset: &Charset, search: &[u8],
) -> WindowManagerResult<xproto::Window> {
    let clients = wm.client_list()?;

    let search = if charset.is_utf8() {
        String::from_utf8_lossy(search).into_owned()
    } else {
        charset.locale_to_utf8(search).unwrap_or_else(|| String::from_utf8_lossy(search).into_owned())
    };
    let needle = fold_case(&search);

    clients
        .into_iter()
        .find(|win| window_title(wm, charset, *win).map(|x| fold_case(&x).contains(&needle)).unwrap_or(false))
        .ok_or_else(|| WindowManagerError::WindowNotFound(search).into())
}

// Lowercase and expand the characters whose case folding is longer than their lowercase form
fn fold_case(text: &str) -> String {
    let mut folded = String::with_capacity(text.len());
    for x in text.chars().flat_map(char::to_lowercase) {
        match x {
            'ß' => folded.push_str("ss"),
            'ς' => folded.push('σ'),
            'ſ' => folded.push('s'),
            'ŉ' => folded.push_str("ʼn"),
            'ﬀ' => folded.push_str("ff"),
            'ﬁ' => folded.push_str("fi"),
            'ﬂ' => folded.push_str("fl"),
            'ﬃ' => folded.push_str("ffi"),
            'ﬄ' => folded.push_str("ffl"),
            'ﬅ' | 'ﬆ' => folded.push_str("st"),
            _ => folded.push(x),
        }
    }
    folded
}

/// Get the window title as UTF-8 preferring `_NET_WM_NAME` over the locale encoded `WM_NAME`
pub fn window_title<B: Backend + ?Sized>(wm: &B, charset: &Charset, win: xproto::Window) -> Option<String> {
    if let Some(name) = wm.win_net_name(win) {
        return Some(String::from_utf8_lossy(name.text()).into_owned());
    }
    let name = wm.win_icccm_name(win)?;
    charset.locale_to_utf8(name.text())
}

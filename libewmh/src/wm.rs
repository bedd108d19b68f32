//! `WindowManager` uses the [Extended Window Manager Hints (EWMH) specification](https://specifications.freedesktop.org/wm-spec/latest/)
//! as a way to integrate with EWMH compatible window managers. The EWHM spec builds on the lower
//! level Inter Client Communication Conventions Manual (ICCCM) to define interactions between
//! window managers, compositing managers and applications.
//!
//! [Root Window Properties](https://specifications.freedesktop.org/wm-spec/latest/ar01s03.html)
//! The EWMH spec defines a number of properties that EWHM compliant window managers will maintain
//! and return to clients requesting information. [`Backend`] is the narrow surface `libewmh`
//! needs from the display server: read a property, send a client message and know the root
//! window. Everything else, including the fallback to the legacy GNOME hints, is built on top of
//! it so that the command handlers work the same against the X server and in tests.
use crate::{
    atoms::AtomCollection,
    property::{self, Fallback, PropType, Property, MAX_PROPERTY_VALUE_LEN},
    ErrorWrapper, WindowManagerError, WindowManagerResult,
};
use tracing::{debug, trace};

use x11rb::{
    connection::Connection,
    protocol::xproto::{self, Atom, AtomEnum, ClientMessageEvent, ConnectionExt as _, EventMask, GetPropertyReply},
    rust_connection::RustConnection,
};

// Client messages understood by EWMH window managers
pub const MSG_ACTIVE_WINDOW: &str = "_NET_ACTIVE_WINDOW";
pub const MSG_CLOSE_WINDOW: &str = "_NET_CLOSE_WINDOW";
pub const MSG_CURRENT_DESKTOP: &str = "_NET_CURRENT_DESKTOP";
pub const MSG_WM_DESKTOP: &str = "_NET_WM_DESKTOP";

/// Backend is the connection to the display server as seen by the command handlers
pub trait Backend {
    /// Get the root window
    fn root(&self) -> xproto::Window;

    /// Get a property of the given window. Retrieval failures and values of a different type
    /// than `type_` are reported as `None`.
    ///
    /// ### Arguments
    /// * `win` - id of the window to read from
    /// * `name` - name of the property e.g. `_NET_CLIENT_LIST`
    /// * `type_` - type the property is expected to have
    fn get_property(&self, win: xproto::Window, name: &str, type_: PropType) -> Option<Property>;

    /// Send a 32bit client message about `win` to the root window with `data` as the first
    /// value of the payload.
    fn send_message(&self, win: xproto::Window, message: &str, data: u32) -> WindowManagerResult<()>;

    /// Get the modern property falling back on the legacy one when it is absent
    fn get_property_fallback(&self, win: xproto::Window, fallback: &Fallback) -> Option<Property> {
        let (name, type_) = fallback.modern;
        self.get_property(win, name, type_).or_else(|| {
            let (name, type_) = fallback.legacy;
            self.get_property(win, name, type_)
        })
    }

    /// Get a required 32bit root window value
    fn root_value32(&self, fallback: &Fallback) -> WindowManagerResult<u32> {
        self.get_property_fallback(self.root(), fallback)
            .ok_or_else(|| ErrorWrapper::from(WindowManagerError::PropertyNotFound(fallback.names())))?
            .value32()
    }

    /// Get the window manager's supporting window
    fn supporting_wm(&self) -> WindowManagerResult<xproto::Window> {
        // Defined as: _NET_SUPPORTING_WM_CHECK, WINDOW/32
        self.root_value32(&property::SUPPORTING_WM_CHECK)
    }

    /// Get the windows managed by the window manager in the window manager's order
    fn client_list(&self) -> WindowManagerResult<Vec<xproto::Window>> {
        // Defined as: _NET_CLIENT_LIST, WINDOW[]/32
        let list = self
            .get_property_fallback(self.root(), &property::CLIENT_LIST)
            .ok_or_else(|| ErrorWrapper::from(WindowManagerError::PropertyNotFound(property::CLIENT_LIST.names())))?;
        let windows = list.windows()?;
        trace!("client_list: {} bytes, {} windows", list.len(), windows.len());
        Ok(windows)
    }

    /// Get number of desktops
    fn desktops(&self) -> WindowManagerResult<u32> {
        // Defined as: _NET_NUMBER_OF_DESKTOPS, CARDINAL/32
        self.root_value32(&property::NUMBER_OF_DESKTOPS)
    }

    /// Get the current desktop index
    fn current_desktop(&self) -> WindowManagerResult<u32> {
        // Defined as: _NET_CURRENT_DESKTOP desktop, CARDINAL/32
        self.root_value32(&property::CURRENT_DESKTOP)
    }

    /// Get the desktop names list along with whether it is UTF-8
    fn desktop_names(&self) -> Option<(Property, bool)> {
        // Defined as: _NET_DESKTOP_NAMES, UTF8_STRING[]
        let names = self.get_property_fallback(self.root(), &property::DESKTOP_NAMES);
        if names.is_none() {
            debug!("Cannot get desktop names properties. ({})", property::DESKTOP_NAMES.names());
        }
        names.map(|x| {
            let utf8 = x.prop_type() == PropType::Utf8String;
            (x, utf8)
        })
    }

    /// Get window desktop
    fn win_desktop(&self, win: xproto::Window) -> Option<u32> {
        // Defined as: _NET_WM_DESKTOP desktop, CARDINAL/32
        optional_value32(self.get_property_fallback(win, &property::WM_DESKTOP))
    }

    /// Get window pid
    fn win_pid(&self, win: xproto::Window) -> Option<u32> {
        // Defined as: _NET_WM_PID, CARDINAL/32
        optional_value32(self.get_property(win, "_NET_WM_PID", PropType::Cardinal))
    }

    /// Get the UTF-8 window name
    fn win_net_name(&self, win: xproto::Window) -> Option<Property> {
        // Defined as: _NET_WM_NAME, UTF8_STRING
        self.get_property(win, "_NET_WM_NAME", PropType::Utf8String)
    }

    /// Get the locale encoded ICCCM window name
    fn win_icccm_name(&self, win: xproto::Window) -> Option<Property> {
        // Defined as: WM_NAME, STRING
        self.get_property(win, "WM_NAME", PropType::String)
    }

    /// Get the name of the machine the window's client runs on
    fn win_client_machine(&self, win: xproto::Window) -> Option<Property> {
        // Defined as: WM_CLIENT_MACHINE, STRING
        self.get_property(win, "WM_CLIENT_MACHINE", PropType::String)
    }

    /// Request the window manager to switch to the given desktop
    fn switch_desktop(&self, desktop: u32) -> WindowManagerResult<()> {
        self.send_message(self.root(), MSG_CURRENT_DESKTOP, desktop)?;
        debug!("switch_desktop: desktop: {}", desktop);
        Ok(())
    }

    /// Request the window manager to activate the given window
    fn activate_win(&self, win: xproto::Window) -> WindowManagerResult<()> {
        self.send_message(win, MSG_ACTIVE_WINDOW, 0)?;
        debug!("activate_win: id: {}", win);
        Ok(())
    }

    /// Request the window manager to close the given window gracefully
    fn close_win(&self, win: xproto::Window) -> WindowManagerResult<()> {
        self.send_message(win, MSG_CLOSE_WINDOW, 0)?;
        debug!("close_win: id: {}", win);
        Ok(())
    }

    /// Request the window manager to move the given window to a desktop
    fn move_win_to_desktop(&self, win: xproto::Window, desktop: u32) -> WindowManagerResult<()> {
        self.send_message(win, MSG_WM_DESKTOP, desktop)?;
        debug!("move_win_to_desktop: id: {}, desktop: {}", win, desktop);
        Ok(())
    }
}

// Decode an optional 32bit property, a malformed value is treated like a missing one
fn optional_value32(prop: Option<Property>) -> Option<u32> {
    let prop = prop?;
    match prop.value32() {
        Ok(x) => Some(x),
        Err(err) => {
            debug!("{}", err);
            None
        },
    }
}

/// Window Manager control implements [`Backend`] on top of an x11rb connection. The connection
/// is opened once by [`WindowManager::connect`] and closed when the value is dropped.
pub struct WindowManager {
    conn: RustConnection,      // x11 connection
    atoms: AtomCollection,     // atom cache
    screen: usize,             // screen number
    root: u32,                 // root window id
}

impl WindowManager {
    /// Create the window manager control instance and connect to the X11 server
    pub fn connect() -> WindowManagerResult<Self> {
        let (conn, screen) = x11rb::connect(None)?;
        let root = conn.setup().roots[screen].root;

        debug!("caching atoms...");
        let atoms = AtomCollection::new(&conn)?.reply()?;

        debug!("connect: screen: {}, root: {}", screen, root);
        Ok(WindowManager { conn, atoms, screen, root })
    }

    /// Get the default screen number
    pub fn screen(&self) -> usize {
        self.screen
    }

    // Resolve a property or message name to its atom, interning names missing from the cache
    fn atom(&self, name: &str) -> WindowManagerResult<Atom> {
        match self.atoms.get(name) {
            Some(atom) => Ok(atom),
            None => Ok(self.conn.intern_atom(false, name.as_bytes())?.reply()?.atom),
        }
    }

    // Resolve the expected property type to its atom
    fn type_atom(&self, type_: PropType) -> Atom {
        match type_ {
            PropType::Cardinal => AtomEnum::CARDINAL.into(),
            PropType::String => AtomEnum::STRING.into(),
            PropType::Utf8String => self.atoms.UTF8_STRING,
            PropType::Window => AtomEnum::WINDOW.into(),
        }
    }

    fn _get_window_property(&self, win: xproto::Window, name: &str, type_: Atom) -> WindowManagerResult<GetPropertyReply> {
        let property = self.atom(name)?;
        Ok(self.conn.get_property(false, win, property, type_, 0, MAX_PROPERTY_VALUE_LEN / 4)?.reply()?)
    }

    fn _send_message(&self, msg: &ClientMessageEvent) -> WindowManagerResult<()> {
        let mask = EventMask::SUBSTRUCTURE_REDIRECT | EventMask::SUBSTRUCTURE_NOTIFY;
        self.conn.send_event(false, self.root, mask, msg)?.check()?;
        self.conn.flush()?;
        Ok(())
    }
}

impl Backend for WindowManager {
    fn root(&self) -> xproto::Window {
        self.root
    }

    fn get_property(&self, win: xproto::Window, name: &str, type_: PropType) -> Option<Property> {
        let expected = self.type_atom(type_);
        let reply = match self._get_window_property(win, name, expected) {
            Ok(reply) => reply,
            Err(err) => {
                debug!("Cannot get {} property: {}", name, err);
                return None;
            },
        };

        // A missing property comes back with type NONE
        if reply.type_ != expected {
            debug!("Invalid type of {} property.", name);
            return None;
        }
        trace!("get_property: id: {}, {}: format {}, {} bytes", win, name, reply.format, reply.value.len());
        Some(Property::new(name, type_, reply.value, reply.bytes_after > 0))
    }

    /// Send the event to the root window and flush so the request leaves before the process
    /// exits.
    fn send_message(&self, win: xproto::Window, message: &str, data: u32) -> WindowManagerResult<()> {
        let msg = ClientMessageEvent::new(32, win, self.atom(message)?, [data, 0, 0, 0, 0]);
        if let Err(err) = self._send_message(&msg) {
            debug!("send_message: {}: {}", message, err);
            return Err(WindowManagerError::SendEvent(message.to_owned()).into());
        }
        debug!("send_message: win: {}, {}: {}", win, message, data);
        Ok(())
    }
}

impl Drop for WindowManager {
    fn drop(&mut self) {
        debug!("closing display connection");
    }
}

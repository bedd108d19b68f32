//! Atom cache for every property and client message name `libewmh` touches.
use x11rb::protocol::xproto::Atom;

x11rb::atom_manager! {
    pub AtomCollection: AtomCollectionCookie {
        UTF8_STRING,
        WM_NAME,
        WM_CLIENT_MACHINE,
        _NET_ACTIVE_WINDOW,
        _NET_CLIENT_LIST,
        _NET_CLOSE_WINDOW,
        _NET_CURRENT_DESKTOP,
        _NET_DESKTOP_NAMES,
        _NET_NUMBER_OF_DESKTOPS,
        _NET_SUPPORTING_WM_CHECK,
        _NET_WM_DESKTOP,
        _NET_WM_NAME,
        _NET_WM_PID,
        _WIN_CLIENT_LIST,
        _WIN_SUPPORTING_WM_CHECK,
        _WIN_WORKSPACE,
        _WIN_WORKSPACE_COUNT,
        _WIN_WORKSPACE_NAMES,
    }
}

impl AtomCollection {
    /// Look up a cached atom by its name, `None` when the name was not cached up front
    pub fn get(&self, name: &str) -> Option<Atom> {
        let atom = match name {
            "UTF8_STRING" => self.UTF8_STRING,
            "WM_NAME" => self.WM_NAME,
            "WM_CLIENT_MACHINE" => self.WM_CLIENT_MACHINE,
            "_NET_ACTIVE_WINDOW" => self._NET_ACTIVE_WINDOW,
            "_NET_CLIENT_LIST" => self._NET_CLIENT_LIST,
            "_NET_CLOSE_WINDOW" => self._NET_CLOSE_WINDOW,
            "_NET_CURRENT_DESKTOP" => self._NET_CURRENT_DESKTOP,
            "_NET_DESKTOP_NAMES" => self._NET_DESKTOP_NAMES,
            "_NET_NUMBER_OF_DESKTOPS" => self._NET_NUMBER_OF_DESKTOPS,
            "_NET_SUPPORTING_WM_CHECK" => self._NET_SUPPORTING_WM_CHECK,
            "_NET_WM_DESKTOP" => self._NET_WM_DESKTOP,
            "_NET_WM_NAME" => self._NET_WM_NAME,
            "_NET_WM_PID" => self._NET_WM_PID,
            "_WIN_CLIENT_LIST" => self._WIN_CLIENT_LIST,
            "_WIN_SUPPORTING_WM_CHECK" => self._WIN_SUPPORTING_WM_CHECK,
            "_WIN_WORKSPACE" => self._WIN_WORKSPACE,
            "_WIN_WORKSPACE_COUNT" => self._WIN_WORKSPACE_COUNT,
            "_WIN_WORKSPACE_NAMES" => self._WIN_WORKSPACE_NAMES,
            _ => return None,
        };
        Some(atom)
    }
}

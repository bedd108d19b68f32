//! `libewmh` implements the client side of the [Extended Window Manager Hints (EWMH) specification](https://specifications.freedesktop.org/wm-spec/latest/)
//! needed to query and control EWMH compatible window managers. The EWHM spec builds on the lower
//! level Inter Client Communication Conventions Manual (ICCCM) to define interactions between
//! window managers, compositing managers and applications.
//!
//! [Root Window Properties](https://specifications.freedesktop.org/wm-spec/latest/ar01s03.html)
//! The EWMH spec defines a number of properties that EWHM compliant window managers will maintain
//! and return to clients requesting information. `libewmh` reads those properties, falling back
//! on the older GNOME `_WIN_*` hints where a window manager only provides those, and sends the
//! client messages that switch desktops and activate, close or move windows.
//!
//! `wmctrl` uses `libewmh` to list windows and desktops and to act on them from the command line;
//! however `libewmh` could be used for a variety of reasons.
mod atoms;
mod charset;
mod error;
mod model;
mod property;
#[cfg(test)]
mod testing;
pub mod window;
mod wm;
pub use charset::*;
pub use error::*;
pub use model::*;
pub use property::*;
pub use wm::{Backend, WindowManager, MSG_ACTIVE_WINDOW, MSG_CLOSE_WINDOW, MSG_CURRENT_DESKTOP, MSG_WM_DESKTOP};

/// All essential symbols in a simple consumable form
///
/// ### Examples
/// ```
/// use libewmh::prelude::*;
/// ```
pub mod prelude {
    pub use crate::*;
}

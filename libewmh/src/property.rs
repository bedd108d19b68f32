//! Owned window property values and the typed decoders used to read them.
//!
//! The EWMH spec stores most of its state as properties on the root window or on client windows.
//! A [`Property`] is the raw payload of one `GetProperty` reply that matched the requested type.
//! It is released when dropped and is decoded on demand into window ids, a single cardinal or
//! text.
use std::fmt;

use tracing::debug;
use x11rb::protocol::xproto;

use crate::{WindowManagerError, WindowManagerResult};

/// Maximum number of bytes requested for a single property value. Longer values are cut off
/// at this size and flagged as truncated.
pub const MAX_PROPERTY_VALUE_LEN: u32 = 4096;

/// PropType identifies the type a property is expected to have. A reply of any other type is
/// treated as if the property was absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropType {
    Cardinal,
    String,
    Utf8String,
    Window,
}

// Implement format! support
impl fmt::Display for PropType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            PropType::Cardinal => write!(f, "CARDINAL"),
            PropType::String => write!(f, "STRING"),
            PropType::Utf8String => write!(f, "UTF8_STRING"),
            PropType::Window => write!(f, "WINDOW"),
        }
    }
}

/// A modern EWMH property paired with the legacy GNOME hint that older window managers expose
/// instead. The legacy name is only consulted when the modern one is absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fallback {
    pub modern: (&'static str, PropType),
    pub legacy: (&'static str, PropType),
}

impl Fallback {
    /// Both property names joined for diagnostics e.g. `_NET_CLIENT_LIST or _WIN_CLIENT_LIST`
    pub fn names(&self) -> String {
        format!("{} or {}", self.modern.0, self.legacy.0)
    }
}

pub const SUPPORTING_WM_CHECK: Fallback = Fallback {
    modern: ("_NET_SUPPORTING_WM_CHECK", PropType::Window),
    legacy: ("_WIN_SUPPORTING_WM_CHECK", PropType::Cardinal),
};
pub const CLIENT_LIST: Fallback = Fallback {
    modern: ("_NET_CLIENT_LIST", PropType::Window),
    legacy: ("_WIN_CLIENT_LIST", PropType::Cardinal),
};
pub const NUMBER_OF_DESKTOPS: Fallback = Fallback {
    modern: ("_NET_NUMBER_OF_DESKTOPS", PropType::Cardinal),
    legacy: ("_WIN_WORKSPACE_COUNT", PropType::Cardinal),
};
pub const CURRENT_DESKTOP: Fallback = Fallback {
    modern: ("_NET_CURRENT_DESKTOP", PropType::Cardinal),
    legacy: ("_WIN_WORKSPACE", PropType::Cardinal),
};
pub const WM_DESKTOP: Fallback = Fallback {
    modern: ("_NET_WM_DESKTOP", PropType::Cardinal),
    legacy: ("_WIN_WORKSPACE", PropType::Cardinal),
};
pub const DESKTOP_NAMES: Fallback = Fallback {
    modern: ("_NET_DESKTOP_NAMES", PropType::Utf8String),
    legacy: ("_WIN_WORKSPACE_NAMES", PropType::String),
};

/// Property is the owned value of a single property fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Property {
    name: String,
    type_: PropType,
    value: Vec<u8>,
    truncated: bool,
}

impl Property {
    /// Create a new property value
    ///
    /// ### Arguments
    /// * `name` - name of the property the value was read from
    /// * `type_` - type the value was verified to have
    /// * `value` - raw payload bytes
    /// * `truncated` - true when the server had more data beyond [`MAX_PROPERTY_VALUE_LEN`]
    pub fn new<T: Into<String>>(name: T, type_: PropType, value: Vec<u8>, truncated: bool) -> Self {
        let name = name.into();
        if truncated {
            debug!("Property {} was truncated to {} bytes.", name, value.len());
        }
        Self { name, type_, value, truncated }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn prop_type(&self) -> PropType {
        self.type_
    }

    /// Length of the raw payload in bytes
    pub fn len(&self) -> usize {
        self.value.len()
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    /// True when the value was cut off at [`MAX_PROPERTY_VALUE_LEN`] bytes
    pub fn truncated(&self) -> bool {
        self.truncated
    }

    /// Raw payload bytes
    pub fn bytes(&self) -> &[u8] {
        &self.value
    }

    /// Payload up to the first null byte, the way a C string reads it
    pub fn text(&self) -> &[u8] {
        match self.value.iter().position(|x| *x == 0) {
            Some(i) => &self.value[..i],
            None => &self.value,
        }
    }

    /// Decode the payload as a list of 32bit values e.g. a list of window ids
    pub fn values32(&self) -> WindowManagerResult<Vec<u32>> {
        if self.value.len() % 4 != 0 {
            return Err(self.length_error());
        }
        Ok(self.value.chunks_exact(4).map(|x| u32::from_ne_bytes([x[0], x[1], x[2], x[3]])).collect())
    }

    /// Decode the payload as a single 32bit value. Only the first value is used when more
    /// are present.
    pub fn value32(&self) -> WindowManagerResult<u32> {
        self.values32()?.first().copied().ok_or_else(|| self.length_error())
    }

    /// Decode the payload as a list of window ids
    pub fn windows(&self) -> WindowManagerResult<Vec<xproto::Window>> {
        self.values32()
    }

    fn length_error(&self) -> crate::ErrorWrapper {
        WindowManagerError::PropertyLength { name: self.name.clone(), len: self.value.len() }.into()
    }
}

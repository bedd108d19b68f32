use std::error::Error as StdError;
use std::fmt;

/// `WindowManagerResult<T>` provides a simplified result type with a common error type
pub type WindowManagerResult<T> = std::result::Result<T, ErrorWrapper>;

/// WindowManagerError defines all the internal errors that `libewmh` might return
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum WindowManagerError {
    InvalidDesktop(String),
    InvalidWindowId(String),
    PropertyLength { name: String, len: usize },
    PropertyNotFound(String),
    SendEvent(String),
    WindowNotFound(String),
}
impl std::error::Error for WindowManagerError {}
impl fmt::Display for WindowManagerError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            WindowManagerError::InvalidDesktop(ref err) => write!(f, "Invalid desktop ID: {}", err),
            WindowManagerError::InvalidWindowId(ref err) => {
                write!(f, "Cannot convert argument to number: {}", err)
            },
            WindowManagerError::PropertyLength { ref name, len } => {
                write!(f, "Invalid length of {} property: {} bytes", name, len)
            },
            WindowManagerError::PropertyNotFound(ref err) => write!(f, "Cannot get {} properties.", err),
            WindowManagerError::SendEvent(ref err) => write!(f, "Cannot send {} event.", err),
            WindowManagerError::WindowNotFound(ref err) => write!(f, "No window matches: {}", err),
        }
    }
}

/// ErrorWrapper provides wrapper around all the underlying library dependencys that `libewmh` uses
/// such that we can easily surface all errors from `libewmh` in a single easy way.
#[derive(Debug)]
pub enum ErrorWrapper {
    WindowManager(WindowManagerError),

    // std::io::Error from writing output
    Io(std::io::Error),

    // x11rb errors
    Connect(x11rb::errors::ConnectError),
    Connection(x11rb::errors::ConnectionError),
    Reply(x11rb::errors::ReplyError),
}
impl ErrorWrapper {
    /// Implemented directly on the `Error` type to reduce casting required
    pub fn is<T: StdError + 'static>(&self) -> bool {
        self.as_ref().is::<T>()
    }

    /// Implemented directly on the `Error` type to reduce casting required
    pub fn downcast_ref<T: StdError + 'static>(&self) -> Option<&T> {
        self.as_ref().downcast_ref::<T>()
    }
}
impl StdError for ErrorWrapper {}

impl fmt::Display for ErrorWrapper {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            ErrorWrapper::WindowManager(ref err) => write!(f, "{}", err),
            ErrorWrapper::Io(ref err) => write!(f, "{}", err),
            ErrorWrapper::Connect(ref err) => write!(f, "Cannot open display: {}", err),
            ErrorWrapper::Connection(ref err) => write!(f, "{}", err),
            ErrorWrapper::Reply(ref err) => write!(f, "{}", err),
        }
    }
}

impl AsRef<dyn StdError> for ErrorWrapper {
    fn as_ref(&self) -> &(dyn StdError + 'static) {
        match *self {
            ErrorWrapper::WindowManager(ref err) => err,
            ErrorWrapper::Io(ref err) => err,
            ErrorWrapper::Connect(ref err) => err,
            ErrorWrapper::Connection(ref err) => err,
            ErrorWrapper::Reply(ref err) => err,
        }
    }
}

impl From<WindowManagerError> for ErrorWrapper {
    fn from(err: WindowManagerError) -> ErrorWrapper {
        ErrorWrapper::WindowManager(err)
    }
}

impl From<std::io::Error> for ErrorWrapper {
    fn from(err: std::io::Error) -> ErrorWrapper {
        ErrorWrapper::Io(err)
    }
}

// x11rb errors
//--------------------------------------------------------------------------------------------------
impl From<x11rb::errors::ConnectError> for ErrorWrapper {
    fn from(err: x11rb::errors::ConnectError) -> ErrorWrapper {
        ErrorWrapper::Connect(err)
    }
}

impl From<x11rb::errors::ConnectionError> for ErrorWrapper {
    fn from(err: x11rb::errors::ConnectionError) -> ErrorWrapper {
        ErrorWrapper::Connection(err)
    }
}

impl From<x11rb::errors::ReplyError> for ErrorWrapper {
    fn from(err: x11rb::errors::ReplyError) -> ErrorWrapper {
        ErrorWrapper::Reply(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_errors() {
        let err: ErrorWrapper = WindowManagerError::PropertyNotFound("_NET_CLIENT_LIST or _WIN_CLIENT_LIST".into()).into();
        assert!(err.is::<WindowManagerError>());
        assert_eq!(err.to_string(), "Cannot get _NET_CLIENT_LIST or _WIN_CLIENT_LIST properties.");
        assert_eq!(
            err.downcast_ref::<WindowManagerError>(),
            Some(&WindowManagerError::PropertyNotFound("_NET_CLIENT_LIST or _WIN_CLIENT_LIST".into()))
        );

        let err = WindowManagerError::SendEvent("_NET_CLOSE_WINDOW".into());
        assert_eq!(err.to_string(), "Cannot send _NET_CLOSE_WINDOW event.");
    }
}

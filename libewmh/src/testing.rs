//! In memory [`Backend`] recording every request the handlers make, plus log capture
use std::{
    cell::RefCell,
    collections::HashMap,
    io,
    sync::{Arc, Mutex},
};

use x11rb::protocol::xproto;

use crate::{Backend, PropType, Property, WindowManagerError, WindowManagerResult};

pub const ROOT: xproto::Window = 1;

#[derive(Default)]
pub struct MockBackend {
    props: HashMap<(xproto::Window, String), (PropType, Vec<u8>)>,
    fail_messages: Vec<String>,
    requests: RefCell<Vec<(xproto::Window, String)>>,
    sent: RefCell<Vec<(xproto::Window, String, u32)>>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_bytes(mut self, win: xproto::Window, name: &str, type_: PropType, value: Vec<u8>) -> Self {
        self.props.insert((win, name.to_owned()), (type_, value));
        self
    }

    pub fn with_cardinals(self, win: xproto::Window, name: &str, values: &[u32]) -> Self {
        self.with_bytes(win, name, PropType::Cardinal, values.iter().flat_map(|x| x.to_ne_bytes()).collect())
    }

    pub fn with_windows(self, win: xproto::Window, name: &str, values: &[u32]) -> Self {
        self.with_bytes(win, name, PropType::Window, values.iter().flat_map(|x| x.to_ne_bytes()).collect())
    }

    pub fn with_utf8(self, win: xproto::Window, name: &str, value: &str) -> Self {
        self.with_bytes(win, name, PropType::Utf8String, value.as_bytes().to_vec())
    }

    pub fn with_string(self, win: xproto::Window, name: &str, value: &[u8]) -> Self {
        self.with_bytes(win, name, PropType::String, value.to_vec())
    }

    /// Make every send of the given message fail
    pub fn failing(mut self, message: &str) -> Self {
        self.fail_messages.push(message.to_owned());
        self
    }

    pub fn requests(&self) -> Vec<(xproto::Window, String)> {
        self.requests.borrow().clone()
    }

    pub fn sent(&self) -> Vec<(xproto::Window, String, u32)> {
        self.sent.borrow().clone()
    }
}

impl Backend for MockBackend {
    fn root(&self) -> xproto::Window {
        ROOT
    }

    fn get_property(&self, win: xproto::Window, name: &str, type_: PropType) -> Option<Property> {
        self.requests.borrow_mut().push((win, name.to_owned()));
        match self.props.get(&(win, name.to_owned())) {
            Some((actual, value)) if *actual == type_ => Some(Property::new(name, type_, value.clone(), false)),
            _ => None,
        }
    }

    fn send_message(&self, win: xproto::Window, message: &str, data: u32) -> WindowManagerResult<()> {
        if self.fail_messages.iter().any(|x| x == message) {
            return Err(WindowManagerError::SendEvent(message.to_owned()).into());
        }
        self.sent.borrow_mut().push((win, message.to_owned(), data));
        Ok(())
    }
}

// Log output collected by `capture_logs`
#[derive(Clone, Default)]
struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Run `f` with a subscriber recording every event of the current thread, returning its result
/// along with the formatted log lines
pub fn capture_logs<R>(f: impl FnOnce() -> R) -> (R, String) {
    let logs = LogBuffer::default();
    let writer = logs.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_ansi(false)
        .without_time()
        .with_writer(move || writer.clone())
        .finish();
    let result = tracing::subscriber::with_default(subscriber, f);
    let text = String::from_utf8_lossy(&logs.0.lock().unwrap()).into_owned();
    (result, text)
}

//! Charset handling for text read from and written to the terminal.
//!
//! EWMH names (`_NET_WM_NAME`, `_NET_DESKTOP_NAMES`) are UTF-8 while the ICCCM `STRING`
//! properties and the user's terminal use the locale charset. [`Charset`] is detected once at
//! startup and converts between the two so titles display and match correctly.
use std::borrow::Cow;

use tracing::debug;

/// Codeset of the current locale. The common ones are converted directly, any other one goes
/// through iconv by name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Codeset {
    Ascii,
    Latin1,
    Utf8,
    Other(String),
}

impl Codeset {
    /// Classify a codeset name as reported by `nl_langinfo(CODESET)`. Names are compared
    /// ignoring case, dashes and underscores so `ISO-8859-1` and `iso8859_1` are the same while
    /// `ISO-8859-15` is not.
    pub fn from_name(name: &str) -> Codeset {
        let normalized: String =
            name.chars().filter(|x| !matches!(x, '-' | '_')).map(|x| x.to_ascii_uppercase()).collect();
        match normalized.as_str() {
            "UTF8" => Codeset::Utf8,
            "ISO88591" | "ISO88591:1987" | "LATIN1" | "L1" | "IBM819" | "CP819" => Codeset::Latin1,
            "" | "ANSIX3.41968" | "ANSIX3.41986" | "ASCII" | "USASCII" | "ISO646US" | "646" | "C" | "POSIX" => {
                Codeset::Ascii
            },
            _ => Codeset::Other(name.to_owned()),
        }
    }
}

/// Charset captures whether the environment is UTF-8 along with the locale codeset used for
/// conversions. It never changes after detection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Charset {
    utf8: bool,
    locale: Codeset,
}

impl Charset {
    /// Detect the charset of the invoking environment
    ///
    /// ### Arguments
    /// * `force_utf8` - assume UTF-8 regardless of what the environment says
    pub fn detect(force_utf8: bool) -> Charset {
        let system = system_codeset();
        let lc_ctype = std::env::var("LC_CTYPE").ok();
        let lang = std::env::var("LANG").ok();
        let charset = Charset::from_env(system.as_deref(), lc_ctype.as_deref(), lang.as_deref(), force_utf8);
        debug!("envir_utf8: {}, locale codeset: {:?}", charset.utf8, charset.locale);
        charset
    }

    /// Decide the charset from the system codeset followed by the `LC_CTYPE` and `LANG`
    /// variables. Any of them naming UTF-8 makes the environment UTF-8.
    pub fn from_env(system: Option<&str>, lc_ctype: Option<&str>, lang: Option<&str>, force_utf8: bool) -> Charset {
        let locale = system.map(Codeset::from_name).unwrap_or(Codeset::Ascii);
        let utf8 = force_utf8
            || locale == Codeset::Utf8
            || lc_ctype.map(is_utf8_name).unwrap_or(false)
            || lang.map(is_utf8_name).unwrap_or(false);
        Charset { utf8, locale }
    }

    /// Create a charset directly, mostly useful for testing
    pub fn new(utf8: bool, locale: Codeset) -> Charset {
        Charset { utf8, locale }
    }

    pub fn is_utf8(&self) -> bool {
        self.utf8
    }

    pub fn locale(&self) -> &Codeset {
        &self.locale
    }

    /// Prepare text for output in the environment's charset. Failed conversions fall back to
    /// the raw text.
    ///
    /// ### Arguments
    /// * `text` - text to convert, `None` stays `None`
    /// * `is_utf8` - true when `text` is UTF-8, false when it is in the locale charset
    pub fn to_display<'a>(&self, text: Option<&'a [u8]>, is_utf8: bool) -> Option<Cow<'a, [u8]>> {
        let text = text?;
        Some(match (self.utf8, is_utf8) {
            (true, false) => match self.locale_to_utf8(text) {
                Some(out) => Cow::Owned(out.into_bytes()),
                None => {
                    debug!("Cannot convert string from locale charset to UTF-8.");
                    Cow::Borrowed(text)
                },
            },
            (false, true) => match std::str::from_utf8(text).ok().and_then(|x| self.utf8_to_locale(x)) {
                Some(out) => Cow::Owned(out),
                None => {
                    debug!("Cannot convert string from UTF-8 to locale charset.");
                    Cow::Borrowed(text)
                },
            },
            _ => Cow::Borrowed(text),
        })
    }

    /// Convert locale encoded text to UTF-8, `None` when the text can't be represented
    pub fn locale_to_utf8(&self, text: &[u8]) -> Option<String> {
        match &self.locale {
            Codeset::Utf8 => std::str::from_utf8(text).ok().map(str::to_owned),
            Codeset::Latin1 => Some(text.iter().map(|x| char::from(*x)).collect()),
            Codeset::Ascii if text.is_ascii() => Some(text.iter().map(|x| char::from(*x)).collect()),
            Codeset::Ascii => None,
            Codeset::Other(name) => iconv::convert(name, "UTF-8", text).and_then(|x| String::from_utf8(x).ok()),
        }
    }

    /// Convert UTF-8 text to the locale charset, `None` when a character has no equivalent
    pub fn utf8_to_locale(&self, text: &str) -> Option<Vec<u8>> {
        match &self.locale {
            Codeset::Utf8 => Some(text.as_bytes().to_vec()),
            Codeset::Latin1 => text.chars().map(|x| u8::try_from(u32::from(x)).ok()).collect(),
            Codeset::Ascii if text.is_ascii() => Some(text.as_bytes().to_vec()),
            Codeset::Ascii => None,
            Codeset::Other(name) => iconv::convert("UTF-8", name, text.as_bytes()),
        }
    }
}

fn is_utf8_name(name: &str) -> bool {
    let upper = name.to_ascii_uppercase();
    upper.contains("UTF8") || upper.contains("UTF-8")
}

/// Query the codeset of the locale configured in the environment
#[cfg(unix)]
fn system_codeset() -> Option<String> {
    use std::ffi::CStr;

    // SAFETY: runs once during startup before anything else reads the locale; the pointer
    // returned by nl_langinfo is copied out immediately.
    unsafe {
        libc::setlocale(libc::LC_CTYPE, b"\0".as_ptr() as *const libc::c_char);
        let codeset = libc::nl_langinfo(libc::CODESET);
        if codeset.is_null() {
            return None;
        }
        Some(CStr::from_ptr(codeset).to_string_lossy().into_owned())
    }
}

#[cfg(not(unix))]
fn system_codeset() -> Option<String> {
    None
}

/// Conversion between arbitrary codesets using the C library's iconv
#[cfg(any(target_os = "linux", target_os = "macos", target_os = "freebsd"))]
mod iconv {
    use std::{ffi::CString, io, ptr};

    use tracing::debug;

    // Conversion descriptor, closed on drop
    struct Iconv(libc::iconv_t);

    impl Iconv {
        fn open(from: &str, to: &str) -> Option<Iconv> {
            let from_c = CString::new(from).ok()?;
            let to_c = CString::new(to).ok()?;

            // SAFETY: both names are valid null terminated strings
            let cd = unsafe { libc::iconv_open(to_c.as_ptr(), from_c.as_ptr()) };
            if cd as isize == -1 {
                debug!("Cannot open conversion from {} to {}.", from, to);
                return None;
            }
            Some(Iconv(cd))
        }

        fn convert(&self, input: &[u8]) -> Option<Vec<u8>> {
            let mut out = vec![0u8; input.len() * 4 + 16];
            let mut written = 0;
            let mut inptr = input.as_ptr() as *mut libc::c_char;
            let mut inleft = input.len();
            let mut flushing = false;
            loop {
                let mut outptr = out[written..].as_mut_ptr() as *mut libc::c_char;
                let mut outleft = out.len() - written;

                // SAFETY: the pointers and lengths describe live buffers and iconv never writes
                // through the input pointer. A null input flushes any pending shift state.
                let res = unsafe {
                    if flushing {
                        libc::iconv(self.0, ptr::null_mut(), ptr::null_mut(), &mut outptr, &mut outleft)
                    } else {
                        libc::iconv(self.0, &mut inptr, &mut inleft, &mut outptr, &mut outleft)
                    }
                };
                written = out.len() - outleft;
                if res == usize::MAX {
                    match io::Error::last_os_error().raw_os_error() {
                        Some(libc::E2BIG) => {
                            let len = out.len();
                            out.resize(len * 2, 0);
                            continue;
                        },
                        _ => return None,
                    }
                }
                if flushing {
                    break;
                }
                flushing = true;
            }
            out.truncate(written);
            Some(out)
        }
    }

    impl Drop for Iconv {
        fn drop(&mut self) {
            // SAFETY: the descriptor came from a successful iconv_open and is closed once
            unsafe {
                libc::iconv_close(self.0);
            }
        }
    }

    /// Convert `input` from codeset `from` to codeset `to`, `None` when either codeset is
    /// unknown or the input can't be represented
    pub fn convert(from: &str, to: &str, input: &[u8]) -> Option<Vec<u8>> {
        Iconv::open(from, to)?.convert(input)
    }
}

#[cfg(not(any(target_os = "linux", target_os = "macos", target_os = "freebsd")))]
mod iconv {
    pub fn convert(_from: &str, _to: &str, _input: &[u8]) -> Option<Vec<u8>> {
        None
    }
}

use std::error::Error;
use std::fmt::{Display, Formatter};

use crate::error::XmlError::*;

/// Error raised by user code inside an enter, data, exit or grabber callback.
pub type CallbackError = Box<dyn Error + Send + Sync>;

pub type CallbackResult = Result<(), CallbackError>;

#[derive(Debug)]
pub enum XmlError {
    /// The tokenizer could not produce the next event.
    Token(xmlparser::Error),
    /// Character data or an attribute value holds an unknown or illegal reference.
    UnknownReference { reference: String },
    /// Strict mode only: `child` is not declared below `parent`.
    UnexpectedTransition { parent: String, child: String },
    /// A close tag does not match the innermost open tag.
    UnexpectedTag { closing: String, current: String },
    /// The input ended inside an element.
    UnexpectedEndOfFile { tag: String },
    Callback(CallbackError),
    Io(std::io::Error),
    Encoding(std::str::Utf8Error),
    Decode(roxmltree::Error),
    Panicked(String),
}

impl Display for XmlError {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        match self {
            Token(err) => write!(f, "token error: {}", err),
            UnknownReference { reference } => write!(f, "unknown reference: {}", reference),
            UnexpectedTransition { parent, child } => write!(f, "unexpected transition: {}.{}", parent, child),
            UnexpectedTag { closing, current } => write!(f, "unexpected tag: closing {} in {}", closing, current),
            UnexpectedEndOfFile { tag } => write!(f, "unexpected end of file inside {}", tag),
            Callback(err) => write!(f, "{}", err),
            Io(err) => write!(f, "io error: {}", err),
            Encoding(err) => write!(f, "encoding error: {}", err),
            Decode(err) => write!(f, "decode error: {}", err),
            Panicked(message) => write!(f, "processing panicked: {}", message),
        }
    }
}

impl Error for XmlError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Token(err) => Some(err),
            Callback(err) => Some(err.as_ref()),
            Io(err) => Some(err),
            Encoding(err) => Some(err),
            Decode(err) => Some(err),
            _ => None,
        }
    }
}

impl XmlError {
    /// The piece of input the error points at: the offending tag name or reference.
    pub fn get_target(&self) -> String {
        match self {
            UnknownReference { reference } => reference.to_string(),
            UnexpectedTransition { child, .. } => child.to_string(),
            UnexpectedTag { closing, .. } => closing.to_string(),
            UnexpectedEndOfFile { tag } => tag.to_string(),
            _ => self.to_string(),
        }
    }
}

impl From<xmlparser::Error> for XmlError {
    fn from(err: xmlparser::Error) -> Self {
        Token(err)
    }
}

impl From<std::io::Error> for XmlError {
    fn from(err: std::io::Error) -> Self {
        Io(err)
    }
}

impl From<std::str::Utf8Error> for XmlError {
    fn from(err: std::str::Utf8Error) -> Self {
        Encoding(err)
    }
}

impl From<roxmltree::Error> for XmlError {
    fn from(err: roxmltree::Error) -> Self {
        Decode(err)
    }
}

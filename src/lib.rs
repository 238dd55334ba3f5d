pub mod error;
pub mod token;
pub mod tokenstream;
pub mod handler;
pub mod element;
pub mod stream_parser;
pub mod reader;
pub mod grabber;

mod xmlchar;
mod unescape;

pub use element::{ElementId, TagTree};
pub use error::{CallbackError, CallbackResult, XmlError};
pub use handler::XmlStreamHandler;
pub use reader::{parse_bytes, parse_file, parse_reader, parse_str};
pub use stream_parser::{Mode, StreamParser};

use std::any::Any;
use std::fs::File;
use std::io::Read;
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;

use crate::error::XmlError;
use crate::handler::XmlStreamHandler;
use crate::tokenstream::TokenStream;

/// Feed every event of `xml` to `handler`, stopping at the first error.
pub fn parse_str<H: XmlStreamHandler + ?Sized>(xml: &str, handler: &mut H) -> Result<(), XmlError> {
    let mut stream = TokenStream::from(xml);
    while let Some(token) = stream.next_token()? {
        log::trace!("{:?}", token);
        handler.process_token(&token)?;
    }
    Ok(())
}

pub fn parse_bytes<H: XmlStreamHandler + ?Sized>(xml: &[u8], handler: &mut H) -> Result<(), XmlError> {
    parse_str(std::str::from_utf8(xml)?, handler)
}

/// Read the whole of `reader` into memory, then parse it.
pub fn parse_reader<R: Read, H: XmlStreamHandler + ?Sized>(mut reader: R, handler: &mut H) -> Result<(), XmlError> {
    let mut xml = String::new();
    reader.read_to_string(&mut xml)?;
    parse_str(&xml, handler)
}

/// Parse the file at `path`. The file is closed before any event is dispatched, and a panic
/// inside the handler is reported as [XmlError::Panicked].
pub fn parse_file<P: AsRef<Path>, H: XmlStreamHandler + ?Sized>(path: P, handler: &mut H) -> Result<(), XmlError> {
    let path = path.as_ref();
    let xml = read_file(path)?;
    guarded(path, || parse_str(&xml, handler))
}

pub(crate) fn read_file(path: &Path) -> Result<String, XmlError> {
    let path = path.canonicalize()?;
    let mut file = File::open(&path)?;
    let mut xml = String::new();
    file.read_to_string(&mut xml)?;
    Ok(xml)
}

pub(crate) fn guarded<F>(path: &Path, run: F) -> Result<(), XmlError>
where
    F: FnOnce() -> Result<(), XmlError>,
{
    match panic::catch_unwind(AssertUnwindSafe(run)) {
        Ok(result) => result,
        Err(payload) => {
            let message = panic_message(payload.as_ref());
            log::error!("processing {} panicked: {}", path.display(), message);
            Err(XmlError::Panicked(message))
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}

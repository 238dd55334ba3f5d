use std::borrow::Cow;

use crate::error::XmlError;
use crate::xmlchar::XmlChar;

/// Replace predefined entity and character references in `text`.
/// Text without any `&` is returned borrowed.
pub fn unescape(text: &str) -> Result<Cow<'_, str>, XmlError> {
    if !text.contains('&') {
        return Ok(Cow::Borrowed(text));
    }
    let mut decoded = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(amp) = rest.find('&') {
        decoded.push_str(&rest[..amp]);
        let after = &rest[amp + 1..];
        let semi = match after.find(';') {
            Some(semi) => semi,
            None => return Err(XmlError::UnknownReference { reference: rest[amp..].to_string() }),
        };
        let reference = &after[..semi];
        match decode_reference(reference) {
            Some(c) => decoded.push(c),
            None => return Err(XmlError::UnknownReference { reference: format!("&{};", reference) }),
        }
        rest = &after[semi + 1..];
    }
    decoded.push_str(rest);
    Ok(Cow::Owned(decoded))
}

/// Reference ::= EntityRef | CharRef
/// [https://www.w3.org/TR/xml/#sec-references]
fn decode_reference(reference: &str) -> Option<char> {
    match reference {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        _ => {
            let code = if let Some(hex) = reference.strip_prefix("#x") {
                u32::from_str_radix(hex, 16).ok()?
            } else if let Some(dec) = reference.strip_prefix('#') {
                dec.parse::<u32>().ok()?
            } else {
                return None;
            };
            let c = char::from_u32(code)?;
            if c.is_xml_char() { Some(c) } else { None }
        }
    }
}

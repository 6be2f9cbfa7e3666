//! Response charset normalization.

use std::borrow::Cow;

use encoding_rs::{Encoding, UTF_8};
use tracing::debug;

use crate::{Error, Result};

/// Transcode a response body to UTF-8 according to its declared charset.
///
/// UTF-8, missing and unknown labels pass the bytes through untouched. Bytes
/// that are malformed in a legacy charset yield [`Error::Serialization`].
///
/// ```
/// use coax_core::to_utf8;
///
/// // "中" in GBK
/// let utf8 = to_utf8(&[0xD6, 0xD0], Some("gbk")).expect("valid gbk");
/// assert_eq!(utf8.as_ref(), "中".as_bytes());
/// ```
pub fn to_utf8<'a>(bytes: &'a [u8], encoding: Option<&str>) -> Result<Cow<'a, [u8]>> {
    let Some(label) = encoding.map(str::trim).filter(|label| !label.is_empty()) else {
        return Ok(Cow::Borrowed(bytes));
    };
    let Some(encoding) = Encoding::for_label(label.as_bytes()) else {
        debug!(charset = label, "unknown charset, assuming UTF-8");
        return Ok(Cow::Borrowed(bytes));
    };
    if encoding == UTF_8 {
        return Ok(Cow::Borrowed(bytes));
    }

    let text = encoding
        .decode_without_bom_handling_and_without_replacement(bytes)
        .ok_or_else(|| {
            debug!(charset = encoding.name(), "malformed response body");
            Error::Serialization
        })?;
    Ok(match text {
        Cow::Borrowed(text) => Cow::Borrowed(text.as_bytes()),
        Cow::Owned(text) => Cow::Owned(text.into_bytes()),
    })
}

/// Extract the `charset` parameter of a `Content-Type` header value.
///
/// ```
/// use coax_core::charset_of;
///
/// assert_eq!(charset_of("text/html; charset=\"GBK\""), Some("GBK"));
/// assert_eq!(charset_of("application/json"), None);
/// ```
#[must_use]
pub fn charset_of(content_type: &str) -> Option<&str> {
    content_type.split(';').skip(1).find_map(|param| {
        let (name, value) = param.split_once('=')?;
        name.trim()
            .eq_ignore_ascii_case("charset")
            .then(|| value.trim().trim_matches('"'))
            .filter(|value| !value.is_empty())
    })
}

#[cfg(test)]
mod tests {
    use assert2::{check, let_assert};

    use super::*;

    #[test]
    fn utf8_passes_through() {
        let_assert!(Ok(Cow::Borrowed(bytes)) = to_utf8(b"{}", None));
        check!(bytes == b"{}");

        let_assert!(Ok(Cow::Borrowed(_)) = to_utf8(b"{}", Some("utf-8")));
        let_assert!(Ok(Cow::Borrowed(_)) = to_utf8(b"{}", Some("x-made-up")));
        let_assert!(Ok(Cow::Borrowed(_)) = to_utf8(b"{}", Some("  ")));
    }

    #[test]
    fn gbk_is_transcoded() {
        // {"m":"中文"} in GBK
        let gbk = [
            b'{', b'"', b'm', b'"', b':', b'"', 0xD6, 0xD0, 0xCE, 0xC4, b'"', b'}',
        ];
        let_assert!(Ok(utf8) = to_utf8(&gbk, Some("GBK")));
        check!(std::str::from_utf8(&utf8) == Ok(r#"{"m":"中文"}"#));
    }

    #[test]
    fn gb18030_and_latin1() {
        let_assert!(Ok(utf8) = to_utf8(&[0xD6, 0xD0], Some("gb18030")));
        check!(utf8.as_ref() == "中".as_bytes());

        let_assert!(Ok(utf8) = to_utf8(&[0xE9], Some("iso-8859-1")));
        check!(utf8.as_ref() == "é".as_bytes());
    }

    #[test]
    fn malformed_legacy_bytes_fail() {
        let_assert!(Err(Error::Serialization) = to_utf8(&[0x81], Some("gbk")));
    }

    #[test]
    fn content_type_charset() {
        check!(charset_of("application/json; charset=utf-8") == Some("utf-8"));
        check!(charset_of("text/plain;Charset=GBK") == Some("GBK"));
        check!(charset_of("text/plain; boundary=x; charset=\"gb2312\"") == Some("gb2312"));
        check!(charset_of("text/plain; charset=") == None);
        check!(charset_of("application/json") == None);
    }
}

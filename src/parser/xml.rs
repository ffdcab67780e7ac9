//! Small helpers over quick-xml events.
//!
//! Package parts use namespace prefixes that vary between producers, so
//! element and attribute matching is done on local names.

use quick_xml::events::BytesStart;

/// Value of the first attribute whose local name is `local`.
pub(crate) fn attr(e: &BytesStart<'_>, local: &[u8]) -> Option<String> {
    e.attributes()
        .filter_map(|a| a.ok())
        .find(|a| a.key.local_name().as_ref() == local)
        .and_then(|a| a.unescape_value().ok().map(|v| v.into_owned()))
}

/// Value of the first prefixed attribute whose local name is `local`.
///
/// Used where an unprefixed attribute of the same local name means
/// something else (e.g. `r:id` vs. a plain `id`).
pub(crate) fn prefixed_attr(e: &BytesStart<'_>, local: &[u8]) -> Option<String> {
    e.attributes()
        .filter_map(|a| a.ok())
        .find(|a| a.key.prefix().is_some() && a.key.local_name().as_ref() == local)
        .and_then(|a| a.unescape_value().ok().map(|v| v.into_owned()))
}

/// Strip a UTF-8 byte order mark.
pub(crate) fn strip_bom(data: &[u8]) -> &[u8] {
    data.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(data)
}

//! URI helpers.
//!
//! Previews identify documents by URI strings. These helpers cover the little URI handling the
//! preview needs: `file://` URIs for sheet paths, path extraction for context values, joining
//! relative sheet locations and rebasing URIs after a folder rename.

use percent_encoding::{AsciiSet, CONTROLS, percent_decode_str, utf8_percent_encode};
use url::Url;

/// Bytes escaped in a relative path before it is joined. `/` and `%` pass through.
const RELATIVE_PATH: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// `file://` URI of an absolute path; `None` for a relative one.
pub fn file_uri(path: &str) -> Option<String> {
    Url::from_file_path(path).ok().map(String::from)
}

/// The decoded path of `uri`, without query or fragment.
///
/// `file:///home/a%20b.txt` → `/home/a b.txt`. A string that does not parse as a URI is
/// decoded as a whole.
pub fn uri_path(uri: &str) -> String {
    match Url::parse(uri) {
        Ok(url) => percent_decode_str(url.path()).decode_utf8_lossy().into_owned(),
        Err(_) => percent_decode_str(uri).decode_utf8_lossy().into_owned(),
    }
}

/// Append the relative path `relative` to `base`, resolving `.` and `..` segments.
///
/// `base` is treated as a directory even when it names a file, and its query and fragment
/// are dropped. `None` if `base` is not a hierarchical URI.
pub fn join_uri(base: &str, relative: &str) -> Option<String> {
    let mut url = Url::parse(base).ok()?;
    if url.cannot_be_a_base() {
        return None;
    }
    url.set_query(None);
    url.set_fragment(None);
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    let relative = utf8_percent_encode(relative.trim_start_matches('/'), RELATIVE_PATH).to_string();
    url.join(&relative).ok().map(String::from)
}

/// Rewrite `uri` when it lies inside the folder `old_prefix` that moved to `new_prefix`.
///
/// Only whole path segments match: `file:///a/b` is inside `file:///a` but `file:///ab` is
/// not. The folder itself is not rebased.
pub fn rebase_uri(uri: &str, old_prefix: &str, new_prefix: &str) -> Option<String> {
    let url = Url::parse(uri).ok()?;
    let old = Url::parse(old_prefix).ok()?;
    if url.scheme() != old.scheme() || url.host() != old.host() || url.port() != old.port() {
        return None;
    }

    let suffix = url.path().strip_prefix(old.path().trim_end_matches('/'))?;
    if suffix.len() <= 1 || !suffix.starts_with('/') {
        return None;
    }

    let mut rebased = Url::parse(new_prefix).ok()?;
    let path = format!("{}{suffix}", rebased.path().trim_end_matches('/'));
    rebased.set_path(&path);
    rebased.set_query(url.query());
    rebased.set_fragment(url.fragment());
    Some(rebased.into())
}

//! SimpleGeo handles: `SG_` plus 22 alphanumerics, an optional
//! `_<lat>_<lon>` suffix and an optional `@<epoch>` suffix.

use std::sync::LazyLock;

use regex::Regex;

pub const HANDLE_PATTERN: &str =
    r"^SG_[A-Za-z0-9]{22}(?:_-?[0-9]{1,3}(?:\.[0-9]+)?_-?[0-9]{1,3}(?:\.[0-9]+)?)?(?:@[0-9]+)?$";

static HANDLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(HANDLE_PATTERN).expect("handle pattern is a valid regex"));

pub fn is_simplegeohandle(s: &str) -> bool {
    HANDLE_RE.is_match(s)
}

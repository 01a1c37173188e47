use semver::{Version, VersionReq};

/// Length of a snap (hash-based) component version
const SNAP_LENGTH: usize = 40;

/// Whether `version` is a snap: a 40 character hex hash
pub fn is_snap(version: &str) -> bool {
    version.len() == SNAP_LENGTH && version.chars().all(|c| c.is_ascii_hexdigit())
}

/// Whether `range` is a valid npm-style range.
///
/// Space separated comparators, hyphen ranges and `||` alternatives are
/// accepted in addition to the comma-separated syntax of the `semver` crate.
pub fn is_valid_range(range: &str) -> bool {
    let range = range.trim();
    if range.is_empty() {
        return false;
    }
    range.split("||").all(|alternative| {
        let comparators = to_comparators(alternative);
        !comparators.is_empty() && VersionReq::parse(&comparators).is_ok()
    })
}

/// One npm range alternative in `semver` crate syntax
fn to_comparators(alternative: &str) -> String {
    // `1.0.0 - 2.0.0` is inclusive on both ends
    if let Some((low, high)) = alternative.split_once(" - ") {
        let (low, high) = (low.trim(), high.trim());
        if low.is_empty() || high.is_empty() {
            return String::new();
        }
        return format!(">={}, <={}", low, high);
    }
    alternative.split_whitespace().collect::<Vec<_>>().join(", ")
}

/// First `major[.minor[.patch]]` found in `input`, missing parts set to zero
pub fn coerce(input: &str) -> Option<Version> {
    let bytes = input.as_bytes();
    let start = bytes.iter().position(u8::is_ascii_digit)?;
    let mut parts: Vec<u64> = Vec::with_capacity(3);
    let mut current = String::new();
    for &b in &bytes[start..] {
        if b.is_ascii_digit() {
            current.push(b as char);
        } else if b == b'.' && !current.is_empty() && parts.len() < 2 {
            parts.push(current.parse().ok()?);
            current.clear();
        } else {
            break;
        }
    }
    if !current.is_empty() {
        parts.push(current.parse().ok()?);
    }
    let major = *parts.first()?;
    Some(Version::new(
        major,
        parts.get(1).copied().unwrap_or(0),
        parts.get(2).copied().unwrap_or(0),
    ))
}

/// Normalizes a version found in a package.json to a component version.
///
/// Exact versions (pre-releases included) are kept, ranges are coerced to
/// their first concrete version (`^1.2.0` -> `1.2.0`) and snaps are kept.
/// Anything else, typically a relative path to the component, yields `None`.
pub fn get_valid_version(version: Option<&str>) -> Option<String> {
    let version = version?.trim();
    if version.is_empty() {
        return None;
    }
    if Version::parse(version).is_ok() {
        return Some(version.to_string());
    }
    if is_valid_range(version) {
        if let Some(coerced) = coerce(version) {
            return Some(coerced.to_string());
        }
    }
    if is_snap(version) {
        return Some(version.to_string());
    }
    None
}

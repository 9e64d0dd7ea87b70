//! 域名名称处理
//!
//! regfish 使用带结尾点的完整域名，调用方使用相对于 zone 的名称。

/// Apex marker used for zone-relative names.
pub const APEX: &str = "@";

/// Whether `name` equals `zone` or is a subdomain of it (label-aligned).
fn is_within_zone(name: &str, zone: &str) -> bool {
    name == zone
        || name
            .strip_suffix(zone)
            .is_some_and(|prefix| prefix.ends_with('.'))
}

/// Canonicalize `name` into a fully-qualified name inside `zone`.
///
/// Trailing dots are stripped from both inputs, the zone is appended unless `name` already
/// lies inside it, and the result always ends in exactly one dot. `"@"` and `""` denote the
/// apex.
///
/// - `"www"` + `"example.com"` -> `"www.example.com."`
/// - `"www.example.com."` + `"example.com."` -> `"www.example.com."`
/// - `"@"` + `"example.com"` -> `"example.com."`
pub fn normalize(name: &str, zone: &str) -> String {
    let name = name.trim_end_matches('.');
    let zone = zone.trim_end_matches('.');

    if name.is_empty() || name == APEX {
        return format!("{zone}.");
    }
    if zone.is_empty() || is_within_zone(name, zone) {
        format!("{name}.")
    } else {
        format!("{name}.{zone}.")
    }
}

/// Express `name` relative to `zone`.
///
/// - `"www.example.com."` + `"example.com"` -> `"www"`
/// - `"example.com."` + `"example.com"` -> `"@"`
pub fn relative_name(name: &str, zone: &str) -> String {
    let full = normalize(name, zone);
    let full = full.trim_end_matches('.');
    let zone = zone.trim_end_matches('.');

    if !zone.is_empty() && full == zone {
        APEX.to_string()
    } else if let Some(sub) = full
        .strip_suffix(zone)
        .and_then(|prefix| prefix.strip_suffix('.'))
        .filter(|_| !zone.is_empty())
    {
        sub.to_string()
    } else {
        full.to_string()
    }
}

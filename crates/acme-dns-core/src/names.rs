//! Zone and record name resolution
//!
//! Converts the resolved zone and FQDN of a challenge into the
//! zone-relative record name the provider API expects.

/// Record name denoting the zone apex
pub const ZONE_APEX: &str = "@";

/// Strip a single trailing '.' from a zone name
pub fn normalize_zone(zone: &str) -> &str {
    zone.strip_suffix('.').unwrap_or(zone)
}

/// Record name of `fqdn` relative to `zone`
///
/// Both inputs may carry a trailing dot. Returns [`ZONE_APEX`] when the
/// FQDN is the zone itself. An FQDN outside the zone is not rejected; it
/// comes back unchanged apart from the trailing dot.
pub fn relative_record_name(fqdn: &str, zone: &str) -> String {
    let zone = normalize_zone(zone);
    let fqdn = normalize_zone(fqdn);

    let trimmed = fqdn
        .strip_suffix(zone)
        .and_then(|rest| rest.strip_suffix('.'))
        .unwrap_or(fqdn);
    let trimmed = if trimmed == zone { "" } else { trimmed };
    let trimmed = trimmed.strip_suffix('.').unwrap_or(trimmed);

    if trimmed.is_empty() {
        ZONE_APEX.to_string()
    } else {
        trimmed.to_string()
    }
}

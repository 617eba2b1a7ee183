// Per-source reducers for the four plant dashboards
pub mod body_assembly;
pub mod press_image;
pub mod press_vibration;
pub mod welding_image;

/// Resolve an image path from a payload against the API base URL.
/// Absolute URLs pass through; empty paths resolve to nothing.
pub fn public_url(api_base: &str, path: Option<&str>) -> Option<String> {
    let path = path.filter(|p| !p.is_empty())?;
    if path.starts_with("http://") || path.starts_with("https://") {
        return Some(path.to_string());
    }
    let base = api_base.trim_end_matches('/');
    if path.starts_with('/') {
        Some(format!("{}{}", base, path))
    } else {
        Some(format!("{}/{}", base, path))
    }
}

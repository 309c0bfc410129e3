use nuvylux_shared::const_config::path::PATH_PUBLIC_PREFIXES;

/// Returns `true` for endpoints that are used before a session exists. A
/// failure on those is an ordinary credential error, never an expired session
pub fn is_public_route(path: &str) -> bool {
    PATH_PUBLIC_PREFIXES
        .iter()
        .any(|prefix| path.contains(prefix))
}

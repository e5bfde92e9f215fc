//! Route classification.
//!
//! # Responsibilities
//! - Classify request paths against the fixed route table
//! - Match public files, static assets, and protected area prefixes
//!
//! # Design Decisions
//! - Prefix matching requires a path-segment boundary: `/dashboard` matches
//!   `/dashboard` and `/dashboard/clienti` but not `/dashboards`
//! - Static assets are detected by extension suffix alone, no allocation
//! - The table is a closed set of constants; no regex, O(n) matching

/// Canonical login path.
pub const LOGIN_PATH: &str = "/login";

/// Legacy login path, redirected to [`LOGIN_PATH`].
pub const LEGACY_LOGIN_PATH: &str = "/auth/login";

/// Trainer/admin dashboard area prefix.
pub const DASHBOARD_PREFIX: &str = "/dashboard";

/// Athlete home area prefix.
pub const HOME_PREFIX: &str = "/home";

/// API prefix, handled upstream of the gatekeeper.
pub const API_PREFIX: &str = "/api";

/// Rewrite target for apple-touch-icon requests.
pub const ICON_FALLBACK_PATH: &str = "/icon-192x192.png";

/// Routes reachable without a session. Root is handled separately (exact
/// match only, everything starts with `/`).
const PUBLIC_ROUTES: &[&str] = &[
    "/login",
    "/reset",
    "/registrati",
    "/forgot-password",
    "/reset-password",
];

/// Paths that bypass authentication regardless of session state.
const PUBLIC_FILES: &[&str] = &[
    "/manifest.json",
    "/favicon.ico",
    "/icon-192x192.png",
    "/icon-512x512.png",
];

/// Prefixes known to require a session when no session is present.
const PROTECTED_PREFIXES: &[&str] = &[DASHBOARD_PREFIX, HOME_PREFIX, API_PREFIX];

/// Extensions served as static assets, checked before any other logic.
const STATIC_EXTENSIONS: &[&str] = &[
    ".svg", ".png", ".jpg", ".jpeg", ".gif", ".webp", ".avif", ".ico", ".css", ".js", ".map",
    ".woff", ".woff2", ".ttf", ".otf", ".txt",
];

/// Classification of a request path against the route table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteClass {
    StaticAsset,
    Public,
    TrainerArea,
    AthleteArea,
    /// Protected but not tied to a specific role area.
    Protected,
}

/// Classify a path. Every path falls into exactly one class.
pub fn classify(path: &str) -> RouteClass {
    if is_static_asset(path) {
        RouteClass::StaticAsset
    } else if is_public_route(path) {
        RouteClass::Public
    } else if matches_prefix(path, DASHBOARD_PREFIX) {
        RouteClass::TrainerArea
    } else if matches_prefix(path, HOME_PREFIX) {
        RouteClass::AthleteArea
    } else {
        RouteClass::Protected
    }
}

/// True if the path ends in a known static-asset extension.
pub fn is_static_asset(path: &str) -> bool {
    STATIC_EXTENSIONS.iter().any(|ext| path.ends_with(ext))
}

/// True if the path equals the prefix or extends it at a segment boundary.
pub fn matches_prefix(path: &str, prefix: &str) -> bool {
    match path.strip_prefix(prefix) {
        Some(rest) => rest.is_empty() || rest.starts_with('/'),
        None => false,
    }
}

/// True if the path is reachable without a session.
pub fn is_public_route(path: &str) -> bool {
    path == "/" || PUBLIC_ROUTES.iter().any(|route| matches_prefix(path, route))
}

/// True if the path is a public file served regardless of session state.
pub fn is_public_file(path: &str) -> bool {
    PUBLIC_FILES.contains(&path)
}

/// Rewrite target for icon requests that browsers probe on their own.
pub fn icon_fallback(path: &str) -> Option<&'static str> {
    if path == "/apple-touch-icon.png" || path == "/apple-touch-icon-precomposed.png" {
        Some(ICON_FALLBACK_PATH)
    } else {
        None
    }
}

/// The protected prefix covering this path, if any.
pub fn protected_prefix(path: &str) -> Option<&'static str> {
    PROTECTED_PREFIXES
        .iter()
        .find(|prefix| matches_prefix(path, prefix))
        .copied()
}

//! Translation of the caller's force-refresh flag into cache behavior.

/// Per-request cache directives for the enrichment pipeline.
///
/// Stateless: built fresh from the request's `refresh` query flag. A
/// forced refresh drops the CSV snapshot *and* bypasses the geocode
/// cache read path in the same pass, so stale coordinates (including
/// previously cached fallbacks) are re-resolved alongside the fresh
/// rows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RefreshOptions {
    /// Invalidate the CSV snapshot before reading it.
    pub invalidate_snapshot: bool,
    /// Skip the geocode cache read path (writes still go through).
    pub bypass_geocode_cache: bool,
}

impl RefreshOptions {
    /// Maps the single caller-supplied "force refresh" flag onto both
    /// cache directives.
    #[must_use]
    pub const fn from_force_refresh(force: bool) -> Self {
        Self {
            invalidate_snapshot: force,
            bypass_geocode_cache: force,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn force_refresh_drives_both_flags() {
        let opts = RefreshOptions::from_force_refresh(true);
        assert!(opts.invalidate_snapshot);
        assert!(opts.bypass_geocode_cache);
    }

    #[test]
    fn no_refresh_leaves_both_flags_off() {
        let opts = RefreshOptions::from_force_refresh(false);
        assert_eq!(opts, RefreshOptions::default());
        assert!(!opts.invalidate_snapshot);
        assert!(!opts.bypass_geocode_cache);
    }
}

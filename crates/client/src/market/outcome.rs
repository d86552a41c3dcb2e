/// Where a market payload came from.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome<T> {
    /// Served from the cache within its TTL.
    Hit(T),
    /// Fetched from upstream and written to the cache.
    Fresh(T),
    /// Upstream failed; a static or synthetic payload was substituted.
    Fallback(T),
}

impl<T> FetchOutcome<T> {
    pub fn is_fallback(&self) -> bool {
        matches!(self, FetchOutcome::Fallback(_))
    }

    /// Label reported in the `x-cache` response header.
    pub fn label(&self) -> &'static str {
        match self {
            FetchOutcome::Hit(_) => "hit",
            FetchOutcome::Fresh(_) => "miss",
            FetchOutcome::Fallback(_) => "fallback",
        }
    }

    pub fn value(&self) -> &T {
        match self {
            FetchOutcome::Hit(v) | FetchOutcome::Fresh(v) | FetchOutcome::Fallback(v) => v,
        }
    }

    pub fn into_inner(self) -> T {
        match self {
            FetchOutcome::Hit(v) | FetchOutcome::Fresh(v) | FetchOutcome::Fallback(v) => v,
        }
    }
}

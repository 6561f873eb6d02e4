// Tenant isolation primitives.
//
// Every query path goes through one of two mechanisms:
// - the scope filter: repositories take an explicit &TenantContext and
//   narrow event queries to the current band (anonymous => empty set);
// - the ownership guard: any resource located by id is re-checked
//   against the context before it is returned or mutated.
//
// Child resources (musicians, songs) have no tenant column; they are
// reached only through hierarchy::owned_event followed by a lookup
// scoped to that verified event id.

pub mod guard;
pub mod hierarchy;

pub use guard::ensure_owned;

/// The resolved identity of the band making the current request,
/// threaded explicitly through every scoped call. No ambient lookups:
/// an anonymous context mechanically yields no visible data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TenantContext {
    band_id: Option<i64>,
}

impl TenantContext {
    pub fn authenticated(band_id: i64) -> Self {
        Self {
            band_id: Some(band_id),
        }
    }

    pub fn anonymous() -> Self {
        Self { band_id: None }
    }

    pub fn band_id(&self) -> Option<i64> {
        self.band_id
    }
}

/// Directly tenant-owned entity types. Implementing this trait is what
/// wires a type into the ownership model; the guard accepts nothing
/// else, so an unwired type is a compile error, not a runtime Forbidden.
pub trait TenantOwned {
    fn owning_band(&self) -> i64;
}

/// Entity types owned by an event rather than by a band directly.
/// Their tenant is always resolved through the parent event, never by
/// inspecting the child itself.
pub trait EventScoped {
    fn event_id(&self) -> i64;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anonymous_context_has_no_band() {
        assert_eq!(TenantContext::anonymous().band_id(), None);
        assert_eq!(TenantContext::authenticated(9).band_id(), Some(9));
    }
}

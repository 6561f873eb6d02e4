use crate::error::ApiError;
use crate::tenancy::{TenantContext, TenantOwned};

/// Ownership guard: verify that a loaded resource belongs to the current
/// band before it is returned or mutated.
///
/// Called after every find-by-id, even when the lookup was already
/// narrowed by the scope filter. An anonymous context is Forbidden, the
/// same as a band mismatch.
pub fn ensure_owned<T: TenantOwned>(resource: &T, ctx: &TenantContext) -> Result<(), ApiError> {
    let Some(band_id) = ctx.band_id() else {
        return Err(ApiError::forbidden(
            "You must be authenticated to access this resource",
        ));
    };

    if resource.owning_band() != band_id {
        return Err(ApiError::forbidden(
            "You do not have permission to access this resource",
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Owned(i64);

    impl TenantOwned for Owned {
        fn owning_band(&self) -> i64 {
            self.0
        }
    }

    #[test]
    fn accepts_matching_band() {
        let ctx = TenantContext::authenticated(4);
        assert!(ensure_owned(&Owned(4), &ctx).is_ok());
    }

    #[test]
    fn rejects_other_bands_resource() {
        let ctx = TenantContext::authenticated(4);
        let err = ensure_owned(&Owned(5), &ctx).unwrap_err();
        assert_eq!(err.status_code(), 403);
    }

    #[test]
    fn rejects_anonymous_context() {
        let ctx = TenantContext::anonymous();
        let err = ensure_owned(&Owned(4), &ctx).unwrap_err();
        assert_eq!(err.status_code(), 403);
    }
}

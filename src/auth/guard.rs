//! Two-stage request check: authenticate the bearer token, then authorize
//! the caller's role. Report builders never see either step.

use crate::auth::{extract_token_from_header, Claims, JwtValidator, Role};
use crate::types::{ReportError, Result};

/// Resolve the caller from the `Authorization` header.
///
/// No header, or a bare `Bearer` scheme with nothing after it, is
/// [`ReportError::Unauthenticated`]. A header that carries something other
/// than a verifiable token is [`ReportError::InvalidToken`].
pub fn authenticate(jwt: &JwtValidator, auth_header: Option<&str>) -> Result<Claims> {
    let header = auth_header.map(str::trim).unwrap_or_default();
    if header.is_empty() || header.eq_ignore_ascii_case("bearer") {
        return Err(ReportError::Unauthenticated);
    }

    let token = extract_token_from_header(Some(header)).ok_or(ReportError::InvalidToken)?;
    jwt.verify_token(token)
}

/// Require at least `required` for the authenticated caller
pub fn authorize(claims: &Claims, required: Role) -> Result<()> {
    if claims.role.allows(required) {
        Ok(())
    } else {
        Err(ReportError::Forbidden)
    }
}

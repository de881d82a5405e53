//! Caller identity from trusted proxy headers
//!
//! The service sits behind the catalog's gateway, which authenticates the
//! user and forwards who they are:
//!
//! - `X-Catalog-User`: user id, absent for anonymous callers
//! - `X-Catalog-Sysadmin`: `true` when the user is a sysadmin
//! - `X-Catalog-Proxy-Secret`: shared secret proving the gateway sent them
//!
//! How much of this is believed is set by [`CallerConfig`].

use std::convert::Infallible;

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{request::Parts, HeaderMap, HeaderName},
};
use datareq_common::types::Caller;

use crate::config::CallerConfig;

pub const USER_HEADER: HeaderName = HeaderName::from_static("x-catalog-user");
pub const SYSADMIN_HEADER: HeaderName = HeaderName::from_static("x-catalog-sysadmin");
pub const PROXY_SECRET_HEADER: HeaderName = HeaderName::from_static("x-catalog-proxy-secret");

/// Extractor yielding the [`Caller`] of the current request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallerIdentity(pub Caller);

fn header_str<'a>(headers: &'a HeaderMap, name: &HeaderName) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

impl CallerIdentity {
    pub fn from_headers(headers: &HeaderMap, trust: &CallerConfig) -> Self {
        if let Some(ref expected) = trust.proxy_secret {
            if header_str(headers, &PROXY_SECRET_HEADER) != Some(expected.as_str()) {
                if headers.contains_key(USER_HEADER) {
                    tracing::warn!("Caller headers without a valid proxy secret, treating as anonymous");
                }
                return CallerIdentity(Caller::anonymous());
            }
        }

        let user_id = header_str(headers, &USER_HEADER).map(str::to_string);

        let sysadmin = trust.trust_sysadmin_header
            && header_str(headers, &SYSADMIN_HEADER).is_some_and(|s| s.eq_ignore_ascii_case("true"));

        let caller = match user_id {
            Some(id) if sysadmin => Caller::sysadmin(id),
            Some(id) => Caller::user(id),
            // Sysadmin without a user id means nothing
            None => Caller::anonymous(),
        };
        CallerIdentity(caller)
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for CallerIdentity
where
    CallerConfig: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let trust = CallerConfig::from_ref(state);
        Ok(Self::from_headers(&parts.headers, &trust))
    }
}

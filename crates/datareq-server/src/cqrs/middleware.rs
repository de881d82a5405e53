use datareq_common::types::Caller;

use crate::access::{AccessError, AccessPolicy, AccessTarget, Action};

/// Marker for write operations
pub trait Command {
    const ACTION: Action;
}

/// Marker for read operations
pub trait Query {
    const ACTION: Action;
}

/// Gate a command; denials are logged at info since they may indicate misuse
pub async fn authorize_command<C: Command>(
    policy: &dyn AccessPolicy,
    caller: &Caller,
    target: AccessTarget,
) -> Result<(), AccessError> {
    let result = policy.check_access(C::ACTION, caller, target).await;
    if let Err(ref e) = result {
        tracing::info!(
            action = %C::ACTION,
            user = caller.user_id.as_deref().unwrap_or("<anonymous>"),
            error = %e,
            "Command denied"
        );
    }
    result
}

pub async fn authorize_query<Q: Query>(
    policy: &dyn AccessPolicy,
    caller: &Caller,
    target: AccessTarget,
) -> Result<(), AccessError> {
    let result = policy.check_access(Q::ACTION, caller, target).await;
    if let Err(ref e) = result {
        tracing::debug!(
            action = %Q::ACTION,
            user = caller.user_id.as_deref().unwrap_or("<anonymous>"),
            error = %e,
            "Query denied"
        );
    }
    result
}

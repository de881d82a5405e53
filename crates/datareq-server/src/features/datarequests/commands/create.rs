//! Create data request command
//!
//! The caller becomes the owner; the request starts open, stamped with the
//! current time.

use datareq_common::types::{Caller, DataRequest};
use mediator::Request;
use serde::{Deserialize, Serialize};

use crate::access::{AccessTarget, Action};
use crate::cqrs::middleware::{authorize_command, Command};
use crate::error::{ActionError, ActionResult};
use crate::features::shared::{apply_editable_fields, dictize_datarequest, DataRequestFields, DataRequestResponse};
use crate::features::FeatureState;

/// Command to open a new data request
///
/// # Examples
///
/// ```rust,ignore
/// let command = CreateDataRequestCommand {
///     title: "Need traffic data".to_string(),
///     description: Some("Hourly counts per junction".to_string()),
///     organization_id: None,
/// };
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateDataRequestCommand {
    pub title: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Organization id or name; empty means none. Stored as the catalog id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization_id: Option<String>,
}

impl Request<ActionResult<DataRequestResponse>> for CreateDataRequestCommand {}

impl Command for CreateDataRequestCommand {
    const ACTION: Action = Action::DataRequestCreate;
}

impl CreateDataRequestCommand {
    pub fn into_fields(self) -> DataRequestFields {
        DataRequestFields {
            title: self.title,
            description: self.description,
            organization_id: self.organization_id,
        }
    }
}

/// Handler for creating data requests
///
/// # Errors
///
/// - Not authorized / unauthenticated if the policy refuses the caller
/// - Validation errors if title, description or organization are invalid
/// - Store errors if the insert fails
#[tracing::instrument(
    skip(state, caller, command),
    fields(user = ?caller.user_id, title = %command.title)
)]
pub async fn handle(
    state: &FeatureState,
    caller: &Caller,
    command: CreateDataRequestCommand,
) -> ActionResult<DataRequestResponse> {
    state.store.init().await?;

    authorize_command::<CreateDataRequestCommand>(state.access.as_ref(), caller, AccessTarget::Collection)
        .await?;

    let Some(user_id) = caller.user_id.clone() else {
        return Err(ActionError::Unauthenticated(
            "You must be logged in to create a data request".to_string(),
        ));
    };

    let fields = state
        .validator
        .validate_datarequest(&command.into_fields(), None)
        .await?;

    let mut request = DataRequest::open(user_id, String::new());
    apply_editable_fields(&mut request, &fields);
    state.store.insert_datarequest(&request).await?;

    tracing::info!(datarequest_id = %request.id, "Data request created");

    Ok(dictize_datarequest(state.catalog.as_ref(), request).await)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::access::AllowAll;
    use crate::features::shared::test_helpers::*;
    use crate::store::DataRequestStore;
    use std::sync::Arc;

    fn command(title: &str) -> CreateDataRequestCommand {
        CreateDataRequestCommand {
            title: title.to_string(),
            description: Some("Hourly counts".to_string()),
            organization_id: None,
        }
    }

    #[tokio::test]
    async fn test_create_opens_request_owned_by_caller() {
        let ctx = TestContext::new();
        let response = handle(&ctx.state, &owner(), command("Need traffic data"))
            .await
            .unwrap();

        assert_eq!(response.user_id, OWNER);
        assert_eq!(response.title, "Need traffic data");
        assert!(!response.closed);
        assert!(response.close_time.is_none());
        assert!(response.organization_id.is_none());
        assert_eq!(response.user.as_option().unwrap().name, "alice");
        assert_eq!(ctx.store.init_calls(), 1);

        let stored = ctx.store.get_datarequest(response.id).await.unwrap().unwrap();
        assert_eq!(stored.open_time, response.open_time);
    }

    #[tokio::test]
    async fn test_create_normalizes_empty_organization() {
        let ctx = TestContext::new();
        let mut cmd = command("Bus stops");
        cmd.organization_id = Some(String::new());
        let response = handle(&ctx.state, &owner(), cmd).await.unwrap();
        assert!(response.organization_id.is_none());
    }

    #[tokio::test]
    async fn test_create_with_organization_joins_it() {
        let ctx = TestContext::new();
        let mut cmd = command("Bus stops");
        cmd.organization_id = Some(ORG.to_string());
        let response = handle(&ctx.state, &owner(), cmd).await.unwrap();
        assert_eq!(response.organization.as_option().unwrap().name, "council");
    }

    #[tokio::test]
    async fn test_create_by_organization_name_stores_catalog_id() {
        let ctx = TestContext::new();
        let mut cmd = command("Bus stops");
        cmd.organization_id = Some("council".to_string());
        let response = handle(&ctx.state, &owner(), cmd).await.unwrap();
        assert_eq!(response.organization_id.as_deref(), Some(ORG));

        let stored = ctx.store.get_datarequest(response.id).await.unwrap().unwrap();
        assert_eq!(stored.organization_id.as_deref(), Some(ORG));
    }

    #[tokio::test]
    async fn test_anonymous_caller_is_rejected_before_validation() {
        let ctx = TestContext::new();
        let err = handle(&ctx.state, &Caller::anonymous(), command(""))
            .await
            .unwrap_err();
        assert!(matches!(err, ActionError::Unauthenticated(_)));
        assert_eq!(ctx.store.write_count(), 0);
    }

    #[tokio::test]
    async fn test_anonymous_caller_needs_identity_even_if_policy_allows() {
        let ctx = TestContext::with_access(Arc::new(AllowAll));
        let err = handle(&ctx.state, &Caller::anonymous(), command("Fine"))
            .await
            .unwrap_err();
        assert!(matches!(err, ActionError::Unauthenticated(_)));
    }

    #[tokio::test]
    async fn test_invalid_payload_persists_nothing() {
        let ctx = TestContext::new();
        let err = handle(&ctx.state, &owner(), command("")).await.unwrap_err();
        assert!(matches!(err, ActionError::Validation(ref e) if e.contains("title")));
        assert_eq!(ctx.store.write_count(), 0);
    }

    #[tokio::test]
    async fn test_duplicate_title_is_rejected() {
        let ctx = TestContext::new();
        handle(&ctx.state, &owner(), command("Unique")).await.unwrap();
        let err = handle(&ctx.state, &other(), command("unique")).await.unwrap_err();
        assert!(matches!(err, ActionError::Validation(_)));
    }
}

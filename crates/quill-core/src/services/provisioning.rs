//! Local user provisioning from verified identity provider events.

use std::sync::Arc;

use crate::domain::{IdentityEvent, User, UserCreatedData, mask_email};
use crate::error::{ProvisioningError, RepoError};
use crate::ports::UserRepository;

/// What handling an identity event did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProvisionOutcome {
    /// A new local user was stored.
    Created(User),
    /// The user already existed; duplicate deliveries are a no-op.
    AlreadyExists,
    /// The event type is not one this system acts on.
    Ignored,
}

/// Turns verified identity events into local user records.
///
/// Callers must have verified the event signature before handing it over.
#[derive(Clone)]
pub struct UserProvisioning {
    users: Arc<dyn UserRepository>,
}

impl UserProvisioning {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    pub async fn handle_event(
        &self,
        event: IdentityEvent,
    ) -> Result<ProvisionOutcome, ProvisioningError> {
        if !event.is_user_created() {
            tracing::debug!(event_type = %event.event_type, "Ignoring identity event");
            return Ok(ProvisionOutcome::Ignored);
        }

        let data: UserCreatedData = serde_json::from_value(event.data)
            .map_err(|e| ProvisioningError::InvalidPayload(e.to_string()))?;
        let user = user_from_event(data)?;
        let user_id = user.id.clone();
        let masked = mask_email(&user.email);

        match self.users.insert(user).await {
            Ok(user) => {
                tracing::info!(user_id = %user.id, email = %masked, "User provisioned");
                Ok(ProvisionOutcome::Created(user))
            }
            Err(RepoError::Duplicate(reason)) => {
                tracing::info!(user_id = %user_id, reason = %reason, "User already provisioned");
                Ok(ProvisionOutcome::AlreadyExists)
            }
            Err(e) => {
                tracing::error!(error = %e, user_id = %user_id, "Failed to store user");
                Err(e.into())
            }
        }
    }
}

fn user_from_event(data: UserCreatedData) -> Result<User, ProvisioningError> {
    if data.id.trim().is_empty() {
        return Err(ProvisioningError::InvalidPayload(
            "event has no user id".to_string(),
        ));
    }

    let email = data
        .email_addresses
        .into_iter()
        .next()
        .map(|e| e.email_address)
        .ok_or_else(|| ProvisioningError::InvalidPayload("event has no email address".to_string()))?;

    Ok(User {
        id: data.id,
        email,
        first_name: data.first_name.unwrap_or_default(),
        last_name: data.last_name.unwrap_or_default(),
        profile_image: data.image_url,
    })
}

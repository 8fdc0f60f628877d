//! The account-reconciliation state machine.
//!
//! Given a normalized external profile, produce exactly one local uid:
//! attach to the already-associated account, merge into an account matched
//! by email, or create a new account subject to the registration policy.

use crate::association::{AssociationStore, external_id_field};
use crate::host::{NewUser, SsoSettings, Uid, UserRepository};
use crate::oauth2::NormalizedProfile;

use super::errors::CoordinationError;

/// How a login attempt was resolved to a local account.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reconciled {
    /// The external id was already linked; plain re-login.
    Associated { uid: Uid },
    /// No link existed, but an account with the candidate email did; the
    /// external identity was attached to it.
    Merged { uid: Uid },
    /// No link and no email match; a fresh account was created and linked.
    Created { uid: Uid },
}

impl Reconciled {
    pub fn uid(&self) -> Uid {
        match *self {
            Self::Associated { uid } | Self::Merged { uid } | Self::Created { uid } => uid,
        }
    }
}

pub(crate) async fn reconcile_login(
    users: &dyn UserRepository,
    associations: &AssociationStore,
    settings: &SsoSettings,
    provider_name: &str,
    profile: &NormalizedProfile,
) -> Result<Reconciled, CoordinationError> {
    let email = candidate_email(profile);

    if let Some(uid) = associations.get(&profile.external_id).await? {
        // Re-login never re-runs registration policy; the only mutation is
        // refreshing the stored email to the current candidate.
        users.set_user_field(uid, "email", &email).await?;
        tracing::debug!("Existing association for {}: uid {uid}", profile.external_id);
        return Ok(Reconciled::Associated { uid });
    }

    let (uid, merged) = match users.get_uid_by_email(&email).await? {
        // Existing account, different external identity: merge. The
        // registration toggle deliberately does not apply here.
        Some(uid) => (uid, true),
        None => {
            if settings.disable_registration.is_on() {
                return Err(CoordinationError::RegistrationDisabled {
                    provider: provider_name.to_string(),
                }
                .log());
            }
            let uid = users
                .create(NewUser {
                    username: profile.display_name.clone(),
                    email: email.clone(),
                })
                .await?;
            (uid, false)
        }
    };

    attach(users, associations, settings, provider_name, profile, uid).await?;

    Ok(if merged {
        Reconciled::Merged { uid }
    } else {
        Reconciled::Created { uid }
    })
}

/// Every login attempt needs some email to key on; profiles without a
/// derived one get a synthetic placeholder address.
fn candidate_email(profile: &NormalizedProfile) -> String {
    profile.derived_email.clone().unwrap_or_else(|| {
        format!("{}@users.noreply.baiteda.com", profile.display_name)
    })
}

/// Link the external identity onto `uid`.
///
/// Best-effort sequence: a failing sub-step aborts and surfaces to the
/// caller, but sub-steps already completed stay committed. There is no
/// compensating rollback.
async fn attach(
    users: &dyn UserRepository,
    associations: &AssociationStore,
    settings: &SsoSettings,
    provider_name: &str,
    profile: &NormalizedProfile,
    uid: Uid,
) -> Result<(), CoordinationError> {
    users
        .set_user_field(uid, &external_id_field(provider_name), &profile.external_id)
        .await?;

    associations.set(&profile.external_id, uid).await?;

    // Trust the provider's identity assertion unless the admin wants a
    // confirmation round-trip anyway.
    if !settings.need_to_verify_email.is_on() {
        users.confirm_email_by_uid(uid).await?;
    }

    let existing = users.get_user_fields(uid, &["fullname"]).await?;
    if existing.get("fullname").is_none_or(|name| name.is_empty()) {
        users
            .set_user_field(uid, "fullname", &profile.display_name)
            .await?;
    }

    Ok(())
}

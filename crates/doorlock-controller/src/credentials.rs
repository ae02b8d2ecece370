//! Credential storage.

use doorlock_core::{ControllerConfig, Credential, Result};

/// Which stored credential an entry matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialMatch {
    Admin,
    User,
    None,
}

/// The two credential slots of the lock.
///
/// The administrator credential is fixed at construction. The user
/// credential can only be replaced from inside the crate, by the passcode
/// change flow.
#[derive(Debug, Clone)]
pub struct CredentialStore {
    user: Credential,
    admin: Credential,
}

impl CredentialStore {
    pub fn new(user: Credential, admin: Credential) -> Self {
        Self { user, admin }
    }

    /// Build the store from the configured passcodes.
    ///
    /// # Errors
    /// Returns `Error::Config` if either passcode is not a valid credential.
    pub fn from_config(config: &ControllerConfig) -> Result<Self> {
        Ok(Self::new(
            config.user_credential()?,
            config.admin_credential()?,
        ))
    }

    /// Compare an entry against both credentials.
    ///
    /// The administrator credential is checked first, so a user credential
    /// equal to it can never unlock the door.
    pub fn classify(&self, entry: &Credential) -> CredentialMatch {
        if *entry == self.admin {
            CredentialMatch::Admin
        } else if *entry == self.user {
            CredentialMatch::User
        } else {
            CredentialMatch::None
        }
    }

    pub(crate) fn replace_user(&mut self, credential: Credential) {
        self.user = credential;
    }
}

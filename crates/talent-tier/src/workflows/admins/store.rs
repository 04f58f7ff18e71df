use chrono::{TimeZone, Utc};
use subtle::ConstantTimeEq;
use tracing::{info, warn};

use super::domain::{AdminAccount, AdminId, AuthProvider, NewAdmin};
use super::password::CredentialHasher;
use crate::config::AdminSeedConfig;
use crate::storage::{JsonCollection, Mutation, StorageBackend};
use crate::workflows::is_valid_email;

/// Id of the administrator that always exists.
pub const SEED_ADMIN_ID: AdminId = AdminId(1);

#[derive(Debug, thiserror::Error)]
pub enum AdminStoreError {
    #[error("{0} is required")]
    MissingField(&'static str),
    #[error("email address is not valid")]
    InvalidEmail,
    #[error("admin with this email already exists")]
    DuplicateEmail,
    #[error("username already exists")]
    DuplicateUsername,
    #[error("the default administrator cannot be deleted")]
    ProtectedAccount,
    #[error("admin {0} not found")]
    NotFound(AdminId),
    #[error("failed to process password: {0}")]
    PasswordHash(String),
}

/// Administrator accounts, seeded with one protected account.
pub struct AdminStore {
    accounts: JsonCollection<AdminAccount>,
    seed: AdminAccount,
    hasher: CredentialHasher,
}

impl AdminStore {
    pub const COLLECTION: &'static str = "admins";

    pub fn open(backend: StorageBackend, seed: &AdminSeedConfig) -> Result<Self, AdminStoreError> {
        Self::with_hasher(backend, seed, CredentialHasher::default())
    }

    pub fn with_hasher(
        backend: StorageBackend,
        seed: &AdminSeedConfig,
        hasher: CredentialHasher,
    ) -> Result<Self, AdminStoreError> {
        let seed = AdminAccount {
            id: SEED_ADMIN_ID,
            name: seed.name.clone(),
            email: seed.email.clone(),
            username: Some(seed.username.clone()),
            password_hash: Some(
                hasher
                    .hash(&seed.password)
                    .map_err(AdminStoreError::PasswordHash)?,
            ),
            provider: AuthProvider::Credentials,
            created_at: Utc
                .with_ymd_and_hms(2024, 1, 1, 0, 0, 0)
                .single()
                .unwrap_or_default(),
        };

        Ok(Self {
            accounts: JsonCollection::open(Self::COLLECTION, backend, vec![seed.clone()]),
            seed,
            hasher,
        })
    }

    pub fn seed_id(&self) -> AdminId {
        self.seed.id
    }

    /// All accounts; the seeded administrator is restored first if it went missing.
    pub fn load(&self) -> Vec<AdminAccount> {
        self.accounts.modify(|accounts| {
            let restored = self.ensure_seed(accounts);
            let snapshot = accounts.clone();
            if restored {
                Mutation::Applied(snapshot)
            } else {
                Mutation::Unchanged(snapshot)
            }
        })
    }

    /// Append an already-hashed account and persist.
    pub fn add(&self, account: AdminAccount) {
        self.accounts.modify(|accounts| {
            self.ensure_seed(accounts);
            accounts.push(account);
            Mutation::Applied(())
        });
    }

    /// Remove an account. The seeded administrator is never removed.
    pub fn remove(&self, id: AdminId) -> bool {
        if id == self.seed.id {
            return false;
        }
        self.accounts.modify(|accounts| {
            let restored = self.ensure_seed(accounts);
            match accounts.iter().position(|account| account.id == id) {
                Some(index) => {
                    accounts.remove(index);
                    Mutation::Applied(true)
                }
                None if restored => Mutation::Applied(false),
                None => Mutation::Unchanged(false),
            }
        })
    }

    pub fn get_by_id(&self, id: AdminId) -> Option<AdminAccount> {
        self.load().into_iter().find(|account| account.id == id)
    }

    /// Look up a credentials account and verify its password.
    ///
    /// Unknown usernames and wrong passwords both return `None` after the same hash work.
    pub fn find_by_credentials(&self, username: &str, password: &str) -> Option<AdminAccount> {
        let account = self.load().into_iter().find(|account| {
            account.provider == AuthProvider::Credentials
                && account
                    .username
                    .as_deref()
                    .is_some_and(|stored| same_text(stored, username))
        });

        match account {
            Some(account) => {
                let stored = account.password_hash.as_deref().unwrap_or_default();
                self.hasher.verify(password, stored).then_some(account)
            }
            None => {
                let decoy = self.seed.password_hash.as_deref().unwrap_or_default();
                let _ = self.hasher.verify(password, decoy);
                None
            }
        }
    }

    pub fn create(&self, request: NewAdmin) -> Result<AdminAccount, AdminStoreError> {
        let name = request.name.trim().to_string();
        if name.is_empty() {
            return Err(AdminStoreError::MissingField("name"));
        }
        let email = request.email.trim().to_string();
        if email.is_empty() {
            return Err(AdminStoreError::MissingField("email"));
        }
        if !is_valid_email(&email) {
            return Err(AdminStoreError::InvalidEmail);
        }

        let username = request
            .username
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty());
        let password = request.password.filter(|value| !value.is_empty());

        if request.provider == AuthProvider::Credentials {
            if username.is_none() {
                return Err(AdminStoreError::MissingField("username"));
            }
            if password.is_none() {
                return Err(AdminStoreError::MissingField("password"));
            }
        }

        let password_hash = password
            .map(|plain| self.hasher.hash(&plain))
            .transpose()
            .map_err(AdminStoreError::PasswordHash)?;

        let account = self.accounts.update(|accounts| {
            self.ensure_seed(accounts);

            if accounts
                .iter()
                .any(|account| account.email.eq_ignore_ascii_case(&email))
            {
                return Err(AdminStoreError::DuplicateEmail);
            }

            if let Some(username) = username.as_deref() {
                if accounts.iter().any(|account| {
                    account.provider == request.provider
                        && account.username.as_deref() == Some(username)
                }) {
                    return Err(AdminStoreError::DuplicateUsername);
                }
            }

            let next_id = accounts
                .iter()
                .map(|account| account.id.0)
                .max()
                .unwrap_or(0)
                + 1;
            let account = AdminAccount {
                id: AdminId(next_id),
                name,
                email,
                username,
                password_hash,
                provider: request.provider,
                created_at: Utc::now(),
            };
            accounts.push(account.clone());
            Ok(Mutation::Applied(account))
        })?;

        info!(id = %account.id, "admin account created");
        Ok(account)
    }

    pub fn delete(&self, id: AdminId) -> Result<(), AdminStoreError> {
        if id == self.seed.id {
            return Err(AdminStoreError::ProtectedAccount);
        }
        if self.remove(id) {
            info!(%id, "admin account deleted");
            Ok(())
        } else {
            Err(AdminStoreError::NotFound(id))
        }
    }

    /// Replace an account's password hash. The only in-place update.
    pub fn rotate_password(&self, id: AdminId, new_password: &str) -> Result<(), AdminStoreError> {
        if new_password.is_empty() {
            return Err(AdminStoreError::MissingField("password"));
        }
        let hash = self
            .hasher
            .hash(new_password)
            .map_err(AdminStoreError::PasswordHash)?;

        self.accounts.update(|accounts| {
            self.ensure_seed(accounts);
            let account = accounts
                .iter_mut()
                .find(|account| account.id == id)
                .ok_or(AdminStoreError::NotFound(id))?;
            account.password_hash = Some(hash);
            Ok(Mutation::Applied(()))
        })?;

        info!(%id, "admin password rotated");
        Ok(())
    }

    /// Keep the row with the seed id in line with the configured seed. Returns whether
    /// anything changed and needs writing.
    fn ensure_seed(&self, accounts: &mut Vec<AdminAccount>) -> bool {
        let seed_id = self.seed.id;
        let Some(index) = accounts.iter().position(|account| account.id == seed_id) else {
            accounts.insert(0, self.seed.clone());
            return true;
        };

        let mut changed = false;
        let stored = &mut accounts[index];
        if !stored.email.eq_ignore_ascii_case(&self.seed.email) {
            info!(id = %seed_id, "seed admin identity changed; replacing stored account");
            *stored = self.seed.clone();
            changed = true;
        } else if !stored
            .password_hash
            .as_deref()
            .is_some_and(|hash| self.hasher.recognizes(hash))
        {
            warn!(id = %seed_id, "seed admin hash is not argon2; resetting to the configured password");
            stored.password_hash = self.seed.password_hash.clone();
            changed = true;
        }

        // Only one row may carry the seed id.
        let before = accounts.len();
        let mut position = 0;
        accounts.retain(|account| {
            let keep = account.id != seed_id || position == index;
            position += 1;
            keep
        });
        changed || accounts.len() != before
    }
}

fn same_text(stored: &str, provided: &str) -> bool {
    stored.len() == provided.len() && bool::from(stored.as_bytes().ct_eq(provided.as_bytes()))
}

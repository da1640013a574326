//! Email-code login
//!
//! A login is a two-step flow: `send-code` issues a time-boxed 6-digit code
//! for an email address (delivery is out of scope; the code is printed),
//! and `verify-code` consumes it exactly once, creating the user on first
//! login and persisting the session.
//!
//! Codes are stored in `codes.jsonl` as records with a status lifecycle
//! (issued / verified / expired); expiry sweeps take an explicit `now` so
//! tests can pin the clock.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use ulid::Ulid;
use uuid::Uuid;

use crate::config::{parse_duration, AuthConfig};
use crate::error::{Error, Result};
use crate::lock::{FileLock, DEFAULT_LOCK_TIMEOUT_MS};
use crate::storage::Storage;

/// A registered user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// Registry of all users
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserRegistry {
    pub users: Vec<User>,
}

impl UserRegistry {
    pub fn find_by_email(&self, email: &str) -> Option<&User> {
        self.users.iter().find(|user| user.email == email)
    }

    pub fn find_by_id(&self, id: &str) -> Option<&User> {
        self.users.iter().find(|user| user.id == id)
    }

    /// Insert a user (reject duplicate emails)
    pub fn insert(&mut self, user: User) -> Result<()> {
        if self.find_by_email(&user.email).is_some() {
            return Err(Error::InvalidArgument(format!(
                "user already exists: {}",
                user.email
            )));
        }
        self.users.push(user);
        Ok(())
    }
}

/// Lifecycle state of a login code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CodeStatus {
    /// Issued and waiting to be verified
    Issued,
    /// Consumed by a successful login
    Verified,
    /// Timed out, or superseded by a newer code
    Expired,
}

/// One issued login code
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationCode {
    pub email: String,
    pub code: String,
    pub name: String,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub status: CodeStatus,
}

impl VerificationCode {
    /// Check if this code can still be verified at `now`
    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        self.status == CodeStatus::Issued && now < self.expires_at
    }

    /// Check if this code has timed out at `now`
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// In-memory view of the codes file
#[derive(Debug, Clone, Default)]
pub struct CodeStore {
    codes: Vec<VerificationCode>,
}

impl CodeStore {
    pub fn from_vec(codes: Vec<VerificationCode>) -> Self {
        Self { codes }
    }

    pub fn all(&self) -> &[VerificationCode] {
        &self.codes
    }

    /// The code currently open for verification for an email, if any
    pub fn active_for(&self, email: &str, now: DateTime<Utc>) -> Option<&VerificationCode> {
        self.codes
            .iter()
            .find(|code| code.email == email && code.is_active(now))
    }

    /// Mark timed-out codes as expired; returns how many changed
    pub fn expire_stale_at(&mut self, now: DateTime<Utc>) -> usize {
        let mut changed = 0;
        for code in &mut self.codes {
            if code.status == CodeStatus::Issued && code.is_expired(now) {
                code.status = CodeStatus::Expired;
                changed += 1;
            }
        }
        changed
    }

    /// Issue a fresh code for an email; any previous open code is superseded
    pub fn issue(
        &mut self,
        email: &str,
        name: &str,
        now: DateTime<Utc>,
        ttl: Duration,
    ) -> VerificationCode {
        self.expire_stale_at(now);
        for code in &mut self.codes {
            if code.email == email && code.status == CodeStatus::Issued {
                code.status = CodeStatus::Expired;
            }
        }

        let code = VerificationCode {
            email: email.to_string(),
            code: generate_code(),
            name: name.to_string(),
            issued_at: now,
            expires_at: now + ttl,
            status: CodeStatus::Issued,
        };
        self.codes.push(code.clone());
        code
    }

    /// Consume the open code for an email; single use
    pub fn verify(&mut self, email: &str, raw_code: &str, now: DateTime<Utc>) -> Result<VerificationCode> {
        self.expire_stale_at(now);

        let entry = self
            .codes
            .iter_mut()
            .find(|code| code.email == email && code.status == CodeStatus::Issued);

        let entry = match entry {
            Some(entry) => entry,
            None => {
                // Distinguish "never asked" from "took too long".
                if self
                    .codes
                    .iter()
                    .any(|code| code.email == email && code.status == CodeStatus::Expired)
                {
                    return Err(Error::CodeExpired(email.to_string()));
                }
                return Err(Error::CodeNotFound(email.to_string()));
            }
        };

        if entry.code != raw_code.trim() {
            return Err(Error::CodeMismatch);
        }

        entry.status = CodeStatus::Verified;
        Ok(entry.clone())
    }
}

/// Generate a 6-digit numeric login code from ULID entropy
pub fn generate_code() -> String {
    let ulid = Ulid::new();
    let n = (ulid.random() % 900_000) as u32 + 100_000;
    n.to_string()
}

/// Result of issuing a code
#[derive(Debug, Clone, Serialize)]
pub struct IssuedCode {
    pub email: String,
    pub code: String,
    pub expires_at: DateTime<Utc>,
}

/// Auth service over storage
#[derive(Debug, Clone)]
pub struct AuthService {
    storage: Storage,
    config: AuthConfig,
}

impl AuthService {
    pub fn new(storage: Storage, config: AuthConfig) -> Self {
        Self { storage, config }
    }

    fn code_ttl(&self) -> Result<Duration> {
        parse_duration(&self.config.code_ttl)
    }

    fn with_codes<R>(&self, f: impl FnOnce(&mut CodeStore) -> Result<R>) -> Result<R> {
        let path = self.storage.codes_file();
        let lock_path = path.with_extension("jsonl.lock");
        let _lock = FileLock::acquire(&lock_path, DEFAULT_LOCK_TIMEOUT_MS)?;

        let mut store = CodeStore::from_vec(self.storage.read_jsonl(&path)?);
        let result = f(&mut store)?;
        self.storage.save_jsonl(&path, store.all())?;
        Ok(result)
    }

    /// Issue a login code for an email address
    pub fn send_code(&self, email: &str, name: &str, now: DateTime<Utc>) -> Result<IssuedCode> {
        let email = normalize_email(email)?;
        let name = require_name(name)?;
        let ttl = self.code_ttl()?;

        self.with_codes(|codes| {
            let code = codes.issue(&email, &name, now, ttl);
            Ok(IssuedCode {
                email: code.email,
                code: code.code,
                expires_at: code.expires_at,
            })
        })
    }

    /// Verify a login code; creates the user on first login and signs in
    pub fn verify_code(&self, email: &str, raw_code: &str, now: DateTime<Utc>) -> Result<User> {
        let email = normalize_email(email)?;
        let consumed = self.with_codes(|codes| codes.verify(&email, raw_code, now))?;

        let user = self
            .storage
            .update_json(&self.storage.users_file(), |registry: &mut UserRegistry| {
                if let Some(user) = registry.find_by_email(&email) {
                    return Ok(user.clone());
                }
                let user = User {
                    id: Uuid::new_v4().to_string(),
                    email: email.clone(),
                    name: consumed.name.clone(),
                    created_at: now,
                };
                registry.insert(user.clone())?;
                Ok(user)
            })?;

        self.storage.write_session(&user.id)?;
        tracing::debug!(email = %user.email, "login verified");
        Ok(user)
    }

    /// The signed-in user, if a session exists and still resolves
    pub fn current_user(&self) -> Result<Option<User>> {
        let user_id = match self.storage.read_session() {
            Some(user_id) => user_id,
            None => return Ok(None),
        };

        let registry: UserRegistry = self
            .storage
            .read_json_or_default(&self.storage.users_file())?;
        Ok(registry.find_by_id(&user_id).cloned())
    }

    /// The signed-in user, or a "not logged in" error
    pub fn require_user(&self) -> Result<User> {
        self.current_user()?.ok_or(Error::NotLoggedIn)
    }

    /// Drop the session; returns whether one existed
    pub fn logout(&self) -> Result<bool> {
        self.storage.clear_session()
    }
}

fn normalize_email(raw: &str) -> Result<String> {
    let email = raw.trim().to_lowercase();
    let valid = email
        .split_once('@')
        .map(|(local, domain)| !local.is_empty() && domain.contains('.'))
        .unwrap_or(false);
    if !valid {
        return Err(Error::InvalidArgument(format!("invalid email: {}", raw)));
    }
    Ok(email)
}

fn require_name(raw: &str) -> Result<String> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(Error::InvalidArgument("name cannot be empty".to_string()));
    }
    Ok(name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn service() -> (TempDir, AuthService) {
        let temp = TempDir::new().unwrap();
        let storage = Storage::new(temp.path().to_path_buf());
        storage.init_all().unwrap();
        let service = AuthService::new(storage, AuthConfig::default());
        (temp, service)
    }

    fn now() -> DateTime<Utc> {
        "2024-06-15T12:00:00Z".parse().unwrap()
    }

    #[test]
    fn generated_codes_are_six_digits() {
        for _ in 0..50 {
            let code = generate_code();
            assert_eq!(code.len(), 6);
            assert!(code.chars().all(|c| c.is_ascii_digit()));
            assert_ne!(code.chars().next(), Some('0'));
        }
    }

    #[test]
    fn send_then_verify_signs_in() {
        let (_temp, service) = service();

        let issued = service.send_code("Ana@Example.com", "Ana", now()).unwrap();
        assert_eq!(issued.email, "ana@example.com");

        let user = service
            .verify_code("ana@example.com", &issued.code, now())
            .unwrap();
        assert_eq!(user.name, "Ana");
        assert_eq!(
            service.current_user().unwrap().map(|u| u.id),
            Some(user.id.clone())
        );

        // Codes are single use.
        assert!(matches!(
            service.verify_code("ana@example.com", &issued.code, now()),
            Err(Error::CodeNotFound(_))
        ));
    }

    #[test]
    fn stable_identity_across_logins() {
        let (_temp, service) = service();

        let first = service.send_code("ana@example.com", "Ana", now()).unwrap();
        let user = service
            .verify_code("ana@example.com", &first.code, now())
            .unwrap();

        service.logout().unwrap();
        let second = service.send_code("ana@example.com", "Ana", now()).unwrap();
        let again = service
            .verify_code("ana@example.com", &second.code, now())
            .unwrap();

        assert_eq!(user.id, again.id);
    }

    #[test]
    fn wrong_code_is_rejected_and_stays_open() {
        let (_temp, service) = service();
        let issued = service.send_code("ana@example.com", "Ana", now()).unwrap();

        let wrong = if issued.code == "111111" { "222222" } else { "111111" };
        assert!(matches!(
            service.verify_code("ana@example.com", wrong, now()),
            Err(Error::CodeMismatch)
        ));
        // The right code still works afterwards.
        service
            .verify_code("ana@example.com", &issued.code, now())
            .unwrap();
    }

    #[test]
    fn codes_expire() {
        let (_temp, service) = service();
        let issued = service.send_code("ana@example.com", "Ana", now()).unwrap();

        let late = now() + Duration::minutes(11);
        assert!(matches!(
            service.verify_code("ana@example.com", &issued.code, late),
            Err(Error::CodeExpired(_))
        ));
    }

    #[test]
    fn resend_supersedes_previous_code() {
        let mut codes = CodeStore::default();
        let ttl = Duration::minutes(10);

        codes.issue("ana@example.com", "Ana", now(), ttl);
        let second = codes.issue("ana@example.com", "Ana", now(), ttl);

        let statuses: Vec<CodeStatus> = codes.all().iter().map(|code| code.status).collect();
        assert_eq!(statuses, vec![CodeStatus::Expired, CodeStatus::Issued]);
        assert_eq!(
            codes.active_for("ana@example.com", now()).map(|c| c.code.clone()),
            Some(second.code)
        );
    }

    #[test]
    fn unknown_email_has_no_code() {
        let (_temp, service) = service();
        assert!(matches!(
            service.verify_code("ghost@example.com", "123456", now()),
            Err(Error::CodeNotFound(_))
        ));
    }

    #[test]
    fn rejects_bad_emails_and_names() {
        let (_temp, service) = service();
        assert!(service.send_code("not-an-email", "Ana", now()).is_err());
        assert!(service.send_code("a@b", "Ana", now()).is_err());
        assert!(service.send_code("ana@example.com", "  ", now()).is_err());
    }
}

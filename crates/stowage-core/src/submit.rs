// ── Intake controllers ──
//
// Package submission and user registration. Both validate locally,
// hold a busy flag for the duration of the network round-trip (double
// submission guard), and hand the actual I/O to `Inventory`.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use stowage_api::{EmailNotification, NewPackage};
use tracing::debug;

use crate::error::CoreError;
use crate::inventory::Inventory;
use crate::model::User;

// ── Busy flag ───────────────────────────────────────────────────────

/// Clears the flag when the operation ends, success or failure.
struct BusyGuard<'a>(&'a AtomicBool);

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

fn acquire<'a>(flag: &'a AtomicBool, operation: &'static str) -> Result<BusyGuard<'a>, CoreError> {
    flag.compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
        .map_err(|_| CoreError::Busy { operation })?;
    Ok(BusyGuard(flag))
}

// ── Recipient matching ──────────────────────────────────────────────

/// How a package surname maps onto a registered user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecipientMatch {
    /// Surname equals a user's name (ASCII case-insensitive).
    Exact(Arc<User>),
    /// No exact match, but a user's name contains the surname. Shown to
    /// the operator as a suggestion, never trusted silently.
    Fuzzy(Arc<User>),
    None,
}

impl RecipientMatch {
    pub fn user(&self) -> Option<&Arc<User>> {
        match self {
            Self::Exact(u) | Self::Fuzzy(u) => Some(u),
            Self::None => None,
        }
    }
}

/// Find the registered user a surname refers to. Exact equality wins;
/// substring containment is only a fallback suggestion.
pub fn resolve_recipient(users: &[Arc<User>], surname: &str) -> RecipientMatch {
    let needle = surname.trim();
    if needle.is_empty() {
        return RecipientMatch::None;
    }

    if let Some(user) = users.iter().find(|u| u.name.eq_ignore_ascii_case(needle)) {
        return RecipientMatch::Exact(Arc::clone(user));
    }

    let lowered = needle.to_lowercase();
    if let Some(user) = users
        .iter()
        .find(|u| u.name.to_lowercase().contains(&lowered))
    {
        return RecipientMatch::Fuzzy(Arc::clone(user));
    }

    RecipientMatch::None
}

// ── Validation ──────────────────────────────────────────────────────

/// Normalize an email: surrounding whitespace dropped, lowercased.
pub fn normalize_email(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Minimal sanity check, not RFC enforcement: exactly one `@`, no
/// whitespace, and a dot in the domain with characters on both sides.
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    domain
        .split_once('.')
        .is_some_and(|(head, tail)| !head.is_empty() && !tail.is_empty())
}

// ── Package submission ──────────────────────────────────────────────

/// Raw form fields as the operator typed them.
#[derive(Debug, Clone, Default)]
pub struct PackageInput {
    pub id: String,
    pub surname: String,
    /// Weight in kilograms, still text at this point.
    pub weight: String,
    pub notify: NotifyOptions,
}

/// Whether to ask the backend to email the recipient.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotifyOptions {
    pub send: bool,
    pub message: Option<String>,
}

impl NotifyOptions {
    fn into_wire(self) -> EmailNotification {
        EmailNotification {
            send_notification: self.send,
            notification_message: self.message.filter(|m| !m.trim().is_empty()),
        }
    }
}

/// Controller behind the admin intake form.
#[derive(Clone)]
pub struct PackageSubmission {
    inner: Arc<SubmissionInner>,
}

struct SubmissionInner {
    inventory: Inventory,
    busy: AtomicBool,
}

impl PackageSubmission {
    pub fn new(inventory: Inventory) -> Self {
        Self {
            inner: Arc::new(SubmissionInner {
                inventory,
                busy: AtomicBool::new(false),
            }),
        }
    }

    pub fn is_busy(&self) -> bool {
        self.inner.busy.load(Ordering::Acquire)
    }

    /// Validate and submit a package.
    ///
    /// At most one submission is in flight at a time; a second call
    /// while busy fails fast with [`CoreError::Busy`] and performs no
    /// network traffic. On success the returned match tells the UI
    /// whether the surname mapped to a registered user (a missing match
    /// is a warning, never a rejection).
    pub async fn submit(&self, input: PackageInput) -> Result<RecipientMatch, CoreError> {
        let _guard = acquire(&self.inner.busy, "package submission")?;

        let id = input.id.trim().to_owned();
        if id.is_empty() {
            return Err(CoreError::validation("A tracking identifier is required."));
        }

        let surname = input.surname.trim().to_owned();
        if surname.is_empty() {
            return Err(CoreError::validation("A surname is required."));
        }

        let weight_kg = match input.weight.trim().parse::<f64>() {
            Ok(w) if w > 0.0 && w.is_finite() => w,
            _ => return Err(CoreError::validation("Weight must be a positive number.")),
        };

        let users = self.inner.inventory.store().users_snapshot();
        let recipient = resolve_recipient(&users, &surname);
        if input.notify.send && recipient.user().is_none() {
            debug!(%surname, "notification requested but no matching user");
        }

        let request =
            NewPackage::new(id, surname, weight_kg).with_notification(input.notify.into_wire());
        self.inner.inventory.create_package(&request).await?;

        Ok(recipient)
    }
}

// ── User registration ───────────────────────────────────────────────

/// Controller behind the admin "add user" form.
#[derive(Clone)]
pub struct UserRegistration {
    inner: Arc<RegistrationInner>,
}

struct RegistrationInner {
    inventory: Inventory,
    busy: AtomicBool,
}

impl UserRegistration {
    pub fn new(inventory: Inventory) -> Self {
        Self {
            inner: Arc::new(RegistrationInner {
                inventory,
                busy: AtomicBool::new(false),
            }),
        }
    }

    pub fn is_busy(&self) -> bool {
        self.inner.busy.load(Ordering::Acquire)
    }

    /// Validate and register a user. Email is normalized before it goes
    /// on the wire.
    pub async fn register(&self, name: &str, email: &str) -> Result<User, CoreError> {
        let _guard = acquire(&self.inner.busy, "user registration")?;

        let name = name.trim();
        if name.is_empty() {
            return Err(CoreError::validation("A name is required."));
        }

        let email = normalize_email(email);
        if !is_valid_email(&email) {
            return Err(CoreError::validation("Enter a valid email address."));
        }

        self.inner.inventory.create_user(name, &email).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn user(id: i64, name: &str, email: &str) -> Arc<User> {
        Arc::new(User {
            id,
            name: name.into(),
            email: email.into(),
            status: "active".into(),
        })
    }

    #[test]
    fn email_validation_accepts_plausible_addresses() {
        assert!(is_valid_email("rossi@example.com"));
        assert!(is_valid_email("a.b+c@sub.example.org"));
    }

    #[test]
    fn email_validation_rejects_junk() {
        assert!(!is_valid_email(""));
        assert!(!is_valid_email("rossi"));
        assert!(!is_valid_email("rossi@example"));
        assert!(!is_valid_email("rossi@.com"));
        assert!(!is_valid_email("rossi@com."));
        assert!(!is_valid_email("ro ssi@example.com"));
        assert!(!is_valid_email("a@b@example.com"));
        assert!(!is_valid_email("@example.com"));
    }

    #[test]
    fn normalize_trims_and_lowercases() {
        assert_eq!(normalize_email("  Rossi@Example.COM "), "rossi@example.com");
    }

    #[test]
    fn exact_match_beats_fuzzy() {
        let users = vec![user(1, "Rossini", "a@example.com"), user(2, "Rossi", "b@example.com")];

        match resolve_recipient(&users, "rossi") {
            RecipientMatch::Exact(u) => assert_eq!(u.id, 2),
            other => panic!("expected exact match, got {other:?}"),
        }
    }

    #[test]
    fn fuzzy_match_is_a_fallback() {
        let users = vec![user(1, "Rossini", "a@example.com")];

        match resolve_recipient(&users, "rossi") {
            RecipientMatch::Fuzzy(u) => assert_eq!(u.id, 1),
            other => panic!("expected fuzzy match, got {other:?}"),
        }
    }

    #[test]
    fn no_match_for_unknown_or_blank_surname() {
        let users = vec![user(1, "Rossi", "a@example.com")];
        assert_eq!(resolve_recipient(&users, "Verdi"), RecipientMatch::None);
        assert_eq!(resolve_recipient(&users, "   "), RecipientMatch::None);
    }

    #[test]
    fn notify_options_drop_blank_messages() {
        let wire = NotifyOptions {
            send: true,
            message: Some("   ".into()),
        }
        .into_wire();
        assert!(wire.send_notification);
        assert!(wire.notification_message.is_none());
    }
}

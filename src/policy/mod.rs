//! Ownership and validation rules shared by the news and notes apps.
//!
//! Everything here is deliberately storage-free: handlers pass in an explicit
//! [`Requester`] identity and get back typed decisions, so the rules can be
//! tested without a database or an HTTP stack.
//!
//! # Core Rules
//!
//! - A resource has exactly one owner. Only the owner may view or mutate it
//!   through direct-object URLs. Any other authenticated user gets a
//!   not-found decision — never "forbidden", so the response does not reveal
//!   whether the resource exists.
//! - Anonymous requesters are sent to the login page with a `next` parameter
//!   pointing back at the original URL.
//! - Free-text submissions containing a banned word are rejected with a
//!   field-level warning and nothing is persisted.
//! - Note slugs are unique; an omitted slug is derived from the title.

use thiserror::Error;
use uuid::Uuid;

/// Words that invalidate a comment when present as a substring.
/// Matching is case-sensitive.
pub const BAD_WORDS: &[&str] = &["rascal", "scoundrel"];

/// Warning attached to the `text` field when a banned word is found.
pub const WARNING: &str = "Watch your language!";

/// Suffix appended to a colliding slug in the `slug` field error.
pub const SLUG_TAKEN: &str = " is already in use, pick a unique slug";

/// Longest slug we will store.
const MAX_SLUG_LEN: usize = 100;

/// The identity a request acts under.
///
/// Always passed explicitly into policy checks; the policy layer never
/// consults ambient session state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requester {
    Anonymous,
    User(Uuid),
}

impl Requester {
    pub fn user_id(&self) -> Option<Uuid> {
        match self {
            Self::Anonymous => None,
            Self::User(id) => Some(*id),
        }
    }

    pub fn is_anonymous(&self) -> bool {
        matches!(self, Self::Anonymous)
    }
}

/// Outcome of an authorization check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Access {
    /// Serve the page or permit the mutation.
    Granted,
    /// Respond 404. Used for ownership mismatches so the response does not
    /// disclose whether the resource exists.
    NotFound,
    /// Respond 302 to the contained login URL.
    LoginRedirect(String),
}

/// Build the login URL with a `next` parameter back to the original page.
pub fn login_url(next: &str) -> String {
    format!("/auth/login/?next={next}")
}

/// Gate a page that requires any authenticated user (note listing, create
/// form, success page). Anonymous requesters are redirected to login.
pub fn require_login(requester: &Requester, path: &str) -> Access {
    match requester {
        Requester::Anonymous => Access::LoginRedirect(login_url(path)),
        Requester::User(_) => Access::Granted,
    }
}

/// Gate a direct-object URL for a resource owned by `owner`.
///
/// Owners get through; other authenticated users get [`Access::NotFound`]
/// regardless of whether the resource exists; anonymous requesters are
/// redirected to login.
pub fn authorize(requester: &Requester, owner: Uuid, path: &str) -> Access {
    match requester {
        Requester::Anonymous => Access::LoginRedirect(login_url(path)),
        Requester::User(id) if *id == owner => Access::Granted,
        Requester::User(_) => Access::NotFound,
    }
}

/// A recoverable validation failure attached to a single form field.
///
/// Surfaced to clients as `{field: [message]}` with HTTP 200; it never
/// becomes an error response.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Reject comment text containing any banned word as a substring.
pub fn validate_comment_text(text: &str) -> Result<(), FieldError> {
    if BAD_WORDS.iter().any(|word| text.contains(word)) {
        return Err(FieldError::new("text", WARNING));
    }
    Ok(())
}

/// Decide the slug for a note.
///
/// A provided slug must not collide with an existing one (case-sensitive
/// exact match; `taken` reports collisions). An omitted or empty slug is
/// derived from the title by transliteration + slugification, with a numeric
/// suffix appended until it is free.
pub fn assign_slug(
    provided: Option<&str>,
    title: &str,
    taken: &dyn Fn(&str) -> bool,
) -> Result<String, FieldError> {
    match provided {
        Some(slug) if !slug.is_empty() => {
            if taken(slug) {
                return Err(FieldError::new("slug", format!("{slug}{SLUG_TAKEN}")));
            }
            Ok(slug.to_string())
        }
        _ => Ok(derive_slug(title, taken)),
    }
}

/// Transliterate and slugify a title, truncated to the storage limit.
pub fn slugify_title(title: &str) -> String {
    let mut slug = slug::slugify(title);
    if slug.len() > MAX_SLUG_LEN {
        slug.truncate(MAX_SLUG_LEN);
        // never end on the separator
        while slug.ends_with('-') {
            slug.pop();
        }
    }
    slug
}

fn derive_slug(title: &str, taken: &dyn Fn(&str) -> bool) -> String {
    let base = slugify_title(title);
    if !taken(&base) {
        return base;
    }
    let mut n = 2u32;
    loop {
        let candidate = format!("{base}-{n}");
        if !taken(&candidate) {
            return candidate;
        }
        n += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn never_taken(_: &str) -> bool {
        false
    }

    #[test]
    fn owner_is_granted_access() {
        let owner = Uuid::new_v4();
        let access = authorize(&Requester::User(owner), owner, "/notes/a/");
        assert_eq!(access, Access::Granted);
    }

    #[test]
    fn other_user_gets_not_found_not_forbidden() {
        let owner = Uuid::new_v4();
        let other = Uuid::new_v4();
        let access = authorize(&Requester::User(other), owner, "/notes/a/");
        assert_eq!(access, Access::NotFound);
    }

    #[test]
    fn anonymous_is_redirected_to_login_with_next() {
        let owner = Uuid::new_v4();
        let access = authorize(&Requester::Anonymous, owner, "/notes/a/edit/");
        assert_eq!(
            access,
            Access::LoginRedirect("/auth/login/?next=/notes/a/edit/".to_string())
        );
    }

    #[test]
    fn require_login_grants_any_authenticated_user() {
        assert_eq!(
            require_login(&Requester::User(Uuid::new_v4()), "/notes/"),
            Access::Granted
        );
        assert_eq!(
            require_login(&Requester::Anonymous, "/notes/"),
            Access::LoginRedirect("/auth/login/?next=/notes/".to_string())
        );
    }

    #[test]
    fn banned_word_rejected_as_substring() {
        for word in BAD_WORDS {
            let text = format!("some text, {word}, more text");
            let err = validate_comment_text(&text).unwrap_err();
            assert_eq!(err.field, "text");
            assert_eq!(err.message, WARNING);
        }
    }

    #[test]
    fn banned_word_match_is_case_sensitive() {
        assert!(validate_comment_text("Rascal behaviour").is_ok());
        assert!(validate_comment_text("plain good text").is_ok());
    }

    #[test]
    fn provided_slug_is_kept_when_free() {
        let slug = assign_slug(Some("my-note"), "Ignored", &never_taken).unwrap();
        assert_eq!(slug, "my-note");
    }

    #[test]
    fn colliding_slug_rejected_with_suffix_message() {
        let taken = |s: &str| s == "my-note";
        let err = assign_slug(Some("my-note"), "Ignored", &taken).unwrap_err();
        assert_eq!(err.field, "slug");
        assert_eq!(err.message, format!("my-note{SLUG_TAKEN}"));
    }

    #[test]
    fn omitted_slug_derived_from_title() {
        let slug = assign_slug(None, "Hello World", &never_taken).unwrap();
        assert_eq!(slug, "hello-world");
    }

    #[test]
    fn empty_slug_treated_as_omitted() {
        let slug = assign_slug(Some(""), "Hello World", &never_taken).unwrap();
        assert_eq!(slug, "hello-world");
    }

    #[test]
    fn cyrillic_title_is_transliterated() {
        let slug = assign_slug(None, "Заметка № 1", &never_taken).unwrap();
        assert_eq!(slug, slugify_title("Заметка № 1"));
        assert!(!slug.is_empty());
        assert!(slug.is_ascii());
        assert!(slug.ends_with('1'));
    }

    #[test]
    fn derived_slug_gets_numeric_suffix_on_collision() {
        let taken = |s: &str| s == "hello-world" || s == "hello-world-2";
        let slug = assign_slug(None, "Hello World", &taken).unwrap();
        assert_eq!(slug, "hello-world-3");
    }

    #[test]
    fn long_title_slug_is_truncated() {
        let title = "word ".repeat(60);
        let slug = slugify_title(&title);
        assert!(slug.len() <= 100);
        assert!(!slug.ends_with('-'));
    }
}

//! Edge interface: what the surrounding request layer does with an
//! admission outcome.
//!
//! The HTTP pipeline itself lives outside this crate; these types pin down
//! the contract it must honor — which paths are room-scoped, what cookie
//! to set and with what scope, and where to redirect rejected callers.

use serde::{Deserialize, Serialize};

use roomgate_core::config::admission::AdmissionConfig;

use super::client::AdmissionOutcome;

/// Path prefix identifying room-scoped requests.
const ROOM_PATH_PREFIX: &str = "/room/";

/// Extracts the room ID from a request path.
///
/// Only paths of the form `/room/<roomId>[/...]` are room-scoped; every
/// other path bypasses admission entirely.
pub fn room_id_from_path(path: &str) -> Option<&str> {
    let rest = path.strip_prefix(ROOM_PATH_PREFIX)?;
    let end = rest.find(['/', '?']).unwrap_or(rest.len());
    let room_id = &rest[..end];
    (!room_id.is_empty()).then_some(room_id)
}

/// SameSite attribute for the session cookie.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SameSite {
    /// Sent on top-level navigations only.
    Lax,
    /// Never sent cross-site.
    Strict,
}

impl SameSite {
    fn as_str(self) -> &'static str {
        match self {
            Self::Lax => "Lax",
            Self::Strict => "Strict",
        }
    }
}

/// Instruction to associate a session token with the caller's transport.
///
/// The cookie is scoped to the room's own path so the token is never sent
/// for requests to other rooms, and flagged `HttpOnly` so page scripts
/// cannot read it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CookieDirective {
    /// Cookie name.
    pub name: String,
    /// The session token.
    pub value: String,
    /// Path scope, `/room/<roomId>`.
    pub path: String,
    /// Inaccessible to page scripts. Always set.
    pub http_only: bool,
    /// Restricted to secure transport.
    pub secure: bool,
    /// SameSite attribute.
    pub same_site: SameSite,
}

impl CookieDirective {
    /// Renders the directive as a `Set-Cookie` header value.
    pub fn to_set_cookie_header(&self) -> String {
        let mut header = format!(
            "{}={}; Path={}; SameSite={}",
            self.name,
            self.value,
            self.path,
            self.same_site.as_str()
        );
        if self.http_only {
            header.push_str("; HttpOnly");
        }
        if self.secure {
            header.push_str("; Secure");
        }
        header
    }
}

/// Machine-readable reason carried on a landing redirect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LandingFlag {
    /// The room does not exist.
    NotFound,
    /// The room is at capacity.
    RoomFull,
}

impl LandingFlag {
    /// The flag value as it appears in the redirect location.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NotFound => "notFound",
            Self::RoomFull => "roomFull",
        }
    }
}

/// Redirect to the landing location with a reason flag.
///
/// Both rejection cases resolve to the same redirect shape, distinguished
/// only by the flag, so the landing UI can render distinct messages
/// without anything about the store leaking to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LandingRedirect {
    /// Full redirect location including the reason parameter.
    pub location: String,
    /// The rejection reason.
    pub flag: LandingFlag,
}

impl LandingRedirect {
    /// Builds a redirect to `landing_path` carrying `flag`.
    pub fn new(landing_path: &str, flag: LandingFlag) -> Self {
        Self {
            location: format!("{}?reason={}", landing_path, flag.as_str()),
            flag,
        }
    }
}

/// What the request layer does after an admission outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EdgeAction {
    /// Let the original request proceed unmodified.
    Proceed,
    /// Set the session cookie, then let the request proceed.
    SetCookie(CookieDirective),
    /// Redirect to the landing location.
    Redirect(LandingRedirect),
}

/// Maps a confirmed admission outcome to its edge action.
///
/// The cookie is only ever produced for [`AdmissionOutcome::Admitted`],
/// i.e. after the store confirmed the append; an outcome is never turned
/// into a cookie speculatively. `AlreadyAdmitted` performs no transport
/// mutation at all.
pub fn edge_action(
    outcome: &AdmissionOutcome,
    room_id: &str,
    config: &AdmissionConfig,
) -> EdgeAction {
    match outcome {
        AdmissionOutcome::AlreadyAdmitted(_) => EdgeAction::Proceed,
        AdmissionOutcome::Admitted(token) => EdgeAction::SetCookie(CookieDirective {
            name: config.cookie.name.clone(),
            value: token.clone(),
            path: format!("{ROOM_PATH_PREFIX}{room_id}"),
            http_only: true,
            secure: config.cookie.secure,
            same_site: SameSite::Lax,
        }),
        AdmissionOutcome::RoomNotFound => {
            EdgeAction::Redirect(LandingRedirect::new(&config.landing_path, LandingFlag::NotFound))
        }
        AdmissionOutcome::RoomFull => {
            EdgeAction::Redirect(LandingRedirect::new(&config.landing_path, LandingFlag::RoomFull))
        }
    }
}

//! Qualified event keys: an event kind plus an optional device scope
//!
//! Hosts address channels with the string form `"<kind>"` or
//! `"<kind>@<scope>"`. That string is parsed once, at the boundary, into a
//! [`QualifiedEventKey`]; nothing past the boundary handles the raw form.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::catalog::EventKind;
use crate::error::{EventError, Result};

/// Separator between the event name and the scope in the wire form
pub const SCOPE_SEPARATOR: char = '@';

/// The unit of subscription
///
/// Two keys are equal iff both the kind and the scope match, so
/// `AUDIO_CHANGE` and `AUDIO_CHANGE@dev1` are independent channels.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct QualifiedEventKey {
    pub kind: EventKind,
    pub scope: Option<String>,
}

impl QualifiedEventKey {
    /// Key for an unscoped channel
    pub fn new(kind: EventKind) -> Self {
        Self { kind, scope: None }
    }

    /// Key for a channel scoped to one device or session
    pub fn scoped(kind: EventKind, scope: impl Into<String>) -> Self {
        Self {
            kind,
            scope: Some(scope.into()),
        }
    }

    /// Build a key from an optional scope reference
    pub fn with_scope(kind: EventKind, scope: Option<&str>) -> Self {
        Self {
            kind,
            scope: scope.map(str::to_owned),
        }
    }

    /// Parse the wire form
    ///
    /// The string is split on the first `@`. Anything after it, including
    /// further `@` characters or nothing at all, is the scope.
    pub fn parse(raw: &str) -> Result<Self> {
        let (name, scope) = match raw.split_once(SCOPE_SEPARATOR) {
            Some((name, scope)) => (name, Some(scope)),
            None => (raw, None),
        };

        let kind = EventKind::from_name(name)
            .ok_or_else(|| EventError::UnknownEvent(name.to_string()))?;

        Ok(Self::with_scope(kind, scope))
    }

    pub fn scope(&self) -> Option<&str> {
        self.scope.as_deref()
    }
}

impl fmt::Display for QualifiedEventKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.scope {
            Some(scope) => write!(f, "{}{}{}", self.kind, SCOPE_SEPARATOR, scope),
            None => write!(f, "{}", self.kind),
        }
    }
}

impl FromStr for QualifiedEventKey {
    type Err = EventError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<EventKind> for QualifiedEventKey {
    fn from(kind: EventKind) -> Self {
        Self::new(kind)
    }
}

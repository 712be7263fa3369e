//! Field merge policy applied after a provider login.
//!
//! Names and avatar are set-once so user edits survive later logins with stale
//! provider data. Profile id and tokens follow the provider on every login.

use chrono::{DateTime, SecondsFormat, Utc};
use tracing::warn;

use crate::passport::{
    fields::{Fields, NameAttr},
    profile::Profile,
    provider::Provider,
    user::User,
    utils::{is_url, strip_size_param},
};

/// Credentials handed over by the provider together with the profile.
#[derive(Clone, Copy, Debug, Default)]
pub struct Tokens<'a> {
    pub access: Option<&'a str>,
    pub refresh: Option<&'a str>,
}

impl<'a> Tokens<'a> {
    #[must_use]
    pub fn new(access: Option<&'a str>, refresh: Option<&'a str>) -> Self {
        let present = |token: Option<&'a str>| token.filter(|t| !t.trim().is_empty());
        Self {
            access: present(access),
            refresh: present(refresh),
        }
    }
}

/// Merge `profile` into `user`. Returns whether any stored value changed.
pub(crate) fn merge_profile(
    user: &mut User,
    provider: Provider,
    profile_id: &str,
    profile: &Profile,
    tokens: Tokens<'_>,
    fields: &Fields,
    now: DateTime<Utc>,
) -> bool {
    let mut changed = false;

    for (key, attr) in fields.name_fields() {
        if !user.is_blank(key) {
            continue;
        }
        let value = match attr {
            NameAttr::Display => profile.display_name(),
            NameAttr::Given => profile.given_name(),
            NameAttr::Family => profile.family_name(),
        };
        if let Some(value) = value {
            changed |= user.update(key, value);
        }
    }

    if user.is_blank(&fields.avatar_url) {
        if let Some(url) = profile.image_url(provider).filter(|url| is_url(url)) {
            changed |= user.update(&fields.avatar_url, strip_size_param(url));
        }
    }

    let id_key = fields.profile_id(provider);
    if let Some(previous) = user.get_str(id_key).filter(|p| !p.is_empty() && *p != profile_id) {
        warn!(
            %provider,
            previous,
            current = profile_id,
            "provider profile id changed for existing user"
        );
    }
    changed |= user.update(id_key, profile_id);

    if let Some(access) = tokens.access {
        changed |= user.update(fields.access_token(provider), access);
    }
    if let Some(refresh) = tokens.refresh {
        changed |= user.update(fields.refresh_token(provider), refresh);
    }

    // A login always counts as a change, even within the same millisecond.
    if let Some(key) = &fields.last_login_at {
        user.set(key, now.to_rfc3339_opts(SecondsFormat::Millis, true));
        changed = true;
    }

    changed
}

//! Identity assertions received from an OAuth callback.
//!
//! The shape follows the normalized profile most OAuth client libraries hand to
//! a verify callback: `id`, `displayName`, `name.givenName`, `emails[].value`,
//! `photos[].value` and the provider's raw payload under `_json`.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::{provider::Provider, utils::valid_email};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    #[serde(default, deserialize_with = "string_or_number")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub emails: Vec<ProfileValue>,
    /// Top-level address, only sent by Apple.
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub given_name: Option<String>,
    #[serde(default)]
    pub family_name: Option<String>,
    #[serde(default)]
    pub name: Option<ProfileName>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub photos: Vec<ProfileValue>,
    #[serde(default, rename = "_json")]
    pub raw: Option<Value>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileValue {
    #[serde(default)]
    pub value: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileName {
    #[serde(default)]
    pub given_name: Option<String>,
    #[serde(default)]
    pub family_name: Option<String>,
}

fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(value)) => Some(value),
        Some(Value::Number(number)) => Some(number.to_string()),
        _ => None,
    })
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

fn non_blank(value: Option<&String>) -> Option<&str> {
    value.map(|v| v.trim()).filter(|v| !v.is_empty())
}

impl Profile {
    /// Provider-assigned identifier, if present and not blank.
    #[must_use]
    pub fn provider_id(&self) -> Option<&str> {
        non_blank(self.id.as_ref())
    }

    /// First well-formed email address according to the provider's rules.
    #[must_use]
    pub fn email_for(&self, provider: Provider) -> Option<&str> {
        match provider {
            Provider::Apple => non_blank(self.email.as_ref()).filter(|email| valid_email(email)),
            Provider::Google | Provider::Github => self
                .emails
                .iter()
                .filter_map(|entry| non_blank(entry.value.as_ref()))
                .find(|email| valid_email(email)),
        }
    }

    #[must_use]
    pub fn display_name(&self) -> Option<&str> {
        non_blank(self.display_name.as_ref())
    }

    #[must_use]
    pub fn given_name(&self) -> Option<&str> {
        non_blank(self.given_name.as_ref())
            .or_else(|| self.name.as_ref().and_then(|n| non_blank(n.given_name.as_ref())))
    }

    #[must_use]
    pub fn family_name(&self) -> Option<&str> {
        non_blank(self.family_name.as_ref())
            .or_else(|| self.name.as_ref().and_then(|n| non_blank(n.family_name.as_ref())))
    }

    /// Candidate avatar URL. Google prefers the raw `image.url`; Apple sends none.
    #[must_use]
    pub fn image_url(&self, provider: Provider) -> Option<&str> {
        let first_photo = || {
            self.photos
                .first()
                .and_then(|photo| non_blank(photo.value.as_ref()))
        };
        match provider {
            Provider::Google => self
                .raw
                .as_ref()
                .and_then(|raw| raw.pointer("/image/url"))
                .and_then(Value::as_str)
                .map(str::trim)
                .filter(|url| !url.is_empty())
                .or_else(first_photo),
            Provider::Github => first_photo(),
            Provider::Apple => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use serde_json::json;

    #[test]
    fn numeric_ids_become_strings() -> Result<()> {
        let profile: Profile = serde_json::from_value(json!({ "id": 3 }))?;
        assert_eq!(profile.provider_id(), Some("3"));
        Ok(())
    }

    #[test]
    fn null_lists_are_empty() -> Result<()> {
        let profile: Profile =
            serde_json::from_value(json!({ "id": "3", "emails": null, "photos": null }))?;
        assert!(profile.emails.is_empty());
        assert!(profile.photos.is_empty());
        assert_eq!(profile.email_for(Provider::Github), None);
        assert_eq!(profile.image_url(Provider::Github), None);
        Ok(())
    }

    #[test]
    fn blank_id_is_absent() -> Result<()> {
        let profile: Profile = serde_json::from_value(json!({ "id": "  " }))?;
        assert_eq!(profile.provider_id(), None);
        Ok(())
    }

    #[test]
    fn email_skips_malformed_entries() -> Result<()> {
        let profile: Profile = serde_json::from_value(json!({
            "emails": [{ "value": "test" }, {}, { "value": "a@x.com" }],
            "email": "apple@x.com",
        }))?;
        assert_eq!(profile.email_for(Provider::Github), Some("a@x.com"));
        assert_eq!(profile.email_for(Provider::Google), Some("a@x.com"));
        assert_eq!(profile.email_for(Provider::Apple), Some("apple@x.com"));
        Ok(())
    }

    #[test]
    fn apple_ignores_email_list() -> Result<()> {
        let profile: Profile = serde_json::from_value(json!({
            "emails": [{ "value": "a@x.com" }],
        }))?;
        assert_eq!(profile.email_for(Provider::Apple), None);
        Ok(())
    }

    #[test]
    fn names_fall_back_to_nested_name() -> Result<()> {
        let profile: Profile = serde_json::from_value(json!({
            "displayName": "Robert",
            "name": { "givenName": "Robert", "familyName": "Frost" },
        }))?;
        assert_eq!(profile.display_name(), Some("Robert"));
        assert_eq!(profile.given_name(), Some("Robert"));
        assert_eq!(profile.family_name(), Some("Frost"));
        Ok(())
    }

    #[test]
    fn google_prefers_raw_image() -> Result<()> {
        let profile: Profile = serde_json::from_value(json!({
            "photos": [{ "value": "http://img/photo.png" }],
            "_json": { "image": { "url": "http://img/b.png?sz=50" } },
        }))?;
        assert_eq!(profile.image_url(Provider::Google), Some("http://img/b.png?sz=50"));
        assert_eq!(profile.image_url(Provider::Github), Some("http://img/photo.png"));
        assert_eq!(profile.image_url(Provider::Apple), None);
        Ok(())
    }
}

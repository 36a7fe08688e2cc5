//! The user context referenced by flag evaluation and analytics events.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A user of the application, as seen by flag evaluation and analytics.
///
/// A `User` carries the stable key the client evaluates flags against, a set
/// of optional built-in attributes, and a map of custom attributes. The
/// `private_attribute_names` set lists attributes the application does not
/// want forwarded to the analytics service; the attributes themselves are
/// still present here, and stripping them is the event processor's job.
///
/// Users are immutable once built. Construct them with [`User::with_key`]:
///
/// ```
/// use flagkit_user::User;
///
/// let user = User::with_key("user-37")
///     .email("u37@example.com")
///     .custom("plan", "pro")
///     .private_attribute("email")
///     .build();
///
/// assert_eq!(user.key(), "user-37");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    key: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    secondary: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    ip: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    country: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    email: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    avatar: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    first_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    last_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    anonymous: Option<bool>,

    /// Custom attributes, sorted by name for deterministic serialization.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    custom: BTreeMap<String, Value>,

    /// Names of attributes the application marked private.
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    private_attribute_names: BTreeSet<String>,
}

impl User {
    /// Starts building a user with the given key.
    pub fn with_key(key: impl Into<String>) -> UserBuilder {
        UserBuilder {
            user: User {
                key: key.into(),
                secondary: None,
                ip: None,
                country: None,
                email: None,
                name: None,
                avatar: None,
                first_name: None,
                last_name: None,
                anonymous: None,
                custom: BTreeMap::new(),
                private_attribute_names: BTreeSet::new(),
            },
        }
    }

    /// The stable key identifying this user.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Secondary key used for percentage-rollout bucketing.
    pub fn secondary(&self) -> Option<&str> {
        self.secondary.as_deref()
    }

    /// IP address of the user, if supplied.
    pub fn ip(&self) -> Option<&str> {
        self.ip.as_deref()
    }

    /// Country of the user, if supplied.
    pub fn country(&self) -> Option<&str> {
        self.country.as_deref()
    }

    /// Email address of the user, if supplied.
    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    /// Full display name, if supplied.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Avatar URL, if supplied.
    pub fn avatar(&self) -> Option<&str> {
        self.avatar.as_deref()
    }

    /// Given name, if supplied.
    pub fn first_name(&self) -> Option<&str> {
        self.first_name.as_deref()
    }

    /// Family name, if supplied.
    pub fn last_name(&self) -> Option<&str> {
        self.last_name.as_deref()
    }

    /// Whether the user is anonymous. `None` means the application never
    /// said either way, which downstream treats differently from `false`.
    pub fn anonymous(&self) -> Option<bool> {
        self.anonymous
    }

    /// All custom attributes, sorted by name.
    pub fn custom(&self) -> &BTreeMap<String, Value> {
        &self.custom
    }

    /// Looks up one custom attribute by name.
    pub fn custom_attribute(&self, name: &str) -> Option<&Value> {
        self.custom.get(name)
    }

    /// Names of attributes the application marked private.
    pub fn private_attribute_names(&self) -> &BTreeSet<String> {
        &self.private_attribute_names
    }
}

/// Builder for [`User`].
///
/// The key is the only required attribute and is supplied to
/// [`User::with_key`], so building cannot fail.
#[derive(Debug, Clone)]
pub struct UserBuilder {
    user: User,
}

impl UserBuilder {
    /// Sets the secondary bucketing key.
    pub fn secondary(mut self, value: impl Into<String>) -> Self {
        self.user.secondary = Some(value.into());
        self
    }

    /// Sets the IP address attribute.
    pub fn ip(mut self, value: impl Into<String>) -> Self {
        self.user.ip = Some(value.into());
        self
    }

    /// Sets the country attribute.
    pub fn country(mut self, value: impl Into<String>) -> Self {
        self.user.country = Some(value.into());
        self
    }

    /// Sets the email attribute.
    pub fn email(mut self, value: impl Into<String>) -> Self {
        self.user.email = Some(value.into());
        self
    }

    /// Sets the full display name.
    pub fn name(mut self, value: impl Into<String>) -> Self {
        self.user.name = Some(value.into());
        self
    }

    /// Sets the avatar URL.
    pub fn avatar(mut self, value: impl Into<String>) -> Self {
        self.user.avatar = Some(value.into());
        self
    }

    /// Sets the given name.
    pub fn first_name(mut self, value: impl Into<String>) -> Self {
        self.user.first_name = Some(value.into());
        self
    }

    /// Sets the family name.
    pub fn last_name(mut self, value: impl Into<String>) -> Self {
        self.user.last_name = Some(value.into());
        self
    }

    /// Marks the user as anonymous (or explicitly not).
    pub fn anonymous(mut self, value: bool) -> Self {
        self.user.anonymous = Some(value);
        self
    }

    /// Adds a custom attribute. Setting the same name twice keeps the last
    /// value.
    pub fn custom(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.user.custom.insert(name.into(), value.into());
        self
    }

    /// Marks an attribute name as private.
    pub fn private_attribute(mut self, name: impl Into<String>) -> Self {
        self.user.private_attribute_names.insert(name.into());
        self
    }

    /// Finishes building the user.
    pub fn build(self) -> User {
        self.user
    }
}

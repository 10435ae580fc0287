use std::fmt;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

/// Identifier shared by directory users and submitted posts.
///
/// Accepts a JSON number (`1`) or a decimal string (`"1"`) on input and
/// always serializes as a number. Comparison is plain integer equality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UserId(pub u64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl Serialize for UserId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(self.0)
    }
}

impl<'de> Deserialize<'de> for UserId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(UserIdVisitor)
    }
}

struct UserIdVisitor;

impl Visitor<'_> for UserIdVisitor {
    type Value = UserId;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a non-negative integer or a decimal string")
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<UserId, E> {
        Ok(UserId(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<UserId, E> {
        u64::try_from(v)
            .map(UserId)
            .map_err(|_| E::invalid_value(de::Unexpected::Signed(v), &self))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<UserId, E> {
        // Only plain ASCII digits: no sign, whitespace or exponent
        if v.is_empty() || !v.bytes().all(|b| b.is_ascii_digit()) {
            return Err(E::invalid_value(de::Unexpected::Str(v), &self));
        }
        v.parse()
            .map(UserId)
            .map_err(|_| E::invalid_value(de::Unexpected::Str(v), &self))
    }
}

/// A post submitted for creation.
///
/// Fields beyond `userId`, `title` and `body` are kept in `extra` and
/// forwarded to the posts service untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    #[serde(rename = "userId")]
    pub user_id: UserId,
    pub title: String,
    pub body: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Post {
    /// Build a post with no extra fields.
    pub fn new(user_id: u64, title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            user_id: UserId(user_id),
            title: title.into(),
            body: body.into(),
            extra: Map::new(),
        }
    }
}

/// A user entry from the directory service. Only the id is used.
#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub id: UserId,
}

/// Find the first user whose id equals `user_id`, in directory order.
pub fn find_user(users: &[User], user_id: UserId) -> Option<&User> {
    users.iter().find(|user| user.id == user_id)
}

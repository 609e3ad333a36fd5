use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

use crate::error::ApiError;

pub mod worker;

/// Server-assigned record identifier. Opaque to the client: it is only ever
/// echoed back into request paths, so it is kept as text regardless of
/// whether the backend serializes it as a JSON string or number.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct UserId(String);

#[allow(dead_code)]
impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl<'de> Deserialize<'de> for UserId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct IdVisitor;

        impl Visitor<'_> for IdVisitor {
            type Value = UserId;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a string or integer id")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<UserId, E> {
                Ok(UserId(v.to_string()))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<UserId, E> {
                Ok(UserId(v.to_string()))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<UserId, E> {
                Ok(UserId(v.to_string()))
            }
        }

        deserializer.deserialize_any(IdVisitor)
    }
}

/// A persisted user entity as returned by the API.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct UserRecord {
    pub id: UserId,
    pub name: String,
    pub email: String,
    #[serde(deserialize_with = "lenient_age")]
    pub age: i64,
}

// Backends that echo the form payload store age as a string; accept both.
fn lenient_age<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    struct AgeVisitor;

    impl Visitor<'_> for AgeVisitor {
        type Value = i64;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("an integer or a numeric string")
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<i64, E> {
            Ok(v)
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<i64, E> {
            i64::try_from(v).map_err(de::Error::custom)
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<i64, E> {
            v.trim().parse().map_err(de::Error::custom)
        }
    }

    deserializer.deserialize_any(AgeVisitor)
}

/// Request body for create and update. Fields are sent verbatim as typed
/// into the form; coercion of `age` is left to the server.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct UserDraft {
    pub name: String,
    pub email: String,
    pub age: String,
}

/// The five remote operations the UI depends on. Implemented by the REST
/// client below and by in-memory fakes in tests.
pub trait UserApi: Send {
    fn list(&self) -> Result<Vec<UserRecord>, ApiError>;
    fn create(&self, draft: &UserDraft) -> Result<(), ApiError>;
    fn fetch(&self, id: &UserId) -> Result<UserRecord, ApiError>;
    fn update(&self, id: &UserId, draft: &UserDraft) -> Result<(), ApiError>;
    fn delete(&self, id: &UserId) -> Result<(), ApiError>;
}

/// Blocking HTTP client for the user API.
pub struct RestUserApi {
    http: reqwest::blocking::Client,
    base: String,
}

impl RestUserApi {
    pub fn new(base_url: &str, timeout: Duration) -> crate::error::Result<Self> {
        let http = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()?;
        Ok(Self {
            http,
            base: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn item_url(&self, id: &UserId) -> String {
        format!("{}/{}", self.base, id)
    }
}

fn ensure_success(
    response: reqwest::blocking::Response,
) -> Result<reqwest::blocking::Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().unwrap_or_default();
    let message = if body.trim().is_empty() {
        format!("server returned {}", status)
    } else {
        format!("server returned {}: {}", status, body.trim())
    };
    Err(ApiError::http(status.as_u16(), message))
}

impl UserApi for RestUserApi {
    fn list(&self) -> Result<Vec<UserRecord>, ApiError> {
        tracing::debug!(url = %self.base, "GET user list");
        let response = self.http.get(self.base.as_str()).send()?;
        let records = ensure_success(response)?.json()?;
        Ok(records)
    }

    fn create(&self, draft: &UserDraft) -> Result<(), ApiError> {
        tracing::debug!(url = %self.base, "POST user");
        let response = self.http.post(self.base.as_str()).json(draft).send()?;
        // The created record in the response body is not used.
        ensure_success(response)?;
        Ok(())
    }

    fn fetch(&self, id: &UserId) -> Result<UserRecord, ApiError> {
        let url = self.item_url(id);
        tracing::debug!(%url, "GET user");
        let response = self.http.get(url.as_str()).send()?;
        let record = ensure_success(response)?.json()?;
        Ok(record)
    }

    fn update(&self, id: &UserId, draft: &UserDraft) -> Result<(), ApiError> {
        let url = self.item_url(id);
        tracing::debug!(%url, "PUT user");
        let response = self.http.put(url.as_str()).json(draft).send()?;
        ensure_success(response)?;
        Ok(())
    }

    fn delete(&self, id: &UserId) -> Result<(), ApiError> {
        let url = self.item_url(id);
        tracing::debug!(%url, "DELETE user");
        let response = self.http.delete(url.as_str()).send()?;
        ensure_success(response)?;
        Ok(())
    }
}

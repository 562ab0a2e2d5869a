//! Blocking HTTP client for the scheduling API
//!
//! Endpoints used:
//! - POST /api/v1/auth/register  (201 = registered)
//! - POST /api/v1/auth/login     (200 + {"token": ...})
//! - POST /api/v1/<collection>   (201 = created, bearer auth)
//! - GET  /api/v1/<collection>   (200 + JSON array, bearer auth)
//!
//! One request at a time, no retries. The timeout applies per request.

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::{json, Value};

use super::errors::{SubmitError, SubmitResult};
use super::{endpoint, SubmitOutcome, Submitter};
use crate::schema::{EntityKind, ValidatedRecord};

#[derive(Debug, Deserialize)]
struct LoginResponse {
    token: String,
}

/// API client holding the bearer token after login
pub struct ApiClient {
    http: Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    /// Builds a client for `base_url` (scheme and host, no `/api/v1`).
    pub fn new(base_url: &str, timeout: Duration) -> SubmitResult<Self> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: None,
        })
    }

    /// Full URL for a path under `/api/v1/`
    pub fn url(&self, path: &str) -> String {
        format!("{}/api/v1/{}", self.base_url, path)
    }

    /// Returns true once `login` has succeeded
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// Registers a user. Returns false if the API refused (e.g. the user
    /// already exists).
    pub fn register(&self, username: &str, password: &str) -> SubmitResult<bool> {
        let resp = self
            .http
            .post(self.url("auth/register"))
            .json(&json!({ "username": username, "password": password }))
            .send()?;
        Ok(resp.status() == StatusCode::CREATED)
    }

    /// Logs in and keeps the bearer token for later requests.
    ///
    /// # Errors
    ///
    /// `AuthFailed` on any status other than 200.
    pub fn login(&mut self, username: &str, password: &str) -> SubmitResult<()> {
        let resp = self
            .http
            .post(self.url("auth/login"))
            .json(&json!({ "username": username, "password": password }))
            .send()?;

        if resp.status() != StatusCode::OK {
            return Err(SubmitError::AuthFailed {
                status: resp.status().as_u16(),
            });
        }

        let body: LoginResponse = resp.json()?;
        self.token = Some(body.token);
        Ok(())
    }

    fn token(&self) -> SubmitResult<&str> {
        self.token.as_deref().ok_or(SubmitError::NotAuthenticated)
    }

    /// Lists every record of `kind` the API currently holds.
    pub fn list(&self, kind: EntityKind) -> SubmitResult<Vec<Value>> {
        let path = endpoint(kind).ok_or(SubmitError::NotSubmittable(kind))?;
        let token = self.token()?;
        let resp = self.http.get(self.url(path)).bearer_auth(token).send()?;

        if resp.status() != StatusCode::OK {
            return Err(SubmitError::UnexpectedStatus {
                endpoint: path.to_string(),
                status: resp.status().as_u16(),
            });
        }
        Ok(resp.json()?)
    }
}

impl Submitter for ApiClient {
    fn submit(&mut self, record: &ValidatedRecord) -> SubmitResult<SubmitOutcome> {
        let path = endpoint(record.kind()).ok_or(SubmitError::NotSubmittable(record.kind()))?;
        let token = self.token()?;
        let resp = self
            .http
            .post(self.url(path))
            .bearer_auth(token)
            .json(record.record())
            .send()?;

        let status = resp.status();
        if status == StatusCode::CREATED {
            Ok(SubmitOutcome::Created)
        } else {
            Ok(SubmitOutcome::Rejected {
                status: status.as_u16(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::decode_row;
    use crate::schema::validate;

    fn client() -> ApiClient {
        ApiClient::new("http://localhost:3000/", Duration::from_secs(1)).unwrap()
    }

    #[test]
    fn test_url_joins_without_double_slash() {
        assert_eq!(client().url("soldiers"), "http://localhost:3000/api/v1/soldiers");
        assert_eq!(client().url("auth/login"), "http://localhost:3000/api/v1/auth/login");
    }

    #[test]
    fn test_submit_requires_login() {
        let record = decode_row([
            ("id", "s1"),
            ("first_name", "Noa"),
            ("last_name", "Levi"),
            ("personal_number", "1234567"),
            ("position(int)", "1"),
        ])
        .unwrap();
        let accepted = validate(EntityKind::Soldier, &record).unwrap();

        let mut api = client();
        assert!(!api.is_authenticated());
        let err = api.submit(&accepted).unwrap_err();
        assert!(matches!(err, SubmitError::NotAuthenticated));
    }

    #[test]
    fn test_list_rejects_embedded_kinds() {
        let err = client().list(EntityKind::TimeOfDay).unwrap_err();
        assert!(matches!(err, SubmitError::NotSubmittable(EntityKind::TimeOfDay)));
    }
}

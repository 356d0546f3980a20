//! HTTP request builder, response parser and round-trip driver for the
//! user-directory API.
//!
//! # Design
//! `ApiClient` holds the base URL, the access token and a `Transport`. Each
//! call is split into `build_*` (produces an `HttpRequest`) and `parse_*`
//! (consumes an `HttpResponse`), so status and decoding rules are testable
//! without a network. `get` and `post` chain the two through the transport
//! and convert every failure into an `ApiError`; nothing escapes as a panic.
//!
//! GET succeeds only on exactly 200. POST succeeds on any 2xx. Signup is
//! unauthenticated, so POST never carries the bearer header.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::transport::Transport;
use crate::types::{AuthToken, SignupRequest, SignupResponse, User};

pub const USERS_PATH: &str = "/api/users";
pub const BIRTHDAYS_PATH: &str = "/api/users/birthdays/";
pub const SIGNUP_PATH: &str = "/api/auth/signup";

/// Client for the user-directory API.
#[derive(Debug, Clone)]
pub struct ApiClient<T> {
    base_url: String,
    token: AuthToken,
    transport: T,
}

impl<T: Transport> ApiClient<T> {
    pub fn new(base_url: &str, token: AuthToken, transport: T) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
            transport,
        }
    }

    pub fn build_get(&self, path: &str) -> HttpRequest {
        let headers = self
            .token
            .header_value()
            .map(|v| vec![("authorization".to_string(), v)])
            .unwrap_or_default();
        HttpRequest {
            method: HttpMethod::Get,
            url: format!("{}{path}", self.base_url),
            headers,
            body: None,
        }
    }

    pub fn build_post<B: Serialize>(&self, path: &str, body: &B) -> Result<HttpRequest, ApiError> {
        let body = serde_json::to_string(body).map_err(|e| ApiError::Serialization(e.to_string()))?;
        Ok(HttpRequest {
            method: HttpMethod::Post,
            url: format!("{}{path}", self.base_url),
            headers: vec![("content-type".to_string(), "application/json".to_string())],
            body: Some(body),
        })
    }

    pub fn parse_get(&self, response: HttpResponse) -> Result<Value, ApiError> {
        if response.status != 200 {
            return Err(status_error(response));
        }
        parse_json(&response.body)
    }

    pub fn parse_post(&self, response: HttpResponse) -> Result<Value, ApiError> {
        if !response.is_ok() {
            return Err(status_error(response));
        }
        parse_json(&response.body)
    }

    /// GET `base_url + path` and decode the JSON body.
    pub fn get(&self, path: &str) -> Result<Value, ApiError> {
        let request = self.build_get(path);
        let response = self.send(&request)?;
        self.parse_get(response)
    }

    /// POST `body` as JSON to `base_url + path` and decode the JSON reply.
    pub fn post<B: Serialize>(&self, path: &str, body: &B) -> Result<Value, ApiError> {
        let request = self.build_post(path, body)?;
        let response = self.send(&request)?;
        self.parse_post(response)
    }

    pub fn list_users(&self) -> Result<Vec<User>, ApiError> {
        decode(self.get(USERS_PATH)?)
    }

    pub fn birthday_users(&self) -> Result<Vec<User>, ApiError> {
        decode(self.get(BIRTHDAYS_PATH)?)
    }

    pub fn get_user(&self, id: i64) -> Result<User, ApiError> {
        decode(self.get(&format!("{USERS_PATH}/{id}"))?)
    }

    pub fn signup(&self, request: &SignupRequest) -> Result<SignupResponse, ApiError> {
        decode(self.post(SIGNUP_PATH, request)?)
    }

    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
        debug!(method = request.method.as_str(), url = %request.url, "sending request");
        let response = self.transport.execute(request).map_err(|e| {
            warn!(url = %request.url, error = %e, "transport failed");
            ApiError::Network(e.0)
        })?;
        debug!(status = response.status, status_text = %response.status_text, "response received");
        Ok(response)
    }
}

fn status_error(response: HttpResponse) -> ApiError {
    ApiError::HttpStatus(response.status, response.status_text)
}

/// Invalid UTF-8 is reported as a parse failure like any other bad JSON.
fn parse_json(body: &[u8]) -> Result<Value, ApiError> {
    serde_json::from_slice(body).map_err(|e| ApiError::Parse(e.to_string()))
}

fn decode<D: DeserializeOwned>(value: Value) -> Result<D, ApiError> {
    serde_json::from_value(value).map_err(|e| ApiError::Parse(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::TransportError;

    type Handler = fn(&HttpRequest) -> Result<HttpResponse, TransportError>;

    fn client_with(token: AuthToken, handler: Handler) -> ApiClient<Handler> {
        ApiClient::new("http://localhost:8000", token, handler)
    }

    fn client() -> ApiClient<Handler> {
        client_with(AuthToken::none(), |_| Ok(HttpResponse::new(200, "OK", "[]")))
    }

    fn signup_request() -> SignupRequest {
        SignupRequest {
            first_name: "Bob".to_string(),
            last_name: "Builder".to_string(),
            username: "bobbyb".to_string(),
            email: "bob@x.com".to_string(),
            password: "secret1".to_string(),
            born_date: "1990-05-17".to_string(),
            description: String::new(),
        }
    }

    #[test]
    fn build_get_without_token_has_no_auth_header() {
        let req = client().build_get(USERS_PATH);
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.url, "http://localhost:8000/api/users");
        assert!(req.headers.is_empty());
        assert!(req.body.is_none());
    }

    #[test]
    fn build_get_with_token_sends_exact_bearer_header() {
        let c = client_with(AuthToken::new("abc"), |_| Ok(HttpResponse::new(200, "OK", "[]")));
        let req = c.build_get(USERS_PATH);
        assert_eq!(
            req.headers,
            vec![("authorization".to_string(), "Bearer abc".to_string())]
        );
    }

    #[test]
    fn build_post_is_json_and_unauthenticated() {
        let c = client_with(AuthToken::new("abc"), |_| Ok(HttpResponse::new(201, "Created", "{}")));
        let req = c.build_post(SIGNUP_PATH, &signup_request()).unwrap();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.url, "http://localhost:8000/api/auth/signup");
        assert_eq!(req.header("content-type"), Some("application/json"));
        assert_eq!(req.header("authorization"), None);
        let body: Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(body["username"], "bobbyb");
        assert_eq!(body["born_date"], "1990-05-17");
    }

    #[test]
    fn trailing_slash_is_stripped() {
        let c = ApiClient::new("http://localhost:8000/", AuthToken::none(), UnusedTransport);
        assert_eq!(c.build_get(USERS_PATH).url, "http://localhost:8000/api/users");
    }

    struct UnusedTransport;

    impl Transport for UnusedTransport {
        fn execute(&self, _: &HttpRequest) -> Result<HttpResponse, TransportError> {
            Err(TransportError("unused".to_string()))
        }
    }

    #[test]
    fn parse_get_requires_exactly_200() {
        let err = client()
            .parse_get(HttpResponse::new(201, "Created", "[]"))
            .unwrap_err();
        assert_eq!(err, ApiError::HttpStatus(201, "Created".to_string()));
    }

    #[test]
    fn parse_post_accepts_any_2xx() {
        let value = client()
            .parse_post(HttpResponse::new(201, "Created", r#"{"user":{"username":"bob"}}"#))
            .unwrap();
        assert_eq!(value["user"]["username"], "bob");
    }

    #[test]
    fn parse_post_rejects_conflict() {
        let err = client()
            .parse_post(HttpResponse::new(409, "Conflict", r#"{"detail":"Account already exists"}"#))
            .unwrap_err();
        assert_eq!(err.status(), Some(409));
    }

    #[test]
    fn malformed_body_is_parse_error() {
        let err = client().parse_get(HttpResponse::new(200, "OK", "not json")).unwrap_err();
        assert!(matches!(err, ApiError::Parse(_)));
    }

    #[test]
    fn non_utf8_body_is_parse_error_after_status_check() {
        let bytes: &[u8] = &[0xff, 0xfe, 0x5b];
        let err = client().parse_get(HttpResponse::new(200, "OK", bytes)).unwrap_err();
        assert!(matches!(err, ApiError::Parse(_)), "{err:?}");

        let err = client()
            .parse_get(HttpResponse::new(500, "Internal Server Error", bytes))
            .unwrap_err();
        assert_eq!(err, ApiError::HttpStatus(500, "Internal Server Error".to_string()));
    }

    #[test]
    fn transport_failure_becomes_network_error() {
        let c = client_with(AuthToken::none(), |_| {
            Err(TransportError("connection refused".to_string()))
        });
        assert_eq!(
            c.get(USERS_PATH).unwrap_err(),
            ApiError::Network("connection refused".to_string())
        );
        assert!(matches!(c.signup(&signup_request()), Err(ApiError::Network(_))));
    }

    #[test]
    fn get_user_hits_id_path() {
        let c = client_with(AuthToken::new("abc"), |req| {
            assert_eq!(req.url, "http://localhost:8000/api/users/2");
            assert_eq!(req.header("authorization"), Some("Bearer abc"));
            Ok(HttpResponse::new(200, "OK", r#"{"id":2,"email":"b@x.com"}"#))
        });
        assert_eq!(c.get_user(2).unwrap().email, "b@x.com");
    }

    #[test]
    fn wrong_shape_is_parse_error() {
        let c = client_with(AuthToken::none(), |_| {
            Ok(HttpResponse::new(200, "OK", r#"{"id":"not a number"}"#))
        });
        assert!(matches!(c.list_users(), Err(ApiError::Parse(_))));
    }

    #[test]
    fn not_found_surfaces_as_http_status() {
        let c = client_with(AuthToken::none(), |_| {
            Ok(HttpResponse::new(404, "Not Found", r#"{"detail":"Not Found"}"#))
        });
        assert_eq!(
            c.get_user(2).unwrap_err(),
            ApiError::HttpStatus(404, "Not Found".to_string())
        );
    }
}

//! Request routing
//!
//! Translates `(method, path, payload)` into typed engine calls and
//! serializes the result. The engine never sees a path string.

use crate::{
    dto::{AddUserRequest, IouRequest, UserList, UsersQuery},
    error::{ApiError, Result},
};
use iou_ledger_core::{Error as LedgerError, LedgerStore};
use iou_settlement::{Config as SettlementConfig, Error as SettlementError, SettlementEngine};
use serde::{de::DeserializeOwned, Serialize};
use std::fmt;

/// Supported request methods
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// Read-only query
    Get,
    /// Mutation
    Post,
}

impl Method {
    /// Parse from string
    pub fn parse(s: &str) -> Result<Self> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Ok(Method::Get),
            "POST" => Ok(Method::Post),
            _ => Err(ApiError::MethodNotAllowed(s.to_string())),
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Method::Get => write!(f, "GET"),
            Method::Post => write!(f, "POST"),
        }
    }
}

/// One request: `METHOD PATH [JSON]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request<'a> {
    /// Method
    pub method: Method,
    /// Path, e.g. `/users`
    pub path: &'a str,
    /// Raw JSON body, if any
    pub payload: Option<&'a str>,
}

impl<'a> Request<'a> {
    /// Split a request line; everything after the path is the payload
    pub fn parse(line: &'a str) -> Result<Self> {
        let line = line.trim();
        let (method, rest) = line
            .split_once(char::is_whitespace)
            .ok_or_else(|| ApiError::MalformedRequest(line.to_string()))?;
        let rest = rest.trim_start();
        let (path, payload) = match rest.split_once(char::is_whitespace) {
            Some((path, payload)) => (path, Some(payload.trim())),
            None => (rest, None),
        };

        Ok(Self {
            method: Method::parse(method)?,
            path,
            payload: payload.filter(|p| !p.is_empty()),
        })
    }
}

/// Path/payload front end over a settlement engine
#[derive(Debug)]
pub struct RestApi {
    engine: SettlementEngine,
}

impl RestApi {
    /// Wrap an engine
    pub fn new(engine: SettlementEngine) -> Self {
        Self { engine }
    }

    /// Build an engine seeded from a `{"users": [...]}` document
    pub fn from_database_json(config: SettlementConfig, database: &str) -> Result<Self> {
        let database: UserList = parse_payload(database)?;
        let store = LedgerStore::from_users(database.users)?;
        Ok(Self::new(SettlementEngine::with_store(config, store)?))
    }

    /// Underlying engine
    pub fn engine(&self) -> &SettlementEngine {
        &self.engine
    }

    /// Dispatch a parsed request
    pub fn handle(&mut self, request: &Request<'_>) -> Result<String> {
        tracing::debug!(method = %request.method, path = request.path, "Dispatching request");
        match request.method {
            Method::Get => self.get(request.path, request.payload),
            Method::Post => self.post(request.path, request.payload),
        }
    }

    /// Read-only routes
    pub fn get(&self, url: &str, payload: Option<&str>) -> Result<String> {
        match url {
            "/users" => {
                let users = match non_empty(payload) {
                    None => self.engine.project_all(),
                    Some(payload) => {
                        let query: UsersQuery = parse_payload(payload)?;
                        self.engine.project(&query.users)
                    }
                };
                to_json(&UserList { users })
            }
            "/metrics" => Ok(self.engine.metrics().render()?),
            _ => Err(ApiError::RouteNotFound(url.to_string())),
        }
    }

    /// Mutating routes
    pub fn post(&mut self, url: &str, payload: Option<&str>) -> Result<String> {
        if !matches!(url, "/add" | "/iou") {
            return Err(ApiError::RouteNotFound(url.to_string()));
        }
        let payload = non_empty(payload).ok_or(ApiError::MissingPayload)?;

        match url {
            "/add" => {
                let request: AddUserRequest = parse_payload(payload)?;
                let user = request.into_user().map_err(|e| self.reject(e))?;
                let user = self.engine.create_user(user)?;
                to_json(&user)
            }
            _ => {
                let request: IouRequest = parse_payload(payload)?;
                let operation = request.into_operation().map_err(|e| self.reject(e))?;
                let settlement = self.engine.settle(&operation)?;
                to_json(&UserList {
                    users: settlement.users,
                })
            }
        }
    }

    /// Count a request refused before it reached the engine
    fn reject(&self, err: LedgerError) -> ApiError {
        let err = SettlementError::from(err);
        tracing::warn!(error = %err, "Request rejected");
        self.engine.metrics().record_rejection(&err);
        err.into()
    }
}

fn non_empty(payload: Option<&str>) -> Option<&str> {
    payload.filter(|p| !p.trim().is_empty())
}

fn parse_payload<T: DeserializeOwned>(payload: &str) -> Result<T> {
    serde_json::from_str(payload).map_err(|e| ApiError::MalformedPayload(e.to_string()))
}

fn to_json<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string(value).map_err(|e| ApiError::Internal(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn api() -> RestApi {
        RestApi::new(SettlementEngine::new(SettlementConfig::default()).unwrap())
    }

    fn value(body: &str) -> Value {
        serde_json::from_str(body).unwrap()
    }

    #[test]
    fn test_request_parse() {
        let request = Request::parse(r#"POST /iou {"lender": "Adam", "borrower": "Bob"}"#).unwrap();
        assert_eq!(request.method, Method::Post);
        assert_eq!(request.path, "/iou");
        assert_eq!(request.payload, Some(r#"{"lender": "Adam", "borrower": "Bob"}"#));

        let request = Request::parse("get /users").unwrap();
        assert_eq!(request.method, Method::Get);
        assert_eq!(request.payload, None);

        assert!(matches!(
            Request::parse("DELETE /users"),
            Err(ApiError::MethodNotAllowed(_))
        ));
        assert!(matches!(
            Request::parse("GET"),
            Err(ApiError::MalformedRequest(_))
        ));
    }

    #[test]
    fn test_unknown_routes() {
        let mut api = api();
        assert!(matches!(api.get("/nope", None), Err(ApiError::RouteNotFound(_))));
        assert!(matches!(
            api.post("/nope", Some("{}")),
            Err(ApiError::RouteNotFound(_))
        ));
    }

    #[test]
    fn test_post_requires_payload() {
        let mut api = api();
        assert!(matches!(api.post("/add", None), Err(ApiError::MissingPayload)));
        assert!(matches!(api.post("/iou", Some("  ")), Err(ApiError::MissingPayload)));
    }

    #[test]
    fn test_add_then_list() {
        let mut api = api();
        let created = api.post("/add", Some(r#"{"user": "Adam"}"#)).unwrap();
        assert_eq!(
            value(&created),
            json!({"name": "Adam", "owes": {}, "owed_by": {}, "balance": 0.0})
        );

        let listed = api.get("/users", None).unwrap();
        assert_eq!(value(&listed)["users"][0]["name"], "Adam");
    }

    #[test]
    fn test_malformed_payload() {
        let mut api = api();
        let err = api.post("/add", Some("not json")).unwrap_err();
        assert_eq!(err.status_code(), 400);
    }

    #[test]
    fn test_handle_dispatches_by_method() {
        let mut api = api();
        let request = Request::parse(r#"POST /add {"user": "Bob"}"#).unwrap();
        api.handle(&request).unwrap();

        let request = Request::parse(r#"GET /users {"users": ["Bob"]}"#).unwrap();
        let body = api.handle(&request).unwrap();
        assert_eq!(value(&body)["users"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn test_payload_rejections_are_counted() {
        let mut api = api();
        api.post("/add", Some(r#"{"user": "Adam", "owes": {"Bob": -1}}"#))
            .unwrap_err();
        api.post("/iou", Some(r#"{"lender": "Adam", "borrower": "Bob"}"#))
            .unwrap_err();

        let rejected = api
            .engine()
            .metrics()
            .rejections_total
            .with_label_values(&["validation"])
            .get();
        assert_eq!(rejected, 2);
    }

    #[test]
    fn test_metrics_route() {
        let mut api = api();
        api.post("/add", Some(r#"{"user": "Adam"}"#)).unwrap();
        let text = api.get("/metrics", None).unwrap();
        assert!(text.contains("iou_users_total 1"));
    }
}

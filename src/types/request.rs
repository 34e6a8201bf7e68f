//! Request type definitions
//!
//! Defines the transient request specification consumed by the dispatcher.

use serde_json::{Map, Value};

/// Content type that switches the dispatcher into JSON body mode
pub const JSON_CONTENT_TYPE: &str = "application/json;charset=UTF-8";

/// HTTP methods supported by the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
        }
    }
}

/// One dashboard call: relative path, ordered params, method, extra header
/// lines and the response decoding mode. Constructed and consumed per call.
#[derive(Debug, Clone)]
pub struct RequestSpec {
    /// Path relative to the dashboard endpoint
    pub path: String,
    /// Ordered parameter map; values may be nested
    pub params: Map<String, Value>,
    /// HTTP method
    pub method: Method,
    /// Extra header lines as name/value pairs
    pub headers: Vec<(String, String)>,
    /// Return the body as opaque text instead of an envelope-decoded value
    pub raw: bool,
}

impl RequestSpec {
    /// Create a GET request spec
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(path, Method::Get)
    }

    /// Create a POST request spec
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(path, Method::Post)
    }

    /// Create a PUT request spec
    pub fn put(path: impl Into<String>) -> Self {
        Self::new(path, Method::Put)
    }

    fn new(path: impl Into<String>, method: Method) -> Self {
        Self {
            path: path.into(),
            params: Map::new(),
            method,
            headers: Vec::new(),
            raw: false,
        }
    }

    /// Add a single parameter
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    /// Replace the whole parameter map
    pub fn with_params(mut self, params: Map<String, Value>) -> Self {
        self.params = params;
        self
    }

    /// Add a header line
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Declare a JSON body (the dashboard's API endpoints expect this exact
    /// content type)
    pub fn json(self) -> Self {
        self.with_header("Content-Type", JSON_CONTENT_TYPE)
    }

    /// Request the body as opaque text (used for HTML pages)
    pub fn raw(mut self) -> Self {
        self.raw = true;
        self
    }

    /// Whether the declared headers select JSON body encoding
    pub fn wants_json_body(&self) -> bool {
        self.headers.iter().any(|(name, value)| {
            name.eq_ignore_ascii_case("content-type") && value.contains("application/json")
        })
    }

    /// Parameters flattened to string pairs for query or form encoding.
    /// Nested values only occur on JSON endpoints, so stringifying the
    /// remainder is enough here.
    pub fn form_pairs(&self) -> Vec<(String, String)> {
        self.params
            .iter()
            .map(|(key, value)| {
                let rendered = match value {
                    Value::String(s) => s.clone(),
                    Value::Null => String::new(),
                    other => other.to_string(),
                };
                (key.clone(), rendered)
            })
            .collect()
    }
}

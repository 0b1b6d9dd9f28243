//! Endpoint-agnostic request description.
//!
//! Builders lower their typed parameters into an [`ApiRequest`]; the HTTP
//! adapter only ever sees this shape. Negative cases start from a valid
//! request and then remove or override individual parameters.

use std::fmt;

use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Method {
    Get,
    Post,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Method::Get => f.write_str("GET"),
            Method::Post => f.write_str("POST"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Endpoint {
    Quote,
    Routes,
    Tools,
    Tokens,
    Token,
    Chains,
}

impl Endpoint {
    pub const ALL: [Endpoint; 6] = [
        Endpoint::Quote,
        Endpoint::Routes,
        Endpoint::Tools,
        Endpoint::Tokens,
        Endpoint::Token,
        Endpoint::Chains,
    ];

    /// Path relative to the API base URL
    pub fn path(&self) -> &'static str {
        match self {
            Endpoint::Quote => "quote",
            Endpoint::Routes => "advanced/routes",
            Endpoint::Tools => "tools",
            Endpoint::Tokens => "tokens",
            Endpoint::Token => "token",
            Endpoint::Chains => "chains",
        }
    }

    pub fn method(&self) -> Method {
        match self {
            Endpoint::Routes => Method::Post,
            _ => Method::Get,
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

impl std::str::FromStr for Endpoint {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "quote" => Ok(Endpoint::Quote),
            "routes" | "advanced/routes" => Ok(Endpoint::Routes),
            "tools" => Ok(Endpoint::Tools),
            "tokens" => Ok(Endpoint::Tokens),
            "token" => Ok(Endpoint::Token),
            "chains" => Ok(Endpoint::Chains),
            other => Err(format!("unknown endpoint '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApiRequest {
    pub endpoint: Endpoint,
    pub query: Vec<(String, String)>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<Value>,
}

impl ApiRequest {
    pub fn get(endpoint: Endpoint) -> Self {
        Self {
            endpoint,
            query: Vec::new(),
            body: None,
        }
    }

    pub fn post(endpoint: Endpoint, body: Value) -> Self {
        Self {
            endpoint,
            query: Vec::new(),
            body: Some(body),
        }
    }

    pub fn method(&self) -> Method {
        self.endpoint.method()
    }

    /// Append a query parameter
    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Replace every occurrence of a query parameter (append if absent)
    pub fn set_query(mut self, key: &str, value: impl Into<String>) -> Self {
        self.query.retain(|(k, _)| k != key);
        self.query.push((key.to_string(), value.into()));
        self
    }

    pub fn without_query(mut self, key: &str) -> Self {
        self.query.retain(|(k, _)| k != key);
        self
    }

    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Set a top-level body field; no-op for requests without an object body
    pub fn set_body_field(mut self, key: &str, value: Value) -> Self {
        if let Some(Value::Object(map)) = self.body.as_mut() {
            map.insert(key.to_string(), value);
        }
        self
    }

    pub fn without_body_field(mut self, key: &str) -> Self {
        if let Some(Value::Object(map)) = self.body.as_mut() {
            map.remove(key);
        }
        self
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// One-line description for logs and reports, e.g. `GET quote?fromChain=1`
    pub fn describe(&self) -> String {
        let mut out = format!("{} {}", self.method(), self.endpoint.path());
        if !self.query.is_empty() {
            let pairs: Vec<String> = self.query.iter().map(|(k, v)| format!("{}={}", k, v)).collect();
            out.push('?');
            out.push_str(&pairs.join("&"));
        }
        if let Some(body) = &self.body {
            out.push(' ');
            out.push_str(&body.to_string());
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_endpoint_paths_and_methods() {
        assert_eq!(Endpoint::Routes.path(), "advanced/routes");
        assert_eq!(Endpoint::Routes.method(), Method::Post);
        assert_eq!(Endpoint::Quote.method(), Method::Get);
        assert_eq!("routes".parse::<Endpoint>().unwrap(), Endpoint::Routes);
        assert!("swap".parse::<Endpoint>().is_err());
    }

    #[test]
    fn test_query_manipulation() {
        let req = ApiRequest::get(Endpoint::Quote)
            .with_query("fromChain", "1")
            .with_query("fromAmount", "1000000")
            .set_query("fromAmount", "0")
            .without_query("fromChain");

        assert_eq!(req.query_value("fromAmount"), Some("0"));
        assert_eq!(req.query_value("fromChain"), None);
        assert_eq!(req.query.len(), 1);
    }

    #[test]
    fn test_body_manipulation() {
        let req = ApiRequest::post(Endpoint::Routes, json!({"fromChainId": 1, "fromAmount": "1"}))
            .set_body_field("fromAmount", json!("-1000000"))
            .without_body_field("fromChainId");

        assert_eq!(req.body, Some(json!({"fromAmount": "-1000000"})));
    }

    #[test]
    fn test_describe() {
        let req = ApiRequest::get(Endpoint::Tools).with_query("chains", "1,137");
        assert_eq!(req.describe(), "GET tools?chains=1,137");
        let post = ApiRequest::post(Endpoint::Routes, json!({}));
        assert_eq!(post.describe(), "POST advanced/routes {}");
    }
}

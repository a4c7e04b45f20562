use super::RequestContext;
use crate::error::HostError;
use http::Method;
use serde_json::Value;
use std::collections::HashMap;
use tracing::debug;

const FORM_URLENCODED: &str = "application/x-www-form-urlencoded";

/// Parse query string parameters from a URL path
///
/// Everything after the first `?` is decoded with `form_urlencoded` rules.
/// A `#fragment` is ignored.
///
/// # Example
///
/// ```rust
/// use viewroute::host::parse_query_params;
///
/// let params = parse_query_params("/users?limit=10&name=a%20b");
/// assert_eq!(params, vec![
///     ("limit".to_string(), "10".to_string()),
///     ("name".to_string(), "a b".to_string()),
/// ]);
/// ```
#[must_use]
pub fn parse_query_params(path: &str) -> Vec<(String, String)> {
    let Some(pos) = path.find('?') else {
        return Vec::new();
    };
    let query = &path[pos + 1..];
    let query = query.split('#').next().unwrap_or_default();
    url::form_urlencoded::parse(query.as_bytes())
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect()
}

fn last_value<'a>(pairs: &'a [(String, String)], name: &str) -> Option<&'a str> {
    pairs
        .iter()
        .rfind(|(k, _)| k == name)
        .map(|(_, v)| v.as_str())
}

/// In-memory request context with a fully buffered response
///
/// Used to run lifecycles outside a live host (tests, pre-rendering, tools).
/// The response body grows without limit and stays readable after `render`.
#[derive(Debug, Clone)]
pub struct BufferedContext {
    method: Method,
    path: String,
    query: Vec<(String, String)>,
    form: Vec<(String, String)>,
    headers: Vec<(String, String)>,
    body: Option<Vec<u8>>,

    status: u16,
    response_content_type: Option<String>,
    response_headers: Vec<(String, String)>,
    response_body: Vec<u8>,
    committed: bool,
    complete: bool,

    attributes: HashMap<String, Value>,
    view_id: Option<String>,
}

impl BufferedContext {
    /// Create a context for `method` and `path` (query string included)
    #[must_use]
    pub fn new(method: Method, path: &str) -> Self {
        Self {
            query: parse_query_params(path),
            method,
            path: path.to_string(),
            form: Vec::new(),
            headers: Vec::new(),
            body: None,
            status: 200,
            response_content_type: None,
            response_headers: Vec::new(),
            response_body: Vec::new(),
            committed: false,
            complete: false,
            attributes: HashMap::new(),
            view_id: None,
        }
    }

    #[must_use]
    pub fn get(path: &str) -> Self {
        Self::new(Method::GET, path)
    }

    #[must_use]
    pub fn post(path: &str) -> Self {
        Self::new(Method::POST, path)
    }

    #[must_use]
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_ascii_lowercase(), value.to_string()));
        self
    }

    /// Attach a raw body and its content type
    ///
    /// Form bodies are decoded right away so `form_param` can serve them.
    #[must_use]
    pub fn with_body(mut self, content_type: &str, body: impl Into<Vec<u8>>) -> Self {
        let body = body.into();
        if content_type
            .split(';')
            .next()
            .is_some_and(|ct| ct.trim().eq_ignore_ascii_case(FORM_URLENCODED))
        {
            self.form = url::form_urlencoded::parse(&body)
                .map(|(k, v)| (k.into_owned(), v.into_owned()))
                .collect();
        }
        self.headers
            .retain(|(k, _)| !k.eq_ignore_ascii_case("content-type"));
        self.headers
            .push(("content-type".to_string(), content_type.to_string()));
        self.body = Some(body);
        self
    }

    #[must_use]
    pub fn with_json_body(self, body: &Value) -> Self {
        self.with_body("application/json", body.to_string())
    }

    #[must_use]
    pub fn with_form_body(self, fields: &[(&str, &str)]) -> Self {
        let encoded = url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(fields.iter())
            .finish();
        self.with_body(FORM_URLENCODED, encoded)
    }

    /// Bytes written to the response so far
    #[must_use]
    pub fn response_body(&self) -> &[u8] {
        &self.response_body
    }

    /// Response body as UTF-8, if it is valid UTF-8
    #[must_use]
    pub fn response_text(&self) -> Option<&str> {
        std::str::from_utf8(&self.response_body).ok()
    }

    #[must_use]
    pub fn response_header(&self, name: &str) -> Option<&str> {
        last_value_ci(&self.response_headers, name)
    }

    /// Whether `send_error` or `send_redirect` already committed the response
    #[must_use]
    pub fn is_committed(&self) -> bool {
        self.committed
    }
}

fn last_value_ci<'a>(pairs: &'a [(String, String)], name: &str) -> Option<&'a str> {
    pairs
        .iter()
        .rfind(|(k, _)| k.eq_ignore_ascii_case(name))
        .map(|(_, v)| v.as_str())
}

impl RequestContext for BufferedContext {
    fn method(&self) -> &Method {
        &self.method
    }

    fn path(&self) -> &str {
        &self.path
    }

    fn query_param(&self, name: &str) -> Option<&str> {
        last_value(&self.query, name)
    }

    fn form_param(&self, name: &str) -> Option<&str> {
        last_value(&self.form, name)
    }

    fn header(&self, name: &str) -> Option<&str> {
        last_value_ci(&self.headers, name)
    }

    fn body(&self) -> Option<&[u8]> {
        self.body.as_deref()
    }

    fn status(&self) -> u16 {
        self.status
    }

    fn set_status(&mut self, status: u16) {
        self.status = status;
    }

    fn response_content_type(&self) -> Option<&str> {
        self.response_content_type.as_deref()
    }

    fn set_response_content_type(&mut self, content_type: &str) {
        self.response_content_type = Some(content_type.to_string());
    }

    fn set_response_header(&mut self, name: &str, value: &str) {
        self.response_headers
            .retain(|(k, _)| !k.eq_ignore_ascii_case(name));
        self.response_headers
            .push((name.to_string(), value.to_string()));
    }

    fn write_body(&mut self, bytes: &[u8]) -> Result<(), HostError> {
        self.response_body.extend_from_slice(bytes);
        Ok(())
    }

    fn send_error(&mut self, status: u16, message: &str) -> Result<(), HostError> {
        if self.committed {
            return Err(HostError::ResponseCommitted);
        }
        debug!(status, message, path = %self.path, "Sending error response");
        self.status = status;
        self.response_content_type = Some("application/json".to_string());
        self.response_body = serde_json::json!({ "error": message })
            .to_string()
            .into_bytes();
        self.committed = true;
        Ok(())
    }

    fn send_redirect(&mut self, location: &str) -> Result<(), HostError> {
        if self.committed {
            return Err(HostError::ResponseCommitted);
        }
        debug!(location, path = %self.path, "Sending redirect");
        self.status = 302;
        self.set_response_header("location", location);
        self.response_body.clear();
        self.committed = true;
        Ok(())
    }

    fn response_complete(&self) -> bool {
        self.complete
    }

    fn mark_response_complete(&mut self) {
        self.complete = true;
    }

    fn set_attribute(&mut self, key: &str, value: Value) {
        self.attributes.insert(key.to_string(), value);
    }

    fn attribute(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key)
    }

    fn take_attribute(&mut self, key: &str) -> Option<Value> {
        self.attributes.remove(key)
    }

    fn set_view_id(&mut self, view_id: &str) {
        self.view_id = Some(view_id.to_string());
    }

    fn view_id(&self) -> Option<&str> {
        self.view_id.as_deref()
    }
}

use crate::error::HostError;
use http::Method;
use serde_json::Value;

/// The per-request surface the host lifecycle hands to `execute` and `render`
///
/// Implemented by the host runtime. The dispatch pipeline only reads the
/// request side, writes the response side through the writers and the 404
/// path, and parks the handler result in the request-scoped attribute space
/// between the two phases.
pub trait RequestContext {
    // ----- request -----

    /// HTTP method of the request
    fn method(&self) -> &Method;

    /// Request path, possibly still carrying a query string
    fn path(&self) -> &str;

    /// Query string parameter by name (last occurrence wins)
    fn query_param(&self, name: &str) -> Option<&str>;

    /// Form field by name, from an `application/x-www-form-urlencoded` body
    fn form_param(&self, name: &str) -> Option<&str>;

    /// Request header by name (case-insensitive)
    fn header(&self, name: &str) -> Option<&str>;

    /// Raw request body, if any
    fn body(&self) -> Option<&[u8]>;

    /// Content type the client declared for the body
    fn request_content_type(&self) -> Option<&str> {
        self.header("content-type")
    }

    // ----- response -----

    fn status(&self) -> u16;

    fn set_status(&mut self, status: u16);

    /// Content type set on the response so far
    fn response_content_type(&self) -> Option<&str>;

    fn set_response_content_type(&mut self, content_type: &str);

    fn set_response_header(&mut self, name: &str, value: &str);

    /// Append bytes to the response body
    fn write_body(&mut self, bytes: &[u8]) -> Result<(), HostError>;

    /// Send an error status with a short diagnostic message
    fn send_error(&mut self, status: u16, message: &str) -> Result<(), HostError>;

    /// Redirect the client to `location`
    fn send_redirect(&mut self, location: &str) -> Result<(), HostError>;

    /// Whether an earlier phase already finished the response
    fn response_complete(&self) -> bool;

    /// Tell later phases that the response is finished
    fn mark_response_complete(&mut self);

    // ----- request-scoped state -----

    fn set_attribute(&mut self, key: &str, value: Value);

    fn attribute(&self, key: &str) -> Option<&Value>;

    fn take_attribute(&mut self, key: &str) -> Option<Value>;

    /// Select the view the host renders next
    fn set_view_id(&mut self, view_id: &str);

    fn view_id(&self) -> Option<&str>;
}

//! Request-side domain types: HTTP method, API definitions, and the
//! fully resolved request handed to the HTTP client.

mod definition;
mod method;
mod prepared;

pub use definition::ApiDefinition;
pub use method::HttpMethod;
pub use prepared::PreparedRequest;

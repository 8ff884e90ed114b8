mod http_method;
mod priority;
mod request_id;
mod request_kind;

pub use http_method::HttpMethod;
pub use priority::Priority;
pub use request_id::RequestId;
pub use request_kind::RequestKind;

pub mod api_gateway;
pub mod key_value_store;
pub mod queue_store;
pub mod request_transport;
pub mod token_store;

pub use api_gateway::ApiGateway;
pub use key_value_store::KeyValueStore;
pub use queue_store::QueueStore;
pub use request_transport::RequestTransport;
pub use token_store::TokenStore;

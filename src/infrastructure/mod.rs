pub mod gateway;
pub mod http_gateway;

pub use gateway::RemoteGateway;
pub use http_gateway::HttpGateway;

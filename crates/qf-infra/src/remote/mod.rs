//! Remote data service adapter
//!
//! 远程数据服务（PostgREST 风格 HTTP 接口）。

mod config;
mod gateway;
mod rows;

pub use config::RestGatewayConfig;
pub use gateway::RestDataGateway;

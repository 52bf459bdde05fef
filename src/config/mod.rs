//! 配置管理模块
//!
//! 提供YAML配置文件解析和端点验证功能

pub mod loader;
pub mod types;

// 重新导出主要类型
pub use loader::{ConfigLoader, YamlConfigLoader};
pub use types::{validate_endpoints, EndpointConfig};

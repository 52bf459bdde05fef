//! 配置加载器实现
//!
//! 提供YAML配置文件解析、环境变量替换和错误处理功能

use crate::config::types::{validate_endpoints, EndpointConfig};
use crate::error::{ConfigError, Result};
use async_trait::async_trait;
use regex::Regex;
use std::path::Path;

/// 配置加载器trait，定义配置加载接口
#[async_trait]
pub trait ConfigLoader: Send + Sync {
    /// 从文件加载端点列表
    ///
    /// # 参数
    /// * `path` - 配置文件路径
    ///
    /// # 返回
    /// * `Result<Vec<EndpointConfig>>` - 可用的端点列表或错误
    async fn load_from_file<P: AsRef<Path> + Send>(&self, path: P) -> Result<Vec<EndpointConfig>>;

    /// 从字符串加载端点列表
    ///
    /// # 参数
    /// * `content` - 配置文件内容
    ///
    /// # 返回
    /// * `Result<Vec<EndpointConfig>>` - 可用的端点列表或错误
    async fn load_from_string(&self, content: &str) -> Result<Vec<EndpointConfig>>;
}

/// YAML配置加载器实现
#[derive(Debug, Clone)]
pub struct YamlConfigLoader {
    /// 是否启用环境变量替换
    enable_env_substitution: bool,
}

impl YamlConfigLoader {
    /// 创建新的YAML配置加载器
    ///
    /// # 参数
    /// * `enable_env_substitution` - 是否启用环境变量替换
    ///
    /// # 返回
    /// * `Self` - 配置加载器实例
    pub fn new(enable_env_substitution: bool) -> Self {
        Self {
            enable_env_substitution,
        }
    }

    /// 替换字符串中的环境变量
    ///
    /// # 参数
    /// * `content` - 要处理的字符串
    ///
    /// # 返回
    /// * `Result<String>` - 替换后的字符串或错误
    fn substitute_env_vars(&self, content: &str) -> Result<String> {
        if !self.enable_env_substitution {
            return Ok(content.to_string());
        }

        // 匹配 ${VAR_NAME} 格式的环境变量
        let env_var_regex = Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}")
            .map_err(|e| ConfigError::ParseError(format!("正则表达式错误: {}", e)))?;

        let mut result = content.to_string();

        for captures in env_var_regex.captures_iter(content) {
            let full_match = &captures[0];
            let var_name = &captures[1];

            match std::env::var(var_name) {
                Ok(value) => {
                    result = result.replace(full_match, &value);
                }
                Err(_) => {
                    return Err(ConfigError::EnvVarError {
                        var: var_name.to_string(),
                    }
                    .into());
                }
            }
        }

        Ok(result)
    }

    /// 解析YAML内容
    ///
    /// # 参数
    /// * `content` - YAML内容
    ///
    /// # 返回
    /// * `Result<Vec<EndpointConfig>>` - 解析并过滤后的端点列表或错误
    fn parse_yaml(&self, content: &str) -> Result<Vec<EndpointConfig>> {
        // 替换环境变量
        let processed_content = self.substitute_env_vars(content)?;

        // 解析YAML端点列表
        let endpoints: Vec<EndpointConfig> = serde_yaml::from_str(&processed_content)
            .map_err(|e| ConfigError::ParseError(format!("YAML解析失败: {}", e)))?;

        // 过滤无效端点，全部无效才算失败
        let endpoints =
            validate_endpoints(endpoints).map_err(ConfigError::ValidationError)?;

        Ok(endpoints)
    }
}

#[async_trait]
impl ConfigLoader for YamlConfigLoader {
    async fn load_from_file<P: AsRef<Path> + Send>(&self, path: P) -> Result<Vec<EndpointConfig>> {
        let path = path.as_ref();

        // 检查文件是否存在
        if !path.exists() {
            return Err(ConfigError::FileNotFound {
                path: path.to_string_lossy().to_string(),
            }
            .into());
        }

        // 读取文件内容
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| ConfigError::ParseError(format!("读取文件失败: {}", e)))?;

        // 解析配置
        let endpoints = self.parse_yaml(&content)?;

        log::info!(
            "成功加载配置文件: {}，端点数量: {}",
            path.display(),
            endpoints.len()
        );

        Ok(endpoints)
    }

    async fn load_from_string(&self, content: &str) -> Result<Vec<EndpointConfig>> {
        let endpoints = self.parse_yaml(content)?;

        log::debug!("成功解析配置字符串，端点数量: {}", endpoints.len());

        Ok(endpoints)
    }
}

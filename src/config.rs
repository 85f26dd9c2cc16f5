use std::env;
use std::time::Duration;

/// 默认核验端点（与服务端开发部署一致）
pub const DEFAULT_ENDPOINT: &str = "http://localhost:5000/process_and_verify";
/// 默认请求超时（秒）。源系统没有客户端超时，这里补上有界超时，
/// 超时按传输失败落盘为failed结果。
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// 客户端配置
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub endpoint: String,     // 核验服务提交端点
    pub timeout_secs: u64,    // 单次请求总超时
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl ClientConfig {
    /// 读取环境变量覆盖缺省值（IDVERIFY_ENDPOINT / IDVERIFY_TIMEOUT_SECS）
    pub fn from_env() -> Self {
        let mut cfg = ClientConfig::default();
        if let Ok(endpoint) = env::var("IDVERIFY_ENDPOINT") {
            if !endpoint.is_empty() {
                cfg.endpoint = endpoint;
            }
        }
        if let Ok(timeout) = env::var("IDVERIFY_TIMEOUT_SECS") {
            if let Ok(secs) = timeout.parse::<u64>() {
                cfg.timeout_secs = secs;
            }
        }
        cfg
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// 由提交端点推导健康检查端点（…/healthz）
    pub fn health_endpoint(&self) -> String {
        match self.endpoint.rfind('/') {
            Some(idx) => format!("{}/healthz", &self.endpoint[..idx]),
            None => format!("{}/healthz", self.endpoint),
        }
    }
}

use std::future::Future;

use log::{debug, info};
use reqwest::multipart::{Form, Part};
use reqwest::Client;

use crate::config::ClientConfig;
use crate::error::VerifyError;
use crate::model::{SubmissionRequest, VerifyResponse};

/// 传输层接缝：隔离HTTP细节，便于用桩实现驱动流程测试
pub trait VerifyTransport {
    /// 把一次完整提交发给核验服务并解出结构化响应
    fn submit(
        &self,
        request: SubmissionRequest,
    ) -> impl Future<Output = Result<VerifyResponse, VerifyError>> + Send;
}

/// 基于reqwest的真实传输：两个具名二进制part，单次POST原子提交
pub struct HttpTransport {
    client: Client,
    endpoint: String,
}

impl HttpTransport {
    /// 构建带有界超时的HTTP客户端
    pub fn new(config: &ClientConfig) -> Result<Self, VerifyError> {
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| VerifyError::ClientBuild(e.to_string()))?;
        Ok(HttpTransport {
            client,
            endpoint: config.endpoint.clone(),
        })
    }

    /// 探测服务端健康检查端点（GET /healthz）
    pub async fn check_health(&self, health_endpoint: &str) -> Result<(), VerifyError> {
        let resp = self
            .client
            .get(health_endpoint)
            .send()
            .await
            .map_err(|e| VerifyError::Transport(e.to_string()))?;
        resp.error_for_status()
            .map_err(|e| VerifyError::Transport(e.to_string()))?;
        Ok(())
    }
}

impl VerifyTransport for HttpTransport {
    async fn submit(&self, request: SubmissionRequest) -> Result<VerifyResponse, VerifyError> {
        debug!(
            "构造multipart：证件照{}字节，人脸照{}字节",
            request.document.len(),
            request.face.len()
        );

        let doc_mime = request.document.mime().to_string();
        let face_mime = request.face.mime().to_string();
        let form = Form::new()
            .part(
                "id_card_image",
                Part::bytes(request.document.into_data())
                    .file_name("id_card_image")
                    .mime_str(&doc_mime)
                    .map_err(|e| VerifyError::ClientBuild(e.to_string()))?,
            )
            .part(
                "live_face_image",
                Part::bytes(request.face.into_data())
                    .file_name("live_face_image")
                    .mime_str(&face_mime)
                    .map_err(|e| VerifyError::ClientBuild(e.to_string()))?,
            );

        let resp = self
            .client
            .post(&self.endpoint)
            .multipart(form)
            .send()
            .await
            .map_err(|e| VerifyError::Transport(e.to_string()))?;

        // 非2xx一律按传输失败处理（207属2xx，正常解析）
        let resp = resp
            .error_for_status()
            .map_err(|e| VerifyError::Transport(e.to_string()))?;
        info!("核验服务已应答：HTTP {}", resp.status());

        resp.json::<VerifyResponse>()
            .await
            .map_err(|e| VerifyError::MalformedResponse(e.to_string()))
    }
}

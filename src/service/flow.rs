use chrono::Utc;
use log::{info, warn};
use rand::Rng;

use crate::capture::{CapturedImage, ImageTracker};
use crate::classifier::classify;
use crate::error::VerifyError;
use crate::model::{SubmissionRequest, VerificationOutcome};
use crate::service::transport::VerifyTransport;

/// 控制器自身状态。"就绪"不是独立存储的状态，而是由跟踪器实时推导的守卫条件。
#[derive(Debug)]
pub enum FlowState {
    Idle,                          // 等待输入/可提交
    Submitting,                    // 一次请求在途（互斥锁本体）
    Settled(VerificationOutcome), // 已落盘：成功或失败都在这里
}

/// 对展示层暴露的只读状态快照
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowPhase {
    Idle,
    Ready, // Idle且两张图齐全
    Submitting,
    Settled,
}

/// 核验流程控制器
///
/// 持有输入跟踪器与传输层，独占两张图片直到一次核验尝试结束。
/// 所有失败路径都收敛为可展示状态，绝不向调用方抛未处理故障。
pub struct VerificationFlow<T: VerifyTransport> {
    tracker: ImageTracker,
    state: FlowState,
    transport: T,
}

impl<T: VerifyTransport> VerificationFlow<T> {
    pub fn new(transport: T) -> Self {
        VerificationFlow {
            tracker: ImageTracker::new(),
            state: FlowState::Idle,
            transport,
        }
    }

    // ---------------------- 输入操作 ----------------------

    /// 设置证件照。在途期间图片归属该次尝试，拒绝改动。
    pub fn set_document_image(&mut self, image: CapturedImage) -> Result<(), VerifyError> {
        self.ensure_not_submitting()?;
        self.tracker.set_document(image);
        Ok(())
    }

    /// 设置活体人脸照
    pub fn set_face_image(&mut self, image: CapturedImage) -> Result<(), VerifyError> {
        self.ensure_not_submitting()?;
        self.tracker.set_face(image);
        Ok(())
    }

    pub fn clear_document_image(&mut self) -> Result<(), VerifyError> {
        self.ensure_not_submitting()?;
        self.tracker.clear_document();
        Ok(())
    }

    pub fn clear_face_image(&mut self) -> Result<(), VerifyError> {
        self.ensure_not_submitting()?;
        self.tracker.clear_face();
        Ok(())
    }

    // ---------------------- 状态查询 ----------------------

    pub fn is_ready(&self) -> bool {
        self.tracker.is_ready()
    }

    pub fn phase(&self) -> FlowPhase {
        match &self.state {
            FlowState::Idle if self.tracker.is_ready() => FlowPhase::Ready,
            FlowState::Idle => FlowPhase::Idle,
            FlowState::Submitting => FlowPhase::Submitting,
            FlowState::Settled(_) => FlowPhase::Settled,
        }
    }

    /// 已落盘的聚合结果（未落盘为None）
    pub fn outcome(&self) -> Option<&VerificationOutcome> {
        match &self.state {
            FlowState::Settled(outcome) => Some(outcome),
            _ => None,
        }
    }

    pub fn has_document(&self) -> bool {
        self.tracker.document().is_some()
    }

    pub fn has_face(&self) -> bool {
        self.tracker.face().is_some()
    }

    // ---------------------- 核心流转 ----------------------

    /// 发起一次核验提交
    ///
    /// 前置：无在途请求、两张图齐全，否则同步拒绝且不发任何请求。
    /// 请求结束后无论成败都进入Settled——传输/解析失败就地合成failed结果。
    pub async fn submit(&mut self) -> Result<&VerificationOutcome, VerifyError> {
        if matches!(self.state, FlowState::Submitting) {
            warn!("提交被忽略：已有请求在途");
            return Err(VerifyError::Busy);
        }
        if !self.tracker.is_ready() {
            warn!("提交被拒绝：证件照或人脸照缺失");
            return Err(VerifyError::NotReady);
        }

        // 克隆当前两张图构造原子请求：发出后即便输入被改动也不影响本次尝试
        let request = SubmissionRequest {
            document: self
                .tracker
                .document()
                .cloned()
                .ok_or(VerifyError::NotReady)?,
            face: self.tracker.face().cloned().ok_or(VerifyError::NotReady)?,
        };

        self.state = FlowState::Submitting;
        info!("开始核验提交");

        let verification_id = new_verification_id();
        let outcome = match self.transport.submit(request).await {
            Ok(resp) => classify(&resp, verification_id),
            Err(e) => {
                // 本地恢复：失败折叠为failed结果，绝不中断流程
                warn!("核验提交失败，合成failed结果：{}", e);
                VerificationOutcome::transport_failure(verification_id, e.to_string())
            }
        };

        info!(
            "核验已落盘：{}，总体状态{:?}，通过{}步",
            outcome.verification_id,
            outcome.overall,
            outcome.passed_count()
        );
        self.state = FlowState::Settled(outcome);
        match &self.state {
            FlowState::Settled(outcome) => Ok(outcome),
            _ => unreachable!("刚刚settle的状态"),
        }
    }

    /// 重试：丢弃结果、保留两张图，回到Idle
    pub fn retry(&mut self) -> Result<(), VerifyError> {
        self.ensure_not_submitting()?;
        self.state = FlowState::Idle;
        Ok(())
    }

    /// 重新开始：图片、预览、结果全部清空
    pub fn start_over(&mut self) -> Result<(), VerifyError> {
        self.ensure_not_submitting()?;
        self.tracker.clear_all();
        self.state = FlowState::Idle;
        Ok(())
    }

    fn ensure_not_submitting(&self) -> Result<(), VerifyError> {
        if matches!(self.state, FlowState::Submitting) {
            return Err(VerifyError::Busy);
        }
        Ok(())
    }
}

/// 生成核验流水号：VER- + 毫秒时间戳末8位 + 随机两位防撞
fn new_verification_id() -> String {
    let millis = Utc::now().timestamp_millis();
    let tail = (millis % 100_000_000).unsigned_abs();
    let salt = rand::thread_rng().gen_range(10..100);
    format!("VER-{:08}{}", tail, salt)
}

//! 流程控制器集成测试：用桩传输驱动完整状态机，不触网。

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use idverify_client::capture::CapturedImage;
use idverify_client::error::VerifyError;
use idverify_client::model::{
    DatabaseStorage, FaceVerification, LivenessCheck, OverallStatus, SubmissionRequest,
    VerifyResponse,
};
use idverify_client::service::{FlowPhase, VerificationFlow, VerifyTransport};

/// 桩传输：记录请求次数，按预设模式应答
struct StubTransport {
    calls: Arc<AtomicUsize>,
    fail: bool,
    response: VerifyResponse,
}

impl StubTransport {
    fn succeeding(response: VerifyResponse) -> (Self, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        (
            StubTransport {
                calls: calls.clone(),
                fail: false,
                response,
            },
            calls,
        )
    }

    fn failing() -> (Self, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        (
            StubTransport {
                calls: calls.clone(),
                fail: true,
                response: VerifyResponse::default(),
            },
            calls,
        )
    }
}

impl VerifyTransport for StubTransport {
    async fn submit(&self, _request: SubmissionRequest) -> Result<VerifyResponse, VerifyError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            Err(VerifyError::Transport("connection refused".to_string()))
        } else {
            Ok(self.response.clone())
        }
    }
}

fn png_image() -> CapturedImage {
    CapturedImage::new(vec![0u8; 128], "image/png", "stub.png").unwrap()
}

fn all_pass_response() -> VerifyResponse {
    VerifyResponse {
        id_card_processing_status: Some("Successfully processed ID card text and face.".into()),
        liveness_check: Some(LivenessCheck {
            passed: true,
            status: "Liveness confirmed".into(),
        }),
        face_verification: Some(FaceVerification {
            verified: true,
            status: "Faces match".into(),
            distance: "0.25".into(),
            threshold: "0.40".into(),
            metric: "cosine".into(),
            model: "Facenet".into(),
        }),
        database_storage: Some(DatabaseStorage {
            stored: true,
            message: "User details stored".into(),
        }),
        overall_status: Some("Success: All checks passed and data stored.".into()),
        text_details: None,
    }
}

#[tokio::test]
async fn submit_without_face_image_is_rejected_and_sends_nothing() {
    let (stub, calls) = StubTransport::succeeding(all_pass_response());
    let mut flow = VerificationFlow::new(stub);
    flow.set_document_image(png_image()).unwrap();

    assert!(!flow.is_ready());
    let err = flow.submit().await.unwrap_err();
    assert!(matches!(err, VerifyError::NotReady));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
    assert_eq!(flow.phase(), FlowPhase::Idle);
}

#[tokio::test]
async fn readiness_is_derived_not_remembered() {
    let (stub, _calls) = StubTransport::succeeding(all_pass_response());
    let mut flow = VerificationFlow::new(stub);

    assert_eq!(flow.phase(), FlowPhase::Idle);
    flow.set_document_image(png_image()).unwrap();
    flow.set_face_image(png_image()).unwrap();
    assert_eq!(flow.phase(), FlowPhase::Ready);

    // 移除一张图，就绪态随之消失——不存在被"记住"的Ready
    flow.clear_face_image().unwrap();
    assert_eq!(flow.phase(), FlowPhase::Idle);
}

#[tokio::test]
async fn successful_submission_settles_with_classified_outcome() {
    let (stub, calls) = StubTransport::succeeding(all_pass_response());
    let mut flow = VerificationFlow::new(stub);
    flow.set_document_image(png_image()).unwrap();
    flow.set_face_image(png_image()).unwrap();

    let outcome = flow.submit().await.unwrap();
    assert_eq!(outcome.overall, OverallStatus::Success);
    assert_eq!(outcome.steps.len(), 4);
    assert!(outcome.verification_id.starts_with("VER-"));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(flow.phase(), FlowPhase::Settled);
}

#[tokio::test]
async fn transport_failure_settles_with_synthesized_failed_outcome() {
    let (stub, calls) = StubTransport::failing();
    let mut flow = VerificationFlow::new(stub);
    flow.set_document_image(png_image()).unwrap();
    flow.set_face_image(png_image()).unwrap();

    // 传输失败不是调用方错误：submit仍Ok，失败折叠进结果里
    let outcome = flow.submit().await.unwrap();
    assert_eq!(outcome.overall, OverallStatus::Failed);
    assert!(outcome.steps.is_empty());
    assert!(outcome.confidence.is_none());
    assert!(outcome
        .failure_cause
        .as_deref()
        .unwrap()
        .contains("connection refused"));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(flow.phase(), FlowPhase::Settled);
}

#[tokio::test]
async fn retry_keeps_images_and_discards_outcome() {
    let (stub, _calls) = StubTransport::failing();
    let mut flow = VerificationFlow::new(stub);
    flow.set_document_image(png_image()).unwrap();
    flow.set_face_image(png_image()).unwrap();
    flow.submit().await.unwrap();
    assert!(flow.outcome().is_some());

    flow.retry().unwrap();
    assert!(flow.outcome().is_none());
    assert!(flow.has_document());
    assert!(flow.has_face());
    // 图片保留，立刻回到可提交状态
    assert_eq!(flow.phase(), FlowPhase::Ready);
}

#[tokio::test]
async fn start_over_clears_images_and_outcome() {
    let (stub, _calls) = StubTransport::succeeding(all_pass_response());
    let mut flow = VerificationFlow::new(stub);
    flow.set_document_image(png_image()).unwrap();
    flow.set_face_image(png_image()).unwrap();
    flow.submit().await.unwrap();

    flow.start_over().unwrap();
    assert!(flow.outcome().is_none());
    assert!(!flow.has_document());
    assert!(!flow.has_face());
    assert_eq!(flow.phase(), FlowPhase::Idle);
}

#[tokio::test]
async fn sequential_submits_each_issue_exactly_one_request() {
    let (stub, calls) = StubTransport::succeeding(all_pass_response());
    let mut flow = VerificationFlow::new(stub);
    flow.set_document_image(png_image()).unwrap();
    flow.set_face_image(png_image()).unwrap();

    flow.submit().await.unwrap();
    flow.retry().unwrap();
    flow.submit().await.unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn settled_flow_can_resubmit_without_retry() {
    // Settled非终态死锁：直接再次submit等价于先retry
    let (stub, calls) = StubTransport::succeeding(all_pass_response());
    let mut flow = VerificationFlow::new(stub);
    flow.set_document_image(png_image()).unwrap();
    flow.set_face_image(png_image()).unwrap();

    flow.submit().await.unwrap();
    flow.submit().await.unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

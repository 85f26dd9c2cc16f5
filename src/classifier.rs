//! 结果分类器：把核验服务的多字段响应折叠为单一总体状态。
//!
//! 纯函数、确定性：同一响应两次分类产出完全一致的步骤顺序与状态。
//! 四个子检查等权计数，不做加权——这是刻意的简化。

use crate::model::{
    ExtractedFields, FaceMatchDetail, OverallStatus, StepKind, StepResult, VerificationOutcome,
    VerifyResponse,
};

// 服务端对"未执行"步骤的占位文案（与服务端自身的缺省值保持一致）
const NOT_PROCESSED: &str = "Not Processed";
const NOT_PERFORMED: &str = "Not Performed";
const NOT_ATTEMPTED: &str = "Not Attempted";

/// 响应 → 聚合结果。verification_id由调用方生成并传入，保持本函数纯粹。
pub fn classify(resp: &VerifyResponse, verification_id: String) -> VerificationOutcome {
    let steps = derive_steps(resp);
    let face_match = derive_face_match(resp);
    let confidence = face_match
        .as_ref()
        .and_then(|fm| match (fm.distance, fm.threshold) {
            (Some(d), Some(t)) => confidence_score(d, t),
            _ => None,
        });

    let passed = steps.iter().filter(|s| s.passed).count();
    let overall = match passed {
        4 => OverallStatus::Success,
        0 => OverallStatus::Failed,
        _ => OverallStatus::Partial,
    };

    // 提取字段仅在整条链路可信（success）时透出
    let extracted = if overall == OverallStatus::Success {
        resp.text_details.as_ref().map(|td| ExtractedFields {
            name: td.name.clone(),
            date_of_birth: td.dob.clone(),
            document_type: td.card_type.clone(),
            document_number: td.aadhaar_no.clone(),
        })
    } else {
        None
    };

    let server_message = resp.overall_status.clone();
    let has_warning = server_message
        .as_deref()
        .map(|s| s.to_ascii_lowercase().contains("warning"))
        .unwrap_or(false);

    VerificationOutcome {
        verification_id,
        overall,
        steps,
        confidence,
        face_match,
        extracted,
        server_message,
        has_warning,
        failure_cause: None,
    }
}

/// 四步逐一判定，固定顺序，子对象缺失时记为未执行而非省略
fn derive_steps(resp: &VerifyResponse) -> Vec<StepResult> {
    StepKind::ORDERED
        .iter()
        .map(|kind| match kind {
            StepKind::DocumentProcessing => document_step(resp),
            StepKind::Liveness => liveness_step(resp),
            StepKind::FaceMatch => face_match_step(resp),
            StepKind::Storage => storage_step(resp),
        })
        .collect()
}

fn document_step(resp: &VerifyResponse) -> StepResult {
    // 与服务端人类可读文案的脆弱耦合：成功以子串"Successfully"为信号（大小写不敏感）。
    // 服务契约没有结构化状态码，必须原样保留该判定以保证兼容。
    let passed = resp
        .id_card_processing_status
        .as_deref()
        .map(|s| s.to_ascii_lowercase().contains("successfully"))
        .unwrap_or(false);
    StepResult {
        kind: StepKind::DocumentProcessing,
        passed,
        status_text: resp
            .id_card_processing_status
            .clone()
            .unwrap_or_else(|| NOT_PROCESSED.to_string()),
        detail_text: String::new(),
    }
}

fn liveness_step(resp: &VerifyResponse) -> StepResult {
    let lc = resp.liveness_check.as_ref();
    StepResult {
        kind: StepKind::Liveness,
        passed: lc.map(|c| c.passed).unwrap_or(false),
        status_text: lc
            .map(|c| c.status.clone())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| NOT_PERFORMED.to_string()),
        detail_text: String::new(),
    }
}

fn face_match_step(resp: &VerifyResponse) -> StepResult {
    let fv = resp.face_verification.as_ref();
    let detail = fv
        .map(|v| {
            if v.model.is_empty() && v.distance.is_empty() {
                String::new()
            } else {
                format!("{} · distance={} ({})", v.model, v.distance, v.metric)
            }
        })
        .unwrap_or_default();
    StepResult {
        kind: StepKind::FaceMatch,
        passed: fv.map(|v| v.verified).unwrap_or(false),
        status_text: fv
            .map(|v| v.status.clone())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| NOT_PERFORMED.to_string()),
        detail_text: detail,
    }
}

fn storage_step(resp: &VerifyResponse) -> StepResult {
    let ds = resp.database_storage.as_ref();
    StepResult {
        kind: StepKind::Storage,
        passed: ds.map(|d| d.stored).unwrap_or(false),
        status_text: ds
            .map(|d| d.message.clone())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| NOT_ATTEMPTED.to_string()),
        detail_text: String::new(),
    }
}

fn derive_face_match(resp: &VerifyResponse) -> Option<FaceMatchDetail> {
    resp.face_verification.as_ref().map(|fv| FaceMatchDetail {
        distance: parse_metric(&fv.distance),
        threshold: parse_metric(&fv.threshold),
        metric: fv.metric.clone(),
        model: fv.model.clone(),
    })
}

/// 距离/阈值为文本传输，解析失败视为缺失
fn parse_metric(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok()
}

/// 置信度：距离是反向相似度（0=完全匹配），按与阈值的接近程度换算为0~100整数。
/// 阈值为0时无定义，返回None——"没有分数"和"0分"必须可区分。
pub fn confidence_score(distance: f64, threshold: f64) -> Option<u8> {
    if threshold == 0.0 || !distance.is_finite() || !threshold.is_finite() {
        return None;
    }
    let raw = ((threshold - distance) / threshold) * 100.0;
    Some(raw.clamp(0.0, 100.0).round() as u8)
}

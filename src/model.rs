use serde::{Deserialize, Serialize};

use crate::capture::CapturedImage;

// ---------------------- 核验服务响应（线上契约） ----------------------
// 所有顶层字段均可缺失：缺失视为"该步骤未执行"，绝不因缺字段解析失败。

/// 活体检测子结果
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LivenessCheck {
    #[serde(default)]
    pub passed: bool, // 活体检测是否通过
    #[serde(default)]
    pub status: String, // 服务端状态描述
}

/// 人脸比对子结果（distance/threshold为文本，可能解析失败）
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FaceVerification {
    #[serde(default)]
    pub verified: bool, // 证件脸与活体脸是否匹配
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub distance: String, // 距离度量（越小越像），文本形式
    #[serde(default)]
    pub threshold: String, // 判定阈值，文本形式
    #[serde(default)]
    pub metric: String, // 距离度量名（如cosine）
    #[serde(default)]
    pub model: String, // 比对模型名
}

/// 数据入库子结果
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DatabaseStorage {
    #[serde(default)]
    pub stored: bool, // 核验通过的记录是否已入库
    #[serde(default)]
    pub message: String,
}

/// OCR提取的证件字段
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TextDetails {
    pub name: Option<String>,       // 姓名
    pub dob: Option<String>,        // 出生日期
    pub card_type: Option<String>,  // 证件类型
    pub aadhaar_no: Option<String>, // 证件号码
}

/// 核验服务完整响应
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VerifyResponse {
    pub id_card_processing_status: Option<String>, // 证件处理状态文本，成功含"Successfully"
    pub liveness_check: Option<LivenessCheck>,
    pub face_verification: Option<FaceVerification>,
    pub database_storage: Option<DatabaseStorage>,
    pub overall_status: Option<String>, // 服务端自由文本总结，可能含"warning"
    pub text_details: Option<TextDetails>,
}

// ---------------------- 提交请求 ----------------------

/// 一次核验提交：两张图必须齐全，整体发送、绝不拆分
#[derive(Debug, Clone)]
pub struct SubmissionRequest {
    pub document: CapturedImage, // 证件照，multipart字段名 id_card_image
    pub face: CapturedImage,     // 活体人脸照，multipart字段名 live_face_image
}

// ---------------------- 聚合结果（对展示层的只读输出） ----------------------

/// 总体核验状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OverallStatus {
    Processing, // 请求在途（由流程控制器设置，分类器不产出）
    Success,    // 四步全部通过
    Partial,    // 部分通过
    Failed,     // 全部未通过，或传输/解析失败
}

/// 四个后端检查步骤，固定顺序
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StepKind {
    DocumentProcessing, // 证件OCR与人脸提取
    Liveness,           // 活体检测
    FaceMatch,          // 人脸比对
    Storage,            // 记录入库
}

impl StepKind {
    /// 固定展示顺序（分类器输出必须按此序）
    pub const ORDERED: [StepKind; 4] = [
        StepKind::DocumentProcessing,
        StepKind::Liveness,
        StepKind::FaceMatch,
        StepKind::Storage,
    ];

    /// 展示名
    pub fn label(&self) -> &'static str {
        match self {
            StepKind::DocumentProcessing => "证件处理",
            StepKind::Liveness => "活体检测",
            StepKind::FaceMatch => "人脸比对",
            StepKind::Storage => "数据入库",
        }
    }
}

/// 单步检查结果：子对象缺失时记为未执行，绝不省略该步
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepResult {
    pub kind: StepKind,
    pub passed: bool,
    pub status_text: String, // 服务端状态原文（或缺省占位）
    pub detail_text: String, // 附加说明（如比对模型与距离）
}

/// 人脸比对附加数据（置信度计算的输入）
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FaceMatchDetail {
    pub distance: Option<f64>,  // 文本解析失败则为None
    pub threshold: Option<f64>, // 文本解析失败则为None
    pub metric: String,
    pub model: String,
}

/// OCR提取字段（仅在总体success时透出）
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtractedFields {
    pub name: Option<String>,
    pub date_of_birth: Option<String>,
    pub document_type: Option<String>,
    pub document_number: Option<String>,
}

/// 一次提交的聚合结果：构造后不可变，重试/重来时整体丢弃
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VerificationOutcome {
    pub verification_id: String, // VER-xxxxxxxx
    pub overall: OverallStatus,
    pub steps: Vec<StepResult>, // 正常分类恒为4步；传输失败合成结果为空
    pub confidence: Option<u8>, // 0~100；不可计算时缺省（缺省≠0分）
    pub face_match: Option<FaceMatchDetail>,
    pub extracted: Option<ExtractedFields>,
    pub server_message: Option<String>, // 服务端overall_status原文
    pub has_warning: bool,              // server_message含"warning"（大小写不敏感）
    pub failure_cause: Option<String>,  // 传输/解析失败的诊断信息
}

impl VerificationOutcome {
    /// 传输/解析失败时合成的兜底结果：本地恢复，绝不向上抛
    pub fn transport_failure(verification_id: String, cause: String) -> Self {
        VerificationOutcome {
            verification_id,
            overall: OverallStatus::Failed,
            steps: Vec::new(),
            confidence: None,
            face_match: None,
            extracted: None,
            server_message: None,
            has_warning: false,
            failure_cause: Some(cause),
        }
    }

    /// 通过的步骤数
    pub fn passed_count(&self) -> usize {
        self.steps.iter().filter(|s| s.passed).count()
    }
}

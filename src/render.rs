//! 终端渲染：把聚合结果排成人可读的报告。纯字符串拼装，无决策逻辑。

use std::fmt::Write;

use crate::model::{OverallStatus, VerificationOutcome};

/// 总体状态横幅文案
fn banner(outcome: &VerificationOutcome) -> (&'static str, &'static str) {
    match outcome.overall {
        OverallStatus::Processing => ("…", "核验进行中"),
        OverallStatus::Success => ("✔", "核验通过"),
        OverallStatus::Partial => ("◑", "部分通过"),
        OverallStatus::Failed => ("✘", "核验失败"),
    }
}

/// 渲染完整报告
pub fn render_outcome(outcome: &VerificationOutcome) -> String {
    let mut out = String::new();
    let (mark, title) = banner(outcome);

    let _ = writeln!(out, "==============================");
    let _ = writeln!(out, " {} {}（{}）", mark, title, outcome.verification_id);
    if let Some(msg) = &outcome.server_message {
        let _ = writeln!(out, "   服务端：{}", msg);
    }
    if outcome.has_warning {
        let _ = writeln!(out, "   ⚠ 服务端提示存在warning");
    }
    let _ = writeln!(out, "==============================");

    // 四步明细（传输失败的合成结果没有步骤）
    if outcome.steps.is_empty() {
        if let Some(cause) = &outcome.failure_cause {
            let _ = writeln!(out, " 本次提交未获得有效响应：{}", cause);
        }
    } else {
        for step in &outcome.steps {
            let mark = if step.passed { "✔" } else { "✘" };
            let _ = writeln!(out, " {} {}：{}", mark, step.kind.label(), step.status_text);
            if !step.detail_text.is_empty() {
                let _ = writeln!(out, "     {}", step.detail_text);
            }
        }
    }

    // 置信度（仅在可计算时展示；0分也会展示）
    if let Some(score) = outcome.confidence {
        let _ = writeln!(out, " 置信度：{}%", score);
        if let Some(fm) = &outcome.face_match {
            if let (Some(d), Some(t)) = (fm.distance, fm.threshold) {
                let _ = writeln!(out, "   distance={} / threshold={}（{}）", d, t, fm.metric);
            }
        }
    }

    // 提取字段：只有整条链路可信（success）才会出现
    if let Some(fields) = &outcome.extracted {
        let _ = writeln!(out, " ---------- 证件提取信息 ----------");
        let show = |v: &Option<String>| v.clone().unwrap_or_else(|| "-".to_string());
        let _ = writeln!(out, " 姓名：{}", show(&fields.name));
        let _ = writeln!(out, " 出生日期：{}", show(&fields.date_of_birth));
        let _ = writeln!(out, " 证件类型：{}", show(&fields.document_type));
        let _ = writeln!(out, " 证件号码：{}", show(&fields.document_number));
    }

    // 失败时给出逐项排查提示
    if outcome.overall == OverallStatus::Failed && !outcome.steps.is_empty() {
        let _ = writeln!(out, " ---------- 排查建议 ----------");
        for step in outcome.steps.iter().filter(|s| !s.passed) {
            let _ = writeln!(out, " · {}未通过", step.kind.label());
        }
    }

    out
}

//! 身份核验客户端核心库
//!
//! 流程：用户提供证件照与活体人脸照 → 就绪跟踪器判定可提交 →
//! 流程控制器单次multipart提交 → 结果分类器把四个后端子结果
//! （证件处理/活体/人脸比对/入库）折叠为单一总体状态与置信度。
//!
//! - [`capture`]：图片采集校验 + 输入就绪跟踪
//! - [`service::flow`]：提交生命周期状态机（Idle/Submitting/Settled）
//! - [`classifier`]：响应 → 聚合结果的纯函数
//! - [`service::transport`]：传输接缝与reqwest实现
//! - [`render`]：终端展示

pub mod capture;
pub mod classifier;
pub mod config;
pub mod error;
pub mod model;
pub mod render;
pub mod service;

use std::fs;
use std::path::Path;

use log::debug;

use crate::error::VerifyError;

/// 单张图片大小上限：5 MiB
pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

/// 图片用途：证件照或活体人脸照
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    Document,
    Face,
}

/// 已采集的一张图片：字节载荷 + MIME + 预览引用
///
/// 采集即校验（MIME前缀、大小上限），入库后整体替换、绝不局部修改。
#[derive(Debug, Clone)]
pub struct CapturedImage {
    data: Vec<u8>,
    mime: String,
    preview: String, // 预览引用（CLI场景即来源文件名/路径）
}

impl CapturedImage {
    /// 从原始字节构造，校验MIME前缀与大小
    pub fn new(data: Vec<u8>, mime: &str, preview: &str) -> Result<Self, VerifyError> {
        if !mime.starts_with("image/") {
            return Err(VerifyError::InvalidMime(mime.to_string()));
        }
        if data.len() > MAX_IMAGE_BYTES {
            return Err(VerifyError::Oversized {
                size: data.len(),
                limit: MAX_IMAGE_BYTES,
            });
        }
        Ok(CapturedImage {
            data,
            mime: mime.to_string(),
            preview: preview.to_string(),
        })
    }

    /// 从文件路径加载，按扩展名推断MIME（仅png/jpg/jpeg）
    pub fn from_path(path: &Path) -> Result<Self, VerifyError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_ascii_lowercase();
        let mime = match ext.as_str() {
            "png" => "image/png",
            "jpg" | "jpeg" => "image/jpeg",
            other => return Err(VerifyError::UnknownExtension(other.to_string())),
        };

        let data = fs::read(path)
            .map_err(|e| VerifyError::ImageRead(format!("{}：{}", path.display(), e)))?;
        debug!("已读取图片：{}（{}字节）", path.display(), data.len());

        Self::new(data, mime, &path.display().to_string())
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    pub fn mime(&self) -> &str {
        &self.mime
    }

    pub fn preview(&self) -> &str {
        &self.preview
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

// ---------------------- 输入就绪跟踪器 ----------------------

/// 持有两张待提交图片并推导提交就绪状态
///
/// 叶子组件：只更新自身持有的状态，无网络IO、无其他副作用。
#[derive(Debug, Default)]
pub struct ImageTracker {
    document: Option<CapturedImage>,
    face: Option<CapturedImage>,
}

impl ImageTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// 设置证件照（重复设置即整体替换）
    pub fn set_document(&mut self, image: CapturedImage) {
        self.document = Some(image);
    }

    /// 设置活体人脸照
    pub fn set_face(&mut self, image: CapturedImage) {
        self.face = Some(image);
    }

    /// 移除证件照及其预览
    pub fn clear_document(&mut self) {
        self.document = None;
    }

    /// 移除人脸照及其预览
    pub fn clear_face(&mut self) {
        self.face = None;
    }

    /// 清空全部（"重新开始"用）
    pub fn clear_all(&mut self) {
        self.document = None;
        self.face = None;
    }

    pub fn document(&self) -> Option<&CapturedImage> {
        self.document.as_ref()
    }

    pub fn face(&self) -> Option<&CapturedImage> {
        self.face.as_ref()
    }

    /// 两张图都已持有才算就绪
    pub fn is_ready(&self) -> bool {
        self.document.is_some() && self.face.is_some()
    }
}

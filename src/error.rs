use thiserror::Error;

/// 全流程统一错误类型
///
/// 分三类：本地校验（同步拒绝、不发请求）、传输/解析（就地恢复为failed结果）、
/// 客户端自身初始化失败。后端子检查未通过不属于错误，由分类器折叠进总体状态。
#[derive(Debug, Error)]
pub enum VerifyError {
    /// 本地校验：MIME类型不是图片
    #[error("不支持的文件类型：{0}（仅支持图片）")]
    InvalidMime(String),

    /// 本地校验：文件超过大小上限
    #[error("图片过大：{size}字节（上限{limit}字节）")]
    Oversized { size: usize, limit: usize },

    /// 本地校验：无法识别的图片扩展名
    #[error("无法识别的图片扩展名：{0}（仅支持 png/jpg/jpeg）")]
    UnknownExtension(String),

    /// 图片文件读取失败
    #[error("图片读取失败：{0}")]
    ImageRead(String),

    /// 提交前置条件不满足：证件照与人脸照必须齐全
    #[error("证件照与人脸照必须都已提供")]
    NotReady,

    /// 已有一次提交在途中，拒绝并发操作
    #[error("当前已有核验请求在处理中")]
    Busy,

    /// HTTP客户端构建失败（端点/超时配置非法）
    #[error("HTTP客户端初始化失败：{0}")]
    ClientBuild(String),

    /// 网络传输失败（含超时与非2xx状态）
    #[error("核验服务请求失败：{0}")]
    Transport(String),

    /// 响应体无法解析为约定的JSON结构
    #[error("核验服务响应解析失败：{0}")]
    MalformedResponse(String),
}

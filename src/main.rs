use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use env_logger::Env;
use log::{info, warn};

use idverify_client::capture::CapturedImage;
use idverify_client::config::ClientConfig;
use idverify_client::model::OverallStatus;
use idverify_client::render::render_outcome;
use idverify_client::service::{HttpTransport, VerificationFlow};

/// 身份核验客户端：提交证件照与活体人脸照，聚合展示多步核验结果
#[derive(Debug, Parser)]
#[command(name = "idverify", version)]
struct Cli {
    /// 证件照路径（png/jpg/jpeg，≤5MiB）
    #[arg(long)]
    document: PathBuf,

    /// 活体人脸照路径（png/jpg/jpeg，≤5MiB）
    #[arg(long)]
    face: PathBuf,

    /// 核验服务端点（亦可用环境变量IDVERIFY_ENDPOINT）
    #[arg(long)]
    endpoint: Option<String>,

    /// 请求超时秒数
    #[arg(long)]
    timeout: Option<u64>,

    /// 以JSON输出聚合结果
    #[arg(long)]
    json: bool,

    /// 提交前先探测服务端健康检查端点
    #[arg(long)]
    check_health: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    // 1. 初始化日志（输出到控制台）
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let cli = Cli::parse();

    // 2. 组装配置：环境变量缺省，命令行覆盖
    let mut config = ClientConfig::from_env();
    if let Some(endpoint) = cli.endpoint {
        config.endpoint = endpoint;
    }
    if let Some(secs) = cli.timeout {
        config.timeout_secs = secs;
    }
    info!("核验端点：{}（超时{}秒）", config.endpoint, config.timeout_secs);

    let transport = match HttpTransport::new(&config) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("初始化失败：{}", e);
            return ExitCode::FAILURE;
        }
    };

    // 3. 可选：先探活
    if cli.check_health {
        match transport.check_health(&config.health_endpoint()).await {
            Ok(()) => info!("服务端健康检查通过"),
            Err(e) => warn!("服务端健康检查未通过（继续提交）：{}", e),
        }
    }

    // 4. 采集两张图（采集即校验MIME与大小）
    let mut flow = VerificationFlow::new(transport);
    for (path, is_document) in [(&cli.document, true), (&cli.face, false)] {
        let image = match CapturedImage::from_path(path) {
            Ok(img) => img,
            Err(e) => {
                eprintln!("图片校验失败：{}", e);
                return ExitCode::FAILURE;
            }
        };
        let set = if is_document {
            flow.set_document_image(image)
        } else {
            flow.set_face_image(image)
        };
        if let Err(e) = set {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    }

    // 5. 提交并渲染结果（提交内部已把失败合成为可展示状态）
    let outcome = match flow.submit().await {
        Ok(o) => o,
        Err(e) => {
            // 只有本地校验类错误会走到这里
            eprintln!("无法提交：{}", e);
            return ExitCode::FAILURE;
        }
    };

    if cli.json {
        match serde_json::to_string_pretty(outcome) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("结果序列化失败：{}", e);
                return ExitCode::FAILURE;
            }
        }
    } else {
        print!("{}", render_outcome(outcome));
    }

    match outcome.overall {
        OverallStatus::Success => ExitCode::SUCCESS,
        _ => ExitCode::FAILURE,
    }
}

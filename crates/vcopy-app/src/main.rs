//! # vcopy-app
//!
//! vcopy 서버 바이너리 진입점.
//! CLI 파싱, 설정 로드, 어댑터 조립(DI), 라이프사이클 관리.

mod lifecycle;

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use vcopy_automation::controller::CopyPasteController;
use vcopy_automation::dispatcher::PasteDispatcher;
use vcopy_automation::noop::NoOpCanvasPaster;
use vcopy_core::config::AppConfig;
use vcopy_core::config_manager::ConfigManager;
use vcopy_core::ports::canvas::CanvasPaster;
use vcopy_network::canvas_client::HttpCanvasPaster;
use vcopy_storage::object_store::FileObjectStore;
use vcopy_vision::capture::XcapScreenSource;
use vcopy_vision::normalize::NormalizeLimits;
use vcopy_vision::projector::ViewProjector;
use vcopy_web::WebServer;

use crate::lifecycle::{supervise, wait_for_exit_signal, Shutdown};

/// vcopy 서버
///
/// 휴대폰으로 찍은 객체를 데스크톱 디자인 캔버스의 화면 위치에 붙여넣는다.
#[derive(Parser, Debug, Default)]
#[command(name = "vcopy")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// 설정 파일 경로 (기본: 플랫폼 설정 디렉토리)
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,

    /// 리스닝 포트
    #[arg(long, short = 'p', env = "PORT")]
    port: Option<u16>,

    /// 캔버스 서비스 자격증명
    #[arg(long)]
    canvas_password: Option<String>,

    /// 캔버스 서비스 URL
    #[arg(long)]
    canvas_url: Option<String>,

    /// 캡처 객체 저장 디렉토리
    #[arg(long)]
    object_dir: Option<PathBuf>,

    /// 오프라인 모드 (캔버스 전송 없이 로그만 남김)
    #[arg(long, short = 'o')]
    offline: bool,

    /// 로그 레벨 (trace, debug, info, warn, error)
    #[arg(long, short = 'l', default_value = "info")]
    log_level: String,
}

/// CLI 인자로 설정 덮어쓰기
fn apply_overrides(config: &mut AppConfig, args: &Args) {
    if let Some(port) = args.port {
        config.web.port = port;
    }
    if let Some(ref password) = args.canvas_password {
        config.canvas.password = password.clone();
    }
    if let Some(ref url) = args.canvas_url {
        config.canvas.base_url = url.clone();
    }
    if let Some(ref dir) = args.object_dir {
        config.storage.object_dir = Some(dir.clone());
    }
}

/// 설정 관리자 생성 (`--config` 경로 또는 플랫폼 설정 디렉토리)
fn load_config_manager(args: &Args) -> Result<ConfigManager> {
    let manager = match args.config {
        Some(ref path) => ConfigManager::with_path(path.clone())?,
        None => ConfigManager::new()?,
    };
    Ok(manager)
}

fn log_filter(level: &str) -> String {
    [
        "vcopy",
        "vcopy_core",
        "vcopy_vision",
        "vcopy_storage",
        "vcopy_network",
        "vcopy_automation",
        "vcopy_web",
        "tower_http",
    ]
    .iter()
    .map(|target| format!("{target}={level}"))
    .collect::<Vec<_>>()
    .join(",")
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(log_filter(&args.log_level))),
        )
        .init();

    // ── 설정 ──
    let config_manager = load_config_manager(&args)?;
    info!("설정 파일: {:?}", config_manager.config_path());

    let mut config = config_manager.config().clone();
    apply_overrides(&mut config, &args);
    config.validate()?;

    // ── 어댑터 ──
    let store = FileObjectStore::open(config.storage.resolved_object_dir()).await?;
    let screen = Arc::new(XcapScreenSource::with_monitor(config.vision.monitor_index));
    let locator = Arc::new(ViewProjector::with_threshold(config.vision.match_threshold));

    let paster: Arc<dyn CanvasPaster> = if args.offline {
        info!("오프라인 모드: 캔버스 전송 비활성");
        Arc::new(NoOpCanvasPaster)
    } else {
        Arc::new(HttpCanvasPaster::new(
            &config.canvas.base_url,
            config.canvas_timeout(),
        )?)
    };
    let dispatcher = PasteDispatcher::new(
        paster,
        config.canvas.password.clone(),
        config.canvas_timeout(),
    );

    let controller = Arc::new(CopyPasteController::new(
        screen,
        locator,
        Arc::new(store),
        dispatcher,
        NormalizeLimits {
            view_max_size: config.vision.view_max_size,
            screenshot_max_size: config.vision.screenshot_max_size,
        },
    ));

    // ── 웹 서버 ──
    let (shutdown, shutdown_rx) = Shutdown::channel();
    let web_server = WebServer::new(controller, config.web.clone());
    info!("vcopy 서버: {} (Ctrl+C로 종료)", web_server.url());

    let server = tokio::spawn(async move { web_server.run(shutdown_rx).await });
    let signal = supervise(server, wait_for_exit_signal(), shutdown).await?;

    info!(signal = ?signal, "vcopy 서버 종료");
    Ok(())
}

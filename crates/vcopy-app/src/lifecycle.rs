//! 서버 라이프사이클.
//!
//! OS 종료 시그널을 기다렸다가 웹 서버에 종료를 알리고, 서버 태스크가
//! 정리될 때까지 감독한다. 시그널 전에 서버가 먼저 끝나면 그 결과를 그대로 돌려준다.

use anyhow::{anyhow, Result};
use std::fmt;
use std::future::Future;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{info, warn};

/// 종료를 일으킨 OS 시그널
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitSignal {
    /// SIGINT / Ctrl+C
    Interrupt,
    /// SIGTERM
    Terminate,
}

impl fmt::Display for ExitSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Interrupt => write!(f, "SIGINT"),
            Self::Terminate => write!(f, "SIGTERM"),
        }
    }
}

/// 웹 서버로 종료를 알리는 송신 측
pub struct Shutdown {
    tx: watch::Sender<bool>,
}

impl Shutdown {
    /// 송신 측과 서버에 넘길 수신기
    pub fn channel() -> (Self, watch::Receiver<bool>) {
        let (tx, rx) = watch::channel(false);
        (Self { tx }, rx)
    }

    /// 종료 알림 (수신기가 모두 사라졌어도 무시)
    pub fn trigger(&self, signal: ExitSignal) {
        info!(%signal, "종료 시그널 수신, 웹 서버 정리 시작");
        let _ = self.tx.send(true);
    }
}

/// OS 종료 시그널 대기
pub async fn wait_for_exit_signal() -> std::io::Result<ExitSignal> {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        let mut sigint = signal(SignalKind::interrupt())?;
        let mut sigterm = signal(SignalKind::terminate())?;

        let received = tokio::select! {
            _ = sigint.recv() => ExitSignal::Interrupt,
            _ = sigterm.recv() => ExitSignal::Terminate,
        };
        Ok(received)
    }

    #[cfg(not(unix))]
    {
        tokio::signal::ctrl_c().await?;
        Ok(ExitSignal::Interrupt)
    }
}

/// 서버 태스크 감독
///
/// `signal`이 먼저 끝나면 종료를 알리고 서버가 끝나길 기다린 뒤 받은 시그널을 돌려준다.
/// 서버가 먼저 끝나면 `None` (서버 에러는 그대로 전파).
pub async fn supervise<S>(
    mut server: JoinHandle<std::io::Result<()>>,
    signal: S,
    shutdown: Shutdown,
) -> Result<Option<ExitSignal>>
where
    S: Future<Output = std::io::Result<ExitSignal>>,
{
    let received = tokio::select! {
        received = signal => received?,
        joined = &mut server => {
            joined.map_err(|e| anyhow!("웹 서버 태스크 실패: {e}"))??;
            warn!("시그널 없이 웹 서버가 종료됨");
            return Ok(None);
        }
    };

    shutdown.trigger(received);
    server
        .await
        .map_err(|e| anyhow!("웹 서버 태스크 실패: {e}"))??;
    Ok(Some(received))
}

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use arc_swap::ArcSwapOption;
use async_trait::async_trait;
use clap::Parser;
use tokio::sync::Mutex;

use ice_probe::engine::{
    EngineGatheringState, GatheringEngine, GatheringEngineFactory, OnCandidateLineHdlrFn,
    OnEngineStateChangeHdlrFn,
};
use ice_probe::error::Result as EngineResult;
use ice_probe::export;
use ice_probe::session::session_config::SessionConfig;
use ice_probe::session::GatheringSession;

#[derive(Parser)]
#[command(name = "probe")]
#[command(about = "Probes which addresses ICE gathering would expose", long_about = None)]
struct Cli {
    #[arg(short, long, default_value_t = format!("stun:stun.l.google.com:19302"))]
    stun_url: String,
    #[arg(short, long, default_value_t = 15)]
    timeout_secs: u64,
    #[arg(short, long)]
    debug: bool,
}

/// Replays a canned set of engine notifications so the demo runs without
/// network access. Swap this for an adapter over a real ICE engine to
/// probe live interfaces.
#[derive(Default)]
struct ScriptedEngine {
    lines: Vec<Option<String>>,
    candidate_line_handler: ArcSwapOption<Mutex<OnCandidateLineHdlrFn>>,
    state_change_handler: ArcSwapOption<Mutex<OnEngineStateChangeHdlrFn>>,
}

#[async_trait]
impl GatheringEngine for ScriptedEngine {
    async fn create_offer(&self) -> EngineResult<String> {
        Ok("v=0".to_owned())
    }

    async fn set_local_description(&self, _offer: String) -> EngineResult<()> {
        if let Some(handler) = &*self.state_change_handler.load() {
            let mut f = handler.lock().await;
            f(EngineGatheringState::Gathering).await;
        }
        if let Some(handler) = &*self.candidate_line_handler.load() {
            let mut f = handler.lock().await;
            for line in &self.lines {
                f(line.clone()).await;
            }
        }
        Ok(())
    }

    fn on_candidate_line(&self, f: OnCandidateLineHdlrFn) {
        self.candidate_line_handler
            .store(Some(Arc::new(Mutex::new(f))));
    }

    fn on_gathering_state_change(&self, f: OnEngineStateChangeHdlrFn) {
        self.state_change_handler
            .store(Some(Arc::new(Mutex::new(f))));
    }

    async fn close(&self) -> EngineResult<()> {
        Ok(())
    }
}

struct ScriptedEngineFactory;

#[async_trait]
impl GatheringEngineFactory for ScriptedEngineFactory {
    async fn create_engine(
        &self,
        stun_url: &str,
    ) -> EngineResult<Arc<dyn GatheringEngine + Send + Sync>> {
        println!("opening scripted engine against {stun_url}");
        Ok(Arc::new(ScriptedEngine {
            lines: demo_lines(),
            ..Default::default()
        }))
    }
}

fn demo_lines() -> Vec<Option<String>> {
    vec![
        Some("candidate:842163049 1 udp 2122260223 192.168.0.2 60769 typ host".to_owned()),
        Some(
            "candidate:1019278252 1 udp 2122194687 8f3b2c1a-4f2e-4d28-a0c5-7de193f80d12.local 54321 typ host"
                .to_owned(),
        ),
        // Re-announced on a second interface policy: dropped as duplicate.
        Some("candidate:842163049 1 udp 2122260223 192.168.0.2 60769 typ host".to_owned()),
        Some(
            "candidate:1876313031 1 udp 1685987071 203.0.113.5 60000 typ srflx raddr 192.168.0.2 rport 60769"
                .to_owned(),
        ),
        Some(
            "candidate:3458654908 1 udp 41885439 198.51.100.7 3478 typ relay raddr 203.0.113.5 rport 60000"
                .to_owned(),
        ),
        None,
    ]
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.debug {
        env_logger::Builder::new()
            .filter(None, log::LevelFilter::Debug)
            .init();
    } else {
        env_logger::init();
    }

    let config = SessionConfig {
        gather_timeout: Some(Duration::from_secs(cli.timeout_secs)),
        ..Default::default()
    };
    let session = GatheringSession::new(config, Box::new(ScriptedEngineFactory));

    session.on_state_change(Box::new(|state, message| {
        Box::pin(async move {
            println!("state: {state} ({message})");
        })
    }));
    session.on_candidate_accepted(Box::new(|candidate| {
        Box::pin(async move {
            println!("  {candidate}");
        })
    }));

    session.start(&cli.stun_url).await?;

    let candidates = session.candidates().await;
    println!("\n{} distinct candidates gathered", candidates.len());
    println!("{}", export::summary(&candidates));
    println!("\n{}", export::to_json(&candidates)?);

    Ok(())
}

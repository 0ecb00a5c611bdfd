
pub mod session_config;
pub mod session_state;

use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Instant;

use arc_swap::ArcSwapOption;
use portable_atomic::AtomicU8;
use tokio::sync::{mpsc, Mutex};

use crate::candidate::{unmarshal_candidate, Candidate};
use crate::engine::{EngineGatheringState, GatheringEngine, GatheringEngineFactory};
use crate::error::{Error, Result};
use crate::store::CandidateStore;
use session_config::SessionConfig;
use session_state::SessionState;

pub type OnCandidateAcceptedHdlrFn = Box<
    dyn (FnMut(Candidate) -> Pin<Box<dyn Future<Output = ()> + Send + 'static>>) + Send + Sync,
>;

pub type OnStateChangeHdlrFn = Box<
    dyn (FnMut(SessionState, String) -> Pin<Box<dyn Future<Output = ()> + Send + 'static>>)
        + Send
        + Sync,
>;

/// GatheringSession drives one probe: it opens the engine's gathering
/// pipeline, funnels every emitted candidate line through parsing,
/// classification and dedup, and owns the lifecycle
/// Idle → Starting → Collecting → {Complete, TimedOut, Stopped, Failed}.
///
/// The engine connection is exclusively owned by the session and released
/// exactly once, at the first terminal transition. Notifications arriving
/// after that are ignored.
pub struct GatheringSession {
    config: SessionConfig,
    factory: Box<dyn GatheringEngineFactory + Send + Sync>,

    state: Arc<AtomicU8>, //SessionState
    store: Mutex<CandidateStore>,
    engine: Mutex<Option<Arc<dyn GatheringEngine + Send + Sync>>>,
    started_at: Mutex<Option<Instant>>,
    deadline: Mutex<Option<Instant>>,

    // Dropping the sender cancels the pending timeout task.
    done_tx: Mutex<Option<mpsc::Sender<()>>>,

    on_candidate_accepted_handler: Arc<ArcSwapOption<Mutex<OnCandidateAcceptedHdlrFn>>>,
    on_state_change_handler: Arc<ArcSwapOption<Mutex<OnStateChangeHdlrFn>>>,
}

impl GatheringSession {
    pub fn new(
        config: SessionConfig,
        factory: Box<dyn GatheringEngineFactory + Send + Sync>,
    ) -> Arc<Self> {
        Arc::new(GatheringSession {
            config,
            factory,
            state: Arc::new(AtomicU8::new(SessionState::Idle as u8)),
            store: Mutex::new(CandidateStore::new()),
            engine: Mutex::new(None),
            started_at: Mutex::new(None),
            deadline: Mutex::new(None),
            done_tx: Mutex::new(None),
            on_candidate_accepted_handler: Arc::new(ArcSwapOption::default()),
            on_state_change_handler: Arc::new(ArcSwapOption::default()),
        })
    }

    /// on_candidate_accepted sets an event handler which fires for every
    /// candidate that survives parsing and dedup, in acceptance order.
    pub fn on_candidate_accepted(&self, f: OnCandidateAcceptedHdlrFn) {
        self.on_candidate_accepted_handler
            .store(Some(Arc::new(Mutex::new(f))));
    }

    /// on_state_change sets an event handler which fires any time the
    /// session transitions, with a human-readable message.
    pub fn on_state_change(&self, f: OnStateChangeHdlrFn) {
        self.on_state_change_handler
            .store(Some(Arc::new(Mutex::new(f))));
    }

    /// Starts gathering against the given STUN server.
    ///
    /// Fails with [`Error::ErrMultipleStart`] unless the session is idle and
    /// with [`Error::ErrSchemeType`] (session stays idle) when the URL does
    /// not carry the configured scheme. Engine negotiation errors surface as
    /// [`Error::ErrEngineSetup`] with the session in the failed state.
    pub async fn start(self: &Arc<Self>, stun_url: &str) -> Result<()> {
        if self.state() != SessionState::Idle {
            return Err(Error::ErrMultipleStart);
        }
        if !stun_url.starts_with(self.config.url_scheme()) {
            return Err(Error::ErrSchemeType);
        }

        let now = Instant::now();
        let deadline = now + self.config.gather_timeout();
        {
            *self.started_at.lock().await = Some(now);
            *self.deadline.lock().await = Some(deadline);
        }
        self.set_state(
            SessionState::Starting,
            format!("starting gathering via {stun_url}"),
        )
        .await;

        let engine = match self.factory.create_engine(stun_url).await {
            Ok(engine) => engine,
            Err(err) => return Err(self.abort_setup(err).await),
        };
        *self.engine.lock().await = Some(Arc::clone(&engine));

        let session = Arc::clone(self);
        engine.on_candidate_line(Box::new(move |line| {
            let session = Arc::clone(&session);
            Box::pin(async move {
                session.handle_candidate_line(line).await;
            })
        }));

        let session = Arc::clone(self);
        engine.on_gathering_state_change(Box::new(move |engine_state| {
            let session = Arc::clone(&session);
            Box::pin(async move {
                session.handle_engine_state_change(engine_state).await;
            })
        }));

        let offer = match engine.create_offer().await {
            Ok(offer) => offer,
            Err(err) => return Err(self.abort_setup(err).await),
        };
        if let Err(err) = engine.set_local_description(offer).await {
            return Err(self.abort_setup(err).await);
        }

        if self.state().is_terminal() {
            // The engine finished (or the caller stopped) while the
            // negotiation was still in flight; nothing left to arm.
            return Ok(());
        }

        let (done_tx, mut done_rx) = mpsc::channel::<()>(1);
        *self.done_tx.lock().await = Some(done_tx);

        let session = Arc::clone(self);
        tokio::spawn(async move {
            tokio::select! {
                _ = tokio::time::sleep_until(tokio::time::Instant::from_std(deadline)) => {
                    session
                        .finish(
                            SessionState::TimedOut,
                            "no completion signal before the deadline",
                        )
                        .await;
                }
                _ = done_rx.recv() => {}
            }
        });

        Ok(())
    }

    /// Stops an in-flight session, retaining everything collected so far.
    /// A stop outside starting/collecting is a no-op.
    pub async fn stop(&self) {
        if !self.finish(SessionState::Stopped, "stopped by caller").await {
            log::debug!("stop() ignored, session is not gathering");
        }
    }

    /// Clears the store and returns the session to idle so it can be
    /// started again. Rejected while candidates are still being gathered.
    pub async fn reset(&self) -> Result<()> {
        let state = self.state();
        if matches!(state, SessionState::Starting | SessionState::Collecting) {
            return Err(Error::ErrResetWhenGathering);
        }

        self.store.lock().await.clear();
        *self.started_at.lock().await = None;
        *self.deadline.lock().await = None;

        if state != SessionState::Idle {
            self.set_state(SessionState::Idle, "session reset".to_owned())
                .await;
        }

        Ok(())
    }

    /// State indicates the current state of the gathering session.
    pub fn state(&self) -> SessionState {
        self.state.load(Ordering::SeqCst).into()
    }

    /// Snapshot of the accepted candidates, in arrival order.
    pub async fn candidates(&self) -> Vec<Candidate> {
        self.store.lock().await.list().to_vec()
    }

    /// Snapshot of the accepted candidates matching the predicate, in
    /// arrival order. This is the query behind UI type filters.
    pub async fn filtered_candidates<F>(&self, predicate: F) -> Vec<Candidate>
    where
        F: Fn(&Candidate) -> bool,
    {
        self.store
            .lock()
            .await
            .list()
            .iter()
            .filter(|c| predicate(c))
            .cloned()
            .collect()
    }

    pub async fn started_at(&self) -> Option<Instant> {
        *self.started_at.lock().await
    }

    pub async fn deadline(&self) -> Option<Instant> {
        *self.deadline.lock().await
    }

    async fn handle_candidate_line(&self, line: Option<String>) {
        let Some(line) = line else {
            if self.finish(SessionState::Complete, "gathering complete").await {
                log::debug!("engine signaled end of candidates");
            }
            return;
        };

        match self.state() {
            SessionState::Starting => {
                // The engine has evidently begun emitting.
                self.set_state(
                    SessionState::Collecting,
                    "engine started emitting candidates".to_owned(),
                )
                .await;
            }
            SessionState::Collecting => {}
            other => {
                log::trace!("ignoring candidate line in state {other}: {line}");
                return;
            }
        }

        let candidate = match unmarshal_candidate(&line) {
            Ok(candidate) => candidate,
            Err(err) => {
                // One malformed line must not abort the gather.
                log::warn!("skipping malformed candidate line ({err}): {line}");
                return;
            }
        };

        let accepted = self.store.lock().await.try_add(candidate.clone());
        if !accepted {
            log::debug!("dropping duplicate candidate: {candidate}");
            return;
        }

        if let Some(handler) = &*self.on_candidate_accepted_handler.load() {
            let mut f = handler.lock().await;
            f(candidate).await;
        }
    }

    async fn handle_engine_state_change(&self, engine_state: EngineGatheringState) {
        log::debug!("engine gathering state: {engine_state}");

        if engine_state == EngineGatheringState::Gathering
            && self.state() == SessionState::Starting
        {
            self.set_state(
                SessionState::Collecting,
                "engine started gathering".to_owned(),
            )
            .await;
        }
    }

    /// Moves to a terminal state if the session is still running. Exactly
    /// one of completion, timeout, stop and failure wins; the winner
    /// releases the engine.
    async fn finish(&self, to: SessionState, message: &str) -> bool {
        if !self.try_finish(to) {
            return false;
        }
        self.notify_state(to, message.to_owned()).await;
        self.release().await;
        true
    }

    fn try_finish(&self, to: SessionState) -> bool {
        loop {
            let current = SessionState::from(self.state.load(Ordering::SeqCst));
            if !matches!(
                current,
                SessionState::Starting | SessionState::Collecting
            ) {
                return false;
            }
            if self
                .state
                .compare_exchange(current as u8, to as u8, Ordering::SeqCst, Ordering::SeqCst)
                .is_ok()
            {
                return true;
            }
        }
    }

    async fn set_state(&self, to: SessionState, message: String) {
        self.state.store(to as u8, Ordering::SeqCst);
        self.notify_state(to, message).await;
    }

    async fn notify_state(&self, state: SessionState, message: String) {
        if let Some(handler) = &*self.on_state_change_handler.load() {
            let mut f = handler.lock().await;
            f(state, message).await;
        }
    }

    async fn abort_setup(&self, err: Error) -> Error {
        let err = Error::ErrEngineSetup(err.to_string());
        if self.try_finish(SessionState::Failed) {
            self.notify_state(SessionState::Failed, err.to_string()).await;
            self.release().await;
        }
        err
    }

    /// Release prunes the timeout task and closes the engine connection.
    /// The take() makes it idempotent.
    async fn release(&self) {
        self.done_tx.lock().await.take();

        let engine = self.engine.lock().await.take();
        if let Some(engine) = engine {
            if let Err(err) = engine.close().await {
                log::warn!("failed to close gathering engine: {err}");
            }
        }
    }
}

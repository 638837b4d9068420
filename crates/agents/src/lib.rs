//! Session orchestrator: remote-first chat with per-message local
//! fallback. One orchestrator per chat surface, owning the remote
//! session lifecycle end to end.

pub mod webhook;

use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use tracing::{info, instrument, warn};

use agro_core::models::{ChatReply, Language, ReplyChannel};
use agro_core::resolver;
use agro_observability::AppMetrics;
use agro_transport::DialogueTransport;

/// Default stand-in for remote latency on the local path, mirroring the
/// remote round trip so the surface feels consistent.
pub const DEFAULT_LOCAL_DELAY: Duration = Duration::from_millis(1000);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceState {
    NoSession,
    Creating,
    Active { session_id: String },
    Closing,
    Closed,
}

pub struct SessionOrchestrator<T: DialogueTransport> {
    transport: Arc<T>,
    state: Arc<Mutex<SurfaceState>>,
    metrics: Arc<AppMetrics>,
    local_delay: Duration,
    opened_at: DateTime<Utc>,
}

impl<T: DialogueTransport> SessionOrchestrator<T> {
    pub fn new(transport: Arc<T>, metrics: Arc<AppMetrics>) -> Self {
        Self {
            transport,
            state: Arc::new(Mutex::new(SurfaceState::NoSession)),
            metrics,
            local_delay: DEFAULT_LOCAL_DELAY,
            opened_at: Utc::now(),
        }
    }

    pub fn with_local_delay(mut self, delay: Duration) -> Self {
        self.local_delay = delay;
        self
    }

    pub fn state(&self) -> SurfaceState {
        self.state.lock().clone()
    }

    /// Lazy remote session creation. The `Creating` guard makes a
    /// second concurrent trigger a no-op, so at most one create happens
    /// per surface lifetime. Create failure returns the surface to
    /// `NoSession` with no automatic retry; every turn then takes the
    /// local path. The state is re-checked once the create resolves: a
    /// `close()` that raced in meanwhile wins, and the fresh remote
    /// session is deleted instead of resurrecting the surface.
    #[instrument(skip(self))]
    pub async fn open(&self) {
        {
            let mut state = self.state.lock();
            if *state != SurfaceState::NoSession {
                return;
            }
            *state = SurfaceState::Creating;
        }

        match self.transport.create_session().await {
            Ok(session_id) => {
                let still_creating = {
                    let mut state = self.state.lock();
                    if *state == SurfaceState::Creating {
                        *state = SurfaceState::Active {
                            session_id: session_id.clone(),
                        };
                        true
                    } else {
                        false
                    }
                };

                if still_creating {
                    info!(session_id = %session_id, "remote session created");
                } else {
                    warn!(session_id = %session_id, "surface closed during creation, deleting session");
                    if let Err(err) = self.transport.delete_session(&session_id).await {
                        warn!(error = %err, session_id = %session_id, "orphaned session delete failed");
                    }
                }
            }
            Err(err) => {
                warn!(error = %err, "remote session creation failed, staying local");
                let mut state = self.state.lock();
                if *state == SurfaceState::Creating {
                    *state = SurfaceState::NoSession;
                }
            }
        }
    }

    /// Answers one chat turn. While `Active` the remote channel is
    /// tried first; any transport failure answers THIS turn locally and
    /// leaves the session state untouched. Always returns non-empty
    /// localized text.
    #[instrument(skip(self, text))]
    pub async fn handle_turn(&self, text: &str, lang: Language) -> ChatReply {
        let started = Instant::now();
        self.metrics.inc_request();

        let session_id = match &*self.state.lock() {
            SurfaceState::Active { session_id } => Some(session_id.clone()),
            _ => None,
        };

        let reply = if let Some(session_id) = session_id.clone() {
            match self.transport.send_message(&session_id, text, lang).await {
                Ok(reply_text) => {
                    self.metrics.inc_remote_turn();
                    Some(ChatReply {
                        reply_text,
                        channel: ReplyChannel::Remote,
                        language: lang,
                        session_id: Some(session_id),
                    })
                }
                Err(err) => {
                    warn!(error = %err, "remote send failed, answering locally");
                    None
                }
            }
        } else {
            None
        };

        let reply = match reply {
            Some(reply) => reply,
            None => {
                self.metrics.inc_local_fallback();
                self.local_reply(text, lang, session_id).await
            }
        };

        self.metrics.observe_latency(started.elapsed());
        reply
    }

    async fn local_reply(
        &self,
        text: &str,
        lang: Language,
        session_id: Option<String>,
    ) -> ChatReply {
        tokio::time::sleep(self.local_delay).await;
        ChatReply {
            reply_text: resolver::resolve(text, lang).to_string(),
            channel: ReplyChannel::Local,
            language: lang,
            session_id,
        }
    }

    /// Teardown. Exactly one best-effort remote delete; its failure is
    /// logged and swallowed because cleanup must never surface to the
    /// user.
    #[instrument(skip(self))]
    pub async fn close(&self) {
        let session_id = {
            let mut state = self.state.lock();
            match std::mem::replace(&mut *state, SurfaceState::Closed) {
                SurfaceState::Active { session_id } => {
                    *state = SurfaceState::Closing;
                    Some(session_id)
                }
                _ => None,
            }
        };

        if let Some(session_id) = session_id {
            if let Err(err) = self.transport.delete_session(&session_id).await {
                warn!(error = %err, session_id = %session_id, "remote session delete failed");
            }
            *self.state.lock() = SurfaceState::Closed;
            info!(
                session_id = %session_id,
                surface_age_secs = (Utc::now() - self.opened_at).num_seconds(),
                "surface closed"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use agro_transport::TransportError;

    struct ScriptedTransport {
        create_fails: bool,
        create_delay: Duration,
        send_fails: bool,
        delete_fails: bool,
        creates: AtomicUsize,
        deletes: AtomicUsize,
    }

    impl ScriptedTransport {
        fn healthy() -> Self {
            Self {
                create_fails: false,
                create_delay: Duration::ZERO,
                send_fails: false,
                delete_fails: false,
                creates: AtomicUsize::new(0),
                deletes: AtomicUsize::new(0),
            }
        }
    }

    impl DialogueTransport for ScriptedTransport {
        async fn create_session(&self) -> Result<String, TransportError> {
            self.creates.fetch_add(1, Ordering::SeqCst);
            if !self.create_delay.is_zero() {
                tokio::time::sleep(self.create_delay).await;
            }
            if self.create_fails {
                return Err(TransportError::Unavailable);
            }
            Ok("session-1".to_string())
        }

        async fn send_message(
            &self,
            _session_id: &str,
            text: &str,
            _lang: Language,
        ) -> Result<String, TransportError> {
            if self.send_fails {
                return Err(TransportError::Unavailable);
            }
            Ok(format!("remote: {text}"))
        }

        async fn delete_session(&self, _session_id: &str) -> Result<(), TransportError> {
            self.deletes.fetch_add(1, Ordering::SeqCst);
            if self.delete_fails {
                return Err(TransportError::Unavailable);
            }
            Ok(())
        }
    }

    fn orchestrator(transport: ScriptedTransport) -> SessionOrchestrator<ScriptedTransport> {
        SessionOrchestrator::new(Arc::new(transport), AppMetrics::shared())
            .with_local_delay(Duration::ZERO)
    }

    #[tokio::test]
    async fn active_surface_routes_remote() {
        let orch = orchestrator(ScriptedTransport::healthy());
        orch.open().await;
        assert!(matches!(orch.state(), SurfaceState::Active { .. }));

        let reply = orch.handle_turn("hello", Language::En).await;
        assert_eq!(reply.channel, ReplyChannel::Remote);
        assert_eq!(reply.reply_text, "remote: hello");
    }

    #[tokio::test]
    async fn send_failure_falls_back_without_state_change() {
        let orch = orchestrator(ScriptedTransport {
            send_fails: true,
            ..ScriptedTransport::healthy()
        });
        orch.open().await;

        let reply = orch.handle_turn("disease in my crop", Language::En).await;
        assert_eq!(reply.channel, ReplyChannel::Local);
        assert!(!reply.reply_text.is_empty());
        // Fallback is per-message: the session stays active.
        assert!(matches!(orch.state(), SurfaceState::Active { .. }));
    }

    #[tokio::test]
    async fn create_failure_leaves_no_session_and_answers_locally() {
        let orch = orchestrator(ScriptedTransport {
            create_fails: true,
            ..ScriptedTransport::healthy()
        });
        orch.open().await;
        assert_eq!(orch.state(), SurfaceState::NoSession);

        let reply = orch.handle_turn("yield", Language::En).await;
        assert_eq!(reply.channel, ReplyChannel::Local);
        assert!(!reply.reply_text.is_empty());
    }

    #[tokio::test]
    async fn open_is_idempotent_per_surface() {
        let orch = orchestrator(ScriptedTransport::healthy());
        orch.open().await;
        orch.open().await;
        orch.open().await;

        let transport = orch.transport.clone();
        assert_eq!(transport.creates.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn close_deletes_once_and_swallows_failure() {
        let orch = orchestrator(ScriptedTransport {
            delete_fails: true,
            ..ScriptedTransport::healthy()
        });
        orch.open().await;

        orch.close().await;
        orch.close().await;

        assert_eq!(orch.state(), SurfaceState::Closed);
        assert_eq!(orch.transport.deletes.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn close_during_create_deletes_the_orphaned_session() {
        let orch = Arc::new(orchestrator(ScriptedTransport {
            create_delay: Duration::from_millis(40),
            ..ScriptedTransport::healthy()
        }));

        let open_task = tokio::spawn({
            let orch = orch.clone();
            async move { orch.open().await }
        });
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(orch.state(), SurfaceState::Creating);

        orch.close().await;
        open_task.await.unwrap();

        // The closed surface stays closed and the session created
        // mid-teardown is deleted, not adopted.
        assert_eq!(orch.state(), SurfaceState::Closed);
        assert_eq!(orch.transport.creates.load(Ordering::SeqCst), 1);
        assert_eq!(orch.transport.deletes.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn close_without_session_is_a_no_op() {
        let orch = orchestrator(ScriptedTransport {
            create_fails: true,
            ..ScriptedTransport::healthy()
        });
        orch.open().await;
        orch.close().await;

        assert_eq!(orch.state(), SurfaceState::Closed);
        assert_eq!(orch.transport.deletes.load(Ordering::SeqCst), 0);
    }
}

// Author: Dustin Pilgrim
// License: MIT

mod actions;
mod clock;
mod run;


pub use clock::Clock;

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::core::{
    action::{Action, NoticeId},
    config::{ConfigFile, RuntimeConfig},
    error::Error,
    events::{ActivityKind, Event},
    state::{Phase, State},
    watchdog::Watchdog,
    watchdog_msg::WatchdogMsg,
};
use crate::services::{
    auth::AuthProvider,
    input::{ActivitySink, ActivitySource, Subscription},
    navigate::Navigator,
    notice::NoticeSurface,
};
use crate::{sdebug, sinfo, swarn};

pub type AnyError = Box<dyn std::error::Error + Send + Sync>;

/// External collaborators the watchdog acts on.
#[derive(Clone)]
pub struct Services {
    pub auth: Arc<dyn AuthProvider>,
    pub navigator: Arc<dyn Navigator>,
    pub notices: Arc<dyn NoticeSurface>,
    pub activity: Arc<dyn ActivitySource>,
}

struct MpscActivitySink {
    tx: mpsc::Sender<WatchdogMsg>,
}

impl ActivitySink for MpscActivitySink {
    fn push(&self, kind: ActivityKind) {
        // A full queue already holds activity that resets the timers.
        let _ = self.tx.try_send(WatchdogMsg::Activity(kind));
    }
}

pub struct Daemon {
    watchdog: Watchdog,
    state: State,
    clock: Clock,

    runtime: RuntimeConfig,
    services: Services,

    // At most one listener registration and one visible notice per instance.
    subscription: Option<Subscription>,
    notice_id: Option<NoticeId>,
}

impl Daemon {
    pub fn new(cfg: ConfigFile, services: Services) -> Result<Self, Error> {
        let watchdog = Watchdog::new(cfg.watchdog)?;

        sdebug!(
            "Daemon",
            "inactivity={}ms, warning={}ms, install_on_start={}, exit_on_expiry={}",
            watchdog.config().inactivity_timeout_ms,
            watchdog.config().warning_timeout_ms,
            cfg.runtime.install_on_start,
            cfg.runtime.exit_on_expiry,
        );

        Ok(Self {
            watchdog,
            state: State::new(),
            clock: Clock::start(),
            runtime: cfg.runtime,
            services,
            subscription: None,
            notice_id: None,
        })
    }

    /// Feed one event through the core; rejected events are logged and produce nothing.
    fn handle_one_event(&mut self, event: Event) -> Vec<Action> {
        match self.watchdog.handle_event(&mut self.state, event) {
            Ok(actions) => actions,
            Err(e) => {
                swarn!("Daemon", "event rejected: {}", e);
                Vec::new()
            }
        }
    }

    /// Enter the authenticated area: subscribe to input and arm both timers.
    pub(crate) async fn install(&mut self, tx: &mpsc::Sender<WatchdogMsg>) -> Result<String, String> {
        let now_ms = self.clock.now_ms();
        let actions = self
            .watchdog
            .handle_event(&mut self.state, Event::Installed { now_ms })
            .map_err(|e| e.to_string())?;

        // Any stale registration goes away before the new one exists.
        self.subscription = None;

        let sink: Arc<dyn ActivitySink> = Arc::new(MpscActivitySink { tx: tx.clone() });
        match self.services.activity.subscribe(sink) {
            Ok(sub) => self.subscription = Some(sub),
            Err(e) => swarn!("Daemon", "activity listener unavailable ({e}); only explicit extensions reset the timers"),
        }

        self.exec_actions(actions).await;
        Ok("Session watchdog installed".to_string())
    }

    /// Leave the authenticated area: listeners, timers and warning go together.
    pub(crate) async fn uninstall(&mut self) -> Result<String, String> {
        let now_ms = self.clock.now_ms();
        let actions = self
            .watchdog
            .handle_event(&mut self.state, Event::Uninstalled { now_ms })
            .map_err(|e| e.to_string())?;

        self.subscription = None;
        self.exec_actions(actions).await;
        Ok("Session watchdog uninstalled".to_string())
    }

    pub(crate) async fn extend_session(&mut self) -> Result<String, String> {
        let now_ms = self.clock.now_ms();
        let actions = self
            .watchdog
            .handle_event(&mut self.state, Event::ExtendSession { now_ms })
            .map_err(|e| e.to_string())?;

        self.exec_actions(actions).await;
        Ok("Session extended".to_string())
    }

    async fn on_activity(&mut self, kind: ActivityKind) {
        let now_ms = self.clock.now_ms();
        let actions = self.handle_one_event(Event::UserActivity { kind, now_ms });
        self.exec_actions(actions).await;
    }

    async fn on_notice_action(&mut self, id: NoticeId, action_key: &str) {
        if self.notice_id != Some(id) {
            sdebug!("Daemon", "ignoring action '{}' on stale notice {}", action_key, id);
            return;
        }
        if action_key != crate::services::notice::STAY_ACTION_KEY {
            return;
        }
        if let Err(e) = self.extend_session().await {
            swarn!("Daemon", "stay-logged-in ignored: {}", e);
        }
    }

    async fn on_deadline(&mut self) {
        let now_ms = self.clock.now_ms();
        let actions = self.handle_one_event(Event::Tick { now_ms });
        self.exec_actions(actions).await;
    }

    /// After a forced logout has navigated away, drop the instance so a new
    /// session can install a fresh one.
    async fn teardown_if_expired(&mut self) -> bool {
        if self.state.phase() != Phase::Expired || self.state.sign_out_pending() {
            return false;
        }
        if let Err(e) = self.uninstall().await {
            swarn!("Daemon", "teardown after expiry failed: {}", e);
        }
        sinfo!("Daemon", "session ended; waiting for a new install");
        true
    }
}

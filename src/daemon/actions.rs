// Author: Dustin Pilgrim
// License: MIT

use std::collections::VecDeque;

use tokio::time::{timeout, Duration};

use crate::core::{
    action::Action,
    events::{Event, SignOutOutcome},
};
use crate::services::ServiceError;
use crate::{sinfo, serror, swarn};

use super::Daemon;

impl Daemon {
    /// Run actions in order. Sign-out is awaited so that whatever the core
    /// emits for its outcome (the redirect) runs strictly after it.
    pub(super) async fn exec_actions(&mut self, actions: Vec<Action>) {
        let mut queue: VecDeque<Action> = actions.into();

        while let Some(action) = queue.pop_front() {
            match action {
                Action::ShowWarning { notice } => {
                    match self.services.notices.show_notice(&notice).await {
                        Ok(id) => {
                            sinfo!("Daemon", "warning shown (notice {})", id);
                            self.notice_id = Some(id);
                        }
                        Err(e) => swarn!("Daemon", "failed to show warning: {}", e),
                    }
                }

                Action::DismissWarning => {
                    if let Some(id) = self.notice_id.take() {
                        if let Err(e) = self.services.notices.dismiss_notice(id).await {
                            swarn!("Daemon", "failed to dismiss notice {}: {}", id, e);
                        }
                    }
                }

                Action::SignOut => {
                    let outcome = self.sign_out().await;
                    let now_ms = self.clock.now_ms();
                    queue.extend(self.handle_one_event(Event::SignOutSettled { outcome, now_ms }));
                }

                Action::Navigate { location } => {
                    sinfo!("Daemon", "navigating to {}", location);
                    if let Err(e) = self.services.navigator.navigate(&location).await {
                        serror!("Daemon", "navigation to {} failed: {}", location, e);
                    }
                }
            }
        }
    }

    async fn sign_out(&self) -> SignOutOutcome {
        let limit = Duration::from_secs(self.runtime.sign_out_timeout_secs);

        match timeout(limit, self.services.auth.sign_out()).await {
            Ok(Ok(())) => {
                sinfo!("Daemon", "signed out");
                SignOutOutcome::Completed
            }
            Ok(Err(e)) => {
                serror!("Daemon", "Error signing out: {}", e);
                SignOutOutcome::Failed { reason: e.to_string() }
            }
            Err(_) => {
                serror!("Daemon", "sign-out timed out after {}s", limit.as_secs());
                SignOutOutcome::Failed { reason: ServiceError::Timeout.to_string() }
            }
        }
    }
}

// Author: Dustin Pilgrim
// License: MIT

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};

use futures::{future::BoxFuture, StreamExt};
use tokio::sync::mpsc;
use zbus::{Connection, Proxy};
use zvariant::Value;

use crate::core::{
    action::{Notice, NoticeId},
    watchdog_msg::WatchdogMsg,
};
use crate::{sdebug, sinfo, swarn};

use super::ServiceError;

/// Action key of the "stay logged in" button.
pub const STAY_ACTION_KEY: &str = "stay";

/// Where the expiry warning is rendered.
pub trait NoticeSurface: Send + Sync + 'static {
    fn show_notice<'a>(&'a self, notice: &'a Notice) -> BoxFuture<'a, Result<NoticeId, ServiceError>>;
    fn dismiss_notice(&self, id: NoticeId) -> BoxFuture<'_, Result<(), ServiceError>>;
}

/// `org.freedesktop.Notifications` on the session bus.
///
/// Button presses come back as `ActionInvoked` signals and are forwarded to
/// the daemon as `WatchdogMsg::NoticeAction`; the daemon decides whether the
/// id still belongs to the visible warning.
pub struct DesktopNotices {
    proxy: Proxy<'static>,
    app_name: String,
}

impl DesktopNotices {
    pub async fn connect(
        app_name: impl Into<String>,
        tx: mpsc::Sender<WatchdogMsg>,
    ) -> Result<Self, ServiceError> {
        let conn = Connection::session().await?;

        let proxy = Proxy::new(
            &conn,
            "org.freedesktop.Notifications",
            "/org/freedesktop/Notifications",
            "org.freedesktop.Notifications",
        )
        .await?;

        let mut stream = proxy.receive_signal("ActionInvoked").await?;
        tokio::spawn(async move {
            while let Some(sig) = stream.next().await {
                let (id, action_key): (u32, String) = match sig.body().deserialize() {
                    Ok(v) => v,
                    Err(_) => continue,
                };
                sdebug!("Notice", "action '{}' invoked on notice {}", action_key, id);
                if tx
                    .send(WatchdogMsg::NoticeAction { id: NoticeId(id), action_key })
                    .await
                    .is_err()
                {
                    break;
                }
            }
            swarn!("Notice", "action listener stopped");
        });

        sinfo!("Notice", "connected to org.freedesktop.Notifications");

        Ok(Self {
            proxy,
            app_name: app_name.into(),
        })
    }
}

impl NoticeSurface for DesktopNotices {
    fn show_notice<'a>(&'a self, notice: &'a Notice) -> BoxFuture<'a, Result<NoticeId, ServiceError>> {
        Box::pin(async move {
            let actions = vec![STAY_ACTION_KEY, notice.action_label.as_str()];

            let mut hints: HashMap<&str, Value<'_>> = HashMap::new();
            hints.insert("urgency", Value::from(2u8));

            let expire_timeout = i32::try_from(notice.timeout_ms).unwrap_or(i32::MAX);

            let id: u32 = self
                .proxy
                .call(
                    "Notify",
                    &(
                        self.app_name.as_str(),
                        0u32,
                        "dialog-warning",
                        notice.title.as_str(),
                        notice.body.as_str(),
                        actions,
                        hints,
                        expire_timeout,
                    ),
                )
                .await?;

            Ok(NoticeId(id))
        })
    }

    fn dismiss_notice(&self, id: NoticeId) -> BoxFuture<'_, Result<(), ServiceError>> {
        Box::pin(async move {
            let () = self.proxy.call("CloseNotification", &(id.0,)).await?;
            Ok(())
        })
    }
}

/// Fallback when no notification daemon is reachable: the warning only
/// reaches the log, and `vigil extend` is the way to stay logged in.
#[derive(Debug, Default)]
pub struct LogNotices {
    next_id: AtomicU32,
}

impl NoticeSurface for LogNotices {
    fn show_notice<'a>(&'a self, notice: &'a Notice) -> BoxFuture<'a, Result<NoticeId, ServiceError>> {
        Box::pin(async move {
            let id = NoticeId(self.next_id.fetch_add(1, Ordering::Relaxed) + 1);
            swarn!("Notice", "{}: {} (run `vigil extend` to stay logged in)", notice.title, notice.body);
            Ok(id)
        })
    }

    fn dismiss_notice(&self, id: NoticeId) -> BoxFuture<'_, Result<(), ServiceError>> {
        Box::pin(async move {
            sdebug!("Notice", "dismissed notice {}", id);
            Ok(())
        })
    }
}

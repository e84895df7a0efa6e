// Author: Dustin Pilgrim
// License: MIT

use tokio::sync::oneshot;

use crate::core::{
    action::NoticeId,
    events::ActivityKind,
    info::InfoSnapshot,
};

pub type Reply = oneshot::Sender<Result<String, String>>;

#[derive(Debug)]
pub enum WatchdogMsg {
    /// Raw input from an activity source; stamped by the daemon on receipt.
    Activity(ActivityKind),

    /// An action button on a shown notice was pressed.
    NoticeAction {
        id: NoticeId,
        action_key: String,
    },

    Install { reply: Reply },

    Uninstall { reply: Reply },

    Extend { reply: Reply },

    GetInfo { reply: oneshot::Sender<InfoSnapshot> },

    Stop { reply: Reply },
}

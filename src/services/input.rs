// Author: Dustin Pilgrim
// License: MIT

use std::fs::{File, OpenOptions};
use std::os::fd::{AsRawFd, OwnedFd};
use std::os::unix::fs::OpenOptionsExt;
use std::path::Path;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use std::time::{Duration, Instant};

use input::event::keyboard::{KeyState, KeyboardEvent, KeyboardEventTrait};
use input::event::pointer::{ButtonState, PointerEvent};
use input::event::touch::TouchEvent;
use input::{Event as InputEvent, Libinput, LibinputInterface};
use libc::{O_ACCMODE, O_RDONLY, O_RDWR, O_WRONLY};

use crate::core::events::ActivityKind;
use crate::{sdebug, serror, sinfo};

use super::ServiceError;

const POLL_TIMEOUT_MS: i32 = 250;
const MOTION_THROTTLE: Duration = Duration::from_millis(500);

/// Receiver side of an activity source.
pub trait ActivitySink: Send + Sync + 'static {
    fn push(&self, kind: ActivityKind);
}

/// The global input surface. Each `subscribe` registers one listener; the
/// listener lives exactly as long as the returned `Subscription`.
pub trait ActivitySource: Send + Sync + 'static {
    fn subscribe(&self, sink: Arc<dyn ActivitySink>) -> Result<Subscription, ServiceError>;
}

/// Registration handle. Dropping it stops delivery.
#[derive(Debug)]
pub struct Subscription {
    active: Arc<AtomicBool>,
}

impl Subscription {
    /// A live subscription plus the flag its source must check before delivering.
    pub fn open() -> (Self, Arc<AtomicBool>) {
        let active = Arc::new(AtomicBool::new(true));
        (Self { active: Arc::clone(&active) }, active)
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.active.store(false, Ordering::SeqCst);
    }
}

// ---------------- libinput ----------------

struct Interface;

impl LibinputInterface for Interface {
    fn open_restricted(&mut self, path: &Path, flags: i32) -> Result<OwnedFd, i32> {
        let mode = flags & O_ACCMODE;
        OpenOptions::new()
            .custom_flags(flags)
            .read(mode == O_RDONLY || mode == O_RDWR)
            .write(mode == O_WRONLY || mode == O_RDWR)
            .open(path)
            .map(|file| file.into())
            .map_err(|err| err.raw_os_error().unwrap_or(libc::EIO))
    }

    fn close_restricted(&mut self, fd: OwnedFd) {
        drop(File::from(fd));
    }
}

/// Reads pointer, keyboard and touch input for a seat through libinput.
/// Needs read access to `/dev/input/event*` (usually the `input` group).
#[derive(Debug, Clone)]
pub struct LibinputSource {
    seat: String,
}

impl LibinputSource {
    pub fn new(seat: impl Into<String>) -> Self {
        Self { seat: seat.into() }
    }
}

impl ActivitySource for LibinputSource {
    fn subscribe(&self, sink: Arc<dyn ActivitySink>) -> Result<Subscription, ServiceError> {
        let (subscription, active) = Subscription::open();
        let seat = self.seat.clone();

        // libinput contexts are not Send; the whole context lives on this thread.
        let (ready_tx, ready_rx) = std::sync::mpsc::channel::<Result<(), ServiceError>>();

        std::thread::Builder::new()
            .name("vigil-input".to_string())
            .spawn(move || {
                let mut li = Libinput::new_with_udev(Interface);
                if li.udev_assign_seat(&seat).is_err() {
                    let _ = ready_tx.send(Err(ServiceError::Input(format!(
                        "failed to assign seat '{seat}'"
                    ))));
                    return;
                }
                let _ = ready_tx.send(Ok(()));
                sinfo!("Input", "listening on {}", seat);

                run_input_loop(&mut li, sink.as_ref(), &active);

                sdebug!("Input", "listener on {} stopped", seat);
            })
            .map_err(|e| ServiceError::Input(format!("spawn input thread: {e}")))?;

        match ready_rx.recv() {
            Ok(Ok(())) => Ok(subscription),
            Ok(Err(e)) => Err(e),
            Err(_) => Err(ServiceError::Input("input thread exited early".to_string())),
        }
    }
}

fn run_input_loop(li: &mut Libinput, sink: &dyn ActivitySink, active: &AtomicBool) {
    let mut last_motion: Option<Instant> = None;

    while active.load(Ordering::SeqCst) {
        let mut pfd = libc::pollfd {
            fd: li.as_raw_fd(),
            events: libc::POLLIN,
            revents: 0,
        };

        // SAFETY: pfd is a valid, initialized pollfd and nfds is 1.
        let rc = unsafe { libc::poll(&mut pfd, 1, POLL_TIMEOUT_MS) };
        if rc < 0 {
            let err = std::io::Error::last_os_error();
            if err.kind() == std::io::ErrorKind::Interrupted {
                continue;
            }
            serror!("Input", "poll failed: {}", err);
            break;
        }
        if rc == 0 {
            continue;
        }

        if let Err(e) = li.dispatch() {
            serror!("Input", "dispatch failed: {}", e);
            break;
        }

        for event in &mut *li {
            if !active.load(Ordering::SeqCst) {
                return;
            }

            let Some(kind) = classify(&event) else {
                continue;
            };

            if kind == ActivityKind::PointerMove {
                let now = Instant::now();
                if last_motion.is_some_and(|t| now.duration_since(t) < MOTION_THROTTLE) {
                    continue;
                }
                last_motion = Some(now);
            }

            sink.push(kind);
        }
    }
}

/// Map raw libinput events onto the four activity kinds; everything else
/// (releases, device hotplug, gestures, switches) is not user presence.
fn classify(event: &InputEvent) -> Option<ActivityKind> {
    match event {
        InputEvent::Pointer(PointerEvent::Motion(_))
        | InputEvent::Pointer(PointerEvent::MotionAbsolute(_)) => Some(ActivityKind::PointerMove),
        InputEvent::Pointer(PointerEvent::Button(b)) if b.button_state() == ButtonState::Pressed => {
            Some(ActivityKind::PointerDown)
        }
        InputEvent::Keyboard(KeyboardEvent::Key(k)) if k.key_state() == KeyState::Pressed => {
            Some(ActivityKind::KeyDown)
        }
        InputEvent::Touch(TouchEvent::Down(_)) => Some(ActivityKind::TouchStart),
        _ => None,
    }
}

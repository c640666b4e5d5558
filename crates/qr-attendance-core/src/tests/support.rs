//! Test doubles shared by the core test modules.
#![allow(clippy::unwrap_used)]

use crate::{
    ApiClient, CameraDevice, Clock, CoreResult, GrayFrame, QrDecoder, ScanError, StreamRequest,
    TrackCapabilities, TrackConstraints, TrackSettings, VideoStream,
};

use std::{
    future::Future,
    panic::Location,
    sync::{
        Arc, Mutex,
        atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering},
    },
    thread::{self, ThreadId},
    time::Duration,
};

use axum::Router;
use chrono::{DateTime, TimeZone, Utc};
use error_location::ErrorLocation;
use qrcode::{Color, QrCode};

/// Counters shared between a [`FakeCamera`] and the test body.
#[derive(Debug, Clone, Default)]
pub(crate) struct CameraCalls {
    pub(crate) opens: Arc<AtomicUsize>,
    pub(crate) stops: Arc<AtomicUsize>,
    pub(crate) applies: Arc<AtomicUsize>,
    pub(crate) grabs: Arc<AtomicUsize>,
    pub(crate) deny: Arc<AtomicBool>,
    pub(crate) requests: Arc<Mutex<Vec<StreamRequest>>>,
}

impl CameraCalls {
    pub(crate) fn count(counter: &AtomicUsize) -> usize {
        counter.load(Ordering::SeqCst)
    }
}

/// In-memory camera that serves a fixed frame.
pub(crate) struct FakeCamera {
    calls: CameraCalls,
    torch_capable: bool,
}

impl FakeCamera {
    pub(crate) fn new(torch_capable: bool) -> (Self, CameraCalls) {
        let calls = CameraCalls::default();
        (
            Self {
                calls: calls.clone(),
                torch_capable,
            },
            calls,
        )
    }
}

impl CameraDevice for FakeCamera {
    fn open(&mut self, request: StreamRequest) -> CoreResult<Box<dyn VideoStream>> {
        self.calls.requests.lock().unwrap().push(request);

        if self.calls.deny.load(Ordering::SeqCst) {
            return Err(ScanError::CameraAccess {
                reason: "Permission denied".to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        self.calls.opens.fetch_add(1, Ordering::SeqCst);

        Ok(Box::new(FakeStream {
            calls: self.calls.clone(),
            torch_capable: self.torch_capable,
            torch: false,
        }))
    }
}

struct FakeStream {
    calls: CameraCalls,
    torch_capable: bool,
    torch: bool,
}

impl VideoStream for FakeStream {
    fn capabilities(&self) -> TrackCapabilities {
        TrackCapabilities {
            torch: self.torch_capable,
        }
    }

    fn settings(&self) -> TrackSettings {
        TrackSettings {
            torch: self.torch,
            width: 1,
            height: 1,
        }
    }

    fn apply_constraints(&mut self, constraints: TrackConstraints) -> CoreResult<()> {
        self.calls.applies.fetch_add(1, Ordering::SeqCst);
        if let Some(torch) = constraints.torch {
            self.torch = torch;
        }
        Ok(())
    }

    fn grab_frame(&mut self) -> CoreResult<GrayFrame> {
        self.calls.grabs.fetch_add(1, Ordering::SeqCst);
        GrayFrame::new(1, 1, vec![u8::MAX])
    }

    fn stop_tracks(&mut self) {
        self.calls.stops.fetch_add(1, Ordering::SeqCst);
    }
}

/// Outcome a [`ScriptedDecoder`] returns for one call.
#[derive(Debug, Clone)]
pub(crate) enum Scripted {
    Nothing,
    Payload(&'static str),
    Fail,
}

/// Decoder that replays a script; the last entry repeats forever.
#[derive(Debug, Clone)]
pub(crate) struct ScriptedDecoder {
    script: Arc<Vec<Scripted>>,
    pub(crate) calls: Arc<AtomicUsize>,
    /// Thread each call ran on.
    pub(crate) threads: Arc<Mutex<Vec<ThreadId>>>,
}

impl ScriptedDecoder {
    pub(crate) fn new(script: Vec<Scripted>) -> Self {
        Self {
            script: Arc::new(script),
            calls: Arc::new(AtomicUsize::new(0)),
            threads: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

impl QrDecoder for ScriptedDecoder {
    fn decode(&self, _frame: &GrayFrame) -> CoreResult<Option<String>> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        self.threads.lock().unwrap().push(thread::current().id());
        let step = self
            .script
            .get(call)
            .or_else(|| self.script.last())
            .cloned()
            .unwrap_or(Scripted::Nothing);

        match step {
            Scripted::Nothing => Ok(None),
            Scripted::Payload(text) => Ok(Some(text.to_string())),
            Scripted::Fail => Err(ScanError::Decode {
                reason: "corrupt frame".to_string(),
                location: ErrorLocation::from(Location::caller()),
            }),
        }
    }
}

/// Clock whose sleeps only yield to the scheduler.
#[derive(Debug, Clone, Default)]
pub(crate) struct YieldClock {
    pub(crate) sleeps: Arc<AtomicUsize>,
    /// Duration of the latest sleep in milliseconds.
    pub(crate) last_sleep_ms: Arc<AtomicU64>,
}

impl YieldClock {
    pub(crate) fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 9, 30, 0).unwrap()
    }
}

impl Clock for YieldClock {
    fn sleep(&self, duration: Duration) -> impl Future<Output = ()> + Send {
        self.sleeps.fetch_add(1, Ordering::SeqCst);
        self.last_sleep_ms
            .store(duration.as_millis() as u64, Ordering::SeqCst);
        tokio::task::yield_now()
    }

    fn now(&self) -> DateTime<Utc> {
        Self::fixed_now()
    }
}

/// Render `payload` as a QR code with a quiet zone.
pub(crate) fn qr_frame(payload: &str) -> GrayFrame {
    const SCALE: usize = 6;
    const QUIET_ZONE: usize = 4;

    let code = QrCode::new(payload.as_bytes()).unwrap();
    let modules = code.width();
    let colors = code.to_colors();
    let size = (modules + 2 * QUIET_ZONE) * SCALE;
    let mut pixels = vec![u8::MAX; size * size];

    for my in 0..modules {
        for mx in 0..modules {
            if colors[my * modules + mx] != Color::Dark {
                continue;
            }
            for dy in 0..SCALE {
                for dx in 0..SCALE {
                    let x = (mx + QUIET_ZONE) * SCALE + dx;
                    let y = (my + QUIET_ZONE) * SCALE + dy;
                    pixels[y * size + x] = 0;
                }
            }
        }
    }

    GrayFrame::new(size as u32, size as u32, pixels).unwrap()
}

/// Serve `router` on an ephemeral port and return its `/api` base URL.
pub(crate) async fn spawn_backend(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });

    format!("http://{}/api", addr)
}

/// API client for a local test backend, bypassing any proxy settings.
pub(crate) fn local_client(base_url: &str) -> ApiClient {
    let client = reqwest::Client::builder()
        .no_proxy()
        .timeout(Duration::from_secs(5))
        .build()
        .unwrap();
    ApiClient::from_client(client, base_url)
}

/// A scratch directory under the system temp dir.
pub(crate) fn scratch_dir(label: &str) -> std::path::PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "qr-attendance-{}-{}",
        label,
        uuid::Uuid::new_v4()
    ));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

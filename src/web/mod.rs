mod assets;

use std::{
    convert::Infallible,
    net::SocketAddr,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    time::Duration,
};

use anyhow::{Context, Result};
use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{
        sse::{Event, KeepAlive, Sse},
        IntoResponse, Response,
    },
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use tokio::{
    net::TcpListener,
    sync::broadcast,
    time::{self, Instant, MissedTickBehavior},
};
use tokio_stream::{wrappers::BroadcastStream, Stream, StreamExt};
use tracing::{error, info, warn};

use crate::{
    command::Command, events::GameEvent, scenario::Scenario, session::Session,
    state::StateSnapshot,
};

#[derive(Clone)]
struct AppState {
    session: Arc<Mutex<Session>>,
    broadcaster: broadcast::Sender<String>,
}

impl AppState {
    fn session(&self) -> MutexGuard<'_, Session> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn publish(&self, events: &[GameEvent]) {
        for event in events {
            match serde_json::to_string(event) {
                // No subscribers is fine; the event is simply dropped.
                Ok(payload) => {
                    let _ = self.broadcaster.send(payload);
                }
                Err(err) => warn!(%err, "event.serialize_failed"),
            }
        }
    }
}

pub struct WebServerConfig {
    pub scenario: Scenario,
    pub host: String,
    pub port: u16,
    /// Real-time interval between clock advances.
    pub frame_ms: u64,
}

pub async fn run(config: WebServerConfig) -> Result<()> {
    let WebServerConfig {
        scenario,
        host,
        port,
        frame_ms,
    } = config;

    let scenario_name = scenario.name.clone();
    let session = Session::new(scenario)
        .with_context(|| format!("Cannot start scenario '{scenario_name}'"))?;
    let (tx, _) = broadcast::channel::<String>(512);
    let state = AppState {
        session: Arc::new(Mutex::new(session)),
        broadcaster: tx,
    };

    tokio::spawn(drive_clock(state.clone(), frame_ms.max(1)));

    let router = Router::new()
        .route("/", get(index))
        .route("/:file", get(static_file))
        .route("/api/state", get(current_state))
        .route("/api/commands", post(submit_command))
        .route("/api/events", get(stream_events))
        .with_state(state);

    let addr: SocketAddr = format!("{host}:{port}")
        .parse()
        .with_context(|| format!("Invalid listen address {host}:{port}"))?;
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    info!(scenario = %scenario_name, %addr, "web.listening");
    println!("Endless Winter live at http://{addr} (Ctrl+C to stop)");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Feeds wall-clock time into the session and fans its events out to SSE
/// subscribers. A failed advance is logged and the next frame tries again.
async fn drive_clock(state: AppState, frame_ms: u64) {
    let started = Instant::now();
    let mut ticker = time::interval(Duration::from_millis(frame_ms));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        ticker.tick().await;
        let now_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
        let result = state.session().advance_to(now_ms);
        match result {
            Ok(events) => state.publish(&events),
            Err(err) => error!(error = ?err, now_ms, "session.advance_failed"),
        }
    }
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    info!("web.shutdown");
}

async fn index() -> Response {
    serve_asset("")
}

async fn static_file(Path(file): Path<String>) -> Response {
    serve_asset(&file)
}

fn serve_asset(path: &str) -> Response {
    match assets::lookup(path) {
        Some(asset) => ([(header::CONTENT_TYPE, asset.content_type)], asset.body).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn current_state(State(state): State<AppState>) -> Json<StateSnapshot> {
    Json(state.session().snapshot())
}

#[derive(Serialize)]
struct Rejection {
    error: String,
}

async fn submit_command(
    State(state): State<AppState>,
    Json(command): Json<Command>,
) -> Result<Json<StateSnapshot>, (StatusCode, Json<Rejection>)> {
    let (outcome, snapshot) = {
        let mut session = state.session();
        let outcome = session.apply(command);
        (outcome, session.snapshot())
    };

    match outcome {
        Ok(events) => {
            state.publish(&events);
            Ok(Json(snapshot))
        }
        // The session queues the rejection event for the next clock frame.
        Err(err) => Err((
            StatusCode::CONFLICT,
            Json(Rejection {
                error: err.to_string(),
            }),
        )),
    }
}

async fn stream_events(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = state.broadcaster.subscribe();
    let stream = BroadcastStream::new(rx).filter_map(|msg| match msg {
        Ok(payload) => Some(Ok(Event::default().data(payload))),
        Err(_) => None,
    });
    Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(2))
            .text("keep-alive"),
    )
}

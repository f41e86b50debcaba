//! JSON-lines host session.
//!
//! One request per input line, one message per output line. Engine queries
//! run on tasks owned by a [`JoinSet`]; their results are applied on the
//! session loop, so every surface mutation happens in one place and in order.
//! A query task that panics still settles its ticket with an error.

use crate::bridge::{resolve_source_root, EngineBridge, TokioProcessRunner};
use crate::core::{
    AnalysisResult, BridgeError, BridgeResult, EngineCommand, EngineProcess, HostUi,
    NavigationIntent,
};
use crate::host::{missing_symbol_hint, progress_title, surface_title, symbol_at};
use crate::render::{RenderCommand, RenderSettings, UiEvent};
use crate::surface::{ApplyOutcome, RequestTicket, SurfaceId, SurfaceRegistry};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

pub const DEFAULT_SURFACE: &str = "main";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum SessionRequest {
    Query {
        #[serde(default)]
        surface: Option<SurfaceId>,
        command: EngineCommand,
        #[serde(default)]
        target: Option<String>,
        #[serde(default)]
        depth: Option<u32>,
    },
    /// Query the symbol under the cursor in `line`.
    QueryAtCursor {
        #[serde(default)]
        surface: Option<SurfaceId>,
        command: EngineCommand,
        line: String,
        column: usize,
        #[serde(default)]
        depth: Option<u32>,
    },
    Event {
        #[serde(default)]
        surface: Option<SurfaceId>,
        event: UiEvent,
    },
    Close {
        surface: SurfaceId,
    },
    Shutdown,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum SessionMessage {
    Progress {
        surface: SurfaceId,
        title: String,
    },
    Render {
        surface: SurfaceId,
        commands: Vec<RenderCommand>,
    },
    Error {
        surface: Option<SurfaceId>,
        message: String,
    },
    Navigate(NavigationIntent),
}

/// [`HostUi`] that queues messages for the session to write out as JSON lines.
#[derive(Debug, Default)]
pub struct JsonLinesHost {
    outbox: Vec<SessionMessage>,
}

impl JsonLinesHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn render(&mut self, surface: &SurfaceId, commands: Vec<RenderCommand>) {
        let mut drawn = Vec::with_capacity(commands.len());
        for command in commands {
            match command {
                RenderCommand::Navigate(intent) => self.open_location(&intent),
                other => drawn.push(other),
            }
        }
        if !drawn.is_empty() {
            self.outbox.push(SessionMessage::Render {
                surface: surface.clone(),
                commands: drawn,
            });
        }
    }

    pub fn session_error(&mut self, message: impl Into<String>) {
        self.outbox.push(SessionMessage::Error {
            surface: None,
            message: message.into(),
        });
    }

    pub fn messages(&self) -> &[SessionMessage] {
        &self.outbox
    }

    pub fn take_messages(&mut self) -> Vec<SessionMessage> {
        std::mem::take(&mut self.outbox)
    }

    /// Write and clear queued messages.
    pub async fn flush_to<W>(&mut self, output: &mut W) -> BridgeResult<()>
    where
        W: AsyncWrite + Unpin,
    {
        if self.outbox.is_empty() {
            return Ok(());
        }

        let mut buffer = Vec::new();
        for message in self.take_messages() {
            serde_json::to_writer(&mut buffer, &message)
                .map_err(|e| BridgeError::encode("session message", e))?;
            buffer.push(b'\n');
        }
        output
            .write_all(&buffer)
            .await
            .map_err(|e| BridgeError::io("writing session output", e))?;
        output
            .flush()
            .await
            .map_err(|e| BridgeError::io("flushing session output", e))
    }
}

impl HostUi for JsonLinesHost {
    fn show_progress(&mut self, surface: &str, title: &str) {
        self.outbox.push(SessionMessage::Progress {
            surface: SurfaceId::from(surface),
            title: title.to_string(),
        });
    }

    fn show_error(&mut self, surface: &str, message: &str) {
        self.outbox.push(SessionMessage::Error {
            surface: Some(SurfaceId::from(surface)),
            message: message.to_string(),
        });
    }

    fn open_location(&mut self, intent: &NavigationIntent) {
        self.outbox.push(SessionMessage::Navigate(intent.clone()));
    }
}

type Completion = (RequestTicket, BridgeResult<AnalysisResult>);

enum Step {
    Continue,
    Shutdown,
}

pub struct Session<P: EngineProcess + 'static = TokioProcessRunner> {
    bridge: Arc<EngineBridge<P>>,
    registry: SurfaceRegistry,
    project_base: PathBuf,
}

impl<P: EngineProcess + 'static> Session<P> {
    pub fn new(bridge: EngineBridge<P>, project_base: impl Into<PathBuf>, defaults: RenderSettings) -> Self {
        Self {
            bridge: Arc::new(bridge),
            registry: SurfaceRegistry::with_defaults(defaults),
            project_base: project_base.into(),
        }
    }

    pub fn registry(&self) -> &SurfaceRegistry {
        &self.registry
    }

    /// Serve requests from `input` until it closes (after in-flight queries
    /// settle) or a shutdown request arrives.
    pub async fn run<R, W>(&mut self, input: R, mut output: W) -> BridgeResult<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut tasks: JoinSet<Completion> = JoinSet::new();
        let mut host = JsonLinesHost::new();
        let mut lines = input.lines();
        let mut reading = true;

        info!("Session started for {}", self.project_base.display());

        while reading || !tasks.is_empty() {
            tokio::select! {
                line = lines.next_line(), if reading => {
                    let line = line.map_err(|e| BridgeError::io("reading session input", e))?;
                    match line {
                        Some(line) => match self.handle_line(&line, &mut host, &mut tasks) {
                            Step::Continue => {}
                            Step::Shutdown => {
                                info!("Shutdown requested");
                                break;
                            }
                        },
                        None => {
                            debug!("Session input closed, {} queries in flight", tasks.len());
                            reading = false;
                        }
                    }
                }
                Some(joined) = tasks.join_next(), if !tasks.is_empty() => match joined {
                    Ok((ticket, result)) => self.apply(&ticket, result, &mut host),
                    Err(e) => {
                        warn!("Query task ended abnormally: {}", e);
                        let err = BridgeError::QueryTask(e.to_string());
                        host.session_error(user_message(&err));
                    }
                },
                else => break,
            }
            host.flush_to(&mut output).await?;
        }

        host.flush_to(&mut output).await
    }

    fn handle_line(
        &mut self,
        line: &str,
        host: &mut JsonLinesHost,
        tasks: &mut JoinSet<Completion>,
    ) -> Step {
        let line = line.trim();
        if line.is_empty() {
            return Step::Continue;
        }

        let request: SessionRequest = match serde_json::from_str(line) {
            Ok(request) => request,
            Err(e) => {
                warn!("Ignoring malformed session request: {}", e);
                host.session_error(format!("Malformed request: {e}"));
                return Step::Continue;
            }
        };

        match request {
            SessionRequest::Query {
                surface,
                command,
                target,
                depth,
            } => self.submit(surface_or_default(surface), command, target, depth, host, tasks),
            SessionRequest::QueryAtCursor {
                surface,
                command,
                line,
                column,
                depth,
            } => {
                let surface = surface_or_default(surface);
                match symbol_at(&line, column) {
                    Some(symbol) => {
                        let symbol = symbol.to_string();
                        self.submit(surface, command, Some(symbol), depth, host, tasks)
                    }
                    None => {
                        host.show_error(surface.as_str(), missing_symbol_hint(command));
                        Step::Continue
                    }
                }
            }
            SessionRequest::Event { surface, event } => {
                let surface = surface_or_default(surface);
                match self.registry.handle_event(&surface, event) {
                    Some(commands) => host.render(&surface, commands),
                    None => host.show_error(surface.as_str(), "No graph is open on this surface."),
                }
                Step::Continue
            }
            SessionRequest::Close { surface } => {
                self.registry.close(&surface);
                Step::Continue
            }
            SessionRequest::Shutdown => Step::Shutdown,
        }
    }

    /// Issue a query for `surface` and run it on its own task.
    fn submit(
        &mut self,
        surface: SurfaceId,
        command: EngineCommand,
        target: Option<String>,
        depth: Option<u32>,
        host: &mut JsonLinesHost,
        tasks: &mut JoinSet<Completion>,
    ) -> Step {
        let ticket = self
            .registry
            .begin_request(surface.clone(), surface_title(command, target.as_deref()));
        host.show_progress(surface.as_str(), &progress_title(command, target.as_deref()));

        let bridge = Arc::clone(&self.bridge);
        let base = self.project_base.clone();
        tasks.spawn(async move {
            let query = tokio::spawn(async move {
                match resolve_source_root(&base) {
                    Ok(root) => bridge.execute(command, &root, target.as_deref(), depth).await,
                    Err(e) => Err(e),
                }
            });
            // the inner task isolates panics so the ticket always settles
            let result = match query.await {
                Ok(result) => result,
                Err(e) => {
                    warn!("Query for {} panicked: {}", ticket.surface, e);
                    Err(BridgeError::QueryTask(e.to_string()))
                }
            };
            (ticket, result)
        });

        Step::Continue
    }

    fn apply(&mut self, ticket: &RequestTicket, result: BridgeResult<AnalysisResult>, host: &mut JsonLinesHost) {
        match self.registry.complete(ticket, result) {
            ApplyOutcome::Applied(commands) => host.render(&ticket.surface, commands),
            ApplyOutcome::Stale => {}
            ApplyOutcome::Failed(err) => host.show_error(ticket.surface.as_str(), &user_message(&err)),
        }
    }
}

fn surface_or_default(surface: Option<SurfaceId>) -> SurfaceId {
    surface.unwrap_or_else(|| SurfaceId::from(DEFAULT_SURFACE))
}

/// Error text as shown to the user, remediation last.
pub fn user_message(err: &BridgeError) -> String {
    match err {
        // the hint is already part of the message
        BridgeError::EngineNotFound { .. } => format!("CodeMap Error: {err}"),
        _ => match err.remediation() {
            Some(hint) => format!("CodeMap Error: {err}. {hint}"),
            None => format!("CodeMap Error: {err}"),
        },
    }
}

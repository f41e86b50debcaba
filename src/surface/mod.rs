//! Ownership map from surface identifier to its render state.
//!
//! Each query for a surface is issued with a generation token; only the
//! result of the most recently issued query is ever applied. Results of
//! superseded queries are dropped whenever they arrive. Generations are drawn
//! from one registry-wide counter, so a surface that is closed and reopened
//! never reissues a generation an old result still carries.

use crate::core::{AnalysisResult, BridgeError};
use crate::render::{RenderCommand, RenderEngine, RenderSettings, UiEvent};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SurfaceId(String);

impl SurfaceId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SurfaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SurfaceId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for SurfaceId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Handed out when a query is issued; must be presented to apply its result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestTicket {
    pub surface: SurfaceId,
    pub generation: u64,
}

#[derive(Debug)]
pub enum ApplyOutcome {
    Applied(Vec<RenderCommand>),
    /// A newer query was issued after this one; nothing changed.
    Stale,
    /// The query failed. The last good graph stays on screen.
    Failed(BridgeError),
}

#[derive(Debug)]
pub struct Surface {
    title: String,
    engine: RenderEngine,
    issued: u64,
    settled: u64,
    last_error: Option<String>,
}

impl Surface {
    fn new(title: String, settings: RenderSettings) -> Self {
        Self {
            title,
            engine: RenderEngine::with_settings(settings),
            issued: 0,
            settled: 0,
            last_error: None,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn engine(&self) -> &RenderEngine {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut RenderEngine {
        &mut self.engine
    }

    /// Generation of the most recently issued query.
    pub fn generation(&self) -> u64 {
        self.issued
    }

    pub fn is_pending(&self) -> bool {
        self.issued > self.settled
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }
}

#[derive(Debug, Default)]
pub struct SurfaceRegistry {
    surfaces: HashMap<SurfaceId, Surface>,
    defaults: RenderSettings,
    next_generation: u64,
}

impl SurfaceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry whose new surfaces start with `defaults`.
    pub fn with_defaults(defaults: RenderSettings) -> Self {
        Self {
            defaults,
            ..Self::default()
        }
    }

    /// Open `id`, or retitle it when it already exists.
    pub fn open(&mut self, id: SurfaceId, title: impl Into<String>) -> &mut Surface {
        let title = title.into();
        let defaults = self.defaults;
        let surface = self
            .surfaces
            .entry(id)
            .or_insert_with(|| Surface::new(String::new(), defaults));
        surface.title = title;
        surface
    }

    pub fn get(&self, id: &SurfaceId) -> Option<&Surface> {
        self.surfaces.get(id)
    }

    pub fn get_mut(&mut self, id: &SurfaceId) -> Option<&mut Surface> {
        self.surfaces.get_mut(id)
    }

    /// Drop a surface. In-flight results for it become stale.
    pub fn close(&mut self, id: &SurfaceId) -> Option<Surface> {
        self.surfaces.remove(id)
    }

    pub fn len(&self) -> usize {
        self.surfaces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.surfaces.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = &SurfaceId> {
        self.surfaces.keys()
    }

    /// Issue a query for `id`, superseding any query still in flight.
    pub fn begin_request(&mut self, id: SurfaceId, title: impl Into<String>) -> RequestTicket {
        self.next_generation += 1;
        let generation = self.next_generation;
        let surface = self.open(id.clone(), title);
        if surface.is_pending() {
            debug!("Superseding in-flight query on {}", id);
        }
        surface.issued = generation;
        RequestTicket {
            surface: id,
            generation,
        }
    }

    /// Apply the outcome of the query behind `ticket`, unless a newer one
    /// was issued meanwhile.
    pub fn complete(
        &mut self,
        ticket: &RequestTicket,
        result: Result<AnalysisResult, BridgeError>,
    ) -> ApplyOutcome {
        let Some(surface) = self.surfaces.get_mut(&ticket.surface) else {
            debug!("Dropping result for closed surface {}", ticket.surface);
            return ApplyOutcome::Stale;
        };

        if ticket.generation != surface.issued {
            debug!(
                "Dropping stale result for {} (generation {}, latest {})",
                ticket.surface, ticket.generation, surface.issued
            );
            return ApplyOutcome::Stale;
        }
        surface.settled = ticket.generation;

        match result {
            Ok(result) => {
                surface.last_error = None;
                ApplyOutcome::Applied(surface.engine.replace_graph(result))
            }
            Err(err) => {
                warn!("Query on {} failed: {}", ticket.surface, err);
                surface.last_error = Some(err.to_string());
                ApplyOutcome::Failed(err)
            }
        }
    }

    /// Route a UI event to the surface's render engine.
    pub fn handle_event(&mut self, id: &SurfaceId, event: UiEvent) -> Option<Vec<RenderCommand>> {
        self.surfaces
            .get_mut(id)
            .map(|surface| surface.engine.handle(event))
    }
}

//! Selection state machine behind the four-level selector pages.
//!
//! One `Cascade` belongs to one session. Choosing at level N clears every
//! selection below N, no matter what was set before, so a stale
//! department can never survive a faculty change. Child option lists are
//! fetched asynchronously; each mutation bumps a generation counter and a
//! fetch carries the generation it was started under, so a slow fetch
//! that resolves after the user has moved on is discarded instead of
//! overwriting the newer selection's options. Last selection wins.

use std::sync::Arc;

use tracing::warn;

use crate::adapter::Backend;
use crate::models::{EntityRef, Level};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CascadeState {
    Empty,
    FacultyChosen,
    DepartmentChosen,
    SubjectChosen,
    ProfessorChosen,
}

/// Handle for one in-flight option fetch. Apply it back with
/// [`Cascade::apply_options`]; it only lands if no newer mutation
/// happened in between.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    generation: u64,
    level: Level,
}

impl FetchTicket {
    /// The level whose option list this fetch fills.
    pub fn level(self) -> Level {
        self.level
    }
}

#[derive(Debug, Default)]
pub struct Cascade {
    selections: [Option<String>; 4],
    options: [Vec<EntityRef>; 4],
    exam: Option<String>,
    generation: u64,
}

impl Cascade {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> CascadeState {
        // Selections are always a contiguous prefix: selecting clears
        // everything deeper.
        match self
            .selections
            .iter()
            .take_while(|slot| slot.is_some())
            .count()
        {
            0 => CascadeState::Empty,
            1 => CascadeState::FacultyChosen,
            2 => CascadeState::DepartmentChosen,
            3 => CascadeState::SubjectChosen,
            _ => CascadeState::ProfessorChosen,
        }
    }

    pub fn selection(&self, level: Level) -> Option<&str> {
        self.selections[level.depth()].as_deref()
    }

    pub fn options(&self, level: Level) -> &[EntityRef] {
        &self.options[level.depth()]
    }

    pub fn selected_exam(&self) -> Option<&str> {
        self.exam.as_deref()
    }

    /// All four reference levels are chosen.
    pub fn is_complete(&self) -> bool {
        self.selections.iter().all(Option::is_some)
    }

    /// Complete path plus a chosen exam, for question-authoring flows.
    pub fn is_complete_with_exam(&self) -> bool {
        self.is_complete() && self.exam.is_some()
    }

    /// Start a fetch that (re)fills the option list at `level` without
    /// changing any selection. Used to load the faculty roots.
    pub fn refresh(&mut self, level: Level) -> FetchTicket {
        self.generation += 1;
        FetchTicket {
            generation: self.generation,
            level,
        }
    }

    /// Choose `id` at `level`. Clears every selection and option list
    /// below `level` and invalidates all in-flight fetches. Returns the
    /// ticket for fetching the next level's options, or `None` at the
    /// deepest level.
    pub fn select(&mut self, level: Level, id: impl Into<String>) -> Option<FetchTicket> {
        let depth = level.depth();
        self.selections[depth] = Some(id.into());
        for slot in &mut self.selections[depth + 1..] {
            *slot = None;
        }
        for opts in &mut self.options[depth + 1..] {
            opts.clear();
        }
        self.exam = None;
        self.generation += 1;

        level.child().map(|child| FetchTicket {
            generation: self.generation,
            level: child,
        })
    }

    /// Choose the exam under the completed path.
    pub fn select_exam(&mut self, id: impl Into<String>) {
        self.exam = Some(id.into());
    }

    /// Land a fetched option list. Returns `false` (and changes nothing)
    /// when the ticket is stale, i.e. a newer selection happened after
    /// the fetch started.
    pub fn apply_options(&mut self, ticket: FetchTicket, options: Vec<EntityRef>) -> bool {
        if ticket.generation != self.generation {
            return false;
        }
        self.options[ticket.level.depth()] = options;
        true
    }
}

/// Couples a [`Cascade`] with a backend and performs the fetch that each
/// transition requires. A failed fetch leaves the cascade in its current
/// valid state with an empty option list; it never tears the state down.
pub struct CascadeDriver {
    backend: Arc<dyn Backend>,
    cascade: Cascade,
}

impl CascadeDriver {
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self {
            backend,
            cascade: Cascade::new(),
        }
    }

    pub fn cascade(&self) -> &Cascade {
        &self.cascade
    }

    /// Load the faculty roots.
    pub async fn start(&mut self) -> &[EntityRef] {
        let ticket = self.cascade.refresh(Level::Faculty);
        self.fetch_into(ticket, "").await;
        self.cascade.options(Level::Faculty)
    }

    /// Choose `id` at `level` and fetch the next level's options.
    /// Returns the options now available one level down (empty at the
    /// deepest level or after a failed fetch).
    pub async fn choose(&mut self, level: Level, id: &str) -> &[EntityRef] {
        let Some(ticket) = self.cascade.select(level, id) else {
            return &[];
        };
        self.fetch_into(ticket, id).await;
        self.cascade.options(ticket.level())
    }

    pub fn select_exam(&mut self, id: &str) {
        self.cascade.select_exam(id);
    }

    async fn fetch_into(&mut self, ticket: FetchTicket, parent_id: &str) {
        match self.backend.children_of(ticket.level(), parent_id).await {
            Ok(options) => {
                self.cascade.apply_options(ticket, options);
            }
            Err(err) => {
                warn!(level = ?ticket.level(), "child fetch failed: {err}");
                self.cascade.apply_options(ticket, Vec::new());
            }
        }
    }
}

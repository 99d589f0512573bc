//! View State Machine
//!
//! The dashboard view state is a plain value. Every input goes through [`reduce`], a pure
//! function `(state, event) -> (state', effects)`. Effects describe the redraw work the
//! owner must perform after the transition; they are never run while the state changes.
//!
//! States are `mode × grouping` plus an optional selection. There is no terminal state.

use std::collections::VecDeque;

use smallvec::{smallvec, SmallVec};

use crate::events::{ChartMode, EventKind, Grouping, PixelRange, ViewEvent};

/// Transitions kept for debugging before the oldest are dropped
const HISTORY_LIMIT: usize = 256;

/// Complete dashboard view state
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ViewState {
    pub mode: ChartMode,
    pub grouping: Grouping,
    pub selection: Option<PixelRange>,
}

/// Work the owner of the state must do after a transition
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Effect {
    /// Re-aggregate the dataset and rebuild every mark
    Redraw,
    /// Recompute highlight opacity over the current marks only
    Restyle,
}

/// Result of feeding one event to [`reduce`]
#[derive(Clone, Debug, PartialEq)]
pub struct Reaction {
    pub state: ViewState,
    pub effects: SmallVec<[Effect; 2]>,
}

impl Reaction {
    fn unchanged(state: &ViewState) -> Self {
        Self {
            state: state.clone(),
            effects: SmallVec::new(),
        }
    }

    /// True when the event was ignored.
    pub fn is_noop(&self) -> bool {
        self.effects.is_empty()
    }

    pub fn redraws(&self) -> bool {
        self.effects.contains(&Effect::Redraw)
    }
}

/// Pure transition function.
pub fn reduce(state: &ViewState, event: &ViewEvent) -> Reaction {
    match event {
        ViewEvent::ToggleMode => Reaction {
            state: ViewState {
                mode: state.mode.toggled(),
                ..state.clone()
            },
            effects: smallvec![Effect::Redraw],
        },
        // Selection is defined over the previous bucket layout, so it cannot survive.
        ViewEvent::ChangeGrouping(grouping) => Reaction {
            state: ViewState {
                grouping: grouping.clone(),
                selection: None,
                ..state.clone()
            },
            effects: smallvec![Effect::Redraw],
        },
        ViewEvent::ClearSelection => Reaction {
            state: ViewState {
                selection: None,
                ..state.clone()
            },
            effects: smallvec![Effect::Restyle],
        },
        ViewEvent::BrushEnd(_) if state.mode == ChartMode::Pie => Reaction::unchanged(state),
        ViewEvent::BrushEnd(range) => Reaction {
            state: ViewState {
                selection: PixelRange::from_brush(*range),
                ..state.clone()
            },
            effects: smallvec![Effect::Restyle],
        },
    }
}

/// One applied transition
#[derive(Clone, Debug, PartialEq)]
pub struct TransitionRecord {
    pub from: ViewState,
    pub event: EventKind,
    pub to: ViewState,
}

/// Owner of the current [`ViewState`]
#[derive(Clone, Debug, Default)]
pub struct ViewMachine {
    state: ViewState,
    /// Recent transitions (for debugging)
    history: VecDeque<TransitionRecord>,
}

impl ViewMachine {
    /// Machine in the initial state: bars, no grouping, no selection.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_state(state: ViewState) -> Self {
        Self {
            state,
            history: VecDeque::new(),
        }
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn mode(&self) -> ChartMode {
        self.state.mode
    }

    /// Check whether an event would be acted upon in the current state
    pub fn can_send(&self, event: &ViewEvent) -> bool {
        !reduce(&self.state, event).is_noop()
    }

    /// Apply an event and return the reaction (new state plus effects).
    pub fn send(&mut self, event: ViewEvent) -> Reaction {
        let reaction = reduce(&self.state, &event);
        if reaction.is_noop() {
            tracing::debug!(
                event = event.kind().as_str(),
                mode = %self.state.mode,
                "event ignored"
            );
            return reaction;
        }

        let from = std::mem::replace(&mut self.state, reaction.state.clone());
        tracing::debug!(
            event = event.kind().as_str(),
            mode = %self.state.mode,
            grouping = %self.state.grouping,
            selected = self.state.selection.is_some(),
            "view transition"
        );

        if self.history.len() == HISTORY_LIMIT {
            self.history.pop_front();
        }
        self.history.push_back(TransitionRecord {
            from,
            event: event.kind(),
            to: self.state.clone(),
        });

        reaction
    }

    /// Transition history, oldest first
    pub fn history(&self) -> impl Iterator<Item = &TransitionRecord> {
        self.history.iter()
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    /// Back to the initial state, as on a page reload.
    pub fn reset(&mut self) {
        self.state = ViewState::default();
        self.history.clear();
    }
}

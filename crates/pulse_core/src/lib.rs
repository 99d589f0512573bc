//! Pulse Core
//!
//! Foundational pieces shared by the Pulse survey dashboards:
//!
//! - **Records**: an immutable, cheaply cloned [`Dataset`] of survey responses
//! - **Loading**: CSV ingestion with raw or auto-typed cells
//! - **Events**: the four control inputs a dashboard reacts to
//! - **State Machine**: a pure reducer over the dashboard [`ViewState`]
//!
//! # Example
//!
//! ```rust
//! use pulse_core::{ChartMode, Grouping, ViewEvent, ViewMachine};
//!
//! let mut machine = ViewMachine::new();
//! machine.send(ViewEvent::BrushEnd(Some((40.0, 120.0))));
//! assert!(machine.state().selection.is_some());
//!
//! // A new grouping invalidates the previous bar layout, so the selection goes away.
//! machine.send(ViewEvent::ChangeGrouping(Grouping::field("Gender")));
//! assert!(machine.state().selection.is_none());
//! assert_eq!(machine.state().mode, ChartMode::Bars);
//! ```

pub mod error;
pub mod events;
pub mod fsm;
pub mod geometry;
pub mod loader;
pub mod record;

pub use error::{PulseError, Result};
pub use events::{ChartMode, EventKind, Grouping, PixelRange, ViewEvent};
pub use fsm::{reduce, Effect, Reaction, TransitionRecord, ViewMachine, ViewState};
pub use geometry::{Color, Point, Rect, Size};
pub use loader::{load_csv, read_csv, LoadOptions, Typing};
pub use record::{Dataset, Field, Record, Value};

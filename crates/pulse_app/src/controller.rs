//! Interaction controller for the exercise dashboard.
//!
//! Owns the [`ViewMachine`] and everything derived from its state. Events go through the
//! reducer first; the returned effects are applied afterwards, so a redraw never observes a
//! half-updated state.

use std::path::Path;

use anyhow::Result;
use pulse_charts::aggregate::{count_buckets, distribution, Bucket, CategoryField, GroupingSpec};
use pulse_charts::bar::BarChartModel;
use pulse_charts::brush::BrushX;
use pulse_charts::highlight::Highlight;
use pulse_charts::pie::PieChartModel;
use pulse_charts::scene::Scene;
use pulse_charts::svg::to_svg_string;
use pulse_charts::transition::GeometryTransition;
use pulse_charts::view::ChartFrame;
use pulse_core::{
    load_csv, ChartMode, Dataset, Effect, Grouping, LoadOptions, PixelRange, PulseError,
    ViewEvent, ViewMachine, ViewState,
};

use crate::config::ExerciseConfig;
use crate::survey::{
    exercise_bar_style, exercise_field, exercise_frame, exercise_pie_title, EXERCISE_CATEGORIES,
};

/// Data lifecycle of a dashboard.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Phase {
    Loading,
    Ready,
    Failed(String),
}

#[derive(Clone, Debug)]
enum ChartView {
    Empty,
    Bars(BarChartModel),
    Pie(PieChartModel),
}

impl ChartView {
    fn render(&self, frame: &ChartFrame, progress: f32, selection: Option<&PixelRange>) -> Scene {
        match self {
            ChartView::Empty => Scene::new(frame.width, frame.height),
            ChartView::Bars(bars) => bars.scene(progress, selection),
            ChartView::Pie(pie) => pie.scene(progress),
        }
    }

    fn buckets(&self) -> &[Bucket] {
        match self {
            ChartView::Empty => &[],
            ChartView::Bars(bars) => bars.buckets(),
            ChartView::Pie(pie) => pie.entries(),
        }
    }
}

/// Bar/pie toggle view over the exercise survey, with brushing on the bars.
pub struct ExerciseDashboard {
    config: ExerciseConfig,
    frame: ChartFrame,
    field: CategoryField,
    dataset: Option<Dataset>,
    phase: Phase,
    machine: ViewMachine,
    brush: BrushX,
    transition: GeometryTransition,
    view: ChartView,
    scene: Scene,
}

impl ExerciseDashboard {
    pub fn new(config: ExerciseConfig) -> Result<Self> {
        let frame = exercise_frame(&config);
        let transition = GeometryTransition::finished(config.animation_ms);
        Ok(Self {
            field: exercise_field()?,
            scene: Scene::new(frame.width, frame.height),
            frame,
            config,
            dataset: None,
            phase: Phase::Loading,
            machine: ViewMachine::new(),
            brush: BrushX::default(),
            transition,
            view: ChartView::Empty,
        })
    }

    /// Load the survey CSV with typed cells and draw the initial view.
    pub fn load_path(&mut self, path: &Path) -> Result<()> {
        tracing::info!("loading exercise survey from {}", path.display());
        self.finish_loading(load_csv(path, LoadOptions::auto_typed()))
    }

    /// Complete the load. A failure leaves the dashboard empty and is reported in
    /// [`Phase::Failed`]; no partial dataset is kept.
    pub fn finish_loading(&mut self, loaded: pulse_core::Result<Dataset>) -> Result<()> {
        self.machine.reset();
        self.brush.cancel();
        match loaded {
            Ok(dataset) => {
                if !dataset.has_column(self.field.field()) {
                    tracing::warn!(
                        "dataset has no '{}' column; every category will be empty",
                        self.field.field()
                    );
                }
                tracing::info!(
                    "exercise survey ready: {} records, {} columns",
                    dataset.len(),
                    dataset.columns().len()
                );
                self.dataset = Some(dataset);
                self.phase = Phase::Ready;
                self.redraw()
            }
            Err(err) => {
                self.fail(&err);
                Ok(())
            }
        }
    }

    fn fail(&mut self, err: &PulseError) {
        tracing::error!("failed to load exercise survey: {err}");
        self.dataset = None;
        self.phase = Phase::Failed(err.to_string());
        self.view = ChartView::Empty;
        self.scene = Scene::new(self.frame.width, self.frame.height);
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn state(&self) -> &ViewState {
        self.machine.state()
    }

    pub fn machine(&self) -> &ViewMachine {
        &self.machine
    }

    pub fn mode(&self) -> ChartMode {
        self.machine.mode()
    }

    pub fn selection(&self) -> Option<&PixelRange> {
        self.machine.state().selection.as_ref()
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn svg(&self) -> String {
        to_svg_string(&self.scene)
    }

    /// Buckets behind the current view.
    pub fn buckets(&self) -> &[Bucket] {
        self.view.buckets()
    }

    pub fn bucket(&self, primary: &str, secondary: Option<&str>) -> Option<&Bucket> {
        self.buckets()
            .iter()
            .find(|b| b.primary == primary && b.secondary.as_deref() == secondary)
    }

    /// Bars currently at full opacity; 0 in pie mode.
    pub fn highlighted_count(&self) -> usize {
        match &self.view {
            ChartView::Bars(bars) => bars
                .highlights(self.selection())
                .into_iter()
                .filter(|h| *h == Highlight::Selected)
                .count(),
            _ => 0,
        }
    }

    /// Caption of the mode toggle button: the action it performs next.
    pub fn toggle_label(&self) -> &'static str {
        match self.mode() {
            ChartMode::Bars => "show pie",
            ChartMode::Pie => "show bars",
        }
    }

    /// Values the grouping selector offers, `none` first.
    pub fn grouping_options(&self) -> Vec<String> {
        let mut options = vec![Grouping::NONE_VALUE.to_string()];
        if !self.config.grouping_options.is_empty() {
            options.extend(self.config.grouping_options.iter().cloned());
        } else if let Some(ds) = &self.dataset {
            options.extend(
                ds.columns()
                    .iter()
                    .filter(|c| c.as_str() != self.field.field())
                    .cloned(),
            );
        }
        options
    }

    fn accepts_grouping(&self, grouping: &Grouping) -> bool {
        let Some(field) = grouping.field_name() else {
            return true;
        };
        let offered = self.config.grouping_options.is_empty()
            || self.config.grouping_options.iter().any(|o| o == field);
        let present = self.dataset.as_ref().is_some_and(|ds| ds.has_column(field));
        offered && present
    }

    /// Run one control event through the state machine and apply its effects.
    ///
    /// Returns `false` when the event was ignored.
    pub fn dispatch(&mut self, event: ViewEvent) -> Result<bool> {
        if self.phase != Phase::Ready {
            tracing::warn!("{:?} ignored: no dataset loaded", event.kind());
            return Ok(false);
        }
        if let ViewEvent::ChangeGrouping(grouping) = &event {
            if !self.accepts_grouping(grouping) {
                tracing::warn!("unknown grouping field '{grouping}' ignored");
                return Ok(false);
            }
        }

        let reaction = self.machine.send(event);
        for effect in &reaction.effects {
            match effect {
                Effect::Redraw => self.redraw()?,
                Effect::Restyle => self.restyle(),
            }
        }
        Ok(!reaction.is_noop())
    }

    pub fn toggle_mode(&mut self) -> Result<bool> {
        self.dispatch(ViewEvent::ToggleMode)
    }

    /// Grouping selector changed to a raw control value (`none` or a column name).
    pub fn set_grouping(&mut self, value: &str) -> Result<bool> {
        self.dispatch(ViewEvent::ChangeGrouping(Grouping::from_control_value(value)))
    }

    pub fn clear_selection(&mut self) -> Result<bool> {
        self.brush.cancel();
        self.dispatch(ViewEvent::ClearSelection)
    }

    /// Deliver a finished brush interval directly.
    pub fn brush_end(&mut self, range: Option<(f32, f32)>) -> Result<bool> {
        self.dispatch(ViewEvent::BrushEnd(range))
    }

    /// Start a brush drag at `x`. The brush only exists over the bar plot area.
    pub fn begin_brush(&mut self, x: f32) {
        if let ChartView::Bars(bars) = &self.view {
            let extent = bars.brush_extent();
            self.brush = BrushX::with_extent(extent.x(), extent.right());
            self.brush.begin(x);
        }
    }

    pub fn drag_brush(&mut self, x: f32) {
        self.brush.update(x);
    }

    /// Finish the drag and hand the interval to the state machine.
    pub fn end_brush(&mut self) -> Result<bool> {
        if !self.brush.is_active() {
            return Ok(false);
        }
        let range = self.brush.take_final_px();
        self.brush_end(range)
    }

    /// Advance the running animation; returns whether it is still running.
    pub fn tick(&mut self, dt_seconds: f32) -> bool {
        if self.transition.is_finished() {
            return false;
        }
        self.transition.step(dt_seconds);
        let selection = self.machine.state().selection;
        self.scene = self
            .view
            .render(&self.frame, self.transition.progress(), selection.as_ref());
        !self.transition.is_finished()
    }

    pub fn is_animating(&self) -> bool {
        !self.transition.is_finished()
    }

    /// Re-aggregate from the dataset and rebuild the chart for the current state.
    fn redraw(&mut self) -> Result<()> {
        let Some(ds) = &self.dataset else {
            return Ok(());
        };
        let state = self.machine.state().clone();
        let grouping = GroupingSpec::from(&state.grouping);

        self.view = match state.mode {
            ChartMode::Bars => {
                let buckets = count_buckets(ds, &self.field, &grouping);
                let style = exercise_bar_style(self.frame, &state.grouping);
                ChartView::Bars(
                    BarChartModel::new(buckets, style)?.with_categories(EXERCISE_CATEGORIES),
                )
            }
            ChartMode::Pie => {
                let entries = distribution(ds, &self.field, &grouping);
                ChartView::Pie(
                    PieChartModel::new(entries, self.frame)?
                        .with_title(exercise_pie_title(&state.grouping)),
                )
            }
        };

        if self.config.animation_ms == 0 {
            self.transition.finish();
        } else {
            self.transition.restart();
        }

        let next = self.view.render(
            &self.frame,
            self.transition.progress(),
            state.selection.as_ref(),
        );
        let diff = next.diff(&self.scene);
        tracing::debug!(
            "redraw {} ({}): {} entered, {} updated, {} exited",
            state.mode,
            state.grouping,
            diff.entered.len(),
            diff.updated.len(),
            diff.exited.len()
        );
        self.scene = next;
        Ok(())
    }

    /// Recompute opacity for the current selection; geometry and counts stay as they are.
    fn restyle(&mut self) {
        if let ChartView::Bars(bars) = &self.view {
            let selection = self.machine.state().selection;
            bars.restyle(&mut self.scene, selection.as_ref());
            tracing::debug!(
                "restyle: {} of {} bars highlighted",
                self.highlighted_count(),
                bars.buckets().len()
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::survey::EXERCISE_FIELD;

    fn dashboard() -> ExerciseDashboard {
        let config = ExerciseConfig {
            animation_ms: 0,
            ..ExerciseConfig::default()
        };
        let mut d = ExerciseDashboard::new(config).unwrap();
        let ds = Dataset::from_text_rows(
            &[EXERCISE_FIELD, "Gender"],
            &[
                &["1-2 times a week", "Male"],
                &["1-2 times a week", "Female"],
                &["3-4 times a week", "Male"],
            ],
        );
        d.finish_loading(ds).unwrap();
        d
    }

    #[test]
    fn starts_as_ungrouped_bars() {
        let d = dashboard();
        assert_eq!(d.phase(), &Phase::Ready);
        assert_eq!(d.mode(), ChartMode::Bars);
        assert_eq!(d.buckets().len(), 4);
        assert_eq!(d.bucket("1-2 times a week", None).unwrap().value, 2.0);
        assert_eq!(d.highlighted_count(), 4);
        assert_eq!(d.toggle_label(), "show pie");
    }

    #[test]
    fn unknown_grouping_is_ignored() {
        let mut d = dashboard();
        assert!(!d.set_grouping("Shoe size").unwrap());
        assert_eq!(d.state().grouping, Grouping::None);
        assert!(d.set_grouping("Gender").unwrap());
        assert_eq!(d.buckets().len(), 8);
    }

    #[test]
    fn brush_gesture_dims_bars_outside() {
        let mut d = dashboard();
        d.begin_brush(60.0);
        d.drag_brush(150.0);
        assert!(d.end_brush().unwrap());
        assert_eq!(d.highlighted_count(), 1);
        assert!(d.scene().get("brush/selection").is_some());

        assert!(d.clear_selection().unwrap());
        assert_eq!(d.highlighted_count(), 4);
        assert!(d.scene().get("brush/selection").is_none());
    }

    #[test]
    fn pie_mode_ignores_brushes() {
        let mut d = dashboard();
        d.toggle_mode().unwrap();
        assert_eq!(d.mode(), ChartMode::Pie);
        assert!(!d.brush_end(Some((60.0, 200.0))).unwrap());
        assert!(d.scene().get("slice/1-2 times a week").is_some());
        assert_eq!(d.highlighted_count(), 0);
    }

    #[test]
    fn failed_load_renders_nothing() {
        let mut d = ExerciseDashboard::new(ExerciseConfig::default()).unwrap();
        d.finish_loading(Err(PulseError::NoColumns)).unwrap();
        assert!(matches!(d.phase(), Phase::Failed(_)));
        assert!(d.scene().is_empty());
        assert!(!d.toggle_mode().unwrap());
    }

    #[test]
    fn animation_rises_from_the_baseline() {
        let mut d = ExerciseDashboard::new(ExerciseConfig::default()).unwrap();
        d.finish_loading(Dataset::from_text_rows(
            &[EXERCISE_FIELD],
            &[&["3-4 times a week"]],
        ))
        .unwrap();
        assert!(d.is_animating());
        while d.tick(0.1) {}
        assert!(!d.is_animating());
        assert!(!d.tick(0.1));
    }
}

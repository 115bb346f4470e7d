//! Swipe-driven board controller
//!
//! Owns the board, the busy flag and the in-flight compaction. The host
//! forwards touches and calls `tick` once per frame after advancing its
//! animation backend; every line of the compaction makes progress on each
//! tick, but within a line the next swap is only issued after the previous
//! one has resolved.

use glam::Vec2;

use super::board::Board;
use super::compaction::{Direction, LineScan};
use super::swap::{BusyFlag, SwapOperation, SwapProgress};
use crate::animation::AnimationBackend;
use crate::gesture::SwipeTracker;
use crate::settings::SwipeSettings;

/// Summary of a finished compaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompactionReport {
    pub direction: Direction,
    /// Swaps committed to the matrix
    pub swaps: usize,
    /// Lines given up after an animation failure
    pub abandoned_lines: usize,
}

/// What happened to a move request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveOutcome {
    /// A compaction was already running; the request was dropped
    Ignored,
    /// Swaps were issued; the compaction finishes in a later `tick`
    Started,
    /// Nothing needed to animate; the compaction resolved immediately
    Finished(CompactionReport),
}

#[derive(Debug)]
struct LineTask {
    scan: LineScan,
    in_flight: Option<SwapOperation>,
    done: bool,
    abandoned: bool,
}

impl LineTask {
    fn abandon(&mut self) {
        self.in_flight = None;
        self.done = true;
        self.abandoned = true;
    }
}

#[derive(Debug)]
struct Compaction {
    direction: Direction,
    lines: Vec<LineTask>,
}

impl Compaction {
    fn is_done(&self) -> bool {
        self.lines.iter().all(|l| l.done)
    }

    fn report(&self) -> CompactionReport {
        CompactionReport {
            direction: self.direction,
            swaps: self.lines.iter().map(|l| l.scan.swaps()).sum(),
            abandoned_lines: self.lines.iter().filter(|l| l.abandoned).count(),
        }
    }
}

/// Issue the next swap of a line, or mark it done if the line is settled
fn issue_next<B: AnimationBackend + ?Sized>(
    task: &mut LineTask,
    board: &Board,
    backend: &mut B,
    settings: &SwipeSettings,
    busy: &mut BusyFlag,
) {
    let Some(pair) = task.scan.next_swap(board) else {
        task.done = true;
        return;
    };
    match SwapOperation::begin(
        board,
        pair,
        backend,
        settings.effective_swap_duration(),
        settings.effective_swap_timeout(),
        busy,
    ) {
        Ok(op) => task.in_flight = Some(op),
        Err(e) => {
            log::warn!(
                "Swap {} <-> {} could not start: {}; abandoning line",
                pair.scanned,
                pair.neighbor,
                e
            );
            task.abandon();
        }
    }
}

/// Board plus the gesture and animation state around it
#[derive(Debug)]
pub struct SwipeBoard {
    board: Board,
    settings: SwipeSettings,
    tracker: SwipeTracker,
    busy: BusyFlag,
    compaction: Option<Compaction>,
    last_report: Option<CompactionReport>,
}

impl SwipeBoard {
    pub fn new(board: Board, settings: SwipeSettings) -> Self {
        Self {
            board,
            settings,
            tracker: SwipeTracker::new(),
            busy: BusyFlag::default(),
            compaction: None,
            last_report: None,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn settings(&self) -> &SwipeSettings {
        &self.settings
    }

    /// True while a compaction's swaps are in flight
    pub fn is_busy(&self) -> bool {
        self.busy.is_set()
    }

    /// Direction of the compaction currently running
    pub fn active_direction(&self) -> Option<Direction> {
        self.compaction.as_ref().map(|c| c.direction)
    }

    /// Report of the most recently finished compaction
    pub fn last_report(&self) -> Option<&CompactionReport> {
        self.last_report.as_ref()
    }

    pub fn into_board(self) -> Board {
        self.board
    }

    pub fn touch_start(&mut self, point: Vec2) {
        self.tracker.touch_start(point);
    }

    /// Finish a touch; a recognised swipe becomes a move request
    pub fn touch_end<B: AnimationBackend + ?Sized>(
        &mut self,
        point: Vec2,
        backend: &mut B,
    ) -> Option<MoveOutcome> {
        let direction = self.tracker.touch_end(point)?;
        Some(self.move_tiles(direction, backend))
    }

    /// Start compacting toward `direction` unless a compaction is running
    pub fn move_tiles<B: AnimationBackend + ?Sized>(
        &mut self,
        direction: Direction,
        backend: &mut B,
    ) -> MoveOutcome {
        if self.busy.is_set() || self.compaction.is_some() {
            log::debug!("Board busy, ignoring {} swipe", direction);
            return MoveOutcome::Ignored;
        }

        let mut compaction = Compaction {
            direction,
            lines: LineScan::for_direction(direction)
                .into_iter()
                .map(|scan| LineTask {
                    scan,
                    in_flight: None,
                    done: false,
                    abandoned: false,
                })
                .collect(),
        };
        for task in &mut compaction.lines {
            issue_next(task, &self.board, backend, &self.settings, &mut self.busy);
        }

        if compaction.is_done() {
            return MoveOutcome::Finished(self.finish(compaction));
        }
        log::debug!("Compaction {} started", direction);
        self.compaction = Some(compaction);
        MoveOutcome::Started
    }

    /// Drive in-flight swaps; returns the report when the compaction ends
    pub fn tick<B: AnimationBackend + ?Sized>(
        &mut self,
        backend: &mut B,
        dt: f32,
    ) -> Option<CompactionReport> {
        let compaction = self.compaction.as_mut()?;

        for task in &mut compaction.lines {
            let Some(op) = task.in_flight.as_mut() else {
                continue;
            };
            match op.poll(&mut self.board, backend, dt) {
                SwapProgress::Pending => {}
                SwapProgress::Resolved => {
                    task.in_flight = None;
                    task.scan.commit();
                    issue_next(task, &self.board, backend, &self.settings, &mut self.busy);
                }
                SwapProgress::Failed(e) => {
                    let (a, b) = op.cells();
                    log::warn!("Swap {} <-> {} failed: {}; abandoning line", a, b, e);
                    task.abandon();
                }
            }
        }

        if !compaction.is_done() {
            return None;
        }
        let compaction = self.compaction.take()?;
        Some(self.finish(compaction))
    }

    fn finish(&mut self, compaction: Compaction) -> CompactionReport {
        self.busy.release();
        let report = compaction.report();
        if report.abandoned_lines > 0 {
            log::warn!(
                "Compaction {} finished with {} swaps, {} lines abandoned",
                report.direction,
                report.swaps,
                report.abandoned_lines
            );
        } else {
            log::info!(
                "Compaction {} finished with {} swaps",
                report.direction,
                report.swaps
            );
        }
        log::debug!("Board after {}:\n{}", report.direction, self.board);
        self.last_report = Some(report.clone());
        report
    }
}

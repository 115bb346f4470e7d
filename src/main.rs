//! Swipe Board demo entry point
//!
//! Seeds a board, replays a scripted set of swipes and runs the frame loop
//! against the tween backend, logging the board after every compaction.
//!
//! Usage: `swipe-board [settings.json] [seed]`

use glam::Vec2;

use swipe_board::animation::TweenBackend;
use swipe_board::sim::{Board, MoveOutcome, SwipeBoard};
use swipe_board::SwipeSettings;

/// Host frame step (60 Hz)
const FRAME_DT: f32 = 1.0 / 60.0;
/// Give up on a compaction after this many frames
const MAX_FRAMES: u32 = 600;
/// Filler tiles on the seeded board
const FILLER_COUNT: usize = 5;

/// Scripted swipes as (touch start, touch end) in scene coordinates
const SWIPES: [((f32, f32), (f32, f32)); 6] = [
    ((0.0, 0.0), (-60.0, -60.0)), // toward left
    ((0.0, 0.0), (60.0, 60.0)),   // toward right
    ((0.0, 0.0), (80.0, 0.0)),    // flat, ignored
    ((0.0, 0.0), (-60.0, 60.0)),  // toward top
    ((0.0, 0.0), (60.0, -60.0)),  // toward bottom
    ((0.0, 0.0), (60.0, 60.0)),   // toward right
];

fn main() {
    env_logger::init();
    log::info!("Swipe Board (native) starting...");

    let mut args = std::env::args().skip(1);
    let settings = match args.next() {
        Some(path) => SwipeSettings::load(path),
        None => SwipeSettings::default(),
    };
    let seed = args.next().and_then(|s| s.parse().ok()).unwrap_or(7);

    let board = Board::shuffled(seed, FILLER_COUNT, settings.layout);
    println!("Seed {seed}:\n{board}");

    let mut game = SwipeBoard::new(board, settings);
    let mut backend = TweenBackend::new();

    for ((sx, sy), (ex, ey)) in SWIPES {
        game.touch_start(Vec2::new(sx, sy));
        match game.touch_end(Vec2::new(ex, ey), &mut backend) {
            None => {
                println!("Swipe ({ex}, {ey}) ignored\n");
                continue;
            }
            Some(MoveOutcome::Ignored) => {
                println!("Board busy, swipe dropped\n");
                continue;
            }
            Some(MoveOutcome::Finished(report)) => {
                println!("{} already settled\n", report.direction);
                continue;
            }
            Some(MoveOutcome::Started) => {}
        }

        let mut frames = 0;
        let report = loop {
            backend.advance(FRAME_DT);
            if let Some(report) = game.tick(&mut backend, FRAME_DT) {
                break Some(report);
            }
            frames += 1;
            if frames >= MAX_FRAMES {
                break None;
            }
        };

        match report {
            Some(report) => println!(
                "{}: {} swaps in {} frames\n{}",
                report.direction,
                report.swaps,
                frames + 1,
                game.board()
            ),
            None => {
                log::error!("Compaction did not finish within {} frames", MAX_FRAMES);
                return;
            }
        }
    }
}

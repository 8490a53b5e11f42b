//! Input, playback and rendering wired together the way the binary does it

mod common;

use common::QUIET;
use tile_cascade::core::{find_possible_move, GameSession};
use tile_cascade::input::{map_key, Selection, SelectionOutcome};
use tile_cascade::term::{BoardView, Replay, Scene, Viewport};
use tile_cascade::types::{InputAction, Pos};

use crossterm::event::{KeyCode, KeyEvent};

#[test]
fn select_swap_replay_render() {
    let mut session = GameSession::new(31);
    session.take_events();
    let mut scene = Scene::new(session.snapshot());
    let mut selection = Selection::new();

    let (a, b) = find_possible_move(session.board()).unwrap();
    assert_eq!(
        selection.activate_at(a, session.board()),
        SelectionOutcome::Selected(a)
    );
    let SelectionOutcome::Swap(from, to) = selection.activate_at(b, session.board()) else {
        panic!("second click should request a swap");
    };
    assert_eq!((from, to), (a, b));

    let outcome = session.request_swap(from, to);
    assert!(outcome.is_resolved());

    scene.clear_transient();
    let mut replay = Replay::new(outcome.events().to_vec(), false);
    replay.advance(0, &mut scene);
    assert!(replay.is_done());
    assert_eq!(scene.snapshot.board, *session.board());
    assert_eq!(scene.snapshot.score, session.score());
    assert!(scene.combo >= 1);

    let view = BoardView::default();
    let vp = Viewport::new(80, 24);
    let fb = view.render(&scene, vp);
    let score = session.score().to_string();
    assert!(fb.find_text(&score).is_some());
}

#[test]
fn animated_playback_takes_the_logged_time() {
    let mut session = GameSession::new(8);
    session.take_events();
    let mut scene = Scene::new(session.snapshot());
    let (a, b) = find_possible_move(session.board()).unwrap();
    let outcome = session.request_swap(a, b);

    let total: u32 = outcome.events().iter().map(|e| e.pause_ms()).sum();
    let mut replay = Replay::new(outcome.events().to_vec(), true);
    assert_eq!(replay.remaining_ms(), total);

    let mut steps = 0;
    while !replay.is_done() {
        replay.advance(50, &mut scene);
        steps += 1;
    }
    assert!(steps as u32 * 50 >= total);
    assert_eq!(scene.snapshot.board, *session.board());
}

#[test]
fn keys_drive_the_cursor() {
    let mut selection = Selection::new();
    for code in [KeyCode::Up, KeyCode::Up, KeyCode::Char('h')] {
        let action = map_key(KeyEvent::from(code)).unwrap();
        assert!(selection.move_cursor(action));
    }
    assert_eq!(selection.cursor, Pos::new(2, 3));
    assert_eq!(
        map_key(KeyEvent::from(KeyCode::Enter)),
        Some(InputAction::Activate)
    );
}

#[test]
fn rejected_click_keeps_selection_and_board() {
    let mut rows = QUIET;
    rows[0] = "B* G P W B G P W B";
    let session = GameSession::from_layout(2, &rows).unwrap();
    let mut selection = Selection::new();
    selection.activate_at(Pos::new(1, 1), session.board());
    assert_eq!(
        selection.activate_at(Pos::new(0, 0), session.board()),
        SelectionOutcome::Refused
    );
    assert_eq!(selection.selected, Some(Pos::new(1, 1)));
}

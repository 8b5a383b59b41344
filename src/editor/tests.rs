// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Orgchart and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::time::{Duration, Instant};

use rstest::{fixture, rstest};

use crate::config::EditorConfig;
use crate::drag::DropIntent;
use crate::model::fixtures::{chart_sample, nid};
use crate::model::{NodeId, Point, Rect};
use crate::surface::{CellRole, MemorySurface, Surface};

use super::{Editor, EventOutcome, Key, NoopReason};

type TestEditor = Editor<MemorySurface>;

#[fixture]
fn editor() -> TestEditor {
    Editor::new(chart_sample(), MemorySurface::new(), EditorConfig::default())
}

fn bounds(editor: &TestEditor, id: &str) -> Rect {
    let cell = editor.cell_of(&nid(id)).expect("cell");
    editor.surface().bounding_box(cell).expect("bounds")
}

/// Presses `id` 10px inside its top-left corner and drags it so the ghost's
/// origin lands on `target`.
fn drag_to(editor: &mut TestEditor, id: &str, target: Point, now: Instant) {
    let origin = bounds(editor, id).origin();
    let press = origin.offset(10.0, 10.0);
    assert_eq!(editor.on_node_pressed(&nid(id), press), EventOutcome::Handled);
    let pointer = press.offset(target.x - origin.x, target.y - origin.y);
    assert_eq!(editor.on_pointer_move(pointer, now), EventOutcome::Handled);
}

fn children(editor: &TestEditor, id: &str) -> Vec<NodeId> {
    editor.tree().children(&nid(id))
}

#[rstest]
fn initial_layout_is_pushed_to_surface(editor: TestEditor) {
    assert_eq!(editor.surface().nodes_with_role(CellRole::Unit).len(), 5);
    assert_eq!(editor.surface().all_edges().len(), 4);

    // Root centered over the widest rank, children centered under parents.
    assert_eq!(bounds(&editor, "0"), Rect::new(125.0, 0.0, 200.0, 54.0));
    assert_eq!(bounds(&editor, "1").origin(), Point::new(17.0, 154.0));
    assert_eq!(bounds(&editor, "2").origin(), Point::new(233.0, 154.0));
    assert_eq!(bounds(&editor, "3").origin(), Point::new(125.0, 308.0));
    assert_eq!(bounds(&editor, "4").origin(), Point::new(341.0, 308.0));

    let edge = editor.edge_cell(&nid("0"), &nid("1")).expect("edge cell");
    let vertices = &editor.surface().edge_cell(edge).expect("edge").vertices;
    assert_eq!(vertices.as_slice(), &[Point::new(225.0, 104.0), Point::new(117.0, 104.0)]);
}

#[rstest]
fn drop_on_upper_right_inserts_sibling_after(mut editor: TestEditor) {
    let now = Instant::now();
    drag_to(&mut editor, "3", Point::new(100.0, 140.0), now);

    let pending = editor.pending_move().expect("staged");
    assert_eq!(pending.intent, DropIntent::SiblingAfter);
    assert_eq!(pending.new_parent_id, nid("0"));
    assert_eq!(pending.insert_index, 1);
    assert!(!editor.surface().is_panning());

    let preview = editor.surface().nodes_with_role(CellRole::Preview);
    assert_eq!(preview.len(), 1);
    assert_eq!(
        editor.surface().bounding_box(preview[0]).map(|rect| rect.origin()),
        Some(Point::new(277.0, 154.0))
    );
    let dragged = editor.cell_of(&nid("3")).expect("cell");
    assert_eq!(editor.surface().node_cell(dragged).map(|cell| cell.opacity), Some(0.3));

    assert_eq!(editor.on_pointer_up(now), EventOutcome::Handled);
    assert_eq!(children(&editor, "0"), vec![nid("1"), nid("3"), nid("2")]);
    assert_eq!(children(&editor, "2"), vec![nid("4")]);
    assert_eq!(editor.tree().rev(), 1);

    assert!(editor.surface().nodes_with_role(CellRole::Ghost).is_empty());
    assert!(editor.surface().nodes_with_role(CellRole::Preview).is_empty());
    assert_eq!(editor.surface().all_edges().len(), 4);
    assert_eq!(editor.surface().node_cell(dragged).map(|cell| cell.opacity), Some(1.0));
    assert!(editor.surface().is_panning());
    assert!(editor.session().is_idle());
    assert_eq!(editor.edge_cell(&nid("2"), &nid("3")), None);
    assert!(editor.edge_cell(&nid("0"), &nid("3")).is_some());
}

#[rstest]
fn drop_on_lower_right_appends_child(mut editor: TestEditor) {
    let now = Instant::now();
    drag_to(&mut editor, "1", Point::new(400.0, 320.0), now);

    let pending = editor.pending_move().expect("staged");
    assert_eq!(pending.intent, DropIntent::LastChild);
    assert_eq!(pending.new_parent_id, nid("4"));

    editor.on_pointer_up(now);
    assert_eq!(editor.tree().parent(&nid("1")), Some(&nid("4")));
    assert_eq!(editor.layout().rank(&nid("1")), Some(3));
    let parent = bounds(&editor, "4");
    assert_eq!(bounds(&editor, "1").center_x(), parent.center_x());
}

#[rstest]
fn drop_into_own_subtree_leaves_tree_untouched(mut editor: TestEditor) {
    let before = editor.tree().clone();
    let now = Instant::now();
    // Lower right of `3`, a child of the dragged `2`.
    let target = bounds(&editor, "3").origin().offset(60.0, 20.0);
    drag_to(&mut editor, "2", target, now);
    assert!(editor.pending_move().is_none());
    assert!(editor.surface().nodes_with_role(CellRole::Preview).is_empty());

    editor.on_pointer_up(now);
    assert_eq!(editor.tree(), &before);
    // Layout reconciles the dragged node back into place.
    assert_eq!(bounds(&editor, "2").origin(), Point::new(233.0, 154.0));
}

#[rstest]
fn moving_away_clears_staged_move(mut editor: TestEditor) {
    let now = Instant::now();
    drag_to(&mut editor, "3", Point::new(100.0, 140.0), now);
    assert!(editor.pending_move().is_some());

    editor.on_pointer_move(Point::new(5000.0, 5000.0), now);
    assert!(editor.pending_move().is_none());
    assert!(editor.surface().nodes_with_role(CellRole::Preview).is_empty());

    editor.on_pointer_up(now);
    assert_eq!(editor.tree().rev(), 0);
}

#[rstest]
fn zoom_scales_pointer_delta(mut editor: TestEditor) {
    editor.surface_mut().set_zoom(0.5);
    let now = Instant::now();
    let origin = bounds(&editor, "1").origin();

    editor.on_node_pressed(&nid("1"), Point::new(0.0, 0.0));
    editor.on_pointer_move(Point::new(10.0, 5.0), now);

    let ghost = editor.surface().nodes_with_role(CellRole::Ghost)[0];
    assert_eq!(editor.surface().position(ghost), Some(origin.offset(20.0, 10.0)));
}

#[rstest]
fn single_click_selects_after_delay(mut editor: TestEditor) {
    let now = Instant::now();
    editor.on_node_pressed(&nid("1"), Point::default());
    assert_eq!(editor.on_pointer_up(now), EventOutcome::Handled);
    assert!(editor.selection().is_empty());

    assert_eq!(editor.tick(now + Duration::from_millis(100)), None);
    assert_eq!(editor.tick(now + Duration::from_millis(300)), Some(nid("1")));
    assert!(editor.selection().contains(&nid("1")));

    let cell = editor.cell_of(&nid("1")).expect("cell");
    assert_eq!(editor.surface().node_cell(cell).map(|cell| cell.selected), Some(true));

    // Selecting another node replaces the selection.
    let later = now + Duration::from_secs(1);
    editor.on_node_pressed(&nid("2"), Point::default());
    editor.on_pointer_up(later);
    editor.tick(later + Duration::from_millis(300));
    assert_eq!(editor.selection().iter().collect::<Vec<_>>(), vec![&nid("2")]);
    assert_eq!(editor.surface().node_cell(cell).map(|cell| cell.selected), Some(false));
}

#[rstest]
fn slow_drag_never_selects_the_dragged_node(mut editor: TestEditor) {
    let now = Instant::now();
    let press = bounds(&editor, "3").origin().offset(10.0, 10.0);
    editor.on_node_pressed(&nid("3"), press);
    assert_eq!(editor.tick(now + Duration::from_millis(400)), None);
    assert!(editor.selection().is_empty());

    editor.on_pointer_move(press.offset(-25.0, -168.0), now + Duration::from_millis(400));
    assert!(editor.session().dragging().is_some());
    editor.on_pointer_up(now + Duration::from_millis(450));

    assert_eq!(editor.tick(now + Duration::from_secs(2)), None);
    assert!(editor.selection().is_empty());
}

#[rstest]
fn held_press_selects_only_after_release(mut editor: TestEditor) {
    let now = Instant::now();
    editor.on_node_pressed(&nid("1"), Point::default());
    assert_eq!(editor.next_deadline(), None);
    assert_eq!(editor.tick(now + Duration::from_millis(400)), None);

    let released = now + Duration::from_millis(450);
    editor.on_pointer_up(released);
    assert_eq!(editor.tick(released + Duration::from_millis(299)), None);
    assert_eq!(editor.tick(released + Duration::from_millis(300)), Some(nid("1")));
}

#[rstest]
fn label_edit_during_drag_discards_staged_move(mut editor: TestEditor) {
    let now = Instant::now();
    drag_to(&mut editor, "3", Point::new(100.0, 140.0), now);
    assert!(editor.pending_move().is_some());

    assert_eq!(editor.on_node_double_activated(&nid("1")), EventOutcome::Handled);
    assert_eq!(editor.editing(), Some(&nid("1")));
    assert!(editor.session().is_idle());
    assert!(editor.surface().is_panning());
    assert!(editor.surface().nodes_with_role(CellRole::Ghost).is_empty());
    assert!(editor.surface().nodes_with_role(CellRole::Preview).is_empty());
    let dragged = editor.cell_of(&nid("3")).expect("cell");
    assert_eq!(editor.surface().node_cell(dragged).map(|cell| cell.opacity), Some(1.0));

    assert_eq!(
        editor.on_pointer_up(now),
        EventOutcome::Noop { reason: NoopReason::NoActiveGesture }
    );
    assert_eq!(children(&editor, "0"), vec![nid("1"), nid("2")]);
    assert_eq!(editor.tree().rev(), 0);
    assert_eq!(bounds(&editor, "3").origin(), Point::new(125.0, 308.0));
}

#[rstest]
fn double_click_opens_label_editor_and_enter_commits(mut editor: TestEditor) {
    let now = Instant::now();
    editor.on_node_pressed(&nid("1"), Point::default());
    editor.on_pointer_up(now);
    editor.on_node_pressed(&nid("1"), Point::default());
    assert_eq!(editor.editing(), None);
    assert_eq!(editor.on_pointer_up(now + Duration::from_millis(150)), EventOutcome::Handled);
    assert_eq!(editor.editing(), Some(&nid("1")));
    assert_eq!(editor.tick(now + Duration::from_secs(1)), None);

    // Presses are ignored while editing.
    assert_eq!(
        editor.on_node_pressed(&nid("2"), Point::default()),
        EventOutcome::Noop { reason: NoopReason::EditingLabel }
    );
    assert_eq!(
        editor.on_key_pressed(Key::Delete),
        EventOutcome::Noop { reason: NoopReason::EditingLabel }
    );

    editor.surface_mut().type_label("Holding");
    assert_eq!(editor.on_key_pressed(Key::Enter), EventOutcome::Handled);
    assert_eq!(editor.editing(), None);
    assert_eq!(editor.tree().node(&nid("1")).map(|node| node.label()), Some("Holding"));
    let cell = editor.cell_of(&nid("1")).expect("cell");
    assert_eq!(editor.surface().node_cell(cell).map(|cell| cell.spec.label.as_str()), Some("Holding"));
}

#[rstest]
#[case::escape(true)]
#[case::blank_click(false)]
fn cancelled_label_edit_keeps_label(mut editor: TestEditor, #[case] escape: bool) {
    editor.on_node_double_activated(&nid("2"));
    editor.surface_mut().type_label("Scratch");

    if escape {
        assert_eq!(editor.on_key_pressed(Key::Escape), EventOutcome::Handled);
    } else {
        assert_eq!(editor.on_blank_activated(), EventOutcome::Handled);
    }
    assert_eq!(editor.editing(), None);
    assert_eq!(editor.surface().label_editor_text(), None);
    assert_eq!(editor.tree().node(&nid("2")).map(|node| node.label()), Some("Subsidiary 2"));
    assert_eq!(editor.tree().rev(), 0);
}

#[rstest]
fn delete_key_removes_selected_subtree(mut editor: TestEditor) {
    assert_eq!(
        editor.on_key_pressed(Key::Backspace),
        EventOutcome::Noop { reason: NoopReason::NothingSelected }
    );

    let now = Instant::now();
    editor.on_node_pressed(&nid("2"), Point::default());
    editor.on_pointer_up(now);
    editor.tick(now + Duration::from_millis(300));

    assert_eq!(editor.on_key_pressed(Key::Delete), EventOutcome::Handled);
    assert_eq!(editor.tree().len(), 2);
    assert!(editor.selection().is_empty());
    assert_eq!(editor.cell_of(&nid("3")), None);
    assert_eq!(editor.surface().nodes_with_role(CellRole::Unit).len(), 2);
    assert_eq!(editor.surface().all_edges().len(), 1);
    // The remaining child is re-centered under the root.
    assert_eq!(bounds(&editor, "1").center_x(), bounds(&editor, "0").center_x());
}

#[rstest]
fn add_child_uses_fresh_id_and_default_label(mut editor: TestEditor) {
    let first = editor.add_child(&nid("1")).expect("add");
    let second = editor.add_child(&nid("1")).expect("add");
    assert_eq!(first, nid("n5"));
    assert_eq!(second, nid("n6"));

    assert_eq!(children(&editor, "1"), vec![nid("n5"), nid("n6")]);
    assert_eq!(editor.tree().node(&first).map(|node| node.label()), Some("Subsidiary"));
    assert!(editor.edge_cell(&nid("1"), &first).is_some());
    assert!(editor.layout().position(&second).is_some());

    let err = editor.add_child(&nid("missing")).unwrap_err();
    assert!(matches!(err, crate::ops::ApplyError::NotFound { .. }));
}

#[rstest]
fn rejected_reparent_keeps_surface_in_sync(mut editor: TestEditor) {
    let err = editor.reparent(&nid("0"), &nid("3"), Some(0)).unwrap_err();
    assert!(matches!(err, crate::ops::ApplyError::WouldCycle { .. }));
    assert_eq!(editor.surface().all_edges().len(), 4);

    editor.reparent(&nid("4"), &nid("2"), Some(0)).expect("reorder");
    assert_eq!(children(&editor, "2"), vec![nid("4"), nid("3")]);
    assert!(bounds(&editor, "4").x < bounds(&editor, "3").x);
}

#[test]
fn debounced_moves_wait_for_tick() {
    let mut config = EditorConfig::default();
    config.drag.move_debounce_ms = 16;
    let mut editor = Editor::new(chart_sample(), MemorySurface::new(), config);
    let now = Instant::now();

    editor.on_node_pressed(&nid("1"), Point::default());
    editor.on_pointer_move(Point::new(5.0, 0.0), now);
    assert!(editor.surface().nodes_with_role(CellRole::Ghost).is_empty());
    assert_eq!(editor.next_deadline(), Some(now + Duration::from_millis(16)));

    editor.on_pointer_move(Point::new(9.0, 0.0), now + Duration::from_millis(4));
    editor.tick(now + Duration::from_millis(16));
    let ghost = editor.surface().nodes_with_role(CellRole::Ghost)[0];
    assert_eq!(editor.surface().position(ghost), Some(Point::new(26.0, 154.0)));

    editor.on_pointer_move(Point::new(20.0, 0.0), now + Duration::from_millis(20));
    // Pointer-up flushes the buffered move before ending the gesture.
    editor.on_pointer_up(now);
    assert!(editor.surface().nodes_with_role(CellRole::Ghost).is_empty());
}

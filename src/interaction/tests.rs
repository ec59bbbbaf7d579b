use super::*;
use crate::model::{Feature, Geometry, VertexRef};

fn event(kind: PointerKind, x: f64, y: f64) -> PointerEvent {
    PointerEvent::new(kind, Coord::new(x, y), Modifiers::default())
}

fn with_modifiers(kind: PointerKind, x: f64, y: f64, modifiers: Modifiers) -> PointerEvent {
    PointerEvent::new(kind, Coord::new(x, y), modifiers)
}

fn all_states() -> Vec<Option<ActiveHandler>> {
    vec![
        Some(ActiveHandler::Draw(GeometryType::Point)),
        Some(ActiveHandler::Draw(GeometryType::LineString)),
        Some(ActiveHandler::Draw(GeometryType::Polygon)),
        Some(ActiveHandler::Modify),
    ]
}

/// Drive the controller into `target` using only the two selectors.
fn drive_to(controller: &mut InteractionController, target: ActiveHandler) {
    match target {
        ActiveHandler::Draw(kind) => controller.handle_form(FormEvent::DrawTypeChanged(kind)),
        ActiveHandler::Modify => {
            controller.handle_form(FormEvent::InteractionChanged(InteractionKind::Modify));
        }
    }
}

#[test]
fn starts_drawing_points() {
    let controller = InteractionController::new();
    assert_eq!(
        controller.active_kind(),
        Some(ActiveHandler::Draw(GeometryType::Point))
    );
    assert_eq!(controller.interaction(), InteractionKind::Draw);
}

#[test]
fn every_state_reaches_every_other_state() {
    for from in all_states().into_iter().flatten() {
        for to in all_states().into_iter().flatten() {
            let mut controller = InteractionController::new();
            drive_to(&mut controller, from);
            assert_eq!(controller.active_kind(), Some(from));
            drive_to(&mut controller, to);
            assert_eq!(controller.active_kind(), Some(to), "from {from:?} to {to:?}");
        }
    }
}

#[test]
fn draw_type_change_forces_interaction_back_to_draw() {
    let mut controller = InteractionController::new();
    controller.handle_form(FormEvent::InteractionChanged(InteractionKind::Modify));
    controller.handle_form(FormEvent::DrawTypeChanged(GeometryType::Polygon));
    assert_eq!(controller.interaction(), InteractionKind::Draw);
    assert_eq!(
        controller.active_kind(),
        Some(ActiveHandler::Draw(GeometryType::Polygon))
    );
    controller.handle_form(FormEvent::InteractionChanged(InteractionKind::Modify));
    controller.handle_form(FormEvent::InteractionChanged(InteractionKind::Draw));
    assert_eq!(
        controller.active_kind(),
        Some(ActiveHandler::Draw(GeometryType::Polygon))
    );
}

#[test]
fn deactivated_controller_ignores_pointer_input() {
    let mut controller = InteractionController::new();
    let mut source = FeatureSource::new();
    controller.deactivate();
    assert_eq!(controller.active_kind(), None);
    let outcome = controller.handle_pointer(&event(PointerKind::Click, 1.0, 1.0), &mut source, 1.0);
    assert!(!outcome.consumed);
    assert!(outcome.edit.is_none());
    controller.activate();
    assert_eq!(
        controller.active_kind(),
        Some(ActiveHandler::Draw(GeometryType::Point))
    );
}

#[test]
fn entering_and_leaving_modify_clears_selection() {
    let mut controller = InteractionController::new();
    let mut source = FeatureSource::new();
    source.add_feature(Feature::new(Geometry::Point(Coord::new(0.0, 0.0))));
    controller.handle_form(FormEvent::InteractionChanged(InteractionKind::Modify));
    controller.handle_pointer(&event(PointerKind::Click, 0.0, 0.0), &mut source, 1.0);
    assert_eq!(controller.selection().len(), 1);

    controller.handle_form(FormEvent::InteractionChanged(InteractionKind::Draw));
    assert!(controller.selection().is_empty());
    controller.handle_form(FormEvent::InteractionChanged(InteractionKind::Modify));
    assert!(controller.selection().is_empty());
}

#[test]
fn point_draw_finishes_on_click() {
    let mut controller = InteractionController::new();
    let mut source = FeatureSource::new();
    let outcome =
        controller.handle_pointer(&event(PointerKind::Click, 100.0, 200.0), &mut source, 1.0);
    let Some(EditEvent::DrawEnd(feature)) = outcome.edit else {
        panic!("expected a finished point");
    };
    assert_eq!(feature.geometry, Geometry::Point(Coord::new(100.0, 200.0)));
    assert!(feature.id.is_none());
}

#[test]
fn line_finishes_on_last_vertex_click() {
    let mut controller = InteractionController::new();
    controller.handle_form(FormEvent::DrawTypeChanged(GeometryType::LineString));
    let mut source = FeatureSource::new();
    for (x, y) in [(0.0, 0.0), (10.0, 0.0)] {
        let outcome = controller.handle_pointer(&event(PointerKind::Click, x, y), &mut source, 1.0);
        assert!(outcome.edit.is_none());
    }
    assert_eq!(controller.sketch().map(|s| s.vertices().len()), Some(2));
    let outcome =
        controller.handle_pointer(&event(PointerKind::DoubleClick, 10.2, 0.0), &mut source, 1.0);
    let Some(EditEvent::DrawEnd(feature)) = outcome.edit else {
        panic!("expected a finished line");
    };
    assert_eq!(
        feature.geometry,
        Geometry::LineString(vec![Coord::new(0.0, 0.0), Coord::new(10.0, 0.0)])
    );
    assert_eq!(controller.sketch().map(DrawGesture::is_drawing), Some(false));
}

#[test]
fn repeated_clicks_on_a_short_sketch_add_no_vertex() {
    let mut controller = InteractionController::new();
    controller.handle_form(FormEvent::DrawTypeChanged(GeometryType::LineString));
    let mut source = FeatureSource::new();
    for kind in [PointerKind::Click, PointerKind::DoubleClick, PointerKind::Click] {
        let outcome = controller.handle_pointer(&event(kind, 0.0, 0.0), &mut source, 1.0);
        assert!(outcome.edit.is_none(), "{kind:?} finished a degenerate line");
    }
    assert_eq!(controller.sketch().map(|s| s.vertices().len()), Some(1));

    controller.handle_form(FormEvent::DrawTypeChanged(GeometryType::Polygon));
    for (x, y) in [(0.0, 0.0), (10.0, 0.0), (10.3, 0.2), (10.0, 0.0)] {
        let outcome = controller.handle_pointer(&event(PointerKind::Click, x, y), &mut source, 1.0);
        assert!(outcome.edit.is_none());
    }
    assert_eq!(
        controller.sketch().map(DrawGesture::vertices),
        Some(&[Coord::new(0.0, 0.0), Coord::new(10.0, 0.0)][..])
    );
}

#[test]
fn polygon_closes_on_first_vertex_and_escape_aborts() {
    let mut controller = InteractionController::new();
    controller.handle_form(FormEvent::DrawTypeChanged(GeometryType::Polygon));
    let mut source = FeatureSource::new();
    for (x, y) in [(0.0, 0.0), (10.0, 0.0), (10.0, 10.0)] {
        controller.handle_pointer(&event(PointerKind::Click, x, y), &mut source, 1.0);
    }
    let outcome = controller.handle_pointer(&event(PointerKind::Click, 0.1, 0.1), &mut source, 1.0);
    let Some(EditEvent::DrawEnd(feature)) = outcome.edit else {
        panic!("expected a finished polygon");
    };
    let Geometry::Polygon(rings) = feature.geometry else {
        panic!("polygon expected");
    };
    assert_eq!(rings[0].len(), 4);
    assert_eq!(rings[0].first(), rings[0].last());

    controller.handle_pointer(&event(PointerKind::Click, 5.0, 5.0), &mut source, 1.0);
    controller.abort();
    assert_eq!(controller.sketch().map(DrawGesture::is_drawing), Some(false));
}

#[test]
fn switching_mode_discards_unfinished_sketch() {
    let mut controller = InteractionController::new();
    controller.handle_form(FormEvent::DrawTypeChanged(GeometryType::LineString));
    let mut source = FeatureSource::new();
    controller.handle_pointer(&event(PointerKind::Click, 0.0, 0.0), &mut source, 1.0);
    controller.handle_form(FormEvent::InteractionChanged(InteractionKind::Modify));
    controller.handle_form(FormEvent::InteractionChanged(InteractionKind::Draw));
    assert_eq!(controller.sketch().map(DrawGesture::is_drawing), Some(false));
}

#[test]
fn drag_in_draw_mode_is_left_to_panning() {
    let mut controller = InteractionController::new();
    let mut source = FeatureSource::new();
    for kind in [PointerKind::DragStart, PointerKind::Drag, PointerKind::DragEnd] {
        let outcome = controller.handle_pointer(&event(kind, 3.0, 3.0), &mut source, 1.0);
        assert!(!outcome.consumed);
    }
}

#[test]
fn vertex_drag_reports_the_whole_selection() {
    let mut controller = InteractionController::new();
    let mut source = FeatureSource::new();
    let key = source
        .add_feature(
            Feature::new(Geometry::LineString(vec![
                Coord::new(0.0, 0.0),
                Coord::new(10.0, 0.0),
            ]))
            .with_id("A"),
        )
        .expect("added");
    controller.handle_form(FormEvent::InteractionChanged(InteractionKind::Modify));
    controller.handle_pointer(&event(PointerKind::Click, 5.0, 0.0), &mut source, 1.0);
    assert_eq!(controller.selection(), &[key]);

    let start =
        controller.handle_pointer(&event(PointerKind::DragStart, 10.0, 0.5), &mut source, 1.0);
    assert!(start.consumed);
    assert_eq!(controller.dragging_feature(), Some(key));
    controller.handle_pointer(&event(PointerKind::Drag, 12.0, 3.0), &mut source, 1.0);
    let end = controller.handle_pointer(&event(PointerKind::DragEnd, 15.0, 5.0), &mut source, 1.0);
    assert_eq!(end.edit, Some(EditEvent::ModifyEnd(vec![key])));
    assert_eq!(
        source.get(key).map(|f| f.geometry.vertex(VertexRef::new(0, 1))),
        Some(Some(Coord::new(15.0, 5.0)))
    );
    assert_eq!(controller.dragging_feature(), None);
}

#[test]
fn drag_on_edge_inserts_a_vertex() {
    let mut controller = InteractionController::new();
    let mut source = FeatureSource::new();
    let key = source
        .add_feature(Feature::new(Geometry::LineString(vec![
            Coord::new(0.0, 0.0),
            Coord::new(10.0, 0.0),
        ])))
        .expect("added");
    controller.handle_form(FormEvent::InteractionChanged(InteractionKind::Modify));
    controller.handle_pointer(&event(PointerKind::Click, 5.0, 0.0), &mut source, 1.0);
    controller.handle_pointer(&event(PointerKind::DragStart, 5.0, 0.2), &mut source, 1.0);
    controller.handle_pointer(&event(PointerKind::DragEnd, 5.0, 4.0), &mut source, 1.0);
    assert_eq!(
        source.get(key).map(|f| f.geometry.vertices().len()),
        Some(3)
    );
}

#[test]
fn drag_away_from_selection_is_not_consumed() {
    let mut controller = InteractionController::new();
    let mut source = FeatureSource::new();
    source.add_feature(Feature::new(Geometry::Point(Coord::new(0.0, 0.0))));
    controller.handle_form(FormEvent::InteractionChanged(InteractionKind::Modify));
    let outcome =
        controller.handle_pointer(&event(PointerKind::DragStart, 50.0, 50.0), &mut source, 1.0);
    assert!(!outcome.consumed);
    let outcome =
        controller.handle_pointer(&event(PointerKind::DragEnd, 60.0, 60.0), &mut source, 1.0);
    assert!(outcome.edit.is_none());
}

#[test]
fn shift_click_toggles_and_plain_click_on_empty_clears() {
    let mut controller = InteractionController::new();
    let mut source = FeatureSource::new();
    let a = source
        .add_feature(Feature::new(Geometry::Point(Coord::new(0.0, 0.0))))
        .expect("added");
    let b = source
        .add_feature(Feature::new(Geometry::Point(Coord::new(20.0, 0.0))))
        .expect("added");
    let shift = Modifiers {
        shift: true,
        alt: false,
    };
    controller.handle_form(FormEvent::InteractionChanged(InteractionKind::Modify));
    controller.handle_pointer(&event(PointerKind::Click, 0.0, 0.0), &mut source, 1.0);
    controller.handle_pointer(
        &with_modifiers(PointerKind::Click, 20.0, 0.0, shift),
        &mut source,
        1.0,
    );
    assert_eq!(controller.selection(), &[a, b]);
    controller.handle_pointer(
        &with_modifiers(PointerKind::Click, 0.0, 0.0, shift),
        &mut source,
        1.0,
    );
    assert_eq!(controller.selection(), &[b]);
    controller.handle_pointer(&event(PointerKind::Click, 99.0, 99.0), &mut source, 1.0);
    assert!(controller.selection().is_empty());
}

#[test]
fn alt_click_removes_a_vertex() {
    let mut controller = InteractionController::new();
    let mut source = FeatureSource::new();
    let key = source
        .add_feature(Feature::new(Geometry::LineString(vec![
            Coord::new(0.0, 0.0),
            Coord::new(5.0, 5.0),
            Coord::new(10.0, 0.0),
        ])))
        .expect("added");
    let alt = Modifiers {
        shift: false,
        alt: true,
    };
    controller.handle_form(FormEvent::InteractionChanged(InteractionKind::Modify));
    controller.handle_pointer(&event(PointerKind::Click, 5.0, 5.0), &mut source, 1.0);
    let outcome = controller.handle_pointer(
        &with_modifiers(PointerKind::Click, 5.0, 5.0, alt),
        &mut source,
        1.0,
    );
    assert_eq!(outcome.edit, Some(EditEvent::ModifyEnd(vec![key])));
    assert_eq!(
        source.get(key).map(|f| f.geometry.vertices().len()),
        Some(2)
    );
}

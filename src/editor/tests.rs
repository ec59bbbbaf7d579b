use super::*;
use crate::interaction::{InteractionKind, Modifiers, PointerKind};
use crate::model::{Coord, Feature, Geometry, GeometryType};
use crate::sync::testing::RecordingTransport;
use crate::sync::{Mutation, SyncRequest};
use std::sync::mpsc::{self, Sender};

struct Harness {
    editor: Editor,
    transport: RecordingTransport,
    loaded_tx: Sender<LoadResult>,
}

fn harness() -> Harness {
    let transport = RecordingTransport::default();
    let sync = RemoteSync::new("http://svc.test", Box::new(transport.clone()));
    let (loaded_tx, loaded_rx) = mpsc::channel();
    let editor = Editor::new(sync, loaded_rx, "EPSG:3857", SnapAssist::new(true, 10.0), 6.0);
    Harness {
        editor,
        transport,
        loaded_tx,
    }
}

impl Harness {
    /// Seed features the way the service would deliver them.
    fn deliver(&mut self, features: Vec<Feature>) {
        self.loaded_tx
            .send(LoadResult {
                extent: Extent::new(-1000.0, -1000.0, 1000.0, 1000.0),
                outcome: Ok(features),
            })
            .expect("send");
        self.editor.poll_loaded();
    }

    fn pointer(&mut self, kind: PointerKind, x: f64, y: f64) -> bool {
        self.pointer_with(kind, x, y, Modifiers::default())
    }

    fn pointer_with(&mut self, kind: PointerKind, x: f64, y: f64, modifiers: Modifiers) -> bool {
        self.editor
            .handle_pointer(PointerEvent::new(kind, Coord::new(x, y), modifiers), 1.0)
    }
}

fn mutation_of(request: &SyncRequest) -> (Mutation, &FeatureId) {
    match request {
        SyncRequest::Mutate { op, id, .. } => (*op, id),
        SyncRequest::Select { .. } => panic!("expected a mutation, got {request:?}"),
    }
}

#[test]
fn drawn_point_gets_id_and_is_inserted() {
    let mut h = harness();
    h.pointer(PointerKind::Click, 100.0, 200.0);

    let features: Vec<&Feature> = h.editor.source().features().map(|(_, f)| f).collect();
    assert_eq!(features.len(), 1);
    let feature = features[0];
    assert_eq!(feature.geometry, Geometry::Point(Coord::new(100.0, 200.0)));
    let id = feature.id.clone().expect("generated id");

    let requests = h.transport.take();
    assert_eq!(requests.len(), 1);
    let (op, sent_id) = mutation_of(&requests[0]);
    assert_eq!(op, Mutation::Insert);
    assert_eq!(sent_id, &id);
    assert_eq!(requests[0].url(), "http://svc.test/insert");
    assert!(requests[0].body().expect("body").contains(&id.to_string()));
}

#[test]
fn every_drawn_feature_gets_its_own_id() {
    let mut h = harness();
    h.pointer(PointerKind::Click, 0.0, 0.0);
    h.pointer(PointerKind::Click, 500.0, 500.0);
    let ids: Vec<FeatureId> = h
        .transport
        .take()
        .iter()
        .map(|r| mutation_of(r).1.clone())
        .collect();
    assert_eq!(ids.len(), 2);
    assert_ne!(ids[0], ids[1]);
}

#[test]
fn vertex_drag_replaces_the_selected_feature_once() {
    let mut h = harness();
    h.deliver(vec![
        Feature::new(Geometry::LineString(vec![
            Coord::new(0.0, 0.0),
            Coord::new(100.0, 0.0),
        ]))
        .with_id("A"),
    ]);
    h.editor
        .handle_form(FormEvent::InteractionChanged(InteractionKind::Modify));
    h.pointer(PointerKind::Click, 50.0, 0.0);
    assert!(h.pointer(PointerKind::DragStart, 100.0, 1.0));
    h.pointer(PointerKind::Drag, 120.0, 30.0);
    h.pointer(PointerKind::DragEnd, 150.0, 50.0);

    let requests = h.transport.take();
    assert_eq!(requests.len(), 1);
    let (op, id) = mutation_of(&requests[0]);
    assert_eq!(op, Mutation::Replace);
    assert_eq!(id, &FeatureId::from("A"));
    let body = requests[0].body().expect("body");
    assert!(body.contains("[150.0,50.0]"), "{body}");
}

#[test]
fn delete_removes_locally_and_only_sends_ids() {
    let mut h = harness();
    h.deliver(vec![
        Feature::new(Geometry::Point(Coord::new(0.0, 0.0))).with_id("B"),
        Feature::new(Geometry::Point(Coord::new(200.0, 0.0))),
        Feature::new(Geometry::Point(Coord::new(400.0, 0.0))).with_id("C"),
    ]);
    h.editor
        .handle_form(FormEvent::InteractionChanged(InteractionKind::Modify));
    let shift = Modifiers {
        shift: true,
        alt: false,
    };
    h.pointer(PointerKind::Click, 0.0, 0.0);
    h.pointer_with(PointerKind::Click, 200.0, 0.0, shift);
    assert_eq!(h.editor.controller().selection().len(), 2);

    assert!(h.editor.handle_key(EditorKey::Delete));
    assert_eq!(h.editor.source().len(), 1);
    assert!(h.editor.controller().selection().is_empty());

    let requests = h.transport.take();
    assert_eq!(requests.len(), 1);
    let (op, id) = mutation_of(&requests[0]);
    assert_eq!(op, Mutation::Delete);
    assert_eq!(id, &FeatureId::from("B"));

    assert!(!h.editor.handle_key(EditorKey::Delete));
}

#[test]
fn unloaded_view_is_queried_once() {
    let mut h = harness();
    let view = Extent::new(0.0, 0.0, 100.0, 100.0);
    assert!(h.editor.load_view(view, 1.0));
    let requests = h.transport.take();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].method(), "GET");
    assert_eq!(
        requests[0].url(),
        "http://svc.test/select?rect=0,0,100,100&proj=EPSG:3857"
    );

    assert!(!h.editor.load_view(Extent::new(10.0, 10.0, 50.0, 50.0), 0.5));
    assert!(!h.editor.load_view(view, 1.0));
    assert!(h.transport.take().is_empty());
}

#[test]
fn changing_service_forgets_loaded_extents() {
    let mut h = harness();
    let view = Extent::new(0.0, 0.0, 100.0, 100.0);
    h.editor.load_view(view, 1.0);
    assert!(!h.editor.set_base_url("http://svc.test/"));
    assert!(!h.editor.load_view(view, 1.0));
    assert!(h.editor.set_base_url("http://other.test"));
    assert!(h.editor.load_view(view, 1.0));
    let urls: Vec<String> = h
        .transport
        .take()
        .iter()
        .map(|r| r.url().to_string())
        .collect();
    assert_eq!(
        urls,
        [
            "http://svc.test/select?rect=0,0,100,100&proj=EPSG:3857",
            "http://other.test/select?rect=0,0,100,100&proj=EPSG:3857"
        ]
    );
}

#[test]
fn loaded_duplicates_are_ignored() {
    let mut h = harness();
    let feature = Feature::new(Geometry::Point(Coord::new(1.0, 1.0))).with_id("dup");
    h.deliver(vec![feature.clone()]);
    h.deliver(vec![feature]);
    assert_eq!(h.editor.source().len(), 1);
}

#[test]
fn drawing_snaps_onto_existing_vertices() {
    let mut h = harness();
    h.deliver(vec![
        Feature::new(Geometry::Point(Coord::new(10.0, 10.0))).with_id("P"),
    ]);
    h.editor
        .handle_form(FormEvent::DrawTypeChanged(GeometryType::Point));
    h.pointer(PointerKind::Click, 14.0, 13.0);
    let drawn = h
        .editor
        .source()
        .features()
        .map(|(_, f)| f)
        .find(|f| f.id != Some(FeatureId::from("P")))
        .expect("drawn point");
    assert_eq!(drawn.geometry, Geometry::Point(Coord::new(10.0, 10.0)));
}

#[test]
fn escape_abandons_the_sketch_without_requests() {
    let mut h = harness();
    h.editor
        .handle_form(FormEvent::DrawTypeChanged(GeometryType::Polygon));
    h.pointer(PointerKind::Click, 0.0, 0.0);
    h.pointer(PointerKind::Click, 100.0, 0.0);
    assert!(h.editor.handle_key(EditorKey::Escape));
    assert!(!h.editor.handle_key(EditorKey::Escape));
    assert!(h.editor.source().is_empty());
    assert!(h.transport.take().is_empty());
}

#[test]
fn locked_editor_only_pans() {
    let mut h = harness();
    h.editor.set_editing(false);
    assert!(!h.pointer(PointerKind::Click, 5.0, 5.0));
    assert!(h.editor.source().is_empty());
    h.editor.set_editing(true);
    assert!(h.pointer(PointerKind::Click, 5.0, 5.0));
    assert_eq!(h.editor.source().len(), 1);
}

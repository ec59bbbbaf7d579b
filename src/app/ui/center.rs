//! Central map canvas: pointer routing, panning, zooming and painting.

use super::super::MapEditorApp;
use super::super::interaction::CanvasDrag;
use super::common::MapTransform;
use crate::interaction::{Modifiers, PointerEvent, PointerKind};
use crate::model::{Extent, Geometry, GeometryType};
use crate::snap::SnapKind;
use egui::{CornerRadius, PointerButton, Pos2, Rect, Sense, Shape, Stroke, StrokeKind, vec2};

/// Scroll distance (points) that counts as one zoom step.
const SCROLL_NOTCH: f32 = 50.0;
const SNAP_RING_PAD: f32 = 3.0;

impl MapEditorApp {
    pub(crate) fn ui_central_map(&mut self, ui: &mut egui::Ui) {
        let (response, painter) = ui.allocate_painter(ui.available_size(), Sense::click_and_drag());
        let rect = response.rect;
        painter.rect_filled(rect, CornerRadius::ZERO, ui.visuals().extreme_bg_color);

        self.handle_scroll_zoom(ui, &response);
        self.handle_canvas_pointer(ui, &response);

        let visible = self
            .view
            .visible_extent([f64::from(rect.width()), f64::from(rect.height())]);
        // Queries wait until the pan gesture is over.
        if !self.canvas.panning() {
            self.editor.load_view(visible, self.view.resolution());
        }

        let transform = MapTransform::new(&self.view, rect);
        self.paint_features(&painter, &transform, &visible);
        self.paint_sketch(&painter, &transform);
        self.paint_snap_indicator(&painter, &transform);
    }

    fn handle_scroll_zoom(&mut self, ui: &egui::Ui, response: &egui::Response) {
        if !response.hovered() {
            return;
        }
        let scroll = ui.input(|i| i.raw_scroll_delta.y);
        if scroll.abs() <= f32::EPSILON {
            return;
        }
        let Some(pos) = response.hover_pos() else {
            return;
        };
        let anchor = MapTransform::new(&self.view, response.rect).to_map(pos);
        let steps = f64::from(scroll / SCROLL_NOTCH * self.config.scroll_zoom_factor());
        self.view.zoom_about(self.view.zoom + steps, anchor);
    }

    fn handle_canvas_pointer(&mut self, ui: &egui::Ui, response: &egui::Response) {
        let transform = MapTransform::new(&self.view, response.rect);
        let resolution = self.view.resolution();
        let modifiers = ui.input(|i| Modifiers {
            shift: i.modifiers.shift,
            alt: i.modifiers.alt,
        });
        let event = |kind: PointerKind, pos: Pos2| {
            PointerEvent::new(kind, transform.to_map(pos), modifiers)
        };
        let pointer_pos = response
            .interact_pointer_pos()
            .or_else(|| ui.input(|i| i.pointer.latest_pos()));

        if response.drag_started_by(PointerButton::Primary)
            && let Some(pos) = ui.input(|i| i.pointer.press_origin()).or(pointer_pos)
        {
            let consumed = self
                .editor
                .handle_pointer(event(PointerKind::DragStart, pos), resolution);
            self.canvas.drag = Some(if consumed {
                CanvasDrag::Edit
            } else {
                CanvasDrag::Pan
            });
        }

        if response.dragged_by(PointerButton::Primary) {
            match self.canvas.drag {
                Some(CanvasDrag::Pan) => {
                    let delta = response.drag_delta();
                    self.view
                        .pan_by_pixels(f64::from(delta.x), f64::from(delta.y));
                }
                Some(CanvasDrag::Edit) => {
                    if let Some(pos) = pointer_pos {
                        self.editor
                            .handle_pointer(event(PointerKind::Drag, pos), resolution);
                    }
                }
                None => {}
            }
        }

        if response.drag_stopped_by(PointerButton::Primary)
            && self.canvas.drag.take() == Some(CanvasDrag::Edit)
            && let Some(pos) = pointer_pos.or(self.canvas.last_hover)
        {
            self.editor
                .handle_pointer(event(PointerKind::DragEnd, pos), resolution);
        }

        let click = if response.double_clicked_by(PointerButton::Primary) {
            Some(PointerKind::DoubleClick)
        } else if response.clicked_by(PointerButton::Primary) {
            Some(PointerKind::Click)
        } else {
            None
        };
        if let Some(kind) = click
            && let Some(pos) = pointer_pos
        {
            self.editor.handle_pointer(event(kind, pos), resolution);
        }

        let hover = response.hover_pos();
        if hover != self.canvas.last_hover {
            self.canvas.last_hover = hover;
            self.ui.pointer_map = hover.map(|pos| transform.to_map(pos));
            if let Some(pos) = hover
                && self.canvas.drag.is_none()
            {
                self.editor
                    .handle_pointer(event(PointerKind::Move, pos), resolution);
            }
        }
    }

    fn paint_features(&self, painter: &egui::Painter, transform: &MapTransform, visible: &Extent) {
        let radius = self.config.vertex.radius();
        let view = visible.buffered(f64::from(radius) * self.view.resolution());
        let selection = self.editor.controller().selection();
        let fill = self.config.feature_fill.color32();

        for (key, feature) in self.editor.source().features_in(&view) {
            let selected = selection.contains(&key);
            let line = if selected {
                self.config.selected_line.stroke()
            } else {
                self.config.feature_line.stroke()
            };
            match &feature.geometry {
                Geometry::Point(c) => {
                    painter.circle(transform.to_screen(*c), radius, fill, line);
                }
                Geometry::LineString(coords) => {
                    let points = coords.iter().map(|c| transform.to_screen(*c)).collect();
                    painter.add(Shape::line(points, line));
                }
                Geometry::Polygon(rings) => {
                    for ring in rings {
                        let points: Vec<Pos2> =
                            ring.iter().map(|c| transform.to_screen(*c)).collect();
                        // egui only fills convex shapes; holes are never filled.
                        if rings.len() == 1 && is_convex(&points) {
                            painter.add(Shape::convex_polygon(points.clone(), fill, Stroke::NONE));
                        }
                        painter.add(Shape::closed_line(points, line));
                    }
                }
            }
            if selected {
                for (_, vertex) in feature.geometry.vertices() {
                    painter.circle_filled(
                        transform.to_screen(vertex),
                        radius,
                        self.config.vertex.color32(),
                    );
                }
            }
        }
    }

    fn paint_sketch(&self, painter: &egui::Painter, transform: &MapTransform) {
        let Some(sketch) = self.editor.controller().sketch() else {
            return;
        };
        if !sketch.is_drawing() {
            return;
        }
        let stroke = self.config.sketch_line.stroke();
        let mut points: Vec<Pos2> = sketch
            .vertices()
            .iter()
            .map(|c| transform.to_screen(*c))
            .collect();
        if let Some(tip) = sketch.tip() {
            points.push(transform.to_screen(tip));
        }
        if sketch.kind() == GeometryType::Polygon
            && let Some(first) = points.first().copied()
        {
            points.push(first);
        }
        for c in sketch.vertices() {
            painter.circle_filled(
                transform.to_screen(*c),
                self.config.vertex.radius() * 0.7,
                stroke.color,
            );
        }
        painter.add(Shape::line(points, stroke));
    }

    fn paint_snap_indicator(&self, painter: &egui::Painter, transform: &MapTransform) {
        if self.canvas.last_hover.is_none() && self.canvas.drag.is_none() {
            return;
        }
        let Some(candidate) = self.editor.snap().indicator() else {
            return;
        };
        let pos = transform.to_screen(candidate.coord);
        let size = self.config.vertex.radius() + SNAP_RING_PAD;
        let stroke = Stroke::new(2.0, self.config.vertex.color32());
        match candidate.kind {
            SnapKind::Vertex => {
                painter.circle_stroke(pos, size, stroke);
            }
            SnapKind::Edge => {
                painter.rect_stroke(
                    Rect::from_center_size(pos, vec2(size * 1.6, size * 1.6)),
                    CornerRadius::ZERO,
                    stroke,
                    StrokeKind::Middle,
                );
            }
        }
    }
}

/// Whether a closed screen-space ring turns the same way at every corner.
fn is_convex(ring: &[Pos2]) -> bool {
    let open = &ring[..ring.len().saturating_sub(1)];
    let n = open.len();
    if n < 3 {
        return false;
    }
    let mut turn: Option<bool> = None;
    for (i, a) in open.iter().enumerate() {
        let b = open[(i + 1) % n];
        let c = open[(i + 2) % n];
        let ab = b - *a;
        let bc = c - b;
        let cross = ab.x.mul_add(bc.y, -(ab.y * bc.x));
        if cross.abs() <= f32::EPSILON {
            continue;
        }
        let left = cross > 0.0;
        match turn {
            None => turn = Some(left),
            Some(prev) if prev != left => return false,
            Some(_) => {}
        }
    }
    true
}

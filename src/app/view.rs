use std::collections::HashMap;

use eframe::egui::{self, vec2, Align2, Color32, FontId, Pos2, Rect, Sense, Stroke, Ui};

use crate::graph::NodeKind;
use crate::util::{hex_color_or, with_opacity};

use super::render_utils::{
    circle_visible, draw_background, screen_to_world, world_to_screen, CANVAS_CENTER,
};
use super::ViewModel;

const EDGE_COLOR: Color32 = Color32::from_rgb(144, 144, 168);
const LABEL_COLOR: Color32 = Color32::from_rgb(240, 240, 245);

impl ViewModel {
    fn handle_graph_zoom(&mut self, ui: &Ui, rect: Rect, response: &egui::Response) {
        if !response.hovered() {
            return;
        }

        let scroll = ui.input(|input| input.raw_scroll_delta.y);
        if scroll.abs() <= f32::EPSILON {
            return;
        }

        let pointer = ui
            .input(|input| input.pointer.hover_pos())
            .unwrap_or_else(|| rect.center());
        let world_before = screen_to_world(rect, self.pan, self.zoom, pointer);

        let zoom_factor = (1.0 + (scroll * 0.0018)).clamp(0.85, 1.15);
        self.zoom = (self.zoom * zoom_factor).clamp(0.2, 6.0);
        self.pan = pointer - rect.center() - (world_before - CANVAS_CENTER) * self.zoom;
    }

    fn handle_graph_pan(&mut self, response: &egui::Response) {
        if response.dragged() {
            self.pan += response.drag_delta();
        }
    }

    fn node_at(&self, pointer: Pos2, screen_positions: &[Pos2]) -> Option<usize> {
        let mut best: Option<(usize, f32)> = None;
        for (index, node) in self.display_graph.nodes.iter().enumerate() {
            let radius = (node.radius * self.zoom).max(8.0);
            let distance = screen_positions[index].distance(pointer);
            if distance <= radius && best.is_none_or(|(_, closest)| distance < closest) {
                best = Some((index, distance));
            }
        }
        best.map(|(index, _)| index)
    }

    pub(in crate::app) fn draw_graph(&mut self, ui: &mut Ui) {
        if self.graph_dirty {
            self.rebuild_graph();
        }

        let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click_and_drag());
        let painter = ui.painter_at(rect);

        draw_background(&painter, rect, self.pan, self.zoom);
        self.handle_graph_zoom(ui, rect, &response);
        self.handle_graph_pan(&response);

        if self.display_graph.nodes.is_empty() {
            painter.text(
                rect.center(),
                Align2::CENTER_CENTER,
                "Add people to see the relationship graph",
                FontId::proportional(14.0),
                Color32::from_gray(150),
            );
            return;
        }

        let pan = self.pan;
        let zoom = self.zoom;

        let mut index_by_id = HashMap::with_capacity(self.display_graph.nodes.len());
        for (index, node) in self.display_graph.nodes.iter().enumerate() {
            index_by_id.insert(node.id.as_str(), index);
        }
        let screen_positions = self
            .display_graph
            .nodes
            .iter()
            .map(|node| world_to_screen(rect, pan, zoom, vec2(node.x, node.y)))
            .collect::<Vec<_>>();

        // Edges under nodes; an edge whose endpoint is missing is skipped.
        for edge in &self.display_graph.edges {
            let endpoints = (
                index_by_id.get(edge.source_id.as_str()),
                index_by_id.get(edge.target_id.as_str()),
            );
            let (Some(&source), Some(&target)) = endpoints else {
                continue;
            };
            painter.line_segment(
                [screen_positions[source], screen_positions[target]],
                Stroke::new(1.2, with_opacity(EDGE_COLOR, edge.opacity)),
            );
        }

        let pointer = ui.input(|input| input.pointer.hover_pos());
        let hovered = pointer.and_then(|pointer| {
            if rect.contains(pointer) {
                self.node_at(pointer, &screen_positions)
            } else {
                None
            }
        });

        let selected_node_id = self.selected.as_ref().map(|id| format!("person-{id}"));
        for (index, node) in self.display_graph.nodes.iter().enumerate() {
            let center = screen_positions[index];
            let radius = (node.radius * zoom).clamp(1.5, 90.0);
            if !circle_visible(rect, center, radius) {
                continue;
            }

            let fill = with_opacity(hex_color_or(&node.color, Color32::GRAY), node.opacity);
            painter.circle_filled(center, radius, fill);

            let is_selected = selected_node_id.as_deref() == Some(node.id.as_str());
            if is_selected || hovered == Some(index) {
                painter.circle_stroke(center, radius + 2.0, Stroke::new(1.5, Color32::WHITE));
            }

            if node.kind == NodeKind::Person && node.opacity >= 0.5 && zoom >= 0.55 {
                painter.text(
                    center + vec2(0.0, radius + 4.0),
                    Align2::CENTER_TOP,
                    &node.label,
                    FontId::proportional(12.0),
                    with_opacity(LABEL_COLOR, node.opacity),
                );
            }
        }

        if response.clicked()
            && let Some(pointer) = response.interact_pointer_pos()
        {
            let next = self.node_at(pointer, &screen_positions).and_then(|index| {
                let node = &self.display_graph.nodes[index];
                (node.kind == NodeKind::Person)
                    .then(|| node.id.trim_start_matches("person-").to_owned())
            });
            self.set_selected(next);
        }
    }
}

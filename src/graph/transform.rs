use std::collections::{HashMap, HashSet};

use log::warn;

use crate::data::{sentiment_color, Interaction, Person};

use super::physics::{run_simulation, PhysicsEdge, PhysicsNode, DEFAULT_ITERATIONS};

pub const MAX_INTERACTIONS: usize = 50;
pub const CANVAS_W: f32 = 600.0;
pub const CANVAS_H: f32 = 500.0;

const INTERACTION_NODE_RADIUS: f32 = 6.0;
const DIM_NODE_OPACITY: f32 = 0.1;
const DIM_EDGE_OPACITY: f32 = 0.05;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeKind {
    Person,
    Interaction,
}

#[derive(Clone, Debug)]
pub struct GraphNode {
    pub id: String,
    pub kind: NodeKind,
    pub label: String,
    pub color: String,
    pub radius: f32,
    pub opacity: f32,
    pub x: f32,
    pub y: f32,
}

#[derive(Clone, Debug)]
pub struct GraphEdge {
    pub id: String,
    pub source_id: String,
    pub target_id: String,
    pub opacity: f32,
}

#[derive(Clone, Debug, Default)]
pub struct GraphData {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

pub fn person_node_id(person_id: &str) -> String {
    format!("person-{person_id}")
}

pub fn interaction_node_id(interaction_id: &str) -> String {
    format!("interaction-{interaction_id}")
}

fn person_radius(closeness_level: u8) -> f32 {
    14.0 + f32::from(closeness_level.saturating_sub(1)) * 4.0
}

pub fn build_graph_data(people: &[Person], interactions: &[Interaction]) -> GraphData {
    build_graph_data_with(people, interactions, DEFAULT_ITERATIONS)
}

pub fn build_graph_data_with(
    people: &[Person],
    interactions: &[Interaction],
    iterations: usize,
) -> GraphData {
    if people.is_empty() {
        return GraphData::default();
    }

    // Most recent interactions only, to bound simulation cost.
    let mut recent = interactions.iter().collect::<Vec<_>>();
    recent.sort_by(|a, b| b.occurred_at.cmp(&a.occurred_at));
    recent.truncate(MAX_INTERACTIONS);

    let active_ids = recent
        .iter()
        .flat_map(|interaction| interaction.people.iter().map(|person| person.id.as_str()))
        .collect::<HashSet<_>>();

    // Small graphs show every person so isolated contacts stay visible;
    // large ones are restricted to people in the capped interaction set.
    let active_people = if people.len() <= MAX_INTERACTIONS {
        people.iter().collect::<Vec<_>>()
    } else {
        people
            .iter()
            .filter(|person| active_ids.contains(person.id.as_str()))
            .collect::<Vec<_>>()
    };
    let active_person_ids = active_people
        .iter()
        .map(|person| person.id.as_str())
        .collect::<HashSet<_>>();

    let mut nodes = active_people
        .iter()
        .map(|person| GraphNode {
            id: person_node_id(&person.id),
            kind: NodeKind::Person,
            label: person.display_name().to_owned(),
            color: person.relationship_type.color().to_owned(),
            radius: person_radius(person.closeness_level),
            opacity: 1.0,
            x: 0.0,
            y: 0.0,
        })
        .collect::<Vec<_>>();

    // Interactions with no participants cannot render a meaningful edge.
    nodes.extend(
        recent
            .iter()
            .filter(|interaction| !interaction.people.is_empty())
            .map(|interaction| GraphNode {
                id: interaction_node_id(&interaction.id),
                kind: NodeKind::Interaction,
                label: String::new(),
                color: sentiment_color(interaction.sentiment).to_owned(),
                radius: INTERACTION_NODE_RADIUS,
                opacity: 1.0,
                x: 0.0,
                y: 0.0,
            }),
    );

    let edges = recent
        .iter()
        .flat_map(|interaction| {
            interaction
                .people
                .iter()
                .filter(|person| active_person_ids.contains(person.id.as_str()))
                .map(|person| GraphEdge {
                    id: format!("edge-{}-{}", interaction.id, person.id),
                    source_id: interaction_node_id(&interaction.id),
                    target_id: person_node_id(&person.id),
                    opacity: 1.0,
                })
        })
        .collect::<Vec<_>>();

    let physics_nodes = nodes
        .iter()
        .map(|node| PhysicsNode {
            id: node.id.clone(),
            x: 0.0,
            y: 0.0,
            vx: 0.0,
            vy: 0.0,
            radius: node.radius,
        })
        .collect::<Vec<_>>();
    let physics_edges = edges
        .iter()
        .map(|edge| PhysicsEdge {
            source_id: edge.source_id.clone(),
            target_id: edge.target_id.clone(),
        })
        .collect::<Vec<_>>();

    let positioned = run_simulation(&physics_nodes, &physics_edges, CANVAS_W, CANVAS_H, iterations);
    let mut position_by_id = HashMap::with_capacity(positioned.len());
    for node in positioned {
        position_by_id.insert(node.id, (node.x, node.y));
    }

    for node in &mut nodes {
        if let Some(&(x, y)) = position_by_id.get(&node.id) {
            node.x = x;
            node.y = y;
        } else {
            warn!("node {} missing from simulation output", node.id);
            node.x = CANVAS_W / 2.0;
            node.y = CANVAS_H / 2.0;
        }
    }

    GraphData { nodes, edges }
}

/// Dims everything except the selected person and the interactions connected
/// to it. With no selection the vectors are handed back untouched, so callers
/// can rely on allocation identity to skip re-rendering.
pub fn apply_highlight(
    nodes: Vec<GraphNode>,
    edges: Vec<GraphEdge>,
    selected_person_id: Option<&str>,
) -> GraphData {
    let Some(person_id) = selected_person_id else {
        return GraphData { nodes, edges };
    };

    let selected_node_id = person_node_id(person_id);

    let connected = edges
        .iter()
        .filter(|edge| edge.source_id == selected_node_id || edge.target_id == selected_node_id)
        .map(|edge| {
            if edge.source_id == selected_node_id {
                edge.target_id.as_str()
            } else {
                edge.source_id.as_str()
            }
        })
        .collect::<HashSet<_>>();

    let highlighted_nodes = nodes
        .iter()
        .map(|node| {
            let lit = node.id == selected_node_id || connected.contains(node.id.as_str());
            GraphNode {
                opacity: if lit { 1.0 } else { DIM_NODE_OPACITY },
                ..node.clone()
            }
        })
        .collect::<Vec<_>>();

    let highlighted_edges = edges
        .iter()
        .map(|edge| {
            let lit = edge.source_id == selected_node_id || edge.target_id == selected_node_id;
            GraphEdge {
                opacity: if lit { 1.0 } else { DIM_EDGE_OPACITY },
                ..edge.clone()
            }
        })
        .collect::<Vec<_>>();

    GraphData {
        nodes: highlighted_nodes,
        edges: highlighted_edges,
    }
}

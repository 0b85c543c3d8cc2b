use std::collections::HashMap;

pub const DEFAULT_ITERATIONS: usize = 300;

const REPULSION_STRENGTH: f32 = 6000.0;
const SPRING_STRENGTH: f32 = 0.06;
const SPRING_REST_LENGTH: f32 = 110.0;
const GRAVITY_ALPHA: f32 = 0.015;
const DAMPING: f32 = 0.85;
const MIN_DIST: f32 = 1.0;

#[derive(Clone, Debug)]
pub struct PhysicsNode {
    pub id: String,
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub radius: f32,
}

#[derive(Clone, Debug)]
pub struct PhysicsEdge {
    pub source_id: String,
    pub target_id: String,
}

/// Runs the force-directed layout to completion and returns positioned
/// clones of the input nodes. Caller-supplied positions and velocities are
/// discarded; nodes are reseeded on a circle so no pair starts at zero
/// distance. Deterministic for identical inputs.
pub fn run_simulation(
    nodes: &[PhysicsNode],
    edges: &[PhysicsEdge],
    width: f32,
    height: f32,
    iterations: usize,
) -> Vec<PhysicsNode> {
    if nodes.is_empty() {
        return Vec::new();
    }

    let cx = width / 2.0;
    let cy = height / 2.0;
    let seed_radius = width.min(height) * 0.3;
    let count = nodes.len();

    let mut ns = nodes
        .iter()
        .enumerate()
        .map(|(index, node)| {
            let angle = std::f32::consts::TAU * index as f32 / count as f32;
            PhysicsNode {
                id: node.id.clone(),
                x: cx + seed_radius * angle.cos(),
                y: cy + seed_radius * angle.sin(),
                vx: 0.0,
                vy: 0.0,
                radius: node.radius,
            }
        })
        .collect::<Vec<_>>();

    let mut index_by_id = HashMap::with_capacity(count);
    for (index, node) in nodes.iter().enumerate() {
        index_by_id.insert(node.id.as_str(), index);
    }

    // Edges whose endpoints do not resolve are dropped up front.
    let edge_pairs = edges
        .iter()
        .filter_map(|edge| {
            let source = *index_by_id.get(edge.source_id.as_str())?;
            let target = *index_by_id.get(edge.target_id.as_str())?;
            Some((source, target))
        })
        .collect::<Vec<_>>();

    let mut fx = vec![0.0_f32; count];
    let mut fy = vec![0.0_f32; count];

    for _ in 0..iterations {
        fx.fill(0.0);
        fy.fill(0.0);

        // Coulomb repulsion, all pairs.
        for i in 0..count {
            for j in (i + 1)..count {
                let dx = ns[i].x - ns[j].x;
                let dy = ns[i].y - ns[j].y;
                let dist_sq = (dx * dx + dy * dy).max(MIN_DIST);
                let dist = dist_sq.sqrt();
                let force = REPULSION_STRENGTH / dist_sq;
                let ux = dx / dist;
                let uy = dy / dist;
                fx[i] += force * ux;
                fy[i] += force * uy;
                fx[j] -= force * ux;
                fy[j] -= force * uy;
            }
        }

        // Hookean springs along edges.
        for &(source, target) in &edge_pairs {
            let dx = ns[target].x - ns[source].x;
            let dy = ns[target].y - ns[source].y;
            let dist = (dx * dx + dy * dy).sqrt().max(MIN_DIST);
            let force = SPRING_STRENGTH * (dist - SPRING_REST_LENGTH);
            let ux = dx / dist;
            let uy = dy / dist;
            fx[source] += force * ux;
            fy[source] += force * uy;
            fx[target] -= force * ux;
            fy[target] -= force * uy;
        }

        // Weak pull toward the canvas center, per axis.
        for (index, node) in ns.iter().enumerate() {
            fx[index] += GRAVITY_ALPHA * (cx - node.x);
            fy[index] += GRAVITY_ALPHA * (cy - node.y);
        }

        for (index, node) in ns.iter_mut().enumerate() {
            node.vx = (node.vx + fx[index]) * DAMPING;
            node.vy = (node.vy + fy[index]) * DAMPING;
            node.x += node.vx;
            node.y += node.vy;
        }
    }

    ns
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(id: &str) -> PhysicsNode {
        PhysicsNode {
            id: id.to_owned(),
            x: 0.0,
            y: 0.0,
            vx: 0.0,
            vy: 0.0,
            radius: 10.0,
        }
    }

    fn edge(source: &str, target: &str) -> PhysicsEdge {
        PhysicsEdge {
            source_id: source.to_owned(),
            target_id: target.to_owned(),
        }
    }

    #[test]
    fn empty_input_yields_empty_output() {
        let positioned = run_simulation(&[], &[], 600.0, 500.0, DEFAULT_ITERATIONS);
        assert!(positioned.is_empty());
    }

    #[test]
    fn every_input_node_gets_a_position() {
        let nodes = vec![node("a"), node("b"), node("c")];
        let positioned = run_simulation(&nodes, &[], 600.0, 500.0, 50);
        assert_eq!(positioned.len(), 3);
        for out in &positioned {
            assert!(out.x.is_finite());
            assert!(out.y.is_finite());
        }
    }

    #[test]
    fn identical_inputs_produce_identical_output() {
        let nodes = vec![node("a"), node("b"), node("c"), node("d")];
        let edges = vec![edge("a", "b"), edge("b", "c")];

        let first = run_simulation(&nodes, &edges, 600.0, 500.0, DEFAULT_ITERATIONS);
        let second = run_simulation(&nodes, &edges, 600.0, 500.0, DEFAULT_ITERATIONS);

        for (lhs, rhs) in first.iter().zip(second.iter()) {
            assert_eq!(lhs.id, rhs.id);
            assert_eq!(lhs.x.to_bits(), rhs.x.to_bits());
            assert_eq!(lhs.y.to_bits(), rhs.y.to_bits());
        }
    }

    #[test]
    fn caller_positions_are_discarded_in_favor_of_circle_seeding() {
        let mut skewed = node("a");
        skewed.x = 9999.0;
        skewed.y = -9999.0;
        let nodes = vec![skewed, node("b")];

        let positioned = run_simulation(&nodes, &[], 600.0, 500.0, 0);
        // With zero iterations the output is exactly the seed circle.
        assert_eq!(positioned[0].x, 300.0 + 150.0);
        assert_eq!(positioned[0].y, 250.0);
    }

    #[test]
    fn springs_pull_connected_nodes_toward_rest_length() {
        let nodes = vec![node("a"), node("b")];
        let edges = vec![edge("a", "b")];

        let positioned = run_simulation(&nodes, &edges, 600.0, 500.0, DEFAULT_ITERATIONS);
        let dx = positioned[0].x - positioned[1].x;
        let dy = positioned[0].y - positioned[1].y;
        let dist = (dx * dx + dy * dy).sqrt();
        // Seeded 300 apart; the spring/repulsion balance settles well below
        // that and above hard overlap.
        assert!(dist > 50.0, "distance {dist}");
        assert!(dist < 250.0, "distance {dist}");
    }

    #[test]
    fn edges_to_unknown_nodes_are_ignored() {
        let nodes = vec![node("a"), node("b")];
        let edges = vec![edge("a", "missing")];
        let positioned = run_simulation(&nodes, &edges, 600.0, 500.0, 50);
        assert_eq!(positioned.len(), 2);
        for out in &positioned {
            assert!(out.x.is_finite());
        }
    }

    #[test]
    fn singleton_node_settles_near_canvas_center() {
        let positioned = run_simulation(&[node("a")], &[], 600.0, 500.0, DEFAULT_ITERATIONS);
        let out = &positioned[0];
        assert!((out.x - 300.0).abs() < 40.0, "x {}", out.x);
        assert!((out.y - 250.0).abs() < 40.0, "y {}", out.y);
    }
}

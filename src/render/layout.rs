//! Node placement. Every algorithm is a pure function of the graph, so the
//! same graph and algorithm always produce the same positions.

use crate::core::constants::layout::{
    CIRCLE_MIN_RADIUS, FORCE_FULL_SCHEDULE_NODES, FORCE_IDEAL_EDGE_LENGTH, FORCE_ITERATIONS,
    FORCE_MIN_ITERATIONS, NODE_HEIGHT, NODE_SEPARATION, NODE_WIDTH, RANK_SEPARATION,
};
use crate::core::{BridgeError, CodeGraph};
use petgraph::graph::NodeIndex;
use petgraph::visit::{depth_first_search, Bfs, DfsEvent, EdgeRef, VisitMap};
use petgraph::Direction;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LayoutAlgorithm {
    #[default]
    #[serde(alias = "dagre")]
    Hierarchical,
    #[serde(alias = "cose")]
    ForceDirected,
    #[serde(alias = "breadthfirst")]
    BreadthFirst,
    Circle,
}

impl LayoutAlgorithm {
    pub const ALL: [LayoutAlgorithm; 4] = [
        LayoutAlgorithm::Hierarchical,
        LayoutAlgorithm::ForceDirected,
        LayoutAlgorithm::BreadthFirst,
        LayoutAlgorithm::Circle,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LayoutAlgorithm::Hierarchical => "hierarchical",
            LayoutAlgorithm::ForceDirected => "force-directed",
            LayoutAlgorithm::BreadthFirst => "breadth-first",
            LayoutAlgorithm::Circle => "circle",
        }
    }
}

impl fmt::Display for LayoutAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LayoutAlgorithm {
    type Err = BridgeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hierarchical" | "dagre" => Ok(LayoutAlgorithm::Hierarchical),
            "force-directed" | "cose" => Ok(LayoutAlgorithm::ForceDirected),
            "breadth-first" | "breadthfirst" => Ok(LayoutAlgorithm::BreadthFirst),
            "circle" => Ok(LayoutAlgorithm::Circle),
            other => Err(BridgeError::InvalidRequest {
                reason: format!(
                    "unknown layout '{other}' (available: hierarchical, force-directed, breadth-first, circle)"
                ),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

pub type Positions = BTreeMap<String, Point>;

/// Axis-aligned box around a set of node centers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl Bounds {
    pub fn width(&self) -> f64 {
        self.x2 - self.x1
    }

    pub fn height(&self) -> f64 {
        self.y2 - self.y1
    }

    /// Bounding box of `points` grown by the node footprint and `padding`.
    /// `None` for an empty set.
    pub fn around<'a>(points: impl IntoIterator<Item = &'a Point>, padding: f64) -> Option<Self> {
        let mut points = points.into_iter();
        let first = points.next()?;
        let mut bounds = Bounds {
            x1: first.x,
            y1: first.y,
            x2: first.x,
            y2: first.y,
        };
        for p in points {
            bounds.x1 = bounds.x1.min(p.x);
            bounds.y1 = bounds.y1.min(p.y);
            bounds.x2 = bounds.x2.max(p.x);
            bounds.y2 = bounds.y2.max(p.y);
        }

        let dx = NODE_WIDTH / 2.0 + padding;
        let dy = NODE_HEIGHT / 2.0 + padding;
        Some(Bounds {
            x1: bounds.x1 - dx,
            y1: bounds.y1 - dy,
            x2: bounds.x2 + dx,
            y2: bounds.y2 + dy,
        })
    }
}

pub fn compute(graph: &CodeGraph, algorithm: LayoutAlgorithm) -> Positions {
    let points = match algorithm {
        LayoutAlgorithm::Hierarchical => hierarchical(graph),
        LayoutAlgorithm::BreadthFirst => breadth_first(graph),
        LayoutAlgorithm::Circle => circle(graph.node_count()),
        LayoutAlgorithm::ForceDirected => force_directed(graph),
    };

    graph
        .nodes()
        .iter()
        .zip(points)
        .map(|(node, point)| (node.id.clone(), point))
        .collect()
}

/// Lay out `rows` top to bottom, each row centered on x = 0.
fn place_rows(count: usize, rows: &[Vec<usize>]) -> Vec<Point> {
    let mut points = vec![Point::default(); count];
    let column = NODE_WIDTH + NODE_SEPARATION;
    let row_height = NODE_HEIGHT + RANK_SEPARATION;

    for (rank, row) in rows.iter().enumerate() {
        let offset = (row.len() as f64 - 1.0) / 2.0;
        for (slot, &node) in row.iter().enumerate() {
            points[node] = Point::new((slot as f64 - offset) * column, rank as f64 * row_height);
        }
    }
    points
}

/// Longest-path ranking along edge direction.
///
/// Back edges found by a depth-first walk in node order are ignored, which
/// breaks cycles deterministically. Reverse finishing order of that walk is a
/// topological order of what remains.
fn hierarchical(graph: &CodeGraph) -> Vec<Point> {
    let topology = graph.topology();
    let n = topology.node_count();

    let mut back_edges = HashSet::new();
    let mut finished = Vec::with_capacity(n);
    depth_first_search(topology, topology.node_indices(), |event| match event {
        DfsEvent::BackEdge(u, v) => {
            back_edges.insert((u, v));
        }
        DfsEvent::Finish(u, _) => finished.push(u),
        _ => {}
    });

    let mut rank = vec![0usize; n];
    for &node in finished.iter().rev() {
        for edge in topology.edges(node) {
            let target = edge.target();
            if target == node || back_edges.contains(&(node, target)) {
                continue;
            }
            rank[target.index()] = rank[target.index()].max(rank[node.index()] + 1);
        }
    }

    let depth = rank.iter().copied().max().map_or(0, |r| r + 1);
    let mut rows = vec![Vec::new(); depth];
    for (node, &r) in rank.iter().enumerate() {
        rows[r].push(node);
    }
    place_rows(n, &rows)
}

/// Rows by BFS distance from the roots (nodes whose only incoming edges are
/// self-loops). Nodes not reachable from any root seed a new tree at row 0.
fn breadth_first(graph: &CodeGraph) -> Vec<Point> {
    let topology = graph.topology();
    let n = topology.node_count();

    let roots = topology.node_indices().filter(|&node| {
        topology
            .neighbors_directed(node, Direction::Incoming)
            .all(|source| source == node)
    });
    let seeds: Vec<NodeIndex> = roots.chain(topology.node_indices()).collect();

    let Some(&first) = seeds.first() else {
        return Vec::new();
    };
    let mut level: Vec<Option<usize>> = vec![None; n];
    let mut order = Vec::with_capacity(n);
    // one walker for every tree, so its discovered set spans the forest
    let mut bfs = Bfs::new(topology, first);

    for seed in seeds {
        if level[seed.index()].is_some() {
            continue;
        }
        level[seed.index()] = Some(0);
        bfs.discovered.visit(seed);
        bfs.stack.clear();
        bfs.stack.push_back(seed);
        while let Some(node) = bfs.next(topology) {
            order.push(node.index());
            let next = level[node.index()].unwrap_or(0) + 1;
            for target in topology.neighbors(node) {
                if level[target.index()].is_none() {
                    level[target.index()] = Some(next);
                }
            }
        }
    }

    let depth = level.iter().flatten().copied().max().map_or(0, |d| d + 1);
    let mut rows = vec![Vec::new(); depth];
    for node in order {
        rows[level[node].unwrap_or(0)].push(node);
    }
    place_rows(n, &rows)
}

fn circle(count: usize) -> Vec<Point> {
    if count <= 1 {
        return vec![Point::default(); count];
    }
    let circumference = count as f64 * (NODE_WIDTH + NODE_SEPARATION) / 2.0;
    let radius = (circumference / (2.0 * PI)).max(CIRCLE_MIN_RADIUS);

    (0..count)
        .map(|i| {
            let angle = 2.0 * PI * i as f64 / count as f64 - PI / 2.0;
            Point::new(radius * angle.cos(), radius * angle.sin())
        })
        .collect()
}

/// Iterations for a graph of `n` nodes: the full schedule for small graphs,
/// then shrinking with `n` down to a floor so large graphs stay interactive.
fn force_iterations(n: usize) -> usize {
    if n <= FORCE_FULL_SCHEDULE_NODES {
        return FORCE_ITERATIONS;
    }
    (FORCE_ITERATIONS * FORCE_FULL_SCHEDULE_NODES / n).max(FORCE_MIN_ITERATIONS)
}

/// Fruchterman-Reingold seeded from the circle layout, with linear cooling.
///
/// Repulsion uses the grid variant: only pairs closer than twice the ideal
/// edge length push each other, found through a uniform grid of that cell
/// size.
fn force_directed(graph: &CodeGraph) -> Vec<Point> {
    let topology = graph.topology();
    let n = topology.node_count();
    let mut points = circle(n);
    if n < 2 {
        return points;
    }

    let k = FORCE_IDEAL_EDGE_LENGTH;
    let cutoff = 2.0 * k;
    let iterations = force_iterations(n);

    for iteration in 0..iterations {
        let temperature = k * (1.0 - iteration as f64 / iterations as f64);
        let mut disp = vec![(0.0f64, 0.0f64); n];

        let cell_of = |p: Point| ((p.x / cutoff).floor() as i64, (p.y / cutoff).floor() as i64);
        let mut grid: HashMap<(i64, i64), Vec<usize>> = HashMap::new();
        for (i, &p) in points.iter().enumerate() {
            grid.entry(cell_of(p)).or_default().push(i);
        }

        for i in 0..n {
            let (cx, cy) = cell_of(points[i]);
            for gx in cx - 1..=cx + 1 {
                for gy in cy - 1..=cy + 1 {
                    let Some(cell) = grid.get(&(gx, gy)) else {
                        continue;
                    };
                    for &j in cell.iter().filter(|&&j| j > i) {
                        let (dx, dy, dist) = separation(points[i], points[j], i, j);
                        if dist >= cutoff {
                            continue;
                        }
                        let force = k * k / dist;
                        let (fx, fy) = (dx / dist * force, dy / dist * force);
                        disp[i].0 += fx;
                        disp[i].1 += fy;
                        disp[j].0 -= fx;
                        disp[j].1 -= fy;
                    }
                }
            }
        }

        for edge in topology.edge_references() {
            let (s, t) = (edge.source().index(), edge.target().index());
            if s == t {
                continue;
            }
            let (dx, dy, dist) = separation(points[s], points[t], s, t);
            let force = dist * dist / k;
            let (fx, fy) = (dx / dist * force, dy / dist * force);
            disp[s].0 -= fx;
            disp[s].1 -= fy;
            disp[t].0 += fx;
            disp[t].1 += fy;
        }

        for (point, (dx, dy)) in points.iter_mut().zip(disp) {
            let length = (dx * dx + dy * dy).sqrt();
            if length > 0.0 {
                let step = length.min(temperature);
                point.x += dx / length * step;
                point.y += dy / length * step;
            }
        }
    }

    points
}

/// Vector from `b` to `a` and its length, never zero.
fn separation(a: Point, b: Point, i: usize, j: usize) -> (f64, f64, f64) {
    let (mut dx, mut dy) = (a.x - b.x, a.y - b.y);
    let mut dist = (dx * dx + dy * dy).sqrt();
    if dist < 0.01 {
        // coincident nodes: push apart along a direction fixed by their indices
        let angle = (i * 31 + j * 17) as f64;
        dx = angle.cos() * 0.01;
        dy = angle.sin() * 0.01;
        dist = 0.01;
    }
    (dx, dy, dist)
}

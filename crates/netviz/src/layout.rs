use crate::error::{Result, ViewerError};
use eframe::egui::{self, Pos2, Rect, Vec2};
use egui_graphs::{DisplayEdge, DisplayNode, Graph, Layout, LayoutState};
use petgraph::EdgeType;
use petgraph::graph::IndexType;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, VecDeque};
use std::f32::consts::PI;

/// Layout name meaning "do not run any algorithm".
pub const NONE_LAYOUT: &str = "null";

/// Last layout requested for a panel, with the box it was constrained to.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutDescriptor {
    pub name: String,
    pub bounding_box: Option<Rect>,
}

impl LayoutDescriptor {
    pub fn none() -> Self {
        Self::named(NONE_LAYOUT)
    }

    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            bounding_box: None,
        }
    }

    pub fn is_none(&self) -> bool {
        self.name == NONE_LAYOUT
    }
}

impl Default for LayoutDescriptor {
    fn default() -> Self {
        Self::none()
    }
}

/// Nodes are identified by their position in the input; `edges` holds
/// pairs of such positions.
#[derive(Debug, Clone, Copy)]
pub struct LayoutInput<'a> {
    pub count: usize,
    pub edges: &'a [(usize, usize)],
    pub bounds: Rect,
}

impl LayoutInput<'_> {
    fn degrees(&self) -> Vec<usize> {
        let mut degrees = vec![0; self.count];
        for &(a, b) in self.edges {
            degrees[a] += 1;
            degrees[b] += 1;
        }
        degrees
    }

    fn neighbours(&self) -> Vec<Vec<usize>> {
        let mut adjacency = vec![Vec::new(); self.count];
        for &(a, b) in self.edges {
            if a != b {
                adjacency[a].push(b);
                adjacency[b].push(a);
            }
        }
        adjacency
    }
}

pub trait LayoutAlgorithm: Send + Sync {
    fn name(&self) -> &str;

    /// One position per input node, in input order, inside `input.bounds`.
    fn positions(&self, input: &LayoutInput<'_>) -> Vec<Pos2>;
}

/// Square box large enough for `count` nodes at the configured spacing.
pub fn default_bounds(count: usize, spacing: f32) -> Rect {
    let side = spacing * (count.max(1) as f32).sqrt().ceil();
    Rect::from_min_size(Pos2::ZERO, Vec2::splat(side))
}

// ------------------------------------------------------------------
// Algorithms
// ------------------------------------------------------------------

pub struct GridLayout;

impl LayoutAlgorithm for GridLayout {
    fn name(&self) -> &str {
        "grid"
    }

    fn positions(&self, input: &LayoutInput<'_>) -> Vec<Pos2> {
        let n = input.count;
        if n == 0 {
            return Vec::new();
        }
        let bounds = input.bounds;
        let aspect = if bounds.height() > f32::EPSILON {
            bounds.width() / bounds.height()
        } else {
            1.0
        };
        let cols = ((n as f32 * aspect).sqrt().ceil() as usize).clamp(1, n);
        let rows = n.div_ceil(cols);
        let cell = Vec2::new(bounds.width() / cols as f32, bounds.height() / rows as f32);
        (0..n)
            .map(|i| {
                let (row, col) = (i / cols, i % cols);
                Pos2::new(
                    bounds.min.x + (col as f32 + 0.5) * cell.x,
                    bounds.min.y + (row as f32 + 0.5) * cell.y,
                )
            })
            .collect()
    }
}

pub struct CircleLayout;

impl LayoutAlgorithm for CircleLayout {
    fn name(&self) -> &str {
        "circle"
    }

    fn positions(&self, input: &LayoutInput<'_>) -> Vec<Pos2> {
        let n = input.count;
        let center = input.bounds.center();
        if n <= 1 {
            return vec![center; n];
        }
        let radius = 0.5 * input.bounds.width().min(input.bounds.height());
        // Start at top (-π/2) and go clockwise
        (0..n)
            .map(|i| {
                let angle = -PI / 2.0 + i as f32 * 2.0 * PI / n as f32;
                center + Vec2::angled(angle) * radius
            })
            .collect()
    }
}

/// Rings of equal degree, highest degree innermost.
pub struct ConcentricLayout;

impl LayoutAlgorithm for ConcentricLayout {
    fn name(&self) -> &str {
        "concentric"
    }

    fn positions(&self, input: &LayoutInput<'_>) -> Vec<Pos2> {
        let n = input.count;
        if n == 0 {
            return Vec::new();
        }
        let degrees = input.degrees();
        let mut rings: BTreeMap<std::cmp::Reverse<usize>, Vec<usize>> = BTreeMap::new();
        for (i, d) in degrees.iter().enumerate() {
            rings.entry(std::cmp::Reverse(*d)).or_default().push(i);
        }
        let rings: Vec<Vec<usize>> = rings.into_values().collect();

        let center = input.bounds.center();
        let half = 0.5 * input.bounds.width().min(input.bounds.height());
        let offset = if rings[0].len() > 1 { 1.0 } else { 0.0 };
        let step = half / (rings.len() as f32 - 1.0 + offset).max(1.0);

        let mut positions = vec![center; n];
        for (level, members) in rings.iter().enumerate() {
            let radius = step * (level as f32 + offset);
            for (k, &node) in members.iter().enumerate() {
                let angle = -PI / 2.0 + k as f32 * 2.0 * PI / members.len() as f32;
                positions[node] = center + Vec2::angled(angle) * radius;
            }
        }
        positions
    }
}

/// Layers by breadth-first depth; every component starts at the top.
pub struct BreadthFirstLayout;

impl LayoutAlgorithm for BreadthFirstLayout {
    fn name(&self) -> &str {
        "breadthfirst"
    }

    fn positions(&self, input: &LayoutInput<'_>) -> Vec<Pos2> {
        let n = input.count;
        if n == 0 {
            return Vec::new();
        }
        let adjacency = input.neighbours();
        let mut depth: Vec<Option<usize>> = vec![None; n];
        let mut layers: Vec<Vec<usize>> = Vec::new();
        for root in 0..n {
            if depth[root].is_some() {
                continue;
            }
            depth[root] = Some(0);
            let mut queue = VecDeque::from([root]);
            while let Some(node) = queue.pop_front() {
                let d = depth[node].unwrap_or(0);
                if layers.len() <= d {
                    layers.resize_with(d + 1, Vec::new);
                }
                layers[d].push(node);
                for &next in &adjacency[node] {
                    if depth[next].is_none() {
                        depth[next] = Some(d + 1);
                        queue.push_back(next);
                    }
                }
            }
        }

        let bounds = input.bounds;
        let layer_height = bounds.height() / layers.len() as f32;
        let mut positions = vec![bounds.center(); n];
        for (level, members) in layers.iter().enumerate() {
            let slot = bounds.width() / members.len() as f32;
            for (k, &node) in members.iter().enumerate() {
                positions[node] = Pos2::new(
                    bounds.min.x + (k as f32 + 0.5) * slot,
                    bounds.min.y + (level as f32 + 0.5) * layer_height,
                );
            }
        }
        positions
    }
}

pub struct RandomLayout {
    seed: u64,
}

impl RandomLayout {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }
}

impl LayoutAlgorithm for RandomLayout {
    fn name(&self) -> &str {
        "random"
    }

    fn positions(&self, input: &LayoutInput<'_>) -> Vec<Pos2> {
        let mut rng = StdRng::seed_from_u64(self.seed);
        let bounds = input.bounds;
        (0..input.count)
            .map(|_| {
                Pos2::new(
                    bounds.min.x + rng.random::<f32>() * bounds.width(),
                    bounds.min.y + rng.random::<f32>() * bounds.height(),
                )
            })
            .collect()
    }
}

// ------------------------------------------------------------------
// Registry
// ------------------------------------------------------------------

pub struct LayoutRegistry {
    algorithms: BTreeMap<String, Box<dyn LayoutAlgorithm>>,
}

impl LayoutRegistry {
    pub fn empty() -> Self {
        Self {
            algorithms: BTreeMap::new(),
        }
    }

    pub fn with_defaults(seed: u64) -> Self {
        let mut registry = Self::empty();
        registry.register(Box::new(GridLayout));
        registry.register(Box::new(CircleLayout));
        registry.register(Box::new(ConcentricLayout));
        registry.register(Box::new(BreadthFirstLayout));
        registry.register(Box::new(RandomLayout::new(seed)));
        registry
    }

    pub fn register(&mut self, algorithm: Box<dyn LayoutAlgorithm>) {
        self.algorithms.insert(algorithm.name().to_string(), algorithm);
    }

    pub fn get(&self, name: &str) -> Result<&dyn LayoutAlgorithm> {
        self.algorithms
            .get(name)
            .map(|a| a.as_ref())
            .ok_or_else(|| ViewerError::UnknownLayout(name.to_string()))
    }

    /// `Ok` for the none sentinel and for every registered name.
    pub fn validate(&self, descriptor: &LayoutDescriptor) -> Result<()> {
        if descriptor.is_none() {
            return Ok(());
        }
        self.get(&descriptor.name).map(|_| ())
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.algorithms.keys().map(String::as_str)
    }
}

impl Default for LayoutRegistry {
    fn default() -> Self {
        Self::with_defaults(42)
    }
}

// ------------------------------------------------------------------
// Renderer layout: positions are owned by the dispatcher
// ------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LayoutStateStatic {
    pub frames: u64,
}

impl LayoutState for LayoutStateStatic {}

/// Never moves nodes, so what the dispatcher computed is what is drawn.
#[derive(Debug, Clone, Default)]
pub struct LayoutStatic {
    state: LayoutStateStatic,
}

impl Layout<LayoutStateStatic> for LayoutStatic {
    fn from_state(state: LayoutStateStatic) -> impl Layout<LayoutStateStatic> {
        Self { state }
    }

    fn next<N, E, Ty, Ix, Dn, De>(&mut self, _g: &mut Graph<N, E, Ty, Ix, Dn, De>, _ui: &egui::Ui)
    where
        N: Clone,
        E: Clone,
        Ty: EdgeType,
        Ix: IndexType,
        Dn: DisplayNode<N, E, Ty, Ix>,
        De: DisplayEdge<N, E, Ty, Ix, Dn>,
    {
        self.state.frames = self.state.frames.wrapping_add(1);
    }

    fn state(&self) -> LayoutStateStatic {
        self.state.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(count: usize, edges: &[(usize, usize)]) -> LayoutInput<'_> {
        LayoutInput {
            count,
            edges,
            bounds: Rect::from_min_size(Pos2::new(10.0, 20.0), Vec2::new(200.0, 100.0)),
        }
    }

    #[test]
    fn test_grid_positions_are_distinct_and_bounded() {
        let layout = input(7, &[]);
        let positions = GridLayout.positions(&layout);
        assert_eq!(positions.len(), 7);
        for (i, p) in positions.iter().enumerate() {
            assert!(layout.bounds.contains(*p));
            for q in &positions[i + 1..] {
                assert!((*p - *q).length() > 1e-3);
            }
        }
    }

    #[test]
    fn test_circle_is_equidistant_from_center() {
        let layout = input(5, &[]);
        let center = layout.bounds.center();
        let positions = CircleLayout.positions(&layout);
        for p in &positions {
            assert!(((*p - center).length() - 50.0).abs() < 1e-3);
        }
        assert_eq!(CircleLayout.positions(&input(1, &[])), vec![center]);
    }

    #[test]
    fn test_concentric_puts_hub_in_the_middle() {
        let edges = [(0, 1), (0, 2), (0, 3)];
        let layout = input(4, &edges);
        let positions = ConcentricLayout.positions(&layout);
        assert!((positions[0] - layout.bounds.center()).length() < 1e-3);
        assert!((positions[1] - layout.bounds.center()).length() > 1.0);
    }

    #[test]
    fn test_breadthfirst_layers_follow_depth() {
        let edges = [(0, 1), (1, 2)];
        let positions = BreadthFirstLayout.positions(&input(3, &edges));
        assert!(positions[0].y < positions[1].y);
        assert!(positions[1].y < positions[2].y);
    }

    #[test]
    fn test_random_is_seeded() {
        let layout = input(4, &[]);
        let a = RandomLayout::new(7).positions(&layout);
        let b = RandomLayout::new(7).positions(&layout);
        assert_eq!(a, b);
        assert!(a.iter().all(|p| layout.bounds.expand(1e-3).contains(*p)));
    }

    #[test]
    fn test_registry_rejects_unknown_names() {
        let registry = LayoutRegistry::default();
        assert!(registry.get("grid").is_ok());
        assert!(matches!(
            registry.get("cose"),
            Err(ViewerError::UnknownLayout(name)) if name == "cose"
        ));
        assert!(registry.validate(&LayoutDescriptor::none()).is_ok());
        assert_eq!(registry.names().count(), 5);
    }
}

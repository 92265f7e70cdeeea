use crate::graph_view::VisualNode;
use eframe::egui::{
    self, Color32, FontFamily, FontId, Pos2, Shape, Stroke, Vec2,
    epaint::{CircleShape, TextShape},
};
use egui_graphs::{DisplayNode, DrawContext, NodeProps};
use petgraph::{EdgeType, stable_graph::IndexType};
use serde::{Deserialize, Serialize};
use std::f32::consts::PI;
use toxynet::{Color, NodeShape};

const LABEL_GAP: f32 = 4.0;
const LABEL_FONT: f32 = 13.0;
const BORDER_WIDTH: f32 = 2.0;
const IDLE_BORDER: Color32 = Color32::from_rgb(80, 80, 80);
const SELECTED_BORDER: Color32 = Color32::from_rgb(40, 40, 40);

/// Rendered attributes of a node. Everything except `highlight` is derived
/// from the node's data; `highlight` overrides the fill while set.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NodeStyle {
    pub fill: Color,
    pub border: Option<Color>,
    pub shape: NodeShape,
    pub highlight: Option<Color>,
    pub radius: f32,
    pub selected_border: f32,
    pub show_label: bool,
}

impl Default for NodeStyle {
    fn default() -> Self {
        Self {
            fill: Color::WHITE,
            border: None,
            shape: NodeShape::Ellipse,
            highlight: None,
            radius: 12.0,
            selected_border: 5.0,
            show_label: true,
        }
    }
}

pub fn to_color32(color: Color) -> Color32 {
    Color32::from_rgb(color.r, color.g, color.b)
}

fn label_top_left(
    ctx: &DrawContext,
    node_pos: Pos2,
    galley: &std::sync::Arc<egui::Galley>,
    radius: f32,
) -> Pos2 {
    let below = ctx.meta.canvas_to_screen_pos(node_pos)
        + Vec2::new(
            0.0,
            ctx.meta.canvas_to_screen_size(radius + LABEL_GAP),
        );
    Pos2::new(below.x - galley.size().x / 2.0, below.y)
}

fn polygon(center: Pos2, radius: f32, sides: usize, rotation: f32) -> Vec<Pos2> {
    (0..sides)
        .map(|k| {
            let angle = rotation + k as f32 * 2.0 * PI / sides as f32;
            center + Vec2::angled(angle) * radius
        })
        .collect()
}

/// Node drawn with the shape, fill and border of its [`NodeStyle`]; the
/// label sits under the node.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NetworkNodeShape {
    pos: Pos2,
    selected: bool,
    dragged: bool,
    hovered: bool,
    label_text: String,
    style: NodeStyle,
}

impl From<NodeProps<VisualNode>> for NetworkNodeShape {
    fn from(props: NodeProps<VisualNode>) -> Self {
        Self {
            pos: props.location(),
            selected: props.selected,
            dragged: props.dragged,
            hovered: props.hovered,
            label_text: props.label.clone(),
            style: props.payload.style,
        }
    }
}

impl<E: Clone, Ty: EdgeType, Ix: IndexType> DisplayNode<VisualNode, E, Ty, Ix>
    for NetworkNodeShape
{
    fn closest_boundary_point(&self, dir: Vec2) -> Pos2 {
        self.pos + dir.normalized() * self.style.radius
    }

    fn shapes(&mut self, ctx: &DrawContext) -> Vec<Shape> {
        let mut res = Vec::with_capacity(2);
        let center = ctx.meta.canvas_to_screen_pos(self.pos);
        let radius = ctx.meta.canvas_to_screen_size(self.style.radius);
        let fill = to_color32(self.style.highlight.unwrap_or(self.style.fill));
        let stroke = self.effective_stroke();

        res.push(match self.style.shape {
            NodeShape::Ellipse => CircleShape {
                center,
                radius,
                fill,
                stroke,
            }
            .into(),
            NodeShape::Rectangle => {
                Shape::convex_polygon(polygon(center, radius, 4, PI / 4.0), fill, stroke)
            }
            NodeShape::Triangle => {
                Shape::convex_polygon(polygon(center, radius, 3, -PI / 2.0), fill, stroke)
            }
            NodeShape::Diamond => {
                Shape::convex_polygon(polygon(center, radius, 4, 0.0), fill, stroke)
            }
            NodeShape::Pentagon => {
                Shape::convex_polygon(polygon(center, radius, 5, -PI / 2.0), fill, stroke)
            }
            NodeShape::Hexagon => {
                Shape::convex_polygon(polygon(center, radius, 6, 0.0), fill, stroke)
            }
        });

        if !self.should_show_label() {
            return res;
        }

        let text_color = ctx.ctx.style().visuals.text_color();
        let galley = ctx.ctx.fonts_mut(|f| {
            f.layout_no_wrap(
                self.label_text.clone(),
                FontId::new(LABEL_FONT, FontFamily::Proportional),
                text_color,
            )
        });
        let label_pos = label_top_left(ctx, self.pos, &galley, self.style.radius);
        res.push(TextShape::new(label_pos, galley, text_color).into());
        res
    }

    fn update(&mut self, state: &NodeProps<VisualNode>) {
        self.pos = state.location();
        self.selected = state.selected;
        self.dragged = state.dragged;
        self.hovered = state.hovered;
        self.label_text = state.label.clone();
        self.style = state.payload.style;
    }

    fn is_inside(&self, pos: Pos2) -> bool {
        (pos - self.pos).length() <= self.style.radius
    }
}

impl NetworkNodeShape {
    fn should_show_label(&self) -> bool {
        self.style.show_label || self.selected || self.dragged || self.hovered
    }

    fn effective_stroke(&self) -> Stroke {
        let border = self.style.border.map(to_color32);
        if self.selected {
            Stroke::new(
                self.style.selected_border,
                border.unwrap_or(SELECTED_BORDER),
            )
        } else {
            Stroke::new(BORDER_WIDTH, border.unwrap_or(IDLE_BORDER))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_polygon_vertices_lie_on_radius() {
        let center = Pos2::new(3.0, 4.0);
        let points = polygon(center, 10.0, 5, -PI / 2.0);
        assert_eq!(points.len(), 5);
        for p in points {
            assert!(((p - center).length() - 10.0).abs() < 1e-4);
        }
    }

    #[test]
    fn test_selected_stroke_uses_configured_width() {
        let shape = NetworkNodeShape {
            pos: Pos2::ZERO,
            selected: true,
            dragged: false,
            hovered: false,
            label_text: String::new(),
            style: NodeStyle {
                border: Some(Color::rgb(1, 2, 3)),
                selected_border: 5.0,
                ..NodeStyle::default()
            },
        };
        let stroke = shape.effective_stroke();
        assert_eq!(stroke.width, 5.0);
        assert_eq!(stroke.color, Color32::from_rgb(1, 2, 3));
        assert!(shape.should_show_label());
    }
}

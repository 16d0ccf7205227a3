// Drawable objects and the shape family each one is judged as.
use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ShapeCategory {
    Round,
    Rectangular,
    Triangular,
    CrossStar,
    VerticalElongated,
    ArrowLightning,
    Organic,
    Radiant,
    Crescent,
    Generic,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Target {
    pub id: &'static str,
    pub name: &'static str,
    pub category: ShapeCategory,
}

const fn target(id: &'static str, name: &'static str, category: ShapeCategory) -> Target {
    Target { id, name, category }
}

use ShapeCategory::*;

pub const TARGETS: &[Target] = &[
    target("apple", "Apple", Round),
    target("sun", "Sun", Radiant),
    target("circle", "Circle", Round),
    target("square", "Square", Rectangular),
    target("triangle", "Triangle", Triangular),
    target("star", "Star", CrossStar),
    target("heart", "Heart", Organic),
    target("house", "House", Rectangular),
    target("tree", "Tree", VerticalElongated),
    target("flower", "Flower", Organic),
    target("moon", "Moon", Crescent),
    target("cloud", "Cloud", Organic),
    target("lightning", "Lightning", ArrowLightning),
    target("arrow", "Arrow", ArrowLightning),
    target("cross", "Cross", CrossStar),
    target("diamond", "Diamond", Generic),
    target("fish", "Fish", Generic),
    target("boat", "Boat", Generic),
    target("mountain", "Mountain", Triangular),
    target("eye", "Eye", Round),
    target("smile", "Smiley", Round),
    target("cup", "Cup", Generic),
    target("umbrella", "Umbrella", VerticalElongated),
    target("key", "Key", VerticalElongated),
    target("balloon", "Balloon", Round),
    target("leaf", "Leaf", Organic),
    target("bell", "Bell", Generic),
    target("flag", "Flag", Rectangular),
    target("scissors", "Scissors", CrossStar),
    target("pencil", "Pencil", VerticalElongated),
];

pub fn find_target(id: &str) -> Option<&'static Target> {
    TARGETS.iter().find(|t| t.id == id)
}

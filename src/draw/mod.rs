//! Draw-it: a pixel canvas, a cursor that paints or erases, and a heuristic
//! classifier that decides whether the drawing looks like the requested
//! object.
//!
//! The classifier is a fixed rule table over a handful of shape features
//! (fill, bounding box, aspect ratio, compactness, mirror symmetry, straight
//! runs). It is deterministic: the same grid always earns the same verdict.
use serde::Serialize;

mod session;
mod targets;

pub use session::{DrawConfig, DrawEvent, DrawGame, DrawMode, DrawSnapshot, DrawStatus};
pub use targets::{ShapeCategory, TARGETS, Target, find_target};

/// Straight runs at least this long count as a drawn line.
pub const LINE_RUN: usize = 5;
/// Fewer filled cells than this is an empty drawing.
pub const MIN_FILLED: usize = 5;
/// Confidence needed for a drawing to be accepted.
pub const SUCCESS_THRESHOLD: u32 = 50;

/// Row-major filled/empty canvas.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DrawGrid {
    cols: usize,
    rows: usize,
    cells: Vec<bool>,
}

impl DrawGrid {
    pub fn new(cols: usize, rows: usize) -> Self {
        Self {
            cols,
            rows,
            cells: vec![false; cols * rows],
        }
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn get(&self, col: usize, row: usize) -> bool {
        col < self.cols && row < self.rows && self.cells[row * self.cols + col]
    }

    /// Returns true when the cell actually changed.
    pub fn set(&mut self, col: usize, row: usize, filled: bool) -> bool {
        if col >= self.cols || row >= self.rows {
            return false;
        }
        let cell = &mut self.cells[row * self.cols + col];
        let changed = *cell != filled;
        *cell = filled;
        changed
    }

    /// Fill the inclusive rectangle `[c0, c1] x [r0, r1]`.
    pub fn fill_rect(&mut self, c0: usize, r0: usize, c1: usize, r1: usize) {
        for row in r0..=r1 {
            for col in c0..=c1 {
                self.set(col, row, true);
            }
        }
    }

    pub fn filled_count(&self) -> usize {
        self.cells.iter().filter(|&&c| c).count()
    }

    pub fn clear(&mut self) {
        self.cells.iter_mut().for_each(|c| *c = false);
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct BoundingBox {
    pub min_col: usize,
    pub max_col: usize,
    pub min_row: usize,
    pub max_row: usize,
}

impl BoundingBox {
    pub fn width(&self) -> usize {
        self.max_col - self.min_col + 1
    }

    pub fn height(&self) -> usize {
        self.max_row - self.min_row + 1
    }
}

/// Shape features of a drawing.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Analysis {
    pub filled: usize,
    pub total: usize,
    pub fill_percentage: f64,
    pub bounds: Option<BoundingBox>,
    pub width: usize,
    pub height: usize,
    pub aspect_ratio: f64,
    pub center_of_mass: (f64, f64),
    pub compactness: f64,
    pub symmetry: f64,
    pub has_vertical_line: bool,
    pub has_horizontal_line: bool,
}

impl Analysis {
    pub fn is_empty(&self) -> bool {
        self.filled < MIN_FILLED
    }

    pub fn is_round(&self) -> bool {
        self.compactness > 0.5 && self.aspect_ratio > 0.7 && self.aspect_ratio < 1.4
    }

    pub fn is_square(&self) -> bool {
        self.aspect_ratio > 0.8 && self.aspect_ratio < 1.2 && self.compactness > 0.7
    }

    pub fn is_triangular(&self) -> bool {
        self.compactness < 0.5 && self.compactness > 0.2
    }
}

pub fn analyze(grid: &DrawGrid) -> Analysis {
    let total = grid.cols * grid.rows;
    let mut filled = 0usize;
    let mut bounds: Option<BoundingBox> = None;
    let (mut sum_col, mut sum_row) = (0.0, 0.0);

    for row in 0..grid.rows {
        for col in 0..grid.cols {
            if !grid.get(col, row) {
                continue;
            }
            filled += 1;
            sum_col += col as f64;
            sum_row += row as f64;
            bounds = Some(match bounds {
                None => BoundingBox {
                    min_col: col,
                    max_col: col,
                    min_row: row,
                    max_row: row,
                },
                Some(b) => BoundingBox {
                    min_col: b.min_col.min(col),
                    max_col: b.max_col.max(col),
                    min_row: b.min_row.min(row),
                    max_row: b.max_row.max(row),
                },
            });
        }
    }

    let (width, height) = bounds.map_or((0, 0), |b| (b.width(), b.height()));
    let center_of_mass = if filled > 0 {
        (sum_col / filled as f64, sum_row / filled as f64)
    } else {
        (0.0, 0.0)
    };
    let bounding_area = (width * height).max(1);

    Analysis {
        filled,
        total,
        fill_percentage: if total > 0 {
            filled as f64 / total as f64 * 100.0
        } else {
            0.0
        },
        bounds,
        width,
        height,
        aspect_ratio: width as f64 / height.max(1) as f64,
        center_of_mass,
        compactness: filled as f64 / bounding_area as f64,
        symmetry: bounds.map_or(0.0, |b| mirror_symmetry(grid, b, filled)),
        has_vertical_line: has_vertical_run(grid, LINE_RUN),
        has_horizontal_line: has_horizontal_run(grid, LINE_RUN),
    }
}

/// Fraction of filled cells whose mirror across the box's vertical midline
/// is also filled.
fn mirror_symmetry(grid: &DrawGrid, b: BoundingBox, filled: usize) -> f64 {
    let mut mirrored = 0usize;
    for row in b.min_row..=b.max_row {
        for col in b.min_col..=b.max_col {
            if grid.get(col, row) && grid.get(b.min_col + b.max_col - col, row) {
                mirrored += 1;
            }
        }
    }
    mirrored as f64 / filled.max(1) as f64
}

fn has_vertical_run(grid: &DrawGrid, len: usize) -> bool {
    (0..grid.cols).any(|col| longest_run((0..grid.rows).map(|row| grid.get(col, row))) >= len)
}

fn has_horizontal_run(grid: &DrawGrid, len: usize) -> bool {
    (0..grid.rows).any(|row| longest_run((0..grid.cols).map(|col| grid.get(col, row))) >= len)
}

fn longest_run(cells: impl Iterator<Item = bool>) -> usize {
    let (mut best, mut cur) = (0, 0);
    for filled in cells {
        cur = if filled { cur + 1 } else { 0 };
        best = best.max(cur);
    }
    best
}

/// Why a rule fired.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchReason {
    RoundShape,
    Symmetric,
    RectangularShape,
    CompactShape,
    TriangularShape,
    CrossingLines,
    VerticalLine,
    Portrait,
    LineShape,
    Elongated,
    OrganicShape,
    RadiantShape,
    CrescentShape,
    ReasonableSize,
}

impl MatchReason {
    pub fn label(self) -> &'static str {
        match self {
            MatchReason::RoundShape => "round shape detected",
            MatchReason::Symmetric => "symmetric",
            MatchReason::RectangularShape => "rectangular shape detected",
            MatchReason::CompactShape => "compact shape",
            MatchReason::TriangularShape => "triangular shape detected",
            MatchReason::CrossingLines => "crossing lines detected",
            MatchReason::VerticalLine => "vertical line detected",
            MatchReason::Portrait => "portrait format",
            MatchReason::LineShape => "line shape detected",
            MatchReason::Elongated => "elongated shape",
            MatchReason::OrganicShape => "organic shape",
            MatchReason::RadiantShape => "round or radiant shape",
            MatchReason::CrescentShape => "crescent shape detected",
            MatchReason::ReasonableSize => "reasonable drawing size",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Verdict {
    pub success: bool,
    pub confidence: u32,
    pub reasons: Vec<MatchReason>,
    pub message: String,
}

/// Score a drawing against a target. Confidence is additive, capped at 100.
pub fn classify(analysis: &Analysis, target: &Target) -> Verdict {
    if analysis.is_empty() {
        return Verdict {
            success: false,
            confidence: 0,
            reasons: Vec::new(),
            message: "The drawing is too empty!".to_string(),
        };
    }

    let a = analysis;
    let mut confidence = 0u32;
    let mut reasons = Vec::new();
    let mut award = |hit: bool, points: u32, reason: Option<MatchReason>| {
        if hit {
            confidence += points;
            reasons.extend(reason);
        }
    };

    award(a.fill_percentage > 2.0, 20, None);
    award(a.fill_percentage > 5.0, 10, None);
    award(a.fill_percentage > 10.0, 10, None);

    use MatchReason::*;
    match target.category {
        ShapeCategory::Round => {
            award(a.is_round(), 40, Some(RoundShape));
            award(a.symmetry > 0.5, 15, Some(Symmetric));
        }
        ShapeCategory::Rectangular => {
            let boxy = a.is_square() || (a.aspect_ratio > 0.6 && a.aspect_ratio < 1.5);
            award(boxy, 35, Some(RectangularShape));
            award(a.compactness > 0.5, 15, Some(CompactShape));
        }
        ShapeCategory::Triangular => {
            award(a.is_triangular(), 40, Some(TriangularShape));
        }
        ShapeCategory::CrossStar => {
            award(
                a.has_vertical_line && a.has_horizontal_line,
                35,
                Some(CrossingLines),
            );
            award(a.symmetry > 0.3, 15, Some(Symmetric));
        }
        ShapeCategory::VerticalElongated => {
            award(a.has_vertical_line, 30, Some(VerticalLine));
            award(a.height > a.width, 15, Some(Portrait));
        }
        ShapeCategory::ArrowLightning => {
            award(
                a.has_vertical_line || a.has_horizontal_line,
                25,
                Some(LineShape),
            );
            award(a.compactness < 0.4, 20, Some(Elongated));
        }
        ShapeCategory::Organic => {
            award(a.symmetry > 0.4, 30, Some(Symmetric));
            award(
                a.compactness > 0.3 && a.compactness < 0.7,
                20,
                Some(OrganicShape),
            );
        }
        ShapeCategory::Radiant => {
            award(a.is_round() || a.symmetry > 0.4, 35, Some(RadiantShape));
        }
        ShapeCategory::Crescent => {
            award(
                a.compactness < 0.5 && a.symmetry < 0.4,
                30,
                Some(CrescentShape),
            );
        }
        ShapeCategory::Generic => {
            award(
                a.fill_percentage > 3.0 && a.fill_percentage < 50.0,
                30,
                Some(ReasonableSize),
            );
            award(a.symmetry > 0.3, 15, None);
        }
    }

    award(a.filled > 50, 5, None);
    award(a.filled > 100, 5, None);

    let confidence = confidence.min(100);
    let success = confidence >= SUCCESS_THRESHOLD;
    let message = if success {
        format!("{} recognized!", target.name)
    } else {
        format!("That doesn't look like \"{}\"...", target.name)
    };
    Verdict {
        success,
        confidence,
        reasons,
        message,
    }
}

//! Contour plot orchestration over a retained scene.
//!
//! [`ContourPlot::plot`] runs one render pass for a trace: clean the input,
//! build and trace the level series, then rebuild the trace's group in the
//! [`SceneDocument`] (background, fills, lines, labels) and wire up its clip
//! paths. Nodes are reconciled by key so repeated passes reuse them.

use std::collections::BTreeMap;

use serde::Serialize;

use contour_common::{
    clean_2d_array, find_empties, interpolate_gaps, AxisTransform, CategoryMap, Coloring,
    ContourResult, ContourTraceOptions, Grid, LabelFont, Perimeter, RawCell,
};

use crate::format::LabelFormatter;
use crate::gap_mask::build_gap_clip;
use crate::labels::{place_labels, LabelPlacement};
use crate::levels::{build_levels, LevelInfo};
use crate::measure::TextMeasurer;
use crate::path::{format_num, smooth_closed, smooth_open, straight_closed};
use crate::scene::KeyedNodes;
use crate::stitch::stitch;
use crate::style::LevelColors;
use crate::trace::{trace_all, PixelAxes, Tracer};

/// A clip region: path data applied with the even-odd rule.
#[derive(Debug, Clone, PartialEq)]
pub struct ClipPath {
    pub d: String,
}

/// Document-wide clip definitions, keyed by id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClipRegistry {
    clips: BTreeMap<String, ClipPath>,
}

impl ClipRegistry {
    /// Id of the gap clip for a trace.
    pub fn gap_id(uid: &str) -> String {
        format!("clip{}", uid)
    }

    /// Id of the label-exclusion clip for a trace's lines.
    pub fn line_id(uid: &str) -> String {
        format!("clipline{}", uid)
    }

    pub fn insert(&mut self, id: String, d: String) {
        self.clips.insert(id, ClipPath { d });
    }

    pub fn remove(&mut self, id: &str) -> bool {
        self.clips.remove(id).is_some()
    }

    pub fn get(&self, id: &str) -> Option<&ClipPath> {
        self.clips.get(id)
    }

    pub fn len(&self) -> usize {
        self.clips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clips.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &ClipPath)> {
        self.clips.iter()
    }
}

/// Filled area below the first level.
#[derive(Debug, Clone, PartialEq)]
pub struct BackgroundNode {
    pub d: String,
    pub fill: String,
}

/// Filled area above one level.
#[derive(Debug, Clone, PartialEq)]
pub struct FillNode {
    pub level: f64,
    pub d: String,
    pub fill: String,
}

/// Stroked contour lines of one level.
#[derive(Debug, Clone, PartialEq)]
pub struct LineNode {
    pub level: f64,
    pub d: String,
    pub stroke: String,
    pub width: f64,
}

/// A text label on a contour line.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelNode {
    pub placement: LabelPlacement,
    pub color: String,
}

/// Everything one trace contributes to the scene.
#[derive(Debug, Clone, Default)]
pub struct ContourGroup {
    pub uid: String,
    pub background: Option<BackgroundNode>,
    pub fills: KeyedNodes<FillNode>,
    pub lines: KeyedNodes<LineNode>,
    pub labels: KeyedNodes<LabelNode>,
    pub label_font: LabelFont,
    /// Fills are left to a heatmap layer.
    pub heatmap_fill: bool,
    /// Clip applied to the whole group, hiding missing data.
    pub clip_id: Option<String>,
    /// Clip applied to the lines, cutting them under labels.
    pub line_clip_id: Option<String>,
    /// Occupancy grid from the gap mask, kept for hover lookups.
    pub zmask: Option<Grid>,
}

impl ContourGroup {
    fn new(uid: &str) -> Self {
        Self {
            uid: uid.to_string(),
            ..Default::default()
        }
    }
}

/// The retained scene: one group per trace plus shared clip definitions.
#[derive(Debug, Clone, Default)]
pub struct SceneDocument {
    groups: BTreeMap<String, ContourGroup>,
    pub clips: ClipRegistry,
}

impl SceneDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn group(&self, uid: &str) -> Option<&ContourGroup> {
        self.groups.get(uid)
    }

    pub fn groups(&self) -> impl Iterator<Item = &ContourGroup> {
        self.groups.values()
    }

    fn group_mut(&mut self, uid: &str) -> &mut ContourGroup {
        self.groups
            .entry(uid.to_string())
            .or_insert_with(|| ContourGroup::new(uid))
    }

    /// Drop a trace's group and its clip definitions.
    pub fn remove_trace(&mut self, uid: &str) -> bool {
        self.clips.remove(&ClipRegistry::gap_id(uid));
        self.clips.remove(&ClipRegistry::line_id(uid));
        self.groups.remove(uid).is_some()
    }
}

/// Raw input for one contour trace.
#[derive(Debug, Clone, Default)]
pub struct ContourTrace {
    pub options: ContourTraceOptions,
    /// Sample matrix, row-major, before cleaning.
    pub z: Vec<Vec<RawCell>>,
    /// Column coordinates of the cleaned matrix.
    pub x: Vec<f64>,
    /// Row coordinates of the cleaned matrix.
    pub y: Vec<f64>,
    pub x_categories: Option<CategoryMap>,
    pub y_categories: Option<CategoryMap>,
}

/// What one render pass produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct PlotSummary {
    pub levels: usize,
    pub fills: usize,
    pub lines: usize,
    pub labels: usize,
    pub missing: usize,
}

/// Collaborators for rendering contour traces.
pub struct ContourPlot<'a> {
    pub xaxis: &'a dyn AxisTransform,
    pub yaxis: &'a dyn AxisTransform,
    pub tracer: &'a dyn Tracer,
    pub measurer: &'a dyn TextMeasurer,
}

impl<'a> ContourPlot<'a> {
    pub fn new(
        xaxis: &'a dyn AxisTransform,
        yaxis: &'a dyn AxisTransform,
        tracer: &'a dyn Tracer,
        measurer: &'a dyn TextMeasurer,
    ) -> Self {
        Self {
            xaxis,
            yaxis,
            tracer,
            measurer,
        }
    }

    /// Render one trace into `doc`.
    ///
    /// Fails only when the input cannot form a grid or a perimeter; geometry
    /// problems inside the pass are logged and degrade the output.
    pub fn plot(&self, doc: &mut SceneDocument, trace: &ContourTrace) -> ContourResult<PlotSummary> {
        let opts = &trace.options;
        if !opts.visible {
            doc.remove_trace(&opts.uid);
            tracing::debug!(uid = %opts.uid, "Contour trace hidden, group removed");
            return Ok(PlotSummary::default());
        }

        let z = clean_2d_array(
            &trace.z,
            opts.transpose,
            trace.x_categories.as_ref(),
            trace.y_categories.as_ref(),
        );
        let empties = find_empties(&z);
        let mut filled = z;
        interpolate_gaps(&mut filled, &empties);
        let grid = Grid::new(filled, trace.x.clone(), trace.y.clone())?;

        let perimeter = Perimeter::from_axes(grid.x(), grid.y(), self.xaxis, self.yaxis)?;
        let axes = PixelAxes::new(self.xaxis, self.yaxis);

        tracing::debug!(
            uid = %opts.uid,
            rows = grid.rows(),
            cols = grid.cols(),
            missing = empties.len(),
            "Rendering contour trace"
        );

        let levels = build_levels(&opts.contours, &grid, opts.line.smoothing);
        let traced = trace_all(self.tracer, &levels, &axes);
        let colors = LevelColors::new(&opts.contours, traced.len(), &opts.colorscale);

        let group = doc.group_mut(&opts.uid);
        let mut summary = PlotSummary {
            levels: traced.len(),
            missing: empties.len(),
            ..Default::default()
        };

        // Background and fills
        let coloring = opts.contours.coloring;
        group.heatmap_fill = coloring == Coloring::Heatmap;
        if coloring == Coloring::Fill {
            group.background = Some(BackgroundNode {
                d: straight_closed(&perimeter.corners()[..]),
                fill: colors.background().to_hex(),
            });
            let fills: Vec<FillNode> = traced
                .iter()
                .enumerate()
                .filter_map(|(i, level)| {
                    stitch(level, &perimeter).map(|result| FillNode {
                        level: level.level,
                        d: result.to_smoothed_path_data(level.smoothing),
                        fill: colors.fill(i).to_hex(),
                    })
                })
                .collect();
            group.fills.apply(&fills, level_key, FillNode::clone, |node, fill| {
                *node = fill.clone()
            });
            summary.fills = fills.len();
        } else {
            group.background = None;
            group.fills.clear();
        }

        // Lines
        let lines_drawn = opts.contours.showlines || coloring == Coloring::Lines;
        if lines_drawn {
            let lines: Vec<LineNode> = traced
                .iter()
                .enumerate()
                .filter_map(|(i, level)| {
                    let d = line_path(level);
                    if d.is_empty() {
                        return None;
                    }
                    let stroke = if coloring == Coloring::Lines {
                        colors.line(i).to_hex()
                    } else {
                        opts.line.color.clone()
                    };
                    Some(LineNode {
                        level: level.level,
                        d,
                        stroke,
                        width: opts.line.width,
                    })
                })
                .collect();
            group.lines.apply(&lines, |l: &LineNode| format_num(l.level), LineNode::clone, |node, line| {
                *node = line.clone()
            });
            summary.lines = lines.len();
        } else {
            group.lines.clear();
        }

        // Labels
        let line_clip = ClipRegistry::line_id(&opts.uid);
        group.label_font = opts.contours.font.clone();
        // Labels sit on the lines, so hidden lines take them along
        if opts.contours.showlabels && lines_drawn {
            let formatter =
                LabelFormatter::for_contours(opts.contours.labelformat.as_deref(), opts.contours.size);
            let layout = place_labels(
                &traced,
                &perimeter,
                (self.xaxis.length(), self.yaxis.length()),
                self.measurer,
                &opts.contours.font,
                &formatter,
            );
            let color = opts
                .contours
                .font
                .color
                .clone()
                .unwrap_or_else(|| opts.line.color.clone());
            let labels: Vec<LabelNode> = layout
                .labels
                .into_iter()
                .map(|placement| LabelNode {
                    placement,
                    color: color.clone(),
                })
                .collect();
            group.labels.apply(
                &labels,
                |l: &LabelNode| l.placement.key(),
                LabelNode::clone,
                |node, label| *node = label.clone(),
            );
            summary.labels = labels.len();
            group.line_clip_id = Some(line_clip.clone());
            doc.clips.insert(line_clip, layout.clip_path);
        } else {
            group.labels.clear();
            group.line_clip_id = None;
            doc.clips.remove(&line_clip);
        }

        // Gap clip
        let gap_clip = ClipRegistry::gap_id(&opts.uid);
        let group = doc.group_mut(&opts.uid);
        if opts.connectgaps {
            group.clip_id = None;
            group.zmask = None;
            doc.clips.remove(&gap_clip);
        } else {
            let gap = build_gap_clip(&grid, &empties, self.tracer, &axes, &perimeter);
            let d = gap.clip.map(|c| c.to_path_data()).unwrap_or_default();
            group.clip_id = Some(gap_clip.clone());
            group.zmask = Some(gap.occupancy);
            doc.clips.insert(gap_clip, d);
        }

        tracing::debug!(
            uid = %opts.uid,
            levels = summary.levels,
            fills = summary.fills,
            lines = summary.lines,
            labels = summary.labels,
            "Contour trace rendered"
        );
        Ok(summary)
    }
}

fn level_key(fill: &FillNode) -> String {
    format_num(fill.level)
}

/// Smoothed path data for every polyline of a level.
fn line_path(level: &LevelInfo<'_>) -> String {
    let open = level
        .edgepaths
        .iter()
        .map(|p| smooth_open(p, level.smoothing));
    let closed = level
        .paths
        .iter()
        .map(|p| smooth_closed(p, level.smoothing));
    open.chain(closed).collect()
}

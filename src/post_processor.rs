use indicatif::ProgressBar;
use nalgebra::Point2;
use xmltree::{Element, EmitterConfig, XMLNode};

use crate::{
    config::{LineStyle, PolygonStyle},
    datatypes::TriangleMesh,
    error::ViewerError,
};

/// Fraction of the data span added on each side by `autoscale_view`
pub const AUTOSCALE_MARGIN: f64 = 0.05;
pub const NUM_TICKS: usize = 5;

const PLOT_PADDING_LEFT: f64 = 60.0;
const PLOT_PADDING_RIGHT: f64 = 20.0;
const PLOT_PADDING_TOP: f64 = 20.0;
const PLOT_PADDING_BOTTOM: f64 = 40.0;

/// Collections larger than this report progress while they are built
const PROGRESS_THRESHOLD: usize = 10_000;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

impl Bounds {
    fn empty() -> Bounds {
        Bounds {
            x_min: f64::INFINITY,
            x_max: f64::NEG_INFINITY,
            y_min: f64::INFINITY,
            y_max: f64::NEG_INFINITY,
        }
    }

    fn include(&mut self, p: &Point2<f64>) {
        self.x_min = self.x_min.min(p.x);
        self.x_max = self.x_max.max(p.x);
        self.y_min = self.y_min.min(p.y);
        self.y_max = self.y_max.max(p.y);
    }

    fn is_empty(&self) -> bool {
        self.x_min > self.x_max || self.y_min > self.y_max
    }
}

/// Widens a degenerate range and pads it by `AUTOSCALE_MARGIN`. Spans are
/// taken in halves so ranges near the f64 limits stay finite.
fn pad_range(min: f64, max: f64) -> (f64, f64) {
    let (min, max) = if max == min {
        let half = if min == 0.0 { 0.5 } else { 0.05 * min.abs() };
        (min - half, max + half)
    } else {
        (min, max)
    };
    let margin = (max * 0.5 - min * 0.5) * (2.0 * AUTOSCALE_MARGIN);
    (
        (min - margin).max(f64::MIN),
        (max + margin).min(f64::MAX),
    )
}

/// A set of filled polygons sharing one style
#[derive(Debug, Clone)]
pub struct PolygonCollection {
    pub name: String,
    pub polygons: Vec<Vec<Point2<f64>>>,
    pub style: PolygonStyle,
}

impl PolygonCollection {
    /// Builds one polygon per selected triangle
    ///
    /// # Arguments
    /// * `name` - Identifier for the collection in the rendered figure
    /// * `mesh` - The triangle mesh
    /// * `indices` - Triangles to include. `None` selects the whole mesh
    /// * `style` - Edge and face colours
    pub fn from_triangles(
        name: &str,
        mesh: &TriangleMesh,
        indices: Option<&[usize]>,
        style: &PolygonStyle,
    ) -> Result<PolygonCollection, ViewerError> {
        let selection: Vec<usize> = match indices {
            Some(i) => i.to_vec(),
            None => (0..mesh.len()).collect(),
        };

        let bar = if selection.len() > PROGRESS_THRESHOLD {
            ProgressBar::new(selection.len() as u64)
        } else {
            ProgressBar::hidden()
        };

        let mut polygons: Vec<Vec<Point2<f64>>> = Vec::with_capacity(selection.len());
        for idx in selection {
            let triangle = match mesh.get(idx) {
                Some(t) => t,
                None => {
                    return Err(ViewerError::Render(format!(
                        "triangle {idx} requested for {name} but the mesh has {} triangles",
                        mesh.len()
                    )))
                }
            };
            polygons.push(triangle.vertices().to_vec());
            bar.inc(1);
        }
        bar.finish_and_clear();

        Ok(PolygonCollection {
            name: name.to_owned(),
            polygons,
            style: style.clone(),
        })
    }

    pub fn len(&self) -> usize {
        self.polygons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.polygons.is_empty()
    }
}

/// A connected polyline
#[derive(Debug, Clone)]
pub struct Line {
    pub name: String,
    pub points: Vec<Point2<f64>>,
    pub style: LineStyle,
}

impl Line {
    pub fn new(name: &str, points: Vec<Point2<f64>>, style: &LineStyle) -> Line {
        Line {
            name: name.to_owned(),
            points,
            style: style.clone(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Axes {
    pub collections: Vec<PolygonCollection>,
    pub lines: Vec<Line>,
    view: Option<Bounds>,
}

impl Axes {
    pub fn add_collection(&mut self, collection: PolygonCollection) {
        self.collections.push(collection);
    }

    pub fn plot(&mut self, line: Line) {
        self.lines.push(line);
    }

    /// Bounds of every artist currently on the axes
    pub fn data_bounds(&self) -> Option<Bounds> {
        let mut bounds = Bounds::empty();
        let polygon_points = self
            .collections
            .iter()
            .flat_map(|c| c.polygons.iter().flatten());
        let line_points = self.lines.iter().flat_map(|l| l.points.iter());

        for p in polygon_points.chain(line_points) {
            if p.x.is_finite() && p.y.is_finite() {
                bounds.include(p);
            }
        }

        if bounds.is_empty() {
            None
        } else {
            Some(bounds)
        }
    }

    fn autoscaled(&self) -> Bounds {
        match self.data_bounds() {
            Some(b) => {
                let (x_min, x_max) = pad_range(b.x_min, b.x_max);
                let (y_min, y_max) = pad_range(b.y_min, b.y_max);
                Bounds {
                    x_min,
                    x_max,
                    y_min,
                    y_max,
                }
            }
            None => Bounds {
                x_min: 0.0,
                x_max: 1.0,
                y_min: 0.0,
                y_max: 1.0,
            },
        }
    }

    /// Fits the view to the current artists. Artists added afterwards keep
    /// this view until it is recomputed.
    pub fn autoscale_view(&mut self) {
        self.view = Some(self.autoscaled());
    }

    /// The current view, or an autoscaled one if none was set
    pub fn view_limits(&self) -> Bounds {
        self.view.unwrap_or_else(|| self.autoscaled())
    }
}

/// Maps data coordinates onto the plot area of a figure
struct Transform {
    view: Bounds,
    left: f64,
    top: f64,
    width: f64,
    height: f64,
}

impl Transform {
    fn x(&self, x: f64) -> f64 {
        let frac = (x * 0.5 - self.view.x_min * 0.5)
            / (self.view.x_max * 0.5 - self.view.x_min * 0.5);
        self.left + frac * self.width
    }

    fn y(&self, y: f64) -> f64 {
        // svg y grows downwards
        let frac = (self.view.y_max * 0.5 - y * 0.5)
            / (self.view.y_max * 0.5 - self.view.y_min * 0.5);
        self.top + frac * self.height
    }

    fn points_attr(&self, points: &[Point2<f64>]) -> String {
        points
            .iter()
            .map(|p| format!("{:.3},{:.3}", self.x(p.x), self.y(p.y)))
            .collect::<Vec<String>>()
            .join(" ")
    }
}

fn element(name: &str, attributes: &[(&str, String)]) -> Element {
    let mut el = Element::new(name);
    for (key, value) in attributes {
        el.attributes.insert(key.to_string(), value.clone());
    }
    el
}

fn text_element(name: &str, attributes: &[(&str, String)], text: String) -> Element {
    let mut el = element(name, attributes);
    el.children.push(XMLNode::Text(text));
    el
}

fn tick_label(value: f64) -> String {
    let label = format!("{:.3}", value);
    let label = label.trim_end_matches('0').trim_end_matches('.');
    if label == "-0" {
        "0".to_owned()
    } else {
        label.to_owned()
    }
}

#[derive(Debug, Clone)]
pub struct Figure {
    pub width: u32,
    pub height: u32,
    pub axes: Axes,
}

impl Figure {
    pub fn new(width: u32, height: u32) -> Figure {
        Figure {
            width,
            height,
            axes: Axes::default(),
        }
    }

    fn transform(&self) -> Transform {
        let width = (self.width as f64 - PLOT_PADDING_LEFT - PLOT_PADDING_RIGHT).max(1.0);
        let height = (self.height as f64 - PLOT_PADDING_TOP - PLOT_PADDING_BOTTOM).max(1.0);
        Transform {
            view: self.axes.view_limits(),
            left: PLOT_PADDING_LEFT,
            top: PLOT_PADDING_TOP,
            width,
            height,
        }
    }

    /// Builds the SVG document for the figure. Collections are drawn in the
    /// order they were added, then lines.
    pub fn to_svg(&self) -> Element {
        let tf = self.transform();

        let mut svg = element(
            "svg",
            &[
                ("xmlns", "http://www.w3.org/2000/svg".to_owned()),
                ("width", self.width.to_string()),
                ("height", self.height.to_string()),
                ("viewBox", format!("0 0 {} {}", self.width, self.height)),
            ],
        );
        svg.children.push(XMLNode::Element(element(
            "rect",
            &[
                ("width", "100%".to_owned()),
                ("height", "100%".to_owned()),
                ("fill", "white".to_owned()),
            ],
        )));

        let mut clip = element("clipPath", &[("id", "plot-area".to_owned())]);
        clip.children.push(XMLNode::Element(element(
            "rect",
            &[
                ("x", format!("{:.3}", tf.left)),
                ("y", format!("{:.3}", tf.top)),
                ("width", format!("{:.3}", tf.width)),
                ("height", format!("{:.3}", tf.height)),
            ],
        )));
        let mut defs = Element::new("defs");
        defs.children.push(XMLNode::Element(clip));
        svg.children.push(XMLNode::Element(defs));

        let mut plot = element("g", &[("clip-path", "url(#plot-area)".to_owned())]);

        for collection in &self.axes.collections {
            let mut group = element(
                "g",
                &[
                    ("id", collection.name.clone()),
                    ("class", "collection".to_owned()),
                    ("stroke", collection.style.edge_color.clone()),
                    ("fill", collection.style.face_color.clone()),
                    ("stroke-width", "0.5".to_owned()),
                    ("stroke-linejoin", "round".to_owned()),
                ],
            );
            for polygon in &collection.polygons {
                group.children.push(XMLNode::Element(element(
                    "polygon",
                    &[("points", tf.points_attr(polygon))],
                )));
            }
            plot.children.push(XMLNode::Element(group));
        }

        for line in &self.axes.lines {
            plot.children.push(XMLNode::Element(element(
                "polyline",
                &[
                    ("id", line.name.clone()),
                    ("class", "line".to_owned()),
                    ("fill", "none".to_owned()),
                    ("stroke", line.style.color.clone()),
                    ("stroke-width", line.style.line_width.to_string()),
                    ("points", tf.points_attr(&line.points)),
                ],
            )));
        }
        svg.children.push(XMLNode::Element(plot));
        svg.children.push(XMLNode::Element(self.frame(&tf)));

        svg
    }

    fn frame(&self, tf: &Transform) -> Element {
        let mut frame = element(
            "g",
            &[
                ("id", "axes".to_owned()),
                ("font-family", "sans-serif".to_owned()),
                ("font-size", "10".to_owned()),
            ],
        );
        frame.children.push(XMLNode::Element(element(
            "rect",
            &[
                ("x", format!("{:.3}", tf.left)),
                ("y", format!("{:.3}", tf.top)),
                ("width", format!("{:.3}", tf.width)),
                ("height", format!("{:.3}", tf.height)),
                ("fill", "none".to_owned()),
                ("stroke", "black".to_owned()),
            ],
        )));

        let bottom = tf.top + tf.height;
        for i in 0..NUM_TICKS {
            let frac = i as f64 / (NUM_TICKS - 1) as f64;

            let x_value = tf.view.x_min * (1.0 - frac) + tf.view.x_max * frac;
            let x = tf.x(x_value);
            frame.children.push(XMLNode::Element(element(
                "line",
                &[
                    ("x1", format!("{:.3}", x)),
                    ("x2", format!("{:.3}", x)),
                    ("y1", format!("{:.3}", bottom)),
                    ("y2", format!("{:.3}", bottom + 4.0)),
                    ("stroke", "black".to_owned()),
                ],
            )));
            frame.children.push(XMLNode::Element(text_element(
                "text",
                &[
                    ("class", "xtick".to_owned()),
                    ("x", format!("{:.3}", x)),
                    ("y", format!("{:.3}", bottom + 16.0)),
                    ("text-anchor", "middle".to_owned()),
                ],
                tick_label(x_value),
            )));

            let y_value = tf.view.y_min * (1.0 - frac) + tf.view.y_max * frac;
            let y = tf.y(y_value);
            frame.children.push(XMLNode::Element(element(
                "line",
                &[
                    ("x1", format!("{:.3}", tf.left - 4.0)),
                    ("x2", format!("{:.3}", tf.left)),
                    ("y1", format!("{:.3}", y)),
                    ("y2", format!("{:.3}", y)),
                    ("stroke", "black".to_owned()),
                ],
            )));
            frame.children.push(XMLNode::Element(text_element(
                "text",
                &[
                    ("class", "ytick".to_owned()),
                    ("x", format!("{:.3}", tf.left - 6.0)),
                    ("y", format!("{:.3}", y + 3.0)),
                    ("text-anchor", "end".to_owned()),
                ],
                tick_label(y_value),
            )));
        }

        frame
    }

    /// Writes the figure to an SVG file
    pub fn save(&self, output: &str) -> Result<(), ViewerError> {
        let file = match std::fs::File::create(output) {
            Ok(f) => f,
            Err(err) => {
                return Err(ViewerError::Output(format!(
                    "Failed to create {output}: {err}"
                )))
            }
        };

        let config = EmitterConfig::new().perform_indent(true);
        if let Err(err) = self.to_svg().write_with_config(file, config) {
            return Err(ViewerError::Render(format!(
                "Failed to write svg to {output}: {err}"
            )));
        }

        let num_polygons: usize = self.axes.collections.iter().map(|c| c.len()).sum();
        println!(
            "info: saved figure with {} polygons and {} lines to {}",
            num_polygons,
            self.axes.lines.len(),
            output
        );

        Ok(())
    }
}

fn viewer_command(path: &str) -> std::process::Command {
    if cfg!(target_os = "macos") {
        let mut cmd = std::process::Command::new("open");
        cmd.arg(path);
        cmd
    } else if cfg!(target_os = "windows") {
        let mut cmd = std::process::Command::new("cmd");
        cmd.args(["/C", "start", "", path]);
        cmd
    } else {
        let mut cmd = std::process::Command::new("xdg-open");
        cmd.arg(path);
        cmd
    }
}

/// Opens a saved figure in the platform's default viewer
pub fn show(figure_path: &str) -> Result<(), ViewerError> {
    println!("info: opening {} in the default viewer...", figure_path);

    match viewer_command(figure_path).spawn() {
        Ok(_) => Ok(()),
        Err(err) => {
            println!(
                "warning [render]: unable to launch a viewer ({err}); figure left at {}",
                figure_path
            );
            Ok(())
        }
    }
}

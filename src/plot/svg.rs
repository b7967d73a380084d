//! SVG chart rendering.
//!
//! Every chart is a standalone `<svg>` element so the result page can
//! inline them one by one and `render_figure` can tile them into a grid.

use super::PlotData;
use crate::analysis::TopologyReport;

/// Colors per homology dimension (H0, H1, ...)
const PALETTE: [&str; 5] = ["#e41a1c", "#377eb8", "#4daf4a", "#984ea3", "#ff7f00"];

/// At most this many bars or diagram points are drawn, longest-lived first
pub const MAX_BARS: usize = 1000;

/// Headroom above the largest finite value where essential classes are drawn
const INF_DELTA: f64 = 0.1;

pub fn dimension_color(d: usize) -> &'static str {
    PALETTE[d % PALETTE.len()]
}

/// Pixel size of a chart
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

impl Default for Size {
    fn default() -> Self {
        Self::new(420.0, 340.0)
    }
}

/// Plot area inside a chart plus the data ranges mapped onto it
struct Axes {
    size: Size,
    left: f64,
    right: f64,
    top: f64,
    bottom: f64,
    x: (f64, f64),
    y: (f64, f64),
}

impl Axes {
    fn new(size: Size, x: (f64, f64), y: (f64, f64)) -> Self {
        Self {
            size,
            left: 52.0,
            right: 14.0,
            top: 30.0,
            bottom: 40.0,
            x: widen(x),
            y: widen(y),
        }
    }

    fn plot_width(&self) -> f64 {
        self.size.width - self.left - self.right
    }

    fn plot_height(&self) -> f64 {
        self.size.height - self.top - self.bottom
    }

    fn px(&self, x: f64) -> f64 {
        self.left + (x - self.x.0) / (self.x.1 - self.x.0) * self.plot_width()
    }

    /// Data y grows upwards unless the range is given reversed
    fn py(&self, y: f64) -> f64 {
        self.top + self.plot_height() - (y - self.y.0) / (self.y.1 - self.y.0) * self.plot_height()
    }

    /// Axis lines, ticks and labels
    fn frame(&self, x_label: &str, y_label: &str, x_ticks: bool, y_ticks: bool) -> String {
        let (l, t) = (self.left, self.top);
        let (r, b) = (l + self.plot_width(), t + self.plot_height());
        let mut out = format!(
            r##"<rect x="{l:.1}" y="{t:.1}" width="{w:.1}" height="{h:.1}" fill="none" stroke="#444"/>"##,
            w = self.plot_width(),
            h = self.plot_height(),
        );

        if x_ticks {
            for v in ticks(self.x) {
                let x = self.px(v);
                out.push_str(&format!(
                    r##"<line x1="{x:.1}" y1="{b:.1}" x2="{x:.1}" y2="{:.1}" stroke="#444"/><text x="{x:.1}" y="{:.1}" text-anchor="middle">{}</text>"##,
                    b + 4.0,
                    b + 15.0,
                    tick_label(v, self.x),
                ));
            }
        }
        if y_ticks {
            for v in ticks(self.y) {
                let y = self.py(v);
                out.push_str(&format!(
                    r##"<line x1="{:.1}" y1="{y:.1}" x2="{l:.1}" y2="{y:.1}" stroke="#444"/><text x="{:.1}" y="{:.1}" text-anchor="end">{}</text>"##,
                    l - 4.0,
                    l - 6.0,
                    y + 4.0,
                    tick_label(v, self.y),
                ));
            }
        }

        if !x_label.is_empty() {
            out.push_str(&format!(
                r#"<text x="{:.1}" y="{:.1}" text-anchor="middle">{x_label}</text>"#,
                (l + r) / 2.0,
                self.size.height - 6.0,
            ));
        }
        if !y_label.is_empty() {
            out.push_str(&format!(
                r#"<text transform="translate(14 {:.1}) rotate(-90)" text-anchor="middle">{y_label}</text>"#,
                (t + b) / 2.0,
            ));
        }
        out
    }
}

/// Avoid zero-width ranges
fn widen((lo, hi): (f64, f64)) -> (f64, f64) {
    if (hi - lo).abs() < f64::EPSILON {
        (lo - 0.5, hi + 0.5)
    } else {
        (lo, hi)
    }
}

fn ticks((a, b): (f64, f64)) -> Vec<f64> {
    (0..=4).map(|i| a + (b - a) * i as f64 / 4.0).collect()
}

fn tick_label(v: f64, (a, b): (f64, f64)) -> String {
    if (b - a).abs() >= 20.0 {
        format!("{v:.0}")
    } else {
        format!("{v:.2}")
    }
}

fn open(size: Size, title: &str) -> String {
    format!(
        r##"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}" font-family="sans-serif" font-size="11"><rect width="{w}" height="{h}" fill="#fff"/><text x="{cx:.1}" y="18" text-anchor="middle" font-size="14" font-weight="bold">{title}</text>"##,
        w = size.width,
        h = size.height,
        cx = size.width / 2.0,
    )
}

fn close(mut svg: String) -> String {
    svg.push_str("</svg>");
    svg
}

/// Where essential classes are drawn
fn infinity_level(data: &PlotData) -> f64 {
    let max_finite = data
        .diagram
        .iter()
        .map(|p| p.death.unwrap_or(p.birth))
        .fold(0.0, f64::max);
    if max_finite > 0.0 {
        max_finite * (1.0 + INF_DELTA)
    } else {
        1.0
    }
}

/// The `MAX_BARS` longest-lived items; `None` deaths count as infinite
fn longest_lived<T>(items: &[T], interval: impl Fn(&T) -> (f64, Option<f64>)) -> Vec<&T> {
    let lifetime = |item: &T| match interval(item) {
        (birth, Some(death)) => death - birth,
        (_, None) => f64::INFINITY,
    };
    let mut kept: Vec<&T> = items.iter().collect();
    if kept.len() > MAX_BARS {
        kept.sort_by(|a, b| lifetime(b).total_cmp(&lifetime(a)));
        kept.truncate(MAX_BARS);
    }
    kept
}

fn legend(dims: &[usize], x: f64, y: f64) -> String {
    let mut out = String::new();
    for (i, d) in dims.iter().enumerate() {
        let ly = y + 14.0 * i as f64;
        out.push_str(&format!(
            r#"<rect x="{x:.1}" y="{:.1}" width="10" height="10" fill="{}"/><text x="{:.1}" y="{:.1}">H{d}</text>"#,
            ly - 9.0,
            dimension_color(*d),
            x + 14.0,
            ly,
        ));
    }
    out
}

fn present_dims(data: &PlotData) -> Vec<usize> {
    let mut dims: Vec<usize> = data.diagram.iter().map(|p| p.dimension).collect();
    dims.sort_unstable();
    dims.dedup();
    dims
}

/// The grayscale source image, embedded as a PNG data URI
pub fn original_image(png_base64: &str, width: u32, height: u32, size: Size) -> String {
    let mut svg = open(size, "Original Image");
    let (avail_w, avail_h) = (size.width - 20.0, size.height - 40.0);
    let scale = (avail_w / width.max(1) as f64).min(avail_h / height.max(1) as f64);
    let (w, h) = (width as f64 * scale, height as f64 * scale);
    svg.push_str(&format!(
        r#"<image x="{:.1}" y="{:.1}" width="{w:.1}" height="{h:.1}" href="data:image/png;base64,{png_base64}"/>"#,
        (size.width - w) / 2.0,
        30.0 + (avail_h - h) / 2.0,
    ));
    close(svg)
}

/// Scatter of the edge points in image orientation (row 0 at the top)
pub fn point_cloud(data: &PlotData, width: u32, height: u32, size: Size) -> String {
    let axes = Axes::new(size, (0.0, width as f64), (height as f64, 0.0));
    let mut svg = open(size, "Point Cloud");
    svg.push_str(&axes.frame("column", "row", true, true));
    svg.push_str(r##"<g fill="#1f77b4">"##);
    for [row, col] in &data.point_cloud {
        svg.push_str(&format!(
            r#"<circle cx="{:.1}" cy="{:.1}" r="1.2"/>"#,
            axes.px(*col),
            axes.py(*row),
        ));
    }
    svg.push_str("</g>");
    close(svg)
}

/// One horizontal bar per persistence pair
pub fn barcode(data: &PlotData, size: Size) -> String {
    let inf = infinity_level(data);
    let bars = longest_lived(&data.barcode, |b| (b.start, b.end));
    let n = bars.len().max(1) as f64;
    let axes = Axes::new(size, (0.0, inf), (0.0, n));
    let mut svg = open(size, "Persistence Barcode");
    svg.push_str(&axes.frame("filtration value", "", true, false));

    let step = axes.plot_height() / n;
    let thickness = (step * 0.8).max(0.5);
    for (i, bar) in bars.iter().enumerate() {
        let y = axes.top + step * i as f64 + (step - thickness) / 2.0;
        let x0 = axes.px(bar.start);
        let x1 = axes.px(bar.end.unwrap_or(inf));
        svg.push_str(&format!(
            r#"<rect x="{x0:.2}" y="{y:.2}" width="{:.2}" height="{thickness:.2}" fill="{}"/>"#,
            (x1 - x0).max(0.5),
            dimension_color(bar.dimension),
        ));
    }

    let x_inf = axes.px(inf);
    svg.push_str(&format!(
        r##"<line x1="{x_inf:.1}" y1="{:.1}" x2="{x_inf:.1}" y2="{:.1}" stroke="#888" stroke-dasharray="4 3"/><text x="{x_inf:.1}" y="{:.1}" text-anchor="end" fill="#888">inf</text>"##,
        axes.top,
        axes.top + axes.plot_height(),
        axes.top - 2.0,
    ));
    svg.push_str(&legend(&present_dims(data), axes.left + 6.0, axes.top + 14.0));
    close(svg)
}

/// Birth/death scatter with the diagonal and an `inf` row for essential classes
pub fn diagram(data: &PlotData, size: Size) -> String {
    let inf = infinity_level(data);
    let hi = inf * 1.05;
    let axes = Axes::new(size, (0.0, hi), (0.0, hi));
    let mut svg = open(size, "Persistence Diagram");
    svg.push_str(&axes.frame("birth", "death", true, true));

    svg.push_str(&format!(
        r##"<line x1="{:.1}" y1="{:.1}" x2="{:.1}" y2="{:.1}" stroke="#888"/>"##,
        axes.px(0.0),
        axes.py(0.0),
        axes.px(hi),
        axes.py(hi),
    ));
    let y_inf = axes.py(inf);
    svg.push_str(&format!(
        r##"<line x1="{:.1}" y1="{y_inf:.1}" x2="{:.1}" y2="{y_inf:.1}" stroke="#888" stroke-dasharray="4 3"/><text x="{:.1}" y="{:.1}" fill="#888">inf</text>"##,
        axes.left,
        axes.left + axes.plot_width(),
        axes.left + 4.0,
        y_inf - 3.0,
    ));

    for p in longest_lived(&data.diagram, |p| (p.birth, p.death)) {
        svg.push_str(&format!(
            r#"<circle cx="{:.1}" cy="{:.1}" r="2.5" fill="{}" fill-opacity="0.7"/>"#,
            axes.px(p.birth),
            axes.py(p.death.unwrap_or(inf)),
            dimension_color(p.dimension),
        ));
    }
    svg.push_str(&legend(&present_dims(data), axes.left + axes.plot_width() - 40.0, axes.top + 50.0));
    close(svg)
}

fn bar_chart(title: &str, labels: &[String], values: &[f64], colors: &[&str], x_label: &str, y_label: &str, size: Size) -> String {
    let max = values.iter().copied().fold(0.0, f64::max);
    let top = if max > 0.0 { max * 1.15 } else { 1.0 };
    let n = labels.len().max(1) as f64;
    let axes = Axes::new(size, (0.0, n), (0.0, top));
    let mut svg = open(size, title);
    svg.push_str(&axes.frame(x_label, y_label, false, true));

    let slot = axes.plot_width() / n;
    let base = axes.py(0.0);
    for (i, (label, &value)) in labels.iter().zip(values).enumerate() {
        let x = axes.left + slot * i as f64 + slot * 0.15;
        let y = axes.py(value);
        let color = colors.get(i).copied().unwrap_or(PALETTE[0]);
        svg.push_str(&format!(
            r#"<rect x="{x:.1}" y="{y:.1}" width="{:.1}" height="{:.1}" fill="{color}"/><text x="{cx:.1}" y="{:.1}" text-anchor="middle">{}</text><text x="{cx:.1}" y="{:.1}" text-anchor="middle">{label}</text>"#,
            slot * 0.7,
            base - y,
            y - 4.0,
            value_label(value),
            base + 15.0,
            cx = x + slot * 0.35,
        ));
    }
    close(svg)
}

fn value_label(v: f64) -> String {
    if v.fract() == 0.0 {
        format!("{v:.0}")
    } else {
        format!("{v:.3}")
    }
}

/// Betti number per homology dimension
pub fn betti_bars(data: &PlotData, size: Size) -> String {
    let labels: Vec<String> = data.betti.iter().map(|b| b.dimension.to_string()).collect();
    let values: Vec<f64> = data.betti.iter().map(|b| b.betti as f64).collect();
    let colors: Vec<&str> = data.betti.iter().map(|b| dimension_color(b.dimension)).collect();
    bar_chart("Betti Numbers", &labels, &values, &colors, "Dimension", "Betti Number", size)
}

/// Wall-clock time and CPU usage, annotated with the complex size
pub fn metrics_bars(report: &TopologyReport, size: Size) -> String {
    let labels = ["Time (s)".to_string(), "CPU Usage (%)".to_string()];
    let values = [report.elapsed.as_secs_f64(), report.cpu_percent];
    let mut svg = bar_chart("Performance Metrics", &labels, &values, &["#1f77b4", "#ff7f0e"], "", "", size);

    // Annotation goes just before the closing tag
    svg.truncate(svg.len() - "</svg>".len());
    svg.push_str(&format!(
        r#"<text x="{:.1}" y="44" text-anchor="end">{} points, {} simplices</text>"#,
        size.width - 20.0,
        report.n_points,
        report.total_simplices(),
    ));
    close(svg)
}

//! SVG figures: confidence histogram and three-set Venn diagram.
//!
//! Both are drawn by hand into a fixed 640x480 canvas.

use crate::report::stats::{histogram, VennRegions, HISTOGRAM_BINS};

const WIDTH: f64 = 640.0;
const HEIGHT: f64 = 480.0;
const MARGIN_LEFT: f64 = 70.0;
const MARGIN_RIGHT: f64 = 30.0;
const MARGIN_TOP: f64 = 50.0;
const MARGIN_BOTTOM: f64 = 60.0;

/// Histogram of relation confidences over [0, 1].
#[must_use]
pub fn render_histogram(doc_id: &str, confidences: &[f64]) -> String {
    let bins = histogram(confidences);
    let max = bins.iter().copied().max().unwrap_or(0).max(1);

    let plot_w = WIDTH - MARGIN_LEFT - MARGIN_RIGHT;
    let plot_h = HEIGHT - MARGIN_TOP - MARGIN_BOTTOM;
    let bar_w = plot_w / HISTOGRAM_BINS as f64;
    let baseline = MARGIN_TOP + plot_h;

    let mut svg = open_svg();
    svg.push_str(&format!(
        r#"<text x="{}" y="28" text-anchor="middle" font-size="15">Distribution of E-E Relation Confidences for Events in Doc {}</text>"#,
        WIDTH / 2.0,
        xml_escape(doc_id)
    ));
    svg.push('\n');

    for (idx, &count) in bins.iter().enumerate() {
        let h = plot_h * count as f64 / max as f64;
        svg.push_str(&format!(
            r##"<rect x="{:.1}" y="{:.1}" width="{:.1}" height="{:.1}" fill="#4c72b0" stroke="black"><title>{}</title></rect>"##,
            MARGIN_LEFT + idx as f64 * bar_w,
            baseline - h,
            bar_w,
            h,
            count
        ));
        svg.push('\n');
    }

    // Axes
    svg.push_str(&format!(
        r#"<line x1="{0}" y1="{1}" x2="{2}" y2="{1}" stroke="black"/><line x1="{0}" y1="{3}" x2="{0}" y2="{1}" stroke="black"/>"#,
        MARGIN_LEFT,
        baseline,
        MARGIN_LEFT + plot_w,
        MARGIN_TOP
    ));
    svg.push('\n');

    for tick in 0..=5 {
        let value = tick as f64 * 0.2;
        svg.push_str(&format!(
            r#"<text x="{:.1}" y="{:.1}" text-anchor="middle" font-size="11">{:.1}</text>"#,
            MARGIN_LEFT + value * plot_w,
            baseline + 16.0,
            value
        ));
        svg.push('\n');
    }
    for tick in y_ticks(max) {
        svg.push_str(&format!(
            r#"<text x="{:.1}" y="{:.1}" text-anchor="end" font-size="11">{}</text>"#,
            MARGIN_LEFT - 6.0,
            baseline - plot_h * tick as f64 / max as f64 + 4.0,
            tick
        ));
        svg.push('\n');
    }

    svg.push_str(&format!(
        r#"<text x="{}" y="{}" text-anchor="middle" font-size="13">E-E Relation Confidence Score (%)</text>"#,
        MARGIN_LEFT + plot_w / 2.0,
        HEIGHT - 18.0
    ));
    svg.push_str(&format!(
        r#"<text x="20" y="{0}" text-anchor="middle" font-size="13" transform="rotate(-90 20 {0})">E-E Relations</text>"#,
        MARGIN_TOP + plot_h / 2.0
    ));
    svg.push('\n');

    close_svg(svg)
}

/// Integer y-axis ticks, at most six.
fn y_ticks(max: usize) -> Vec<usize> {
    let step = max.div_ceil(5).max(1);
    (0..=max).step_by(step).collect()
}

/// Unweighted three-set Venn diagram with region counts.
///
/// `labels` are the set captions, in the same order as `venn.sources`.
#[must_use]
pub fn render_venn(venn: &VennRegions, labels: [&str; 3]) -> String {
    const RADIUS: f64 = 120.0;
    const CIRCLES: [(f64, f64, &str); 3] = [
        (250.0, 200.0, "#e24a33"),
        (390.0, 200.0, "#348abd"),
        (320.0, 320.0, "#8eba42"),
    ];
    // Label anchor for each region id
    const REGION_POS: [(&str, f64, f64); 7] = [
        ("100", 205.0, 170.0),
        ("010", 435.0, 170.0),
        ("001", 320.0, 385.0),
        ("110", 320.0, 160.0),
        ("101", 255.0, 285.0),
        ("011", 385.0, 285.0),
        ("111", 320.0, 240.0),
    ];
    const CAPTION_POS: [(f64, f64); 3] = [(170.0, 60.0), (470.0, 60.0), (320.0, 465.0)];

    let sizes = venn.sizes();
    let mut svg = open_svg();

    for (cx, cy, fill) in CIRCLES {
        svg.push_str(&format!(
            r#"<circle cx="{}" cy="{}" r="{}" fill="{}" fill-opacity="0.5" stroke="black" stroke-opacity="0.4"/>"#,
            cx, cy, RADIUS, fill
        ));
        svg.push('\n');
    }

    for (id, x, y) in REGION_POS {
        svg.push_str(&format!(
            r#"<text x="{}" y="{}" text-anchor="middle" font-size="16">{}</text>"#,
            x,
            y,
            sizes.get(id).copied().unwrap_or(0)
        ));
        svg.push('\n');
    }

    for ((x, y), label) in CAPTION_POS.into_iter().zip(labels) {
        svg.push_str(&format!(
            r#"<text x="{}" y="{}" text-anchor="middle" font-size="15">{} Events</text>"#,
            x,
            y,
            xml_escape(label)
        ));
        svg.push('\n');
    }

    close_svg(svg)
}

fn open_svg() -> String {
    format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{0}" height="{1}" viewBox="0 0 {0} {1}" font-family="sans-serif">
<rect width="100%" height="100%" fill="white"/>
"#,
        WIDTH, HEIGHT
    )
}

fn close_svg(mut svg: String) -> String {
    svg.push_str("</svg>\n");
    svg
}

fn xml_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

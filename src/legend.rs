use crate::map_view::ColorScale;
use crate::metrics::format_number;

#[derive(Debug, Clone, PartialEq)]
pub struct LegendEntry {
    pub label: String,
    pub color: String,
}

/// Legend entries derived from the scale, one per colored bucket above the
/// no-data band. Never a second hardcoded copy of the thresholds.
pub fn legend_entries(scale: &ColorScale) -> Vec<LegendEntry> {
    let thresholds = scale.thresholds();
    let colors = scale.colors();
    (1..colors.len())
        .map(|i| {
            let lower = thresholds[i - 1];
            let label = match thresholds.get(i) {
                Some(upper) => format!("{}-{}", format_number(lower), format_number(upper - 1)),
                None => format!("{}+", format_number(lower)),
            };
            LegendEntry {
                label,
                color: colors[i].clone(),
            }
        })
        .collect()
}

/// Rows run top-down from the highest bucket, under the metric title.
pub fn render_legend(scale: &ColorScale) -> String {
    let mut out = String::from(
        r#"<div class="legend-container"><div class="legend-title">Teachers Impacted</div>"#,
    );
    for entry in legend_entries(scale).iter().rev() {
        out.push_str(&format!(
            r#"<div class="legend-row"><div class="legend-color-box" style="background-color: {color}"></div><div class="legend-label">{label}</div></div>"#,
            color = entry.color,
            label = entry.label,
        ));
    }
    out.push_str("</div>");
    out
}

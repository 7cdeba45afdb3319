use crate::models::NationalYearRecord;
use crate::ui::html_escape;

struct CardSpec {
    label: &'static str,
    tooltip: &'static str,
    value: fn(&NationalYearRecord) -> Option<i64>,
}

// Fixed card order; the whole container is replaced on every update.
const CARDS: [CardSpec; 4] = [
    CardSpec {
        label: "Leaders Supported",
        tooltip: "Cumulative number of leaders of educator-preparation programs we've supported through our leadership programming.",
        value: |r| r.total_leaders,
    },
    CardSpec {
        label: "EPPs Served",
        tooltip: "Cumulative number of educator-preparation programs we've served through our programming.",
        value: |r| r.total_epps,
    },
    CardSpec {
        label: "States Reached",
        tooltip: "Cumulative number of states where we've supported leaders, served programs, and/or engaged in advocacy efforts.",
        value: |r| r.total_states_active,
    },
    CardSpec {
        label: "Teachers Impacted",
        tooltip: "Cumulative number of current teachers we've impacted through our comprehensive support of the educator-preparation programs where they were enrolled.",
        value: |r| r.total_teachers,
    },
];

/// Renders the four summary cards for the selected year. Pure function of
/// (current, previous); holds only its latest rendered output.
pub struct MetricsView {
    html: String,
}

impl MetricsView {
    pub fn new(
        current: Option<&NationalYearRecord>,
        previous: Option<&NationalYearRecord>,
    ) -> Self {
        Self {
            html: render_cards(current, previous),
        }
    }

    pub fn update(
        &mut self,
        current: Option<&NationalYearRecord>,
        previous: Option<&NationalYearRecord>,
    ) {
        self.html = render_cards(current, previous);
    }

    pub fn html(&self) -> &str {
        &self.html
    }
}

pub fn render_cards(
    current: Option<&NationalYearRecord>,
    previous: Option<&NationalYearRecord>,
) -> String {
    let mut out = String::new();
    for card in &CARDS {
        let value = current.and_then(|record| (card.value)(record));
        let growth = previous.map(|prev| calculate_growth(value, (card.value)(prev)));
        let growth_html = growth
            .map(|g| format!(r#"<div class="metric-growth">{g}</div>"#))
            .unwrap_or_default();
        out.push_str(&format!(
            r#"<div class="metric-card">
  <div class="metric-value">{value}</div>{growth_html}
  <div class="metric-label">
    <div class="label-text">{label}</div>
    <div class="tooltip-container"><div class="tooltip-icon">i</div>
      <div class="tooltip-content">{tooltip}</div></div>
  </div>
</div>
"#,
            value = format_number(value.unwrap_or(0)),
            label = card.label,
            tooltip = html_escape(card.tooltip),
        ));
    }
    out
}

/// Signed whole-percent growth vs. the prior year. `+0%` whenever either
/// side is zero or absent, so there is never a division by zero.
pub fn calculate_growth(current: Option<i64>, previous: Option<i64>) -> String {
    match (current, previous) {
        (Some(current), Some(previous)) if current > 0 && previous > 0 => {
            let percent = ((current - previous) as f64 / previous as f64 * 100.0).round() as i64;
            if percent < 0 {
                format!("-{}%", percent.abs())
            } else {
                format!("+{percent}%")
            }
        }
        _ => "+0%".to_string(),
    }
}

/// Grouping-separator formatting, the `toLocaleString` of the page.
pub fn format_number(value: i64) -> String {
    let digits = value.abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if value < 0 {
        format!("-{grouped}")
    } else {
        grouped
    }
}

use std::collections::HashMap;

pub fn html_escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Inline error panel shown in place of a view that failed to initialize.
pub fn render_error_panel(message: &str, detail: &str) -> String {
    format!(
        r#"<div class="error-message"><p>{}</p><p class="error-detail">Technical details: {}</p></div>"#,
        html_escape(message),
        html_escape(detail),
    )
}

/// Full-page error shown when the required data sources failed at startup.
pub fn render_error_page(detail: &str) -> String {
    ERROR_HTML.replace("{{DETAIL}}", &html_escape(detail))
}

pub fn render_index(
    header: &HashMap<String, String>,
    metrics_html: &str,
    map_html: &str,
    legend_html: &str,
    timeline_html: &str,
) -> String {
    let title = header
        .get("header_title")
        .map(String::as_str)
        .unwrap_or("Our National Impact");
    let description = header
        .get("header_description")
        .map(String::as_str)
        .unwrap_or("Explore how our work with educator-preparation programs has grown year over year.");

    INDEX_HTML
        .replace("{{TITLE}}", &html_escape(title))
        .replace("{{DESCRIPTION}}", &html_escape(description))
        .replace("{{METRICS}}", metrics_html)
        .replace("{{MAP}}", map_html)
        .replace("{{LEGEND}}", legend_html)
        .replace("{{TIMELINE}}", timeline_html)
}

const ERROR_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <title>Impact Dashboard</title>
  <style>
    body { font-family: "Segoe UI", sans-serif; display: grid; place-items: center; min-height: 100vh; margin: 0; }
    .error-message { color: #dc2626; text-align: center; padding: 20px; }
    .error-detail { font-size: 0.8em; color: #666; margin-top: 10px; }
  </style>
</head>
<body>
  <div class="error-message">
    <p>Error loading dashboard data. Please try refreshing the page.</p>
    <p class="error-detail">Technical details: {{DETAIL}}</p>
  </div>
</body>
</html>
"#;

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Impact Dashboard</title>
  <style>
    :root {
      --ink: #1f2d3d;
      --accent: #0f6455;
      --muted: #6b7280;
      --card: #ffffff;
      --shadow: 0 12px 32px rgba(15, 100, 85, 0.12);
    }

    * { box-sizing: border-box; }

    body {
      margin: 0;
      color: var(--ink);
      background: #f7f8f6;
      font-family: "Segoe UI", "Helvetica Neue", sans-serif;
      padding: 32px 18px 48px;
    }

    .dashboard { width: min(1080px, 100%); margin: 0 auto; display: grid; gap: 24px; }

    .header h1 { margin: 0 0 6px; font-size: clamp(1.6rem, 3vw, 2.4rem); }
    .header p { margin: 0; color: var(--muted); }

    .metrics {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(180px, 1fr));
      gap: 16px;
    }

    .metric-card {
      background: var(--card);
      border-radius: 14px;
      padding: 18px;
      box-shadow: var(--shadow);
      display: grid;
      gap: 6px;
    }

    .metric-value { font-size: 1.8rem; font-weight: 600; color: var(--accent); }
    .metric-growth { font-size: 0.9rem; color: var(--muted); }
    .metric-label { display: flex; align-items: center; gap: 8px; }
    .label-text { font-size: 0.85rem; text-transform: uppercase; letter-spacing: 0.08em; color: var(--muted); }

    .tooltip-container { position: relative; }
    .tooltip-icon {
      width: 16px; height: 16px; border-radius: 50%;
      background: var(--muted); color: white;
      font-size: 11px; display: grid; place-items: center; cursor: default;
    }
    .tooltip-content {
      display: none; position: absolute; bottom: 24px; left: 50%;
      transform: translateX(-50%); width: 240px;
      background: var(--ink); color: white; border-radius: 8px;
      padding: 10px; font-size: 0.8rem; z-index: 10;
    }
    .tooltip-container:hover .tooltip-content { display: block; }

    #map { position: relative; background: var(--card); border-radius: 14px; padding: 16px; box-shadow: var(--shadow); }
    .map-svg { width: 100%; height: auto; display: block; }
    .state { transition: fill 200ms ease, opacity 200ms ease; cursor: pointer; }

    .legend-container { position: absolute; bottom: 20px; right: 20px; width: 120px; }
    .legend-title { font-size: 0.75rem; font-weight: 600; margin-bottom: 6px; }
    .legend-row { display: flex; align-items: center; gap: 6px; margin-bottom: 3px; }
    .legend-color-box { width: 14px; height: 14px; border-radius: 3px; }
    .legend-label { font-size: 0.75rem; color: var(--muted); }

    .tooltip {
      position: absolute; visibility: hidden; z-index: 20;
      background: white; border-radius: 10px; box-shadow: var(--shadow);
      padding: 12px; width: 220px; pointer-events: none;
    }
    .tooltip-state-name { font-weight: 600; }
    .tooltip-metric-card { margin-top: 8px; }
    .tooltip-metric-content { display: flex; justify-content: space-between; align-items: center; }
    .tooltip-metric-label { font-size: 0.72rem; text-transform: uppercase; color: var(--muted); }
    .tooltip-metric-value { font-size: 1.05rem; font-weight: 600; }

    #timeline { background: var(--card); border-radius: 14px; padding: 16px 20px; box-shadow: var(--shadow); }
    .timeline-container { display: flex; align-items: center; gap: 14px; }
    .play-button, .reset-button {
      border: none; background: var(--accent); color: white;
      border-radius: 50%; width: 38px; height: 38px; cursor: pointer; font-size: 0.9rem;
    }
    .timeline-track { position: relative; flex: 1; height: 28px; }
    .timeline-slider { width: 100%; position: absolute; top: 6px; margin: 0; }
    .timeline-dots { position: absolute; top: 22px; left: 0; right: 0; height: 6px; }
    .timeline-dot {
      position: absolute; width: 6px; height: 6px; border-radius: 50%;
      background: #d1d5db; transform: translateX(-50%); cursor: pointer;
    }
    .timeline-dot.active { background: var(--accent); }
    .thumb-container { position: absolute; top: -16px; transform: translateX(-50%); }
    .thumb-label { font-size: 0.8rem; font-weight: 600; color: var(--accent); }
    .year-labels { display: flex; justify-content: space-between; margin-top: 6px; color: var(--muted); }
    .year-label-active { color: var(--accent); font-weight: 600; }

    .error-message { color: #dc2626; text-align: center; padding: 20px; }
    .error-detail { font-size: 0.8em; color: #666; margin-top: 10px; }
  </style>
</head>
<body>
  <div class="dashboard">
    <header class="header">
      <h1>{{TITLE}}</h1>
      <p>{{DESCRIPTION}}</p>
    </header>
    <section class="metrics" id="metrics">{{METRICS}}</section>
    <section id="map">{{MAP}}{{LEGEND}}</section>
    <section id="timeline">{{TIMELINE}}</section>
  </div>
  <div class="tooltip" id="tooltip"></div>
  <script>
    (() => {
      const metricsEl = document.getElementById("metrics");
      const mapEl = document.getElementById("map");
      const timelineEl = document.getElementById("timeline");
      const tooltipEl = document.getElementById("tooltip");
      const legendHtml = document.querySelector(".legend-container")?.outerHTML || "";
      let tickTimer = null;

      const post = (url, body) =>
        fetch(url, {
          method: "POST",
          headers: { "Content-Type": "application/json" },
          body: JSON.stringify(body),
        }).then((r) => r.json());

      const applyFragments = (data) => {
        if (data.map_svg) mapEl.innerHTML = data.map_svg + legendHtml;
        if (data.metrics_html) metricsEl.innerHTML = data.metrics_html;
        if (data.timeline_html) timelineEl.innerHTML = data.timeline_html;
      };

      const stopTicking = () => {
        if (tickTimer) { clearInterval(tickTimer); tickTimer = null; }
      };

      const timelineAction = (action, year) =>
        post("/api/timeline", { action, year }).then((data) => {
          applyFragments(data);
          if (data.mode !== "autoplaying") stopTicking();
          return data;
        });

      const startTicking = () => {
        stopTicking();
        tickTimer = setInterval(() => timelineAction("tick"), 1000);
      };

      timelineEl.addEventListener("click", (event) => {
        if (event.target.closest(".play-button")) {
          const playing = event.target.closest(".play-button").dataset.playing === "true";
          if (playing) { timelineAction("pause"); } else { timelineAction("play").then(startTicking); }
        } else if (event.target.closest(".reset-button")) {
          timelineAction("reset");
        } else if (event.target.classList.contains("timeline-dot")) {
          timelineAction("dot", parseInt(event.target.dataset.year, 10));
        }
      });
      timelineEl.addEventListener("pointerdown", (event) => {
        if (event.target.classList.contains("timeline-slider")) timelineAction("press");
      });
      timelineEl.addEventListener("input", (event) => {
        if (event.target.classList.contains("timeline-slider"))
          timelineAction("scrub", parseInt(event.target.value, 10));
      });
      timelineEl.addEventListener("change", (event) => {
        if (event.target.classList.contains("timeline-slider"))
          timelineAction("release", parseInt(event.target.value, 10));
      });

      const moveTooltip = (event) => {
        const margin = 16;
        let left = event.pageX + margin;
        let top = event.pageY + margin;
        const rect = tooltipEl.getBoundingClientRect();
        if (left + rect.width > window.innerWidth - margin) left = event.pageX - rect.width - margin;
        if (top + rect.height > window.innerHeight - margin) top = event.pageY - rect.height - margin;
        tooltipEl.style.left = left + "px";
        tooltipEl.style.top = top + "px";
      };

      const showTooltip = (html, event) => {
        tooltipEl.innerHTML = html;
        tooltipEl.style.visibility = "visible";
        moveTooltip(event);
      };
      const hideTooltip = () => { tooltipEl.style.visibility = "hidden"; };

      mapEl.addEventListener("mouseover", (event) => {
        const state = event.target.dataset?.state;
        if (!state) return;
        post("/api/map/hover", { state, entering: true }).then((data) => {
          if (data.tooltip) showTooltip(data.tooltip, event);
          if (data.map_svg) mapEl.innerHTML = data.map_svg + legendHtml;
        });
      });
      mapEl.addEventListener("mousemove", (event) => {
        if (tooltipEl.style.visibility === "visible") moveTooltip(event);
      });
      mapEl.addEventListener("mouseout", (event) => {
        const state = event.target.dataset?.state;
        if (!state) return;
        post("/api/map/hover", { state, entering: false }).then((data) => {
          hideTooltip();
          if (data.map_svg) mapEl.innerHTML = data.map_svg + legendHtml;
        });
      });
      mapEl.addEventListener("click", (event) => {
        const state = event.target.dataset?.state;
        if (!state) return;
        post("/api/map/click", { state }).then((data) => {
          if (data.tooltip) { showTooltip(data.tooltip, event); } else { hideTooltip(); }
          if (data.map_svg) mapEl.innerHTML = data.map_svg + legendHtml;
        });
      });

      let resizeTimer = null;
      window.addEventListener("resize", () => {
        clearTimeout(resizeTimer);
        resizeTimer = setTimeout(() => {
          post("/api/map/resize", { width: mapEl.clientWidth }).then((data) => {
            if (data.map_svg) mapEl.innerHTML = data.map_svg + legendHtml;
          });
        }, 150);
      });
    })();
  </script>
</body>
</html>
"#;

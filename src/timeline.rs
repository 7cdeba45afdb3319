#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimelineMode {
    Idle,
    Dragging,
    Autoplaying,
}

impl TimelineMode {
    pub fn as_str(self) -> &'static str {
        match self {
            TimelineMode::Idle => "idle",
            TimelineMode::Dragging => "dragging",
            TimelineMode::Autoplaying => "autoplaying",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimelineEvent {
    /// Pointer down on the scrubber.
    Press,
    /// Drag moved over a year while the pointer is down.
    Scrub(i32),
    /// Pointer released at a year.
    Release(i32),
    /// Click on one of the discrete year dots.
    DotClick(i32),
    Play,
    Pause,
    /// One autoplay interval elapsed (1s cadence, driven by the page timer).
    Tick,
    Reset,
}

/// The year scrubber. The one component that originates year changes; every
/// handled event yields at most one year to push through the coordinator,
/// and a year equal to the current selection yields none.
#[derive(Debug)]
pub struct TimelineControl {
    min_year: i32,
    max_year: i32,
    current: i32,
    mode: TimelineMode,
}

impl TimelineControl {
    pub fn new(min_year: i32, max_year: i32) -> Self {
        let max_year = max_year.max(min_year);
        Self {
            min_year,
            max_year,
            current: min_year,
            mode: TimelineMode::Idle,
        }
    }

    pub fn current_year(&self) -> i32 {
        self.current
    }

    pub fn mode(&self) -> TimelineMode {
        self.mode
    }

    pub fn domain(&self) -> (i32, i32) {
        (self.min_year, self.max_year)
    }

    /// Apply one event; returns the year to emit, if the selection moved.
    pub fn handle(&mut self, event: TimelineEvent) -> Option<i32> {
        match event {
            TimelineEvent::Press => {
                self.mode = TimelineMode::Dragging;
                None
            }
            TimelineEvent::Scrub(year) => self.apply(year),
            TimelineEvent::Release(year) => {
                self.mode = TimelineMode::Idle;
                self.apply(year)
            }
            TimelineEvent::DotClick(year) => self.apply(year),
            TimelineEvent::Play => {
                self.mode = TimelineMode::Autoplaying;
                None
            }
            TimelineEvent::Pause => {
                if self.mode == TimelineMode::Autoplaying {
                    self.mode = TimelineMode::Idle;
                }
                None
            }
            TimelineEvent::Tick => {
                if self.mode != TimelineMode::Autoplaying {
                    return None;
                }
                if self.current >= self.max_year {
                    // Auto-pause at the end; never loop or overrun.
                    self.mode = TimelineMode::Idle;
                    return None;
                }
                self.apply(self.current + 1)
            }
            TimelineEvent::Reset => {
                self.mode = TimelineMode::Idle;
                self.apply(self.min_year)
            }
        }
    }

    fn apply(&mut self, year: i32) -> Option<i32> {
        let year = year.clamp(self.min_year, self.max_year);
        if year == self.current {
            return None;
        }
        self.current = year;
        Some(year)
    }

    /// Scrubber markup: play/pause, track with slider + per-year dots,
    /// thumb label (hidden at the ends), reset, end-year labels.
    pub fn render(&self) -> String {
        let span = (self.max_year - self.min_year).max(1) as f64;
        let percent = (self.current - self.min_year) as f64 / span * 100.0;
        let playing = self.mode == TimelineMode::Autoplaying;
        let at_end = self.current == self.min_year || self.current == self.max_year;

        let mut dots = String::new();
        for year in self.min_year..=self.max_year {
            let left = (year - self.min_year) as f64 / span * 100.0;
            let active = if year <= self.current { " active" } else { "" };
            dots.push_str(&format!(
                r#"<div class="timeline-dot{active}" data-year="{year}" style="left: {left:.1}%"></div>"#
            ));
        }

        format!(
            r#"<div class="timeline-container">
  <button class="play-button" data-playing="{playing}">{play_icon}</button>
  <div class="timeline-track">
    <div class="thumb-container" style="left: {percent:.1}%">
      <div class="custom-thumb"></div>
      <div class="thumb-label" style="opacity: {label_opacity}">{thumb_label}</div>
    </div>
    <input type="range" class="timeline-slider" min="{min}" max="{max}" step="1" value="{current}" />
    <div class="timeline-dots">{dots}</div>
  </div>
  <button class="reset-button">&#x21bb;</button>
</div>
<div class="year-labels">
  <span class="year-label{min_active}" data-year="{min}">{min_label}</span>
  <span class="year-label{max_active}" data-year="{max}">{max_label}</span>
</div>
"#,
            play_icon = if playing { "&#10074;&#10074;" } else { "&#9654;" },
            label_opacity = if at_end { "0" } else { "1" },
            thumb_label = if at_end { String::new() } else { self.current.to_string() },
            min = self.min_year,
            max = self.max_year,
            current = self.current,
            min_active = if self.current == self.min_year { " year-label-active" } else { "" },
            max_active = if self.current == self.max_year { " year-label-active" } else { "" },
            min_label = self.min_year,
            max_label = self.max_year,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drag_emits_once_per_year_change() {
        let mut timeline = TimelineControl::new(2015, 2025);
        assert_eq!(timeline.handle(TimelineEvent::Press), None);
        assert_eq!(timeline.mode(), TimelineMode::Dragging);
        assert_eq!(timeline.handle(TimelineEvent::Scrub(2018)), Some(2018));
        // Same value again: no duplicate notification.
        assert_eq!(timeline.handle(TimelineEvent::Scrub(2018)), None);
        assert_eq!(timeline.handle(TimelineEvent::Release(2018)), None);
        assert_eq!(timeline.mode(), TimelineMode::Idle);
        assert_eq!(timeline.current_year(), 2018);
    }

    #[test]
    fn dot_click_moves_directly() {
        let mut timeline = TimelineControl::new(2015, 2025);
        assert_eq!(timeline.handle(TimelineEvent::DotClick(2020)), Some(2020));
        assert_eq!(timeline.handle(TimelineEvent::DotClick(2020)), None);
    }

    #[test]
    fn out_of_domain_values_clamp() {
        let mut timeline = TimelineControl::new(2015, 2025);
        assert_eq!(timeline.handle(TimelineEvent::Release(2030)), Some(2025));
        assert_eq!(timeline.handle(TimelineEvent::Release(1999)), Some(2015));
    }

    #[test]
    fn autoplay_advances_and_auto_pauses_at_max() {
        let mut timeline = TimelineControl::new(2015, 2025);
        timeline.handle(TimelineEvent::Release(2023));
        assert_eq!(timeline.handle(TimelineEvent::Play), None);
        assert_eq!(timeline.mode(), TimelineMode::Autoplaying);
        assert_eq!(timeline.handle(TimelineEvent::Tick), Some(2024));
        assert_eq!(timeline.handle(TimelineEvent::Tick), Some(2025));
        // At the end the next tick pauses instead of emitting 2026.
        assert_eq!(timeline.handle(TimelineEvent::Tick), None);
        assert_eq!(timeline.mode(), TimelineMode::Idle);
        assert_eq!(timeline.current_year(), 2025);
    }

    #[test]
    fn ticks_are_ignored_while_idle() {
        let mut timeline = TimelineControl::new(2015, 2025);
        assert_eq!(timeline.handle(TimelineEvent::Tick), None);
        assert_eq!(timeline.current_year(), 2015);
    }

    #[test]
    fn pause_stops_autoplay() {
        let mut timeline = TimelineControl::new(2015, 2025);
        timeline.handle(TimelineEvent::Play);
        timeline.handle(TimelineEvent::Tick);
        assert_eq!(timeline.handle(TimelineEvent::Pause), None);
        assert_eq!(timeline.mode(), TimelineMode::Idle);
        assert_eq!(timeline.handle(TimelineEvent::Tick), None);
    }

    #[test]
    fn reset_returns_to_min_and_forces_idle() {
        let mut timeline = TimelineControl::new(2015, 2025);
        timeline.handle(TimelineEvent::Release(2020));
        timeline.handle(TimelineEvent::Play);
        assert_eq!(timeline.handle(TimelineEvent::Reset), Some(2015));
        assert_eq!(timeline.mode(), TimelineMode::Idle);
        // Already at min: reset emits nothing.
        assert_eq!(timeline.handle(TimelineEvent::Reset), None);
    }

    #[test]
    fn single_year_domain_is_harmless() {
        let mut timeline = TimelineControl::new(2020, 2020);
        timeline.handle(TimelineEvent::Play);
        assert_eq!(timeline.handle(TimelineEvent::Tick), None);
        assert_eq!(timeline.mode(), TimelineMode::Idle);
        assert!(timeline.render().contains("timeline-slider"));
    }

    #[test]
    fn render_marks_dots_up_to_the_selection() {
        let mut timeline = TimelineControl::new(2015, 2019);
        timeline.handle(TimelineEvent::Release(2017));
        let html = timeline.render();
        assert_eq!(html.matches("timeline-dot").count(), 6); // container + 5 dots
        assert_eq!(html.matches("timeline-dot active").count(), 3);
        assert!(html.contains(r#"value="2017""#));
    }
}

//! Lightweight nested timing zones recorded during volume computation.

use std::collections::HashMap;

/// Zone colors by nesting depth.
const DEPTH_COLORS: [[u8; 3]; 4] = [[230, 120, 40], [60, 170, 220], [120, 200, 80], [200, 90, 160]];

/// One closed zone on the timeline.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimelineEntry {
    pub name: String,
    pub start_ns: u64,
    pub end_ns: u64,
    pub depth: usize,
    pub color: [u8; 3],
}

/// Aggregate over every zone with the same name.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SummaryEntry {
    pub name: String,
    pub inclusive_ns: u64,
    /// Inclusive time minus the time spent in nested zones.
    pub exclusive_ns: u64,
    pub count: usize,
}

/// Snapshot of the last profiled computation.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimingData {
    /// Zones in the order they were opened.
    pub timeline: Vec<TimelineEntry>,
    /// Sorted by exclusive time, largest first.
    pub summary: Vec<SummaryEntry>,
}

#[derive(Debug)]
struct OpenZone {
    entry: usize,
    child_ns: u64,
}

#[derive(Debug, Default)]
pub(crate) struct Profiler {
    enabled: bool,
    timeline: Vec<TimelineEntry>,
    exclusive: Vec<u64>,
    stack: Vec<OpenZone>,
}

impl Profiler {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            ..Self::default()
        }
    }

    pub fn clear(&mut self) {
        self.timeline.clear();
        self.exclusive.clear();
        self.stack.clear();
    }

    /// Runs `f` inside a zone called `name`. Zones opened inside `f` nest under it.
    pub fn scope<T>(&mut self, name: &str, f: impl FnOnce(&mut Self) -> T) -> T {
        if !self.enabled {
            return f(self);
        }

        let depth = self.stack.len();
        let entry = self.timeline.len();
        self.timeline.push(TimelineEntry {
            name: name.to_string(),
            start_ns: now_ns(),
            end_ns: 0,
            depth,
            color: DEPTH_COLORS[depth % DEPTH_COLORS.len()],
        });
        self.exclusive.push(0);
        self.stack.push(OpenZone { entry, child_ns: 0 });

        let result = f(self);

        let end = now_ns();
        if let Some(zone) = self.stack.pop() {
            let timing = &mut self.timeline[zone.entry];
            timing.end_ns = end.max(timing.start_ns);
            let duration = timing.end_ns - timing.start_ns;
            self.exclusive[zone.entry] = duration.saturating_sub(zone.child_ns);
            if let Some(parent) = self.stack.last_mut() {
                parent.child_ns += duration;
            }
        }
        result
    }

    pub fn data(&self) -> TimingData {
        let mut totals: HashMap<&str, SummaryEntry> = HashMap::new();
        for (entry, &exclusive) in self.timeline.iter().zip(&self.exclusive) {
            let total = totals.entry(entry.name.as_str()).or_insert_with(|| SummaryEntry {
                name: entry.name.clone(),
                inclusive_ns: 0,
                exclusive_ns: 0,
                count: 0,
            });
            total.inclusive_ns += entry.end_ns - entry.start_ns;
            total.exclusive_ns += exclusive;
            total.count += 1;
        }

        let mut summary: Vec<_> = totals.into_values().collect();
        summary.sort_by(|a, b| b.exclusive_ns.cmp(&a.exclusive_ns).then_with(|| a.name.cmp(&b.name)));
        TimingData {
            timeline: self.timeline.clone(),
            summary,
        }
    }
}

/// Monotonic nanoseconds, wall clock based on wasm32 where `Instant` is unavailable.
#[cfg(target_arch = "wasm32")]
fn now_ns() -> u64 {
    (js_sys::Date::now() * 1e6) as u64
}

#[cfg(not(target_arch = "wasm32"))]
fn now_ns() -> u64 {
    use std::sync::OnceLock;
    use std::time::Instant;

    static EPOCH: OnceLock<Instant> = OnceLock::new();
    EPOCH.get_or_init(Instant::now).elapsed().as_nanos() as u64
}

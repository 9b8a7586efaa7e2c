//! Terminal bar chart driven by animator phases
//!
//! The X phase reveals bars left to right and the Y phase grows their height.

use std::cell::Cell;
use std::io::{self, Write};

use chartkit_animation::{AnimatorHandle, AnimatorObserver};

const LEVELS: [char; 9] = [' ', '▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

pub struct BarChartView {
    values: Vec<f64>,
    redraws: Cell<u64>,
}

impl BarChartView {
    /// A chart of `bars` sample values in `(0, 1]`
    pub fn new(bars: usize) -> Self {
        let values = (0..bars)
            .map(|i| 0.35 + 0.65 * (i as f64 * 1.3 + 0.4).sin().abs())
            .collect();
        Self::with_values(values)
    }

    pub fn with_values(values: Vec<f64>) -> Self {
        Self {
            values,
            redraws: Cell::new(0),
        }
    }

    /// Number of frames drawn so far
    pub fn redraws(&self) -> u64 {
        self.redraws.get()
    }

    /// Render one frame for the given phases
    pub fn frame(&self, phase_x: f64, phase_y: f64) -> String {
        let visible = (self.values.len() as f64 * phase_x).ceil() as usize;

        let mut line: String = self
            .values
            .iter()
            .enumerate()
            .map(|(i, value)| {
                if i >= visible {
                    return ' ';
                }
                let level = (value * phase_y * 8.0).round() as usize;
                LEVELS[level.min(8)]
            })
            .collect();

        line.push_str(&format!("  x {:>3.0}%  y {:>3.0}%", phase_x * 100.0, phase_y * 100.0));
        line
    }
}

impl AnimatorObserver for BarChartView {
    fn animator_updated(&self, animator: &AnimatorHandle) {
        let frame = self.frame(animator.phase_x(), animator.phase_y());
        self.redraws.set(self.redraws.get() + 1);

        let mut stdout = io::stdout().lock();
        if let Err(e) = write!(stdout, "\r{}", frame).and_then(|_| stdout.flush()) {
            tracing::warn!("failed to draw frame: {}", e);
        }
    }

    fn animator_stopped(&self, _animator: &AnimatorHandle) {
        println!();
    }
}

use std::collections::VecDeque;

use eframe::egui;

/// Initial axis extents; both grow as data arrives.
const INITIAL_X_MAX: f64 = 100.0;
const INITIAL_Y_RANGE: (f64, f64) = (0.0, 100.0);
/// Headroom added when a value or tick falls outside the current axis.
const AXIS_MARGIN: f64 = 10.0;

/// Line series for one channel, plotted against the refresh tick.
pub struct TrendChart {
    points: VecDeque<(f64, f64)>,
    capacity: usize,
    x_max: f64,
    y_min: f64,
    y_max: f64,
    color: egui::Color32,
}

impl TrendChart {
    #[must_use]
    pub fn new(capacity: usize, color: egui::Color32) -> Self {
        Self {
            points: VecDeque::with_capacity(capacity.max(1)),
            capacity: capacity.max(1),
            x_max: INITIAL_X_MAX,
            y_min: INITIAL_Y_RANGE.0,
            y_max: INITIAL_Y_RANGE.1,
            color,
        }
    }

    /// Appends a point, widening the axes when it falls outside them.
    pub fn push(&mut self, tick: u64, value: f64) {
        let x = tick as f64;
        if self.points.len() == self.capacity {
            self.points.pop_front();
        }
        self.points.push_back((x, value));

        if x > self.x_max {
            self.x_max = x + AXIS_MARGIN;
        }
        if value < self.y_min {
            self.y_min = value - AXIS_MARGIN;
        }
        if value > self.y_max {
            self.y_max = value + AXIS_MARGIN;
        }
    }

    #[must_use]
    pub fn y_range(&self) -> (f64, f64) {
        (self.y_min, self.y_max)
    }

    #[must_use]
    pub fn x_max(&self) -> f64 {
        self.x_max
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Maps the series into `rect`, x from 0 to `x_max`, y bottom-up.
    #[must_use]
    pub fn screen_points(&self, rect: egui::Rect) -> Vec<egui::Pos2> {
        let y_span = (self.y_max - self.y_min).max(f64::EPSILON);
        self.points
            .iter()
            .map(|&(x, y)| {
                let fx = (x / self.x_max) as f32;
                let fy = ((y - self.y_min) / y_span) as f32;
                egui::pos2(
                    rect.left() + fx * rect.width(),
                    rect.bottom() - fy * rect.height(),
                )
            })
            .collect()
    }

    pub fn show(&self, ui: &mut egui::Ui, size: egui::Vec2) {
        let (rect, _) = ui.allocate_exact_size(size, egui::Sense::hover());
        let painter = ui.painter_at(rect);
        painter.rect_filled(rect, 2.0, egui::Color32::from_gray(24));

        let small = egui::FontId::monospace(10.0);
        painter.text(
            rect.left_top() + egui::vec2(4.0, 2.0),
            egui::Align2::LEFT_TOP,
            format!("{:.1}", self.y_max),
            small.clone(),
            egui::Color32::GRAY,
        );
        painter.text(
            rect.left_bottom() + egui::vec2(4.0, -2.0),
            egui::Align2::LEFT_BOTTOM,
            format!("{:.1}", self.y_min),
            small,
            egui::Color32::GRAY,
        );

        if self.points.len() >= 2 {
            painter.add(egui::Shape::line(
                self.screen_points(rect),
                egui::Stroke::new(1.5, self.color),
            ));
        }
    }
}

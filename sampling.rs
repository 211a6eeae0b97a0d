//! Rolling average of the most recent readings.

use std::collections::VecDeque;
use std::fmt;

use crate::structs::Reading;

/// Readings averaged by the smoke-test loop.
pub const WINDOW_LEN: usize = 5;

/// Current average of one quantity plus the extremes that average has reached.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stats {
    pub average: f64,
    pub min: f64,
    pub max: f64,
}

impl Stats {
    fn first(value: f64) -> Self {
        Self {
            average: value,
            min: value,
            max: value,
        }
    }

    fn update(&mut self, average: f64) {
        self.average = average;
        self.min = self.min.min(average);
        self.max = self.max.max(average);
    }

    pub fn spread(&self) -> f64 {
        self.max - self.min
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Summary {
    /// °C
    pub temperature: Stats,
    /// mbar
    pub pressure: Stats,
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let t = &self.temperature;
        let p = &self.pressure;
        write!(
            f,
            "{:.2} {:.2} {:.2} {:.2} {:.2} {:.2} {:.2} {:.2}",
            t.average,
            t.min,
            t.max,
            t.spread(),
            p.average,
            p.min,
            p.max,
            p.spread()
        )
    }
}

pub struct RollingWindow {
    capacity: usize,
    readings: VecDeque<Reading>,
    summary: Option<Summary>,
}

impl RollingWindow {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            readings: VecDeque::with_capacity(capacity),
            summary: None,
        }
    }

    /// Adds a reading, evicting the oldest once full, and returns the new summary.
    pub fn push(&mut self, reading: Reading) -> Summary {
        if self.readings.len() == self.capacity {
            self.readings.pop_front();
        }
        self.readings.push_back(reading);

        let n = self.readings.len() as f64;
        let temperature = self.readings.iter().map(Reading::celsius).sum::<f64>() / n;
        let pressure = self.readings.iter().map(Reading::millibar).sum::<f64>() / n;

        let summary = match self.summary {
            None => Summary {
                temperature: Stats::first(temperature),
                pressure: Stats::first(pressure),
            },
            Some(mut summary) => {
                summary.temperature.update(temperature);
                summary.pressure.update(pressure);
                summary
            }
        };
        self.summary = Some(summary);
        summary
    }

    pub fn summary(&self) -> Option<Summary> {
        self.summary
    }

    pub fn len(&self) -> usize {
        self.readings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }
}

impl Default for RollingWindow {
    fn default() -> Self {
        Self::new(WINDOW_LEN)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reading(temperature: i32, pressure: i32) -> Reading {
        Reading {
            temperature,
            pressure,
        }
    }

    #[test]
    fn first_reading_sets_everything() {
        let mut window = RollingWindow::default();
        assert!(window.is_empty());
        assert_eq!(window.summary(), None);

        let summary = window.push(reading(2015, 10005));
        assert_eq!(summary.temperature, Stats::first(20.15));
        assert_eq!(summary.pressure, Stats::first(1000.5));
        assert_eq!(summary.temperature.spread(), 0.0);
    }

    #[test]
    fn keeps_only_the_last_five() {
        let mut window = RollingWindow::default();
        for t in [1000, 1000, 1000, 1000, 1000, 2000, 2000, 2000, 2000, 2000] {
            window.push(reading(t, 10000));
        }
        assert_eq!(window.len(), WINDOW_LEN);

        let summary = window.summary().unwrap();
        assert_eq!(summary.temperature.average, 20.0);
        assert_eq!(summary.temperature.min, 10.0);
        assert_eq!(summary.temperature.max, 20.0);
        assert_eq!(summary.pressure.spread(), 0.0);
    }

    #[test]
    fn extremes_track_averages_below_zero() {
        let mut window = RollingWindow::new(2);
        window.push(reading(-500, 9000));
        let summary = window.push(reading(-300, 9000));
        assert_eq!(summary.temperature.average, -4.0);
        assert_eq!(summary.temperature.max, -4.0);
        assert_eq!(summary.temperature.min, -5.0);
    }

    #[test]
    fn summary_line() {
        let mut window = RollingWindow::default();
        let summary = window.push(reading(2015, 10005));
        assert_eq!(
            summary.to_string(),
            "20.15 20.15 20.15 0.00 1000.50 1000.50 1000.50 0.00"
        );
    }
}

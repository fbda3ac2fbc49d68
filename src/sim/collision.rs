//! Proximity windows between the ball and transient entities
//!
//! The ball never moves sideways; it sits at `BALL_X` percent of the play
//! field. Hits are box tests around the ball probe taken at the top of the
//! frame.

use crate::consts::BALL_X;

use super::state::BallState;

/// Ball position sampled once per frame, before integration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BallProbe {
    pub altitude: f64,
    pub velocity: f64,
    pub in_flight: bool,
}

impl BallProbe {
    pub fn new(ball: &BallState) -> Self {
        Self {
            altitude: ball.position,
            velocity: ball.velocity,
            in_flight: ball.is_launched,
        }
    }
}

/// Axis-aligned pickup window centered on the ball
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Window {
    /// Half-height in altitude units
    pub vertical: f64,
    /// Half-width in play-field percent; `None` ignores x
    pub horizontal: Option<f32>,
}

impl Window {
    pub const fn vertical(vertical: f64) -> Self {
        Self {
            vertical,
            horizontal: None,
        }
    }

    pub const fn boxed(vertical: f64, horizontal: f32) -> Self {
        Self {
            vertical,
            horizontal: Some(horizontal),
        }
    }

    /// Whether an entity at (`altitude`, `x`) lies inside the window
    pub fn contains(&self, probe: &BallProbe, altitude: f64, x: f32) -> bool {
        if (probe.altitude - altitude).abs() >= self.vertical {
            return false;
        }
        match self.horizontal {
            Some(band) => (x - BALL_X).abs() < band,
            None => true,
        }
    }
}

/// Indices of every entity inside the window, computed over the full set
pub fn hits<T>(
    entities: &[T],
    probe: &BallProbe,
    window: Window,
    position: impl Fn(&T) -> (f64, f32),
) -> Vec<usize> {
    entities
        .iter()
        .enumerate()
        .filter(|(_, e)| {
            let (altitude, x) = position(e);
            window.contains(probe, altitude, x)
        })
        .map(|(i, _)| i)
        .collect()
}

/// Split `entities` into (kept, removed) by index list, preserving order
pub fn take_indices<T>(entities: &mut Vec<T>, indices: &[usize]) -> Vec<T> {
    if indices.is_empty() {
        return Vec::new();
    }
    let mut removed = Vec::with_capacity(indices.len());
    let mut kept = Vec::with_capacity(entities.len() - indices.len());
    for (i, entity) in entities.drain(..).enumerate() {
        if indices.contains(&i) {
            removed.push(entity);
        } else {
            kept.push(entity);
        }
    }
    *entities = kept;
    removed
}

#[cfg(test)]
mod tests {
    use super::*;

    fn probe(altitude: f64) -> BallProbe {
        BallProbe {
            altitude,
            velocity: 10.0,
            in_flight: true,
        }
    }

    #[test]
    fn test_vertical_window() {
        let window = Window::vertical(50.0);
        let p = probe(1000.0);
        assert!(window.contains(&p, 1049.0, 0.0));
        assert!(window.contains(&p, 951.0, 99.0));
        assert!(!window.contains(&p, 1050.0, 50.0));
        assert!(!window.contains(&p, 900.0, 50.0));
    }

    #[test]
    fn test_boxed_window() {
        let window = Window::boxed(40.0, 8.0);
        let p = probe(500.0);
        assert!(window.contains(&p, 520.0, 55.0));
        assert!(!window.contains(&p, 520.0, 58.0));
        assert!(!window.contains(&p, 545.0, 50.0));
    }

    #[test]
    fn test_hits_scans_full_set() {
        let altitudes = [100.0, 2000.0, 120.0, 90.0];
        let found = hits(&altitudes, &probe(100.0), Window::vertical(50.0), |a| (*a, 50.0));
        assert_eq!(found, vec![0, 2, 3]);
    }

    #[test]
    fn test_take_indices_bulk_removal() {
        let mut items = vec!['a', 'b', 'c', 'd'];
        let removed = take_indices(&mut items, &[1, 3]);
        assert_eq!(removed, vec!['b', 'd']);
        assert_eq!(items, vec!['a', 'c']);
        assert!(take_indices(&mut items, &[]).is_empty());
    }
}

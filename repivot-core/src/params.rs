/// Parameters controlling pivot estimation
use crate::pivot::Axis;

/// How the center operations pick a point
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CenterStrategy {
    /// Midpoint of the world-space bounding box.
    #[default]
    Bounds,
    /// Plain mean of the world-space vertex positions. Every vertex has
    /// equal weight regardless of the surface area around it.
    Average,
}

/// Parameters for pivot estimation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PivotParams {
    /// Strategy used by the horizontal and vertical center operations.
    /// Default: `Bounds`
    pub center: CenterStrategy,

    /// World axis treated as vertical. Top/bottom snap along it and
    /// horizontal centering uses the other two. Default: `Y`
    pub up: Axis,
}

impl Default for PivotParams {
    fn default() -> Self {
        Self {
            center: CenterStrategy::Bounds,
            up: Axis::Y,
        }
    }
}

impl PivotParams {
    /// Params that center on the vertex mean instead of the bounds.
    #[must_use]
    pub fn weighted_average() -> Self {
        Self {
            center: CenterStrategy::Average,
            ..Default::default()
        }
    }

    #[must_use]
    pub const fn with_center(mut self, center: CenterStrategy) -> Self {
        self.center = center;
        self
    }

    #[must_use]
    pub const fn with_up(mut self, up: Axis) -> Self {
        self.up = up;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_params() {
        let params = PivotParams::default();
        assert_eq!(params.center, CenterStrategy::Bounds);
        assert_eq!(params.up, Axis::Y);
    }

    #[test]
    fn test_builders() {
        let params = PivotParams::weighted_average().with_up(Axis::Z);
        assert_eq!(params.center, CenterStrategy::Average);
        assert_eq!(params.up, Axis::Z);
        assert_eq!(
            params.with_center(CenterStrategy::Bounds).center,
            CenterStrategy::Bounds
        );
    }
}

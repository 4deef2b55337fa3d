use nalgebra::Vector3;

/// Axis-aligned box in local sensor coordinates [mm]
#[derive(Debug, Clone, PartialEq)]
pub struct BoundingBox {
    pub lower_left: [f64; 3],
    pub upper_right: [f64; 3],
    pub center: [f64; 3],
    pub width: [f64; 3],
}

impl BoundingBox {
    pub fn new(lower_left: [f64; 3], upper_right: [f64; 3]) -> Self {
        let center = [
            0.5 * (lower_left[0] + upper_right[0]),
            0.5 * (lower_left[1] + upper_right[1]),
            0.5 * (lower_left[2] + upper_right[2]),
        ];
        let width = [
            upper_right[0] - lower_left[0],
            upper_right[1] - lower_left[1],
            upper_right[2] - lower_left[2],
        ];
        BoundingBox {
            lower_left,
            upper_right,
            center,
            width,
        }
    }

    /// Box of the given full size centred on the origin
    pub fn centered(size: [f64; 3]) -> Self {
        Self::new(
            [-0.5 * size[0], -0.5 * size[1], -0.5 * size[2]],
            [0.5 * size[0], 0.5 * size[1], 0.5 * size[2]],
        )
    }

    /// Closed-interval containment test
    pub fn contains(&self, point: &Vector3<f64>) -> bool {
        (0..3).all(|i| point[i] >= self.lower_left[i] && point[i] <= self.upper_right[i])
    }
}

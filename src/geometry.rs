use crate::bounding_box::BoundingBox;
use nalgebra::{Rotation3, Vector3};

/// What the stepping engine needs to know about the sensor.
///
/// All positions handed to the engine are local sensor coordinates in mm, with the
/// sensor centred on the origin and its thickness along z.
pub trait SensorGeometry {
    fn is_within_sensor(&self, local: &Vector3<f64>) -> bool;

    fn local_to_global(&self, local: &Vector3<f64>) -> Vector3<f64>;

    /// Sensor thickness along z [mm]
    fn sensor_thickness(&self) -> f64;

    /// Pixel pitch [mm]
    fn pixel_pitch(&self) -> f64;
}

/// Rectangular silicon sensor placed in the global frame by a rotation and a translation.
#[derive(Debug, Clone)]
pub struct SensorBox {
    pub bounds: BoundingBox,
    pub pitch: f64,
    pub orientation: Rotation3<f64>,
    pub position: Vector3<f64>,
}

impl SensorBox {
    /// Sensor of full size `size` [mm] at the global origin
    pub fn new(size: [f64; 3], pitch: f64) -> Self {
        SensorBox {
            bounds: BoundingBox::centered(size),
            pitch,
            orientation: Rotation3::identity(),
            position: Vector3::zeros(),
        }
    }

    /// Place the sensor centre at `position` with the given orientation
    pub fn placed(mut self, position: Vector3<f64>, orientation: Rotation3<f64>) -> Self {
        self.position = position;
        self.orientation = orientation;
        self
    }
}

impl SensorGeometry for SensorBox {
    fn is_within_sensor(&self, local: &Vector3<f64>) -> bool {
        self.bounds.contains(local)
    }

    fn local_to_global(&self, local: &Vector3<f64>) -> Vector3<f64> {
        self.orientation * local + self.position
    }

    fn sensor_thickness(&self) -> f64 {
        self.bounds.width[2]
    }

    fn pixel_pitch(&self) -> f64 {
        self.pitch
    }
}

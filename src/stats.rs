use nalgebra::Vector3;
use rand::Rng;
use rand_distr::{Distribution, Normal};

/// Angular distribution of the beam direction
#[derive(Debug, Clone, PartialEq)]
pub enum AngularDistribution {
    Isotropic,
    Monodirectional {
        reference_uvw: [f64; 3],
    },
    /// Gaussian divergence [rad] around a reference direction, independently in the
    /// planes containing the x and y axes
    Divergent {
        reference_uvw: [f64; 3],
        sigma_x: f64,
        sigma_y: f64,
    },
}

fn normalized(u: f64, v: f64, w: f64) -> Option<[f64; 3]> {
    let mag = (u * u + v * v + w * w).sqrt();
    (mag > 0.0 && mag.is_finite()).then(|| [u / mag, v / mag, w / mag])
}

impl AngularDistribution {
    /// `None` for a zero-length direction
    pub fn new_monodirectional(u: f64, v: f64, w: f64) -> Option<Self> {
        normalized(u, v, w).map(|reference_uvw| Self::Monodirectional { reference_uvw })
    }

    pub fn new_isotropic() -> Self {
        Self::Isotropic
    }

    /// `None` for a zero-length direction or a negative width
    pub fn new_divergent(uvw: [f64; 3], sigma_x: f64, sigma_y: f64) -> Option<Self> {
        if !(sigma_x >= 0.0 && sigma_y >= 0.0) {
            return None;
        }
        normalized(uvw[0], uvw[1], uvw[2]).map(|reference_uvw| Self::Divergent {
            reference_uvw,
            sigma_x,
            sigma_y,
        })
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Vector3<f64> {
        match self {
            AngularDistribution::Isotropic => {
                let mu = 2.0 * rng.gen::<f64>() - 1.0;
                let phi = 2.0 * std::f64::consts::PI * rng.gen::<f64>();
                let sqrt_one_minus_mu2 = (1.0 - mu * mu).sqrt();
                Vector3::new(sqrt_one_minus_mu2 * phi.cos(), sqrt_one_minus_mu2 * phi.sin(), mu)
            }
            AngularDistribution::Monodirectional { reference_uvw } => {
                Vector3::from_row_slice(reference_uvw)
            }
            AngularDistribution::Divergent {
                reference_uvw,
                sigma_x,
                sigma_y,
            } => {
                let reference = Vector3::from_row_slice(reference_uvw);
                let ax = gaussian(*sigma_x, rng);
                let ay = gaussian(*sigma_y, rng);
                let (e1, e2) = transverse_axes(&reference);
                (reference + ax.tan() * e1 + ay.tan() * e2).normalize()
            }
        }
    }
}

fn gaussian<R: Rng + ?Sized>(sigma: f64, rng: &mut R) -> f64 {
    match Normal::new(0.0, sigma) {
        Ok(normal) if sigma > 0.0 => normal.sample(rng),
        _ => 0.0,
    }
}

/// Two unit vectors perpendicular to `d` and to each other, the first one as close to the
/// x axis as possible
fn transverse_axes(d: &Vector3<f64>) -> (Vector3<f64>, Vector3<f64>) {
    let seed = if d.x.abs() < 0.99 {
        Vector3::x()
    } else {
        Vector3::y()
    };
    let e1 = (seed - d * seed.dot(d)).normalize();
    let e2 = d.cross(&e1);
    (e1, e2)
}

/// Piecewise-linear density on [-1, 1] with weights 1, 0, 1 at -1, 0, 1: p(x) = |x|.
///
/// Shapes the energy shared by the two valence holes of an Auger transition.
#[derive(Debug, Clone, Copy, Default)]
pub struct VShaped;

impl Distribution<f64> for VShaped {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        let u: f64 = rng.gen();
        if u < 0.5 {
            -(1.0 - 2.0 * u).sqrt()
        } else {
            (2.0 * u - 1.0).sqrt()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_monodirectional_distribution() {
        let mut rng = StdRng::seed_from_u64(1);
        let mono = AngularDistribution::new_monodirectional(0.0, 0.0, 2.0).unwrap();
        assert_eq!(mono.sample(&mut rng), Vector3::new(0.0, 0.0, 1.0));
        assert!(AngularDistribution::new_monodirectional(0.0, 0.0, 0.0).is_none());
    }

    #[test]
    fn test_isotropic_distribution() {
        let mut rng = StdRng::seed_from_u64(2);
        let iso = AngularDistribution::new_isotropic();
        let mut mean = Vector3::zeros();
        for _ in 0..10000 {
            let d = iso.sample(&mut rng);
            assert!((d.norm() - 1.0).abs() < 1e-10);
            mean += d;
        }
        mean /= 10000.0;
        assert!(mean.norm() < 0.05);
    }

    #[test]
    fn test_divergent_distribution_spreads_around_reference() {
        let mut rng = StdRng::seed_from_u64(3);
        let beam = AngularDistribution::new_divergent([0.0, 0.0, 1.0], 0.01, 0.0).unwrap();
        let mut sum_x2 = 0.0;
        let n = 5000;
        for _ in 0..n {
            let d = beam.sample(&mut rng);
            assert!((d.norm() - 1.0).abs() < 1e-10);
            assert!(d.y.abs() < 1e-12);
            assert!(d.z > 0.99);
            sum_x2 += d.x * d.x;
        }
        let rms = (sum_x2 / n as f64).sqrt();
        assert!((rms - 0.01).abs() < 0.001, "rms {}", rms);
        assert!(AngularDistribution::new_divergent([0.0, 0.0, 1.0], -1.0, 0.0).is_none());
    }

    #[test]
    fn test_transverse_axes_are_orthonormal() {
        for d in [Vector3::z(), Vector3::x(), Vector3::new(1.0, 2.0, -0.5).normalize()] {
            let (e1, e2) = transverse_axes(&d);
            assert!(e1.dot(&d).abs() < 1e-12);
            assert!(e2.dot(&d).abs() < 1e-12);
            assert!(e1.dot(&e2).abs() < 1e-12);
            assert!((e1.norm() - 1.0).abs() < 1e-12);
            assert!((e2.norm() - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_v_shaped_moments() {
        let mut rng = StdRng::seed_from_u64(4);
        let n = 100_000;
        let mut sum = 0.0;
        let mut sum_abs = 0.0;
        for _ in 0..n {
            let x = VShaped.sample(&mut rng);
            assert!((-1.0..=1.0).contains(&x));
            sum += x;
            sum_abs += x.abs();
        }
        // E[x] = 0, E[|x|] = 2/3 for p(x) = |x|
        assert!((sum / n as f64).abs() < 0.01);
        assert!((sum_abs / n as f64 - 2.0 / 3.0).abs() < 0.01);
    }

    #[test]
    fn test_send_sync_bounds() {
        fn assert_send<T: Send>() {}
        fn assert_sync<T: Sync>() {}
        assert_send::<AngularDistribution>();
        assert_sync::<AngularDistribution>();
    }
}

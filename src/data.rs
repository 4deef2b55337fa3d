// Physical constants of silicon and the atomic-shell tables of the photoabsorption model.

use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Electron rest mass [MeV].
pub const ELECTRON_MASS: f64 = 0.51099906;

/// Rydberg energy [eV].
pub const RYDBERG: f64 = 13.6056981;

/// Bohr radius [cm].
pub const BOHR_RADIUS: f64 = 0.529177e-8;

/// Speed of light [mm/ns].
pub const SPEED_OF_LIGHT: f64 = 299.792458;

/// Avogadro constant [1/mol].
pub const AVOGADRO: f64 = 6.0221367e23;

/// Atomic number of the absorber (silicon).
pub const ATOMIC_NUMBER: f64 = 14.0;

/// Atomic weight of silicon [g/mol].
pub const ATOMIC_WEIGHT: f64 = 28.086;

/// Density of silicon [g/cm3].
pub const DENSITY: f64 = 2.329;

/// Radiation length of silicon [cm].
pub const RADIATION_LENGTH: f64 = 9.36;

/// Number of atoms per cm3.
pub const ATOMS_PER_CM3: f64 = AVOGADRO * DENSITY / ATOMIC_WEIGHT;

/// Prefactor of the collision cross section, 8 pi R^2 a0^2 / m_e, with m_e in eV.
pub const CROSS_SECTION_PREFACTOR: f64 =
    8.0 * std::f64::consts::PI * RYDBERG * RYDBERG * BOHR_RADIUS * BOHR_RADIUS
        / ELECTRON_MASS
        / 1e6;

/// Conversion between Im(-1/epsilon) and the dipole oscillator strength per eV.
pub const OSCILLATOR_STRENGTH_FACTOR: f64 = 0.0092456;

/// Mean energy needed to create one electron-hole pair [eV].
pub const MEAN_PAIR_ENERGY: f64 = 3.645;

/// Optical phonon energy [eV] lost per phonon emission in the slow pair model.
pub const PHONON_ENERGY: f64 = 0.063;

/// Phonon coupling constant of the ionization / phonon competition (Alig et al. 1980).
pub const PHONON_COUPLING: f64 = 5.2;

/// K-shell absorption edge of silicon [eV]; the energy grid is aligned to it.
pub const K_SHELL_EDGE: f64 = 1839.0;

/// Atomic shells that can absorb a virtual photon.
///
/// The M shell is folded into the valence band: its absorption is treated as a valence
/// excitation below the upper band edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shell {
    Valence,
    L23,
    L1,
    K,
}

impl Shell {
    /// Binding energy [eV]; for the valence band this is the upper band edge.
    pub fn binding_energy(self) -> f64 {
        match self {
            Shell::Valence => 12.0,
            Shell::L23 => 99.2,
            Shell::L1 => 148.7,
            Shell::K => K_SHELL_EDGE,
        }
    }
}

/// Width of the valence band [eV]; holes live below this edge.
pub const VALENCE_BAND_WIDTH: f64 = 12.0;

/// Photon energies [eV] at which the shell absorption probabilities are tabulated.
///
/// Extrapolated from Fig. 1 of G.W. Fraser et al., Nucl. Instr. and Meth. A 350 (1994)
/// 368. Repeated abscissae mark the absorption edges.
pub const ABSORPTION_ENERGIES: [f64; 14] = [
    0.0, 40.0, 50.0, 99.2, 99.2, 148.7, 148.7, 150.0, 300.0, 500.0, 1000.0, 1839.0, 1839.0, 2000.0,
];

/// Absorption probability of the M shell (valence) at [`ABSORPTION_ENERGIES`].
pub const ABSORPTION_M: [f64; 14] = [
    0.0, 1.0, 1.0, 1.0, 0.03, 0.03, 0.02, 0.02, 0.02, 0.02, 0.03, 0.05, 0.0, 0.0,
];

/// Absorption probability of the L2,3 shells.
pub const ABSORPTION_L23: [f64; 14] = [
    0.0, 0.0, 0.0, 0.0, 0.97, 0.92, 0.88, 0.88, 0.83, 0.70, 0.55, 0.39, 0.0, 0.0,
];

/// Absorption probability of the L1 shell.
pub const ABSORPTION_L1: [f64; 14] = [
    0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.1, 0.1, 0.15, 0.28, 0.42, 0.56, 0.08, 0.08,
];

/// Absorption probability of the K shell.
pub const ABSORPTION_K: [f64; 14] = [
    0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.92, 0.92,
];

/// Auger / Coster-Kronig channels of one shell vacancy: branching ratio and the energy
/// [eV] released by the transition.
#[derive(Debug, Clone, Copy)]
pub struct AugerChannels {
    pub probability: &'static [f64],
    pub energy: &'static [f64],
}

/// K-shell vacancy decays, ordered KL1L1, KL1L23, KL23L23, KL1M (2x), KL23M (2x), KMM (2x).
pub const AUGER_K: AugerChannels = AugerChannels {
    probability: &[0.1920, 0.3885, 0.2325, 0.0720, 0.0030, 0.1000, 0.0040, 0.0070, 0.0010],
    energy: &[1541.6, 1591.1, 1640.6, 1690.3, 1690.3, 1739.8, 1739.8, 1839.0, 1839.0],
};

/// L1-shell vacancy decays: L1MM and the Coster-Kronig transition L1L23M.
pub const AUGER_L1: AugerChannels = AugerChannels {
    probability: &[0.0250, 0.9750],
    energy: &[148.7, 49.5],
};

/// L23-shell vacancy decays: L23MM and a radiative channel that deposits nothing.
pub const AUGER_L23: AugerChannels = AugerChannels {
    probability: &[0.9990, 0.0010],
    energy: &[99.2, 0.0],
};

/// Cumulative branching ratios of the Auger channels per inner shell.
///
/// Built once from [`AUGER_K`], [`AUGER_L1`] and [`AUGER_L23`] so the decision tree in
/// the ionizer can sample a channel by inversion.
pub static AUGER_CUMULATIVE: Lazy<HashMap<Shell, Vec<f64>>> = Lazy::new(|| {
    let mut map = HashMap::new();
    for (shell, channels) in [
        (Shell::K, AUGER_K),
        (Shell::L1, AUGER_L1),
        (Shell::L23, AUGER_L23),
    ] {
        let mut running = 0.0;
        let cumulative = channels
            .probability
            .iter()
            .map(|p| {
                running += p;
                running
            })
            .collect();
        map.insert(shell, cumulative);
    }
    map
});

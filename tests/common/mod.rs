// Synthetic silicon-like tables written in the HEPS / MACOM / EMERC text formats.
#![allow(dead_code)]

use bichsel_mc::cross_sections::{energy_grid, NUME};
use bichsel_mc::data::{K_SHELL_EDGE, OSCILLATOR_STRENGTH_FACTOR};
use bichsel_mc::{
    CrossSectionTables, DepositionBichsel, DepositionConfig, InMemoryTables, SensorBox,
};
use std::fmt::Write as _;
use std::path::Path;
use std::sync::Arc;

/// One row per bin: (E, df/dE, A(E), xkmn). A plasmon line at 17 eV carrying four
/// electrons, eight L electrons above 99.2 eV and two K electrons above the K edge.
fn rows() -> Vec<(f64, f64, f64, f64)> {
    let (energy, delta_energy) = energy_grid();
    let mut integral = 0.0;
    (0..NUME)
        .map(|j| {
            let e = energy[j];
            let mut df = 4.0 / std::f64::consts::PI * 3.0 / ((e - 17.0).powi(2) + 9.0);
            if e > 99.2 {
                df += 8.0 * 1.5 * 99.2f64.powf(1.5) / e.powf(2.5);
            }
            if e > K_SHELL_EDGE {
                df += 2.0 * 1.5 * K_SHELL_EDGE.powf(1.5) / e.powf(2.5);
            }
            integral += df * delta_energy[j];
            let ae = 3.0 * e * df + 0.25 * integral;
            let xkmn = if e < 11.9 { 0.3 } else { 0.0 };
            (e, df, ae, xkmn)
        })
        .collect()
}

pub fn heps_text() -> String {
    let mut text = format!("64 {}\n", NUME);
    for (j, (e, df, _, _)) in rows().into_iter().enumerate() {
        let eps2 = df / (OSCILLATOR_STRENGTH_FACTOR * e);
        let _ = writeln!(text, "{} {:e} 1.0 {:e} {:e}", j + 1, e, eps2, eps2);
    }
    text
}

pub fn macom_text() -> String {
    let mut text = format!("64 {}\n", NUME);
    for (j, (e, _, ae, _)) in rows().into_iter().enumerate() {
        let _ = writeln!(text, "{} {:e} {:e}", j + 1, e, ae);
    }
    text
}

pub fn emerc_text() -> String {
    let mut text = String::from("EMERC synthetic\n  A(E) and xkmn\n\n  j   E   A   xkmn\n");
    for (j, (e, _, ae, xkmn)) in rows().into_iter().enumerate().take(200) {
        let _ = writeln!(text, "{} {:e} {:e} {:e}", j + 1, e, ae, xkmn);
    }
    text
}

pub fn in_memory_tables() -> InMemoryTables {
    let mut tables = InMemoryTables::new();
    tables.insert("HEPS", heps_text());
    tables.insert("MACOM", macom_text());
    tables.insert("EMERC", emerc_text());
    tables
}

/// Write HEPS.TAB, MACOM.TAB and EMERC.TAB into `dir`
pub fn write_tables(dir: &Path) -> std::io::Result<()> {
    std::fs::write(dir.join("HEPS.TAB"), heps_text())?;
    std::fs::write(dir.join("MACOM.TAB"), macom_text())?;
    std::fs::write(dir.join("EMERC.TAB"), emerc_text())?;
    Ok(())
}

pub fn synthetic_tables() -> Arc<CrossSectionTables> {
    Arc::new(CrossSectionTables::load(&in_memory_tables()).unwrap())
}

pub fn deposition(config: DepositionConfig) -> DepositionBichsel {
    DepositionBichsel::new(synthetic_tables(), config).unwrap()
}

/// 50 um thick sensor with 25 um pitch
pub fn thin_sensor() -> SensorBox {
    SensorBox::new([2.0, 2.0, 0.05], 0.025)
}

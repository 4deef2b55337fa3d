// Tabulated optical and generalized-oscillator-strength data of silicon.
//
// HEPS.TAB  dielectric constant and Im(-1/eps) per energy bin
// MACOM.TAB integral over momentum transfer of the generalized oscillator strength, A(E)
// EMERC.TAB low-energy A(E) overrides and the minimum momentum transfer xkmn
//
// The energy grid itself is generated and must agree with the grid the tables were
// written on: geometric, N2 bins per octave, aligned to the K edge at 1839 eV.

use crate::data::{K_SHELL_EDGE, OSCILLATOR_STRENGTH_FACTOR};
use crate::data_paths::TableReader;
use crate::error::{Error, Result};
use std::io::BufRead;

/// Energy bins per octave
pub const N2: usize = 64;
/// Number of energy bins
pub const NUME: usize = 1250;
/// Lowest energy the grid must reach [eV]
const GRID_FLOOR: f64 = 1.5;
/// EMERC rows are read while the row index is below this
const EMERC_LAST_ROW: usize = 200;

/// Immutable cross-section tables, shared read-only by all events.
#[derive(Debug, Clone)]
pub struct CrossSectionTables {
    /// Bin energies E[j] [eV]
    pub energy: Vec<f64>,
    /// Bin widths E[j+1] - E[j] [eV]; the last width is zero
    pub delta_energy: Vec<f64>,
    pub dielectric_real: Vec<f64>,
    pub dielectric_imag: Vec<f64>,
    /// Dipole oscillator strength df/dE [1/eV]
    pub oscillator_strength: Vec<f64>,
    /// A(E), integral of the generalized oscillator strength over momentum transfer
    pub oscillator_strength_ae: Vec<f64>,
    /// Minimum momentum transfer parameter used below 11.9 eV
    pub xkmn: Vec<f64>,
}

/// Geometric energy grid `(E, dE)` with `NUME` bins.
pub fn energy_grid() -> (Vec<f64>, Vec<f64>) {
    let u = std::f64::consts::LN_2 / N2 as f64;
    let um = u.exp();
    let ken = ((K_SHELL_EDGE / GRID_FLOOR).ln() / u) as i64;
    // integer division: the octave count, so that one bin lands on the K edge
    let e_min = K_SHELL_EDGE / 2f64.powi((ken / N2 as i64) as i32);

    let mut energy = vec![0.0; NUME];
    let mut delta_energy = vec![0.0; NUME];
    energy[0] = e_min;
    for j in 1..NUME {
        energy[j] = energy[j - 1] * um;
        delta_energy[j - 1] = energy[j] - energy[j - 1];
    }
    (energy, delta_energy)
}

impl CrossSectionTables {
    /// Generated grid with all tabulated quantities zero
    pub fn empty() -> Self {
        let (energy, delta_energy) = energy_grid();
        log::debug!(
            "n2 {}, Emin {}, E[nume] {}",
            N2,
            energy[0],
            energy[NUME - 1]
        );
        CrossSectionTables {
            energy,
            delta_energy,
            dielectric_real: vec![0.0; NUME],
            dielectric_imag: vec![0.0; NUME],
            oscillator_strength: vec![0.0; NUME],
            oscillator_strength_ae: vec![0.0; NUME],
            xkmn: vec![0.0; NUME],
        }
    }

    /// Read HEPS, MACOM and EMERC (in that order) from `reader`.
    pub fn load(reader: &dyn TableReader) -> Result<Self> {
        let mut tables = Self::empty();
        tables.read_heps(reader.open("HEPS")?)?;
        tables.read_macom(reader.open("MACOM")?)?;
        tables.read_emerc(reader.open("EMERC")?)?;
        Ok(tables)
    }

    pub fn len(&self) -> usize {
        self.energy.len()
    }

    pub fn is_empty(&self) -> bool {
        self.energy.is_empty()
    }

    pub fn read_heps<R: BufRead>(&mut self, reader: R) -> Result<()> {
        let mut lines = reader.lines();
        let numt = read_size_header("HEPS", &mut lines)?;

        let mut rows = 0usize;
        let mut jt = 1usize;
        let mut line_no = 1usize;
        while jt < numt {
            let Some(line) = lines.next() else { break };
            line_no += 1;
            let line = line?;
            let Some(fields) = split_row("HEPS", line_no, &line, 5)? else {
                continue;
            };
            jt = parse_index("HEPS", line_no, fields[0])?;
            let eps1 = parse_value("HEPS", line_no, fields[2])?;
            let eps2 = parse_value("HEPS", line_no, fields[3])?;
            let rim = parse_value("HEPS", line_no, fields[4])?;
            if let Some(slot) = slot(jt) {
                self.dielectric_real[slot] = eps1;
                self.dielectric_imag[slot] = eps2;
                // df/dE from Im(-1/eps), essentially Eq. (2.20) of RMP 43, 297
                self.oscillator_strength[slot] =
                    rim * OSCILLATOR_STRENGTH_FACTOR * self.energy[slot];
            }
            rows += 1;
        }
        log::info!("Read {} data lines from HEPS.TAB", rows);
        Ok(())
    }

    pub fn read_macom<R: BufRead>(&mut self, reader: R) -> Result<()> {
        let mut lines = reader.lines();
        let numt = read_size_header("MACOM", &mut lines)?;

        let mut rows = 0usize;
        let mut jt = 1usize;
        let mut line_no = 1usize;
        while jt < numt {
            let Some(line) = lines.next() else { break };
            line_no += 1;
            let line = line?;
            let Some(fields) = split_row("MACOM", line_no, &line, 3)? else {
                continue;
            };
            jt = parse_index("MACOM", line_no, fields[0])?;
            let ae = parse_value("MACOM", line_no, fields[2])?;
            if let Some(slot) = slot(jt) {
                self.oscillator_strength_ae[slot] = ae;
            }
            rows += 1;
        }
        log::info!("Read {} data lines from MACOM.TAB", rows);
        Ok(())
    }

    pub fn read_emerc<R: BufRead>(&mut self, reader: R) -> Result<()> {
        let mut lines = reader.lines();
        for _ in 0..4 {
            if let Some(line) = lines.next() {
                line?;
            }
        }

        let mut rows = 0usize;
        let mut jt = 1usize;
        let mut line_no = 4usize;
        while jt < EMERC_LAST_ROW {
            let Some(line) = lines.next() else { break };
            line_no += 1;
            let line = line?;
            let Some(fields) = split_row("EMERC", line_no, &line, 4)? else {
                continue;
            };
            jt = parse_index("EMERC", line_no, fields[0])?;
            let ae = parse_value("EMERC", line_no, fields[2])?;
            let xkmn = parse_value("EMERC", line_no, fields[3])?;
            if let Some(slot) = slot(jt) {
                self.oscillator_strength_ae[slot] = ae;
                self.xkmn[slot] = xkmn;
            }
            rows += 1;
        }
        log::info!("Read {} data lines from EMERC.TAB", rows);
        Ok(())
    }
}

/// Smooth silicon-like tables for unit tests: a valence plasmon line at 17 eV carrying
/// four electrons, eight L electrons above 99.2 eV and two K electrons above 1839 eV.
#[cfg(test)]
pub(crate) fn synthetic_tables() -> CrossSectionTables {
    let mut tables = CrossSectionTables::empty();
    let mut integral = 0.0;
    for j in 0..NUME {
        let e = tables.energy[j];
        let mut df = 4.0 / std::f64::consts::PI * 3.0 / ((e - 17.0).powi(2) + 9.0);
        if e > 99.2 {
            df += 8.0 * 1.5 * 99.2f64.powf(1.5) / e.powf(2.5);
        }
        if e > K_SHELL_EDGE {
            df += 2.0 * 1.5 * K_SHELL_EDGE.powf(1.5) / e.powf(2.5);
        }
        integral += df * tables.delta_energy[j];
        tables.oscillator_strength[j] = df;
        tables.dielectric_real[j] = 1.0;
        tables.dielectric_imag[j] = df / (OSCILLATOR_STRENGTH_FACTOR * e);
        tables.oscillator_strength_ae[j] = 3.0 * e * df + 0.25 * integral;
        tables.xkmn[j] = if e < 11.9 { 0.3 } else { 0.0 };
    }
    tables
}

/// 1-based file index to table slot; out-of-range rows are dropped
fn slot(index: usize) -> Option<usize> {
    (1..=NUME).contains(&index).then(|| index - 1)
}

/// Parse `n2t numt`, warn on a mismatch with the compiled grid, return min(numt, NUME)
fn read_size_header<I>(table: &str, lines: &mut I) -> Result<usize>
where
    I: Iterator<Item = std::io::Result<String>>,
{
    let header = match lines.next() {
        Some(line) => line?,
        None => {
            return Err(Error::TableParse {
                table: table.to_string(),
                line: 1,
                reason: "missing header".to_string(),
            })
        }
    };
    let fields = split_row(table, 1, &header, 2)?.ok_or_else(|| Error::TableParse {
        table: table.to_string(),
        line: 1,
        reason: "empty header".to_string(),
    })?;
    let n2t = parse_index(table, 1, fields[0])?;
    let numt = parse_index(table, 1, fields[1])?;

    log::debug!("{}.TAB: n2t {}, numt {}", table, n2t, numt);
    if n2t != N2 {
        log::warn!("{}: n2 & n2t differ ({} vs {})", table, N2, n2t);
    }
    if numt != NUME {
        log::warn!("{}: nume & numt differ ({} vs {})", table, NUME, numt);
    }
    Ok(numt.min(NUME))
}

/// Whitespace-split a row; `None` for blank lines, an error for short rows
fn split_row<'a>(
    table: &str,
    line_no: usize,
    line: &'a str,
    columns: usize,
) -> Result<Option<Vec<&'a str>>> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.is_empty() {
        return Ok(None);
    }
    if fields.len() < columns {
        return Err(Error::TableParse {
            table: table.to_string(),
            line: line_no,
            reason: format!("expected {} columns, found {}", columns, fields.len()),
        });
    }
    Ok(Some(fields))
}

fn parse_index(table: &str, line_no: usize, field: &str) -> Result<usize> {
    field
        .parse::<usize>()
        .or_else(|_| {
            field
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite() && *v >= 0.0 && v.fract() == 0.0)
                .map(|v| v as usize)
                .ok_or(())
        })
        .map_err(|_| Error::TableParse {
            table: table.to_string(),
            line: line_no,
            reason: format!("invalid index \"{}\"", field),
        })
}

fn parse_value(table: &str, line_no: usize, field: &str) -> Result<f64> {
    // Fortran-style exponents (1.0D-3) appear in some table versions
    let normalized = field.replace(['D', 'd'], "E");
    normalized.parse::<f64>().map_err(|_| Error::TableParse {
        table: table.to_string(),
        line: line_no,
        reason: format!("invalid number \"{}\"", field),
    })
}

//! Two-axis sensitivity tables
//!
//! Sweeps two parameters of one engine over a grid and records the headline
//! BCR at each point, holding every other parameter at its base value.

use crate::private::{compute_private_bcr, PrivateField, PrivateRdParams};
use crate::public::{compute_public_bcr, PublicField, PublicRdParams};
use anyhow::Context;
use serde::{Deserialize, Serialize};

/// A grid of BCR values with row and column headers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct SensitivityTable {
    pub title: String,
    pub description: String,
    /// Label of the swept row parameter
    pub row_axis: String,
    pub headers: Vec<String>,
    pub row_headers: Vec<String>,
    pub data: Vec<Vec<f64>>,
}

/// Evenly spaced values for one parameter
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sweep<F> {
    pub field: F,
    pub start: f64,
    pub step: f64,
    pub count: usize,
}

impl<F> Sweep<F> {
    /// `start + k * step` for k in 0..count, without accumulated drift
    pub fn values(&self) -> Vec<f64> {
        (0..self.count)
            .map(|k| self.start + self.step * k as f64)
            .collect()
    }
}

impl<F> std::str::FromStr for Sweep<F>
where
    F: std::str::FromStr<Err = String>,
{
    type Err = anyhow::Error;

    /// Parse `field=start:step:count`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (name, range) = s
            .split_once('=')
            .with_context(|| format!("invalid sweep '{}': expected field=start:step:count", s))?;
        let field = name.trim().parse::<F>().map_err(anyhow::Error::msg)?;

        let parts: Vec<&str> = range.split(':').map(str::trim).collect();
        if parts.len() != 3 {
            anyhow::bail!("invalid sweep '{}': expected field=start:step:count", s);
        }
        let start: f64 = parts[0]
            .parse()
            .with_context(|| format!("invalid sweep start '{}'", parts[0]))?;
        let step: f64 = parts[1]
            .parse()
            .with_context(|| format!("invalid sweep step '{}'", parts[1]))?;
        let count: usize = parts[2]
            .parse()
            .with_context(|| format!("invalid sweep count '{}'", parts[2]))?;

        if !start.is_finite() || !step.is_finite() {
            anyhow::bail!("sweep start and step must be finite (got {} and {})", start, step);
        }
        if count == 0 {
            anyhow::bail!("sweep count must be at least 1");
        }

        Ok(Sweep {
            field,
            start,
            step,
            count,
        })
    }
}

/// Private BCR over a grid of two private parameters
pub fn private_sweep(
    base: &PrivateRdParams,
    rows: &Sweep<PrivateField>,
    cols: &Sweep<PrivateField>,
) -> anyhow::Result<SensitivityTable> {
    if rows.field == cols.field {
        anyhow::bail!("rows and columns both sweep {}", rows.field);
    }

    let row_values = rows.values();
    let col_values = cols.values();
    let data = row_values
        .iter()
        .map(|&r| {
            col_values
                .iter()
                .map(|&c| {
                    let mut params = *base;
                    rows.field.set(&mut params, r);
                    cols.field.set(&mut params, c);
                    compute_private_bcr(&params).bcr
                })
                .collect()
        })
        .collect();

    let held = PrivateField::ALL
        .iter()
        .filter(|f| **f != rows.field && **f != cols.field)
        .map(|f| format!("{} = {}", f.label(), f.get(base)))
        .collect::<Vec<_>>()
        .join(", ");

    Ok(SensitivityTable {
        title: format!(
            "Private BCR with varying {} (rows) and {} (columns)",
            rows.field, cols.field
        ),
        description: format!("Held fixed: {}", held),
        row_axis: rows.field.label().to_string(),
        headers: axis_headers(cols.field.label(), &col_values),
        row_headers: row_values.iter().map(|v| format!("{:.2}", v)).collect(),
        data,
    })
}

/// Total public BCR over a grid of two public parameters
///
/// `private_bcr` is held fixed across the grid.
pub fn public_sweep(
    base: &PublicRdParams,
    private_bcr: f64,
    rows: &Sweep<PublicField>,
    cols: &Sweep<PublicField>,
) -> anyhow::Result<SensitivityTable> {
    if rows.field == cols.field {
        anyhow::bail!("rows and columns both sweep {}", rows.field);
    }

    let row_values = rows.values();
    let col_values = cols.values();
    let data = row_values
        .iter()
        .map(|&r| {
            col_values
                .iter()
                .map(|&c| {
                    let mut params = *base;
                    rows.field.set(&mut params, r);
                    cols.field.set(&mut params, c);
                    compute_public_bcr(&params, private_bcr).total_bcr
                })
                .collect()
        })
        .collect();

    let held = PublicField::ALL
        .iter()
        .filter(|f| **f != rows.field && **f != cols.field)
        .map(|f| format!("{} = {}", f.label(), f.get(base)))
        .collect::<Vec<_>>()
        .join(", ");

    Ok(SensitivityTable {
        title: format!(
            "Total public BCR with varying {} (rows) and {} (columns)",
            rows.field, cols.field
        ),
        description: format!("Held fixed: {}, private BCR = {:.2}", held, private_bcr),
        row_axis: rows.field.label().to_string(),
        headers: axis_headers(cols.field.label(), &col_values),
        row_headers: row_values.iter().map(|v| format!("{:.2}", v)).collect(),
        data,
    })
}

fn axis_headers(label: &str, values: &[f64]) -> Vec<String> {
    values
        .iter()
        .map(|v| format!("{} = {:.2}", label, v))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sweep<F>(field: F, start: f64, step: f64, count: usize) -> Sweep<F> {
        Sweep {
            field,
            start,
            step,
            count,
        }
    }

    #[test]
    fn test_private_grid_matches_engine() {
        let base = PrivateRdParams::default();
        let rows = sweep(PrivateField::DepreciationRate, 0.05, 0.05, 5);
        let cols = sweep(PrivateField::TechSpillover, 0.10, 0.05, 5);
        let table = private_sweep(&base, &rows, &cols).unwrap();

        assert_eq!(table.data.len(), 5);
        assert!(table.data.iter().all(|row| row.len() == 5));
        assert_eq!(table.headers[0], "Tech Ext = 0.10");
        assert_eq!(table.row_headers[4], "0.25");

        let params = PrivateRdParams {
            depreciation_rate: 0.05 + 0.05 * 2.0,
            tech_spillover: 0.10 + 0.05 * 3.0,
            ..base
        };
        assert_eq!(table.data[2][3], compute_private_bcr(&params).bcr);
    }

    #[test]
    fn test_higher_depreciation_lowers_bcr() {
        let rows = sweep(PrivateField::DepreciationRate, 0.05, 0.05, 5);
        let cols = sweep(PrivateField::TechSpillover, 0.10, 0.05, 3);
        let table = private_sweep(&PrivateRdParams::default(), &rows, &cols).unwrap();
        for col in 0..3 {
            for row in 1..5 {
                assert!(table.data[row][col] < table.data[row - 1][col]);
            }
        }
    }

    #[test]
    fn test_same_axis_is_rejected() {
        let rows = sweep(PublicField::LeverageRatio, 0.0, 0.1, 3);
        let result = public_sweep(&PublicRdParams::default(), 3.0, &rows, &rows);
        assert!(result.is_err());
    }

    #[test]
    fn test_public_grid_uses_fixed_private_bcr() {
        let rows = sweep(PublicField::DepreciationRate, 0.10, 0.05, 2);
        let cols = sweep(PublicField::LeverageRatio, 0.0, 1.0, 2);
        let table = public_sweep(&PublicRdParams::default(), 2.0, &rows, &cols).unwrap();
        // one extra unit of leverage adds exactly the private BCR
        let diff = table.data[0][1] - table.data[0][0];
        assert!((diff - 2.0).abs() < 1e-12);
        assert!(table.description.ends_with("private BCR = 2.00"));
    }

    #[test]
    fn test_parse_sweep() {
        let s: Sweep<PrivateField> = "tech_spillover=0.1:0.05:5".parse().unwrap();
        assert_eq!(s.field, PrivateField::TechSpillover);
        assert_eq!(s.count, 5);
        assert_eq!(s.values().len(), 5);

        assert!("tech_spillover=0.1:0.05".parse::<Sweep<PrivateField>>().is_err());
        assert!("nope=0.1:0.05:5".parse::<Sweep<PrivateField>>().is_err());
        assert!("tech_spillover=0.1:0.05:0".parse::<Sweep<PrivateField>>().is_err());
        assert!("tech_spillover".parse::<Sweep<PrivateField>>().is_err());
    }
}

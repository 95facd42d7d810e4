//! Vector-voltmeter solution of the resistor bridge

use num_complex::Complex64;

use crate::{detector::DetectorReading, error::ComputationError};

/// Impedance of the bridge's reference arm
pub const REFERENCE_IMPEDANCE_OHMS: f64 = 50.0;

/// Both detector readings of one measurement and the impedance they give
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BridgeMeasurement {
    pub reference: DetectorReading,
    pub antenna: DetectorReading,
    pub impedance: Complex64,
}

impl BridgeMeasurement {
    /// Resistance in ohms
    pub fn resistance(&self) -> f64 {
        self.impedance.re
    }

    /// Reactance in ohms
    pub fn reactance(&self) -> f64 {
        self.impedance.im
    }

    /// Phase of the antenna node relative to the reference node in degrees
    pub fn phase_difference(&self) -> f64 {
        self.antenna.degrees - self.reference.degrees
    }
}

/// Solve the bridge for the antenna impedance
///
/// The reference node sets the phase origin, so `Vref` is real and `Vant`
/// carries the phase difference between the two readings. Then
/// `Z = 50 * Vant / (2*Vref - Vant)`.
pub fn impedance_from_readings(
    reference: &DetectorReading,
    antenna: &DetectorReading,
) -> Result<Complex64, ComputationError> {
    let v_ref = Complex64::from_polar(reference.ratio, 0.0);
    let phase = (antenna.degrees - reference.degrees).to_radians();
    let v_ant = Complex64::from_polar(antenna.ratio, phase);
    let denom = v_ref * 2.0 - v_ant;
    let degenerate = ComputationError::DegenerateBridge {
        reference: v_ref,
        antenna: v_ant,
    };
    if denom.re == 0.0 && denom.im == 0.0 {
        return Err(degenerate);
    }
    let z = (v_ant / denom) * REFERENCE_IMPEDANCE_OHMS;
    // A denominator small enough to overflow the division is just as unbounded
    if !z.is_finite() {
        return Err(degenerate);
    }
    Ok(z)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn reading(ratio: f64, degrees: f64) -> DetectorReading {
        DetectorReading {
            vmag: 0,
            vphs: 0,
            ratio,
            degrees,
        }
    }

    #[test]
    fn balanced_bridge_is_exactly_fifty_ohms() {
        for (m, p) in [(1.0, 90.0), (0.25, 3.0), (17.3, 170.5)] {
            let z = impedance_from_readings(&reading(m, p), &reading(m, p)).unwrap();
            assert_eq!(z, Complex64::new(50.0, 0.0));
        }
    }

    #[test]
    fn open_circuit_is_a_computation_error() {
        let err = impedance_from_readings(&reading(0.5, 42.0), &reading(1.0, 42.0)).unwrap_err();
        assert!(matches!(err, ComputationError::DegenerateBridge { .. }));
    }

    #[test]
    fn short_circuit_is_zero() {
        let z = impedance_from_readings(&reading(1.0, 10.0), &reading(0.0, 10.0)).unwrap();
        assert_eq!(z, Complex64::new(0.0, 0.0));
    }

    #[test]
    fn resistive_load() {
        // Vant = Vref gives 50 ohms, Vant = Vref/2 gives 50 * 0.5/1.5
        let z = impedance_from_readings(&reading(2.0, 0.0), &reading(1.0, 0.0)).unwrap();
        assert_relative_eq!(z.re, 50.0 / 3.0, max_relative = 1e-12);
        assert_relative_eq!(z.im, 0.0);
    }

    #[test]
    fn quadrature_gives_reactance() {
        // Vant = j*Vref: Z = 50 * j / (2 - j) = 50 * (-1 + 2j) / 5
        let z = impedance_from_readings(&reading(1.0, 0.0), &reading(1.0, 90.0)).unwrap();
        assert_relative_eq!(z.re, -10.0, epsilon = 1e-9);
        assert_relative_eq!(z.im, 20.0, epsilon = 1e-9);
    }

    #[test]
    fn measurement_accessors() {
        let m = BridgeMeasurement {
            reference: reading(1.0, 10.0),
            antenna: reading(1.0, 40.0),
            impedance: Complex64::new(25.0, -5.0),
        };
        assert_eq!(m.resistance(), 25.0);
        assert_eq!(m.reactance(), -5.0);
        assert_eq!(m.phase_difference(), 30.0);
    }
}

//! Transfer functions of the AD8302 gain/phase detector
//!
//! Both outputs swing 30 mV to 1.8 V. VMAG maps that span onto -30..+30 dB of
//! input ratio and VPHS onto 180..0 degrees of phase difference (datasheet p. 2).

use crate::adc::AdcScale;

// Output voltage at the bottom of either transfer curve
const INTERCEPT_VOLTS: f64 = 0.03;
// Output swing over the full transfer curve
const SWING_VOLTS: f64 = 1.8;
const MAG_RANGE_DB: f64 = 60.0;
const MAG_FLOOR_DB: f64 = -30.0;
const PHASE_RANGE_DEG: f64 = 180.0;

/// Convert a raw VMAG code to a linear voltage ratio
pub fn vmag_to_ratio(vmag: i64) -> f64 {
    vmag_to_ratio_with_scale(vmag, &AdcScale::default())
}

pub fn vmag_to_ratio_with_scale(vmag: i64, scale: &AdcScale) -> f64 {
    let volts = scale.to_volts(vmag);
    let db = ((volts - INTERCEPT_VOLTS) / SWING_VOLTS) * MAG_RANGE_DB + MAG_FLOOR_DB;
    10f64.powf(db / 20.0)
}

/// Convert a raw VPHS code to a phase difference in degrees
pub fn vphs_to_degree(vphs: i64) -> f64 {
    vphs_to_degree_with_scale(vphs, &AdcScale::default())
}

pub fn vphs_to_degree_with_scale(vphs: i64, scale: &AdcScale) -> f64 {
    let volts = scale.to_volts(vphs);
    PHASE_RANGE_DEG - ((volts - INTERCEPT_VOLTS) / SWING_VOLTS) * PHASE_RANGE_DEG
}

/// Detector output at one bridge node
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DetectorReading {
    /// Raw VMAG code
    pub vmag: i64,
    /// Raw VPHS code
    pub vphs: i64,
    /// Magnitude as a linear voltage ratio
    pub ratio: f64,
    /// Phase in degrees
    pub degrees: f64,
}

impl DetectorReading {
    pub fn from_raw(vmag: i64, vphs: i64) -> Self {
        Self::from_raw_with_scale(vmag, vphs, &AdcScale::default())
    }

    pub fn from_raw_with_scale(vmag: i64, vphs: i64, scale: &AdcScale) -> Self {
        Self {
            vmag,
            vphs,
            ratio: vmag_to_ratio_with_scale(vmag, scale),
            degrees: vphs_to_degree_with_scale(vphs, scale),
        }
    }
}

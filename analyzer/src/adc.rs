//! Scaling of the analyzer's ADC codes

/// Reference voltage of the SAR ADC
pub const ADC_FULL_SCALE_VOLTS: f64 = 1.8;
/// Resolution of the SAR ADC
pub const ADC_RESOLUTION_BITS: u32 = 12;
/// Widest resolution an [`AdcScale`] accepts
pub const MAX_RESOLUTION_BITS: u32 = 32;

// The detector outputs are sampled single ended, doubling the usable span
const SINGLE_ENDED_GAIN: f64 = 2.0;

/// Conversion from ADC codes to volts
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdcScale {
    full_scale_volts: f64,
    resolution_bits: u32,
}

impl AdcScale {
    /// # Panics
    ///
    /// If `resolution_bits` is 0 or above [`MAX_RESOLUTION_BITS`]
    pub const fn new(full_scale_volts: f64, resolution_bits: u32) -> Self {
        assert!(
            resolution_bits >= 1 && resolution_bits <= MAX_RESOLUTION_BITS,
            "ADC resolution must be 1 to 32 bits"
        );
        Self {
            full_scale_volts,
            resolution_bits,
        }
    }

    pub fn full_scale_volts(&self) -> f64 {
        self.full_scale_volts
    }

    pub fn resolution_bits(&self) -> u32 {
        self.resolution_bits
    }

    /// Volts represented by one LSB
    pub fn volts_per_code(&self) -> f64 {
        self.full_scale_volts * SINGLE_ENDED_GAIN / self.codes() as f64
    }

    /// Number of distinct codes
    pub fn codes(&self) -> u64 {
        // `new` bounds the shift to 32
        1 << self.resolution_bits
    }

    /// Largest code the ADC produces
    pub fn max_code(&self) -> i64 {
        self.codes() as i64 - 1
    }

    pub fn to_volts(&self, code: i64) -> f64 {
        code as f64 * self.volts_per_code()
    }
}

impl Default for AdcScale {
    fn default() -> Self {
        Self::new(ADC_FULL_SCALE_VOLTS, ADC_RESOLUTION_BITS)
    }
}

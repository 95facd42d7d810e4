//! Host-side driver for the antenna analyzer
//!
//! The analyzer switches an AD8302 gain/phase detector between two nodes of a
//! resistor bridge driven by an AD9850 DDS. Reading the detector at the reference
//! node and at the antenna node gives two complex voltages, from which the
//! antenna impedance follows.

pub mod adc;
pub mod bridge;
pub mod detector;
mod error;
mod instrument;

pub use adc::AdcScale;
pub use bridge::{impedance_from_readings, BridgeMeasurement, REFERENCE_IMPEDANCE_OHMS};
pub use detector::{vmag_to_ratio, vphs_to_degree, DetectorReading};
pub use error::{AnalyzerError, AnalyzerResult, ComputationError, ProtocolError};
pub use instrument::{Analyzer, SwitchPosition};
pub use num_complex::Complex64;

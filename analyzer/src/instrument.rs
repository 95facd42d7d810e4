use num_complex::Complex64;
use tracing::{debug, debug_span, info, trace, warn};
use transport::{Command, CommandChannel, Property, Register, Response, Session, Transport};

use crate::{
    adc::AdcScale,
    bridge::{impedance_from_readings, BridgeMeasurement},
    detector::DetectorReading,
    error::{AnalyzerResult, ProtocolError},
};

/// AMux positions on the resistor bridge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwitchPosition {
    /// Reference node, defines the phase origin
    Reference = 1,
    /// Node the antenna under test hangs off
    Antenna = 2,
}

impl From<SwitchPosition> for i64 {
    fn from(pos: SwitchPosition) -> Self {
        pos as i64
    }
}

/// Typed access to the analyzer registers and the impedance measurement
///
/// Every register write sends a command, so the switch position the instrument
/// reports is the only switch state there is.
pub struct Analyzer<'a, T: Transport> {
    channel: &'a CommandChannel<T>,
    scale: AdcScale,
}

impl<'a, T: Transport> Analyzer<'a, T> {
    pub fn new(channel: &'a CommandChannel<T>) -> Self {
        Self::with_scale(channel, AdcScale::default())
    }

    pub fn with_scale(channel: &'a CommandChannel<T>, scale: AdcScale) -> Self {
        Self { channel, scale }
    }

    pub fn channel(&self) -> &'a CommandChannel<T> {
        self.channel
    }

    pub fn scale(&self) -> AdcScale {
        self.scale
    }

    /// DDS frequency
    pub fn get_frequency(&self) -> AnalyzerResult<i64> {
        query(&mut self.channel.session(), Property::Frequency)
    }

    pub fn set_frequency(&self, f: i64) -> AnalyzerResult<()> {
        assign(&mut self.channel.session(), Register::Frequency, f)
    }

    /// AMux switch position
    pub fn get_switch(&self) -> AnalyzerResult<i64> {
        query(&mut self.channel.session(), Property::Switch)
    }

    /// Positions other than 1 and 2 are passed on to the firmware untouched
    pub fn set_switch(&self, s: i64) -> AnalyzerResult<()> {
        assign(&mut self.channel.session(), Register::Switch, s)
    }

    /// Raw VMAG code
    pub fn read_vmag(&self) -> AnalyzerResult<i64> {
        query(&mut self.channel.session(), Property::Magnitude)
    }

    /// Raw VPHS code
    pub fn read_vphs(&self) -> AnalyzerResult<i64> {
        query(&mut self.channel.session(), Property::Phase)
    }

    /// Detector reading at whatever node the switch is on
    pub fn read_detector(&self) -> AnalyzerResult<DetectorReading> {
        read_detector(&mut self.channel.session(), &self.scale)
    }

    /// Measure the antenna impedance in ohms
    pub fn measure_impedance(&self) -> AnalyzerResult<Complex64> {
        Ok(self.measure()?.impedance)
    }

    /// Run the full bridge sequence and keep both readings
    ///
    /// The channel is held for the whole sequence. A failure part way leaves
    /// the switch wherever it got to; call [`Analyzer::reset`] to put it back.
    pub fn measure(&self) -> AnalyzerResult<BridgeMeasurement> {
        let _span = debug_span!("measure").entered();
        let (reference, antenna) = {
            let mut session = self.channel.session();
            assign(&mut session, Register::Switch, SwitchPosition::Reference.into())?;
            let reference = read_detector(&mut session, &self.scale)?;
            assign(&mut session, Register::Switch, SwitchPosition::Antenna.into())?;
            let antenna = read_detector(&mut session, &self.scale)?;
            (reference, antenna)
        };
        let impedance = impedance_from_readings(&reference, &antenna)?;
        info!(r = impedance.re, x = impedance.im, "Measured impedance");
        Ok(BridgeMeasurement {
            reference,
            antenna,
            impedance,
        })
    }

    /// Put the switch back on the reference node
    pub fn reset(&self) -> AnalyzerResult<()> {
        self.set_switch(SwitchPosition::Reference.into())
    }

    /// Firmware usage banner
    pub fn help(&self) -> AnalyzerResult<Response> {
        Ok(self.channel.execute(&Command::Help)?)
    }
}

fn query<T: Transport>(session: &mut Session<'_, T>, property: Property) -> AnalyzerResult<i64> {
    let command = Command::Get(property);
    let response = session.execute(&command)?;
    Ok(parse_first(&command, &response)?)
}

fn assign<T: Transport>(
    session: &mut Session<'_, T>,
    register: Register,
    value: i64,
) -> AnalyzerResult<()> {
    let response = session.execute(&Command::Set(register, value))?;
    // The firmware echoes the value it latched; nothing depends on it
    trace!(?register, value, echo = ?response.first(), "Register written");
    Ok(())
}

fn read_detector<T: Transport>(
    session: &mut Session<'_, T>,
    scale: &AdcScale,
) -> AnalyzerResult<DetectorReading> {
    let vmag = query(session, Property::Magnitude)?;
    let vphs = query(session, Property::Phase)?;
    let reading = DetectorReading::from_raw_with_scale(vmag, vphs, scale);
    debug!(
        vmag,
        vphs,
        ratio = reading.ratio,
        degrees = reading.degrees,
        "Detector read"
    );
    Ok(reading)
}

fn parse_first(command: &Command, response: &Response) -> Result<i64, ProtocolError> {
    let line = response.first().ok_or_else(|| ProtocolError::EmptyResponse {
        command: command.to_string(),
    })?;
    if response.len() > 1 {
        warn!(%command, extra = response.len() - 1, "Ignoring trailing response lines");
    }
    line.trim()
        .parse()
        .map_err(|source| ProtocolError::MalformedValue {
            command: command.to_string(),
            line: line.to_owned(),
            source,
        })
}

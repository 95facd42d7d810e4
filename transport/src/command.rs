use std::fmt;

/// Readable properties of the analyzer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Property {
    /// DDS output frequency
    Frequency,
    /// AMux position on the resistor bridge
    Switch,
    /// Raw VMAG code from the gain/phase detector
    Magnitude,
    /// Raw VPHS code from the gain/phase detector
    Phase,
}

/// Writable registers of the analyzer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Register {
    /// DDS output frequency
    Frequency,
    /// AMux position on the resistor bridge
    Switch,
}

/// Commands understood by the analyzer shell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Get(Property),
    Set(Register, i64),
    /// Print the firmware usage banner
    Help,
}

impl Property {
    fn code(self) -> char {
        match self {
            Property::Frequency => 'f',
            Property::Switch => 's',
            Property::Magnitude => 'm',
            Property::Phase => 'p',
        }
    }
}

impl Register {
    fn code(self) -> char {
        Property::from(self).code()
    }
}

impl From<Register> for Property {
    fn from(reg: Register) -> Self {
        match reg {
            Register::Frequency => Property::Frequency,
            Register::Switch => Property::Switch,
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Get(prop) => write!(f, "ant get {}", prop.code()),
            Command::Set(reg, value) => write!(f, "ant set {} {}", reg.code(), value),
            Command::Help => f.write_str("help"),
        }
    }
}

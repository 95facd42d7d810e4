//! Serial settings from an optional YAML file plus command-line overrides

use std::{fs, path::Path};

use anyhow::{bail, Context, Result};
use transport::SerialConfig;

/// Values given on the command line, which win over the file
#[derive(Debug, Default)]
pub struct Overrides {
    pub port: Option<String>,
    pub baud_rate: Option<u32>,
    pub read_timeout_ms: Option<u64>,
    pub max_read_bytes: Option<usize>,
}

pub fn load(path: Option<&Path>, overrides: Overrides) -> Result<SerialConfig> {
    let mut cfg = match path {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file {}", path.display()))?;
            serde_yml::from_str(&text)
                .with_context(|| format!("Invalid config file {}", path.display()))?
        }
        None => SerialConfig::default(),
    };
    if let Some(port) = overrides.port {
        cfg.port = port;
    }
    if let Some(baud) = overrides.baud_rate {
        cfg.baud_rate = baud;
    }
    if let Some(ms) = overrides.read_timeout_ms {
        cfg.read_timeout_ms = ms;
    }
    if let Some(n) = overrides.max_read_bytes {
        cfg.max_read_bytes = n;
    }
    if cfg.port.is_empty() {
        bail!("No serial port given, pass --port or set `port` in the config file");
    }
    if cfg.max_read_bytes == 0 {
        bail!("max_read_bytes must be at least 1");
    }
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn port_alone_uses_defaults() {
        let cfg = load(
            None,
            Overrides {
                port: Some("/dev/ttyACM0".into()),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(cfg, SerialConfig::new("/dev/ttyACM0"));
    }

    #[test]
    fn file_values_then_overrides() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "port: COM4\nbaud_rate: 57600\nread_timeout_ms: 250").unwrap();
        let cfg = load(
            Some(file.path()),
            Overrides {
                read_timeout_ms: Some(50),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(cfg.port, "COM4");
        assert_eq!(cfg.baud_rate, 57600);
        assert_eq!(cfg.read_timeout_ms, 50);
        assert_eq!(cfg.max_read_bytes, 1000);
    }

    #[test]
    fn missing_port_is_an_error() {
        assert!(load(None, Overrides::default()).is_err());
    }

    #[test]
    fn zero_read_size_is_an_error() {
        let overrides = Overrides {
            port: Some("COM4".into()),
            max_read_bytes: Some(0),
            ..Default::default()
        };
        assert!(load(None, overrides).is_err());
    }
}

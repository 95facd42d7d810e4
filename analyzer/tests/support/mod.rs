#![allow(dead_code)]

//! In-memory stand-in for the analyzer firmware
//!
//! Speaks the same shell protocol as the board: commands end in `\r\n`, values
//! come back as `\r\n`-terminated decimal lines, set commands echo the latched
//! value and every reply is followed by a `>` prompt.

use std::collections::HashMap;
use std::io;
use std::sync::{Arc, Mutex};

use transport::Transport;

pub const BANNER: &str = "\r\nHi! This is a PC controlled Antenna Analyzer.\r\n\
input_strs:\r\n  'help' to see this help message.\r\n  'ant' to control the Antenna Analyzer.\r\n";

#[derive(Default)]
pub struct Board {
    pub frequency: i64,
    pub switch: i64,
    /// VMAG and VPHS codes seen at each switch position
    pub detector: HashMap<i64, (i64, i64)>,
    /// Overrides the reply text for a command
    pub scripted: HashMap<String, Vec<u8>>,
    /// Commands received, in order
    pub log: Vec<String>,
    /// Detector reads at this switch position return a fault message
    pub faulty_switch: Option<i64>,
    /// Fail every write once this many commands have been accepted
    pub unplug_after: Option<usize>,
    pub closes: usize,
    rx: Vec<u8>,
    tx: Vec<u8>,
}

#[derive(Clone)]
pub struct SimulatedAnalyzer(pub Arc<Mutex<Board>>);

impl SimulatedAnalyzer {
    /// A freshly booted board with its banner waiting to be read
    pub fn new() -> Self {
        let mut board = Board {
            frequency: 14_150_000,
            switch: 1,
            ..Default::default()
        };
        board.tx.extend_from_slice(BANNER.as_bytes());
        board.tx.push(b'>');
        Self(Arc::new(Mutex::new(board)))
    }

    /// A board with nothing pending
    pub fn quiet() -> Self {
        let sim = Self::new();
        sim.board().tx.clear();
        sim
    }

    pub fn board(&self) -> std::sync::MutexGuard<'_, Board> {
        self.0.lock().unwrap()
    }

    pub fn with_detector(self, switch: i64, vmag: i64, vphs: i64) -> Self {
        self.board().detector.insert(switch, (vmag, vphs));
        self
    }

    pub fn with_reply(self, command: &str, reply: &[u8]) -> Self {
        self.board()
            .scripted
            .insert(command.to_owned(), reply.to_vec());
        self
    }

    pub fn log(&self) -> Vec<String> {
        self.board().log.clone()
    }
}

impl Board {
    fn execute(&mut self, line: &str) {
        self.log.push(line.to_owned());
        if let Some(reply) = self.scripted.get(line) {
            let reply = reply.clone();
            self.tx.extend_from_slice(&reply);
            return;
        }
        let words: Vec<&str> = line.split(' ').collect();
        let detector_read = matches!(words[..], ["ant", "get", "m" | "p"]);
        if detector_read && self.faulty_switch == Some(self.switch) {
            self.tx.extend_from_slice(b"ADC fault\r\n>");
            return;
        }
        let reply = match words.as_slice() {
            ["help"] => BANNER.to_owned(),
            ["ant", "get", "f"] => uint(self.frequency),
            ["ant", "get", "s"] => uint(self.switch),
            ["ant", "get", "m"] => uint(self.detector.get(&self.switch).map_or(0, |d| d.0)),
            ["ant", "get", "p"] => uint(self.detector.get(&self.switch).map_or(0, |d| d.1)),
            ["ant", "set", "f", n] => {
                self.frequency = n.parse().unwrap_or(0);
                uint(self.frequency)
            }
            ["ant", "set", "s", n] => {
                self.switch = n.parse().unwrap_or(0);
                uint(self.switch)
            }
            _ => format!("{line}: invalid input_str. Type 'help' to see available input_strs\r\n"),
        };
        self.tx.extend_from_slice(reply.as_bytes());
        self.tx.push(b'>');
    }
}

fn uint(value: i64) -> String {
    format!("{value}\r\n")
}

impl Transport for SimulatedAnalyzer {
    fn send(&mut self, bytes: &[u8]) -> io::Result<()> {
        let mut board = self.board();
        if board.unplug_after.is_some_and(|n| board.log.len() >= n) {
            return Err(io::Error::new(io::ErrorKind::BrokenPipe, "device disconnected"));
        }
        board.rx.extend_from_slice(bytes);
        while let Some(idx) = board.rx.iter().position(|&b| b == b'\n') {
            let raw: Vec<u8> = board.rx.drain(..=idx).collect();
            let line = String::from_utf8_lossy(&raw).trim_end().to_owned();
            if !line.is_empty() {
                board.execute(&line);
            } else {
                board.tx.push(b'>');
            }
        }
        Ok(())
    }

    fn receive(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let mut board = self.board();
        let n = board.tx.len().min(buf.len());
        buf[..n].copy_from_slice(&board.tx[..n]);
        board.tx.drain(..n);
        Ok(n)
    }

    fn close(&mut self) -> io::Result<()> {
        self.board().closes += 1;
        Ok(())
    }
}

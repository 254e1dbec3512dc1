use std::env;

use inquire::Select;
use serialport::SerialPort;
use siglent_spd3303c::psu::Spd3303c;
use siglent_spd3303c::types::{Channel, State};

// Configuration constants - adjust these for your setup
const BAUD_RATE: u32 = 9600;
// The supply can take a moment to answer a query, give it a generous timeout.
const SERIAL_TIMEOUT_MS: u64 = 500;
const OUTPUT_VOLTAGE_V: f32 = 5.5;
const CURRENT_LIMIT_A: f32 = 0.1;
const STABILIZATION_DELAY_MS: u64 = 1000;

pub struct PortWrapper(Box<dyn SerialPort>);

#[derive(Debug)]
pub struct IoError(std::io::Error);

impl core::fmt::Display for IoError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for IoError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.0)
    }
}

impl embedded_io::Error for IoError {
    fn kind(&self) -> embedded_io::ErrorKind {
        match self.0.kind() {
            std::io::ErrorKind::NotFound => embedded_io::ErrorKind::NotFound,
            std::io::ErrorKind::PermissionDenied => embedded_io::ErrorKind::PermissionDenied,
            std::io::ErrorKind::BrokenPipe => embedded_io::ErrorKind::BrokenPipe,
            std::io::ErrorKind::InvalidData => embedded_io::ErrorKind::InvalidData,
            std::io::ErrorKind::TimedOut => embedded_io::ErrorKind::TimedOut,
            std::io::ErrorKind::Interrupted => embedded_io::ErrorKind::Interrupted,
            _ => embedded_io::ErrorKind::Other,
        }
    }
}

impl embedded_io::ErrorType for PortWrapper {
    type Error = IoError;
}

impl embedded_io::Read for PortWrapper {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        std::io::Read::read(&mut self.0, buf).map_err(IoError)
    }
}

impl embedded_io::Write for PortWrapper {
    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        std::io::Write::write(&mut self.0, buf).map_err(IoError)
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        std::io::Write::flush(&mut self.0).map_err(IoError)
    }
}

fn main() {
    // RUST_LOG=trace shows the SCPI traffic.
    env_logger::init();

    // Get serial port from command line arg or interactive selection
    let port_name = env::args().nth(1).unwrap_or_else(|| {
        let ports = serialport::available_ports().expect("Failed to enumerate serial ports");

        if ports.is_empty() {
            eprintln!("No serial ports found!");
            std::process::exit(1);
        }

        let port_names: Vec<String> = ports.iter().map(|p| p.port_name.clone()).collect();

        Select::new("Select a serial port:", port_names)
            .prompt()
            .expect("Failed to select port")
    });

    println!("Using port: {}", port_name);

    let port = serialport::new(&port_name, BAUD_RATE)
        .timeout(std::time::Duration::from_millis(SERIAL_TIMEOUT_MS))
        .open()
        .expect("Failed to open serial port");

    // Constructing the driver forces all three outputs off.
    let mut psu: Spd3303c<PortWrapper, 128> =
        Spd3303c::new(PortWrapper(port)).expect("Failed to reach the power supply");

    let idn = psu.identification().unwrap();
    println!("Instrument: {}", idn.trim());

    psu.set_voltage(Channel::Ch1, OUTPUT_VOLTAGE_V).unwrap();
    println!("Set CH1 voltage to {}V", OUTPUT_VOLTAGE_V);

    psu.set_current_limit(Channel::Ch1, CURRENT_LIMIT_A).unwrap();
    println!("Set CH1 current limit to {}A", CURRENT_LIMIT_A);

    psu.set_output(Channel::Ch1, State::On).unwrap();
    println!("CH1 output enabled");

    // Wait for the output to stabilize
    std::thread::sleep(std::time::Duration::from_millis(STABILIZATION_DELAY_MS));

    let volts = psu.read_voltage(Channel::Ch1).unwrap();
    let amps = psu.read_current(Channel::Ch1).unwrap();
    println!("Measured: {:.3}V / {:.3}A", volts, amps);

    let status = psu.get_system_status().unwrap();
    println!("Status word: 0x{:02X}", status.raw());
    println!("CH1 output: {:?}", status.output(Channel::Ch1));
    println!("CH1 regulation: {:?}", status.control_mode(Channel::Ch1));
    println!("Tracking: {:?}", status.tracking());

    // Leave the bench safe: everything off, then the port is handed back and dropped.
    psu.shutdown().unwrap();
    println!("All outputs off");
}

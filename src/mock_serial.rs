//! We use this mocking module in unit tests to emulate the instrument end of a serial link.

/// Our mock type used to emulate a serial connection to the power supply.
///
/// Replies are scripted up front with [MockSerial::queue_reply]; everything
/// the driver writes is captured for inspection. Reading past the scripted
/// data behaves like a serial timeout with an empty receive buffer.
pub struct MockSerial {
    /// Everything written to the mock, in order.
    write_buffer: heapless::Vec<u8, 256>,
    /// Scripted reply bytes still to be handed out.
    read_buffer: heapless::Vec<u8, 256>,
    /// Current position in the read buffer.
    read_position: usize,
    /// Flag to simulate write errors.
    should_error_on_write: bool,
    /// Flag to simulate read errors.
    should_error_on_read: bool,
}

#[derive(Debug)]
pub enum MockSerialError {
    /// No scripted data left before the simulated timeout.
    WouldBlock,
    /// A scripted buffer overflowed.
    BufferOverflow,
    /// Generic simulated error for testing.
    SimulatedError,
}

impl core::fmt::Display for MockSerialError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{self:?}")
    }
}

impl core::error::Error for MockSerialError {}

impl embedded_io::Error for MockSerialError {
    fn kind(&self) -> embedded_io::ErrorKind {
        match self {
            MockSerialError::WouldBlock => embedded_io::ErrorKind::TimedOut,
            MockSerialError::BufferOverflow => embedded_io::ErrorKind::OutOfMemory,
            MockSerialError::SimulatedError => embedded_io::ErrorKind::Other,
        }
    }
}

impl embedded_io::ErrorType for MockSerial {
    type Error = MockSerialError;
}

impl embedded_io::Write for MockSerial {
    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        if self.should_error_on_write {
            return Err(MockSerialError::SimulatedError);
        }

        self.write_buffer
            .extend_from_slice(buf)
            .map_err(|_| MockSerialError::BufferOverflow)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        if self.should_error_on_write {
            return Err(MockSerialError::SimulatedError);
        }
        Ok(())
    }
}

impl embedded_io::Read for MockSerial {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        if self.should_error_on_read {
            return Err(MockSerialError::SimulatedError);
        }

        if self.read_position >= self.read_buffer.len() {
            return Err(MockSerialError::WouldBlock);
        }

        let available = self.read_buffer.len() - self.read_position;
        let count = buf.len().min(available);
        buf[..count]
            .copy_from_slice(&self.read_buffer[self.read_position..self.read_position + count]);
        self.read_position += count;
        Ok(count)
    }
}

impl MockSerial {
    /// Create a new MockSerial instance with empty buffers.
    pub fn new() -> Self {
        Self {
            write_buffer: heapless::Vec::new(),
            read_buffer: heapless::Vec::new(),
            read_position: 0,
            should_error_on_write: false,
            should_error_on_read: false,
        }
    }

    /// Script a reply line; the terminator is appended automatically.
    pub fn queue_reply(&mut self, line: &str) {
        self.queue_raw(line.as_bytes());
        self.queue_raw(b"\n");
    }

    /// Script raw reply bytes exactly as given.
    pub fn queue_raw(&mut self, data: &[u8]) {
        self.read_buffer
            .extend_from_slice(data)
            .expect("mock read buffer exhausted");
    }

    /// Everything written to this mock so far.
    pub fn written_data(&self) -> &[u8] {
        &self.write_buffer
    }

    /// Everything written to this mock so far, as text.
    pub fn written_str(&self) -> &str {
        core::str::from_utf8(&self.write_buffer).expect("driver wrote non-UTF-8 bytes")
    }

    /// Forget everything written so far.
    pub fn clear_written_data(&mut self) {
        self.write_buffer.clear();
    }

    /// Configure whether write operations should fail with an error.
    pub fn set_write_error(&mut self, should_error: bool) {
        self.should_error_on_write = should_error;
    }

    /// Configure whether read operations should fail with an error.
    pub fn set_read_error(&mut self, should_error: bool) {
        self.should_error_on_read = should_error;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_io::{Error, Read, Write};

    #[test]
    fn writes_are_captured_in_order() {
        let mut mock = MockSerial::new();
        mock.write(b"OUTPut CH1,OFF\n").unwrap();
        mock.write(b"OUTPut CH2,OFF\n").unwrap();
        assert_eq!(mock.written_str(), "OUTPut CH1,OFF\nOUTPut CH2,OFF\n");

        mock.clear_written_data();
        assert!(mock.written_data().is_empty());
    }

    #[test]
    fn queued_replies_come_back_terminated() {
        let mut mock = MockSerial::new();
        mock.queue_reply("4.250");

        let mut buf = [0u8; 16];
        let count = mock.read(&mut buf).unwrap();
        assert_eq!(&buf[..count], b"4.250\n");
    }

    #[test]
    fn reads_respect_a_small_caller_buffer() {
        let mut mock = MockSerial::new();
        mock.queue_reply("32.000");

        let mut buf = [0u8; 3];
        assert_eq!(mock.read(&mut buf).unwrap(), 3);
        assert_eq!(&buf, b"32.");
        assert_eq!(mock.read(&mut buf).unwrap(), 3);
        assert_eq!(&buf, b"000");
    }

    #[test]
    fn exhausted_script_reads_like_a_timeout() {
        let mut mock = MockSerial::new();
        mock.queue_reply("ok");

        let mut buf = [0u8; 16];
        mock.read(&mut buf).unwrap();
        let err = mock.read(&mut buf).unwrap_err();
        assert!(matches!(err.kind(), embedded_io::ErrorKind::TimedOut));
    }

    #[test]
    fn error_injection_covers_both_directions() {
        let mut mock = MockSerial::new();
        mock.queue_reply("1.0");

        mock.set_write_error(true);
        assert!(mock.write(b"x").is_err());
        assert!(mock.flush().is_err());
        assert!(mock.written_data().is_empty());

        mock.set_write_error(false);
        assert!(mock.write(b"x").is_ok());

        mock.set_read_error(true);
        let mut buf = [0u8; 4];
        assert!(mock.read(&mut buf).is_err());

        mock.set_read_error(false);
        assert!(mock.read(&mut buf).is_ok());
    }
}

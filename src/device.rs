//! Physical haptic device transport
//!
//! Line-oriented text protocol: the device streams `P <meters>` position
//! reports and accepts `F <newtons>` force commands. The link is generic
//! over any non-blocking byte stream, so the core never depends on a
//! specific serial library; a real port, a TCP socket, or a test double all
//! plug in the same way.
//!
//! Failure model: every I/O error is "no data this frame" — logged at debug,
//! swallowed, retried next frame. A slow device can never stall the
//! simulation loop.

use std::io::{ErrorKind, Read, Write};

use crate::consts::MAX_READS_PER_FRAME;

/// Resend the force command when it changed by more than this (newtons).
const FORCE_EPSILON_N: f32 = 0.005;
/// ...or when this much time passed since the last send (keep-alive).
const FORCE_RESEND_SECS: f64 = 0.05;
/// Longest run of newline-free bytes kept for line reassembly. A valid
/// `P <float>` report is under 32 bytes; anything past this is a wedged or
/// noisy device and the fragment is dropped.
const PENDING_CAP: usize = 256;

/// Parse a `P <meters>` position report. Short or malformed lines are
/// ignored, matching firmware that occasionally emits partial output.
pub fn parse_position_line(line: &str) -> Option<f32> {
    if line.len() < 4 || !line.starts_with('P') {
        return None;
    }
    line.get(2..)?.trim().parse().ok()
}

/// Format a force command with the 5-decimal precision the firmware expects.
pub fn format_force_line(newtons: f32) -> String {
    format!("F {newtons:.5}\n")
}

/// Per-frame link to a physical device over a non-blocking byte stream.
#[derive(Debug)]
pub struct DeviceLink<T: Read + Write> {
    stream: Option<T>,
    pending: Vec<u8>,
    position_m: f32,
    last_sent_force: f32,
    last_send_time: f64,
}

impl<T: Read + Write> DeviceLink<T> {
    pub fn new(stream: T) -> Self {
        Self {
            stream: Some(stream),
            pending: Vec::new(),
            position_m: 0.0,
            // Sentinel far outside any real force so the first sync always
            // transmits.
            last_sent_force: -999.0,
            last_send_time: 0.0,
        }
    }

    /// Connection status flag: the only user-visible error surface.
    pub fn connected(&self) -> bool {
        self.stream.is_some()
    }

    /// Latest position report in meters, if the link is up.
    pub fn read_position(&self) -> Option<f32> {
        self.connected().then_some(self.position_m)
    }

    /// One frame of device I/O: drain pending position reports, then push
    /// the current force command (rate limited).
    pub fn sync(&mut self, force_n: f32, now_secs: f64) {
        self.drain_reads();
        self.send_force(force_n, now_secs);
    }

    fn drain_reads(&mut self) {
        let Some(stream) = self.stream.as_mut() else {
            return;
        };

        let mut buf = [0u8; 256];
        for _ in 0..MAX_READS_PER_FRAME {
            match stream.read(&mut buf) {
                Ok(0) => break,
                Ok(n) => self.pending.extend_from_slice(&buf[..n]),
                Err(e) if e.kind() == ErrorKind::WouldBlock => break,
                Err(e) => {
                    log::debug!("device read failed: {e}");
                    break;
                }
            }
        }

        // Consume complete lines; keep any trailing partial for next frame.
        while let Some(nl) = self.pending.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = self.pending.drain(..=nl).collect();
            if let Ok(text) = std::str::from_utf8(&line)
                && let Some(meters) = parse_position_line(text.trim_end())
            {
                self.position_m = meters;
            }
        }

        // A stream that never produces a newline must not accumulate
        // forever; drop the fragment and resync at the next line start.
        if self.pending.len() > PENDING_CAP {
            log::debug!(
                "dropping {} bytes of newline-free device output",
                self.pending.len()
            );
            self.pending.clear();
        }
    }

    fn send_force(&mut self, force_n: f32, now_secs: f64) {
        let Some(stream) = self.stream.as_mut() else {
            return;
        };
        let changed = (force_n - self.last_sent_force).abs() > FORCE_EPSILON_N;
        let stale = now_secs - self.last_send_time > FORCE_RESEND_SECS;
        if !changed && !stale {
            return;
        }
        let line = format_force_line(force_n);
        match stream.write_all(line.as_bytes()).and_then(|_| stream.flush()) {
            Ok(()) => {
                self.last_sent_force = force_n;
                self.last_send_time = now_secs;
            }
            Err(e) => log::debug!("device write failed: {e}"),
        }
    }

    /// Zero the force on the device, then release the stream. Without this a
    /// disconnected device keeps rendering the last commanded force.
    pub fn shutdown(&mut self) {
        if let Some(stream) = self.stream.as_mut() {
            let _ = stream.write_all(format_force_line(0.0).as_bytes());
            let _ = stream.flush();
            log::info!("device link closed, force zeroed");
        }
        self.stream = None;
    }
}

impl<T: Read + Write> Drop for DeviceLink<T> {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::VecDeque;
    use std::io;
    use std::rc::Rc;

    /// Test double for a non-blocking serial port. The outgoing buffer is
    /// shared so tests can inspect writes after the link releases the port.
    struct MockPort {
        incoming: VecDeque<u8>,
        outgoing: Rc<RefCell<Vec<u8>>>,
    }

    impl MockPort {
        fn new(incoming: &str) -> (Self, Rc<RefCell<Vec<u8>>>) {
            let outgoing = Rc::new(RefCell::new(Vec::new()));
            let port = Self {
                incoming: incoming.bytes().collect(),
                outgoing: Rc::clone(&outgoing),
            };
            (port, outgoing)
        }
    }

    impl Read for MockPort {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if self.incoming.is_empty() {
                return Err(io::Error::new(ErrorKind::WouldBlock, "no data"));
            }
            let n = buf.len().min(self.incoming.len());
            for slot in buf.iter_mut().take(n) {
                *slot = self.incoming.pop_front().unwrap();
            }
            Ok(n)
        }
    }

    impl Write for MockPort {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.outgoing.borrow_mut().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn sent_text(outgoing: &Rc<RefCell<Vec<u8>>>) -> String {
        String::from_utf8(outgoing.borrow().clone()).unwrap()
    }

    #[test]
    fn test_parse_position_line() {
        assert_eq!(parse_position_line("P 0.042"), Some(0.042));
        assert_eq!(parse_position_line("P -0.08"), Some(-0.08));
        assert_eq!(parse_position_line("F 1.0"), None);
        assert_eq!(parse_position_line("P 1"), None); // too short
        assert_eq!(parse_position_line("P abc"), None);
        assert_eq!(parse_position_line(""), None);
    }

    #[test]
    fn test_format_force_line() {
        assert_eq!(format_force_line(0.5), "F 0.50000\n");
        assert_eq!(format_force_line(-1.25), "F -1.25000\n");
    }

    #[test]
    fn test_sync_takes_latest_position_report() {
        let (port, _) = MockPort::new("P 0.010\nP 0.020\nP 0.030\n");
        let mut link = DeviceLink::new(port);
        link.sync(0.0, 0.0);
        assert_eq!(link.read_position(), Some(0.030));
    }

    #[test]
    fn test_partial_line_held_until_complete() {
        let (port, _) = MockPort::new("P 0.0");
        let mut link = DeviceLink::new(port);
        link.sync(0.0, 0.0);
        assert_eq!(link.read_position(), Some(0.0)); // default, not parsed

        // The rest of the line arrives next frame.
        link.stream.as_mut().unwrap().incoming.extend("25\n".bytes());
        link.sync(0.0, 0.1);
        assert_eq!(link.read_position(), Some(0.025));
    }

    /// A device wedged mid-line: every read yields noise, never a newline.
    struct NoisyPort;

    impl Read for NoisyPort {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            buf.fill(b'x');
            Ok(buf.len())
        }
    }

    impl Write for NoisyPort {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_newline_free_stream_does_not_grow_pending_buffer() {
        let mut link = DeviceLink::new(NoisyPort);
        for frame in 0..100 {
            link.sync(0.0, frame as f64 * 0.004);
            assert!(
                link.pending.len() <= PENDING_CAP,
                "pending buffer at {} bytes after frame {frame}",
                link.pending.len()
            );
        }
        // And a valid report still gets through once the device recovers.
        let (port, _) = MockPort::new("P 0.033\n");
        let mut link = DeviceLink::new(port);
        link.sync(0.0, 0.0);
        assert_eq!(link.read_position(), Some(0.033));
    }

    #[test]
    fn test_malformed_lines_are_skipped() {
        let (port, _) = MockPort::new("garbage\nP xx.yy\nP 0.040\n");
        let mut link = DeviceLink::new(port);
        link.sync(0.0, 0.0);
        assert_eq!(link.read_position(), Some(0.040));
    }

    #[test]
    fn test_force_send_is_rate_limited() {
        let (port, sent) = MockPort::new("");
        let mut link = DeviceLink::new(port);

        link.sync(0.5, 0.0);
        // Same force, 10 ms later: within epsilon and within the resend
        // window, so nothing new goes out.
        link.sync(0.5, 0.01);
        assert_eq!(sent_text(&sent), "F 0.50000\n");

        // A force change beyond epsilon transmits immediately.
        link.sync(0.6, 0.02);
        assert_eq!(sent_text(&sent), "F 0.50000\nF 0.60000\n");

        // Unchanged force still re-sends once the keep-alive window lapses.
        link.sync(0.6, 0.2);
        assert_eq!(sent_text(&sent), "F 0.50000\nF 0.60000\nF 0.60000\n");
    }

    #[test]
    fn test_shutdown_zeroes_force() {
        let (port, sent) = MockPort::new("");
        let mut link = DeviceLink::new(port);
        link.sync(1.5, 0.0);
        link.shutdown();
        assert!(!link.connected());
        assert_eq!(sent_text(&sent), "F 1.50000\nF 0.00000\n");

        // Shutdown again is a no-op.
        link.shutdown();
        assert_eq!(sent_text(&sent), "F 1.50000\nF 0.00000\n");
    }

    #[test]
    fn test_drop_zeroes_force() {
        let (port, sent) = MockPort::new("");
        let mut link = DeviceLink::new(port);
        link.sync(0.8, 0.0);
        drop(link);
        assert_eq!(sent_text(&sent), "F 0.80000\nF 0.00000\n");
    }
}

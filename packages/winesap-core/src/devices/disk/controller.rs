//! The Disk II controller card, as seen from slot 6 ($C0E0-$C0EF).
//!
//! Read-only: Q7H enters write mode and Q6H latches the data byte, but
//! nothing ever reaches the media and the write-protect sense always
//! reports protected. Software that probes the switch sees a notched-out
//! disk and moves on.

use super::nibble;
use crate::error::{Error, Result};

/// Highest legal half-track: (35 - 1) * 2.
pub const MAX_HALF_TRACK: i8 = 68;

/// A nibble passes under the head about every 32 CPU cycles at 300 rpm.
const CYCLES_PER_NIBBLE: u64 = 32;

/// How far (in nibbles) the stream may drift from real time before the
/// position jumps forward to re-sync. Tight read loops keep up and never
/// trigger this; long pauses simulate the disk having kept spinning.
const RESYNC_THRESHOLD: u64 = 10;

/// Half-track movement when a phase magnet turns on, indexed by
/// [last energized phase][new phase]. Adjacent phases pull the head one
/// half-track; the opposite phase is ambiguous on real hardware and is
/// resolved here as continuing in the same rotational direction.
#[rustfmt::skip]
pub const PHASE_DELTA: [[i8; 4]; 4] = [
    [ 0,  1,  2, -1],
    [-1,  0,  1,  2],
    [-2, -1,  0,  1],
    [ 1, -2, -1,  0],
];

/// One drive: loaded media plus head position.
struct Drive {
    /// 35 pre-nibblized track buffers, present once a disk is inserted
    tracks: Option<Vec<Vec<u8>>>,
    half_track: i8,
    byte_pos: usize,
}

impl Drive {
    fn new() -> Drive {
        Drive {
            tracks: None,
            half_track: 0,
            byte_pos: 0,
        }
    }

    fn track_buf(&self) -> Option<&Vec<u8>> {
        let track = (self.half_track / 2) as usize;
        self.tracks.as_ref().map(|t| &t[track])
    }
}

pub struct DiskController {
    drives: [Drive; 2],
    current_drive: usize,
    /// Last energized phase magnet, 0..3
    phase: u8,
    motor_on: bool,
    q6: bool,
    q7: bool,
    /// CPU cycle count at the last data-latch read, for rotation timing
    last_read_cycle: u64,
    /// Current CPU cycle count, fed by the machine before each access
    pub cumulative_cycles: u64,
    resync_count: u64,
}

impl DiskController {
    pub fn new() -> DiskController {
        DiskController {
            drives: [Drive::new(), Drive::new()],
            current_drive: 0,
            phase: 0,
            motor_on: false,
            q6: false,
            q7: false,
            last_read_cycle: 0,
            cumulative_cycles: 0,
            resync_count: 0,
        }
    }

    /// Insert a `.dsk` image into a drive. The image is validated and
    /// nibblized up front.
    pub fn load_disk(&mut self, bytes: &[u8], drive: usize) -> Result<()> {
        if drive > 1 {
            return Err(Error::InvalidDrive(drive));
        }
        let tracks = nibble::nibblize_disk(bytes)?;
        log::info!(
            "drive {}: inserted {}-byte image, {} nibbles on track 0",
            drive + 1,
            bytes.len(),
            tracks[0].len()
        );
        self.drives[drive].tracks = Some(tracks);
        self.drives[drive].byte_pos = 0;
        Ok(())
    }

    pub fn track(&self) -> u8 {
        (self.drives[self.current_drive].half_track / 2) as u8
    }

    pub fn half_track(&self) -> i8 {
        self.drives[self.current_drive].half_track
    }

    pub fn motor_on(&self) -> bool {
        self.motor_on
    }

    pub fn resync_count(&self) -> u64 {
        self.resync_count
    }

    /// Touch a controller register. Every access, read or write, runs the
    /// same switch logic; only Q6L (and Q7L with Q6 set) put anything
    /// meaningful on the bus. Unsupported combinations read as zero.
    pub fn access(&mut self, offset: u8) -> u8 {
        match offset & 0x0F {
            // phase magnets: even = off, odd = on
            0x0 | 0x2 | 0x4 | 0x6 => 0,
            0x1 | 0x3 | 0x5 | 0x7 => {
                let new_phase = (offset & 0x0F) >> 1;
                if self.motor_on {
                    self.step(new_phase);
                }
                self.phase = new_phase;
                0
            }
            0x8 => {
                self.motor_on = false;
                0
            }
            0x9 => {
                self.motor_on = true;
                0
            }
            0xA => {
                self.current_drive = 0;
                0
            }
            0xB => {
                self.current_drive = 1;
                0
            }
            // Q6L: in read mode, the data latch - the nibble stream
            0xC => {
                self.q6 = false;
                if !self.q7 {
                    self.read_nibble()
                } else {
                    0
                }
            }
            // Q6H: in write mode this would latch the byte to write;
            // read-only controller, so it only flips the switch
            0xD => {
                self.q6 = true;
                0
            }
            // Q7L: read mode; with Q6 set, the write-protect sense
            0xE => {
                self.q7 = false;
                if self.q6 {
                    0x80 // always protected
                } else {
                    0
                }
            }
            0xF => {
                self.q7 = true;
                0
            }
            _ => unreachable!(),
        }
    }

    /// Step the head for a phase-on event while the motor runs.
    fn step(&mut self, new_phase: u8) {
        let delta = PHASE_DELTA[self.phase as usize][new_phase as usize];
        let drive = &mut self.drives[self.current_drive];
        let old = drive.half_track;
        drive.half_track = (drive.half_track + delta).clamp(0, MAX_HALF_TRACK);
        if drive.half_track != old {
            log::trace!(
                "head: phase {} -> {}, half-track {} -> {}",
                self.phase,
                new_phase,
                old,
                drive.half_track
            );
            // keep the rotational position sane on the new track
            let len = drive.track_buf().map(|buf| buf.len());
            if let Some(len) = len {
                drive.byte_pos %= len;
            }
        }
    }

    /// Serve the next nibble under the head and advance the stream.
    fn read_nibble(&mut self) -> u8 {
        let now = self.cumulative_cycles;
        let elapsed = now.saturating_sub(self.last_read_cycle);
        self.last_read_cycle = now;

        let drive = &mut self.drives[self.current_drive];
        let buf = match drive.tracks.as_ref() {
            Some(tracks) => &tracks[(drive.half_track / 2) as usize],
            None => return 0,
        };
        let len = buf.len();

        // A tight read loop polls faster than the disk spins and sees
        // every byte in order. If the CPU went away for a while, the disk
        // kept turning: jump the position forward to where the head
        // actually is instead of replaying stale bytes.
        let expected = elapsed / CYCLES_PER_NIBBLE;
        if expected > RESYNC_THRESHOLD {
            drive.byte_pos = (drive.byte_pos + expected as usize) % len;
            self.resync_count += 1;
        }

        let nibble = buf[drive.byte_pos];
        drive.byte_pos = (drive.byte_pos + 1) % len;
        nibble
    }
}

impl Default for DiskController {
    fn default() -> Self {
        DiskController::new()
    }
}

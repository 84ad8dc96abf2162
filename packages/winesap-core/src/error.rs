//! Typed failures for the loading API surface.
//!
//! Cycle execution itself is total and never returns an error; everything
//! here happens at the boundary where the host hands us bytes.

use std::error;
use std::fmt;

use crate::backend::Backend;

/// The number of bytes in a `.dsk` image: 35 tracks x 16 sectors x 256 bytes.
pub const DSK_IMAGE_LEN: usize = 143_360;

/// The number of bytes in a system ROM image mapped at $D000-$FFFF.
pub const ROM_LEN: usize = 12 * 1024;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A `.dsk` file that is not exactly 143,360 bytes.
    InvalidDiskImage { len: usize },
    /// A system ROM buffer that is not exactly 12 KB.
    RomSizeMismatch { len: usize },
    /// A requested execution backend that is not compiled in.
    BackendUnavailable(Backend),
    /// A RAM load that would spill past $BFFF.
    RamLoadOutOfRange { base: u16, len: usize },
    /// A drive index other than 0 or 1.
    InvalidDrive(usize),
}

pub type Result<T> = std::result::Result<T, Error>;

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidDiskImage { len } => write!(
                f,
                "invalid .dsk image: expected {} bytes, got {}",
                DSK_IMAGE_LEN, len
            ),
            Error::RomSizeMismatch { len } => {
                write!(f, "ROM must be exactly {} bytes, got {}", ROM_LEN, len)
            }
            Error::BackendUnavailable(backend) => {
                write!(f, "execution backend `{}` is not compiled in", backend)
            }
            Error::RamLoadOutOfRange { base, len } => write!(
                f,
                "RAM load of {} bytes at ${:04X} runs past $BFFF",
                len, base
            ),
            Error::InvalidDrive(drive) => write!(f, "no such drive: {}", drive),
        }
    }
}

impl error::Error for Error {}

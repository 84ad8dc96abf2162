//! 6-and-2 nibblization of `.dsk` images.
//!
//! A `.dsk` file stores raw 256-byte sectors; the controller hands the CPU
//! the byte stream a real Disk II head would see. The conversion happens
//! once at load time: every track is expanded into its gap bytes, address
//! fields, and 6-and-2 encoded data fields, and the controller then just
//! serves bytes out of the pre-chewed buffer.

use crate::error::{Error, Result, DSK_IMAGE_LEN};

pub const TRACKS: usize = 35;
pub const SECTORS_PER_TRACK: usize = 16;
pub const SECTOR_LEN: usize = 256;
/// Raw bytes per track in the `.dsk` file (before nibblization).
pub const RAW_TRACK_LEN: usize = SECTORS_PER_TRACK * SECTOR_LEN;

/// The address field volume byte every DOS 3.3 disk carries.
pub const DEFAULT_VOLUME: u8 = 254;

/// Physical sector -> logical DOS 3.3 sector. The interleave spreads
/// logically adjacent sectors apart on the track so DOS has time to chew
/// one sector before the next spins by.
pub const DOS33_INTERLEAVE: [usize; 16] = [
    0x0, 0x7, 0xE, 0x6, 0xD, 0x5, 0xC, 0x4, 0xB, 0x3, 0xA, 0x2, 0x9, 0x1, 0x8, 0xF,
];

/// The 64 valid disk nibbles. Every entry has the high bit set and no
/// more than one pair of consecutive zero bits, which is what the drive
/// electronics can actually recover.
#[rustfmt::skip]
pub const WRITE_TRANSLATE: [u8; 64] = [
    0x96, 0x97, 0x9A, 0x9B, 0x9D, 0x9E, 0x9F, 0xA6,
    0xA7, 0xAB, 0xAC, 0xAD, 0xAE, 0xAF, 0xB2, 0xB3,
    0xB4, 0xB5, 0xB6, 0xB7, 0xB9, 0xBA, 0xBB, 0xBC,
    0xBD, 0xBE, 0xBF, 0xCB, 0xCD, 0xCE, 0xCF, 0xD3,
    0xD6, 0xD7, 0xD9, 0xDA, 0xDB, 0xDC, 0xDD, 0xDE,
    0xDF, 0xE5, 0xE6, 0xE7, 0xE9, 0xEA, 0xEB, 0xEC,
    0xED, 0xEE, 0xEF, 0xF2, 0xF3, 0xF4, 0xF5, 0xF6,
    0xF7, 0xF9, 0xFA, 0xFB, 0xFC, 0xFD, 0xFE, 0xFF,
];

pub const ADDRESS_PROLOGUE: [u8; 3] = [0xD5, 0xAA, 0x96];
pub const DATA_PROLOGUE: [u8; 3] = [0xD5, 0xAA, 0xAD];
pub const EPILOGUE: [u8; 3] = [0xDE, 0xAA, 0xEB];

const GAP1_LEN: usize = 16;
const GAP2_LEN: usize = 8;
const GAP3_LEN: usize = 16;

/// 4-and-4: the odd data bits ride in the first byte and the even bits
/// in the second, interleaved against ones so both halves are valid
/// nibbles. Volume 254 comes out as the familiar $FF $FE.
pub fn encode_44(val: u8) -> [u8; 2] {
    [(val >> 1) | 0xAA, val | 0xAA]
}

/// Recover a 4-and-4 encoded byte. Used by the address-field tests and by
/// anyone picking sectors out of the stream by hand.
pub fn decode_44(pair: [u8; 2]) -> u8 {
    ((pair[0] << 1) | 0x01) & pair[1]
}

/// Swap the two low bits of a byte; the fragment bits are stored reversed.
fn swap2(val: u8) -> u8 {
    ((val & 0x01) << 1) | ((val >> 1) & 0x01)
}

/// Pack a 256-byte sector into the 342-byte 6-and-2 buffer: 86 bytes of
/// 2-bit fragments (three source bytes each, except the last two which
/// only cover two), then 256 bytes holding the top six bits.
pub fn prenibblize(sector: &[u8; SECTOR_LEN]) -> [u8; 342] {
    let mut buf = [0u8; 342];
    for i in 0..86 {
        let mut aux = swap2(sector[i] & 0x03);
        aux |= swap2(sector[i + 86] & 0x03) << 2;
        if i + 172 < SECTOR_LEN {
            aux |= swap2(sector[i + 172] & 0x03) << 4;
        }
        buf[i] = aux;
    }
    for i in 0..SECTOR_LEN {
        buf[86 + i] = sector[i] >> 2;
    }
    buf
}

/// Emit a whole data field: prologue, the XOR-chained payload run through
/// the translate table, the trailing checksum nibble, epilogue.
fn write_data_field(out: &mut Vec<u8>, sector: &[u8; SECTOR_LEN]) {
    out.extend_from_slice(&DATA_PROLOGUE);
    let buf = prenibblize(sector);
    let mut prev = 0u8;
    for &b in buf.iter() {
        out.push(WRITE_TRANSLATE[(b ^ prev) as usize]);
        prev = b;
    }
    // the checksum byte makes the running XOR close back to zero
    out.push(WRITE_TRANSLATE[prev as usize]);
    out.extend_from_slice(&EPILOGUE);
}

fn write_address_field(out: &mut Vec<u8>, volume: u8, track: u8, sector: u8) {
    out.extend_from_slice(&ADDRESS_PROLOGUE);
    out.extend_from_slice(&encode_44(volume));
    out.extend_from_slice(&encode_44(track));
    out.extend_from_slice(&encode_44(sector));
    out.extend_from_slice(&encode_44(volume ^ track ^ sector));
    out.extend_from_slice(&EPILOGUE);
}

fn push_gap(out: &mut Vec<u8>, len: usize) {
    out.extend(std::iter::repeat(0xFFu8).take(len));
}

/// Nibblize one track of a `.dsk` image.
pub fn nibblize_track(dsk: &[u8], track: usize) -> Vec<u8> {
    let mut out = Vec::with_capacity(SECTORS_PER_TRACK * 403);
    for physical in 0..SECTORS_PER_TRACK {
        let logical = DOS33_INTERLEAVE[physical];
        let start = track * RAW_TRACK_LEN + logical * SECTOR_LEN;
        let mut sector = [0u8; SECTOR_LEN];
        sector.copy_from_slice(&dsk[start..start + SECTOR_LEN]);

        push_gap(&mut out, GAP1_LEN);
        write_address_field(&mut out, DEFAULT_VOLUME, track as u8, physical as u8);
        push_gap(&mut out, GAP2_LEN);
        write_data_field(&mut out, &sector);
        push_gap(&mut out, GAP3_LEN);
    }
    out
}

/// Validate and nibblize an entire `.dsk` image into 35 track buffers.
pub fn nibblize_disk(dsk: &[u8]) -> Result<Vec<Vec<u8>>> {
    if dsk.len() != DSK_IMAGE_LEN {
        return Err(Error::InvalidDiskImage { len: dsk.len() });
    }
    Ok((0..TRACKS).map(|t| nibblize_track(dsk, t)).collect())
}

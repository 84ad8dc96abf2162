//! The video signal generator.
//!
//! Produces one serial bit per 14 MHz tick, fourteen ticks per CPU cycle,
//! one character cell per cycle. The machine fetches the byte at the scan
//! address on the video half of each cycle and hands it to `begin_cell`;
//! `tick` then serializes it through the mode-appropriate pipeline:
//! character ROM and shift register for TEXT, rotated nibbles for LORES,
//! doubled bits with the bit-7 half-pixel delay for HIRES.
//!
//! The generator owns only its latches. It reads RAM through the machine
//! and never writes anything.

bitflags! {
    /// The video soft switches plus the four annunciators, all driven by
    /// $C050-$C05F accesses (bit 0 of the address = value, bits 3..1
    /// select the switch).
    pub struct SoftSwitches: u8 {
        const TEXT = 0x01;
        const MIXED = 0x02;
        const PAGE2 = 0x04;
        const HIRES = 0x08;
        const AN0 = 0x10;
        const AN1 = 0x20;
        const AN2 = 0x40;
        const AN3 = 0x80;
    }
}

impl SoftSwitches {
    pub fn poweron() -> SoftSwitches {
        SoftSwitches::TEXT
    }

    /// Decode a $C05x access: bit 0 is the value, bits 3..1 pick the
    /// switch. One function covers the whole aliased group.
    pub fn access(&mut self, low_nibble: u8) {
        let switch = SoftSwitches::from_bits_truncate(1 << ((low_nibble >> 1) & 0x07));
        self.set(switch, low_nibble & 0x01 != 0);
    }
}

/// Cycles per scanline and scanlines per NTSC field.
pub const CYCLES_PER_LINE: u16 = 65;
pub const LINES_PER_FRAME: u16 = 262;
/// Visible window.
pub const VISIBLE_COLS: u16 = 40;
pub const VISIBLE_LINES: u16 = 192;
/// The mixed-mode split: the bottom four text rows start here.
const MIXED_SPLIT_LINE: u16 = 160;
/// The flash clock divider: frames per flash toggle, about 2 Hz.
const FLASH_FRAMES: u32 = 16;

/// Text page cell address: row r lives at $0400 + (r%8)*$80 + (r/8)*$28.
pub fn text_cell_addr(page2: bool, row: usize, col: usize) -> u16 {
    let base = if page2 { 0x0800 } else { 0x0400 };
    base + ((row % 8) as u16) * 0x80 + ((row / 8) as u16) * 0x28 + col as u16
}

/// Hi-res row base: base + (r%8)*$400 + ((r%64)/8)*$80 + (r/64)*$28.
pub fn hires_row_addr(page2: bool, row: usize) -> u16 {
    let base = if page2 { 0x4000 } else { 0x2000 };
    let r = row % 64;
    base + ((r % 8) as u16) * 0x400 + ((r / 8) as u16) * 0x80 + ((row / 64) as u16) * 0x28
}

pub struct VideoGen {
    /// Horizontal count, in character cells (0..65)
    h: u16,
    /// Scanline (0..262)
    v: u16,

    // ── delay-line pipeline ──
    /// Graphics-time classification, delayed through the display pipe
    graphics_time_1: bool,
    graphics_time_2: bool,
    graphics_time_3: bool,
    /// Glyph row shift register, MSB out first
    text_shift: u8,
    /// Data byte shift register for the graphics modes
    graphics_shift: u8,
    /// Invert-character latch (inverse video and the flash attribute)
    invert: bool,
    /// Captured at ld194: {vc, h0} for lores, {graphics_time_1, data7}
    /// for hires
    pixel_select: u8,
    /// Half-pixel delay flip-flop for hi-res bit 7
    hires_delay: bool,
    delayed_bit: bool,
    /// Blanking, one cell late like everything else
    blank_delay: bool,
    /// Mode of the current cell, classified at fetch time
    cell_is_text: bool,
    cell_is_lores: bool,
    /// Lores nibble for the current cell
    lores_nibble: u8,

    /// Tick within the current cell, 0..14
    tick_in_cell: u8,

    flash: bool,
    flash_counter: u32,
    pub frame_count: u64,

    char_rom: [[u8; 8]; 64],
}

impl VideoGen {
    pub fn new() -> VideoGen {
        VideoGen {
            h: 0,
            v: 0,
            graphics_time_1: false,
            graphics_time_2: false,
            graphics_time_3: false,
            text_shift: 0,
            graphics_shift: 0,
            invert: false,
            pixel_select: 0,
            hires_delay: false,
            delayed_bit: false,
            blank_delay: true,
            cell_is_text: true,
            cell_is_lores: false,
            lores_nibble: 0,
            tick_in_cell: 0,
            flash: false,
            flash_counter: 0,
            frame_count: 0,
            char_rom: CHAR_ROM,
        }
    }

    /// The graphics-time delay chain, oldest last. Debug tap for hosts
    /// that want to watch the mode classification ripple through.
    pub fn graphics_time(&self) -> (bool, bool, bool) {
        (
            self.graphics_time_1,
            self.graphics_time_2,
            self.graphics_time_3,
        )
    }

    /// Replace the built-in character generator, 64 glyphs x 8 rows with
    /// the low five bits of each row holding the dots.
    pub fn load_char_rom(&mut self, bytes: &[u8]) {
        for (i, chunk) in bytes.chunks(8).take(64).enumerate() {
            for (r, &b) in chunk.iter().enumerate() {
                self.char_rom[i][r] = b & 0x1F;
            }
        }
    }

    /// The RAM address the timing chain wants scanned for the current
    /// cell. During blanking the address keeps counting through the
    /// visible window; the fetched byte just never reaches the screen.
    pub fn scan_address(&self, sw: &SoftSwitches) -> u16 {
        let col = (self.h % VISIBLE_COLS) as usize;
        let line = (self.v % VISIBLE_LINES) as usize;
        if self.line_is_text(sw, self.v % VISIBLE_LINES) {
            text_cell_addr(sw.contains(SoftSwitches::PAGE2), line / 8, col)
        } else {
            hires_row_addr(sw.contains(SoftSwitches::PAGE2), line) + col as u16
        }
    }

    fn line_is_text(&self, sw: &SoftSwitches, line: u16) -> bool {
        if sw.contains(SoftSwitches::TEXT) {
            return true;
        }
        sw.contains(SoftSwitches::MIXED) && line >= MIXED_SPLIT_LINE
    }

    /// Whether the line is lores graphics (graphics without HIRES).
    fn line_is_lores(&self, sw: &SoftSwitches, line: u16) -> bool {
        !self.line_is_text(sw, line) && !sw.contains(SoftSwitches::HIRES)
    }

    /// ld194: latch the fetched byte into the cell pipeline and advance
    /// the counters. Called once per CPU cycle, before the 14 ticks.
    pub fn begin_cell(&mut self, data: u8, sw: &SoftSwitches) {
        let line = self.v % VISIBLE_LINES;
        let is_text = self.line_is_text(sw, line);
        let is_lores = self.line_is_lores(sw, line);

        // the graphics-time chain shifts one cell per ld194
        self.graphics_time_3 = self.graphics_time_2;
        self.graphics_time_2 = self.graphics_time_1;
        self.graphics_time_1 = !is_text;

        self.blank_delay = self.h >= VISIBLE_COLS || self.v >= VISIBLE_LINES;
        self.cell_is_text = is_text;
        self.cell_is_lores = is_lores;
        if is_text || is_lores {
            self.hires_delay = false;
        }

        if is_text {
            let code = data;
            let glyph = self.char_rom[(code & 0x3F) as usize][(line % 8) as usize] & 0x1F;
            // two blank columns pad the five glyph dots out to seven
            self.text_shift = (glyph << 1) & 0x7F;
            // top two bits pick the attribute: 00 inverse, 01 flash,
            // 1x normal
            self.invert = match code >> 6 {
                0 => true,
                1 => self.flash,
                _ => false,
            };
        } else if is_lores {
            // vc picks the nibble; h0 picks the rotation phase
            let vc = (line % 8) >= 4;
            self.lores_nibble = if vc { data >> 4 } else { data & 0x0F };
            self.pixel_select = ((vc as u8) << 1) | (self.h & 1) as u8;
        } else {
            self.graphics_shift = data & 0x7F;
            self.pixel_select = ((self.graphics_time_1 as u8) << 1) | (data >> 7);
            self.hires_delay = data & 0x80 != 0;
        }
        self.tick_in_cell = 0;

        // counters
        self.h += 1;
        if self.h == CYCLES_PER_LINE {
            self.h = 0;
            self.v += 1;
            if self.v == LINES_PER_FRAME {
                self.v = 0;
                self.frame_count += 1;
                self.flash_counter += 1;
                if self.flash_counter >= FLASH_FRAMES {
                    self.flash_counter = 0;
                    self.flash = !self.flash;
                }
            }
        }
    }

    /// One 14 MHz tick: the next bit of the serial video stream.
    pub fn tick(&mut self, _sw: &SoftSwitches) -> bool {
        let t = self.tick_in_cell;
        self.tick_in_cell = (self.tick_in_cell + 1) % 14;

        let raw = if self.cell_is_text {
            // 7 dots, each lasting two ticks, MSB of the shifter first
            let bit = self.text_shift & 0x40 != 0;
            if t % 2 == 1 {
                self.text_shift = (self.text_shift << 1) & 0x7F;
            }
            bit
        } else if self.cell_is_lores {
            // the nibble repeats every four ticks, rotated by the phase
            // captured in the pixel-select latch
            let rot = u32::from(self.pixel_select & 0x01) * 2;
            let idx = (u32::from(t) + rot) % 4;
            self.lores_nibble >> idx & 0x01 != 0
        } else {
            // HIRES: 7 data bits, doubled, LSB first
            let bit = self.graphics_shift & 0x01 != 0;
            if t % 2 == 1 {
                self.graphics_shift >>= 1;
            }
            bit
        };

        // hi-res color shift: bit 7 delays the stream half a dot
        let out = if self.hires_delay {
            let prev = self.delayed_bit;
            self.delayed_bit = raw;
            prev
        } else {
            self.delayed_bit = raw;
            raw
        };

        let visible = !self.blank_delay;
        let out = out != (self.cell_is_text && self.invert);
        visible && out
    }
}

impl Default for VideoGen {
    fn default() -> Self {
        VideoGen::new()
    }
}

/// The built-in character generator: 64 glyphs, upper-case set, one byte
/// per row with bit 4 the leftmost dot.
#[rustfmt::skip]
const CHAR_ROM: [[u8; 8]; 64] = [
    // $00 '@'
    [0b01110, 0b10001, 0b10111, 0b10101, 0b10111, 0b10000, 0b01110, 0],
    // $01 'A'
    [0b00100, 0b01010, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0],
    // $02 'B'
    [0b11110, 0b10001, 0b10001, 0b11110, 0b10001, 0b10001, 0b11110, 0],
    // $03 'C'
    [0b01110, 0b10001, 0b10000, 0b10000, 0b10000, 0b10001, 0b01110, 0],
    // $04 'D'
    [0b11100, 0b10010, 0b10001, 0b10001, 0b10001, 0b10010, 0b11100, 0],
    // $05 'E'
    [0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b11111, 0],
    // $06 'F'
    [0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b10000, 0],
    // $07 'G'
    [0b01111, 0b10000, 0b10000, 0b10111, 0b10001, 0b10001, 0b01111, 0],
    // $08 'H'
    [0b10001, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001, 0],
    // $09 'I'
    [0b01110, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110, 0],
    // $0A 'J'
    [0b00001, 0b00001, 0b00001, 0b00001, 0b00001, 0b10001, 0b01110, 0],
    // $0B 'K'
    [0b10001, 0b10010, 0b10100, 0b11000, 0b10100, 0b10010, 0b10001, 0],
    // $0C 'L'
    [0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b11111, 0],
    // $0D 'M'
    [0b10001, 0b11011, 0b10101, 0b10101, 0b10001, 0b10001, 0b10001, 0],
    // $0E 'N'
    [0b10001, 0b10001, 0b11001, 0b10101, 0b10011, 0b10001, 0b10001, 0],
    // $0F 'O'
    [0b01110, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110, 0],
    // $10 'P'
    [0b11110, 0b10001, 0b10001, 0b11110, 0b10000, 0b10000, 0b10000, 0],
    // $11 'Q'
    [0b01110, 0b10001, 0b10001, 0b10001, 0b10101, 0b10010, 0b01101, 0],
    // $12 'R'
    [0b11110, 0b10001, 0b10001, 0b11110, 0b10100, 0b10010, 0b10001, 0],
    // $13 'S'
    [0b01111, 0b10000, 0b10000, 0b01110, 0b00001, 0b00001, 0b11110, 0],
    // $14 'T'
    [0b11111, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0],
    // $15 'U'
    [0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110, 0],
    // $16 'V'
    [0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01010, 0b00100, 0],
    // $17 'W'
    [0b10001, 0b10001, 0b10001, 0b10101, 0b10101, 0b11011, 0b10001, 0],
    // $18 'X'
    [0b10001, 0b10001, 0b01010, 0b00100, 0b01010, 0b10001, 0b10001, 0],
    // $19 'Y'
    [0b10001, 0b10001, 0b01010, 0b00100, 0b00100, 0b00100, 0b00100, 0],
    // $1A 'Z'
    [0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b10000, 0b11111, 0],
    // $1B '['
    [0b01110, 0b01000, 0b01000, 0b01000, 0b01000, 0b01000, 0b01110, 0],
    // $1C '\'
    [0b00000, 0b10000, 0b01000, 0b00100, 0b00010, 0b00001, 0b00000, 0],
    // $1D ']'
    [0b01110, 0b00010, 0b00010, 0b00010, 0b00010, 0b00010, 0b01110, 0],
    // $1E '^'
    [0b00100, 0b01010, 0b10001, 0b00000, 0b00000, 0b00000, 0b00000, 0],
    // $1F '_'
    [0b00000, 0b00000, 0b00000, 0b00000, 0b00000, 0b00000, 0b11111, 0],
    // $20 ' '
    [0b00000, 0b00000, 0b00000, 0b00000, 0b00000, 0b00000, 0b00000, 0],
    // $21 '!'
    [0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b00000, 0b00100, 0],
    // $22 '"'
    [0b01010, 0b01010, 0b01010, 0b00000, 0b00000, 0b00000, 0b00000, 0],
    // $23 '#'
    [0b01010, 0b01010, 0b11111, 0b01010, 0b11111, 0b01010, 0b01010, 0],
    // $24 '$'
    [0b00100, 0b01111, 0b10100, 0b01110, 0b00101, 0b11110, 0b00100, 0],
    // $25 '%'
    [0b11000, 0b11001, 0b00010, 0b00100, 0b01000, 0b10011, 0b00011, 0],
    // $26 '&'
    [0b01000, 0b10100, 0b10100, 0b01000, 0b10101, 0b10010, 0b01101, 0],
    // $27 '\''
    [0b00100, 0b00100, 0b01000, 0b00000, 0b00000, 0b00000, 0b00000, 0],
    // $28 '('
    [0b00010, 0b00100, 0b01000, 0b01000, 0b01000, 0b00100, 0b00010, 0],
    // $29 ')'
    [0b01000, 0b00100, 0b00010, 0b00010, 0b00010, 0b00100, 0b01000, 0],
    // $2A '*'
    [0b00100, 0b10101, 0b01110, 0b00100, 0b01110, 0b10101, 0b00100, 0],
    // $2B '+'
    [0b00000, 0b00100, 0b00100, 0b11111, 0b00100, 0b00100, 0b00000, 0],
    // $2C ','
    [0b00000, 0b00000, 0b00000, 0b00000, 0b00100, 0b00100, 0b01000, 0],
    // $2D '-'
    [0b00000, 0b00000, 0b00000, 0b11111, 0b00000, 0b00000, 0b00000, 0],
    // $2E '.'
    [0b00000, 0b00000, 0b00000, 0b00000, 0b00000, 0b00110, 0b00110, 0],
    // $2F '/'
    [0b00000, 0b00001, 0b00010, 0b00100, 0b01000, 0b10000, 0b00000, 0],
    // $30 '0'
    [0b01110, 0b10001, 0b10011, 0b10101, 0b11001, 0b10001, 0b01110, 0],
    // $31 '1'
    [0b00100, 0b01100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110, 0],
    // $32 '2'
    [0b01110, 0b10001, 0b00001, 0b00110, 0b01000, 0b10000, 0b11111, 0],
    // $33 '3'
    [0b11111, 0b00010, 0b00100, 0b00010, 0b00001, 0b10001, 0b01110, 0],
    // $34 '4'
    [0b00010, 0b00110, 0b01010, 0b10010, 0b11111, 0b00010, 0b00010, 0],
    // $35 '5'
    [0b11111, 0b10000, 0b11110, 0b00001, 0b00001, 0b10001, 0b01110, 0],
    // $36 '6'
    [0b00110, 0b01000, 0b10000, 0b11110, 0b10001, 0b10001, 0b01110, 0],
    // $37 '7'
    [0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b01000, 0b01000, 0],
    // $38 '8'
    [0b01110, 0b10001, 0b10001, 0b01110, 0b10001, 0b10001, 0b01110, 0],
    // $39 '9'
    [0b01110, 0b10001, 0b10001, 0b01111, 0b00001, 0b00010, 0b01100, 0],
    // $3A ':'
    [0b00000, 0b00100, 0b00000, 0b00000, 0b00100, 0b00000, 0b00000, 0],
    // $3B ';'
    [0b00000, 0b00100, 0b00000, 0b00000, 0b00100, 0b00100, 0b01000, 0],
    // $3C '<'
    [0b00010, 0b00100, 0b01000, 0b10000, 0b01000, 0b00100, 0b00010, 0],
    // $3D '='
    [0b00000, 0b00000, 0b11111, 0b00000, 0b11111, 0b00000, 0b00000, 0],
    // $3E '>'
    [0b01000, 0b00100, 0b00010, 0b00001, 0b00010, 0b00100, 0b01000, 0],
    // $3F '?'
    [0b01110, 0b10001, 0b00001, 0b00010, 0b00100, 0b00000, 0b00100, 0],
];

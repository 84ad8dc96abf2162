/// WASM front-end for the Apple II core
use crate::devices::apple2::Apple2;
use js_sys::Uint8Array;
use std::panic;
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
pub struct Apple2Emulator {
    machine: Apple2,
}

#[wasm_bindgen]
impl Apple2Emulator {
    #[wasm_bindgen(constructor)]
    pub fn new(rom: &[u8]) -> Result<Apple2Emulator, JsValue> {
        let mut machine = Apple2::new();
        machine
            .load_rom(rom)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        machine.reset();
        Ok(Apple2Emulator { machine })
    }

    #[wasm_bindgen]
    pub fn insert_disk(&mut self, bytes: &[u8], drive: usize) -> Result<(), JsValue> {
        self.machine
            .load_disk(bytes, drive)
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    #[wasm_bindgen]
    pub fn reset(&mut self) {
        self.machine.reset();
    }

    #[wasm_bindgen]
    pub fn run_frame(&mut self) {
        self.machine.run_frame();
    }

    #[wasm_bindgen]
    pub fn key(&mut self, ascii: u8) {
        self.machine.inject_key(ascii);
    }

    #[wasm_bindgen]
    pub fn text_screen(&self) -> String {
        self.machine.read_text_screen().join("\n")
    }

    #[wasm_bindgen]
    pub fn hires_bitmap(&self) -> Uint8Array {
        let rows = self.machine.read_hires_bitmap();
        let mut flat = Vec::with_capacity(192 * 280);
        for row in rows {
            flat.extend_from_slice(&row);
        }
        Uint8Array::from(flat.as_slice())
    }
}

/// Installs a global panic handler to make debugging easier
#[wasm_bindgen]
pub fn init_debug_hooks() {
    panic::set_hook(Box::new(console_error_panic_hook::hook));
}

use askwave_core::bits::{bits_to_bytes, format_bits, parse_bits};
use askwave_core::{LinkConfig, Receiver, Transmitter};
use wasm_bindgen::prelude::*;

fn to_js<E: std::fmt::Display>(e: E) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// Transmitter using the default link parameters (44.1 kHz, 18 kHz carrier)
#[wasm_bindgen]
pub struct WasmTransmitter {
    inner: Transmitter,
}

#[wasm_bindgen]
impl WasmTransmitter {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Result<WasmTransmitter, JsValue> {
        Transmitter::new(LinkConfig::default())
            .map(|inner| WasmTransmitter { inner })
            .map_err(to_js)
    }

    /// Sample rate the returned buffers are meant to be played at
    #[wasm_bindgen(getter, js_name = sampleRate)]
    pub fn sample_rate(&self) -> u32 {
        self.inner.config().modulation.sample_rate
    }

    /// Modulate a bit string such as "10101010" into a Float32Array
    #[wasm_bindgen(js_name = transmitBits)]
    pub fn transmit_bits(&self, bits: &str) -> Result<Vec<f32>, JsValue> {
        let payload = parse_bits(bits).map_err(to_js)?;
        self.inner.transmit_repeated(&payload).map_err(to_js)
    }

    /// Modulate a Uint8Array, payload_length bits per frame
    #[wasm_bindgen(js_name = transmitBytes)]
    pub fn transmit_bytes(&self, data: &[u8]) -> Result<Vec<f32>, JsValue> {
        self.inner.transmit_bytes(data).map_err(to_js)
    }
}

#[wasm_bindgen]
pub struct WasmReceiver {
    inner: Receiver,
}

#[wasm_bindgen]
impl WasmReceiver {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Result<WasmReceiver, JsValue> {
        Receiver::new(LinkConfig::default())
            .map(|inner| WasmReceiver { inner })
            .map_err(to_js)
    }

    /// Decode a capture (at 44.1 kHz) into one bit string per frame
    #[wasm_bindgen(js_name = receiveBits)]
    pub fn receive_bits(&self, samples: &[f32]) -> Result<Vec<String>, JsValue> {
        let report = self.inner.receive(samples).map_err(to_js)?;
        Ok(report.payloads().map(format_bits).collect())
    }

    /// Decode a capture into packed payload bytes
    #[wasm_bindgen(js_name = receiveBytes)]
    pub fn receive_bytes(&self, samples: &[f32]) -> Result<Vec<u8>, JsValue> {
        let report = self.inner.receive(samples).map_err(to_js)?;
        let bits: Vec<bool> = report.payloads().flatten().copied().collect();
        Ok(bits_to_bytes(&bits))
    }
}

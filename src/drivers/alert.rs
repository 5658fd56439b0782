// EpiWatch — Alert Output Lines
//
// LED and buzzer on plain GPIO outputs, always switched together.

use esp_idf_hal::gpio::{AnyOutputPin, Output, PinDriver};

use crate::alert::AlertOutput;

pub struct AlertPins<'d> {
    led: PinDriver<'d, AnyOutputPin, Output>,
    buzzer: PinDriver<'d, AnyOutputPin, Output>,
}

impl<'d> AlertPins<'d> {
    pub fn new(
        led: PinDriver<'d, AnyOutputPin, Output>,
        buzzer: PinDriver<'d, AnyOutputPin, Output>,
    ) -> Self {
        Self { led, buzzer }
    }
}

impl AlertOutput for AlertPins<'_> {
    fn drive(&mut self, active: bool) {
        for pin in [&mut self.led, &mut self.buzzer] {
            let res = if active { pin.set_high() } else { pin.set_low() };
            if let Err(e) = res {
                log::warn!("Alert GPIO write failed: {}", e);
            }
        }
    }
}

//! One-shot ADC reads for the five flex sensor dividers.
//!
//! GPIO36/39/32/33 are on ADC1; GPIO26 is ADC2 channel 9. All channels use
//! 11 dB attenuation so the full 0..3.3 V swing maps onto 0..4095.

use esp_hal::analog::adc::{Adc, AdcConfig, AdcPin, Attenuation};
use esp_hal::peripherals::{ADC1, ADC2, GPIO26, GPIO32, GPIO33, GPIO36, GPIO39};
use esp_hal::Blocking;
use glove_core::{AnalogSource, InputError};

/// Flex sensor ADC channels of the reference board.
pub struct FlexAdc<'d> {
    adc1: Adc<'d, ADC1<'d>, Blocking>,
    adc2: Adc<'d, ADC2<'d>, Blocking>,
    gpio36: AdcPin<GPIO36<'d>, ADC1<'d>>,
    gpio39: AdcPin<GPIO39<'d>, ADC1<'d>>,
    gpio32: AdcPin<GPIO32<'d>, ADC1<'d>>,
    gpio33: AdcPin<GPIO33<'d>, ADC1<'d>>,
    gpio26: AdcPin<GPIO26<'d>, ADC2<'d>>,
}

impl<'d> FlexAdc<'d> {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        adc1: ADC1<'d>,
        adc2: ADC2<'d>,
        gpio36: GPIO36<'d>,
        gpio39: GPIO39<'d>,
        gpio32: GPIO32<'d>,
        gpio33: GPIO33<'d>,
        gpio26: GPIO26<'d>,
    ) -> Self {
        let mut config1 = AdcConfig::new();
        let gpio36 = config1.enable_pin(gpio36, Attenuation::_11dB);
        let gpio39 = config1.enable_pin(gpio39, Attenuation::_11dB);
        let gpio32 = config1.enable_pin(gpio32, Attenuation::_11dB);
        let gpio33 = config1.enable_pin(gpio33, Attenuation::_11dB);

        let mut config2 = AdcConfig::new();
        let gpio26 = config2.enable_pin(gpio26, Attenuation::_11dB);

        Self {
            adc1: Adc::new(adc1, config1),
            adc2: Adc::new(adc2, config2),
            gpio36,
            gpio39,
            gpio32,
            gpio33,
            gpio26,
        }
    }
}

impl AnalogSource for FlexAdc<'_> {
    fn read_raw(&mut self, pin: u8) -> Result<u16, InputError> {
        let result = match pin {
            36 => nb::block!(self.adc1.read_oneshot(&mut self.gpio36)),
            39 => nb::block!(self.adc1.read_oneshot(&mut self.gpio39)),
            32 => nb::block!(self.adc1.read_oneshot(&mut self.gpio32)),
            33 => nb::block!(self.adc1.read_oneshot(&mut self.gpio33)),
            26 => nb::block!(self.adc2.read_oneshot(&mut self.gpio26)),
            _ => return Err(InputError::InvalidChannel),
        };
        result.map_err(|_| InputError::Io)
    }
}

use esp_hal::analog::adc::{Adc, AdcConfig, AdcPin, Attenuation};
use esp_hal::gpio::{Input, InputConfig, Pull};
use esp_hal::peripherals::{ADC1, GPIO25, GPIO26, GPIO27, GPIO34, GPIO35};
use esp_hal::Blocking;

use crate::hal::InputPad;
use crate::types::PadSnapshot;

type PadAdc = Adc<'static, ADC1<'static>, Blocking>;
type JoyXPin = AdcPin<GPIO34<'static>, ADC1<'static>>;
type JoyYPin = AdcPin<GPIO35<'static>, ADC1<'static>>;

pub struct EspPad {
    button_a: Input<'static>,
    button_b: Input<'static>,
    joystick_sw: Input<'static>,
    adc: PadAdc,
    joystick_x: JoyXPin,
    joystick_y: JoyYPin,
}

impl EspPad {
    pub fn new(
        button_a: GPIO25<'static>,
        button_b: GPIO26<'static>,
        joystick_sw: GPIO27<'static>,
        adc1: ADC1<'static>,
        joystick_x: GPIO34<'static>,
        joystick_y: GPIO35<'static>,
    ) -> Self {
        let input_cfg = InputConfig::default().with_pull(Pull::Up);

        let mut adc_cfg = AdcConfig::new();
        // 11 dB attenuation covers the joystick's full supply swing.
        let joystick_x = adc_cfg.enable_pin(joystick_x, Attenuation::_11dB);
        let joystick_y = adc_cfg.enable_pin(joystick_y, Attenuation::_11dB);

        Self {
            button_a: Input::new(button_a, input_cfg),
            button_b: Input::new(button_b, input_cfg),
            joystick_sw: Input::new(joystick_sw, input_cfg),
            adc: Adc::new(adc1, adc_cfg),
            joystick_x,
            joystick_y,
        }
    }

    fn read_x(&mut self) -> u16 {
        loop {
            if let Ok(raw) = self.adc.read_oneshot(&mut self.joystick_x) {
                break raw;
            }
        }
    }

    fn read_y(&mut self) -> u16 {
        loop {
            if let Ok(raw) = self.adc.read_oneshot(&mut self.joystick_y) {
                break raw;
            }
        }
    }
}

impl InputPad for EspPad {
    fn sample(&mut self) -> PadSnapshot {
        PadSnapshot {
            // Pulled-up buttons read low while pressed.
            button_a_pressed: self.button_a.is_low(),
            button_b_pressed: self.button_b.is_low(),
            joystick_pressed: self.joystick_sw.is_low(),
            joystick_x: self.read_x(),
            joystick_y: self.read_y(),
        }
    }
}

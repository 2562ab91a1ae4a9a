use embedded_hal::digital::v2::OutputPin;

use crate::phase::Phase;

/// The red, yellow and green lamps behind a master enable.
///
/// Lamp lines are active low, the master enable is active high.
pub struct LampDriver<P> {
    lamps: [P; 3],
    master: P,
    lit: Option<Phase>,
}

impl<P: OutputPin> LampDriver<P> {
    /// `lamps` in phase order: red, yellow, green. All lamps start dark.
    pub fn new(lamps: [P; 3], master: P) -> Self {
        let mut driver = Self {
            lamps,
            master,
            lit: None,
        };
        driver.all_off();
        let _ = driver.master.set_low();
        driver
    }

    fn all_off(&mut self) {
        for lamp in self.lamps.iter_mut() {
            let _ = lamp.set_high();
        }
    }

    /// Lights exactly the lamp belonging to `phase`.
    pub fn refresh(&mut self, phase: Phase) {
        self.all_off();
        let _ = self.master.set_high();
        let _ = self.lamps[usize::from(phase.index())].set_low();
        self.lit = Some(phase);
    }

    pub fn lit(&self) -> Option<Phase> {
        self.lit
    }
}

//! Capacitive soil moisture probe
//!
//! The probe is read through a 12-bit ADC channel. Samples are widened
//! to the 16-bit range before averaging so calibration values keep the
//! same scale whatever the ADC resolution.
//!
//! Calibration is a guided two-phase routine: the user holds the probe
//! in air (dry) and then in water (wet) while the prompts count down on
//! the display. Each phase averages a burst of samples.

use embedded_hal_async::delay::DelayNs;
use verdant_core::config::SensorCalibration;
use verdant_core::traits::display::format_line;
use verdant_core::traits::{CharacterDisplay, DisplayError, SensorError};
use verdant_hal::AdcReader;

/// Samples averaged for a regular moisture reading
pub const SAMPLES_PER_READING: u32 = 25;

/// Timing of the calibration routine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CalibrationTiming {
    /// Countdown before each phase starts, in seconds
    pub countdown_s: u8,
    /// Samples averaged per phase
    pub samples: u32,
    /// Pause between samples
    pub sample_interval_ms: u32,
    /// How long "Done!" stays up after each phase
    pub settle_ms: u32,
}

impl Default for CalibrationTiming {
    fn default() -> Self {
        Self {
            countdown_s: 10,
            samples: 100,
            sample_interval_ms: 100,
            settle_ms: 2_000,
        }
    }
}

/// Errors from a calibration run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CalibrationError {
    Sensor(SensorError),
    Display(DisplayError),
}

impl From<SensorError> for CalibrationError {
    fn from(e: SensorError) -> Self {
        CalibrationError::Sensor(e)
    }
}

impl From<DisplayError> for CalibrationError {
    fn from(e: DisplayError) -> Self {
        CalibrationError::Display(e)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Dry,
    Wet,
}

impl Phase {
    fn label(self) -> &'static str {
        match self {
            Phase::Dry => "Dry",
            Phase::Wet => "Wet",
        }
    }
}

/// Moisture probe on one ADC channel
pub struct MoistureProbe<ADC> {
    adc: ADC,
    calibration: Option<SensorCalibration>,
}

impl<ADC: AdcReader> MoistureProbe<ADC> {
    pub fn new(adc: ADC, calibration: Option<SensorCalibration>) -> Self {
        Self { adc, calibration }
    }

    pub fn calibration(&self) -> Option<SensorCalibration> {
        self.calibration
    }

    pub fn set_calibration(&mut self, calibration: SensorCalibration) {
        self.calibration = Some(calibration);
    }

    /// Read one sample widened to 16 bits
    pub async fn sample(&mut self) -> Result<u16, SensorError> {
        let raw = self.adc.read().await.map_err(|_| SensorError::Adc)?;
        Ok(widen(raw))
    }

    /// Sum `count` samples taken `interval_ms` apart
    pub async fn sample_sum<D: DelayNs>(
        &mut self,
        delay: &mut D,
        count: u32,
        interval_ms: u32,
    ) -> Result<u64, SensorError> {
        let mut sum = 0u64;
        for _ in 0..count {
            sum += self.sample().await? as u64;
            delay.delay_ms(interval_ms).await;
        }
        Ok(sum)
    }

    /// Average [`SAMPLES_PER_READING`] samples and scale to the
    /// calibrated span
    pub async fn read_percent<D: DelayNs>(
        &mut self,
        delay: &mut D,
        interval_ms: u32,
    ) -> Result<i32, SensorError> {
        let calibration = self.calibration.ok_or(SensorError::NotCalibrated)?;
        let sum = self
            .sample_sum(delay, SAMPLES_PER_READING, interval_ms)
            .await?;
        Ok(calibration.percent_of_samples(sum, SAMPLES_PER_READING))
    }

    /// Run the guided dry/wet calibration
    ///
    /// On success the new calibration is stored in the probe and
    /// returned; both ends are rounded to the nearest hundred.
    pub async fn calibrate<D, P>(
        &mut self,
        delay: &mut D,
        prompts: &mut P,
        timing: &CalibrationTiming,
    ) -> Result<SensorCalibration, CalibrationError>
    where
        D: DelayNs,
        P: CharacterDisplay,
    {
        let min = self.calibrate_phase(Phase::Dry, delay, prompts, timing).await?;
        let max = self.calibrate_phase(Phase::Wet, delay, prompts, timing).await?;

        #[cfg(feature = "defmt")]
        defmt::info!("calibration complete: min={} max={}", min, max);

        prompts.render(
            &format_line(format_args!("min = {}", min)),
            &format_line(format_args!("max = {}", max)),
        )?;

        let calibration = SensorCalibration::new(min, max);
        self.calibration = Some(calibration);
        Ok(calibration)
    }

    async fn calibrate_phase<D, P>(
        &mut self,
        phase: Phase,
        delay: &mut D,
        prompts: &mut P,
        timing: &CalibrationTiming,
    ) -> Result<u32, CalibrationError>
    where
        D: DelayNs,
        P: CharacterDisplay,
    {
        let title = format_line(format_args!("{} Calibration", phase.label()));
        for remaining in (0..=timing.countdown_s).rev() {
            prompts.render(&title, &format_line(format_args!("start in {} sec", remaining)))?;
            delay.delay_ms(1_000).await;
        }

        prompts.render(&format_line(format_args!("Keep {}", phase.label())), "")?;
        let sum = self
            .sample_sum(delay, timing.samples, timing.sample_interval_ms)
            .await?;

        prompts.render(&title, "Done!")?;
        delay.delay_ms(timing.settle_ms).await;
        Ok(round_to_hundred(sum, timing.samples))
    }

    /// Release the ADC channel
    pub fn release(self) -> ADC {
        self.adc
    }
}

/// Stretch a 12-bit sample over the full 16-bit range
fn widen(raw: u16) -> u16 {
    let raw = raw & 0x0FFF;
    (raw << 4) | (raw >> 8)
}

/// Mean of `count` samples summing to `sum`, rounded to the nearest
/// hundred with ties to even
fn round_to_hundred(sum: u64, count: u32) -> u32 {
    if count == 0 {
        return 0;
    }
    let divisor = 100 * count as u64;
    let quotient = sum / divisor;
    let twice_remainder = 2 * (sum % divisor);

    let rounded = if twice_remainder > divisor
        || (twice_remainder == divisor && quotient % 2 == 1)
    {
        quotient + 1
    } else {
        quotient
    };
    (rounded * 100) as u32
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use embassy_futures::block_on;
    use std::string::{String, ToString};
    use std::vec::Vec;
    use verdant_hal::AdcError;

    /// Returns `dry` for the first `switch_after` reads, then `wet`
    struct TwoLevelAdc {
        reads: u32,
        switch_after: u32,
        dry: u16,
        wet: u16,
        fail: bool,
    }

    impl TwoLevelAdc {
        fn constant(value: u16) -> Self {
            Self {
                reads: 0,
                switch_after: u32::MAX,
                dry: value,
                wet: value,
                fail: false,
            }
        }
    }

    impl AdcReader for TwoLevelAdc {
        async fn read(&mut self) -> Result<u16, AdcError> {
            if self.fail {
                return Err(AdcError::Conversion);
            }
            self.reads += 1;
            if self.reads <= self.switch_after {
                Ok(self.dry)
            } else {
                Ok(self.wet)
            }
        }
    }

    #[derive(Default)]
    struct ElapsedDelay {
        total_ms: u64,
    }

    impl DelayNs for ElapsedDelay {
        async fn delay_ns(&mut self, ns: u32) {
            self.total_ms += ns as u64 / 1_000_000;
        }

        async fn delay_ms(&mut self, ms: u32) {
            self.total_ms += ms as u64;
        }
    }

    #[derive(Default)]
    struct Prompts {
        screens: Vec<(String, String)>,
    }

    impl CharacterDisplay for Prompts {
        fn render(&mut self, line1: &str, line2: &str) -> Result<(), DisplayError> {
            self.screens.push((line1.to_string(), line2.to_string()));
            Ok(())
        }
    }

    fn screen(line1: &str, line2: &str) -> (String, String) {
        (line1.to_string(), line2.to_string())
    }

    #[test]
    fn test_widen() {
        assert_eq!(widen(0), 0);
        assert_eq!(widen(0x0FFF), 0xFFFF);
        assert_eq!(widen(0x0800), 0x8008);
    }

    #[test]
    fn test_round_to_hundred() {
        assert_eq!(round_to_hundred(1_249, 1), 1_200);
        assert_eq!(round_to_hundred(1_251, 1), 1_300);
        // ties go to the even hundred
        assert_eq!(round_to_hundred(1_250, 1), 1_200);
        assert_eq!(round_to_hundred(1_350, 1), 1_400);
        // mean of 2 samples is 1_250.5, not a tie
        assert_eq!(round_to_hundred(2_501, 2), 1_300);
        assert_eq!(round_to_hundred(0, 0), 0);
    }

    #[test]
    fn test_round_beyond_u16() {
        assert_eq!(round_to_hundred(65_535, 1), 65_500);
        assert_eq!(round_to_hundred(65_535 * 4, 4), 65_500);
    }

    #[test]
    fn test_read_percent_requires_calibration() {
        let mut probe = MoistureProbe::new(TwoLevelAdc::constant(0x800), None);
        let mut delay = ElapsedDelay::default();
        assert_eq!(
            block_on(probe.read_percent(&mut delay, 0)),
            Err(SensorError::NotCalibrated)
        );
    }

    #[test]
    fn test_read_percent_averages_samples() {
        let calibration = SensorCalibration::new(0, 0x8008 * 2);
        let mut probe = MoistureProbe::new(TwoLevelAdc::constant(0x800), Some(calibration));
        let mut delay = ElapsedDelay::default();

        assert_eq!(block_on(probe.read_percent(&mut delay, 100)), Ok(50));
        assert_eq!(probe.adc.reads, SAMPLES_PER_READING);
        assert_eq!(delay.total_ms, 100 * SAMPLES_PER_READING as u64);
    }

    #[test]
    fn test_adc_failure() {
        let mut adc = TwoLevelAdc::constant(0);
        adc.fail = true;
        let mut probe = MoistureProbe::new(adc, Some(SensorCalibration::new(0, 100)));
        let mut delay = ElapsedDelay::default();
        assert_eq!(
            block_on(probe.read_percent(&mut delay, 0)),
            Err(SensorError::Adc)
        );
    }

    #[test]
    fn test_calibration_routine() {
        let timing = CalibrationTiming {
            countdown_s: 2,
            samples: 4,
            sample_interval_ms: 100,
            settle_ms: 2_000,
        };
        let adc = TwoLevelAdc {
            reads: 0,
            switch_after: 4,
            dry: 0x0C00,
            wet: 0x0500,
            fail: false,
        };
        let mut probe = MoistureProbe::new(adc, None);
        let mut delay = ElapsedDelay::default();
        let mut prompts = Prompts::default();

        let calibration = block_on(probe.calibrate(&mut delay, &mut prompts, &timing)).unwrap();

        // 0x0C00 -> 0xC00C = 49164, 0x0500 -> 0x5005 = 20485
        assert_eq!(calibration, SensorCalibration::new(49_200, 20_500));
        assert_eq!(probe.calibration(), Some(calibration));

        let expected = [
            screen("Dry Calibration", "start in 2 sec"),
            screen("Dry Calibration", "start in 1 sec"),
            screen("Dry Calibration", "start in 0 sec"),
            screen("Keep Dry", ""),
            screen("Dry Calibration", "Done!"),
            screen("Wet Calibration", "start in 2 sec"),
            screen("Wet Calibration", "start in 1 sec"),
            screen("Wet Calibration", "start in 0 sec"),
            screen("Keep Wet", ""),
            screen("Wet Calibration", "Done!"),
            screen("min = 49200", "max = 20500"),
        ];
        assert_eq!(prompts.screens, expected);

        // 3 countdown seconds, 4 samples and the settle pause, per phase
        assert_eq!(delay.total_ms, 2 * (3_000 + 400 + 2_000));
    }

    #[test]
    fn test_default_timing() {
        let timing = CalibrationTiming::default();
        assert_eq!(timing.countdown_s, 10);
        assert_eq!(timing.samples, 100);
        assert_eq!(timing.sample_interval_ms, 100);
        assert_eq!(timing.settle_ms, 2_000);
    }
}

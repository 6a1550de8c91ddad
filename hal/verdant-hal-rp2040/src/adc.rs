//! ADC channel reader

use embassy_rp::adc::{Adc, Async, Channel};

use verdant_hal::adc::{AdcError, AdcReader};

/// One ADC channel bound to the converter that samples it
pub struct AdcChannelReader<'d> {
    adc: Adc<'d, Async>,
    channel: Channel<'d>,
}

impl<'d> AdcChannelReader<'d> {
    pub fn new(adc: Adc<'d, Async>, channel: Channel<'d>) -> Self {
        Self { adc, channel }
    }
}

impl AdcReader for AdcChannelReader<'_> {
    async fn read(&mut self) -> Result<u16, AdcError> {
        self.adc
            .read(&mut self.channel)
            .await
            .map_err(|_| AdcError::Conversion)
    }
}

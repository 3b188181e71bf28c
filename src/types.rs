/// PMSA003I measurement.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Pmsa003iData {
    /// PM1.0 [μg/m³], standard particle (CF=1)
    pub cf_pm1_0: u16,
    /// PM2.5 [μg/m³], standard particle (CF=1)
    pub cf_pm2_5: u16,
    /// PM10 [μg/m³], standard particle (CF=1)
    pub cf_pm10: u16,
    /// PM1.0 [μg/m³], atmospheric environment
    pub env_pm1_0: u16,
    /// PM2.5 [μg/m³], atmospheric environment
    pub env_pm2_5: u16,
    /// PM10 [μg/m³], atmospheric environment
    pub env_pm10: u16,
    /// Particles > 0.3μm in 0.1L of air
    pub count_0_3: u16,
    /// Particles > 0.5μm in 0.1L of air
    pub count_0_5: u16,
    /// Particles > 1.0μm in 0.1L of air
    pub count_1_0: u16,
    /// Particles > 2.5μm in 0.1L of air
    pub count_2_5: u16,
    /// Particles > 5.0μm in 0.1L of air
    pub count_5_0: u16,
    /// Particles > 10μm in 0.1L of air
    pub count_10: u16,
    /// Firmware version
    pub version: u8,
}

/// SGP30 air quality signals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AirQuality {
    /// CO₂ equivalent [ppm]
    pub co2_eq_ppm: u16,
    /// Total volatile organic compounds [ppb]
    pub tvoc_ppb: u16,
}

/// SGP30 feature set word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Features {
    pub product_type: u8,
    pub product_version: u8,
}

/// 48-bit SGP30 serial number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SerialNumber(pub u64);

impl SerialNumber {
    pub fn from_words(words: [u16; 3]) -> Self {
        Self((u64::from(words[0]) << 32) | (u64::from(words[1]) << 16) | u64::from(words[2]))
    }
}

impl core::fmt::Display for SerialNumber {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{:012X}", self.0)
    }
}

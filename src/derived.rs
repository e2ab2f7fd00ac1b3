//! Locally computed weather metrics
//!
//! Dew point from temperature and humidity, and the temperature bands that
//! drive the textual summary and clothing recommendation.

/// Magnus formula coefficients
const MAGNUS_A: f64 = 17.27;
const MAGNUS_B: f64 = 237.7;

/// Dew point in Celsius via the Magnus formula, rounded to 2 decimals.
///
/// Returns `None` when humidity is not strictly positive (the logarithm is
/// undefined there) or when the inputs produce a non-finite result.
#[must_use]
pub fn dew_point(temperature_c: f64, humidity_pct: f64) -> Option<f64> {
    if humidity_pct.is_nan() || humidity_pct <= 0.0 || !temperature_c.is_finite() {
        return None;
    }

    let alpha = (MAGNUS_A * temperature_c) / (MAGNUS_B + temperature_c) + (humidity_pct / 100.0).ln();
    let dew_point = (MAGNUS_B * alpha) / (MAGNUS_A - alpha);

    dew_point
        .is_finite()
        .then(|| (dew_point * 100.0).round() / 100.0)
}

/// Temperature band; lower bounds exclusive, upper bounds inclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemperatureBand {
    /// Above 25 °C
    Hot,
    /// Above 15 °C up to 25 °C
    Warm,
    /// Above 5 °C up to 15 °C
    Cool,
    /// 5 °C and below
    Cold,
}

impl TemperatureBand {
    #[must_use]
    pub fn classify(temperature_c: f64) -> Self {
        if temperature_c > 25.0 {
            Self::Hot
        } else if temperature_c > 15.0 {
            Self::Warm
        } else if temperature_c > 5.0 {
            Self::Cool
        } else {
            Self::Cold
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Hot => "hot",
            Self::Warm => "warm",
            Self::Cool => "cool",
            Self::Cold => "cold",
        }
    }

    #[must_use]
    pub fn recommendation(self) -> &'static str {
        match self {
            Self::Hot => "Stay hydrated and wear light clothing.",
            Self::Warm => "A light jacket should be enough.",
            Self::Cool => "Wear a warm jacket.",
            Self::Cold => "Bundle up! It's very cold.",
        }
    }
}

/// One-line summary, e.g. "It's warm and partly cloudy."
#[must_use]
pub fn summary(temperature_c: f64, description: &str) -> String {
    format!(
        "It's {} and {}.",
        TemperatureBand::classify(temperature_c).label(),
        description
    )
}

#[must_use]
pub fn recommendation(temperature_c: f64) -> &'static str {
    TemperatureBand::classify(temperature_c).recommendation()
}

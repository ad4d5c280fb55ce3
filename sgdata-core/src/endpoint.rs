use std::{convert::TryFrom, fmt};

/// The named real-time datasets this client knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Psi,
    TwoHourForecast,
    CarparkAvailability,
}

impl Endpoint {
    pub fn as_str(&self) -> &'static str {
        match self {
            Endpoint::Psi => "psi",
            Endpoint::TwoHourForecast => "2-hour-forecast",
            Endpoint::CarparkAvailability => "carpark-availability",
        }
    }

    /// Path used when the config file does not override it.
    pub fn default_path(&self) -> &'static str {
        match self {
            Endpoint::Psi => "/v1/environment/psi",
            Endpoint::TwoHourForecast => "/v1/environment/2-hour-weather-forecast",
            Endpoint::CarparkAvailability => "/v1/transport/carpark-availability",
        }
    }

    pub const fn all() -> &'static [Endpoint] {
        &[Endpoint::Psi, Endpoint::TwoHourForecast, Endpoint::CarparkAvailability]
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for Endpoint {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let lower = value.to_lowercase();

        match lower.as_str() {
            "psi" => Ok(Endpoint::Psi),
            "2-hour-forecast" => Ok(Endpoint::TwoHourForecast),
            "carpark-availability" => Ok(Endpoint::CarparkAvailability),
            _ => Err(anyhow::anyhow!(
                "Unknown endpoint '{value}'. Supported endpoints: psi, 2-hour-forecast, carpark-availability."
            )),
        }
    }
}

/// Display asset for a coarse weather category.
///
/// One mapping serves both the headline panel and the forecast strip; any
/// label outside the known three falls back to [`WeatherIcon::PartlyCloudy`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeatherIcon {
    Sunny,
    Cloudy,
    Raining,
    PartlyCloudy,
}

impl WeatherIcon {
    pub fn for_category(category: &str) -> Self {
        match category {
            "Clear" => WeatherIcon::Sunny,
            "Clouds" => WeatherIcon::Cloudy,
            "Rain" => WeatherIcon::Raining,
            _ => WeatherIcon::PartlyCloudy,
        }
    }

    pub fn glyph(self) -> &'static str {
        match self {
            WeatherIcon::Sunny => "☀",
            WeatherIcon::Cloudy => "☁",
            WeatherIcon::Raining => "🌧",
            WeatherIcon::PartlyCloudy => "⛅",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            WeatherIcon::Sunny => "sunny",
            WeatherIcon::Cloudy => "cloudy",
            WeatherIcon::Raining => "raining",
            WeatherIcon::PartlyCloudy => "partly cloudy",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_categories_map_to_their_assets() {
        assert_eq!(WeatherIcon::for_category("Clear"), WeatherIcon::Sunny);
        assert_eq!(WeatherIcon::for_category("Clouds"), WeatherIcon::Cloudy);
        assert_eq!(WeatherIcon::for_category("Rain"), WeatherIcon::Raining);
    }

    #[test]
    fn everything_else_falls_back_to_partly_cloudy() {
        for label in ["", "Snow", "Drizzle", "Thunderstorm", "clear", "RAIN", "Unknown"] {
            assert_eq!(WeatherIcon::for_category(label), WeatherIcon::PartlyCloudy);
        }
    }
}

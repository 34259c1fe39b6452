//! Mapping from weather condition and time of day to a CSS display class.

use std::fmt;

/// Background style chosen for a weather condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DisplayClass {
    Sunny,
    Cloudy,
    Rainy,
    Snowy,
    Storm,
    Default,
}

impl DisplayClass {
    /// Map the provider's `weather[0].main` group name.
    ///
    /// Matching is exact: the provider always capitalizes these groups.
    pub fn from_condition(condition: &str) -> Self {
        match condition {
            "Clear" => DisplayClass::Sunny,
            "Clouds" => DisplayClass::Cloudy,
            "Rain" => DisplayClass::Rainy,
            "Snow" => DisplayClass::Snowy,
            "Thunderstorm" => DisplayClass::Storm,
            _ => DisplayClass::Default,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DisplayClass::Sunny => "sunny",
            DisplayClass::Cloudy => "cloudy",
            DisplayClass::Rainy => "rainy",
            DisplayClass::Snowy => "snowy",
            DisplayClass::Storm => "storm",
            DisplayClass::Default => "default",
        }
    }
}

impl fmt::Display for DisplayClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeOfDay {
    Day,
    Night,
}

impl TimeOfDay {
    /// Day is the half-open window `[06:00, 18:00)`.
    pub fn from_hour(hour: u32) -> Self {
        if (6..18).contains(&hour) { TimeOfDay::Day } else { TimeOfDay::Night }
    }
}

/// Full class name for a condition at the given local hour, e.g. `rainy_night`.
pub fn display_class(condition: &str, hour: u32) -> String {
    let class = DisplayClass::from_condition(condition);
    match TimeOfDay::from_hour(hour) {
        TimeOfDay::Day => class.to_string(),
        TimeOfDay::Night => format!("{class}_night"),
    }
}

//! `LIGHT:` directive parsing.
//!
//! `LIGHT:<wiz|rgb>:<ON|OFF>[:brightness=<int>][:color=<h,s>|<r,g,b>]`
//!
//! Anything unparseable falls back to a default instead of failing the
//! command. Each fallback is kept as [`Field::Defaulted`] with a reason so it
//! can be logged.

use crate::actions::{HueSat, PowerState};

pub const PRIMARY_LIGHT: &str = "wiz";
pub const SECONDARY_LIGHT: &str = "rgb";
pub const DEFAULT_BRIGHTNESS: u8 = 50;

#[derive(Debug, Clone, PartialEq)]
pub enum Field<T> {
    Parsed(T),
    Defaulted { value: T, reason: String },
}

impl<T> Field<T> {
    fn defaulted(value: T, reason: impl Into<String>) -> Self {
        Field::Defaulted {
            value,
            reason: reason.into(),
        }
    }

    pub fn value(&self) -> &T {
        match self {
            Field::Parsed(value) | Field::Defaulted { value, .. } => value,
        }
    }

    pub fn into_value(self) -> T {
        match self {
            Field::Parsed(value) | Field::Defaulted { value, .. } => value,
        }
    }

    pub fn default_reason(&self) -> Option<&str> {
        match self {
            Field::Parsed(_) => None,
            Field::Defaulted { reason, .. } => Some(reason),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LightDirective {
    pub name: Field<&'static str>,
    pub power: Field<PowerState>,
    /// Only present when the directive turns the light on.
    pub brightness: Option<Field<u8>>,
    pub color: Option<Field<HueSat>>,
}

impl LightDirective {
    pub fn parse(line: &str) -> Self {
        let parts: Vec<&str> = line.trim().split(':').collect();

        let name = if parts.contains(&PRIMARY_LIGHT) {
            Field::Parsed(PRIMARY_LIGHT)
        } else if parts.contains(&SECONDARY_LIGHT) {
            Field::Parsed(SECONDARY_LIGHT)
        } else {
            return Self {
                name: Field::defaulted(PRIMARY_LIGHT, "no recognized light name"),
                power: Field::defaulted(PowerState::On, "no recognized light name"),
                brightness: None,
                color: None,
            };
        };

        if parts.iter().any(|p| *p == "OFF" || *p == "off") {
            return Self {
                name,
                power: Field::Parsed(PowerState::Off),
                brightness: None,
                color: None,
            };
        }

        if !parts.iter().any(|p| *p == "ON" || *p == "on") {
            return Self {
                name,
                power: Field::defaulted(PowerState::On, "neither ON nor OFF given"),
                brightness: None,
                color: None,
            };
        }

        let mut brightness = None;
        let mut color = None;
        for part in &parts {
            let lower = part.to_lowercase();
            if lower.starts_with("brightness=") {
                brightness = Some(parse_brightness(param_value(part)));
            } else if lower.starts_with("color=") {
                color = Some(parse_color(param_value(part)));
            }
        }

        Self {
            name,
            power: Field::Parsed(PowerState::On),
            brightness,
            color,
        }
    }

    /// Log every defaulted field at debug.
    pub fn log_defaults(&self, line: &str) {
        let reasons = [
            ("name", self.name.default_reason()),
            ("power", self.power.default_reason()),
            ("brightness", self.brightness.as_ref().and_then(Field::default_reason)),
            ("color", self.color.as_ref().and_then(Field::default_reason)),
        ];
        for (field, reason) in reasons {
            if let Some(reason) = reason {
                tracing::debug!("[Light] {} defaulted in {:?}: {}", field, line, reason);
            }
        }
    }
}

fn param_value(part: &str) -> &str {
    part.split('=').nth(1).unwrap_or("").trim().trim_matches('"').trim()
}

fn parse_brightness(value: &str) -> Field<u8> {
    match value.parse::<i64>() {
        Ok(pct) if (0..=100).contains(&pct) => Field::Parsed(pct as u8),
        Ok(pct) => Field::defaulted(pct.clamp(0, 100) as u8, format!("brightness {} out of range", pct)),
        Err(e) => Field::defaulted(DEFAULT_BRIGHTNESS, format!("brightness {:?}: {}", value, e)),
    }
}

fn parse_color(value: &str) -> Field<HueSat> {
    let numbers: Result<Vec<i64>, _> = value.split(',').map(|n| n.trim().parse::<i64>()).collect();
    let numbers = match numbers {
        Ok(numbers) => numbers,
        Err(e) => return Field::defaulted(HueSat::default(), format!("color {:?}: {}", value, e)),
    };

    match numbers.as_slice() {
        [hue, saturation] => Field::Parsed(HueSat::new(
            (*hue).clamp(0, 360) as u16,
            (*saturation).clamp(0, 100) as u8,
        )),
        [r, g, b] => {
            let channel = |c: i64| c.clamp(0, 255) as u8;
            let (hue, saturation) = rgb_to_hsl(channel(*r), channel(*g), channel(*b));
            Field::Parsed(HueSat::new(hue, saturation))
        }
        other => Field::defaulted(
            HueSat::default(),
            format!("color expects 2 or 3 values, got {}", other.len()),
        ),
    }
}

/// RGB to (hue degrees, saturation percent) via the HLS model.
pub fn rgb_to_hsl(r: u8, g: u8, b: u8) -> (u16, u8) {
    let (r, g, b) = (r as f64 / 255.0, g as f64 / 255.0, b as f64 / 255.0);
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    if max == min {
        return (0, 0);
    }

    let delta = max - min;
    let lightness = (max + min) / 2.0;
    let saturation = if lightness <= 0.5 {
        delta / (max + min)
    } else {
        delta / (2.0 - max - min)
    };

    let rc = (max - r) / delta;
    let gc = (max - g) / delta;
    let bc = (max - b) / delta;
    let h = if r == max {
        bc - gc
    } else if g == max {
        2.0 + rc - bc
    } else {
        4.0 + gc - rc
    };
    let hue = (h / 6.0).rem_euclid(1.0);

    ((hue * 360.0).round() as u16, (saturation * 100.0).round() as u8)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn primary_colors() {
        assert_eq!(rgb_to_hsl(255, 0, 0), (0, 100));
        assert_eq!(rgb_to_hsl(0, 255, 0), (120, 100));
        assert_eq!(rgb_to_hsl(0, 0, 255), (240, 100));
    }

    #[test]
    fn greys_have_no_hue_or_saturation() {
        assert_eq!(rgb_to_hsl(0, 0, 0), (0, 0));
        assert_eq!(rgb_to_hsl(128, 128, 128), (0, 0));
        assert_eq!(rgb_to_hsl(255, 255, 255), (0, 0));
    }

    #[test]
    fn orange_and_magenta() {
        assert_eq!(rgb_to_hsl(255, 128, 0), (30, 100));
        assert_eq!(rgb_to_hsl(255, 0, 255), (300, 100));
    }

    #[test]
    fn full_directive() {
        let d = LightDirective::parse("LIGHT:wiz:ON:brightness=80:color=255,0,0");
        assert_eq!(d.name, Field::Parsed("wiz"));
        assert_eq!(d.power, Field::Parsed(PowerState::On));
        assert_eq!(d.brightness, Some(Field::Parsed(80)));
        assert_eq!(d.color, Some(Field::Parsed(HueSat::new(0, 100))));
    }

    #[test]
    fn unparseable_brightness_defaults_to_fifty() {
        let d = LightDirective::parse("LIGHT:wiz:ON:brightness=abc");
        let brightness = d.brightness.unwrap();
        assert_eq!(*brightness.value(), DEFAULT_BRIGHTNESS);
        assert!(brightness.default_reason().is_some());
    }

    #[test]
    fn quoted_brightness_is_accepted() {
        let d = LightDirective::parse("LIGHT:rgb:on:brightness=\"35\"");
        assert_eq!(d.name, Field::Parsed("rgb"));
        assert_eq!(d.brightness, Some(Field::Parsed(35)));
    }

    #[test]
    fn brightness_is_clamped() {
        let d = LightDirective::parse("LIGHT:wiz:ON:brightness=250");
        assert_eq!(*d.brightness.unwrap().value(), 100);
    }

    #[test]
    fn hue_saturation_pair_passes_through() {
        let d = LightDirective::parse("LIGHT:wiz:ON:color=200,40");
        assert_eq!(d.color, Some(Field::Parsed(HueSat::new(200, 40))));
    }

    #[test]
    fn bad_color_arity_defaults() {
        let d = LightDirective::parse("LIGHT:wiz:ON:COLOR=1,2,3,4");
        let color = d.color.unwrap();
        assert_eq!(*color.value(), HueSat::new(0, 0));
        assert!(color.default_reason().unwrap().contains("got 4"));
    }

    #[test]
    fn wiz_wins_over_rgb() {
        let d = LightDirective::parse("LIGHT:rgb:wiz:ON");
        assert_eq!(d.name, Field::Parsed("wiz"));
    }

    #[test]
    fn off_ignores_parameters() {
        let d = LightDirective::parse("LIGHT:wiz:OFF:brightness=80");
        assert_eq!(d.power, Field::Parsed(PowerState::Off));
        assert_eq!(d.brightness, None);
    }

    #[test]
    fn unknown_name_defaults_to_wiz_on() {
        let d = LightDirective::parse("LIGHT:kitchen:OFF");
        assert_eq!(*d.name.value(), "wiz");
        assert_eq!(*d.power.value(), PowerState::On);
        assert!(d.name.default_reason().is_some());
        assert_eq!(d.brightness, None);
    }

    #[test]
    fn missing_power_defaults_to_on_without_parameters() {
        let d = LightDirective::parse("LIGHT:wiz:brightness=10");
        assert_eq!(*d.power.value(), PowerState::On);
        assert!(d.power.default_reason().is_some());
        assert_eq!(d.brightness, None);
    }

    proptest! {
        #[test]
        fn rgb_to_hsl_is_stable_and_bounded(r: u8, g: u8, b: u8) {
            let first = rgb_to_hsl(r, g, b);
            prop_assert_eq!(first, rgb_to_hsl(r, g, b));
            prop_assert!(first.0 <= 360);
            prop_assert!(first.1 <= 100);
        }

        #[test]
        fn parse_is_total(line in any::<String>()) {
            let d = LightDirective::parse(&line);
            prop_assert!(*d.name.value() == PRIMARY_LIGHT || *d.name.value() == SECONDARY_LIGHT);
            if let Some(b) = d.brightness {
                prop_assert!(*b.value() <= 100);
            }
        }
    }
}

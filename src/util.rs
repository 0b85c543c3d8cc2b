use chrono::{DateTime, Utc};
use eframe::egui::Color32;

pub fn parse_hex_color(hex: &str) -> Option<Color32> {
    let digits = hex.strip_prefix('#')?;
    if digits.len() != 6 {
        return None;
    }
    let value = u32::from_str_radix(digits, 16).ok()?;
    Some(Color32::from_rgb(
        (value >> 16) as u8,
        (value >> 8) as u8,
        value as u8,
    ))
}

pub fn hex_color_or(hex: &str, fallback: Color32) -> Color32 {
    parse_hex_color(hex).unwrap_or(fallback)
}

pub fn with_opacity(color: Color32, opacity: f32) -> Color32 {
    let alpha = (opacity.clamp(0.0, 1.0) * 255.0) as u8;
    Color32::from_rgba_unmultiplied(color.r(), color.g(), color.b(), alpha)
}

pub fn relative_day_label(moment: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let days = (now.date_naive() - moment.date_naive()).num_days();
    match days {
        i64::MIN..=-1 => moment.format("%Y-%m-%d").to_string(),
        0 => "today".to_owned(),
        1 => "yesterday".to_owned(),
        2..=13 => format!("{days} days ago"),
        14..=60 => format!("{} weeks ago", days / 7),
        _ => moment.format("%Y-%m-%d").to_string(),
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn parses_six_digit_hex() {
        assert_eq!(
            parse_hex_color("#FF6B6B"),
            Some(Color32::from_rgb(255, 107, 107))
        );
        assert_eq!(
            parse_hex_color("#00D2FF"),
            Some(Color32::from_rgb(0, 210, 255))
        );
        assert_eq!(parse_hex_color("FF6B6B"), None);
        assert_eq!(parse_hex_color("#FFF"), None);
        assert_eq!(parse_hex_color("#GGGGGG"), None);
    }

    #[test]
    fn opacity_scales_alpha_only() {
        let color = with_opacity(Color32::from_rgb(10, 20, 30), 0.5);
        assert_eq!(color.r(), 10);
        assert_eq!(color.a(), 127);
    }

    #[test]
    fn relative_labels_step_with_distance() {
        let now = Utc.with_ymd_and_hms(2026, 1, 20, 12, 0, 0).unwrap();
        let at = |day: u32| Utc.with_ymd_and_hms(2026, 1, day, 9, 0, 0).unwrap();
        assert_eq!(relative_day_label(at(20), now), "today");
        assert_eq!(relative_day_label(at(19), now), "yesterday");
        assert_eq!(relative_day_label(at(15), now), "5 days ago");
        assert_eq!(relative_day_label(at(2), now), "2 weeks ago");
    }
}

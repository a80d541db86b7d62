//! Formatting helpers shared by the card grid and the detail overlay.

use ratatui::style::Color;

pub const STAT_MAX: f64 = 255.0;

/// Badge colour for a type name. Unknown types fall back to slate.
pub fn type_color(type_name: &str) -> Color {
    match type_name {
        "normal" => Color::Rgb(156, 163, 175),
        "fire" => Color::Rgb(239, 68, 68),
        "water" => Color::Rgb(59, 130, 246),
        "electric" => Color::Rgb(250, 204, 21),
        "grass" => Color::Rgb(34, 197, 94),
        "ice" => Color::Rgb(191, 219, 254),
        "fighting" => Color::Rgb(185, 28, 28),
        "poison" => Color::Rgb(168, 85, 247),
        "ground" => Color::Rgb(202, 138, 4),
        "flying" => Color::Rgb(165, 180, 252),
        "psychic" => Color::Rgb(236, 72, 153),
        "bug" => Color::Rgb(74, 222, 128),
        "rock" => Color::Rgb(161, 98, 7),
        "ghost" => Color::Rgb(126, 34, 206),
        "dragon" => Color::Rgb(79, 70, 229),
        "dark" => Color::Rgb(31, 41, 55),
        "steel" => Color::Rgb(107, 114, 128),
        "fairy" => Color::Rgb(249, 168, 212),
        _ => Color::Rgb(107, 114, 128),
    }
}

/// Text colour that stays readable on top of `type_color`.
pub fn type_text_color(type_name: &str) -> Color {
    match type_name {
        "electric" | "ice" | "fairy" | "flying" => Color::Rgb(17, 24, 39),
        _ => Color::White,
    }
}

pub fn dex_number(id: u32) -> String {
    format!("#{id:03}")
}

/// Height is reported in decimetres.
pub fn height_meters(raw: u32) -> f64 {
    raw as f64 / 10.0
}

/// Weight is reported in hectograms.
pub fn weight_kilograms(raw: u32) -> f64 {
    raw as f64 / 10.0
}

pub fn stat_bar_percent(base: u16) -> f64 {
    base as f64 / STAT_MAX * 100.0
}

/// Number of filled cells for a stat bar `width` cells wide.
pub fn stat_bar_cells(base: u16, width: u16) -> u16 {
    let cells = (stat_bar_percent(base) / 100.0 * width as f64).round();
    (cells as u16).min(width)
}

pub fn stat_label(name: &str) -> String {
    match name {
        "hp" => "HP".to_string(),
        "attack" => "ATK".to_string(),
        "defense" => "DEF".to_string(),
        "special-attack" => "SP.ATK".to_string(),
        "special-defense" => "SP.DEF".to_string(),
        "speed" => "SPD".to_string(),
        _ => name.to_ascii_uppercase(),
    }
}

pub fn title_case(name: &str) -> String {
    name.split('-')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stat_bar_spans_full_range() {
        assert_eq!(stat_bar_percent(255), 100.0);
        assert_eq!(stat_bar_percent(0), 0.0);
        assert_eq!(stat_bar_cells(255, 20), 20);
        assert_eq!(stat_bar_cells(0, 20), 0);
    }

    #[test]
    fn dex_number_is_zero_padded() {
        assert_eq!(dex_number(7), "#007");
        assert_eq!(dex_number(151), "#151");
        assert_eq!(dex_number(1025), "#1025");
    }

    #[test]
    fn measurements_are_scaled_by_ten() {
        assert_eq!(height_meters(7), 0.7);
        assert_eq!(weight_kilograms(69), 6.9);
    }

    #[test]
    fn unknown_type_uses_fallback() {
        assert_eq!(type_color("shadow"), type_color("steel"));
        assert_ne!(type_color("fire"), type_color("water"));
    }

    #[test]
    fn names_are_title_cased() {
        assert_eq!(title_case("mr-mime"), "Mr Mime");
        assert_eq!(title_case("special-attack"), "Special Attack");
    }
}

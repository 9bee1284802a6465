use anyhow::{Context, Result, bail};
use tabled::{
    Table, Tabled,
    settings::{Alignment, Modify, Style, object::Columns},
};

use macrobook_core::models::FoodItem;

/// Parse a menu argument: `"Rice=200"`, `"Rice=200g"`, or just `"Rice"` for
/// the default portion. Splits on the last `=`, so food names may contain one.
pub(crate) fn parse_menu_entry(s: &str) -> Result<(String, Option<u32>)> {
    let (name, grams) = match s.rsplit_once('=') {
        Some((name, grams)) => (name.trim(), Some(parse_portion(grams)?)),
        None => (s.trim(), None),
    };
    if name.is_empty() {
        bail!("Missing food name in '{s}'. Use 'name=grams' (e.g. 'Rice=200')");
    }
    Ok((name.to_string(), grams))
}

/// Whole grams, with an optional trailing `g`. Zero is allowed and means
/// "drop this entry".
pub(crate) fn parse_portion(s: &str) -> Result<u32> {
    let trimmed = s.trim().trim_end_matches('g').trim();
    trimmed.parse().with_context(|| {
        format!("Invalid portion: '{s}'. Use whole grams like '200' or '200g'")
    })
}

pub(crate) fn print_food_table(foods: &[&FoodItem]) {
    #[derive(Tabled)]
    struct FoodRow {
        #[tabled(rename = "#")]
        idx: usize,
        #[tabled(rename = "Name")]
        name: String,
        #[tabled(rename = "P/100g")]
        proteins: String,
        #[tabled(rename = "F/100g")]
        fats: String,
        #[tabled(rename = "C/100g")]
        carbs: String,
        #[tabled(rename = "Cal/100g")]
        calories: String,
    }

    let rows: Vec<FoodRow> = foods
        .iter()
        .enumerate()
        .map(|(i, f)| FoodRow {
            idx: i + 1,
            name: truncate(&f.name, 35),
            proteins: format!("{:.1}", no_neg_zero(f.proteins_per_100g)),
            fats: format!("{:.1}", no_neg_zero(f.fats_per_100g)),
            carbs: format!("{:.1}", no_neg_zero(f.carbs_per_100g)),
            calories: format!("{:.0}", no_neg_zero(f.calories_per_100g)),
        })
        .collect();

    let table = Table::new(&rows)
        .with(Style::rounded())
        .with(Modify::new(Columns::new(2..6)).with(Alignment::right()))
        .to_string();
    println!("{table}");
}

pub(crate) fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub(crate) fn no_neg_zero(v: f64) -> f64 {
    if v == 0.0 { 0.0 } else { v }
}

pub(crate) fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let end = s.char_indices().nth(max - 3).map_or(s.len(), |(i, _)| i);
        format!("{}...", &s[..end])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_menu_entry() {
        assert_eq!(
            parse_menu_entry("Rice=200").unwrap(),
            ("Rice".to_string(), Some(200))
        );
        assert_eq!(
            parse_menu_entry(" Rice = 150g ").unwrap(),
            ("Rice".to_string(), Some(150))
        );
        assert_eq!(parse_menu_entry("Rice").unwrap(), ("Rice".to_string(), None));
        assert_eq!(
            parse_menu_entry("Rice=0").unwrap(),
            ("Rice".to_string(), Some(0))
        );
    }

    #[test]
    fn test_parse_menu_entry_name_with_equals() {
        assert_eq!(
            parse_menu_entry("A=B=50").unwrap(),
            ("A=B".to_string(), Some(50))
        );
    }

    #[test]
    fn test_parse_menu_entry_invalid() {
        assert!(parse_menu_entry("=200").is_err());
        assert!(parse_menu_entry("Rice=abc").is_err());
        assert!(parse_menu_entry("Rice=-5").is_err());
        assert!(parse_menu_entry("Rice=1.5").is_err());
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("hello", 10), "hello");
        assert_eq!(truncate("hello world this is long", 10), "hello w...");
        assert_eq!(truncate("Crème fraîche", 10), "Crème f...");
    }

    #[test]
    #[allow(clippy::float_cmp)]
    fn test_no_neg_zero() {
        assert_eq!(no_neg_zero(-0.0).to_bits(), 0.0_f64.to_bits());
        assert_eq!(no_neg_zero(5.0), 5.0);
    }
}

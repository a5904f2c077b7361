use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::repo::Recipe;

/// Request body for creating a recipe. `price` travels as a string so no
/// precision is lost in transit.
#[derive(Debug, Deserialize)]
pub struct CreateRecipeRequest {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub time_minutes: i64,
    pub price: Decimal,
    #[serde(default)]
    pub link: Option<String>,
}

/// Partial update; omitted fields keep their stored value.
#[derive(Debug, Deserialize)]
pub struct UpdateRecipeRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub time_minutes: Option<i64>,
    pub price: Option<Decimal>,
    pub link: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RecipeResponse {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub time_minutes: i64,
    pub price: Decimal,
    pub link: Option<String>,
}

impl From<Recipe> for RecipeResponse {
    fn from(recipe: Recipe) -> Self {
        Self {
            id: recipe.id,
            title: recipe.title,
            description: recipe.description,
            time_minutes: recipe.time_minutes,
            price: recipe.price,
            link: recipe.link,
        }
    }
}

/// Prices are fixed-point with at most 5 digits and 2 decimal places, so the
/// representable range is -999.99..=999.99.
pub fn price_in_range(price: &Decimal) -> bool {
    price.scale() <= 2 && price.abs() < Decimal::new(1000, 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn price_range_accepts_five_digit_two_decimal_values() {
        assert!(price_in_range(&dec("5.99")));
        assert!(price_in_range(&dec("999.99")));
        assert!(price_in_range(&dec("0")));
        assert!(price_in_range(&dec("0.5")));
    }

    #[test]
    fn price_range_rejects_too_many_digits_or_decimals() {
        assert!(!price_in_range(&dec("1000.00")));
        assert!(!price_in_range(&dec("1.999")));
        assert!(!price_in_range(&dec("12345.67")));
    }

    #[test]
    fn price_serializes_as_string() {
        let response = RecipeResponse {
            id: 1,
            title: "Cheesecake".into(),
            description: None,
            time_minutes: 30,
            price: dec("5.99"),
            link: None,
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["price"], "5.99");
    }
}

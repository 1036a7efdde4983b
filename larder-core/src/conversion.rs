//! Amount conversion between quantity units.
//!
//! Resolution is a three-tier lookup: a product-specific rule wins over a
//! household-global rule, which wins over the built-in SI table. When no
//! rule matches, the behavior depends on the policy: `FailOpen` returns
//! the amount unconverted (a possibly-wrong quantity is preferred over
//! blocking the user's action), `Strict` returns an error.

use rust_decimal::Decimal;
use uuid::Uuid;

use crate::error::ConversionError;

/// A quantity unit as the resolver sees it. The built-in table matches on
/// normalized names; user-defined rules match on ids.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unit {
    pub id: Uuid,
    pub name: String,
}

/// A user-defined conversion rule. `product_id = None` denotes a
/// household-global rule that applies to every product.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionRule {
    pub product_id: Option<Uuid>,
    pub from_unit_id: Uuid,
    pub to_unit_id: Uuid,
    pub factor: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConversionPolicy {
    /// Treat unconvertible units as compatible and pass the amount through.
    #[default]
    FailOpen,
    /// Report unconvertible units as an error.
    Strict,
}

/// Convert `amount` from one unit into another.
///
/// With `ConversionPolicy::FailOpen` this never fails; with `Strict` it
/// returns `ConversionError::NoRuleFound` when no tier matches.
pub fn resolve_amount(
    amount: Decimal,
    from: &Unit,
    to: &Unit,
    product_id: Uuid,
    rules: &[ConversionRule],
    policy: ConversionPolicy,
) -> Result<Decimal, ConversionError> {
    if from.id == to.id {
        return Ok(amount);
    }

    let matches_units = |r: &&ConversionRule| r.from_unit_id == from.id && r.to_unit_id == to.id;

    // Tier 1: product-specific rule
    if let Some(rule) = rules
        .iter()
        .filter(|r| r.product_id == Some(product_id))
        .find(matches_units)
    {
        return Ok(amount * rule.factor);
    }

    // Tier 2: household-global rule
    if let Some(rule) = rules
        .iter()
        .filter(|r| r.product_id.is_none())
        .find(matches_units)
    {
        return Ok(amount * rule.factor);
    }

    // Tier 3: built-in SI table
    if let Some(factor) = builtin_factor(&from.name, &to.name) {
        return Ok(amount * factor);
    }

    match policy {
        ConversionPolicy::FailOpen => Ok(amount),
        ConversionPolicy::Strict => Err(ConversionError::NoRuleFound {
            from: from.name.clone(),
            to: to.name.clone(),
        }),
    }
}

fn builtin_factor(from: &str, to: &str) -> Option<Decimal> {
    let from = normalize(from);
    let to = normalize(to);
    si_factor(&from, &to).or_else(|| si_factor(&to, &from).map(|f| Decimal::ONE / f))
}

fn normalize(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Forward factors of the built-in table; the reverse direction is derived
/// by inversion.
fn si_factor(from: &str, to: &str) -> Option<Decimal> {
    match (from, to) {
        ("kilogram", "gram") | ("kg", "g") => Some(Decimal::from(1000)),
        ("gram", "milligram") | ("g", "mg") => Some(Decimal::from(1000)),
        ("litre", "millilitre") | ("liter", "milliliter") | ("l", "ml") => {
            Some(Decimal::from(1000))
        }
        ("pint", "millilitre") | ("pint", "milliliter") => Some(Decimal::new(56_826_125, 5)),
        ("pound", "gram") | ("lb", "g") => Some(Decimal::new(45_359_237, 5)),
        ("ounce", "gram") | ("oz", "g") => Some(Decimal::new(28_349_523_125, 9)),
        ("cup", "millilitre") | ("cup", "milliliter") => Some(Decimal::from(240)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn unit(name: &str) -> Unit {
        Unit {
            id: Uuid::new_v4(),
            name: name.to_string(),
        }
    }

    #[test]
    fn test_same_unit_is_identity() {
        let g = unit("gram");
        let result = resolve_amount(
            dec!(42.5),
            &g,
            &g.clone(),
            Uuid::new_v4(),
            &[],
            ConversionPolicy::Strict,
        );
        assert_eq!(result, Ok(dec!(42.5)));
    }

    #[test]
    fn test_product_rule_wins_over_global() {
        let pack = unit("pack");
        let gram = unit("gram");
        let product = Uuid::new_v4();
        let rules = vec![
            ConversionRule {
                product_id: None,
                from_unit_id: pack.id,
                to_unit_id: gram.id,
                factor: dec!(500),
            },
            ConversionRule {
                product_id: Some(product),
                from_unit_id: pack.id,
                to_unit_id: gram.id,
                factor: dec!(250),
            },
        ];

        let result =
            resolve_amount(dec!(2), &pack, &gram, product, &rules, ConversionPolicy::Strict);
        assert_eq!(result, Ok(dec!(500)));
    }

    #[test]
    fn test_global_rule_applies_to_other_products() {
        let pack = unit("pack");
        let gram = unit("gram");
        let rules = vec![ConversionRule {
            product_id: None,
            from_unit_id: pack.id,
            to_unit_id: gram.id,
            factor: dec!(500),
        }];

        let result = resolve_amount(
            dec!(3),
            &pack,
            &gram,
            Uuid::new_v4(),
            &rules,
            ConversionPolicy::Strict,
        );
        assert_eq!(result, Ok(dec!(1500)));
    }

    #[test]
    fn test_builtin_kilogram_to_gram() {
        let kg = unit("kilogram");
        let g = unit("gram");
        let result = resolve_amount(
            dec!(1.5),
            &kg,
            &g,
            Uuid::new_v4(),
            &[],
            ConversionPolicy::Strict,
        );
        assert_eq!(result, Ok(dec!(1500)));
    }

    #[test]
    fn test_builtin_reverse_direction() {
        let kg = unit("kilogram");
        let g = unit("gram");
        let result = resolve_amount(
            dec!(500),
            &g,
            &kg,
            Uuid::new_v4(),
            &[],
            ConversionPolicy::Strict,
        );
        assert_eq!(result, Ok(dec!(0.5)));
    }

    #[test]
    fn test_builtin_pint_to_millilitre() {
        let pint = unit("pint");
        let ml = unit("millilitre");
        let result = resolve_amount(
            dec!(2),
            &pint,
            &ml,
            Uuid::new_v4(),
            &[],
            ConversionPolicy::Strict,
        );
        assert_eq!(result, Ok(dec!(1136.5225)));
    }

    #[test]
    fn test_fail_open_passes_amount_through() {
        let piece = unit("piece");
        let gram = unit("gram");
        let result = resolve_amount(
            dec!(7),
            &piece,
            &gram,
            Uuid::new_v4(),
            &[],
            ConversionPolicy::FailOpen,
        );
        assert_eq!(result, Ok(dec!(7)));
    }

    #[test]
    fn test_strict_errors_on_unknown_pair() {
        let piece = unit("piece");
        let gram = unit("gram");
        let result = resolve_amount(
            dec!(7),
            &piece,
            &gram,
            Uuid::new_v4(),
            &[],
            ConversionPolicy::Strict,
        );
        assert_eq!(
            result,
            Err(ConversionError::NoRuleFound {
                from: "piece".to_string(),
                to: "gram".to_string(),
            })
        );
    }
}

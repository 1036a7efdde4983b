//! Fulfillment scoring: can a recipe be cooked at a given serving size
//! with the stock on hand, and what is missing per ingredient.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::flatten::FlatIngredient;

/// Per-ingredient outcome of a fulfillment check. Amounts are in the
/// product's stock unit; `skipped` ingredients carry informational values
/// but never count toward `can_make` or the ratio.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngredientFulfillment {
    pub ingredient_id: Uuid,
    pub product_id: Option<Uuid>,
    pub needed: Decimal,
    pub in_stock: Decimal,
    pub missing: Decimal,
    pub fulfilled: bool,
    pub skipped: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FulfillmentReport {
    pub can_make: bool,
    /// Fraction of checkable ingredients that are fulfilled, 0..=1.
    /// Reported as 1 when nothing is checkable; `can_make` is false in
    /// that case so callers can render "no checks" instead of 100%.
    pub fulfillment_ratio: Decimal,
    pub ingredients: Vec<IngredientFulfillment>,
}

/// Score a flattened ingredient list against a per-product stock snapshot.
///
/// `base_servings <= 0` disables scaling rather than dividing by zero.
/// Skipped ingredients are: `variable_amount` placeholders, ingredients
/// flagged as not stock-checked, ingredients whose product opts out of
/// recipe checks, and ingredients with no linked product. A recipe with
/// zero checkable ingredients is reported as not makeable; there is
/// nothing to verify.
pub fn compute_fulfillment(
    ingredients: &[FlatIngredient],
    stock_by_product: &HashMap<Uuid, Decimal>,
    base_servings: Decimal,
    desired_servings: Decimal,
) -> FulfillmentReport {
    let scale = if base_servings > Decimal::ZERO {
        desired_servings / base_servings
    } else {
        Decimal::ONE
    };

    let mut checkable = 0u32;
    let mut fulfilled_count = 0u32;
    let mut report = Vec::with_capacity(ingredients.len());

    for ingredient in ingredients {
        if ingredient.variable_amount {
            // Placeholder amount; excluded from the math entirely.
            report.push(IngredientFulfillment {
                ingredient_id: ingredient.ingredient_id,
                product_id: ingredient.product_id,
                needed: Decimal::ZERO,
                in_stock: Decimal::ZERO,
                missing: Decimal::ZERO,
                fulfilled: true,
                skipped: true,
            });
            continue;
        }

        let needed = ingredient.amount * scale;
        let in_stock = ingredient
            .product_id
            .and_then(|id| stock_by_product.get(&id).copied())
            .unwrap_or(Decimal::ZERO);
        let missing = (needed - in_stock).max(Decimal::ZERO);
        let fulfilled = missing.is_zero();

        let skipped = ingredient.product_id.is_none()
            || ingredient.not_check_stock_fulfillment
            || ingredient.product_skips_stock_check;

        if !skipped {
            checkable += 1;
            if fulfilled {
                fulfilled_count += 1;
            }
        }

        report.push(IngredientFulfillment {
            ingredient_id: ingredient.ingredient_id,
            product_id: ingredient.product_id,
            needed,
            in_stock,
            missing,
            fulfilled,
            skipped,
        });
    }

    let (can_make, fulfillment_ratio) = if checkable == 0 {
        (false, Decimal::ONE)
    } else {
        (
            fulfilled_count == checkable,
            Decimal::from(fulfilled_count) / Decimal::from(checkable),
        )
    };

    FulfillmentReport {
        can_make,
        fulfillment_ratio,
        ingredients: report,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn ingredient(product_id: Option<Uuid>, amount: Decimal) -> FlatIngredient {
        FlatIngredient {
            ingredient_id: Uuid::new_v4(),
            recipe_id: Uuid::new_v4(),
            product_id,
            amount,
            unit_id: None,
            variable_amount: false,
            not_check_stock_fulfillment: false,
            product_skips_stock_check: false,
        }
    }

    #[test]
    fn test_flour_example_at_full_servings() {
        let flour = Uuid::new_v4();
        let ingredients = vec![ingredient(Some(flour), dec!(200))];
        let stock = HashMap::from([(flour, dec!(150))]);

        let report = compute_fulfillment(&ingredients, &stock, dec!(2), dec!(2));

        assert!(!report.can_make);
        let entry = &report.ingredients[0];
        assert_eq!(entry.needed, dec!(200));
        assert_eq!(entry.in_stock, dec!(150));
        assert_eq!(entry.missing, dec!(50));
        assert!(!entry.fulfilled);
    }

    #[test]
    fn test_flour_example_at_half_servings() {
        let flour = Uuid::new_v4();
        let ingredients = vec![ingredient(Some(flour), dec!(200))];
        let stock = HashMap::from([(flour, dec!(150))]);

        let report = compute_fulfillment(&ingredients, &stock, dec!(2), dec!(1));

        assert!(report.can_make);
        let entry = &report.ingredients[0];
        assert_eq!(entry.needed, dec!(100));
        assert_eq!(entry.missing, dec!(0));
        assert!(entry.fulfilled);
    }

    #[test]
    fn test_scaling_law_doubles_needed() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let ingredients = vec![
            ingredient(Some(a), dec!(120)),
            ingredient(Some(b), dec!(0.75)),
        ];

        let report = compute_fulfillment(&ingredients, &HashMap::new(), dec!(4), dec!(8));

        assert_eq!(report.ingredients[0].needed, dec!(240));
        assert_eq!(report.ingredients[1].needed, dec!(1.5));
    }

    #[test]
    fn test_zero_base_servings_disables_scaling() {
        let a = Uuid::new_v4();
        let ingredients = vec![ingredient(Some(a), dec!(100))];

        let report = compute_fulfillment(&ingredients, &HashMap::new(), dec!(0), dec!(5));

        assert_eq!(report.ingredients[0].needed, dec!(100));
    }

    #[test]
    fn test_variable_amount_is_skipped_with_zero_missing() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let mut variable = ingredient(Some(a), dec!(999));
        variable.variable_amount = true;
        let ingredients = vec![variable, ingredient(Some(b), dec!(10))];
        let stock = HashMap::from([(b, dec!(10))]);

        let report = compute_fulfillment(&ingredients, &stock, dec!(1), dec!(1));

        assert!(report.can_make);
        assert_eq!(report.fulfillment_ratio, dec!(1));
        assert!(report.ingredients[0].skipped);
        assert_eq!(report.ingredients[0].missing, dec!(0));
    }

    #[test]
    fn test_unchecked_ingredient_excluded_from_ratio() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let mut unchecked = ingredient(Some(a), dec!(50));
        unchecked.not_check_stock_fulfillment = true;
        let ingredients = vec![unchecked, ingredient(Some(b), dec!(10))];
        // Neither product is in stock; only b counts against the recipe.
        let stock = HashMap::from([(b, dec!(25))]);

        let report = compute_fulfillment(&ingredients, &stock, dec!(1), dec!(1));

        assert!(report.can_make);
        assert_eq!(report.fulfillment_ratio, dec!(1));
        assert!(report.ingredients[0].skipped);
        // Informational values are still reported for the skipped entry.
        assert_eq!(report.ingredients[0].missing, dec!(50));
    }

    #[test]
    fn test_product_skip_flag_excludes_ingredient() {
        let a = Uuid::new_v4();
        let mut skipped = ingredient(Some(a), dec!(5));
        skipped.product_skips_stock_check = true;
        let ingredients = vec![skipped];

        let report = compute_fulfillment(&ingredients, &HashMap::new(), dec!(1), dec!(1));

        assert!(!report.can_make);
        assert!(report.ingredients[0].skipped);
    }

    #[test]
    fn test_zero_checkable_is_not_makeable() {
        let mut variable = ingredient(Some(Uuid::new_v4()), dec!(1));
        variable.variable_amount = true;
        let no_product = ingredient(None, dec!(2));
        let ingredients = vec![variable, no_product];

        let report = compute_fulfillment(&ingredients, &HashMap::new(), dec!(1), dec!(1));

        assert!(!report.can_make);
        assert_eq!(report.fulfillment_ratio, dec!(1));
    }

    #[test]
    fn test_partial_fulfillment_ratio() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let ingredients = vec![ingredient(Some(a), dec!(10)), ingredient(Some(b), dec!(10))];
        let stock = HashMap::from([(a, dec!(10))]);

        let report = compute_fulfillment(&ingredients, &stock, dec!(1), dec!(1));

        assert!(!report.can_make);
        assert_eq!(report.fulfillment_ratio, dec!(0.5));
    }
}

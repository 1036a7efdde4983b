//! Recipe nesting flattener.
//!
//! A recipe may include other recipes as components ("3 servings of the
//! dough recipe"). Flattening expands those edges into one ingredient
//! list with amounts scaled to the desired serving count, compounding
//! the servings ratio multiplicatively at each nesting level.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::FlattenError;

/// A stored recipe ingredient, amounts relative to the recipe's base
/// servings. `product_skips_stock_check` carries the product-level
/// opt-out flag so the fulfillment calculator does not need a product
/// lookup of its own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlatIngredient {
    pub ingredient_id: Uuid,
    pub recipe_id: Uuid,
    pub product_id: Option<Uuid>,
    pub amount: Decimal,
    pub unit_id: Option<Uuid>,
    pub variable_amount: bool,
    pub not_check_stock_fulfillment: bool,
    pub product_skips_stock_check: bool,
}

/// A "this recipe includes N servings of that recipe" edge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NestingEdge {
    pub includes_recipe_id: Uuid,
    pub servings: Decimal,
}

/// Expand a recipe and its nested sub-recipes into one flat ingredient
/// list scaled to `desired_servings`.
///
/// Missing entries in the lookup maps end that branch silently; a recipe
/// id encountered twice on the same branch is a cycle and fails the whole
/// expansion. Ingredient amounts stay in their stored units.
pub fn flatten_recipe(
    root_recipe_id: Uuid,
    ingredients_by_recipe: &HashMap<Uuid, Vec<FlatIngredient>>,
    nestings_by_recipe: &HashMap<Uuid, Vec<NestingEdge>>,
    base_servings_by_recipe: &HashMap<Uuid, Decimal>,
    desired_servings: Decimal,
) -> Result<Vec<FlatIngredient>, FlattenError> {
    let root_base = base_servings_by_recipe
        .get(&root_recipe_id)
        .copied()
        .unwrap_or(Decimal::ONE);
    let root_scale = if root_base > Decimal::ZERO {
        desired_servings / root_base
    } else {
        Decimal::ONE
    };

    let mut flat = Vec::new();
    let mut branch = Vec::new();
    expand(
        root_recipe_id,
        root_scale,
        ingredients_by_recipe,
        nestings_by_recipe,
        base_servings_by_recipe,
        &mut branch,
        &mut flat,
    )?;
    Ok(flat)
}

fn expand(
    recipe_id: Uuid,
    scale: Decimal,
    ingredients_by_recipe: &HashMap<Uuid, Vec<FlatIngredient>>,
    nestings_by_recipe: &HashMap<Uuid, Vec<NestingEdge>>,
    base_servings_by_recipe: &HashMap<Uuid, Decimal>,
    branch: &mut Vec<Uuid>,
    out: &mut Vec<FlatIngredient>,
) -> Result<(), FlattenError> {
    if branch.contains(&recipe_id) {
        return Err(FlattenError::CycleDetected(recipe_id));
    }
    branch.push(recipe_id);

    if let Some(ingredients) = ingredients_by_recipe.get(&recipe_id) {
        for ingredient in ingredients {
            let mut scaled = ingredient.clone();
            scaled.amount = ingredient.amount * scale;
            out.push(scaled);
        }
    }

    if let Some(edges) = nestings_by_recipe.get(&recipe_id) {
        for edge in edges {
            let child_base = base_servings_by_recipe
                .get(&edge.includes_recipe_id)
                .copied()
                .unwrap_or(Decimal::ONE);
            let child_ratio = if child_base > Decimal::ZERO {
                edge.servings / child_base
            } else {
                edge.servings
            };
            expand(
                edge.includes_recipe_id,
                scale * child_ratio,
                ingredients_by_recipe,
                nestings_by_recipe,
                base_servings_by_recipe,
                branch,
                out,
            )?;
        }
    }

    branch.pop();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn ingredient(recipe_id: Uuid, amount: Decimal) -> FlatIngredient {
        FlatIngredient {
            ingredient_id: Uuid::new_v4(),
            recipe_id,
            product_id: Some(Uuid::new_v4()),
            amount,
            unit_id: None,
            variable_amount: false,
            not_check_stock_fulfillment: false,
            product_skips_stock_check: false,
        }
    }

    #[test]
    fn test_flat_recipe_scales_to_desired_servings() {
        let root = Uuid::new_v4();
        let ingredients = HashMap::from([(root, vec![ingredient(root, dec!(200))])]);
        let bases = HashMap::from([(root, dec!(2))]);

        let flat =
            flatten_recipe(root, &ingredients, &HashMap::new(), &bases, dec!(3)).unwrap();

        assert_eq!(flat.len(), 1);
        assert_eq!(flat[0].amount, dec!(300));
    }

    #[test]
    fn test_nested_recipe_compounds_scale_factors() {
        let root = Uuid::new_v4();
        let dough = Uuid::new_v4();
        // Root serves 2 and uses 3 servings of the dough recipe, which
        // serves 4 with 100 flour. At 4 desired servings of the root:
        // 100 * (3/4) * (4/2) = 150.
        let ingredients = HashMap::from([(dough, vec![ingredient(dough, dec!(100))])]);
        let nestings = HashMap::from([(
            root,
            vec![NestingEdge {
                includes_recipe_id: dough,
                servings: dec!(3),
            }],
        )]);
        let bases = HashMap::from([(root, dec!(2)), (dough, dec!(4))]);

        let flat = flatten_recipe(root, &ingredients, &nestings, &bases, dec!(4)).unwrap();

        assert_eq!(flat.len(), 1);
        assert_eq!(flat[0].amount, dec!(150));
    }

    #[test]
    fn test_two_level_nesting() {
        let root = Uuid::new_v4();
        let middle = Uuid::new_v4();
        let leaf = Uuid::new_v4();
        let ingredients = HashMap::from([
            (root, vec![ingredient(root, dec!(10))]),
            (leaf, vec![ingredient(leaf, dec!(8))]),
        ]);
        let nestings = HashMap::from([
            (
                root,
                vec![NestingEdge {
                    includes_recipe_id: middle,
                    servings: dec!(2),
                }],
            ),
            (
                middle,
                vec![NestingEdge {
                    includes_recipe_id: leaf,
                    servings: dec!(3),
                }],
            ),
        ]);
        let bases =
            HashMap::from([(root, dec!(1)), (middle, dec!(2)), (leaf, dec!(4))]);

        let flat = flatten_recipe(root, &ingredients, &nestings, &bases, dec!(1)).unwrap();

        assert_eq!(flat.len(), 2);
        assert_eq!(flat[0].amount, dec!(10));
        // 8 * (3/4) * (2/2) = 6
        assert_eq!(flat[1].amount, dec!(6));
    }

    #[test]
    fn test_missing_recipe_data_ends_branch() {
        let root = Uuid::new_v4();
        let ghost = Uuid::new_v4();
        let ingredients = HashMap::from([(root, vec![ingredient(root, dec!(5))])]);
        let nestings = HashMap::from([(
            root,
            vec![NestingEdge {
                includes_recipe_id: ghost,
                servings: dec!(1),
            }],
        )]);
        let bases = HashMap::from([(root, dec!(1))]);

        let flat = flatten_recipe(root, &ingredients, &nestings, &bases, dec!(1)).unwrap();

        assert_eq!(flat.len(), 1);
    }

    #[test]
    fn test_cycle_is_detected() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let nestings = HashMap::from([
            (
                a,
                vec![NestingEdge {
                    includes_recipe_id: b,
                    servings: dec!(1),
                }],
            ),
            (
                b,
                vec![NestingEdge {
                    includes_recipe_id: a,
                    servings: dec!(1),
                }],
            ),
        ]);
        let bases = HashMap::from([(a, dec!(1)), (b, dec!(1))]);

        let result = flatten_recipe(a, &HashMap::new(), &nestings, &bases, dec!(1));

        assert_eq!(result, Err(FlattenError::CycleDetected(a)));
    }

    #[test]
    fn test_diamond_nesting_is_not_a_cycle() {
        // Two branches both include the same leaf; the leaf contributes twice.
        let root = Uuid::new_v4();
        let left = Uuid::new_v4();
        let right = Uuid::new_v4();
        let leaf = Uuid::new_v4();
        let ingredients = HashMap::from([(leaf, vec![ingredient(leaf, dec!(4))])]);
        let edge = |to: Uuid| NestingEdge {
            includes_recipe_id: to,
            servings: dec!(1),
        };
        let nestings = HashMap::from([
            (root, vec![edge(left), edge(right)]),
            (left, vec![edge(leaf)]),
            (right, vec![edge(leaf)]),
        ]);
        let bases = HashMap::from([
            (root, dec!(1)),
            (left, dec!(1)),
            (right, dec!(1)),
            (leaf, dec!(1)),
        ]);

        let flat = flatten_recipe(root, &ingredients, &nestings, &bases, dec!(1)).unwrap();

        assert_eq!(flat.len(), 2);
        assert_eq!(flat[0].amount, dec!(4));
        assert_eq!(flat[1].amount, dec!(4));
    }
}

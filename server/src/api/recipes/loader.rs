//! Loads a household's recipe graph in the shape the engine crate wants:
//! ingredient lists with amounts pre-converted to each product's stock
//! unit, nesting edges, and base servings per recipe.

use std::collections::HashMap;

use diesel::prelude::*;
use rust_decimal::Decimal;
use uuid::Uuid;

use larder_core::{
    resolve_amount, ConversionPolicy, ConversionRule, FlatIngredient, NestingEdge, Unit,
};

use crate::models::{QuantityUnitConversion, RecipeIngredient, RecipeNesting};
use crate::schema::{products, quantity_unit_conversions, quantity_units, recipe_ingredients,
    recipe_nestings, recipes};

pub struct RecipeGraph {
    pub ingredients_by_recipe: HashMap<Uuid, Vec<FlatIngredient>>,
    pub nestings_by_recipe: HashMap<Uuid, Vec<NestingEdge>>,
    pub base_servings_by_recipe: HashMap<Uuid, Decimal>,
}

struct ProductFlags {
    qu_id_stock: Uuid,
    not_check_stock_fulfillment: bool,
}

pub fn load_recipe_graph(
    conn: &mut PgConnection,
    household_id: Uuid,
) -> QueryResult<RecipeGraph> {
    let recipe_rows: Vec<(Uuid, Decimal)> = recipes::table
        .filter(recipes::household_id.eq(household_id))
        .filter(recipes::deleted_at.is_null())
        .select((recipes::id, recipes::base_servings))
        .load(conn)?;

    let base_servings_by_recipe: HashMap<Uuid, Decimal> = recipe_rows.iter().copied().collect();
    let recipe_ids: Vec<Uuid> = recipe_rows.iter().map(|(id, _)| *id).collect();

    let product_rows: Vec<(Uuid, Uuid, bool)> = products::table
        .filter(products::household_id.eq(household_id))
        .filter(products::deleted_at.is_null())
        .select((
            products::id,
            products::qu_id_stock,
            products::not_check_stock_fulfillment,
        ))
        .load(conn)?;
    let product_flags: HashMap<Uuid, ProductFlags> = product_rows
        .into_iter()
        .map(|(id, qu_id_stock, not_check_stock_fulfillment)| {
            (
                id,
                ProductFlags {
                    qu_id_stock,
                    not_check_stock_fulfillment,
                },
            )
        })
        .collect();

    let unit_rows: Vec<(Uuid, String)> = quantity_units::table
        .filter(quantity_units::household_id.eq(household_id))
        .select((quantity_units::id, quantity_units::name))
        .load(conn)?;
    let units: HashMap<Uuid, Unit> = unit_rows
        .into_iter()
        .map(|(id, name)| (id, Unit { id, name }))
        .collect();

    let rule_rows: Vec<QuantityUnitConversion> = quantity_unit_conversions::table
        .filter(quantity_unit_conversions::household_id.eq(household_id))
        .select(QuantityUnitConversion::as_select())
        .load(conn)?;
    let rules: Vec<ConversionRule> = rule_rows
        .into_iter()
        .map(|r| ConversionRule {
            product_id: r.product_id,
            from_unit_id: r.from_qu_id,
            to_unit_id: r.to_qu_id,
            factor: r.factor,
        })
        .collect();

    let ingredient_rows: Vec<RecipeIngredient> = recipe_ingredients::table
        .filter(recipe_ingredients::recipe_id.eq_any(&recipe_ids))
        .select(RecipeIngredient::as_select())
        .load(conn)?;

    let mut ingredients_by_recipe: HashMap<Uuid, Vec<FlatIngredient>> = HashMap::new();
    for row in ingredient_rows {
        let flags = row.product_id.and_then(|id| product_flags.get(&id));

        // Stored amounts are converted into the product's stock unit here
        // so everything downstream compares like with like. Unknown pairs
        // pass through unconverted.
        let amount = match (row.qu_id, flags) {
            (Some(qu_id), Some(flags)) if qu_id != flags.qu_id_stock => {
                match (units.get(&qu_id), units.get(&flags.qu_id_stock)) {
                    (Some(from), Some(to)) => resolve_amount(
                        row.amount,
                        from,
                        to,
                        row.product_id.unwrap_or_default(),
                        &rules,
                        ConversionPolicy::FailOpen,
                    )
                    .unwrap_or(row.amount),
                    _ => row.amount,
                }
            }
            _ => row.amount,
        };

        ingredients_by_recipe
            .entry(row.recipe_id)
            .or_default()
            .push(FlatIngredient {
                ingredient_id: row.id,
                recipe_id: row.recipe_id,
                product_id: row.product_id,
                amount,
                unit_id: row.qu_id,
                variable_amount: row.variable_amount,
                not_check_stock_fulfillment: row.not_check_stock_fulfillment,
                product_skips_stock_check: flags
                    .map(|f| f.not_check_stock_fulfillment)
                    .unwrap_or(false),
            });
    }

    let nesting_rows: Vec<RecipeNesting> = recipe_nestings::table
        .filter(recipe_nestings::recipe_id.eq_any(&recipe_ids))
        .select(RecipeNesting::as_select())
        .load(conn)?;

    let mut nestings_by_recipe: HashMap<Uuid, Vec<NestingEdge>> = HashMap::new();
    for row in nesting_rows {
        nestings_by_recipe
            .entry(row.recipe_id)
            .or_default()
            .push(NestingEdge {
                includes_recipe_id: row.includes_recipe_id,
                servings: row.servings,
            });
    }

    Ok(RecipeGraph {
        ingredients_by_recipe,
        nestings_by_recipe,
        base_servings_by_recipe,
    })
}

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString, VariantArray};

/// Workflow status of a recipe. Transitions are guarded by the aggregate;
/// every recipe starts as a draft.
#[derive(
    EnumString,
    Display,
    AsRefStr,
    VariantArray,
    Default,
    Copy,
    Clone,
    Debug,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
)]
pub enum RecipeStatus {
    #[default]
    Draft,
    Published,
    Archived,
}

#[derive(
    EnumString,
    Display,
    AsRefStr,
    VariantArray,
    Default,
    Copy,
    Clone,
    Debug,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
)]
pub enum DishType {
    FirstCourse,
    #[default]
    MainCourse,
    Salad,
    Dessert,
    Beverage,
    Appetizer,
}

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString, VariantArray};

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
pub enum MeasurementUnit {
    #[default]
    Piece,
    Gram,
    Kilogram,
    Milliliter,
    Liter,
    Tablespoon,
    Teaspoon,
    Package,
    Cup,
}

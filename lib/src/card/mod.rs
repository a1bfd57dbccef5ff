mod card;
mod mana_cost;

pub use card::*;
pub use mana_cost::*;

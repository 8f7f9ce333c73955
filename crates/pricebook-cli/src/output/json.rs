use serde::Serialize;

use pricebook_core::error::PriceBookError;

pub fn print<T: Serialize>(value: &T) -> Result<(), PriceBookError> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{json}");
    Ok(())
}

use crate::shared::ids::{IdMinter, UuidIdMinter};

pub fn cmd_mint(args: &[String]) -> Result<String, String> {
    let minter = UuidIdMinter;
    match args {
        [kind] if kind == "bag-id" => Ok(minter.mint_bag_id()),
        [kind] if kind == "nbn" => Ok(minter.mint_nbn()),
        _ => Err("usage: mint bag-id|nbn".to_string()),
    }
}

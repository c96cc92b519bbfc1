use crate::commands::{print_json, Context};
use anyhow::{Context as _, Result};
use clap::Args;
use holdline_core::PhoneNumberProcessor;

#[derive(Debug, Args)]
pub struct MaskArgs {
    /// Caller number exactly as the provider sends it; omit for an anonymous caller
    pub number: Option<String>,
}

/// Prints the stored form of a number so an operator can find a caller's rows.
pub fn mask(ctx: &Context<'_>, args: MaskArgs) -> Result<()> {
    let key = ctx
        .config
        .phone_hash_key()
        .with_context(|| "load phone hash secret")?;
    let data = PhoneNumberProcessor::new(key).process(args.number.as_deref());

    if ctx.json {
        return print_json(&data);
    }

    println!("join key:  {}", data.join_key);
    println!("display:   {}", data.display_format);
    println!(
        "area code: {}",
        data.area_code.as_deref().unwrap_or("-")
    );
    Ok(())
}

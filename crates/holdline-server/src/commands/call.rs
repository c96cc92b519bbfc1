use crate::commands::analytics::{format_duration, place};
use crate::commands::{print_json, Context};
use crate::error::not_found;
use anyhow::Result;
use clap::Args;
use holdline_core::domain::CallSid;
use holdline_core::time::format_timestamp;
use holdline_store::Store;

#[derive(Debug, Args)]
pub struct ShowCallArgs {
    /// Provider call sid, e.g. CA0123...
    pub sid: String,
}

pub fn show_call(ctx: &Context<'_>, store: &Store, args: ShowCallArgs) -> Result<()> {
    let sid = CallSid::parse(&args.sid)?;
    let call = store
        .calls()
        .get(&sid)?
        .ok_or_else(|| not_found(format!("call {sid} not found")))?;

    if ctx.json {
        return print_json(&call);
    }

    println!("call:      {}", call.call_sid);
    println!("caller:    {}", call.caller.display_format);
    println!("join key:  {}", call.caller.join_key);
    println!(
        "from:      {}",
        place(call.location.city.as_deref(), call.location.state.as_deref())
    );
    println!("status:    {}", call.status.as_str());
    println!("started:   {}", format_timestamp(call.start_time));
    if let Some(end) = call.end_time {
        println!("ended:     {}", format_timestamp(end));
    }
    println!(
        "duration:  {}",
        call.duration_seconds
            .map(format_duration)
            .unwrap_or_else(|| "-".to_string())
    );
    Ok(())
}

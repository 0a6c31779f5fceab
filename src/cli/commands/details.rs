//! details command - Print every version detail, as text or JSON

use crate::cli::Context;
use crate::version::VersionDetails;
use anyhow::{Context as _, Result};

/// Print all details of the repository containing `ctx.cwd`.
pub fn details(ctx: &Context, json: bool) -> Result<()> {
    let details = ctx
        .resolver
        .resolve_version_details(&ctx.cwd, ctx.prefix.as_deref())
        .context("failed to resolve version")?;

    if json {
        let rendered =
            serde_json::to_string_pretty(&*details).context("failed to serialize details")?;
        println!("{}", rendered);
    } else {
        print!("{}", render_text(&details));
    }
    Ok(())
}

fn render_text(details: &VersionDetails) -> String {
    let mut out = String::new();
    let mut line = |label: &str, value: &str| {
        out.push_str(&format!("{:<16}{}\n", format!("{}:", label), value));
    };

    line("Version", &details.version);
    line("Last tag", details.last_tag.as_deref().unwrap_or("(none)"));
    line("Distance", &details.commit_distance.to_string());
    line("Hash", &details.git_hash);
    line("Full hash", &details.git_hash_full);
    line(
        "Branch",
        if details.branch_name.is_empty() {
            "(detached)"
        } else {
            &details.branch_name
        },
    );
    line("Clean tag", if details.is_clean_tag { "yes" } else { "no" });
    out
}

//! `releases list` / `releases show` command handlers (spec.md §4.G).

use crate::error::StagecraftError;
use crate::store::ReleaseStore;
use crate::ui;

pub fn list(store: &ReleaseStore, environment: Option<&str>) -> Result<(), StagecraftError> {
    let releases = match environment {
        Some(env) => store.list_releases(env)?,
        None => store.list_all_releases()?,
    };

    if releases.is_empty() {
        ui::print_info("no releases recorded");
        return Ok(());
    }

    for release in releases {
        println!(
            "{:<24} {:<12} {:<10} {:<10}",
            release.id,
            release.environment,
            release.version,
            if release.phases.all_completed() { "completed" } else { "incomplete" }
        );
    }
    Ok(())
}

pub fn show(store: &ReleaseStore, release_id: &str) -> Result<(), StagecraftError> {
    let release = store.get_release(release_id)?;
    ui::print_header(&format!("release {}", release.id));
    println!("environment: {}", release.environment);
    println!("version:     {}", release.version);
    println!("commit:      {}", release.commit_sha);
    println!("timestamp:   {}", release.timestamp);
    println!("previous:    {}", if release.previous_id.is_empty() { "-" } else { &release.previous_id });
    println!();
    for phase in crate::domain::PHASE_ORDER {
        println!("  {:<12} {}", phase.as_str(), release.phases.get(phase));
    }
    Ok(())
}

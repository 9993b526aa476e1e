use anyhow::{bail, Context};
use tracing_subscriber::EnvFilter;

use glowfield::OverlayConfig;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let mut config = OverlayConfig::default();
    if let Some(arg) = std::env::args().nth(1) {
        let (width, height) = parse_size(&arg)?;
        config = config.with_viewport(width, height);
    }

    glowfield::run(config).context("overlay failed")?;
    Ok(())
}

/// Parse `WIDTHxHEIGHT`, e.g. `1280x720`.
fn parse_size(arg: &str) -> anyhow::Result<(f32, f32)> {
    let Some((w, h)) = arg.split_once(['x', 'X']) else {
        bail!("expected WIDTHxHEIGHT, got {arg:?}");
    };
    let width: u32 = w.trim().parse().with_context(|| format!("bad width {w:?}"))?;
    let height: u32 = h.trim().parse().with_context(|| format!("bad height {h:?}"))?;
    Ok((width as f32, height as f32))
}

//! Terrain Strip Demo
//!
//! Run with: `cargo run --bin terrain-strip -- <heightmap> [config.json] [--frames N] [--grid] [--dump out.json]`
//!
//! Headless driver for the scrolling terrain strip. Loads a heightmap, builds
//! the corridor, simulates N frames at 60 Hz and logs where every instance
//! sits. `--dump` writes the tile buffers and final instance transforms as
//! JSON for inspection in an external viewer.
//!
//! Set `RUST_LOG=debug` for per-tile and per-frame detail.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use terrain_strip_engine::{
    FrameTime, ScrollSettings, TerrainConfig, TerrainScene, load_raster, settings_channel,
};

const FRAME_INTERVAL: f32 = 1.0 / 60.0;

struct Args {
    heightmap: PathBuf,
    config: Option<PathBuf>,
    frames: u32,
    grid_pair: bool,
    dump: Option<PathBuf>,
}

fn parse_args() -> Result<Args, String> {
    let mut args = std::env::args().skip(1);
    let mut positional = Vec::new();
    let mut frames = 300;
    let mut grid_pair = false;
    let mut dump = None;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--frames" => {
                let value = args.next().ok_or("--frames needs a value")?;
                frames = value
                    .parse()
                    .map_err(|e| format!("invalid --frames '{value}': {e}"))?;
            }
            "--grid" => grid_pair = true,
            "--dump" => dump = Some(PathBuf::from(args.next().ok_or("--dump needs a path")?)),
            _ => positional.push(PathBuf::from(arg)),
        }
    }

    let mut positional = positional.into_iter();
    let heightmap = positional
        .next()
        .ok_or("usage: terrain-strip <heightmap> [config.json] [--frames N] [--grid] [--dump out.json]")?;
    Ok(Args {
        heightmap,
        config: positional.next(),
        frames,
        grid_pair,
        dump,
    })
}

fn dump_scene(scene: &TerrainScene, path: &Path) -> std::io::Result<()> {
    let tiles: Vec<_> = scene
        .tiles()
        .iter()
        .map(|tile| {
            serde_json::json!({
                "mode": tile.mode(),
                "positions": tile.positions(),
                "uvs": tile.uvs(),
                "line_strip": tile.line_strip(),
            })
        })
        .collect();
    let instances: Vec<_> = scene
        .instances()
        .iter()
        .map(|i| i.model_matrix().to_cols_array())
        .collect();
    let doc = serde_json::json!({
        "config": scene.config(),
        "tiles": tiles,
        "instances": instances,
    });
    std::fs::write(path, serde_json::to_vec_pretty(&doc)?)
}

fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let config = match &args.config {
        Some(path) => TerrainConfig::load(path)?,
        None => TerrainConfig::default(),
    };

    // Single suspension point: the raster must exist before any vertex does
    let raster = pollster::block_on(load_raster(&args.heightmap))?;

    let mut scene = if args.grid_pair {
        TerrainScene::build_grid_pair(&config, &raster)?
    } else {
        TerrainScene::build(&config, &raster)?
    };

    let (settings_tx, watcher) = settings_channel();
    let mut settings = ScrollSettings::from_config(&config);

    let mut elapsed = 0.0f64;
    for frame in 0..args.frames {
        // Halfway through, ease off the throttle the way a UI slider would
        if frame == args.frames / 2 {
            settings_tx.publish(ScrollSettings::new(settings.speed / 2.0)?)?;
        }
        watcher.latest(&mut settings);

        elapsed += FRAME_INTERVAL as f64;
        scene.update(FrameTime::new(FRAME_INTERVAL, elapsed), &settings);

        if frame % 60 == 0 {
            let zs: Vec<String> = scene
                .placer()
                .positions()
                .iter()
                .map(|z| format!("{z:.2}"))
                .collect();
            log::debug!("[Loop] t={elapsed:.2}s z=[{}]", zs.join(", "));
        }
    }

    let spans = scene.placer().visible_spans();
    if let (Some(far), Some(near)) = (spans.first(), spans.last()) {
        log::info!(
            "[Loop] {} frames, corridor covers z {:.2}..{:.2}",
            args.frames,
            far.0,
            near.1
        );
    }

    if let Some(path) = &args.dump {
        dump_scene(&scene, path)?;
        log::info!("[Terrain] wrote {}", path.display());
    }
    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = match parse_args() {
        Ok(args) => args,
        Err(message) => {
            eprintln!("{message}");
            return ExitCode::from(2);
        }
    };

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("[Terrain] setup failed: {e}");
            ExitCode::FAILURE
        }
    }
}

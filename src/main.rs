use std::process::ExitCode;

use isolevel::{
    Dun, LevelConfig, LevelMap, LevelObject, LightEasing, LightSource, MapCoord, ObjectId,
};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

// ── Demo objects ─────────────────────────────────────────────────────────────

/// A wall torch: lights its surroundings and blocks its cell.
struct Torch {
    id: ObjectId,
    position: MapCoord,
}

impl LevelObject for Torch {
    fn id(&self) -> ObjectId {
        self.id
    }

    fn map_position(&self) -> MapCoord {
        self.position
    }

    fn light_source(&self) -> LightSource {
        LightSource::new(16, 200, 5, LightEasing::Quad)
    }
}

// ── Setup ────────────────────────────────────────────────────────────────────

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}

fn load_config() -> Result<LevelConfig, isolevel::LevelError> {
    match std::env::args().nth(1) {
        Some(path) => {
            info!(path = %path, "loading_level_config");
            LevelConfig::load(path)
        }
        None => Ok(LevelConfig {
            width: 12,
            height: 8,
            default_tile: 0,
            ambient_light: LightSource::new(0, 8, 0, LightEasing::Linear),
            ..LevelConfig::default()
        }),
    }
}

/// A walled room with a doorway on the east side.
fn room(width: usize, height: usize) -> (Dun, Dun) {
    let mut floor = Dun::new(width, height, 1);
    let mut walls = Dun::new(width, height, 0);
    for x in 0..width {
        for y in [0, height - 1] {
            floor.set(x, y, 2);
            walls.set(x, y, 1);
        }
    }
    for y in 0..height {
        for x in [0, width - 1] {
            floor.set(x, y, 2);
            walls.set(x, y, 1);
        }
    }
    floor.set(width - 1, height / 2, 1);
    walls.set(width - 1, height / 2, 0);
    (floor, walls)
}

fn main() -> ExitCode {
    init_tracing();

    let config = match load_config() {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "level_config_failed");
            return ExitCode::FAILURE;
        }
    };
    let mut map = match LevelMap::from_config(&config) {
        Ok(map) => map,
        Err(e) => {
            error!(error = %e, "level_map_failed");
            return ExitCode::FAILURE;
        }
    };

    let (floor, walls) = room(6, 5);
    map.set_simple_area(2, 1, &floor);
    map.set_simple_area_layer(2, 1, isolevel::LevelCell::SOL_LAYER, &walls, true);

    let torch = Torch { id: ObjectId(1), position: MapCoord::new(4, 3) };
    map.init_lights();
    map.add_level_object(&torch);
    map.update_lights();

    println!("{}", map.to_csv(true));

    let start = MapCoord::new(0, 0);
    let goal = MapCoord::new(5, 2);
    let path = map.path(start, goal);
    info!(len = path.len(), "demo_path");
    for step in path.iter().rev() {
        let pixel = map.coord(*step);
        println!(
            "({:>2},{:>2}) light={:>3} px=({}, {})",
            step.x,
            step.y,
            map[*step].light(),
            pixel.x,
            pixel.y
        );
    }

    ExitCode::SUCCESS
}

use crate::math::parse_hex_color;
use crate::scene::{Material, PARTICLE_COUNT};
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::PathBuf;
use std::time::Duration;

/// Command-line configuration
#[derive(Parser, Debug, Clone)]
#[command(version, about)]
pub struct Config {
    /// Display refresh rate in frames per second
    #[arg(long, default_value_t = 60, value_parser = clap::value_parser!(u32).range(1..=240))]
    pub fps: u32,

    /// Number of background particles
    #[arg(long, default_value_t = PARTICLE_COUNT)]
    pub particles: usize,

    /// Seed for the particle field; random when omitted
    #[arg(long)]
    pub seed: Option<u64>,

    /// Height of a terminal cell divided by its width
    #[arg(long, default_value_t = 2.0, value_parser = parse_positive)]
    pub cell_aspect: f64,

    /// Wheel deltaY reported for one scroll notch
    #[arg(long, default_value_t = 100.0, value_parser = parse_positive)]
    pub wheel_step: f64,

    /// Material colour as #rrggbb
    #[arg(long, default_value = "#3c94d7", value_parser = parse_hex_color)]
    pub color: [u8; 3],

    /// Material metalness in [0, 1]
    #[arg(long, default_value_t = 0.86, value_parser = parse_unit)]
    pub metalness: f64,

    /// Material roughness in [0, 1]
    #[arg(long, default_value_t = 0.37, value_parser = parse_unit)]
    pub roughness: f64,

    /// Start with the debug overlay and panel visible
    #[arg(long)]
    pub debug: bool,

    /// Start in wireframe mode
    #[arg(long)]
    pub wireframe: bool,

    /// Write logs to this file instead of stderr
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

impl Config {
    pub fn material(&self) -> Material {
        Material {
            color: self.color,
            metalness: self.metalness,
            roughness: self.roughness,
        }
    }

    pub fn frame_interval(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.fps as f64)
    }

    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        }
    }
}

fn parse_positive(s: &str) -> Result<f64, String> {
    let value: f64 = s.parse().map_err(|_| format!("{s:?} is not a number"))?;
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(format!("{value} must be a positive number"))
    }
}

fn parse_unit(s: &str) -> Result<f64, String> {
    let value: f64 = s.parse().map_err(|_| format!("{s:?} is not a number"))?;
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(format!("{value} is outside [0, 1]"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_demo_scene() {
        let config = Config::try_parse_from(["orbitscene"]).unwrap();
        assert_eq!(config.fps, 60);
        assert_eq!(config.particles, 700);
        assert_eq!(config.material(), Material::default());
        assert_eq!(config.frame_interval(), Duration::from_secs_f64(1.0 / 60.0));
        assert!(config.log_file.is_none());
    }

    #[test]
    fn parses_overrides() {
        let config = Config::try_parse_from([
            "orbitscene",
            "--fps",
            "30",
            "--color",
            "#ff8000",
            "--metalness",
            "0.5",
            "--seed",
            "9",
            "--debug",
        ])
        .unwrap();
        assert_eq!(config.fps, 30);
        assert_eq!(config.color, [0xff, 0x80, 0x00]);
        assert_eq!(config.metalness, 0.5);
        assert_eq!(config.seed, Some(9));
        assert!(config.debug);
    }

    #[test]
    fn rejects_out_of_range_values() {
        assert!(Config::try_parse_from(["orbitscene", "--fps", "0"]).is_err());
        assert!(Config::try_parse_from(["orbitscene", "--roughness", "1.5"]).is_err());
        assert!(Config::try_parse_from(["orbitscene", "--cell-aspect", "-1"]).is_err());
        assert!(Config::try_parse_from(["orbitscene", "--color", "blue"]).is_err());
    }

    #[test]
    fn seeded_rng_is_repeatable() {
        use rand::Rng;
        let config = Config::try_parse_from(["orbitscene", "--seed", "42"]).unwrap();
        assert_eq!(config.rng().random::<u64>(), config.rng().random::<u64>());
    }
}

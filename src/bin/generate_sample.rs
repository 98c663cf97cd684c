use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
use clap::Parser;

/// Write deterministic sample trip data for every supported city.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Directory the CSV files are written to
    #[arg(default_value = ".")]
    out_dir: PathBuf,
}

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }

    fn below(&mut self, n: usize) -> usize {
        (self.next_f64() * n as f64) as usize % n.max(1)
    }

    fn pick<'a>(&mut self, items: &[&'a str]) -> &'a str {
        items[self.below(items.len())]
    }
}

struct CitySpec {
    file: &'static str,
    stations: &'static [&'static str],
    demographics: bool,
}

const CITIES: [CitySpec; 3] = [
    CitySpec {
        file: "chicago.csv",
        stations: &[
            "Streeter Dr & Grand Ave",
            "Lake Shore Dr & Monroe St",
            "Clinton St & Washington Blvd",
            "Canal St & Adams St",
            "Wood St & Hubbard St",
            "Theater on the Lake",
        ],
        demographics: true,
    },
    CitySpec {
        file: "new_york_city.csv",
        stations: &[
            "Pershing Square North",
            "E 17 St & Broadway",
            "W 21 St & 6 Ave",
            "Broadway & E 22 St",
            "12 Ave & W 40 St",
            "Central Park S & 6 Ave",
        ],
        demographics: true,
    },
    CitySpec {
        file: "washington.csv",
        stations: &[
            "Columbus Circle / Union Station",
            "Lincoln Memorial",
            "Jefferson Dr & 14th St SW",
            "15th & K St NW",
            "14th & Belmont St NW",
            "Massachusetts Ave & Dupont Circle NW",
        ],
        demographics: false,
    },
];

/// Commute-heavy start hours, sampled uniformly.
const HOURS: [u32; 16] = [7, 8, 8, 8, 9, 12, 13, 15, 16, 17, 17, 17, 17, 18, 18, 21];

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const ROWS_PER_CITY: usize = 2_000;

fn random_start(rng: &mut SimpleRng, first_day: NaiveDateTime) -> NaiveDateTime {
    // January through June 2017.
    let day = rng.below(181) as i64;
    let hour = HOURS[rng.below(HOURS.len())] as i64;
    let second = rng.below(3600) as i64;
    first_day + TimeDelta::days(day) + TimeDelta::hours(hour) + TimeDelta::seconds(second)
}

fn write_city(dir: &Path, city: &CitySpec, rng: &mut SimpleRng) -> Result<PathBuf> {
    let first_day = NaiveDate::from_ymd_opt(2017, 1, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .context("invalid start date")?;

    let path = dir.join(city.file);
    let mut writer = csv::Writer::from_path(&path)
        .with_context(|| format!("creating {}", path.display()))?;

    let mut header = vec![
        "",
        "Start Time",
        "End Time",
        "Trip Duration",
        "Start Station",
        "End Station",
        "User Type",
    ];
    if city.demographics {
        header.extend(["Gender", "Birth Year"]);
    }
    writer.write_record(&header)?;

    for id in 0..ROWS_PER_CITY {
        let start = random_start(rng, first_day);
        // Log-normal trip length, roughly 3 to 60 minutes.
        let secs = rng.gauss(6.6, 0.6).exp().round().max(60.0);
        let end = start + TimeDelta::seconds(secs as i64);
        let subscriber = rng.next_f64() < 0.8;

        let mut record = vec![
            (1_000_000 + id).to_string(),
            start.format(TIMESTAMP_FORMAT).to_string(),
            end.format(TIMESTAMP_FORMAT).to_string(),
            format!("{secs}"),
            rng.pick(city.stations).to_string(),
            rng.pick(city.stations).to_string(),
            if subscriber { "Subscriber" } else { "Customer" }.to_string(),
        ];
        if city.demographics {
            // Customers rarely register demographics.
            let known = subscriber || rng.next_f64() < 0.1;
            if known {
                record.push(rng.pick(&["Male", "Male", "Male", "Female"]).to_string());
                let year = rng.gauss(1981.0, 11.0).round().clamp(1930.0, 2001.0);
                record.push(format!("{year:.1}"));
            } else {
                record.extend([String::new(), String::new()]);
            }
        }
        writer.write_record(&record)?;
    }
    writer.flush()?;
    Ok(path)
}

fn main() -> Result<()> {
    let Args { out_dir } = Args::parse();
    std::fs::create_dir_all(&out_dir)
        .with_context(|| format!("creating {}", out_dir.display()))?;

    let mut rng = SimpleRng::new(42);
    for city in &CITIES {
        let path = write_city(&out_dir, city, &mut rng)?;
        println!("Wrote {ROWS_PER_CITY} trips to {}", path.display());
    }
    Ok(())
}

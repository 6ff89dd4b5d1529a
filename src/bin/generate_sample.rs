use anyhow::{Context, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Box-Muller transform for normal distribution
fn gauss(rng: &mut StdRng, mean: f64, std_dev: f64) -> f64 {
    let u1: f64 = rng.gen::<f64>().max(1e-15);
    let u2: f64 = rng.gen();
    let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
    mean + std_dev * z
}

/// Writes `sample_data.csv`: numeric measurements plus categorical columns,
/// for trying out colour / symbol / size mappings.
///
/// Usage: `generate_sample [ROWS]` (default 5000)
fn main() -> Result<()> {
    env_logger::init();

    let rows: usize = match std::env::args().nth(1) {
        Some(arg) => arg.parse().with_context(|| format!("invalid row count '{arg}'"))?,
        None => 5_000,
    };

    let mut rng = StdRng::seed_from_u64(42);

    let species = [("setosa", 5.0, 3.4), ("versicolor", 5.9, 2.8), ("virginica", 6.6, 3.0)];
    let sites = ["north", "south"];

    let output_path = "sample_data.csv";
    let mut writer = csv::Writer::from_path(output_path).context("creating output file")?;
    writer.write_record(["id", "length", "width", "weight", "species", "site"])?;

    for id in 0..rows {
        let (name, length_mu, width_mu) = species[rng.gen_range(0..species.len())];
        let length = gauss(&mut rng, length_mu, 0.4);
        let width = gauss(&mut rng, width_mu, 0.3);
        let weight = (length * width * 1.8 + gauss(&mut rng, 0.0, 1.0)).max(0.1);
        let site = sites[rng.gen_range(0..sites.len())];

        writer.write_record([
            id.to_string(),
            format!("{length:.3}"),
            format!("{width:.3}"),
            format!("{weight:.3}"),
            name.to_string(),
            site.to_string(),
        ])?;
    }
    writer.flush()?;

    log::info!("Wrote {rows} rows to {output_path}");
    println!("Wrote {rows} rows to {output_path}");
    Ok(())
}

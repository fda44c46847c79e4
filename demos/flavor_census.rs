use ees_gen::{EventGenerator, EventOptions, Flavor};

// Compare sampled flavor fractions and mean energies against the input tables.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let paths = Flavor::ALL.map(|f| format!("{}/tests/data/{}.dat", env!("CARGO_MANIFEST_DIR"), f));
    let mut gen = EventGenerator::from_files(&paths, Some(2023))?;

    let n = 20_000;
    let events = gen.generate_events(n, &EventOptions::default())?;
    let total: f64 = Flavor::ALL.iter().map(|&f| gen.total_rate(f)).sum();

    println!("flavor     expected  sampled   <Ev>/MeV  <T>/MeV");
    for flavor in Flavor::ALL {
        let picked: Vec<_> = events.iter().filter(|e| e.flavor == flavor).collect();
        let count = picked.len().max(1) as f64;
        let mean_nu = picked.iter().map(|e| e.nu_energy).sum::<f64>() / count;
        let mean_t = picked.iter().map(|e| e.e_ke).sum::<f64>() / count;
        println!(
            "{:<10} {:>8.4}  {:>8.4}  {:>8.2}  {:>7.2}",
            flavor,
            gen.total_rate(flavor) / total,
            picked.len() as f64 / n as f64,
            mean_nu,
            mean_t
        );
    }
    Ok(())
}

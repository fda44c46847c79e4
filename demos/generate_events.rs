use ees_gen::{Config, EventGenerator, EventOptions};
use tracing_subscriber::EnvFilter;

// Usage: cargo run --example generate_events [config.json] [n_events]
// Without a config the fixture tables under tests/data are used.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(path) => Config::from_json_file(path)?,
        None => {
            let mut config = Config::new();
            config.set_data_dir(concat!(env!("CARGO_MANIFEST_DIR"), "/tests/data"), ".dat");
            config.seed = Some(42);
            config
        }
    };
    let n: usize = args.next().map(|s| s.parse()).transpose()?.unwrap_or(10);

    let mut gen = EventGenerator::from_config(&config)?;
    let options: EventOptions = *gen.defaults();

    println!("=== Elastic scattering events ({} requested) ===", n);
    for (i, event) in gen.generate_events(n, &options)?.iter().enumerate() {
        println!(
            "{:>4} {:<8} Ev = {:7.3} MeV  T = {:7.3} MeV  cos = {:6.3}  eDir = [{:6.3}, {:6.3}, {:6.3}]",
            i + 1,
            event.flavor,
            event.nu_energy,
            event.e_ke,
            event.cos_theta(),
            event.e_dir[0],
            event.e_dir[1],
            event.e_dir[2],
        );
    }

    println!("\nFirst event as JSON:");
    let first = gen.generate()?;
    println!("{}", serde_json::to_string_pretty(&first)?);
    Ok(())
}

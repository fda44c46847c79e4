// Integration tests for event generation from the rate tables in tests/data

use approx::assert_abs_diff_eq;
use ees_gen::cross_section::{max_kinetic_energy, recoil_cosine, CrossSectionModel};
use ees_gen::sampling::RejectionSampler;
use ees_gen::{Config, EesError, EventGenerator, EventOptions, Flavor, SupernovaDirection};

fn data_paths() -> [String; 6] {
    Flavor::ALL.map(|f| format!("{}/tests/data/{}.dat", env!("CARGO_MANIFEST_DIR"), f))
}

fn generator(seed: u64) -> EventGenerator {
    EventGenerator::from_files(&data_paths(), Some(seed))
        .unwrap()
        .with_sampler(RejectionSampler::new().with_bound_check(true))
}

fn norm(v: &[f64; 3]) -> f64 {
    v.iter().map(|c| c * c).sum::<f64>().sqrt()
}

#[test]
fn test_generated_events_satisfy_kinematics() {
    let mut gen = generator(12345);
    let e_max = *gen.energy_bins().last().unwrap();
    let options = EventOptions::default();

    for _ in 0..5000 {
        let event = gen.generate_event(&options).unwrap();

        assert!(event.nu_energy >= 2.0 && event.nu_energy <= e_max);
        assert!(event.e_ke >= 1.0);
        assert!(event.e_ke <= max_kinetic_energy(event.nu_energy));
        assert_abs_diff_eq!(norm(&event.sn_direction), 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(norm(&event.e_dir), 1.0, epsilon = 1e-12);

        let cos = recoil_cosine(event.e_ke, event.nu_energy).unwrap();
        assert!((-1.0..=1.0).contains(&cos));
        assert_abs_diff_eq!(event.cos_theta(), cos, epsilon = 1e-9);
    }
}

#[test]
fn test_thresholds_are_respected() {
    let mut gen = generator(7);
    let options = EventOptions::default()
        .with_e_threshold(5.0)
        .with_nu_threshold(15.0);
    for _ in 0..1000 {
        let event = gen.generate_event(&options).unwrap();
        assert!(event.nu_energy >= 15.0);
        assert!(event.e_ke >= 5.0);
    }
}

#[test]
fn test_supernova_along_z() {
    let mut gen = generator(99);
    let options = EventOptions::default().with_direction([0.0, 0.0, 1.0]);
    for _ in 0..500 {
        let event = gen.generate_event(&options).unwrap();
        assert_eq!(event.sn_direction, [0.0, 0.0, 1.0]);
        let cos = recoil_cosine(event.e_ke, event.nu_energy).unwrap();
        assert_abs_diff_eq!(event.e_dir[2], cos, epsilon = 1e-12);
    }
}

#[test]
fn test_supernova_against_z() {
    let mut gen = generator(100);
    let options = EventOptions::default().with_direction([0.0, 0.0, -1.0]);
    for _ in 0..500 {
        let event = gen.generate_event(&options).unwrap();
        let cos = recoil_cosine(event.e_ke, event.nu_energy).unwrap();
        assert_abs_diff_eq!(-event.e_dir[2], cos, epsilon = 1e-12);
    }
}

#[test]
fn test_recoils_are_forward() {
    // T >= 1 MeV always gives a positive recoil cosine
    let mut gen = generator(5);
    let options = EventOptions::default()
        .with_direction_sampling(SupernovaDirection::Isotropic)
        .with_flavor(Flavor::Nuebar);
    let events = gen.generate_events(1000, &options).unwrap();
    assert!(events.iter().all(|e| e.flavor == Flavor::Nuebar));
    assert!(events.iter().all(|e| e.cos_theta() > 0.0));
}

#[test]
fn test_fixed_energy_nue_scenario() {
    let model = CrossSectionModel::new(Flavor::Nue, 10.0);
    assert_eq!(model.couplings.g_a, 0.5);
    assert_abs_diff_eq!(model.couplings.g_v, 0.96244, epsilon = 1e-12);
    // (gv + ga)^2 + (gv - ga)^2 at T = 0
    assert_abs_diff_eq!(model.max_differential(), 1.46244_f64.powi(2) + 0.46244_f64.powi(2), epsilon = 1e-9);
    assert_abs_diff_eq!(model.max_differential(), 2.35258, epsilon = 1e-4);
    assert_abs_diff_eq!(model.max_kinetic_energy(), 9.7508, epsilon = 1e-4);

    let mut gen = generator(10);
    let dir = SupernovaDirection::Fixed([1.0, 1.0, 0.0]);
    for _ in 0..500 {
        let event = gen.generate_event_at_energy(Flavor::Nue, 10.0, &dir, 1.0).unwrap();
        assert!(event.e_ke >= 1.0 && event.e_ke < model.max_kinetic_energy());
    }
}

#[test]
fn test_interpolation_matches_table_rows() {
    let gen = generator(0);
    let text = std::fs::read_to_string(&data_paths()[0]).unwrap();
    let rows: Vec<(f64, f64)> = text
        .lines()
        .filter(|l| !l.trim_start().starts_with("--"))
        .filter_map(|l| {
            let mut fields = l.split_whitespace();
            let e = fields.next()?.parse::<f64>().ok()?;
            let r = fields.next()?.parse::<f64>().ok()?;
            Some((e * 1e3, r))
        })
        .collect();
    assert_eq!(rows.len(), gen.energy_bins().len());

    for &(e, r) in &rows {
        assert_abs_diff_eq!(gen.event_rate(Flavor::Nue, e), r, epsilon = 1e-12);
    }
    for pair in rows.windows(2) {
        let (e0, r0) = pair[0];
        let (e1, r1) = pair[1];
        let mid = 0.5 * (e0 + e1);
        assert_abs_diff_eq!(gen.event_rate(Flavor::Nue, mid), 0.5 * (r0 + r1), epsilon = 1e-9);
    }
    assert_eq!(gen.event_rate(Flavor::Nue, 0.0), rows[0].1);
    assert_eq!(gen.event_rate(Flavor::Nue, 1e4), rows[rows.len() - 1].1);
    assert_abs_diff_eq!(gen.total_rate(Flavor::Nue), 41.3, epsilon = 1e-9);
}

#[test]
fn test_flavor_frequencies_follow_total_rates() {
    let mut gen = generator(2023);
    let total: f64 = Flavor::ALL.iter().map(|&f| gen.total_rate(f)).sum();
    let expected: Vec<f64> = Flavor::ALL.iter().map(|&f| gen.total_rate(f) / total).collect();

    let n = 50_000;
    let mut counts = [0usize; 6];
    for _ in 0..n {
        counts[gen.select_flavor(None).unwrap().index()] += 1;
    }
    for flavor in Flavor::ALL {
        let observed = counts[flavor.index()] as f64 / n as f64;
        assert_abs_diff_eq!(observed, expected[flavor.index()], epsilon = 0.01);
    }
}

#[test]
fn test_unknown_flavor_produces_no_event() {
    let err = EventOptions::default().with_flavor_name("nuet").unwrap_err();
    assert!(matches!(err, EesError::InvalidFlavor(ref name) if name == "nuet"));

    let mut gen = generator(1);
    assert!(matches!(
        gen.select_flavor_named(Some("nuet")),
        Err(EesError::InvalidFlavor(_))
    ));
}

#[test]
fn test_malformed_tables_fail_construction() {
    let dir = format!("{}/tests/data", env!("CARGO_MANIFEST_DIR"));
    for bad in ["numeric_tail.dat", "ragged.dat", "missing.dat"] {
        let mut paths = data_paths();
        paths[2] = format!("{}/{}", dir, bad);
        let err = EventGenerator::from_files(&paths, Some(1)).unwrap_err();
        assert!(matches!(err, EesError::DataFormat { .. }), "{}: {:?}", bad, err);
    }
}

#[test]
fn test_from_config_json() {
    let dir = format!("{}/tests/data", env!("CARGO_MANIFEST_DIR"));
    let json = serde_json::json!({
        "data_files": Flavor::ALL.iter()
            .map(|f| (f.to_string(), format!("{}/{}.dat", dir, f)))
            .collect::<std::collections::HashMap<_, _>>(),
        "seed": 42,
        "e_threshold": 2.0,
        "nu_threshold": 8.0,
        "sn_direction": {"fixed": [0.0, 1.0, 0.0]},
    });
    let config = Config::from_json_str(&json.to_string()).unwrap();
    let mut gen = EventGenerator::from_config(&config).unwrap();
    for _ in 0..200 {
        let event = gen.generate().unwrap();
        assert!(event.e_ke >= 2.0);
        assert!(event.nu_energy >= 8.0);
        assert_eq!(event.sn_direction, [0.0, 1.0, 0.0]);
    }
}

#[test]
fn test_from_global_config() {
    let dir = format!("{}/tests/data", env!("CARGO_MANIFEST_DIR"));
    {
        let mut config = Config::global();
        config.set_data_dir(&dir, ".dat");
        config.seed = Some(3);
    }
    let mut a = EventGenerator::from_global_config().unwrap();
    let mut b = EventGenerator::from_global_config().unwrap();
    assert_eq!(a.generate().unwrap(), b.generate().unwrap());
}

#[test]
fn test_incomplete_config_is_rejected() {
    let mut config = Config::new();
    config.set_data_file(Flavor::Nue, "nue.dat");
    assert!(matches!(
        EventGenerator::from_config(&config),
        Err(EesError::Config(_))
    ));
}

use std::fmt::Write as _;
use std::path::PathBuf;

fn gaussian(x: f64, mu: f64, sigma: f64, amplitude: f64) -> f64 {
    amplitude * (-(x - mu).powi(2) / (2.0 * sigma.powi(2))).exp()
}

fn generate_counts(
    energies: &[f64],
    peaks: &[(f64, f64, f64)],
    background: f64,
    noise_level: f64,
    rng: &mut SimpleRng,
) -> Vec<f64> {
    energies
        .iter()
        .map(|&e| {
            let signal: f64 = peaks
                .iter()
                .map(|&(mu, sigma, amp)| gaussian(e, mu, sigma, amp))
                .sum();
            (background + signal + rng.gauss(0.0, noise_level)).max(0.0).round()
        })
        .collect()
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
}

/// Region definition: label, energy window (high, low, step), peaks, background.
struct RegionSpec {
    label: &'static str,
    window: (f64, f64, f64),
    peaks: Vec<(f64, f64, f64)>,
    background: f64,
    /// Insert a `Layer` sub-header after this many rows.
    layer_after: Option<usize>,
}

fn write_region(out: &mut String, index: usize, spec: &RegionSpec, rng: &mut SimpleRng) {
    let (high, low, step) = spec.window;
    let n = ((high - low) / step).round() as usize + 1;
    // Binding energy decreases through the block, as the instrument records it.
    let energies: Vec<f64> = (0..n).map(|i| high - i as f64 * step).collect();
    let counts = generate_counts(&energies, &spec.peaks, spec.background, 40.0, rng);

    let _ = writeln!(out, "Region\t{index}");
    let _ = writeln!(out, "{index}\tfalse {} 7\t{n}", spec.label);
    let _ = writeln!(out, "Binding Energy (eV)\tCounts / s");
    let _ = writeln!(out, "Source\tAl Ka\t1486.6");
    let _ = writeln!(out, "Pass Energy\t{}", if spec.label.is_empty() { 100 } else { 30 });
    let _ = writeln!(out, "Dwell\t0.1");
    for (i, (e, c)) in energies.iter().zip(&counts).enumerate() {
        if spec.layer_after == Some(i) {
            let _ = writeln!(out, "Layer\t2");
            let _ = writeln!(out, "Etch Time\t30");
            let _ = writeln!(out, "Binding Energy (eV)\tCounts / s");
            let _ = writeln!(out, "Dwell\t0.1");
        }
        let _ = writeln!(out, "{e:.2}\t{c:.1}");
    }
}

fn main() {
    let output_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("sample_xps.txt"));
    let mut rng = SimpleRng::new(42);

    // Charging shifts every peak by +1.2 eV; calibration on C 1s removes it.
    let shift = 1.2;
    let regions = [
        RegionSpec {
            label: "",
            window: (1100.0, 0.0, 1.0),
            peaks: vec![
                (284.6 + shift, 1.5, 2500.0),
                (531.0 + shift, 1.8, 6000.0),
                (399.5 + shift, 1.6, 900.0),
            ],
            background: 300.0,
            layer_after: None,
        },
        RegionSpec {
            label: "C",
            window: (295.0, 280.0, 0.1),
            peaks: vec![(284.6 + shift, 0.9, 5000.0), (288.6 + shift, 1.0, 700.0)],
            background: 500.0,
            layer_after: None,
        },
        RegionSpec {
            label: "O",
            window: (540.0, 525.0, 0.1),
            peaks: vec![(531.0 + shift, 1.1, 8000.0)],
            background: 900.0,
            layer_after: None,
        },
        RegionSpec {
            label: "N",
            window: (410.0, 392.0, 0.1),
            peaks: vec![(399.5 + shift, 1.0, 1200.0), (401.8 + shift, 1.0, 400.0)],
            background: 700.0,
            layer_after: Some(90),
        },
    ];

    let mut text = String::new();
    for (i, spec) in regions.iter().enumerate() {
        write_region(&mut text, i + 1, spec, &mut rng);
    }

    std::fs::write(&output_path, &text).expect("Failed to write output file");
    println!(
        "Wrote {} regions to {} (carbon peak shifted by {shift} eV)",
        regions.len(),
        output_path.display()
    );
}
